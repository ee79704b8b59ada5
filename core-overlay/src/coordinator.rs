//! # Overlay Coordinator
//!
//! Single entry point that owns the gesture gate, the play-state reconciler,
//! the transition sequencer and their timers for one mounted overlay.
//!
//! ## Event Model
//!
//! Hosts feed a typed [`OverlayEvent`] per pointer sample, engine
//! notification, button press or frame tick. Each call to
//! [`OverlayCoordinator::dispatch`] runs to completion:
//!
//! 1. fire timers that fell due before the event
//! 2. apply the event
//! 3. fire timers due immediately (zero-length transitions)
//! 4. sample every animated value at the current instant
//!
//! Engine commands are not executed here. They queue in an outbox that the
//! host (or [`CommandDispatcher`](crate::dispatch::CommandDispatcher)) drains
//! with [`OverlayCoordinator::take_commands`], so optimistic state always
//! changes before any engine reply can arrive.
//!
//! Nothing here returns an error to the caller once constructed. Rejected
//! drag updates and stale timers are logged and dropped.

use crate::commit::{CommitAction, CommitGate, GateDecision, SnapTarget};
use crate::error::Result;
use crate::gesture::{GestureClass, GestureOrigin, PointerSample};
use crate::reconciler::{GraceWindow, OptimisticStateReconciler};
use crate::surface::OverlaySnapshot;
use crate::timer::{TimerId, TimerKind, TimerQueue};
use crate::transition::{Layer, LayerMode, TransitionSequencer, TransitionStart, TransitionToken};
use bridge_traits::{
    ChangeDirection, EngineCommand, EngineNotification, MonotonicClock, PlaybackEngine,
};
use core_runtime::config::OverlayConfig;
use core_runtime::events::{CoreEvent, EventBus, GestureEvent, PlaybackEvent, TransitionEvent};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Input to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A pointer went down on one of the overlay surfaces.
    PointerDown { origin: GestureOrigin },
    /// Pointer moved; displacement relative to the pointer-down.
    GestureSample(PointerSample),
    /// Pointer lifted with its final displacement and velocity.
    Release(PointerSample),
    /// The platform stole the pointer (scroll view, system gesture).
    PointerCancel,
    /// Notification from the playback engine.
    Engine(EngineNotification),
    /// Time advanced; fire due timers and resample values.
    Tick,
    OpenRequested,
    CloseRequested,
    TogglePlayback,
    SkipNext,
    SkipPrevious,
    /// Container extent changed.
    Layout { width: f32, height: f32 },
}

pub struct OverlayCoordinator {
    config: OverlayConfig,
    engine: Arc<dyn PlaybackEngine>,
    clock: Arc<dyn MonotonicClock>,
    gate: CommitGate,
    reconciler: OptimisticStateReconciler,
    sequencer: TransitionSequencer,
    timers: TimerQueue,
    play_timer: Option<TimerId>,
    skip_timer: Option<TimerId>,
    transition_timers: HashMap<Layer, TimerId>,
    outbox: Vec<EngineCommand>,
    event_bus: Option<EventBus>,
}

impl OverlayCoordinator {
    /// Build a coordinator reading initial state from `engine`.
    ///
    /// The sheet starts hidden, the current track (if any) is shown at rest,
    /// and the spin runs if the engine already reports playback.
    pub fn new(
        config: OverlayConfig,
        engine: Arc<dyn PlaybackEngine>,
        clock: Arc<dyn MonotonicClock>,
    ) -> Result<Self> {
        config.validate()?;
        let now = clock.now();
        let layout = config.layout;

        let gate = CommitGate::new(config.gesture, config.commit, layout.height);
        let reconciler = OptimisticStateReconciler::new(config.reconciler, engine.is_playing());
        let mut sequencer =
            TransitionSequencer::new(config.transition, layout.width, layout.height, now);
        sequencer.show_track(engine.current_track());

        let mut coordinator = Self {
            config,
            engine,
            clock,
            gate,
            reconciler,
            sequencer,
            timers: TimerQueue::new(),
            play_timer: None,
            skip_timer: None,
            transition_timers: HashMap::new(),
            outbox: Vec::new(),
            event_bus: None,
        };

        if coordinator.engine.is_playing() {
            if let Some(start) = coordinator.sequencer.start_spin(now) {
                coordinator.start_transition(start);
            }
        }

        info!(
            width = layout.width,
            height = layout.height,
            "Overlay coordinator created"
        );
        Ok(coordinator)
    }

    /// Publish gesture, playback and transition events on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn PlaybackEngine> {
        &self.engine
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    pub fn gate(&self) -> &CommitGate {
        &self.gate
    }

    pub fn sequencer(&self) -> &TransitionSequencer {
        &self.sequencer
    }

    pub fn rendered_is_playing(&self) -> bool {
        self.reconciler.rendered_is_playing()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest instant at which a `Tick` would change something.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Drain engine commands queued since the last call.
    pub fn take_commands(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let cover = self.sequencer.cover();
        OverlaySnapshot {
            rendered_is_playing: self.reconciler.rendered_is_playing(),
            sheet_visible: self.sequencer.sheet_visible(),
            sheet_position: self.sequencer.sheet_position(),
            backdrop_opacity: self.sequencer.backdrop_opacity(),
            mini_opacity: self.sequencer.mini_opacity(),
            current_track: cover.current().cloned(),
            outgoing_track: cover.outgoing().cloned(),
            direction: cover.direction(),
            cover_prev_translate: cover.prev_translate(),
            cover_prev_opacity: cover.prev_opacity(),
            cover_curr_translate: cover.curr_translate(),
            cover_curr_opacity: cover.curr_opacity(),
            spin_angle: self.sequencer.spin().angle(),
            gesture_active: self.gate.session().is_some(),
        }
    }

    /// Handle one event to completion.
    pub fn dispatch(&mut self, event: OverlayEvent) {
        let now = self.clock.now();
        trace!(?event, now_ms = now.as_millis() as u64, "Dispatching overlay event");
        self.run_due_timers(now);

        match event {
            OverlayEvent::PointerDown { origin } => self.on_pointer_down(origin, now),
            OverlayEvent::GestureSample(sample) => self.on_sample(sample, now),
            OverlayEvent::Release(sample) => self.on_release(sample, now),
            OverlayEvent::PointerCancel => self.on_cancel(now),
            OverlayEvent::Engine(EngineNotification::TrackChanged) => self.on_track_changed(now),
            OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing }) => {
                self.on_play_state(is_playing, now)
            }
            OverlayEvent::Tick => {}
            OverlayEvent::OpenRequested => self.open(now),
            OverlayEvent::CloseRequested => self.close(now),
            OverlayEvent::TogglePlayback => self.toggle_playback(now),
            OverlayEvent::SkipNext => self.skip(ChangeDirection::Next, now),
            OverlayEvent::SkipPrevious => self.skip(ChangeDirection::Previous, now),
            OverlayEvent::Layout { width, height } => self.on_layout(width, height),
        }

        self.run_due_timers(now);
        self.sequencer.sample(now);
    }

    /// Re-read engine state after notifications were lost.
    pub fn resync(&mut self) {
        let displayed = self.sequencer.cover().current().map(|t| t.id.clone());
        let actual = self.engine.current_track().map(|t| t.id.clone());
        if displayed != actual {
            self.dispatch(OverlayEvent::Engine(EngineNotification::TrackChanged));
        }
        let is_playing = self.engine.is_playing();
        self.dispatch(OverlayEvent::Engine(EngineNotification::PlayStateChanged {
            is_playing,
        }));
    }

    // ------------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------------

    fn on_pointer_down(&mut self, origin: GestureOrigin, now: Duration) {
        let (_, replaced) = self.gate.begin(origin, now);
        if replaced.is_some() {
            self.release_drags(now);
        }
    }

    fn on_sample(&mut self, sample: PointerSample, now: Duration) {
        let Some(outcome) = self.gate.sample(sample, now) else {
            trace!("Pointer sample without a session");
            return;
        };

        match outcome.decision {
            GateDecision::Tracking(GestureClass::Navigate) => self.follow_cover(sample.dx),
            GateDecision::Tracking(GestureClass::Dismiss) => self.follow_sheet(sample.dy, now),
            GateDecision::Commit(action) => {
                if matches!(action, CommitAction::Navigate(_)) {
                    self.follow_cover(sample.dx);
                }
                self.on_commit(outcome.session_id, action, now);
            }
            _ => {}
        }
    }

    fn on_release(&mut self, sample: PointerSample, now: Duration) {
        let Some(outcome) = self.gate.release(sample, now) else {
            trace!("Release without a session");
            return;
        };
        let session_id = outcome.session_id;
        let decision = match outcome.decision {
            GateDecision::Commit(CommitAction::Close) | GateDecision::SnapBack(SnapTarget::Open)
                if !self.sequencer.sheet_visible() =>
            {
                debug!(session_id, "Dismiss released with the sheet hidden");
                GateDecision::Ignored
            }
            decision => decision,
        };

        match decision {
            GateDecision::Commit(action) => {
                self.on_commit(session_id, action, now);
                self.release_drags(now);
            }
            GateDecision::Ended => self.release_drags(now),
            GateDecision::SnapBack(target) => {
                let start = match target {
                    SnapTarget::Rest => self.sequencer.snap_cover(now),
                    SnapTarget::Open => self.sequencer.snap_sheet_open(now),
                };
                self.start_transition(start);
                debug!(session_id, target = target.as_str(), "Gesture snapped back");
                self.emit(CoreEvent::Gesture(GestureEvent::SnappedBack {
                    session_id,
                    target: target.as_str().to_string(),
                }));
            }
            GateDecision::Tap => {
                if outcome.origin == GestureOrigin::MiniPlayer {
                    self.open(now);
                }
            }
            GateDecision::Ignored => {
                self.emit(CoreEvent::Gesture(GestureEvent::Ignored { session_id }));
            }
            GateDecision::Tracking(_) => {}
        }
    }

    fn on_cancel(&mut self, now: Duration) {
        let Some(session) = self.gate.cancel() else {
            return;
        };
        self.release_drags(now);

        let target = match session.class() {
            _ if session.is_committed() => None,
            GestureClass::Navigate => Some(SnapTarget::Rest),
            GestureClass::Dismiss if self.sequencer.sheet_visible() => Some(SnapTarget::Open),
            GestureClass::Dismiss | GestureClass::Unset | GestureClass::Ignore => None,
        };
        if let Some(target) = target {
            self.emit(CoreEvent::Gesture(GestureEvent::SnappedBack {
                session_id: session.id(),
                target: target.as_str().to_string(),
            }));
        }
    }

    fn on_commit(&mut self, session_id: u64, action: CommitAction, now: Duration) {
        self.emit(CoreEvent::Gesture(GestureEvent::Committed {
            session_id,
            action: action.as_str().to_string(),
        }));
        match action {
            CommitAction::Navigate(direction) => self.skip(direction, now),
            CommitAction::Close => self.close(now),
        }
    }

    fn follow_cover(&mut self, dx: f32) {
        if self.sequencer.mode(Layer::Cover) != LayerMode::Dragging {
            if let Some(token) = self.sequencer.begin_cover_drag() {
                self.on_superseded(token);
            }
        }
        if let Err(e) = self.sequencer.drag_cover(dx) {
            warn!(error = %e, "Dropped cover drag update");
        }
    }

    fn follow_sheet(&mut self, dy: f32, now: Duration) {
        if !self.sequencer.sheet_visible() {
            return;
        }
        if self.sequencer.mode(Layer::Sheet) != LayerMode::Dragging {
            if let Some(token) = self.sequencer.begin_sheet_drag(now) {
                self.on_superseded(token);
            }
        }
        if let Err(e) = self.sequencer.drag_sheet(dy) {
            warn!(error = %e, "Dropped sheet drag update");
        }
    }

    /// Spring any layer still under the pointer back to rest.
    fn release_drags(&mut self, now: Duration) {
        self.release_cover_drag(now);
        if self.sequencer.mode(Layer::Sheet) == LayerMode::Dragging {
            let start = self.sequencer.snap_sheet_open(now);
            self.start_transition(start);
        }
    }

    fn release_cover_drag(&mut self, now: Duration) {
        if self.sequencer.mode(Layer::Cover) == LayerMode::Dragging {
            let start = self.sequencer.snap_cover(now);
            self.start_transition(start);
        }
    }

    // ------------------------------------------------------------------------
    // Sheet
    // ------------------------------------------------------------------------

    fn open(&mut self, now: Duration) {
        if self.sequencer.sheet_open() {
            debug!("Open requested while already open");
            return;
        }
        info!("Opening overlay");
        let start = self.sequencer.open_sheet(now);
        self.start_transition(start);
        let start = self.sequencer.fade_mini_player(false, now);
        self.start_transition(start);
    }

    fn close(&mut self, now: Duration) {
        if !self.sequencer.sheet_open() {
            debug!("Close requested while hidden or closing");
            return;
        }
        let sheet_gesture = self
            .gate
            .session()
            .is_some_and(|session| session.origin() == GestureOrigin::FullSheet);
        if sheet_gesture {
            self.gate.cancel();
            // The close animation takes the sheet over; only the cover needs
            // to leave drag-follow.
            self.release_cover_drag(now);
        }
        info!("Closing overlay");
        let start = self.sequencer.close_sheet(now);
        self.start_transition(start);
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    fn toggle_playback(&mut self, now: Duration) {
        let (command, window) = self.reconciler.toggle(now);
        self.arm_play_timer(window);
        self.issue(command);
    }

    fn skip(&mut self, direction: ChangeDirection, now: Duration) {
        let command = match direction {
            ChangeDirection::Next => EngineCommand::Next,
            ChangeDirection::Previous => EngineCommand::Previous,
            ChangeDirection::None => return,
        };
        if let Some(window) = self.reconciler.begin_skip(now) {
            if let Some(old) = self.skip_timer.take() {
                self.timers.cancel(old);
            }
            self.skip_timer = Some(self.timers.schedule(
                TimerKind::SkipGrace {
                    generation: window.generation,
                },
                window.expires_at,
            ));
        }
        self.issue(command);
    }

    fn arm_play_timer(&mut self, window: GraceWindow) {
        if let Some(old) = self.play_timer.take() {
            self.timers.cancel(old);
        }
        self.play_timer = Some(self.timers.schedule(
            TimerKind::PlayGrace {
                generation: window.generation,
            },
            window.expires_at,
        ));
    }

    fn issue(&mut self, command: EngineCommand) {
        info!(command = %command, "Engine command queued");
        self.outbox.push(command);
        self.emit(CoreEvent::Playback(PlaybackEvent::CommandIssued {
            command: command.as_str().to_string(),
        }));
    }

    fn on_track_changed(&mut self, now: Duration) {
        let current = self.engine.current_track();
        let previous = self.engine.previous_track();
        let direction = self.engine.change_direction();
        debug!(
            track_id = ?current.as_ref().map(|t| t.id.as_str()),
            ?direction,
            "Track changed"
        );

        let start = self.sequencer.change_track(current, previous, direction, now);
        self.start_transition(start);

        // A gapless engine sends no play-state change across the swap.
        if self.engine.is_playing() {
            if let Some(start) = self.sequencer.start_spin(now) {
                self.start_transition(start);
            }
        } else {
            self.stop_spin(now);
        }
    }

    fn on_play_state(&mut self, is_playing: bool, now: Duration) {
        let outcome = self.reconciler.on_engine_state(is_playing);
        if outcome.closed_optimistic {
            if let Some(id) = self.play_timer.take() {
                self.timers.cancel(id);
            }
        }
        if outcome.closed_skip {
            if let Some(id) = self.skip_timer.take() {
                self.timers.cancel(id);
            }
        }

        if is_playing {
            if let Some(start) = self.sequencer.start_spin(now) {
                self.start_transition(start);
            }
        } else {
            self.stop_spin(now);
        }
    }

    fn stop_spin(&mut self, now: Duration) {
        if let Some(token) = self.sequencer.stop_spin(now) {
            self.emit_transition(TransitionEvent::Completed {
                layer: token.layer().as_str().to_string(),
                token: token.id(),
            });
        }
    }

    fn on_layout(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            warn!(width, height, "Ignoring invalid layout");
            return;
        }
        self.gate.set_container_height(height);
        self.sequencer.set_container_size(width, height);
    }

    // ------------------------------------------------------------------------
    // Transitions & timers
    // ------------------------------------------------------------------------

    fn start_transition(&mut self, start: TransitionStart) {
        if let Some(old) = start.superseded {
            self.on_superseded(old);
        }
        let layer = start.token.layer();
        if let Some(ends_at) = start.ends_at {
            let id = self
                .timers
                .schedule(TimerKind::TransitionEnd(start.token), ends_at);
            if let Some(stale) = self.transition_timers.insert(layer, id) {
                self.timers.cancel(stale);
            }
        }
        self.emit_transition(TransitionEvent::Started {
            layer: layer.as_str().to_string(),
            token: start.token.id(),
        });
    }

    fn on_superseded(&mut self, token: TransitionToken) {
        let layer = token.layer();
        if let Some(id) = self.transition_timers.remove(&layer) {
            self.timers.cancel(id);
        }
        debug!(layer = %layer, token = token.id(), "Transition superseded");
        self.emit_transition(TransitionEvent::Superseded {
            layer: layer.as_str().to_string(),
            token: token.id(),
        });
    }

    fn run_due_timers(&mut self, now: Duration) {
        loop {
            let due = self.timers.drain_due(now);
            if due.is_empty() {
                break;
            }
            for (id, kind) in due {
                self.on_timer(id, kind, now);
            }
        }
    }

    fn on_timer(&mut self, id: TimerId, kind: TimerKind, now: Duration) {
        match kind {
            TimerKind::PlayGrace { generation } => {
                if self.play_timer == Some(id) {
                    self.play_timer = None;
                }
                if self.reconciler.expire_play(generation) {
                    let rendered = self.reconciler.rendered_is_playing();
                    warn!(
                        generation,
                        rendered_is_playing = rendered,
                        "Play state not confirmed within grace window"
                    );
                    self.emit(CoreEvent::Playback(PlaybackEvent::OptimisticExpired {
                        rendered_is_playing: rendered,
                    }));
                }
            }
            TimerKind::SkipGrace { generation } => {
                if self.skip_timer == Some(id) {
                    self.skip_timer = None;
                }
                if self.reconciler.expire_skip(generation) {
                    debug!(generation, "Skip window expired");
                }
            }
            TimerKind::TransitionEnd(token) => {
                let layer = token.layer();
                if self.transition_timers.get(&layer) == Some(&id) {
                    self.transition_timers.remove(&layer);
                }
                let Some(end) = self.sequencer.complete(token, now) else {
                    return;
                };
                self.emit_transition(TransitionEvent::Completed {
                    layer: layer.as_str().to_string(),
                    token: token.id(),
                });
                if end.overlay_hidden {
                    info!("Overlay hidden");
                    self.emit_transition(TransitionEvent::OverlayHidden);
                    let start = self.sequencer.fade_mini_player(true, now);
                    self.start_transition(start);
                }
            }
        }
    }

    fn emit_transition(&self, event: TransitionEvent) {
        self.emit(CoreEvent::Transition(event));
    }

    fn emit(&self, event: CoreEvent) {
        if let Some(bus) = &self.event_bus {
            // No subscribers is fine.
            let _ = bus.emit(event);
        }
    }
}
