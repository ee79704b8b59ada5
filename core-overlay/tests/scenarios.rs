//! End-to-end overlay scenarios driven through the coordinator with a fake
//! engine and a manual clock

mod common;

use bridge_traits::{ChangeDirection, EngineCommand, EngineNotification, ManualClock};
use common::FakeEngine;
use core_overlay::{
    GestureOrigin, Layer, LayerMode, OverlayCoordinator, OverlayEvent, PointerSample,
};
use core_runtime::config::OverlayConfig;
use core_runtime::events::{
    CoreEvent, EventBus, EventStream, GestureEvent, PlaybackEvent, TransitionEvent,
};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    engine: Arc<FakeEngine>,
    clock: Arc<ManualClock>,
    overlay: OverlayCoordinator,
    events: EventStream,
}

impl Harness {
    fn new(engine: FakeEngine) -> Self {
        Self::with_config(engine, OverlayConfig::default())
    }

    fn with_config(engine: FakeEngine, config: OverlayConfig) -> Self {
        let engine = Arc::new(engine);
        let clock = Arc::new(ManualClock::new());
        let bus = EventBus::new(256);
        let events = EventStream::new(bus.subscribe());
        let overlay = OverlayCoordinator::new(config, engine.clone(), clock.clone())
            .unwrap()
            .with_event_bus(bus);
        Self {
            engine,
            clock,
            overlay,
            events,
        }
    }

    fn at(&mut self, millis: u64, event: OverlayEvent) {
        self.clock.set(Duration::from_millis(millis));
        self.overlay.dispatch(event);
    }

    fn tick(&mut self, millis: u64) {
        self.at(millis, OverlayEvent::Tick);
    }

    fn open_sheet(&mut self, millis: u64) {
        self.at(millis, OverlayEvent::OpenRequested);
        self.tick(millis + 400);
    }

    fn drain(&mut self) -> Vec<CoreEvent> {
        self.events.drain()
    }
}

fn down(origin: GestureOrigin) -> OverlayEvent {
    OverlayEvent::PointerDown { origin }
}

fn drag(dx: f32, dy: f32) -> OverlayEvent {
    OverlayEvent::GestureSample(PointerSample::displacement(dx, dy))
}

fn release(dx: f32, dy: f32, vx: f32, vy: f32) -> OverlayEvent {
    OverlayEvent::Release(PointerSample::new(dx, dy, vx, vy))
}

// ============================================================================
// Gesture scenarios
// ============================================================================

#[test]
fn test_horizontal_drag_commits_next_once() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b", "c"], true));
    h.open_sheet(0);
    h.drain();

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(-20.0, 0.0));
    h.at(1032, drag(-40.0, 0.0));
    h.at(1048, drag(-80.0, 0.0));
    h.at(1064, release(-80.0, 0.0, -1.2, 0.0));

    assert_eq!(h.overlay.take_commands(), vec![EngineCommand::Next]);

    let committed: Vec<_> = h
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            CoreEvent::Gesture(GestureEvent::Committed { action, .. }) => Some(action),
            _ => None,
        })
        .collect();
    assert_eq!(committed, vec!["next".to_string()]);
}

#[test]
fn test_small_vertical_drag_snaps_back_open() {
    let mut h = Harness::new(FakeEngine::new(&["a"], true));
    h.open_sheet(0);
    h.drain();

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(0.0, 15.0));
    assert_eq!(h.overlay.snapshot().sheet_position, 15.0);
    assert_eq!(h.overlay.sequencer().mode(Layer::Sheet), LayerMode::Dragging);

    h.at(1032, release(0.0, 15.0, 0.0, 0.05));
    assert!(h.overlay.take_commands().is_empty());
    assert!(h.overlay.sequencer().sheet_open());
    assert_eq!(h.overlay.sequencer().mode(Layer::Sheet), LayerMode::Animating);

    h.tick(1300);
    assert_eq!(h.overlay.snapshot().sheet_position, 0.0);
    assert_eq!(h.overlay.snapshot().backdrop_opacity, 1.0);

    let events = h.drain();
    assert!(events.contains(&CoreEvent::Gesture(GestureEvent::SnappedBack {
        session_id: 1,
        target: "open".to_string(),
    })));
    assert!(!events.contains(&CoreEvent::Transition(TransitionEvent::OverlayHidden)));
}

#[test]
fn test_dismiss_past_extent_closes_and_restores_mini_player() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));
    h.open_sheet(0);
    assert_eq!(h.overlay.snapshot().mini_opacity, 0.0);
    h.drain();

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(0.0, 120.0));
    h.at(1100, drag(0.0, 250.0));
    h.at(1116, release(0.0, 250.0, 0.0, 0.1));
    assert!(!h.overlay.sequencer().sheet_open());
    assert!(h.overlay.sequencer().sheet_visible());

    h.tick(1500);
    assert!(!h.overlay.sequencer().sheet_visible());
    assert_eq!(h.overlay.snapshot().sheet_position, 800.0);

    h.tick(1800);
    assert_eq!(h.overlay.snapshot().mini_opacity, 1.0);

    let events = h.drain();
    assert!(events.contains(&CoreEvent::Gesture(GestureEvent::Committed {
        session_id: 1,
        action: "close".to_string(),
    })));
    assert!(events.contains(&CoreEvent::Transition(TransitionEvent::OverlayHidden)));
}

#[test]
fn test_fast_flick_closes_below_extent() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));
    h.open_sheet(0);

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(0.0, 60.0));
    h.at(1032, release(0.0, 60.0, 0.0, 0.9));
    assert!(!h.overlay.sequencer().sheet_open());
}

#[test]
fn test_cooldown_absorbs_residual_drag() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b", "c"], true));
    h.open_sheet(0);

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(-30.0, 0.0));
    h.at(1032, release(-30.0, 0.0, 0.0, 0.0));

    // A second flick right after the commit lands inside the cooldown.
    h.at(1200, down(GestureOrigin::FullSheet));
    h.at(1216, drag(-40.0, 0.0));
    h.at(1232, release(-40.0, 0.0, -0.8, 0.0));
    assert_eq!(h.overlay.take_commands(), vec![EngineCommand::Next]);

    h.at(1600, down(GestureOrigin::FullSheet));
    h.at(1616, drag(25.0, 0.0));
    assert_eq!(h.overlay.take_commands(), vec![EngineCommand::Previous]);
}

#[test]
fn test_skip_buttons_bypass_cooldown() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b", "c"], true));
    h.open_sheet(0);

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(-30.0, 0.0));
    h.at(1050, OverlayEvent::SkipNext);
    h.at(1060, OverlayEvent::SkipPrevious);
    assert_eq!(
        h.overlay.take_commands(),
        vec![EngineCommand::Next, EngineCommand::Next, EngineCommand::Previous]
    );
}

#[test]
fn test_navigate_drag_follows_pointer_then_snaps() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], false));
    h.open_sheet(0);

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(-8.0, 1.0));
    assert_eq!(h.overlay.snapshot().cover_curr_translate, -8.0);
    assert_eq!(h.overlay.sequencer().mode(Layer::Cover), LayerMode::Dragging);

    h.at(1032, release(-8.0, 1.0, 0.05, 0.0));
    assert!(h.overlay.take_commands().is_empty());
    h.tick(1300);
    assert_eq!(h.overlay.snapshot().cover_curr_translate, 0.0);
    assert_eq!(h.overlay.sequencer().mode(Layer::Cover), LayerMode::Idle);
}

#[test]
fn test_pointer_cancel_snaps_back() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));
    h.open_sheet(0);
    h.drain();

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(0.0, 100.0));
    h.at(1020, OverlayEvent::PointerCancel);
    assert!(!h.overlay.snapshot().gesture_active);
    h.tick(1400);
    assert_eq!(h.overlay.snapshot().sheet_position, 0.0);
    assert!(h.drain().contains(&CoreEvent::Gesture(GestureEvent::SnappedBack {
        session_id: 1,
        target: "open".to_string(),
    })));
}

#[test]
fn test_close_during_navigate_drag_springs_cover_back() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], false));
    h.open_sheet(0);

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(8.0, 0.0));
    assert_eq!(h.overlay.sequencer().mode(Layer::Cover), LayerMode::Dragging);

    h.at(1032, OverlayEvent::CloseRequested);
    assert_eq!(h.overlay.sequencer().mode(Layer::Cover), LayerMode::Animating);

    // The release lands after the session was torn down.
    h.at(1048, release(8.0, 0.0, 0.0, 0.0));
    h.tick(2000);
    assert_eq!(h.overlay.sequencer().mode(Layer::Cover), LayerMode::Idle);
    assert_eq!(h.overlay.snapshot().cover_curr_translate, 0.0);
    assert!(!h.overlay.sequencer().sheet_visible());
    assert!(h.overlay.take_commands().is_empty());
}

#[test]
fn test_sheet_release_while_hidden_is_ignored() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));
    let hidden_position = h.overlay.snapshot().sheet_position;

    h.at(0, down(GestureOrigin::FullSheet));
    h.at(16, drag(0.0, 15.0));
    h.at(32, release(0.0, 15.0, 0.0, 0.05));
    h.tick(600);
    assert!(!h.overlay.sequencer().sheet_visible());
    assert_eq!(h.overlay.snapshot().sheet_position, hidden_position);

    h.at(1000, down(GestureOrigin::FullSheet));
    h.at(1016, drag(0.0, 300.0));
    h.at(1032, release(0.0, 300.0, 0.0, 0.9));
    h.tick(1600);
    assert!(!h.overlay.sequencer().sheet_visible());
    assert_eq!(h.overlay.snapshot().sheet_position, hidden_position);

    let gestures: Vec<_> = h
        .drain()
        .into_iter()
        .filter(|event| matches!(event, CoreEvent::Gesture(_)))
        .collect();
    assert_eq!(
        gestures,
        vec![
            CoreEvent::Gesture(GestureEvent::Ignored { session_id: 1 }),
            CoreEvent::Gesture(GestureEvent::Ignored { session_id: 2 }),
        ]
    );
}

#[test]
fn test_mini_player_vertical_scroll_is_ignored() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));

    h.at(0, down(GestureOrigin::MiniPlayer));
    h.at(16, drag(0.0, 60.0));
    h.at(32, release(0.0, 120.0, 0.0, 1.0));
    assert!(!h.overlay.sequencer().sheet_visible());
    assert!(h
        .drain()
        .contains(&CoreEvent::Gesture(GestureEvent::Ignored { session_id: 1 })));
}

#[test]
fn test_mini_player_swipe_navigates_and_tap_opens() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], false));

    h.at(0, down(GestureOrigin::MiniPlayer));
    h.at(16, drag(30.0, 0.0));
    h.at(32, release(30.0, 0.0, 0.0, 0.0));
    assert_eq!(h.overlay.take_commands(), vec![EngineCommand::Previous]);
    assert!(!h.overlay.sequencer().sheet_visible());

    h.at(1000, down(GestureOrigin::MiniPlayer));
    h.at(1080, release(1.0, 1.0, 0.0, 0.0));
    assert!(h.overlay.sequencer().sheet_visible());
}

/// Deterministic pseudo-random drags: no session ever yields two commands.
#[test]
fn test_commit_at_most_once_across_many_sessions() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], false));
    let mut seed: u32 = 0x2545_F491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed % 2000) as f32 / 10.0 - 100.0
    };

    let mut t = 0;
    for _ in 0..50 {
        // Stay clear of the cooldown so every session may commit.
        t += 1000;
        h.at(t, down(GestureOrigin::MiniPlayer));
        let (mut dx, mut dy) = (0.0, 0.0);
        for step in 1..=10 {
            dx += next() / 5.0;
            dy += next() / 5.0;
            h.at(t + step * 16, drag(dx, dy));
        }
        h.at(t + 200, release(dx, dy, next() / 100.0, 0.0));

        let commands = h.overlay.take_commands();
        assert!(commands.len() <= 1, "session issued {:?}", commands);
        if let Some(command) = commands.first() {
            // Navigation commands only; play/pause never comes from a drag.
            assert!(matches!(command, EngineCommand::Next | EngineCommand::Previous));
        }
    }
}

// ============================================================================
// Track change scenarios
// ============================================================================

#[test]
fn test_next_track_slides_left_and_right_in_lockstep() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], true));
    h.open_sheet(0);
    h.drain();

    h.engine.apply_skip(ChangeDirection::Next);
    h.at(1000, OverlayEvent::Engine(EngineNotification::TrackChanged));

    let snap = h.overlay.snapshot();
    assert_eq!(snap.current_track.as_ref().unwrap().id, "b");
    assert_eq!(snap.outgoing_track.as_ref().unwrap().id, "a");
    assert_eq!(snap.direction, ChangeDirection::Next);
    assert_eq!(snap.cover_prev_translate, 0.0);
    assert_eq!(snap.cover_curr_translate, 390.0);

    h.tick(1160);
    let snap = h.overlay.snapshot();
    assert!(snap.cover_prev_translate < 0.0, "outgoing moves left");
    assert!(snap.cover_curr_translate > 0.0 && snap.cover_curr_translate < 390.0);
    assert!((snap.cover_prev_opacity + snap.cover_curr_opacity - 1.0).abs() < 1e-4);

    h.tick(1320);
    let snap = h.overlay.snapshot();
    assert_eq!(snap.cover_curr_translate, 0.0);
    assert_eq!(snap.cover_curr_opacity, 1.0);
    assert!(snap.outgoing_track.is_none());
    assert_eq!(snap.direction, ChangeDirection::None);

    // Both sides were driven by one token, so they settle together.
    let completed: Vec<_> = h
        .drain()
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                CoreEvent::Transition(TransitionEvent::Completed { layer, .. }) if layer == "cover"
            )
        })
        .collect();
    assert_eq!(completed.len(), 1);
}

#[test]
fn test_first_load_fades_without_slide() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));
    h.at(0, OverlayEvent::Engine(EngineNotification::TrackChanged));
    let snap = h.overlay.snapshot();
    assert_eq!(snap.cover_curr_translate, 0.0);
    assert_eq!(snap.cover_curr_opacity, 0.0);
    assert!(snap.outgoing_track.is_none());

    h.tick(250);
    assert_eq!(h.overlay.snapshot().cover_curr_opacity, 1.0);
}

#[test]
fn test_rapid_track_changes_leave_one_live_token() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b", "c"], true));
    h.drain();

    h.engine.apply_skip(ChangeDirection::Next);
    h.at(0, OverlayEvent::Engine(EngineNotification::TrackChanged));
    let first = h.overlay.sequencer().live_token(Layer::Cover).unwrap();

    h.engine.apply_skip(ChangeDirection::Next);
    h.at(100, OverlayEvent::Engine(EngineNotification::TrackChanged));
    let second = h.overlay.sequencer().live_token(Layer::Cover).unwrap();
    assert_ne!(first, second);
    assert!(!h.overlay.sequencer().is_live(first));

    assert!(h.drain().contains(&CoreEvent::Transition(TransitionEvent::Superseded {
        layer: "cover".to_string(),
        token: first.id(),
    })));

    h.tick(420);
    assert!(h.overlay.sequencer().live_token(Layer::Cover).is_none());
    assert_eq!(h.overlay.snapshot().current_track.unwrap().id, "c");
}

// ============================================================================
// Play state scenarios
// ============================================================================

#[test]
fn test_pause_confirmed_quickly_never_flickers() {
    let mut h = Harness::new(FakeEngine::new(&["a"], true));

    h.at(0, OverlayEvent::TogglePlayback);
    assert!(!h.overlay.rendered_is_playing());
    assert_eq!(h.overlay.take_commands(), vec![EngineCommand::Pause]);

    for t in [16, 50, 99] {
        h.tick(t);
        assert!(!h.overlay.rendered_is_playing());
    }

    h.engine.set_playing(false);
    h.at(
        100,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: false }),
    );
    for t in [200, 750, 2000] {
        h.tick(t);
        assert!(!h.overlay.rendered_is_playing());
    }
    assert!(!h
        .drain()
        .iter()
        .any(|event| matches!(event, CoreEvent::Playback(PlaybackEvent::OptimisticExpired { .. }))));
}

#[test]
fn test_unconfirmed_pause_reverts_after_grace() {
    let mut h = Harness::new(FakeEngine::new(&["a"], true));

    h.at(0, OverlayEvent::TogglePlayback);
    h.tick(749);
    assert!(!h.overlay.rendered_is_playing());

    h.tick(750);
    assert!(h.overlay.rendered_is_playing());
    assert!(h
        .drain()
        .contains(&CoreEvent::Playback(PlaybackEvent::OptimisticExpired {
            rendered_is_playing: true,
        })));
}

#[test]
fn test_engine_divergence_wins_over_guess() {
    let mut h = Harness::new(FakeEngine::new(&["a"], false));

    h.at(0, OverlayEvent::TogglePlayback);
    assert!(h.overlay.rendered_is_playing());
    h.at(
        50,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: false }),
    );
    assert!(!h.overlay.rendered_is_playing());
    assert_eq!(h.overlay.pending_timers(), 0);
}

#[test]
fn test_repeated_toggles_only_latest_grace_applies() {
    let mut h = Harness::new(FakeEngine::new(&["a"], true));

    h.at(0, OverlayEvent::TogglePlayback);
    h.at(500, OverlayEvent::TogglePlayback);
    assert!(h.overlay.rendered_is_playing());
    assert_eq!(
        h.overlay.take_commands(),
        vec![EngineCommand::Pause, EngineCommand::Play]
    );

    // The first window would have ended at 750; only the second is armed.
    assert_eq!(h.overlay.next_deadline(), Some(Duration::from_millis(1250)));
    h.tick(1000);
    assert!(h.overlay.rendered_is_playing());
}

#[test]
fn test_skip_keeps_playing_icon_through_swap() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], true));

    h.at(0, OverlayEvent::SkipNext);
    h.engine.set_playing(false);
    h.at(
        40,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: false }),
    );
    assert!(h.overlay.rendered_is_playing());

    h.engine.apply_skip(ChangeDirection::Next);
    h.at(60, OverlayEvent::Engine(EngineNotification::TrackChanged));
    assert!(h.overlay.rendered_is_playing());

    h.engine.set_playing(true);
    h.at(
        200,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: true }),
    );
    assert!(h.overlay.rendered_is_playing());
    h.tick(2000);
    assert!(h.overlay.rendered_is_playing());
}

#[test]
fn test_skip_window_is_bounded() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], true));

    h.at(0, OverlayEvent::SkipNext);
    h.engine.set_playing(false);
    h.at(
        40,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: false }),
    );
    h.tick(749);
    assert!(h.overlay.rendered_is_playing());
    h.tick(750);
    assert!(!h.overlay.rendered_is_playing());
}

#[test]
fn test_skip_while_paused_shows_paused() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], false));
    h.at(0, OverlayEvent::SkipNext);
    assert!(!h.overlay.rendered_is_playing());
}

// ============================================================================
// Spin scenarios
// ============================================================================

#[test]
fn test_spin_pauses_without_reset_and_waits_for_new_track() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], true));
    assert!(h.overlay.sequencer().spin().is_active());

    h.tick(1000);
    let before_pause = h.overlay.snapshot().spin_angle;
    assert!(before_pause > 0.0);

    h.engine.set_playing(false);
    h.at(
        1000,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: false }),
    );
    h.tick(3000);
    assert_eq!(h.overlay.snapshot().spin_angle, before_pause);

    h.engine.set_playing(true);
    h.at(
        3000,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: true }),
    );
    assert_eq!(h.overlay.snapshot().spin_angle, before_pause);
    h.tick(3100);
    let resumed = h.overlay.snapshot().spin_angle;
    assert!(resumed > before_pause);

    // A new track that loads paused stops the spin until playback is
    // confirmed for it.
    h.engine.set_playing(false);
    h.engine.apply_skip(ChangeDirection::Next);
    h.at(3100, OverlayEvent::Engine(EngineNotification::TrackChanged));
    h.tick(3500);
    assert!(!h.overlay.sequencer().spin().is_active());
    assert_eq!(h.overlay.snapshot().spin_angle, resumed);

    h.engine.set_playing(true);
    h.at(
        3500,
        OverlayEvent::Engine(EngineNotification::PlayStateChanged { is_playing: true }),
    );
    assert!(h.overlay.sequencer().spin().is_active());
}

#[test]
fn test_gapless_track_change_keeps_spinning() {
    let mut h = Harness::new(FakeEngine::new(&["a", "b"], true).gapless());
    assert!(h.overlay.sequencer().spin().is_active());
    h.tick(1000);

    // Only the track changes; the engine never reports a play-state change.
    h.engine.apply_skip(ChangeDirection::Next);
    h.at(1000, OverlayEvent::Engine(EngineNotification::TrackChanged));
    assert!(h.overlay.sequencer().spin().is_active());

    h.tick(2000);
    let at_two_seconds = h.overlay.snapshot().spin_angle;
    h.tick(5000);
    assert!(h.overlay.sequencer().spin().is_active());
    assert!(h.overlay.snapshot().spin_angle > at_two_seconds);
    assert!(h.overlay.rendered_is_playing());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_reduced_motion_settles_within_dispatch() {
    let mut h = Harness::with_config(
        FakeEngine::new(&["a"], false),
        OverlayConfig::reduced_motion(),
    );
    h.at(0, OverlayEvent::OpenRequested);
    let snap = h.overlay.snapshot();
    assert!(snap.sheet_visible);
    assert_eq!(snap.sheet_position, 0.0);
    assert_eq!(snap.mini_opacity, 0.0);
    assert_eq!(h.overlay.pending_timers(), 0);

    h.at(10, OverlayEvent::CloseRequested);
    let snap = h.overlay.snapshot();
    assert!(!snap.sheet_visible);
    assert_eq!(snap.mini_opacity, 1.0);
}

#[test]
fn test_custom_thresholds_from_json() {
    let config =
        OverlayConfig::from_json(r#"{ "commit": { "navigate_distance_threshold": 50.0 } }"#)
            .unwrap();
    let mut h = Harness::with_config(FakeEngine::new(&["a", "b"], false), config);

    h.at(0, down(GestureOrigin::MiniPlayer));
    h.at(16, drag(-30.0, 0.0));
    assert!(h.overlay.take_commands().is_empty());
    h.at(32, drag(-55.0, 0.0));
    assert_eq!(h.overlay.take_commands(), vec![EngineCommand::Next]);
}
