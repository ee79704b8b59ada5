//! # Transition Sequencer
//!
//! Drives the layered animated values the surfaces bind to: sheet position and
//! backdrop, the cover cross-fade pair, the mini-player fade and the vinyl
//! spin angle.
//!
//! ## Tokens
//!
//! Every timed animation runs under a [`TransitionToken`]. Issuing a token for
//! a layer replaces the live one, so each layer has at most one live token and
//! a completion for a replaced token is ignored.
//!
//! ## Modes
//!
//! Each layer is `Idle`, `Dragging` (values follow the pointer directly) or
//! `Animating` (values follow a tween). Drag updates are rejected unless the
//! layer is `Dragging`; starting a tween ends any drag on that layer.

use crate::animation::{AnimatedValue, Easing};
use crate::error::{OverlayError, Result};
use bridge_traits::{ChangeDirection, TrackRef};
use core_runtime::config::TransitionConfig;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Visual layer owning its own token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Sheet,
    Cover,
    Spin,
    MiniPlayer,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Sheet, Layer::Cover, Layer::Spin, Layer::MiniPlayer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Sheet => "sheet",
            Layer::Cover => "cover",
            Layer::Spin => "spin",
            Layer::MiniPlayer => "mini_player",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerMode {
    #[default]
    Idle,
    Dragging,
    Animating,
}

impl fmt::Display for LayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerMode::Idle => "idle",
            LayerMode::Dragging => "dragging",
            LayerMode::Animating => "animating",
        };
        f.write_str(name)
    }
}

/// Handle for one in-flight animation sequence on one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken {
    layer: Layer,
    id: u64,
}

impl TransitionToken {
    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Returned when a timed animation starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStart {
    pub token: TransitionToken,
    /// When the animation settles. `None` for open-ended motion (spin).
    pub ends_at: Option<Duration>,
    /// Token this start invalidated, if one was live.
    pub superseded: Option<TransitionToken>,
}

/// Returned when a live token completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEnd {
    pub token: TransitionToken,
    /// A sheet close finished; the overlay may be unmounted.
    pub overlay_hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetMotion {
    Opening,
    Closing,
    SnappingBack,
}

#[derive(Debug, Default)]
struct LayerState {
    mode: LayerMode,
    live: Option<TransitionToken>,
    issued: u64,
}

impl LayerState {
    fn issue(&mut self, layer: Layer) -> (TransitionToken, Option<TransitionToken>) {
        self.issued += 1;
        let token = TransitionToken {
            layer,
            id: self.issued,
        };
        self.mode = LayerMode::Animating;
        (token, self.live.replace(token))
    }

    fn invalidate(&mut self) -> Option<TransitionToken> {
        self.mode = LayerMode::Idle;
        self.live.take()
    }

    fn begin_drag(&mut self) -> Option<TransitionToken> {
        let superseded = self.live.take();
        self.mode = LayerMode::Dragging;
        superseded
    }

    fn is_live(&self, token: TransitionToken) -> bool {
        self.live == Some(token)
    }
}

/// Decorative rotation that accumulates only while active.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinState {
    angle: f32,
    active: bool,
    last_update: Duration,
    speed: f32,
}

impl SpinState {
    pub fn new(speed_rad_per_sec: f32, now: Duration) -> Self {
        Self {
            angle: 0.0,
            active: false,
            last_update: now,
            speed: speed_rad_per_sec,
        }
    }

    /// Current angle in radians, in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn advance(&mut self, now: Duration) {
        if self.active {
            let elapsed = now.saturating_sub(self.last_update).as_secs_f32();
            self.angle = (self.angle + self.speed * elapsed).rem_euclid(TAU);
        }
        self.last_update = self.last_update.max(now);
    }

    pub fn start(&mut self, now: Duration) {
        self.advance(now);
        self.active = true;
    }

    /// Stop rotating, keeping the angle reached so far.
    pub fn stop(&mut self, now: Duration) {
        self.advance(now);
        self.active = false;
    }
}

/// The outgoing/incoming artwork pair.
#[derive(Debug, Clone)]
pub struct CoverLayer {
    current: Option<TrackRef>,
    outgoing: Option<TrackRef>,
    direction: ChangeDirection,
    prev_translate: AnimatedValue,
    prev_opacity: AnimatedValue,
    curr_translate: AnimatedValue,
    curr_opacity: AnimatedValue,
}

impl CoverLayer {
    fn new() -> Self {
        Self {
            current: None,
            outgoing: None,
            direction: ChangeDirection::None,
            prev_translate: AnimatedValue::new(0.0),
            prev_opacity: AnimatedValue::new(0.0),
            curr_translate: AnimatedValue::new(0.0),
            curr_opacity: AnimatedValue::new(0.0),
        }
    }

    pub fn current(&self) -> Option<&TrackRef> {
        self.current.as_ref()
    }

    /// Track sliding out. Only set while a cover transition is in flight.
    pub fn outgoing(&self) -> Option<&TrackRef> {
        self.outgoing.as_ref()
    }

    /// Direction of the in-flight change; `None` at rest.
    pub fn direction(&self) -> ChangeDirection {
        self.direction
    }

    pub fn prev_translate(&self) -> f32 {
        self.prev_translate.value()
    }

    pub fn prev_opacity(&self) -> f32 {
        self.prev_opacity.value()
    }

    pub fn curr_translate(&self) -> f32 {
        self.curr_translate.value()
    }

    pub fn curr_opacity(&self) -> f32 {
        self.curr_opacity.value()
    }

    fn values_mut(&mut self) -> [&mut AnimatedValue; 4] {
        [
            &mut self.prev_translate,
            &mut self.prev_opacity,
            &mut self.curr_translate,
            &mut self.curr_opacity,
        ]
    }

    fn settle(&mut self) {
        for value in self.values_mut() {
            value.finish();
        }
        self.outgoing = None;
        self.direction = ChangeDirection::None;
        self.prev_translate.set(0.0);
        self.prev_opacity.set(0.0);
    }
}

/// Owns every overlay animated value and the per-layer tokens.
#[derive(Debug)]
pub struct TransitionSequencer {
    config: TransitionConfig,
    width: f32,
    height: f32,
    sheet: LayerState,
    cover_state: LayerState,
    spin_state: LayerState,
    mini: LayerState,
    sheet_motion: Option<SheetMotion>,
    sheet_visible: bool,
    sheet_position: AnimatedValue,
    backdrop_opacity: AnimatedValue,
    mini_opacity: AnimatedValue,
    cover: CoverLayer,
    spin: SpinState,
}

impl TransitionSequencer {
    /// Start with the sheet hidden offscreen and the mini-player visible.
    pub fn new(config: TransitionConfig, width: f32, height: f32, now: Duration) -> Self {
        let spin = SpinState::new(config.spin_speed_rad_per_sec, now);
        Self {
            config,
            width,
            height,
            sheet: LayerState::default(),
            cover_state: LayerState::default(),
            spin_state: LayerState::default(),
            mini: LayerState::default(),
            sheet_motion: None,
            sheet_visible: false,
            sheet_position: AnimatedValue::new(height),
            backdrop_opacity: AnimatedValue::new(0.0),
            mini_opacity: AnimatedValue::new(1.0),
            cover: CoverLayer::new(),
            spin,
        }
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn mode(&self, layer: Layer) -> LayerMode {
        self.layer(layer).mode
    }

    pub fn live_token(&self, layer: Layer) -> Option<TransitionToken> {
        self.layer(layer).live
    }

    pub fn is_live(&self, token: TransitionToken) -> bool {
        self.layer(token.layer).is_live(token)
    }

    pub fn container_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Whether the full sheet is mounted (opening, open, or closing).
    pub fn sheet_visible(&self) -> bool {
        self.sheet_visible
    }

    /// Sheet is open or opening, as opposed to closing or hidden.
    pub fn sheet_open(&self) -> bool {
        self.sheet_visible && self.sheet_motion != Some(SheetMotion::Closing)
    }

    /// Vertical offset from the open position; `height` is fully offscreen.
    pub fn sheet_position(&self) -> f32 {
        self.sheet_position.value()
    }

    pub fn backdrop_opacity(&self) -> f32 {
        self.backdrop_opacity.value()
    }

    pub fn mini_opacity(&self) -> f32 {
        self.mini_opacity.value()
    }

    pub fn cover(&self) -> &CoverLayer {
        &self.cover
    }

    pub fn spin(&self) -> &SpinState {
        &self.spin
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if !self.sheet_visible && self.sheet.mode == LayerMode::Idle {
            self.sheet_position.set(height);
        }
    }

    /// Show `track` as the resting cover with no animation.
    pub fn show_track(&mut self, track: Option<TrackRef>) {
        self.cover.current = track;
        self.cover.curr_translate.set(0.0);
        self.cover.curr_opacity.set(1.0);
        self.cover.outgoing = None;
        self.cover.prev_opacity.set(0.0);
        self.cover.prev_translate.set(0.0);
    }

    // ------------------------------------------------------------------------
    // Sheet
    // ------------------------------------------------------------------------

    pub fn open_sheet(&mut self, now: Duration) -> TransitionStart {
        self.sheet_visible = true;
        self.animate_sheet(SheetMotion::Opening, 0.0, 1.0, self.config.sheet_open(), now)
    }

    pub fn close_sheet(&mut self, now: Duration) -> TransitionStart {
        let height = self.height;
        self.animate_sheet(SheetMotion::Closing, height, 0.0, self.config.sheet_close(), now)
    }

    /// Spring an uncommitted dismiss drag back to fully open.
    pub fn snap_sheet_open(&mut self, now: Duration) -> TransitionStart {
        self.animate_sheet(SheetMotion::SnappingBack, 0.0, 1.0, self.config.snap_back(), now)
    }

    fn animate_sheet(
        &mut self,
        motion: SheetMotion,
        position: f32,
        backdrop: f32,
        duration: Duration,
        now: Duration,
    ) -> TransitionStart {
        self.sheet_position.stop(now);
        self.backdrop_opacity.stop(now);
        self.sheet_position
            .animate_to(position, now, duration, Easing::EaseOutCubic);
        self.backdrop_opacity
            .animate_to(backdrop, now, duration, Easing::EaseOutCubic);
        self.sheet_motion = Some(motion);

        let (token, superseded) = self.sheet.issue(Layer::Sheet);
        debug!(layer = %Layer::Sheet, token = token.id, ?motion, "Sheet transition started");
        TransitionStart {
            token,
            ends_at: Some(now + duration),
            superseded,
        }
    }

    /// Hand the sheet to the pointer. Returns the token this cancelled.
    pub fn begin_sheet_drag(&mut self, now: Duration) -> Option<TransitionToken> {
        self.sheet_position.stop(now);
        self.backdrop_opacity.stop(now);
        self.sheet_motion = None;
        self.sheet.begin_drag()
    }

    /// Follow a dismiss drag 1:1. Upward offsets clamp to the open position.
    pub fn drag_sheet(&mut self, offset: f32) -> Result<()> {
        self.require_dragging(Layer::Sheet)?;
        let position = offset.clamp(0.0, self.height);
        self.sheet_position.set(position);
        let backdrop = if self.height > 0.0 {
            1.0 - position / self.height
        } else {
            1.0
        };
        self.backdrop_opacity.set(backdrop);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Mini-player
    // ------------------------------------------------------------------------

    pub fn fade_mini_player(&mut self, visible: bool, now: Duration) -> TransitionStart {
        let target = if visible { 1.0 } else { 0.0 };
        let duration = self.config.mini_fade();
        self.mini_opacity.stop(now);
        self.mini_opacity
            .animate_to(target, now, duration, Easing::EaseOutCubic);
        let (token, superseded) = self.mini.issue(Layer::MiniPlayer);
        TransitionStart {
            token,
            ends_at: Some(now + duration),
            superseded,
        }
    }

    // ------------------------------------------------------------------------
    // Cover
    // ------------------------------------------------------------------------

    /// Start the cover transition for a track change.
    ///
    /// With a previous track and a direction, the outgoing artwork slides out
    /// opposite to navigation while the incoming one slides in from the
    /// navigation side; both share start, duration and easing. Otherwise the
    /// new artwork fades in in place.
    pub fn change_track(
        &mut self,
        current: Option<TrackRef>,
        previous: Option<TrackRef>,
        direction: ChangeDirection,
        now: Duration,
    ) -> TransitionStart {
        for value in self.cover.values_mut() {
            value.stop(now);
        }

        let duration = match previous {
            Some(previous) if !direction.is_none() => {
                let duration = self.config.cover_slide();
                let sign = direction.entry_sign();
                let easing = Easing::EaseInOutCubic;
                let outgoing_from = self.cover.curr_translate.value();
                let outgoing_opacity = self.cover.curr_opacity.value();

                self.cover.prev_translate.set(outgoing_from);
                self.cover.prev_opacity.set(outgoing_opacity);
                self.cover
                    .prev_translate
                    .animate_to(-sign * self.width, now, duration, easing);
                self.cover.prev_opacity.animate_to(0.0, now, duration, easing);

                self.cover.curr_translate.set(sign * self.width);
                self.cover.curr_opacity.set(0.0);
                self.cover.curr_translate.animate_to(0.0, now, duration, easing);
                self.cover.curr_opacity.animate_to(1.0, now, duration, easing);

                self.cover.outgoing = Some(previous);
                self.cover.direction = direction;
                duration
            }
            _ => {
                let duration = self.config.cover_fade();
                self.cover.prev_translate.set(0.0);
                self.cover.prev_opacity.set(0.0);
                self.cover.curr_translate.set(0.0);
                self.cover.curr_opacity.set(0.0);
                self.cover
                    .curr_opacity
                    .animate_to(1.0, now, duration, Easing::EaseOutCubic);
                self.cover.outgoing = None;
                self.cover.direction = ChangeDirection::None;
                duration
            }
        };
        self.cover.current = current;

        let (token, superseded) = self.cover_state.issue(Layer::Cover);
        debug!(
            layer = %Layer::Cover,
            token = token.id,
            direction = ?self.cover.direction,
            "Cover transition started"
        );
        TransitionStart {
            token,
            ends_at: Some(now + duration),
            superseded,
        }
    }

    /// Hand the cover to a navigate drag. An in-flight cross-fade settles at
    /// its end state first.
    pub fn begin_cover_drag(&mut self) -> Option<TransitionToken> {
        self.cover.settle();
        self.cover_state.begin_drag()
    }

    /// Follow a navigate drag 1:1.
    pub fn drag_cover(&mut self, dx: f32) -> Result<()> {
        self.require_dragging(Layer::Cover)?;
        self.cover.curr_translate.set(dx);
        Ok(())
    }

    /// Spring the cover back to zero displacement.
    pub fn snap_cover(&mut self, now: Duration) -> TransitionStart {
        let duration = self.config.snap_back();
        self.cover.curr_translate.stop(now);
        self.cover.curr_opacity.stop(now);
        self.cover
            .curr_translate
            .animate_to(0.0, now, duration, Easing::EaseOutCubic);
        self.cover
            .curr_opacity
            .animate_to(1.0, now, duration, Easing::EaseOutCubic);
        let (token, superseded) = self.cover_state.issue(Layer::Cover);
        TransitionStart {
            token,
            ends_at: Some(now + duration),
            superseded,
        }
    }

    // ------------------------------------------------------------------------
    // Spin
    // ------------------------------------------------------------------------

    /// Start rotating from the current angle. `None` if already spinning.
    pub fn start_spin(&mut self, now: Duration) -> Option<TransitionStart> {
        if self.spin.is_active() {
            return None;
        }
        self.spin.start(now);
        let (token, superseded) = self.spin_state.issue(Layer::Spin);
        Some(TransitionStart {
            token,
            ends_at: None,
            superseded,
        })
    }

    /// Stop rotating without resetting the angle. Returns the ended token.
    pub fn stop_spin(&mut self, now: Duration) -> Option<TransitionToken> {
        if !self.spin.is_active() {
            return None;
        }
        self.spin.stop(now);
        self.spin_state.invalidate()
    }

    // ------------------------------------------------------------------------
    // Completion & sampling
    // ------------------------------------------------------------------------

    /// Settle the layer owning `token` if it is still live.
    pub fn complete(&mut self, token: TransitionToken, now: Duration) -> Option<TransitionEnd> {
        if !self.is_live(token) {
            trace!(layer = %token.layer, token = token.id, "Ignoring stale completion");
            return None;
        }

        let mut overlay_hidden = false;
        match token.layer {
            Layer::Sheet => {
                self.sheet_position.finish();
                self.backdrop_opacity.finish();
                if self.sheet_motion == Some(SheetMotion::Closing) {
                    self.sheet_visible = false;
                    overlay_hidden = true;
                }
                self.sheet_motion = None;
            }
            Layer::Cover => self.cover.settle(),
            Layer::MiniPlayer => self.mini_opacity.finish(),
            Layer::Spin => self.spin.stop(now),
        }
        self.layer_mut(token.layer).invalidate();

        Some(TransitionEnd {
            token,
            overlay_hidden,
        })
    }

    /// Advance every animated value to `now`.
    pub fn sample(&mut self, now: Duration) {
        self.sheet_position.sample(now);
        self.backdrop_opacity.sample(now);
        self.mini_opacity.sample(now);
        for value in self.cover.values_mut() {
            value.sample(now);
        }
        self.spin.advance(now);
    }

    fn require_dragging(&self, layer: Layer) -> Result<()> {
        let mode = self.mode(layer);
        if mode != LayerMode::Dragging {
            return Err(OverlayError::ModeConflict { layer, mode });
        }
        Ok(())
    }

    fn layer(&self, layer: Layer) -> &LayerState {
        match layer {
            Layer::Sheet => &self.sheet,
            Layer::Cover => &self.cover_state,
            Layer::Spin => &self.spin_state,
            Layer::MiniPlayer => &self.mini,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut LayerState {
        match layer {
            Layer::Sheet => &mut self.sheet,
            Layer::Cover => &mut self.cover_state,
            Layer::Spin => &mut self.spin_state,
            Layer::MiniPlayer => &mut self.mini,
        }
    }
}
