//! # Gesture Classification
//!
//! Turns a stream of pointer samples into a single intent per session:
//! horizontal navigate, vertical dismiss, or ignored movement.
//!
//! ## Rules
//!
//! - **Navigate** once `|dx| > |dy| * axis_ratio` and `|dx| > navigate_deadzone`
//! - otherwise **Dismiss** once `|dy| > |dx|` and `|dy| > dismiss_deadzone`
//! - inside both deadzones the session stays unclassified
//!
//! The first non-unset classification locks the session to its axis. Later
//! samples update displacement and velocity but never re-classify, so a
//! diagonal drag cannot flip from navigate to dismiss halfway through.

use core_runtime::config::GestureConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One pointer sample, relative to where the gesture started.
///
/// Displacement is in logical units, velocity in units per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    pub dx: f32,
    pub dy: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
}

impl PointerSample {
    pub fn new(dx: f32, dy: f32, velocity_x: f32, velocity_y: f32) -> Self {
        Self {
            dx,
            dy,
            velocity_x,
            velocity_y,
        }
    }

    /// Sample with displacement only.
    pub fn displacement(dx: f32, dy: f32) -> Self {
        Self::new(dx, dy, 0.0, 0.0)
    }
}

/// Classification of a gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureClass {
    /// Still inside the deadzone.
    #[default]
    Unset,
    /// Horizontal track navigation.
    Navigate,
    /// Vertical sheet dismissal.
    Dismiss,
    /// Movement the overlay does not handle (list scroll, disallowed axis).
    Ignore,
}

impl GestureClass {
    pub fn is_locked(&self) -> bool {
        !matches!(self, GestureClass::Unset)
    }
}

impl fmt::Display for GestureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureClass::Unset => "unset",
            GestureClass::Navigate => "navigate",
            GestureClass::Dismiss => "dismiss",
            GestureClass::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// The view a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureOrigin {
    /// Collapsed mini-player: navigate only, vertical movement belongs to the
    /// host's scroll view.
    MiniPlayer,
    /// Expanded full sheet: navigate and dismiss.
    FullSheet,
}

impl GestureOrigin {
    pub fn allows_dismiss(&self) -> bool {
        matches!(self, GestureOrigin::FullSheet)
    }
}

/// Stateless classifier holding the configured thresholds.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    /// Classify a single sample with no session history.
    pub fn classify(&self, sample: &PointerSample, origin: GestureOrigin) -> GestureClass {
        let abs_dx = sample.dx.abs();
        let abs_dy = sample.dy.abs();

        if abs_dx > abs_dy * self.config.navigate_axis_ratio
            && abs_dx > self.config.navigate_deadzone
        {
            return GestureClass::Navigate;
        }

        if abs_dy > abs_dx && abs_dy > self.config.dismiss_deadzone {
            return if origin.allows_dismiss() {
                GestureClass::Dismiss
            } else {
                GestureClass::Ignore
            };
        }

        GestureClass::Unset
    }
}

/// Ephemeral per-pointer state, created on pointer-down and dropped on
/// release or cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    id: u64,
    origin: GestureOrigin,
    started_at: Duration,
    class: GestureClass,
    last: PointerSample,
    committed: bool,
}

impl GestureSession {
    pub fn new(id: u64, origin: GestureOrigin, started_at: Duration) -> Self {
        Self {
            id,
            origin,
            started_at,
            class: GestureClass::Unset,
            last: PointerSample::default(),
            committed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn origin(&self) -> GestureOrigin {
        self.origin
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn class(&self) -> GestureClass {
        self.class
    }

    pub fn last_sample(&self) -> PointerSample {
        self.last
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Record a sample and classify it unless the axis is already locked.
    pub fn update(&mut self, classifier: &GestureClassifier, sample: PointerSample) -> GestureClass {
        self.last = sample;
        if !self.class.is_locked() {
            self.class = classifier.classify(&sample, self.origin);
        }
        self.class
    }

    /// Flip `committed` to true. Returns `false` if it was already set.
    pub(crate) fn mark_committed(&mut self) -> bool {
        if self.committed {
            return false;
        }
        self.committed = true;
        true
    }
}
