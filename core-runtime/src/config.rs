//! # Overlay Configuration Module
//!
//! Tunable thresholds and durations for the media control overlay.
//!
//! ## Overview
//!
//! Every magic number the overlay relies on (gesture deadzones, commit
//! thresholds, optimistic grace windows, animation durations) lives here so a
//! host can tune them per platform without touching the coordinator. The
//! grace windows in particular depend on how quickly the target engine
//! reports state changes and are expected to be tuned empirically.
//!
//! Configuration can be built three ways:
//!
//! - [`OverlayConfig::default()`] for the stock values
//! - [`OverlayConfig::builder()`] for programmatic overrides
//! - [`OverlayConfig::from_json`] for host-supplied settings documents, where
//!   every missing field falls back to its default
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::config::OverlayConfig;
//!
//! let config = OverlayConfig::builder()
//!     .play_grace_ms(800)
//!     .container_size(414.0, 896.0)
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.reconciler.play_grace_ms, 800);
//! ```
//!
//! ## Error Handling
//!
//! Invalid values are rejected at build time with [`Error::Config`]:
//!
//! ```should_panic
//! use core_runtime::config::OverlayConfig;
//!
//! let config = OverlayConfig::builder()
//!     .dismiss_extent_ratio(1.5)
//!     .build()
//!     .expect("ratio above 1.0 is rejected");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete overlay configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Gesture classification deadzones.
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Commit thresholds and cooldown.
    #[serde(default)]
    pub commit: CommitConfig,

    /// Optimistic play-state windows.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    /// Animation durations and spin speed.
    #[serde(default)]
    pub transition: TransitionConfig,

    /// Initial container size, replaced by layout events at runtime.
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Thresholds used to lock a gesture onto an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Navigate wins while `|dx| > |dy| * navigate_axis_ratio`.
    #[serde(default = "default_navigate_axis_ratio")]
    pub navigate_axis_ratio: f32,

    /// Minimum `|dx|` before a navigate classification.
    #[serde(default = "default_navigate_deadzone")]
    pub navigate_deadzone: f32,

    /// Minimum `|dy|` before a dismiss classification.
    #[serde(default = "default_dismiss_deadzone")]
    pub dismiss_deadzone: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            navigate_axis_ratio: default_navigate_axis_ratio(),
            navigate_deadzone: default_navigate_deadzone(),
            dismiss_deadzone: default_dismiss_deadzone(),
        }
    }
}

/// Thresholds that turn a classified gesture into a committed action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Horizontal displacement that commits a navigation.
    #[serde(default = "default_navigate_distance_threshold")]
    pub navigate_distance_threshold: f32,

    /// Horizontal velocity (units/ms) that commits a navigation.
    #[serde(default = "default_navigate_velocity_threshold")]
    pub navigate_velocity_threshold: f32,

    /// Time after a navigation commit during which new sessions cannot commit.
    #[serde(default = "default_navigate_cooldown_ms")]
    pub navigate_cooldown_ms: u64,

    /// Fraction of the container height that commits a dismiss.
    #[serde(default = "default_dismiss_extent_ratio")]
    pub dismiss_extent_ratio: f32,

    /// Release velocity (units/ms) that commits a dismiss.
    #[serde(default = "default_dismiss_velocity_threshold")]
    pub dismiss_velocity_threshold: f32,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            navigate_distance_threshold: default_navigate_distance_threshold(),
            navigate_velocity_threshold: default_navigate_velocity_threshold(),
            navigate_cooldown_ms: default_navigate_cooldown_ms(),
            dismiss_extent_ratio: default_dismiss_extent_ratio(),
            dismiss_velocity_threshold: default_dismiss_velocity_threshold(),
        }
    }
}

impl CommitConfig {
    pub fn navigate_cooldown(&self) -> Duration {
        Duration::from_millis(self.navigate_cooldown_ms)
    }
}

/// Bounded windows during which an optimistic play flag is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// How long a play/pause guess survives without engine confirmation.
    #[serde(default = "default_play_grace_ms")]
    pub play_grace_ms: u64,

    /// How long "still playing" is reported across a track skip.
    #[serde(default = "default_skip_grace_ms")]
    pub skip_grace_ms: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            play_grace_ms: default_play_grace_ms(),
            skip_grace_ms: default_skip_grace_ms(),
        }
    }
}

impl ReconcilerConfig {
    pub fn play_grace(&self) -> Duration {
        Duration::from_millis(self.play_grace_ms)
    }

    pub fn skip_grace(&self) -> Duration {
        Duration::from_millis(self.skip_grace_ms)
    }
}

/// Animation timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "default_sheet_open_ms")]
    pub sheet_open_ms: u64,

    #[serde(default = "default_sheet_close_ms")]
    pub sheet_close_ms: u64,

    /// Spring-back after an uncommitted drag (sheet or cover).
    #[serde(default = "default_snap_back_ms")]
    pub snap_back_ms: u64,

    /// Paired slide of outgoing/incoming artwork.
    #[serde(default = "default_cover_slide_ms")]
    pub cover_slide_ms: u64,

    /// Plain fade-in of the first artwork.
    #[serde(default = "default_cover_fade_ms")]
    pub cover_fade_ms: u64,

    #[serde(default = "default_mini_fade_ms")]
    pub mini_fade_ms: u64,

    /// Decorative spin speed; 3.49 rad/s is 33 1/3 RPM.
    #[serde(default = "default_spin_speed")]
    pub spin_speed_rad_per_sec: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            sheet_open_ms: default_sheet_open_ms(),
            sheet_close_ms: default_sheet_close_ms(),
            snap_back_ms: default_snap_back_ms(),
            cover_slide_ms: default_cover_slide_ms(),
            cover_fade_ms: default_cover_fade_ms(),
            mini_fade_ms: default_mini_fade_ms(),
            spin_speed_rad_per_sec: default_spin_speed(),
        }
    }
}

impl TransitionConfig {
    /// Every timed transition completes instantly.
    pub fn instant() -> Self {
        Self {
            sheet_open_ms: 0,
            sheet_close_ms: 0,
            snap_back_ms: 0,
            cover_slide_ms: 0,
            cover_fade_ms: 0,
            mini_fade_ms: 0,
            ..Self::default()
        }
    }

    pub fn sheet_open(&self) -> Duration {
        Duration::from_millis(self.sheet_open_ms)
    }

    pub fn sheet_close(&self) -> Duration {
        Duration::from_millis(self.sheet_close_ms)
    }

    pub fn snap_back(&self) -> Duration {
        Duration::from_millis(self.snap_back_ms)
    }

    pub fn cover_slide(&self) -> Duration {
        Duration::from_millis(self.cover_slide_ms)
    }

    pub fn cover_fade(&self) -> Duration {
        Duration::from_millis(self.cover_fade_ms)
    }

    pub fn mini_fade(&self) -> Duration {
        Duration::from_millis(self.mini_fade_ms)
    }
}

/// Container size in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl OverlayConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OverlayConfigBuilder {
        OverlayConfigBuilder::default()
    }

    /// Configuration for hosts whose platform has animations turned off.
    ///
    /// Gesture and reconciler behavior is unchanged; only timed transitions
    /// collapse to zero duration.
    pub fn reduced_motion() -> Self {
        Self {
            transition: TransitionConfig::instant(),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON settings document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: OverlayConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid overlay config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all values.
    pub fn validate(&self) -> Result<()> {
        let gesture = &self.gesture;
        require_ratio("gesture.navigate_axis_ratio", gesture.navigate_axis_ratio)?;
        require_positive("gesture.navigate_deadzone", gesture.navigate_deadzone)?;
        require_positive("gesture.dismiss_deadzone", gesture.dismiss_deadzone)?;

        let commit = &self.commit;
        require_positive(
            "commit.navigate_distance_threshold",
            commit.navigate_distance_threshold,
        )?;
        require_positive(
            "commit.navigate_velocity_threshold",
            commit.navigate_velocity_threshold,
        )?;
        require_ratio("commit.dismiss_extent_ratio", commit.dismiss_extent_ratio)?;
        require_positive(
            "commit.dismiss_velocity_threshold",
            commit.dismiss_velocity_threshold,
        )?;

        if self.reconciler.play_grace_ms == 0 {
            return Err(Error::Config(
                "reconciler.play_grace_ms must be greater than 0".to_string(),
            ));
        }
        if self.reconciler.skip_grace_ms == 0 {
            return Err(Error::Config(
                "reconciler.skip_grace_ms must be greater than 0".to_string(),
            ));
        }

        let spin = self.transition.spin_speed_rad_per_sec;
        if !spin.is_finite() || spin < 0.0 {
            return Err(Error::Config(
                "transition.spin_speed_rad_per_sec must be a finite, non-negative number"
                    .to_string(),
            ));
        }

        require_positive("layout.width", self.layout.width)?;
        require_positive("layout.height", self.layout.height)?;

        Ok(())
    }
}

fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be a finite number greater than 0 (got {})",
            name, value
        )))
    }
}

fn require_ratio(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be within (0.0, 1.0] (got {})",
            name, value
        )))
    }
}

/// Builder for [`OverlayConfig`].
#[derive(Debug, Clone, Default)]
pub struct OverlayConfigBuilder {
    config: OverlayConfig,
}

impl OverlayConfigBuilder {
    /// Replace the gesture thresholds wholesale.
    pub fn gesture(mut self, gesture: GestureConfig) -> Self {
        self.config.gesture = gesture;
        self
    }

    /// Replace the commit thresholds wholesale.
    pub fn commit(mut self, commit: CommitConfig) -> Self {
        self.config.commit = commit;
        self
    }

    /// Replace the animation timings wholesale.
    pub fn transition(mut self, transition: TransitionConfig) -> Self {
        self.config.transition = transition;
        self
    }

    pub fn navigate_cooldown_ms(mut self, millis: u64) -> Self {
        self.config.commit.navigate_cooldown_ms = millis;
        self
    }

    pub fn dismiss_extent_ratio(mut self, ratio: f32) -> Self {
        self.config.commit.dismiss_extent_ratio = ratio;
        self
    }

    pub fn dismiss_velocity_threshold(mut self, velocity: f32) -> Self {
        self.config.commit.dismiss_velocity_threshold = velocity;
        self
    }

    /// Set the optimistic play/pause grace window.
    pub fn play_grace_ms(mut self, millis: u64) -> Self {
        self.config.reconciler.play_grace_ms = millis;
        self
    }

    /// Set the optimistic "still playing" window used across skips.
    pub fn skip_grace_ms(mut self, millis: u64) -> Self {
        self.config.reconciler.skip_grace_ms = millis;
        self
    }

    /// Collapse all timed transitions to zero duration.
    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        if enabled {
            self.config.transition = TransitionConfig::instant();
        }
        self
    }

    /// Initial container size.
    pub fn container_size(mut self, width: f32, height: f32) -> Self {
        self.config.layout = LayoutConfig { width, height };
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<OverlayConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_navigate_axis_ratio() -> f32 {
    0.7
}

fn default_navigate_deadzone() -> f32 {
    3.0
}

fn default_dismiss_deadzone() -> f32 {
    6.0
}

fn default_navigate_distance_threshold() -> f32 {
    12.0
}

fn default_navigate_velocity_threshold() -> f32 {
    0.2
}

fn default_navigate_cooldown_ms() -> u64 {
    500
}

fn default_dismiss_extent_ratio() -> f32 {
    0.3
}

fn default_dismiss_velocity_threshold() -> f32 {
    0.5
}

fn default_play_grace_ms() -> u64 {
    750
}

fn default_skip_grace_ms() -> u64 {
    750
}

fn default_sheet_open_ms() -> u64 {
    350
}

fn default_sheet_close_ms() -> u64 {
    300
}

fn default_snap_back_ms() -> u64 {
    220
}

fn default_cover_slide_ms() -> u64 {
    320
}

fn default_cover_fade_ms() -> u64 {
    250
}

fn default_mini_fade_ms() -> u64 {
    180
}

fn default_spin_speed() -> f32 {
    3.49
}

fn default_width() -> f32 {
    390.0
}

fn default_height() -> f32 {
    800.0
}
