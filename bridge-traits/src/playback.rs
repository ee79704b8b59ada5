//! Playback engine bridge and the track types it exposes.
//!
//! The overlay core never decodes or transports audio itself. It reads the
//! engine's authoritative state through the synchronous getters below and
//! issues fire-and-forget transport commands through the async ones. Host
//! applications provide the concrete engine (native player, web audio element,
//! remote device) and forward its notifications through [`PlaybackEngine::subscribe`].

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

/// A playable session (hypnosis/meditation track) as fetched by the host.
///
/// Tracks are immutable once fetched and shared behind an [`Arc`]; the overlay
/// only holds references to the current and previous track while a cover
/// transition is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque track identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Secondary line (series, narrator, duration label).
    pub subtitle: String,
    /// Cover artwork reference (URI or asset key).
    pub cover_image: String,
    /// Accent colour used by surfaces, as `#RRGGBB`.
    pub accent_color: String,
    /// Decorative overlay image drawn on top of the spinning cover.
    pub overlay_image: Option<String>,
}

impl Track {
    /// Create a track with the required display fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        cover_image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            cover_image: cover_image.into(),
            accent_color: String::from("#FFFFFF"),
            overlay_image: None,
        }
    }

    /// Attach an accent colour.
    pub fn with_accent_color(mut self, color: impl Into<String>) -> Self {
        self.accent_color = color.into();
        self
    }

    /// Attach a decorative overlay image.
    pub fn with_overlay_image(mut self, image: impl Into<String>) -> Self {
        self.overlay_image = Some(image.into());
        self
    }
}

/// Which navigation command produced the most recent track change.
///
/// Meaningful only while a cover transition is in flight; at rest it is
/// [`ChangeDirection::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    #[default]
    None,
    Next,
    Previous,
}

impl ChangeDirection {
    pub fn is_none(&self) -> bool {
        matches!(self, ChangeDirection::None)
    }

    /// Horizontal sign the incoming artwork enters from: `+1.0` (right) for
    /// next, `-1.0` (left) for previous, `0.0` otherwise.
    pub fn entry_sign(&self) -> f32 {
        match self {
            ChangeDirection::None => 0.0,
            ChangeDirection::Next => 1.0,
            ChangeDirection::Previous => -1.0,
        }
    }
}

/// Transport command the overlay can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineCommand {
    Play,
    Pause,
    Next,
    Previous,
}

impl EngineCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineCommand::Play => "play",
            EngineCommand::Pause => "pause",
            EngineCommand::Next => "next",
            EngineCommand::Previous => "previous",
        }
    }

    /// Direction a navigation command will stamp on the resulting track change.
    pub fn direction(&self) -> ChangeDirection {
        match self {
            EngineCommand::Next => ChangeDirection::Next,
            EngineCommand::Previous => ChangeDirection::Previous,
            EngineCommand::Play | EngineCommand::Pause => ChangeDirection::None,
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State-change notification emitted by the engine.
///
/// Notifications carry no payload beyond the play flag; consumers re-read the
/// engine getters for track data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineNotification {
    /// The current track changed (getters already reflect the new track).
    TrackChanged,
    /// The authoritative play state changed.
    PlayStateChanged { is_playing: bool },
}

/// Shared handle to an engine-owned track.
pub type TrackRef = Arc<Track>;

/// Trait for host playback engines driven by the overlay.
///
/// Getters must be cheap and non-blocking: they are called from inside the
/// overlay's event handlers. Transport commands are awaited by the dispatcher
/// only to observe failures; the overlay never waits on them.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait PlaybackEngine: PlatformSendSync {
    /// Track currently loaded in the engine.
    fn current_track(&self) -> Option<TrackRef>;

    /// Track that was current before the most recent change.
    fn previous_track(&self) -> Option<TrackRef>;

    /// Direction of the most recent change.
    fn change_direction(&self) -> ChangeDirection;

    /// Authoritative play state.
    fn is_playing(&self) -> bool;

    /// Begin or resume playback.
    async fn play(&self) -> Result<()>;

    /// Pause playback.
    async fn pause(&self) -> Result<()>;

    /// Skip to the next track.
    async fn next(&self) -> Result<()>;

    /// Return to the previous track.
    async fn prev(&self) -> Result<()>;

    /// Subscribe to state-change notifications.
    fn subscribe(&self) -> broadcast::Receiver<EngineNotification>;

    /// Execute a transport command by value.
    async fn execute(&self, command: EngineCommand) -> Result<()> {
        match command {
            EngineCommand::Play => self.play().await,
            EngineCommand::Pause => self.pause().await,
            EngineCommand::Next => self.next().await,
            EngineCommand::Previous => self.prev().await,
        }
    }
}
