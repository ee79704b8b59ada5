//! # Overlay Error Types
//!
//! Errors raised while building or driving the overlay coordinator.
//!
//! Event handlers never return these to the host. They are logged and the
//! offending update is dropped; only construction and explicit layer
//! operations surface them.

use crate::transition::{Layer, LayerMode};
use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// A drag update targeted a layer that is not in drag-follow mode.
    #[error("Layer {layer} is {mode}, cannot apply drag update")]
    ModeConflict { layer: Layer, mode: LayerMode },

    /// The async driver is no longer accepting input.
    #[error("Overlay driver has stopped")]
    DriverStopped,

    /// The command worker exited, so queued engine commands cannot run.
    #[error("Command dispatcher has stopped")]
    DispatcherStopped,

    /// The playback engine rejected or failed a command.
    #[error("Playback engine error: {0}")]
    Engine(#[from] BridgeError),

    /// Configuration or runtime failure.
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
