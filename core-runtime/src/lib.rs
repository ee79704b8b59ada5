//! # Core Runtime
//!
//! Shared runtime infrastructure for the media overlay crates:
//! - Logging and tracing setup ([`logging`])
//! - Tunable thresholds and durations ([`config`])
//! - Broadcast event bus for gesture, playback and transition events ([`events`])
//!
//! The overlay state machines in `core-overlay` are synchronous; this crate
//! only supplies the ambient pieces they report through.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::OverlayConfig;
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream};
