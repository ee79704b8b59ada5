//! # Host Bridge Traits
//!
//! Contracts between the media overlay core and the host application.
//!
//! ## Overview
//!
//! The overlay coordinator turns pointer gestures and button presses into
//! transport commands, and engine notifications into rendered state. Everything
//! it does not own lives behind the traits in this crate:
//!
//! - [`PlaybackEngine`](playback::PlaybackEngine) - audio transport, the
//!   authoritative play flag, current/previous track and change direction
//! - [`MonotonicClock`](time::MonotonicClock) - time source for grace windows,
//!   cooldowns and animation progress
//! - [`LoggerSink`](time::LoggerSink) - forwards structured logs to the host
//!
//! ## Error Handling
//!
//! Engine failures are reported as [`BridgeError`](error::BridgeError). The
//! overlay never surfaces them to the user; the dispatcher logs them and the
//! optimistic play state reverts once its grace window lapses.
//!
//! ## Thread Safety
//!
//! On native targets every bridge is `Send + Sync` (see [`platform`]) so the
//! dispatcher can execute commands on its worker task while the driver keeps the
//! coordinator on its own task.

pub mod error;
pub mod platform;
pub mod playback;
pub mod time;

pub use error::BridgeError;

pub use playback::{
    ChangeDirection, EngineCommand, EngineNotification, PlaybackEngine, Track, TrackRef,
};
pub use time::{
    ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, MonotonicClock, SystemClock,
};
