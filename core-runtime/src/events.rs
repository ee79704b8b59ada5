//! # Event Bus System
//!
//! Broadcasts overlay notifications to host subscribers using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The overlay coordinator is a closed state machine; hosts learn about its
//! decisions through this bus rather than by polling:
//!
//! - **Gesture events**: a session committed an action, snapped back, or was
//!   ignored
//! - **Playback events**: a transport command was issued or failed, or an
//!   optimistic play flag expired without confirmation
//! - **Transition events**: a layer animation started, was superseded, or
//!   completed; and the close-completed signal that lets the host unmount
//!   the sheet
//!
//! ```text
//! ┌────────────────────┐   emit   ┌───────────┐  subscribe  ┌──────────────┐
//! │ OverlayCoordinator ├─────────>│ EventBus  ├────────────>│ Host / tests │
//! └────────────────────┘          └───────────┘             └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, TransitionEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(32);
//! let mut sub = bus.subscribe();
//!
//! bus.emit(CoreEvent::Transition(TransitionEvent::OverlayHidden)).ok();
//!
//! let event = sub.recv().await.unwrap();
//! assert_eq!(event.description(), "Overlay hidden");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events; it may keep
//!   receiving.
//! - **`RecvError::Closed`**: every sender was dropped; treat as shutdown.
//!
//! Emitting with no subscribers returns an error which publishers ignore.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published through the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Gesture lifecycle outcomes
    Gesture(GestureEvent),
    /// Transport command and play-state reconciliation
    Playback(PlaybackEvent),
    /// Layer animation lifecycle
    Transition(TransitionEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Gesture(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Transition(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::CommandFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::OptimisticExpired { .. }) => {
                EventSeverity::Warning
            }
            CoreEvent::Gesture(GestureEvent::Committed { .. }) => EventSeverity::Info,
            CoreEvent::Transition(TransitionEvent::OverlayHidden) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Gesture Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GestureEvent {
    /// A session committed its single action.
    Committed {
        session_id: u64,
        /// `next`, `previous` or `close`.
        action: String,
    },
    /// A session ended without committing and its layer springs back.
    SnappedBack {
        session_id: u64,
        /// `rest` (cover) or `open` (sheet).
        target: String,
    },
    /// A session ended without ever classifying, or on a disallowed axis.
    Ignored { session_id: u64 },
}

impl GestureEvent {
    fn description(&self) -> &str {
        match self {
            GestureEvent::Committed { .. } => "Gesture committed",
            GestureEvent::SnappedBack { .. } => "Gesture snapped back",
            GestureEvent::Ignored { .. } => "Gesture ignored",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A transport command left the overlay.
    CommandIssued { command: String },
    /// The engine reported a failure for a command.
    CommandFailed { command: String, message: String },
    /// An optimistic guess lapsed without confirmation.
    OptimisticExpired { rendered_is_playing: bool },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::CommandIssued { .. } => "Playback command issued",
            PlaybackEvent::CommandFailed { .. } => "Playback command failed",
            PlaybackEvent::OptimisticExpired { .. } => "Optimistic play state expired",
        }
    }
}

// ============================================================================
// Transition Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum TransitionEvent {
    Started { layer: String, token: u64 },
    /// A live token was replaced before it completed.
    Superseded { layer: String, token: u64 },
    Completed { layer: String, token: u64 },
    /// The close animation finished; the sheet may be unmounted.
    OverlayHidden,
}

impl TransitionEvent {
    fn description(&self) -> &str {
        match self {
            TransitionEvent::Started { .. } => "Transition started",
            TransitionEvent::Superseded { .. } => "Transition superseded",
            TransitionEvent::Completed { .. } => "Transition completed",
            TransitionEvent::OverlayHidden => "Overlay hidden",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for overlay events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// Subscribers that fall behind by more than `capacity` events receive
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional filter.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let transitions = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Transition(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned from `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking receive. `None` when nothing is queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drain every queued event that passes the filter.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
