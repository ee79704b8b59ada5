//! # Media Overlay Core
//!
//! Coordination layer between raw touch input, an asynchronous playback
//! engine and the layered player overlay (mini-player, full sheet, cover
//! cross-fade, vinyl spin).
//!
//! ## Overview
//!
//! - [`gesture`]: classifies pointer movement into navigate, dismiss or ignore
//! - [`commit`]: at most one committed action per gesture, with a cooldown
//! - [`reconciler`]: optimistic play/pause flag with bounded grace windows
//! - [`transition`]: per-layer tokens, tweens, drag-follow and spin
//! - [`timer`]: cancelable deadlines drained on every event
//! - [`coordinator`]: typed event entry point tying the above together
//! - [`surface`]: read-only view models for the presentation layer
//! - `dispatch` / `driver`: async command execution and event loop (native)
//!
//! ## Threading
//!
//! The coordinator is plain synchronous state and needs no locks: every input
//! is serialized through [`OverlayCoordinator::dispatch`]. The optional
//! [`driver::OverlayDriver`] provides that serialization on a tokio task.

pub mod animation;
pub mod commit;
pub mod coordinator;
pub mod error;
pub mod gesture;
pub mod reconciler;
pub mod surface;
pub mod timer;
pub mod transition;

#[cfg(not(target_arch = "wasm32"))]
pub mod dispatch;
#[cfg(not(target_arch = "wasm32"))]
pub mod driver;

pub use commit::{CommitAction, CommitGate, GateDecision, SnapTarget};
pub use coordinator::{OverlayCoordinator, OverlayEvent};
pub use error::{OverlayError, Result};
pub use gesture::{GestureClass, GestureClassifier, GestureOrigin, GestureSession, PointerSample};
pub use reconciler::OptimisticStateReconciler;
pub use surface::{FullSheetSurface, MiniPlayerSurface, OverlaySnapshot};
pub use transition::{Layer, LayerMode, TransitionSequencer, TransitionToken};

#[cfg(not(target_arch = "wasm32"))]
pub use dispatch::{CommandDispatcher, CommandQueue};
#[cfg(not(target_arch = "wasm32"))]
pub use driver::{OverlayDriver, OverlayHandle};
