//! Workspace facade crate.
//!
//! Re-exports the overlay crates so a host application can depend on
//! `overlay-workspace` alone instead of wiring each member individually.

pub use bridge_traits;
pub use core_overlay;
pub use core_runtime;
