//! Conditional thread-safety markers.
//!
//! Native hosts share bridge implementations between the overlay driver task
//! and the command dispatcher, so they need `Send + Sync`. Browser hosts run
//! on one thread and hand us `!Send` engine handles, so the bound disappears
//! on `wasm32`.

#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}
