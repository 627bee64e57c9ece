#![doc = r"Looper runtime pieces for the value animator compatibility shim."]

pub mod collections;
pub mod handler;
pub mod platform;
pub mod runtime;

pub use handler::{CallbackRegistration, Handler};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle};

/// Identifier of a callback posted to a [`Runtime`].
pub type CallbackId = u64;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
