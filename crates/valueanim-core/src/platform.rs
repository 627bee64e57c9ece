//! Platform abstraction traits for the looper runtime.
//!
//! The runtime never reads the system clock or parks a thread itself. The
//! host supplies a [`Clock`] and a [`RuntimeScheduler`], so the same queue can
//! be driven by a real event loop or by a virtual clock in tests.

/// Wakes the host loop that drains the runtime.
///
/// Implementations must be safe to call from any thread; the runtime itself
/// only ever calls it from the thread that owns it.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host drain the runtime once the earliest posted
    /// callback becomes due.
    fn schedule_wakeup(&self);
}

/// Monotonic time source measured in milliseconds.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary, fixed origin. Never decreases.
    fn uptime_millis(&self) -> u64;
}
