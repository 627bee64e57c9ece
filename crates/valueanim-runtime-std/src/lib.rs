//! Standard looper services backed by Rust's `std` library.
//!
//! This crate provides concrete implementations of the platform abstraction
//! traits defined in `valueanim-core`. Applications construct a
//! [`StdRuntime`], hand its [`RuntimeHandle`] to animators, and call
//! [`StdRuntime::run_until_idle`] (or poll [`StdRuntime::drain_due`] from
//! their own event loop) on the thread that owns it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use valueanim_core::{Clock, Handler, Runtime, RuntimeHandle, RuntimeScheduler};

/// Scheduler that records wakeup requests and forwards them to a waker.
pub struct StdScheduler {
    wakeup_requested: AtomicBool,
    waker: RwLock<Option<Arc<dyn Fn() + Send + Sync + 'static>>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self {
            wakeup_requested: AtomicBool::new(false),
            waker: RwLock::new(None),
        }
    }

    /// Returns whether a wakeup has been requested since the last call.
    pub fn take_wakeup_request(&self) -> bool {
        self.wakeup_requested.swap(false, Ordering::SeqCst)
    }

    /// Registers a waker invoked whenever the runtime posts new work.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(waker));
    }

    /// Clears any registered waker.
    pub fn clear_waker(&self) {
        *self.waker.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn wake(&self) {
        let waker = self
            .waker
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Default for StdScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdScheduler")
            .field(
                "wakeup_requested",
                &self.wakeup_requested.load(Ordering::SeqCst),
            )
            .finish()
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_wakeup(&self) {
        self.wakeup_requested.store(true, Ordering::SeqCst);
        self.wake();
    }
}

/// Monotonic clock backed by [`std::time::Instant`], counting from its
/// construction.
#[derive(Debug, Clone)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Returns the time since the clock's origin as a [`Duration`].
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn uptime_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Convenience container bundling the standard scheduler, clock and runtime.
#[derive(Clone)]
pub struct StdRuntime {
    scheduler: Arc<StdScheduler>,
    clock: Arc<StdClock>,
    runtime: Runtime,
}

impl StdRuntime {
    pub fn new() -> Self {
        let scheduler = Arc::new(StdScheduler::default());
        let clock = Arc::new(StdClock::default());
        let runtime = Runtime::new(scheduler.clone(), clock.clone());
        Self {
            scheduler,
            clock,
            runtime,
        }
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime.clone()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn handler(&self) -> Handler {
        self.runtime.handler()
    }

    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn clock(&self) -> Arc<StdClock> {
        Arc::clone(&self.clock)
    }

    /// Runs whatever is due right now without blocking.
    pub fn drain_due(&self) -> usize {
        self.scheduler.take_wakeup_request();
        self.runtime.drain_due()
    }

    /// Blocks the current thread, running callbacks as they become due,
    /// until nothing is left in the queue. Returns the number of callbacks
    /// that ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(due) = self.runtime.next_due_millis() {
            let now = self.clock.uptime_millis();
            if due > now {
                thread::sleep(Duration::from_millis(due - now));
            }
            ran += self.drain_due();
        }
        log::debug!("runtime idle after {ran} callbacks");
        ran
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("clock", &self.clock)
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}
