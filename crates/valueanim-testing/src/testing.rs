use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use valueanim_core::{Clock, Handler, Runtime, RuntimeHandle, RuntimeScheduler};

/// Virtual clock that only moves when told to.
#[derive(Debug, Default)]
pub struct TestClock {
    millis: AtomicU64,
}

impl TestClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn uptime_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Scheduler that only counts wakeup requests.
#[derive(Debug, Default)]
pub struct TestScheduler {
    wakeups: AtomicUsize,
}

impl TestScheduler {
    pub fn wakeup_count(&self) -> usize {
        self.wakeups.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for TestScheduler {
    fn schedule_wakeup(&self) {
        self.wakeups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Deterministic harness: a [`Runtime`] driven by a [`TestClock`].
///
/// Time passes only through [`TestRuntime::advance_by`], which stops the
/// clock at every due callback on the way so callbacks observe the exact
/// time they were scheduled for.
pub struct TestRuntime {
    runtime: Runtime,
    clock: Arc<TestClock>,
    scheduler: Arc<TestScheduler>,
}

impl TestRuntime {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(start_millis: u64) -> Self {
        let clock = Arc::new(TestClock::new(start_millis));
        let scheduler = Arc::new(TestScheduler::default());
        let runtime = Runtime::new(scheduler.clone(), clock.clone());
        Self {
            runtime,
            clock,
            scheduler,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn handler(&self) -> Handler {
        self.runtime.handler()
    }

    pub fn clock(&self) -> &TestClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &TestScheduler {
        &self.scheduler
    }

    pub fn now(&self) -> u64 {
        self.clock.uptime_millis()
    }

    /// Moves the clock forward by `millis`, running callbacks as they fall
    /// due. Returns the number of callbacks that ran.
    pub fn advance_by(&self, millis: u64) -> usize {
        let target = self.now().saturating_add(millis);
        let mut ran = 0;
        while let Some(due) = self.runtime.next_due_millis() {
            if due > target {
                break;
            }
            self.clock.set(due.max(self.now()));
            ran += self.runtime.drain_due();
        }
        self.clock.set(target);
        ran + self.runtime.drain_due()
    }

    /// Runs callbacks until the queue is empty or `limit_millis` of virtual
    /// time has passed. Returns the virtual time that elapsed.
    pub fn run_until_idle(&self, limit_millis: u64) -> u64 {
        let start = self.now();
        let limit = start.saturating_add(limit_millis);
        while let Some(due) = self.runtime.next_due_millis() {
            if due > limit {
                self.clock.set(limit);
                break;
            }
            self.clock.set(due.max(self.now()));
            self.runtime.drain_due();
        }
        self.now() - start
    }
}

impl Default for TestRuntime {
    fn default() -> Self {
        Self::new()
    }
}
