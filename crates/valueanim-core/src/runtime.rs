use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::collections::map::HashMap;
use crate::handler::Handler;
use crate::platform::{Clock, RuntimeScheduler};
use crate::CallbackId;

type DelayedCallback = Box<dyn FnOnce() + 'static>;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    clock: Arc<dyn Clock>,
    // Ordered by (due time, post order).
    queue: RefCell<BTreeMap<(u64, CallbackId), DelayedCallback>>,
    due_by_id: RefCell<HashMap<CallbackId, u64>>,
    next_callback_id: Cell<CallbackId>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            scheduler,
            clock,
            queue: RefCell::new(BTreeMap::new()),
            due_by_id: RefCell::new(HashMap::default()),
            next_callback_id: Cell::new(1),
        }
    }

    fn post_delayed(&self, delay_millis: u64, callback: DelayedCallback) -> CallbackId {
        let id = self.next_callback_id.get();
        self.next_callback_id.set(id + 1);
        let due = self.clock.uptime_millis().saturating_add(delay_millis);
        self.queue.borrow_mut().insert((due, id), callback);
        self.due_by_id.borrow_mut().insert(id, due);
        log::trace!("posted callback {id} due at {due}ms");
        self.scheduler.schedule_wakeup();
        id
    }

    fn remove_callback(&self, id: CallbackId) -> bool {
        let due = self.due_by_id.borrow_mut().remove(&id);
        match due {
            Some(due) => {
                self.queue.borrow_mut().remove(&(due, id));
                log::trace!("removed callback {id}");
                true
            }
            None => false,
        }
    }

    fn is_pending(&self, id: CallbackId) -> bool {
        self.due_by_id.borrow().contains_key(&id)
    }

    fn pop_due(&self, now: u64, limit: CallbackId) -> Option<DelayedCallback> {
        let mut queue = self.queue.borrow_mut();
        let key = queue
            .range(..=(now, CallbackId::MAX))
            .map(|(key, _)| *key)
            .find(|(_, id)| *id < limit)?;
        let callback = queue.remove(&key)?;
        drop(queue);
        self.due_by_id.borrow_mut().remove(&key.1);
        Some(callback)
    }

    fn drain_due(&self) -> usize {
        let now = self.clock.uptime_millis();
        // Callbacks posted while draining wait for the next drain.
        let limit = self.next_callback_id.get();
        let mut ran = 0;
        // One at a time: a callback may remove another one that is also due.
        while let Some(callback) = self.pop_due(now, limit) {
            callback();
            ran += 1;
        }
        ran
    }

    fn next_due_millis(&self) -> Option<u64> {
        self.queue.borrow().keys().next().map(|(due, _)| *due)
    }

    fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Owner of a single-threaded delayed callback queue.
///
/// `Runtime` is `!Send`: everything posted to it runs on the thread that
/// drains it.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler, clock)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
            clock: Arc::clone(&self.inner.clock),
        }
    }

    pub fn handler(&self) -> Handler {
        Handler::new(self.handle())
    }

    pub fn uptime_millis(&self) -> u64 {
        self.inner.clock.uptime_millis()
    }

    /// Runs every callback that is due at the current clock reading.
    pub fn drain_due(&self) -> usize {
        self.inner.drain_due()
    }

    pub fn next_due_millis(&self) -> Option<u64> {
        self.inner.next_due_millis()
    }

    pub fn has_pending_callbacks(&self) -> bool {
        self.inner.pending_count() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("pending", &self.inner.pending_count())
            .field("next_due_millis", &self.inner.next_due_millis())
            .finish()
    }
}

/// Weak reference to a [`Runtime`].
///
/// Operations on a handle whose runtime has been dropped are no-ops. The
/// clock stays readable.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
    clock: Arc<dyn Clock>,
}

impl RuntimeHandle {
    pub fn uptime_millis(&self) -> u64 {
        self.clock.uptime_millis()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn post_delayed(
        &self,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> Option<CallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.post_delayed(delay_millis, Box::new(callback)))
    }

    /// Removes a pending callback. Returns `false` when it already ran or
    /// was removed before.
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.remove_callback(id))
            .unwrap_or(false)
    }

    pub fn is_pending(&self, id: CallbackId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.is_pending(id))
            .unwrap_or(false)
    }

    pub fn drain_due(&self) -> usize {
        self.inner
            .upgrade()
            .map(|inner| inner.drain_due())
            .unwrap_or(0)
    }

    pub fn next_due_millis(&self) -> Option<u64> {
        self.inner.upgrade().and_then(|inner| inner.next_due_millis())
    }

    pub fn has_pending_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.pending_count() > 0)
            .unwrap_or(false)
    }

    pub fn handler(&self) -> Handler {
        Handler::new(self.clone())
    }
}

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
