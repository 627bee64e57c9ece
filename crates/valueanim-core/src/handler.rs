use crate::runtime::RuntimeHandle;
use crate::CallbackId;

/// Posts delayed work onto the thread that drains a [`crate::Runtime`].
#[derive(Clone, Debug)]
pub struct Handler {
    runtime: RuntimeHandle,
}

impl Handler {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn uptime_millis(&self) -> u64 {
        self.runtime.uptime_millis()
    }

    /// Runs `callback` once, no earlier than `delay_millis` from now.
    ///
    /// Dropping or cancelling the returned registration removes the callback
    /// if it has not run yet.
    pub fn post_delayed(
        &self,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> CallbackRegistration {
        match self.runtime.post_delayed(delay_millis, callback) {
            Some(id) => CallbackRegistration::new(self.runtime.clone(), id),
            None => {
                log::warn!("runtime dropped; callback not posted");
                CallbackRegistration::inactive(self.runtime.clone())
            }
        }
    }

    pub fn post(&self, callback: impl FnOnce() + 'static) -> CallbackRegistration {
        self.post_delayed(0, callback)
    }
}

#[must_use = "dropping a registration removes the posted callback"]
pub struct CallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<CallbackId>,
}

impl CallbackRegistration {
    fn new(runtime: RuntimeHandle, id: CallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn id(&self) -> Option<CallbackId> {
        self.id
    }

    /// Whether the callback is still waiting in the queue.
    pub fn is_pending(&self) -> bool {
        self.id
            .map(|id| self.runtime.is_pending(id))
            .unwrap_or(false)
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.remove_callback(id);
        }
    }
}

impl Drop for CallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.remove_callback(id);
        }
    }
}

impl std::fmt::Debug for CallbackRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistration")
            .field("id", &self.id)
            .finish()
    }
}
