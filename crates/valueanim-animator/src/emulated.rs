//! Timer-driven animator for platforms without a native animation engine.
//!
//! A running [`EmulatedAnimator`] keeps exactly one tick posted to its
//! [`Handler`]. Each tick samples the clock, runs elapsed time through the
//! interpolator, notifies the update listener, then decides between
//! repeating, ending, or posting the next tick.
//!
//! Listeners may call back into the animator. No borrow of the animator's
//! state is held while a listener runs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use valueanim_core::{CallbackRegistration, Handler, RuntimeHandle};

use crate::animator::{RepeatCount, RepeatMode, ValueAnimator, ValueRange};
use crate::config::AnimatorDefaults;
use crate::error::{AnimatorError, Result};
use crate::interpolator::Interpolator;
use crate::listener::{AnimatorListener, AnimatorUpdateListener};

/// Where an [`EmulatedAnimator`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Never started, or cancelled.
    Idle,
    /// Started and not yet finished or cancelled.
    Running {
        start_millis: u64,
        /// 1-based index of the run in progress.
        current_iteration: u32,
    },
    /// Finished naturally or through `end()` after `iterations` runs.
    Ended { iterations: u32 },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Start,
    End,
    Cancel,
    Repeat,
}

struct EmulatedInner {
    handler: Handler,
    defaults: AnimatorDefaults,
    duration_millis: u64,
    interpolator: Option<Rc<dyn Interpolator>>,
    range: ValueRange,
    repeat_count: RepeatCount,
    repeat_mode: RepeatMode,
    listener: Option<Weak<dyn AnimatorListener>>,
    update_listener: Option<Weak<dyn AnimatorUpdateListener>>,
    state: RunState,
    animated_fraction: f32,
    // Bumped by every start so a stale tick can tell it belongs to an
    // earlier run.
    generation: u64,
    registration: Option<CallbackRegistration>,
}

impl EmulatedInner {
    fn should_repeat(&self, current_iteration: u32) -> bool {
        match (self.repeat_mode, self.repeat_count) {
            (RepeatMode::Restart, RepeatCount::Infinite) => true,
            (RepeatMode::Restart, RepeatCount::Finite(count)) => {
                count > 0 && current_iteration <= count
            }
            (RepeatMode::Reverse, _) => false,
        }
    }

    fn is_current_run(&self, generation: u64) -> bool {
        self.generation == generation && self.state.is_running()
    }
}

/// Emulated value animator.
///
/// Cloning yields another handle to the same animation.
#[derive(Clone)]
pub struct EmulatedAnimator {
    inner: Rc<RefCell<EmulatedInner>>,
}

impl EmulatedAnimator {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self::from_parts(runtime.handler(), AnimatorDefaults::default())
    }

    pub fn with_defaults(runtime: RuntimeHandle, defaults: AnimatorDefaults) -> Result<Self> {
        defaults.validate()?;
        Ok(Self::from_parts(runtime.handler(), defaults))
    }

    fn from_parts(handler: Handler, defaults: AnimatorDefaults) -> Self {
        let inner = EmulatedInner {
            handler,
            defaults,
            duration_millis: defaults.duration_millis,
            interpolator: None,
            range: ValueRange::default(),
            repeat_count: RepeatCount::default(),
            repeat_mode: RepeatMode::default(),
            listener: None,
            update_listener: None,
            state: RunState::Idle,
            animated_fraction: 0.0,
            generation: 0,
            registration: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.inner.borrow().state
    }

    /// Index of the run in progress, or the number of runs the last
    /// animation completed. Zero before the first start and after a cancel.
    pub fn current_iteration(&self) -> u32 {
        match self.inner.borrow().state {
            RunState::Idle => 0,
            RunState::Running {
                current_iteration, ..
            } => current_iteration,
            RunState::Ended { iterations } => iterations,
        }
    }

    pub fn value_range(&self) -> ValueRange {
        self.inner.borrow().range
    }

    /// Whether a tick is waiting in the runtime queue.
    pub fn has_pending_tick(&self) -> bool {
        self.inner
            .borrow()
            .registration
            .as_ref()
            .map(CallbackRegistration::is_pending)
            .unwrap_or(false)
    }

    fn schedule_tick(&self, generation: u64) {
        let (handler, delay) = {
            let inner = self.inner.borrow();
            if !inner.is_current_run(generation) || inner.registration.is_some() {
                return;
            }
            (inner.handler.clone(), inner.defaults.tick_delay_millis)
        };
        let weak = Rc::downgrade(&self.inner);
        let registration = handler.post_delayed(delay, move || {
            if let Some(inner) = weak.upgrade() {
                EmulatedAnimator { inner }.on_tick(generation);
            }
        });
        self.inner.borrow_mut().registration = Some(registration);
    }

    fn on_tick(&self, generation: u64) {
        let now = {
            let mut inner = self.inner.borrow_mut();
            inner.registration = None;
            if !inner.is_current_run(generation) {
                return;
            }
            let RunState::Running { start_millis, .. } = inner.state else {
                return;
            };
            let now = inner.handler.uptime_millis();
            let elapsed = now.saturating_sub(start_millis);
            let linear_fraction = elapsed as f32 / inner.duration_millis as f32;
            inner.animated_fraction = match &inner.interpolator {
                Some(interpolator) => interpolator.interpolation(linear_fraction),
                None => linear_fraction,
            };
            log::trace!(
                "tick at {now}ms: linear {linear_fraction:.3}, animated {:.3}",
                inner.animated_fraction
            );
            now
        };

        self.dispatch_update();

        let event = {
            let mut inner = self.inner.borrow_mut();
            // The update listener may have cancelled, ended or restarted us.
            if !inner.is_current_run(generation) {
                return;
            }
            let RunState::Running {
                start_millis,
                current_iteration,
            } = inner.state
            else {
                return;
            };
            if now < start_millis.saturating_add(inner.duration_millis) {
                None
            } else if inner.should_repeat(current_iteration) {
                inner.state = RunState::Running {
                    start_millis: now,
                    current_iteration,
                };
                log::debug!("repeating after run {current_iteration}");
                Some(Lifecycle::Repeat)
            } else {
                inner.state = RunState::Ended {
                    iterations: current_iteration,
                };
                log::debug!("finished after {current_iteration} run(s)");
                Some(Lifecycle::End)
            }
        };

        if let Some(event) = event {
            self.dispatch_lifecycle(event);
            if event == Lifecycle::Repeat {
                let mut inner = self.inner.borrow_mut();
                if inner.is_current_run(generation) {
                    if let RunState::Running {
                        current_iteration, ..
                    } = &mut inner.state
                    {
                        *current_iteration += 1;
                    }
                }
            }
        }

        self.schedule_tick(generation);
    }

    fn dispatch_update(&self) {
        let listener = self
            .inner
            .borrow()
            .update_listener
            .as_ref()
            .and_then(Weak::upgrade);
        if let Some(listener) = listener {
            listener.on_animation_update(self);
        }
    }

    fn dispatch_lifecycle(&self, event: Lifecycle) {
        let listener = self
            .inner
            .borrow()
            .listener
            .as_ref()
            .and_then(Weak::upgrade);
        let Some(listener) = listener else {
            return;
        };
        match event {
            Lifecycle::Start => listener.on_animation_start(self),
            Lifecycle::End => listener.on_animation_end(self),
            Lifecycle::Cancel => listener.on_animation_cancel(self),
            Lifecycle::Repeat => listener.on_animation_repeat(self),
        }
    }
}

impl ValueAnimator for EmulatedAnimator {
    fn set_int_values(&self, from: i32, to: i32) {
        self.inner.borrow_mut().range = ValueRange::Int { from, to };
    }

    fn set_float_values(&self, from: f32, to: f32) {
        self.inner.borrow_mut().range = ValueRange::Float { from, to };
    }

    fn set_duration(&self, duration_millis: u64) -> Result<()> {
        if duration_millis == 0 {
            return Err(AnimatorError::InvalidDuration(duration_millis));
        }
        self.inner.borrow_mut().duration_millis = duration_millis;
        Ok(())
    }

    fn duration(&self) -> u64 {
        self.inner.borrow().duration_millis
    }

    fn set_interpolator(&self, interpolator: Rc<dyn Interpolator>) {
        self.inner.borrow_mut().interpolator = Some(interpolator);
    }

    fn set_repeat_count(&self, count: RepeatCount) {
        self.inner.borrow_mut().repeat_count = count;
    }

    fn repeat_count(&self) -> RepeatCount {
        self.inner.borrow().repeat_count
    }

    fn set_repeat_mode(&self, mode: RepeatMode) {
        self.inner.borrow_mut().repeat_mode = mode;
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.inner.borrow().repeat_mode
    }

    fn set_listener(&self, listener: Option<Weak<dyn AnimatorListener>>) {
        self.inner.borrow_mut().listener = listener;
    }

    fn set_update_listener(&self, listener: Option<Weak<dyn AnimatorUpdateListener>>) {
        self.inner.borrow_mut().update_listener = listener;
    }

    fn start(&self) {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_running() {
                return;
            }
            if inner.interpolator.is_none() {
                let fallback: Rc<dyn Interpolator> = Rc::new(inner.defaults.interpolator);
                inner.interpolator = Some(fallback);
            }
            if inner.repeat_mode == RepeatMode::Reverse && inner.repeat_count.repeats() {
                log::warn!("reverse repeat mode is not emulated; the animation plays once");
            }
            let now = inner.handler.uptime_millis();
            inner.state = RunState::Running {
                start_millis: now,
                current_iteration: 1,
            };
            inner.generation += 1;
            log::debug!(
                "started at {now}ms for {}ms ({:?})",
                inner.duration_millis,
                inner.range
            );
            inner.generation
        };
        self.dispatch_lifecycle(Lifecycle::Start);
        self.schedule_tick(generation);
    }

    fn cancel(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            if inner.state.is_running() {
                inner.state = RunState::Idle;
                log::debug!("cancelled");
            }
        }
        self.dispatch_lifecycle(Lifecycle::Cancel);
    }

    fn end(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            let RunState::Running {
                current_iteration, ..
            } = inner.state
            else {
                return;
            };
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.animated_fraction = 1.0;
            inner.state = RunState::Ended {
                iterations: current_iteration,
            };
            log::debug!("ended early during run {current_iteration}");
        }
        self.dispatch_update();
        self.dispatch_lifecycle(Lifecycle::End);
    }

    fn is_running(&self) -> bool {
        self.inner.borrow().state.is_running()
    }

    fn animated_fraction(&self) -> f32 {
        self.inner.borrow().animated_fraction
    }

    fn animated_int_value(&self) -> i32 {
        let inner = self.inner.borrow();
        inner.range.int_value_at(inner.animated_fraction)
    }

    fn animated_float_value(&self) -> f32 {
        let inner = self.inner.borrow();
        inner.range.float_value_at(inner.animated_fraction)
    }
}

impl fmt::Debug for EmulatedAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EmulatedAnimator")
            .field("state", &inner.state)
            .field("duration_millis", &inner.duration_millis)
            .field("range", &inner.range)
            .field("repeat_count", &inner.repeat_count)
            .field("repeat_mode", &inner.repeat_mode)
            .field("animated_fraction", &inner.animated_fraction)
            .finish()
    }
}
