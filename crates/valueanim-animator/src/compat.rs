//! Backend selection.
//!
//! [`AnimatorCompat`] is what client code holds. It is built once per
//! animation and, depending on what the [`Platform`] offers, either wraps an
//! [`EmulatedAnimator`] or forwards every call to the platform's own engine.

use std::fmt;
use std::rc::{Rc, Weak};

use valueanim_core::RuntimeHandle;

use crate::animator::{RepeatCount, RepeatMode, ValueAnimator};
use crate::emulated::EmulatedAnimator;
use crate::error::Result;
use crate::interpolator::Interpolator;
use crate::listener::{AnimatorListener, AnimatorUpdateListener};

/// Capability probe for the host platform.
pub trait Platform {
    /// A fresh native animator, or `None` when the platform has no engine.
    fn native_animator(&self) -> Option<Box<dyn ValueAnimator>>;
}

/// Platform without a native engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmulationOnly;

impl Platform for EmulationOnly {
    fn native_animator(&self) -> Option<Box<dyn ValueAnimator>> {
        None
    }
}

pub enum AnimatorCompat {
    Emulated(EmulatedAnimator),
    NativeForwarding(Box<dyn ValueAnimator>),
}

impl AnimatorCompat {
    pub fn new(platform: &dyn Platform, runtime: RuntimeHandle) -> Self {
        match platform.native_animator() {
            Some(native) => {
                log::debug!("using native animator");
                AnimatorCompat::NativeForwarding(native)
            }
            None => {
                log::debug!("no native animator; emulating");
                AnimatorCompat::Emulated(EmulatedAnimator::new(runtime))
            }
        }
    }

    pub fn emulated(runtime: RuntimeHandle) -> Self {
        AnimatorCompat::Emulated(EmulatedAnimator::new(runtime))
    }

    pub fn is_emulated(&self) -> bool {
        matches!(self, AnimatorCompat::Emulated(_))
    }

    pub fn as_emulated(&self) -> Option<&EmulatedAnimator> {
        match self {
            AnimatorCompat::Emulated(animator) => Some(animator),
            AnimatorCompat::NativeForwarding(_) => None,
        }
    }

    fn engine(&self) -> &dyn ValueAnimator {
        match self {
            AnimatorCompat::Emulated(animator) => animator as &dyn ValueAnimator,
            AnimatorCompat::NativeForwarding(native) => native.as_ref(),
        }
    }
}

impl ValueAnimator for AnimatorCompat {
    fn set_int_values(&self, from: i32, to: i32) {
        self.engine().set_int_values(from, to)
    }

    fn set_float_values(&self, from: f32, to: f32) {
        self.engine().set_float_values(from, to)
    }

    fn set_duration(&self, duration_millis: u64) -> Result<()> {
        self.engine().set_duration(duration_millis)
    }

    fn duration(&self) -> u64 {
        self.engine().duration()
    }

    fn set_interpolator(&self, interpolator: Rc<dyn Interpolator>) {
        self.engine().set_interpolator(interpolator)
    }

    fn set_repeat_count(&self, count: RepeatCount) {
        self.engine().set_repeat_count(count)
    }

    fn repeat_count(&self) -> RepeatCount {
        self.engine().repeat_count()
    }

    fn set_repeat_mode(&self, mode: RepeatMode) {
        self.engine().set_repeat_mode(mode)
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.engine().repeat_mode()
    }

    fn set_listener(&self, listener: Option<Weak<dyn AnimatorListener>>) {
        self.engine().set_listener(listener)
    }

    fn set_update_listener(&self, listener: Option<Weak<dyn AnimatorUpdateListener>>) {
        self.engine().set_update_listener(listener)
    }

    fn start(&self) {
        self.engine().start()
    }

    fn cancel(&self) {
        self.engine().cancel()
    }

    fn end(&self) {
        self.engine().end()
    }

    fn is_running(&self) -> bool {
        self.engine().is_running()
    }

    fn animated_fraction(&self) -> f32 {
        self.engine().animated_fraction()
    }

    fn animated_int_value(&self) -> i32 {
        self.engine().animated_int_value()
    }

    fn animated_float_value(&self) -> f32 {
        self.engine().animated_float_value()
    }
}

impl fmt::Debug for AnimatorCompat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimatorCompat::Emulated(animator) => {
                f.debug_tuple("Emulated").field(animator).finish()
            }
            AnimatorCompat::NativeForwarding(_) => f.write_str("NativeForwarding"),
        }
    }
}
