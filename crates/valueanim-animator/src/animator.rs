//! The uniform animator contract and the value types it speaks in.

use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::interpolator::Interpolator;
use crate::listener::{AnimatorListener, AnimatorUpdateListener};

/// Trait for values that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + fraction * (target - self)
    }
}

impl Lerp for i32 {
    /// The offset is rounded half toward positive infinity, so
    /// `0i32.lerp(&10, 0.25)` is 3 and `10i32.lerp(&0, 0.25)` is 8.
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        let offset = fraction * (*target as f32 - *self as f32);
        self.saturating_add(round_half_up(offset))
    }
}

fn round_half_up(value: f32) -> i32 {
    (f64::from(value) + 0.5).floor() as i32
}

/// The numeric range being animated. Exactly one kind is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRange {
    Int { from: i32, to: i32 },
    Float { from: f32, to: f32 },
}

impl ValueRange {
    pub fn int_value_at(&self, fraction: f32) -> i32 {
        match *self {
            ValueRange::Int { from, to } => from.lerp(&to, fraction),
            ValueRange::Float { from, to } => round_half_up(from.lerp(&to, fraction)),
        }
    }

    pub fn float_value_at(&self, fraction: f32) -> f32 {
        match *self {
            ValueRange::Int { from, to } => (from as f32).lerp(&(to as f32), fraction),
            ValueRange::Float { from, to } => from.lerp(&to, fraction),
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        ValueRange::Int { from: 0, to: 0 }
    }
}

/// How many extra runs follow the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    /// Repeat `n` times; `Finite(0)` plays once.
    Finite(u32),
    Infinite,
}

impl Default for RepeatCount {
    fn default() -> Self {
        RepeatCount::NONE
    }
}

impl RepeatCount {
    pub const NONE: RepeatCount = RepeatCount::Finite(0);

    pub fn repeats(&self) -> bool {
        !matches!(self, RepeatCount::Finite(0))
    }
}

impl From<u32> for RepeatCount {
    fn from(count: u32) -> Self {
        RepeatCount::Finite(count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Every run starts again from the beginning of the range.
    #[default]
    Restart,
    /// Every run plays in the opposite direction of the previous one.
    ///
    /// Native engines honour this. [`crate::EmulatedAnimator`] accepts it but
    /// never repeats in this mode.
    Reverse,
}

/// Uniform animator contract, implemented by the emulation and by native
/// forwarding engines alike.
///
/// All methods take `&self`: animators are shared handles, and observers
/// receive the animator while it is mid-tick.
pub trait ValueAnimator {
    fn set_int_values(&self, from: i32, to: i32);

    fn set_float_values(&self, from: f32, to: f32);

    /// Fails with [`crate::AnimatorError::InvalidDuration`] for zero and
    /// leaves the previous duration in place.
    fn set_duration(&self, duration_millis: u64) -> Result<()>;

    fn duration(&self) -> u64;

    fn set_interpolator(&self, interpolator: Rc<dyn Interpolator>);

    fn set_repeat_count(&self, count: RepeatCount);

    fn repeat_count(&self) -> RepeatCount;

    fn set_repeat_mode(&self, mode: RepeatMode);

    fn repeat_mode(&self) -> RepeatMode;

    /// Replaces the lifecycle observer. `None` detaches it.
    fn set_listener(&self, listener: Option<Weak<dyn AnimatorListener>>);

    /// Replaces the per-tick observer. `None` detaches it.
    fn set_update_listener(&self, listener: Option<Weak<dyn AnimatorUpdateListener>>);

    /// Starts the animation. Does nothing while already running.
    fn start(&self);

    /// Stops the animation without an end notification.
    fn cancel(&self);

    /// Jumps to the end: fraction 1.0, one last update, then end.
    fn end(&self);

    fn is_running(&self) -> bool;

    fn animated_fraction(&self) -> f32;

    fn animated_int_value(&self) -> i32;

    fn animated_float_value(&self) -> f32;
}

/// Conveniences over [`ValueAnimator`] that need generics.
pub trait ValueAnimatorExt: ValueAnimator {
    /// Attaches `listener` weakly; the caller keeps it alive.
    fn attach_listener<L>(&self, listener: &Rc<L>)
    where
        L: AnimatorListener + 'static,
    {
        let listener: Weak<L> = Rc::downgrade(listener);
        self.set_listener(Some(listener));
    }

    /// Attaches `listener` weakly; the caller keeps it alive.
    fn attach_update_listener<L>(&self, listener: &Rc<L>)
    where
        L: AnimatorUpdateListener + 'static,
    {
        let listener: Weak<L> = Rc::downgrade(listener);
        self.set_update_listener(Some(listener));
    }
}

impl<T: ValueAnimator + ?Sized> ValueAnimatorExt for T {}
