//! Value animator compatibility shim.
//!
//! [`ValueAnimator`] is the uniform contract. [`EmulatedAnimator`] drives it
//! with a polling tick posted to a looper [`valueanim_core::Handler`];
//! [`AnimatorCompat`] picks between the emulation and a platform's native
//! engine at construction time.

pub mod animator;
pub mod compat;
pub mod config;
pub mod emulated;
pub mod error;
pub mod interpolator;
pub mod listener;

pub use animator::*;
pub use compat::{AnimatorCompat, EmulationOnly, Platform};
pub use config::AnimatorDefaults;
pub use emulated::{EmulatedAnimator, RunState};
pub use error::{AnimatorError, Result};
pub use interpolator::{Easing, Interpolator};
pub use listener::{AnimatorListener, AnimatorUpdateListener};

pub mod prelude {
    pub use crate::animator::{
        Lerp, RepeatCount, RepeatMode, ValueAnimator, ValueAnimatorExt, ValueRange,
    };
    pub use crate::compat::{AnimatorCompat, EmulationOnly, Platform};
    pub use crate::emulated::EmulatedAnimator;
    pub use crate::interpolator::{Easing, Interpolator};
    pub use crate::listener::{AnimatorListener, AnimatorUpdateListener};
}

#[cfg(test)]
#[path = "tests/emulated_tests.rs"]
mod emulated_tests;

#[cfg(test)]
#[path = "tests/compat_tests.rs"]
mod compat_tests;
