//! Observer traits.
//!
//! Animators hold observers weakly: dropping the last strong reference
//! detaches the observer without telling the animator. Attaching an observer
//! never replays events that already happened.

use crate::animator::ValueAnimator;

/// Lifecycle observer. Every method defaults to doing nothing.
pub trait AnimatorListener {
    fn on_animation_start(&self, _animator: &dyn ValueAnimator) {}

    fn on_animation_end(&self, _animator: &dyn ValueAnimator) {}

    fn on_animation_cancel(&self, _animator: &dyn ValueAnimator) {}

    fn on_animation_repeat(&self, _animator: &dyn ValueAnimator) {}
}

/// Per-tick observer. The new fraction and values are readable from
/// `animator` when this runs.
pub trait AnimatorUpdateListener {
    fn on_animation_update(&self, animator: &dyn ValueAnimator);
}

impl<F> AnimatorUpdateListener for F
where
    F: Fn(&dyn ValueAnimator),
{
    fn on_animation_update(&self, animator: &dyn ValueAnimator) {
        self(animator)
    }
}
