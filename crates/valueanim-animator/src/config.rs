use crate::error::{AnimatorError, Result};
use crate::interpolator::Easing;

pub const DEFAULT_DURATION_MILLIS: u64 = 200;
pub const DEFAULT_TICK_DELAY_MILLIS: u64 = 10;

/// Defaults an [`crate::EmulatedAnimator`] starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorDefaults {
    /// Duration used until `set_duration` is called.
    pub duration_millis: u64,
    /// Delay between two ticks, and before the first one.
    pub tick_delay_millis: u64,
    /// Curve installed by `start()` when none was set.
    pub interpolator: Easing,
}

impl AnimatorDefaults {
    pub fn with_duration(mut self, duration_millis: u64) -> Self {
        self.duration_millis = duration_millis;
        self
    }

    pub fn with_tick_delay(mut self, tick_delay_millis: u64) -> Self {
        self.tick_delay_millis = tick_delay_millis;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Easing) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_millis == 0 {
            return Err(AnimatorError::InvalidDuration(self.duration_millis));
        }
        if self.tick_delay_millis == 0 {
            return Err(AnimatorError::InvalidTickDelay(self.tick_delay_millis));
        }
        Ok(())
    }
}

impl Default for AnimatorDefaults {
    fn default() -> Self {
        Self {
            duration_millis: DEFAULT_DURATION_MILLIS,
            tick_delay_millis: DEFAULT_TICK_DELAY_MILLIS,
            interpolator: Easing::AccelerateDecelerate,
        }
    }
}
