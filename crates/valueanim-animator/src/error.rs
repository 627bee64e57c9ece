//! Error types for animator configuration.

use thiserror::Error;

/// Result type for animator configuration.
pub type Result<T> = std::result::Result<T, AnimatorError>;

/// Rejected animator configuration.
///
/// Running an animation never fails; only setters that would otherwise
/// produce a division by zero on every tick report errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorError {
    /// Duration must be at least one millisecond.
    #[error("animation duration must be positive, got {0}ms")]
    InvalidDuration(u64),

    /// Tick delay must be at least one millisecond.
    #[error("tick delay must be positive, got {0}ms")]
    InvalidTickDelay(u64),
}
