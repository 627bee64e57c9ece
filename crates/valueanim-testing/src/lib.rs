//! Testing utilities for the value animator shim.

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
