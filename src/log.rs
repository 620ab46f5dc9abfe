//! Conditional logging macro.
//!
//! With the `tracing` feature enabled this re-exports the `tracing`
//! macro; without it, it expands to a no-op so the conversion loop pays
//! nothing for instrumentation.

#[cfg(feature = "tracing")]
pub use tracing::debug;

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::debug;
