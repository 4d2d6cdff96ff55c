//! Feature-gated logging.
//!
//! With the `tracing` feature on, `debug!`, `trace!` and `warn!` are the
//! `tracing` macros, so solver results and geometry fallbacks show up under
//! `RUST_LOG=vecta=debug`. With it off, every call site compiles away.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, trace, warn};
