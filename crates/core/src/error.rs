//! Error type for the prescale codecs.
//!
//! The algorithm codecs and register accesses are infallible; the only
//! failure in this crate is a clock slowdown the silicon cannot express.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrescaleError {
    /// No drive-source constant divides the clock by 2^factor.
    #[error("Unsupported prescale factor: 2^{0}")]
    UnsupportedFactor(u8),

    /// The drive-source constant stops the counter, selects an external
    /// clock, or does not fit the 3-bit field.
    #[error("Drive source 0x{0:02X} has no prescale factor")]
    UnsupportedSource(u8),
}
