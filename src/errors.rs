//! Errors

use core::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Zero, negative or non-finite frequency, or a config field out of range
    InvalidArgument,
    /// Requested frequency can't be reached within the divider ranges
    OutOfRange,
    /// Neither integer nor fractional mode produced a setting
    Fail,
    /// Operation not allowed in the current PLL state
    InvalidOperation,
    /// PLL did not lock within the expected time
    Timeout,
    /// Register layer reported an error
    Backend,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Error::InvalidArgument => "invalid argument",
            Error::OutOfRange => "out of range",
            Error::Fail => "no divider setting found",
            Error::InvalidOperation => "invalid operation",
            Error::Timeout => "PLL lock timeout",
            Error::Backend => "register backend error",
        };
        f.write_str(s)
    }
}
