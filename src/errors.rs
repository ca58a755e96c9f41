// ============================================================================
// Numeric Errors
// Hard failures for malformed input and invalid configuration
// ============================================================================
//
// Arithmetic never reports through this type: overflow, division by zero and
// unrepresentable scales are signalled with a caller-supplied sentinel.

use std::fmt;

/// Errors raised for input the engine refuses to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Input string is not a number in the requested notation
    Format,
    /// Radix outside 2..=36
    InvalidRadix(u32),
    /// Scale bits outside 0..=15
    InvalidScaleBits(u8),
    /// Configuration rejected by validation
    InvalidConfig(&'static str),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Format => write!(f, "invalid format: could not parse number"),
            NumericError::InvalidRadix(radix) => {
                write!(f, "invalid radix: {} is outside 2..=36", radix)
            },
            NumericError::InvalidScaleBits(bits) => {
                write!(f, "invalid scale bits: {} is outside 0..=15", bits)
            },
            NumericError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for fallible numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
