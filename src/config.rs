// ============================================================================
// Numeric Configuration
// Tuning for BigInt multiplication and the packed-decimal context
// ============================================================================

use crate::decimal;
use crate::errors::{NumericError, NumericResult};
use crate::fixed_point::{self, ScaleBits};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Multiplication
// ============================================================================

/// Word count at which BigInt multiplication switches to Karatsuba
pub const DEFAULT_KARATSUBA_THRESHOLD: usize = 32;

/// Below this size Karatsuba cannot shrink its sub-problems
pub const MIN_KARATSUBA_THRESHOLD: usize = 4;

/// Multiplication tuning for `BigInt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultiplyConfig {
    /// Operands shorter than this (in 32-bit words) use schoolbook
    /// multiplication. Values below 4 are treated as 4.
    pub karatsuba_threshold: usize,
}

impl Default for MultiplyConfig {
    fn default() -> Self {
        Self {
            karatsuba_threshold: DEFAULT_KARATSUBA_THRESHOLD,
        }
    }
}

impl MultiplyConfig {
    /// Forces schoolbook multiplication for every operand size
    pub fn schoolbook_only() -> Self {
        Self {
            karatsuba_threshold: usize::MAX,
        }
    }

    /// Builder method: Set the Karatsuba threshold
    pub fn with_karatsuba_threshold(mut self, threshold: usize) -> Self {
        self.karatsuba_threshold = threshold;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> NumericResult<()> {
        if self.karatsuba_threshold < MIN_KARATSUBA_THRESHOLD {
            return Err(NumericError::InvalidConfig("karatsuba threshold must be at least 4 words"));
        }
        Ok(())
    }
}

// ============================================================================
// Decimal Context
// ============================================================================

/// Scale bits and sentinel bundled for repeated decimal arithmetic.
///
/// # Example
/// ```
/// use decimal_engine::config::DecimalContext;
///
/// let ctx = DecimalContext::new(8, i64::MIN).unwrap();
/// let a = ctx.parse("1.25").unwrap();
/// let b = ctx.parse("0.5").unwrap();
/// assert_eq!(ctx.to_string(ctx.multiply(a, b)), "0.625");
/// assert!(ctx.is_sentinel(ctx.divide(a, ctx.encode(0, 0))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecimalContext {
    /// Low bits of each word holding the scale
    pub scale_bits: ScaleBits,
    /// Returned instead of a result that cannot be represented
    pub sentinel: i64,
}

impl DecimalContext {
    /// Create a context, validating the scale bits
    ///
    /// # Errors
    /// Returns `InvalidScaleBits` if `scale_bits > 15`.
    pub fn new(scale_bits: u8, sentinel: i64) -> NumericResult<Self> {
        Ok(Self {
            scale_bits: ScaleBits::new(scale_bits)?,
            sentinel,
        })
    }

    /// Builder method: Set the sentinel
    pub fn with_sentinel(mut self, sentinel: i64) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Validate the configuration.
    ///
    /// The sentinel must not decode to zero, otherwise a zero result and a
    /// failure are indistinguishable.
    pub fn validate(&self) -> NumericResult<()> {
        if fixed_point::decode_value(self.sentinel, self.scale_bits) == 0 {
            return Err(NumericError::InvalidConfig("sentinel decodes to zero"));
        }
        Ok(())
    }

    #[inline]
    pub fn is_sentinel(&self, word: i64) -> bool {
        word == self.sentinel
    }

    #[inline]
    pub fn encode(&self, value: i64, scale: i32) -> i64 {
        fixed_point::encode(value, scale, self.scale_bits, self.sentinel)
    }

    /// `(value, scale)` of a packed word
    #[inline]
    pub fn decode(&self, word: i64) -> (i64, i16) {
        (
            fixed_point::decode_value(word, self.scale_bits),
            fixed_point::decode_scale(word, self.scale_bits),
        )
    }

    #[inline]
    pub fn add(&self, a: i64, b: i64) -> i64 {
        decimal::add(a, b, self.scale_bits, self.sentinel)
    }

    #[inline]
    pub fn subtract(&self, a: i64, b: i64) -> i64 {
        decimal::subtract(a, b, self.scale_bits, self.sentinel)
    }

    #[inline]
    pub fn multiply(&self, a: i64, b: i64) -> i64 {
        decimal::multiply(a, b, self.scale_bits, self.sentinel)
    }

    #[inline]
    pub fn divide(&self, a: i64, b: i64) -> i64 {
        decimal::divide(a, b, self.scale_bits, self.sentinel)
    }

    #[inline]
    pub fn compare(&self, a: i64, b: i64) -> Ordering {
        decimal::compare(a, b, self.scale_bits)
    }

    pub fn to_string(&self, word: i64) -> String {
        decimal::to_string(word, self.scale_bits)
    }

    /// # Errors
    /// Returns `Format` for malformed input.
    pub fn parse(&self, s: &str) -> NumericResult<i64> {
        decimal::parse(s, self.scale_bits, self.sentinel)
    }
}
