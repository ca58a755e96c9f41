// ============================================================================
// Fixed-Point Layout
// Value/scale ranges for each split of a 64-bit word
// ============================================================================

use crate::errors::{NumericError, NumericResult};
use crate::fastmath::digits_u64;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of low bits of an encoded word reserved for the decimal scale.
///
/// The remaining `64 - bits` bits hold the unscaled value in two's complement.
/// Validated on construction, so every function taking `ScaleBits` is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct ScaleBits(u8);

impl ScaleBits {
    /// Widest supported scale field
    pub const MAX: u8 = 15;

    /// # Errors
    /// Returns `InvalidScaleBits` if `bits > 15`.
    #[inline]
    pub fn new(bits: u8) -> NumericResult<Self> {
        if bits <= Self::MAX {
            Ok(Self(bits))
        } else {
            Err(NumericError::InvalidScaleBits(bits))
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every valid split, narrowest scale field first.
    pub fn all() -> impl Iterator<Item = ScaleBits> {
        (0..=Self::MAX).map(ScaleBits)
    }

    /// Cached layout for this split.
    #[inline]
    pub fn layout(self) -> &'static Layout {
        &LAYOUTS[self.0 as usize]
    }
}

impl TryFrom<u8> for ScaleBits {
    type Error = NumericError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<ScaleBits> for u8 {
    fn from(bits: ScaleBits) -> Self {
        bits.0
    }
}

impl fmt::Display for ScaleBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Representable ranges for one scale-bits split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Smallest unscaled value, `-2^(63 - b)`
    pub min_value: i64,
    /// Largest unscaled value, `2^(63 - b) - 1`
    pub max_value: i64,
    /// Smallest scale, `-2^(b - 1)` (0 when b = 0)
    pub min_scale: i16,
    /// Largest scale, `2^(b - 1) - 1` (0 when b = 0)
    pub max_scale: i16,
    /// Mask selecting the scale field
    pub scale_mask: u64,
    /// Decimal digits in `max_value`
    pub max_digits: u32,
}

const fn layout(bits: u32) -> Layout {
    let max_value = (i64::MAX >> bits) as i64;
    let (min_scale, max_scale) = if bits == 0 {
        (0, 0)
    } else {
        (-(1i32 << (bits - 1)) as i16, ((1i32 << (bits - 1)) - 1) as i16)
    };
    Layout {
        min_value: i64::MIN >> bits,
        max_value,
        min_scale,
        max_scale,
        scale_mask: (1u64 << bits) - 1,
        max_digits: digits_u64(max_value as u64),
    }
}

const fn build_layouts() -> [Layout; 16] {
    let mut table = [layout(0); 16];
    let mut bits = 1;
    while bits < 16 {
        table[bits as usize] = layout(bits);
        bits += 1;
    }
    table
}

/// Layouts indexed by scale bits.
pub static LAYOUTS: [Layout; 16] = build_layouts();

#[inline]
pub fn min_value(bits: ScaleBits) -> i64 {
    bits.layout().min_value
}

#[inline]
pub fn max_value(bits: ScaleBits) -> i64 {
    bits.layout().max_value
}

#[inline]
pub fn min_scale(bits: ScaleBits) -> i16 {
    bits.layout().min_scale
}

#[inline]
pub fn max_scale(bits: ScaleBits) -> i16 {
    bits.layout().max_scale
}
