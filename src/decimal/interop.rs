// ============================================================================
// Conversion to/from rust_decimal (for API boundaries)
// ============================================================================

use super::fit::fit_i128;
use super::operation::Operand;
use crate::fastmath::pow10_u128;
use crate::fixed_point::{pack, ScaleBits};
use rust_decimal::Decimal;

/// Converts a packed word to `rust_decimal::Decimal`.
///
/// Returns `None` when the value needs more than 28 fractional digits or
/// more than 96 bits of mantissa.
pub fn to_rust_decimal(word: i64, bits: ScaleBits) -> Option<Decimal> {
    let x = Operand::decode(word, bits);
    if x.scale >= 0 {
        Decimal::try_from_i128_with_scale(x.value, x.scale as u32).ok()
    } else {
        let factor = pow10_u128(x.scale.unsigned_abs())? as i128;
        Decimal::try_from_i128_with_scale(x.value.checked_mul(factor)?, 0).ok()
    }
}

/// Converts a `rust_decimal::Decimal` into a packed word, rounding half-up
/// when it carries more digits than the layout holds.
pub fn from_rust_decimal(d: Decimal, bits: ScaleBits, sentinel: i64) -> i64 {
    match fit_i128(d.mantissa(), d.scale() as i32, false, bits) {
        Some((value, scale)) => pack(value, scale, bits),
        None => sentinel,
    }
}
