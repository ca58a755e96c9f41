// ============================================================================
// Decimal Arithmetic
// Public entry points over packed words
// ============================================================================

use super::fit::{fit_i128, round_half_up};
use super::operation::{rescale_big, rescale_small, DecimalOperation, Operand};
use crate::fastmath::digits_u128;
use crate::fixed_point::{pack, ScaleBits};
use std::cmp::Ordering;
use tracing::debug;

/// `a + b`, scale `max(sa, sb)` unless rounding is needed.
#[inline]
pub fn add(a: i64, b: i64, bits: ScaleBits, sentinel: i64) -> i64 {
    DecimalOperation::Add.apply(a, b, bits, sentinel)
}

/// `a - b`, scale `max(sa, sb)` unless rounding is needed.
#[inline]
pub fn subtract(a: i64, b: i64, bits: ScaleBits, sentinel: i64) -> i64 {
    DecimalOperation::Subtract.apply(a, b, bits, sentinel)
}

/// `a * b`, scale `sa + sb` unless rounding is needed.
#[inline]
pub fn multiply(a: i64, b: i64, bits: ScaleBits, sentinel: i64) -> i64 {
    DecimalOperation::Multiply.apply(a, b, bits, sentinel)
}

/// `a / b` to as many digits as the layout holds, trailing zeros stripped down
/// to scale `sa - sb`. Division by zero returns `sentinel`.
#[inline]
pub fn divide(a: i64, b: i64, bits: ScaleBits, sentinel: i64) -> i64 {
    DecimalOperation::Divide.apply(a, b, bits, sentinel)
}

/// Numeric comparison; scale does not matter (`1.0 == 1.00`).
pub fn compare(a: i64, b: i64, bits: ScaleBits) -> Ordering {
    let x = Operand::decode(a, bits);
    let y = Operand::decode(b, bits);
    if x.scale == y.scale {
        return x.value.cmp(&y.value);
    }

    let sign = x.value.signum().cmp(&y.value.signum());
    if sign != Ordering::Equal || x.value == 0 {
        return sign;
    }

    // Same sign, both nonzero: the decimal exponent of the leading digit
    // settles most wide scale gaps without rescaling.
    let (ex, ey) = (leading_exponent(x), leading_exponent(y));
    if ex != ey {
        return if x.value > 0 { ex.cmp(&ey) } else { ey.cmp(&ex) };
    }

    let scale = x.scale.max(y.scale);
    let (dx, dy) = ((scale - x.scale) as u32, (scale - y.scale) as u32);
    match (rescale_small(x.value, dx), rescale_small(y.value, dy)) {
        (Some(p), Some(q)) => p.cmp(&q),
        _ => rescale_big(x.value, dx).cmp(&rescale_big(y.value, dy)),
    }
}

/// `d - scale` for a `d`-digit value: `10^(e-1) <= |v| < 10^e`.
#[inline]
fn leading_exponent(x: Operand) -> i32 {
    digits_u128(x.value.unsigned_abs()) as i32 - x.scale
}

/// Smaller of the two; `a` on ties.
#[inline]
pub fn min(a: i64, b: i64, bits: ScaleBits) -> i64 {
    if compare(b, a, bits) == Ordering::Less {
        b
    } else {
        a
    }
}

/// Larger of the two; `a` on ties.
#[inline]
pub fn max(a: i64, b: i64, bits: ScaleBits) -> i64 {
    if compare(b, a, bits) == Ordering::Greater {
        b
    } else {
        a
    }
}

fn fit_or_sentinel(value: i128, scale: i32, bits: ScaleBits, sentinel: i64) -> i64 {
    match fit_i128(value, scale, false, bits) {
        Some((value, scale)) => pack(value, scale, bits),
        None => {
            debug!("result not representable");
            sentinel
        },
    }
}

/// `-a`. Negating the most negative value drops a digit.
pub fn negate(a: i64, bits: ScaleBits, sentinel: i64) -> i64 {
    let x = Operand::decode(a, bits);
    fit_or_sentinel(-x.value, x.scale, bits, sentinel)
}

/// `|a|`.
pub fn abs(a: i64, bits: ScaleBits, sentinel: i64) -> i64 {
    let x = Operand::decode(a, bits);
    if x.value >= 0 {
        return a;
    }
    fit_or_sentinel(-x.value, x.scale, bits, sentinel)
}

/// -1, 0 or 1.
#[inline]
pub fn signum(a: i64, bits: ScaleBits) -> i32 {
    Operand::decode(a, bits).value.signum() as i32
}

/// Rescales `a` to exactly `scale`, rounding half-up when digits are removed.
/// Returns `sentinel` if `scale` is out of range or the value no longer fits.
pub fn set_scale(a: i64, scale: i32, bits: ScaleBits, sentinel: i64) -> i64 {
    let layout = bits.layout();
    if scale < layout.min_scale as i32 || scale > layout.max_scale as i32 {
        return sentinel;
    }

    let x = Operand::decode(a, bits);
    let value = if scale >= x.scale {
        rescale_small(x.value, (scale - x.scale) as u32)
    } else {
        let rounded = round_half_up(x.value.unsigned_abs(), (x.scale - scale) as u32, false) as i128;
        Some(if x.value < 0 { -rounded } else { rounded })
    };

    match value {
        Some(v) if v >= layout.min_value as i128 && v <= layout.max_value as i128 => pack(v as i64, scale, bits),
        _ => {
            debug!(scale, "rescaled value not representable");
            sentinel
        },
    }
}
