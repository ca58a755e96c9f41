// ============================================================================
// Fit and Rounding
// Reduces an exact (value, scale) into a layout with round-half-up
// ============================================================================

use crate::bigint::BigInt;
use crate::fastmath::{digits_u128, pow10_u128, MAX_POW10_U128};
use crate::fixed_point::{Layout, ScaleBits};

/// Digits kept when a `BigInt` result is truncated into `u128` range. Any
/// layout keeps at most 19, so the fit that follows always rounds away at
/// least one more digit.
const TRUNCATED_DIGITS: u64 = 36;

/// `mag / 10^drop` rounded half-up. `carry` says the exact value sits at or
/// past the midpoint above `mag`, and only matters when nothing is dropped.
#[inline]
pub(crate) fn round_half_up(mag: u128, drop: u32, carry: bool) -> u128 {
    if drop == 0 {
        return mag + carry as u128;
    }
    match pow10_u128(drop) {
        Some(divisor) => {
            let q = mag / divisor;
            let r = mag % divisor;
            if r >= divisor / 2 {
                q + 1
            } else {
                q
            }
        },
        // mag < 2^128 < 10^39 / 2
        None => 0,
    }
}

#[inline]
fn limit(layout: &Layout, negative: bool) -> u128 {
    if negative {
        layout.min_value.unsigned_abs() as u128
    } else {
        layout.max_value as u128
    }
}

#[inline]
fn signed(negative: bool, mag: u128) -> i64 {
    let v = mag as i128;
    (if negative { -v } else { v }) as i64
}

/// Fits `±mag * 10^-scale` into `bits`. `None` means no representation
/// exists: the value is too large for any admissible scale.
pub(crate) fn fit(
    negative: bool,
    mag: u128,
    scale: i32,
    carry: bool,
    bits: ScaleBits,
) -> Option<(i64, i32)> {
    let layout = bits.layout();
    let (min_scale, max_scale) = (layout.min_scale as i32, layout.max_scale as i32);

    if mag == 0 && !carry {
        return Some((0, scale.clamp(min_scale, max_scale)));
    }

    let limit = limit(layout, negative);

    if scale < min_scale {
        // Exact values only need zeros appended; a carry means the value was
        // already rounded at this position.
        let up = (min_scale - scale) as u32;
        let mag = mag + carry as u128;
        return pow10_u128(up)
            .and_then(|p| mag.checked_mul(p))
            .filter(|&m| m <= limit)
            .map(|m| (signed(negative, m), min_scale));
    }

    let mut drop = (scale - max_scale).max(0) as u32;
    drop = drop.max(digits_u128(mag).saturating_sub(layout.max_digits));
    loop {
        let result_scale = scale - drop as i32;
        if result_scale < min_scale {
            return None;
        }
        let rounded = round_half_up(mag, drop, carry);
        if rounded == 0 {
            return Some((0, result_scale.clamp(min_scale, max_scale)));
        }
        if rounded <= limit {
            return Some((signed(negative, rounded), result_scale));
        }
        drop += 1;
    }
}

/// Fits an exact `i128` value.
#[inline]
pub(crate) fn fit_i128(value: i128, scale: i32, carry: bool, bits: ScaleBits) -> Option<(i64, i32)> {
    fit(value < 0, value.unsigned_abs(), scale, carry, bits)
}

/// Fits `±mag` where `mag` is an exact `BigInt` magnitude. Anything beyond
/// `u128` is first truncated to a fixed number of digits; the half-up fit
/// that follows drops further digits, so the truncation never changes the
/// rounded result.
pub(crate) fn fit_big(
    negative: bool,
    mut mag: BigInt,
    scale: i32,
    carry: bool,
    bits: ScaleBits,
) -> Option<(i64, i32)> {
    debug_assert!(!mag.is_negative());
    if let Some(m) = mag.to_u128() {
        return fit(negative, m, scale, carry, bits);
    }

    // Lower bound on the digit count: floor((bitlen - 1) * log10(2)) + 1
    let digits = (((mag.bit_length() - 1) * 1233) >> 12) + 1;
    let mut dropped = digits.saturating_sub(TRUNCATED_DIGITS);
    let exp = u32::try_from(dropped).ok()?;
    mag.div_in_place(&BigInt::pow10(exp));
    let m = loop {
        match mag.to_u128() {
            Some(m) if digits_u128(m) <= MAX_POW10_U128 => break m,
            _ => {
                mag.div_small_in_place(10);
                dropped += 1;
            },
        }
    };

    let scale = i32::try_from(i64::from(scale) - dropped as i64).ok()?;
    fit(negative, m, scale, false, bits)
}
