// ============================================================================
// Decimal Text
// Plain-notation formatting and parsing of packed words
// ============================================================================

use super::fit::{fit, fit_big};
use crate::bigint::BigInt;
use crate::errors::{NumericError, NumericResult};
use crate::fastmath::MAX_POW10_U128;
use crate::fixed_point::{decode_scale, decode_value, pack, ScaleBits};
use arrayvec::ArrayVec;
use std::fmt;
use tracing::debug;

/// Lazily formats a packed word in plain notation (no exponent).
///
/// `(12345, 2)` renders as `123.45`, `(5, 3)` as `0.005`, `(12, -3)` as
/// `12000`.
#[derive(Debug, Clone, Copy)]
pub struct DecimalDisplay {
    word: i64,
    bits: ScaleBits,
}

impl DecimalDisplay {
    pub fn new(word: i64, bits: ScaleBits) -> Self {
        Self { word, bits }
    }
}

impl fmt::Display for DecimalDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = decode_value(self.word, self.bits);
        let scale = decode_scale(self.word, self.bits) as i32;

        // u64::MAX has 20 digits
        let mut digits: ArrayVec<u8, 20> = ArrayVec::new();
        let mut rest = value.unsigned_abs();
        loop {
            digits.push(b'0' + (rest % 10) as u8);
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        digits.reverse();
        let digits = std::str::from_utf8(&digits).map_err(|_| fmt::Error)?;

        if value < 0 {
            f.write_str("-")?;
        }
        if value == 0 && scale <= 0 {
            return f.write_str("0");
        }
        if scale <= 0 {
            f.write_str(digits)?;
            for _ in 0..-scale {
                f.write_str("0")?;
            }
            return Ok(());
        }

        let scale = scale as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int, frac)
        } else {
            f.write_str("0.")?;
            for _ in 0..scale - digits.len() {
                f.write_str("0")?;
            }
            f.write_str(digits)
        }
    }
}

/// Plain-notation string of a packed word.
pub fn to_string(word: i64, bits: ScaleBits) -> String {
    DecimalDisplay::new(word, bits).to_string()
}

/// Parses `[+-]digits[.digits][(e|E)[+-]digits]` into a packed word.
///
/// At least one mantissa digit is required. Values with more digits than
/// the layout holds are rounded half-up.
///
/// # Errors
/// Returns `Format` for malformed input. Well-formed input that has no
/// representation (too large, scale out of range) yields `Ok(sentinel)`.
pub fn parse(s: &str, bits: ScaleBits, sentinel: i64) -> NumericResult<i64> {
    let parsed = Mantissa::scan(s).ok_or_else(|| {
        debug!(input = s, "rejected decimal string");
        NumericError::Format
    })?;

    let fitted = match parsed.digits_as_u128() {
        Some(mag) => fit(parsed.negative, mag, parsed.scale, false, bits),
        None => {
            let mag: BigInt = parsed.digits.parse()?;
            fit_big(parsed.negative, mag, parsed.scale, false, bits)
        },
    };

    match fitted {
        Some((value, scale)) => Ok(pack(value, scale, bits)),
        None => {
            debug!(input = s, "decimal string not representable");
            Ok(sentinel)
        },
    }
}

const SCALE_CLAMP: (i64, i64) = (i32::MIN as i64 / 2, i32::MAX as i64 / 2);

/// Validated pieces of a decimal string.
struct Mantissa {
    negative: bool,
    /// Integer and fraction digits, point removed
    digits: String,
    /// Fraction length minus exponent, clamped well inside `i32`
    scale: i32,
}

impl Mantissa {
    fn scan(s: &str) -> Option<Self> {
        let (negative, body) = match s.as_bytes().first()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let (int, frac) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        let all_digits = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
        if int.len() + frac.len() == 0 || !all_digits(int) || !all_digits(frac) {
            return None;
        }

        let exponent = match exponent {
            Some(e) => parse_exponent(e)?,
            None => 0,
        };
        // Past the clamp the value either rounds to zero or cannot fit at all
        let scale = (frac.len() as i64 - exponent).clamp(SCALE_CLAMP.0, SCALE_CLAMP.1) as i32;

        let mut digits = String::with_capacity(int.len() + frac.len());
        digits.push_str(int);
        digits.push_str(frac);
        Some(Self {
            negative,
            digits,
            scale,
        })
    }

    fn digits_as_u128(&self) -> Option<u128> {
        let significant = self.digits.trim_start_matches('0');
        if significant.len() > MAX_POW10_U128 as usize {
            return None;
        }
        Some(significant.bytes().fold(0u128, |acc, b| acc * 10 + (b - b'0') as u128))
    }
}

/// Signed exponent, saturated far beyond any representable scale.
fn parse_exponent(e: &str) -> Option<i64> {
    const SATURATE: i64 = 1 << 40;
    let (negative, digits) = match e.as_bytes().first()? {
        b'-' => (true, &e[1..]),
        b'+' => (false, &e[1..]),
        _ => (false, e),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits
        .bytes()
        .fold(0i64, |acc, b| (acc * 10 + (b - b'0') as i64).min(SATURATE));
    Some(if negative { -magnitude } else { magnitude })
}
