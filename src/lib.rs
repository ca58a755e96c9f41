// ============================================================================
// Decimal Engine Library
// Arbitrary-precision integers and packed 64-bit fixed-point decimals
// ============================================================================

//! # Decimal Engine
//!
//! Two numeric engines that share one crate:
//!
//! ## Features
//!
//! - **`BigInt`**: arbitrary-precision signed integers with schoolbook and
//!   Karatsuba multiplication, Knuth division, two's-complement bitwise logic
//!   and radix 2..=36 conversion
//! - **Packed decimals**: a value and a decimal scale in a single `i64`, with
//!   a caller-chosen split between value bits and scale bits
//! - **Fast path first**: decimal arithmetic runs in `i128` and only falls
//!   back to `BigInt` when that would overflow
//! - **Sentinel results**: overflow and division by zero return a value the
//!   caller picks, so the hot path never allocates an error
//!
//! ## Example
//!
//! ```rust
//! use decimal_engine::prelude::*;
//!
//! // 8 scale bits: values up to 2^55, scales -128..=127
//! let bits = ScaleBits::new(8).unwrap();
//! let price = encode(12_345, 2, bits, i64::MIN); // 123.45
//! let qty = encode(3, 0, bits, i64::MIN);
//!
//! let total = decimal::multiply(price, qty, bits, i64::MIN);
//! assert_eq!(decimal::to_string(total, bits), "370.35");
//!
//! let third = decimal::divide(encode(1, 0, bits, i64::MIN), qty, bits, i64::MIN);
//! assert_eq!(decimal::to_string(third, bits), "0.33333333333333333");
//!
//! let big: BigInt = "123456789012345678901234567890".parse().unwrap();
//! assert_eq!((&big * &big).to_string_radix(16).unwrap().len(), 49);
//! ```

pub mod bigint;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod fastmath;
pub mod fixed_point;

// Re-exports for convenience
pub mod prelude {
    pub use crate::bigint::BigInt;
    pub use crate::config::{DecimalContext, MultiplyConfig};
    pub use crate::decimal::{self, DecimalDisplay, DecimalOperation};
    pub use crate::errors::{NumericError, NumericResult};
    pub use crate::fixed_point::{decode_scale, decode_value, encode, Layout, ScaleBits};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::cmp::Ordering;

    const SENTINEL: i64 = 0x0bad_cafe_0bad_cafe;

    #[test]
    fn test_ledger_round_trip() {
        let ctx = DecimalContext::new(6, SENTINEL).unwrap();
        ctx.validate().unwrap();

        let prices = ["19.99", "0.05", "1250", "-3.5"];
        let mut total = ctx.encode(0, 0);
        for p in prices {
            let word = ctx.parse(p).unwrap();
            assert_eq!(ctx.to_string(word), p);
            total = ctx.add(total, word);
        }
        assert_eq!(ctx.to_string(total), "1266.54");

        let average = ctx.divide(total, ctx.encode(prices.len() as i64, 0));
        assert_eq!(ctx.to_string(average), "316.635");
        assert_eq!(ctx.compare(average, ctx.parse("316.635000").unwrap()), Ordering::Equal);
    }

    #[test]
    fn test_decimal_fallback_agrees_with_bigint() {
        // 1e40 + 1e-40 has no i128 form at a common scale
        let bits = ScaleBits::new(8).unwrap();
        let a = encode(1, -40, bits, SENTINEL);
        let b = encode(1, 40, bits, SENTINEL);
        let sum = decimal::add(a, b, bits, SENTINEL);

        let value = BigInt::from(decode_value(sum, bits));
        let scale = decode_scale(sum, bits);
        assert!(scale < 0);
        let expanded = &value * &BigInt::pow10(scale.unsigned_abs() as u32);
        assert_eq!(expanded, BigInt::pow10(40));
    }

    #[test]
    fn test_every_layout_handles_division_by_zero() {
        for bits in ScaleBits::all() {
            let one = encode(1, 0, bits, SENTINEL);
            let zero = encode(0, 0, bits, SENTINEL);
            assert_eq!(decimal::divide(one, zero, bits, SENTINEL), SENTINEL);
            assert_eq!(BigInt::from(1).div_or(&BigInt::zero(), BigInt::from(-1)), BigInt::from(-1));
        }
    }

    #[test]
    fn test_operation_enum_matches_functions() {
        let bits = ScaleBits::new(4).unwrap();
        let a = encode(75, 1, bits, SENTINEL);
        let b = encode(-2, 0, bits, SENTINEL);
        type Binary = fn(i64, i64, ScaleBits, i64) -> i64;
        let ops = [
            (DecimalOperation::Add, decimal::add as Binary),
            (DecimalOperation::Subtract, decimal::subtract as Binary),
            (DecimalOperation::Multiply, decimal::multiply as Binary),
            (DecimalOperation::Divide, decimal::divide as Binary),
        ];
        for (op, f) in ops {
            assert_eq!(op.apply(a, b, bits, SENTINEL), f(a, b, bits, SENTINEL), "{:?}", op);
        }
        assert_eq!(format!("{}", DecimalDisplay::new(decimal::divide(a, b, bits, SENTINEL), bits)), "-3.75");
    }
}
