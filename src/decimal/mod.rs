// ============================================================================
// Decimal Module
// Arithmetic directly on packed 64-bit decimal words
// ============================================================================
//
// This module provides:
// - DecimalOperation: add/subtract/multiply/divide sharing one core loop
// - compare, min/max, negate, abs, signum, set_scale
// - plain-notation formatting and parsing
// - rust_decimal conversion for API boundaries
//
// Every operation decodes its operands, computes exactly in i128, falls back
// to BigInt when i128 overflows, and fits the result back into the layout
// with round-half-up. Results with no representation come back as the
// caller's sentinel.

mod arithmetic;
mod fit;
mod format;
mod interop;
mod operation;

pub use arithmetic::{abs, add, compare, divide, max, min, multiply, negate, set_scale, signum, subtract};
pub use format::{parse, to_string, DecimalDisplay};
pub use interop::{from_rust_decimal, to_rust_decimal};
pub use operation::DecimalOperation;
