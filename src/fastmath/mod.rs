// ============================================================================
// FastMath Module
// Precomputed tables and integer helpers shared by the layout and codec
// ============================================================================
//
// This module provides:
// - E10_U128 / E10_I64: powers of ten, evaluated at compile time
// - log2 / bit-length helpers for u64 and u128
// - decimal digit counts for u64 and u128
//
// Everything here is const or a pure function over a const table, so the
// tables exist before the first call and never change afterwards.

mod tables;

pub use tables::{
    bit_length_u128, bit_length_u64, digits_u128, digits_u64, log2_u128, log2_u64, pow10_i64,
    pow10_u128, E10_I64, E10_U128, MAX_POW10_U128,
};
