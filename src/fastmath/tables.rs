// ============================================================================
// Power and Logarithm Tables
// ============================================================================

/// Largest `n` such that `10^n` fits in a `u128`.
pub const MAX_POW10_U128: u32 = 38;

/// Compute 10^n as u128 at compile time
const fn pow10(n: u32) -> u128 {
    let mut result: u128 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

const fn build_e10_u128() -> [u128; 39] {
    let mut table = [0u128; 39];
    let mut i = 0;
    while i < 39 {
        table[i] = pow10(i as u32);
        i += 1;
    }
    table
}

const fn build_e10_i64() -> [i64; 19] {
    let mut table = [0i64; 19];
    let mut i = 0;
    while i < 19 {
        table[i] = pow10(i as u32) as i64;
        i += 1;
    }
    table
}

/// `E10_U128[n] == 10^n` for n in 0..=38.
pub const E10_U128: [u128; 39] = build_e10_u128();

/// `E10_I64[n] == 10^n` for n in 0..=18.
pub const E10_I64: [i64; 19] = build_e10_i64();

/// 10^n as u128, or `None` past 10^38.
#[inline]
pub fn pow10_u128(n: u32) -> Option<u128> {
    E10_U128.get(n as usize).copied()
}

/// 10^n as i64, or `None` past 10^18.
#[inline]
pub fn pow10_i64(n: u32) -> Option<i64> {
    E10_I64.get(n as usize).copied()
}

/// Number of significant bits (0 for zero).
#[inline]
pub const fn bit_length_u64(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

/// Number of significant bits (0 for zero).
#[inline]
pub const fn bit_length_u128(x: u128) -> u32 {
    u128::BITS - x.leading_zeros()
}

/// Floor of log2(x); 0 for x <= 1.
#[inline]
pub const fn log2_u64(x: u64) -> u32 {
    if x == 0 {
        0
    } else {
        bit_length_u64(x) - 1
    }
}

/// Floor of log2(x); 0 for x <= 1.
#[inline]
pub const fn log2_u128(x: u128) -> u32 {
    if x == 0 {
        0
    } else {
        bit_length_u128(x) - 1
    }
}

/// Decimal digits needed to print `x` (1 for zero).
#[inline]
pub const fn digits_u64(x: u64) -> u32 {
    digits_u128(x as u128)
}

/// Decimal digits needed to print `x` (1 for zero).
///
/// 1233/4096 slightly underestimates log10(2), so the estimate is either exact
/// or one short; a single table lookup settles it.
#[inline]
pub const fn digits_u128(x: u128) -> u32 {
    if x == 0 {
        return 1;
    }
    let t = (bit_length_u128(x) * 1233) >> 12;
    if x >= E10_U128[t as usize] {
        t + 1
    } else {
        t
    }
}
