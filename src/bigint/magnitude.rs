// ============================================================================
// Magnitude Primitives
// Word-slice arithmetic on unsigned little-endian u32 limbs
// ============================================================================
//
// Inputs may carry most-significant zero words; every function that returns
// `Words` returns them trimmed.

use crate::config::MIN_KARATSUBA_THRESHOLD;
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;

/// Limb storage. Values up to 128 bits stay inline.
pub(crate) type Words = SmallVec<[u32; 4]>;

pub(crate) const WORD_BITS: u32 = u32::BITS;

/// Drop most-significant zero words.
#[inline]
pub(crate) fn trim(words: &mut Words) {
    while words.last() == Some(&0) {
        words.pop();
    }
}

#[inline]
pub(crate) fn trimmed(a: &[u32]) -> &[u32] {
    let mut len = a.len();
    while len > 0 && a[len - 1] == 0 {
        len -= 1;
    }
    &a[..len]
}

/// Numeric comparison of two magnitudes.
pub(crate) fn cmp(a: &[u32], b: &[u32]) -> Ordering {
    let a = trimmed(a);
    let b = trimmed(b);
    a.len()
        .cmp(&b.len())
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

/// Number of significant bits.
pub(crate) fn bit_length(a: &[u32]) -> u64 {
    let a = trimmed(a);
    match a.last() {
        None => 0,
        Some(&top) => (a.len() as u64 - 1) * WORD_BITS as u64 + (WORD_BITS - top.leading_zeros()) as u64,
    }
}

/// True when any bit below position `bits` is set.
pub(crate) fn has_low_bits(a: &[u32], bits: u64) -> bool {
    let full = (bits / WORD_BITS as u64) as usize;
    let rem = (bits % WORD_BITS as u64) as u32;
    if a.iter().take(full).any(|&w| w != 0) {
        return true;
    }
    rem != 0 && a.get(full).is_some_and(|&w| w & ((1u32 << rem) - 1) != 0)
}

// ============================================================================
// Addition and Subtraction
// ============================================================================

pub(crate) fn add(a: &[u32], b: &[u32]) -> Words {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Words::with_capacity(long.len() + 1);
    let mut carry = 0u64;
    for (i, &w) in long.iter().enumerate() {
        let sum = w as u64 + short.get(i).copied().unwrap_or(0) as u64 + carry;
        out.push(sum as u32);
        carry = sum >> WORD_BITS;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    trim(&mut out);
    out
}

#[inline]
pub(crate) fn add_assign(a: &mut Words, b: &[u32]) {
    add_assign_shifted(a, b, 0);
}

/// Computes `a += b << (32 * shift)`.
pub(crate) fn add_assign_shifted(a: &mut Words, b: &[u32], shift: usize) {
    let b = trimmed(b);
    if b.is_empty() {
        return;
    }
    if a.len() < shift + b.len() {
        a.resize(shift + b.len(), 0);
    }

    let mut carry = 0u64;
    for (i, &w) in b.iter().enumerate() {
        let sum = a[shift + i] as u64 + w as u64 + carry;
        a[shift + i] = sum as u32;
        carry = sum >> WORD_BITS;
    }

    let mut i = shift + b.len();
    while carry != 0 {
        if i == a.len() {
            a.push(carry as u32);
            break;
        }
        let sum = a[i] as u64 + carry;
        a[i] = sum as u32;
        carry = sum >> WORD_BITS;
        i += 1;
    }
    trim(a);
}

/// `a - b`; requires `a >= b`.
pub(crate) fn sub(a: &[u32], b: &[u32]) -> Words {
    let mut out = Words::from_slice(trimmed(a));
    sub_assign(&mut out, b);
    out
}

/// `a -= b`; requires `a >= b`.
pub(crate) fn sub_assign(a: &mut Words, b: &[u32]) {
    let b = trimmed(b);
    debug_assert!(cmp(a, b) != Ordering::Less, "magnitude subtraction underflow");

    let mut borrow = 0i64;
    for (i, &w) in b.iter().enumerate() {
        let diff = a[i] as i64 - w as i64 - borrow;
        a[i] = diff as u32;
        borrow = (diff < 0) as i64;
    }

    let mut i = b.len();
    while borrow != 0 && i < a.len() {
        let diff = a[i] as i64 - borrow;
        a[i] = diff as u32;
        borrow = (diff < 0) as i64;
        i += 1;
    }
    trim(a);
}

// ============================================================================
// Multiplication
// ============================================================================

/// `a * m + add`, in place. Used by radix parsing.
pub(crate) fn mul_small_add(a: &mut Words, m: u32, add: u32) {
    let mut carry = add as u64;
    for w in a.iter_mut() {
        let t = *w as u64 * m as u64 + carry;
        *w = t as u32;
        carry = t >> WORD_BITS;
    }
    if carry != 0 {
        a.push(carry as u32);
    }
    trim(a);
}

/// Product of two magnitudes, switching to Karatsuba once both operands reach
/// `karatsuba_threshold` words.
pub(crate) fn mul(a: &[u32], b: &[u32], karatsuba_threshold: usize) -> Words {
    let a = trimmed(a);
    let b = trimmed(b);
    if a.is_empty() || b.is_empty() {
        return Words::new();
    }

    let threshold = karatsuba_threshold.max(MIN_KARATSUBA_THRESHOLD);
    if a.len() < threshold || b.len() < threshold {
        mul_schoolbook(a, b)
    } else {
        mul_karatsuba(a, b, threshold)
    }
}

pub(crate) fn mul_schoolbook(a: &[u32], b: &[u32]) -> Words {
    let mut out: Words = smallvec![0; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        let mut carry = 0u64;
        for (j, &y) in b.iter().enumerate() {
            let t = x as u64 * y as u64 + out[i + j] as u64 + carry;
            out[i + j] = t as u32;
            carry = t >> WORD_BITS;
        }
        out[i + b.len()] = carry as u32;
    }
    trim(&mut out);
    out
}

/// z0 + (z1 << m) + (z2 << 2m) with z1 = (a0 + a1)(b0 + b1) - z0 - z2.
fn mul_karatsuba(a: &[u32], b: &[u32], threshold: usize) -> Words {
    let m = a.len().max(b.len()) / 2;
    let (a_low, a_high) = split(a, m);
    let (b_low, b_high) = split(b, m);

    let z0 = mul(a_low, b_low, threshold);
    let z2 = mul(a_high, b_high, threshold);

    let a_sum = add(a_low, a_high);
    let b_sum = add(b_low, b_high);
    let mut z1 = mul(&a_sum, &b_sum, threshold);
    sub_assign(&mut z1, &z0);
    sub_assign(&mut z1, &z2);

    let mut out = z0;
    out.reserve((a.len() + b.len()).saturating_sub(out.len()));
    add_assign_shifted(&mut out, &z1, m);
    add_assign_shifted(&mut out, &z2, 2 * m);
    out
}

#[inline]
fn split(x: &[u32], m: usize) -> (&[u32], &[u32]) {
    if x.len() > m {
        x.split_at(m)
    } else {
        (x, &[])
    }
}

// ============================================================================
// Shifts
// ============================================================================

pub(crate) fn shl(a: &[u32], bits: u64) -> Words {
    let a = trimmed(a);
    if a.is_empty() {
        return Words::new();
    }
    let words = (bits / WORD_BITS as u64) as usize;
    let rem = (bits % WORD_BITS as u64) as u32;

    let mut out: Words = smallvec![0; words];
    out.reserve(a.len() + 1);
    if rem == 0 {
        out.extend_from_slice(a);
    } else {
        let mut carry = 0u32;
        for &w in a {
            out.push((w << rem) | carry);
            carry = w >> (WORD_BITS - rem);
        }
        if carry != 0 {
            out.push(carry);
        }
    }
    out
}

/// Logical right shift (truncates toward zero).
pub(crate) fn shr(a: &[u32], bits: u64) -> Words {
    let a = trimmed(a);
    let words = (bits / WORD_BITS as u64) as usize;
    if words >= a.len() {
        return Words::new();
    }
    let rem = (bits % WORD_BITS as u64) as u32;
    let src = &a[words..];

    let mut out = Words::with_capacity(src.len());
    if rem == 0 {
        out.extend_from_slice(src);
    } else {
        for (i, &w) in src.iter().enumerate() {
            let high = src.get(i + 1).copied().unwrap_or(0);
            out.push((w >> rem) | (high << (WORD_BITS - rem)));
        }
    }
    trim(&mut out);
    out
}
