// ============================================================================
// Magnitude Division
// Single-word division and Knuth Algorithm D
// ============================================================================

use super::magnitude::{self, trim, trimmed, Words, WORD_BITS};
use smallvec::smallvec;
use std::cmp::Ordering;

const BASE: u64 = 1 << WORD_BITS;

/// Divides `a` in place by a single nonzero word, returning the remainder.
pub(crate) fn div_rem_word_in_place(a: &mut Words, divisor: u32) -> u32 {
    debug_assert!(divisor != 0);
    let d = divisor as u64;
    let mut rem = 0u64;
    for w in a.iter_mut().rev() {
        let cur = (rem << WORD_BITS) | *w as u64;
        *w = (cur / d) as u32;
        rem = cur % d;
    }
    trim(a);
    rem as u32
}

/// Truncating quotient and remainder of two magnitudes. `b` must be nonzero.
pub(crate) fn div_rem(a: &[u32], b: &[u32]) -> (Words, Words) {
    let a = trimmed(a);
    let b = trimmed(b);
    debug_assert!(!b.is_empty(), "magnitude division by zero");

    if magnitude::cmp(a, b) == Ordering::Less {
        return (Words::new(), Words::from_slice(a));
    }
    if b.len() == 1 {
        let mut q = Words::from_slice(a);
        let r = div_rem_word_in_place(&mut q, b[0]);
        let rem: Words = if r == 0 { Words::new() } else { smallvec![r] };
        return (q, rem);
    }
    knuth_div_rem(a, b)
}

/// Knuth, TAOCP vol. 2, 4.3.1 Algorithm D. Requires `b.len() >= 2` and
/// `a >= b`, both trimmed.
fn knuth_div_rem(a: &[u32], b: &[u32]) -> (Words, Words) {
    let n = b.len();
    let m = a.len() - n;

    // D1: normalize so the divisor's top word has its high bit set
    let shift = b[n - 1].leading_zeros() as u64;
    let v = magnitude::shl(b, shift);
    let mut u = magnitude::shl(a, shift);
    u.resize(a.len() + 1, 0);

    let v_top = v[n - 1] as u64;
    let v_next = v[n - 2] as u64;
    let mut q: Words = smallvec![0; m + 1];

    for j in (0..=m).rev() {
        // D3: estimate q_hat from the top two dividend words
        let numerator = ((u[j + n] as u64) << WORD_BITS) | u[j + n - 1] as u64;
        let mut q_hat = numerator / v_top;
        let mut r_hat = numerator % v_top;
        while q_hat >= BASE || q_hat * v_next > ((r_hat << WORD_BITS) | u[j + n - 2] as u64) {
            q_hat -= 1;
            r_hat += v_top;
            if r_hat >= BASE {
                break;
            }
        }

        // D4: multiply and subtract
        let mut borrow = 0i64;
        let mut carry = 0u64;
        for i in 0..n {
            let product = q_hat * v[i] as u64 + carry;
            carry = product >> WORD_BITS;
            let diff = u[i + j] as i64 - borrow - (product & 0xffff_ffff) as i64;
            u[i + j] = diff as u32;
            borrow = (diff < 0) as i64;
        }
        let top = u[j + n] as i64 - borrow - carry as i64;
        u[j + n] = top as u32;

        // D6: the estimate was one too large, add the divisor back
        if top < 0 {
            q_hat -= 1;
            let mut carry = 0u64;
            for i in 0..n {
                let sum = u[i + j] as u64 + v[i] as u64 + carry;
                u[i + j] = sum as u32;
                carry = sum >> WORD_BITS;
            }
            u[j + n] = u[j + n].wrapping_add(carry as u32);
        }

        q[j] = q_hat as u32;
    }

    // D8: unnormalize the remainder
    let rem = magnitude::shr(&u[..n], shift);
    trim(&mut q);
    (q, rem)
}
