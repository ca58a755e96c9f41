// ============================================================================
// Radix and Byte Conversion
// ============================================================================
//
// Parsing groups digits into the largest chunk whose value fits a word and
// folds each chunk in with one multiply-accumulate pass. Formatting divides by
// the same chunk base and emits digits least-significant first.

use super::division::div_rem_word_in_place;
use super::logical;
use super::magnitude::{mul_small_add, Words};
use super::BigInt;
use crate::errors::{NumericError, NumericResult};
use crate::fastmath;

pub(crate) const MIN_RADIX: u32 = 2;
pub(crate) const MAX_RADIX: u32 = 36;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Digits per word and `radix^digits`.
fn chunk(radix: u32) -> (usize, u32) {
    let mut len = 0;
    let mut base = 1u64;
    while base * radix as u64 <= u32::MAX as u64 {
        base *= radix as u64;
        len += 1;
    }
    (len, base as u32)
}

#[inline]
pub(crate) fn check_radix(radix: u32) -> NumericResult<()> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(NumericError::InvalidRadix(radix))
    }
}

/// Parse `[+-]digits` in the given radix. No whitespace, no separators.
pub(crate) fn parse(s: &str, radix: u32) -> NumericResult<BigInt> {
    check_radix(radix)?;

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return Err(NumericError::Format);
    }

    let bytes = digits.as_bytes();
    let (chunk_len, _) = chunk(radix);
    let bits_per_digit = fastmath::log2_u64(radix as u64) as usize + 1;
    let mut mag = Words::with_capacity(bytes.len() * bits_per_digit / 32 + 1);

    // The leading group absorbs the remainder so the rest are full chunks
    let mut end = match bytes.len() % chunk_len {
        0 => chunk_len,
        head => head,
    };
    let mut start = 0;
    while start < bytes.len() {
        let mut value = 0u32;
        let mut scale = 1u32;
        for &b in &bytes[start..end] {
            let digit = (b as char).to_digit(radix).ok_or(NumericError::Format)?;
            value = value * radix + digit;
            scale *= radix;
        }
        mul_small_add(&mut mag, scale, value);
        start = end;
        end += chunk_len;
    }

    Ok(BigInt::from_parts(negative, mag))
}

/// Digits of a magnitude in `radix`, without sign. Radix must be valid.
pub(crate) fn magnitude_to_string(mag: &[u32], radix: u32) -> String {
    if mag.is_empty() {
        return String::from("0");
    }

    let (chunk_len, base) = chunk(radix);
    let bits = super::magnitude::bit_length(mag) as usize;
    let mut digits: Vec<u8> = Vec::with_capacity(bits / fastmath::log2_u64(radix as u64) as usize + 1);
    let mut work = Words::from_slice(mag);

    while !work.is_empty() {
        let mut rem = div_rem_word_in_place(&mut work, base);
        if work.is_empty() {
            // Most significant chunk: no zero padding
            while rem != 0 {
                digits.push(DIGITS[(rem % radix) as usize]);
                rem /= radix;
            }
        } else {
            for _ in 0..chunk_len {
                digits.push(DIGITS[(rem % radix) as usize]);
                rem /= radix;
            }
        }
    }

    digits.iter().rev().map(|&d| d as char).collect()
}

// ============================================================================
// Byte Sequences (big-endian)
// ============================================================================

/// Packs big-endian bytes into words; a short leading chunk is filled with
/// `fill` bits.
fn be_words(bytes: &[u8], fill: u32) -> Words {
    let mut out = Words::with_capacity(bytes.len() / 4 + 1);
    for chunk in bytes.rchunks(4) {
        let mut w = fill;
        for &b in chunk {
            w = (w << 8) | b as u32;
        }
        out.push(w);
    }
    out
}

pub(crate) fn from_twos_complement_be(bytes: &[u8]) -> BigInt {
    let negative = bytes.first().is_some_and(|&b| b & 0x80 != 0);
    if negative {
        logical::from_twos_complement(be_words(bytes, u32::MAX))
    } else {
        BigInt::from_parts(false, be_words(bytes, 0))
    }
}

pub(crate) fn from_sign_magnitude_be(negative: bool, bytes: &[u8]) -> BigInt {
    BigInt::from_parts(negative, be_words(bytes, 0))
}

/// Shortest big-endian two's-complement encoding (at least one byte).
pub(crate) fn to_twos_complement_be(value: &BigInt) -> Vec<u8> {
    let words = logical::to_twos_complement(value, value.mag.len() + 1);
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for w in words.iter().rev() {
        bytes.extend_from_slice(&w.to_be_bytes());
    }

    let mut start = 0;
    while start + 1 < bytes.len() {
        let (head, next) = (bytes[start], bytes[start + 1]);
        let redundant = (head == 0x00 && next & 0x80 == 0) || (head == 0xff && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes.drain(..start);
    bytes
}
