// ============================================================================
// Decimal Codec
// Packs (value, scale) into one i64: value in the high bits, scale in the low
// ============================================================================

use super::layout::ScaleBits;

/// Packs `value` and `scale`, or returns `sentinel` if either is out of range
/// for `bits`.
///
/// # Example
/// ```
/// use decimal_engine::fixed_point::{decode_scale, decode_value, encode, ScaleBits};
///
/// let bits = ScaleBits::new(3).unwrap();
/// let word = encode(415_720_947_668_033_403, -1, bits, i64::MIN);
/// assert_eq!(decode_value(word, bits), 415_720_947_668_033_403);
/// assert_eq!(decode_scale(word, bits), -1);
/// ```
#[inline]
pub fn encode(value: i64, scale: i32, bits: ScaleBits, sentinel: i64) -> i64 {
    let layout = bits.layout();
    if value < layout.min_value
        || value > layout.max_value
        || scale < layout.min_scale as i32
        || scale > layout.max_scale as i32
    {
        return sentinel;
    }
    pack(value, scale, bits)
}

/// Packs without range checks. Callers guarantee both fields fit.
#[inline]
pub(crate) fn pack(value: i64, scale: i32, bits: ScaleBits) -> i64 {
    let layout = bits.layout();
    debug_assert!(value >= layout.min_value && value <= layout.max_value);
    debug_assert!(scale >= layout.min_scale as i32 && scale <= layout.max_scale as i32);
    (value << bits.get()) | ((scale as i64) & layout.scale_mask as i64)
}

/// Unscaled value of a packed word (arithmetic shift keeps the sign).
#[inline]
pub fn decode_value(word: i64, bits: ScaleBits) -> i64 {
    word >> bits.get()
}

/// Scale of a packed word, sign-extended from the low `bits` bits.
#[inline]
pub fn decode_scale(word: i64, bits: ScaleBits) -> i16 {
    match bits.get() {
        0 => 0,
        b => {
            let shift = 64 - b as u32;
            ((word << shift) >> shift) as i16
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SENTINEL: i64 = 0x5eed_5eed_5eed_5eed;

    fn bits(b: u8) -> ScaleBits {
        ScaleBits::new(b).unwrap()
    }

    #[test]
    fn test_known_vector() {
        let b = bits(3);
        let word = encode(415_720_947_668_033_403, -1, b, SENTINEL);
        assert_ne!(word, SENTINEL);
        assert_eq!(decode_value(word, b), 415_720_947_668_033_403);
        assert_eq!(decode_scale(word, b), -1);
    }

    #[test]
    fn test_overflow_boundary() {
        for b in ScaleBits::all() {
            let l = b.layout();
            assert_ne!(encode(l.max_value, 0, b, SENTINEL), SENTINEL);
            assert_ne!(encode(l.min_value, 0, b, SENTINEL), SENTINEL);
            if b.get() > 0 {
                assert_eq!(encode(l.max_value + 1, 0, b, SENTINEL), SENTINEL);
                assert_eq!(encode(l.min_value - 1, 0, b, SENTINEL), SENTINEL);
            }
            assert_eq!(encode(0, l.max_scale as i32 + 1, b, SENTINEL), SENTINEL);
            assert_eq!(encode(0, l.min_scale as i32 - 1, b, SENTINEL), SENTINEL);
        }
    }

    #[test]
    fn test_zero_bits_is_plain_integer() {
        let b = bits(0);
        assert_eq!(encode(-42, 0, b, SENTINEL), -42);
        assert_eq!(encode(1, 1, b, SENTINEL), SENTINEL);
        assert_eq!(decode_scale(i64::MIN, b), 0);
        assert_eq!(decode_value(i64::MIN, b), i64::MIN);
    }

    #[test]
    fn test_extreme_fields() {
        let b = bits(15);
        let l = b.layout();
        let word = encode(l.min_value, l.min_scale as i32, b, SENTINEL);
        assert_eq!(decode_value(word, b), l.min_value);
        assert_eq!(decode_scale(word, b), l.min_scale);

        let word = encode(-1, l.max_scale as i32, b, SENTINEL);
        assert_eq!(decode_value(word, b), -1);
        assert_eq!(decode_scale(word, b), l.max_scale);
    }

    fn in_range() -> impl Strategy<Value = (ScaleBits, i64, i32)> {
        (0u8..=15).prop_flat_map(|b| {
            let l = *bits(b).layout();
            (
                Just(bits(b)),
                l.min_value..=l.max_value,
                l.min_scale as i32..=l.max_scale as i32,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip((b, value, scale) in in_range()) {
            let word = encode(value, scale, b, SENTINEL);
            prop_assert_eq!(decode_value(word, b), value);
            prop_assert_eq!(decode_scale(word, b) as i32, scale);
        }
    }
}
