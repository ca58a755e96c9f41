// ============================================================================
// Bitwise Logic
// Infinite-width two's-complement semantics over sign/magnitude values
// ============================================================================
//
// Both operands are expanded to two's complement one word wider than the
// longer magnitude. That extra word is pure sign extension, so the top bit of
// the combined result is the sign of the infinite-width result.

use super::magnitude::Words;
use super::BigInt;
use smallvec::smallvec;

/// Word-wise boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicOp {
    And,
    Or,
    Xor,
    AndNot,
}

impl LogicOp {
    #[inline]
    fn apply(self, a: u32, b: u32) -> u32 {
        match self {
            LogicOp::And => a & b,
            LogicOp::Or => a | b,
            LogicOp::Xor => a ^ b,
            LogicOp::AndNot => a & !b,
        }
    }
}

/// Two's-complement words of `value`, sign-extended to `len` words.
pub(crate) fn to_twos_complement(value: &BigInt, len: usize) -> Words {
    debug_assert!(len > value.mag.len());
    let mut out: Words = smallvec![0; len];
    out[..value.mag.len()].copy_from_slice(&value.mag);
    if value.negative {
        for w in out.iter_mut() {
            *w = !*w;
        }
        increment(&mut out);
    }
    out
}

/// Reads `words` as a two's-complement number whose top bit is the sign.
pub(crate) fn from_twos_complement(mut words: Words) -> BigInt {
    let negative = words.last().is_some_and(|&w| w & 0x8000_0000 != 0);
    if negative {
        for w in words.iter_mut() {
            *w = !*w;
        }
        increment(&mut words);
    }
    BigInt::from_parts(negative, words)
}

#[inline]
fn increment(words: &mut [u32]) {
    for w in words.iter_mut() {
        let (sum, overflow) = w.overflowing_add(1);
        *w = sum;
        if !overflow {
            break;
        }
    }
}

pub(crate) fn bitwise(a: &BigInt, b: &BigInt, op: LogicOp) -> BigInt {
    let len = a.mag.len().max(b.mag.len()) + 1;
    let x = to_twos_complement(a, len);
    let y = to_twos_complement(b, len);
    let words: Words = x.iter().zip(y.iter()).map(|(&p, &q)| op.apply(p, q)).collect();
    from_twos_complement(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    const BOUNDARIES: [i64; 8] = [0, -1, 1, i64::MIN, i64::MAX, -4_294_967_296, 4_294_967_295, -42];

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_boundary_values_match_i64() {
        for &a in &BOUNDARIES {
            for &b in &BOUNDARIES {
                assert_eq!(big(a).and(&big(b)), big(a & b), "{} & {}", a, b);
                assert_eq!(big(a).or(&big(b)), big(a | b), "{} | {}", a, b);
                assert_eq!(big(a).xor(&big(b)), big(a ^ b), "{} ^ {}", a, b);
                assert_eq!(big(a).and_not(&big(b)), big(a & !b), "{} &! {}", a, b);
            }
            assert_eq!(big(a).not(), big(!a));
            assert_eq!(big(a).not().not(), big(a));
        }
    }

    #[test]
    fn test_sign_extension_of_shorter_operand() {
        // -1 has a one-word magnitude but behaves as all ones at every width
        let wide = BigInt::from(u128::MAX - 5);
        assert_eq!(wide.and(&big(-1)), wide);
        assert_eq!(wide.or(&big(-1)), big(-1));

        // -2^64 & (2^64 + 7) == 2^64
        let neg = BigInt::from(-(1i128 << 64));
        let pos = BigInt::from((1i128 << 64) + 7);
        assert_eq!(neg.and(&pos), BigInt::from(1i128 << 64));
    }

    #[test]
    fn test_twos_complement_round_trip() {
        for v in [0i128, 1, -1, i128::MIN + 1, i128::MAX, -(1i128 << 96)] {
            let value = BigInt::from(v);
            let words = to_twos_complement(&value, value.mag.len() + 1);
            assert_eq!(from_twos_complement(words), value);
        }
    }

    quickcheck! {
        fn prop_double_not_is_identity(x: i64) -> bool {
            big(x).not().not() == big(x)
        }

        fn prop_logic_matches_i128(a: i128, b: i128) -> bool {
            let (x, y) = (BigInt::from(a), BigInt::from(b));
            x.and(&y) == BigInt::from(a & b)
                && x.or(&y) == BigInt::from(a | b)
                && x.xor(&y) == BigInt::from(a ^ b)
                && x.and_not(&y) == BigInt::from(a & !b)
        }

        fn prop_de_morgan(a: i64, b: i64) -> bool {
            let (x, y) = (big(a), big(b));
            x.and(&y).not() == x.not().or(&y.not())
        }
    }
}
