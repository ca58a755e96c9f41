// ============================================================================
// BigInt Module
// Arbitrary-precision signed integers over 32-bit limbs
// ============================================================================
//
// Representation: sign flag + magnitude (little-endian u32 words, no
// most-significant zero word, zero is empty and never negative).
//
// Every operation comes in two families:
// - pure: `&self` methods and operators on references, returning a new value
// - in-place: `&mut self` methods and `*Assign` operators, which replace the
//   receiver's magnitude and leave the argument untouched
//
// Division by zero is never a panic. Callers pick the sentinel (`div_or`),
// get `None` (`div_rem`), or keep the receiver unchanged (`div_in_place`).

mod division;
mod logical;
pub(crate) mod magnitude;
mod radix;

use crate::config::MultiplyConfig;
use crate::errors::NumericResult;
use logical::LogicOp;
use magnitude::Words;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div, DivAssign,
    Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
};
use std::str::FromStr;

/// Arbitrary-precision signed integer.
///
/// # Example
/// ```
/// use decimal_engine::bigint::BigInt;
///
/// let a: BigInt = "123456789012345678901234567890".parse().unwrap();
/// let b = BigInt::from(-3);
/// assert_eq!((&a * &b).to_string(), "-370370367037037036703703703670");
/// assert_eq!(a.div_or(&BigInt::zero(), BigInt::from(-1)), BigInt::from(-1));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    mag: Words,
}

// ============================================================================
// Construction
// ============================================================================

impl BigInt {
    /// Canonicalizing constructor used by every code path that builds a value.
    pub(crate) fn from_parts(negative: bool, mut mag: Words) -> Self {
        magnitude::trim(&mut mag);
        Self {
            negative: negative && !mag.is_empty(),
            mag,
        }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn one() -> Self {
        Self::from(1u32)
    }

    /// Parse a string of `[+-]digits` in radix 2..=36.
    ///
    /// # Errors
    /// `InvalidRadix` for an unsupported radix, `Format` for anything else
    /// that is not a number.
    pub fn from_str_radix(s: &str, radix: u32) -> NumericResult<Self> {
        radix::parse(s, radix).inspect_err(|err| {
            tracing::debug!(radix, error = %err, "rejected integer string");
        })
    }

    /// Interpret big-endian bytes as a two's-complement integer.
    pub fn from_twos_complement_be(bytes: &[u8]) -> Self {
        radix::from_twos_complement_be(bytes)
    }

    /// Interpret big-endian bytes as an unsigned magnitude with an explicit sign.
    pub fn from_sign_magnitude_be(negative: bool, bytes: &[u8]) -> Self {
        radix::from_sign_magnitude_be(negative, bytes)
    }

    /// `10^exp`.
    pub fn pow10(exp: u32) -> Self {
        // 10^n = 5^n * 2^n; the power of two is a free shift
        let mut value = Self::from(5u32).pow(exp);
        value.shl_in_place(exp as u64);
        value
    }
}

impl From<u128> for BigInt {
    fn from(value: u128) -> Self {
        let mut mag = Words::new();
        let mut rest = value;
        while rest != 0 {
            mag.push(rest as u32);
            rest >>= magnitude::WORD_BITS;
        }
        Self::from_parts(false, mag)
    }
}

impl From<i128> for BigInt {
    fn from(value: i128) -> Self {
        let mut out = Self::from(value.unsigned_abs());
        out.negative = value < 0;
        out
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty => $via:ty),*) => {
        $(
            impl From<$t> for BigInt {
                #[inline]
                fn from(value: $t) -> Self {
                    Self::from(value as $via)
                }
            }
        )*
    };
}

impl_from_primitive!(i8 => i128, i16 => i128, i32 => i128, i64 => i128, u8 => u128, u16 => u128, u32 => u128, u64 => u128);

impl FromStr for BigInt {
    type Err = crate::errors::NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s, 10)
    }
}

// ============================================================================
// Accessors and Conversion
// ============================================================================

impl BigInt {
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// -1, 0 or 1.
    #[inline]
    pub fn signum(&self) -> i32 {
        if self.negative {
            -1
        } else if self.mag.is_empty() {
            0
        } else {
            1
        }
    }

    /// Number of significant bits in the magnitude.
    #[inline]
    pub fn bit_length(&self) -> u64 {
        magnitude::bit_length(&self.mag)
    }

    /// Magnitude words, least significant first.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.mag
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.negative || self.mag.len() > 4 {
            return None;
        }
        Some(
            self.mag
                .iter()
                .rev()
                .fold(0u128, |acc, &w| (acc << magnitude::WORD_BITS) | w as u128),
        )
    }

    pub fn to_i128(&self) -> Option<i128> {
        if self.mag.len() > 4 {
            return None;
        }
        let abs = self
            .mag
            .iter()
            .rev()
            .fold(0u128, |acc, &w| (acc << magnitude::WORD_BITS) | w as u128);
        if self.negative {
            0i128.checked_sub_unsigned(abs)
        } else {
            i128::try_from(abs).ok()
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// Shortest big-endian two's-complement encoding.
    pub fn to_twos_complement_be(&self) -> Vec<u8> {
        radix::to_twos_complement_be(self)
    }

    /// Digits in radix 2..=36, lowercase, with a leading `-` when negative.
    pub fn to_string_radix(&self, radix: u32) -> NumericResult<String> {
        radix::check_radix(radix)?;
        let digits = radix::magnitude_to_string(&self.mag, radix);
        Ok(if self.negative {
            format!("-{}", digits)
        } else {
            digits
        })
    }
}

// ============================================================================
// Arithmetic: in-place family
// ============================================================================

impl BigInt {
    pub fn negate_in_place(&mut self) {
        self.negative = !self.negative && !self.mag.is_empty();
    }

    fn add_signed(&mut self, other_negative: bool, other: &[u32]) {
        if other.is_empty() {
            return;
        }
        if self.mag.is_empty() {
            self.mag = Words::from_slice(other);
            self.negative = other_negative;
            return;
        }

        if self.negative == other_negative {
            magnitude::add_assign(&mut self.mag, other);
            return;
        }

        match magnitude::cmp(&self.mag, other) {
            Ordering::Equal => {
                self.mag.clear();
                self.negative = false;
            },
            Ordering::Greater => magnitude::sub_assign(&mut self.mag, other),
            Ordering::Less => {
                self.mag = magnitude::sub(other, &self.mag);
                self.negative = other_negative;
            },
        }
    }

    pub fn add_in_place(&mut self, other: &BigInt) {
        self.add_signed(other.negative, &other.mag);
    }

    pub fn sub_in_place(&mut self, other: &BigInt) {
        self.add_signed(!other.negative, &other.mag);
    }

    pub fn mul_in_place(&mut self, other: &BigInt) {
        self.mul_in_place_with(other, &MultiplyConfig::default());
    }

    pub fn mul_in_place_with(&mut self, other: &BigInt, config: &MultiplyConfig) {
        let mag = magnitude::mul(&self.mag, &other.mag, config.karatsuba_threshold);
        *self = Self::from_parts(self.negative != other.negative, mag);
    }

    /// Replaces `self` with the truncated quotient and returns the remainder.
    ///
    /// Returns `None` and leaves `self` untouched when `divisor` is zero.
    pub fn div_rem_in_place(&mut self, divisor: &BigInt) -> Option<BigInt> {
        if divisor.is_zero() {
            return None;
        }
        let (q, r) = division::div_rem(&self.mag, &divisor.mag);
        let remainder = Self::from_parts(self.negative, r);
        *self = Self::from_parts(self.negative != divisor.negative, q);
        Some(remainder)
    }

    /// Truncating division in place. Returns `false` (receiver unchanged) for a
    /// zero divisor.
    pub fn div_in_place(&mut self, divisor: &BigInt) -> bool {
        self.div_rem_in_place(divisor).is_some()
    }

    /// Remainder in place (sign of the dividend). Returns `false` (receiver
    /// unchanged) for a zero divisor.
    pub fn rem_in_place(&mut self, divisor: &BigInt) -> bool {
        if divisor.is_zero() {
            return false;
        }
        let (_, r) = division::div_rem(&self.mag, &divisor.mag);
        *self = Self::from_parts(self.negative, r);
        true
    }

    /// Divides the magnitude by one word, returning the magnitude remainder.
    pub fn div_small_in_place(&mut self, divisor: u32) -> Option<u32> {
        if divisor == 0 {
            return None;
        }
        let r = division::div_rem_word_in_place(&mut self.mag, divisor);
        if self.mag.is_empty() {
            self.negative = false;
        }
        Some(r)
    }

    pub fn shl_in_place(&mut self, bits: u64) {
        self.mag = magnitude::shl(&self.mag, bits);
    }

    /// Arithmetic right shift: rounds toward negative infinity.
    pub fn shr_in_place(&mut self, bits: u64) {
        let round_down = self.negative && magnitude::has_low_bits(&self.mag, bits);
        let mut mag = magnitude::shr(&self.mag, bits);
        if round_down {
            magnitude::add_assign(&mut mag, &[1]);
        }
        *self = Self::from_parts(self.negative, mag);
    }
}

// ============================================================================
// Arithmetic: pure family
// ============================================================================

impl BigInt {
    pub fn negate(&self) -> BigInt {
        let mut out = self.clone();
        out.negate_in_place();
        out
    }

    pub fn abs(&self) -> BigInt {
        Self {
            negative: false,
            mag: self.mag.clone(),
        }
    }

    pub fn add(&self, other: &BigInt) -> BigInt {
        let mut out = self.clone();
        out.add_in_place(other);
        out
    }

    pub fn sub(&self, other: &BigInt) -> BigInt {
        let mut out = self.clone();
        out.sub_in_place(other);
        out
    }

    pub fn mul(&self, other: &BigInt) -> BigInt {
        self.mul_with(other, &MultiplyConfig::default())
    }

    /// Product using an explicit schoolbook/Karatsuba threshold.
    pub fn mul_with(&self, other: &BigInt, config: &MultiplyConfig) -> BigInt {
        let mag = magnitude::mul(&self.mag, &other.mag, config.karatsuba_threshold);
        Self::from_parts(self.negative != other.negative, mag)
    }

    pub fn pow(&self, mut exp: u32) -> BigInt {
        let mut base = self.clone();
        let mut out = Self::one();
        while exp != 0 {
            if exp & 1 == 1 {
                out.mul_in_place(&base);
            }
            exp >>= 1;
            if exp != 0 {
                base = BigInt::mul(&base, &base);
            }
        }
        out
    }

    /// Truncated quotient and remainder, or `None` for a zero divisor.
    pub fn div_rem(&self, divisor: &BigInt) -> Option<(BigInt, BigInt)> {
        let mut q = self.clone();
        let r = q.div_rem_in_place(divisor)?;
        Some((q, r))
    }

    /// Truncated quotient, or `default` for a zero divisor.
    pub fn div_or(&self, divisor: &BigInt, default: BigInt) -> BigInt {
        self.div_rem(divisor).map_or(default, |(q, _)| q)
    }

    /// Remainder with the dividend's sign, or `default` for a zero divisor.
    pub fn rem_or(&self, divisor: &BigInt, default: BigInt) -> BigInt {
        let mut out = self.clone();
        if out.rem_in_place(divisor) {
            out
        } else {
            default
        }
    }

    /// Remainder in `[0, |modulus|)`, or `default` for a zero modulus.
    pub fn modulo_or(&self, modulus: &BigInt, default: BigInt) -> BigInt {
        let mut out = self.clone();
        if !out.rem_in_place(modulus) {
            return default;
        }
        if out.negative {
            out.add_signed(false, &modulus.mag);
        }
        out
    }

    pub fn and(&self, other: &BigInt) -> BigInt {
        logical::bitwise(self, other, LogicOp::And)
    }

    pub fn or(&self, other: &BigInt) -> BigInt {
        logical::bitwise(self, other, LogicOp::Or)
    }

    pub fn xor(&self, other: &BigInt) -> BigInt {
        logical::bitwise(self, other, LogicOp::Xor)
    }

    /// `self & !other`.
    pub fn and_not(&self, other: &BigInt) -> BigInt {
        logical::bitwise(self, other, LogicOp::AndNot)
    }

    /// Bitwise complement, `-self - 1`.
    pub fn not(&self) -> BigInt {
        let mut out = self.negate();
        out.add_signed(true, &[1]);
        out
    }

    pub fn and_in_place(&mut self, other: &BigInt) {
        *self = self.and(other);
    }

    pub fn or_in_place(&mut self, other: &BigInt) {
        *self = self.or(other);
    }

    pub fn xor_in_place(&mut self, other: &BigInt) {
        *self = self.xor(other);
    }

    pub fn and_not_in_place(&mut self, other: &BigInt) {
        *self = self.and_not(other);
    }

    pub fn not_in_place(&mut self) {
        self.negate_in_place();
        self.add_signed(true, &[1]);
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => magnitude::cmp(&self.mag, &other.mag),
            (true, true) => magnitude::cmp(&other.mag, &self.mag),
        }
    }
}

impl PartialOrd for BigInt {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Operator Traits
// ============================================================================
//
// `/` and `%` follow the zero-sentinel convention: dividing by zero yields 0.

macro_rules! forward_binop {
    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident, $body:expr) => {
        impl $Trait<&BigInt> for &BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: &BigInt) -> BigInt {
                let f: fn(&BigInt, &BigInt) -> BigInt = $body;
                f(self, rhs)
            }
        }

        impl $Trait<BigInt> for BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: BigInt) -> BigInt {
                $Trait::$method(&self, &rhs)
            }
        }

        impl $Trait<&BigInt> for BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: &BigInt) -> BigInt {
                $Trait::$method(&self, rhs)
            }
        }

        impl $AssignTrait<&BigInt> for BigInt {
            #[inline]
            fn $assign(&mut self, rhs: &BigInt) {
                *self = $Trait::$method(&*self, rhs);
            }
        }

        impl $AssignTrait<BigInt> for BigInt {
            #[inline]
            fn $assign(&mut self, rhs: BigInt) {
                *self = $Trait::$method(&*self, &rhs);
            }
        }
    };
}

forward_binop!(Mul, mul, MulAssign, mul_assign, |a, b| BigInt::mul(a, b));
forward_binop!(Div, div, DivAssign, div_assign, |a, b| a.div_or(b, BigInt::zero()));
forward_binop!(Rem, rem, RemAssign, rem_assign, |a, b| a.rem_or(b, BigInt::zero()));
forward_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| a.and(b));
forward_binop!(BitOr, bitor, BitOrAssign, bitor_assign, |a, b| a.or(b));
forward_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| a.xor(b));

// Add and Sub reuse the receiver's storage when it is owned
impl Add<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn add(self, rhs: &BigInt) -> BigInt {
        BigInt::add(self, rhs)
    }
}

impl Add<&BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn add(mut self, rhs: &BigInt) -> BigInt {
        self.add_in_place(rhs);
        self
    }
}

impl Add<BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn add(mut self, rhs: BigInt) -> BigInt {
        self.add_in_place(&rhs);
        self
    }
}

impl AddAssign<&BigInt> for BigInt {
    #[inline]
    fn add_assign(&mut self, rhs: &BigInt) {
        self.add_in_place(rhs);
    }
}

impl AddAssign<BigInt> for BigInt {
    #[inline]
    fn add_assign(&mut self, rhs: BigInt) {
        self.add_in_place(&rhs);
    }
}

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn sub(self, rhs: &BigInt) -> BigInt {
        BigInt::sub(self, rhs)
    }
}

impl Sub<&BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn sub(mut self, rhs: &BigInt) -> BigInt {
        self.sub_in_place(rhs);
        self
    }
}

impl Sub<BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn sub(mut self, rhs: BigInt) -> BigInt {
        self.sub_in_place(&rhs);
        self
    }
}

impl SubAssign<&BigInt> for BigInt {
    #[inline]
    fn sub_assign(&mut self, rhs: &BigInt) {
        self.sub_in_place(rhs);
    }
}

impl SubAssign<BigInt> for BigInt {
    #[inline]
    fn sub_assign(&mut self, rhs: BigInt) {
        self.sub_in_place(&rhs);
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(mut self) -> BigInt {
        self.negate_in_place();
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(self) -> BigInt {
        self.negate()
    }
}

impl Not for BigInt {
    type Output = BigInt;

    #[inline]
    fn not(mut self) -> BigInt {
        self.not_in_place();
        self
    }
}

impl Not for &BigInt {
    type Output = BigInt;

    #[inline]
    fn not(self) -> BigInt {
        BigInt::not(self)
    }
}

impl Shl<u32> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn shl(self, bits: u32) -> BigInt {
        let mut out = self.clone();
        out.shl_in_place(bits as u64);
        out
    }
}

impl Shl<u32> for BigInt {
    type Output = BigInt;

    #[inline]
    fn shl(mut self, bits: u32) -> BigInt {
        self.shl_in_place(bits as u64);
        self
    }
}

impl ShlAssign<u32> for BigInt {
    #[inline]
    fn shl_assign(&mut self, bits: u32) {
        self.shl_in_place(bits as u64);
    }
}

impl Shr<u32> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn shr(self, bits: u32) -> BigInt {
        let mut out = self.clone();
        out.shr_in_place(bits as u64);
        out
    }
}

impl Shr<u32> for BigInt {
    type Output = BigInt;

    #[inline]
    fn shr(mut self, bits: u32) -> BigInt {
        self.shr_in_place(bits as u64);
        self
    }
}

impl ShrAssign<u32> for BigInt {
    #[inline]
    fn shr_assign(&mut self, bits: u32) {
        self.shr_in_place(bits as u64);
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = radix::magnitude_to_string(&self.mag, 10);
        f.pad_integral(!self.negative, "", &digits)
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({}, words={})", self, self.mag.len())
    }
}

// ============================================================================
// Serde (decimal string form)
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for BigInt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BigInt {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
