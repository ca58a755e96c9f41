// ============================================================================
// Fixed-Point Module
// Packed 64-bit decimal words and the layout of each bit split
// ============================================================================
//
// A word with `b` scale bits stores `value << b | scale`, where `value` is a
// (64 - b)-bit two's-complement integer and `scale` a b-bit one. The word
// denotes `value * 10^-scale`. Scale bits are not stored in the word; every
// caller passes them alongside.

mod codec;
mod layout;

pub use codec::{decode_scale, decode_value, encode};
pub(crate) use codec::pack;
pub use layout::{max_scale, max_value, min_scale, min_value, Layout, ScaleBits, LAYOUTS};
