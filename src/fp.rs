//! Constants describing the IEEE-754 binary64 layout, shared by both accumulators.
//!
//! Everything in this crate works on the raw bit representation of an `f64`:
//!
//! ```text
//!   63 62        52 51                                                  0
//!   ┌─┬────────────┬─────────────────────────────────────────────────────┐
//!   │s│  exponent  │                      mantissa                       │
//!   └─┴────────────┴─────────────────────────────────────────────────────┘
//! ```
//!
//! An exponent field of 0 marks a zero or denormal, a field of `EXP_MASK` (all ones) marks an
//! infinity or NaN, and everything in between is a normal number with an implicit 1 bit above the
//! mantissa. The bit pattern is reinterpreted as a *signed* 64-bit integer where convenient, so
//! that "is the value negative" is just an integer sign test.

/// Bits in the mantissa field, excluding the implicit leading 1.
pub(crate) const MANTISSA_BITS: u32 = 52;

/// Bits in the exponent field.
pub(crate) const EXP_BITS: u32 = 11;

/// Mask for the mantissa field.
pub(crate) const MANTISSA_MASK: i64 = (1 << MANTISSA_BITS) - 1;

/// Mask for the exponent field, once shifted down to the bottom.
pub(crate) const EXP_MASK: i64 = (1 << EXP_BITS) - 1;

/// Bias added to the exponent of a normal number.
pub(crate) const EXP_BIAS: i32 = (1 << (EXP_BITS - 1)) - 1;

/// Position of the sign bit.
pub(crate) const SIGN_BIT: u32 = MANTISSA_BITS + EXP_BITS;

/// Mask for the sign bit.
pub(crate) const SIGN_MASK: u64 = 1 << SIGN_BIT;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derived_constants() {
    assert_eq!(MANTISSA_BITS + EXP_BITS + 1, 64);
    assert_eq!(MANTISSA_MASK, 0x000F_FFFF_FFFF_FFFF);
    assert_eq!(EXP_MASK, 0x7FF);
    assert_eq!(EXP_BIAS, 1023);
    assert_eq!(SIGN_BIT, 63);
    assert_eq!(SIGN_MASK, 0x8000_0000_0000_0000);
  }

  /// The constants must agree with what `core` says about `f64`.
  #[test]
  fn agrees_with_core() {
    assert_eq!(MANTISSA_BITS + 1, f64::MANTISSA_DIGITS);
    assert_eq!(EXP_BIAS + 1, f64::MAX_EXP);
    let one = 1.0_f64.to_bits();
    assert_eq!((one >> MANTISSA_BITS) as i64 & EXP_MASK, EXP_BIAS as i64);
    assert_eq!(one as i64 & MANTISSA_MASK, 0);
    assert_eq!((-1.0_f64).to_bits() & SIGN_MASK, SIGN_MASK);
  }
}
