//! Translating accumulator state and input slices to exact rationals, for the purposes of
//! *testing*. An arbitrary-precision rational can hold any finite sum of `f64`s with no rounding
//! at all, so it is the oracle the optimised bit-twiddling is checked against: accumulate, then
//! verify that [`SmallAccumulator::round`] returns exactly the correctly rounded rational sum.

use malachite::base::num::arithmetic::traits::PowerOf2;
use malachite::base::num::conversion::traits::RoundingFrom;
use malachite::base::rounding_modes::RoundingMode;
use malachite::rational::Rational;

use crate::fp;
use crate::small::{SmallAccumulator, LOW_MANTISSA_BITS};

/// The exact value represented by the finite chunks of a small accumulator: the sum over all
/// chunks of chunk[i] · 2^(32·i − 1075).
pub(crate) fn exact(acc: &SmallAccumulator) -> Rational {
  let mut sum = Rational::from(0);
  for (i, &c) in acc.chunk.iter().enumerate() {
    if c != 0 {
      let exp = LOW_MANTISSA_BITS as i64 * i as i64
        - (fp::EXP_BIAS as i64 + fp::MANTISSA_BITS as i64);
      sum += Rational::from(c) * Rational::power_of_2(exp);
    }
  }
  sum
}

/// The exact sum of a slice of finite values.
pub(crate) fn exact_sum(values: &[f64]) -> Rational {
  let mut sum = Rational::from(0);
  for &v in values {
    sum += Rational::try_from(v).expect("exact_sum oracle is only defined for finite inputs");
  }
  sum
}

/// The `f64` nearest to an exact rational, ties to even: the reference every rounding result is
/// compared against.
pub(crate) fn round_nearest(value: &Rational) -> f64 {
  f64::rounding_from(value, RoundingMode::Nearest).0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exact_of_simple_sums() {
    let mut acc = SmallAccumulator::new();
    acc.add(1.5);
    assert_eq!(exact(&acc), Rational::from_signeds(3, 2));

    acc.add(-0.25);
    acc.add(1e-300);
    acc.add(-1e-300);
    assert_eq!(exact(&acc), Rational::from_signeds(5, 4));

    // Propagation must not change the exact value (also checked by proptest elsewhere).
    acc.carry_propagate();
    assert_eq!(exact(&acc), Rational::from_signeds(5, 4));
  }

  #[test]
  fn round_nearest_of_known_values() {
    assert_eq!(round_nearest(&Rational::from_signeds(1, 2)), 0.5);
    assert_eq!(round_nearest(&Rational::from(0)).to_bits(), 0);
    // 1 + 2^-53 is a tie: rounds down to the even mantissa.
    let tie = Rational::from(1) + Rational::power_of_2(-53i64);
    assert_eq!(round_nearest(&tie), 1.0);
  }

  #[test]
  fn exact_sum_matches_f64_when_exact() {
    assert_eq!(exact_sum(&[0.5, 0.25, 4.0]), Rational::try_from(4.75).unwrap());
  }
}
