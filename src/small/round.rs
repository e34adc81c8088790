use super::*;

impl SmallAccumulator {
  /// Round the accumulated sum to the nearest `f64`, ties to even. This is the one and only
  /// place where any rounding happens.
  ///
  /// Takes `&mut self` because carries are propagated as a preliminary, but the represented
  /// value does not change: calling `round` twice returns the same bits, and terms can keep
  /// being added afterwards.
  ///
  /// A NaN flag takes precedence over an infinity flag, which takes precedence over the finite
  /// sum; in particular an infinity survives even if the finite terms alone would have
  /// overflowed with the opposite sign, since that case has no real ambiguity.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::SmallAccumulator;
  /// let mut acc = SmallAccumulator::new();
  /// acc.add_slice(&[0.1, 0.2, 0.3]);
  /// let first = acc.round();
  /// assert_eq!(acc.round(), first);  // idempotent
  /// acc.add(0.4);
  /// assert!(acc.round() > first);
  /// ```
  pub fn round(&mut self) -> f64 {
    if self.nan != 0 {
      return f64::from_bits(self.nan as u64);
    }
    if self.inf != 0 {
      return f64::from_bits(self.inf as u64);
    }

    // Propagate carries so that the uppermost non-zero chunk determines the sign, and is
    // neither 0 nor -1 (unless it is chunk 0, which the denormal code below handles).
    let i = self.carry_propagate();
    let mut ivalue = self.chunk[i];

    // Results in the denormal range (and zero) are special: no implicit 1 bit, fixed exponent.
    if i <= 1 {
      if ivalue == 0 {
        return 0.0;
      }
      if i == 0 {
        // Only the lowest chunk is non-zero, so the result is certainly denormal. Chunk 0 counts
        // units of 2^-1075, half the denormal quantum: shift right once and set the sign.
        let magnitude = (ivalue.unsigned_abs()) >> 1;
        return f64::from_bits(if ivalue < 0 { magnitude | fp::SIGN_MASK } else { magnitude });
      }
      // The two lowest chunks might still be a denormal; assemble the candidate and check its
      // magnitude against the 2^52 boundary. (The shift out of chunk 0 cannot discard
      // information: chunk 0 is always even, since every mantissa split shifts left by the
      // effective exponent, which is at least 1 down here.)
      let candidate = ivalue
        .wrapping_mul(1 << (LOW_MANTISSA_BITS - 1))
        .wrapping_add(self.chunk[0] >> 1);
      if candidate < 0 {
        if candidate > -(1 << fp::MANTISSA_BITS) {
          return f64::from_bits((-candidate) as u64 | fp::SIGN_MASK);
        }
      } else if (candidate as u64) < 1 << fp::MANTISSA_BITS {
        return f64::from_bits(candidate as u64);
      }
      // Not actually denormal: fall through to the normal path below.
    }

    // Find the position of the uppermost 1 bit of |ivalue| by letting the int-to-float
    // conversion do the work and reading back the exponent. `more` is then the number of bits
    // needed from the chunks below to fill out the 53-bit mantissa, plus one extra bit to decide
    // the rounding. (For negative numbers one further bit may be needed, see below.)
    let mut e = ((ivalue as f64).to_bits() >> fp::MANTISSA_BITS) as i32 & fp::EXP_MASK as i32;
    let mut more = 1 + fp::MANTISSA_BITS as i32 + fp::EXP_BIAS - e;

    // Shift `more` bits from the chunk(s) below into the bottom of `ivalue`. `j` ends up as the
    // index of the lowest chunk consulted, and `lower` as the bits of that chunk that did not
    // fit, kept with at least one bit so one can be moved up later if needed.
    ivalue = ivalue.wrapping_mul(1 << more);

    let mut j = i - 1;  // exists: i = 0 was fully handled above
    let mut lower = self.chunk[j];
    if more >= LOW_MANTISSA_BITS as i32 {
      more -= LOW_MANTISSA_BITS as i32;
      ivalue = ivalue.wrapping_add(lower << more);
      lower = if j == 0 { 0 } else { j -= 1; self.chunk[j] };
    }
    ivalue = ivalue.wrapping_add(lower >> (LOW_MANTISSA_BITS as i32 - more));
    lower &= (1 << (LOW_MANTISSA_BITS as i32 - more)) - 1;

    // A negative `ivalue` may lose its top bit when negated (e.g. -2^53 negates to exactly
    // 2^53, needing 54 bits; -2^53 + 1 needs only 53). If the negated value would not fill
    // 54 bits, move one more bit up from `lower`. At most one extra bit is ever needed, because
    // carry propagation guarantees the top chunk is not -1.
    if ivalue < 0 && (ivalue.wrapping_neg() & (1 << (fp::MANTISSA_BITS + 1))) == 0 {
      let pos = 1 << (LOW_MANTISSA_BITS as i32 - 1 - more);
      ivalue = ivalue.wrapping_mul(2);
      if lower & pos != 0 {
        ivalue |= 1;
        lower &= !pos;
      }
      e -= 1;
    }

    // Split off the sign; from here on `ivalue` is the magnitude, 54 bits: the 53-bit mantissa
    // plus the rounding bit at the bottom.
    let sign = if ivalue < 0 {
      ivalue = ivalue.wrapping_neg();
      fp::SIGN_MASK
    } else {
      0
    };
    debug_assert!(ivalue >> (fp::MANTISSA_BITS + 1) == 1);

    // Round to nearest, ties to even. The remainder beyond the rounding bit lives in `lower`
    // and in the chunks below `j`; for a positive number it adds to the magnitude of the
    // remainder, for a negative number it subtracts (those chunks entered the sum positively,
    // but the magnitude was obtained by negation).
    let round_away = ivalue & 1 != 0
      && if sign == 0 {
        ivalue & 2 != 0 || lower != 0 || self.chunk[..j].iter().any(|&c| c != 0)
      } else {
        ivalue & 2 != 0 && lower == 0 && self.chunk[..j].iter().all(|&c| c == 0)
      };
    if round_away {
      ivalue += 2;
      if ivalue & (1 << (fp::MANTISSA_BITS + 2)) != 0 {
        // The increment carried out the top: renormalize.
        ivalue >>= 1;
        e += 1;
      }
    }

    // Drop the rounding bit and adjust the exponent for the chunk position.
    ivalue >>= 1;
    e += ((i as i32) << LOW_EXP_BITS) - fp::EXP_BIAS - fp::MANTISSA_BITS as i32;

    if e >= fp::EXP_MASK as i32 {
      // Exponent overflow: the correctly rounded result is an infinity.
      return f64::from_bits(sign | ((fp::EXP_MASK as u64) << fp::MANTISSA_BITS));
    }
    f64::from_bits(sign + ((e as u64) << fp::MANTISSA_BITS) + (ivalue & fp::MANTISSA_MASK) as u64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rational;
  use crate::test::finite;
  use proptest::prelude::*;

  #[test]
  fn integers_with_cancellation() {
    let mut acc = SmallAccumulator::new();
    acc.add_slice(&[
      1., -23., 456., -78910., 1112131415., -161718192021., 22232425262728.,
      -2930313233343536., 373839404142434445., -46474849505152535455.,
    ]);
    assert_eq!(acc.round(), -46103918342424313856.0);
  }

  #[test]
  fn repeated_tenth() {
    // 2^23 copies of 0.1: the exact sum is the value of 0.1 scaled by a power of two, so the
    // correctly rounded result is exactly 0.1 * 2^23 (that product does not round).
    let mut acc = SmallAccumulator::new();
    for _ in 0..1 << 23 {
      acc.add(0.1);
    }
    assert_eq!(acc.round(), 0.1 * (1 << 23) as f64);
  }

  #[test]
  fn largest_normals() {
    let max = f64::MAX;
    let mut acc = SmallAccumulator::new();
    acc.add(max);
    acc.add(max);
    assert_eq!(acc.round(), f64::INFINITY);

    // The exact sum max + max - max is just max, whatever a float expression tree would do.
    for order in [[max, max, -max], [max, -max, max], [-max, max, max]] {
      let mut acc = SmallAccumulator::new();
      acc.add_slice(&order);
      assert_eq!(acc.round(), max);
    }

    let mut acc = SmallAccumulator::new();
    acc.add(-max);
    acc.add(-max);
    assert_eq!(acc.round(), f64::NEG_INFINITY);
  }

  #[test]
  fn denormals() {
    let tiny = f64::from_bits(1);  // 2^-1074, the smallest positive denormal
    let mut acc = SmallAccumulator::new();
    acc.add(tiny);
    acc.add(tiny);
    assert_eq!(acc.round().to_bits(), 2);

    let mut acc = SmallAccumulator::new();
    acc.add(-tiny);
    assert_eq!(acc.round(), -tiny);

    // Largest denormal plus the smallest one: exactly the smallest normal.
    let mut acc = SmallAccumulator::new();
    acc.add(f64::from_bits(0x000F_FFFF_FFFF_FFFF));
    acc.add(tiny);
    assert_eq!(acc.round().to_bits(), 0x0010_0000_0000_0000);

    // Cancellation down into the denormal range.
    let mut acc = SmallAccumulator::new();
    acc.add(f64::MIN_POSITIVE);
    acc.add(-f64::from_bits(0x000F_FFFF_FFFF_FFFF));
    assert_eq!(acc.round().to_bits(), 1);
  }

  #[test]
  fn halfway_ties_go_to_even() {
    // 1 + 2^-53 is exactly halfway between 1 and the next float: ties to even keeps 1.
    let mut acc = SmallAccumulator::new();
    acc.add(1.0);
    acc.add(f64::EPSILON / 2.0);
    assert_eq!(acc.round(), 1.0);

    // Anything beyond the halfway point rounds up.
    acc.add(f64::from_bits(1));
    assert_eq!(acc.round(), 1.0 + f64::EPSILON);

    // (1 + 2^-52) + 2^-53 is halfway with an odd mantissa below: rounds up to even.
    let mut acc = SmallAccumulator::new();
    acc.add(1.0 + f64::EPSILON);
    acc.add(f64::EPSILON / 2.0);
    assert_eq!(acc.round(), 1.0 + 2.0 * f64::EPSILON);

    // Same on the negative side.
    let mut acc = SmallAccumulator::new();
    acc.add(-1.0);
    acc.add(-f64::EPSILON / 2.0);
    assert_eq!(acc.round(), -1.0);
  }

  #[test]
  fn zero_is_positive_zero() {
    let mut acc = SmallAccumulator::new();
    acc.add(-2.5);
    acc.add(2.5);
    assert_eq!(acc.round().to_bits(), 0);
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]

    #[test]
    fn matches_oracle(values in prop::collection::vec(finite(), 0..64)) {
      let mut acc = SmallAccumulator::new();
      acc.add_slice(&values);
      let exact = rational::exact_sum(&values);
      prop_assert_eq!(acc.round().to_bits(), rational::round_nearest(&exact).to_bits());
    }

    #[test]
    fn idempotent(values in prop::collection::vec(finite(), 0..64)) {
      let mut acc = SmallAccumulator::new();
      acc.add_slice(&values);
      let first = acc.round();
      prop_assert_eq!(acc.round().to_bits(), first.to_bits());
      prop_assert_eq!(acc.round().to_bits(), first.to_bits());
    }

    /// Summing the same terms scaled by a power of two scales the result by the same power of
    /// two (no hidden rounding anywhere).
    #[test]
    fn scaling_by_powers_of_two(values in prop::collection::vec(-1000i32..1000, 1..40)) {
      let values: Vec<f64> = values.into_iter().map(f64::from).collect();
      let scaled: Vec<f64> = values.iter().map(|&v| v * 0.125).collect();
      let mut acc = SmallAccumulator::new();
      acc.add_slice(&values);
      let mut acc_scaled = SmallAccumulator::new();
      acc_scaled.add_slice(&scaled);
      prop_assert_eq!(acc.round() * 0.125, acc_scaled.round());
    }
  }
}
