use super::*;

impl LargeAccumulator {
  /// Accumulator already holding the sum of a slice.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::LargeAccumulator;
  /// assert_eq!(LargeAccumulator::from_slice(&[0.5, 0.25]).round(), 0.75);
  /// ```
  pub fn from_slice(values: &[f64]) -> Self {
    let mut acc = Self::new();
    acc.add_slice(values);
    acc
  }
}

impl Default for LargeAccumulator {
  fn default() -> Self {
    Self::new()
  }
}

impl core::ops::AddAssign<f64> for LargeAccumulator {
  /// As [`LargeAccumulator::add`].
  fn add_assign(&mut self, rhs: f64) {
    self.add(rhs)
  }
}

impl core::ops::AddAssign<&SmallAccumulator> for LargeAccumulator {
  /// As [`LargeAccumulator::add_small`].
  fn add_assign(&mut self, rhs: &SmallAccumulator) {
    self.add_small(rhs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operators_match_methods() {
    let mut by_ops = LargeAccumulator::default();
    by_ops += 1.5;
    by_ops += -0.25;
    let partial = SmallAccumulator::from_slice(&[2.0, 4.0]);
    by_ops += &partial;

    let mut by_methods = LargeAccumulator::new();
    by_methods.add(1.5);
    by_methods.add(-0.25);
    by_methods.add_small(&partial);

    assert_eq!(by_ops.round(), 7.25);
    assert_eq!(by_methods.round(), 7.25);
  }
}
