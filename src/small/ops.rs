use super::*;

impl SmallAccumulator {
  /// Accumulator already holding the sum of a slice.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::SmallAccumulator;
  /// assert_eq!(SmallAccumulator::from_slice(&[0.5, 0.25]).round(), 0.75);
  /// ```
  pub fn from_slice(values: &[f64]) -> Self {
    let mut acc = Self::new();
    acc.add_slice(values);
    acc
  }
}

impl Default for SmallAccumulator {
  fn default() -> Self {
    Self::new()
  }
}

impl core::ops::AddAssign<f64> for SmallAccumulator {
  /// As [`SmallAccumulator::add`].
  fn add_assign(&mut self, rhs: f64) {
    self.add(rhs)
  }
}

impl core::ops::AddAssign<&SmallAccumulator> for SmallAccumulator {
  /// As [`SmallAccumulator::add_acc`].
  fn add_assign(&mut self, rhs: &SmallAccumulator) {
    self.add_acc(rhs)
  }
}
