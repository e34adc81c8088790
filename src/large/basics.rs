use super::*;

impl LargeAccumulator {
  /// The number of bins in the accumulator.
  ///
  /// # Example
  ///
  /// ```
  /// assert_eq!(exact_sum::LargeAccumulator::BINS, 4096);
  /// ```
  pub const BINS: usize = BINS;

  /// A fresh accumulator, holding an exact sum of zero terms. Every bin starts uninitialized
  /// (countdown -1), so first use of an exponent goes through the condense path once and
  /// initializes it.
  pub const fn new() -> Self {
    Self {
      chunk: [0; BINS],
      count: [-1; BINS],
      chunks_used: [0; USED_WORDS],
      used_used: 0,
      sacc: SmallAccumulator::new(),
    }
  }

  /// Restore `self` to the freshly-constructed state.
  pub fn reset(&mut self) {
    *self = Self::new()
  }

  /// The number of live bins (initialized, non-special). Diagnostic only.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::LargeAccumulator;
  /// let mut acc = LargeAccumulator::new();
  /// assert_eq!(acc.chunks_used(), 0);
  /// acc.add(1.0);
  /// acc.add(-1.0);
  /// acc.add(1.5);  // same exponent as 1.0, different sign bin
  /// assert_eq!(acc.chunks_used(), 2);
  /// ```
  pub fn chunks_used(&self) -> usize {
    self.count.iter().filter(|&&c| c >= 0).count()
  }
}

impl From<SmallAccumulator> for LargeAccumulator {
  /// Seed a large accumulator with previously accumulated state.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::{LargeAccumulator, SmallAccumulator};
  /// let mut small = SmallAccumulator::new();
  /// small.add(4.0);
  /// let mut large = LargeAccumulator::from(small);
  /// large.add(0.5);
  /// assert_eq!(large.round(), 4.5);
  /// ```
  fn from(sacc: SmallAccumulator) -> Self {
    Self { sacc, ..Self::new() }
  }
}
