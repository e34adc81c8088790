use super::*;
use crate::LengthMismatch;

impl LargeAccumulator {
  /// Add a single term to the sum. Never rounds and never fails.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::LargeAccumulator;
  /// let mut acc = LargeAccumulator::new();
  /// acc.add(1e16);
  /// acc.add(1.0);
  /// acc.add(-1e16);
  /// assert_eq!(acc.round(), 1.0);
  /// ```
  pub fn add(&mut self, value: f64) {
    let bits = value.to_bits();
    // The top 12 bits (sign + exponent) select the bin.
    let ix = (bits >> fp::MANTISSA_BITS) as usize;
    // Decrement first, test after: a single sign test then covers the three slow cases at once
    // (bin full, bin never initialized, Inf/NaN bin pinned at -1).
    let count = self.count[ix] - 1;
    if count < 0 {
      self.special_or_condense(ix, bits);
    } else {
      self.count[ix] = count;
      self.chunk[ix] = self.chunk[ix].wrapping_add(bits);
    }
  }

  /// Merge a small accumulator into the embedded one, as if its terms had been added here.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::{LargeAccumulator, SmallAccumulator};
  /// let mut partial = SmallAccumulator::new();
  /// partial.add_slice(&[1.0, 2.0]);
  /// let mut acc = LargeAccumulator::new();
  /// acc.add(4.0);
  /// acc.add_small(&partial);
  /// assert_eq!(acc.round(), 7.0);
  /// ```
  pub fn add_small(&mut self, value: &SmallAccumulator) {
    self.sacc.add_acc(value)
  }

  /// Merge another large accumulator into `self`: the right operand is condensed down to its
  /// small accumulator (which mutates it, but not the value it represents), then merged.
  ///
  /// # Example
  ///
  /// ```
  /// # use exact_sum::LargeAccumulator;
  /// let mut a = LargeAccumulator::new();
  /// let mut b = LargeAccumulator::new();
  /// a.add_slice(&[1.0, 1e200]);
  /// b.add_slice(&[2.0, -1e200]);
  /// a.add_large(&mut b);
  /// assert_eq!(a.round(), 3.0);
  /// ```
  pub fn add_large(&mut self, other: &mut LargeAccumulator) {
    let rounded = *other.round_to_small();
    self.sacc.add_acc(&rounded)
  }

  /// Add every element of a slice. Observationally identical to adding the elements one by one.
  pub fn add_slice(&mut self, values: &[f64]) {
    self.add_terms(values.len(), |i| values[i])
  }

  /// Add the squared norm of a slice; see [`SmallAccumulator::add_sqnorm`] for the semantics of
  /// the squares.
  pub fn add_sqnorm(&mut self, values: &[f64]) {
    self.add_terms(values.len(), |i| values[i] * values[i])
  }

  /// Add the dot product of two slices; the shorter one decides how many products are added.
  /// See [`SmallAccumulator::add_dot`] for the semantics of the products.
  pub fn add_dot(&mut self, a: &[f64], b: &[f64]) {
    self.add_terms(a.len().min(b.len()), |i| a[i] * b[i])
  }

  /// As [`add_dot`](Self::add_dot), but reports slices of unequal length instead of truncating
  /// to the shorter one.
  pub fn try_add_dot(&mut self, a: &[f64], b: &[f64]) -> Result<(), LengthMismatch> {
    if a.len() != b.len() {
      return Err(LengthMismatch);
    }
    self.add_dot(a, b);
    Ok(())
  }

  /// Shared skeleton of the batched operations: an unrolled loop that processes two terms per
  /// iteration and keeps the fast path free of branches.
  ///
  /// Bins are updated *speculatively*, before knowing whether the countdown allowed it; the
  /// inner loop then merges "lane 1 underflowed", "lane 2 underflowed", and "input exhausted"
  /// into a single sign test on the OR of the three quantities. On exit, any update that should
  /// not have happened is rolled back, and that lane is re-run through the slow path. The final
  /// state is the same as if every term had gone through [`add`](Self::add) one by one.
  pub(crate) fn add_terms(&mut self, n: usize, mut term: impl FnMut(usize) -> f64) {
    if n == 0 {
      return;
    }
    let mut i = 0;
    // Leave the last one or two terms for the scalar epilogue, so the lanes never read past the
    // end; terminate on sign for the merged test below.
    let mut m = n as isize - 3;
    while m >= 0 {
      let (mut u1, mut u2, mut ix1, mut ix2, mut c1, mut c2);
      loop {
        u1 = term(i).to_bits();
        u2 = term(i + 1).to_bits();
        i += 2;

        ix1 = (u1 >> fp::MANTISSA_BITS) as usize;
        c1 = self.count[ix1] - 1;
        self.count[ix1] = c1;
        self.chunk[ix1] = self.chunk[ix1].wrapping_add(u1);

        ix2 = (u2 >> fp::MANTISSA_BITS) as usize;
        c2 = self.count[ix2] - 1;
        self.count[ix2] = c2;
        self.chunk[ix2] = self.chunk[ix2].wrapping_add(u2);

        m -= 2;
        if (c1 as isize | c2 as isize | m) < 0 {
          break;
        }
      }

      if c1 < 0 || c2 < 0 {
        // At least one speculative update was wrong. Back out lane 2 unconditionally (if lane 1
        // underflowed, its condensation must happen before lane 2's add to keep the outcome
        // identical to strictly sequential adds), fix up lane 1, then redo lane 2.
        self.count[ix2] = c2 + 1;
        self.chunk[ix2] = self.chunk[ix2].wrapping_sub(u2);

        if c1 < 0 {
          self.count[ix1] = c1 + 1;
          self.chunk[ix1] = self.chunk[ix1].wrapping_sub(u1);
          self.special_or_condense(ix1, u1);
          c2 = self.count[ix2] - 1;
        }

        if c2 < 0 {
          self.special_or_condense(ix2, u2);
        } else {
          self.count[ix2] = c2;
          self.chunk[ix2] = self.chunk[ix2].wrapping_add(u2);
        }
      }
    }

    // The last one or two terms, through the scalar path.
    m += 3;
    while m > 0 {
      self.add(term(i));
      i += 1;
      m -= 1;
    }
  }
}
