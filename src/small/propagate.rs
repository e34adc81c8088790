use super::*;

impl SmallAccumulator {
  /// Propagate carries upward so that every chunk is back within the range a single add expects.
  ///
  /// Must be called often enough that the accumulated carries cannot overflow out the top of a
  /// chunk, which is what the [remaining-adds counter](Self::adds_until_propagate) guarantees.
  /// Returns the index of the uppermost non-zero chunk (0 if the number is zero).
  ///
  /// Postcondition: the uppermost non-zero chunk `u` indicates the sign of the number, lies in
  /// `-2^32 ..= 2^32 - 1`, and is not -1; every chunk below `u` is non-negative, in
  /// `0 .. 2^32`. No redundant all-zero or all-one chunks remain above `u`. The represented
  /// value is unchanged.
  pub(crate) fn carry_propagate(&mut self) -> usize {
    // Find the uppermost non-zero chunk, or finish right away if the number is zero.
    let Some(mut u) = self.chunk.iter().rposition(|&c| c != 0) else {
      self.adds_until_propagate = CARRY_TERMS - 1;
      return 0;
    };

    // Quickly skip over unused low-order chunks; sums of values of similar magnitude leave long
    // stretches of zeros at the bottom.
    let mut i = 0;
    while self.chunk[i] == 0 {
      i += 1;
    }

    // Propagate from the lowest non-zero chunk upward: everything above a chunk's low 32 bits
    // moves one chunk up. `uix` tracks the uppermost chunk seen to be non-zero *after* its high
    // part has been carried away; `u` may grow by one when a carry spills into the previously
    // zero region above.
    let mut uix = None;
    while i <= u {
      let c = self.chunk[i];
      if c == 0 {
        i += 1;
        continue;
      }
      let c_high = c >> LOW_MANTISSA_BITS;
      if c_high == 0 {
        // Already in canonical range; nothing to move up.
        uix = Some(i);
        i += 1;
        continue;
      }
      if u == i {
        if c_high == -1 {
          // Do not propagate a -1 into the all-zero region above: the top chunk is allowed to
          // be negative, and smearing the sign upward would only create redundant chunks.
          uix = Some(i);
          break;
        }
        // The carry will make chunk[i + 1] non-zero, so the loop has to visit it.
        u = i + 1;
      }
      let c_low = c & LOW_MANTISSA_MASK;
      if c_low != 0 {
        uix = Some(i);
      }
      self.chunk[i] = c_low;
      i += 1;
      self.chunk[i] = self.chunk[i].wrapping_add(c_high);
    }

    // Carrying can cancel everything: check for zero again.
    let Some(mut uix) = uix else {
      self.adds_until_propagate = CARRY_TERMS - 1;
      return 0;
    };

    // A top chunk of -1 is the same number as a top chunk of -2^32 one position down (combined
    // with the chunk below); fold it so the postcondition holds.
    while self.chunk[uix] == -1 && uix > 0 {
      self.chunk[uix] = 0;
      uix -= 1;
      self.chunk[uix] = self.chunk[uix].wrapping_sub(1 << LOW_MANTISSA_BITS);
    }

    // One less than the total allowed terms may now be added before the next propagation.
    self.adds_until_propagate = CARRY_TERMS - 1;
    uix
  }
}
