//! Debug pretty-printers for both accumulators: a binary dump of the state, chunk by chunk,
//! aimed at eyeballing carry propagation and condensation. Formatting goes through the
//! `core::fmt::Formatter` it is handed and never touches the numeric state.

use core::fmt::Debug;

use crate::fp;
use crate::large::{self, LargeAccumulator};
use crate::small::{self, SmallAccumulator};

impl Debug for SmallAccumulator {
  /// One line per non-zero chunk, top down: the chunk index, the power of two its low bit
  /// counts, and the chunk in binary, split at the 32-bit overlap boundary.
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "SmallAccumulator {{")?;
    if self.inf != 0 {
      write!(f, " Inf")?;
    }
    if self.nan != 0 {
      write!(f, " NaN")?;
    }
    writeln!(f)?;
    for i in (0..small::CHUNKS).rev() {
      let c = self.chunk[i];
      if c != 0 {
        writeln!(
          f,
          "  {:2} {:5} {:032b} {:032b}",
          i,
          ((i as i32) << small::LOW_EXP_BITS) - fp::EXP_BIAS - fp::MANTISSA_BITS as i32,
          (c >> 32) as u32,
          c as u32,
        )?;
      }
    }
    write!(f, "}}")
  }
}

impl Debug for LargeAccumulator {
  /// One line per live bin, top down: the bin's sign and exponent, the remaining countdown, and
  /// the buffered bit-pattern sum in hex; then the embedded small accumulator.
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    writeln!(f, "LargeAccumulator {{")?;
    for ix in (0..large::BINS).rev() {
      if self.count[ix] >= 0 {
        writeln!(
          f,
          "  {}{:4} {:5} {:016x}",
          if ix & 1 << fp::EXP_BITS != 0 { '-' } else { '+' },
          ix as i64 & fp::EXP_MASK,
          self.count[ix],
          self.chunk[ix],
        )?;
      }
    }
    writeln!(f, "  {:?}", self.sacc)?;
    write!(f, "}}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn small() {
    let mut acc = SmallAccumulator::new();
    assert_eq!(format!("{acc:?}"), "SmallAccumulator {\n}");

    acc.add(1.0);
    assert_eq!(
      format!("{acc:?}"),
      "SmallAccumulator {\n  \
          32   -51 00000000000010000000000000000000 00000000000000000000000000000000\n\
       }",
    );

    acc.reset();
    acc.add(f64::NEG_INFINITY);
    assert_eq!(format!("{acc:?}"), "SmallAccumulator { Inf\n}");
  }

  #[test]
  fn large() {
    let mut acc = LargeAccumulator::new();
    acc.add(1.0);
    assert_eq!(
      format!("{acc:?}"),
      "LargeAccumulator {\n  \
          +1023  4095 3ff0000000000000\n  \
          SmallAccumulator {\n}\n\
       }",
    );
  }
}
