//! The large superaccumulator: 4096 bins of buffered bit patterns in front of a small one.
//!
//! The small accumulator spends most of its per-term time splitting the mantissa. The large
//! accumulator defers that work: incoming terms are bucketed by their top 12 bits (sign plus
//! biased exponent), and each bucket simply *integer-adds the raw 64-bit pattern* into its bin.
//! Within one bin every term has the same sign and exponent, so the mantissa fields accumulate
//! exactly in the low 52 bits while the identical sign/exponent fields pile up in the top 12,
//! where they can be cancelled later with one multiply.
//!
//! Each bin has a 16-bit countdown starting at 2<sup>12</sup> = 4096, the number of additions
//! before the mantissa sums could overflow into the sign/exponent pile. When it hits zero (or
//! when the final result is requested) the bin is *condensed*: its buffered sum is corrected for
//! the sign/exponent contributions and the missing implicit 1 bits, split in three, and added to
//! the embedded [`SmallAccumulator`] (three chunk updates for up to 4096 terms). A countdown of
//! -1 marks a bin that was never initialized, or one of the two Inf/NaN bins, which are never
//! buffered and route straight to the small accumulator's sticky flags.
//!
//! A two-level bitmap (`chunks_used` per bin, `used_used` per 64-bin group) makes the final
//! sweep over 4096 bins cheap when only a few exponents ever occurred.

pub(crate) use crate::fp;
pub(crate) use crate::small::SmallAccumulator;

/// Number of bins: one per sign and biased-exponent combination.
pub(crate) const BINS: usize = 1 << (fp::EXP_BITS + 1);

/// Bits of a bin left free above the mantissa field; 2^COUNT_BITS additions fit before the
/// buffered mantissa sums could spill into the sign/exponent pile.
pub(crate) const COUNT_BITS: u32 = 64 - fp::MANTISSA_BITS;

/// Words in the used-bin bitmap.
pub(crate) const USED_WORDS: usize = BINS / 64;

/// A large superaccumulator: same exact-summation semantics as [`SmallAccumulator`], tuned for
/// long inputs. The fastest way to feed it is [`add_slice`](LargeAccumulator::add_slice) and
/// friends, which process terms two at a time.
///
/// This type is about 41 KiB and is meant to live wherever the summation loop runs; it is not an
/// interchange format. To persist or merge results, extract the embedded small accumulator with
/// [`round_to_small`](LargeAccumulator::round_to_small) /
/// [`into_small`](LargeAccumulator::into_small).
///
/// # Example
///
/// ```
/// use exact_sum::LargeAccumulator;
///
/// let mut acc = LargeAccumulator::new();
/// acc.add_slice(&[1.0, 1e-30, -1.0, 1e300, -1e300]);
/// assert_eq!(acc.round(), 1e-30);
/// ```
#[derive(Clone)]
pub struct LargeAccumulator {
  /// Per-bin buffered sums of raw bit patterns.
  pub(crate) chunk: [u64; BINS],
  /// Per-bin countdown of additions left before the bin must be condensed; -1 for bins never
  /// initialized and for the two Inf/NaN bins.
  pub(crate) count: [i16; BINS],
  /// Bit per bin: has this bin ever been initialized?
  pub(crate) chunks_used: [u64; USED_WORDS],
  /// Bit per `chunks_used` word: is that word non-zero?
  pub(crate) used_used: u64,
  /// Condensed bins land here.
  pub(crate) sacc: SmallAccumulator,
}

mod basics;
mod add;
mod condense;
mod ops;
