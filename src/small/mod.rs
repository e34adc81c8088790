//! The small superaccumulator: the exact running sum as a chain of overlapping 64-bit chunks.
//!
//! The idea is to represent the sum as a very wide fixed-point number, but stored redundantly so
//! that adding a term touches only two 64-bit words and costs no carry chain. Chunk `i` holds a
//! signed count of units of 2<sup>32·i − 1075</sup>, so consecutive chunks overlap by 32 bits:
//!
//! ```text
//!   chunk 2:                 ssssssssssssssssssssssssssssssssvvvvvvvv....
//!   chunk 1:         ssssssssssssssssssssssssssssssssvvvvvvvvvvvvvvvv
//!   chunk 0: ssssssssssssssssssssssssssssssssvvvvvvvvvvvvvvvvvvvvvvvv
//!            └──────── 32 slack bits ───────┘└──── 32 value bits ────┘
//! ```
//!
//! A term's 53-bit mantissa is split at a 32-bit boundary given by the low 5 bits of its
//! exponent and added to (or, for negative terms, subtracted from) two adjacent chunks selected
//! by the high 6 bits. The 11 bits between a chunk's sign bit and the highest mantissa bit it
//! can receive are slack; they absorb up to 2<sup>11</sup> − 1 = 2047 additions before any carry
//! could be lost, which is why carries are propagated only every 2047 adds (see
//! [`SmallAccumulator::carry_propagate`]).
//!
//! Infinities and NaNs never touch the chunks; they are recorded in two sticky flag fields that
//! take precedence when rounding.
//!
//! All chunk arithmetic is two's-complement and wrapping. The represented value is the *sum over
//! all chunks* of chunk[i] · 2<sup>32·i − 1075</sup>, and that quantity is what every operation
//! preserves exactly.

pub(crate) use crate::fp;

/// Low bits of the exponent: position of the mantissa within a chunk pair.
pub(crate) const LOW_EXP_BITS: u32 = 5;

/// Mask for the low part of the exponent.
pub(crate) const LOW_EXP_MASK: i64 = (1 << LOW_EXP_BITS) - 1;

/// High bits of the exponent: index of the chunk pair.
pub(crate) const HIGH_EXP_BITS: u32 = fp::EXP_BITS - LOW_EXP_BITS;

/// Number of chunks. One per high-exponent index, plus three guard chunks at the top so that the
/// chunks above any mantissa split (and above any condensed bin) always exist.
pub(crate) const CHUNKS: usize = (1 << HIGH_EXP_BITS) + 3;

/// Bits of mantissa that land in the lower chunk of a pair; equally, the stride in bits between
/// consecutive chunks.
pub(crate) const LOW_MANTISSA_BITS: u32 = 1 << LOW_EXP_BITS;

/// Mask for the low part of a mantissa.
pub(crate) const LOW_MANTISSA_MASK: i64 = (1 << LOW_MANTISSA_BITS) - 1;

/// Slack bits per chunk: between the chunk's sign bit and the top of a 53-bit mantissa.
pub(crate) const CARRY_BITS: u32 = (64 - 1) - fp::MANTISSA_BITS;

/// Adds that can be absorbed by the slack bits between two carry propagations.
pub(crate) const CARRY_TERMS: i32 = (1 << CARRY_BITS) - 1;

/// A small superaccumulator: holds an exact running sum of `f64` terms, rounding only when the
/// final result is extracted with [`round`](SmallAccumulator::round).
///
/// This is a plain value type with no indirection: it can be copied, compared, sent between
/// threads, and (de)serialized to a fixed byte layout with
/// [`to_le_bytes`](SmallAccumulator::to_le_bytes) /
/// [`from_le_bytes`](SmallAccumulator::from_le_bytes). Two accumulators merge with
/// [`add_acc`](SmallAccumulator::add_acc), which is associative and commutative, so partial sums
/// built independently (per thread, per process, per reduction rank) combine into the same final
/// result as a single sequential sum.
///
/// # Example
///
/// ```
/// use exact_sum::SmallAccumulator;
///
/// let mut acc = SmallAccumulator::new();
/// acc.add(1.0);
/// acc.add(f64::EPSILON / 2.0);
/// acc.add(-1.0);
/// assert_eq!(acc.round(), f64::EPSILON / 2.0);  // a naive sum loses the tiny term
/// ```
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
#[repr(C)]
pub struct SmallAccumulator {
  /// The chunks making up the fixed-point sum.
  pub(crate) chunk: [i64; CHUNKS],
  /// Sticky infinity flag: 0, or the bit pattern of the infinity seen (a NaN pattern once
  /// infinities of both signs have been seen).
  pub(crate) inf: i64,
  /// Sticky NaN flag: 0, or the positive-sign NaN bit pattern with the largest payload seen.
  pub(crate) nan: i64,
  /// How many more adds are allowed before carries must be propagated.
  pub(crate) adds_until_propagate: i32,
}

mod basics;
mod add;
mod propagate;
mod round;
mod ops;
