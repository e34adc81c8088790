#![cfg_attr(not(test), no_std)]
//! This crate computes sums, dot products, and squared norms of `f64` sequences **exactly**: the
//! returned `f64` is the one you would get by summing with infinite precision and rounding just
//! once, to nearest, ties to even. No cancellation, no accumulated rounding error, no dependence
//! on the order of the terms.
//!
//! # Introduction
//!
//! The naive running sum rounds after every addition, so its result depends on the order of the
//! terms and can be arbitrarily wrong when large terms cancel. Compensated schemes (Kahan,
//! pairwise) reduce the error but do not eliminate it. This crate instead implements the
//! *superaccumulator* approach described by Radford M. Neal in
//! ["Fast Exact Summation Using Small and Large Superaccumulators"](https://arxiv.org/abs/1505.05571):
//! the running sum is kept as a wide fixed-point number that can represent any sum of binary64
//! values with no rounding at all, and the one and only rounding happens when the final `f64` is
//! extracted.
//!
//! Two accumulators are provided:
//!
//!   - [`SmallAccumulator`]: 67 overlapping 64-bit chunks indexed by exponent. Terms are added
//!     directly into the chunks; carries are propagated lazily, every 2047 additions at most.
//!     Lowest memory footprint, fastest to round; the representation of choice for merging
//!     partial sums (it is `Copy` and has a defined byte layout).
//!   - [`LargeAccumulator`]: 4096 bins, one per sign/exponent combination, which buffer the *raw
//!     bit patterns* of incoming terms with a single integer add each. Bins are condensed into an
//!     embedded small accumulator only when they fill up (every 4096 terms per bin) or at
//!     rounding time. Fastest for long vectors.
//!
//! Both handle the full binary64 spectrum: denormals, signed zeros, infinities of either sign
//! (opposite infinities make the result NaN), and NaN inputs (the NaN with the largest payload
//! wins, with the sign cleared, so the result does not depend on encounter order).
//!
//! # Usage
//!
//! ```
//! use exact_sum::{SmallAccumulator, LargeAccumulator};
//!
//! // Sums that defeat a running f64 sum are exact here.
//! let mut acc = SmallAccumulator::new();
//! acc.add_slice(&[1.0, 1e100, 1.0, -1e100]);
//! assert_eq!(acc.round(), 2.0);  // the naive sum returns 0.0
//!
//! // Intermediate overflow is no problem as long as the true sum is finite.
//! let mut acc = SmallAccumulator::new();
//! acc.add_slice(&[1e308, 1e308, -1e308]);
//! assert_eq!(acc.round(), 1e308);
//!
//! // The large accumulator has the same semantics, tuned for long inputs.
//! let mut acc = LargeAccumulator::new();
//! acc.add_slice(&[0.1; 1000]);
//! let mut by_one = SmallAccumulator::new();
//! for _ in 0..1000 { by_one.add(0.1); }
//! assert_eq!(acc.round(), by_one.round());
//! ```
//!
//! Partial sums accumulated independently (e.g. one accumulator per thread, or per rank in a
//! reduction) merge losslessly in any order:
//!
//! ```
//! # use exact_sum::SmallAccumulator;
//! let mut a = SmallAccumulator::new();
//! let mut b = SmallAccumulator::new();
//! a.add_slice(&[1.0, 2.5]);
//! b.add_slice(&[-3.5, 4.0]);
//! a.add_acc(&b);
//! assert_eq!(a.round(), 4.0);
//! ```
//!
//! # `no_std`
//!
//! The crate is `no_std` and performs no allocation; both accumulator types are plain values.
//! Note that [`LargeAccumulator`] is about 41 KiB, so you may want to box it on small stacks.
//!
//! Correctness is verified against an exact rational-arithmetic oracle; run the benchmarks with
//! `cargo bench`.

mod fp;
mod small;
mod large;
mod fmt;

pub use small::SmallAccumulator;
pub use large::LargeAccumulator;

/// The error returned by [`SmallAccumulator::try_add_dot`] and [`LargeAccumulator::try_add_dot`]
/// when the two slices differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch;

impl core::fmt::Display for LengthMismatch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "dot product over slices of unequal length")
  }
}

/// Exact-rational oracle used to verify the accumulators in tests.
#[cfg(test)]
mod rational;


#[cfg(test)]
pub(crate) const PROPTEST_CASES: u32 = if cfg!(debug_assertions) {256} else {2048};
