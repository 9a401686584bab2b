//! Rank/degree type and utilities for consolidation bookkeeping.
//!
//! # Why u8?
//!
//! The rank (or degree) of a node grows by one per link of equal-rank trees, so it is
//! bounded by a small multiple of `log₂(n)`. A `u8` covers any heap that fits in memory
//! and keeps node records compact.
//!
//! Some rank formulas treat a missing child as rank `-1`, so the arithmetic helpers here
//! work on `i32` and convert back with [`from_signed`].

/// Type alias for node rank/degree.
pub type Rank = u8;

/// Rank assigned to a missing child by the rank formulas.
pub const ABSENT: i32 = -1;

/// Safely increment a rank value, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == u8::MAX`, which valid heap operations cannot reach.
///
/// # Example
///
/// ```rust
/// use addressable_heaps::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1)
        .expect("rank overflow: ranks are logarithmic in the number of elements")
}

/// Rank of an optional child, `-1` when absent.
#[inline]
pub fn signed(rank: Option<Rank>) -> i32 {
    rank.map_or(ABSENT, i32::from)
}

/// Converts a computed rank back to [`Rank`]. Negative values clamp to zero.
#[inline]
pub fn from_signed(rank: i32) -> Rank {
    Rank::try_from(rank.max(0)).expect("rank overflow: computed rank exceeds u8::MAX")
}

/// `ceil(sum / 2)` for possibly negative sums.
///
/// ```rust
/// use addressable_heaps::rank::ceil_half;
///
/// assert_eq!(ceil_half(-2), -1);
/// assert_eq!(ceil_half(-1), 0);
/// assert_eq!(ceil_half(3), 2);
/// ```
#[inline]
pub fn ceil_half(sum: i32) -> i32 {
    (sum + 1).div_euclid(2)
}

/// Initial number of consolidation buckets for a heap of `len` elements:
/// `ceil(log2(len)) + 1`.
///
/// Bucket arrays still grow on demand, since Fibonacci degrees reach `log_φ(n)`.
pub fn bucket_capacity(len: usize) -> usize {
    if len <= 1 {
        1
    } else {
        (usize::BITS - (len - 1).leading_zeros()) as usize + 1
    }
}

/// Grows `buckets` with empty buckets until `index` is addressable.
#[inline]
pub(crate) fn ensure_slot<B: Default>(buckets: &mut Vec<B>, index: usize) {
    if buckets.len() <= index {
        buckets.resize_with(index + 1, B::default);
    }
}
