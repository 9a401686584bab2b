//! Common contract for the addressable heaps in this crate
//!
//! Every heap stores `(key, item)` pairs ordered by an integer [`Key`] and hands out a
//! [`Handle`] for each inserted element. The handle stays valid until that element is
//! extracted, and is the only way to address an element for [`Heap::decrease_key`].
//!
//! Failures are ordinary values rather than panics: callers such as a shortest-path loop or
//! an operation fuzzer branch on [`HeapError`] routinely.

use std::fmt;
use thiserror::Error;

/// Priority type shared by all heaps. Smaller keys are extracted first.
pub type Key = i64;

/// Largest representable key, used as the "not yet placed" sentinel.
pub const INFINITY: Key = Key::MAX;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The operation needs at least one element
    #[error("empty heap")]
    Empty,
    /// `decrease_key` was asked to raise the key of an element
    #[error("provided key {requested} is higher than stored key {current}")]
    InvalidKey { current: Key, requested: Key },
    /// The handle is no longer valid (element was extracted)
    #[error("handle is no longer valid (element was extracted)")]
    InvalidHandle,
}

/// A handle to an element in the heap, used for decrease_key operations
///
/// Handles are small copyable wrappers around generation-checked arena keys, so a handle
/// whose element was extracted is reported as [`HeapError::InvalidHandle`] instead of
/// aliasing a recycled slot. A handle is only meaningful for the heap that issued it.
pub trait Handle: Copy + PartialEq + Eq + fmt::Debug {}

/// Operation contract implemented by every heap variant
///
/// # Example
///
/// ```rust
/// use addressable_heaps::{Heap, HeapError};
/// use addressable_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let a = heap.insert(10, "a");
/// heap.insert(20, "b");
/// heap.decrease_key(&a, 5).unwrap();
/// assert_eq!(heap.min(), Ok((5, &"a")));
/// assert_eq!(
///     heap.decrease_key(&a, 7),
///     Err(HeapError::InvalidKey { current: 5, requested: 7 })
/// );
/// assert_eq!(heap.extract_min(), Ok((5, "a")));
/// assert_eq!(heap.decrease_key(&a, 1), Err(HeapError::InvalidHandle));
/// ```
pub trait Heap<T> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap holds no elements
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element, returning a handle that stays valid until it is extracted
    ///
    /// # Time Complexity
    /// O(1) amortized for the lazy heaps, O(log n) for binary and binomial heaps.
    fn insert(&mut self, key: Key, item: T) -> Self::Handle;

    /// Returns the minimum key and its item without removing them
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap holds no elements.
    fn min(&self) -> Result<(Key, &T), HeapError>;

    /// Lowers the key of the element behind `handle` and restores heap order
    ///
    /// A `new_key` equal to the stored key is accepted and changes nothing.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the element was already extracted
    /// - [`HeapError::InvalidKey`] if `new_key` is greater than the stored key
    ///
    /// The heap is unchanged when an error is returned.
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: Key) -> Result<(), HeapError>;

    /// Removes the minimum element and returns it, transferring the item to the caller
    ///
    /// The handle of the extracted element becomes invalid.
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap holds no elements.
    fn extract_min(&mut self) -> Result<(Key, T), HeapError>;

    /// Returns the current key and item of the element behind `handle`
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the element was already extracted.
    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError>;
}

/// Checks the decrease-key precondition shared by every variant.
///
/// Returns `Ok(true)` when the key actually goes down and restructuring is needed.
#[inline]
pub(crate) fn check_decrease(current: Key, requested: Key) -> Result<bool, HeapError> {
    if requested > current {
        Err(HeapError::InvalidKey { current, requested })
    } else {
        Ok(requested < current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_decrease() {
        assert_eq!(check_decrease(5, 3), Ok(true));
        assert_eq!(check_decrease(5, 5), Ok(false));
        assert_eq!(
            check_decrease(5, 6),
            Err(HeapError::InvalidKey {
                current: 5,
                requested: 6
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(HeapError::Empty.to_string(), "empty heap");
        assert_eq!(
            HeapError::InvalidKey {
                current: 1,
                requested: 2
            }
            .to_string(),
            "provided key 2 is higher than stored key 1"
        );
    }
}
