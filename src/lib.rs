//! Addressable Heap Data Structures for Rust
//!
//! This crate provides six priority queues with integer keys that hand out stable handles,
//! so that a caller such as a shortest-path search can lower the key of an element it
//! inserted earlier.
//!
//! # Features
//!
//! - **Binary Heap** (array form): O(log n) insert, decrease_key and extract_min
//! - **Explicit Binary Heap**: the same tree kept as linked nodes with a `last` pointer
//! - **Binomial Heap**: O(log n) insert, decrease_key and extract_min over a degree-indexed root array
//! - **Fibonacci Heap**: O(1) amortized insert and decrease_key; O(log n) amortized extract_min
//! - **Rank-Pairing Heap**: O(1) amortized insert and decrease_key; O(log n) amortized extract_min
//! - **Violation Heap**: O(1) amortized insert and decrease_key; O(log n) amortized extract_min
//!
//! All of them implement [`Heap`]. Nodes live in generation-checked arenas, so a handle to
//! an extracted element yields [`HeapError::InvalidHandle`] instead of touching freed memory.
//!
//! # Example
//!
//! ```rust
//! use addressable_heaps::fibonacci::FibonacciHeap;
//! use addressable_heaps::Heap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1");
//! let _handle2 = heap.insert(3, "item2");
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.min(), Ok((1, &"item1")));
//! ```
//!
//! # Invariant checking
//!
//! Building with the `check-invariants` feature makes every heap re-verify its whole
//! structure after each mutating operation and panic on the first inconsistency.
//! The randomized suites only check structure when run this way:
//!
//! ```text
//! cargo test --features check-invariants
//! ```

pub mod arena;
pub mod binary;
pub mod binomial;
pub mod explicit;
pub mod fibonacci;
pub mod rank;
pub mod rank_pairing;
pub mod traits;
pub mod violation;

// Re-export the main trait for convenience
pub use traits::{Handle, Heap, HeapError, Key, INFINITY};
