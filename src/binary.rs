//! Binary Heap implementation (array form)
//!
//! An implicit binary min-heap over a vector. Node `i` has parent `(i - 1) / 2` and
//! children `2i + 1` and `2i + 2`.
//!
//! Handles stay valid while elements move: every record stores its own [`EntryKey`], and a
//! slot map translates that key to the record's current index. Each swap rewrites the index
//! of both records it moves.
//!
//! Insert appends a record with key [`INFINITY`] and then lowers it to the requested key, so
//! insertion and `decrease_key` share one sift-up routine.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity |
//! |----------------|------------|
//! | `insert`       | O(log n)   |
//! | `min`          | O(1)       |
//! | `decrease_key` | O(log n)   |
//! | `extract_min`  | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use addressable_heaps::Heap;
//! use addressable_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! heap.insert(3, "three");
//! let one = heap.insert(10, "one");
//! heap.insert(2, "two");
//! heap.decrease_key(&one, 1).unwrap();
//!
//! assert_eq!(heap.extract_min(), Ok((1, "one")));
//! assert_eq!(heap.extract_min(), Ok((2, "two")));
//! assert_eq!(heap.extract_min(), Ok((3, "three")));
//! assert!(heap.extract_min().is_err());
//! ```

use crate::arena::EntryKey;
use crate::traits::{check_decrease, Handle, Heap, HeapError, Key, INFINITY};
use slotmap::SlotMap;

/// Handle to an element in a [`BinaryHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BinaryHandle(EntryKey);

impl Handle for BinaryHandle {}

#[derive(Debug)]
struct Record<T> {
    key: Key,
    item: T,
    /// Slot holding this record's current index
    slot: EntryKey,
}

/// Array-based binary min-heap with stable handles
#[derive(Debug)]
pub struct BinaryHeap<T> {
    data: Vec<Record<T>>,
    /// Current index of every live record
    positions: SlotMap<EntryKey, usize>,
}

impl<T> Heap<T> for BinaryHeap<T> {
    type Handle = BinaryHandle;

    fn new() -> Self {
        Self {
            data: Vec::new(),
            positions: SlotMap::with_key(),
        }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn insert(&mut self, key: Key, item: T) -> Self::Handle {
        let index = self.data.len();
        let slot = self.positions.insert(index);
        self.data.push(Record {
            key: INFINITY,
            item,
            slot,
        });
        self.decrease_at(index, key);

        #[cfg(feature = "check-invariants")]
        self.verify();

        BinaryHandle(slot)
    }

    fn min(&self) -> Result<(Key, &T), HeapError> {
        self.data
            .first()
            .map(|record| (record.key, &record.item))
            .ok_or(HeapError::Empty)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_key: Key) -> Result<(), HeapError> {
        let index = *self
            .positions
            .get(handle.0)
            .ok_or(HeapError::InvalidHandle)?;

        if check_decrease(self.data[index].key, new_key)? {
            self.decrease_at(index, new_key);
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok(())
    }

    fn extract_min(&mut self) -> Result<(Key, T), HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::Empty);
        }

        let last = self.data.len() - 1;
        self.swap(0, last);
        let record = self.data.pop().ok_or(HeapError::Empty)?;
        self.positions.remove(record.slot);

        if !self.data.is_empty() {
            self.sift_down(0);
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok((record.key, record.item))
    }

    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError> {
        let index = *self
            .positions
            .get(handle.0)
            .ok_or(HeapError::InvalidHandle)?;
        let record = &self.data[index];
        Ok((record.key, &record.item))
    }
}

impl<T> BinaryHeap<T> {
    /// Sets the key at `index` and sifts the record up
    fn decrease_at(&mut self, mut index: usize, key: Key) {
        self.data[index].key = key;

        while index > 0 {
            let parent = (index - 1) / 2;
            if self.data[index].key < self.data[parent].key {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.data[left].key < self.data[smallest].key {
                smallest = left;
            }
            if right < len && self.data[right].key < self.data[smallest].key {
                smallest = right;
            }

            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    /// Swaps two records and the stored indices of both
    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        self.positions[self.data[a].slot] = a;
        self.positions[self.data[b].slot] = b;
    }

    /// Panics if heap order or the index table is inconsistent
    #[cfg(any(test, feature = "check-invariants"))]
    pub(crate) fn verify(&self) {
        assert_eq!(self.positions.len(), self.data.len(), "index table size");
        for (index, record) in self.data.iter().enumerate() {
            assert_eq!(self.positions[record.slot], index, "stale self-index");
            if index > 0 {
                let parent = (index - 1) / 2;
                assert!(
                    self.data[parent].key <= record.key,
                    "heap order violated at index {index}"
                );
            }
        }
    }
}

impl<T> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
