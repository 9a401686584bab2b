//! Binomial Heap implementation
//!
//! A binomial heap is a collection of binomial trees with:
//! - O(log n) insert and extract_min
//! - O(log n) decrease_key
//!
//! # Algorithm Overview
//!
//! A binomial heap maintains a collection of binomial trees, where:
//! - Each tree satisfies the heap property, so a tree's minimum is its root
//! - At most one tree of each degree (0, 1, 2, ..., log n)
//! - This is analogous to binary representation of n
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly k children, which are B_{k-1}, ..., B₀
//!
//! Roots live in a dense array indexed by degree. Adding a tree is a binary-counter
//! increment: while the slot for its degree is taken, link the two trees and carry the
//! result one slot up.
//!
//! **Decrease-key** swaps contents with the parent instead of relinking nodes, so the tree
//! shape never changes. Contents live in an entry arena (see [`arena`](crate::arena)) and
//! handles address entries, so a handle follows its element through the swaps.

use crate::arena::{swap_contents, Entry, EntryKey, HoldsEntry, NodeKey};
use crate::rank::{checked_increment, ensure_slot, Rank};
use crate::traits::{check_decrease, Handle, Heap, HeapError, Key};
use log::trace;
use slotmap::SlotMap;

/// Handle to an element in a [`BinomialHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BinomialHandle(EntryKey);

impl Handle for BinomialHandle {}

/// Internal node structure for binomial heap
///
/// Children form a singly linked list through `sibling`, highest degree first.
#[derive(Debug)]
struct Node {
    parent: Option<NodeKey>,
    /// First (highest-degree) child
    child: Option<NodeKey>,
    /// Next sibling in parent's child list
    sibling: Option<NodeKey>,
    /// Number of children. A binomial tree Bₖ has root degree k and 2ᵏ nodes
    degree: Rank,
    entry: EntryKey,
}

impl HoldsEntry for Node {
    fn entry(&self) -> EntryKey {
        self.entry
    }

    fn set_entry(&mut self, entry: EntryKey) {
        self.entry = entry;
    }
}

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::binomial::BinomialHeap;
/// use addressable_heaps::Heap;
///
/// let mut heap = BinomialHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.min(), Ok((1, &"item")));
/// ```
#[derive(Debug)]
pub struct BinomialHeap<T> {
    nodes: SlotMap<NodeKey, Node>,
    entries: SlotMap<EntryKey, Entry<T>>,
    /// Array of binomial trees indexed by degree. Each slot holds at most one tree.
    trees: Vec<Option<NodeKey>>,
    /// Root holding the minimum key
    min: Option<NodeKey>,
}

impl<T> Heap<T> for BinomialHeap<T> {
    type Handle = BinomialHandle;

    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            entries: SlotMap::with_key(),
            trees: Vec::new(),
            min: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Inserts a new element into the heap
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// The new single-node tree is carried up the degree array like a binary increment.
    fn insert(&mut self, key: Key, item: T) -> Self::Handle {
        let node = self.nodes.insert(Node {
            parent: None,
            child: None,
            sibling: None,
            degree: 0,
            entry: EntryKey::default(),
        });
        let entry = self.entries.insert(Entry { key, item, node });
        self.nodes[node].entry = entry;

        let is_new_min = self.min.map_or(true, |min| key < self.key(min));
        if is_new_min {
            self.min = Some(node);
        }

        let root = self.add_tree(node);

        // The carry may have linked the minimum under an equal-keyed root
        if let Some(min) = self.min {
            if self.nodes[min].parent.is_some() {
                self.min = Some(root);
            }
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        BinomialHandle(entry)
    }

    fn min(&self) -> Result<(Key, &T), HeapError> {
        let min = self.min.ok_or(HeapError::Empty)?;
        let entry = &self.entries[self.nodes[min].entry];
        Ok((entry.key, &entry.item))
    }

    /// Decreases the key of an element
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// Swaps contents with the parent while the parent's key is larger. The tree shape is
    /// untouched.
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: Key) -> Result<(), HeapError> {
        let entry = self
            .entries
            .get_mut(handle.0)
            .ok_or(HeapError::InvalidHandle)?;

        if check_decrease(entry.key, new_key)? {
            entry.key = new_key;
            let node = entry.node;
            self.bubble_up(node);
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok(())
    }

    /// Removes and returns the minimum element
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// The minimum root leaves its slot; its children (B_{k-1}, ..., B₀) are carried into
    /// the remaining array one by one, then the roots are scanned for the new minimum.
    fn extract_min(&mut self) -> Result<(Key, T), HeapError> {
        let min = self.min.take().ok_or(HeapError::Empty)?;

        let degree = usize::from(self.nodes[min].degree);
        self.trees[degree] = None;

        let mut child = self.nodes[min].child.take();
        let mut promoted = 0usize;
        while let Some(c) = child {
            child = self.nodes[c].sibling.take();
            self.nodes[c].parent = None;
            self.add_tree(c);
            promoted += 1;
        }

        while let Some(None) = self.trees.last() {
            self.trees.pop();
        }
        self.find_and_update_min();

        let entry_key = self.nodes[min].entry;
        self.nodes.remove(min);
        let entry = self
            .entries
            .remove(entry_key)
            .ok_or(HeapError::InvalidHandle)?;

        trace!(
            "binomial extract_min: promoted {promoted} children, {} slots",
            self.trees.len()
        );

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok((entry.key, entry.item))
    }

    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError> {
        let entry = self.entries.get(handle.0).ok_or(HeapError::InvalidHandle)?;
        Ok((entry.key, &entry.item))
    }
}

impl<T> BinomialHeap<T> {
    fn key(&self, node: NodeKey) -> Key {
        self.entries[self.nodes[node].entry].key
    }

    /// Carries a parentless tree into the degree array and returns the root it ends up in.
    fn add_tree(&mut self, tree: NodeKey) -> NodeKey {
        let mut carry = tree;
        let mut degree = usize::from(self.nodes[tree].degree);

        loop {
            ensure_slot(&mut self.trees, degree);
            match self.trees[degree].take() {
                None => {
                    self.trees[degree] = Some(carry);
                    return carry;
                }
                Some(existing) => {
                    carry = self.link_trees(existing, carry);
                    degree += 1;
                }
            }
        }
    }

    /// Links two binomial trees of the same degree into one tree of degree+1
    ///
    /// The root with the larger key becomes the first child of the other; on equal keys
    /// `a` stays on top.
    fn link_trees(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (parent, child) = if self.key(a) <= self.key(b) {
            (a, b)
        } else {
            (b, a)
        };

        self.nodes[child].parent = Some(parent);
        self.nodes[child].sibling = self.nodes[parent].child;
        self.nodes[parent].child = Some(child);
        self.nodes[parent].degree = checked_increment(self.nodes[parent].degree);

        parent
    }

    /// Swaps contents upward while the parent has a larger key
    fn bubble_up(&mut self, node: NodeKey) {
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            if self.key(current) >= self.key(parent) {
                break;
            }
            swap_contents(&mut self.nodes, &mut self.entries, current, parent);
            current = parent;
        }

        if self.nodes[current].parent.is_none() {
            let is_new_min = self.min.map_or(true, |min| self.key(current) < self.key(min));
            if is_new_min {
                self.min = Some(current);
            }
        }
    }

    /// Finds and updates the minimum pointer by scanning all roots
    fn find_and_update_min(&mut self) {
        self.min = None;
        for root in self.trees.iter().flatten().copied() {
            if self.min.map_or(true, |min| self.key(root) < self.key(min)) {
                self.min = Some(root);
            }
        }
    }

    /// Panics if any binomial-tree, heap-order or bookkeeping invariant fails
    #[cfg(any(test, feature = "check-invariants"))]
    pub(crate) fn verify(&self) {
        let mut count = 0;
        for (degree, root) in self.trees.iter().enumerate() {
            if let Some(root) = *root {
                assert!(self.nodes[root].parent.is_none(), "root has a parent");
                assert_eq!(usize::from(self.nodes[root].degree), degree, "root in wrong slot");
                count += self.verify_tree(root);
            }
        }
        assert_eq!(count, self.nodes.len(), "unreachable nodes");
        assert_eq!(count, self.entries.len(), "node/entry count");

        match self.min {
            Some(min) => {
                assert!(self.nodes[min].parent.is_none(), "min is not a root");
                for root in self.trees.iter().flatten() {
                    assert!(self.key(min) <= self.key(*root), "min is not minimal");
                }
            }
            None => assert_eq!(count, 0, "min missing on non-empty heap"),
        }
    }

    #[cfg(any(test, feature = "check-invariants"))]
    fn verify_tree(&self, node: NodeKey) -> usize {
        let n = &self.nodes[node];
        assert_eq!(self.entries[n.entry].node, node, "entry back-reference");

        let mut count = 1;
        let mut expected = usize::from(n.degree);
        let mut child = n.child;
        while let Some(c) = child {
            expected -= 1;
            assert_eq!(self.nodes[c].parent, Some(node), "parent link");
            assert_eq!(usize::from(self.nodes[c].degree), expected, "child degree");
            assert!(self.key(node) <= self.key(c), "heap order violated");
            count += self.verify_tree(c);
            child = self.nodes[c].sibling;
        }
        assert_eq!(expected, 0, "missing children");
        assert_eq!(count, 1 << n.degree, "binomial tree size");
        count
    }
}

impl<T> Default for BinomialHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
