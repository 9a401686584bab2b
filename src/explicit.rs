//! Explicit Binary Heap implementation (pointer form)
//!
//! The same ordering as [`BinaryHeap`](crate::binary::BinaryHeap), but the complete binary
//! tree is built from linked nodes (`parent`, `left`, `right`) instead of array indices.
//!
//! # Algorithm Overview
//!
//! The heap tracks `last`, the final node in level order. Array append and array pop are
//! simulated by walking from `last`:
//!
//! - **Next slot** (insert): climb while the current node is a right child. If that stops at
//!   a left child whose parent has no right child, the new node becomes that right child.
//!   Otherwise move to the parent's right child (or stay at the root when the climb reached
//!   it) and descend left to the first missing left child.
//! - **Previous last** (extract): climb while the current node is a left child. Below the
//!   root, step to the left sibling; then descend right as far as possible.
//!
//! Order is restored by swapping node *contents*, never nodes. Contents live in an entry
//! arena (see [`arena`](crate::arena)) so handles keep following their elements.
//!
//! # Time Complexity
//!
//! All operations are O(log n); `min` is O(1).

use crate::arena::{swap_contents, Entry, EntryKey, HoldsEntry, NodeKey};
use crate::traits::{check_decrease, Handle, Heap, HeapError, Key};
use slotmap::SlotMap;

/// Handle to an element in an [`ExplicitHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExplicitHandle(EntryKey);

impl Handle for ExplicitHandle {}

#[derive(Debug)]
struct Node {
    parent: Option<NodeKey>,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
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

/// Pointer-based binary min-heap with a level-order `last` pointer
///
/// # Example
///
/// ```rust
/// use addressable_heaps::Heap;
/// use addressable_heaps::explicit::ExplicitHeap;
///
/// let mut heap = ExplicitHeap::new();
/// let h = heap.insert(8, "eight");
/// heap.insert(4, "four");
/// heap.decrease_key(&h, 2).unwrap();
/// assert_eq!(heap.min(), Ok((2, &"eight")));
/// ```
#[derive(Debug)]
pub struct ExplicitHeap<T> {
    nodes: SlotMap<NodeKey, Node>,
    entries: SlotMap<EntryKey, Entry<T>>,
    root: Option<NodeKey>,
    last: Option<NodeKey>,
}

impl<T> Heap<T> for ExplicitHeap<T> {
    type Handle = ExplicitHandle;

    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            entries: SlotMap::with_key(),
            root: None,
            last: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn insert(&mut self, key: Key, item: T) -> Self::Handle {
        let (parent, as_right) = match (self.root, self.last) {
            (Some(root), Some(last)) => self.next_slot(root, last),
            _ => (None, false),
        };

        let node = self.nodes.insert(Node {
            parent,
            left: None,
            right: None,
            entry: EntryKey::default(),
        });
        let entry = self.entries.insert(Entry { key, item, node });
        self.nodes[node].entry = entry;

        match parent {
            Some(p) if as_right => self.nodes[p].right = Some(node),
            Some(p) => self.nodes[p].left = Some(node),
            None => self.root = Some(node),
        }
        self.last = Some(node);

        self.heapify_up(node);

        #[cfg(feature = "check-invariants")]
        self.verify();

        ExplicitHandle(entry)
    }

    fn min(&self) -> Result<(Key, &T), HeapError> {
        let root = self.root.ok_or(HeapError::Empty)?;
        let entry = &self.entries[self.nodes[root].entry];
        Ok((entry.key, &entry.item))
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_key: Key) -> Result<(), HeapError> {
        let entry = self
            .entries
            .get_mut(handle.0)
            .ok_or(HeapError::InvalidHandle)?;

        if check_decrease(entry.key, new_key)? {
            entry.key = new_key;
            let node = entry.node;
            self.heapify_up(node);
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok(())
    }

    fn extract_min(&mut self) -> Result<(Key, T), HeapError> {
        let (root, last) = match (self.root, self.last) {
            (Some(root), Some(last)) => (root, last),
            _ => return Err(HeapError::Empty),
        };

        swap_contents(&mut self.nodes, &mut self.entries, root, last);
        let removed = self.delete_last(root, last);

        if let Some(root) = self.root {
            self.heapify_down(root);
        }

        let entry = self
            .entries
            .remove(removed)
            .ok_or(HeapError::InvalidHandle)?;

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok((entry.key, entry.item))
    }

    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError> {
        let entry = self.entries.get(handle.0).ok_or(HeapError::InvalidHandle)?;
        Ok((entry.key, &entry.item))
    }
}

impl<T> ExplicitHeap<T> {
    fn key(&self, node: NodeKey) -> Key {
        self.entries[self.nodes[node].entry].key
    }

    fn is_right_child(&self, node: NodeKey) -> bool {
        self.nodes[node]
            .parent
            .is_some_and(|p| self.nodes[p].right == Some(node))
    }

    fn is_left_child(&self, node: NodeKey) -> bool {
        self.nodes[node]
            .parent
            .is_some_and(|p| self.nodes[p].left == Some(node))
    }

    /// Finds where the next node in level order attaches.
    ///
    /// Returns the parent and whether the new node becomes its right child.
    fn next_slot(&self, root: NodeKey, last: NodeKey) -> (Option<NodeKey>, bool) {
        let mut cur = last;
        while cur != root && self.is_right_child(cur) {
            cur = self.nodes[cur].parent.unwrap_or(root);
        }

        if let Some(parent) = self.nodes[cur].parent {
            match self.nodes[parent].right {
                None => return (Some(parent), true),
                Some(right) => cur = right,
            }
        }

        while let Some(left) = self.nodes[cur].left {
            cur = left;
        }
        (Some(cur), false)
    }

    /// Finds the node preceding `last` in level order. `last` must not be the root.
    fn previous_last(&self, root: NodeKey, last: NodeKey) -> NodeKey {
        let mut cur = last;
        while cur != root && self.is_left_child(cur) {
            cur = self.nodes[cur].parent.unwrap_or(root);
        }

        if let Some(parent) = self.nodes[cur].parent {
            // `cur` is a right child, so its parent has a left child
            cur = self.nodes[parent].left.unwrap_or(cur);
        }

        while let Some(right) = self.nodes[cur].right {
            cur = right;
        }
        cur
    }

    /// Detaches the `last` node, moves `last` back one position and returns the entry the
    /// detached node held.
    fn delete_last(&mut self, root: NodeKey, last: NodeKey) -> EntryKey {
        if last == root {
            self.root = None;
            self.last = None;
        } else {
            let previous = self.previous_last(root, last);
            if let Some(parent) = self.nodes[last].parent {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(last) {
                    parent.left = None;
                } else {
                    parent.right = None;
                }
            }
            self.last = Some(previous);
        }

        let entry = self.nodes[last].entry;
        self.nodes.remove(last);
        entry
    }

    fn heapify_up(&mut self, mut cur: NodeKey) {
        while let Some(parent) = self.nodes[cur].parent {
            if self.key(cur) >= self.key(parent) {
                break;
            }
            swap_contents(&mut self.nodes, &mut self.entries, cur, parent);
            cur = parent;
        }
    }

    fn heapify_down(&mut self, mut cur: NodeKey) {
        loop {
            let mut smallest = cur;
            if let Some(left) = self.nodes[cur].left {
                if self.key(left) < self.key(smallest) {
                    smallest = left;
                }
            }
            if let Some(right) = self.nodes[cur].right {
                if self.key(right) < self.key(smallest) {
                    smallest = right;
                }
            }

            if smallest == cur {
                break;
            }
            swap_contents(&mut self.nodes, &mut self.entries, cur, smallest);
            cur = smallest;
        }
    }

    /// Keys in level order, for inspecting tree shape
    #[cfg(test)]
    fn level_order(&self) -> Vec<Key> {
        let mut keys = Vec::new();
        let mut queue: std::collections::VecDeque<NodeKey> = self.root.into_iter().collect();
        while let Some(node) = queue.pop_front() {
            keys.push(self.key(node));
            queue.extend(self.nodes[node].left);
            queue.extend(self.nodes[node].right);
        }
        keys
    }

    /// Panics if the tree is not a heap-ordered complete binary tree ending at `last`
    #[cfg(any(test, feature = "check-invariants"))]
    pub(crate) fn verify(&self) {
        assert_eq!(self.nodes.len(), self.entries.len(), "node/entry count");

        let mut order = Vec::new();
        let mut queue: std::collections::VecDeque<NodeKey> = self.root.into_iter().collect();
        while let Some(node) = queue.pop_front() {
            order.push(node);
            let n = &self.nodes[node];
            assert_eq!(self.entries[n.entry].node, node, "entry back-reference");
            for child in [n.left, n.right].into_iter().flatten() {
                assert_eq!(self.nodes[child].parent, Some(node), "parent link");
                assert!(self.key(node) <= self.key(child), "heap order violated");
                queue.push_back(child);
            }
            if n.left.is_none() {
                assert!(n.right.is_none(), "right child without left child");
            }
        }

        assert_eq!(order.len(), self.nodes.len(), "unreachable nodes");
        assert_eq!(order.last().copied(), self.last, "last is not final in level order");
        // Completeness: once a missing child is seen, no later node has children
        let mut gap = false;
        for node in &order {
            for child in [self.nodes[*node].left, self.nodes[*node].right] {
                match child {
                    Some(_) => assert!(!gap, "tree is not complete"),
                    None => gap = true,
                }
            }
        }
    }
}

impl<T> Default for ExplicitHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
