//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert and decrease_key
//! - O(log n) amortized extract_min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list, and so is every child list. The heap maintains
//! the minimum node pointer.
//!
//! Work is deferred to `extract_min`: the minimum's children join the root list and the
//! roots are consolidated so that no two share a degree. `decrease_key` cuts a node that
//! violates heap order and cascades the cut through ancestors that already lost a child.

use crate::arena::NodeKey;
use crate::rank::{bucket_capacity, checked_increment, ensure_slot, Rank};
use crate::traits::{check_decrease, Handle, Heap, HeapError, Key};
use log::trace;
use slotmap::SlotMap;

/// Handle to an element in a [`FibonacciHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FibonacciHandle(NodeKey);

impl Handle for FibonacciHandle {}

#[derive(Debug)]
struct Node<T> {
    key: Key,
    item: T,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
    degree: Rank,
    /// Lost a child since it last became a child
    marked: bool,
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::fibonacci::FibonacciHeap;
/// use addressable_heaps::Heap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.min(), Ok((1, &"item")));
/// ```
#[derive(Debug)]
pub struct FibonacciHeap<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    min: Option<NodeKey>,
}

impl<T> Heap<T> for FibonacciHeap<T> {
    type Handle = FibonacciHandle;

    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            min: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn insert(&mut self, key: Key, item: T) -> Self::Handle {
        let node = self.nodes.insert_with_key(|k| Node {
            key,
            item,
            parent: None,
            child: None,
            left: k,
            right: k,
            degree: 0,
            marked: false,
        });
        self.add_to_root(node);

        #[cfg(feature = "check-invariants")]
        self.verify();

        FibonacciHandle(node)
    }

    fn min(&self) -> Result<(Key, &T), HeapError> {
        let min = self.min.ok_or(HeapError::Empty)?;
        let node = &self.nodes[min];
        Ok((node.key, &node.item))
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_key: Key) -> Result<(), HeapError> {
        let x = handle.0;
        let node = self.nodes.get_mut(x).ok_or(HeapError::InvalidHandle)?;
        if !check_decrease(node.key, new_key)? {
            return Ok(());
        }
        node.key = new_key;

        if let Some(y) = self.nodes[x].parent {
            if new_key < self.nodes[y].key {
                self.cut(x, y);
                self.cascading_cut(y);
            }
        }

        if let Some(min) = self.min {
            if new_key < self.nodes[min].key {
                self.min = Some(x);
            }
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok(())
    }

    fn extract_min(&mut self) -> Result<(Key, T), HeapError> {
        let z = self.min.ok_or(HeapError::Empty)?;

        // Add children to root list
        if let Some(first) = self.nodes[z].child.take() {
            let mut current = first;
            loop {
                let next = self.nodes[current].right;
                self.nodes[current].parent = None;
                self.nodes[current].marked = false;
                self.unlink(current);
                self.splice_after(z, current);
                if next == current {
                    break;
                }
                current = next;
            }
        }

        // Remove min from root list
        let right = self.nodes[z].right;
        if right == z {
            self.min = None;
        } else {
            self.unlink(z);
            self.min = Some(right);
            self.consolidate(right);
        }

        let node = self.nodes.remove(z).ok_or(HeapError::InvalidHandle)?;

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok((node.key, node.item))
    }

    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError> {
        let node = self.nodes.get(handle.0).ok_or(HeapError::InvalidHandle)?;
        Ok((node.key, &node.item))
    }
}

impl<T> FibonacciHeap<T> {
    /// Consolidates the heap by linking trees of the same degree
    fn consolidate(&mut self, start: NodeKey) {
        let mut roots = vec![start];
        let mut current = self.nodes[start].right;
        while current != start {
            roots.push(current);
            current = self.nodes[current].right;
        }
        let root_count = roots.len();

        let mut degree_table: Vec<Option<NodeKey>> = vec![None; bucket_capacity(self.nodes.len())];
        for root in roots {
            let mut x = root;
            let mut d = usize::from(self.nodes[x].degree);

            // Link with existing trees of the same degree
            loop {
                ensure_slot(&mut degree_table, d);
                let Some(mut y) = degree_table[d].take() else {
                    break;
                };
                if self.nodes[y].key < self.nodes[x].key {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }
            degree_table[d] = Some(x);
        }

        // Rebuild root list and find new min
        self.min = None;
        let mut survivors = 0usize;
        for root in degree_table.into_iter().flatten() {
            self.nodes[root].left = root;
            self.nodes[root].right = root;
            self.add_to_root(root);
            survivors += 1;
        }

        trace!("fibonacci consolidate: {root_count} roots -> {survivors}");
    }

    /// Links root `y` as a child of root `x`
    fn link(&mut self, y: NodeKey, x: NodeKey) {
        self.unlink(y);
        self.nodes[y].parent = Some(x);
        self.nodes[y].marked = false;

        match self.nodes[x].child {
            Some(child) => self.splice_after(child, y),
            None => self.nodes[x].child = Some(y),
        }
        self.nodes[x].degree = checked_increment(self.nodes[x].degree);
    }

    /// Cuts `x` from its parent `y` and adds it to the root list
    fn cut(&mut self, x: NodeKey, y: NodeKey) {
        let next = self.nodes[x].right;
        if self.nodes[y].child == Some(x) {
            self.nodes[y].child = if next == x { None } else { Some(next) };
        }
        self.unlink(x);
        self.nodes[y].degree -= 1;

        self.nodes[x].parent = None;
        self.nodes[x].marked = false;
        self.add_to_root(x);
    }

    /// Marks `y`, or cuts it and continues upward if it was already marked
    fn cascading_cut(&mut self, mut y: NodeKey) {
        let mut cuts = 0usize;
        while let Some(z) = self.nodes[y].parent {
            if !self.nodes[y].marked {
                self.nodes[y].marked = true;
                break;
            }
            self.cut(y, z);
            cuts += 1;
            y = z;
        }
        if cuts > 0 {
            trace!("fibonacci cascading cut: {cuts} ancestors promoted");
        }
    }

    /// Adds a detached single node to the root list, updating min
    fn add_to_root(&mut self, node: NodeKey) {
        match self.min {
            None => {
                self.nodes[node].left = node;
                self.nodes[node].right = node;
                self.min = Some(node);
            }
            Some(min) => {
                self.splice_after(min, node);
                if self.nodes[node].key < self.nodes[min].key {
                    self.min = Some(node);
                }
            }
        }
    }

    /// Inserts detached `node` to the right of `anchor` in anchor's ring
    fn splice_after(&mut self, anchor: NodeKey, node: NodeKey) {
        let next = self.nodes[anchor].right;
        self.nodes[node].left = anchor;
        self.nodes[node].right = next;
        self.nodes[next].left = node;
        self.nodes[anchor].right = node;
    }

    /// Removes `node` from its ring and makes it a ring of one
    fn unlink(&mut self, node: NodeKey) {
        let left = self.nodes[node].left;
        let right = self.nodes[node].right;
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        self.nodes[node].left = node;
        self.nodes[node].right = node;
    }

    /// Collects the members of the ring containing `start`
    #[cfg(any(test, feature = "check-invariants"))]
    fn ring(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut members = vec![start];
        let mut current = self.nodes[start].right;
        while current != start {
            members.push(current);
            current = self.nodes[current].right;
        }
        members
    }

    /// Panics if links, degrees, heap order or the min pointer are inconsistent
    #[cfg(any(test, feature = "check-invariants"))]
    pub(crate) fn verify(&self) {
        let Some(min) = self.min else {
            assert!(self.nodes.is_empty(), "min missing on non-empty heap");
            return;
        };

        let mut count = 0;
        for root in self.ring(min) {
            assert!(self.nodes[root].parent.is_none(), "root has a parent");
            assert!(self.nodes[min].key <= self.nodes[root].key, "min is not minimal");
            count += self.verify_tree(root);
        }
        assert_eq!(count, self.nodes.len(), "unreachable nodes");
    }

    #[cfg(any(test, feature = "check-invariants"))]
    fn verify_tree(&self, node: NodeKey) -> usize {
        let n = &self.nodes[node];
        assert_eq!(self.nodes[n.left].right, node, "ring link symmetry");
        assert_eq!(self.nodes[n.right].left, node, "ring link symmetry");

        let mut count = 1;
        let children = n.child.map(|c| self.ring(c)).unwrap_or_default();
        assert_eq!(children.len(), usize::from(n.degree), "degree mismatch");
        for child in children {
            assert_eq!(self.nodes[child].parent, Some(node), "parent link");
            assert!(n.key <= self.nodes[child].key, "heap order violated");
            count += self.verify_tree(child);
        }
        count
    }
}

impl<T> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
