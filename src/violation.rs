//! Violation Heap implementation
//!
//! A violation heap keeps heap-ordered trees whose roots form a singly linked ring. Only the
//! first two children of a node, its *active* children, take part in rank bookkeeping:
//!
//! ```text
//! rank(n) = ceil((r1 + r2) / 2) + 1
//! ```
//!
//! where `r1` and `r2` are the ranks of the first two children (-1 when missing), so a leaf
//! has rank 0. Linking always pushes the new child to the front of the list, which makes the
//! active children the two most recently attached ones.
//!
//! # Operations
//!
//! - **Insert**: O(1), splice a singleton into the root ring
//! - **Decrease-key**: O(1) amortized. An active node that still sits below its parent stays
//!   put. Otherwise its largest-rank active child takes its place in the parent's child list,
//!   the node moves to the root ring, and ranks are repaired up through active ancestors
//!   while they keep shrinking.
//! - **Extract-min**: O(log n) amortized. The minimum's children join the roots, and roots are
//!   consolidated three at a time: whenever a third root of some rank turns up, the two larger
//!   keys become children of the smallest, whose rank goes up by one. Afterwards at most two
//!   roots share a rank.

use crate::arena::NodeKey;
use crate::rank::{bucket_capacity, ceil_half, checked_increment, ensure_slot, from_signed, signed, Rank};
use crate::traits::{check_decrease, Handle, Heap, HeapError, Key};
use log::trace;
use slotmap::SlotMap;
use smallvec::SmallVec;

/// Handle to an element in a [`ViolationHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ViolationHandle(NodeKey);

impl Handle for ViolationHandle {}

/// Position of a node relative to its parent
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Activity {
    Root,
    /// One of the first two children
    Active,
    Inactive,
}

#[derive(Debug)]
struct Node<T> {
    key: Key,
    item: T,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    /// Next sibling, or ring successor for a root
    next: Option<NodeKey>,
    /// Previous sibling; `None` for first children and roots
    prev: Option<NodeKey>,
    rank: Rank,
    activity: Activity,
}

/// Violation Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::violation::ViolationHeap;
/// use addressable_heaps::Heap;
///
/// let mut heap = ViolationHeap::new();
/// for key in [4, 9, 2, 7] {
///     heap.insert(key, key * 10);
/// }
/// assert_eq!(heap.extract_min(), Ok((2, 20)));
/// assert_eq!(heap.min(), Ok((4, &40)));
/// ```
#[derive(Debug)]
pub struct ViolationHeap<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    min: Option<NodeKey>,
}

type Bucket = SmallVec<[NodeKey; 2]>;

impl<T> Heap<T> for ViolationHeap<T> {
    type Handle = ViolationHandle;

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
        let node = self.nodes.insert(Node {
            key,
            item,
            parent: None,
            child: None,
            next: None,
            prev: None,
            rank: 0,
            activity: Activity::Root,
        });
        self.add_to_root(node);

        #[cfg(feature = "check-invariants")]
        self.verify();

        ViolationHandle(node)
    }

    fn min(&self) -> Result<(Key, &T), HeapError> {
        let min = self.min.ok_or(HeapError::Empty)?;
        let node = &self.nodes[min];
        Ok((node.key, &node.item))
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_key: Key) -> Result<(), HeapError> {
        let n = handle.0;
        let node = self.nodes.get_mut(n).ok_or(HeapError::InvalidHandle)?;
        if !check_decrease(node.key, new_key)? {
            return Ok(());
        }
        node.key = new_key;

        let activity = self.nodes[n].activity;
        let Some(p) = self.nodes[n].parent else {
            if let Some(min) = self.min {
                if new_key < self.nodes[min].key {
                    self.min = Some(n);
                }
            }
            return Ok(());
        };
        if activity == Activity::Active && self.nodes[p].key <= new_key {
            return Ok(());
        }

        match self.largest_active_child(n) {
            Some(c) => {
                self.splice_out(c);
                self.refresh_activity(n);
                self.replace(n, c);
            }
            None => {
                self.splice_out(n);
                self.refresh_activity(p);
            }
        }
        self.recalc_rank(n);

        if activity == Activity::Active {
            self.repair_ranks(p);
        }
        self.add_to_root(n);

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok(())
    }

    fn extract_min(&mut self) -> Result<(Key, T), HeapError> {
        let min = self.min.ok_or(HeapError::Empty)?;

        let mut roots = Vec::new();
        let mut current = self.nodes[min].next;
        while let Some(r) = current {
            if r == min {
                break;
            }
            current = self.nodes[r].next;
            roots.push(r);
        }
        let mut child = self.nodes[min].child;
        while let Some(c) = child {
            child = self.nodes[c].next;
            roots.push(c);
        }

        let node = self.nodes.remove(min).ok_or(HeapError::InvalidHandle)?;
        self.min = None;
        self.consolidate(roots);

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok((node.key, node.item))
    }

    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError> {
        let node = self.nodes.get(handle.0).ok_or(HeapError::InvalidHandle)?;
        Ok((node.key, &node.item))
    }
}

impl<T> ViolationHeap<T> {
    /// Links roots three per rank and rebuilds the root ring
    fn consolidate(&mut self, roots: Vec<NodeKey>) {
        let root_count = roots.len();
        let mut buckets: Vec<Bucket> = Vec::new();
        buckets.resize_with(bucket_capacity(root_count), Bucket::new);

        for root in roots {
            let node = &mut self.nodes[root];
            node.parent = None;
            node.prev = None;
            node.next = None;
            node.activity = Activity::Root;

            let mut z = root;
            loop {
                let rank = usize::from(self.nodes[z].rank);
                ensure_slot(&mut buckets, rank);
                if buckets[rank].len() < 2 {
                    buckets[rank].push(z);
                    break;
                }

                let (mut z1, mut z2) = (buckets[rank][1], buckets[rank][0]);
                buckets[rank].clear();
                if self.nodes[z1].key < self.nodes[z].key {
                    std::mem::swap(&mut z1, &mut z);
                }
                if self.nodes[z2].key < self.nodes[z].key {
                    std::mem::swap(&mut z2, &mut z);
                }
                self.link(z, z1);
                self.link(z, z2);
                self.nodes[z].rank = checked_increment(self.nodes[z].rank);
            }
        }

        let mut survivors = 0usize;
        for root in buckets.into_iter().flatten() {
            self.add_to_root(root);
            survivors += 1;
        }
        trace!("violation consolidate: {root_count} roots -> {survivors}");
    }

    /// Pushes root `child` to the front of `parent`'s child list
    fn link(&mut self, parent: NodeKey, child: NodeKey) {
        let first = self.nodes[parent].child;
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.prev = None;
        node.next = first;
        if let Some(first) = first {
            self.nodes[first].prev = Some(child);
        }
        self.nodes[parent].child = Some(child);
        self.refresh_activity(parent);
    }

    /// Recomputes the first three children's activity after the child list changed
    fn refresh_activity(&mut self, parent: NodeKey) {
        let mut current = self.nodes[parent].child;
        for activity in [Activity::Active, Activity::Active, Activity::Inactive] {
            let Some(c) = current else {
                break;
            };
            self.nodes[c].activity = activity;
            current = self.nodes[c].next;
        }
    }

    /// Active child with the larger rank, preferring the first child on ties
    fn largest_active_child(&self, node: NodeKey) -> Option<NodeKey> {
        let first = self.nodes[node].child?;
        match self.nodes[first].next {
            Some(second) if self.nodes[second].rank > self.nodes[first].rank => Some(second),
            _ => Some(first),
        }
    }

    /// Recomputes the rank of `node` from its active children, returning the old rank
    fn recalc_rank(&mut self, node: NodeKey) -> Rank {
        let first = self.nodes[node].child;
        let second = first.and_then(|c| self.nodes[c].next);
        let r1 = signed(first.map(|c| self.nodes[c].rank));
        let r2 = signed(second.map(|c| self.nodes[c].rank));

        let old = self.nodes[node].rank;
        self.nodes[node].rank = from_signed(ceil_half(r1 + r2) + 1);
        old
    }

    /// Re-ranks ancestors from `u` while ranks shrink along active links
    fn repair_ranks(&mut self, mut u: NodeKey) {
        let mut steps = 1usize;
        loop {
            let old = self.recalc_rank(u);
            if self.nodes[u].rank >= old || self.nodes[u].activity != Activity::Active {
                break;
            }
            let Some(parent) = self.nodes[u].parent else {
                break;
            };
            u = parent;
            steps += 1;
        }
        trace!("violation rank repair: {steps} ancestors visited");
    }

    /// Unlinks a child from its sibling list, leaving it detached
    fn splice_out(&mut self, node: NodeKey) {
        let Node {
            parent, prev, next, ..
        } = self.nodes[node];
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].child = next;
                }
            }
        }
        if let Some(next) = next {
            self.nodes[next].prev = prev;
        }

        let node = &mut self.nodes[node];
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// Puts detached `replacement` into the sibling slot held by `node`, detaching `node`
    fn replace(&mut self, node: NodeKey, replacement: NodeKey) {
        let Node {
            parent,
            prev,
            next,
            activity,
            ..
        } = self.nodes[node];

        let r = &mut self.nodes[replacement];
        r.parent = parent;
        r.prev = prev;
        r.next = next;
        r.activity = activity;

        match prev {
            Some(prev) => self.nodes[prev].next = Some(replacement),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].child = Some(replacement);
                }
            }
        }
        if let Some(next) = next {
            self.nodes[next].prev = Some(replacement);
        }

        let n = &mut self.nodes[node];
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    /// Splices a detached node into the root ring after min, updating min
    fn add_to_root(&mut self, node: NodeKey) {
        self.nodes[node].activity = Activity::Root;
        match self.min {
            None => {
                self.nodes[node].next = Some(node);
                self.min = Some(node);
            }
            Some(min) => {
                self.nodes[node].next = self.nodes[min].next;
                self.nodes[min].next = Some(node);
                if self.nodes[node].key < self.nodes[min].key {
                    self.min = Some(node);
                }
            }
        }
    }

    #[cfg(any(test, feature = "check-invariants"))]
    fn roots(&self) -> Vec<NodeKey> {
        let Some(min) = self.min else {
            return Vec::new();
        };
        let mut roots = vec![min];
        let mut current = self.nodes[min].next;
        while let Some(n) = current {
            if n == min {
                break;
            }
            roots.push(n);
            current = self.nodes[n].next;
        }
        roots
    }

    #[cfg(any(test, feature = "check-invariants"))]
    fn children(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut children = Vec::new();
        let mut current = self.nodes[node].child;
        while let Some(c) = current {
            children.push(c);
            current = self.nodes[c].next;
        }
        children
    }

    /// Panics if heap order, sibling links, activity or the min pointer are inconsistent
    #[cfg(any(test, feature = "check-invariants"))]
    pub(crate) fn verify(&self) {
        let Some(min) = self.min else {
            assert!(self.nodes.is_empty(), "min missing on non-empty heap");
            return;
        };

        let mut count = 0;
        for root in self.roots() {
            let n = &self.nodes[root];
            assert!(n.parent.is_none() && n.prev.is_none(), "root has sibling links");
            assert_eq!(n.activity, Activity::Root);
            assert!(self.nodes[min].key <= n.key, "min is not minimal");
            count += self.verify_tree(root);
        }
        assert_eq!(count, self.nodes.len(), "unreachable nodes");
    }

    #[cfg(any(test, feature = "check-invariants"))]
    fn verify_tree(&self, node: NodeKey) -> usize {
        let mut count = 1;
        let mut prev = None;
        for (index, child) in self.children(node).into_iter().enumerate() {
            let c = &self.nodes[child];
            assert_eq!(c.parent, Some(node), "parent link");
            assert_eq!(c.prev, prev, "sibling link");
            assert!(self.nodes[node].key <= c.key, "heap order violated");
            let expected = if index < 2 {
                Activity::Active
            } else {
                Activity::Inactive
            };
            assert_eq!(c.activity, expected, "activity of child {index}");

            count += self.verify_tree(child);
            prev = Some(child);
        }
        count
    }
}

impl<T> Default for ViolationHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
