//! Rank-Pairing Heap implementation
//!
//! A rank-pairing heap is a heap data structure that achieves:
//! - O(1) amortized insert and decrease_key
//! - O(log n) amortized extract_min
//!
//! Rank-pairing heaps are designed to be simpler than Fibonacci heaps while
//! maintaining the same amortized bounds. Instead of cascading cuts they repair
//! ranks lazily along the path a cut leaves behind.
//!
//! # Representation
//!
//! Trees are stored as half-trees: binary trees whose root has only a left child.
//!
//! - `left` is a node's first child
//! - `next` is the right child for a non-root, or the successor in the root ring for a root
//! - `parent` is the node whose `left` or `next` points here (`None` for roots)
//!
//! Every node's key is at most every key in its left subtree. Nothing is required of the
//! right subtree, so a node may be smaller than its parent when it is a right child.
//!
//! # Ranks (type 1)
//!
//! - A root has rank `rank(left) + 1`, or 0 without a left child.
//! - A non-root with children ranked `r1` and `r2` (missing children count as -1) has rank
//!   `max(r1, r2)`, or `r1 + 1` when `r1 == r2`.
//!
//! **Decrease-key**: the node's right subtree takes its place, the node becomes a root, and
//! ranks are reduced up the old ancestor chain until one does not shrink.
//!
//! **Extract-min**: every node on the minimum's left spine becomes a root; all roots are
//! linked pairwise by rank in one pass over a bucket array.

use crate::arena::NodeKey;
use crate::rank::{bucket_capacity, checked_increment, ensure_slot, from_signed, signed, Rank};
use crate::traits::{check_decrease, Handle, Heap, HeapError, Key};
use log::trace;
use slotmap::SlotMap;

/// Handle to an element in a Rank-pairing heap
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RankPairingHandle(NodeKey);

impl Handle for RankPairingHandle {}

#[derive(Debug)]
struct Node<T> {
    key: Key,
    item: T,
    left: Option<NodeKey>,
    /// Right child, or ring successor for a root
    next: Option<NodeKey>,
    parent: Option<NodeKey>,
    rank: Rank,
}

/// Rank-Pairing Heap (type 1)
///
/// # Example
///
/// ```rust
/// use addressable_heaps::rank_pairing::RankPairingHeap;
/// use addressable_heaps::Heap;
///
/// let mut heap = RankPairingHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.extract_min(), Ok((1, "item")));
/// assert_eq!(heap.extract_min(), Ok((3, "other")));
/// ```
#[derive(Debug)]
pub struct RankPairingHeap<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    min: Option<NodeKey>,
}

impl<T> Heap<T> for RankPairingHeap<T> {
    type Handle = RankPairingHandle;

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
            left: None,
            next: None,
            parent: None,
            rank: 0,
        });
        self.add_to_root(node);

        #[cfg(feature = "check-invariants")]
        self.verify();

        RankPairingHandle(node)
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

        match self.nodes[x].parent {
            None => {
                if let Some(min) = self.min {
                    if new_key < self.nodes[min].key {
                        self.min = Some(x);
                    }
                }
            }
            Some(p) => {
                // The right subtree takes x's place under p
                let y = self.nodes[x].next.take();
                if self.nodes[p].left == Some(x) {
                    self.nodes[p].left = y;
                } else {
                    self.nodes[p].next = y;
                }
                if let Some(y) = y {
                    self.nodes[y].parent = Some(p);
                }

                self.nodes[x].parent = None;
                self.nodes[x].rank = self.root_rank(x);
                self.add_to_root(x);
                self.reduce_ranks(p);
            }
        }

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok(())
    }

    fn extract_min(&mut self) -> Result<(Key, T), HeapError> {
        let root = self.min.ok_or(HeapError::Empty)?;
        let mut buckets: Vec<Option<NodeKey>> = vec![None; bucket_capacity(self.nodes.len())];

        // Left spine of the extracted root becomes roots
        let mut child = self.nodes[root].left.take();
        while let Some(n) = child {
            child = self.nodes[n].next.take();
            self.nodes[n].parent = None;
            self.nodes[n].rank = self.root_rank(n);
            self.multi_pass(&mut buckets, n);
        }

        let mut current = self.nodes[root].next.take();
        while let Some(n) = current {
            if n == root {
                break;
            }
            current = self.nodes[n].next.take();
            self.multi_pass(&mut buckets, n);
        }

        let node = self.nodes.remove(root).ok_or(HeapError::InvalidHandle)?;
        self.min = None;
        let mut roots = 0usize;
        for n in buckets.into_iter().flatten() {
            self.add_to_root(n);
            roots += 1;
        }
        trace!("rank-pairing extract: {roots} roots after linking");

        #[cfg(feature = "check-invariants")]
        self.verify();

        Ok((node.key, node.item))
    }

    fn get(&self, handle: &Self::Handle) -> Result<(Key, &T), HeapError> {
        let node = self.nodes.get(handle.0).ok_or(HeapError::InvalidHandle)?;
        Ok((node.key, &node.item))
    }
}

impl<T> RankPairingHeap<T> {
    fn rank_of(&self, node: Option<NodeKey>) -> Option<Rank> {
        node.map(|n| self.nodes[n].rank)
    }

    /// Rank a root gets from its left child
    fn root_rank(&self, node: NodeKey) -> Rank {
        self.rank_of(self.nodes[node].left)
            .map_or(0, checked_increment)
    }

    /// Type-1 rank reduction from `u` toward its root
    fn reduce_ranks(&mut self, mut u: NodeKey) {
        let mut steps = 0usize;
        loop {
            let Some(parent) = self.nodes[u].parent else {
                self.nodes[u].rank = self.root_rank(u);
                break;
            };

            let r1 = signed(self.rank_of(self.nodes[u].left));
            let r2 = signed(self.rank_of(self.nodes[u].next));
            let k = from_signed(if r1 == r2 { r1 + 1 } else { r1.max(r2) });
            if k >= self.nodes[u].rank {
                break;
            }
            self.nodes[u].rank = k;
            steps += 1;
            u = parent;
        }
        trace!("rank-pairing reduction: {steps} ranks lowered");
    }

    /// Splices a detached node into the root ring after min, updating min
    fn add_to_root(&mut self, node: NodeKey) {
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

    /// Links two roots of equal rank; the larger key becomes the left child.
    fn link(&mut self, mut x: NodeKey, mut y: NodeKey) -> NodeKey {
        if self.nodes[y].key < self.nodes[x].key {
            std::mem::swap(&mut x, &mut y);
        }

        let first = self.nodes[x].left;
        self.nodes[y].parent = Some(x);
        self.nodes[y].next = first;
        if let Some(first) = first {
            self.nodes[first].parent = Some(y);
        }
        self.nodes[x].left = Some(y);
        self.nodes[x].rank = checked_increment(self.nodes[y].rank);
        x
    }

    /// Carries `n` through the rank buckets until it finds an empty one
    fn multi_pass(&mut self, buckets: &mut Vec<Option<NodeKey>>, mut n: NodeKey) {
        loop {
            let rank = usize::from(self.nodes[n].rank);
            ensure_slot(buckets, rank);
            match buckets[rank].take() {
                Some(b) => n = self.link(n, b),
                None => {
                    buckets[rank] = Some(n);
                    break;
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

    /// Panics if half-order, root ranks, parent links or the min pointer are inconsistent
    #[cfg(any(test, feature = "check-invariants"))]
    pub(crate) fn verify(&self) {
        if self.min.is_none() {
            assert!(self.nodes.is_empty(), "min missing on non-empty heap");
            return;
        }

        let min_key = self.min.map(|m| self.nodes[m].key);
        let mut count = 0;
        for root in self.roots() {
            let n = &self.nodes[root];
            assert!(n.parent.is_none(), "root has a parent");
            assert!(Some(n.key) >= min_key, "min is not minimal");
            assert_eq!(n.rank, self.root_rank(root), "root rank mismatch");
            count += 1;
            if let Some(left) = n.left {
                let (size, smallest) = self.verify_half_tree(left, root);
                assert!(n.key <= smallest, "root above its half-tree");
                count += size;
            }
        }
        assert_eq!(count, self.nodes.len(), "unreachable nodes");
    }

    /// Returns the size and smallest key of the subtree at `node`
    #[cfg(any(test, feature = "check-invariants"))]
    fn verify_half_tree(&self, node: NodeKey, parent: NodeKey) -> (usize, Key) {
        let n = &self.nodes[node];
        assert_eq!(n.parent, Some(parent), "parent link");

        let mut size = 1;
        let mut smallest = n.key;
        if let Some(left) = n.left {
            let (s, m) = self.verify_half_tree(left, node);
            assert!(n.key <= m, "half-order violated");
            size += s;
            smallest = smallest.min(m);
        }
        if let Some(right) = n.next {
            let (s, m) = self.verify_half_tree(right, node);
            size += s;
            smallest = smallest.min(m);
        }
        (size, smallest)
    }
}

impl<T> Default for RankPairingHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
