//! Arena keys and content-swap records shared by the heaps
//!
//! Every heap keeps its nodes in a [`SlotMap`] and links them with [`NodeKey`]s instead of
//! raw pointers. Slot map keys carry a generation, so a key whose node was removed is
//! detected on lookup rather than silently aliasing a reused slot. Dropping a heap drops
//! its arena in one go, without walking the trees.
//!
//! # Content swapping
//!
//! The explicit binary heap and the binomial heap restore order by swapping `(key, item)`
//! between a node and its parent. A handle that named the node would then follow the
//! position rather than the element, so those heaps keep elements in a second arena of
//! [`Entry`] records: the node points at its entry, the entry points back at its node, and
//! handles address entries. [`swap_contents`] exchanges two nodes' entries and repairs both
//! back-references.

use crate::traits::Key;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key of a tree node inside a heap's node arena
    pub struct NodeKey;

    /// Key of an element record in a content-swap heap
    pub struct EntryKey;
}

/// An element stored apart from its tree position
#[derive(Debug)]
pub(crate) struct Entry<T> {
    pub key: Key,
    pub item: T,
    /// Node currently holding this entry
    pub node: NodeKey,
}

/// Nodes that hold an [`Entry`] by key
pub(crate) trait HoldsEntry {
    fn entry(&self) -> EntryKey;
    fn set_entry(&mut self, entry: EntryKey);
}

/// Exchanges the entries held by nodes `a` and `b`, keeping back-references consistent.
pub(crate) fn swap_contents<N: HoldsEntry, T>(
    nodes: &mut SlotMap<NodeKey, N>,
    entries: &mut SlotMap<EntryKey, Entry<T>>,
    a: NodeKey,
    b: NodeKey,
) {
    let entry_a = nodes[a].entry();
    let entry_b = nodes[b].entry();

    nodes[a].set_entry(entry_b);
    nodes[b].set_entry(entry_a);
    entries[entry_a].node = b;
    entries[entry_b].node = a;
}
