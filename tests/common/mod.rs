//! Helpers shared by the integration tests
//!
//! The [`Replayer`] drives a heap through a log of operations the way the benchmark and
//! console drivers do, tracking a shadow multiset of keys that every variant must agree with.

#![allow(dead_code)]

use addressable_heaps::{Heap, HeapError, Key};
use std::collections::BTreeMap;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One logged operation. `value` is the item for inserts and selects the target handle
/// for decrease-key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Insert { key: Key, value: i64 },
    DecreaseKey { key: Key, value: i64 },
    ExtractMin { key: Key, value: i64 },
}

/// Parses `I:key:value`, `D:key:value` and `E:key:value` lines.
pub fn parse_script(script: &str) -> Vec<Op> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.split(':');
            let what = fields.next().expect("operation");
            let key: Key = fields.next().expect("key").parse().expect("integer key");
            let value: i64 = fields.next().expect("value").parse().expect("integer value");
            match what {
                "I" => Op::Insert { key, value },
                "D" => Op::DecreaseKey { key, value },
                "E" => Op::ExtractMin { key, value },
                other => panic!("unknown operation {other:?}"),
            }
        })
        .collect()
}

pub struct Replayer<H: Heap<i64>> {
    pub heap: H,
    /// Handles of live elements, in insertion order
    pub handles: Vec<H::Handle>,
    /// Keys currently held, with multiplicity
    pub shadow: BTreeMap<Key, usize>,
    pub extracted: Vec<Key>,
}

impl<H: Heap<i64>> Replayer<H> {
    pub fn new() -> Self {
        Self {
            heap: H::new(),
            handles: Vec::new(),
            shadow: BTreeMap::new(),
            extracted: Vec::new(),
        }
    }

    pub fn run(ops: &[Op]) -> Result<Self, HeapError> {
        let mut replayer = Self::new();
        for op in ops {
            replayer.apply(*op)?;
        }
        Ok(replayer)
    }

    /// Applies one operation. DecreaseKey and ExtractMin on an empty heap become inserts;
    /// a decrease-key target that is not below the current key is clamped to `current - 1`.
    pub fn apply(&mut self, op: Op) -> Result<(), HeapError> {
        match op {
            Op::Insert { key, value } => self.insert(key, value),
            Op::DecreaseKey { key, value } | Op::ExtractMin { key, value }
                if self.heap.is_empty() =>
            {
                self.insert(key, value)
            }
            Op::DecreaseKey { key, value } => {
                let index = value.rem_euclid(self.handles.len() as i64) as usize;
                let handle = self.handles[index];
                let (current, _) = self.heap.get(&handle)?;
                let target = if key < current {
                    key
                } else {
                    current.saturating_sub(1)
                };
                self.heap.decrease_key(&handle, target)?;
                self.remove_shadow(current);
                *self.shadow.entry(target).or_insert(0) += 1;
            }
            Op::ExtractMin { .. } => {
                let expected = self.shadow_min();
                let (key, _) = self.heap.extract_min()?;
                assert_eq!(Some(key), expected, "extracted key differs from shadow minimum");
                self.remove_shadow(key);
                self.extracted.push(key);

                let heap = &self.heap;
                self.handles.retain(|handle| heap.get(handle).is_ok());
            }
        }
        Ok(())
    }

    pub fn shadow_min(&self) -> Option<Key> {
        self.shadow.keys().next().copied()
    }

    pub fn shadow_len(&self) -> usize {
        self.shadow.values().sum()
    }

    pub fn heap_min(&self) -> Option<Key> {
        self.heap.min().ok().map(|(key, _)| key)
    }

    /// Extracts everything left, returning the keys in order
    pub fn drain(&mut self) -> Vec<Key> {
        let mut keys = Vec::new();
        while let Ok((key, _)) = self.heap.extract_min() {
            keys.push(key);
        }
        keys
    }

    fn insert(&mut self, key: Key, value: i64) {
        self.handles.push(self.heap.insert(key, value));
        *self.shadow.entry(key).or_insert(0) += 1;
    }

    fn remove_shadow(&mut self, key: Key) {
        if let Some(count) = self.shadow.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.shadow.remove(&key);
            }
        }
    }
}
