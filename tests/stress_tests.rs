//! Extreme stress tests that really push the heaps to their limits
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load. Run with
//! `--features check-invariants` to verify heap structure after every operation.

mod common;

use addressable_heaps::binary::BinaryHeap;
use addressable_heaps::binomial::BinomialHeap;
use addressable_heaps::explicit::ExplicitHeap;
use addressable_heaps::fibonacci::FibonacciHeap;
use addressable_heaps::rank_pairing::RankPairingHeap;
use addressable_heaps::violation::ViolationHeap;
use addressable_heaps::Heap;
use common::{Op, Replayer};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const FUZZ_OPERATIONS: usize = 100_000;

/// Random insert/decrease/extract mix in the shape the benchmark harness generates
fn random_operations(seed: u64, count: usize) -> Vec<Op> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let key = rng.gen_range(-1_000_000..1_000_000);
            let value = i64::from(rng.gen::<i32>());
            match rng.gen_range(0..3) {
                0 => Op::Insert { key, value },
                1 => Op::DecreaseKey { key, value },
                _ => Op::ExtractMin { key, value },
            }
        })
        .collect()
}

/// Shadow multiset agrees on min after every extraction
fn test_fuzz_against_shadow<H: Heap<i64>>(seed: u64) {
    common::init_logger();
    let mut replayer = Replayer::<H>::new();

    for op in random_operations(seed, FUZZ_OPERATIONS) {
        replayer.apply(op).unwrap();
        if matches!(op, Op::ExtractMin { .. }) {
            assert_eq!(replayer.heap_min(), replayer.shadow_min());
        }
    }
    assert_eq!(replayer.heap.len(), replayer.shadow_len());

    let mut expected: Vec<_> = replayer
        .shadow
        .iter()
        .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
        .collect();
    expected.sort();
    assert_eq!(replayer.drain(), expected);
}

/// Test massive numbers of inserts and extractions
fn test_massive_operations<H: Heap<i64>>() {
    let mut heap = H::new();
    for i in 0..10_000 {
        heap.insert(i, i);
    }
    assert_eq!(heap.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(heap.extract_min(), Ok((i, i)));
    }
    assert!(heap.is_empty());
}

/// Test many decrease_key operations
fn test_many_decrease_keys<H: Heap<i64>>() {
    let mut heap = H::new();
    let handles: Vec<_> = (0..2_000).map(|i| heap.insert(100_000 + i, i)).collect();
    heap.extract_min().unwrap();

    // Every remaining key is lowered twice, the second time below everything else
    for (i, handle) in handles.iter().enumerate().skip(1) {
        heap.decrease_key(handle, 50_000 + i as i64).unwrap();
    }
    for (i, handle) in handles.iter().enumerate().skip(1).rev() {
        heap.decrease_key(handle, i as i64).unwrap();
    }

    for i in 1..2_000 {
        assert_eq!(heap.extract_min(), Ok((i, i)));
    }
}

/// Repeatedly decrease the same few elements between extractions
fn test_rapid_fire<H: Heap<i64>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();
    let mut next_key = 1_000_000;

    for round in 0..500 {
        for _ in 0..4 {
            handles.push(heap.insert(next_key, round));
            next_key -= 7;
        }
        handles.retain(|h| heap.get(h).is_ok());
        for handle in handles.iter().rev().take(3) {
            let (key, _) = heap.get(handle).unwrap();
            heap.decrease_key(handle, key - 1).unwrap();
        }
        let (key, _) = heap.extract_min().unwrap();
        assert_eq!(heap.min().map(|(k, _)| k >= key), Ok(true));
    }
}

macro_rules! define_stress_tests {
    ($heap_name:ident, $heap_type:ident, $seed:expr) => {
        mod $heap_name {
            use super::*;

            #[test]
            fn test_fuzz() {
                test_fuzz_against_shadow::<$heap_type<i64>>($seed);
            }

            #[test]
            fn test_massive() {
                test_massive_operations::<$heap_type<i64>>();
            }

            #[test]
            fn test_many_decrease_keys() {
                super::test_many_decrease_keys::<$heap_type<i64>>();
            }

            #[test]
            fn test_rapid_fire() {
                super::test_rapid_fire::<$heap_type<i64>>();
            }
        }
    };
}

define_stress_tests!(binary, BinaryHeap, 0x5eed_0001);
define_stress_tests!(explicit, ExplicitHeap, 0x5eed_0002);
define_stress_tests!(binomial, BinomialHeap, 0x5eed_0003);
define_stress_tests!(fibonacci, FibonacciHeap, 0x5eed_0004);
define_stress_tests!(rank_pairing, RankPairingHeap, 0x5eed_0005);
define_stress_tests!(violation, ViolationHeap, 0x5eed_0006);
