//! Grid shortest paths driven through the heap contract
//!
//! Every cell is inserted once at [`INFINITY`], its handle is kept in a hash map, and
//! relaxations go through `decrease_key`. Extracting an `INFINITY` key means the rest of
//! the grid is unreachable.

mod common;

use addressable_heaps::binary::BinaryHeap;
use addressable_heaps::binomial::BinomialHeap;
use addressable_heaps::explicit::ExplicitHeap;
use addressable_heaps::fibonacci::FibonacciHeap;
use addressable_heaps::rank_pairing::RankPairingHeap;
use addressable_heaps::violation::ViolationHeap;
use addressable_heaps::{Heap, Key, INFINITY};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;

type Cell = (i32, i32);

/// Weighted grid; a weight of 0 marks a wall
struct Grid {
    width: i32,
    height: i32,
    weights: Vec<Key>,
}

impl Grid {
    fn generate(width: i32, height: i32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let weights: Vec<Key> = (0..width * height).map(|_| rng.gen_range(0..10)).collect();
        Grid {
            width,
            height,
            weights,
        }
    }

    fn weight(&self, (x, y): Cell) -> Key {
        self.weights[(y * self.width + x) as usize]
    }

    fn set_wall(&mut self, (x, y): Cell) {
        self.weights[(y * self.width + x) as usize] = 0;
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    fn neighbours(&self, (x, y): Cell) -> impl Iterator<Item = Cell> + '_ {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(move |(dx, dy)| (x + dx, y + dy))
            .filter(move |&(nx, ny)| {
                nx >= 0 && ny >= 0 && nx < self.width && ny < self.height
            })
            .filter(move |&cell| self.weight(cell) > 0)
    }
}

/// Distance from `start` to every reachable cell, entering a cell costs its weight
fn dijkstra<H: Heap<Cell>>(grid: &Grid, start: Cell) -> FxHashMap<Cell, Key> {
    let mut heap = H::new();
    let mut handles: FxHashMap<Cell, H::Handle> = FxHashMap::default();
    for cell in grid.cells().filter(|&c| grid.weight(c) > 0) {
        handles.insert(cell, heap.insert(INFINITY, cell));
    }
    heap.decrease_key(&handles[&start], 0).unwrap();

    let mut dist = FxHashMap::default();
    while let Ok((d, cell)) = heap.extract_min() {
        if d == INFINITY {
            break;
        }
        dist.insert(cell, d);
        for next in grid.neighbours(cell) {
            if dist.contains_key(&next) {
                continue;
            }
            let handle = &handles[&next];
            let candidate = d + grid.weight(next);
            let (current, _) = heap.get(handle).unwrap();
            if candidate < current {
                heap.decrease_key(handle, candidate).unwrap();
            }
        }
    }
    dist
}

/// Lazy-deletion Dijkstra over the standard library heap
fn reference_dijkstra(grid: &Grid, start: Cell) -> FxHashMap<Cell, Key> {
    let mut dist: FxHashMap<Cell, Key> = FxHashMap::default();
    let mut queue = std::collections::BinaryHeap::new();
    queue.push(Reverse((0, start)));
    while let Some(Reverse((d, cell))) = queue.pop() {
        if dist.contains_key(&cell) {
            continue;
        }
        dist.insert(cell, d);
        for next in grid.neighbours(cell) {
            if !dist.contains_key(&next) {
                queue.push(Reverse((d + grid.weight(next), next)));
            }
        }
    }
    dist
}

fn open_start(grid: &mut Grid) -> Cell {
    let start = (0, 0);
    if grid.weight(start) == 0 {
        grid.weights[0] = 1;
    }
    start
}

fn test_matches_reference<H: Heap<Cell>>() {
    common::init_logger();
    for seed in [1, 2, 3] {
        let mut grid = Grid::generate(40, 30, seed);
        let start = open_start(&mut grid);

        let expected = reference_dijkstra(&grid, start);
        let actual = dijkstra::<H>(&grid, start);
        assert_eq!(actual, expected, "seed {seed}");
    }
}

fn test_unreachable_region<H: Heap<Cell>>() {
    let mut grid = Grid::generate(12, 12, 9);
    let start = open_start(&mut grid);

    // Wall off the bottom-right corner
    grid.weights[(11 * 12 + 11) as usize] = 5;
    grid.set_wall((10, 11));
    grid.set_wall((11, 10));
    grid.set_wall((10, 10));

    let dist = dijkstra::<H>(&grid, start);
    assert!(!dist.contains_key(&(11, 11)));
    assert_eq!(dist, reference_dijkstra(&grid, start));
}

fn test_straight_corridor<H: Heap<Cell>>() {
    let grid = Grid {
        width: 10,
        height: 1,
        weights: vec![1; 10],
    };
    let dist = dijkstra::<H>(&grid, (0, 0));
    for x in 0..10 {
        assert_eq!(dist[&(x, 0)], Key::from(x));
    }
}

macro_rules! define_pathfinding_tests {
    ($heap_name:ident, $heap_type:ident) => {
        mod $heap_name {
            use super::*;

            #[test]
            fn test_matches_reference() {
                super::test_matches_reference::<$heap_type<Cell>>();
            }

            #[test]
            fn test_unreachable_region() {
                super::test_unreachable_region::<$heap_type<Cell>>();
            }

            #[test]
            fn test_straight_corridor() {
                super::test_straight_corridor::<$heap_type<Cell>>();
            }
        }
    };
}

define_pathfinding_tests!(binary, BinaryHeap);
define_pathfinding_tests!(explicit, ExplicitHeap);
define_pathfinding_tests!(binomial, BinomialHeap);
define_pathfinding_tests!(fibonacci, FibonacciHeap);
define_pathfinding_tests!(rank_pairing, RankPairingHeap);
define_pathfinding_tests!(violation, ViolationHeap);
