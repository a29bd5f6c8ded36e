//! Heap Benchmarks
//!
//! Compares the Fibonacci heap with `std::collections::BinaryHeap` on the
//! workloads a priority queue sees in graph search.
//!
//! ## Running
//!
//! ```sh
//! cargo bench --bench heap_perf
//! ```
//!
//! ## Workloads
//!
//! - **push_pop**: n random inserts followed by n extract-mins
//! - **decrease_key**: n inserts, n decreases, then draining. `BinaryHeap` has no
//!   decrease-key, so it pushes a duplicate entry and skips stale ones on pop
//! - **merge**: joining two heaps of n/2 elements
//! - **dijkstra**: single-source shortest paths on a random sparse graph

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fibheap::pathfinding::{dijkstra, SearchNode};
use fibheap::FibonacciHeap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_keys(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..1_000_000_000)).collect()
}

// ============================================================================
// push / pop
// ============================================================================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");
    for n in SIZES {
        let keys = random_keys(n, 1);

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &keys, |b, keys| {
            b.iter(|| {
                let mut heap = FibonacciHeap::with_capacity(keys.len());
                for &k in keys {
                    heap.insert(k);
                }
                let mut sum = 0u64;
                while let Ok(k) = heap.extract_min() {
                    sum = sum.wrapping_add(k);
                }
                black_box(sum)
            })
        });

        group.bench_with_input(BenchmarkId::new("binary_heap", n), &keys, |b, keys| {
            b.iter(|| {
                let mut heap = BinaryHeap::with_capacity(keys.len());
                for &k in keys {
                    heap.push(Reverse(k));
                }
                let mut sum = 0u64;
                while let Some(Reverse(k)) = heap.pop() {
                    sum = sum.wrapping_add(k);
                }
                black_box(sum)
            })
        });
    }
    group.finish();
}

// ============================================================================
// decrease_key
// ============================================================================

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");
    for n in SIZES {
        let keys = random_keys(n, 2);
        let drops = random_keys(n, 3);

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &n, |b, _| {
            b.iter(|| {
                let mut heap = FibonacciHeap::with_capacity(n);
                let handles: Vec<_> = keys.iter().map(|&k| heap.insert(k)).collect();
                // Give the heap some trees before cutting into them
                let _ = heap.extract_min();
                for (h, &d) in handles.iter().zip(&drops) {
                    if let Ok(&current) = heap.get(h) {
                        let _ = heap.decrease_key(h, current.saturating_sub(d));
                    }
                }
                black_box(heap.into_sorted_vec().len())
            })
        });

        group.bench_with_input(BenchmarkId::new("binary_heap_lazy", n), &n, |b, _| {
            b.iter(|| {
                let mut best = keys.clone();
                let mut heap: BinaryHeap<Reverse<(u64, usize)>> = best
                    .iter()
                    .enumerate()
                    .map(|(i, &k)| Reverse((k, i)))
                    .collect();
                let mut done = vec![false; n];
                if let Some(Reverse((_, i))) = heap.pop() {
                    done[i] = true;
                }
                for (i, &d) in drops.iter().enumerate() {
                    if !done[i] {
                        best[i] = best[i].saturating_sub(d);
                        heap.push(Reverse((best[i], i)));
                    }
                }
                let mut count = 0;
                while let Some(Reverse((k, i))) = heap.pop() {
                    if !done[i] && k == best[i] {
                        done[i] = true;
                        count += 1;
                    }
                }
                black_box(count)
            })
        });
    }
    group.finish();
}

// ============================================================================
// merge
// ============================================================================

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for n in SIZES {
        let keys = random_keys(n, 4);
        let (left, right) = keys.split_at(n / 2);

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &n, |b, _| {
            b.iter_batched(
                || {
                    let a: FibonacciHeap<u64> = left.iter().copied().collect();
                    let b: FibonacciHeap<u64> = right.iter().copied().collect();
                    (a, b)
                },
                |(mut a, b)| {
                    a.merge(b);
                    black_box(a.len())
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("binary_heap", n), &n, |b, _| {
            b.iter_batched(
                || {
                    let a: BinaryHeap<Reverse<u64>> = left.iter().map(|&k| Reverse(k)).collect();
                    let b: BinaryHeap<Reverse<u64>> = right.iter().map(|&k| Reverse(k)).collect();
                    (a, b)
                },
                |(mut a, mut b)| {
                    a.append(&mut b);
                    black_box(a.len())
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Merges two heaps that were each assembled from singleton heaps, so both
/// operands carry one arena segment per original heap
fn bench_merge_of_merged(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_of_merged");
    for n in SIZES {
        let keys = random_keys(n, 5);
        let (left, right) = keys.split_at(n / 2);
        let assemble = |keys: &[u64]| {
            let mut heap = FibonacciHeap::new();
            for &k in keys {
                let mut single = FibonacciHeap::new();
                single.insert(k);
                heap.merge(single);
            }
            heap
        };

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &n, |b, _| {
            b.iter_batched(
                || (assemble(left), assemble(right)),
                |(mut a, b)| {
                    a.merge(b);
                    black_box(a.len())
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// ============================================================================
// Dijkstra on a random sparse graph
// ============================================================================

struct RandomGraph {
    adjacency: Vec<Vec<(u32, u32)>>,
}

impl RandomGraph {
    fn new(n: usize, degree: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let adjacency = (0..n)
            .map(|_| {
                (0..degree)
                    .map(|_| (rng.gen_range(0..n as u32), rng.gen_range(1..1000)))
                    .collect()
            })
            .collect();
        RandomGraph { adjacency }
    }
}

#[derive(Clone, Copy)]
struct At<'a> {
    id: u32,
    graph: &'a RandomGraph,
}

impl PartialEq for At<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for At<'_> {}

impl std::hash::Hash for At<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl SearchNode for At<'_> {
    type Cost = u32;

    fn successors(&self) -> Vec<(Self, u32)> {
        self.graph.adjacency[self.id as usize]
            .iter()
            .map(|&(id, w)| (At { id, graph: self.graph }, w))
            .collect()
    }

    // Never reached: the search settles every vertex
    fn is_goal(&self) -> bool {
        false
    }
}

fn binary_heap_dijkstra(graph: &RandomGraph, source: u32) -> u64 {
    let mut dist = vec![u32::MAX; graph.adjacency.len()];
    let mut heap = BinaryHeap::new();
    dist[source as usize] = 0;
    heap.push(Reverse((0u32, source)));
    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u as usize] {
            continue;
        }
        for &(v, w) in &graph.adjacency[u as usize] {
            let nd = d + w;
            if nd < dist[v as usize] {
                dist[v as usize] = nd;
                heap.push(Reverse((nd, v)));
            }
        }
    }
    dist.iter().filter(|&&d| d != u32::MAX).map(|&d| d as u64).sum()
}

fn bench_dijkstra(c: &mut Criterion) {
    let mut group = c.benchmark_group("dijkstra");
    group.sample_size(20);
    for n in [1_000usize, 10_000] {
        let graph = RandomGraph::new(n, 4, 5);

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &graph, |b, graph| {
            b.iter(|| {
                let start = At { id: 0, graph };
                black_box(dijkstra::<_, FibonacciHeap<_>>(&start).is_none())
            })
        });

        group.bench_with_input(BenchmarkId::new("binary_heap", n), &graph, |b, graph| {
            b.iter(|| black_box(binary_heap_dijkstra(graph, 0)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_push_pop,
    bench_decrease_key,
    bench_merge,
    bench_merge_of_merged,
    bench_dijkstra
);
criterion_main!(benches);
