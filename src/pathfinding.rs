//! Shortest paths and minimum spanning trees on top of [`DecreaseKeyHeap`]
//!
//! Dijkstra's algorithm, A* and Prim's algorithm all keep a frontier of
//! candidates whose priorities only ever go down, which is exactly the access
//! pattern a Fibonacci heap makes cheap: every relaxation is an O(1) amortized
//! `decrease_key` instead of a duplicate push.
//!
//! # Design
//!
//! Only lightweight [`Frontier`] entries (costs plus a dense index) go into the
//! heap. A fast hash map (using FxHash) maps node states to their indices, and
//! per-index metadata holds the best cost, the heap handle and the back link.
//!
//! # Example
//!
//! ```rust
//! use fibheap::pathfinding::{dijkstra, SearchNode};
//! use fibheap::FibonacciHeap;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Pos { x: i32, y: i32, goal: (i32, i32) }
//!
//! impl SearchNode for Pos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, u32)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (Pos { x: self.x + dx, y: self.y + dy, goal: self.goal }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         (self.x, self.y) == self.goal
//!     }
//! }
//!
//! let start = Pos { x: 0, y: 0, goal: (2, 2) };
//! let (path, cost) = dijkstra::<_, FibonacciHeap<_>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

use rustc_hash::FxHashMap;

use crate::traits::{DecreaseKeyHeap, Handle};

/// Trait for types that can be used as costs in graph algorithms.
///
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
///
/// The node carries all context needed to generate successors and to decide
/// whether it is a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// Search closes a node the first time it is popped and never reopens it, so
/// optimal paths need a *consistent* heuristic: for every edge `n -> m` with
/// cost `c`, `n.heuristic() <= c + m.heuristic()`, and every goal estimates
/// zero. A consistent heuristic never overestimates the remaining cost.
/// Admissibility alone is not enough here.
pub trait AStarNode: SearchNode {
    /// Estimated cost from this node to the nearest goal
    fn heuristic(&self) -> Self::Cost;
}

/// Dense index assigned to each discovered node
pub type NodeIndex = usize;

/// A heap entry for graph search
///
/// Ordered by `f_score` only (`g_score + heuristic`; equal to `g_score` for
/// Dijkstra).
#[derive(Debug, Clone, Copy)]
pub struct Frontier<C> {
    pub f_score: C,
    pub g_score: C,
    pub index: NodeIndex,
}

impl<C: Ord> PartialEq for Frontier<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for Frontier<C> {}

impl<C: Ord> PartialOrd for Frontier<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for Frontier<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

struct NodeEntry<N: SearchNode, H: Handle> {
    node: N,
    g_score: N::Cost,
    /// Present while the node sits in the heap
    handle: Option<H>,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Open/closed bookkeeping for one search
struct SearchState<N: SearchNode, H: Handle> {
    entries: Vec<NodeEntry<N, H>>,
    index_of: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode, H: Handle> SearchState<N, H> {
    fn new() -> Self {
        SearchState {
            entries: Vec::new(),
            index_of: FxHashMap::default(),
        }
    }

    /// Returns the node's index and whether it was just discovered
    fn index_for(&mut self, node: &N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.index_of.get(node) {
            return (index, false);
        }
        let index = self.entries.len();
        self.index_of.insert(node.clone(), index);
        self.entries.push(NodeEntry {
            node: node.clone(),
            g_score,
            handle: None,
            came_from: None,
            closed: false,
        });
        (index, true)
    }

    fn path_to(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = Vec::new();
        while let Some(entry) = self.entries.get(current) {
            path.push(entry.node.clone());
            match entry.came_from {
                Some(prev) => current = prev,
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Limits applied to a search
#[derive(Debug, Clone, Copy)]
struct Limits<C> {
    max_cost: Option<C>,
    max_nodes: Option<usize>,
}

impl<C> Limits<C> {
    fn none() -> Self {
        Limits {
            max_cost: None,
            max_nodes: None,
        }
    }
}

/// Runs Dijkstra's algorithm from `start` until `is_goal()` returns true.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable.
///
/// # Type Parameters
/// - `N`: The node type implementing [`SearchNode`]
/// - `H`: The heap type implementing [`DecreaseKeyHeap`]
pub fn dijkstra<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Frontier<N::Cost>>,
{
    search::<N, H>(start, Limits::none(), |_| N::Cost::default())
}

/// Runs A* search from `start`, guided by the node's `heuristic()`.
///
/// The returned path is optimal when the heuristic is consistent (see
/// [`AStarNode`]).
pub fn astar<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: AStarNode,
    H: DecreaseKeyHeap<Frontier<N::Cost>>,
{
    search::<N, H>(start, Limits::none(), |n| n.heuristic())
}

fn search<N, H>(
    start: &N,
    limits: Limits<N::Cost>,
    heuristic: impl Fn(&N) -> N::Cost,
) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Frontier<N::Cost>>,
{
    let zero = N::Cost::default();
    let within_budget = |g: N::Cost| limits.max_cost.map_or(true, |max| g <= max);

    let mut heap = H::new();
    let mut state: SearchState<N, H::Handle> = SearchState::new();
    let mut explored = 0usize;

    let (start_index, _) = state.index_for(start, zero);
    let handle = heap.push_with_handle(Frontier {
        f_score: heuristic(start),
        g_score: zero,
        index: start_index,
    });
    state.entries[start_index].handle = Some(handle);

    while let Some(Frontier { g_score, index, .. }) = heap.pop() {
        if limits.max_nodes.is_some_and(|max| explored >= max) {
            return None;
        }
        explored += 1;

        let entry = &mut state.entries[index];
        entry.closed = true;
        entry.handle = None;
        let current = entry.node.clone();

        if current.is_goal() {
            return Some((state.path_to(index), g_score));
        }

        for (neighbor, edge_cost) in current.successors() {
            let tentative = g_score + edge_cost;
            if !within_budget(tentative) {
                continue;
            }

            let (neighbor_index, discovered) = state.index_for(&neighbor, tentative);
            let entry = &mut state.entries[neighbor_index];
            if entry.closed || !(discovered || tentative < entry.g_score) {
                continue;
            }

            entry.g_score = tentative;
            entry.came_from = Some(index);
            let frontier = Frontier {
                f_score: tentative + heuristic(&neighbor),
                g_score: tentative,
                index: neighbor_index,
            };
            match entry.handle {
                Some(handle) => {
                    // Same heuristic, smaller g: the key can only go down
                    let _ = heap.decrease_key(&handle, frontier);
                }
                None => entry.handle = Some(heap.push_with_handle(frontier)),
            }
        }
    }

    None
}

/// Builder for pathfinding queries with exploration limits.
///
/// ```rust
/// use fibheap::pathfinding::{PathFinderBuilder, SearchNode};
/// use fibheap::FibonacciHeap;
///
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Step(u32);
///
/// impl SearchNode for Step {
///     type Cost = u32;
///     fn successors(&self) -> Vec<(Self, u32)> { vec![(Step(self.0 + 1), 1)] }
///     fn is_goal(&self) -> bool { self.0 == 50 }
/// }
///
/// let found = PathFinderBuilder::new(Step(0)).max_cost(10).dijkstra::<FibonacciHeap<_>>();
/// assert!(found.is_none());
/// ```
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    limits: Limits<N::Cost>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    /// Creates a new builder starting from the given node.
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            limits: Limits::none(),
        }
    }

    /// Never expands paths costing more than `cost`.
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.limits.max_cost = Some(cost);
        self
    }

    /// Gives up after settling `count` nodes.
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.limits.max_nodes = Some(count);
        self
    }

    /// Runs Dijkstra's algorithm with the configured limits.
    pub fn dijkstra<H>(self) -> Option<(Vec<N>, N::Cost)>
    where
        H: DecreaseKeyHeap<Frontier<N::Cost>>,
    {
        search::<N, H>(&self.start, self.limits, |_| N::Cost::default())
    }

    /// Runs A* search with the configured limits.
    pub fn astar<H>(self) -> Option<(Vec<N>, N::Cost)>
    where
        N: AStarNode,
        H: DecreaseKeyHeap<Frontier<N::Cost>>,
    {
        search::<N, H>(&self.start, self.limits, |n| n.heuristic())
    }
}

/// Returns every node reachable from `start` within `max_cost`, with its
/// shortest distance, in order of increasing distance.
pub fn reachable_within<N, H>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<Frontier<N::Cost>>,
{
    let zero = N::Cost::default();
    let mut heap = H::new();
    let mut state: SearchState<N, H::Handle> = SearchState::new();
    let mut settled = Vec::new();

    let (start_index, _) = state.index_for(start, zero);
    let handle = heap.push_with_handle(Frontier {
        f_score: zero,
        g_score: zero,
        index: start_index,
    });
    state.entries[start_index].handle = Some(handle);

    while let Some(Frontier { g_score, index, .. }) = heap.pop() {
        let entry = &mut state.entries[index];
        entry.closed = true;
        entry.handle = None;
        let current = entry.node.clone();
        settled.push((current.clone(), g_score));

        for (neighbor, edge_cost) in current.successors() {
            let tentative = g_score + edge_cost;
            if tentative > max_cost {
                continue;
            }

            let (neighbor_index, discovered) = state.index_for(&neighbor, tentative);
            let entry = &mut state.entries[neighbor_index];
            if entry.closed || !(discovered || tentative < entry.g_score) {
                continue;
            }

            entry.g_score = tentative;
            let frontier = Frontier {
                f_score: tentative,
                g_score: tentative,
                index: neighbor_index,
            };
            match entry.handle {
                Some(handle) => {
                    let _ = heap.decrease_key(&handle, frontier);
                }
                None => entry.handle = Some(heap.push_with_handle(frontier)),
            }
        }
    }

    settled
}

/// Edges and total weight of a minimum spanning forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree<W> {
    /// Tree edges as `(parent, child, weight)`, in the order they were added
    pub edges: Vec<(usize, usize, W)>,
    pub total_weight: W,
}

/// Candidate connection of a vertex to the growing tree
#[derive(Debug, Clone, Copy)]
pub struct Attachment<W> {
    pub weight: W,
    pub vertex: usize,
}

impl<W: Ord> PartialEq for Attachment<W> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl<W: Ord> Eq for Attachment<W> {}

impl<W: Ord> PartialOrd for Attachment<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Ord> Ord for Attachment<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight.cmp(&other.weight)
    }
}

/// Prim's algorithm over an undirected weighted graph
///
/// Vertices are `0..vertex_count`; `edges` lists `(u, v, weight)` once per
/// undirected edge. A disconnected graph yields a spanning forest: one tree per
/// component, grown from its lowest-numbered vertex.
///
/// # Panics
/// Panics if an edge endpoint is not below `vertex_count`.
///
/// ```rust
/// use fibheap::pathfinding::minimum_spanning_tree;
/// use fibheap::FibonacciHeap;
///
/// let edges = [(0, 1, 4), (1, 2, 1), (0, 2, 3)];
/// let tree = minimum_spanning_tree::<u32, FibonacciHeap<_>>(3, &edges);
/// assert_eq!(tree.total_weight, 4);
/// assert_eq!(tree.edges.len(), 2);
/// ```
pub fn minimum_spanning_tree<W, H>(vertex_count: usize, edges: &[(usize, usize, W)]) -> SpanningTree<W>
where
    W: Cost,
    H: DecreaseKeyHeap<Attachment<W>>,
{
    let mut adjacency: Vec<Vec<(usize, W)>> = vec![Vec::new(); vertex_count];
    for &(u, v, weight) in edges {
        adjacency[u].push((v, weight));
        adjacency[v].push((u, weight));
    }

    let mut in_tree = vec![false; vertex_count];
    let mut best: Vec<Option<(usize, W)>> = vec![None; vertex_count];
    let mut handles: Vec<Option<H::Handle>> = vec![None; vertex_count];
    let mut tree = SpanningTree {
        edges: Vec::with_capacity(vertex_count.saturating_sub(1)),
        total_weight: W::default(),
    };
    let mut heap = H::new();

    for root in 0..vertex_count {
        if in_tree[root] {
            continue;
        }
        handles[root] = Some(heap.push_with_handle(Attachment {
            weight: W::default(),
            vertex: root,
        }));

        while let Some(Attachment { vertex, .. }) = heap.pop() {
            in_tree[vertex] = true;
            handles[vertex] = None;
            if let Some((parent, weight)) = best[vertex] {
                tree.edges.push((parent, vertex, weight));
                tree.total_weight = tree.total_weight + weight;
            }

            for &(next, weight) in &adjacency[vertex] {
                if in_tree[next] {
                    continue;
                }
                let attachment = Attachment { weight, vertex: next };
                match (handles[next], best[next]) {
                    (None, _) => {
                        best[next] = Some((vertex, weight));
                        handles[next] = Some(heap.push_with_handle(attachment));
                    }
                    (Some(handle), Some((_, current))) if weight < current => {
                        best[next] = Some((vertex, weight));
                        let _ = heap.decrease_key(&handle, attachment);
                    }
                    _ => {}
                }
            }
        }
    }

    tree
}
