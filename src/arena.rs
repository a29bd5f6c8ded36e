//! Arena storage for heap nodes
//!
//! Nodes are stored in `slotmap` arenas and refer to each other through
//! [`NodeRef`] values instead of pointers, so the cyclic parent/child/sibling
//! graph owns nothing and tears down by dropping the arenas.
//!
//! # Segments
//!
//! A heap owns one or more *segments*, each a `SlotMap` tagged with a
//! process-unique [`SegmentId`]. New nodes go into the heap's home segment.
//! Merging two heaps moves whole segments from one map into the other, so no
//! node is re-keyed and every outstanding [`NodeRef`] stays valid.
//!
//! Slotmap keys are generational: a `NodeRef` to a freed slot never resolves
//! to the slot's next occupant.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::degree::Degree;

new_key_type! {
    /// Generational key of a node within one segment
    pub(crate) struct NodeKey;
}

static NEXT_SEGMENT: AtomicU64 = AtomicU64::new(0);

/// Process-unique identifier of an arena segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        SegmentId(NEXT_SEGMENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable address of a node: segment plus generational key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeRef {
    pub(crate) segment: SegmentId,
    pub(crate) key: NodeKey,
}

/// A heap node
///
/// `left`/`right` are never absent: an isolated node points at itself.
/// `child` is any one member of the circular child list.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) degree: Degree,
    pub(crate) marked: bool,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) child: Option<NodeRef>,
    pub(crate) left: NodeRef,
    pub(crate) right: NodeRef,
}

impl<K> Node<K> {
    /// A parentless, childless node in a one-element ring
    fn isolated(key: K, this: NodeRef) -> Self {
        Node {
            key,
            degree: 0,
            marked: false,
            parent: None,
            child: None,
            left: this,
            right: this,
        }
    }

    fn relabel(&mut self, map: impl Fn(NodeRef) -> NodeRef) {
        self.parent = self.parent.map(&map);
        self.child = self.child.map(&map);
        self.left = map(self.left);
        self.right = map(self.right);
    }
}

type Segment<K> = SlotMap<NodeKey, Node<K>>;

/// Owner of every node of one heap
pub(crate) struct Arena<K> {
    home: SegmentId,
    segments: FxHashMap<SegmentId, Segment<K>>,
}

impl<K> Arena<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let home = SegmentId::fresh();
        let mut segments = FxHashMap::default();
        segments.insert(home, SlotMap::with_capacity_and_key(capacity));
        Arena { home, segments }
    }

    /// Allocates an isolated node holding `key`
    pub(crate) fn alloc(&mut self, key: K) -> NodeRef {
        let segment = self.home;
        let nodes = self.segments.entry(segment).or_default();
        let key = nodes.insert_with_key(|k| Node::isolated(key, NodeRef { segment, key: k }));
        NodeRef { segment, key }
    }

    /// Releases a node that the heap structure still links to
    ///
    /// # Panics
    /// Panics if `r` is not live.
    pub(crate) fn take(&mut self, r: NodeRef) -> Node<K> {
        self.free(r)
            .expect("freeing a node reference this arena does not own")
    }

    /// Releases a node, returning it if `r` was live
    ///
    /// Emptied foreign segments are dropped so merged heaps do not
    /// accumulate dead maps.
    pub(crate) fn free(&mut self, r: NodeRef) -> Option<Node<K>> {
        let nodes = self.segments.get_mut(&r.segment)?;
        let node = nodes.remove(r.key)?;
        if nodes.is_empty() && r.segment != self.home {
            self.segments.remove(&r.segment);
        }
        Some(node)
    }

    pub(crate) fn get(&self, r: NodeRef) -> Option<&Node<K>> {
        self.segments.get(&r.segment)?.get(r.key)
    }

    pub(crate) fn contains(&self, r: NodeRef) -> bool {
        self.get(r).is_some()
    }

    /// Total number of live nodes across all segments
    pub(crate) fn len(&self) -> usize {
        self.segments.values().map(SlotMap::len).sum()
    }

    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Takes ownership of every segment of `other`
    ///
    /// The smaller map is moved into the larger one; the home segment of
    /// `self` is kept. Costs one map insertion per segment of the smaller
    /// operand: O(1) when either side has never absorbed another arena, and
    /// O(log S) amortized over any sequence of absorptions creating S segments
    /// in total. Segments are never coalesced, since re-keying their nodes
    /// would invalidate outstanding handles.
    pub(crate) fn absorb(&mut self, mut other: Arena<K>) {
        if other.segments.len() > self.segments.len() {
            std::mem::swap(&mut self.segments, &mut other.segments);
        }
        self.segments.extend(other.segments.drain());
    }

    /// Drops every node; only an empty home segment remains
    pub(crate) fn clear(&mut self) {
        let home = self.home;
        self.segments.retain(|id, _| *id == home);
        if let Some(nodes) = self.segments.get_mut(&home) {
            nodes.clear();
        }
    }

    /// All live nodes in arbitrary order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeRef, &Node<K>)> + '_ {
        self.segments.iter().flat_map(|(&segment, nodes)| {
            nodes
                .iter()
                .map(move |(key, node)| (NodeRef { segment, key }, node))
        })
    }

    /// Moves every key out in arbitrary order, emptying the arena
    pub(crate) fn drain_keys(&mut self) -> impl Iterator<Item = K> + '_ {
        self.segments
            .values_mut()
            .flat_map(|nodes| nodes.drain().map(|(_, node)| node.key))
    }
}

/// Segment renaming produced by [`Arena::deep_clone`]
pub(crate) struct Relabel(FxHashMap<SegmentId, SegmentId>);

impl Relabel {
    /// Translates a reference into the original arena to the copy
    pub(crate) fn apply(&self, r: NodeRef) -> NodeRef {
        NodeRef {
            segment: self.0[&r.segment],
            key: r.key,
        }
    }
}

impl<K: Clone> Arena<K> {
    /// Deep copy under fresh segment ids
    ///
    /// Slot keys are preserved by `SlotMap::clone`; only the segment half of
    /// every link is rewritten. References into `self` are translated with the
    /// returned [`Relabel`].
    pub(crate) fn deep_clone(&self) -> (Arena<K>, Relabel) {
        let relabel = Relabel(
            self.segments
                .keys()
                .map(|&old| (old, SegmentId::fresh()))
                .collect(),
        );

        let segments = self
            .segments
            .iter()
            .map(|(old, nodes)| {
                let mut nodes = nodes.clone();
                for (_, node) in nodes.iter_mut() {
                    node.relabel(|r| relabel.apply(r));
                }
                (relabel.0[old], nodes)
            })
            .collect();

        let copy = Arena {
            home: relabel.0[&self.home],
            segments,
        };
        (copy, relabel)
    }
}

impl<K> Index<NodeRef> for Arena<K> {
    type Output = Node<K>;

    /// # Panics
    /// Panics if `r` is not live. Internal links always are.
    #[inline]
    fn index(&self, r: NodeRef) -> &Node<K> {
        &self.segments[&r.segment][r.key]
    }
}

impl<K> IndexMut<NodeRef> for Arena<K> {
    #[inline]
    fn index_mut(&mut self, r: NodeRef) -> &mut Node<K> {
        self.segments
            .get_mut(&r.segment)
            .map(|nodes| &mut nodes[r.key])
            .expect("node reference into a segment this arena does not own")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_isolated() {
        let mut arena = Arena::with_capacity(4);
        let r = arena.alloc(42);
        let node = &arena[r];
        assert_eq!(node.key, 42);
        assert_eq!(node.left, r);
        assert_eq!(node.right, r);
        assert_eq!(node.parent, None);
        assert_eq!(node.child, None);
        assert_eq!(node.degree, 0);
        assert!(!node.marked);
    }

    #[test]
    fn test_free_invalidates_ref() {
        let mut arena = Arena::with_capacity(0);
        let r = arena.alloc("a");
        assert!(arena.contains(r));
        assert_eq!(arena.free(r).map(|n| n.key), Some("a"));
        assert!(!arena.contains(r));
        assert!(arena.free(r).is_none());

        // A reused slot must not resolve through the stale ref
        let s = arena.alloc("b");
        assert!(arena.contains(s));
        assert!(arena.get(r).is_none());
    }

    #[test]
    fn test_absorb_keeps_refs_valid() {
        let mut a = Arena::with_capacity(0);
        let mut b = Arena::with_capacity(0);
        let ra = a.alloc(1);
        let rb = b.alloc(2);
        assert!(!a.contains(rb));

        a.absorb(b);
        assert_eq!(a.segment_count(), 2);
        assert_eq!(a[ra].key, 1);
        assert_eq!(a[rb].key, 2);
        assert_eq!(a.len(), 2);

        // New nodes still go to the home segment
        let rc = a.alloc(3);
        assert_eq!(rc.segment, ra.segment);
    }

    #[test]
    fn test_empty_foreign_segment_is_dropped() {
        let mut a = Arena::with_capacity(0);
        let mut b = Arena::with_capacity(0);
        a.alloc(1);
        let rb = b.alloc(2);
        a.absorb(b);
        assert_eq!(a.segment_count(), 2);
        a.free(rb);
        assert_eq!(a.segment_count(), 1);
    }

    #[test]
    fn test_deep_clone_relabels_segments() {
        let mut a = Arena::with_capacity(0);
        let r = a.alloc(7);
        let (copy, relabel) = a.deep_clone();
        assert!(!copy.contains(r));
        assert_eq!(copy.len(), 1);

        let cr = relabel.apply(r);
        assert_eq!(copy[cr].key, 7);
        assert_eq!(copy[cr].left, cr);
        assert_eq!(copy[cr].right, cr);
        assert_eq!(a[r].key, 7);
    }

    #[test]
    fn test_clear_and_drain() {
        let mut a = Arena::with_capacity(0);
        for i in 0..5 {
            a.alloc(i);
        }
        let mut keys: Vec<_> = a.drain_keys().collect();
        keys.sort();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
        assert_eq!(a.len(), 0);

        a.alloc(9);
        a.clear();
        assert_eq!(a.len(), 0);
        assert_eq!(a.segment_count(), 1);
    }
}
