//! Circular doubly-linked list primitives over the node arena.
//!
//! In a circular list:
//! - A single node points to itself (both `left` and `right`)
//! - There is no head or tail - any node can be the entry point
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so it stops when it returns to its start
//!
//! The root list and every child list of the heap are rings of this kind.
//! All operations here are O(1) except [`Ring`] iteration.

use crate::arena::{Arena, NodeRef};

/// Splices the isolated node `b` in as `a`'s right neighbour.
#[inline]
pub(crate) fn link<K>(arena: &mut Arena<K>, a: NodeRef, b: NodeRef) {
    debug_assert!(is_singleton(arena, b), "linked node must be isolated");
    let a_right = arena[a].right;
    arena[b].left = a;
    arena[b].right = a_right;
    arena[a_right].left = b;
    arena[a].right = b;
}

/// Removes `x` from whichever ring holds it and resets it to a self-loop.
///
/// Returns `x`'s former right neighbour, or `None` if `x` was alone.
#[inline]
pub(crate) fn unlink<K>(arena: &mut Arena<K>, x: NodeRef) -> Option<NodeRef> {
    let left = arena[x].left;
    let right = arena[x].right;
    if right == x {
        return None;
    }
    arena[left].right = right;
    arena[right].left = left;
    let node = &mut arena[x];
    node.left = x;
    node.right = x;
    Some(right)
}

/// Joins the ring containing `a` with the (disjoint) ring containing `b`.
///
/// Before:
///   Ring A: ... <-> a_prev <-> a <-> ...
///   Ring B: ... <-> b_prev <-> b <-> ...
///
/// After:
///   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
#[inline]
pub(crate) fn splice<K>(arena: &mut Arena<K>, a: NodeRef, b: NodeRef) {
    let a_prev = arena[a].left;
    let b_prev = arena[b].left;

    arena[a_prev].right = b;
    arena[b].left = a_prev;

    arena[b_prev].right = a;
    arena[a].left = b_prev;
}

#[inline]
pub(crate) fn is_singleton<K>(arena: &Arena<K>, x: NodeRef) -> bool {
    let node = &arena[x];
    node.left == x && node.right == x
}

/// Iterator over one ring, starting at a given member and moving right.
///
/// The ring must not be modified while iterating; collect first when the
/// members are about to be relinked.
pub(crate) struct Ring<'a, K> {
    arena: &'a Arena<K>,
    start: NodeRef,
    next: Option<NodeRef>,
}

impl<'a, K> Ring<'a, K> {
    pub(crate) fn new(arena: &'a Arena<K>, start: NodeRef) -> Self {
        Ring {
            arena,
            start,
            next: Some(start),
        }
    }
}

impl<K> Iterator for Ring<'_, K> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let current = self.next?;
        let right = self.arena.get(current)?.right;
        self.next = (right != self.start).then_some(right);
        Some(current)
    }
}
