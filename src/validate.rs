//! Structural invariant checking
//!
//! [`check`] walks the whole forest with an explicit worklist (no recursion)
//! and reports the first violated invariant. It backs
//! [`FibonacciHeap::validate`](crate::fibonacci::FibonacciHeap::validate) and
//! the `debug-invariants` feature. [`check_consolidated`] additionally
//! verifies the root-list shape that consolidation leaves behind.

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};
use thiserror::Error;

use crate::arena::{Arena, NodeRef};
use crate::compare::Compare;
use crate::degree::degree_bound;
use crate::list::Ring;

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A link points at a node the arena does not hold
    #[error("link to a node that is not in the heap")]
    DanglingLink,
    /// `x.left.right != x` or `x.right.left != x`
    #[error("circular list is inconsistent")]
    BrokenRing,
    /// A node was reached twice while walking the forest
    #[error("node is reachable along more than one path")]
    SharedNode,
    /// A ring member's parent link disagrees with the ring it sits in
    #[error("node's parent link does not match its list")]
    WrongParent,
    /// A root carries a mark
    #[error("root node is marked")]
    MarkedRoot,
    /// A node's degree differs from the size of its child ring
    #[error("degree is {recorded} but node has {actual} children")]
    DegreeMismatch { recorded: usize, actual: usize },
    /// A child's key is smaller than its parent's
    #[error("child key is smaller than its parent's key")]
    HeapOrder,
    /// A root is smaller than the recorded minimum
    #[error("a root is smaller than the recorded minimum")]
    StaleMin,
    /// `len()` disagrees with the number of reachable nodes
    #[error("len is {len} but {reachable} nodes are reachable")]
    LenMismatch { len: usize, reachable: usize },
    /// The arena holds nodes that the forest does not reach
    #[error("{stored} nodes are stored but only {reachable} are reachable")]
    Unreachable { stored: usize, reachable: usize },
    /// Two roots share a degree after consolidation
    #[error("two roots have degree {degree} after consolidation")]
    DuplicateRootDegree { degree: usize },
    /// A root's degree exceeds what a heap of this size allows
    #[error("root degree {degree} exceeds the bound {bound} for {len} nodes")]
    DegreeOverBound { degree: usize, bound: usize, len: usize },
}

pub(crate) fn check<K, C: Compare<K>>(
    arena: &Arena<K>,
    min: Option<NodeRef>,
    len: usize,
    cmp: &C,
) -> Result<(), InvariantViolation> {
    let Some(min) = min else {
        let stored = arena.len();
        if len != 0 {
            return Err(InvariantViolation::LenMismatch { len, reachable: 0 });
        }
        if stored != 0 {
            return Err(InvariantViolation::Unreachable { stored, reachable: 0 });
        }
        return Ok(());
    };
    let min_key = &arena.get(min).ok_or(InvariantViolation::DanglingLink)?.key;

    let mut visited: FxHashSet<NodeRef> = FxHashSet::default();
    // (any member of a ring, the parent every member must point at)
    let mut worklist: Vec<(NodeRef, Option<NodeRef>)> = vec![(min, None)];

    while let Some((start, parent)) = worklist.pop() {
        let mut members = 0;
        let mut x = start;
        loop {
            let node = arena.get(x).ok_or(InvariantViolation::DanglingLink)?;
            if !visited.insert(x) {
                return Err(InvariantViolation::SharedNode);
            }
            members += 1;

            let right = arena.get(node.right).ok_or(InvariantViolation::DanglingLink)?;
            let left = arena.get(node.left).ok_or(InvariantViolation::DanglingLink)?;
            if right.left != x || left.right != x {
                return Err(InvariantViolation::BrokenRing);
            }
            if node.parent != parent {
                return Err(InvariantViolation::WrongParent);
            }

            match parent {
                None => {
                    if node.marked {
                        return Err(InvariantViolation::MarkedRoot);
                    }
                    if cmp.less(&node.key, min_key) {
                        return Err(InvariantViolation::StaleMin);
                    }
                }
                Some(p) => {
                    if cmp.less(&node.key, &arena[p].key) {
                        return Err(InvariantViolation::HeapOrder);
                    }
                }
            }

            match node.child {
                Some(child) => worklist.push((child, Some(x))),
                None if node.degree != 0 => {
                    return Err(InvariantViolation::DegreeMismatch {
                        recorded: node.degree as usize,
                        actual: 0,
                    });
                }
                None => {}
            }

            x = node.right;
            if x == start {
                break;
            }
        }

        if let Some(p) = parent {
            let recorded = arena[p].degree as usize;
            if recorded != members {
                return Err(InvariantViolation::DegreeMismatch {
                    recorded,
                    actual: members,
                });
            }
        }
    }

    let reachable = visited.len();
    if reachable != len {
        return Err(InvariantViolation::LenMismatch { len, reachable });
    }
    let stored = arena.len();
    if stored != reachable {
        return Err(InvariantViolation::Unreachable { stored, reachable });
    }
    Ok(())
}

/// Checks that the roots have pairwise distinct degrees, all below
/// `degree_bound(len)`, so there are at most that many roots
///
/// Holds right after consolidation. Any later insert or cut may add a
/// root of repeated degree.
pub(crate) fn check_consolidated<K>(
    arena: &Arena<K>,
    min: Option<NodeRef>,
    len: usize,
) -> Result<(), InvariantViolation> {
    let Some(min) = min else {
        return Ok(());
    };
    let bound = degree_bound(len);
    let mut seen: SmallVec<[bool; 32]> = smallvec![false; bound];

    for root in Ring::new(arena, min) {
        let degree = arena.get(root).ok_or(InvariantViolation::DanglingLink)?.degree as usize;
        let Some(slot) = seen.get_mut(degree) else {
            return Err(InvariantViolation::DegreeOverBound { degree, bound, len });
        };
        if std::mem::replace(slot, true) {
            return Err(InvariantViolation::DuplicateRootDegree { degree });
        }
    }
    Ok(())
}
