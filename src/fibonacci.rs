//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list and the heap keeps a reference to the root
//! with the smallest key. Every node carries its degree (number of children) and
//! a mark recording whether it has lost a child since it last became a child.
//!
//! # Amortized analysis
//!
//! With potential Φ = #roots + 2·#marked, insert, merge and every single cut add
//! O(1) potential. Consolidation after extract_min links equal-degree roots until
//! all root degrees are distinct, paying for its work with the roots it removes.
//! Cascading cuts are paid for by the marks they clear.
//!
//! # Storage
//!
//! Nodes live in a generational arena and every link is an index, so stale
//! handles are detected ([`HeapError::DanglingHandle`]) instead of dereferenced.

use std::fmt;
use std::iter::FusedIterator;

use smallvec::{smallvec, SmallVec};

use crate::arena::{Arena, NodeRef};
use crate::compare::{Compare, Natural};
use crate::degree::{checked_increment, degree_bound};
use crate::list::{self, Ring};
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use crate::validate::InvariantViolation;

/// Handle to an element in a Fibonacci heap
///
/// A handle stays valid until its element is removed by `extract_min` or
/// `delete`, and it survives merging its heap into another. Using it after
/// removal, or with an unrelated heap, yields [`HeapError::DanglingHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeHandle {
    node: NodeRef,
}

impl Handle for NodeHandle {}

/// Fibonacci Heap
///
/// Keys are ordered by the comparator `C`; the default [`Natural`] uses `Ord`.
///
/// # Example
///
/// ```rust
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5);
/// heap.insert(3);
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok(&1));
/// assert_eq!(heap.extract_min(), Ok(1));
/// assert_eq!(heap.extract_min(), Ok(3));
/// ```
pub struct FibonacciHeap<K, C = Natural> {
    arena: Arena<K>,
    min: Option<NodeRef>,
    len: usize,
    cmp: C,
}

impl<K: Ord> FibonacciHeap<K> {
    /// Creates an empty heap ordered by `K`'s `Ord` impl
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Creates an empty heap with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, C: Compare<K>> FibonacciHeap<K, C> {
    /// Creates an empty heap ordered by `cmp`
    ///
    /// ```rust
    /// use fibheap::fibonacci::FibonacciHeap;
    ///
    /// let mut heap = FibonacciHeap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// heap.insert("three");
    /// heap.insert("one");
    /// assert_eq!(heap.find_min(), Ok(&"one"));
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }

    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        FibonacciHeap {
            arena: Arena::with_capacity(capacity),
            min: None,
            len: 0,
            cmp,
        }
    }

    /// Returns the comparator that orders this heap
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts a key and returns a handle to it
    ///
    /// # Time Complexity
    /// O(1) worst case
    pub fn insert(&mut self, key: K) -> NodeHandle {
        let node = self.arena.alloc(key);
        match self.min {
            Some(min) => {
                list::link(&mut self.arena, min, node);
                if self.less(node, min) {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }

        self.len += 1;
        self.debug_check();
        NodeHandle { node }
    }

    /// Returns the minimum key
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap has no elements.
    pub fn find_min(&self) -> Result<&K, HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Returns the minimum key, or `None` when empty
    pub fn peek(&self) -> Option<&K> {
        self.min.map(|min| &self.arena[min].key)
    }

    /// Returns a handle to the element holding the minimum key
    pub fn min_handle(&self) -> Option<NodeHandle> {
        self.min.map(|node| NodeHandle { node })
    }

    /// Removes and returns the minimum key
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap has no elements.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_min(&mut self) -> Result<K, HeapError> {
        let z = self.min.ok_or(HeapError::EmptyHeap)?;

        self.promote_children(z);
        match list::unlink(&mut self.arena, z) {
            Some(next) => {
                self.min = Some(next);
                self.consolidate(next);
            }
            None => self.min = None,
        }

        self.len -= 1;
        let node = self.arena.take(z);
        self.debug_check();
        Ok(node.key)
    }

    /// Removes and returns the minimum key, or `None` when empty
    pub fn pop(&mut self) -> Option<K> {
        self.extract_min().ok()
    }

    /// Moves every element of `other` into this heap
    ///
    /// The root lists are spliced in O(1) and no node is copied, so handles
    /// issued by `other` remain valid on `self`. `other`'s comparator is
    /// dropped; both heaps are expected to order keys the same way.
    ///
    /// Merging with an empty heap leaves `self` unchanged.
    ///
    /// # Time Complexity
    /// O(1) plus one table entry per arena segment of the smaller operand.
    /// A heap that was filled by `insert` owns a single segment, so merging
    /// such a heap is O(1). A heap assembled from `m` earlier merges carries
    /// up to `m + 1` segments; over any sequence of merges the segment moves
    /// total O(S log S) for S heaps created, i.e. O(log S) amortized.
    pub fn merge(&mut self, other: Self) {
        let FibonacciHeap {
            arena,
            min: other_min,
            len: other_len,
            ..
        } = other;
        let Some(other_min) = other_min else {
            return;
        };

        self.arena.absorb(arena);
        match self.min {
            Some(min) => {
                list::splice(&mut self.arena, min, other_min);
                if self.less(other_min, min) {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }

        self.len += other_len;
        self.debug_check();
    }

    /// Consumes two heaps and returns their union
    ///
    /// Same cost as [`merge`](Self::merge).
    ///
    /// ```rust
    /// use fibheap::fibonacci::FibonacciHeap;
    ///
    /// let a: FibonacciHeap<i32> = [4, 8].into_iter().collect();
    /// let b: FibonacciHeap<i32> = [2, 6].into_iter().collect();
    /// let mut both = FibonacciHeap::meld(a, b);
    /// assert_eq!(both.len(), 4);
    /// assert_eq!(both.extract_min(), Ok(2));
    /// ```
    pub fn meld(mut a: Self, b: Self) -> Self {
        a.merge(b);
        a
    }

    /// Lowers the key of the element identified by `handle`
    ///
    /// `new_key` may equal the current key.
    ///
    /// # Errors
    /// - [`HeapError::EmptyHeap`] if the heap has no elements
    /// - [`HeapError::DanglingHandle`] if the element was removed
    /// - [`HeapError::InvalidArgument`] if `new_key` is greater than the current key
    ///
    /// The heap is unchanged when an error is returned.
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: &NodeHandle, new_key: K) -> Result<(), HeapError> {
        let x = self.resolve(handle)?;
        if self.cmp.less(&self.arena[x].key, &new_key) {
            return Err(HeapError::InvalidArgument);
        }

        self.arena[x].key = new_key;
        let parent = self.arena[x].parent;
        if let Some(parent) = parent {
            if self.less(x, parent) {
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }
        // A node still under its parent cannot be smaller than the minimum root
        if let Some(min) = self.min {
            if self.less(x, min) {
                self.min = Some(x);
            }
        }

        self.debug_check();
        Ok(())
    }

    /// Removes the element identified by `handle` and returns its key
    ///
    /// # Errors
    /// - [`HeapError::EmptyHeap`] if the heap has no elements
    /// - [`HeapError::DanglingHandle`] if the element was already removed
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &NodeHandle) -> Result<K, HeapError> {
        let x = self.resolve(handle)?;

        let parent = self.arena[x].parent;
        if let Some(parent) = parent {
            self.cut(x, parent);
            self.cascading_cut(parent);
        }
        self.promote_children(x);

        let next = list::unlink(&mut self.arena, x);
        if self.min == Some(x) {
            match next {
                Some(next) => {
                    self.min = Some(next);
                    self.consolidate(next);
                }
                None => self.min = None,
            }
        }

        self.len -= 1;
        let node = self.arena.take(x);
        self.debug_check();
        Ok(node.key)
    }

    /// Replaces the key of the element identified by `handle`
    ///
    /// Unlike [`decrease_key`](Self::decrease_key) the new key may be larger.
    /// An increase cuts the element to the root list, promotes its children to
    /// roots, and re-establishes the minimum if the element held it. The handle
    /// stays valid either way.
    ///
    /// # Errors
    /// - [`HeapError::EmptyHeap`] if the heap has no elements
    /// - [`HeapError::DanglingHandle`] if the element was removed
    ///
    /// # Time Complexity
    /// O(1) amortized for a decrease, O(log n) amortized for an increase
    pub fn update_key(&mut self, handle: &NodeHandle, key: K) -> Result<(), HeapError> {
        let x = self.resolve(handle)?;
        if !self.cmp.less(&self.arena[x].key, &key) {
            return self.decrease_key(handle, key);
        }

        let parent = self.arena[x].parent;
        if let Some(parent) = parent {
            self.cut(x, parent);
            self.cascading_cut(parent);
        }
        self.promote_children(x);
        self.arena[x].key = key;

        if self.min == Some(x) {
            self.consolidate(x);
        }

        self.debug_check();
        Ok(())
    }

    /// Returns the key of the element identified by `handle`
    pub fn get(&self, handle: &NodeHandle) -> Result<&K, HeapError> {
        let x = self.resolve(handle)?;
        Ok(&self.arena[x].key)
    }

    /// Returns true if `handle` refers to an element of this heap
    pub fn contains(&self, handle: &NodeHandle) -> bool {
        self.arena.contains(handle.node)
    }

    /// Finds an element whose key compares equal to `key`
    ///
    /// Linear scan; with duplicate keys any matching element may be returned.
    ///
    /// # Time Complexity
    /// O(n)
    pub fn find(&self, key: &K) -> Option<NodeHandle> {
        self.arena
            .iter()
            .find(|(_, node)| self.cmp.compare(&node.key, key).is_eq())
            .map(|(node, _)| NodeHandle { node })
    }

    /// Removes every element; all outstanding handles become dangling
    pub fn clear(&mut self) {
        self.arena.clear();
        self.min = None;
        self.len = 0;
    }

    /// Iterates over all keys in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.arena.iter().map(|(_, node)| &node.key)
    }

    /// Returns all keys in arbitrary order
    pub fn into_vec(mut self) -> Vec<K> {
        self.arena.drain_keys().collect()
    }

    /// Returns all keys in ascending order
    ///
    /// ```rust
    /// use fibheap::fibonacci::FibonacciHeap;
    ///
    /// let heap: FibonacciHeap<i32> = [5, 1, 4, 2].into_iter().collect();
    /// assert_eq!(heap.into_sorted_vec(), vec![1, 2, 4, 5]);
    /// ```
    pub fn into_sorted_vec(mut self) -> Vec<K> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Some(key) = self.pop() {
            sorted.push(key);
        }
        sorted
    }

    /// Removes keys in ascending order as the iterator is advanced
    ///
    /// Dropping the iterator early removes the remaining elements too.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, K, C> {
        DrainSorted { heap: self }
    }

    /// Checks every structural invariant of the heap
    ///
    /// - every non-root key is not less than its parent's key
    /// - every ring satisfies `x.left.right == x` and `x.right.left == x`
    /// - roots are parentless and unmarked
    /// - each node's degree equals the size of its child ring
    /// - `min` is a root and no root is smaller
    /// - every stored node is reachable and the count equals `len()`
    ///
    /// # Time Complexity
    /// O(n)
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        crate::validate::check(&self.arena, self.min, self.len, &self.cmp)
    }

    /// Checks the root list left behind by consolidation
    ///
    /// Right after [`extract_min`](Self::extract_min), or after
    /// [`delete`](Self::delete) or an increasing
    /// [`update_key`](Self::update_key) of the minimum, every root has a
    /// distinct degree and there are at most `D(n) + 1` roots, where `D(n)` is
    /// the largest `k` with `F(k + 2) <= n`. New roots from inserts or cuts
    /// break this until the next consolidation, so it is not part of
    /// [`validate`](Self::validate).
    ///
    /// ```rust
    /// use fibheap::fibonacci::FibonacciHeap;
    ///
    /// let mut heap: FibonacciHeap<u32> = (0..16).collect();
    /// heap.extract_min().unwrap();
    /// assert_eq!(heap.validate_consolidated(), Ok(()));
    /// ```
    pub fn validate_consolidated(&self) -> Result<(), InvariantViolation> {
        crate::validate::check_consolidated(&self.arena, self.min, self.len)
    }

    #[inline]
    fn debug_check(&self) {
        #[cfg(all(feature = "debug-invariants", debug_assertions))]
        if let Err(violation) = self.validate() {
            panic!("heap invariant broken: {violation}");
        }
    }

    fn resolve(&self, handle: &NodeHandle) -> Result<NodeRef, HeapError> {
        if self.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        if !self.arena.contains(handle.node) {
            return Err(HeapError::DanglingHandle);
        }
        Ok(handle.node)
    }

    #[inline]
    fn less(&self, a: NodeRef, b: NodeRef) -> bool {
        self.cmp.less(&self.arena[a].key, &self.arena[b].key)
    }

    /// Adds an isolated node to the root list without touching `min`
    fn add_root(&mut self, x: NodeRef) {
        match self.min {
            Some(min) => list::link(&mut self.arena, min, x),
            None => self.min = Some(x),
        }
    }

    /// Splices the whole child ring of root `z` into the root list
    fn promote_children(&mut self, z: NodeRef) {
        let Some(first) = self.arena[z].child.take() else {
            return;
        };
        self.arena[z].degree = 0;

        let mut child = first;
        loop {
            let node = &mut self.arena[child];
            node.parent = None;
            node.marked = false;
            child = node.right;
            if child == first {
                break;
            }
        }

        match self.min {
            Some(min) => list::splice(&mut self.arena, min, first),
            None => self.min = Some(first),
        }
    }

    /// Makes root `y` a child of root `x`
    fn make_child(&mut self, y: NodeRef, x: NodeRef) {
        list::unlink(&mut self.arena, y);
        let node = &mut self.arena[y];
        node.parent = Some(x);
        node.marked = false;

        let child = self.arena[x].child;
        match child {
            Some(child) => list::link(&mut self.arena, child, y),
            None => self.arena[x].child = Some(y),
        }
        let parent = &mut self.arena[x];
        parent.degree = checked_increment(parent.degree);
    }

    /// Detaches `x` from its parent `p` and adds it to the root list
    fn cut(&mut self, x: NodeRef, p: NodeRef) {
        let sibling = list::unlink(&mut self.arena, x);
        let parent = &mut self.arena[p];
        if parent.child == Some(x) {
            parent.child = sibling;
        }
        debug_assert!(parent.degree > 0, "cut from a parent with no children");
        parent.degree -= 1;

        let node = &mut self.arena[x];
        node.parent = None;
        node.marked = false;
        self.add_root(x);
    }

    /// Walks up from `p`, cutting marked ancestors until an unmarked one
    /// (which gets marked) or a root is reached
    fn cascading_cut(&mut self, mut p: NodeRef) {
        loop {
            let node = &mut self.arena[p];
            let Some(grandparent) = node.parent else {
                return;
            };
            if !node.marked {
                node.marked = true;
                return;
            }
            self.cut(p, grandparent);
            p = grandparent;
        }
    }

    /// Links equal-degree roots until all root degrees are distinct
    ///
    /// `start` is any member of the root list. Afterwards `min` is the
    /// smallest surviving root.
    fn consolidate(&mut self, start: NodeRef) {
        let roots: SmallVec<[NodeRef; 32]> = Ring::new(&self.arena, start).collect();
        let mut by_degree: SmallVec<[Option<NodeRef>; 32]> = smallvec![None; degree_bound(self.len)];

        for root in roots {
            let mut x = root;
            let mut d = self.arena[x].degree as usize;
            loop {
                if d >= by_degree.len() {
                    by_degree.resize(d + 1, None);
                }
                let Some(mut y) = by_degree[d].take() else {
                    break;
                };
                // Ties keep the root currently being walked on top
                if self.less(y, x) {
                    std::mem::swap(&mut x, &mut y);
                }
                self.make_child(y, x);
                d += 1;
            }
            by_degree[d] = Some(x);
        }

        self.min = None;
        for root in by_degree.into_iter().flatten() {
            match self.min {
                Some(min) if !self.less(root, min) => {}
                _ => self.min = Some(root),
            }
        }

        #[cfg(all(feature = "debug-invariants", debug_assertions))]
        if let Err(violation) = self.validate_consolidated() {
            panic!("consolidation left an invalid root list: {violation}");
        }
    }
}

#[cfg(test)]
impl<K, C: Compare<K>> FibonacciHeap<K, C> {
    fn parent_of(&self, handle: &NodeHandle) -> Option<NodeHandle> {
        self.arena[handle.node].parent.map(|node| NodeHandle { node })
    }

    fn is_marked(&self, handle: &NodeHandle) -> bool {
        self.arena[handle.node].marked
    }

    /// Degrees of the roots, ascending
    fn root_degrees(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = self.min.map_or_else(Vec::new, |min| {
            Ring::new(&self.arena, min)
                .map(|r| self.arena[r].degree as usize)
                .collect()
        });
        degrees.sort_unstable();
        degrees
    }
}

impl<K, C: Compare<K> + Default> Default for FibonacciHeap<K, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, C: Clone> Clone for FibonacciHeap<K, C> {
    /// Deep copy. Handles of `self` are not valid on the copy.
    fn clone(&self) -> Self {
        let (arena, relabel) = self.arena.deep_clone();
        FibonacciHeap {
            arena,
            min: self.min.map(|min| relabel.apply(min)),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for FibonacciHeap<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self.min.map_or(0, |min| Ring::new(&self.arena, min).count());
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.min.map(|min| &self.arena[min].key))
            .field("roots", &roots)
            .field("segments", &self.arena.segment_count())
            .finish()
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for FibonacciHeap<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut heap = Self::with_capacity_and_comparator(iter.size_hint().0, C::default());
        heap.extend(iter);
        heap
    }
}

impl<K, C: Compare<K>> Extend<K> for FibonacciHeap<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

/// Draining iterator returned by [`FibonacciHeap::drain_sorted`]
pub struct DrainSorted<'a, K, C: Compare<K>> {
    heap: &'a mut FibonacciHeap<K, C>,
}

impl<K, C: Compare<K>> Iterator for DrainSorted<'_, K, C> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.heap.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<K, C: Compare<K>> ExactSizeIterator for DrainSorted<'_, K, C> {}

impl<K, C: Compare<K>> FusedIterator for DrainSorted<'_, K, C> {}

impl<K, C: Compare<K>> Drop for DrainSorted<'_, K, C> {
    fn drop(&mut self) {
        self.heap.clear();
    }
}

impl<K, C: Compare<K> + Default> Heap<K> for FibonacciHeap<K, C> {
    fn new() -> Self {
        Self::default()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn push(&mut self, key: K) {
        self.insert(key);
    }

    fn peek(&self) -> Option<&K> {
        self.peek()
    }

    fn pop(&mut self) -> Option<K> {
        self.pop()
    }

    fn merge(&mut self, other: Self) {
        self.merge(other)
    }
}

impl<K, C: Compare<K> + Default> DecreaseKeyHeap<K> for FibonacciHeap<K, C> {
    type Handle = NodeHandle;

    fn push_with_handle(&mut self, key: K) -> NodeHandle {
        self.insert(key)
    }

    fn decrease_key(&mut self, handle: &NodeHandle, new_key: K) -> Result<(), HeapError> {
        self.decrease_key(handle, new_key)
    }

    fn remove(&mut self, handle: &NodeHandle) -> Result<K, HeapError> {
        self.delete(handle)
    }
}
