//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy for mergeable priority queues:
//!
//! - [`Heap`]: Base trait for push/peek/pop/merge
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key` and `remove`
//!
//! Unlike `std::collections::BinaryHeap`, heaps in this crate are min-heaps
//! with respect to their comparator. The key itself is the priority; to attach
//! a payload, store a struct as the key and order it with a comparator (or an
//! `Ord` impl) that looks only at the priority field.

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The operation needs at least one element but the heap has none
    #[error("heap is empty")]
    EmptyHeap,
    /// `decrease_key` was given a key that compares greater than the current one
    #[error("new key is greater than the current key")]
    InvalidArgument,
    /// The handle refers to an element that was already removed, or that
    /// belongs to a different heap
    #[error("handle is no longer valid (element was removed)")]
    DanglingHandle,
}

/// A handle to an element in the heap, used for decrease_key and remove
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Copy + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// # Example
///
/// ```rust
/// use fibheap::Heap;
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap: FibonacciHeap<i32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap<K> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(1) for the Fibonacci heap.
    fn push(&mut self, key: K);

    /// Returns the minimum key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<&K>;

    /// Removes and returns the minimum key
    ///
    /// # Time Complexity
    /// O(log n) amortized for the Fibonacci heap.
    fn pop(&mut self) -> Option<K>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` support
///
/// # Example
///
/// ```rust
/// use fibheap::{DecreaseKeyHeap, Heap};
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap: FibonacciHeap<i32> = Heap::new();
/// let handle = heap.push_with_handle(10);
/// heap.push(7);
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some(&5));
/// ```
pub trait DecreaseKeyHeap<K>: Heap<K> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts a key, returning a handle for later `decrease_key`/`remove`
    fn push_with_handle(&mut self, key: K) -> Self::Handle;

    /// Lowers the key of the element identified by `handle`
    ///
    /// # Errors
    /// - [`HeapError::EmptyHeap`] if the heap has no elements
    /// - [`HeapError::DanglingHandle`] if the element was already removed
    /// - [`HeapError::InvalidArgument`] if `new_key` is greater than the current key
    ///
    /// A failing call leaves the heap unchanged.
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError>;

    /// Removes the element identified by `handle` and returns its key
    fn remove(&mut self, handle: &Self::Handle) -> Result<K, HeapError>;
}
