//! Arena-backed Fibonacci heap for Rust
//!
//! This crate provides a mergeable priority queue with handle-based
//! `decrease_key` and `delete`, the combination used inside Dijkstra's
//! shortest-path and Prim's minimum-spanning-tree algorithms.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) insert, O(1) amortized decrease_key,
//!   O(log n) amortized extract_min and delete. Merge splices root lists in
//!   O(1) and moves the smaller operand's arena segment table, which is a
//!   single entry unless that heap was itself built by merging (see
//!   [`FibonacciHeap::merge`])
//! - **Comparators**: keys are ordered by a [`Compare`] value given at
//!   construction ([`Natural`], [`Reversed`], or any closure)
//! - **Checked handles**: nodes live in a generational arena, so a handle to a
//!   removed element is reported as [`HeapError::DanglingHandle`]
//! - **Graph algorithms**: Dijkstra, A* and Prim built on [`DecreaseKeyHeap`]
//!
//! # Example
//!
//! ```rust
//! use fibheap::fibonacci::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! heap.insert(5);
//! heap.insert(3);
//! let eight = heap.insert(8);
//! heap.insert(1);
//!
//! assert_eq!(heap.extract_min(), Ok(1));
//! heap.decrease_key(&eight, 0).unwrap();
//! assert_eq!(heap.find_min(), Ok(&0));
//! ```

mod arena;
pub mod compare;
mod degree;
pub mod fibonacci;
mod list;
pub mod pathfinding;
pub mod traits;
pub mod validate;

// Re-export the main types for convenience
pub use compare::{Compare, Natural, Reversed};
pub use fibonacci::{FibonacciHeap, NodeHandle};
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
pub use validate::InvariantViolation;
