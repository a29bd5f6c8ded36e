//! Degree type and utilities for node child-count tracking.
//!
//! # Why u8?
//!
//! A Fibonacci heap node of degree `k` roots a subtree with at least
//! `F(k + 2)` nodes, where `F` is the Fibonacci sequence. The largest degree
//! in a heap of `n` nodes is therefore at most `log_φ(n)` (about 1.44 log₂ n).
//!
//! - 2⁶⁴ nodes → max degree ~92
//!
//! `u8` covers that with room to spare and keeps arena nodes small.

/// Type alias for node degree (number of children).
pub(crate) type Degree = u8;

/// Increment a degree value, panicking on overflow.
///
/// # Panics
///
/// Panics if `degree == u8::MAX`. This cannot happen on a consistent heap
/// since it would need more than `F(257)` nodes.
#[inline]
pub(crate) fn checked_increment(degree: Degree) -> Degree {
    degree.checked_add(1).expect(
        "degree overflow: max degree is log_φ(n), far below u8::MAX for any addressable heap",
    )
}

/// Number of distinct degree slots a heap of `len` nodes can need.
///
/// Returns `D(len) + 1` where `D(len)` is the largest `k` with `F(k + 2) <= len`.
pub(crate) fn degree_bound(len: usize) -> usize {
    // (F(k + 2), F(k + 3)) for the current k
    let (mut lo, mut hi) = (1usize, 2usize);
    let mut max_degree = 0;
    while hi <= len && hi != usize::MAX {
        max_degree += 1;
        let next = lo.saturating_add(hi);
        lo = hi;
        hi = next;
    }
    max_degree + 1
}
