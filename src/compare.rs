//! Comparators supplied at heap construction
//!
//! A heap orders its keys through a [`Compare`] value rather than requiring
//! `K: Ord`. The smallest key according to the comparator is the one returned
//! by `find_min`.

use std::cmp::Ordering;

/// Total order over keys of type `K`
///
/// Implementations must be consistent: the same pair of keys always compares
/// the same way for the lifetime of the heap.
pub trait Compare<K: ?Sized> {
    /// Compares two keys
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Returns true if `a` orders strictly before `b`
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders keys by their `Ord` impl (min-heap)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their `Ord` impl (max-heap)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed;

impl<K: Ord + ?Sized> Compare<K> for Reversed {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
