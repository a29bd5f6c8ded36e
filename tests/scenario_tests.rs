//! End-to-end scenarios through the public API
//!
//! Each test drives a heap through a fixed sequence of operations and checks
//! the observable results plus the structural invariants after every step.

use fibheap::{FibonacciHeap, HeapError, InvariantViolation, Reversed};

fn check<K, C: fibheap::Compare<K>>(heap: &FibonacciHeap<K, C>) {
    assert_eq!(heap.validate(), Ok::<(), InvariantViolation>(()));
}

#[test]
fn test_insert_extract_decrease_sequence() {
    let mut heap = FibonacciHeap::new();
    heap.insert(5);
    heap.insert(3);
    let eight = heap.insert(8);
    heap.insert(1);
    check(&heap);

    assert_eq!(heap.find_min(), Ok(&1));
    assert_eq!(heap.extract_min(), Ok(1));
    check(&heap);
    assert_eq!(heap.find_min(), Ok(&3));

    heap.decrease_key(&eight, 0).unwrap();
    check(&heap);
    assert_eq!(heap.find_min(), Ok(&0));

    assert_eq!(heap.extract_min(), Ok(0));
    assert_eq!(heap.extract_min(), Ok(3));
    assert_eq!(heap.extract_min(), Ok(5));
    assert!(heap.is_empty());
    check(&heap);
}

#[test]
fn test_delete_sole_node_empties_heap() {
    let mut heap = FibonacciHeap::new();
    let only = heap.insert(42);
    assert_eq!(heap.delete(&only), Ok(42));
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.find_min(), Err(HeapError::EmptyHeap));
    check(&heap);
}

#[test]
fn test_size_accounting() {
    let mut a = FibonacciHeap::new();
    let handles: Vec<_> = (0..20).map(|i| a.insert(i)).collect();
    assert_eq!(a.len(), 20);

    a.extract_min().unwrap();
    assert_eq!(a.len(), 19);
    a.delete(&handles[10]).unwrap();
    assert_eq!(a.len(), 18);

    let b: FibonacciHeap<i32> = (100..105).collect();
    a.merge(b);
    assert_eq!(a.len(), 23);
    check(&a);
}

#[test]
fn test_error_leaves_heap_unchanged() {
    let mut heap = FibonacciHeap::new();
    let h = heap.insert(7);
    heap.insert(2);
    heap.insert(9);
    heap.extract_min().unwrap();

    assert_eq!(heap.decrease_key(&h, 100), Err(HeapError::InvalidArgument));
    assert_eq!(heap.len(), 2);
    assert_eq!(heap.get(&h), Ok(&7));
    check(&heap);
}

#[test]
fn test_handles_survive_meld() {
    let mut left = FibonacciHeap::new();
    let mut right = FibonacciHeap::new();
    let l = left.insert(10);
    let r = right.insert(20);
    left.insert(15);
    right.insert(25);

    let mut both = FibonacciHeap::meld(left, right);
    check(&both);
    both.decrease_key(&r, 1).unwrap();
    assert_eq!(both.delete(&l), Ok(10));
    assert_eq!(both.into_sorted_vec(), vec![1, 15, 25]);
}

#[test]
fn test_max_heap_via_comparator() {
    let mut heap = FibonacciHeap::with_comparator(Reversed);
    let low = heap.insert(1);
    heap.insert(50);
    heap.insert(30);

    // With reversed order "decrease" means move towards the front
    heap.decrease_key(&low, 99).unwrap();
    assert_eq!(heap.extract_min(), Ok(99));
    assert_eq!(heap.extract_min(), Ok(50));
    check(&heap);
}

#[test]
fn test_closure_comparator_on_tuples() {
    let by_priority = |a: &(u8, &'static str), b: &(u8, &'static str)| a.0.cmp(&b.0);
    let mut tasks = FibonacciHeap::with_capacity_and_comparator(4, by_priority);
    tasks.insert((3, "write docs"));
    let fix = tasks.insert((5, "fix bug"));
    tasks.insert((4, "review"));

    tasks.decrease_key(&fix, (1, "fix bug")).unwrap();
    assert_eq!(tasks.extract_min().map(|t| t.1), Ok("fix bug"));
    assert_eq!(tasks.extract_min().map(|t| t.1), Ok("write docs"));
}

#[test]
fn test_drop_of_large_heap() {
    // Deep trees must tear down without recursion
    let mut heap: FibonacciHeap<u32> = (0..100_000).collect();
    heap.extract_min().unwrap();
    for _ in 0..1000 {
        heap.extract_min().unwrap();
    }
    assert_eq!(heap.len(), 100_000 - 1001);
    drop(heap);
}
