// SPSC queue tests: FIFO order, every overflow policy, peek, teardown of
// leftover values and a two-thread ordering run.
//
// cargo test --test spsc -- --nocapture

mod common;

use conduit::ErrorKind;
use conduit::SPSC::{self, OverflowPolicy, SpscBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_fifo_order() {
    let (mut tx, mut rx) = SPSC::queue::<u32>(8, OverflowPolicy::Discard);

    for i in 0..8 {
        assert!(tx.push(i));
    }
    assert_eq!(tx.can_push(), 0);
    assert_eq!(rx.can_pop(), 8);

    for i in 0..8 {
        assert_eq!(rx.pop(), Some(i));
    }
    assert_eq!(rx.pop(), None);
    assert_eq!(tx.can_push(), 8);
}

#[test]
fn test_discard_keeps_first_values() {
    let capacity = 16;
    let (mut tx, mut rx) = SPSC::queue::<usize>(capacity, OverflowPolicy::Discard);

    let accepted = (0..capacity + 5).filter(|&i| tx.push(i)).count();
    assert_eq!(accepted, capacity);
    assert_eq!(tx.overflows(), 5);

    let drained: Vec<_> = std::iter::from_fn(|| rx.pop()).collect();
    assert_eq!(drained, (0..capacity).collect::<Vec<_>>());
}

#[test]
fn test_wraps_many_times() {
    let (mut tx, mut rx) = SPSC::queue::<u64>(3, OverflowPolicy::Discard);

    for i in 0..1000u64 {
        assert!(tx.push(i));
        assert!(tx.push(i + 1));
        assert_eq!(rx.pop(), Some(i));
        assert_eq!(rx.pop(), Some(i + 1));
    }
    assert_eq!(rx.can_pop(), 0);
}

#[test]
fn test_peek_leaves_value() {
    let (mut tx, mut rx) = SPSC::queue::<String>(4, OverflowPolicy::Discard);
    assert!(rx.peek().is_none());

    tx.push("first".to_string());
    tx.push("second".to_string());

    assert_eq!(rx.peek().map(String::as_str), Some("first"));
    assert_eq!(rx.can_pop(), 2);
    assert_eq!(rx.pop().as_deref(), Some("first"));
    assert_eq!(rx.peek().map(String::as_str), Some("second"));
}

#[test]
fn test_error_policy_hands_value_to_callback() {
    let rejected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&rejected);

    let (mut tx, mut rx) = SpscBuilder::new()
        .with_capacity(2)
        .with_overflow_policy(OverflowPolicy::Error)
        .with_error_callback(move |kind, value: u32| {
            assert_eq!(kind, ErrorKind::Overflow);
            sink.lock().unwrap().push(value);
        })
        .build()
        .unwrap();

    assert!(tx.push(1));
    assert!(tx.push(2));
    assert!(!tx.push(3));
    assert!(!tx.push(4));

    assert_eq!(*rejected.lock().unwrap(), vec![3, 4]);
    assert_eq!(tx.overflows(), 2);
    assert_eq!(rx.pop(), Some(1));
    assert_eq!(rx.pop(), Some(2));
    assert_eq!(rx.pop(), None);
}

#[test]
fn test_error_callback_can_be_replaced() {
    let (mut tx, _rx) = SPSC::queue::<u8>(1, OverflowPolicy::Error);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    tx.set_error_callback(move |_, _| {
        counter.fetch_add(1, Ordering::Relaxed);
    });
    assert!(tx.push(0));
    assert!(!tx.push(1));

    let counter = Arc::clone(&calls);
    tx.set_error_callback(move |_, _| {
        counter.fetch_add(10, Ordering::Relaxed);
    });
    assert!(!tx.push(2));

    assert_eq!(calls.load(Ordering::Relaxed), 11);
}

#[test]
fn test_block_policy_waits_for_consumer() {
    conduit::trace::init_tracing();

    let (mut tx, mut rx) = SpscBuilder::new()
        .with_capacity(4)
        .with_overflow_policy(OverflowPolicy::Block)
        .with_poll_interval(Duration::from_micros(100))
        .build()
        .unwrap();

    for i in 0..4u32 {
        assert!(tx.push(i));
    }

    let consumer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        let mut seen = Vec::new();
        while seen.len() < 6 {
            match rx.pop() {
                Some(v) => seen.push(v),
                None => thread::yield_now(),
            }
        }
        seen
    });

    // Both block until the consumer wakes up and drains.
    assert!(tx.push(4));
    assert!(tx.push(5));
    assert!(tx.overflows() >= 1);

    assert_eq!(consumer.join().unwrap(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_invalid_construction() {
    assert!(matches!(
        SPSC::try_queue::<u8>(0, OverflowPolicy::Discard),
        Err(conduit::Error::ZeroCapacity)
    ));
    assert!(matches!(
        SPSC::try_queue::<u8>(8, OverflowPolicy::Grow),
        Err(conduit::Error::UnsupportedPolicy(OverflowPolicy::Grow))
    ));
}

#[test]
fn test_builder_defaults() {
    let (tx, rx) = SpscBuilder::<u8>::new().build().unwrap();
    assert_eq!(tx.capacity(), 1024);
    assert_eq!(rx.capacity(), 1024);
    assert_eq!(tx.overflow_policy(), OverflowPolicy::Discard);
    assert_eq!(tx.poll_interval(), Duration::from_millis(1));
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_leftover_values_dropped() {
    let drops = Arc::new(AtomicUsize::new(0));
    let (mut tx, mut rx) = SPSC::queue(8, OverflowPolicy::Discard);

    for _ in 0..5 {
        tx.push(DropCounter(Arc::clone(&drops)));
    }
    drop(rx.pop());
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    drop(rx);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    drop(tx);
    assert_eq!(drops.load(Ordering::SeqCst), 5);
}

#[test]
fn test_two_threads_preserve_order() {
    const N: u64 = 200_000;
    let (mut tx, mut rx) = SPSC::queue::<u64>(64, OverflowPolicy::Discard);

    let producer = thread::spawn(move || {
        for i in 0..N {
            while !tx.push(i) {
                thread::yield_now();
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut expected = 0;
        while expected < N {
            if let Some(v) = rx.pop() {
                assert_eq!(v, expected);
                expected += 1;
            }
        }
        assert_eq!(rx.pop(), None);
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

#[test]
fn test_error_policy_without_callback_is_fatal() {
    if common::in_fatal_child() {
        let (mut tx, _rx) = SPSC::queue::<u8>(1, OverflowPolicy::Error);
        tx.push(1);
        tx.push(2);
        return;
    }
    let output = common::run_fatal_child("test_error_policy_without_callback_is_fatal");
    common::assert_fatal(&output, "no error callback set");
}

#[test]
fn test_fatal_policy_aborts_on_overflow() {
    if common::in_fatal_child() {
        let (mut tx, _rx) = SPSC::queue::<u8>(2, OverflowPolicy::Fatal);
        for i in 0..3 {
            tx.push(i);
        }
        return;
    }
    let output = common::run_fatal_child("test_fatal_policy_aborts_on_overflow");
    common::assert_fatal(&output, "SPSC queue overflow (capacity 2)");
}

#[test]
fn test_grow_policy_is_fatal() {
    if common::in_fatal_child() {
        let _ = SPSC::queue::<u8>(8, OverflowPolicy::Grow);
        return;
    }
    let output = common::run_fatal_child("test_grow_policy_is_fatal");
    common::assert_fatal(&output, "overflow policy Grow is not supported");
}
