// C ABI tests. Called from Rust exactly as a C caller would: opaque
// handles, void* payloads and extern "C" callbacks with a user pointer.

mod common;

use conduit::ffi::*;
use std::ffi::{c_int, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

fn as_payload(v: &mut u64) -> *mut c_void {
    (v as *mut u64).cast()
}

fn read_payload(p: *mut c_void) -> u64 {
    assert!(!p.is_null());
    unsafe { *(p as *const u64) }
}

#[test]
fn test_mpmcq_roundtrip() {
    let mut values = [10u64, 20, 30, 40];
    let q = conduit_mpmcq_create(4);

    for v in values.iter_mut() {
        assert!(conduit_mpmcq_push(q, as_payload(v)));
    }
    let mut extra = 50u64;
    assert!(!conduit_mpmcq_push(q, as_payload(&mut extra)));

    for expected in [10, 20, 30, 40] {
        assert_eq!(read_payload(conduit_mpmcq_pop(q)), expected);
    }
    assert!(conduit_mpmcq_pop(q).is_null());
    conduit_mpmcq_destroy(q);
}

#[repr(C)]
struct Rejected {
    count: usize,
    last_code: c_int,
    last_value: *mut c_void,
    queue: *mut SpscqHandle,
}

extern "C" fn on_spsc_error(
    queue: *mut SpscqHandle,
    code: c_int,
    value: *mut c_void,
    user: *mut c_void,
) {
    let rejected = unsafe { &mut *(user as *mut Rejected) };
    rejected.count += 1;
    rejected.last_code = code;
    rejected.last_value = value;
    rejected.queue = queue;
}

#[test]
fn test_spscq_error_callback() {
    let q = conduit_spscq_create(2, CONDUIT_SPSCQ_OVERFLOW_ERROR);
    let mut rejected = Rejected {
        count: 0,
        last_code: 0,
        last_value: ptr::null_mut(),
        queue: ptr::null_mut(),
    };
    conduit_spscq_set_error_callback(q, Some(on_spsc_error), (&mut rejected as *mut Rejected).cast());

    let mut a = 1u64;
    let mut b = 2u64;
    let mut c = 3u64;
    assert_eq!(conduit_spscq_can_push(q), 2);
    assert!(conduit_spscq_push(q, as_payload(&mut a)));
    assert!(conduit_spscq_push(q, as_payload(&mut b)));
    assert!(!conduit_spscq_push(q, as_payload(&mut c)));

    assert_eq!(rejected.count, 1);
    assert_eq!(rejected.last_code, CONDUIT_ERROR_OVERFLOW);
    assert_eq!(rejected.last_value, as_payload(&mut c));
    assert_eq!(rejected.queue, q);

    assert_eq!(conduit_spscq_can_pop(q), 2);
    assert_eq!(read_payload(conduit_spscq_peek(q)), 1);
    assert_eq!(read_payload(conduit_spscq_pop(q)), 1);
    assert_eq!(read_payload(conduit_spscq_pop(q)), 2);
    assert!(conduit_spscq_pop(q).is_null());
    assert!(conduit_spscq_peek(q).is_null());

    conduit_spscq_destroy(q);
}

#[test]
fn test_spscq_discard_and_null_payload() {
    let q = conduit_spscq_create(1, CONDUIT_SPSCQ_OVERFLOW_DISCARD);

    // A NULL payload is stored like any other; can_pop tells it from "empty".
    assert!(conduit_spscq_push(q, ptr::null_mut()));
    assert!(!conduit_spscq_push(q, ptr::null_mut()));
    assert_eq!(conduit_spscq_can_pop(q), 1);
    assert!(conduit_spscq_pop(q).is_null());
    assert_eq!(conduit_spscq_can_pop(q), 0);

    conduit_spscq_destroy(q);
}

static RING_OVERFLOWS: AtomicUsize = AtomicUsize::new(0);
static RING_UNDERFLOWS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn on_ring_error(_ring: *mut RingBufferHandle, code: c_int, user: *mut c_void) {
    assert_eq!(user as usize, 0xabc);
    match code {
        CONDUIT_ERROR_OVERFLOW => RING_OVERFLOWS.fetch_add(1, Ordering::SeqCst),
        CONDUIT_ERROR_UNDERFLOW => RING_UNDERFLOWS.fetch_add(1, Ordering::SeqCst),
        other => panic!("unexpected error code {other}"),
    };
}

#[test]
fn test_ring_buffer_transfers() {
    let rb = conduit_ring_buffer_create(8);
    conduit_ring_buffer_set_error_callback(rb, Some(on_ring_error), 0xabc as *mut c_void);

    let data = *b"ABCDEFGHIJ";
    assert_eq!(conduit_ring_buffer_write(rb, 6, data.as_ptr()), 6);
    assert_eq!(conduit_ring_buffer_write_atomic(rb, 3, data.as_ptr().wrapping_add(6)), 0);
    assert_eq!(conduit_ring_buffer_write(rb, 3, data.as_ptr().wrapping_add(6)), 2);
    assert_eq!(conduit_ring_buffer_can_write(rb), 0);
    assert_eq!(conduit_ring_buffer_can_read(rb), 8);

    let mut out = [0u8; 8];
    assert_eq!(conduit_ring_buffer_read_atomic(rb, 4, out.as_mut_ptr()), 4);
    assert_eq!(&out[..4], b"ABCD");
    assert_eq!(conduit_ring_buffer_read(rb, 8, out.as_mut_ptr()), 4);
    assert_eq!(&out[..4], b"EFGH");
    assert_eq!(conduit_ring_buffer_read_atomic(rb, 1, out.as_mut_ptr()), 0);

    // Zero-length transfers accept NULL and report nothing.
    assert_eq!(conduit_ring_buffer_write(rb, 0, ptr::null()), 0);
    assert_eq!(conduit_ring_buffer_read(rb, 0, ptr::null_mut()), 0);

    assert_eq!(RING_OVERFLOWS.load(Ordering::SeqCst), 2);
    assert_eq!(RING_UNDERFLOWS.load(Ordering::SeqCst), 2);

    conduit_ring_buffer_set_error_callback(rb, None, ptr::null_mut());
    assert_eq!(conduit_ring_buffer_read(rb, 1, out.as_mut_ptr()), 0);
    assert_eq!(RING_UNDERFLOWS.load(Ordering::SeqCst), 2);

    conduit_ring_buffer_destroy(rb);
}

extern "C" fn compare_u64(a: *const c_void, b: *const c_void) -> c_int {
    let (a, b) = unsafe { (*(a as *const u64), *(b as *const u64)) };
    match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

#[test]
fn test_prioq_orders_payloads() {
    let mut values = [5u64, 3, 8, 1, 9];
    let q = conduit_prioq_create(Some(compare_u64));
    conduit_prioq_preallocate(q, 8);

    for v in values.iter_mut() {
        conduit_prioq_push(q, as_payload(v));
    }
    assert_eq!(read_payload(conduit_prioq_peek(q)), 1);

    let popped: Vec<u64> = (0..5).map(|_| read_payload(conduit_prioq_pop(q))).collect();
    assert_eq!(popped, vec![1, 3, 5, 8, 9]);
    assert!(conduit_prioq_pop(q).is_null());
    assert!(conduit_prioq_peek(q).is_null());

    conduit_prioq_destroy(q);
}

#[test]
fn test_null_handle_is_fatal() {
    if common::in_fatal_child() {
        conduit_mpmcq_push(ptr::null_mut(), ptr::null_mut());
        return;
    }
    let output = common::run_fatal_child("test_null_handle_is_fatal");
    common::assert_fatal(&output, "conduit_mpmcq_push() called with a NULL handle");
}

#[test]
fn test_unknown_policy_is_fatal() {
    if common::in_fatal_child() {
        conduit_spscq_create(4, 99);
        return;
    }
    let output = common::run_fatal_child("test_unknown_policy_is_fatal");
    common::assert_fatal(&output, "Unknown SPSC overflow policy 99");
}

#[test]
fn test_ring_callback_set_while_halves_in_use() {
    let rb = conduit_ring_buffer_create(16);
    let handle = rb as usize;

    let writer = std::thread::spawn(move || {
        let rb = handle as *mut RingBufferHandle;
        let bytes = [7u8; 16];
        for _ in 0..20_000 {
            conduit_ring_buffer_write(rb, 16, bytes.as_ptr());
        }
    });
    let reader = std::thread::spawn(move || {
        let rb = handle as *mut RingBufferHandle;
        let mut out = [0u8; 16];
        for _ in 0..20_000 {
            conduit_ring_buffer_read(rb, 16, out.as_mut_ptr());
        }
    });

    for i in 0..1000 {
        let callback = if i % 2 == 0 { Some(count_ring_error as RingBufferCallback) } else { None };
        conduit_ring_buffer_set_error_callback(rb, callback, ptr::null_mut());
    }

    writer.join().unwrap();
    reader.join().unwrap();
    conduit_ring_buffer_destroy(rb);
}

static CONCURRENT_RING_ERRORS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn count_ring_error(_ring: *mut RingBufferHandle, _code: c_int, _user: *mut c_void) {
    CONCURRENT_RING_ERRORS.fetch_add(1, Ordering::Relaxed);
}
