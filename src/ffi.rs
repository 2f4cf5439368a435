//! C ABI over the four structures.
//!
//! Payloads are opaque `void*` values: the structures move the pointers,
//! never what they point to. Every function treats a NULL handle as a fatal
//! error. Thread roles are the caller's responsibility: one producer and one
//! consumer thread per SPSC queue or ring buffer, one thread per priority queue.

use crate::error::ErrorKind;
use crate::MPMC::MpmcQueue;
use crate::PrioQ::PriorityQueue;
use crate::Ring::{self, RingCallback, RingReader, RingShared, RingWriter};
use crate::SPSC::{self, Consumer, OverflowPolicy, Producer};
use std::cmp::Ordering;
use std::ffi::{c_int, c_uint, c_void};
use std::ptr;
use std::sync::Arc;

// Error codes passed to error callbacks
pub const CONDUIT_ERROR_OVERFLOW: c_int = 1;
pub const CONDUIT_ERROR_UNDERFLOW: c_int = 2;

// Overflow policies for conduit_spscq_create
pub const CONDUIT_SPSCQ_OVERFLOW_DISCARD: c_int = 0;
pub const CONDUIT_SPSCQ_OVERFLOW_BLOCK: c_int = 1;
pub const CONDUIT_SPSCQ_OVERFLOW_GROW: c_int = 2;
pub const CONDUIT_SPSCQ_OVERFLOW_ERROR: c_int = 3;
pub const CONDUIT_SPSCQ_OVERFLOW_FATAL: c_int = 4;

/// A caller-owned pointer carried through a queue.
#[repr(transparent)]
#[derive(Clone, Copy)]
struct Payload(*mut c_void);

// The queues only move the address; the pointee is the caller's business.
unsafe impl Send for Payload {}

/// A raw pointer captured by an error callback closure.
#[derive(Clone, Copy)]
struct CallbackPtr(*mut c_void);

unsafe impl Send for CallbackPtr {}
unsafe impl Sync for CallbackPtr {}

impl CallbackPtr {
    fn get(self) -> *mut c_void {
        self.0
    }
}

fn error_code(kind: ErrorKind) -> c_int {
    match kind {
        ErrorKind::Overflow => CONDUIT_ERROR_OVERFLOW,
        ErrorKind::Underflow => CONDUIT_ERROR_UNDERFLOW,
    }
}

fn policy_from_code(code: c_int) -> OverflowPolicy {
    match code {
        CONDUIT_SPSCQ_OVERFLOW_DISCARD => OverflowPolicy::Discard,
        CONDUIT_SPSCQ_OVERFLOW_BLOCK => OverflowPolicy::Block,
        CONDUIT_SPSCQ_OVERFLOW_GROW => OverflowPolicy::Grow,
        CONDUIT_SPSCQ_OVERFLOW_ERROR => OverflowPolicy::Error,
        CONDUIT_SPSCQ_OVERFLOW_FATAL => OverflowPolicy::Fatal,
        other => crate::fatal!("Unknown SPSC overflow policy {other}"),
    }
}

#[inline]
fn check_handle<H>(handle: *mut H, function: &str) {
    if handle.is_null() {
        crate::fatal!("{function}() called with a NULL handle");
    }
}

#[inline]
fn payload_ptr(payload: Option<Payload>) -> *mut c_void {
    payload.map_or(ptr::null_mut(), |p| p.0)
}

// -----------------------------------------------------------------------------
// MPMC queue
// -----------------------------------------------------------------------------

/// Handle to an MPMC queue (opaque pointer)
pub struct MpmcqHandle {
    inner: MpmcQueue<Payload>,
}

/// Create an MPMC queue. `capacity` must be a power of two and at least 2.
#[no_mangle]
pub extern "C" fn conduit_mpmcq_create(capacity: usize) -> *mut MpmcqHandle {
    let handle = Box::new(MpmcqHandle {
        inner: MpmcQueue::new(capacity),
    });
    Box::into_raw(handle)
}

#[no_mangle]
pub extern "C" fn conduit_mpmcq_destroy(handle: *mut MpmcqHandle) {
    check_handle(handle, "conduit_mpmcq_destroy");
    unsafe {
        drop(Box::from_raw(handle));
    }
}

/// Returns false if the queue is full.
#[no_mangle]
pub extern "C" fn conduit_mpmcq_push(handle: *mut MpmcqHandle, value: *mut c_void) -> bool {
    check_handle(handle, "conduit_mpmcq_push");
    let queue = unsafe { &(*handle).inner };
    queue.push(Payload(value)).is_ok()
}

/// Returns NULL if the queue is empty.
#[no_mangle]
pub extern "C" fn conduit_mpmcq_pop(handle: *mut MpmcqHandle) -> *mut c_void {
    check_handle(handle, "conduit_mpmcq_pop");
    let queue = unsafe { &(*handle).inner };
    payload_ptr(queue.pop())
}

// -----------------------------------------------------------------------------
// SPSC queue
// -----------------------------------------------------------------------------

/// Handle to an SPSC queue (opaque pointer)
pub struct SpscqHandle {
    producer: Producer<Payload>,
    consumer: Consumer<Payload>,
}

/// Called with (queue, error code, rejected value, user data).
///
/// Runs on the producer thread inside `conduit_spscq_push`. It must not call
/// back into the same queue: no push, and no `conduit_spscq_set_error_callback`,
/// which would free the callback while it is running.
pub type SpscqCallback = extern "C" fn(*mut SpscqHandle, c_int, *mut c_void, *mut c_void);

// The producer and consumer threads share the handle; each only ever
// borrows its own half.
#[inline]
fn spscq_producer<'a>(handle: *mut SpscqHandle) -> &'a mut Producer<Payload> {
    unsafe { &mut *ptr::addr_of_mut!((*handle).producer) }
}

#[inline]
fn spscq_consumer<'a>(handle: *mut SpscqHandle) -> &'a mut Consumer<Payload> {
    unsafe { &mut *ptr::addr_of_mut!((*handle).consumer) }
}

/// Create an SPSC queue. `on_overflow` is one of the `CONDUIT_SPSCQ_OVERFLOW_*` codes;
/// GROW is not supported and aborts.
#[no_mangle]
pub extern "C" fn conduit_spscq_create(capacity: usize, on_overflow: c_int) -> *mut SpscqHandle {
    let (producer, consumer) = SPSC::queue(capacity, policy_from_code(on_overflow));
    Box::into_raw(Box::new(SpscqHandle { producer, consumer }))
}

#[no_mangle]
pub extern "C" fn conduit_spscq_destroy(handle: *mut SpscqHandle) {
    check_handle(handle, "conduit_spscq_destroy");
    unsafe {
        drop(Box::from_raw(handle));
    }
}

/// Install (or with NULL, remove) the overflow callback. Call from the producer thread.
#[no_mangle]
pub extern "C" fn conduit_spscq_set_error_callback(
    handle: *mut SpscqHandle,
    callback: Option<SpscqCallback>,
    data: *mut c_void,
) {
    check_handle(handle, "conduit_spscq_set_error_callback");
    let producer = spscq_producer(handle);
    match callback {
        Some(callback) => {
            let queue = CallbackPtr(handle.cast());
            let data = CallbackPtr(data);
            producer.set_error_callback(move |kind, value: Payload| {
                callback(queue.get().cast(), error_code(kind), value.0, data.get())
            });
        }
        None => producer.clear_error_callback(),
    }
}

#[no_mangle]
pub extern "C" fn conduit_spscq_can_push(handle: *mut SpscqHandle) -> usize {
    check_handle(handle, "conduit_spscq_can_push");
    spscq_producer(handle).can_push()
}

#[no_mangle]
pub extern "C" fn conduit_spscq_can_pop(handle: *mut SpscqHandle) -> usize {
    check_handle(handle, "conduit_spscq_can_pop");
    spscq_consumer(handle).can_pop()
}

#[no_mangle]
pub extern "C" fn conduit_spscq_push(handle: *mut SpscqHandle, value: *mut c_void) -> bool {
    check_handle(handle, "conduit_spscq_push");
    spscq_producer(handle).push(Payload(value))
}

/// Returns NULL if the queue is empty. A pushed NULL also comes back as NULL:
/// callers that push NULL must check `conduit_spscq_can_pop` first.
#[no_mangle]
pub extern "C" fn conduit_spscq_pop(handle: *mut SpscqHandle) -> *mut c_void {
    check_handle(handle, "conduit_spscq_pop");
    payload_ptr(spscq_consumer(handle).pop())
}

/// Like `conduit_spscq_pop`, without removing the value. Same NULL caveat.
#[no_mangle]
pub extern "C" fn conduit_spscq_peek(handle: *mut SpscqHandle) -> *mut c_void {
    check_handle(handle, "conduit_spscq_peek");
    payload_ptr(spscq_consumer(handle).peek().copied())
}

// -----------------------------------------------------------------------------
// Ring buffer
// -----------------------------------------------------------------------------

/// Handle to a byte ring buffer (opaque pointer)
pub struct RingBufferHandle {
    writer: RingWriter,
    reader: RingReader,
    // Reached by set_error_callback without borrowing either half, which
    // the writer and reader threads hold mutably.
    shared: Arc<RingShared>,
}

/// Called with (ring buffer, error code, user data).
pub type RingBufferCallback = extern "C" fn(*mut RingBufferHandle, c_int, *mut c_void);

#[inline]
fn ring_writer<'a>(handle: *mut RingBufferHandle) -> &'a mut RingWriter {
    unsafe { &mut *ptr::addr_of_mut!((*handle).writer) }
}

#[inline]
fn ring_reader<'a>(handle: *mut RingBufferHandle) -> &'a mut RingReader {
    unsafe { &mut *ptr::addr_of_mut!((*handle).reader) }
}

#[no_mangle]
pub extern "C" fn conduit_ring_buffer_create(capacity: usize) -> *mut RingBufferHandle {
    let (writer, reader) = Ring::ring_buffer(capacity);
    let shared = Arc::clone(&writer.shared);
    Box::into_raw(Box::new(RingBufferHandle {
        writer,
        reader,
        shared,
    }))
}

#[no_mangle]
pub extern "C" fn conduit_ring_buffer_destroy(handle: *mut RingBufferHandle) {
    check_handle(handle, "conduit_ring_buffer_destroy");
    unsafe {
        drop(Box::from_raw(handle));
    }
}

/// Install (or with NULL, remove) the overflow/underflow callback.
///
/// Safe to call from any thread while the writer and reader are running.
#[no_mangle]
pub extern "C" fn conduit_ring_buffer_set_error_callback(
    handle: *mut RingBufferHandle,
    callback: Option<RingBufferCallback>,
    data: *mut c_void,
) {
    check_handle(handle, "conduit_ring_buffer_set_error_callback");
    let shared = unsafe { &*ptr::addr_of!((*handle).shared) };
    match callback {
        Some(callback) => {
            let ring = CallbackPtr(handle.cast());
            let data = CallbackPtr(data);
            let notify: RingCallback = Arc::new(move |kind: ErrorKind| {
                callback(ring.get().cast(), error_code(kind), data.get())
            });
            shared.set_error_callback(Some(notify));
        }
        None => shared.set_error_callback(None),
    }
}

#[no_mangle]
pub extern "C" fn conduit_ring_buffer_can_read(handle: *mut RingBufferHandle) -> usize {
    check_handle(handle, "conduit_ring_buffer_can_read");
    ring_reader(handle).can_read()
}

#[no_mangle]
pub extern "C" fn conduit_ring_buffer_can_write(handle: *mut RingBufferHandle) -> usize {
    check_handle(handle, "conduit_ring_buffer_can_write");
    ring_writer(handle).can_write()
}

/// Build a byte slice over a caller buffer, tolerating NULL for zero-length transfers.
///
/// # Safety
/// `data` must point to at least `bytes` readable bytes when `bytes > 0`.
unsafe fn input_bytes<'a>(data: *const u8, bytes: usize, function: &str) -> &'a [u8] {
    if bytes == 0 {
        return &[];
    }
    if data.is_null() {
        crate::fatal!("{function}() called with a NULL data pointer");
    }
    unsafe { std::slice::from_raw_parts(data, bytes) }
}

/// # Safety
/// `data` must point to at least `bytes` writable bytes when `bytes > 0`.
unsafe fn output_bytes<'a>(data: *mut u8, bytes: usize, function: &str) -> &'a mut [u8] {
    if bytes == 0 {
        return &mut [];
    }
    if data.is_null() {
        crate::fatal!("{function}() called with a NULL data pointer");
    }
    unsafe { std::slice::from_raw_parts_mut(data, bytes) }
}

/// Write up to `bytes` bytes from `data`; returns the number written.
/// `bytes` must not exceed the ring's capacity.
#[no_mangle]
pub extern "C" fn conduit_ring_buffer_write(
    handle: *mut RingBufferHandle,
    bytes: usize,
    data: *const u8,
) -> usize {
    check_handle(handle, "conduit_ring_buffer_write");
    let src = unsafe { input_bytes(data, bytes, "conduit_ring_buffer_write") };
    ring_writer(handle).write(src)
}

/// Write exactly `bytes` bytes from `data`, or nothing; returns `bytes` or 0.
#[no_mangle]
pub extern "C" fn conduit_ring_buffer_write_atomic(
    handle: *mut RingBufferHandle,
    bytes: usize,
    data: *const u8,
) -> usize {
    check_handle(handle, "conduit_ring_buffer_write_atomic");
    let src = unsafe { input_bytes(data, bytes, "conduit_ring_buffer_write_atomic") };
    ring_writer(handle).write_atomic(src)
}

/// Read up to `bytes` bytes into `data`; returns the number read.
#[no_mangle]
pub extern "C" fn conduit_ring_buffer_read(
    handle: *mut RingBufferHandle,
    bytes: usize,
    data: *mut u8,
) -> usize {
    check_handle(handle, "conduit_ring_buffer_read");
    let dst = unsafe { output_bytes(data, bytes, "conduit_ring_buffer_read") };
    ring_reader(handle).read(dst)
}

/// Read exactly `bytes` bytes into `data`, or nothing; returns `bytes` or 0.
#[no_mangle]
pub extern "C" fn conduit_ring_buffer_read_atomic(
    handle: *mut RingBufferHandle,
    bytes: usize,
    data: *mut u8,
) -> usize {
    check_handle(handle, "conduit_ring_buffer_read_atomic");
    let dst = unsafe { output_bytes(data, bytes, "conduit_ring_buffer_read_atomic") };
    ring_reader(handle).read_atomic(dst)
}

// -----------------------------------------------------------------------------
// Priority queue
// -----------------------------------------------------------------------------

/// Returns a negative value if the first argument goes before the second.
pub type PrioqCmpFn = extern "C" fn(*const c_void, *const c_void) -> c_int;

type PayloadOrder = Box<dyn FnMut(&Payload, &Payload) -> Ordering + Send>;

/// Handle to a priority queue (opaque pointer)
pub struct PrioqHandle {
    inner: PriorityQueue<Payload, PayloadOrder>,
}

#[inline]
fn prioq<'a>(handle: *mut PrioqHandle) -> &'a mut PriorityQueue<Payload, PayloadOrder> {
    unsafe { &mut (*handle).inner }
}

#[no_mangle]
pub extern "C" fn conduit_prioq_create(cmp: Option<PrioqCmpFn>) -> *mut PrioqHandle {
    let Some(cmp) = cmp else {
        crate::fatal!("conduit_prioq_create() called with a NULL compare function");
    };
    let order: PayloadOrder = Box::new(move |a, b| cmp(a.0, b.0).cmp(&0));
    Box::into_raw(Box::new(PrioqHandle {
        inner: PriorityQueue::new(order),
    }))
}

#[no_mangle]
pub extern "C" fn conduit_prioq_destroy(handle: *mut PrioqHandle) {
    check_handle(handle, "conduit_prioq_destroy");
    unsafe {
        drop(Box::from_raw(handle));
    }
}

#[no_mangle]
pub extern "C" fn conduit_prioq_preallocate(handle: *mut PrioqHandle, count: c_uint) {
    check_handle(handle, "conduit_prioq_preallocate");
    prioq(handle).preallocate(count as usize);
}

#[no_mangle]
pub extern "C" fn conduit_prioq_push(handle: *mut PrioqHandle, value: *mut c_void) {
    check_handle(handle, "conduit_prioq_push");
    prioq(handle).push(Payload(value));
}

/// Returns NULL if the queue is empty.
#[no_mangle]
pub extern "C" fn conduit_prioq_pop(handle: *mut PrioqHandle) -> *mut c_void {
    check_handle(handle, "conduit_prioq_pop");
    payload_ptr(prioq(handle).pop())
}

#[no_mangle]
pub extern "C" fn conduit_prioq_peek(handle: *mut PrioqHandle) -> *mut c_void {
    check_handle(handle, "conduit_prioq_peek");
    payload_ptr(prioq(handle).peek().copied())
}
