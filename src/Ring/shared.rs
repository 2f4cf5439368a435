use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::cell::UnsafeCell;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::RingCallback;
use crate::error::ErrorKind;
use crate::Core::Slab;

/// Backing store and shared counters of a byte ring buffer.
pub(crate) struct RingShared {
    /// Number of bytes available for reading, always `<= capacity`.
    count: CachePadded<AtomicUsize>,

    data: Slab<UnsafeCell<u8>>,

    /// Shared by both halves; taken only on the error path.
    error_callback: Mutex<Option<RingCallback>>,
}

// The writer only touches free bytes and the reader only readable ones;
// `count` orders the hand-off between them.
unsafe impl Send for RingShared {}
unsafe impl Sync for RingShared {}

impl RingShared {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            count: CachePadded::new(AtomicUsize::new(0)),
            data: Slab::from_fn(capacity, |_| UnsafeCell::new(0)),
            error_callback: Mutex::new(None),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn can_read(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn can_write(&self) -> usize {
        self.capacity() - self.can_read()
    }

    pub(crate) fn set_error_callback(&self, callback: Option<RingCallback>) {
        *self.error_callback.lock() = callback;
    }

    /// Run the error callback, if any, on the calling thread.
    pub(crate) fn notify(&self, kind: ErrorKind) {
        let callback = self.error_callback.lock().clone();
        if let Some(callback) = callback {
            callback(kind);
        }
    }

    #[inline]
    fn base(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.data.as_ptr())
    }

    /// Copy `src` into the ring starting at `offset`, then publish it to the reader.
    ///
    /// Returns the offset following the written bytes.
    ///
    /// # Safety
    /// Caller must be the writer, `offset < capacity` and `src.len() <= can_write()`.
    pub(crate) unsafe fn write_at(&self, offset: usize, src: &[u8]) -> usize {
        let capacity = self.capacity();
        let count = src.len();

        unsafe {
            let base = self.base();
            if count <= capacity - offset {
                // Single contiguous copy
                ptr::copy_nonoverlapping(src.as_ptr(), base.add(offset), count);
            } else {
                // Wrap-around: up to the end, then from the start
                let first_part = capacity - offset;
                ptr::copy_nonoverlapping(src.as_ptr(), base.add(offset), first_part);
                ptr::copy_nonoverlapping(src.as_ptr().add(first_part), base, count - first_part);
            }
        }

        self.count.fetch_add(count, Ordering::Release);
        (offset + count) % capacity
    }

    /// Copy `dst.len()` bytes out of the ring starting at `offset`, then release them
    /// to the writer.
    ///
    /// Returns the offset following the read bytes.
    ///
    /// # Safety
    /// Caller must be the reader, `offset < capacity` and `dst.len() <= can_read()`.
    pub(crate) unsafe fn read_at(&self, offset: usize, dst: &mut [u8]) -> usize {
        let capacity = self.capacity();
        let count = dst.len();

        unsafe {
            let base = self.base();
            if count <= capacity - offset {
                ptr::copy_nonoverlapping(base.add(offset), dst.as_mut_ptr(), count);
            } else {
                let first_part = capacity - offset;
                ptr::copy_nonoverlapping(base.add(offset), dst.as_mut_ptr(), first_part);
                ptr::copy_nonoverlapping(
                    base,
                    dst.as_mut_ptr().add(first_part),
                    count - first_part,
                );
            }
        }

        self.count.fetch_sub(count, Ordering::Release);
        (offset + count) % capacity
    }
}
