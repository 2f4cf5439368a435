use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Core::Slab;

/// State shared by the two halves of an SPSC queue.
///
/// Positions are not here: each half owns its own index. Only the item
/// count crosses threads.
pub(crate) struct Shared<T> {
    /// Number of items in the queue, always `<= capacity`.
    count: CachePadded<AtomicUsize>,

    slots: Slab<UnsafeCell<MaybeUninit<T>>>,

    /// Read position left behind by a dropped consumer. Only used to drop
    /// the remaining items when the last half goes away.
    consumer_pos: AtomicUsize,
}

// Each slot is touched by exactly one side at a time; `count` orders the hand-off.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

impl<T> Shared<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            count: CachePadded::new(AtomicUsize::new(0)),
            slots: Slab::from_fn(capacity, |_| UnsafeCell::new(MaybeUninit::uninit())),
            consumer_pos: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }

    #[inline]
    pub(crate) fn next(&self, pos: usize) -> usize {
        (pos + 1) % self.capacity()
    }

    /// Write `value` into slot `pos` and make it visible to the consumer.
    ///
    /// # Safety
    /// Caller must be the producer and must have observed a free slot.
    pub(crate) unsafe fn publish(&self, pos: usize, value: T) {
        unsafe {
            (*self.slots[pos].get()).write(value);
        }
        self.count.fetch_add(1, Ordering::Release);
    }

    /// Move the value out of slot `pos` and hand the slot back to the producer.
    ///
    /// # Safety
    /// Caller must be the consumer and must have observed `len() > 0`.
    pub(crate) unsafe fn take(&self, pos: usize) -> T {
        let value = unsafe { (*self.slots[pos].get()).assume_init_read() };
        self.count.fetch_sub(1, Ordering::Release);
        value
    }

    /// # Safety
    /// Caller must be the consumer and must have observed `len() > 0`.
    pub(crate) unsafe fn peek(&self, pos: usize) -> &T {
        unsafe { (*self.slots[pos].get()).assume_init_ref() }
    }

    pub(crate) fn park_consumer(&self, pos: usize) {
        self.consumer_pos.store(pos, Ordering::Relaxed);
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let mut pos = *self.consumer_pos.get_mut();
        for _ in 0..*self.count.get_mut() {
            unsafe {
                (*self.slots[pos].get()).assume_init_drop();
            }
            pos = (pos + 1) % self.slots.len();
        }
    }
}
