use crossbeam_utils::Backoff;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

use super::layout::{Cell, QueueCursors};
use super::Buffer::MpmcQueue;
use crate::error::{Error, Result};
use crate::trace::trace;
use crate::Core::Slab;

impl<T> MpmcQueue<T> {
    /// Create a queue holding up to `capacity` values.
    ///
    /// Fails unless `capacity` is a power of two and at least 2.
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity < 2 || !capacity.is_power_of_two() {
            return Err(Error::CapacityNotPowerOfTwo(capacity));
        }

        // Cell k starts out free for the producer at position k.
        let buffer = Slab::from_fn(capacity, Cell::new);
        trace!(capacity, bytes = buffer.bytes(), "mpmc queue created");

        Ok(Self {
            cursors: QueueCursors::new(),
            buffer,
            mask: capacity - 1,
        })
    }

    /// Create a queue holding up to `capacity` values.
    ///
    /// Aborts the process unless `capacity` is a power of two and at least 2.
    pub fn new(capacity: usize) -> Self {
        Self::try_new(capacity).unwrap_or_else(|e| crate::fatal!("MpmcQueue::new(): {e}"))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Number of values in the queue.
    ///
    /// Only a snapshot: other threads may push or pop before the caller acts on it.
    pub fn len(&self) -> usize {
        // Read cursor first: the write cursor can only be ahead of it.
        let read = self.cursors.read_pos.load(Acquire);
        let write = self.cursors.write_pos.load(Acquire);
        write.wrapping_sub(read).min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push a value, handing it back if the queue is full.
    ///
    /// Never blocks. Retries only while other producers win the race for the
    /// same position.
    pub fn push(&self, value: T) -> std::result::Result<(), T> {
        let backoff = Backoff::new();
        let mut pos = self.cursors.write_pos.load(Relaxed);

        let cell = loop {
            let cell = &self.buffer[pos & self.mask];
            let seq = cell.sequence.load(Acquire);
            let dif = seq.wrapping_sub(pos) as isize;

            if dif == 0 {
                match self.cursors.write_pos.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Relaxed,
                    Relaxed,
                ) {
                    // We own this cell now
                    Ok(_) => break cell,
                    Err(current) => {
                        pos = current;
                        backoff.spin();
                    }
                }
            } else if dif < 0 {
                // Cell still holds the value from the previous lap: full.
                return Err(value);
            } else {
                // Another producer already took this position.
                pos = self.cursors.write_pos.load(Relaxed);
            }
        };

        unsafe {
            (*cell.value.get()).write(value);
        }
        // Publish
        cell.sequence.store(pos.wrapping_add(1), Release);
        Ok(())
    }

    /// Pop the oldest value, or `None` if nothing is ready.
    pub fn pop(&self) -> Option<T> {
        let backoff = Backoff::new();
        let mut pos = self.cursors.read_pos.load(Relaxed);

        let cell = loop {
            let cell = &self.buffer[pos & self.mask];
            let seq = cell.sequence.load(Acquire);
            let dif = seq.wrapping_sub(pos.wrapping_add(1)) as isize;

            if dif == 0 {
                match self.cursors.read_pos.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Relaxed,
                    Relaxed,
                ) {
                    Ok(_) => break cell,
                    Err(current) => {
                        pos = current;
                        backoff.spin();
                    }
                }
            } else if dif < 0 {
                // empty
                return None;
            } else {
                pos = self.cursors.read_pos.load(Relaxed);
            }
        };

        let value = unsafe { (*cell.value.get()).assume_init_read() };
        // free cell for the producer of the next lap
        cell.sequence.store(pos.wrapping_add(self.mask + 1), Release);
        Some(value)
    }
}

impl<T> Drop for MpmcQueue<T> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}
