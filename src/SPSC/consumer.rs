// src/SPSC/consumer.rs

use super::shared::Shared;
use std::sync::Arc;

/// The reading half of an SPSC queue.
pub struct Consumer<T> {
    pub(crate) shared: Arc<Shared<T>>,
    pub(crate) read_pos: usize,
}

impl<T> Consumer<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared, read_pos: 0 }
    }

    /// Number of values ready to pop.
    #[inline]
    pub fn can_pop(&self) -> usize {
        self.shared.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }

    /// Remove and return the oldest value, or `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.can_pop() == 0 {
            return None;
        }
        let value = unsafe { self.shared.take(self.read_pos) };
        self.read_pos = self.shared.next(self.read_pos);
        Some(value)
    }

    /// Look at the oldest value without removing it.
    pub fn peek(&self) -> Option<&T> {
        if self.can_pop() == 0 {
            return None;
        }
        // The producer never writes a full slot, so the reference stays valid
        // until this consumer pops.
        Some(unsafe { self.shared.peek(self.read_pos) })
    }
}

impl<T> Drop for Consumer<T> {
    fn drop(&mut self) {
        self.shared.park_consumer(self.read_pos);
    }
}
