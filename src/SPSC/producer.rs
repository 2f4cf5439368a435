// src/SPSC/producer.rs

use super::shared::Shared;
use super::{OverflowCallback, OverflowPolicy};
use crate::error::ErrorKind;
use crate::trace::debug;
use crate::Core::thread;
use std::sync::Arc;
use std::time::Duration;

/// The writing half of an SPSC queue.
///
/// Exactly one thread pushes at a time: the handle is `Send` but every
/// operation takes `&mut self`.
pub struct Producer<T> {
    pub(crate) shared: Arc<Shared<T>>,
    pub(crate) write_pos: usize,
    pub(crate) policy: OverflowPolicy,
    pub(crate) poll_interval: Duration,
    pub(crate) overflows: usize,
    pub(crate) error_callback: Option<OverflowCallback<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(
        shared: Arc<Shared<T>>,
        policy: OverflowPolicy,
        poll_interval: Duration,
        error_callback: Option<OverflowCallback<T>>,
    ) -> Self {
        Self {
            shared,
            write_pos: 0,
            policy,
            poll_interval,
            overflows: 0,
            error_callback,
        }
    }

    /// Install the callback used by [`OverflowPolicy::Error`].
    ///
    /// It runs on the producer thread and receives the rejected value.
    pub fn set_error_callback<F>(&mut self, callback: F)
    where
        F: FnMut(ErrorKind, T) + Send + 'static,
    {
        self.error_callback = Some(Box::new(callback));
    }

    pub fn clear_error_callback(&mut self) {
        self.error_callback = None;
    }

    /// Number of values that can be pushed without overflowing.
    #[inline]
    pub fn can_push(&self) -> usize {
        self.shared.free_slots()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Number of pushes that found the queue full, whatever the policy did next.
    pub fn overflows(&self) -> usize {
        self.overflows
    }

    /// Push a value.
    ///
    /// On a full queue the overflow policy decides:
    /// - `Discard`: the value is dropped and `false` returned.
    /// - `Block`: polls until the consumer frees a slot, then writes it.
    /// - `Error`: the value goes to the error callback and `false` is returned.
    ///   Without a callback this is a contract violation and aborts.
    /// - `Fatal`: aborts.
    pub fn push(&mut self, value: T) -> bool {
        if self.can_push() == 0 {
            self.overflows += 1;
            debug!(
                capacity = self.capacity(),
                policy = ?self.policy,
                overflows = self.overflows,
                "spsc queue overflow"
            );

            match self.policy {
                OverflowPolicy::Discard => return false,
                OverflowPolicy::Block => {
                    let shared = &self.shared;
                    thread::poll_until(self.poll_interval, || shared.free_slots() > 0);
                }
                OverflowPolicy::Error => {
                    match self.error_callback.as_mut() {
                        Some(callback) => callback(ErrorKind::Overflow, value),
                        None => crate::fatal!(
                            "SPSC queue overflow with OverflowPolicy::Error but no error callback set"
                        ),
                    }
                    return false;
                }
                OverflowPolicy::Fatal => {
                    crate::fatal!("SPSC queue overflow (capacity {})", self.capacity())
                }
                // Rejected when the queue is built.
                OverflowPolicy::Grow => {
                    crate::fatal!("SPSC queue overflow: OverflowPolicy::Grow is not supported")
                }
            }
        }

        unsafe {
            self.shared.publish(self.write_pos, value);
        }
        self.write_pos = self.shared.next(self.write_pos);
        true
    }
}
