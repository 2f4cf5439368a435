//! Bounded FIFO queue for exactly one producer thread and one consumer thread.
//!
//! Each half owns its own position, so no compare-and-swap is needed. The
//! only shared atomic is the item count, released after a slot is written
//! or read and acquired before either side trusts it.

mod builder;
mod consumer;
mod producer;
mod shared;

pub use builder::SpscBuilder;
pub use consumer::Consumer;
pub use producer::Producer;

use crate::error::{ErrorKind, Result};

/// What [`Producer::push`] does when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Drop the value and return `false`.
    Discard,
    /// Poll until the consumer frees a slot.
    Block,
    /// Growing the queue. Not supported: building with it fails.
    Grow,
    /// Hand the value to the error callback and return `false`.
    Error,
    /// Abort the process.
    Fatal,
}

/// Callback for [`OverflowPolicy::Error`], invoked with the rejected value.
pub type OverflowCallback<T> = Box<dyn FnMut(ErrorKind, T) + Send>;

/// Build a queue of `capacity` slots with the given overflow policy.
pub fn try_queue<T>(capacity: usize, policy: OverflowPolicy) -> Result<(Producer<T>, Consumer<T>)> {
    SpscBuilder::new()
        .with_capacity(capacity)
        .with_overflow_policy(policy)
        .build()
}

/// Build a queue of `capacity` slots with the given overflow policy.
///
/// Aborts the process if `capacity` is zero or `policy` is [`OverflowPolicy::Grow`].
pub fn queue<T>(capacity: usize, policy: OverflowPolicy) -> (Producer<T>, Consumer<T>) {
    try_queue(capacity, policy).unwrap_or_else(|e| crate::fatal!("SPSC::queue(): {e}"))
}
