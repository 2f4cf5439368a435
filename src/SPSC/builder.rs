use super::shared::Shared;
use super::{Consumer, OverflowCallback, OverflowPolicy, Producer};
use crate::error::{Error, ErrorKind, Result};
use crate::trace::trace;
use crate::Core::thread::DEFAULT_POLL_INTERVAL;
use std::sync::Arc;
use std::time::Duration;

/// Configures and builds an SPSC queue.
///
/// ```rust
/// use conduit::SPSC::{OverflowPolicy, SpscBuilder};
/// use std::time::Duration;
///
/// let (mut tx, mut rx) = SpscBuilder::new()
///     .with_capacity(4)
///     .with_overflow_policy(OverflowPolicy::Block)
///     .with_poll_interval(Duration::from_micros(200))
///     .build()
///     .unwrap();
/// assert!(tx.push("job"));
/// assert_eq!(rx.pop(), Some("job"));
/// ```
pub struct SpscBuilder<T> {
    capacity: usize,
    policy: OverflowPolicy,
    poll_interval: Duration,
    error_callback: Option<OverflowCallback<T>>,
}

impl<T> Default for SpscBuilder<T> {
    fn default() -> Self {
        Self {
            capacity: 1024,
            policy: OverflowPolicy::Discard,
            poll_interval: DEFAULT_POLL_INTERVAL,
            error_callback: None,
        }
    }
}

impl<T> SpscBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sleep between polls while a `Block` push waits for space.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_error_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(ErrorKind, T) + Send + 'static,
    {
        self.error_callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<(Producer<T>, Consumer<T>)> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if self.policy == OverflowPolicy::Grow {
            return Err(Error::UnsupportedPolicy(self.policy));
        }

        let shared = Arc::new(Shared::new(self.capacity));
        trace!(capacity = self.capacity, policy = ?self.policy, "spsc queue created");

        let producer = Producer::new(
            Arc::clone(&shared),
            self.policy,
            self.poll_interval,
            self.error_callback,
        );
        Ok((producer, Consumer::new(shared)))
    }
}
