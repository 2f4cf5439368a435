use super::shared::RingShared;
use crate::error::ErrorKind;
use crate::trace::debug;
use std::sync::Arc;

/// The reading half of a byte ring buffer.
pub struct RingReader {
    pub(crate) shared: Arc<RingShared>,
    pub(crate) offset: usize,
}

impl RingReader {
    pub(crate) fn new(shared: Arc<RingShared>) -> Self {
        Self { shared, offset: 0 }
    }

    /// Install the callback invoked on overflow and underflow.
    ///
    /// Shared with the writer: it runs on whichever thread hit the condition.
    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: Fn(ErrorKind) + Send + Sync + 'static,
    {
        self.shared.set_error_callback(Some(Arc::new(callback)));
    }

    pub fn clear_error_callback(&self) {
        self.shared.set_error_callback(None);
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }

    /// Bytes available for reading.
    #[inline]
    pub fn can_read(&self) -> usize {
        self.shared.can_read()
    }

    /// Fill as much of `dst` as there is data for, returning the number of bytes read.
    ///
    /// Reports [`ErrorKind::Underflow`] whenever `dst` cannot be filled completely.
    /// `dst` must not be longer than the capacity.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        debug_assert!(
            dst.len() <= self.capacity(),
            "read of {} bytes exceeds ring capacity {}",
            dst.len(),
            self.capacity()
        );
        if dst.is_empty() {
            return 0;
        }

        let count = dst.len().min(self.can_read());
        if count < dst.len() {
            debug!(requested = dst.len(), read = count, "ring buffer underflow");
            self.shared.notify(ErrorKind::Underflow);
            if count == 0 {
                return 0;
            }
        }

        self.offset = unsafe { self.shared.read_at(self.offset, &mut dst[..count]) };
        count
    }

    /// Fill all of `dst` or nothing.
    ///
    /// Returns `dst.len()`, or 0 with [`ErrorKind::Underflow`] reported and both
    /// `dst` and the buffer untouched if not enough bytes are readable.
    pub fn read_atomic(&mut self, dst: &mut [u8]) -> usize {
        debug_assert!(
            dst.len() <= self.capacity(),
            "read of {} bytes exceeds ring capacity {}",
            dst.len(),
            self.capacity()
        );
        if dst.is_empty() {
            return 0;
        }

        if dst.len() > self.can_read() {
            debug!(requested = dst.len(), "ring buffer underflow, atomic read rejected");
            self.shared.notify(ErrorKind::Underflow);
            return 0;
        }

        self.offset = unsafe { self.shared.read_at(self.offset, dst) };
        dst.len()
    }
}
