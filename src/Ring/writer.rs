use super::shared::RingShared;
use crate::error::ErrorKind;
use crate::trace::debug;
use std::sync::Arc;

/// The writing half of a byte ring buffer.
pub struct RingWriter {
    pub(crate) shared: Arc<RingShared>,
    pub(crate) offset: usize,
}

impl RingWriter {
    pub(crate) fn new(shared: Arc<RingShared>) -> Self {
        Self { shared, offset: 0 }
    }

    /// Install the callback invoked on overflow and underflow.
    ///
    /// Shared with the reader: it runs on whichever thread hit the condition.
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

    /// Bytes that can be written without overflowing.
    #[inline]
    pub fn can_write(&self) -> usize {
        self.shared.can_write()
    }

    /// Write as much of `src` as fits, returning the number of bytes written.
    ///
    /// Reports [`ErrorKind::Overflow`] whenever less than all of `src` fits.
    /// `src` must not be longer than the capacity.
    pub fn write(&mut self, src: &[u8]) -> usize {
        debug_assert!(
            src.len() <= self.capacity(),
            "write of {} bytes exceeds ring capacity {}",
            src.len(),
            self.capacity()
        );
        if src.is_empty() {
            return 0;
        }

        let count = src.len().min(self.can_write());
        if count < src.len() {
            debug!(requested = src.len(), written = count, "ring buffer overflow");
            self.shared.notify(ErrorKind::Overflow);
            if count == 0 {
                return 0;
            }
        }

        self.offset = unsafe { self.shared.write_at(self.offset, &src[..count]) };
        count
    }

    /// Write all of `src` or nothing.
    ///
    /// Returns `src.len()`, or 0 with [`ErrorKind::Overflow`] reported and the
    /// buffer untouched if it does not fit.
    pub fn write_atomic(&mut self, src: &[u8]) -> usize {
        debug_assert!(
            src.len() <= self.capacity(),
            "write of {} bytes exceeds ring capacity {}",
            src.len(),
            self.capacity()
        );
        if src.is_empty() {
            return 0;
        }

        if src.len() > self.can_write() {
            debug!(requested = src.len(), "ring buffer overflow, atomic write rejected");
            self.shared.notify(ErrorKind::Overflow);
            return 0;
        }

        self.offset = unsafe { self.shared.write_at(self.offset, src) };
        src.len()
    }
}
