//! Lock-free byte ring buffer for one writer thread and one reader thread.
//!
//! ```rust
//! use conduit::Ring::ring_buffer;
//!
//! let (mut writer, mut reader) = ring_buffer(8);
//! assert_eq!(writer.write(b"abcdef"), 6);
//!
//! let mut out = [0u8; 4];
//! assert_eq!(reader.read_atomic(&mut out), 4);
//! assert_eq!(&out, b"abcd");
//! ```

mod reader;
mod shared;
mod writer;

pub use reader::RingReader;
pub use writer::RingWriter;

use crate::error::{Error, ErrorKind, Result};
use crate::trace::trace;
pub(crate) use shared::RingShared;
use std::sync::Arc;

/// Error callback shared by both halves of a ring buffer.
pub type RingCallback = Arc<dyn Fn(ErrorKind) + Send + Sync>;

/// Create a ring buffer holding up to `capacity` bytes.
pub fn try_ring_buffer(capacity: usize) -> Result<(RingWriter, RingReader)> {
    if capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    let shared = Arc::new(RingShared::new(capacity));
    trace!(capacity, "ring buffer created");
    Ok((RingWriter::new(Arc::clone(&shared)), RingReader::new(shared)))
}

/// Create a ring buffer holding up to `capacity` bytes.
///
/// Aborts the process if `capacity` is zero.
pub fn ring_buffer(capacity: usize) -> (RingWriter, RingReader) {
    try_ring_buffer(capacity).unwrap_or_else(|e| crate::fatal!("Ring::ring_buffer(): {e}"))
}
