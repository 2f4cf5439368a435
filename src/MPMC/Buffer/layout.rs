use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicUsize;

/// The producer and consumer cursors of an [`MpmcQueue`](super::MpmcQueue).
///
/// Producers hammer `write_pos`, consumers hammer `read_pos`. Each cursor sits
/// on its own cache line so the two sides never invalidate each other's line.
#[repr(C)]
pub struct QueueCursors {
    /// The "tail" cursor for producers. Advanced by CAS to claim a cell for writing.
    pub write_pos: CachePadded<AtomicUsize>,

    /// The "head" cursor for consumers. Advanced by CAS to claim a cell for reading.
    pub read_pos: CachePadded<AtomicUsize>,
}

impl QueueCursors {
    pub fn new() -> Self {
        Self {
            write_pos: CachePadded::new(AtomicUsize::new(0)),
            read_pos: CachePadded::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for QueueCursors {
    fn default() -> Self {
        Self::new()
    }
}

/// A single cell of the queue.
///
/// Aligned to a cache line so that neighbouring cells' sequence words are
/// never written through the same line.
#[repr(C, align(64))]
pub struct Cell<T> {
    /// The sequence number of the cell. This is the core of the synchronization.
    /// - `sequence == pos`: empty, ready for the producer that claimed `pos`.
    /// - `sequence == pos + 1`: full, ready for the consumer that claims `pos`.
    /// - After reading, the consumer stores `pos + capacity`, handing the cell
    ///   to the producer of the next lap.
    pub sequence: AtomicUsize,

    pub(crate) value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Cell<T> {
    pub(crate) fn new(sequence: usize) -> Self {
        Self {
            sequence: AtomicUsize::new(sequence),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}
