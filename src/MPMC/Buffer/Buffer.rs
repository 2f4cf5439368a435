use super::layout::{Cell, QueueCursors};
use crate::Core::Slab;

/// A bounded, lock-free, multi-producer, multi-consumer FIFO queue.
///
/// ### Concurrency Design:
/// - **Producers (push)**: claim a position by CAS on `write_pos`, but only
///   after the target cell's `sequence` says the cell is free for that position.
/// - **Consumers (pop)**: claim a position by CAS on `read_pos` once the cell's
///   `sequence` says the producer for that position has finished writing.
///
/// Neither side ever blocks: a full queue rejects the push, an empty queue
/// returns `None`. Capacity is a fixed power of two.
#[repr(C)]
pub struct MpmcQueue<T> {
    pub(crate) cursors: QueueCursors,

    /// The cell array, allocated once and never resized.
    pub(crate) buffer: Slab<Cell<T>>,

    /// `capacity - 1`, used to wrap positions onto the cell array.
    pub(crate) mask: usize,
}

// Cell values are handed between threads only through the sequence protocol.
unsafe impl<T: Send> Send for MpmcQueue<T> {}
unsafe impl<T: Send> Sync for MpmcQueue<T> {}
