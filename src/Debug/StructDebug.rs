use crate::Core::Slab;
use crate::MPMC::MpmcQueue;
use crate::PrioQ::PriorityQueue;
use crate::Ring::{RingReader, RingWriter};
use crate::SPSC::{Consumer, Producer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::Ordering::Relaxed;

/// Debug function for Slab
///
/// Shows the slot count, the byte size and where the storage lives, never the slots.
pub fn debug_slab<T>(slab: &Slab<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Slab")
        .field("len", &slab.len())
        .field("bytes", &slab.bytes())
        .field("ptr", &format_args!("{:p}", slab.as_ptr()))
        .finish()
}

/// Debug function for MpmcQueue
///
/// Shows:
/// - Capacity
/// - Raw cursor values (relaxed loads, may be stale)
pub fn debug_mpmc_queue<T>(queue: &MpmcQueue<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MpmcQueue")
        .field("capacity", &queue.capacity())
        .field("write_pos", &queue.cursors.write_pos.load(Relaxed))
        .field("read_pos", &queue.cursors.read_pos.load(Relaxed))
        .finish_non_exhaustive()
}

pub fn debug_spsc_producer<T>(producer: &Producer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("capacity", &producer.capacity())
        .field("can_push", &producer.can_push())
        .field("write_pos", &producer.write_pos)
        .field("policy", &producer.policy)
        .field("poll_interval", &producer.poll_interval)
        .field("overflows", &producer.overflows)
        .field("error_callback", &producer.error_callback.is_some())
        .finish()
}

pub fn debug_spsc_consumer<T>(consumer: &Consumer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("capacity", &consumer.capacity())
        .field("can_pop", &consumer.can_pop())
        .field("read_pos", &consumer.read_pos)
        .finish()
}

pub fn debug_ring_writer(writer: &RingWriter, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingWriter")
        .field("capacity", &writer.capacity())
        .field("can_write", &writer.can_write())
        .field("offset", &writer.offset)
        .finish()
}

pub fn debug_ring_reader(reader: &RingReader, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingReader")
        .field("capacity", &reader.capacity())
        .field("can_read", &reader.can_read())
        .field("offset", &reader.offset)
        .finish()
}

/// Debug function for PriorityQueue
///
/// Values are not printed, so `T` needs no `Debug` bound.
pub fn debug_priority_queue<T, F>(
    queue: &PriorityQueue<T, F>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result
where
    F: FnMut(&T, &T) -> Ordering,
{
    f.debug_struct("PriorityQueue")
        .field("len", &queue.len())
        .field("allocated_nodes", &queue.allocated_nodes())
        .field("free_nodes", &queue.free_nodes())
        .finish_non_exhaustive()
}
