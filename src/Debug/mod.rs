pub mod StructDebug;

use crate::MPMC::MpmcQueue;
use crate::PrioQ::PriorityQueue;
use crate::Ring::{RingReader, RingWriter};
use crate::SPSC::{Consumer, Producer};
use std::cmp::Ordering;
use std::fmt;

// Debug proxy implementations that call the standalone debug functions

impl<T> fmt::Debug for MpmcQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_mpmc_queue(self, f)
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_spsc_producer(self, f)
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_spsc_consumer(self, f)
    }
}

impl fmt::Debug for RingWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_ring_writer(self, f)
    }
}

impl fmt::Debug for RingReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_ring_reader(self, f)
    }
}

impl<T, F> fmt::Debug for PriorityQueue<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_priority_queue(self, f)
    }
}
