use super::*;

/// Point-in-time copy of the allocation counters.
///
/// The counters are updated independently with relaxed ordering, so a
/// snapshot taken while other threads allocate may mix values from
/// slightly different moments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocSnapshot {
    pub bytes_current: usize,
    pub bytes_peak: usize,
    pub bytes_total: usize,
    pub regions_current: usize,
    pub regions_peak: usize,
    pub regions_total: usize,
}

/// Read the process-wide allocation counters.
pub fn snapshot() -> AllocSnapshot {
    AllocSnapshot {
        bytes_current: COUNTERS.bytes_current.load(Ordering::Relaxed),
        bytes_peak: COUNTERS.bytes_peak.load(Ordering::Relaxed),
        bytes_total: COUNTERS.bytes_total.load(Ordering::Relaxed),
        regions_current: COUNTERS.regions_current.load(Ordering::Relaxed),
        regions_peak: COUNTERS.regions_peak.load(Ordering::Relaxed),
        regions_total: COUNTERS.regions_total.load(Ordering::Relaxed),
    }
}

impl<T> Slab<T> {
    /// Raw pointer to the first slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.slots.as_ptr()
    }
}
