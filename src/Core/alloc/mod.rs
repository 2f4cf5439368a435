use lazy_static::lazy_static;
use std::alloc::Layout;
use std::mem::size_of;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
mod debug;
mod getters;

pub use debug::print_alloc_info;
pub use getters::{snapshot, AllocSnapshot};

/// Process-wide byte and region accounting for the backing storage of every structure.
#[derive(Default)]
struct AllocCounters {
    bytes_current: AtomicUsize,
    bytes_peak: AtomicUsize,
    bytes_total: AtomicUsize,
    regions_current: AtomicUsize,
    regions_peak: AtomicUsize,
    regions_total: AtomicUsize,
}

lazy_static! {
    static ref COUNTERS: AllocCounters = AllocCounters::default();
}

/// Account `regions` newly allocated regions totalling `bytes`.
pub(crate) fn record_alloc(bytes: usize, regions: usize) {
    let current = COUNTERS.bytes_current.fetch_add(bytes, Ordering::Relaxed) + bytes;
    COUNTERS.bytes_peak.fetch_max(current, Ordering::Relaxed);
    COUNTERS.bytes_total.fetch_add(bytes, Ordering::Relaxed);

    let current = COUNTERS.regions_current.fetch_add(regions, Ordering::Relaxed) + regions;
    COUNTERS.regions_peak.fetch_max(current, Ordering::Relaxed);
    COUNTERS.regions_total.fetch_add(regions, Ordering::Relaxed);
}

/// Account the release of regions previously passed to [`record_alloc`].
pub(crate) fn record_release(bytes: usize, regions: usize) {
    COUNTERS.bytes_current.fetch_sub(bytes, Ordering::Relaxed);
    COUNTERS.regions_current.fetch_sub(regions, Ordering::Relaxed);
}

/// Size in bytes of `len` values of `T`, or a fatal error if that overflows `isize`.
pub(crate) fn array_bytes<T>(len: usize) -> usize {
    match Layout::array::<T>(len) {
        Ok(layout) => layout.size(),
        Err(_) => crate::fatal!(
            "Request for allocation of {} elements of {} bytes overflows the address space",
            len,
            size_of::<T>()
        ),
    }
}

/// Fixed-length backing storage, allocated once and accounted in the process-wide counters.
///
/// Allocation failure aborts the process through the global allocator; a slab
/// never hands out a partially initialised or null buffer.
pub struct Slab<T> {
    slots: Box<[T]>,
}

impl<T> Slab<T> {
    /// Allocate `len` slots, initialising slot `i` with `init(i)`.
    pub fn from_fn(len: usize, init: impl FnMut(usize) -> T) -> Self {
        let bytes = array_bytes::<T>(len);
        let slots: Box<[T]> = (0..len).map(init).collect();
        record_alloc(bytes, 1);
        Self { slots }
    }

    /// Size of the slab in bytes.
    pub fn bytes(&self) -> usize {
        std::mem::size_of_val(&*self.slots)
    }
}

impl<T> Deref for Slab<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.slots
    }
}

impl<T> Drop for Slab<T> {
    fn drop(&mut self) {
        record_release(self.bytes(), 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_initialises_every_slot() {
        let slab = Slab::from_fn(5, |i| i * 10);
        assert_eq!(&*slab, &[0, 10, 20, 30, 40]);
        assert_eq!(slab.bytes(), 5 * size_of::<usize>());
    }
}
