use super::*;
use std::fmt;

/// Print the allocation counters to stdout.
pub fn print_alloc_info() {
    let stats = snapshot();
    println!(
        "Currently allocated:   {} bytes, {} regions",
        stats.bytes_current, stats.regions_current
    );
    println!(
        "Peak:                  {} bytes, {} regions",
        stats.bytes_peak, stats.regions_peak
    );
    println!(
        "Total allocated:       {} bytes, {} regions",
        stats.bytes_total, stats.regions_total
    );
}

impl<T> fmt::Debug for Slab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_slab(self, f)
    }
}
