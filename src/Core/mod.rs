pub mod alloc;
pub mod fatal;
pub mod thread;

pub use alloc::{print_alloc_info, snapshot, AllocSnapshot, Slab};
