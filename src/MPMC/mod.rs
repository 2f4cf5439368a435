pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub mod layout;
    pub use layout::{Cell, QueueCursors};
    pub use Buffer::MpmcQueue; // re-export for stable path
}

pub use Buffer::MpmcQueue;
