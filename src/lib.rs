//! Bounded in-process queues for producer/consumer pipelines.
//!
//! - [`MPMC::MpmcQueue`]: lock-free, power-of-two capacity, any number of producers and consumers.
//! - [`SPSC`]: one producer, one consumer, with a configurable overflow policy.
//! - [`Ring`]: one writer, one reader, byte stream with partial and all-or-nothing transfers.
//! - [`PrioQ::PriorityQueue`]: single-threaded skew heap with node recycling.
//!
//! ```rust
//! use conduit::MPMC::MpmcQueue;
//! use conduit::PrioQ::PriorityQueue;
//!
//! let queue = MpmcQueue::new(8);
//! for job in [5, 3, 8, 1, 9] {
//!     queue.push(job).unwrap();
//! }
//!
//! let mut ordered = PriorityQueue::ordered();
//! while let Some(job) = queue.pop() {
//!     ordered.push(job);
//! }
//! assert_eq!(ordered.pop(), Some(1));
//! ```

// Module naming follows project convention (MPMC/SPSC = multi/single producer, multi/single consumer)
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod Debug;
#[allow(non_snake_case)]
pub mod MPMC;
#[allow(non_snake_case)]
pub mod PrioQ;
#[allow(non_snake_case)]
pub mod Ring;
#[allow(non_snake_case)]
pub mod SPSC;

pub mod error;
pub mod ffi;
pub mod trace;

pub use error::{Error, ErrorKind, Result};
