use crate::SPSC::OverflowPolicy;
use thiserror::Error;

/// Capacity error reported to error callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A push or write found the structure full.
    Overflow,
    /// A read found fewer bytes than requested.
    Underflow,
}

/// Errors returned by the fallible constructors.
///
/// The non-`try` constructors turn these into a fatal abort.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    #[error("capacity must be a power of two and at least 2, got {0}")]
    CapacityNotPowerOfTwo(usize),

    #[error("overflow policy {0:?} is not supported")]
    UnsupportedPolicy(OverflowPolicy),
}

pub type Result<T> = std::result::Result<T, Error>;
