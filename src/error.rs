use thiserror::Error;

/// Error types for `DynVec` operations
///
/// A panic raised by an element's `Clone` implementation is not represented
/// here: it unwinds through the container, which restores its state on the
/// way out, and reaches the caller unchanged.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum DynVecError {
    /// Position is not inside the range the operation accepts
    #[error("Index out of bounds: index {index} is beyond vector length {length}")]
    IndexOutOfBound {
        /// Index that was requested
        index: usize,
        /// Length of the vector at the time of the request
        length: usize,
    },
    /// Operation needs at least one element
    #[error("Container is empty")]
    ContainerIsEmpty,
    /// Cursor was issued by another container, or points outside the range the operation accepts
    #[error("Invalid iterator: cursor does not address this container")]
    InvalidIterator,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DynVecError>;
