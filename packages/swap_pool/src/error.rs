use thiserror::Error;

/// Errors reported by [`SwapPool`][crate::SwapPool] operations.
///
/// Every rejected operation leaves the pool exactly as it was before the call.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A pool must hold at least one slot, both at construction and after a resize.
    #[error("invalid pool capacity {requested}: a pool must have at least one slot")]
    InvalidCapacity {
        /// The capacity the caller asked for.
        requested: usize,
    },

    /// Every slot is already active. Release an item before acquiring another one.
    #[error("no free items left in pool of capacity {capacity}; release some items first")]
    PoolExhausted {
        /// The capacity of the exhausted pool.
        capacity: usize,
    },

    /// The handle was not issued by this pool, or was issued before the pool was resized.
    #[error("handle does not belong to this pool or was invalidated by a resize")]
    UnknownHandle,

    /// The handle refers to an item that has already been returned to the pool.
    #[error("item was already released back into the pool")]
    AlreadyReleased,
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
