/// Identifies an item lent out by a [`SwapPool`][crate::SwapPool].
///
/// A handle is a plain, copyable token. It does not own the item and does not borrow the
/// pool; the item is reached through [`SwapPool::get()`][crate::SwapPool::get] and
/// [`SwapPool::get_mut()`][crate::SwapPool::get_mut].
///
/// # Validity
///
/// A handle stays usable until the first of:
///
/// * the item is released, after which the pool reports
///   [`Error::AlreadyReleased`][crate::Error::AlreadyReleased] for it (even if the same slot
///   has since been handed out again under a new handle);
/// * the pool is resized, after which the pool reports
///   [`Error::UnknownHandle`][crate::Error::UnknownHandle] for it;
/// * the pool is dropped.
///
/// Releasing a *different* item never affects this handle, even though release reorders the
/// pool's internal bookkeeping.
///
/// # Example
///
/// ```rust
/// use swap_pool::SwapPool;
///
/// let mut pool = SwapPool::<u32>::with_capacity(2).unwrap();
///
/// let handle = pool.get_next().unwrap();
/// let copy = handle;
///
/// *pool.get_mut(handle).unwrap() = 5;
/// assert_eq!(*pool.get(copy).unwrap(), 5);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    /// The pool that issued this handle. Handles presented to any other pool are rejected.
    pub(crate) pool_id: u64,

    /// Storage epoch of the issuing pool at acquire time. Resizing starts a new epoch.
    pub(crate) epoch: u64,

    /// Index into the pool's slot storage. Stable between resizes.
    pub(crate) slot_index: usize,

    /// Generation of the slot at acquire time. Every acquire of a slot starts a new generation,
    /// so a handle from an earlier lending of the same slot no longer matches.
    pub(crate) generation: u64,
}
