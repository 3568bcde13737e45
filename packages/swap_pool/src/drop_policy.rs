/// Determines how a [`SwapPool`][crate::SwapPool] treats items that are still active
/// when the pool is dropped.
///
/// By default, the pool drops all of its items, active or free, when it is dropped.
///
/// # Examples
///
/// ```
/// use swap_pool::{DropPolicy, SwapPool};
///
/// // The drop policy is set at pool creation time.
/// let pool = SwapPool::<u32>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool will drop its items when the pool is dropped. This is the default.
    #[default]
    MayDropItems,

    /// The pool will panic if any item is still active when it is dropped.
    ///
    /// This is useful for catching forgotten releases: every item handed out by
    /// [`get_next()`][crate::SwapPool::get_next] must be released (individually or via
    /// [`release_all()`][crate::SwapPool::release_all]) before the pool goes away.
    MustNotDropItems,
}
