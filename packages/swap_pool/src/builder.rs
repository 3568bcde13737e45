use std::marker::PhantomData;

use crate::{DEFAULT_CAPACITY, DropPolicy, Result, SwapPool};

/// Builder for creating an instance of [`SwapPool`].
///
/// The shortcuts [`SwapPool::new()`], [`SwapPool::with_capacity()`] and
/// [`SwapPool::from_template()`] cover most use cases. Use the builder when you also want to
/// set a [drop policy][DropPolicy].
///
/// # Examples
///
/// ```
/// use swap_pool::{DropPolicy, SwapPool};
///
/// let pool = SwapPool::<u32>::builder()
///     .capacity(64)
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.capacity(), 64);
/// ```
#[must_use]
pub struct SwapPoolBuilder<T> {
    capacity: usize,
    drop_policy: DropPolicy,

    _item: PhantomData<T>,
}

impl<T> std::fmt::Debug for SwapPoolBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapPoolBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("capacity", &self.capacity)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T> SwapPoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
        }
    }

    /// Sets the number of items the pool will pre-allocate. Defaults to [`DEFAULT_CAPACITY`].
    ///
    /// The value is validated when the pool is built; zero is rejected there.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how
    /// to treat items that are still active when the pool is dropped.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the pool, filling every slot with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`][crate::Error::InvalidCapacity] if the capacity is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use swap_pool::SwapPool;
    ///
    /// let pool = SwapPool::<String>::builder().capacity(3).build().unwrap();
    ///
    /// assert_eq!(pool.capacity(), 3);
    /// assert_eq!(pool.free_count(), 3);
    /// ```
    pub fn build(self) -> Result<SwapPool<T>>
    where
        T: Default,
    {
        SwapPool::new_inner(self.capacity, self.drop_policy, T::default)
    }

    /// Builds the pool, filling every slot with a clone of `template`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`][crate::Error::InvalidCapacity] if the capacity is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::builder()
    ///     .capacity(4)
    ///     .build_from_template(&vec![0_u8; 16])
    ///     .unwrap();
    ///
    /// let handle = pool.get_next().unwrap();
    /// assert_eq!(pool.get(handle).unwrap().len(), 16);
    /// # pool.release(handle).unwrap();
    /// ```
    pub fn build_from_template(self, template: &T) -> Result<SwapPool<T>>
    where
        T: Clone,
    {
        SwapPool::new_inner(self.capacity, self.drop_policy, || template.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn defaults() {
        let pool = SwapPool::<u8>::builder().build().unwrap();

        assert_eq!(pool.capacity(), DEFAULT_CAPACITY);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.drop_policy(), DropPolicy::MayDropItems);
    }

    #[test]
    fn zero_capacity_is_rejected_by_both_build_paths() {
        assert_eq!(
            SwapPool::<u8>::builder().capacity(0).build().unwrap_err(),
            Error::InvalidCapacity { requested: 0 }
        );

        assert_eq!(
            SwapPool::<u8>::builder()
                .capacity(0)
                .build_from_template(&9)
                .unwrap_err(),
            Error::InvalidCapacity { requested: 0 }
        );
    }

    #[test]
    fn settings_reach_the_pool() {
        let pool = SwapPool::<u8>::builder()
            .capacity(3)
            .drop_policy(DropPolicy::MustNotDropItems)
            .build_from_template(&7)
            .unwrap();

        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.drop_policy(), DropPolicy::MustNotDropItems);
    }

    #[test]
    fn debug_names_item_type() {
        let builder = SwapPool::<u16>::builder().capacity(5);

        let output = format!("{builder:?}");
        assert!(output.contains("u16"));
        assert!(output.contains('5'));
    }
}
