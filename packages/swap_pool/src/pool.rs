use std::any::type_name;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fmt, iter, mem, thread};

use crate::{ActiveItems, DropPolicy, Error, Handle, Result, SwapPoolBuilder};

/// Global counter for generating unique pool IDs.
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a unique pool ID.
fn generate_pool_id() -> u64 {
    POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Capacity used by [`SwapPool::new()`] and by a [`SwapPoolBuilder`] that is not told otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// A fixed-capacity object pool that lends out pre-allocated items.
///
/// All items are created up front, when the pool is built. After that, acquiring an item via
/// [`get_next()`][1] and giving it back via [`release()`][2] never allocates: the pool only
/// moves a single boundary between its "active" and "free" regions.
///
/// # Active and free items
///
/// The pool keeps its slots in an ordered sequence split by a partition index. Positions below
/// the partition are active (lent out), positions at or above it are free. Acquiring hands out
/// the first free position and moves the partition up by one. Releasing swaps the released
/// item's position with the last active position and moves the partition down by one.
///
/// The swap reorders positions only. Item values stay where they are in storage, so handles to
/// other items remain valid and remain active after an unrelated release - an item may simply
/// be listed at a different place by [`active()`][3] afterwards.
///
/// # No reset on reuse
///
/// Items keep whatever state they had when they were released. The next caller to acquire
/// that slot sees the old value. Reset items yourself if your use case needs it.
///
/// # Resource usage
///
/// The pool never grows on its own; [`get_next()`][1] fails with [`Error::PoolExhausted`]
/// instead. Use [`resize()`][4] to change capacity explicitly. Resizing invalidates all
/// outstanding handles.
///
/// # Thread safety
///
/// The pool has no internal synchronization. All mutating operations take `&mut self`, so
/// sharing a pool between threads requires an external lock (or one pool per thread).
///
/// # Example
///
/// ```rust
/// use swap_pool::SwapPool;
///
/// #[derive(Clone, Debug, Default)]
/// struct Particle {
///     x: f32,
///     y: f32,
/// }
///
/// let mut pool = SwapPool::<Particle>::with_capacity(128).unwrap();
///
/// let spark = pool.get_next().unwrap();
/// pool.get_mut(spark).unwrap().x = 4.0;
///
/// assert_eq!(pool.active_count(), 1);
/// assert_eq!(pool.free_count(), 127);
///
/// pool.release(spark).unwrap();
/// assert_eq!(pool.active_count(), 0);
/// ```
///
/// [1]: Self::get_next
/// [2]: Self::release
/// [3]: Self::active
/// [4]: Self::resize
pub struct SwapPool<T> {
    /// Handles carry the ID of the pool that issued them, so a handle presented to the wrong
    /// pool is detected instead of silently releasing an unrelated item.
    pool_id: u64,

    /// Bumped on every resize. Storage is rebuilt by a resize, so handles from an earlier epoch
    /// no longer describe a valid slot.
    epoch: u64,

    /// Item storage. Indexes into this are stable between resizes and are what handles point to.
    slots: Vec<Slot<T>>,

    /// The ordered sequence: position -> index in `slots`. Always a permutation of the
    /// storage indexes.
    order: Vec<usize>,

    /// Inverse of `order`: index in `slots` -> position.
    positions: Vec<usize>,

    /// Positions `[0, partition)` are active, `[partition, capacity)` are free.
    partition: usize,

    drop_policy: DropPolicy,
}

pub(crate) struct Slot<T> {
    pub(crate) value: T,

    /// Incremented every time the slot is lent out.
    pub(crate) generation: u64,
}

impl<T> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            generation: 0,
        }
    }
}

impl<T> SwapPool<T> {
    pub(crate) fn new_inner(
        capacity: usize,
        drop_policy: DropPolicy,
        mut make_item: impl FnMut() -> T,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity {
                requested: capacity,
            });
        }

        let slots = iter::repeat_with(|| Slot::new(make_item()))
            .take(capacity)
            .collect();

        Ok(Self {
            pool_id: generate_pool_id(),
            epoch: 0,
            slots,
            order: (0..capacity).collect(),
            positions: (0..capacity).collect(),
            partition: 0,
            drop_policy,
        })
    }

    /// Creates a pool of [`DEFAULT_CAPACITY`] items, each initialized with `T::default()`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::{DEFAULT_CAPACITY, SwapPool};
    ///
    /// let pool = SwapPool::<u64>::new();
    ///
    /// assert_eq!(pool.capacity(), DEFAULT_CAPACITY);
    /// assert_eq!(pool.active_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self
    where
        T: Default,
    {
        Self::builder()
            .build()
            .expect("the default capacity is never zero")
    }

    /// Creates a pool of `capacity` items, each initialized with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::{Error, SwapPool};
    ///
    /// let pool = SwapPool::<u64>::with_capacity(3).unwrap();
    /// assert_eq!(pool.capacity(), 3);
    ///
    /// assert!(matches!(
    ///     SwapPool::<u64>::with_capacity(0),
    ///     Err(Error::InvalidCapacity { requested: 0 })
    /// ));
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::builder().capacity(capacity).build()
    }

    /// Creates a pool of `capacity` items, each a clone of `template`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::from_template(&"enemy".to_string(), 2).unwrap();
    ///
    /// let handle = pool.get_next().unwrap();
    /// assert_eq!(pool.get(handle).unwrap(), "enemy");
    /// ```
    pub fn from_template(template: &T, capacity: usize) -> Result<Self>
    where
        T: Clone,
    {
        Self::builder()
            .capacity(capacity)
            .build_from_template(template)
    }

    /// Starts building a new [`SwapPool`].
    ///
    /// Use this when you want to customize the pool configuration beyond the capacity.
    pub fn builder() -> SwapPoolBuilder<T> {
        SwapPoolBuilder::new()
    }

    /// The total number of items in the pool, active and free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of items currently lent out.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::<u8>::with_capacity(4).unwrap();
    ///
    /// let a = pool.get_next().unwrap();
    /// let _b = pool.get_next().unwrap();
    /// assert_eq!(pool.active_count(), 2);
    ///
    /// pool.release(a).unwrap();
    /// assert_eq!(pool.active_count(), 1);
    /// ```
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.partition
    }

    /// The number of items available to [`get_next()`][Self::get_next].
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity()
            .checked_sub(self.partition)
            .expect("partition never exceeds capacity")
    }

    /// Whether every item is lent out, i.e. the next [`get_next()`][Self::get_next] will fail.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.partition == self.capacity()
    }

    /// Whether no item is lent out.
    #[must_use]
    pub fn is_all_free(&self) -> bool {
        self.partition == 0
    }

    /// The drop policy the pool was built with.
    #[must_use]
    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    /// Lends out the next free item and returns a handle to it.
    ///
    /// The item is not reset: it holds whatever value it was created with or was left with by
    /// its previous user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] if every item is already active. The pool does not grow
    /// on its own; release an item or [`resize()`][Self::resize] the pool first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::{Error, SwapPool};
    ///
    /// let mut pool = SwapPool::<u32>::with_capacity(1).unwrap();
    ///
    /// let handle = pool.get_next().unwrap();
    /// assert_eq!(pool.get_next(), Err(Error::PoolExhausted { capacity: 1 }));
    ///
    /// pool.release(handle).unwrap();
    /// _ = pool.get_next().unwrap();
    /// ```
    pub fn get_next(&mut self) -> Result<Handle> {
        let position = self.partition;

        let Some(&slot_index) = self.order.get(position) else {
            return Err(Error::PoolExhausted {
                capacity: self.capacity(),
            });
        };

        let slot = self
            .slots
            .get_mut(slot_index)
            .expect("the ordering only refers to existing slots");
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        self.partition = position
            .checked_add(1)
            .expect("partition is below capacity, so it cannot overflow");

        Ok(Handle {
            pool_id: self.pool_id,
            epoch: self.epoch,
            slot_index,
            generation,
        })
    }

    /// Lends out the next free item, returning both its handle and an exclusive reference to it.
    ///
    /// Useful when the item needs to be set up right after it is acquired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] if every item is already active.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::<Vec<u8>>::with_capacity(2).unwrap();
    ///
    /// let (handle, buffer) = pool.get_next_mut().unwrap();
    /// buffer.clear();
    /// buffer.extend_from_slice(b"hello");
    ///
    /// assert_eq!(pool.get(handle).unwrap(), b"hello");
    /// ```
    pub fn get_next_mut(&mut self) -> Result<(Handle, &mut T)> {
        let handle = self.get_next()?;
        Ok((handle, &mut self.slot_mut(handle.slot_index).value))
    }

    /// Returns an item lent out by [`get_next()`][Self::get_next] to the free region.
    ///
    /// The released item's position is swapped with the last active position, then the
    /// partition moves down by one. The item that used to be last active is relocated within the
    /// active region; its handles stay valid and it stays active. Only `handle` becomes unusable.
    ///
    /// The item's value is kept as-is and will be seen by whoever acquires the slot next.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownHandle`] if the handle was issued by a different pool or before the
    ///   last [`resize()`][Self::resize].
    /// * [`Error::AlreadyReleased`] if the item was already released through this handle
    ///   (or through [`release_all()`][Self::release_all]).
    ///
    /// The pool is unchanged when an error is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::{Error, SwapPool};
    ///
    /// let mut pool = SwapPool::<u32>::with_capacity(3).unwrap();
    ///
    /// let a = pool.get_next().unwrap();
    /// let b = pool.get_next().unwrap();
    /// *pool.get_mut(b).unwrap() = 20;
    ///
    /// pool.release(a).unwrap();
    /// assert_eq!(pool.release(a), Err(Error::AlreadyReleased));
    ///
    /// // `b` was relocated within the active region but is unaffected otherwise.
    /// assert_eq!(*pool.get(b).unwrap(), 20);
    /// assert_eq!(pool.active_count(), 1);
    /// ```
    pub fn release(&mut self, handle: Handle) -> Result<()> {
        let position = self.active_position(handle)?;

        let last_active = self
            .partition
            .checked_sub(1)
            .expect("an active item exists, so partition is positive");

        self.order.swap(position, last_active);

        let relocated_slot_index = *self
            .order
            .get(position)
            .expect("position is below partition, so it is within the ordering");
        self.set_position(relocated_slot_index, position);
        self.set_position(handle.slot_index, last_active);

        self.partition = last_active;

        Ok(())
    }

    /// Returns every active item to the free region at once.
    ///
    /// All outstanding handles become unusable and report [`Error::AlreadyReleased`]. Item
    /// values are kept, as with [`release()`][Self::release].
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::<u32>::with_capacity(3).unwrap();
    /// _ = pool.get_next().unwrap();
    /// _ = pool.get_next().unwrap();
    ///
    /// pool.release_all();
    /// assert!(pool.is_all_free());
    /// ```
    pub fn release_all(&mut self) {
        self.partition = 0;
    }

    /// Gets a shared reference to an active item.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownHandle`] if the handle was issued by a different pool or before the
    ///   last [`resize()`][Self::resize].
    /// * [`Error::AlreadyReleased`] if the item has been released.
    pub fn get(&self, handle: Handle) -> Result<&T> {
        self.active_position(handle)?;

        Ok(&self.slot(handle.slot_index).value)
    }

    /// Gets an exclusive reference to an active item.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownHandle`] if the handle was issued by a different pool or before the
    ///   last [`resize()`][Self::resize].
    /// * [`Error::AlreadyReleased`] if the item has been released.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T> {
        self.active_position(handle)?;

        Ok(&mut self.slot_mut(handle.slot_index).value)
    }

    /// A view over all active items, in position order.
    ///
    /// The view borrows the pool and so cannot outlive the next acquire, release or resize.
    /// Collect [`ActiveItems::handles()`] first if you want to release some of the listed items.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::<u32>::with_capacity(4).unwrap();
    ///
    /// for value in 1..=3 {
    ///     let (_, item) = pool.get_next_mut().unwrap();
    ///     *item = value;
    /// }
    ///
    /// let active = pool.active();
    /// assert_eq!(active.len(), 3);
    /// assert_eq!(active.iter().sum::<u32>(), 6);
    ///
    /// // Release everything that is still lent out.
    /// let forgotten = active.handles().collect::<Vec<_>>();
    /// for handle in forgotten {
    ///     pool.release(handle).unwrap();
    /// }
    ///
    /// assert!(pool.is_all_free());
    /// ```
    #[must_use]
    pub fn active(&self) -> ActiveItems<'_, T> {
        let active_order = self
            .order
            .get(..self.partition)
            .expect("partition never exceeds capacity");

        ActiveItems::new(&self.slots, active_order, self.pool_id, self.epoch)
    }

    /// Calls `f` with an exclusive reference to each active item, in position order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::<u32>::with_capacity(4).unwrap();
    /// let a = pool.get_next().unwrap();
    /// let b = pool.get_next().unwrap();
    ///
    /// pool.for_each_active_mut(|item| *item += 10);
    ///
    /// assert_eq!(*pool.get(a).unwrap(), 10);
    /// assert_eq!(*pool.get(b).unwrap(), 10);
    /// ```
    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let active_order = self
            .order
            .get(..self.partition)
            .expect("partition never exceeds capacity");

        for &slot_index in active_order {
            let slot = self
                .slots
                .get_mut(slot_index)
                .expect("the ordering only refers to existing slots");

            f(&mut slot.value);
        }
    }

    /// Changes the capacity of the pool.
    ///
    /// * Items at positions that exist both before and after the resize keep their values and
    ///   their active/free classification.
    /// * When growing, each new slot is a clone of the item at the former last position.
    /// * When shrinking, items at positions beyond the new capacity are dropped. If that cuts
    ///   into the active region, the whole remaining pool is active.
    ///
    /// Every outstanding handle is invalidated and reports [`Error::UnknownHandle`] afterwards.
    /// Use [`active()`][Self::active] to obtain handles for the surviving active items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `new_capacity` is zero. The pool is unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_pool::SwapPool;
    ///
    /// let mut pool = SwapPool::from_template(&7_u32, 2).unwrap();
    /// _ = pool.get_next().unwrap();
    ///
    /// pool.resize(5).unwrap();
    /// assert_eq!(pool.capacity(), 5);
    /// assert_eq!(pool.active_count(), 1);
    ///
    /// pool.resize(1).unwrap();
    /// assert_eq!(pool.capacity(), 1);
    /// assert!(pool.is_exhausted());
    /// ```
    pub fn resize(&mut self, new_capacity: usize) -> Result<()>
    where
        T: Clone,
    {
        if new_capacity == 0 {
            return Err(Error::InvalidCapacity {
                requested: new_capacity,
            });
        }

        let old_capacity = self.capacity();
        let additional = new_capacity.saturating_sub(old_capacity);

        // All clones happen before any state changes, so a panicking `clone()` leaves
        // the pool as it was.
        let mut grown = Vec::with_capacity(additional);
        if additional > 0 {
            let last_position = old_capacity
                .checked_sub(1)
                .expect("capacity is never zero");
            let last = &self.slot(self.slot_index_at(last_position)).value;

            grown.extend(iter::repeat_with(|| Slot::new(last.clone())).take(additional));
        }

        let mut old_slots = mem::take(&mut self.slots)
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();

        let mut slots = Vec::with_capacity(new_capacity);
        for &slot_index in self.order.iter().take(new_capacity) {
            let slot = old_slots
                .get_mut(slot_index)
                .and_then(Option::take)
                .expect("the ordering is a permutation of storage, so each slot is taken once");

            slots.push(slot);
        }
        slots.append(&mut grown);

        self.slots = slots;
        self.order = (0..new_capacity).collect();
        self.positions = (0..new_capacity).collect();
        self.partition = self.partition.min(new_capacity);
        self.epoch = self.epoch.wrapping_add(1);

        // Whatever was not moved over lived beyond the new capacity. The pool is already
        // consistent at this point, so a panicking drop cannot corrupt it.
        drop(old_slots);

        Ok(())
    }

    /// Resolves a handle to the position of its item, which must be active.
    fn active_position(&self, handle: Handle) -> Result<usize> {
        if handle.pool_id != self.pool_id || handle.epoch != self.epoch {
            return Err(Error::UnknownHandle);
        }

        let (Some(slot), Some(&position)) = (
            self.slots.get(handle.slot_index),
            self.positions.get(handle.slot_index),
        ) else {
            return Err(Error::UnknownHandle);
        };

        if position >= self.partition || slot.generation != handle.generation {
            return Err(Error::AlreadyReleased);
        }

        Ok(position)
    }

    fn slot_index_at(&self, position: usize) -> usize {
        *self
            .order
            .get(position)
            .expect("position must be within capacity")
    }

    fn slot(&self, slot_index: usize) -> &Slot<T> {
        self.slots
            .get(slot_index)
            .expect("slot index was validated by the caller")
    }

    fn slot_mut(&mut self, slot_index: usize) -> &mut Slot<T> {
        self.slots
            .get_mut(slot_index)
            .expect("slot index was validated by the caller")
    }

    fn set_position(&mut self, slot_index: usize, position: usize) {
        *self
            .positions
            .get_mut(slot_index)
            .expect("slot index was validated by the caller") = position;
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(test)]
    pub(crate) fn integrity_check(&self) {
        let capacity = self.capacity();

        assert!(capacity > 0);
        assert!(self.partition <= capacity);
        assert_eq!(self.order.len(), capacity);
        assert_eq!(self.positions.len(), capacity);

        let mut seen = vec![false; capacity];

        for (position, &slot_index) in self.order.iter().enumerate() {
            assert!(!seen[slot_index], "slot {slot_index} appears twice in the ordering");
            seen[slot_index] = true;

            assert_eq!(self.positions[slot_index], position);
        }
    }
}

impl<T: Default> Default for SwapPool<T> {
    /// Creates a pool of [`DEFAULT_CAPACITY`] default-initialized items.
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SwapPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapPool")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("pool_id", &self.pool_id)
            .field("capacity", &self.capacity())
            .field("active_count", &self.partition)
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

impl<T> Drop for SwapPool<T> {
    fn drop(&mut self) {
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if !thread::panicking() && matches!(self.drop_policy, DropPolicy::MustNotDropItems) {
            assert!(
                self.partition == 0,
                "dropped a SwapPool with {} active items - this is forbidden by DropPolicy::MustNotDropItems",
                self.partition
            );
        }
    }
}
