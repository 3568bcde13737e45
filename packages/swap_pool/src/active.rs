use std::iter::FusedIterator;
use std::{fmt, slice};

use crate::Handle;
use crate::pool::Slot;

/// A borrowed view over the active items of a [`SwapPool`][crate::SwapPool].
///
/// Returned by [`SwapPool::active()`][crate::SwapPool::active]. Items are listed in position
/// order, which is the order they were acquired in except where a release has moved the last
/// active item into the released item's place.
///
/// The view aliases the pool's own storage and copies nothing. Because it borrows the pool,
/// it ends before the next acquire, release or resize.
pub struct ActiveItems<'p, T> {
    slots: &'p [Slot<T>],

    /// The active prefix of the pool's ordering.
    order: &'p [usize],

    pool_id: u64,
    epoch: u64,
}

impl<'p, T> ActiveItems<'p, T> {
    pub(crate) fn new(slots: &'p [Slot<T>], order: &'p [usize], pool_id: u64, epoch: u64) -> Self {
        Self {
            slots,
            order,
            pool_id,
            epoch,
        }
    }

    /// The number of active items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no active items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The active item at `position`, or `None` if `position` is not below
    /// [`len()`][Self::len].
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'p T> {
        let slots = self.slots;

        self.order
            .get(position)
            .and_then(|&slot_index| slots.get(slot_index))
            .map(|slot| &slot.value)
    }

    /// Iterates over the active items in position order.
    #[must_use]
    pub fn iter(&self) -> ActiveIter<'p, T> {
        ActiveIter {
            slots: self.slots,
            order: self.order.iter(),
        }
    }

    /// Iterates over handles to the active items in position order.
    ///
    /// Each handle is equivalent to the one originally returned by
    /// [`get_next()`][crate::SwapPool::get_next] for that item, so it can be used to release
    /// items that their owner lost track of.
    #[must_use]
    pub fn handles(&self) -> ActiveHandles<'p, T> {
        ActiveHandles {
            slots: self.slots,
            order: self.order.iter(),
            pool_id: self.pool_id,
            epoch: self.epoch,
        }
    }
}

impl<T> Clone for ActiveItems<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ActiveItems<'_, T> {}

impl<T> fmt::Debug for ActiveItems<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveItems")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<'p, T> IntoIterator for ActiveItems<'p, T> {
    type Item = &'p T;
    type IntoIter = ActiveIter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'p, T> IntoIterator for &ActiveItems<'p, T> {
    type Item = &'p T;
    type IntoIter = ActiveIter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the active items of a pool, created by [`ActiveItems::iter()`].
pub struct ActiveIter<'p, T> {
    slots: &'p [Slot<T>],
    order: slice::Iter<'p, usize>,
}

impl<'p, T> ActiveIter<'p, T> {
    fn resolve(&self, slot_index: usize) -> &'p T {
        let slots = self.slots;

        &slots
            .get(slot_index)
            .expect("the ordering only refers to existing slots")
            .value
    }
}

impl<'p, T> Iterator for ActiveIter<'p, T> {
    type Item = &'p T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot_index = *self.order.next()?;
        Some(self.resolve(slot_index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> DoubleEndedIterator for ActiveIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slot_index = *self.order.next_back()?;
        Some(self.resolve(slot_index))
    }
}

impl<T> ExactSizeIterator for ActiveIter<'_, T> {}

impl<T> FusedIterator for ActiveIter<'_, T> {}

impl<T> fmt::Debug for ActiveIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveIter")
            .field("remaining", &self.order.len())
            .finish_non_exhaustive()
    }
}

/// Iterator over handles to the active items of a pool, created by [`ActiveItems::handles()`].
pub struct ActiveHandles<'p, T> {
    slots: &'p [Slot<T>],
    order: slice::Iter<'p, usize>,
    pool_id: u64,
    epoch: u64,
}

impl<T> Iterator for ActiveHandles<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let slot_index = *self.order.next()?;

        let generation = self
            .slots
            .get(slot_index)
            .expect("the ordering only refers to existing slots")
            .generation;

        Some(Handle {
            pool_id: self.pool_id,
            epoch: self.epoch,
            slot_index,
            generation,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> ExactSizeIterator for ActiveHandles<'_, T> {}

impl<T> FusedIterator for ActiveHandles<'_, T> {}

impl<T> fmt::Debug for ActiveHandles<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveHandles")
            .field("remaining", &self.order.len())
            .finish_non_exhaustive()
    }
}
