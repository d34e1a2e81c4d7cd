use alloc::vec::Vec;

use super::handle::Handle;
use crate::Error;

/// Slot storage for tree nodes.
///
/// Every node lives in exactly one slot and is referred to by [`Handle`]. Slots vacated by
/// [`take`](Arena::take) go on a free list and are handed out again before the storage grows.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes sure the next [`alloc`](Arena::alloc) cannot fail.
    ///
    /// Either a free slot is available, or room for one more slot has been reserved and the
    /// handle space is not exhausted.
    pub(crate) fn try_reserve(&mut self) -> Result<(), Error> {
        if !self.free.is_empty() {
            return Ok(());
        }
        // Strict less-than keeps the slot count within what a `Handle` can address.
        if self.slots.len() >= Handle::MAX {
            return Err(Error::CapacityExhausted);
        }
        self.slots.try_reserve(1).map_err(|_| Error::CapacityExhausted)
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            handle
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Like [`get`](Arena::get), but tolerates handles that were never issued or were freed.
    #[inline]
    pub(crate) fn try_get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.to_index()).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns mutable references to two distinct occupied slots.
    pub(crate) fn pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (i, j) = (a.to_index(), b.to_index());
        assert_ne!(i, j, "`Arena::pair_mut()` - handles must be distinct!");
        let (first, second) = if i < j {
            let (head, tail) = self.slots.split_at_mut(j);
            (&mut head[i], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(i);
            (&mut tail[0], &mut head[j])
        };
        (
            first.as_mut().expect("`Arena::pair_mut()` - `a` is invalid!"),
            second.as_mut().expect("`Arena::pair_mut()` - `b` is invalid!"),
        )
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
