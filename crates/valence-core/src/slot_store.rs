//! SlotStore — fixed-stride storage with free-list slot reuse.
//!
//! The foundation for every higher collection. Each slot holds either a
//! constructed value or nothing; vacant slots are tracked on a free list and
//! handed out most-recently-freed first. Growth appends slots and never moves
//! an occupied value to a different index, so an [`Index`] stays valid for as
//! long as its value is not erased.

use crate::config::StoreConfig;
use crate::error::{Result, ValenceError};
use crate::types::{Index, StoreId};
use tracing::{debug, error};

#[derive(Debug)]
enum Slot<T> {
    Vacant,
    Occupied(T),
}

impl<T> Slot<T> {
    fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Anything that exposes a [`SlotStore`]. Cursors traverse containers.
pub trait Container {
    type Item;

    fn slots(&self) -> &SlotStore<Self::Item>;

    fn slots_mut(&mut self) -> &mut SlotStore<Self::Item>;
}

/// A growable slot store with index stability and free-list reuse.
///
/// Invariant: every index below [`capacity`](Self::capacity) is either
/// occupied or on the free list, never both.
#[derive(Debug)]
pub struct SlotStore<T> {
    id: StoreId,
    slots: Vec<Slot<T>>,
    /// Vacant indices. The last entry is handed out next.
    free: Vec<Index>,
    occupied: usize,
    /// Capacity the first growth reaches at least.
    initial_capacity: usize,
    growth_factor: usize,
    max_capacity: usize,
}

impl<T> SlotStore<T> {
    /// Create a store with the default sizing.
    pub fn new() -> Self {
        Self::with_capacity(StoreConfig::default().initial_capacity)
    }

    /// Create a store with `capacity` vacant slots and default growth.
    ///
    /// If the slots cannot be reserved now the store starts empty, and the
    /// first allocation retries the reservation and reports
    /// [`ValenceError::AllocationExhausted`] if it fails again.
    pub fn with_capacity(capacity: usize) -> Self {
        let defaults = StoreConfig::default();
        let mut store = Self::empty(capacity, defaults.growth_factor, defaults.max_capacity.max(capacity));
        let _ = store.grow(capacity);
        store
    }

    /// Create a store sized by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let mut store = Self::empty(config.initial_capacity, config.growth_factor, config.max_capacity);
        store.grow(config.initial_capacity)?;
        Ok(store)
    }

    fn empty(initial_capacity: usize, growth_factor: usize, max_capacity: usize) -> Self {
        Self {
            id: StoreId::new(),
            slots: Vec::new(),
            free: Vec::new(),
            occupied: 0,
            initial_capacity,
            growth_factor,
            max_capacity,
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Bytes occupied by one slot's value.
    pub fn stride(&self) -> usize {
        std::mem::size_of::<T>()
    }

    /// Number of allocated slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn is_occupied(&self, index: Index) -> bool {
        self.slots
            .get(index.get())
            .is_some_and(|slot| slot.is_occupied())
    }

    /// Place `value` in a free slot, growing the store if none is left.
    ///
    /// The most recently freed slot is reused first.
    pub fn allocate(&mut self, value: T) -> Result<Index> {
        self.try_allocate(value).map_err(|(error, _)| error)
    }

    /// Like [`allocate`](Self::allocate), but hands `value` back on failure.
    pub fn try_allocate(&mut self, value: T) -> std::result::Result<Index, (ValenceError, T)> {
        if let Err(error) = self.ensure_free_slot() {
            return Err((error, value));
        }
        match self.free.pop() {
            Some(index) => {
                self.slots[index.get()] = Slot::Occupied(value);
                self.occupied += 1;
                Ok(index)
            }
            None => Err((self.exhausted(self.capacity() + 1), value)),
        }
    }

    fn ensure_free_slot(&mut self) -> Result<()> {
        if !self.free.is_empty() {
            return Ok(());
        }
        let capacity = self.capacity();
        let next = self.next_capacity();
        if next <= capacity {
            error!(capacity, limit = self.max_capacity, "slot store is full");
            return Err(self.exhausted(capacity + 1));
        }
        self.grow(next)
    }

    /// Remove the value at `index` and return its slot to the free list.
    ///
    /// The value is handed back; dropping it destroys it.
    pub fn deallocate(&mut self, index: Index) -> Result<T> {
        let slot = self
            .slots
            .get_mut(index.get())
            .ok_or(ValenceError::InvalidIndex(index))?;
        match std::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(value) => {
                self.free.push(index);
                self.occupied -= 1;
                Ok(value)
            }
            Slot::Vacant => Err(ValenceError::InvalidIndex(index)),
        }
    }

    pub fn read(&self, index: Index) -> Result<&T> {
        match self.slots.get(index.get()) {
            Some(Slot::Occupied(value)) => Ok(value),
            _ => Err(ValenceError::InvalidIndex(index)),
        }
    }

    pub fn read_mut(&mut self, index: Index) -> Result<&mut T> {
        match self.slots.get_mut(index.get()) {
            Some(Slot::Occupied(value)) => Ok(value),
            _ => Err(ValenceError::InvalidIndex(index)),
        }
    }

    /// Overwrite an occupied slot, returning the previous value.
    ///
    /// Vacant slots are not resurrected; use [`allocate`](Self::allocate).
    pub fn write(&mut self, index: Index, value: T) -> Result<T> {
        let current = self.read_mut(index)?;
        Ok(std::mem::replace(current, value))
    }

    /// Grow to `new_capacity` slots. Occupied slots keep their indices.
    ///
    /// Shrinking is a no-op. Exceeding the configured limit, or a failed
    /// reservation, is [`ValenceError::AllocationExhausted`].
    pub fn grow(&mut self, new_capacity: usize) -> Result<()> {
        let capacity = self.capacity();
        if new_capacity <= capacity {
            return Ok(());
        }
        let exhausted = self.exhausted(new_capacity);
        if new_capacity > self.max_capacity {
            error!(capacity, new_capacity, limit = self.max_capacity, "refusing to grow past limit");
            return Err(exhausted);
        }

        let additional = new_capacity - capacity;
        if self.slots.try_reserve_exact(additional).is_err()
            || self.free.try_reserve(additional).is_err()
        {
            error!(capacity, new_capacity, "slot store reservation failed");
            return Err(exhausted);
        }

        debug!(capacity, new_capacity, stride = self.stride(), "growing slot store");
        self.append_vacant(additional);
        Ok(())
    }

    /// Destroy every value. Capacity is kept.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        self.slots.clear();
        self.free.clear();
        self.occupied = 0;
        self.append_vacant(capacity);
    }

    /// First occupied index strictly after `after`, or from the start if `None`.
    pub fn next_occupied(&self, after: Option<Index>) -> Option<Index> {
        let start = after.map_or(0, |index| index.get() + 1);
        self.slots
            .get(start..)?
            .iter()
            .position(Slot::is_occupied)
            .map(|offset| Index::new(start + offset))
    }

    /// Last occupied index strictly before `before`, or from the end if `None`.
    pub fn prev_occupied(&self, before: Option<Index>) -> Option<Index> {
        let end = before.map_or(self.capacity(), |index| index.get().min(self.capacity()));
        self.slots[..end]
            .iter()
            .rposition(Slot::is_occupied)
            .map(Index::new)
    }

    /// Check the occupied-xor-free invariant.
    pub fn is_consistent(&self) -> bool {
        let mut on_free_list = vec![false; self.capacity()];
        for index in &self.free {
            match on_free_list.get_mut(index.get()) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
        }
        let violations = self
            .slots
            .iter()
            .zip(&on_free_list)
            .filter(|(slot, free)| slot.is_occupied() == **free)
            .count();
        violations == 0 && self.occupied == self.capacity() - self.free.len()
    }

    fn exhausted(&self, requested: usize) -> ValenceError {
        ValenceError::AllocationExhausted {
            requested,
            limit: self.max_capacity,
        }
    }

    fn next_capacity(&self) -> usize {
        let capacity = self.capacity();
        capacity
            .saturating_mul(self.growth_factor)
            .max(capacity.saturating_add(1))
            .max(self.initial_capacity)
            .min(self.max_capacity)
    }

    /// Append vacant slots beneath the existing free entries so recently
    /// freed slots stay first in line, lowest new index next.
    fn append_vacant(&mut self, additional: usize) {
        let start = self.capacity();
        self.slots.extend((0..additional).map(|_| Slot::Vacant));
        let fresh = (start..start + additional).rev().map(Index::new);
        self.free.splice(0..0, fresh);
    }
}

impl<T> Default for SlotStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Container for SlotStore<T> {
    type Item = T;

    fn slots(&self) -> &SlotStore<T> {
        self
    }

    fn slots_mut(&mut self) -> &mut SlotStore<T> {
        self
    }
}
