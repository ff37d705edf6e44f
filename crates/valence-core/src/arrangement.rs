//! Arrangement — a typed collection over a slot store.
//!
//! Adds, reads and erases whole values of one type and never exposes the
//! store's slots directly. Lookups by value or predicate are linear scans of
//! occupied slots.

use crate::config::StoreConfig;
use crate::cursor::{Cursor, Iter};
use crate::error::{Result, ValenceError};
use crate::slot_store::{Container, SlotStore};
use crate::types::Index;

/// A typed, slot-recycling collection.
#[derive(Debug)]
pub struct Arrangement<T> {
    store: SlotStore<T>,
}

impl<T> Arrangement<T> {
    pub fn new() -> Self {
        Self {
            store: SlotStore::new(),
        }
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self {
            store: SlotStore::with_capacity(expected),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            store: SlotStore::from_config(config)?,
        })
    }

    /// Store `value` and return its index. Fails only on exhaustion.
    pub fn add(&mut self, value: T) -> Result<Index> {
        self.store.allocate(value)
    }

    /// Like [`add`](Self::add), but hands `value` back on failure.
    pub fn try_add(&mut self, value: T) -> std::result::Result<Index, (ValenceError, T)> {
        self.store.try_allocate(value)
    }

    pub fn get(&self, index: Index) -> Option<&T> {
        self.store.read(index).ok()
    }

    pub fn get_mut(&mut self, index: Index) -> Option<&mut T> {
        self.store.read_mut(index).ok()
    }

    /// Destroy the value at `index`. Returns false if the slot was already free.
    pub fn erase(&mut self, index: Index) -> bool {
        self.store.deallocate(index).is_ok()
    }

    /// Remove the value at `index` without destroying it.
    pub fn take(&mut self, index: Index) -> Option<T> {
        self.store.deallocate(index).ok()
    }

    /// Index of the first occupied value matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<Index>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .find(|(_, value)| predicate(value))
            .map(|(index, _)| index)
    }

    pub fn contains_index(&self, index: Index) -> bool {
        self.store.is_occupied(index)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Destroy every value.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.store.iter()
    }

    /// Occupied indices in order.
    pub fn indices(&self) -> Vec<Index> {
        self.iter().map(|(index, _)| index).collect()
    }

    /// Cursor before the first value.
    pub fn begin(&self) -> Cursor {
        Cursor::begin(self)
    }

    /// Cursor after the last value.
    pub fn end(&self) -> Cursor {
        Cursor::end(self)
    }
}

impl<T: PartialEq> Arrangement<T> {
    /// Index of the first value equal to `value`.
    pub fn find_value(&self, value: &T) -> Option<Index> {
        self.find(|candidate| candidate == value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_value(value).is_some()
    }
}

impl<T> Default for Arrangement<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Container for Arrangement<T> {
    type Item = T;

    fn slots(&self) -> &SlotStore<T> {
        &self.store
    }

    fn slots_mut(&mut self) -> &mut SlotStore<T> {
        &mut self.store
    }
}

impl<'a, T> IntoIterator for &'a Arrangement<T> {
    type Item = (Index, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
