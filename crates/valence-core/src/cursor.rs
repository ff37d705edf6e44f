//! Cursor — a stable, bidirectional position over a slot store.
//!
//! A cursor never holds a reference into the store. It remembers which store
//! it was made for and an index, and every operation is handed the container.
//! Because indices survive growth, a step only has to ask "what is the next
//! occupied index", and the store may be mutated between steps.

use crate::error::{Result, ValenceError};
use crate::slot_store::{Container, SlotStore};
use crate::types::{Index, StoreId};

/// Where a cursor currently points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Valid(Index),
    BeforeBeginning,
    AfterEnd,
    Invalid,
}

/// Position marker over a [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    store: StoreId,
    state: CursorState,
}

impl Cursor {
    /// An invalid cursor bound to `container`.
    pub fn new<C: Container + ?Sized>(container: &C) -> Self {
        Self::with_state(container, CursorState::Invalid)
    }

    /// A cursor before the first slot; `increment` reaches the first value.
    pub fn begin<C: Container + ?Sized>(container: &C) -> Self {
        Self::with_state(container, CursorState::BeforeBeginning)
    }

    /// A cursor after the last slot; `decrement` reaches the last value.
    pub fn end<C: Container + ?Sized>(container: &C) -> Self {
        Self::with_state(container, CursorState::AfterEnd)
    }

    /// A cursor at `index`, invalid if that slot is not occupied.
    pub fn at<C: Container + ?Sized>(container: &C, index: Index) -> Self {
        let state = if container.slots().is_occupied(index) {
            CursorState::Valid(index)
        } else {
            CursorState::Invalid
        };
        Self::with_state(container, state)
    }

    fn with_state<C: Container + ?Sized>(container: &C, state: CursorState) -> Self {
        Self {
            store: container.slots().id(),
            state,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// The index pointed at, if the cursor is valid.
    pub fn index(&self) -> Option<Index> {
        match self.state {
            CursorState::Valid(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, CursorState::Valid(_))
    }

    pub fn is_before_beginning(&self) -> bool {
        self.state == CursorState::BeforeBeginning
    }

    pub fn is_after_end(&self) -> bool {
        self.state == CursorState::AfterEnd
    }

    /// Move to the next occupied index, or past the end.
    pub fn increment<C: Container + ?Sized>(&mut self, container: &C) -> Result<Option<Index>> {
        let store = self.bound(container)?;
        self.state = match self.state {
            CursorState::Invalid => return Err(ValenceError::InvalidCursor),
            CursorState::BeforeBeginning => Self::landing(store.next_occupied(None), CursorState::AfterEnd),
            CursorState::Valid(index) => Self::landing(store.next_occupied(Some(index)), CursorState::AfterEnd),
            CursorState::AfterEnd => CursorState::AfterEnd,
        };
        Ok(self.index())
    }

    /// Move to the previous occupied index, or before the beginning.
    pub fn decrement<C: Container + ?Sized>(&mut self, container: &C) -> Result<Option<Index>> {
        let store = self.bound(container)?;
        self.state = match self.state {
            CursorState::Invalid => return Err(ValenceError::InvalidCursor),
            CursorState::AfterEnd => Self::landing(store.prev_occupied(None), CursorState::BeforeBeginning),
            CursorState::Valid(index) => {
                Self::landing(store.prev_occupied(Some(index)), CursorState::BeforeBeginning)
            }
            CursorState::BeforeBeginning => CursorState::BeforeBeginning,
        };
        Ok(self.index())
    }

    /// Point at `index` if it is occupied. Returns whether the cursor moved.
    pub fn move_to<C: Container + ?Sized>(&mut self, container: &C, index: Index) -> Result<bool> {
        let store = self.bound(container)?;
        if !store.is_occupied(index) {
            return Ok(false);
        }
        self.state = CursorState::Valid(index);
        Ok(true)
    }

    /// The value under the cursor.
    ///
    /// Fails if the cursor is not valid, or if its slot was erased since the
    /// cursor moved there.
    pub fn get<'a, C: Container + ?Sized>(&self, container: &'a C) -> Result<&'a C::Item> {
        let store = self.bound(container)?;
        let index = self.index().ok_or(ValenceError::InvalidCursor)?;
        store.read(index)
    }

    pub fn get_mut<'a, C: Container + ?Sized>(&self, container: &'a mut C) -> Result<&'a mut C::Item> {
        if container.slots().id() != self.store {
            return Err(ValenceError::ForeignCursor);
        }
        let index = self.index().ok_or(ValenceError::InvalidCursor)?;
        container.slots_mut().read_mut(index)
    }

    /// Force the cursor invalid. Later steps and reads fail cleanly.
    pub fn invalidate(&mut self) {
        self.state = CursorState::Invalid;
    }

    fn bound<'a, C: Container + ?Sized>(&self, container: &'a C) -> Result<&'a SlotStore<C::Item>> {
        let store = container.slots();
        if store.id() != self.store {
            return Err(ValenceError::ForeignCursor);
        }
        Ok(store)
    }

    fn landing(found: Option<Index>, otherwise: CursorState) -> CursorState {
        found.map_or(otherwise, CursorState::Valid)
    }
}

/// Borrowing iterator over occupied slots, driven by a cursor at each end.
pub struct Iter<'a, T> {
    store: &'a SlotStore<T>,
    front: Cursor,
    back: Cursor,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(store: &'a SlotStore<T>) -> Self {
        Self {
            store,
            front: Cursor::begin(store),
            back: Cursor::end(store),
            remaining: store.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Index, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front.increment(self.store).ok().flatten()?;
        self.remaining -= 1;
        self.store.read(index).ok().map(|value| (index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back.decrement(self.store).ok().flatten()?;
        self.remaining -= 1;
        self.store.read(index).ok().map(|value| (index, value))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> SlotStore<T> {
    /// Iterate occupied slots in index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a SlotStore<T> {
    type Item = (Index, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
