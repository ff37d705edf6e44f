//! ThreadGuard — opt-in serialization for values shared across threads.
//!
//! The core types do no locking of their own. Wrap an [`Atom`] in a guard to
//! share it; each call holds the lock for its whole duration.

use crate::atom::{Atom, FormRejection};
use crate::bond::Bonded;
use crate::error::{Result, ValenceError};
use crate::types::{AtomicNumber, Index};
use crate::wave::Wave;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct ThreadGuard<T> {
    inner: Mutex<T>,
}

impl<T> ThreadGuard<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Lock for exclusive access. A poisoned lock is [`ValenceError::Unavailable`].
    pub fn lock(&self) -> Result<MutexGuard<'_, T>> {
        self.inner
            .lock()
            .map_err(|_| ValenceError::unavailable("thread guard is poisoned"))
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    pub fn into_inner(self) -> Result<T> {
        self.inner
            .into_inner()
            .map_err(|_| ValenceError::unavailable("thread guard is poisoned"))
    }
}

impl ThreadGuard<Atom> {
    /// Like [`Atom::form`]; a rejected or unlockable call hands the target back.
    pub fn form(&self, tag: AtomicNumber, bonded: Bonded) -> std::result::Result<Index, FormRejection> {
        match self.lock() {
            Ok(mut atom) => atom.form(tag, bonded),
            Err(error) => Err(FormRejection::new(error, bonded)),
        }
    }

    pub fn break_bond(&self, tag: AtomicNumber) -> Result<()> {
        self.lock()?.break_bond(tag)
    }

    pub fn attenuate(&self, signal: &dyn Wave) -> Result<usize> {
        self.lock()?.attenuate(signal)
    }

    pub fn disattenuate(&self, signal: &dyn Wave) -> Result<usize> {
        self.lock()?.disattenuate(signal)
    }
}
