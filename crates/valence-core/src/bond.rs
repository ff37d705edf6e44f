//! Bond — one association between an atom and a capability-tagged wave.
//!
//! The ownership of the target is carried by [`Bonded`]: a managed target is
//! owned by the bond and destroyed with it, used and temporary targets are
//! shared handles that the bond merely releases.

use crate::error::{Result, ValenceError};
use crate::types::{AtomicNumber, BondKind};
use crate::wave::{resonates, Properties, SharedWave, Wave};
use std::fmt;
use std::sync::TryLockError;

/// Which operation a propagation forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Attenuate,
    Disattenuate,
}

impl Phase {
    pub fn apply(self, target: &mut dyn Wave, signal: &dyn Wave) -> Result<()> {
        match self {
            Phase::Attenuate => target.attenuate(signal),
            Phase::Disattenuate => target.disattenuate(signal),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Attenuate => f.write_str("attenuate"),
            Phase::Disattenuate => f.write_str("disattenuate"),
        }
    }
}

/// A bond's target together with how it is held.
pub enum Bonded {
    /// Owned; destroyed when the bond is broken.
    Managed(Box<dyn Wave>),
    /// Borrowed for the life of the bond.
    Used(SharedWave),
    /// Borrowed for a short-lived association.
    Temporary(SharedWave),
}

impl Bonded {
    pub fn manage(wave: impl Wave) -> Self {
        Bonded::Managed(Box::new(wave))
    }

    pub fn using(wave: &SharedWave) -> Self {
        Bonded::Used(wave.clone())
    }

    pub fn temporary(wave: &SharedWave) -> Self {
        Bonded::Temporary(wave.clone())
    }

    pub fn kind(&self) -> BondKind {
        match self {
            Bonded::Managed(_) => BondKind::Manage,
            Bonded::Used(_) => BondKind::Use,
            Bonded::Temporary(_) => BondKind::Temporary,
        }
    }

    /// The shared handle, for used and temporary targets.
    pub fn shared(&self) -> Option<&SharedWave> {
        match self {
            Bonded::Managed(_) => None,
            Bonded::Used(shared) | Bonded::Temporary(shared) => Some(shared),
        }
    }

    /// Run `f` on the target. Shared targets are locked without blocking.
    pub fn with_wave<R>(&self, f: impl FnOnce(&dyn Wave) -> R) -> Result<R> {
        match self {
            Bonded::Managed(wave) => Ok(f(wave.as_ref())),
            Bonded::Used(shared) | Bonded::Temporary(shared) => {
                let guard = try_lock(shared)?;
                Ok(f(&*guard))
            }
        }
    }

    pub fn with_wave_mut<R>(&mut self, f: impl FnOnce(&mut dyn Wave) -> R) -> Result<R> {
        match self {
            Bonded::Managed(wave) => Ok(f(wave.as_mut())),
            Bonded::Used(shared) | Bonded::Temporary(shared) => {
                let mut guard = try_lock(shared)?;
                Ok(f(&mut *guard))
            }
        }
    }
}

impl fmt::Debug for Bonded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bonded").field(&self.kind()).finish()
    }
}

fn try_lock(shared: &SharedWave) -> Result<std::sync::MutexGuard<'_, dyn Wave>> {
    shared.try_lock().map_err(|e| match e {
        TryLockError::WouldBlock => ValenceError::unavailable("shared wave is locked elsewhere"),
        TryLockError::Poisoned(_) => ValenceError::unavailable("shared wave is poisoned"),
    })
}

/// A formed bond: a type tag and its target.
pub struct Bond {
    tag: AtomicNumber,
    bonded: Bonded,
}

impl Bond {
    pub fn new(tag: AtomicNumber, bonded: Bonded) -> Result<Self> {
        if !tag.is_valid() {
            return Err(ValenceError::invalid_argument("cannot bond the invalid atomic number"));
        }
        Ok(Self::from_parts(tag, bonded))
    }

    /// Assemble a bond whose tag the caller has already checked.
    pub(crate) fn from_parts(tag: AtomicNumber, bonded: Bonded) -> Self {
        Self { tag, bonded }
    }

    pub fn tag(&self) -> AtomicNumber {
        self.tag
    }

    pub fn kind(&self) -> BondKind {
        self.bonded.kind()
    }

    pub fn bonded(&self) -> &Bonded {
        &self.bonded
    }

    pub fn bonded_mut(&mut self) -> &mut Bonded {
        &mut self.bonded
    }

    pub fn into_bonded(self) -> Bonded {
        self.bonded
    }

    pub fn properties(&self) -> Result<Properties> {
        self.bonded.with_wave(|wave| wave.properties())
    }

    pub fn type_name(&self) -> Result<&'static str> {
        self.bonded.with_wave(|wave| wave.type_name())
    }

    /// Forward `phase` with `signal` if the target resonates with `source`.
    ///
    /// Returns whether the target resonated. A refusal from the target, or a
    /// shared target that cannot be locked, is an error.
    pub fn propagate(&mut self, source: &dyn Wave, signal: &dyn Wave, phase: Phase) -> Result<bool> {
        self.bonded.with_wave_mut(|target| {
            if !resonates(&*target, source) {
                return Ok(false);
            }
            phase.apply(target, signal).map(|()| true)
        })?
    }
}

impl fmt::Debug for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bond")
            .field("tag", &self.tag)
            .field("kind", &self.kind())
            .finish()
    }
}
