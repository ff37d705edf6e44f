//! Shared handle and identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Integer handle to a slot. Zero-based and stable across store growth.
///
/// There is no sentinel value: "no index" is `Option<Index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Index(usize);

impl Index {
    pub const fn new(position: usize) -> Self {
        Self(position)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for Index {
    fn from(position: usize) -> Self {
        Self(position)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runtime identifier for a bonded value's declared type.
///
/// Issued by a [`PeriodicTable`](crate::periodic_table::PeriodicTable);
/// [`AtomicNumber::INVALID`] is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomicNumber(u16);

impl AtomicNumber {
    pub const INVALID: AtomicNumber = AtomicNumber(0);

    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for AtomicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomId(pub Uuid);

impl AtomId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic ID for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u64_pair(seed, seed))
    }
}

impl Default for AtomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a slot store, used by cursors to refuse foreign stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(Uuid);

impl StoreId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a bond relates to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondKind {
    /// The bond owns the target and destroys it when broken.
    Manage,
    /// The bond references a target owned elsewhere.
    Use,
    /// Like `Use`, for short-lived associations.
    Temporary,
}

impl BondKind {
    /// Whether breaking the bond destroys its target.
    pub fn owns_target(&self) -> bool {
        matches!(self, BondKind::Manage)
    }
}

impl fmt::Display for BondKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BondKind::Manage => "manage",
            BondKind::Use => "use",
            BondKind::Temporary => "temporary",
        };
        f.write_str(name)
    }
}
