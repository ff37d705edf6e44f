//! Valence Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use valence_core::prelude::*;
//! ```

// Handles and identities
pub use crate::types::{AtomId, AtomicNumber, BondKind, Index};

// Storage
pub use crate::slot_store::{Container, SlotStore};
pub use crate::arrangement::Arrangement;
pub use crate::cursor::{Cursor, CursorState};

// Resonance
pub use crate::wave::{resonance_between, resonates, share, Carrier, Properties, Property, SharedWave, Wave};
pub use crate::quantum::Quantum;
pub use crate::periodic_table::PeriodicTable;

// Bonding
pub use crate::bond::{Bond, Bonded, Phase};
pub use crate::atom::{Atom, AtomSnapshot, BondFailure, BondSnapshot, FormRejection, PropagationReport};
pub use crate::thread_guard::ThreadGuard;

// Configuration and errors
pub use crate::config::{AtomConfig, LoggingConfig, StoreConfig, ValenceConfig};
pub use crate::error::{Result, ValenceError};
