//! # Valence
//!
//! Slot-recycling storage and a runtime bonding substrate for biological
//! object models.
//!
//! Values live in slot stores addressed by stable integer indices. Atoms bond
//! capability-tagged values ("waves") under runtime type tags and forward
//! signals to every bonded wave that resonates with them.
//!
//! ## Quick Start
//!
//! ```rust
//! use valence::prelude::*;
//!
//! let mut table = PeriodicTable::new();
//! let energy = table.assign_tag("Energy").unwrap();
//! let charge = table.assign_tag("Charge").unwrap();
//!
//! // A managed quantum is owned by the atom; a shared one is only referenced.
//! let shared = share(Quantum::new(0i64));
//! let mut cell = Atom::new("cell");
//! cell.form(energy, Bonded::manage(Quantum::new(10i64))).unwrap();
//! cell.form(charge, Bonded::using(&shared)).unwrap();
//!
//! // Both quanta are Linear, so both receive the signal.
//! assert_eq!(cell.attenuate(&Quantum::new(5i64)).unwrap(), 2);
//!
//! // Forming a second bond for the same tag is refused and the value returned.
//! let rejected = cell.form(energy, Bonded::manage(Quantum::new(1i64))).unwrap_err();
//! assert_eq!(rejected.error(), &ValenceError::AlreadyBonded(energy));
//! ```
//!
//! ## Architecture
//!
//! - [`valence_core`] - Slot store, arrangements, cursors, waves, bonds and atoms
//!
//! ## Key Concepts
//!
//! | Concept | What It Is |
//! |---------|------------|
//! | Index | Stable handle to a slot; survives store growth |
//! | Cursor | Bidirectional position, re-validated on every step |
//! | Wave | A value with capability tags (`Linear`, `Periodic`, ...) |
//! | Resonance | Two waves share at least one tag |
//! | Bond | Type tag plus a managed, used or temporary target |
//! | Atom | Owner of bonds; forwards signals to resonant targets |
//!
//! ### Bond kinds
//!
//! - **Manage** - the atom owns the target and destroys it when the bond breaks
//! - **Use** - the target is shared and outlives the bond
//! - **Temporary** - like `Use`, for short-lived associations

pub use valence_core as core;

/// Prelude module for convenient imports.
///
/// ```rust
/// use valence::prelude::*;
/// ```
pub mod prelude {
    pub use valence_core::prelude::*;
}
