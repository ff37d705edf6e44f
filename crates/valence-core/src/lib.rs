//! # Valence Core
//!
//! Storage and bonding substrate for Valence.
//!
//! The crate is built in layers, each usable on its own:
//!
//! - **SlotStore** — growable slot storage with free-list reuse and stable indices
//! - **Arrangement** — a typed collection over a slot store
//! - **Cursor** — a bidirectional position in a store, re-validated on every step
//! - **Wave** — a value that declares capability tags and can resonate
//! - **Bond** — an association from a type tag to a managed or shared wave
//! - **Atom** — the owner of bonds, forwarding signals to resonant targets
//!
//! ## Quick Start
//!
//! ```rust
//! use valence_core::prelude::*;
//!
//! let mut table = PeriodicTable::new();
//! let energy = table.assign_tag("Energy").unwrap();
//!
//! let mut cell = Atom::new("cell");
//! cell.form(energy, Bonded::manage(Quantum::new(10i64))).unwrap();
//!
//! let forwarded = cell.attenuate(&Quantum::new(5i64)).unwrap();
//! assert_eq!(forwarded, 1);
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod slot_store;
pub mod arrangement;
pub mod cursor;
pub mod wave;
pub mod quantum;
pub mod periodic_table;
pub mod bond;
pub mod atom;
pub mod thread_guard;
pub mod prelude;
