//! Error types for Valence operations.
//!
//! Everything except [`ValenceError::AllocationExhausted`] is recoverable and
//! returned as a value; callers are expected to check and branch.

use crate::types::{AtomicNumber, Index};
use thiserror::Error;

/// Result type for Valence operations.
pub type Result<T> = std::result::Result<T, ValenceError>;

/// Errors that can occur while storing, traversing or bonding values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValenceError {
    /// The index does not refer to an occupied slot.
    #[error("Invalid index: {0}")]
    InvalidIndex(Index),

    /// An argument was rejected before any state changed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A bond for this type tag is already formed.
    #[error("Type {0} is already bonded")]
    AlreadyBonded(AtomicNumber),

    /// No bond for this type tag exists.
    #[error("Type {0} is not bonded")]
    NotBonded(AtomicNumber),

    /// The store could not grow. Fatal.
    #[error("Allocation exhausted: requested {requested} slots (limit {limit})")]
    AllocationExhausted { requested: usize, limit: usize },

    /// The cursor does not point at a usable slot.
    #[error("Cursor is invalid")]
    InvalidCursor,

    /// The cursor was created for a different store.
    #[error("Cursor belongs to a different store")]
    ForeignCursor,

    /// At least one resonant bond refused a forwarded operation.
    #[error("Propagation failed for {failed} of {attempted} resonant bonds")]
    PropagationFailed { failed: usize, attempted: usize },

    /// A wave received a signal it cannot interpret.
    #[error("Incompatible signal: expected {expected}, found {found}")]
    IncompatibleSignal { expected: String, found: String },

    /// A shared wave or guarded value could not be locked.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The periodic table has issued every possible atomic number.
    #[error("Periodic table exhausted: no atomic numbers left")]
    TagSpaceExhausted,

    /// Configuration could not be read or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),
}

impl ValenceError {
    /// Whether the error must abort the operation rather than be branched on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ValenceError::AllocationExhausted { .. })
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ValenceError::InvalidArgument(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        ValenceError::Unavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ValenceError::Config(msg.into())
    }

    pub fn incompatible(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ValenceError::IncompatibleSignal {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<toml::de::Error> for ValenceError {
    fn from(e: toml::de::Error) -> Self {
        ValenceError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for ValenceError {
    fn from(e: toml::ser::Error) -> Self {
        ValenceError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_allocation_exhaustion_is_fatal() {
        let fatal = ValenceError::AllocationExhausted { requested: 8, limit: 4 };
        assert!(fatal.is_fatal());
        assert!(!ValenceError::InvalidIndex(Index::new(3)).is_fatal());
        assert!(!ValenceError::AlreadyBonded(AtomicNumber::new(2)).is_fatal());
        assert!(!ValenceError::PropagationFailed { failed: 1, attempted: 2 }.is_fatal());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = ValenceError::NotBonded(AtomicNumber::new(7));
        assert_eq!(err.to_string(), "Type #7 is not bonded");
        let err = ValenceError::InvalidIndex(Index::new(12));
        assert_eq!(err.to_string(), "Invalid index: 12");
    }
}
