//! PeriodicTable — the registry that issues atomic numbers for type names.
//!
//! One table is created by whoever assembles the system and passed to the
//! components that need names resolved. Numbers are issued from 1 upward and
//! are never reused.

use crate::error::{Result, ValenceError};
use crate::types::AtomicNumber;
use std::collections::HashMap;
use tracing::debug;

/// Name to [`AtomicNumber`] registry.
#[derive(Debug, Default)]
pub struct PeriodicTable {
    numbers: HashMap<String, AtomicNumber>,
    /// Names by atomic number; slot 0 is the invalid number and stays unused.
    names: Vec<String>,
}

impl PeriodicTable {
    pub fn new() -> Self {
        Self {
            numbers: HashMap::new(),
            names: vec![String::new()],
        }
    }

    /// The number for `name`, issuing a new one if needed.
    pub fn assign_tag(&mut self, name: &str) -> Result<AtomicNumber> {
        if name.is_empty() {
            return Err(ValenceError::invalid_argument("type name is empty"));
        }
        if let Some(number) = self.numbers.get(name) {
            return Ok(*number);
        }
        if self.names.is_empty() {
            self.names.push(String::new());
        }

        let raw = u16::try_from(self.names.len()).map_err(|_| ValenceError::TagSpaceExhausted)?;
        let number = AtomicNumber::new(raw);
        self.names.push(name.to_string());
        self.numbers.insert(name.to_string(), number);
        debug!(%number, name, "assigned atomic number");
        Ok(number)
    }

    /// The number for `name`, without issuing one.
    pub fn lookup_tag(&self, name: &str) -> Option<AtomicNumber> {
        self.numbers.get(name).copied()
    }

    /// The number for Rust type `T`, keyed by its type name.
    pub fn assign_type<T: ?Sized>(&mut self) -> Result<AtomicNumber> {
        self.assign_tag(std::any::type_name::<T>())
    }

    pub fn lookup_type<T: ?Sized>(&self) -> Option<AtomicNumber> {
        self.lookup_tag(std::any::type_name::<T>())
    }

    /// The name registered under `number`.
    pub fn name_of(&self, number: AtomicNumber) -> Option<&str> {
        if !number.is_valid() {
            return None;
        }
        self.names.get(usize::from(number.get())).map(String::as_str)
    }

    /// Number of issued atomic numbers.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_start_at_one_and_are_stable() {
        let mut table = PeriodicTable::new();
        let hydrogen = table.assign_tag("Hydrogen").unwrap();
        let helium = table.assign_tag("Helium").unwrap();

        assert_eq!(hydrogen, AtomicNumber::new(1));
        assert_eq!(helium, AtomicNumber::new(2));
        assert_eq!(table.assign_tag("Hydrogen").unwrap(), hydrogen);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn lookup_never_creates() {
        let mut table = PeriodicTable::new();
        assert_eq!(table.lookup_tag("Carbon"), None);
        assert!(table.is_empty());

        let carbon = table.assign_tag("Carbon").unwrap();
        assert_eq!(table.lookup_tag("Carbon"), Some(carbon));
        assert_eq!(table.name_of(carbon), Some("Carbon"));
    }

    #[test]
    fn invalid_number_has_no_name() {
        let table = PeriodicTable::new();
        assert_eq!(table.name_of(AtomicNumber::INVALID), None);
        assert_eq!(table.name_of(AtomicNumber::new(5)), None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut table = PeriodicTable::new();
        assert!(matches!(
            table.assign_tag(""),
            Err(ValenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn default_table_issues_from_one() {
        let mut table = PeriodicTable::default();
        assert_eq!(table.assign_tag("Oxygen").unwrap(), AtomicNumber::new(1));
    }

    #[test]
    fn types_register_by_rust_name() {
        struct Ribosome;
        let mut table = PeriodicTable::new();
        let number = table.assign_type::<Ribosome>().unwrap();
        assert_eq!(table.lookup_type::<Ribosome>(), Some(number));
        assert!(table.name_of(number).unwrap().ends_with("Ribosome"));
        assert_eq!(table.lookup_type::<u8>(), None);
    }

    #[test]
    fn tag_space_runs_out() {
        let mut table = PeriodicTable::new();
        for n in 1..=u16::MAX as usize {
            table.assign_tag(&format!("t{n}")).unwrap();
        }
        assert_eq!(
            table.assign_tag("overflow"),
            Err(ValenceError::TagSpaceExhausted)
        );
        assert_eq!(table.lookup_tag("t65535"), Some(AtomicNumber::new(u16::MAX)));
    }
}
