//! Atom — the unit that owns bonds and propagates signals through them.
//!
//! An atom holds at most one bond per atomic number. Signals arrive through
//! [`Atom::attenuate`] and [`Atom::disattenuate`]; every bond whose target
//! resonates with the signal gets the (demodulated) signal forwarded. An atom
//! is itself a [`Wave`], so atoms nest into larger structures.

use crate::arrangement::Arrangement;
use crate::bond::{Bond, Bonded, Phase};
use crate::config::{AtomConfig, StoreConfig, ValenceConfig};
use crate::error::{Result, ValenceError};
use crate::periodic_table::PeriodicTable;
use crate::types::{AtomId, AtomicNumber, BondKind, Index};
use crate::wave::{Properties, Property, Wave};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// An atom: a named, capability-tagged owner of bonds.
#[derive(Debug)]
pub struct Atom {
    id: AtomId,
    name: String,
    properties: Properties,
    bonds: Arrangement<Bond>,
}

/// A refused [`Atom::form`]. The target is handed back untouched.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct FormRejection {
    error: ValenceError,
    bonded: Bonded,
}

impl FormRejection {
    pub(crate) fn new(error: ValenceError, bonded: Bonded) -> Self {
        Self { error, bonded }
    }

    pub fn error(&self) -> &ValenceError {
        &self.error
    }

    /// The target that was offered, still owned by the caller.
    pub fn into_inner(self) -> Bonded {
        self.bonded
    }

    pub fn into_parts(self) -> (ValenceError, Bonded) {
        (self.error, self.bonded)
    }
}

/// Converting drops the returned target; a managed one is destroyed.
impl From<FormRejection> for ValenceError {
    fn from(rejection: FormRejection) -> Self {
        rejection.error
    }
}

/// One bond that refused a forwarded signal.
#[derive(Debug, Clone, PartialEq)]
pub struct BondFailure {
    pub index: Index,
    pub tag: AtomicNumber,
    pub error: ValenceError,
}

/// Per-bond account of one propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationReport {
    pub phase: Phase,
    /// Bond indices in the order they were visited.
    pub visited: Vec<Index>,
    /// Bonds whose target resonated and accepted the signal.
    pub forwarded: usize,
    pub failures: Vec<BondFailure>,
}

impl PropagationReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            visited: Vec::new(),
            forwarded: 0,
            failures: Vec::new(),
        }
    }

    /// Bonds the signal was forwarded to or could not be checked against.
    pub fn attempted(&self) -> usize {
        self.forwarded + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Collapse into the aggregate result: the forward count, or
    /// [`ValenceError::PropagationFailed`].
    pub fn into_result(self) -> Result<usize> {
        if self.is_success() {
            Ok(self.forwarded)
        } else {
            Err(ValenceError::PropagationFailed {
                failed: self.failures.len(),
                attempted: self.attempted(),
            })
        }
    }
}

/// Serializable view of one bond.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondSnapshot {
    pub index: Index,
    pub tag: AtomicNumber,
    /// Registered name of the tag, if the table knows it.
    pub name: Option<String>,
    pub kind: BondKind,
    /// `None` when a shared target could not be locked.
    pub target_type: Option<String>,
    pub target_properties: Option<Properties>,
}

/// Serializable view of an atom and its bonds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomSnapshot {
    pub id: AtomId,
    pub name: String,
    pub properties: Properties,
    pub bonds: Vec<BondSnapshot>,
}

impl Atom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AtomId::new(),
            name: name.into(),
            properties: Properties::from([Property::Structural]),
            bonds: Arrangement::with_capacity(AtomConfig::default().bond_capacity),
        }
    }

    /// An atom whose bond store is sized by `atom` within the limits of `store`.
    pub fn with_config(name: impl Into<String>, atom: &AtomConfig, store: &StoreConfig) -> Result<Self> {
        Ok(Self {
            id: AtomId::new(),
            name: name.into(),
            properties: Properties::from([Property::Structural]),
            bonds: Arrangement::from_config(&atom.bond_store(store))?,
        })
    }

    pub fn from_config(name: impl Into<String>, config: &ValenceConfig) -> Result<Self> {
        Self::with_config(name, &config.atom, &config.store)
    }

    /// Replace the declared properties. Atoms are `Structural` by default.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_id(mut self, id: AtomId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> AtomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- Bonding ---

    /// Bond `bonded` under `tag`.
    ///
    /// Refused without touching the atom if `tag` is invalid or already
    /// bonded; the rejection carries the target back to the caller.
    pub fn form(&mut self, tag: AtomicNumber, bonded: Bonded) -> std::result::Result<Index, FormRejection> {
        if !tag.is_valid() {
            return Err(FormRejection::new(
                ValenceError::invalid_argument("cannot bond the invalid atomic number"),
                bonded,
            ));
        }
        if self.find_bond_by_tag(tag).is_some() {
            debug!(atom = %self.name, %tag, "form refused: already bonded");
            return Err(FormRejection::new(ValenceError::AlreadyBonded(tag), bonded));
        }

        let kind = bonded.kind();
        let index = self
            .bonds
            .try_add(Bond::from_parts(tag, bonded))
            .map_err(|(error, bond)| FormRejection::new(error, bond.into_bonded()))?;
        debug!(atom = %self.name, %tag, %kind, %index, "formed bond");
        Ok(index)
    }

    /// Break the bond for `tag`. A managed target is destroyed.
    pub fn break_bond(&mut self, tag: AtomicNumber) -> Result<()> {
        let bond = self.take_bond(tag)?;
        let destroys_target = bond.kind().owns_target();
        debug!(atom = %self.name, %tag, kind = %bond.kind(), destroys_target, "broke bond");
        Ok(())
    }

    /// Unbond `tag` and hand its target back instead of destroying it.
    pub fn release(&mut self, tag: AtomicNumber) -> Result<Bonded> {
        let bond = self.take_bond(tag)?;
        debug!(atom = %self.name, %tag, kind = %bond.kind(), "released bond");
        Ok(bond.into_bonded())
    }

    fn take_bond(&mut self, tag: AtomicNumber) -> Result<Bond> {
        self.find_bond_by_tag(tag)
            .and_then(|index| self.bonds.take(index))
            .ok_or(ValenceError::NotBonded(tag))
    }

    /// Break every bond.
    pub fn clear(&mut self) {
        debug!(atom = %self.name, bonds = self.bonds.len(), "clearing bonds");
        self.bonds.clear();
    }

    // --- Lookup ---

    pub fn find_bond_by_tag(&self, tag: AtomicNumber) -> Option<Index> {
        if !tag.is_valid() {
            return None;
        }
        self.bonds.find(|bond| bond.tag() == tag)
    }

    /// Find the bond whose tag `table` registered under `name`.
    pub fn find_bond_by_type_name(&self, table: &PeriodicTable, name: &str) -> Option<Index> {
        table
            .lookup_tag(name)
            .and_then(|tag| self.find_bond_by_tag(tag))
    }

    pub fn bond(&self, index: Index) -> Option<&Bond> {
        self.bonds.get(index)
    }

    pub fn bond_mut(&mut self, index: Index) -> Option<&mut Bond> {
        self.bonds.get_mut(index)
    }

    /// The bond formed for `tag`.
    pub fn bonded(&self, tag: AtomicNumber) -> Option<&Bond> {
        self.find_bond_by_tag(tag).and_then(|index| self.bonds.get(index))
    }

    pub fn is_bonded(&self, tag: AtomicNumber) -> bool {
        self.find_bond_by_tag(tag).is_some()
    }

    pub fn bonds(&self) -> &Arrangement<Bond> {
        &self.bonds
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    // --- Propagation ---

    /// Forward `phase` to every bond whose target resonates with `signal`.
    ///
    /// Bonds are walked from the last toward the first. A failing bond does
    /// not stop the walk; each failure is logged and recorded.
    pub fn propagate(&mut self, signal: &dyn Wave, phase: Phase) -> PropagationReport {
        let payload = signal.demodulate().unwrap_or(signal);
        let mut report = PropagationReport::new(phase);
        let mut cursor = self.bonds.end();

        while let Ok(Some(index)) = cursor.decrement(&self.bonds) {
            let Some(bond) = self.bonds.get_mut(index) else {
                continue;
            };
            report.visited.push(index);
            match bond.propagate(signal, payload, phase) {
                Ok(true) => {
                    trace!(atom = %self.name, tag = %bond.tag(), %phase, "forwarded");
                    report.forwarded += 1;
                }
                Ok(false) => {}
                Err(error) => {
                    warn!(atom = %self.name, tag = %bond.tag(), %phase, %error, "bond refused signal");
                    report.failures.push(BondFailure {
                        index,
                        tag: bond.tag(),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Apply `signal` to every resonant bond. Returns how many received it.
    pub fn attenuate(&mut self, signal: &dyn Wave) -> Result<usize> {
        self.propagate(signal, Phase::Attenuate).into_result()
    }

    /// Withdraw `signal` from every resonant bond.
    pub fn disattenuate(&mut self, signal: &dyn Wave) -> Result<usize> {
        self.propagate(signal, Phase::Disattenuate).into_result()
    }

    // --- Inspection ---

    pub fn snapshot(&self, table: &PeriodicTable) -> AtomSnapshot {
        let bonds = self
            .bonds
            .iter()
            .map(|(index, bond)| BondSnapshot {
                index,
                tag: bond.tag(),
                name: table.name_of(bond.tag()).map(str::to_string),
                kind: bond.kind(),
                target_type: bond.type_name().ok().map(str::to_string),
                target_properties: bond.properties().ok(),
            })
            .collect();

        AtomSnapshot {
            id: self.id,
            name: self.name.clone(),
            properties: self.properties.clone(),
            bonds,
        }
    }
}

impl Wave for Atom {
    fn properties(&self) -> Properties {
        self.properties.clone()
    }

    fn attenuate(&mut self, signal: &dyn Wave) -> Result<()> {
        self.propagate(signal, Phase::Attenuate).into_result().map(|_| ())
    }

    fn disattenuate(&mut self, signal: &dyn Wave) -> Result<()> {
        self.propagate(signal, Phase::Disattenuate).into_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::share;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Sensor {
        properties: Properties,
        seen: i32,
        dropped: Arc<AtomicBool>,
    }

    impl Sensor {
        fn linear() -> (Self, Arc<AtomicBool>) {
            let dropped = Arc::new(AtomicBool::new(false));
            let sensor = Self {
                properties: Properties::from([Property::Linear]),
                seen: 0,
                dropped: dropped.clone(),
            };
            (sensor, dropped)
        }
    }

    impl Drop for Sensor {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    impl Wave for Sensor {
        fn properties(&self) -> Properties {
            self.properties.clone()
        }

        fn attenuate(&mut self, _signal: &dyn Wave) -> Result<()> {
            self.seen += 1;
            Ok(())
        }

        fn disattenuate(&mut self, _signal: &dyn Wave) -> Result<()> {
            self.seen -= 1;
            Ok(())
        }
    }

    struct Refuser;

    impl Wave for Refuser {
        fn properties(&self) -> Properties {
            Properties::from([Property::Linear])
        }

        fn attenuate(&mut self, signal: &dyn Wave) -> Result<()> {
            Err(ValenceError::incompatible("nothing", signal.type_name()))
        }
    }

    fn seen(atom: &Atom, tag: AtomicNumber) -> i32 {
        atom.bonded(tag)
            .unwrap()
            .bonded()
            .with_wave(|w| w.downcast_ref::<Sensor>().map(|p| p.seen))
            .unwrap()
            .unwrap()
    }

    const X: AtomicNumber = AtomicNumber::new(1);
    const Y: AtomicNumber = AtomicNumber::new(2);
    const Z: AtomicNumber = AtomicNumber::new(3);

    #[test]
    fn second_form_on_same_tag_is_refused_and_returned() {
        let mut atom = Atom::new("cell");
        let (a, _) = Sensor::linear();
        let (b, b_dropped) = Sensor::linear();
        let shared = share(a);

        atom.form(X, Bonded::using(&shared)).unwrap();
        let rejection = atom.form(X, Bonded::manage(b)).unwrap_err();

        assert_eq!(rejection.error(), &ValenceError::AlreadyBonded(X));
        assert_eq!(atom.bond_count(), 1);
        assert_eq!(atom.bonded(X).unwrap().kind(), BondKind::Use);

        let returned = rejection.into_inner();
        assert_eq!(returned.kind(), BondKind::Manage);
        assert!(!b_dropped.load(Ordering::SeqCst));
        drop(returned);
        assert!(b_dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn breaking_a_managed_bond_destroys_the_target() {
        let mut atom = Atom::new("cell");
        let (a, dropped) = Sensor::linear();
        atom.form(X, Bonded::manage(a)).unwrap();

        assert!(!dropped.load(Ordering::SeqCst));
        atom.break_bond(X).unwrap();
        assert!(dropped.load(Ordering::SeqCst));
        assert_eq!(atom.find_bond_by_tag(X), None);
        assert_eq!(atom.break_bond(X), Err(ValenceError::NotBonded(X)));
    }

    #[test]
    fn breaking_a_used_bond_leaves_the_target() {
        let mut atom = Atom::new("cell");
        let (a, dropped) = Sensor::linear();
        let shared = share(a);
        atom.form(Y, Bonded::temporary(&shared)).unwrap();

        atom.break_bond(Y).unwrap();
        assert!(!dropped.load(Ordering::SeqCst));
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn release_hands_the_managed_target_back() {
        let mut atom = Atom::new("cell");
        let (a, dropped) = Sensor::linear();
        atom.form(X, Bonded::manage(a)).unwrap();

        let bonded = atom.release(X).unwrap();
        assert!(!dropped.load(Ordering::SeqCst));
        assert!(!atom.is_bonded(X));
        assert!(matches!(bonded, Bonded::Managed(_)));
    }

    #[test]
    fn invalid_tag_is_refused() {
        let mut atom = Atom::new("cell");
        let rejection = atom
            .form(AtomicNumber::INVALID, Bonded::manage(Refuser))
            .unwrap_err();
        assert!(matches!(rejection.error(), ValenceError::InvalidArgument(_)));
        assert_eq!(atom.bond_count(), 0);
        assert_eq!(atom.find_bond_by_tag(AtomicNumber::INVALID), None);
    }

    #[test]
    fn rejection_converts_to_error() {
        fn form_twice(atom: &mut Atom) -> Result<Index> {
            atom.form(Z, Bonded::manage(Refuser))?;
            Ok(atom.form(Z, Bonded::manage(Refuser))?)
        }
        let mut atom = Atom::new("cell");
        assert_eq!(form_twice(&mut atom), Err(ValenceError::AlreadyBonded(Z)));
    }

    #[test]
    fn attenuate_reaches_only_resonant_bonds() {
        let mut atom = Atom::new("cell");
        let (a, _) = Sensor::linear();
        let (mut b, _) = Sensor::linear();
        b.properties = Properties::from([Property::Periodic]);
        atom.form(X, Bonded::manage(a)).unwrap();
        atom.form(Y, Bonded::manage(b)).unwrap();

        let (signal, _) = Sensor::linear();
        assert_eq!(atom.attenuate(&signal), Ok(1));
        assert_eq!(seen(&atom, X), 1);
        assert_eq!(seen(&atom, Y), 0);

        assert_eq!(atom.disattenuate(&signal), Ok(1));
        assert_eq!(seen(&atom, X), 0);
    }

    #[test]
    fn every_resonant_bond_is_attempted_despite_failures() {
        let mut atom = Atom::new("cell");
        let (a, _) = Sensor::linear();
        let (c, _) = Sensor::linear();
        atom.form(X, Bonded::manage(a)).unwrap();
        atom.form(Y, Bonded::manage(Refuser)).unwrap();
        atom.form(Z, Bonded::manage(c)).unwrap();

        let (signal, _) = Sensor::linear();
        let report = atom.propagate(&signal, Phase::Attenuate);
        assert_eq!(report.forwarded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].tag, Y);
        assert_eq!(seen(&atom, X), 1);
        assert_eq!(seen(&atom, Z), 1);

        assert_eq!(
            atom.attenuate(&signal),
            Err(ValenceError::PropagationFailed { failed: 1, attempted: 3 })
        );
        assert_eq!(seen(&atom, X), 2);
    }

    #[test]
    fn traversal_runs_from_last_to_first() {
        let mut atom = Atom::new("cell");
        let indices: Vec<Index> = [X, Y, Z]
            .into_iter()
            .map(|tag| atom.form(tag, Bonded::manage(Refuser)).unwrap())
            .collect();

        let (signal, _) = Sensor::linear();
        let report = atom.propagate(&signal, Phase::Disattenuate);
        let mut expected = indices;
        expected.reverse();
        assert_eq!(report.visited, expected);
        assert!(report.is_success());
    }

    #[test]
    fn nested_atoms_forward_inward() {
        let mut inner = Atom::new("organelle").with_properties(Properties::from([Property::Linear]));
        let (a, _) = Sensor::linear();
        inner.form(X, Bonded::manage(a)).unwrap();

        let mut outer = Atom::new("cell");
        outer.form(Y, Bonded::manage(inner)).unwrap();

        let (signal, _) = Sensor::linear();
        assert_eq!(outer.attenuate(&signal), Ok(1));

        let inner_seen = outer
            .bonded(Y)
            .unwrap()
            .bonded()
            .with_wave(|w| w.downcast_ref::<Atom>().map(|atom| seen(atom, X)))
            .unwrap();
        assert_eq!(inner_seen, Some(1));
    }

    #[test]
    fn find_by_type_name_goes_through_the_table() {
        let mut table = PeriodicTable::new();
        let tag = table.assign_tag("Ribosome").unwrap();
        let mut atom = Atom::new("cell");
        let index = atom.form(tag, Bonded::manage(Refuser)).unwrap();

        assert_eq!(atom.find_bond_by_type_name(&table, "Ribosome"), Some(index));
        assert_eq!(atom.find_bond_by_type_name(&table, "Golgi"), None);
    }

    #[test]
    fn snapshot_names_bonds() {
        let mut table = PeriodicTable::new();
        let tag = table.assign_tag("Ribosome").unwrap();
        let mut atom = Atom::new("cell").with_id(AtomId::from_seed(7));
        atom.form(tag, Bonded::manage(Refuser)).unwrap();

        let snapshot = atom.snapshot(&table);
        assert_eq!(snapshot.id, AtomId::from_seed(7));
        assert_eq!(snapshot.bonds.len(), 1);
        assert_eq!(snapshot.bonds[0].name.as_deref(), Some("Ribosome"));
        assert!(snapshot.bonds[0].target_type.as_deref().unwrap().ends_with("Refuser"));
    }

    #[test]
    fn dropping_the_atom_destroys_managed_targets() {
        let (a, dropped) = Sensor::linear();
        let mut atom = Atom::new("cell");
        atom.form(X, Bonded::manage(a)).unwrap();
        drop(atom);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
