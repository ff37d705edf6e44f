//! Waves — capability-tagged values that can resonate.
//!
//! Any value can declare a set of [`Property`] tags. Two waves resonate when
//! their tag sets intersect. Resonance is a coarse filter for "these two are
//! willing to interoperate", not a proof of type compatibility.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A capability tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Additive values; signals accumulate.
    Linear,
    /// Values driven by a recurring clock.
    Periodic,
    /// Containers of other waves.
    Structural,
    /// Units of behavior that respond to excitation.
    Motif,
    /// Domain-specific tag.
    Custom(String),
}

impl Property {
    pub fn custom(name: impl Into<String>) -> Self {
        Property::Custom(name.into())
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Linear => f.write_str("Linear"),
            Property::Periodic => f.write_str("Periodic"),
            Property::Structural => f.write_str("Structural"),
            Property::Motif => f.write_str("Motif"),
            Property::Custom(name) => f.write_str(name),
        }
    }
}

/// A declared set of capability tags.
pub type Properties = BTreeSet<Property>;

/// Upcast to [`Any`] for downcasting waves to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value that declares capabilities and accepts forwarded operations.
pub trait Wave: AsAny + Send {
    /// The capability tags this wave declares.
    fn properties(&self) -> Properties;

    /// Name of the concrete type, used for diagnostics and name lookups.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Apply a signal.
    fn attenuate(&mut self, signal: &dyn Wave) -> Result<()> {
        let _ = signal;
        Ok(())
    }

    /// Withdraw a previously applied signal.
    fn disattenuate(&mut self, signal: &dyn Wave) -> Result<()> {
        let _ = signal;
        Ok(())
    }

    /// The wave carried by this one, if it is a carrier.
    fn demodulate(&self) -> Option<&dyn Wave> {
        None
    }
}

impl<'a> dyn Wave + 'a {
    pub fn is<W: Wave>(&self) -> bool {
        self.as_any().is::<W>()
    }

    pub fn downcast_ref<W: Wave>(&self) -> Option<&W> {
        self.as_any().downcast_ref::<W>()
    }

    pub fn downcast_mut<W: Wave>(&mut self) -> Option<&mut W> {
        self.as_any_mut().downcast_mut::<W>()
    }
}

impl<'a> fmt::Debug for dyn Wave + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wave")
            .field("type", &self.type_name())
            .field("properties", &self.properties())
            .finish()
    }
}

/// A wave owned elsewhere and referenced by bonds.
pub type SharedWave = Arc<Mutex<dyn Wave>>;

/// Wrap a wave for shared (Use/Temporary) bonding.
pub fn share<W: Wave>(wave: W) -> SharedWave {
    Arc::new(Mutex::new(wave))
}

/// The tags two waves have in common.
pub fn resonance_between(a: &dyn Wave, b: &dyn Wave) -> Properties {
    let theirs = b.properties();
    a.properties()
        .into_iter()
        .filter(|property| theirs.contains(property))
        .collect()
}

/// Whether two waves share at least one tag. Symmetric.
pub fn resonates(a: &dyn Wave, b: &dyn Wave) -> bool {
    !resonance_between(a, b).is_empty()
}

/// A wave that carries another.
///
/// Resonance is judged on the carrier's own properties; bonded waves receive
/// the payload.
pub struct Carrier {
    properties: Properties,
    payload: Box<dyn Wave>,
}

impl Carrier {
    pub fn new(properties: Properties, payload: impl Wave) -> Self {
        Self {
            properties,
            payload: Box::new(payload),
        }
    }

    pub fn payload(&self) -> &dyn Wave {
        self.payload.as_ref()
    }
}

impl Wave for Carrier {
    fn properties(&self) -> Properties {
        self.properties.clone()
    }

    fn demodulate(&self) -> Option<&dyn Wave> {
        Some(self.payload.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged(Properties);

    impl Wave for Tagged {
        fn properties(&self) -> Properties {
            self.0.clone()
        }
    }

    fn tagged(properties: &[Property]) -> Tagged {
        Tagged(properties.iter().cloned().collect())
    }

    #[test]
    fn shared_tag_resonates() {
        let a = tagged(&[Property::Linear, Property::Motif]);
        let b = tagged(&[Property::Linear]);
        assert!(resonates(&a, &b));
        assert_eq!(resonance_between(&a, &b), Properties::from([Property::Linear]));
    }

    #[test]
    fn disjoint_tags_do_not_resonate() {
        let a = tagged(&[Property::Linear]);
        let b = tagged(&[Property::Periodic, Property::custom("membrane")]);
        assert!(!resonates(&a, &b));
        assert!(!resonates(&b, &a));
    }

    #[test]
    fn empty_sets_never_resonate() {
        let a = tagged(&[]);
        assert!(!resonates(&a, &a));
    }

    #[test]
    fn custom_tags_compare_by_name() {
        let a = tagged(&[Property::custom("membrane")]);
        let b = tagged(&[Property::custom("membrane")]);
        let c = tagged(&[Property::custom("cytosol")]);
        assert!(resonates(&a, &b));
        assert!(!resonates(&a, &c));
    }

    #[test]
    fn carrier_demodulates_to_payload() {
        let carrier = Carrier::new(
            Properties::from([Property::Periodic]),
            tagged(&[Property::Linear]),
        );
        let payload = carrier.demodulate().unwrap();
        assert!(payload.is::<Tagged>());
        assert!(payload.properties().contains(&Property::Linear));
        assert!(!carrier.properties().contains(&Property::Linear));
        assert!(carrier.payload().is::<Tagged>());
        assert!(tagged(&[]).demodulate().is_none());
    }

    #[test]
    fn downcast_through_shared_lock() {
        let shared = share(tagged(&[Property::Structural]));
        let mut guard = shared.lock().unwrap();
        assert!(guard.downcast_mut::<Tagged>().is_some());
        assert!(guard.type_name().ends_with("Tagged"));
    }
}
