//! Quantum — a plain value wrapped as a linear wave.

use crate::error::{Result, ValenceError};
use crate::wave::{Properties, Property, Wave};
use std::any::type_name;
use std::ops::{AddAssign, SubAssign};

/// A value that accumulates signals of its own type.
///
/// Attenuating with another `Quantum<T>` adds its value; disattenuating
/// subtracts it. Any other signal is an [`ValenceError::IncompatibleSignal`].
#[derive(Debug, Clone, PartialEq)]
pub struct Quantum<T> {
    value: T,
    properties: Properties,
}

impl<T> Quantum<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            properties: Properties::from([Property::Linear]),
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Quantum<T>
where
    T: AddAssign + SubAssign + Clone + Send + 'static,
{
    fn expect_same<'s>(&self, signal: &'s dyn Wave) -> Result<&'s T> {
        signal
            .downcast_ref::<Quantum<T>>()
            .map(|quantum| &quantum.value)
            .ok_or_else(|| ValenceError::incompatible(type_name::<Quantum<T>>(), signal.type_name()))
    }
}

impl<T> Wave for Quantum<T>
where
    T: AddAssign + SubAssign + Clone + Send + 'static,
{
    fn properties(&self) -> Properties {
        self.properties.clone()
    }

    fn attenuate(&mut self, signal: &dyn Wave) -> Result<()> {
        let delta = self.expect_same(signal)?.clone();
        self.value += delta;
        Ok(())
    }

    fn disattenuate(&mut self, signal: &dyn Wave) -> Result<()> {
        let delta = self.expect_same(signal)?.clone();
        self.value -= delta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_type_accumulates() {
        let mut energy = Quantum::new(10i64);
        energy.attenuate(&Quantum::new(5i64)).unwrap();
        assert_eq!(*energy.value(), 15);
        energy.disattenuate(&Quantum::new(7i64)).unwrap();
        assert_eq!(energy.into_inner(), 8);
    }

    #[test]
    fn value_can_be_set_in_place() {
        let mut energy = Quantum::new(3u32);
        *energy.value_mut() = 40;
        energy.attenuate(&Quantum::new(2u32)).unwrap();
        assert_eq!(*energy.value(), 42);
    }

    #[test]
    fn other_types_are_refused() {
        let mut energy = Quantum::new(1.5f64);
        let err = energy.attenuate(&Quantum::new(1u32)).unwrap_err();
        assert!(matches!(err, ValenceError::IncompatibleSignal { .. }));
        assert_eq!(*energy.value(), 1.5);
    }

    #[test]
    fn quanta_are_linear_by_default() {
        let q = Quantum::new(0u8);
        assert_eq!(Wave::properties(&q), Properties::from([Property::Linear]));

        let tagged = Quantum::new(0u8).with_properties(Properties::from([Property::Periodic]));
        assert!(!Wave::properties(&tagged).contains(&Property::Linear));
    }
}
