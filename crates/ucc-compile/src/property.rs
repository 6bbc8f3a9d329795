//! Typed property storage passed explicitly between passes.
//!
//! A [`PropertySet`] is owned by the caller and handed to each pass in turn;
//! passes never reach for global state. Each property is keyed by its Rust
//! type, so an analysis publishes a dedicated result type (for example
//! [`CommutationSets`]) and consumers look it up by that type.
//!
//! ```
//! use ucc_compile::PropertySet;
//!
//! #[derive(Debug, PartialEq)]
//! struct GateBudget(usize);
//!
//! let mut props = PropertySet::new();
//! props.insert(GateBudget(15));
//! assert_eq!(props.get::<GateBudget>(), Some(&GateBudget(15)));
//! ```
//!
//! [`CommutationSets`]: crate::commutation::CommutationSets

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;

/// Type-keyed bag of analysis results.
#[derive(Default)]
pub struct PropertySet {
    properties: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Remove a property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.properties
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Check whether a property of type `T` is present.
    pub fn contains<T: Any>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySet")
            .field("len", &self.properties.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_roundtrip() {
        let mut props = PropertySet::new();
        assert!(props.is_empty());

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        props.insert(CustomData(42));
        assert!(props.contains::<CustomData>());
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));

        props.insert(CustomData(7));
        assert_eq!(props.len(), 1);

        let removed = props.remove::<CustomData>();
        assert_eq!(removed, Some(CustomData(7)));
        assert_eq!(props.get::<CustomData>(), None);
    }
}
