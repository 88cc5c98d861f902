//! Per-write assignment tracking.
//!
//! An [`AssignmentSet`] records, for one write, which properties the caller
//! touched and with what value. A property that was never touched is
//! [`Assignment::Unset`]; one explicitly assigned null is
//! [`Assignment::ExplicitNull`]. Rules rely on the difference.

use crate::{Attributes, Value};
use std::collections::BTreeMap;

/// Tri-state assignment of one property in one write.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// The property was not touched by this write.
    Unset,
    /// The property was explicitly assigned null.
    ExplicitNull,
    /// The property was assigned a non-null value.
    Value(Value),
}

impl Assignment {
    /// Build an assignment from a caller-supplied value. Null maps to `ExplicitNull`.
    pub fn from_value(value: Value) -> Self {
        if value.is_null() {
            Assignment::ExplicitNull
        } else {
            Assignment::Value(value)
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Assignment::Unset)
    }

    pub fn is_explicit_null(&self) -> bool {
        matches!(self, Assignment::ExplicitNull)
    }

    /// The assigned value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Assignment::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// The assignments of a single write, keyed by property name.
///
/// Entries are never removed: a hook can overwrite an assignment but the set
/// of touched properties only grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentSet {
    entries: BTreeMap<String, Assignment>,
}

impl AssignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an explicit value set. Every key present is considered assigned.
    pub fn from_attributes(values: Attributes) -> Self {
        let entries = values
            .into_iter()
            .map(|(name, value)| (name, Assignment::from_value(value)))
            .collect();
        Self { entries }
    }

    /// Assign a value. `Value::Null` records an explicit null.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .insert(property.into(), Assignment::from_value(value.into()));
    }

    /// Explicitly assign null.
    pub fn set_null(&mut self, property: impl Into<String>) {
        self.entries.insert(property.into(), Assignment::ExplicitNull);
    }

    /// Get the assignment for a property. Untouched properties are `Unset`.
    pub fn get(&self, property: &str) -> &Assignment {
        static UNSET: Assignment = Assignment::Unset;
        self.entries.get(property).unwrap_or(&UNSET)
    }

    /// Apply overrides. Keys absent from `overrides` keep their assignment.
    pub fn merge(&mut self, overrides: AssignmentSet) {
        self.entries.extend(overrides.entries);
    }

    pub fn contains(&self, property: &str) -> bool {
        self.entries.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over touched properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert into the value map handed to storage. Explicit nulls become
    /// `Value::Null`.
    pub fn into_attributes(self) -> Attributes {
        self.entries
            .into_iter()
            .filter_map(|(name, assignment)| match assignment {
                Assignment::Unset => None,
                Assignment::ExplicitNull => Some((name, Value::Null)),
                Assignment::Value(v) => Some((name, v)),
            })
            .collect()
    }
}
