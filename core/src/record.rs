//! Stored records.

use crate::{Attributes, RecordId, TypeId, Value};

/// A persisted record of a registered type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique identifier for this record.
    pub id: RecordId,
    /// Type of this record (reference to registry).
    pub type_id: TypeId,
    /// Bumped on every successful write after the first.
    pub version: u64,
    /// Stored property values. Unset properties have no entry.
    pub attributes: Attributes,
}

impl Record {
    pub fn new(id: RecordId, type_id: TypeId, attributes: Attributes) -> Self {
        Self {
            id,
            type_id,
            version: 1,
            attributes,
        }
    }

    /// Get a stored value by property name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Apply a set of written values in one step.
    pub fn apply(&mut self, values: Attributes) {
        if values.is_empty() {
            return;
        }
        self.attributes.extend(values);
        self.version += 1;
    }
}
