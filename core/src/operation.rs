//! Write operation kinds and operation sets.

use serde::Serialize;
use std::fmt;

/// The kind of persistence write being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Update,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Update => "update",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subset of `{Insert, Update}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operations {
    insert: bool,
    update: bool,
}

impl Operations {
    /// Both inserts and updates.
    pub const ALL: Operations = Operations {
        insert: true,
        update: true,
    };
    /// Inserts only.
    pub const INSERT: Operations = Operations {
        insert: true,
        update: false,
    };
    /// Updates only.
    pub const UPDATE: Operations = Operations {
        insert: false,
        update: true,
    };
    /// Never applicable.
    pub const NONE: Operations = Operations {
        insert: false,
        update: false,
    };

    pub fn new(insert: bool, update: bool) -> Self {
        Self { insert, update }
    }

    pub fn contains(&self, op: OperationKind) -> bool {
        match op {
            OperationKind::Insert => self.insert,
            OperationKind::Update => self.update,
        }
    }

    pub fn with_insert(mut self, enabled: bool) -> Self {
        self.insert = enabled;
        self
    }

    pub fn with_update(mut self, enabled: bool) -> Self {
        self.update = enabled;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.insert && !self.update
    }
}

impl Default for Operations {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<OperationKind> for Operations {
    fn from(op: OperationKind) -> Self {
        match op {
            OperationKind::Insert => Self::INSERT,
            OperationKind::Update => Self::UPDATE,
        }
    }
}
