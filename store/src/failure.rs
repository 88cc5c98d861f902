//! Client-facing validation failure.

use serde::Serialize;
use ward_core::OperationKind;
use ward_validation::ValidationRun;

/// A write rejected by validation. Serializes to the client payload
/// `{"type": ..., "operation": "insert" | "update", "errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    #[serde(rename = "type")]
    pub type_name: String,
    pub operation: OperationKind,
    pub errors: Vec<String>,
    #[serde(skip)]
    pub invalid_properties: Vec<String>,
}

impl ValidationFailure {
    pub fn new(type_name: impl Into<String>, operation: OperationKind, run: ValidationRun) -> Self {
        Self {
            type_name: type_name.into(),
            operation,
            errors: run.errors,
            invalid_properties: run.invalid_properties,
        }
    }

    /// The payload returned to clients.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "type": self.type_name,
            "operation": self.operation,
            "errors": self.errors,
        })
    }
}
