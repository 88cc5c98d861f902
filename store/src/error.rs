//! Store error types.

use thiserror::Error;
use ward_core::RecordId;
use ward_validation::{HookStage, PipelineError};

use crate::failure::ValidationFailure;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when writing through the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Unknown property: {property} on type {type_name}")]
    UnknownProperty { type_name: String, property: String },

    #[error("Invalid property type: expected {expected}, got {actual} for {property}")]
    InvalidPropertyType {
        property: String,
        expected: String,
        actual: String,
    },

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Cannot store null: {property} on type {type_name}")]
    NullViolation { type_name: String, property: String },

    #[error("Validation failed for {} {}: {}", .0.operation, .0.type_name, .0.errors.join(" "))]
    ValidationFailed(ValidationFailure),

    #[error("{hook} hook of type '{type_name}' violated its contract: {reason}")]
    HookContractViolation {
        type_name: String,
        hook: HookStage,
        reason: String,
    },
}

impl StoreError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn invalid_property_type(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidPropertyType {
            property: property.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn null_violation(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::NullViolation {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    /// The client payload, if this is a validation failure.
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::ValidationFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<PipelineError> for StoreError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::HookContractViolation {
                type_name,
                hook,
                reason,
            } => Self::HookContractViolation {
                type_name,
                hook,
                reason,
            },
        }
    }
}
