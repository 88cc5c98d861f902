//! Validation run results.

use ward_core::ErrorSink;

/// Outcome of one validation of one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRun {
    /// Whether the write may proceed.
    pub valid: bool,
    /// Failure messages, in evaluation order.
    pub errors: Vec<String>,
    /// Properties with at least one failed rule, in declaration order.
    pub invalid_properties: Vec<String>,
}

impl ValidationRun {
    /// A run with no failures.
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            invalid_properties: Vec::new(),
        }
    }

    /// A run that failed with the given messages.
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            invalid_properties: Vec::new(),
        }
    }

    /// Build from collected messages. Valid exactly when there are none.
    pub fn from_sink(errors: ErrorSink, invalid_properties: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors: errors.into_messages(),
            invalid_properties,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Fold another run into this one. The result is valid only if both were.
    pub fn merge(&mut self, other: ValidationRun) {
        self.valid = self.valid && other.valid;
        self.errors.extend(other.errors);
        for property in other.invalid_properties {
            if !self.invalid_properties.contains(&property) {
                self.invalid_properties.push(property);
            }
        }
    }
}
