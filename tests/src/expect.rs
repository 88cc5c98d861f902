//! Expectations for verifying step results.

use ward_core::{RecordId, Value};
use ward_store::{RecordStore, StoreError};
use ward_validation::ValidationRun;

use crate::error::{ScenarioError, ScenarioResult};

/// What a successful step produced.
#[derive(Debug, Clone)]
pub enum StepOutput {
    Inserted(RecordId),
    Updated(RecordId),
    Validated(ValidationRun),
}

/// A complete expectation for a step result.
#[derive(Debug, Default)]
pub struct Expect {
    // Validation outcome
    accepted: Option<bool>,
    errors: Option<Vec<String>>,
    invalid_properties: Option<Vec<String>>,
    payload: Option<serde_json::Value>,

    // Store state after the step
    stored: Vec<(String, Option<Value>)>,
    record_count: Option<usize>,

    // Non-validation errors
    error: Option<String>,
    error_pattern: Option<String>,
}

impl Expect {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Builders ====================

    /// The write (or dry run) passed validation.
    pub fn accepted(mut self) -> Self {
        self.accepted = Some(true);
        self
    }

    /// The write (or dry run) failed validation.
    pub fn rejected(mut self) -> Self {
        self.accepted = Some(false);
        self
    }

    /// Failed validation with exactly these messages, in order.
    pub fn rejected_with<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted = Some(false);
        self.errors = Some(errors.into_iter().map(Into::into).collect());
        self
    }

    pub fn invalid_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invalid_properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    /// The client payload of the validation failure.
    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// After the step, the written record holds `value` for `property`.
    pub fn stored(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.stored.push((property.into(), Some(value.into())));
        self
    }

    /// After the step, the written record has no value for `property`.
    pub fn not_stored(mut self, property: impl Into<String>) -> Self {
        self.stored.push((property.into(), None));
        self
    }

    pub fn record_count(mut self, count: usize) -> Self {
        self.record_count = Some(count);
        self
    }

    /// The step failed with an error whose message contains `text`.
    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.error = Some(text.into());
        self
    }

    /// The step failed with an error whose message matches `pattern`.
    pub fn error_matching(mut self, pattern: impl Into<String>) -> Self {
        self.error_pattern = Some(pattern.into());
        self
    }

    // ==================== Verification ====================

    /// Verify the expectation against a step result and the store after it.
    pub fn verify(
        &self,
        step: &str,
        result: &Result<StepOutput, StoreError>,
        store: &RecordStore,
    ) -> ScenarioResult<()> {
        if let Some(count) = self.record_count {
            if store.len() != count {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} stored records, got {}", count, store.len()),
                ));
            }
        }

        if self.error.is_some() || self.error_pattern.is_some() {
            return self.verify_error(step, result);
        }

        let (valid, errors, invalid_properties, payload, record) = match result {
            Ok(StepOutput::Inserted(id)) | Ok(StepOutput::Updated(id)) => {
                (true, Vec::new(), Vec::new(), None, Some(*id))
            }
            Ok(StepOutput::Validated(run)) => (
                run.valid,
                run.errors.clone(),
                run.invalid_properties.clone(),
                None,
                None,
            ),
            Err(StoreError::ValidationFailed(failure)) => (
                false,
                failure.errors.clone(),
                failure.invalid_properties.clone(),
                Some(failure.to_payload()),
                None,
            ),
            Err(err) => {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("step failed: {}", err),
                ))
            }
        };

        if let Some(expected) = self.accepted {
            if valid != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "expected {}, got {} with errors {:?}",
                        verdict(expected),
                        verdict(valid),
                        errors
                    ),
                ));
            }
        }

        if let Some(ref expected) = self.errors {
            if *expected != errors {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected errors {:?}, got {:?}", expected, errors),
                ));
            }
        }

        if let Some(ref expected) = self.invalid_properties {
            if *expected != invalid_properties {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "expected invalid properties {:?}, got {:?}",
                        expected, invalid_properties
                    ),
                ));
            }
        }

        if let Some(ref expected) = self.payload {
            match payload {
                Some(ref actual) if actual == expected => {}
                Some(actual) => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected payload {}, got {}", expected, actual),
                    ))
                }
                None => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        "expected a failure payload, but the write was not rejected",
                    ))
                }
            }
        }

        if !self.stored.is_empty() {
            let record = record
                .and_then(|id| store.get(id))
                .ok_or_else(|| ScenarioError::assertion_failed(step, "no record was written"))?;
            for (property, expected) in &self.stored {
                let actual = record.get_attr(property);
                if actual != expected.as_ref() {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected {} = {:?}, got {:?}", property, expected, actual),
                    ));
                }
            }
        }

        Ok(())
    }

    fn verify_error(&self, step: &str, result: &Result<StepOutput, StoreError>) -> ScenarioResult<()> {
        let msg = match result {
            Err(err) => err.to_string(),
            Ok(output) => {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected an error, but step succeeded with {:?}", output),
                ))
            }
        };

        if let Some(ref expected) = self.error {
            if !msg.contains(expected.as_str()) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got: {}", expected, msg),
                ));
            }
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                ScenarioError::assertion_failed(step, format!("invalid regex pattern: {}", e))
            })?;
            if !re.is_match(&msg) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got: {}", pattern, msg),
                ));
            }
        }

        Ok(())
    }
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "accepted"
    } else {
        "rejected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::{OperationKind, TypeId};
    use ward_store::ValidationFailure;

    #[test]
    fn test_rejected_with_matches_failure() {
        let failure = ValidationFailure::new(
            "User",
            OperationKind::Insert,
            ValidationRun::failed(vec!["`email` is required.".to_string()]),
        );
        let result = Err(StoreError::ValidationFailed(failure));

        let expect = Expect::new().rejected_with(["`email` is required."]);
        assert!(expect.verify("insert", &result, &RecordStore::new()).is_ok());

        let expect = Expect::new().accepted();
        assert!(expect.verify("insert", &result, &RecordStore::new()).is_err());
    }

    #[test]
    fn test_stored_reads_record() {
        let mut store = RecordStore::new();
        let id = store.insert(TypeId::new(1), ward_core::attrs! { "name" => "Ada" });
        let result = Ok(StepOutput::Inserted(id));

        assert!(Expect::new()
            .stored("name", "Ada")
            .not_stored("age")
            .verify("insert", &result, &store)
            .is_ok());
        assert!(Expect::new()
            .stored("name", "Bob")
            .verify("insert", &result, &store)
            .is_err());
    }

    #[test]
    fn test_error_pattern() {
        let result = Err(StoreError::unknown_type("Ghost"));
        assert!(Expect::new()
            .error_matching("^Unknown type: G")
            .verify("insert", &result, &RecordStore::new())
            .is_ok());
    }
}
