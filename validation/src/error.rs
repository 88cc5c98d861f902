//! Pipeline errors.

use std::fmt;
use thiserror::Error;

/// Which hook a contract violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    PreWrite,
    PostValidation,
}

impl HookStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookStage::PreWrite => "pre-write",
            HookStage::PostValidation => "post-validation",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while running the validation pipeline.
///
/// Rule failures are not errors; they are reported through `ValidationRun`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{hook} hook of type '{type_name}' violated its contract: {reason}")]
    HookContractViolation {
        type_name: String,
        hook: HookStage,
        reason: String,
    },
}

impl PipelineError {
    pub fn hook_contract_violation(
        type_name: impl Into<String>,
        hook: HookStage,
        reason: impl Into<String>,
    ) -> Self {
        Self::HookContractViolation {
            type_name: type_name.into(),
            hook,
            reason: reason.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
