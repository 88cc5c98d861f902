//! Per-write pipeline: pre-write hook, field rules, post-validation hook.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use ward_core::{AssignmentSet, ErrorSink, OperationKind};
use ward_registry::TypeDef;

use crate::catalog;
use crate::engine::run_validation;
use crate::error::{HookStage, PipelineError, PipelineResult};
use crate::run::ValidationRun;

/// How hook contract violations are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookPolicy {
    /// Longest a single hook call may take. Checked after the call returns.
    pub time_budget: Option<Duration>,
    /// Turn hook panics into `HookContractViolation` instead of unwinding.
    pub catch_panics: bool,
}

impl Default for HookPolicy {
    fn default() -> Self {
        Self {
            time_budget: None,
            catch_panics: true,
        }
    }
}

impl HookPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }
}

/// Run the full pipeline for one write.
///
/// The pre-write hook may change `assignments`; those changes are what the
/// field rules see and what the caller should persist. The post-validation
/// hook has the final word on `valid`.
pub fn validate_write(
    op: OperationKind,
    type_def: &TypeDef,
    assignments: &mut AssignmentSet,
    policy: &HookPolicy,
) -> PipelineResult<ValidationRun> {
    let hooks = type_def.hooks();

    if let Some(hook) = &hooks.pre_write {
        debug!(type_name = %type_def.name, operation = %op, "running pre-write hook");
        guarded(type_def, HookStage::PreWrite, policy, || {
            hook.pre_write(op, assignments)
        })?;
    }

    let mut run = run_validation(op, type_def, assignments);

    if let Some(hook) = &hooks.post_validation {
        debug!(
            type_name = %type_def.name,
            operation = %op,
            field_pass_valid = run.valid,
            "running post-validation hook"
        );
        let field_pass_valid = run.valid;
        let mut errors = ErrorSink::from(std::mem::take(&mut run.errors));
        let assignments: &AssignmentSet = assignments;
        let valid = guarded(type_def, HookStage::PostValidation, policy, || {
            hook.post_validation(op, assignments, field_pass_valid, &mut errors)
        })?;

        if !valid && errors.is_empty() {
            errors.push(catalog::invalid_message(&type_def.name));
        }
        run.valid = valid;
        run.errors = errors.into_messages();
    }

    Ok(run)
}

/// Call a hook under the contract policy.
fn guarded<T>(
    type_def: &TypeDef,
    stage: HookStage,
    policy: &HookPolicy,
    call: impl FnOnce() -> T,
) -> PipelineResult<T> {
    let started = Instant::now();

    let output = if policy.catch_panics {
        panic::catch_unwind(AssertUnwindSafe(call)).map_err(|payload| {
            let reason = format!("panicked: {}", panic_message(payload.as_ref()));
            violation(type_def, stage, reason)
        })?
    } else {
        call()
    };

    if let Some(budget) = policy.time_budget {
        let elapsed = started.elapsed();
        if elapsed > budget {
            let reason = format!(
                "took {}ms, exceeding the {}ms budget",
                elapsed.as_millis(),
                budget.as_millis()
            );
            return Err(violation(type_def, stage, reason));
        }
    }

    Ok(output)
}

fn violation(type_def: &TypeDef, stage: HookStage, reason: String) -> PipelineError {
    warn!(type_name = %type_def.name, hook = %stage, %reason, "hook contract violation");
    PipelineError::hook_contract_violation(type_def.name.clone(), stage, reason)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
