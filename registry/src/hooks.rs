//! Object-level hooks.
//!
//! Types opt into hooks through a [`TypeHooks`] capability set stored on the
//! [`crate::TypeDef`]. Hooks are synchronous: they must not perform I/O or
//! block, and they run once per write.

use std::fmt;
use std::sync::Arc;

use ward_core::{AssignmentSet, ErrorSink, OperationKind};

/// Mutation step run before validation. May insert or overwrite assignments.
pub trait PreWriteHook: Send + Sync {
    fn pre_write(&self, op: OperationKind, assignments: &mut AssignmentSet);
}

impl<F> PreWriteHook for F
where
    F: Fn(OperationKind, &mut AssignmentSet) + Send + Sync,
{
    fn pre_write(&self, op: OperationKind, assignments: &mut AssignmentSet) {
        self(op, assignments)
    }
}

/// Cross-field check run after the field-rule pass.
///
/// Receives the field-pass result and returns the final verdict. A hook that
/// introduces a new failure reason should push a message to `errors`.
pub trait PostValidationHook: Send + Sync {
    fn post_validation(
        &self,
        op: OperationKind,
        assignments: &AssignmentSet,
        field_pass_valid: bool,
        errors: &mut ErrorSink,
    ) -> bool;
}

impl<F> PostValidationHook for F
where
    F: Fn(OperationKind, &AssignmentSet, bool, &mut ErrorSink) -> bool + Send + Sync,
{
    fn post_validation(
        &self,
        op: OperationKind,
        assignments: &AssignmentSet,
        field_pass_valid: bool,
        errors: &mut ErrorSink,
    ) -> bool {
        self(op, assignments, field_pass_valid, errors)
    }
}

/// The hooks a type provides. Both are optional.
#[derive(Clone, Default)]
pub struct TypeHooks {
    pub pre_write: Option<Arc<dyn PreWriteHook>>,
    pub post_validation: Option<Arc<dyn PostValidationHook>>,
}

impl TypeHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pre_write(&self) -> bool {
        self.pre_write.is_some()
    }

    pub fn has_post_validation(&self) -> bool {
        self.post_validation.is_some()
    }
}

impl fmt::Debug for TypeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHooks")
            .field("pre_write", &self.has_pre_write())
            .field("post_validation", &self.has_post_validation())
            .finish()
    }
}
