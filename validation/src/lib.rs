//! Ward Validation
//!
//! Evaluates registered rules and hooks against a write before it reaches
//! storage.
//!
//! - `catalog` - built-in rule evaluation and client-visible messages
//! - `engine` - the field-rule pass
//! - `pipeline` - pre-write hook, field rules, post-validation hook
//! - `run` - ValidationRun results

pub mod catalog;
mod engine;
mod error;
mod pipeline;
mod run;

pub use engine::run_validation;
pub use error::{HookStage, PipelineError, PipelineResult};
pub use pipeline::{validate_write, HookPolicy};
pub use run::ValidationRun;
