//! Ward Store
//!
//! The persistence adapter: routes every validated write through the
//! validation pipeline before it reaches the record store, and exposes a
//! separate bypass path for unvalidated writes.
//!
//! - `context` - OperationContext (insert, update, validate, *_raw)
//! - `store` - in-memory RecordStore
//! - `failure` - ValidationFailure and its client payload
//! - `config` - ContextConfig
//! - `logging` - tracing subscriber setup

mod config;
mod context;
mod error;
mod failure;
pub mod logging;
mod store;

pub use config::{ContextConfig, CATCH_HOOK_PANICS_ENV, HOOK_BUDGET_ENV};
pub use context::OperationContext;
pub use error::{StoreError, StoreResult};
pub use failure::ValidationFailure;
pub use store::RecordStore;
