//! Ward Core Types
//!
//! This crate provides the foundational types used throughout Ward:
//! - Identity types (RecordId, TypeId)
//! - Value types (the Value enum and declared ValueType)
//! - Operation kinds (Insert, Update) and operation sets
//! - Per-write assignment tracking (Assignment, AssignmentSet)
//! - Stored records
//! - The ErrorSink used by custom rules and hooks

mod assignment;
mod id;
mod operation;
mod record;
mod sink;
mod value;

pub use assignment::*;
pub use id::*;
pub use operation::*;
pub use record::*;
pub use sink::*;
pub use value::*;
