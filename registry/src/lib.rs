//! Ward Registry
//!
//! Explicit, one-time registration of record types, their properties, the
//! rules attached to each property and the type's hooks.
//!
//! - `types` - PropertyDescriptor, RuleSet, TypeDef
//! - `rule` - Rule, RuleKind, Gate, Bounds, Pattern, the CustomRule contract
//! - `hooks` - PreWriteHook, PostValidationHook and the TypeHooks capability set
//! - `builder` - RegistryBuilder/TypeBuilder and configuration errors
//! - `registry` - the immutable Registry

mod builder;
mod hooks;
mod registry;
mod rule;
mod types;

pub use builder::{RegistryBuilder, RegistryError, TypeBuilder};
pub use hooks::{PostValidationHook, PreWriteHook, TypeHooks};
pub use registry::Registry;
pub use rule::{Bounds, CustomRule, Gate, Pattern, Rule, RuleKind};
pub use types::{PropertyDescriptor, RuleSet, TypeDef};
