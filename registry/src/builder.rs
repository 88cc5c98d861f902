//! RegistryBuilder for constructing an immutable Registry.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use ward_core::{AssignmentSet, ErrorSink, OperationKind, TypeId, Value, ValueType};

use crate::hooks::{PostValidationHook, PreWriteHook, TypeHooks};
use crate::rule::{Bounds, Rule, RuleKind};
use crate::types::{PropertyDescriptor, RuleSet, TypeDef};
use crate::Registry;

/// Configuration errors detected while registering types.
///
/// Any of these is fatal to the type being registered: it never becomes
/// visible in the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate property: {property} on type {type_name}")]
    DuplicateProperty { type_name: String, property: String },

    #[error("Rule attached to unknown property: {property} on type {type_name}")]
    UnknownProperty { type_name: String, property: String },

    #[error(
        "Rule {rule} expects {expected} but property {property} on type {type_name} is declared {declared}"
    )]
    RuleTypeMismatch {
        type_name: String,
        property: String,
        rule: String,
        expected: String,
        declared: ValueType,
    },

    #[error("Invalid bounds for {property} on type {type_name}: {reason}")]
    InvalidBounds {
        type_name: String,
        property: String,
        reason: String,
    },

    #[error("One-of rule on {property} of type {type_name} has no options")]
    EmptyOptions { type_name: String, property: String },

    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl RegistryError {
    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn duplicate_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::DuplicateProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn rule_type_mismatch(
        type_name: impl Into<String>,
        property: impl Into<String>,
        rule: impl Into<String>,
        expected: impl Into<String>,
        declared: ValueType,
    ) -> Self {
        Self::RuleTypeMismatch {
            type_name: type_name.into(),
            property: property.into(),
            rule: rule.into(),
            expected: expected.into(),
            declared,
        }
    }

    pub fn invalid_bounds(
        type_name: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidBounds {
            type_name: type_name.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Types being built.
    types: HashMap<TypeId, TypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder {
            builder: self,
            name: name.into(),
            properties: Vec::new(),
            rules: Vec::new(),
            hooks: TypeHooks::new(),
        }
    }

    /// Get the ID of a type registered so far.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        debug!(types = self.types.len(), "registry built");
        Ok(Registry::new(self.types, self.type_names))
    }
}

/// Builder for a type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    name: String,
    properties: Vec<PropertyDescriptor>,
    rules: Vec<(String, Rule)>,
    hooks: TypeHooks,
}

impl<'a> TypeBuilder<'a> {
    /// Declare a property. Declaration order is validation order.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Attach a rule to a property. Rules on one property run in the order attached.
    pub fn rule(mut self, property: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((property.into(), rule));
        self
    }

    /// Install the pre-write hook.
    pub fn pre_write(mut self, hook: impl PreWriteHook + 'static) -> Self {
        self.hooks.pre_write = Some(Arc::new(hook));
        self
    }

    /// Install a pre-write hook from a closure.
    pub fn pre_write_fn<F>(self, f: F) -> Self
    where
        F: Fn(OperationKind, &mut AssignmentSet) + Send + Sync + 'static,
    {
        self.pre_write(f)
    }

    /// Install the post-validation hook.
    pub fn post_validation(mut self, hook: impl PostValidationHook + 'static) -> Self {
        self.hooks.post_validation = Some(Arc::new(hook));
        self
    }

    /// Install a post-validation hook from a closure.
    pub fn post_validation_fn<F>(self, f: F) -> Self
    where
        F: Fn(OperationKind, &AssignmentSet, bool, &mut ErrorSink) -> bool + Send + Sync + 'static,
    {
        self.post_validation(f)
    }

    /// Finish building this type.
    pub fn done(self) -> Result<TypeId, RegistryError> {
        // Check for duplicate name
        if self.builder.type_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateTypeName(self.name));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(RegistryError::duplicate_property(&self.name, &property.name));
            }
        }

        let mut rules = RuleSet::new();
        for (property_name, rule) in self.rules {
            let property = self
                .properties
                .iter()
                .find(|p| p.name == property_name)
                .ok_or_else(|| RegistryError::unknown_property(&self.name, &property_name))?;

            if !property.persistent {
                debug!(
                    type_name = %self.name,
                    property = %property_name,
                    rule = rule.kind().name(),
                    "ignoring rule on transient property"
                );
                continue;
            }

            check_rule(&self.name, property, &rule)?;
            rules.push(&property_name, rule);
        }

        let id = TypeId::new(self.builder.next_type_id);
        self.builder.next_type_id += 1;

        debug!(
            type_name = %self.name,
            properties = self.properties.len(),
            rules = rules.len(),
            pre_write = self.hooks.has_pre_write(),
            post_validation = self.hooks.has_post_validation(),
            "type registered"
        );

        let type_def = TypeDef::new(id, self.name.clone(), self.properties, rules, self.hooks);
        self.builder.type_names.insert(self.name, id);
        self.builder.types.insert(id, type_def);

        Ok(id)
    }
}

/// Check that a rule fits the property it is attached to.
fn check_rule(
    type_name: &str,
    property: &PropertyDescriptor,
    rule: &Rule,
) -> Result<(), RegistryError> {
    let declared = property.declared_type;
    let mismatch = |expected: &str| {
        RegistryError::rule_type_mismatch(
            type_name,
            &property.name,
            rule.kind().name(),
            expected,
            declared,
        )
    };

    match rule.kind() {
        RuleKind::Length(bounds) => {
            if !declared.is_textual() {
                return Err(mismatch("String"));
            }
            check_bounds(type_name, &property.name, bounds, |_| true, |a, b| Some(a.cmp(b)))
        }
        RuleKind::Range(bounds) => {
            if !declared.is_numeric() {
                return Err(mismatch("a numeric type"));
            }
            check_bounds(
                type_name,
                &property.name,
                bounds,
                |v| v.as_number().is_some(),
                Value::compare_numbers,
            )
        }
        RuleKind::Pattern(_) => {
            if !declared.is_textual() {
                return Err(mismatch("String"));
            }
            Ok(())
        }
        RuleKind::OneOf(options) => {
            if !declared.is_textual() {
                return Err(mismatch("String"));
            }
            if options.is_empty() {
                return Err(RegistryError::EmptyOptions {
                    type_name: type_name.to_string(),
                    property: property.name.clone(),
                });
            }
            Ok(())
        }
        RuleKind::Present | RuleKind::Absent => Ok(()),
        RuleKind::Custom(_) => match rule.value_type() {
            Some(expected) if !declared.accepts(expected) && !expected.accepts(declared) => {
                Err(mismatch(expected.name()))
            }
            _ => Ok(()),
        },
    }
}

fn check_bounds<T>(
    type_name: &str,
    property: &str,
    bounds: &Bounds<T>,
    is_number: impl Fn(&T) -> bool,
    compare: impl Fn(&T, &T) -> Option<Ordering>,
) -> Result<(), RegistryError> {
    if bounds.is_unbounded() {
        return Err(RegistryError::invalid_bounds(
            type_name,
            property,
            "no bound given",
        ));
    }

    let mut bounds_given = [&bounds.min, &bounds.max, &bounds.equal_to]
        .into_iter()
        .flatten();
    if !bounds_given.all(|b| is_number(b)) {
        return Err(RegistryError::invalid_bounds(
            type_name,
            property,
            "bounds must be numeric",
        ));
    }

    if let (Some(min), Some(max)) = (&bounds.min, &bounds.max) {
        if compare(min, max) == Some(Ordering::Greater) {
            return Err(RegistryError::invalid_bounds(
                type_name,
                property,
                "minimum exceeds maximum",
            ));
        }
    }

    Ok(())
}
