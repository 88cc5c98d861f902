//! Schema definition types.

use std::collections::HashMap;

use ward_core::{TypeId, ValueType};

use crate::hooks::TypeHooks;
use crate::rule::Rule;

/// Property definition within a type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Declared semantic type.
    pub declared_type: ValueType,
    /// Whether storage accepts null for this property.
    pub nullable: bool,
    /// Whether this property is backed by storage. Rules on transient
    /// properties are dropped at registration.
    pub persistent: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, declared_type: ValueType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            nullable: false,
            persistent: true,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.persistent = false;
        self
    }
}

/// Rules of one type, keyed by property name, each list in registration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    by_property: HashMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, property: &str, rule: Rule) {
        self.by_property
            .entry(property.to_string())
            .or_default()
            .push(rule);
    }

    /// Rules attached to a property, in registration order.
    pub fn rules_for(&self, property: &str) -> &[Rule] {
        self.by_property
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of rules across all properties.
    pub fn len(&self) -> usize {
        self.by_property.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Unique identifier.
    pub id: TypeId,
    /// Type name.
    pub name: String,
    /// Property definitions in declaration order.
    properties: Vec<PropertyDescriptor>,
    /// Property name to position in `properties`.
    property_index: HashMap<String, usize>,
    /// Attached rules.
    rules: RuleSet,
    /// Object-level hooks.
    hooks: TypeHooks,
}

impl TypeDef {
    pub(crate) fn new(
        id: TypeId,
        name: String,
        properties: Vec<PropertyDescriptor>,
        rules: RuleSet,
        hooks: TypeHooks,
    ) -> Self {
        let property_index = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Self {
            id,
            name,
            properties,
            property_index,
            rules,
            hooks,
        }
    }

    /// Get a property definition by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }

    /// All properties in declaration order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Rules attached to a property, in registration order.
    pub fn rules_for(&self, property: &str) -> &[Rule] {
        self.rules.rules_for(property)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn hooks(&self) -> &TypeHooks {
        &self.hooks
    }
}
