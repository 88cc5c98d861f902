//! Rule definitions.
//!
//! A [`Rule`] is attached to one property of a type. Its [`RuleKind`] is a
//! closed set of built-in kinds plus a `Custom` variant holding a boxed
//! evaluator. Evaluation lives in `ward-validation`; this module only
//! describes what a rule checks and when it applies.

use std::fmt;
use std::sync::Arc;

use regex_lite::Regex;
use ward_core::{Assignment, ErrorSink, OperationKind, Operations, Value, ValueType};

use crate::builder::RegistryError;
use crate::types::PropertyDescriptor;

/// Decides whether a rule's evaluation runs for a given assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gate {
    /// Admits only `Value(x)`. Used by every ordinary rule.
    #[default]
    ValueOnly,
    /// Admits `Unset` and `Value(x)` but never `ExplicitNull`.
    /// Used by presence and absence rules.
    PresenceAware,
}

impl Gate {
    pub fn admits(&self, assignment: &Assignment) -> bool {
        match (self, assignment) {
            (_, Assignment::Value(_)) => true,
            (Gate::PresenceAware, Assignment::Unset) => true,
            _ => false,
        }
    }
}

/// Lower/upper/exact bounds shared by length and range rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub equal_to: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            equal_to: None,
        }
    }
}

impl<T> Bounds<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    pub fn equal_to(mut self, value: T) -> Self {
        self.equal_to = Some(value);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.equal_to.is_none()
    }
}

/// Contract for user-defined single-field rules.
///
/// Implementations must be pure and synchronous. Returning `false` marks the
/// property invalid; messages pushed to `errors` are reported to the client.
pub trait CustomRule: Send + Sync {
    fn evaluate(
        &self,
        op: OperationKind,
        property: &PropertyDescriptor,
        assignment: &Assignment,
        errors: &mut ErrorSink,
    ) -> bool;

    /// Value type this rule expects, checked against the property at registration.
    fn value_type(&self) -> Option<ValueType> {
        None
    }

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> CustomRule for F
where
    F: Fn(OperationKind, &PropertyDescriptor, &Assignment, &mut ErrorSink) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        op: OperationKind,
        property: &PropertyDescriptor,
        assignment: &Assignment,
        errors: &mut ErrorSink,
    ) -> bool {
        self(op, property, assignment, errors)
    }
}

/// A compiled full-match pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` so that it must match the whole value.
    pub fn new(source: impl Into<String>) -> Result<Self, RegistryError> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})$", source))
            .map_err(|e| RegistryError::invalid_pattern(&source, e.to_string()))?;
        Ok(Self { source, regex })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// The closed set of rule kinds.
#[derive(Clone)]
pub enum RuleKind {
    /// String length, counted in characters.
    Length(Bounds<usize>),
    /// Numeric value.
    Range(Bounds<Value>),
    /// Full match against a pattern.
    Pattern(Pattern),
    /// Membership in an ordered set of options.
    OneOf(Vec<String>),
    /// Fails when the property is unset.
    Present,
    /// Fails when the property is assigned a value.
    Absent,
    /// User-defined evaluator.
    Custom(Arc<dyn CustomRule>),
}

impl RuleKind {
    pub fn name(&self) -> &str {
        match self {
            RuleKind::Length(_) => "length",
            RuleKind::Range(_) => "range",
            RuleKind::Pattern(_) => "format",
            RuleKind::OneOf(_) => "one_of",
            RuleKind::Present => "present",
            RuleKind::Absent => "absent",
            RuleKind::Custom(rule) => rule.name(),
        }
    }
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Length(b) => f.debug_tuple("Length").field(b).finish(),
            RuleKind::Range(b) => f.debug_tuple("Range").field(b).finish(),
            RuleKind::Pattern(p) => f.debug_tuple("Pattern").field(&p.source).finish(),
            RuleKind::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            RuleKind::Present => f.write_str("Present"),
            RuleKind::Absent => f.write_str("Absent"),
            RuleKind::Custom(rule) => f.debug_tuple("Custom").field(&rule.name()).finish(),
        }
    }
}

/// A rule attached to a property.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    operations: Operations,
    gate: Gate,
    value_type: Option<ValueType>,
}

impl Rule {
    fn with_kind(kind: RuleKind) -> Self {
        let gate = match kind {
            RuleKind::Present | RuleKind::Absent => Gate::PresenceAware,
            _ => Gate::ValueOnly,
        };
        Self {
            kind,
            operations: Operations::ALL,
            gate,
            value_type: None,
        }
    }

    // ==================== Built-in kinds ====================

    pub fn length(bounds: Bounds<usize>) -> Self {
        Self::with_kind(RuleKind::Length(bounds))
    }

    pub fn length_between(min: usize, max: usize) -> Self {
        Self::length(Bounds::new().min(min).max(max))
    }

    pub fn min_length(min: usize) -> Self {
        Self::length(Bounds::new().min(min))
    }

    pub fn max_length(max: usize) -> Self {
        Self::length(Bounds::new().max(max))
    }

    pub fn exact_length(len: usize) -> Self {
        Self::length(Bounds::new().equal_to(len))
    }

    pub fn range(bounds: Bounds<Value>) -> Self {
        Self::with_kind(RuleKind::Range(bounds))
    }

    pub fn range_between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::range(Bounds::new().min(min.into()).max(max.into()))
    }

    pub fn min_value(min: impl Into<Value>) -> Self {
        Self::range(Bounds::new().min(min.into()))
    }

    pub fn max_value(max: impl Into<Value>) -> Self {
        Self::range(Bounds::new().max(max.into()))
    }

    pub fn equal_value(value: impl Into<Value>) -> Self {
        Self::range(Bounds::new().equal_to(value.into()))
    }

    /// Full-match pattern rule. Fails eagerly if the pattern does not compile.
    pub fn pattern(source: impl Into<String>) -> Result<Self, RegistryError> {
        Ok(Self::with_kind(RuleKind::Pattern(Pattern::new(source)?)))
    }

    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(RuleKind::OneOf(
            options.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn present() -> Self {
        Self::with_kind(RuleKind::Present)
    }

    pub fn absent() -> Self {
        Self::with_kind(RuleKind::Absent)
    }

    // ==================== Custom kinds ====================

    pub fn custom(rule: impl CustomRule + 'static) -> Self {
        let value_type = rule.value_type();
        let mut built = Self::with_kind(RuleKind::Custom(Arc::new(rule)));
        built.value_type = value_type;
        built
    }

    /// Custom rule from a closure.
    pub fn custom_fn<F>(f: F) -> Self
    where
        F: Fn(OperationKind, &PropertyDescriptor, &Assignment, &mut ErrorSink) -> bool
            + Send
            + Sync
            + 'static,
    {
        Self::custom(f)
    }

    // ==================== Modifiers ====================

    /// Restrict the rule to the given operations.
    pub fn on(mut self, operations: Operations) -> Self {
        self.operations = operations;
        self
    }

    pub fn on_insert(mut self, enabled: bool) -> Self {
        self.operations = self.operations.with_insert(enabled);
        self
    }

    pub fn on_update(mut self, enabled: bool) -> Self {
        self.operations = self.operations.with_update(enabled);
        self
    }

    /// Override the gate. Custom rules use this to opt into presence semantics.
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }

    /// Declare the value type a custom rule expects.
    pub fn expecting(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    // ==================== Accessors ====================

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn operations(&self) -> Operations {
        self.operations
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Whether this rule runs for `op` against `assignment`.
    pub fn applies(&self, op: OperationKind, assignment: &Assignment) -> bool {
        self.operations.contains(op) && self.gate.admits(assignment)
    }
}
