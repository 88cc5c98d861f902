//! Built-in rule evaluation and client-visible messages.
//!
//! Message wording is part of the external contract: clients match on it.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Display;

use tracing::trace;
use ward_core::{Assignment, ErrorSink, OperationKind, Value};
use ward_registry::{Bounds, PropertyDescriptor, Rule, RuleKind};

/// Evaluate one rule that has already passed its gate and operation check.
///
/// Failure messages are appended to `errors`. Returns whether the rule passed.
pub fn evaluate(
    op: OperationKind,
    rule: &Rule,
    property: &PropertyDescriptor,
    assignment: &Assignment,
    errors: &mut ErrorSink,
) -> bool {
    let name = property.name.as_str();

    let failure = match (rule.kind(), assignment) {
        (RuleKind::Present, Assignment::Unset) => Some(required_message(name)),
        (RuleKind::Present, _) => None,
        (RuleKind::Absent, Assignment::Value(_)) => Some(cannot_be_specified_message(name)),
        (RuleKind::Absent, _) => None,
        (RuleKind::Custom(custom), _) => {
            let mut sink = ErrorSink::new();
            if custom.evaluate(op, property, assignment, &mut sink) {
                if !sink.is_empty() {
                    trace!(
                        property = name,
                        rule = custom.name(),
                        dropped = sink.len(),
                        "custom rule passed; ignoring its messages"
                    );
                }
                return true;
            }
            if sink.is_empty() {
                sink.push(invalid_message(name));
            }
            errors.extend(sink);
            return false;
        }
        (kind, Assignment::Value(value)) => evaluate_value(kind, name, value),
        // The gate never admits these for value rules.
        (_, Assignment::Unset | Assignment::ExplicitNull) => None,
    };

    match failure {
        Some(message) => {
            errors.push(message);
            false
        }
        None => true,
    }
}

/// Evaluate a value-gated built-in kind against a concrete value.
fn evaluate_value(kind: &RuleKind, property: &str, value: &Value) -> Option<String> {
    match kind {
        RuleKind::Length(bounds) => {
            let len = text_of(value).chars().count();
            let satisfied = bounds.min.map_or(true, |min| len >= min)
                && bounds.max.map_or(true, |max| len <= max)
                && bounds.equal_to.map_or(true, |eq| len == eq);
            (!satisfied).then(|| length_message(property, len, bounds))
        }
        RuleKind::Range(bounds) => {
            let satisfied = value.as_number().is_some()
                && bound_holds(value, &bounds.min, Ordering::is_ge)
                && bound_holds(value, &bounds.max, Ordering::is_le)
                && bound_holds(value, &bounds.equal_to, Ordering::is_eq);
            (!satisfied).then(|| range_message(property, value, bounds))
        }
        RuleKind::Pattern(pattern) => {
            (!pattern.is_full_match(&text_of(value))).then(|| format_message(property))
        }
        RuleKind::OneOf(options) => {
            let text = text_of(value);
            (!options.iter().any(|o| *o == text)).then(|| one_of_message(property, &text, options))
        }
        RuleKind::Present | RuleKind::Absent | RuleKind::Custom(_) => None,
    }
}

fn bound_holds(value: &Value, bound: &Option<Value>, check: fn(Ordering) -> bool) -> bool {
    match bound {
        Some(b) => value.compare_numbers(b).map_or(false, check),
        None => true,
    }
}

/// Strings are used as-is; other values through their display form.
fn text_of(value: &Value) -> Cow<'_, str> {
    match value.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(value.to_string()),
    }
}

/// Human description of a set of bounds over `subject`, e.g. `3 <= length <= 10`.
pub fn describe_bounds<T: Display>(subject: &str, bounds: &Bounds<T>) -> String {
    let mut parts = Vec::new();
    match (&bounds.min, &bounds.max) {
        (Some(min), Some(max)) => parts.push(format!("{} <= {} <= {}", min, subject, max)),
        (Some(min), None) => parts.push(format!("{} >= {}", subject, min)),
        (None, Some(max)) => parts.push(format!("{} <= {}", subject, max)),
        (None, None) => {}
    }
    if let Some(eq) = &bounds.equal_to {
        parts.push(format!("{} == {}", subject, eq));
    }
    parts.join(" and ")
}

pub fn length_message(property: &str, len: usize, bounds: &Bounds<usize>) -> String {
    format!(
        "`{}` failed length validation: length {} does not satisfy {}.",
        property,
        len,
        describe_bounds("length", bounds)
    )
}

pub fn range_message(property: &str, value: &Value, bounds: &Bounds<Value>) -> String {
    format!(
        "`{}` failed range validation: {} does not satisfy {}.",
        property,
        value,
        describe_bounds("value", bounds)
    )
}

pub fn format_message(property: &str) -> String {
    format!(
        "`{}` failed format validation: value does not match required pattern.",
        property
    )
}

pub fn one_of_message(property: &str, value: &str, options: &[String]) -> String {
    let valid = options
        .iter()
        .map(|o| format!("'{}'", o))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "The value `{}` is not valid for `{}`. Valid values are: {}.",
        value, property, valid
    )
}

pub fn required_message(property: &str) -> String {
    format!("`{}` is required.", property)
}

pub fn cannot_be_specified_message(property: &str) -> String {
    format!("`{}` cannot be specified.", property)
}

/// Fallback for custom rules that fail without explaining why.
pub fn invalid_message(property: &str) -> String {
    format!("`{}` is invalid.", property)
}
