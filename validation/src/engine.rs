//! Field-rule pass.

use tracing::{debug, trace};
use ward_core::{AssignmentSet, ErrorSink, OperationKind};
use ward_registry::TypeDef;

use crate::catalog;
use crate::run::ValidationRun;

/// Evaluate every applicable rule of `type_def` against `assignments`.
///
/// Properties are visited in declaration order and rules in registration
/// order. Every applicable rule runs; a failure never stops evaluation.
pub fn run_validation(
    op: OperationKind,
    type_def: &TypeDef,
    assignments: &AssignmentSet,
) -> ValidationRun {
    let mut errors = ErrorSink::new();
    let mut invalid_properties = Vec::new();
    let mut evaluated = 0usize;

    for property in type_def.properties() {
        let rules = type_def.rules_for(&property.name);
        if rules.is_empty() {
            continue;
        }

        let assignment = assignments.get(&property.name);
        let mut property_failed = false;

        for rule in rules {
            if !rule.applies(op, assignment) {
                trace!(
                    type_name = %type_def.name,
                    property = %property.name,
                    rule = rule.kind().name(),
                    "rule skipped"
                );
                continue;
            }

            evaluated += 1;
            let passed = catalog::evaluate(op, rule, property, assignment, &mut errors);
            trace!(
                type_name = %type_def.name,
                property = %property.name,
                rule = rule.kind().name(),
                passed,
                "rule evaluated"
            );
            property_failed |= !passed;
        }

        if property_failed {
            invalid_properties.push(property.name.clone());
        }
    }

    let run = ValidationRun::from_sink(errors, invalid_properties);
    debug!(
        type_name = %type_def.name,
        operation = %op,
        evaluated,
        errors = run.error_count(),
        valid = run.valid,
        "field rules evaluated"
    );
    run
}
