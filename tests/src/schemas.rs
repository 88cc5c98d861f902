//! Shared schemas for scenario tests.

use ward_core::{OperationKind, Value, ValueType};
use ward_registry::{PropertyDescriptor, RegistryBuilder, RegistryError, Rule};

/// Fixed clock value stamped by the `User` pre-write hook.
pub const CREATED_AT: i64 = 1_700_000_000_000;

/// Order states accepted by `Order.state`.
pub const ORDER_STATES: [&str; 4] = ["started", "accepted", "rejected", "delivered"];

/// `Order`: a state machine field, a write-once field, a non-negative total
/// and a formatted reference.
pub fn orders(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder
        .add_type("Order")
        .property(PropertyDescriptor::new("state", ValueType::String))
        .property(PropertyDescriptor::new("canOnlyBeSetOnce", ValueType::String).nullable())
        .property(PropertyDescriptor::new("total", ValueType::Float))
        .property(PropertyDescriptor::new("reference", ValueType::String))
        .rule("state", Rule::one_of(ORDER_STATES))
        .rule("canOnlyBeSetOnce", Rule::absent().on_insert(false))
        .rule("total", Rule::min_value(0))
        .rule("reference", Rule::present().on_update(false))
        .rule("reference", Rule::pattern("[A-Z]{3}-[0-9]{4}")?)
        .done()?;
    Ok(())
}

/// `User`: insert-only required email, hook-stamped `createdAt`, and a
/// transient password confirmation checked across fields.
pub fn users(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder
        .add_type("User")
        .property(PropertyDescriptor::new("email", ValueType::String))
        .property(PropertyDescriptor::new("name", ValueType::String).nullable())
        .property(PropertyDescriptor::new("createdAt", ValueType::Timestamp))
        .property(PropertyDescriptor::new("password", ValueType::String))
        .property(PropertyDescriptor::new("passwordConfirmation", ValueType::String).transient())
        .rule("email", Rule::present().on_update(false))
        .rule("email", Rule::pattern(r"[^@\s]+@[^@\s]+")?)
        .rule("name", Rule::length_between(1, 50))
        .rule("createdAt", Rule::present().on_update(false))
        .rule("createdAt", Rule::absent().on_insert(false))
        .rule("password", Rule::min_length(8))
        .pre_write_fn(|op, assignments| {
            if op == OperationKind::Insert && assignments.get("createdAt").is_unset() {
                assignments.set("createdAt", Value::Timestamp(CREATED_AT));
            }
        })
        .post_validation_fn(|_, assignments, field_pass_valid, errors| {
            let password = assignments.get("password").value();
            let confirmation = assignments.get("passwordConfirmation").value();
            if password.is_some() && password != confirmation {
                errors.push("`passwordConfirmation` does not match `password`.");
                return false;
            }
            field_pass_valid
        })
        .done()?;
    Ok(())
}
