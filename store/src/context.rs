//! Persistence operation context.
//!
//! Every validated write goes through [`OperationContext::insert`] or
//! [`OperationContext::update`]. The `*_raw` methods are the bypass path:
//! they skip hooks and rules entirely and are meant for migrations and
//! trusted internal writes.

use tracing::{debug, info, warn};
use ward_core::{AssignmentSet, Attributes, OperationKind, RecordId};
use ward_registry::{Registry, TypeDef};
use ward_validation::{validate_write, ValidationRun};

use crate::config::ContextConfig;
use crate::error::{StoreError, StoreResult};
use crate::failure::ValidationFailure;
use crate::store::RecordStore;

/// Binds the immutable registry to a mutable store for a sequence of writes.
pub struct OperationContext<'r, 's> {
    registry: &'r Registry,
    store: &'s mut RecordStore,
    config: ContextConfig,
}

impl<'r, 's> OperationContext<'r, 's> {
    pub fn new(registry: &'r Registry, store: &'s mut RecordStore) -> Self {
        Self {
            registry,
            store,
            config: ContextConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &*self.store
    }

    // ==================== Validated writes ====================

    /// Validate and store a new record.
    pub fn insert(&mut self, type_name: &str, values: Attributes) -> StoreResult<RecordId> {
        let type_def = self.lookup_type(type_name)?;
        let assignments = self.validated(OperationKind::Insert, type_def, values)?;
        let attributes = persistable(type_def, assignments)?;

        let id = self.store.insert(type_def.id, attributes);
        info!(type_name, record = %id, "record inserted");
        Ok(id)
    }

    /// Validate and apply the explicitly assigned `values` to a record.
    /// Properties not in `values` are untouched and validate as unset.
    pub fn update(&mut self, id: RecordId, values: Attributes) -> StoreResult<()> {
        let type_def = self.lookup_record_type(id)?;
        let assignments = self.validated(OperationKind::Update, type_def, values)?;
        let attributes = persistable(type_def, assignments)?;

        self.store.update(id, attributes)?;
        info!(type_name = %type_def.name, record = %id, "record updated");
        Ok(())
    }

    /// Run the full pipeline without storing anything.
    pub fn validate(
        &self,
        op: OperationKind,
        type_name: &str,
        values: Attributes,
    ) -> StoreResult<ValidationRun> {
        let type_def = self.lookup_type(type_name)?;
        check_values(type_def, &values)?;

        let mut assignments = AssignmentSet::from_attributes(values);
        let run = validate_write(op, type_def, &mut assignments, &self.config.hook_policy())?;
        debug!(type_name, operation = %op, valid = run.valid, "dry-run validation");
        Ok(run)
    }

    // ==================== Bypass writes ====================

    /// Store a new record without running hooks or rules.
    pub fn insert_raw(&mut self, type_name: &str, values: Attributes) -> StoreResult<RecordId> {
        let type_def = self.lookup_type(type_name)?;
        check_values(type_def, &values)?;
        let attributes = persistable(type_def, AssignmentSet::from_attributes(values))?;

        let id = self.store.insert(type_def.id, attributes);
        warn!(type_name, record = %id, "record inserted without validation");
        Ok(id)
    }

    /// Apply values to a record without running hooks or rules.
    pub fn update_raw(&mut self, id: RecordId, values: Attributes) -> StoreResult<()> {
        let type_def = self.lookup_record_type(id)?;
        check_values(type_def, &values)?;
        let attributes = persistable(type_def, AssignmentSet::from_attributes(values))?;

        self.store.update(id, attributes)?;
        warn!(type_name = %type_def.name, record = %id, "record updated without validation");
        Ok(())
    }

    // ==================== Helpers ====================

    fn lookup_type(&self, type_name: &str) -> StoreResult<&'r TypeDef> {
        self.registry
            .get_type_by_name(type_name)
            .ok_or_else(|| StoreError::unknown_type(type_name))
    }

    fn lookup_record_type(&self, id: RecordId) -> StoreResult<&'r TypeDef> {
        let type_id = self
            .store
            .get(id)
            .map(|record| record.type_id)
            .ok_or(StoreError::RecordNotFound(id))?;
        self.registry
            .get_type(type_id)
            .ok_or_else(|| StoreError::unknown_type(type_id.to_string()))
    }

    /// Check the input, run the pipeline and return the assignments to persist.
    fn validated(
        &self,
        op: OperationKind,
        type_def: &TypeDef,
        values: Attributes,
    ) -> StoreResult<AssignmentSet> {
        check_values(type_def, &values)?;

        let mut assignments = AssignmentSet::from_attributes(values);
        let run = validate_write(op, type_def, &mut assignments, &self.config.hook_policy())?;

        if !run.valid {
            info!(
                type_name = %type_def.name,
                operation = %op,
                errors = run.error_count(),
                "write rejected by validation"
            );
            return Err(StoreError::ValidationFailed(ValidationFailure::new(
                type_def.name.clone(),
                op,
                run,
            )));
        }

        Ok(assignments)
    }
}

/// Reject unknown properties and values the declared type does not accept.
fn check_values(type_def: &TypeDef, values: &Attributes) -> StoreResult<()> {
    for (name, value) in values {
        let property = type_def
            .property(name)
            .ok_or_else(|| StoreError::unknown_property(&type_def.name, name))?;
        if !property.declared_type.accepts_value(value) {
            return Err(StoreError::invalid_property_type(
                name,
                property.declared_type.name(),
                value.type_name(),
            ));
        }
    }
    Ok(())
}

/// Final storage checks: values written by hooks must fit the schema,
/// non-nullable properties cannot hold null, and transient properties are
/// never stored.
fn persistable(type_def: &TypeDef, assignments: AssignmentSet) -> StoreResult<Attributes> {
    let mut attributes = assignments.into_attributes();
    check_values(type_def, &attributes)?;

    for (name, value) in &attributes {
        if value.is_null() {
            let nullable = type_def.property(name).map_or(false, |p| p.nullable);
            if !nullable {
                return Err(StoreError::null_violation(&type_def.name, name));
            }
        }
    }

    attributes.retain(|name, _| type_def.property(name).map_or(false, |p| p.persistent));
    Ok(attributes)
}
