//! Scenario definition and runner.

use std::collections::HashMap;

use ward_core::{Attributes, OperationKind, RecordId};
use ward_registry::{RegistryBuilder, RegistryError};
use ward_store::{ContextConfig, OperationContext, RecordStore, StoreError};

use crate::error::{ScenarioError, ScenarioResult};
use crate::expect::{Expect, StepOutput};

type SchemaFn = Box<dyn Fn(&mut RegistryBuilder) -> Result<(), RegistryError>>;

/// What a step does.
#[derive(Debug, Clone)]
pub enum Action {
    Insert { type_name: String, values: Attributes },
    Update { target: String, values: Attributes },
    InsertRaw { type_name: String, values: Attributes },
    UpdateRaw { target: String, values: Attributes },
    Validate { op: OperationKind, type_name: String, values: Attributes },
}

/// A named step and its expectation.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub action: Action,
    pub expect: Expect,
}

/// A sequence of writes against one registry and one store.
///
/// Records written by insert steps are referred to by the inserting step's
/// name in later update steps.
pub struct Scenario {
    name: String,
    schemas: Vec<SchemaFn>,
    config: ContextConfig,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schemas: Vec::new(),
            config: ContextConfig::default(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register types. May be called more than once.
    pub fn schema<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut RegistryBuilder) -> Result<(), RegistryError> + 'static,
    {
        self.schemas.push(Box::new(f));
        self
    }

    pub fn config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    // ==================== Steps ====================

    pub fn insert(
        self,
        step: &str,
        type_name: &str,
        values: Attributes,
        expect: impl FnOnce(Expect) -> Expect,
    ) -> Self {
        self.push(step, Action::Insert { type_name: type_name.into(), values }, expect)
    }

    pub fn update(
        self,
        step: &str,
        target: &str,
        values: Attributes,
        expect: impl FnOnce(Expect) -> Expect,
    ) -> Self {
        self.push(step, Action::Update { target: target.into(), values }, expect)
    }

    pub fn insert_raw(
        self,
        step: &str,
        type_name: &str,
        values: Attributes,
        expect: impl FnOnce(Expect) -> Expect,
    ) -> Self {
        self.push(step, Action::InsertRaw { type_name: type_name.into(), values }, expect)
    }

    pub fn update_raw(
        self,
        step: &str,
        target: &str,
        values: Attributes,
        expect: impl FnOnce(Expect) -> Expect,
    ) -> Self {
        self.push(step, Action::UpdateRaw { target: target.into(), values }, expect)
    }

    pub fn validate(
        self,
        step: &str,
        op: OperationKind,
        type_name: &str,
        values: Attributes,
        expect: impl FnOnce(Expect) -> Expect,
    ) -> Self {
        self.push(
            step,
            Action::Validate { op, type_name: type_name.into(), values },
            expect,
        )
    }

    fn push(mut self, step: &str, action: Action, expect: impl FnOnce(Expect) -> Expect) -> Self {
        self.steps.push(Step {
            name: step.to_string(),
            action,
            expect: expect(Expect::new()),
        });
        self
    }

    // ==================== Running ====================

    /// Build the registry, then execute and verify each step in order.
    pub fn run(&self) -> ScenarioResult<()> {
        // 1. Build the registry
        let mut builder = RegistryBuilder::new();
        for schema in &self.schemas {
            schema(&mut builder)?;
        }
        let registry = builder.build()?;

        // 2. Execute each step against a fresh store
        let mut store = RecordStore::new();
        let mut records: HashMap<String, RecordId> = HashMap::new();

        for step in &self.steps {
            let result = {
                let mut ctx = OperationContext::new(&registry, &mut store).with_config(self.config);
                execute(&mut ctx, step, &records)?
            };

            if let Ok(StepOutput::Inserted(id)) = &result {
                records.insert(step.name.clone(), *id);
            }

            // 3. Verify against the result and the store as it now stands
            step.expect.verify(&step.name, &result, &store)?;
        }

        Ok(())
    }
}

fn execute(
    ctx: &mut OperationContext<'_, '_>,
    step: &Step,
    records: &HashMap<String, RecordId>,
) -> ScenarioResult<Result<StepOutput, StoreError>> {
    let target = |name: &str| {
        records
            .get(name)
            .copied()
            .ok_or_else(|| ScenarioError::unknown_target(&step.name, name))
    };

    let result = match &step.action {
        Action::Insert { type_name, values } => ctx
            .insert(type_name, values.clone())
            .map(StepOutput::Inserted),
        Action::Update { target: name, values } => {
            let id = target(name)?;
            ctx.update(id, values.clone()).map(|()| StepOutput::Updated(id))
        }
        Action::InsertRaw { type_name, values } => ctx
            .insert_raw(type_name, values.clone())
            .map(StepOutput::Inserted),
        Action::UpdateRaw { target: name, values } => {
            let id = target(name)?;
            ctx.update_raw(id, values.clone())
                .map(|()| StepOutput::Updated(id))
        }
        Action::Validate { op, type_name, values } => ctx
            .validate(*op, type_name, values.clone())
            .map(StepOutput::Validated),
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::attrs;

    #[test]
    fn test_scenario_collects_steps() {
        let scenario = Scenario::new("steps")
            .insert("create", "Task", attrs! { "title" => "x" }, |e| e.accepted())
            .update("rename", "create", attrs! { "title" => "y" }, |e| e.accepted());

        assert_eq!(scenario.name(), "steps");
        assert_eq!(scenario.steps().len(), 2);
    }

    #[test]
    fn test_unknown_target_is_reported() {
        let scenario = Scenario::new("dangling")
            .schema(|b| {
                b.add_type("Task").done()?;
                Ok(())
            })
            .update("rename", "missing", attrs!(), |e| e);

        assert!(matches!(
            scenario.run(),
            Err(ScenarioError::UnknownTarget { target, .. }) if target == "missing"
        ));
    }
}
