//! Compiling an [`AgentDefinition`] into a live [`Agent`].

use std::collections::{BTreeMap, HashMap};

use goap_core::{DefinitionError, State, StateIndex, Value, ValueKind, WorldState};
use goap_planner::{Action, Agent, Executor, Goal, Precondition};
use goap_utility::Constant;

use crate::{ActionDef, AgentDefinition, ConsiderationDef, GoalDef, MethodResolver};

impl AgentDefinition {
    /// Resolves state names and binds every method through `resolver`.
    ///
    /// The first failure aborts the build. Nothing is partially bound: on error the returned
    /// agent simply does not exist.
    pub fn build(&self, resolver: &dyn MethodResolver) -> Result<Agent, DefinitionError> {
        self.try_build(resolver).inspect_err(|err| {
            tracing::error!(agent = self.display_name(), error = %err, "agent definition rejected");
        })
    }

    fn try_build(&self, resolver: &dyn MethodResolver) -> Result<Agent, DefinitionError> {
        let names = self.state_indices()?;

        let mut world = WorldState::new();
        for def in &self.states {
            let mut state = State::new(&def.name, def.value.clone());
            if let Some(method) = &def.update {
                let updater = resolver.state_updater(method, def.value.kind())?;
                state = state.with_boxed_updater(updater);
            }
            world.push(state);
        }

        let actions = self
            .actions
            .iter()
            .map(|def| build_action(def, &names, resolver))
            .collect::<Result<Vec<_>, _>>()?;

        let goals = self
            .goals
            .iter()
            .map(|def| build_goal(def, &names, resolver))
            .collect::<Result<Vec<_>, _>>()?;

        let executor = Executor::new(actions, goals).with_config(self.executor);
        let agent = Agent::new(world, executor)?;

        tracing::debug!(
            agent = self.display_name(),
            states = self.states.len(),
            actions = self.actions.len(),
            goals = self.goals.len(),
            "agent built"
        );
        Ok(agent)
    }

    fn state_indices(&self) -> Result<HashMap<&str, (StateIndex, ValueKind)>, DefinitionError> {
        let mut names = HashMap::with_capacity(self.states.len());
        for (index, def) in self.states.iter().enumerate() {
            if names
                .insert(def.name.as_str(), (index, def.value.kind()))
                .is_some()
            {
                return Err(DefinitionError::DuplicateState(def.name.clone()));
            }
        }
        Ok(names)
    }
}

fn build_action(
    def: &ActionDef,
    names: &HashMap<&str, (StateIndex, ValueKind)>,
    resolver: &dyn MethodResolver,
) -> Result<Action, DefinitionError> {
    let owner = format!("action `{}`", def.name);
    let mut action = Action::with_boxed_stepper(&def.name, resolver.action_stepper(&def.run)?);

    for pre in &def.preconditions {
        let mut precondition = Precondition::new(pre.cost);
        for (index, value) in resolve(&owner, &pre.require, names)? {
            precondition = precondition.require(index, value);
        }
        action = action.with_precondition(precondition);
    }
    for (index, value) in resolve(&owner, &def.effects, names)? {
        action = action.with_effect(index, value);
    }
    Ok(action)
}

fn build_goal(
    def: &GoalDef,
    names: &HashMap<&str, (StateIndex, ValueKind)>,
    resolver: &dyn MethodResolver,
) -> Result<Goal, DefinitionError> {
    let owner = format!("goal `{}`", def.name);
    let mut goal = match &def.consideration {
        ConsiderationDef::Constant(score) => Goal::new(&def.name, Constant(*score)),
        ConsiderationDef::Method(method) => {
            Goal::with_boxed_consideration(&def.name, resolver.consideration(method)?)
        }
    };
    for (index, value) in resolve(&owner, &def.require, names)? {
        goal = goal.require(index, value);
    }
    Ok(goal.with_curve(def.curve))
}

/// Maps state names to indices. Integer literals aimed at float states are widened, since YAML
/// gives `1` and `1.0` different kinds.
fn resolve(
    owner: &str,
    values: &BTreeMap<String, Value>,
    names: &HashMap<&str, (StateIndex, ValueKind)>,
) -> Result<Vec<(StateIndex, Value)>, DefinitionError> {
    values
        .iter()
        .map(|(name, value)| match names.get(name.as_str()) {
            Some(&(index, kind)) => Ok((index, widen(value, kind))),
            None => Err(DefinitionError::UnknownStateName {
                owner: owner.to_string(),
                name: name.clone(),
            }),
        })
        .collect()
}

fn widen(value: &Value, kind: ValueKind) -> Value {
    match (value, kind) {
        (Value::Int(i), ValueKind::Float) => Value::Float(*i as f64),
        _ => value.clone(),
    }
}
