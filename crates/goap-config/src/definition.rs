//! Serializable agent definitions.

use core::fmt;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use goap_core::Value;
use goap_planner::ExecutorConfig;
use goap_utility::UtilityCurve;
use serde::{Deserialize, Serialize};

/// A whole agent, loaded from `agent.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentDefinition {
    /// Display name, used in logs.
    pub name: Option<String>,

    /// Planner limits and goal selection threshold.
    pub executor: ExecutorConfig,

    /// States in index order.
    pub states: Vec<StateDef>,

    pub actions: Vec<ActionDef>,

    pub goals: Vec<GoalDef>,
}

/// A late-bound method: `component` names the host object, `method` the callable on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodRef {
    pub component: String,
    pub method: String,
}

impl MethodRef {
    pub fn new(component: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.method)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,

    /// Initial value; its kind is the state's kind for the agent's lifetime.
    pub value: Value,

    /// Called once per tick to refresh the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<MethodRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreconditionDef {
    #[serde(default)]
    pub cost: u32,

    /// State name to required value.
    #[serde(default)]
    pub require: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: String,

    /// Alternatives in priority order; the first satisfied one is used.
    pub preconditions: Vec<PreconditionDef>,

    #[serde(default)]
    pub effects: BTreeMap<String, Value>,

    /// Stepper driving the action while it runs.
    pub run: MethodRef,
}

/// Raw score source of a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConsiderationDef {
    Constant(f32),
    Method(MethodRef),
}

impl Default for ConsiderationDef {
    fn default() -> Self {
        ConsiderationDef::Constant(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDef {
    pub name: String,

    #[serde(default)]
    pub require: BTreeMap<String, Value>,

    /// Defaults to a constant `1.0`.
    #[serde(default)]
    pub consideration: ConsiderationDef,

    #[serde(default)]
    pub curve: UtilityCurve,
}

impl AgentDefinition {
    /// Load a definition from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent definition from {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse agent definition from {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let definition: Self = serde_yaml::from_str(content)?;
        Ok(definition)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Name for logs: the declared name, or `"agent"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_values_by_kind() {
        let yaml = r#"
states:
  - { name: armed, value: true }
  - { name: ammo, value: 3 }
  - { name: health, value: 0.5 }
  - { name: target, value: [1.0, 2.0] }
  - { name: mood, value: idle }
"#;
        let def = AgentDefinition::from_yaml(yaml).unwrap();
        let kinds: Vec<_> = def.states.iter().map(|s| s.value.kind().to_string()).collect();
        assert_eq!(kinds, ["bool", "int", "float", "vec2", "text"]);
    }

    #[test]
    fn consideration_is_constant_or_method() {
        let yaml = r#"
goals:
  - name: rest
  - name: flee
    consideration: 0.25
  - name: hunt
    consideration: { component: Senses, method: hunger }
"#;
        let def = AgentDefinition::from_yaml(yaml).unwrap();
        assert_eq!(def.goals[0].consideration, ConsiderationDef::Constant(1.0));
        assert_eq!(def.goals[1].consideration, ConsiderationDef::Constant(0.25));
        assert_eq!(
            def.goals[2].consideration,
            ConsiderationDef::Method(MethodRef::new("Senses", "hunger"))
        );
    }

    #[test]
    fn executor_settings_default_when_absent() {
        let def = AgentDefinition::from_yaml("name: scout\n").unwrap();
        assert_eq!(def.display_name(), "scout");
        assert_eq!(def.executor, ExecutorConfig::default());

        let def = AgentDefinition::from_yaml("executor: { planner: { max_depth: 4 } }\n").unwrap();
        assert_eq!(def.executor.planner.max_depth, Some(4));
        assert_eq!(def.executor.selector.min_score, 0.0);
    }

    #[test]
    fn method_ref_display() {
        assert_eq!(MethodRef::new("Door", "open").to_string(), "Door.open");
    }
}
