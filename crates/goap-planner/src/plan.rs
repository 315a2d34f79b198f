use std::collections::VecDeque;

use crate::{Action, ActionId, Node};

/// One queued action of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanStep {
    pub action: ActionId,
    /// Precondition branch the planner matched for this step.
    pub precondition: usize,
    /// Cumulative cost after this step.
    pub cost: u32,
}

/// A winning node chain flattened root-to-leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub steps: VecDeque<PlanStep>,
    pub cost: u32,
}

impl Plan {
    pub fn from_leaf(leaf: &Node) -> Self {
        let steps = leaf
            .path()
            .into_iter()
            .filter_map(|node| {
                node.action().map(|action| PlanStep {
                    action,
                    precondition: node.precondition(),
                    cost: node.cost(),
                })
            })
            .collect();
        Self {
            steps,
            cost: leaf.cost(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn action_ids(&self) -> Vec<ActionId> {
        self.steps.iter().map(|s| s.action).collect()
    }

    pub fn action_names<'a>(&self, actions: &'a [Action]) -> Vec<&'a str> {
        self.steps
            .iter()
            .filter_map(|s| actions.get(s.action.0).map(Action::name))
            .collect()
    }
}
