//! Depth-first branch-and-bound search over action sequences.
//!
//! Every path through the search tree is an ordering of distinct actions: an action used on a
//! path is unavailable to that path's subtree but stays available to sibling branches. The bound
//! test runs before a child is built, and the incumbent is only replaced by a strictly cheaper
//! goal node, so the first cheapest sequence in declaration order wins.

use std::rc::Rc;

use goap_core::{Constraint, WorldState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Action, ActionId, Node, Plan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Longest action sequence considered. `None` allows every action once per path.
    pub max_depth: Option<usize>,
    /// Number of child nodes the search may build before it stops and returns the incumbent.
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Child nodes built.
    pub expanded: usize,
    /// Children skipped by the cost bound.
    pub pruned: usize,
    /// Times the incumbent improved.
    pub goal_hits: usize,
    /// Deepest path explored, in actions.
    pub max_depth_reached: usize,
    pub budget_exhausted: bool,
}

#[derive(Debug)]
pub struct SearchResult {
    pub best: Option<Rc<Node>>,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn plan(&self) -> Option<Plan> {
        self.best.as_deref().map(Plan::from_leaf)
    }

    pub fn cost(&self) -> Option<u32> {
        self.best.as_ref().map(|n| n.cost())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Lowest-cost node reachable from `start` whose world satisfies `goal`.
    ///
    /// The root itself is never a candidate: a plan always contains at least one action.
    pub fn search(
        &self,
        start: &WorldState,
        goal: &[Constraint],
        actions: &[Action],
    ) -> SearchResult {
        let mut search = Search {
            goal,
            actions,
            config: self.config,
            used: vec![false; actions.len()],
            best: None,
            stats: SearchStats::default(),
        };

        let root = Rc::new(Node::root(start.snapshot()));
        search.expand(&root, 0);

        SearchResult {
            best: search.best,
            stats: search.stats,
        }
    }

    pub fn plan(
        &self,
        start: &WorldState,
        goal: &[Constraint],
        actions: &[Action],
    ) -> Option<Plan> {
        self.search(start, goal, actions).plan()
    }
}

struct Search<'a> {
    goal: &'a [Constraint],
    actions: &'a [Action],
    config: PlannerConfig,
    used: Vec<bool>,
    best: Option<Rc<Node>>,
    stats: SearchStats,
}

impl Search<'_> {
    fn out_of_budget(&mut self) -> bool {
        let Some(max) = self.config.max_expansions else {
            return false;
        };
        if self.stats.expanded >= max {
            self.stats.budget_exhausted = true;
        }
        self.stats.budget_exhausted
    }

    fn expand(&mut self, parent: &Rc<Node>, depth: usize) {
        let depth = depth + 1;
        if self.config.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let actions = self.actions;
        for (i, action) in actions.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            if self.out_of_budget() {
                return;
            }

            let Some(precondition) = action.match_precondition(parent.world()) else {
                continue;
            };
            let step_cost = action.cost(precondition).unwrap_or(0);
            let cost = parent.cost().saturating_add(step_cost);
            if self.best.as_ref().is_some_and(|best| cost >= best.cost()) {
                self.stats.pruned += 1;
                continue;
            }

            let world = match action.apply_effects(parent.world()) {
                Ok(world) => world,
                Err(err) => {
                    tracing::warn!(
                        action = action.name(),
                        error = %err,
                        "skipping action with invalid effects"
                    );
                    continue;
                }
            };

            self.stats.expanded += 1;
            self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);
            let child = Rc::new(Node::child(
                Rc::clone(parent),
                ActionId(i),
                precondition,
                cost,
                world,
            ));

            if child.world().satisfies(self.goal) {
                self.stats.goal_hits += 1;
                self.best = Some(child);
                continue;
            }

            self.used[i] = true;
            self.expand(&child, depth);
            self.used[i] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use goap_core::{FinishImmediately, StateIndex};

    use super::*;
    use crate::Precondition;

    const A: StateIndex = 0;
    const B: StateIndex = 1;

    fn flip(name: &str, index: StateIndex, cost: u32) -> Action {
        Action::new(name, FinishImmediately)
            .with_precondition(Precondition::new(cost).require(index, false))
            .with_effect(index, true)
    }

    #[test]
    fn children_of_goal_nodes_are_not_expanded() {
        let world = WorldState::new().with_state("a", false).with_state("b", false);
        let actions = vec![flip("flip_a", A, 1), flip("flip_b", B, 1)];
        let goal = [Constraint::new(A, true)];

        let result = Planner::new().search(&world, &goal, &actions);

        let best = result.best.expect("plan");
        assert_eq!(best.depth(), 1);
        assert_eq!(best.action(), Some(ActionId(0)));
        // flip_a reaches the goal at cost 1; flip_b ties that bound and is never built.
        assert_eq!(result.stats.expanded, 1);
        assert_eq!(result.stats.pruned, 1);
        assert_eq!(result.stats.goal_hits, 1);
    }

    #[test]
    fn depth_limit_cuts_long_plans() {
        let world = WorldState::new().with_state("a", false).with_state("b", false);
        let actions = vec![
            flip("flip_a", A, 1),
            Action::new("flip_b", FinishImmediately)
                .with_precondition(Precondition::new(1).require(A, true).require(B, false))
                .with_effect(B, true),
        ];
        let goal = [Constraint::new(B, true)];

        let limited = Planner::new().with_config(PlannerConfig {
            max_depth: Some(1),
            max_expansions: None,
        });
        assert!(limited.search(&world, &goal, &actions).best.is_none());
        assert_eq!(Planner::new().plan(&world, &goal, &actions).map(|p| p.len()), Some(2));
    }

    #[test]
    fn expansion_budget_returns_the_incumbent() {
        let world = WorldState::new().with_state("a", false);
        let actions = vec![flip("pricey", A, 9), flip("cheap", A, 1)];
        let goal = [Constraint::new(A, true)];

        let result = Planner::new()
            .with_config(PlannerConfig {
                max_depth: None,
                max_expansions: Some(1),
            })
            .search(&world, &goal, &actions);

        assert!(result.stats.budget_exhausted);
        assert_eq!(result.cost(), Some(9));
    }
}
