//! Branch-and-bound GOAP planner and the tick-driven executor that runs its plans.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod executor;
pub mod goal;
pub mod node;
pub mod plan;
pub mod planner;

pub use action::{Action, ActionId, Effect, Precondition};
pub use agent::{tick_agents, Agent};
pub use executor::{Executor, ExecutorConfig, ExecutorPhase, TickOutcome};
pub use goal::{Goal, GoalId};
pub use node::Node;
pub use plan::{Plan, PlanStep};
pub use planner::{Planner, PlannerConfig, SearchResult, SearchStats};
