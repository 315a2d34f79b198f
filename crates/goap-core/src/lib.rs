//! World-state model and execution primitives for goal-oriented action planning.
//!
//! Everything here is engine-agnostic and single-threaded: a host owns one [`WorldState`] per
//! agent, refreshes it once per tick, and hands it to the planner/executor in `goap-planner`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod error;
pub mod tick;
pub mod value;
pub mod world;

pub use action::{ActionState, ActionStepper, FinishImmediately};
pub use error::{BindingError, Capability, DefinitionError, WorldError};
pub use tick::TickContext;
pub use value::{StateValue, Value, ValueHash, ValueKind};
pub use world::{reindex_after_removal, Constraint, State, StateIndex, StateUpdater, WorldState};
