//! Authoring format for GOAP agents.
//!
//! An [`AgentDefinition`] names states, actions and goals in YAML. Building it compiles every
//! state name to an index and binds each referenced method through a [`MethodResolver`], so a
//! definition that builds successfully never hits an unbound capability at runtime.

#![forbid(unsafe_code)]

mod build;
pub mod definition;
pub mod resolver;

pub use definition::{
    ActionDef, AgentDefinition, ConsiderationDef, GoalDef, MethodRef, PreconditionDef, StateDef,
};
pub use resolver::{MethodResolver, MethodTable};
