use core::fmt;

use thiserror::Error;

use crate::ValueKind;

/// Errors from reading or writing a [`crate::WorldState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("no state at index {0}")]
    UnknownState(usize),

    #[error("state `{state}` holds {expected} values, got {found}")]
    KindMismatch {
        state: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// The three late-bound capabilities a host supplies at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    StateUpdater,
    ActionStepper,
    Consideration,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::StateUpdater => "state updater",
            Capability::ActionStepper => "action stepper",
            Capability::Consideration => "consideration",
        };
        f.write_str(name)
    }
}

/// A named invocable could not be resolved or validated.
///
/// Binding errors are fatal for the agent being built: an unbound capability would leave it
/// permanently unable to use that action, goal or state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("no {capability} bound to `{method}`")]
    Unresolved { capability: Capability, method: String },

    #[error("{capability} `{method}` has an incompatible signature: {reason}")]
    Signature {
        capability: Capability,
        method: String,
        reason: String,
    },
}

/// Static action/goal/state definitions that are inconsistent with the world they target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("{owner} references state index {index}, but the world has {len} states")]
    IndexOutOfRange {
        owner: String,
        index: usize,
        len: usize,
    },

    #[error("{owner} expects a {found} for state `{state}`, which holds {expected} values")]
    KindMismatch {
        owner: String,
        state: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("action `{0}` declares no preconditions")]
    NoPreconditions(String),

    #[error("{owner} references unknown state `{name}`")]
    UnknownStateName { owner: String, name: String },

    #[error("state `{0}` is declared more than once")]
    DuplicateState(String),

    #[error(transparent)]
    Binding(#[from] BindingError),
}
