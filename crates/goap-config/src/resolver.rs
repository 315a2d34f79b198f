//! Late binding of named methods to host callables.

use std::collections::HashMap;

use goap_core::{ActionStepper, BindingError, Capability, StateUpdater, ValueKind};
use goap_utility::Consideration;

use crate::MethodRef;

/// Turns [`MethodRef`]s into callables, once per reference, while an agent is built.
///
/// Each call returns a fresh instance: two actions naming the same method get independent
/// steppers.
pub trait MethodResolver {
    /// `kind` is the declared kind of the state being refreshed.
    fn state_updater(
        &self,
        method: &MethodRef,
        kind: ValueKind,
    ) -> Result<Box<dyn StateUpdater>, BindingError>;

    fn action_stepper(&self, method: &MethodRef) -> Result<Box<dyn ActionStepper>, BindingError>;

    fn consideration(&self, method: &MethodRef) -> Result<Box<dyn Consideration>, BindingError>;
}

type Factory<T> = Box<dyn Fn() -> Box<T>>;

/// Registry of callables for one authoring session.
///
/// Updaters are registered with the kind they produce, so a definition that wires an `int`
/// updater to a `bool` state fails to build instead of failing every refresh.
#[derive(Default)]
pub struct MethodTable {
    updaters: HashMap<MethodRef, (ValueKind, Factory<dyn StateUpdater>)>,
    steppers: HashMap<MethodRef, Factory<dyn ActionStepper>>,
    considerations: HashMap<MethodRef, Factory<dyn Consideration>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_updater<U, F>(
        &mut self,
        method: MethodRef,
        kind: ValueKind,
        factory: F,
    ) -> &mut Self
    where
        U: StateUpdater,
        F: Fn() -> U + 'static,
    {
        let factory: Factory<dyn StateUpdater> =
            Box::new(move || -> Box<dyn StateUpdater> { Box::new(factory()) });
        self.updaters.insert(method, (kind, factory));
        self
    }

    pub fn register_stepper<S, F>(&mut self, method: MethodRef, factory: F) -> &mut Self
    where
        S: ActionStepper,
        F: Fn() -> S + 'static,
    {
        self.steppers.insert(
            method,
            Box::new(move || -> Box<dyn ActionStepper> { Box::new(factory()) }),
        );
        self
    }

    pub fn register_consideration<C, F>(&mut self, method: MethodRef, factory: F) -> &mut Self
    where
        C: Consideration,
        F: Fn() -> C + 'static,
    {
        self.considerations.insert(
            method,
            Box::new(move || -> Box<dyn Consideration> { Box::new(factory()) }),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.updaters.len() + self.steppers.len() + self.considerations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MethodResolver for MethodTable {
    fn state_updater(
        &self,
        method: &MethodRef,
        kind: ValueKind,
    ) -> Result<Box<dyn StateUpdater>, BindingError> {
        let (produces, factory) = self
            .updaters
            .get(method)
            .ok_or_else(|| unresolved(Capability::StateUpdater, method))?;
        if *produces != kind {
            return Err(BindingError::Signature {
                capability: Capability::StateUpdater,
                method: method.to_string(),
                reason: format!("produces {produces} values, state holds {kind}"),
            });
        }
        Ok(factory())
    }

    fn action_stepper(&self, method: &MethodRef) -> Result<Box<dyn ActionStepper>, BindingError> {
        let factory = self
            .steppers
            .get(method)
            .ok_or_else(|| unresolved(Capability::ActionStepper, method))?;
        Ok(factory())
    }

    fn consideration(&self, method: &MethodRef) -> Result<Box<dyn Consideration>, BindingError> {
        let factory = self
            .considerations
            .get(method)
            .ok_or_else(|| unresolved(Capability::Consideration, method))?;
        Ok(factory())
    }
}

fn unresolved(capability: Capability, method: &MethodRef) -> BindingError {
    BindingError::Unresolved {
        capability,
        method: method.to_string(),
    }
}
