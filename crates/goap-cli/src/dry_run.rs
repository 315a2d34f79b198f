//! Resolver for running definitions without a host.

use goap_config::{MethodRef, MethodResolver};
use goap_core::{
    ActionStepper, BindingError, Capability, FinishImmediately, StateUpdater, ValueKind,
};
use goap_utility::Consideration;

/// Every action finishes on its first step. Updaters and method-bound considerations have no
/// host to call into, so they stay unresolved.
pub struct DryRun;

impl MethodResolver for DryRun {
    fn state_updater(
        &self,
        method: &MethodRef,
        _kind: ValueKind,
    ) -> Result<Box<dyn StateUpdater>, BindingError> {
        Err(BindingError::Unresolved {
            capability: Capability::StateUpdater,
            method: method.to_string(),
        })
    }

    fn action_stepper(&self, _method: &MethodRef) -> Result<Box<dyn ActionStepper>, BindingError> {
        Ok(Box::new(FinishImmediately))
    }

    fn consideration(&self, method: &MethodRef) -> Result<Box<dyn Consideration>, BindingError> {
        Err(BindingError::Unresolved {
            capability: Capability::Consideration,
            method: method.to_string(),
        })
    }
}
