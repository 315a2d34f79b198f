use crate::{TickContext, WorldState};

/// Progress of a running action, reported once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    /// Still working; step again next tick.
    Loading,
    /// Done; the action's effects may be applied.
    Finished,
    /// Aborted; no effects are applied.
    Failed,
}

impl ActionState {
    pub fn is_done(self) -> bool {
        !matches!(self, ActionState::Loading)
    }
}

/// Host-side behaviour of an action.
///
/// One stepper instance serves every execution of its action, so `start` is the place to reset
/// per-run state. `step` must return promptly: it runs inside the host's tick.
pub trait ActionStepper: 'static {
    /// Called once when the action is dequeued. Returning `false` rejects the run.
    fn start(&mut self, _ctx: &TickContext, _world: &WorldState) -> bool {
        true
    }

    fn step(&mut self, ctx: &TickContext, world: &WorldState) -> ActionState;

    /// Called when a started run is abandoned before finishing.
    fn cancel(&mut self, _ctx: &TickContext, _world: &WorldState) {}
}

impl<F> ActionStepper for F
where
    F: FnMut(&TickContext, &WorldState) -> ActionState + 'static,
{
    fn step(&mut self, ctx: &TickContext, world: &WorldState) -> ActionState {
        self(ctx, world)
    }
}

/// Stepper that finishes on its first step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinishImmediately;

impl ActionStepper for FinishImmediately {
    fn step(&mut self, _ctx: &TickContext, _world: &WorldState) -> ActionState {
        ActionState::Finished
    }
}
