use goap_core::{DefinitionError, State, StateIndex, TickContext, WorldError, WorldState};

use crate::{Executor, TickOutcome};

/// Host-side pairing of one agent's world state and executor.
///
/// [`Agent::tick`] performs the per-step contract in order: refresh the world, then tick the
/// executor.
pub struct Agent {
    world: WorldState,
    executor: Executor,
    last_outcome: Option<TickOutcome>,
}

impl Agent {
    /// Validates every action and goal against `world` before accepting them.
    pub fn new(world: WorldState, executor: Executor) -> Result<Self, DefinitionError> {
        executor.validate(&world)?;
        Ok(Self {
            world,
            executor,
            last_outcome: None,
        })
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.executor
    }

    pub fn last_outcome(&self) -> Option<TickOutcome> {
        self.last_outcome
    }

    pub fn tick(&mut self, ctx: &TickContext) -> TickOutcome {
        if let Err(err) = self.world.refresh() {
            tracing::debug!(tick = ctx.tick, error = %err, "world refresh was partial");
        }
        let outcome = self.executor.tick(ctx, &mut self.world);
        self.last_outcome = Some(outcome);
        outcome
    }

    /// Removes a state and renumbers every action and goal reference to it. Any running plan is
    /// abandoned first.
    pub fn remove_state(
        &mut self,
        ctx: &TickContext,
        index: StateIndex,
    ) -> Result<State, WorldError> {
        if index >= self.world.len() {
            return Err(WorldError::UnknownState(index));
        }
        self.executor.reset(ctx, &self.world);
        let state = self.world.remove(index)?;
        self.executor.forget_state(index);
        Ok(state)
    }
}

/// Ticks several agents in order.
pub fn tick_agents(ctx: &TickContext, agents: &mut [Agent]) -> Vec<TickOutcome> {
    agents.iter_mut().map(|agent| agent.tick(ctx)).collect()
}
