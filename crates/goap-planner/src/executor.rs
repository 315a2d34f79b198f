use std::collections::VecDeque;

use goap_core::{
    ActionState, Constraint, DefinitionError, StateIndex, TickContext, WorldState,
};
use goap_tools::{TraceEvent, TraceSink};
use goap_utility::{UtilitySelector, UtilitySelectorConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Action, ActionId, Goal, GoalId, Plan, PlanStep, Planner, PlannerConfig, SearchStats};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExecutorConfig {
    pub planner: PlannerConfig,
    pub selector: UtilitySelectorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorPhase {
    /// No active goal and no plan.
    Idle,
    /// A goal was chosen and the planner is running. Planning is synchronous, so this phase is
    /// only observable from inside the tick.
    Planning,
    /// Stepping through a non-empty plan.
    Executing,
}

/// What a single executor tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No goal scored above the selection threshold.
    NoGoal,
    /// The selected goal already holds; nothing to plan.
    GoalSatisfied { goal: GoalId },
    /// The planner found no action sequence reaching the goal.
    NoPlan { goal: GoalId },
    /// The in-flight action reported `Loading`.
    Running { goal: GoalId, action: ActionId },
    /// An action finished and its effects were applied; more steps remain.
    ActionFinished { goal: GoalId, action: ActionId },
    /// The last action of the plan finished.
    PlanCompleted { goal: GoalId, action: ActionId },
    /// The planned precondition no longer held (or the stepper refused) when the action started.
    ActionRejected { goal: GoalId, action: ActionId },
    /// The action reported `Failed`.
    ActionFailed { goal: GoalId, action: ActionId },
}

impl TickOutcome {
    pub fn goal(&self) -> Option<GoalId> {
        match *self {
            TickOutcome::NoGoal => None,
            TickOutcome::GoalSatisfied { goal }
            | TickOutcome::NoPlan { goal }
            | TickOutcome::Running { goal, .. }
            | TickOutcome::ActionFinished { goal, .. }
            | TickOutcome::PlanCompleted { goal, .. }
            | TickOutcome::ActionRejected { goal, .. }
            | TickOutcome::ActionFailed { goal, .. } => Some(goal),
        }
    }

    pub fn action(&self) -> Option<ActionId> {
        match *self {
            TickOutcome::Running { action, .. }
            | TickOutcome::ActionFinished { action, .. }
            | TickOutcome::PlanCompleted { action, .. }
            | TickOutcome::ActionRejected { action, .. }
            | TickOutcome::ActionFailed { action, .. } => Some(action),
            _ => None,
        }
    }

    /// The plan was dropped because an action could not run to completion.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TickOutcome::ActionRejected { .. } | TickOutcome::ActionFailed { .. }
        )
    }
}

/// Goal selection and plan execution for one agent.
///
/// Each tick the executor scores every goal, plans synchronously when the selected goal differs
/// from the active one, and steps at most one action. Any rejected or failed action drops the
/// whole remaining plan and clears the active goal, so the next tick re-plans from scratch.
pub struct Executor {
    actions: Vec<Action>,
    goals: Vec<Goal>,
    planner: Planner,
    selector: UtilitySelector,

    phase: ExecutorPhase,
    active_goal: Option<GoalId>,
    plan: Option<Plan>,
    queue: VecDeque<PlanStep>,
    in_flight: Option<PlanStep>,

    utilities: Vec<f32>,
    plan_calls: u64,
    last_search: Option<SearchStats>,
    trace: Option<Box<dyn TraceSink>>,
}

impl Executor {
    pub fn new(actions: Vec<Action>, goals: Vec<Goal>) -> Self {
        Self {
            actions,
            goals,
            planner: Planner::new(),
            selector: UtilitySelector::default(),
            phase: ExecutorPhase::Idle,
            active_goal: None,
            plan: None,
            queue: VecDeque::new(),
            in_flight: None,
            utilities: Vec::new(),
            plan_calls: 0,
            last_search: None,
            trace: None,
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.planner = Planner::new().with_config(config.planner);
        self.selector = UtilitySelector::new(config.selector);
        self
    }

    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.trace = Some(Box::new(sink));
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.get(id.0)
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn phase(&self) -> ExecutorPhase {
        self.phase
    }

    pub fn active_goal(&self) -> Option<GoalId> {
        self.active_goal
    }

    /// The plan being executed, as it was when planning finished.
    pub fn current_plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Steps not yet started.
    pub fn queued(&self) -> impl Iterator<Item = &PlanStep> {
        self.queue.iter()
    }

    pub fn in_flight(&self) -> Option<PlanStep> {
        self.in_flight
    }

    /// Utilities from the latest goal evaluation, in goal order.
    pub fn utilities(&self) -> &[f32] {
        &self.utilities
    }

    /// Number of times the planner was invoked.
    pub fn plan_calls(&self) -> u64 {
        self.plan_calls
    }

    pub fn last_search(&self) -> Option<SearchStats> {
        self.last_search
    }

    /// Checks every state reference against `world`: indices must exist, values must match the
    /// state's kind, and every action needs at least one precondition.
    pub fn validate(&self, world: &WorldState) -> Result<(), DefinitionError> {
        for action in &self.actions {
            let owner = format!("action `{}`", action.name());
            if action.preconditions().is_empty() {
                return Err(DefinitionError::NoPreconditions(action.name().to_string()));
            }
            for precondition in action.preconditions() {
                for constraint in &precondition.constraints {
                    check_reference(&owner, constraint, world)?;
                }
            }
            for effect in action.effects() {
                check_reference(
                    &owner,
                    &Constraint {
                        index: effect.index,
                        value: effect.value.clone(),
                    },
                    world,
                )?;
            }
        }

        for goal in &self.goals {
            let owner = format!("goal `{}`", goal.name());
            for constraint in goal.constraints() {
                check_reference(&owner, constraint, world)?;
            }
        }

        Ok(())
    }

    /// Scores every goal and returns the strict-argmax winner. The active goal keeps ties.
    pub fn select_goal(&mut self, world: &WorldState) -> Option<GoalId> {
        self.utilities.clear();
        for goal in &mut self.goals {
            self.utilities.push(goal.utility(world));
        }
        let incumbent = self.active_goal.map(|g| g.0);
        self.selector.select(&self.utilities, incumbent).map(GoalId)
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut WorldState) -> TickOutcome {
        let selected = self.select_goal(world);

        if selected != self.active_goal {
            if self.phase == ExecutorPhase::Executing {
                self.abandon(ctx, world);
            }

            let Some(goal) = selected else {
                return TickOutcome::NoGoal;
            };
            tracing::debug!(goal = self.goals[goal.0].name(), "goal selected");
            self.emit(ctx, "goap.goal.selected", goal.0, 0);

            if self.goals[goal.0].is_satisfied_by(world) {
                self.emit(ctx, "goap.goal.satisfied", goal.0, 0);
                return TickOutcome::GoalSatisfied { goal };
            }

            if !self.begin_plan(ctx, goal, world) {
                return TickOutcome::NoPlan { goal };
            }
        }

        let Some(goal) = self.active_goal else {
            return TickOutcome::NoGoal;
        };
        self.execute(ctx, goal, world)
    }

    /// Cancels the in-flight action, drops the plan and clears the active goal.
    pub fn reset(&mut self, ctx: &TickContext, world: &WorldState) {
        if self.phase == ExecutorPhase::Executing {
            self.abandon(ctx, world);
        }
        self.clear();
    }

    /// Renumbers every action and goal after the state at `removed` was deleted.
    ///
    /// Any running plan refers to the old numbering, so call [`Executor::reset`] first.
    pub fn forget_state(&mut self, removed: StateIndex) {
        for action in &mut self.actions {
            action.forget_state(removed);
        }
        for goal in &mut self.goals {
            goal.forget_state(removed);
        }
    }

    fn begin_plan(&mut self, ctx: &TickContext, goal: GoalId, world: &WorldState) -> bool {
        self.phase = ExecutorPhase::Planning;
        self.plan_calls = self.plan_calls.saturating_add(1);
        self.emit(ctx, "goap.plan.call", goal.0, self.actions.len());

        let result = self
            .planner
            .search(world, self.goals[goal.0].constraints(), &self.actions);
        let stats = result.stats;
        let plan = result.plan();
        self.last_search = Some(stats);

        tracing::debug!(
            goal = self.goals[goal.0].name(),
            expanded = stats.expanded,
            pruned = stats.pruned,
            budget_exhausted = stats.budget_exhausted,
            found = plan.is_some(),
            "goal planned"
        );
        let steps = plan.as_ref().map(Plan::len).unwrap_or(0);
        self.emit(ctx, "goap.plan.result", steps, stats.expanded);

        let Some(plan) = plan else {
            self.clear();
            self.emit(ctx, "goap.plan.none", goal.0, 0);
            return false;
        };

        tracing::info!(
            goal = self.goals[goal.0].name(),
            steps = plan.len(),
            cost = plan.cost,
            "plan started"
        );
        self.emit(ctx, "goap.plan.start", plan.len(), plan.cost as usize);

        self.queue = plan.steps.clone();
        self.plan = Some(plan);
        self.in_flight = None;
        self.active_goal = Some(goal);
        self.phase = ExecutorPhase::Executing;
        true
    }

    fn execute(&mut self, ctx: &TickContext, goal: GoalId, world: &mut WorldState) -> TickOutcome {
        let step = match self.in_flight {
            Some(step) => step,
            None => {
                let Some(step) = self.queue.pop_front() else {
                    self.clear();
                    return TickOutcome::NoGoal;
                };
                let started = self.actions[step.action.0].start(ctx, world, step.precondition);
                if !started {
                    tracing::warn!(
                        action = self.actions[step.action.0].name(),
                        "action rejected at start, dropping plan"
                    );
                    self.emit(ctx, "goap.action.rejected", step.action.0, goal.0);
                    self.clear();
                    return TickOutcome::ActionRejected {
                        goal,
                        action: step.action,
                    };
                }
                self.emit(ctx, "goap.action.start", step.action.0, step.precondition);
                self.in_flight = Some(step);
                step
            }
        };

        let action = step.action;
        match self.actions[action.0].step(ctx, world) {
            ActionState::Loading => TickOutcome::Running { goal, action },
            ActionState::Failed => self.fail(ctx, goal, action),
            ActionState::Finished => {
                if let Err(err) = self.actions[action.0].apply_effects_to(world) {
                    tracing::warn!(
                        action = self.actions[action.0].name(),
                        error = %err,
                        "action effects rejected"
                    );
                    return self.fail(ctx, goal, action);
                }

                self.in_flight = None;
                self.emit(ctx, "goap.action.finished", action.0, goal.0);

                if !self.queue.is_empty() {
                    return TickOutcome::ActionFinished { goal, action };
                }

                tracing::info!(goal = self.goals[goal.0].name(), "plan completed");
                self.emit(ctx, "goap.plan.complete", goal.0, 0);
                self.clear();
                TickOutcome::PlanCompleted { goal, action }
            }
        }
    }

    fn fail(&mut self, ctx: &TickContext, goal: GoalId, action: ActionId) -> TickOutcome {
        tracing::warn!(
            action = self.actions[action.0].name(),
            goal = self.goals[goal.0].name(),
            remaining = self.queue.len(),
            "action failed, dropping plan"
        );
        self.emit(ctx, "goap.action.failed", action.0, goal.0);
        self.clear();
        TickOutcome::ActionFailed { goal, action }
    }

    fn abandon(&mut self, ctx: &TickContext, world: &WorldState) {
        if let Some(step) = self.in_flight {
            self.actions[step.action.0].cancel(ctx, world);
        }
        let goal = self.active_goal.map(|g| g.0).unwrap_or(usize::MAX);
        tracing::debug!(remaining = self.queue.len(), "plan abandoned");
        self.emit(ctx, "goap.plan.abandoned", goal, 0);
        self.clear();
    }

    fn clear(&mut self) {
        self.phase = ExecutorPhase::Idle;
        self.active_goal = None;
        self.plan = None;
        self.queue.clear();
        self.in_flight = None;
    }

    fn emit(&mut self, ctx: &TickContext, tag: &'static str, a: usize, b: usize) {
        if let Some(sink) = self.trace.as_mut() {
            sink.emit(TraceEvent::new(ctx.tick, tag, a as u64, b as u64));
        }
    }
}

fn check_reference(
    owner: &str,
    constraint: &Constraint,
    world: &WorldState,
) -> Result<(), DefinitionError> {
    let Some(state) = world.get(constraint.index) else {
        return Err(DefinitionError::IndexOutOfRange {
            owner: owner.to_string(),
            index: constraint.index,
            len: world.len(),
        });
    };
    if state.kind() != constraint.value.kind() {
        return Err(DefinitionError::KindMismatch {
            owner: owner.to_string(),
            state: state.name().to_string(),
            expected: state.kind(),
            found: constraint.value.kind(),
        });
    }
    Ok(())
}
