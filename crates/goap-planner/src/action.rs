use core::fmt;

use goap_core::{
    reindex_after_removal, ActionState, ActionStepper, Constraint, StateIndex, StateValue,
    TickContext, Value, WorldError, WorldState,
};

/// Index of an [`Action`] in the executor's action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub usize);

/// A cost-tagged conjunction of required values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    pub constraints: Vec<Constraint>,
    pub cost: u32,
}

impl Precondition {
    pub fn new(cost: u32) -> Self {
        Self {
            constraints: Vec::new(),
            cost,
        }
    }

    pub fn require(mut self, index: StateIndex, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint::new(index, value));
        self
    }

    pub fn is_satisfied_by(&self, world: &WorldState) -> bool {
        world.satisfies(&self.constraints)
    }
}

/// An unconditional write applied when an action finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    pub index: StateIndex,
    pub value: StateValue,
}

impl Effect {
    pub fn new(index: StateIndex, value: impl Into<Value>) -> Self {
        Self {
            index,
            value: StateValue::new(value),
        }
    }
}

pub struct Action {
    name: String,
    preconditions: Vec<Precondition>,
    effects: Vec<Effect>,
    stepper: Box<dyn ActionStepper>,
}

impl Action {
    pub fn new(name: impl Into<String>, stepper: impl ActionStepper) -> Self {
        Self::with_boxed_stepper(name, Box::new(stepper))
    }

    pub fn with_boxed_stepper(name: impl Into<String>, stepper: Box<dyn ActionStepper>) -> Self {
        Self {
            name: name.into(),
            preconditions: Vec::new(),
            effects: Vec::new(),
            stepper,
        }
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    pub fn with_effect(mut self, index: StateIndex, value: impl Into<Value>) -> Self {
        self.effects.push(Effect::new(index, value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Index of the first precondition `world` satisfies, in declaration order.
    ///
    /// First match wins even when a later precondition is cheaper: authors order preconditions
    /// to express which branch they prefer.
    pub fn match_precondition(&self, world: &WorldState) -> Option<usize> {
        self.preconditions
            .iter()
            .position(|p| p.is_satisfied_by(world))
    }

    pub fn cost(&self, precondition: usize) -> Option<u32> {
        self.preconditions.get(precondition).map(|p| p.cost)
    }

    /// A snapshot of `world` with every effect written. Other indices keep their values and
    /// hashes.
    pub fn apply_effects(&self, world: &WorldState) -> Result<WorldState, WorldError> {
        let mut next = world.snapshot();
        self.apply_effects_to(&mut next)?;
        Ok(next)
    }

    /// Writes every effect into `world`, or none of them: all targets are checked before the
    /// first write.
    pub fn apply_effects_to(&self, world: &mut WorldState) -> Result<(), WorldError> {
        for effect in &self.effects {
            world.check(effect.index, effect.value.kind())?;
        }
        for effect in &self.effects {
            world.set(effect.index, effect.value.clone())?;
        }
        Ok(())
    }

    /// Begins a run. Rejected when the planned precondition no longer holds on the live world,
    /// or when the stepper refuses to start.
    pub fn start(&mut self, ctx: &TickContext, world: &WorldState, precondition: usize) -> bool {
        let still_holds = self
            .preconditions
            .get(precondition)
            .is_some_and(|p| p.is_satisfied_by(world));
        still_holds && self.stepper.start(ctx, world)
    }

    pub fn step(&mut self, ctx: &TickContext, world: &WorldState) -> ActionState {
        self.stepper.step(ctx, world)
    }

    pub fn cancel(&mut self, ctx: &TickContext, world: &WorldState) {
        self.stepper.cancel(ctx, world);
    }

    /// Renumbers state references after the state at `removed` was deleted. Constraints and
    /// effects on the removed state are dropped.
    pub fn forget_state(&mut self, removed: StateIndex) {
        for precondition in &mut self.preconditions {
            precondition
                .constraints
                .retain_mut(|c| shift_index(&mut c.index, removed));
        }
        self.effects
            .retain_mut(|e| shift_index(&mut e.index, removed));
    }
}

/// Applies a state removal to one reference; `false` means the reference must be dropped.
pub(crate) fn shift_index(index: &mut StateIndex, removed: StateIndex) -> bool {
    match reindex_after_removal(*index, removed) {
        Some(shifted) => {
            *index = shifted;
            true
        }
        None => false,
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}
