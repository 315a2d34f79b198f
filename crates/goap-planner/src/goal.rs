use core::fmt;

use goap_core::{Constraint, StateIndex, Value, WorldState};
use goap_utility::{Consideration, UtilityCurve};

use crate::action::shift_index;

/// Index of a [`Goal`] in the executor's goal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalId(pub usize);

pub struct Goal {
    name: String,
    constraints: Vec<Constraint>,
    consideration: Box<dyn Consideration>,
    curve: UtilityCurve,
}

impl Goal {
    pub fn new(name: impl Into<String>, consideration: impl Consideration) -> Self {
        Self::with_boxed_consideration(name, Box::new(consideration))
    }

    pub fn with_boxed_consideration(
        name: impl Into<String>,
        consideration: Box<dyn Consideration>,
    ) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            consideration,
            curve: UtilityCurve::Identity,
        }
    }

    pub fn require(mut self, index: StateIndex, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint::new(index, value));
        self
    }

    pub fn with_curve(mut self, curve: UtilityCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn curve(&self) -> &UtilityCurve {
        &self.curve
    }

    pub fn is_satisfied_by(&self, world: &WorldState) -> bool {
        world.satisfies(&self.constraints)
    }

    /// `curve(consideration(world))`.
    pub fn utility(&mut self, world: &WorldState) -> f32 {
        let raw = self.consideration.consider(world);
        self.curve.evaluate(raw)
    }

    pub fn forget_state(&mut self, removed: StateIndex) {
        self.constraints
            .retain_mut(|c| shift_index(&mut c.index, removed));
    }
}

impl fmt::Debug for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Goal")
            .field("name", &self.name)
            .field("constraints", &self.constraints)
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use goap_utility::Constant;

    use super::*;

    #[test]
    fn utility_applies_the_curve() {
        let world = WorldState::new().with_state("a", false);
        let mut goal = Goal::new("g", Constant(0.5)).with_curve(UtilityCurve::Linear {
            slope: 2.0,
            intercept: 0.25,
        });
        assert_eq!(goal.utility(&world), 1.25);
    }

    #[test]
    fn satisfaction_uses_every_constraint() {
        let world = WorldState::new().with_state("a", true).with_state("b", false);
        let goal = Goal::new("g", Constant(1.0)).require(0, true);
        assert!(goal.is_satisfied_by(&world));
        let goal = goal.require(1, true);
        assert!(!goal.is_satisfied_by(&world));
    }
}
