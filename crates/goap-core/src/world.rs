use core::fmt;
use std::rc::Rc;

use crate::{StateValue, Value, ValueKind, WorldError};

/// Position of a [`State`] inside its [`WorldState`]. Actions and goals refer to states only by
/// index at runtime.
pub type StateIndex = usize;

/// Produces a fresh value for a state once per tick.
pub trait StateUpdater: 'static {
    fn update(&mut self) -> Value;
}

impl<F> StateUpdater for F
where
    F: FnMut() -> Value + 'static,
{
    fn update(&mut self) -> Value {
        self()
    }
}

pub struct State {
    name: Rc<str>,
    value: StateValue,
    updater: Option<Box<dyn StateUpdater>>,
}

impl State {
    pub fn new(name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            value: StateValue::new(value),
            updater: None,
        }
    }

    pub fn with_updater(mut self, updater: impl StateUpdater) -> Self {
        self.updater = Some(Box::new(updater));
        self
    }

    pub fn with_boxed_updater(mut self, updater: Box<dyn StateUpdater>) -> Self {
        self.updater = Some(updater);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &StateValue {
        &self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    pub fn has_updater(&self) -> bool {
        self.updater.is_some()
    }

    fn accepts(&self, kind: ValueKind) -> Result<(), WorldError> {
        if kind != self.kind() {
            return Err(WorldError::KindMismatch {
                state: self.name.to_string(),
                expected: self.kind(),
                found: kind,
            });
        }
        Ok(())
    }

    fn assign(&mut self, value: StateValue) -> Result<(), WorldError> {
        self.accepts(value.kind())?;
        self.value = value;
        Ok(())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("updater", &self.updater.is_some())
            .finish()
    }
}

/// A required value at a state index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub index: StateIndex,
    pub value: StateValue,
}

impl Constraint {
    pub fn new(index: StateIndex, value: impl Into<Value>) -> Self {
        Self {
            index,
            value: StateValue::new(value),
        }
    }

    pub fn is_satisfied_by(&self, world: &WorldState) -> bool {
        world
            .value(self.index)
            .is_some_and(|current| *current == self.value)
    }
}

/// The agent's ordered belief about the world.
///
/// Kinds are fixed per state: every write is checked against the kind the state was created
/// with. Snapshots copy names and values but never updaters, so only the live world is refreshed.
#[derive(Debug, Default)]
pub struct WorldState {
    states: Vec<State>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.push(State::new(name, value));
        self
    }

    pub fn push(&mut self, state: State) -> StateIndex {
        self.states.push(state);
        self.states.len() - 1
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: StateIndex) -> Option<&State> {
        self.states.get(index)
    }

    pub fn value(&self, index: StateIndex) -> Option<&StateValue> {
        self.states.get(index).map(State::value)
    }

    pub fn index_of(&self, name: &str) -> Option<StateIndex> {
        self.states.iter().position(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    pub fn set(&mut self, index: StateIndex, value: StateValue) -> Result<(), WorldError> {
        self.states
            .get_mut(index)
            .ok_or(WorldError::UnknownState(index))?
            .assign(value)
    }

    /// Checks that `set(index, _)` would accept a value of `kind`, without writing.
    pub fn check(&self, index: StateIndex, kind: ValueKind) -> Result<(), WorldError> {
        self.states
            .get(index)
            .ok_or(WorldError::UnknownState(index))?
            .accepts(kind)
    }

    pub fn satisfies(&self, constraints: &[Constraint]) -> bool {
        constraints.iter().all(|c| c.is_satisfied_by(self))
    }

    /// Runs every updater and stores its result.
    ///
    /// Updates of the wrong kind are skipped; the remaining updates still apply and the first
    /// rejection is returned. On success returns how many states were refreshed.
    pub fn refresh(&mut self) -> Result<usize, WorldError> {
        let mut refreshed = 0;
        let mut first_error = None;

        for state in &mut self.states {
            let Some(updater) = state.updater.as_mut() else {
                continue;
            };
            let value = StateValue::new(updater.update());
            match state.assign(value) {
                Ok(()) => refreshed += 1,
                Err(err) => {
                    tracing::warn!(state = %state.name, error = %err, "state update rejected");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(refreshed),
        }
    }

    /// Independent copy of every name and value. Hashes are carried over, updaters are not.
    pub fn snapshot(&self) -> WorldState {
        WorldState {
            states: self
                .states
                .iter()
                .map(|s| State {
                    name: Rc::clone(&s.name),
                    value: s.value.clone(),
                    updater: None,
                })
                .collect(),
        }
    }

    /// Removes a state. Every index above `index` shifts down by one; callers holding indices
    /// must renumber them.
    pub fn remove(&mut self, index: StateIndex) -> Result<State, WorldError> {
        if index >= self.states.len() {
            return Err(WorldError::UnknownState(index));
        }
        Ok(self.states.remove(index))
    }

    /// Indices whose values differ from `other`. Worlds of different lengths also report the
    /// indices present in only one of them.
    pub fn diff(&self, other: &WorldState) -> Vec<StateIndex> {
        let len = self.len().max(other.len());
        (0..len)
            .filter(|&i| self.value(i) != other.value(i))
            .collect()
    }
}

/// Shifts a state reference after the state at `removed` was deleted.
///
/// Returns `None` when the reference pointed at the removed state itself.
pub fn reindex_after_removal(index: StateIndex, removed: StateIndex) -> Option<StateIndex> {
    match index.cmp(&removed) {
        core::cmp::Ordering::Less => Some(index),
        core::cmp::Ordering::Equal => None,
        core::cmp::Ordering::Greater => Some(index - 1),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn world() -> WorldState {
        WorldState::new()
            .with_state("a", false)
            .with_state("b", 3i64)
            .with_state("pos", [0.0f32, 0.0])
    }

    #[test]
    fn set_checks_index_and_kind() {
        let mut w = world();
        assert_eq!(
            w.set(7, StateValue::new(true)),
            Err(WorldError::UnknownState(7))
        );
        assert!(matches!(
            w.set(0, StateValue::new(1i64)),
            Err(WorldError::KindMismatch {
                expected: ValueKind::Bool,
                found: ValueKind::Int,
                ..
            })
        ));
        w.set(0, StateValue::new(true)).unwrap();
        assert_eq!(w.value(0), Some(&StateValue::new(true)));
    }

    #[test]
    fn snapshot_is_independent() {
        let w = world();
        let mut snap = w.snapshot();
        snap.set(1, StateValue::new(4i64)).unwrap();
        assert_eq!(w.value(1), Some(&StateValue::new(3i64)));
        assert_eq!(w.diff(&snap), vec![1]);
        assert_eq!(w.value(2).map(StateValue::hash), snap.value(2).map(StateValue::hash));
    }

    #[test]
    fn refresh_runs_updaters_and_skips_wrong_kinds() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut w = WorldState::new();
        w.push(State::new("ammo", 0i64).with_updater(move || {
            counter.set(counter.get() + 1);
            Value::Int(counter.get())
        }));
        w.push(State::new("alert", false).with_updater(|| Value::Int(1)));
        w.push(State::new("static", true));

        let err = w.refresh().unwrap_err();
        assert!(matches!(err, WorldError::KindMismatch { .. }));
        assert_eq!(calls.get(), 1);
        assert_eq!(w.value(0), Some(&StateValue::new(1i64)));
        assert_eq!(w.value(1), Some(&StateValue::new(false)));

        let snap = w.snapshot();
        assert!(!snap.get(0).unwrap().has_updater());
    }

    #[test]
    fn check_reports_what_set_would_reject() {
        let w = world();
        assert_eq!(w.check(0, ValueKind::Bool), Ok(()));
        assert_eq!(w.check(7, ValueKind::Bool), Err(WorldError::UnknownState(7)));
        assert!(matches!(
            w.check(0, ValueKind::Int),
            Err(WorldError::KindMismatch { .. })
        ));
    }

    #[test]
    fn satisfies_requires_every_constraint() {
        let w = world();
        assert!(w.satisfies(&[]));
        assert!(w.satisfies(&[Constraint::new(0, false), Constraint::new(1, 3i64)]));
        assert!(!w.satisfies(&[Constraint::new(0, false), Constraint::new(1, 4i64)]));
        assert!(!w.satisfies(&[Constraint::new(9, false)]));
    }

    #[test]
    fn removal_shifts_indices() {
        let mut w = world();
        let removed = w.remove(1).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(w.index_of("pos"), Some(1));
        assert_eq!(reindex_after_removal(0, 1), Some(0));
        assert_eq!(reindex_after_removal(1, 1), None);
        assert_eq!(reindex_after_removal(2, 1), Some(1));
        assert!(w.remove(5).is_err());
    }
}
