use std::cell::Cell;
use std::rc::Rc;

use goap_config::{AgentDefinition, MethodRef, MethodTable};
use goap_core::{
    ActionState, BindingError, Capability, DefinitionError, FinishImmediately, StateValue,
    TickContext, Value, ValueKind, WorldState,
};
use goap_planner::{GoalId, TickOutcome};

const GUARD: &str = r#"
name: guard
executor:
  planner: { max_depth: 4 }
states:
  - name: intruder
    value: false
    update: { component: Eyes, method: intruder }
  - { name: armed, value: false }
  - { name: intruder_gone, value: false }
actions:
  - name: Draw_Weapon
    preconditions:
      - { cost: 1, require: { armed: false } }
    effects: { armed: true }
    run: { component: Hands, method: draw }
  - name: Chase
    preconditions:
      - { cost: 5, require: { armed: true, intruder_gone: false } }
    effects: { intruder_gone: true }
    run: { component: Legs, method: chase }
goals:
  - name: secure
    require: { intruder_gone: true }
    consideration: { component: Eyes, method: threat }
  - name: idle
    consideration: 0.1
"#;

fn table(eyes: Rc<Cell<bool>>) -> MethodTable {
    let mut table = MethodTable::new();
    table
        .register_updater(
            MethodRef::new("Eyes", "intruder"),
            ValueKind::Bool,
            move || {
                let eyes = Rc::clone(&eyes);
                move || Value::Bool(eyes.get())
            },
        )
        .register_consideration(MethodRef::new("Eyes", "threat"), || {
            |world: &WorldState| -> f32 {
                match world.value(0).and_then(|v| v.value().as_bool()) {
                    Some(true) => 1.0,
                    _ => 0.0,
                }
            }
        })
        .register_stepper(MethodRef::new("Hands", "draw"), || FinishImmediately)
        .register_stepper(MethodRef::new("Legs", "chase"), || {
            |_: &TickContext, _: &WorldState| ActionState::Finished
        });
    table
}

#[test]
fn builds_and_runs_a_bound_agent() {
    let seen = Rc::new(Cell::new(false));
    let def = AgentDefinition::from_yaml(GUARD).unwrap();
    let mut agent = def.build(&table(Rc::clone(&seen))).unwrap();

    assert_eq!(agent.world().len(), 3);
    assert_eq!(agent.executor().planner().config().max_depth, Some(4));

    let ctx = TickContext::default();
    let outcome = agent.tick(&ctx);
    assert_eq!(outcome, TickOutcome::GoalSatisfied { goal: GoalId(1) });

    seen.set(true);
    let outcome = agent.tick(&ctx.next());
    assert_eq!(outcome.goal(), Some(GoalId(0)));
    assert_eq!(
        agent.executor().current_plan().map(|p| p.action_names(agent.executor().actions())),
        Some(vec!["Draw_Weapon", "Chase"])
    );

    agent.tick(&ctx.next().next());
    assert_eq!(agent.world().value(2), Some(&StateValue::new(true)));
}

#[test]
fn unknown_state_name_is_reported_with_its_owner() {
    let yaml = r#"
states:
  - { name: armed, value: false }
goals:
  - name: secure
    require: { intruder_gone: true }
"#;
    let def = AgentDefinition::from_yaml(yaml).unwrap();
    let err = def.build(&MethodTable::new()).err().unwrap();
    assert_eq!(
        err,
        DefinitionError::UnknownStateName {
            owner: "goal `secure`".to_string(),
            name: "intruder_gone".to_string(),
        }
    );
}

#[test]
fn duplicate_state_names_are_rejected() {
    let yaml = r#"
states:
  - { name: armed, value: false }
  - { name: armed, value: true }
"#;
    let def = AgentDefinition::from_yaml(yaml).unwrap();
    let err = def.build(&MethodTable::new()).err().unwrap();
    assert_eq!(err, DefinitionError::DuplicateState("armed".to_string()));
}

#[test]
fn unbound_stepper_fails_the_build() {
    let def = AgentDefinition::from_yaml(GUARD).unwrap();
    let mut partial = MethodTable::new();
    partial.register_updater(MethodRef::new("Eyes", "intruder"), ValueKind::Bool, || {
        || Value::Bool(false)
    });

    let err = def.build(&partial).err().unwrap();
    assert_eq!(
        err,
        DefinitionError::Binding(BindingError::Unresolved {
            capability: Capability::ActionStepper,
            method: "Hands.draw".to_string(),
        })
    );
}

#[test]
fn updater_of_the_wrong_kind_fails_the_build() {
    let def = AgentDefinition::from_yaml(GUARD).unwrap();
    let mut wrong = MethodTable::new();
    wrong.register_updater(MethodRef::new("Eyes", "intruder"), ValueKind::Int, || {
        || Value::Int(1)
    });

    let err = def.build(&wrong).err().unwrap();
    assert!(matches!(
        err,
        DefinitionError::Binding(BindingError::Signature {
            capability: Capability::StateUpdater,
            ..
        })
    ));
}

#[test]
fn effect_of_the_wrong_kind_fails_validation() {
    let yaml = r#"
states:
  - { name: ammo, value: 0 }
actions:
  - name: Reload
    preconditions: [{ cost: 1 }]
    effects: { ammo: full }
    run: { component: Hands, method: reload }
"#;
    let def = AgentDefinition::from_yaml(yaml).unwrap();
    let mut table = MethodTable::new();
    table.register_stepper(MethodRef::new("Hands", "reload"), || FinishImmediately);

    let err = def.build(&table).err().unwrap();
    assert!(matches!(
        err,
        DefinitionError::KindMismatch {
            expected: ValueKind::Int,
            found: ValueKind::Text,
            ..
        }
    ));
}

#[test]
fn integer_literals_widen_to_float_states() {
    let yaml = r#"
states:
  - { name: health, value: 0.5 }
actions:
  - name: Heal
    preconditions: [{ cost: 1, require: { health: 0.5 } }]
    effects: { health: 1 }
    run: { component: Body, method: heal }
goals:
  - name: healthy
    require: { health: 1 }
"#;
    let def = AgentDefinition::from_yaml(yaml).unwrap();
    let mut table = MethodTable::new();
    table.register_stepper(MethodRef::new("Body", "heal"), || FinishImmediately);

    let mut agent = def.build(&table).unwrap();
    assert_eq!(
        agent.executor().goals()[0].constraints()[0].value,
        StateValue::new(1.0f64)
    );
    assert!(matches!(
        agent.tick(&TickContext::default()),
        TickOutcome::PlanCompleted { .. }
    ));
    assert_eq!(agent.world().value(0), Some(&StateValue::new(1.0f64)));
}
