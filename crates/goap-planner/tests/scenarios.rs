use goap_core::{Constraint, FinishImmediately, StateIndex, WorldState};
use goap_planner::{Action, ActionId, Planner, Precondition};

const A: StateIndex = 0;
const B: StateIndex = 1;

fn world() -> WorldState {
    WorldState::new().with_state("A", false).with_state("B", false)
}

fn flip_a(name: &str, cost: u32) -> Action {
    Action::new(name, FinishImmediately)
        .with_precondition(Precondition::new(cost).require(A, false))
        .with_effect(A, true)
}

fn flip_b(cost: u32) -> Action {
    Action::new("Flip_B", FinishImmediately)
        .with_precondition(Precondition::new(cost).require(A, true))
        .with_effect(B, true)
}

#[test]
fn single_action_plan() {
    let actions = vec![flip_a("Flip_A", 1)];
    let plan = Planner::new()
        .plan(&world(), &[Constraint::new(A, true)], &actions)
        .expect("plan");

    assert_eq!(plan.action_names(&actions), vec!["Flip_A"]);
    assert_eq!(plan.cost, 1);
}

#[test]
fn cheaper_equivalent_action_wins() {
    let actions = vec![flip_a("Flip_A", 5), flip_a("Flip_A_Cheap", 1)];
    let plan = Planner::new()
        .plan(&world(), &[Constraint::new(A, true)], &actions)
        .expect("plan");

    assert_eq!(plan.action_names(&actions), vec!["Flip_A_Cheap"]);
    assert_eq!(plan.cost, 1);
}

#[test]
fn chained_actions_sum_their_costs() {
    // Declared out of order so the planner has to discover the sequence.
    let actions = vec![flip_b(3), flip_a("Flip_A", 2)];
    let plan = Planner::new()
        .plan(&world(), &[Constraint::new(B, true)], &actions)
        .expect("plan");

    assert_eq!(plan.action_names(&actions), vec!["Flip_A", "Flip_B"]);
    assert_eq!(plan.action_ids(), vec![ActionId(1), ActionId(0)]);
    assert_eq!(plan.cost, 5);
    assert_eq!(plan.steps[0].cost, 2);
    assert_eq!(plan.steps[1].cost, 5);
}

#[test]
fn unreachable_goal_has_no_plan() {
    let actions = vec![flip_a("Flip_A", 1)];
    let result = Planner::new().search(&world(), &[Constraint::new(B, true)], &actions);

    assert!(result.best.is_none());
    assert!(result.plan().is_none());
    assert_eq!(result.stats.goal_hits, 0);
}

#[test]
fn winning_chain_keeps_snapshots_and_branches() {
    let actions = vec![
        Action::new("Flip_A", FinishImmediately)
            .with_precondition(Precondition::new(4).require(B, true))
            .with_precondition(Precondition::new(1).require(A, false))
            .with_effect(A, true),
        flip_b(1),
    ];
    let start = world();
    let result = Planner::new().search(&start, &[Constraint::new(B, true)], &actions);
    let leaf = result.best.expect("plan");

    let path = leaf.path();
    assert_eq!(path.len(), 3);
    assert!(path[0].is_root());
    assert_eq!(path[0].cost(), 0);
    assert_eq!(path[0].action(), None);
    assert_eq!(path[1].action(), Some(ActionId(0)));
    assert_eq!(path[1].precondition(), 1);
    assert_eq!(path[1].world().diff(&start), vec![A]);
    assert_eq!(path[2].world().diff(&start), vec![A, B]);
    assert_eq!(leaf.parent().map(|p| p.cost()), Some(1));

    // The live world is never touched by the search.
    assert!(start.diff(&world()).is_empty());
}

#[test]
fn first_match_precondition_sets_the_branch_cost() {
    // Both preconditions hold; the first one is taken even though it is dearer.
    let actions = vec![Action::new("Flip_A", FinishImmediately)
        .with_precondition(Precondition::new(7).require(B, false))
        .with_precondition(Precondition::new(1).require(A, false))
        .with_effect(A, true)];

    let plan = Planner::new()
        .plan(&world(), &[Constraint::new(A, true)], &actions)
        .expect("plan");
    assert_eq!(plan.steps[0].precondition, 0);
    assert_eq!(plan.cost, 7);
}

#[test]
fn actions_do_not_repeat_along_a_path() {
    let counter_world = WorldState::new().with_state("n", 0i64);
    let bump = |from: i64| {
        Action::new(format!("bump_{from}"), FinishImmediately)
            .with_precondition(Precondition::new(1).require(0, from))
            .with_effect(0, from + 1)
    };
    let actions = vec![bump(0), bump(1)];

    assert!(Planner::new()
        .plan(&counter_world, &[Constraint::new(0, 2i64)], &actions)
        .is_some());
    assert!(Planner::new()
        .plan(&counter_world, &[Constraint::new(0, 3i64)], &actions)
        .is_none());
}
