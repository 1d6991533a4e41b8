mod helper;

use assert_json_diff::assert_json_eq;
use serde_json::json;

use helper::{
    action, door_closed, door_open_goal, open_door, planner, planner_with_budget, state,
};

use crate::action::ActionSequence;
use crate::planner::{
    display_planning_result, HeuristicCalculator, HeuristicStrategy, PlanningStrategy,
    NO_SOLUTION_REASON,
};
use crate::state::goal_reached;

#[test]
fn one_step_door_plan_for_bfs_astar_and_greedy() {
    for strategy in [
        PlanningStrategy::Bfs,
        PlanningStrategy::AStar,
        PlanningStrategy::Greedy,
    ] {
        let result = planner(strategy).plan(&door_closed(), &door_open_goal(), &[open_door()], None);
        display_planning_result(&result);

        assert!(result.success, "{strategy} should find the one-step plan");
        assert_eq!(result.plan_length, 1);
        assert_eq!(result.total_cost, 1.5, "cost must equal the action duration");
        assert_eq!(
            result.sequence.as_ref().unwrap().actions()[0].name(),
            "open_door"
        );
    }
}

#[test]
fn unreachable_goal_key_fails_within_limits() {
    let result = planner(PlanningStrategy::Bfs).plan(
        &door_closed(),
        &state(&[("unicorn", json!(true))]),
        &[open_door()],
        None,
    );

    assert!(!result.success);
    assert_eq!(result.reason.as_deref(), Some(NO_SOLUTION_REASON));
    assert!(result.total_cost.is_infinite());
}

#[test]
fn dfs_finds_a_possibly_longer_solution() {
    let actions = vec![
        action("warm_up", &[], &["ready=true"], 1.0),
        action("finish", &["ready"], &["done=true"], 1.0),
    ];

    let result = planner(PlanningStrategy::Dfs).plan(
        &state(&[("done", json!(false))]),
        &state(&[("done", json!(true))]),
        &actions,
        None,
    );

    assert!(result.success);
    assert!(goal_reached(
        &result.final_state().unwrap(),
        &state(&[("done", json!(true))])
    ));
}

#[test]
fn bfs_returns_minimal_action_count_not_minimal_cost() {
    let actions = vec![
        action("warm_up", &[], &["ready=true"], 1.0),
        action("finish", &["ready"], &["done=true"], 1.0),
        action("direct", &[], &["done=true"], 10.0),
    ];

    let result = planner(PlanningStrategy::Bfs).plan(
        &state(&[("done", json!(false))]),
        &state(&[("done", json!(true))]),
        &actions,
        None,
    );

    assert!(result.success);
    assert_eq!(result.plan_length, 1);
    assert_eq!(result.sequence.as_ref().unwrap().actions()[0].name(), "direct");
    assert_eq!(result.total_cost, 10.0);
}

#[test]
fn astar_with_zero_heuristic_orders_by_path_cost_alone() {
    let actions = vec![
        action("warm_up", &[], &["ready=true"], 1.0),
        action("finish", &["ready"], &["done=true"], 1.0),
        action("direct", &[], &["done=true"], 10.0),
    ];

    let result = planner(PlanningStrategy::AStar)
        .with_heuristic(HeuristicCalculator::new(HeuristicStrategy::Zero))
        .plan(
            &state(&[("done", json!(false))]),
            &state(&[("done", json!(true))]),
            &actions,
            None,
        );

    //uniform-cost behavior: the cheap two-step route beats the direct one
    assert!(result.success);
    assert_eq!(result.plan_length, 2);
    assert_eq!(result.total_cost, 2.0);
}

#[test]
fn hierarchical_solves_location_before_boolean_subgoal() {
    let actions = vec![
        action("goto_kitchen", &[], &["robot_location=kitchen"], 2.0),
        action("switch_lamp", &[], &["lamp_on=true"], 1.0),
    ];

    let result = planner(PlanningStrategy::Hierarchical).plan(
        &state(&[("robot_location", json!("dock")), ("lamp_on", json!(false))]),
        &state(&[("robot_location", json!("kitchen")), ("lamp_on", json!(true))]),
        &actions,
        None,
    );

    assert!(result.success);

    let groups = result.metadata["subgoal_groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2, "one location group, then one boolean group");
    assert!(groups[0].as_object().unwrap().contains_key("robot_location"));
    assert!(groups[1].as_object().unwrap().contains_key("lamp_on"));

    let names: Vec<&str> = result
        .sequence
        .as_ref()
        .unwrap()
        .actions()
        .iter()
        .map(|a| a.name())
        .collect();
    assert_eq!(names, vec!["goto_kitchen", "switch_lamp"]);
}

#[test]
fn hierarchical_aborts_on_first_failing_subgoal() {
    let actions = vec![action("goto_kitchen", &[], &["robot_location=kitchen"], 2.0)];

    let result = planner(PlanningStrategy::Hierarchical).plan(
        &state(&[("robot_location", json!("dock"))]),
        &state(&[("robot_location", json!("kitchen")), ("lamp_on", json!(true))]),
        &actions,
        None,
    );

    assert!(!result.success);
    assert_eq!(result.reason.as_deref(), Some(NO_SOLUTION_REASON));
    assert!(result.metadata.contains_key("failed_subgoal"));
}

#[test]
fn sampling_with_zero_time_budget_fails_without_expansions() {
    let result = planner_with_budget(PlanningStrategy::Sampling, 0).plan(
        &door_closed(),
        &door_open_goal(),
        &[open_door()],
        None,
    );

    assert!(!result.success);
    assert_eq!(result.nodes_expanded, 0);
    assert_eq!(result.reason.as_deref(), Some(NO_SOLUTION_REASON));
}

#[test]
fn sampling_finds_the_door_plan_with_a_fixed_seed() {
    let result = planner(PlanningStrategy::Sampling).plan(
        &door_closed(),
        &door_open_goal(),
        &[open_door()],
        None,
    );

    assert!(result.success);
    assert_eq!(result.plan_length, 1);
    assert_eq!(result.total_cost, 1.5);
}

#[test]
fn greedy_stuck_at_the_first_step_reports_one_expansion() {
    let actions = vec![action("escape", &["ready"], &["done=true"], 1.0)];

    let result = planner(PlanningStrategy::Greedy).plan(
        &state(&[("ready", json!(false))]),
        &state(&[("done", json!(true))]),
        &actions,
        None,
    );

    assert!(!result.success);
    assert_eq!(result.nodes_expanded, 1);
    assert_eq!(result.reason.as_deref(), Some(NO_SOLUTION_REASON));
}

#[test]
fn empty_request_is_rejected_before_searching() {
    let result = planner(PlanningStrategy::Bfs).plan(
        &door_closed(),
        &state(&[]),
        &[open_door()],
        None,
    );

    assert!(!result.success);
    assert_eq!(result.nodes_expanded, 0);
    assert!(result.reason.as_deref().unwrap().contains("must not be empty"));
}

#[test]
fn successful_results_satisfy_the_goal_comparator() {
    for strategy in [
        PlanningStrategy::Bfs,
        PlanningStrategy::Dfs,
        PlanningStrategy::AStar,
        PlanningStrategy::Greedy,
        PlanningStrategy::Hierarchical,
        PlanningStrategy::Sampling,
    ] {
        let goal = door_open_goal();
        let result = planner(strategy).plan(&door_closed(), &goal, &[open_door()], None);

        assert!(result.success, "{strategy} should solve the door scenario");
        assert!(
            goal_reached(&result.final_state().unwrap(), &goal),
            "{strategy} final state must satisfy the goal"
        );
    }
}

#[test]
fn planned_sequences_round_trip_through_their_exchange_form() {
    let result = planner(PlanningStrategy::Bfs).plan(
        &door_closed(),
        &door_open_goal(),
        &[open_door()],
        None,
    );
    let sequence = result.sequence.unwrap();

    let json = serde_json::to_value(&sequence).unwrap();
    let restored: ActionSequence = serde_json::from_value(json.clone()).unwrap();

    assert_eq!(sequence, restored);
    assert_json_eq!(json, serde_json::to_value(&restored).unwrap());
}
