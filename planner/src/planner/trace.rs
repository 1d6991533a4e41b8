use tabled::{Table, Tabled};

use super::result::PlanningResult;

#[derive(Tabled)]
struct SequenceRow {
    step: usize,
    action: String,
    #[tabled(rename = "type")]
    action_type: String,
    duration: f64,
    probability: f64,
    status: String,
}

/// Logs the planned steps as a table, or the failure reason.
pub fn display_planning_result(result: &PlanningResult) {
    match &result.sequence {
        Some(sequence) if result.success => {
            let rows: Vec<SequenceRow> = sequence
                .actions()
                .iter()
                .enumerate()
                .map(|(i, action)| SequenceRow {
                    step: i + 1,
                    action: action.name().to_owned(),
                    action_type: action.action_type().to_string(),
                    duration: action.duration(),
                    probability: action.success_probability(),
                    status: action.status().to_string(),
                })
                .collect();

            tracing::info!(
                "Planning result ({}, cost {:.2}):\n{}",
                result.algorithm,
                result.total_cost,
                Table::new(&rows)
            );
        }
        _ => tracing::info!(
            "No plan found ({}): {}",
            result.algorithm,
            result.reason.as_deref().unwrap_or("unknown reason")
        ),
    }
}
