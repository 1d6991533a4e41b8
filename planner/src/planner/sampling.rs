use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::result::PlanningResult;
use super::SearchContext;
use crate::action::Action;
use crate::settings::SamplingSettings;
use crate::state::StateMap;

/// Randomized rollouts up to a fixed iteration cap. Rollouts share nothing
/// with each other; the lowest-cost successful one wins. Only sensible
/// under loose time budgets.
pub(crate) fn search(
    ctx: &mut SearchContext<'_>,
    initial: StateMap,
    settings: &SamplingSettings,
) -> PlanningResult {
    let mut rng = match settings.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };

    let mut best: Option<(Vec<Action>, f64, StateMap)> = None;

    for _ in 0..settings.iterations {
        if ctx.over_time() {
            break;
        }
        ctx.count_expansion();

        let length = rng.gen_range(1..=settings.max_rollout_length.max(1));
        if let Some((actions, cost, final_state)) = rollout(ctx, &initial, length, &mut rng) {
            if best.as_ref().map_or(true, |(_, best_cost, _)| cost < *best_cost) {
                best = Some((actions, cost, final_state));
            }
        }
    }

    match best {
        Some((actions, cost, final_state)) => ctx.solved(actions, cost, &final_state),
        None => ctx.unsolved(),
    }
}

/// One bounded random walk, choosing uniformly among executable actions and
/// stopping early when the goal is reached.
fn rollout(
    ctx: &SearchContext<'_>,
    initial: &StateMap,
    length: usize,
    rng: &mut ChaCha20Rng,
) -> Option<(Vec<Action>, f64, StateMap)> {
    let mut current = initial.clone();
    let mut taken = Vec::new();
    let mut cost = 0.0;

    for _ in 0..length {
        if ctx.goal_reached(&current) {
            return Some((taken, cost, current));
        }

        let executable: Vec<&Action> = ctx
            .actions
            .iter()
            .filter(|a| a.can_execute(&current))
            .collect();
        if executable.is_empty() {
            return None;
        }

        let mut action = executable[rng.gen_range(0..executable.len())].clone();
        current = action.execute(&current).ok()?;
        cost += action.duration();
        taken.push(action);
    }

    if ctx.goal_reached(&current) {
        Some((taken, cost, current))
    } else {
        None
    }
}
