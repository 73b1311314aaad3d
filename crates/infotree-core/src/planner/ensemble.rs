use crate::{model::GenerativeModel, planner::search::Planner, tree::ids::ActionId};

/// Pick the action maximizing the summed root values of several independent planners.
///
/// This is how several targets are tracked at once: one planner per target, all
/// sharing the action space, with their value estimates added up. Ties go to the
/// earliest action. Returns `None` when there are no planners.
pub fn combined_best_action<M: GenerativeModel>(planners: &[Planner<'_, M>]) -> Option<ActionId> {
    let first = planners.first()?;
    let mut totals = vec![0.0_f64; first.model().action_count()];

    for planner in planners {
        for (total, value) in totals.iter_mut().zip(planner.root_action_values()) {
            *total += value;
        }
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, total) in totals.into_iter().enumerate() {
        match best {
            Some((_, best_total)) if best_total >= total => {}
            _ => best = Some((i, total)),
        }
    }
    best.map(|(i, _)| ActionId::from(i))
}
