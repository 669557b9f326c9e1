//! Search for the cell a unit should stand on to act against a target.

use skirmish_core::{CellCoord, Occupant};
use skirmish_system_pathing::{Occupancy, PathTree, Pathfinder};
use skirmish_system_range::{cells_at_exact_distance, UnitRanges};
use tracing::debug;

use crate::DecisionContext;

/// First cell with the strictly smallest cost in `tree`. Unreachable cells are skipped.
pub(crate) fn cheapest(
    tree: &PathTree,
    cells: impl IntoIterator<Item = CellCoord>,
) -> Option<CellCoord> {
    let mut best: Option<(CellCoord, u32)> = None;
    for cell in cells {
        let Some(cost) = tree.cost(cell) else {
            continue;
        };
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((cell, cost)),
        }
    }
    best.map(|(cell, _)| cell)
}

/// Distances from `root` where only walls block.
pub(crate) fn distance_tree(
    pathfinder: &mut Pathfinder,
    context: &DecisionContext<'_>,
    root: CellCoord,
) -> Option<PathTree> {
    pathfinder
        .compute_from(
            &context.occupancy,
            root,
            context.actor.team,
            Occupancy::IgnoreUnits,
        )
        .ok()
}

/// Distances from `root` over cells the actor may walk across.
pub(crate) fn walking_tree(
    pathfinder: &mut Pathfinder,
    context: &DecisionContext<'_>,
    root: CellCoord,
) -> Option<PathTree> {
    match pathfinder.compute_from(&context.occupancy, root, context.actor.team, Occupancy::Respect) {
        Ok(tree) => Some(tree),
        Err(error) => {
            debug!(unit = context.actor.id.get(), %error, "walking tree unavailable");
            None
        }
    }
}

/// Closest reachable opening against the nearest of `candidates`.
///
/// The nearest candidate is picked by unit-blind distance. The opening is
/// the cell exactly `attack_radius` hops from it that the actor can walk to
/// most cheaply; it must be empty or the actor's own cell.
pub(crate) fn closest_reachable_opening(
    pathfinder: &mut Pathfinder,
    context: &DecisionContext<'_>,
    candidates: impl IntoIterator<Item = CellCoord>,
) -> Option<CellCoord> {
    let actor = context.actor;
    let distances = distance_tree(pathfinder, context, actor.cell)?;
    let target = cheapest(&distances, candidates)?;

    let walking = walking_tree(pathfinder, context, actor.cell)?;
    let ring = cells_at_exact_distance(&context.occupancy, target, actor.attack_radius)
        .into_iter()
        .filter(|&cell| {
            cell == actor.cell || context.occupancy.occupant(cell) == Some(Occupant::Empty)
        });
    let opening = cheapest(&walking, ring);

    debug!(
        unit = actor.id.get(),
        ?target,
        ?opening,
        "closest reachable opening"
    );
    opening
}

/// Movement cell that brings the actor closest to `opening`.
pub(crate) fn approach(
    pathfinder: &mut Pathfinder,
    context: &DecisionContext<'_>,
    ranges: &UnitRanges,
    opening: CellCoord,
) -> CellCoord {
    if ranges.movement().contains(opening) {
        return opening;
    }

    walking_tree(pathfinder, context, opening)
        .and_then(|toward| cheapest(&toward, ranges.movement().iter()))
        .unwrap_or_else(|| context.stay())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{GridBounds, OccupancyView, Team};
    use skirmish_system_pathing::compute_pathing_from;

    #[test]
    fn cheapest_keeps_the_first_of_equal_costs() {
        let cells = vec![Occupant::Empty; 5];
        let bounds = GridBounds::new(CellCoord::new(0, 0), CellCoord::new(4, 0));
        let view = OccupancyView::new(&cells, bounds);
        let tree = compute_pathing_from(&view, CellCoord::new(2, 0), Team::Ally, Occupancy::Respect)
            .expect("goal is free");

        let picked = cheapest(
            &tree,
            [CellCoord::new(0, 0), CellCoord::new(4, 0), CellCoord::new(3, 0)],
        );
        assert_eq!(picked, Some(CellCoord::new(3, 0)));

        let tied = cheapest(&tree, [CellCoord::new(4, 0), CellCoord::new(0, 0)]);
        assert_eq!(tied, Some(CellCoord::new(4, 0)));

        assert_eq!(cheapest(&tree, [CellCoord::new(9, 9)]), None);
    }
}
