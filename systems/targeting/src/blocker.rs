use skirmish_core::{ActionDecision, CellCoord, OccupancyView, Occupant, Team};
use skirmish_system_pathing::{Occupancy, Pathfinder};
use skirmish_system_range::CellSet;
use tracing::debug;

use crate::{
    opening::{cheapest, distance_tree, walking_tree},
    DecisionContext, TargetSelection,
};

/// Steps into the route the nearest opponent takes toward the extraction point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blocker {
    extraction: Option<CellCoord>,
}

impl Blocker {
    /// Creates a blocker guarding `extraction`. Without one it never moves.
    #[must_use]
    pub const fn new(extraction: Option<CellCoord>) -> Self {
        Self { extraction }
    }
}

impl TargetSelection for Blocker {
    fn select_move_tile(&self, context: &DecisionContext<'_>) -> CellCoord {
        let Some(ranges) = context.current_ranges("blocker move") else {
            return context.stay();
        };
        let Some(extraction) = self.extraction else {
            debug!(unit = context.actor.id.get(), "blocker has no extraction point");
            return context.stay();
        };

        let actor = context.actor;
        let mut pathfinder = Pathfinder::default();
        let Some(distances) = distance_tree(&mut pathfinder, context, actor.cell) else {
            return context.stay();
        };
        let target_team = actor.team.opponent();
        let Some(target) = cheapest(
            &distances,
            context.units.on_team(target_team).map(|unit| unit.cell),
        ) else {
            return context.stay();
        };

        let Some(route) = pathfinder
            .compute_from(
                &context.occupancy,
                extraction,
                target_team,
                Occupancy::IgnoreUnits,
            )
            .ok()
            .and_then(|tree| tree.path_from(target))
        else {
            debug!(unit = actor.id.get(), ?target, "opponent has no route to extraction");
            return context.stay();
        };

        let lane = open_lane(&context.occupancy, &route, target_team, actor.cell);
        if let Some(cell) = lane.iter().find(|&cell| ranges.movement().contains(cell)) {
            debug!(unit = actor.id.get(), ?target, ?cell, "blocker steps into lane");
            return cell;
        }

        let Some(walking) = walking_tree(&mut pathfinder, context, actor.cell) else {
            return context.stay();
        };
        let standable = lane
            .iter()
            .filter(|&cell| context.occupancy.occupant(cell) == Some(Occupant::Empty));
        let Some(intercept) = cheapest(&walking, standable) else {
            return context.stay();
        };

        debug!(unit = actor.id.get(), ?target, ?intercept, "blocker heads for intercept");
        walking_tree(&mut pathfinder, context, intercept)
            .and_then(|toward| cheapest(&toward, ranges.movement().iter()))
            .unwrap_or_else(|| context.stay())
    }

    fn select_attack_target(&self, context: &DecisionContext<'_>) -> ActionDecision {
        if context.current_ranges("blocker action").is_none() {
            return ActionDecision::Skip;
        }

        let opponent = Occupant::from(context.actor.team.opponent());
        context
            .occupancy
            .bounds()
            .neighbors(context.actor.cell)
            .find(|&cell| context.occupancy.occupant(cell) == Some(opponent))
            .map_or(ActionDecision::Skip, ActionDecision::Target)
    }
}

/// Cells of `route` an opponent of `target_team` could stand in its way on.
///
/// Cells open to the target (empty or held by its team) and the blocker's own
/// cell are kept; any other cell is replaced by its empty neighbors.
fn open_lane(
    occupancy: &OccupancyView<'_>,
    route: &[CellCoord],
    target_team: Team,
    own_cell: CellCoord,
) -> CellSet {
    let mut lane = CellSet::default();
    for &cell in route {
        let open = cell == own_cell
            || occupancy
                .occupant(cell)
                .is_some_and(|occupant| occupant.is_passable_for(target_team));
        if open {
            let _ = lane.insert(cell);
            continue;
        }

        for neighbor in occupancy.bounds().neighbors(cell) {
            if occupancy.occupant(neighbor) == Some(Occupant::Empty) {
                let _ = lane.insert(neighbor);
            }
        }
    }
    lane
}
