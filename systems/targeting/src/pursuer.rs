use skirmish_core::{ActionDecision, CellCoord, Occupant};
use skirmish_system_pathing::Pathfinder;
use tracing::debug;

use crate::{
    opening::{approach, closest_reachable_opening},
    DecisionContext, TargetSelection,
};

/// Closes in on the nearest opposing unit and attacks whatever opponent is in reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pursuer;

impl TargetSelection for Pursuer {
    fn select_move_tile(&self, context: &DecisionContext<'_>) -> CellCoord {
        let Some(ranges) = context.current_ranges("pursuer move") else {
            return context.stay();
        };

        let opponents = context
            .units
            .on_team(context.actor.team.opponent())
            .map(|unit| unit.cell);
        let mut pathfinder = Pathfinder::default();
        let Some(opening) = closest_reachable_opening(&mut pathfinder, context, opponents) else {
            debug!(unit = context.actor.id.get(), "pursuer found no opening");
            return context.stay();
        };

        approach(&mut pathfinder, context, ranges, opening)
    }

    fn select_attack_target(&self, context: &DecisionContext<'_>) -> ActionDecision {
        let Some(ranges) = context.current_ranges("pursuer attack") else {
            return ActionDecision::Skip;
        };

        let opponent = Occupant::from(context.actor.team.opponent());
        ranges
            .attack()
            .iter()
            .find(|&cell| context.occupancy.occupant(cell) == Some(opponent))
            .map_or(ActionDecision::Skip, ActionDecision::Target)
    }
}
