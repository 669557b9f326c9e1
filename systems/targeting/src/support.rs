use std::iter;

use skirmish_core::{ActionDecision, CellCoord, UnitSnapshot};
use skirmish_system_pathing::{PathTree, Pathfinder};
use skirmish_system_range::UnitRanges;
use tracing::debug;

use crate::{
    opening::{approach, closest_reachable_opening, distance_tree},
    DecisionContext, TargetSelection,
};

/// Heals damaged teammates, and backs away from threats when nobody needs healing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Support;

impl Support {
    fn retreat(
        pathfinder: &mut Pathfinder,
        context: &DecisionContext<'_>,
        ranges: &UnitRanges,
    ) -> CellCoord {
        let actor = context.actor;
        let threats: Vec<PathTree> = context
            .units
            .on_team(actor.team.opponent())
            .filter(|opponent| {
                UnitRanges::for_turn(&context.occupancy, opponent)
                    .attack()
                    .contains(actor.cell)
            })
            .filter_map(|opponent| distance_tree(pathfinder, context, opponent.cell))
            .collect();
        if threats.is_empty() {
            return context.stay();
        }

        let unreachable = u64::try_from(context.occupancy.cell_count()).unwrap_or(u64::MAX);
        let candidates = iter::once(actor.cell).chain(
            ranges
                .movement()
                .iter()
                .filter(|&cell| cell != actor.cell),
        );

        let mut best: Option<(CellCoord, u64)> = None;
        for cell in candidates {
            let score: u64 = threats
                .iter()
                .map(|tree| tree.cost(cell).map_or(unreachable, u64::from))
                .sum();
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((cell, score)),
            }
        }

        let destination = best.map_or(actor.cell, |(cell, _)| cell);
        debug!(
            unit = actor.id.get(),
            threats = threats.len(),
            ?destination,
            "support retreats"
        );
        destination
    }
}

fn needs_healing(actor: &UnitSnapshot, unit: &UnitSnapshot) -> bool {
    unit.team == actor.team && unit.id != actor.id && unit.is_damaged()
}

impl TargetSelection for Support {
    fn select_move_tile(&self, context: &DecisionContext<'_>) -> CellCoord {
        let Some(ranges) = context.current_ranges("support move") else {
            return context.stay();
        };

        let patients = context
            .units
            .iter()
            .filter(|unit| needs_healing(context.actor, unit))
            .map(|unit| unit.cell);
        let mut pathfinder = Pathfinder::default();
        match closest_reachable_opening(&mut pathfinder, context, patients) {
            Some(opening) => approach(&mut pathfinder, context, ranges, opening),
            None => Self::retreat(&mut pathfinder, context, ranges),
        }
    }

    fn select_attack_target(&self, context: &DecisionContext<'_>) -> ActionDecision {
        let Some(ranges) = context.current_ranges("support action") else {
            return ActionDecision::Skip;
        };

        ranges
            .attack()
            .iter()
            .find(|&cell| {
                context
                    .units
                    .unit_at(cell)
                    .is_some_and(|unit| needs_healing(context.actor, unit))
            })
            .map_or(ActionDecision::Skip, ActionDecision::Target)
    }
}
