#![allow(dead_code)]

use skirmish_core::{
    ActionDecision, Archetype, CellCoord, Command, Event, Health, Team, UnitSnapshot,
};
use skirmish_system_range::UnitRanges;
use skirmish_system_targeting::{DecisionContext, Selector, TargetSelection};
use skirmish_world::{self as world, query, World};

/// Builds an encounter from a text layout.
///
/// `#` is a wall, `X` the extraction point, `P`/`B`/`S` allied pursuers,
/// blockers and supports and their lowercase forms enemies. Unit identifiers
/// follow row-major order.
pub fn encounter(rows: &[&str], movement_radius: u32, attack_radius: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    let columns = rows[0].chars().count() as i32;
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            top_left: CellCoord::new(0, 0),
            bottom_right: CellCoord::new(columns - 1, rows.len() as i32 - 1),
        },
        &mut events,
    );

    for (row, line) in rows.iter().enumerate() {
        for (column, tile) in line.chars().enumerate() {
            let cell = CellCoord::new(column as i32, row as i32);
            let command = match tile {
                '#' => Command::PlaceWall { cell },
                'X' => Command::SetExtractionPoint { cell },
                '.' => continue,
                other => {
                    let (team, archetype) = unit_kind(other);
                    Command::SpawnUnit {
                        team,
                        archetype,
                        cell,
                        movement_radius,
                        attack_radius,
                        health: Health::new(10),
                        max_health: Health::new(10),
                    }
                }
            };
            world::apply(&mut world, command, &mut events);
        }
    }

    assert!(
        !events.iter().any(|event| matches!(
            event,
            Event::PlacementRejected { .. } | Event::GridRejected { .. }
        )),
        "layout must build cleanly: {events:?}"
    );
    world
}

fn unit_kind(tile: char) -> (Team, Archetype) {
    let team = if tile.is_ascii_uppercase() {
        Team::Ally
    } else {
        Team::Enemy
    };
    let archetype = match tile.to_ascii_uppercase() {
        'P' => Archetype::Pursuer,
        'B' => Archetype::Blocker,
        'S' => Archetype::Support,
        other => panic!("unknown layout tile {other}"),
    };
    (team, archetype)
}

pub fn unit_at(world: &World, cell: CellCoord) -> UnitSnapshot {
    query::unit_view(world)
        .unit_at(cell)
        .cloned()
        .expect("a unit stands on the cell")
}

pub fn wound(world: &mut World, cell: CellCoord, health: u32) {
    let unit = unit_at(world, cell);
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SetHealth {
            unit: unit.id,
            health: Health::new(health),
        },
        &mut events,
    );
}

pub fn relocate(world: &mut World, from: CellCoord, to: CellCoord) {
    let unit = unit_at(world, from);
    let mut events = Vec::new();
    world::apply(
        world,
        Command::MoveUnit {
            unit: unit.id,
            destination: to,
        },
        &mut events,
    );
    assert!(
        matches!(events.as_slice(), [Event::UnitMoved { .. }]),
        "relocation must succeed: {events:?}"
    );
}

fn selector_for(world: &World, actor: &UnitSnapshot) -> Selector {
    Selector::for_archetype(actor.archetype, query::extraction_point(world))
}

/// Move decision for the unit on `cell`, with ranges computed for its turn.
pub fn decide_move(world: &World, cell: CellCoord) -> CellCoord {
    let occupancy = query::occupancy_view(world);
    let units = query::unit_view(world);
    let actor = unit_at(world, cell);
    let ranges = UnitRanges::for_turn(&occupancy, &actor);
    let context = DecisionContext::new(occupancy, &units, &actor, Some(&ranges));
    selector_for(world, &actor).select_move_tile(&context)
}

/// Action decision for the unit on `cell`, with ranges computed after its move.
pub fn decide_action(world: &World, cell: CellCoord) -> ActionDecision {
    let occupancy = query::occupancy_view(world);
    let units = query::unit_view(world);
    let actor = unit_at(world, cell);
    let ranges = UnitRanges::for_action(&occupancy, &actor);
    let context = DecisionContext::new(occupancy, &units, &actor, Some(&ranges));
    selector_for(world, &actor).select_attack_target(&context)
}
