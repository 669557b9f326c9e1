use skirmish_core::{Archetype, CellCoord, Command, Event, Health, Occupant, Team, UnitId};
use skirmish_world::{self as world, query, World};

#[test]
fn occupancy_tags_track_every_unit_through_a_scripted_encounter() {
    let mut world = World::new();
    let mut events = Vec::new();

    for command in scripted_commands() {
        world::apply(&mut world, command, &mut events);
        assert_occupancy_matches_units(&world);
    }

    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::PlacementRejected { .. })),
        "scripted placements must all succeed: {events:?}"
    );
    assert_eq!(query::unit_view(&world).len(), 2);
    assert_eq!(query::extraction_point(&world), Some(CellCoord::new(5, 0)));
}

#[test]
fn walls_are_never_cleared_by_unit_traffic() {
    let mut world = World::new();
    let mut events = Vec::new();
    for command in scripted_commands() {
        world::apply(&mut world, command, &mut events);
    }

    let walls: Vec<_> = query::grid(&world)
        .cells()
        .filter(|cell| cell.occupant == Occupant::Wall)
        .map(|cell| cell.coord)
        .collect();
    assert_eq!(walls, vec![CellCoord::new(2, 1), CellCoord::new(2, 2)]);
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::ConfigureGrid {
            top_left: CellCoord::new(0, 0),
            bottom_right: CellCoord::new(5, 4),
        },
        Command::PlaceWall {
            cell: CellCoord::new(2, 1),
        },
        Command::PlaceWall {
            cell: CellCoord::new(2, 2),
        },
        Command::SetExtractionPoint {
            cell: CellCoord::new(5, 0),
        },
        spawn(Team::Ally, CellCoord::new(0, 0)),
        spawn(Team::Enemy, CellCoord::new(5, 4)),
        spawn(Team::Enemy, CellCoord::new(4, 4)),
        Command::MoveUnit {
            unit: UnitId::new(0),
            destination: CellCoord::new(1, 2),
        },
        Command::MoveUnit {
            unit: UnitId::new(1),
            destination: CellCoord::new(4, 4),
        },
        Command::MoveUnit {
            unit: UnitId::new(1),
            destination: CellCoord::new(5, 3),
        },
        Command::RemoveUnit {
            unit: UnitId::new(2),
        },
        Command::MoveUnit {
            unit: UnitId::new(1),
            destination: CellCoord::new(4, 4),
        },
    ]
}

fn spawn(team: Team, cell: CellCoord) -> Command {
    Command::SpawnUnit {
        team,
        archetype: Archetype::Pursuer,
        cell,
        movement_radius: 2,
        attack_radius: 1,
        health: Health::new(5),
        max_health: Health::new(5),
    }
}

fn assert_occupancy_matches_units(world: &World) {
    let units = query::unit_view(world);
    for cell in query::grid(world).cells() {
        let expected_team = units.unit_at(cell.coord).map(|unit| unit.team);
        assert_eq!(
            cell.occupant.team(),
            expected_team,
            "occupant tag at {:?} disagrees with unit roster",
            cell.coord
        );
    }
}
