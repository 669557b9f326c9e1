use skirmish_core::{CellCoord, Team};
use skirmish_system_pathing::{compute_pathing_from, Occupancy};
use skirmish_world::Grid;

fn corridor() -> Grid {
    Grid::from_rows(&["#####", "A.E..", "#####"]).expect("corridor layout parses")
}

const START: CellCoord = CellCoord::new(0, 1);
const GOAL: CellCoord = CellCoord::new(4, 1);

#[test]
fn opponent_in_corridor_leaves_start_unreachable_when_respecting_occupancy() {
    let grid = corridor();

    let tree = compute_pathing_from(&grid.view(), GOAL, Team::Ally, Occupancy::Respect)
        .expect("an empty goal is legal");

    assert!(!tree.is_reachable(START), "the opponent must seal the corridor");
    assert!(tree.path_from(START).is_none());
    assert_eq!(tree.cost(CellCoord::new(3, 1)), Some(1));
    assert_eq!(tree.reachable_count(), 2);
}

#[test]
fn ignoring_units_threads_the_chain_through_the_opponent() {
    let grid = corridor();

    let tree = compute_pathing_from(&grid.view(), GOAL, Team::Ally, Occupancy::IgnoreUnits)
        .expect("an empty goal is legal");

    let path = tree.path_from(START).expect("start must be reachable");
    assert_eq!(
        path,
        (0..=4).map(|column| CellCoord::new(column, 1)).collect::<Vec<_>>()
    );
    assert_eq!(tree.cost(START), Some(4));
    assert!(path.contains(&CellCoord::new(2, 1)));
}

#[test]
fn opponent_standing_on_goal_is_refused_only_when_respecting_occupancy() {
    let grid = corridor();
    let opponent = CellCoord::new(2, 1);

    assert!(compute_pathing_from(&grid.view(), opponent, Team::Ally, Occupancy::Respect).is_err());

    let tree = compute_pathing_from(&grid.view(), opponent, Team::Ally, Occupancy::IgnoreUnits)
        .expect("distances ignore units");
    assert_eq!(tree.cost(START), Some(2));
    assert_eq!(tree.cost(GOAL), Some(2));
}
