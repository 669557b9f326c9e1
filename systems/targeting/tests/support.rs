mod common;

use common::{decide_action, decide_move, encounter, relocate, wound};
use skirmish_core::{ActionDecision, CellCoord};

#[test]
fn support_moves_next_to_a_damaged_teammate_and_heals_it() {
    let mut world = encounter(&["S.P.."], 2, 1);
    let patient = CellCoord::new(2, 0);
    wound(&mut world, patient, 4);

    let destination = decide_move(&world, CellCoord::new(0, 0));
    assert_eq!(destination, CellCoord::new(1, 0));

    relocate(&mut world, CellCoord::new(0, 0), destination);
    assert_eq!(decide_action(&world, destination), ActionDecision::Target(patient));
}

#[test]
fn healthy_teammates_are_not_targeted() {
    let world = encounter(&["SP..."], 2, 1);

    assert_eq!(decide_action(&world, CellCoord::new(0, 0)), ActionDecision::Skip);
}

#[test]
fn support_never_heals_itself() {
    let mut world = encounter(&["S...."], 2, 1);
    let actor = CellCoord::new(0, 0);
    wound(&mut world, actor, 1);

    assert_eq!(decide_move(&world, actor), actor);
    assert_eq!(decide_action(&world, actor), ActionDecision::Skip);
}

#[test]
fn support_retreats_as_far_as_possible_from_threats() {
    let world = encounter(&[".....", "..S..", ".....", "..p.."], 2, 1);

    assert_eq!(decide_move(&world, CellCoord::new(2, 1)), CellCoord::new(1, 0));
}

#[test]
fn retreat_maximizes_total_distance_over_every_threat() {
    let world = encounter(
        &[".......", "p......", "...S...", "......p", "......."],
        2,
        2,
    );

    // (3, 2) is the best cell by nearest threat, (5, 2) the farthest from the
    // first threat alone. Only (3, 0) reaches the largest sum, 4 + 6.
    assert_eq!(decide_move(&world, CellCoord::new(3, 2)), CellCoord::new(3, 0));
}

#[test]
fn walled_off_threat_counts_as_maximally_distant() {
    let world = encounter(&["p#.....", "#......", "S.p....", "......."], 2, 2);

    // The cornered opponent still covers the support but cannot walk to any
    // candidate, so only the open opponent decides the retreat.
    assert_eq!(decide_move(&world, CellCoord::new(0, 2)), CellCoord::new(0, 3));
}

#[test]
fn support_ignores_opponents_that_cannot_reach_it() {
    let world = encounter(&["S.......p"], 2, 1);
    let actor = CellCoord::new(0, 0);

    assert_eq!(decide_move(&world, actor), actor);
}

#[test]
fn support_without_opponents_stays_put() {
    let world = encounter(&["..S.."], 2, 1);
    let actor = CellCoord::new(2, 0);

    assert_eq!(decide_move(&world, actor), actor);
}
