#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Skirmish scenario to completion.

mod board;
mod effects;
mod encounter;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skirmish_core::Team;
use skirmish_world::query;
use tracing::info;

use crate::{
    encounter::{Encounter, Outcome},
    scenario::Scenario,
};

/// Team named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TeamArg {
    Ally,
    Enemy,
}

impl From<TeamArg> for Team {
    fn from(value: TeamArg) -> Self {
        match value {
            TeamArg::Ally => Team::Ally,
            TeamArg::Enemy => Team::Enemy,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Plays a tile-based tactical encounter between two AI teams")]
struct Args {
    /// Scenario file describing the grid and units.
    #[arg(long)]
    scenario: PathBuf,

    /// Number of team rounds to play, overriding the scenario.
    #[arg(long)]
    rounds: Option<u32>,

    /// Team that takes the first round, overriding the scenario.
    #[arg(long, value_enum)]
    first_team: Option<TeamArg>,
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("failed to load {}", args.scenario.display()))?;
    let rounds = args.rounds.unwrap_or(scenario.encounter.rounds);
    let mut team = args
        .first_team
        .map_or(scenario.encounter.first_team, Team::from);

    let mut encounter = Encounter::new(&scenario).context("failed to build the encounter")?;
    info!(rounds, first_team = ?team, "encounter ready");
    println!("Initial board");
    print!("{}", board::render(encounter.world()));

    let mut played = 0;
    while played < rounds {
        let events = encounter.play_round(team);
        played += 1;
        println!();
        println!("Round {played}: {team:?} ({} events)", events.len());
        print!("{}", board::render(encounter.world()));

        if matches!(encounter.outcome(), Outcome::Victory(_)) {
            break;
        }
        team = team.opponent();
    }

    println!();
    match encounter.outcome() {
        Outcome::Victory(winner) => println!("{winner:?} team wins after {played} rounds"),
        Outcome::Draw => println!("Draw after {played} rounds"),
    }
    print!("{}", board::roster(&query::unit_view(encounter.world())));
    Ok(())
}
