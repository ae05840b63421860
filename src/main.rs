//! Hexmarch demo driver
//!
//! Builds two rosters from the built-in bestiary, runs an AI-vs-AI battle
//! to completion and prints the event log. The same seed replays the same
//! battle.

use clap::Parser;

use hexmarch::battle::{
    ai, deployment, Bestiary, BattleEngine, FieldTerrain, Roster,
};
use hexmarch::core::error::Result;

#[derive(Parser, Debug)]
#[command(name = "hexmarch", about = "Run an AI-vs-AI skirmish")]
struct Args {
    /// RNG seed for the damage rolls
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Safety cap on the number of rounds
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// Load creature stats from a bestiary TOML file instead of the built-ins
    #[arg(long)]
    bestiary: Option<std::path::PathBuf>,

    /// Print the event log as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hexmarch=info")),
        )
        .init();

    let args = Args::parse();
    let bestiary = match &args.bestiary {
        Some(path) => Bestiary::load_from_file(path)?,
        None => Bestiary::builtin(),
    };

    let mut attacker = Roster::new();
    attacker.set_slot(0, bestiary.require("Swordsman")?.clone(), 20)?;
    attacker.set_slot(1, bestiary.require("Archer")?.clone(), 30)?;
    attacker.set_slot(2, bestiary.require("Marksman")?.clone(), 12)?;

    let mut defender = Roster::new();
    defender.set_slot(0, bestiary.require("Ogre")?.clone(), 6)?;
    defender.set_slot(1, bestiary.require("Archer")?.clone(), 25)?;
    defender.set_slot(2, bestiary.require("Militia")?.clone(), 40)?;

    let mut engine = BattleEngine::new(FieldTerrain::Grass, args.seed);
    deployment::place_rosters(&mut engine, &attacker, &defender);

    run_battle(&mut engine, args.max_rounds);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&engine.log)?);
    } else {
        for event in &engine.log.events {
            println!("[r{:02}] {}", event.round, event.description);
        }
        println!("{}", engine.battle_summary());
    }
    match engine.winning_side() {
        Some(side) => tracing::info!("{:?} wins after {} rounds", side, engine.round),
        None if engine.is_finished() => tracing::info!("Draw after {} rounds", engine.round),
        None => tracing::info!("No decision within {} rounds", engine.round),
    }
    Ok(())
}

/// Drive rounds until the battle ends or the round cap is hit
fn run_battle(engine: &mut BattleEngine, max_rounds: u32) {
    while !engine.is_finished() && engine.round < max_rounds {
        engine.start_new_round();
        while let Some(active) = engine.next_unit() {
            let Some(action) = ai::select_action(engine, active) else {
                continue;
            };
            engine.execute_action(action);
            if engine.check_battle_end() {
                return;
            }
        }
    }
}
