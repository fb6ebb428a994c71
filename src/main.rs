//! ArenaDuel - two-fighter arena duel simulator
//!
//! Runs a headless duel from a JSON config, or a built-in demo when no config
//! is given, and prints the result.

use arenaduel::cli::{self, Args};
use arenaduel::headless::{run_headless_match, HeadlessMatchConfig, MatchResult, ScriptedPress};
use arenaduel::roster::Archetype;

fn main() {
    let args = cli::parse_args();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    match run_headless_match(config) {
        Ok(result) => print_result(&result),
        Err(e) => {
            eprintln!("Headless match failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_config(args: &Args) -> Result<HeadlessMatchConfig, String> {
    let mut config = match &args.headless {
        Some(path) => HeadlessMatchConfig::load_from_file(path)?,
        None => demo_config(),
    };

    // Command-line flags win over the config file
    if let Some(output) = &args.output {
        config.output_path = Some(output.to_string_lossy().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(roster) = &args.roster {
        config.roster_path = Some(roster.to_string_lossy().to_string());
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }

    config.validate()?;
    Ok(config)
}

/// Melee walks in and swings while the archer backs off and shoots.
fn demo_config() -> HeadlessMatchConfig {
    let mut config = HeadlessMatchConfig::new(Archetype::Melee, Archetype::Ranged);
    config.max_duration_secs = 60.0;
    config.random_seed = Some(7);

    let press = |at: f32, key: &str, hold: f32| ScriptedPress {
        at,
        key: key.to_string(),
        hold,
    };

    config.script.push(press(0.5, "KeyD", 1.5));
    config.script.push(press(0.5, "Space", 1.0));
    for i in 0..40 {
        let t = 2.0 + i as f32;
        config.script.push(press(t, "KeyE", 0.05));
        config.script.push(press(t + 0.5, "KeyE", 0.05));
        if i % 8 == 0 {
            config.script.push(press(t + 0.25, "KeyR", 0.05));
            config.script.push(press(t + 0.75, "ShiftRight", 0.05));
        }
        if i % 3 == 0 {
            config.script.push(press(t + 0.1, "Space", 1.0));
        }
    }
    config
}

fn print_result(result: &MatchResult) {
    println!();
    match (result.winner, result.timed_out()) {
        (Some(slot), _) => println!("Winner: {}", slot.label()),
        (None, true) => println!("Result: time limit reached (draw)"),
        (None, false) => println!("Result: draw"),
    }
    println!("Match time: {:.2}s", result.match_time);
    if let Some(seed) = result.random_seed {
        println!("Seed: {}", seed);
    }
    for fighter in &result.fighters {
        println!(
            "  {:<18} {:>5.0}/{:<5.0} hp  dealt {:>5.0}  taken {:>5.0}{}",
            fighter.name,
            fighter.final_health,
            fighter.max_health,
            fighter.damage_dealt,
            fighter.damage_taken,
            if fighter.survived { "" } else { "  (defeated)" }
        );
    }
}
