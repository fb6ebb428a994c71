//! Integration tests for headless match execution
//!
//! These tests verify that:
//! - Headless matches run to completion
//! - Match results are accessible programmatically
//! - Seeded RNG produces deterministic results

use arenaduel::combat::log::{CombatLog, CombatLogEventType};
use arenaduel::headless::{build_headless_app, run_to_completion, HeadlessMatchConfig, ScriptedPress};
use arenaduel::{Archetype, MatchOutcome, PlayerSlot};

fn press(at: f32, key: &str, hold: f32) -> ScriptedPress {
    ScriptedPress {
        at,
        key: key.to_string(),
        hold,
    }
}

/// Player 1 (melee) walks into player 2 and keeps swinging. Player 2 stands still.
fn brawl_config(seed: u64) -> HeadlessMatchConfig {
    let mut config = HeadlessMatchConfig::new(Archetype::Melee, Archetype::Melee);
    config.max_duration_secs = 60.0;
    config.random_seed = Some(seed);
    config.script.push(press(0.5, "KeyD", 60.0));
    for i in 0..90 {
        config.script.push(press(1.0 + i as f32 * 0.6, "KeyE", 0.05));
    }
    config
}

#[test]
fn test_scripted_brawl_has_a_winner() {
    let mut app = build_headless_app(&brawl_config(12345)).unwrap();
    let result = run_to_completion(&mut app).unwrap();

    assert_eq!(result.winner, Some(PlayerSlot::One));
    assert_eq!(result.outcome, Some(MatchOutcome::Winner(PlayerSlot::One)));
    assert!(!result.timed_out());
    assert_eq!(result.random_seed, Some(12345));

    let [one, two] = [&result.fighters[0], &result.fighters[1]];
    assert_eq!(one.name, "Player 1 Melee");
    assert!(one.survived);
    assert_eq!(one.final_health, one.max_health);
    assert!(!two.survived);
    assert_eq!(two.final_health, 0.0);
    assert_eq!(two.damage_taken, one.damage_dealt);
    assert!(one.damage_dealt >= two.max_health);
}

#[test]
fn test_same_seed_same_match() {
    let mut first = build_headless_app(&brawl_config(42)).unwrap();
    let mut second = build_headless_app(&brawl_config(42)).unwrap();

    let a = run_to_completion(&mut first).unwrap();
    let b = run_to_completion(&mut second).unwrap();

    assert_eq!(a.match_time, b.match_time);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.fighters[0].damage_dealt, b.fighters[0].damage_dealt);

    let log_a = first.world().resource::<CombatLog>();
    let log_b = second.world().resource::<CombatLog>();
    let messages = |log: &CombatLog| log.entries.iter().map(|e| e.message.clone()).collect::<Vec<_>>();
    assert_eq!(messages(log_a), messages(log_b));
}

#[test]
fn test_idle_match_times_out() {
    let mut config = HeadlessMatchConfig::new(Archetype::Ranged, Archetype::Melee);
    config.max_duration_secs = 2.0;
    config.random_seed = Some(1);

    let mut app = build_headless_app(&config).unwrap();
    let result = run_to_completion(&mut app).unwrap();

    assert!(result.timed_out());
    assert!(result.winner.is_none());
    assert!(result.match_time >= 2.0 && result.match_time < 2.1);
    assert!(result.fighters.iter().all(|f| f.survived));
}

#[test]
fn test_charged_arrow_reaches_target() {
    let mut config = HeadlessMatchConfig::new(Archetype::Ranged, Archetype::Melee);
    config.max_duration_secs = 4.0;
    config.random_seed = Some(3);
    config.script.push(press(0.5, "KeyE", 1.0));

    let mut app = build_headless_app(&config).unwrap();
    let result = run_to_completion(&mut app).unwrap();
    assert!(result.timed_out());

    let log = app.world().resource::<CombatLog>();
    let resolved = log.filter_by_type(CombatLogEventType::Damage).len()
        + log.filter_by_type(CombatLogEventType::Miss).len();
    assert_eq!(resolved, 1, "exactly one arrow was fired and it crossed the target");
}

#[test]
fn test_invalid_config_fails_to_build() {
    let mut config = HeadlessMatchConfig::new(Archetype::Melee, Archetype::Melee);
    config.script.push(press(1.0, "NotAKey", 0.1));
    assert!(build_headless_app(&config).is_err());

    let mut config = HeadlessMatchConfig::new(Archetype::Melee, Archetype::Melee);
    config.roster_path = Some("does/not/exist.ron".to_string());
    let err = build_headless_app(&config).err().unwrap();
    assert!(err.contains("roster"));
}

#[test]
fn test_match_log_is_saved_as_json() {
    let mut app = build_headless_app(&brawl_config(7)).unwrap();
    run_to_completion(&mut app).unwrap();

    let path = std::env::temp_dir().join("arenaduel_headless_test_log.json");
    let path_str = path.to_string_lossy().to_string();
    let written = arenaduel::headless::runner::save_match_log(&app, Some(&path_str)).unwrap();
    assert_eq!(written, path_str);

    let contents = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["metadata"]["winner"], "Player 1");
    assert_eq!(json["metadata"]["random_seed"], 7);
    assert_eq!(json["metadata"]["fighters"].as_array().unwrap().len(), 2);
    assert!(json["entries"].as_array().unwrap().len() > 2);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = brawl_config(9);
    let json = serde_json::to_string(&config).unwrap();
    let parsed = HeadlessMatchConfig::from_json(&json).unwrap();

    assert_eq!(parsed.random_seed, Some(9));
    assert_eq!(parsed.script.len(), config.script.len());
    assert_eq!(parsed.archetypes().unwrap(), (Archetype::Melee, Archetype::Melee));
}
