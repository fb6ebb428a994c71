//! Headless match execution
//!
//! Runs a duel without any graphical output, suitable for automated testing.
//! Time is simulated: every `App::update` advances the match clock by exactly
//! one frame, so a seeded config always replays the same way.

use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::arena::Clock;
use crate::combat::log::{CombatLog, CombatLogEventType, FighterMetadata, MatchMetadata};
use crate::combat::GameRng;
use crate::duel::{Duel, MatchOutcome};
use crate::fighter::{Fighter, PlayerSlot};
use crate::roster::{Archetype, Roster};
use crate::services::TextureRegistry;

use super::config::{HeadlessMatchConfig, ScriptedPress};

/// Where sprite sheets are looked up.
const ASSET_ROOT: &str = "assets";

/// Result of a completed headless match
///
/// This struct provides programmatic access to match results for testing and analysis.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The winning player, or None for a draw or timeout
    pub winner: Option<PlayerSlot>,
    /// How the duel ended; None if it hit the time limit
    pub outcome: Option<MatchOutcome>,
    /// Total match duration in seconds
    pub match_time: f32,
    /// Per-fighter statistics, player 1 first
    pub fighters: Vec<FighterResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl MatchResult {
    pub fn timed_out(&self) -> bool {
        self.outcome.is_none()
    }
}

/// Statistics for a single fighter after the match
#[derive(Debug, Clone)]
pub struct FighterResult {
    /// Log identifier, e.g. "Player 1 Melee"
    pub name: String,
    pub archetype: Archetype,
    pub max_health: f32,
    /// Health remaining at match end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

/// The duel being simulated
#[derive(Resource)]
pub struct ActiveDuel(pub Duel);

/// Simulated match clock, advanced one frame per update
#[derive(Resource, Debug, Clone, Copy)]
pub struct MatchClock {
    pub clock: Clock,
}

/// Scripted key presses with their key names already resolved
#[derive(Resource, Debug, Clone, Default)]
pub struct ScriptedInput {
    pub presses: Vec<(ScriptedPress, KeyCode)>,
}

/// Resource to track headless match state
#[derive(Resource)]
pub struct HeadlessMatchState {
    pub player1: Archetype,
    pub player2: Archetype,
    /// Maximum match duration before declaring a draw
    pub max_duration: f32,
    /// Whether the match has completed
    pub match_complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Match result (populated when match completes)
    pub result: Option<MatchResult>,
    /// Log header (populated when match completes)
    pub metadata: Option<MatchMetadata>,
}

/// Plugin for headless match execution
pub struct HeadlessPlugin {
    pub player1: Archetype,
    pub player2: Archetype,
    pub roster: Roster,
    pub script: ScriptedInput,
    pub frame_time: f32,
    pub max_duration: f32,
    pub random_seed: Option<u64>,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.roster.clone())
            .insert_resource(self.script.clone())
            .insert_resource(MatchClock {
                clock: Clock::new(0.0, self.frame_time),
            })
            .insert_resource(HeadlessMatchState {
                player1: self.player1,
                player2: self.player2,
                max_duration: self.max_duration,
                match_complete: false,
                random_seed: self.random_seed,
                result: None,
                metadata: None,
            })
            .insert_resource(TextureRegistry::new(ASSET_ROOT))
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<CombatLog>();

        app.add_systems(Startup, headless_setup_match).add_systems(
            Update,
            (
                headless_advance_clock,
                headless_apply_script,
                headless_step_duel,
                headless_check_match_end,
            )
                .chain(),
        );
    }
}

/// Setup system for headless match
fn headless_setup_match(
    mut commands: Commands,
    headless_state: Res<HeadlessMatchState>,
    roster: Res<Roster>,
    mut textures: ResMut<TextureRegistry>,
    mut combat_log: ResMut<CombatLog>,
) {
    // Clear and initialize combat log
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Match started (headless mode)!".to_string(),
    );

    // Initialize GameRng with seed if provided (deterministic mode)
    let game_rng = match headless_state.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };
    commands.insert_resource(game_rng);

    let duel = Duel::from_archetypes(
        headless_state.player1,
        headless_state.player2,
        &roster,
        &mut *textures,
        0.0,
    );
    commands.insert_resource(ActiveDuel(duel));

    info!(
        "Headless match setup complete: {} vs {}",
        headless_state.player1.name(),
        headless_state.player2.name()
    );
}

fn headless_advance_clock(mut clock: ResMut<MatchClock>, headless_state: Res<HeadlessMatchState>) {
    if headless_state.match_complete {
        return;
    }
    clock.clock = clock.clock.tick();
}

/// Drive the keyboard from the script: keys inside their window are held,
/// everything else is released.
fn headless_apply_script(
    script: Res<ScriptedInput>,
    clock: Res<MatchClock>,
    mut keys: ResMut<ButtonInput<KeyCode>>,
) {
    let now = clock.clock.now;
    keys.clear();

    let is_held = |key: KeyCode| {
        script
            .presses
            .iter()
            .any(|(press, k)| *k == key && press.is_active(now))
    };

    let stale: Vec<KeyCode> = keys.get_pressed().copied().filter(|k| !is_held(*k)).collect();
    for key in stale {
        keys.release(key);
    }
    for (press, key) in &script.presses {
        if press.is_active(now) {
            keys.press(*key);
        }
    }
}

fn headless_step_duel(
    mut duel: ResMut<ActiveDuel>,
    keys: Res<ButtonInput<KeyCode>>,
    clock: Res<MatchClock>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    headless_state: Res<HeadlessMatchState>,
) {
    if headless_state.match_complete {
        return;
    }
    duel.0.step(&*keys, clock.clock, &mut *rng, &mut *combat_log);
}

/// Check if the match has ended (a fighter fell, or timeout)
fn headless_check_match_end(
    duel: Res<ActiveDuel>,
    clock: Res<MatchClock>,
    combat_log: Res<CombatLog>,
    mut headless_state: ResMut<HeadlessMatchState>,
) {
    if headless_state.match_complete {
        return;
    }

    let elapsed = clock.clock.now;
    let outcome = match duel.0.outcome {
        Some(outcome) => {
            match outcome {
                MatchOutcome::Winner(slot) => info!("Match ended! {} wins!", slot.label()),
                MatchOutcome::Draw => info!("Match ended in a DRAW (both fighters fell together)!"),
            }
            Some(outcome)
        }
        None if elapsed >= headless_state.max_duration => {
            info!("Match timed out after {:.1}s - declaring DRAW", elapsed);
            None
        }
        None => return,
    };

    let fighters = &duel.0.fighters;
    let seed = headless_state.random_seed;
    headless_state.result = Some(build_match_result(fighters, outcome, elapsed, &combat_log, seed));
    headless_state.metadata = Some(build_match_metadata(fighters, outcome, elapsed, seed));
    headless_state.match_complete = true;
}

/// Build the MatchResult from current fighter state
fn build_match_result(
    fighters: &[Fighter],
    outcome: Option<MatchOutcome>,
    match_time: f32,
    combat_log: &CombatLog,
    random_seed: Option<u64>,
) -> MatchResult {
    let fighters = fighters
        .iter()
        .map(|f| {
            let name = f.name();
            FighterResult {
                damage_dealt: combat_log.total_damage_dealt(&name),
                damage_taken: combat_log.total_damage_taken(&name),
                name,
                archetype: f.archetype,
                max_health: f.max_health,
                final_health: f.health,
                survived: f.is_alive(),
            }
        })
        .collect();

    MatchResult {
        winner: outcome.and_then(|o| o.winner()),
        outcome,
        match_time,
        fighters,
        random_seed,
    }
}

fn build_match_metadata(
    fighters: &[Fighter],
    outcome: Option<MatchOutcome>,
    match_time: f32,
    random_seed: Option<u64>,
) -> MatchMetadata {
    MatchMetadata {
        winner: outcome
            .and_then(|o| o.winner())
            .map(|slot| slot.label().to_string()),
        match_time,
        random_seed,
        fighters: fighters
            .iter()
            .map(|f| FighterMetadata {
                id: f.name(),
                archetype: f.archetype.name().to_string(),
                max_health: f.max_health,
                final_health: f.health,
                final_position: (f.position.x, f.position.y),
            })
            .collect(),
    }
}

/// Build the headless app without running it.
pub fn build_headless_app(config: &HeadlessMatchConfig) -> Result<App, String> {
    assemble_app(config, false)
}

fn assemble_app(config: &HeadlessMatchConfig, with_logging: bool) -> Result<App, String> {
    config.validate()?;
    let (player1, player2) = config.archetypes()?;

    let roster = match &config.roster_path {
        Some(path) => Roster::load_from_file(path)?,
        None => Roster::default(),
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if with_logging {
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins(HeadlessPlugin {
        player1,
        player2,
        roster,
        script: ScriptedInput {
            presses: config.resolved_script()?,
        },
        frame_time: config.frame_time(),
        max_duration: config.max_duration_secs,
        random_seed: config.random_seed,
    });
    app.finish();
    app.cleanup();
    Ok(app)
}

/// Step `app` until the match completes and return its result.
pub fn run_to_completion(app: &mut App) -> Result<MatchResult, String> {
    loop {
        app.update();

        let state = app.world().resource::<HeadlessMatchState>();
        if state.match_complete {
            return state
                .result
                .clone()
                .ok_or_else(|| "Match completed without a result".to_string());
        }
    }
}

/// Save the finished match's combat log. Returns the path written.
pub fn save_match_log(app: &App, output_path: Option<&str>) -> Result<String, String> {
    let world = app.world();
    let metadata = world
        .resource::<HeadlessMatchState>()
        .metadata
        .as_ref()
        .ok_or_else(|| "Match has not finished yet".to_string())?;
    world.resource::<CombatLog>().save_to_file(metadata, output_path)
}

/// Run a headless match with the given configuration
pub fn run_headless_match(config: HeadlessMatchConfig) -> Result<MatchResult, String> {
    println!("Starting headless match simulation...");
    println!("  Player 1: {}", config.player1);
    println!("  Player 2: {}", config.player2);
    println!("  Max duration: {:.0}s", config.max_duration_secs);
    println!("  Frame rate: {} fps", config.frame_rate);
    println!("  Scripted presses: {}", config.script.len());

    let mut app = assemble_app(&config, true)?;

    let result = run_to_completion(&mut app)?;

    match save_match_log(&app, config.output_path.as_deref()) {
        Ok(filename) => println!("Match complete. Log saved to: {}", filename),
        Err(e) => eprintln!("Failed to save combat log: {}", e),
    }

    Ok(result)
}
