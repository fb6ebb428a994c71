//! JSON configuration parsing for headless mode
//!
//! A headless config names the two archetypes, the simulation frame rate and
//! a timeline of scripted key presses that stands in for the players.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::controls::parse_key;
use crate::roster::Archetype;

/// One scripted key press: `key` goes down at `at` seconds and stays down
/// for `hold` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedPress {
    pub at: f32,
    /// Bevy `KeyCode` name, e.g. "KeyE" or "ArrowLeft"
    pub key: String,
    #[serde(default = "default_hold")]
    pub hold: f32,
}

impl ScriptedPress {
    /// Whether the key is held at time `now`.
    pub fn is_active(&self, now: f32) -> bool {
        now >= self.at && now <= self.at + self.hold
    }
}

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    /// Player 1 archetype ("Melee" or "Ranged")
    pub player1: String,
    /// Player 2 archetype ("Melee" or "Ranged")
    pub player2: String,
    /// Maximum match duration in seconds (default: 120)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Simulated frames per second (default: 60)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Random seed for deterministic match reproduction
    /// If provided, the match will use a seeded RNG for reproducible results
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// RON file overriding archetype stats (optional)
    #[serde(default)]
    pub roster_path: Option<String>,
    /// Key presses to replay, in any order
    #[serde(default)]
    pub script: Vec<ScriptedPress>,
}

fn default_hold() -> f32 {
    0.05
}

fn default_max_duration() -> f32 {
    120.0
}

fn default_frame_rate() -> u32 {
    60
}

impl HeadlessMatchConfig {
    /// A config with default settings and an empty script.
    pub fn new(player1: Archetype, player2: Archetype) -> Self {
        Self {
            player1: player1.name().to_string(),
            player2: player2.name().to_string(),
            max_duration_secs: default_max_duration(),
            frame_rate: default_frame_rate(),
            random_seed: None,
            output_path: None,
            roster_path: None,
            script: Vec::new(),
        }
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json(&contents)
    }

    /// Parse and validate a JSON config
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: HeadlessMatchConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        Self::parse_archetype(&self.player1)?;
        Self::parse_archetype(&self.player2)?;

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }
        if self.frame_rate == 0 {
            return Err("frame_rate must be positive".to_string());
        }

        for (i, press) in self.script.iter().enumerate() {
            parse_key(&press.key).map_err(|e| format!("script[{}]: {}", i, e))?;
            if press.at < 0.0 || press.hold < 0.0 {
                return Err(format!("script[{}]: at and hold must not be negative", i));
            }
        }

        Ok(())
    }

    /// Parse an archetype name
    pub fn parse_archetype(name: &str) -> Result<Archetype, String> {
        match name {
            "Melee" => Ok(Archetype::Melee),
            "Ranged" => Ok(Archetype::Ranged),
            _ => Err(format!(
                "Unknown archetype: '{}'. Valid archetypes: Melee, Ranged",
                name
            )),
        }
    }

    pub fn archetypes(&self) -> Result<(Archetype, Archetype), String> {
        Ok((
            Self::parse_archetype(&self.player1)?,
            Self::parse_archetype(&self.player2)?,
        ))
    }

    /// Seconds per simulated frame
    pub fn frame_time(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// The script with key names resolved.
    pub fn resolved_script(&self) -> Result<Vec<(ScriptedPress, KeyCode)>, String> {
        self.script
            .iter()
            .map(|press| parse_key(&press.key).map(|key| (press.clone(), key)))
            .collect()
    }
}
