//! Fighter archetypes and their base stats
//!
//! The built-in numbers are the tuned defaults. A RON roster file can
//! override them per archetype, e.g.:
//!
//! ```ron
//! {
//!     Melee: (max_health: 200.0, attack_damage: 25.0, speed: 4.0, attack_range: 40.0,
//!             attack_cooldown: 0.5, skill_cooldown: 8.0, dodge_cooldown: 2.0, combo_window: 1.0),
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The two playable fighter archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Close-range fighter with a three-hit combo and a dash skill
    Melee,
    /// Charge-and-release archer
    Ranged,
}

impl Archetype {
    pub fn all() -> &'static [Archetype] {
        &[Archetype::Melee, Archetype::Ranged]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Melee => "Melee",
            Archetype::Ranged => "Ranged",
        }
    }

    /// Built-in stats for this archetype.
    pub fn default_stats(&self) -> ArchetypeStats {
        match self {
            Archetype::Melee => ArchetypeStats {
                max_health: 150.0,
                attack_damage: 25.0,
                speed: 4.0,
                attack_range: 40.0,
                attack_cooldown: 0.5,
                skill_cooldown: 8.0,
                dodge_cooldown: 2.0,
                combo_window: 1.0,
            },
            Archetype::Ranged => ArchetypeStats {
                max_health: 120.0,
                attack_damage: 15.0,
                speed: 4.5,
                attack_range: 200.0,
                attack_cooldown: 3.0,
                skill_cooldown: 6.0,
                dodge_cooldown: 2.0,
                combo_window: 1.0,
            },
        }
    }
}

/// Base numbers a fighter starts a match with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub max_health: f32,
    /// Base damage. Buffs raise the fighter's copy, and the difference is
    /// added on top of rolled damage.
    pub attack_damage: f32,
    /// Units moved per frame per held direction key
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub skill_cooldown: f32,
    pub dodge_cooldown: f32,
    /// Max seconds between hits for a combo to continue
    pub combo_window: f32,
}

impl ArchetypeStats {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_health <= 0.0 {
            return Err("max_health must be positive".to_string());
        }
        if self.speed < 0.0 || self.attack_damage < 0.0 || self.attack_range < 0.0 {
            return Err("speed, attack_damage and attack_range must not be negative".to_string());
        }
        if self.attack_cooldown < 0.0 || self.skill_cooldown < 0.0 || self.dodge_cooldown < 0.0 {
            return Err("cooldowns must not be negative".to_string());
        }
        if self.combo_window <= 0.0 {
            return Err("combo_window must be positive".to_string());
        }
        Ok(())
    }
}

/// Stats for every archetype, with RON overrides applied.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Roster {
    stats: HashMap<Archetype, ArchetypeStats>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            stats: Archetype::all()
                .iter()
                .map(|a| (*a, a.default_stats()))
                .collect(),
        }
    }
}

impl Roster {
    pub fn stats(&self, archetype: Archetype) -> ArchetypeStats {
        self.stats
            .get(&archetype)
            .copied()
            .unwrap_or_else(|| archetype.default_stats())
    }

    /// Parse RON overrides. Archetypes missing from the file keep their defaults.
    pub fn from_ron(contents: &str) -> Result<Self, String> {
        let overrides: HashMap<Archetype, ArchetypeStats> =
            ron::from_str(contents).map_err(|e| format!("Failed to parse roster: {}", e))?;

        let mut roster = Self::default();
        for (archetype, stats) in overrides {
            stats
                .validate()
                .map_err(|e| format!("Invalid stats for {}: {}", archetype.name(), e))?;
            roster.stats.insert(archetype, stats);
        }
        Ok(roster)
    }

    /// Load a roster file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read roster file {:?}: {}", path, e))?;
        let roster = Self::from_ron(&contents)?;
        info!("Loaded roster from {:?}", path);
        Ok(roster)
    }
}
