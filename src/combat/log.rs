//! Combat logging
//!
//! Records all combat events for display and post-match analysis.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier used in the log for a fighter, e.g. "Player 1 Melee".
pub type FighterId = String;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Machine-readable payload for damage events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<DamageRecord>,
}

/// Structured data attached to damage entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub source: FighterId,
    pub target: FighterId,
    pub ability: String,
    pub amount: f32,
    pub crit: bool,
    pub is_killing_blow: bool,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Attack rolled a miss
    Miss,
    /// Hit eaten by a shield or dodge
    Avoided,
    /// Buff pickup consumed
    Buff,
    /// Fighter died
    Death,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// Per-fighter summary written alongside the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterMetadata {
    pub id: FighterId,
    pub archetype: String,
    pub max_health: f32,
    pub final_health: f32,
    pub final_position: (f32, f32),
}

/// Header written at the top of a saved match log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMetadata {
    /// "Player 1", "Player 2" or None for a draw / timeout
    pub winner: Option<String>,
    pub match_time: f32,
    pub random_seed: Option<u64>,
    pub fighters: Vec<FighterMetadata>,
}

#[derive(Serialize)]
struct SavedMatchLog<'a> {
    metadata: &'a MatchMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Clone)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            damage: None,
        });
    }

    /// Add a damage entry carrying structured data
    pub fn log_damage(&mut self, record: DamageRecord, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Damage,
            message,
            damage: Some(record),
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Total damage dealt by `source`, grouped by ability name
    pub fn damage_by_ability(&self, source: &str) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for record in self.damage_records().filter(|r| r.source == source) {
            *totals.entry(record.ability.clone()).or_insert(0.0) += record.amount;
        }
        totals
    }

    /// Total damage dealt by `source`
    pub fn total_damage_dealt(&self, source: &str) -> f32 {
        self.damage_records()
            .filter(|r| r.source == source)
            .map(|r| r.amount)
            .sum()
    }

    /// Total damage taken by `target`
    pub fn total_damage_taken(&self, target: &str) -> f32 {
        self.damage_records()
            .filter(|r| r.target == target)
            .map(|r| r.amount)
            .sum()
    }

    /// Number of critical hits landed by `source`
    pub fn crit_count(&self, source: &str) -> usize {
        self.damage_records()
            .filter(|r| r.source == source && r.crit)
            .count()
    }

    /// Who landed the killing blow on `target`, if anyone did
    pub fn killer_of(&self, target: &str) -> Option<&str> {
        self.damage_records()
            .find(|r| r.target == target && r.is_killing_blow)
            .map(|r| r.source.as_str())
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    fn damage_records(&self) -> impl Iterator<Item = &DamageRecord> {
        self.entries.iter().filter_map(|e| e.damage.as_ref())
    }

    /// Serialize the log with its metadata as pretty JSON
    pub fn to_json(&self, metadata: &MatchMetadata) -> Result<String, String> {
        let saved = SavedMatchLog {
            metadata,
            entries: &self.entries,
        };
        serde_json::to_string_pretty(&saved).map_err(|e| format!("Failed to serialize match log: {}", e))
    }

    /// Save the log to `path`, or to `match_logs/match_<unix-seconds>.json`.
    /// Returns the path written.
    pub fn save_to_file(&self, metadata: &MatchMetadata, path: Option<&str>) -> Result<String, String> {
        let path = match path {
            Some(p) => p.to_string(),
            None => {
                std::fs::create_dir_all("match_logs")
                    .map_err(|e| format!("Failed to create match_logs directory: {}", e))?;
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("match_logs/match_{}.json", stamp)
            }
        };

        let json = self.to_json(metadata)?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}
