//! Combat system
//!
//! Shared combat mechanics used by both archetypes:
//! - Seeded randomness ([`GameRng`])
//! - Hit and critical rolls
//! - The per-frame [`Strike`] reports attacks hand back to the match loop
//! - Combat logging

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use smallvec::SmallVec;

use crate::constants::{CRIT_CHANCE_PERCENT, CRIT_DAMAGE_MULTIPLIER};

pub mod log;

/// Seeded random number generator for deterministic match simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed and
/// the same input script always produce the same match outcome.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Uniform integer in `0..100`
    pub fn roll_percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }

    /// Uniform integer in `[min, max]` (inclusive)
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max.max(min))
    }

    /// Uniform f32 in `[min, max)`
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform index in `0..len`
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Chance-based hit check. `chance` is on a 0-100 scale.
pub fn attack_hits(chance: f32, rng: &mut GameRng) -> bool {
    (rng.roll_percent() as f32) < chance
}

/// A rolled damage value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub amount: f32,
    pub crit: bool,
}

/// Uniform integer damage in `[min, max]` with an independent crit roll that
/// doubles the result.
pub fn random_damage(min: f32, max: f32, rng: &mut GameRng) -> DamageRoll {
    let base = rng.range_inclusive(min as u32, max as u32) as f32;
    let crit = rng.roll_percent() < CRIT_CHANCE_PERCENT;
    let amount = if crit { base * CRIT_DAMAGE_MULTIPLIER } else { base };
    DamageRoll { amount, crit }
}

/// Result of a single `take_damage` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target was dead or mid-dodge
    Ignored,
    /// Target's shield ate the hit
    Absorbed,
    /// Health was reduced by `amount`; `fatal` if this hit killed
    Applied { amount: f32, fatal: bool },
}

/// What produced a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeSource {
    /// Regular melee swing
    Swing,
    /// Third hit of a melee combo
    Finisher,
    /// Melee charging skill
    Charge,
    /// Regular or charged arrow
    Arrow,
    /// Special arrow skill
    SpecialArrow,
}

impl StrikeSource {
    pub fn name(&self) -> &'static str {
        match self {
            StrikeSource::Swing => "Swing",
            StrikeSource::Finisher => "Combo Finisher",
            StrikeSource::Charge => "Charge",
            StrikeSource::Arrow => "Arrow",
            StrikeSource::SpecialArrow => "Special Arrow",
        }
    }
}

/// How a strike resolved against its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeResult {
    /// Hit chance roll failed
    Missed,
    /// Hit landed; what the target did with it
    Landed(DamageOutcome),
}

/// One resolved attack, reported back to the match loop for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub source: StrikeSource,
    /// Damage rolled before the target's shield/dodge checks
    pub rolled: f32,
    pub crit: bool,
    pub result: StrikeResult,
}

/// Strikes resolved by a single call. Almost always zero or one.
pub type Strikes = SmallVec<[Strike; 2]>;

/// Tracks consecutive hits landed within a time window.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTracker {
    pub count: u32,
    /// Max seconds between hits for the combo to continue
    pub window: f32,
    pub last_hit: Option<f32>,
}

impl ComboTracker {
    pub fn new(window: f32) -> Self {
        Self {
            count: 0,
            window,
            last_hit: None,
        }
    }

    /// Record a hit at `now` and return the new combo count.
    pub fn register_hit(&mut self, now: f32) -> u32 {
        let within_window = self.last_hit.is_some_and(|t| now - t < self.window);
        self.count = if within_window { self.count + 1 } else { 1 };
        self.last_hit = Some(now);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// A `(duration, last use)` pair gating a repeatable action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    pub duration: f32,
    pub last_used: Option<f32>,
}

impl Cooldown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            last_used: None,
        }
    }

    /// Strictly more than `duration` has passed since the last use.
    pub fn is_ready(&self, now: f32) -> bool {
        self.last_used.map_or(true, |t| now - t > self.duration)
    }

    pub fn trigger(&mut self, now: f32) {
        self.last_used = Some(now);
    }

    /// Seconds since last use, if ever used.
    pub fn elapsed(&self, now: f32) -> Option<f32> {
        self.last_used.map(|t| now - t)
    }
}
