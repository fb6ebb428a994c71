//! Melee archetype
//!
//! Swings only connect when the boxes overlap. Three connected swings inside
//! the combo window make a finisher that hits harder and knocks the target
//! back. The skill is a short dash that shoves and damages whoever it lands on.

use bevy::prelude::*;

use super::{Facing, Fighter, Kit};
use crate::animation::{AnimationClip, AnimationPlayer};
use crate::combat::{
    attack_hits, random_damage, ComboTracker, GameRng, Strike, StrikeResult, StrikeSource, Strikes,
};
use crate::constants::*;
use crate::controls::ControlScheme;
use crate::roster::ArchetypeStats;
use crate::services::{AssetService, InputSource};

#[derive(Debug, Clone, PartialEq)]
pub struct MeleeKit {
    pub combo: ComboTracker,
}

impl MeleeKit {
    pub fn new(stats: &ArchetypeStats, assets: &mut dyn AssetService, animation: &mut AnimationPlayer) -> Self {
        assets.load("dausi_idle", "DauSi/Sprites/Idle.png");
        assets.load("dausi_run", "DauSi/Sprites/Run.png");
        assets.load("dausi_attack", "DauSi/Sprites/Attack1.png");

        animation.add_clip("idle", AnimationClip::sheet("dausi_idle", 0.1, true, 10));
        animation.add_clip("run", AnimationClip::sheet("dausi_run", 0.1, true, 6));
        animation.add_clip("attack", AnimationClip::sheet("dausi_attack", 0.01, false, 4));

        Self {
            combo: ComboTracker::new(stats.combo_window),
        }
    }
}

impl Fighter {
    pub(super) fn melee_attack(
        &mut self,
        target: &mut Fighter,
        input: &dyn InputSource,
        controls: &ControlScheme,
        now: f32,
        rng: &mut GameRng,
    ) -> Strikes {
        let mut strikes = Strikes::new();

        if self.is_dead
            || self.is_dodging
            || target.is_dead
            || !input.is_pressed(controls.attack)
            || !self.attack_cooldown.is_ready(now)
        {
            return strikes;
        }

        self.start_attack_animation(now);

        // A whiff leaves the cooldown untouched
        if !self.is_colliding_with(target) {
            return strikes;
        }

        let combo = match &mut self.kit {
            Kit::Melee(kit) => kit.combo.register_hit(now),
            Kit::Ranged(_) => return strikes,
        };
        self.attack_cooldown.trigger(now);

        let roll = random_damage(MELEE_DAMAGE_MIN, MELEE_DAMAGE_MAX, rng);
        let mut damage = roll.amount + self.damage_bonus();
        let mut source = StrikeSource::Swing;

        if combo >= COMBO_FINISHER_COUNT {
            damage *= COMBO_FINISHER_MULTIPLIER;
            source = StrikeSource::Finisher;

            let away = Facing::toward(self.position, target.position).sign();
            let (push_x, push_y) = MELEE_FINISHER_PUSH;
            target.apply_push_back(Vec2::new(away * push_x, push_y));

            if let Kit::Melee(kit) = &mut self.kit {
                kit.combo.reset();
            }
            debug!("{} lands a combo finisher", self.name());
        }

        let result = if attack_hits(MELEE_HIT_CHANCE, rng) {
            StrikeResult::Landed(target.take_damage(damage, now))
        } else {
            StrikeResult::Missed
        };

        strikes.push(Strike {
            source,
            rolled: damage,
            crit: roll.crit,
            result,
        });
        strikes
    }

    /// Dash toward the opponent's side; shove and hurt them if the dash ends
    /// overlapping. No hit roll.
    pub(super) fn melee_skill(
        &mut self,
        target: &mut Fighter,
        input: &dyn InputSource,
        controls: &ControlScheme,
        now: f32,
    ) -> Strikes {
        let mut strikes = Strikes::new();

        if self.is_dead
            || self.is_dodging
            || !input.is_pressed(controls.skill)
            || !self.skill_cooldown.is_ready(now)
        {
            return strikes;
        }

        self.skill_cooldown.trigger(now);
        self.start_attack_animation(now);

        self.facing = Facing::toward(self.position, target.position);
        let direction = self.facing.sign();
        let max_x = ARENA_WIDTH - self.scaled_size();
        self.position.x = (self.position.x + direction * MELEE_SKILL_DASH).clamp(0.0, max_x);

        info!("{} charges at {:.2}s", self.name(), now);

        if self.is_colliding_with(target) {
            target.apply_push_back(Vec2::new(direction * MELEE_SKILL_PUSH, 0.0));
            strikes.push(Strike {
                source: StrikeSource::Charge,
                rolled: MELEE_SKILL_DAMAGE,
                crit: false,
                result: StrikeResult::Landed(target.take_damage(MELEE_SKILL_DAMAGE, now)),
            });
        }

        strikes
    }
}
