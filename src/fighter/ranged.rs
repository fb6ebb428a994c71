//! Ranged archetype
//!
//! Holding the attack trigger draws the bow; releasing it fires an arrow whose
//! speed grows with the charge. Arrows belong to the shooter's kit and only
//! connect when they cross the target's midsection.

use bevy::prelude::*;

use super::{Facing, Fighter, Kit};
use crate::animation::{AnimationClip, AnimationPlayer};
use crate::arena::Clock;
use crate::combat::{
    attack_hits, random_damage, ComboTracker, GameRng, Strike, StrikeResult, StrikeSource, Strikes,
};
use crate::constants::*;
use crate::controls::{Aim, ControlScheme, Trigger};
use crate::pool::EntityPool;
use crate::projectile::Projectile;
use crate::roster::ArchetypeStats;
use crate::services::{AssetService, InputSource, RenderSink, TextureHandle};

/// Tint of the special arrow.
const SPECIAL_ARROW_TINT: Color = Color::srgb(1.0, 1.0, 0.0);

#[derive(Debug, Clone)]
pub struct RangedKit {
    pub combo: ComboTracker,
    /// Seconds the trigger has been held, capped at `MAX_CHARGE`
    pub charge: f32,
    pub projectiles: EntityPool<Projectile>,
    pub arrow_texture: TextureHandle,
}

impl RangedKit {
    pub fn new(stats: &ArchetypeStats, assets: &mut dyn AssetService, animation: &mut AnimationPlayer) -> Self {
        assets.load("xathu_idle", "XaThu/Idle.png");
        assets.load("xathu_running", "XaThu/Running.png");
        assets.load("xathu_attack", "XaThu/Attack.png");
        let arrow_texture = assets.load("arrow", "XaThu/arrow.png");

        animation.add_clip("idle", AnimationClip::sheet("xathu_idle", 0.1, true, 8));
        animation.add_clip("run", AnimationClip::sheet("xathu_running", 0.1, true, 8));
        animation.add_clip("attack", AnimationClip::sheet("xathu_attack", 0.05, false, 8));

        Self {
            combo: ComboTracker::new(stats.combo_window),
            charge: 0.0,
            projectiles: EntityPool::new(),
            arrow_texture,
        }
    }

    /// Speed multiplier for the current charge: 1x empty, 3x full.
    pub fn charge_multiplier(&self) -> f32 {
        1.0 + CHARGE_SPEED_BONUS * (self.charge / MAX_CHARGE).min(1.0)
    }

    /// Move every arrow one frame and resolve hits against `target`, then
    /// sweep spent arrows out of the pool.
    pub fn advance_projectiles(&mut self, target: &mut Fighter, now: f32, rng: &mut GameRng) -> Strikes {
        let mut strikes = Strikes::new();

        let extent = target.scaled_size();
        let span_x = target.position.x..=target.position.x + extent;
        let band_y = target.position.y + extent * MIDSECTION_TOP..=target.position.y + extent * MIDSECTION_BOTTOM;

        for (_, projectile) in self.projectiles.iter_mut() {
            projectile.update();
            if !projectile.active || target.is_dead {
                continue;
            }
            if !span_x.contains(&projectile.position.x) || !band_y.contains(&projectile.position.y) {
                continue;
            }

            let result = if attack_hits(RANGED_HIT_CHANCE, rng) {
                StrikeResult::Landed(target.take_damage(projectile.damage, now))
            } else {
                StrikeResult::Missed
            };
            strikes.push(Strike {
                source: projectile.source,
                rolled: projectile.damage,
                crit: projectile.crit,
                result,
            });
            projectile.active = false;
        }

        self.projectiles.mark_where(|p| !p.active);
        self.projectiles.compact();
        strikes
    }

    pub fn draw_projectiles(&self, sink: &mut dyn RenderSink) {
        for (_, projectile) in self.projectiles.iter() {
            projectile.draw(sink);
        }
    }
}

impl Fighter {
    fn ranged_kit_mut(&mut self) -> Option<&mut RangedKit> {
        match &mut self.kit {
            Kit::Ranged(kit) => Some(kit),
            Kit::Melee(_) => None,
        }
    }

    /// Where arrows leave the bow: the leading edge at half height.
    fn muzzle(&self) -> Vec2 {
        let lead = match self.facing {
            Facing::Right => self.scaled_size(),
            Facing::Left => 0.0,
        };
        self.position + Vec2::new(lead, self.scaled_size() / 2.0)
    }

    /// Charge while `trigger` is held, fire on its release, then advance
    /// this fighter's arrows. A dead shooter's arrows stop where they are.
    pub fn ranged_attack(
        &mut self,
        target: &mut Fighter,
        trigger: Trigger,
        input: &dyn InputSource,
        clock: Clock,
        rng: &mut GameRng,
    ) -> Strikes {
        if self.is_dead {
            return Strikes::new();
        }
        let now = clock.now;

        if input.is_down(trigger.key) {
            if let Some(kit) = self.ranged_kit_mut() {
                kit.charge = (kit.charge + clock.dt).min(MAX_CHARGE);
            }
            self.start_attack_animation(now);
        } else if input.is_released(trigger.key) {
            self.release_arrow(target, trigger.aim, now, rng);
        }

        match &mut self.kit {
            Kit::Ranged(kit) => kit.advance_projectiles(target, now, rng),
            Kit::Melee(_) => Strikes::new(),
        }
    }

    fn release_arrow(&mut self, target: &Fighter, aim: Aim, now: f32, rng: &mut GameRng) {
        let charge = self.charge().unwrap_or(0.0);
        if charge <= MIN_CHARGE_TO_FIRE
            || self.is_dodging
            || target.is_dead
            || !self.attack_cooldown.is_ready(now)
        {
            // Charge is kept for the next release
            return;
        }

        self.attack_cooldown.trigger(now);

        let roll = random_damage(RANGED_DAMAGE_MIN, RANGED_DAMAGE_MAX, rng);
        let mut damage = roll.amount + self.damage_bonus();

        let direction = match aim {
            Aim::Horizontal => {
                self.facing = Facing::toward(self.position, target.position);
                Vec2::new(self.facing.sign(), 0.0)
            }
            Aim::Vertical => {
                self.facing = Facing::Right;
                Vec2::new(0.0, VERTICAL_SHOT_DIR_Y)
            }
        };
        let origin = self.muzzle();
        let tint = self.tint;

        let Some(kit) = self.ranged_kit_mut() else {
            return;
        };

        if kit.combo.register_hit(now) == COMBO_FINISHER_COUNT {
            damage *= COMBO_FINISHER_MULTIPLIER;
            kit.combo.reset();
        }

        let velocity = direction * PROJECTILE_BASE_SPEED * kit.charge_multiplier();
        let texture = kit.arrow_texture;
        kit.projectiles.insert(
            Projectile::new(origin, velocity, damage, texture, tint).tagged(StrikeSource::Arrow, roll.crit),
        );
        kit.charge = 0.0;

        debug!(
            "{} looses an arrow ({:.1} dmg, {:?}) at {:.2}s",
            self.name(),
            damage,
            aim,
            now
        );
    }

    /// Fire the special arrow: fixed damage, uncharged, toward the opponent.
    pub(super) fn ranged_skill(
        &mut self,
        target: &mut Fighter,
        input: &dyn InputSource,
        controls: &ControlScheme,
        now: f32,
    ) -> Strikes {
        if self.is_dead
            || self.is_dodging
            || !input.is_pressed(controls.skill)
            || !self.skill_cooldown.is_ready(now)
        {
            return Strikes::new();
        }

        self.skill_cooldown.trigger(now);
        self.start_attack_animation(now);
        self.facing = Facing::toward(self.position, target.position);

        let origin = self.muzzle();
        let velocity = Vec2::new(self.facing.sign() * PROJECTILE_BASE_SPEED, 0.0);
        if let Some(kit) = self.ranged_kit_mut() {
            let texture = kit.arrow_texture;
            kit.projectiles.insert(
                Projectile::new(origin, velocity, RANGED_SKILL_DAMAGE, texture, SPECIAL_ARROW_TINT)
                    .tagged(StrikeSource::SpecialArrow, false),
            );
        }

        info!("{} fires a special arrow at {:.2}s", self.name(), now);

        // The arrow reports its hit when it lands, from `ranged_attack`
        Strikes::new()
    }
}
