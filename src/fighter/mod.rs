//! Fighter state machine
//!
//! A [`Fighter`] owns everything both archetypes share: position, health,
//! cooldowns, floating damage numbers and the animation player. The
//! archetype-specific state lives in the closed [`Kit`] enum and is dispatched
//! on in [`Fighter::attack`], [`Fighter::use_skill`] and [`Fighter::draw`].
//!
//! States: Idle/Moving, Dodging, Attacking and Dead. Dead is terminal: every
//! movement, dodge, attack and skill call becomes a no-op.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::animation::AnimationPlayer;
use crate::arena::{clamp_into, screen_bounds, walk_bounds, Clock, Collider};
use crate::combat::{Cooldown, DamageOutcome, GameRng, Strikes};
use crate::constants::*;
use crate::controls::ControlScheme;
use crate::roster::{Archetype, ArchetypeStats};
use crate::services::{AssetService, InputSource, RenderSink};

pub mod melee;
pub mod ranged;

pub use melee::MeleeKit;
pub use ranged::RangedKit;

/// Which side of the duel a fighter is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerSlot::One => "Player 1",
            PlayerSlot::Two => "Player 2",
        }
    }

    pub fn opponent(&self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// Fallback colour when no sprite is available.
    pub fn tint(&self) -> Color {
        match self {
            PlayerSlot::One => Color::srgb(0.3, 0.5, 1.0),
            PlayerSlot::Two => Color::srgb(1.0, 0.35, 0.3),
        }
    }

    /// Where a fighter in this slot starts the match.
    pub fn spawn_position(&self) -> Vec2 {
        let scaled = FIGHTER_SIZE * FIGHTER_SCALE;
        match self {
            PlayerSlot::One => Vec2::new(200.0, PLAYABLE_TOP),
            PlayerSlot::Two => Vec2::new(ARENA_WIDTH - scaled - 200.0, PLAYABLE_TOP),
        }
    }

    pub fn initial_facing(&self) -> Facing {
        match self {
            PlayerSlot::One => Facing::Right,
            PlayerSlot::Two => Facing::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points from `from` toward `to` horizontally. Ties face right.
    pub fn toward(from: Vec2, to: Vec2) -> Facing {
        if to.x < from.x {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// A number floating up from a fighter after taking damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageNumber {
    pub value: f32,
    pub origin: Vec2,
    pub created_at: f32,
}

impl DamageNumber {
    /// Current position: rises from `origin` at a constant rate.
    pub fn position(&self, now: f32) -> Vec2 {
        let age = (now - self.created_at).max(0.0);
        self.origin - Vec2::new(0.0, DAMAGE_NUMBER_RISE_SPEED * age)
    }

    pub fn is_expired(&self, now: f32) -> bool {
        now - self.created_at > DAMAGE_NUMBER_LIFETIME
    }
}

pub type DamageNumbers = SmallVec<[DamageNumber; 4]>;

/// Archetype-specific state.
#[derive(Debug, Clone)]
pub enum Kit {
    Melee(MeleeKit),
    Ranged(RangedKit),
}

#[derive(Debug, Clone)]
pub struct Fighter {
    pub slot: PlayerSlot,
    pub archetype: Archetype,
    /// Top-left corner of the collision box
    pub position: Vec2,
    pub facing: Facing,
    /// Nominal size; the collision box side is `size * FIGHTER_SCALE`
    pub size: f32,
    pub tint: Color,

    pub health: f32,
    pub max_health: f32,
    /// Damage before buffs
    pub base_attack_damage: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub speed: f32,

    pub shielded: bool,
    pub is_dead: bool,
    pub is_dodging: bool,
    pub is_attacking: bool,

    pub dodge_cooldown: Cooldown,
    pub attack_cooldown: Cooldown,
    pub skill_cooldown: Cooldown,

    pub damage_numbers: DamageNumbers,
    pub animation: AnimationPlayer,
    pub kit: Kit,
}

impl Fighter {
    /// Build a fighter of `archetype` in `slot`, loading its textures and
    /// registering its animation clips. Starts idle at the slot's spawn point.
    pub fn new(
        slot: PlayerSlot,
        archetype: Archetype,
        stats: &ArchetypeStats,
        assets: &mut dyn AssetService,
        now: f32,
    ) -> Self {
        let mut animation = AnimationPlayer::new();
        let kit = match archetype {
            Archetype::Melee => Kit::Melee(MeleeKit::new(stats, assets, &mut animation)),
            Archetype::Ranged => Kit::Ranged(RangedKit::new(stats, assets, &mut animation)),
        };
        animation.play("idle", now);

        info!(
            "{} enters as {} ({} hp)",
            slot.label(),
            archetype.name(),
            stats.max_health
        );

        Self {
            slot,
            archetype,
            position: slot.spawn_position(),
            facing: slot.initial_facing(),
            size: FIGHTER_SIZE,
            tint: slot.tint(),
            health: stats.max_health,
            max_health: stats.max_health,
            base_attack_damage: stats.attack_damage,
            attack_damage: stats.attack_damage,
            attack_range: stats.attack_range,
            speed: stats.speed,
            shielded: false,
            is_dead: false,
            is_dodging: false,
            is_attacking: false,
            dodge_cooldown: Cooldown::new(stats.dodge_cooldown),
            attack_cooldown: Cooldown::new(stats.attack_cooldown),
            skill_cooldown: Cooldown::new(stats.skill_cooldown),
            damage_numbers: DamageNumbers::new(),
            animation,
            kit,
        }
    }

    pub fn melee(slot: PlayerSlot, stats: &ArchetypeStats, assets: &mut dyn AssetService, now: f32) -> Self {
        Self::new(slot, Archetype::Melee, stats, assets, now)
    }

    pub fn ranged(slot: PlayerSlot, stats: &ArchetypeStats, assets: &mut dyn AssetService, now: f32) -> Self {
        Self::new(slot, Archetype::Ranged, stats, assets, now)
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Identifier used in the combat log, e.g. "Player 1 Melee".
    pub fn name(&self) -> String {
        format!("{} {}", self.slot.label(), self.archetype.name())
    }

    /// Side length of the collision box.
    pub fn scaled_size(&self) -> f32 {
        self.size * FIGHTER_SCALE
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Current bow charge for ranged fighters.
    pub fn charge(&self) -> Option<f32> {
        match &self.kit {
            Kit::Ranged(kit) => Some(kit.charge),
            Kit::Melee(_) => None,
        }
    }

    pub fn combo_count(&self) -> u32 {
        match &self.kit {
            Kit::Melee(kit) => kit.combo.count,
            Kit::Ranged(kit) => kit.combo.count,
        }
    }

    // ------------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------------

    /// Walk one frame according to the held direction keys.
    pub fn move_with(&mut self, input: &dyn InputSource, controls: &ControlScheme) {
        if self.is_dead || self.is_dodging {
            return;
        }

        if input.is_down(controls.left) {
            self.position.x -= self.speed;
            self.facing = Facing::Left;
        }
        if input.is_down(controls.right) {
            self.position.x += self.speed;
            self.facing = Facing::Right;
        }
        if input.is_down(controls.up) {
            self.position.y -= self.speed;
        }
        if input.is_down(controls.down) {
            self.position.y += self.speed;
        }

        self.position = clamp_into(self.position, walk_bounds(self.scaled_size()));
    }

    /// End an expired dodge, then start a new one if the dodge key was just
    /// pressed and the cooldown allows it.
    pub fn dodge(&mut self, input: &dyn InputSource, controls: &ControlScheme, now: f32) {
        if self.is_dodging && self.dodge_cooldown.elapsed(now).map_or(true, |e| e > DODGE_DURATION) {
            self.is_dodging = false;
            debug!("{} dodge ended", self.name());
        }

        if self.is_dead
            || self.is_dodging
            || !input.is_pressed(controls.dodge)
            || !self.dodge_cooldown.is_ready(now)
        {
            return;
        }

        self.dodge_cooldown.trigger(now);
        self.is_dodging = true;

        if input.is_down(controls.left) {
            self.position.x -= DODGE_DISTANCE;
            self.facing = Facing::Left;
        } else if input.is_down(controls.right) {
            self.position.x += DODGE_DISTANCE;
            self.facing = Facing::Right;
        }
        self.position = clamp_into(self.position, screen_bounds(self.scaled_size()));

        debug!("{} dodges at {:.2}s", self.name(), now);
    }

    /// Shift by `offset`, staying fully on screen.
    pub fn apply_push_back(&mut self, offset: Vec2) {
        self.position = clamp_into(self.position + offset, screen_bounds(self.scaled_size()));
    }

    // ------------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------------

    pub fn take_damage(&mut self, amount: f32, now: f32) -> DamageOutcome {
        if self.is_dead || self.is_dodging {
            return DamageOutcome::Ignored;
        }
        if self.shielded {
            self.shielded = false;
            debug!("{}'s shield absorbed {:.1} damage", self.name(), amount);
            return DamageOutcome::Absorbed;
        }

        let amount = amount.max(0.0);
        self.health = (self.health - amount).max(0.0);
        debug_assert!(self.health >= 0.0 && self.health <= self.max_health);

        self.damage_numbers.push(DamageNumber {
            value: amount,
            origin: self.position + Vec2::new(self.scaled_size() / 2.0, 0.0),
            created_at: now,
        });

        let fatal = self.health <= 0.0;
        if fatal {
            self.is_dead = true;
            self.is_dodging = false;
            info!("{} has been defeated", self.name());
        }

        DamageOutcome::Applied { amount, fatal }
    }

    /// Restore health, never above max. Dead fighters stay dead.
    pub fn heal(&mut self, amount: f32) {
        if self.is_dead {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Drop damage numbers older than their lifetime.
    pub fn update_damage_numbers(&mut self, now: f32) {
        self.damage_numbers.retain(|n| !n.is_expired(now));
    }

    /// Scaled box overlap with a living opponent.
    pub fn is_colliding_with(&self, other: &Fighter) -> bool {
        !other.is_dead && self.overlaps(other)
    }

    // ------------------------------------------------------------------------
    // Combat dispatch
    // ------------------------------------------------------------------------

    /// Run this frame's basic attack against `target`.
    pub fn attack(
        &mut self,
        target: &mut Fighter,
        input: &dyn InputSource,
        controls: &ControlScheme,
        clock: Clock,
        rng: &mut GameRng,
    ) -> Strikes {
        match self.kit {
            Kit::Melee(_) => self.melee_attack(target, input, controls, clock.now, rng),
            Kit::Ranged(_) => {
                let trigger = controls.active_trigger(input);
                self.ranged_attack(target, trigger, input, clock, rng)
            }
        }
    }

    /// Run this frame's special skill against `target`.
    pub fn use_skill(
        &mut self,
        target: &mut Fighter,
        input: &dyn InputSource,
        controls: &ControlScheme,
        now: f32,
    ) -> Strikes {
        match self.kit {
            Kit::Melee(_) => self.melee_skill(target, input, controls, now),
            Kit::Ranged(_) => self.ranged_skill(target, input, controls, now),
        }
    }

    /// Play the attack clip and flag the fighter as attacking.
    fn start_attack_animation(&mut self, now: f32) {
        self.animation.play("attack", now);
        self.is_attacking = true;
    }

    /// Buff bonus added on top of rolled damage.
    fn damage_bonus(&self) -> f32 {
        (self.attack_damage - self.base_attack_damage).max(0.0)
    }

    // ------------------------------------------------------------------------
    // Animation & drawing
    // ------------------------------------------------------------------------

    /// Pick the clip for this frame and advance it.
    pub fn update_animation(&mut self, now: f32, moving: bool) {
        if self.is_attacking && self.animation.has_finished("attack", now) {
            self.is_attacking = false;
        }
        if !self.is_attacking {
            self.animation.play(if moving { "run" } else { "idle" }, now);
        }
        self.animation.update(now);
    }

    pub fn draw(&self, sink: &mut dyn RenderSink, assets: &dyn AssetService, now: f32) {
        let min = self.position;
        let max = self.position + Vec2::splat(self.scaled_size());

        let frame = self.animation.current_frame(assets);
        if frame.texture.is_none() {
            sink.filled_rect(min, max, self.tint);
        } else {
            // Sprites face right; a left-facing fighter samples the window mirrored
            let uv = match self.facing {
                Facing::Right => frame.uv,
                Facing::Left => Rect {
                    min: Vec2::new(frame.uv.max.x, frame.uv.min.y),
                    max: Vec2::new(frame.uv.min.x, frame.uv.max.y),
                },
            };
            sink.textured_rect(frame.texture, min, max, uv);
        }

        if self.shielded {
            sink.outlined_rect(min, max, Color::srgb(0.5, 0.5, 1.0));
        }

        if let Kit::Ranged(kit) = &self.kit {
            kit.draw_projectiles(sink);
        }

        for number in &self.damage_numbers {
            sink.text(
                number.position(now),
                &format!("{:.1}", number.value),
                Color::srgb(1.0, 0.2, 0.2),
            );
        }
    }
}

impl Collider for Fighter {
    fn origin(&self) -> Vec2 {
        self.position
    }

    fn extent(&self) -> f32 {
        self.scaled_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TextureHandle;

    pub(crate) struct NoAssets;

    impl AssetService for NoAssets {
        fn load(&mut self, _key: &str, _path: &str) -> TextureHandle {
            TextureHandle::NONE
        }
        fn get(&self, _key: &str) -> TextureHandle {
            TextureHandle::NONE
        }
    }

    fn melee(slot: PlayerSlot) -> Fighter {
        Fighter::melee(slot, &Archetype::Melee.default_stats(), &mut NoAssets, 0.0)
    }

    #[test]
    fn test_three_hits_kill_ranged_fighter() {
        let mut fighter = Fighter::ranged(
            PlayerSlot::Two,
            &Archetype::Ranged.default_stats(),
            &mut NoAssets,
            0.0,
        );

        let expected = [(80.0, false), (40.0, false), (0.0, true)];
        for (i, (health, dead)) in expected.into_iter().enumerate() {
            let outcome = fighter.take_damage(40.0, i as f32);
            assert_eq!(fighter.health, health);
            assert_eq!(fighter.is_dead, dead);
            assert_eq!(outcome, DamageOutcome::Applied { amount: 40.0, fatal: dead });
        }

        assert_eq!(fighter.take_damage(40.0, 5.0), DamageOutcome::Ignored);
        assert_eq!(fighter.health, 0.0);
    }

    #[test]
    fn test_shield_absorbs_exactly_once() {
        let mut fighter = melee(PlayerSlot::One);
        fighter.shielded = true;

        assert_eq!(fighter.take_damage(30.0, 0.0), DamageOutcome::Absorbed);
        assert_eq!(fighter.health, 150.0);
        assert!(!fighter.shielded);

        fighter.take_damage(30.0, 0.1);
        assert_eq!(fighter.health, 120.0);
    }

    #[test]
    fn test_dodging_fighter_ignores_damage() {
        let mut fighter = melee(PlayerSlot::One);
        fighter.is_dodging = true;
        assert_eq!(fighter.take_damage(30.0, 0.0), DamageOutcome::Ignored);
        assert_eq!(fighter.health, 150.0);
        assert!(fighter.damage_numbers.is_empty());
    }

    #[test]
    fn test_damage_number_lifetime() {
        let mut fighter = melee(PlayerSlot::One);
        fighter.take_damage(10.0, 2.0);

        fighter.update_damage_numbers(2.9);
        assert_eq!(fighter.damage_numbers.len(), 1);

        fighter.update_damage_numbers(3.1);
        assert!(fighter.damage_numbers.is_empty());
    }

    #[test]
    fn test_damage_number_rises() {
        let number = DamageNumber {
            value: 5.0,
            origin: Vec2::new(100.0, 300.0),
            created_at: 1.0,
        };
        assert_eq!(number.position(1.5), Vec2::new(100.0, 270.0));
    }

    #[test]
    fn test_overkill_clamps_health_at_zero() {
        let mut fighter = melee(PlayerSlot::One);
        fighter.take_damage(1000.0, 0.0);
        assert_eq!(fighter.health, 0.0);
        assert!(fighter.is_dead);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut fighter = melee(PlayerSlot::One);
        fighter.take_damage(10.0, 0.0);
        fighter.heal(50.0);
        assert_eq!(fighter.health, fighter.max_health);
    }

    #[test]
    fn test_push_back_stays_on_screen() {
        let mut fighter = melee(PlayerSlot::One).with_position(Vec2::new(10.0, 10.0));
        fighter.apply_push_back(Vec2::new(-50.0, -50.0));
        assert_eq!(fighter.position, Vec2::ZERO);
    }

    #[test]
    fn test_dead_opponent_never_collides() {
        let one = melee(PlayerSlot::One).with_position(Vec2::new(100.0, 300.0));
        let mut two = melee(PlayerSlot::Two).with_position(Vec2::new(150.0, 300.0));
        assert!(one.is_colliding_with(&two));

        two.take_damage(1000.0, 0.0);
        assert!(!one.is_colliding_with(&two));
    }

    #[test]
    fn test_facing_toward() {
        assert_eq!(Facing::toward(Vec2::new(10.0, 0.0), Vec2::ZERO), Facing::Left);
        assert_eq!(Facing::toward(Vec2::ZERO, Vec2::new(10.0, 0.0)), Facing::Right);
    }
}
