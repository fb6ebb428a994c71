//! Buff pickups
//!
//! A [`BuffSpawner`] drops a random pickup in the middle third of the arena
//! every few seconds. The first fighter to walk over one (without dodging)
//! gets its effect and the pickup is consumed.

use bevy::prelude::*;

use crate::arena::{clamp_into, walk_bounds, Collider};
use crate::combat::GameRng;
use crate::constants::*;
use crate::fighter::Fighter;
use crate::services::RenderSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuffKind {
    DamageBoost,
    Heal,
    Shield,
    SpeedBoost,
}

impl BuffKind {
    pub fn all() -> &'static [BuffKind] {
        &[
            BuffKind::DamageBoost,
            BuffKind::Heal,
            BuffKind::Shield,
            BuffKind::SpeedBoost,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuffKind::DamageBoost => "Damage Boost",
            BuffKind::Heal => "Heal",
            BuffKind::Shield => "Shield",
            BuffKind::SpeedBoost => "Speed Boost",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            BuffKind::DamageBoost => Color::srgb(1.0, 0.5, 0.5),
            BuffKind::Heal => Color::srgb(0.5, 1.0, 0.5),
            BuffKind::Shield => Color::srgb(0.5, 0.5, 1.0),
            BuffKind::SpeedBoost => Color::srgb(0.5, 0.5, 0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuffPickup {
    pub position: Vec2,
    /// Nominal size; collides as `size * FIGHTER_SCALE`
    pub size: f32,
    pub kind: BuffKind,
}

impl BuffPickup {
    pub fn new(position: Vec2, kind: BuffKind) -> Self {
        Self {
            position,
            size: BUFF_SIZE,
            kind,
        }
    }

    /// Grant the effect. Dead or dodging fighters get nothing.
    pub fn apply_to(&self, target: &mut Fighter) -> bool {
        if target.is_dead || target.is_dodging {
            return false;
        }

        match self.kind {
            BuffKind::DamageBoost => target.attack_damage += BUFF_DAMAGE_BONUS,
            BuffKind::Heal => target.heal(BUFF_HEAL_AMOUNT),
            BuffKind::Shield => target.shielded = true,
            BuffKind::SpeedBoost => target.speed += BUFF_SPEED_BONUS,
        }
        true
    }

    pub fn draw(&self, sink: &mut dyn RenderSink) {
        sink.filled_rect(self.position, self.position + Vec2::splat(self.extent()), self.kind.color());
    }
}

impl Collider for BuffPickup {
    fn origin(&self) -> Vec2 {
        self.position
    }

    fn extent(&self) -> f32 {
        self.size * FIGHTER_SCALE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuffSpawner {
    /// Seconds between spawns
    pub interval: f32,
    pub last_spawn: f32,
}

impl BuffSpawner {
    /// The first pickup appears one interval after `start`.
    pub fn new(start: f32) -> Self {
        Self {
            interval: BUFF_SPAWN_INTERVAL,
            last_spawn: start,
        }
    }

    /// Spawn a pickup if the interval has elapsed.
    pub fn tick(&mut self, now: f32, rng: &mut GameRng) -> Option<BuffPickup> {
        if now - self.last_spawn <= self.interval {
            return None;
        }
        self.last_spawn = now;

        let kinds = BuffKind::all();
        let kind = kinds[rng.index(kinds.len())];

        let x = rng.range_f32(ARENA_WIDTH / 3.0, ARENA_WIDTH * 2.0 / 3.0);
        let y = rng.range_f32(ARENA_HEIGHT / 3.0, ARENA_HEIGHT * 2.0 / 3.0);
        let position = clamp_into(Vec2::new(x, y), walk_bounds(BUFF_SPAWN_EXTENT));

        info!(
            "{} pickup spawned at ({:.0}, {:.0})",
            kind.name(),
            position.x,
            position.y
        );
        Some(BuffPickup::new(position, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::PlayerSlot;
    use crate::roster::Archetype;
    use crate::services::{AssetService, TextureHandle};

    struct NoAssets;

    impl AssetService for NoAssets {
        fn load(&mut self, _key: &str, _path: &str) -> TextureHandle {
            TextureHandle::NONE
        }
        fn get(&self, _key: &str) -> TextureHandle {
            TextureHandle::NONE
        }
    }

    fn fighter() -> Fighter {
        Fighter::melee(PlayerSlot::One, &Archetype::Melee.default_stats(), &mut NoAssets, 0.0)
    }

    #[test]
    fn test_each_kind_applies_its_effect() {
        let at = Vec2::ZERO;

        let mut f = fighter();
        assert!(BuffPickup::new(at, BuffKind::DamageBoost).apply_to(&mut f));
        assert_eq!(f.attack_damage, 30.0);

        let mut f = fighter();
        f.take_damage(30.0, 0.0);
        BuffPickup::new(at, BuffKind::Heal).apply_to(&mut f);
        assert_eq!(f.health, 140.0);

        let mut f = fighter();
        BuffPickup::new(at, BuffKind::Shield).apply_to(&mut f);
        assert!(f.shielded);

        let mut f = fighter();
        BuffPickup::new(at, BuffKind::SpeedBoost).apply_to(&mut f);
        assert_eq!(f.speed, 5.0);
    }

    #[test]
    fn test_heal_is_capped_at_own_max() {
        let mut f = fighter();
        f.take_damage(5.0, 0.0);
        BuffPickup::new(Vec2::ZERO, BuffKind::Heal).apply_to(&mut f);
        assert_eq!(f.health, 150.0);
    }

    #[test]
    fn test_dodging_or_dead_fighter_gets_nothing() {
        let pickup = BuffPickup::new(Vec2::ZERO, BuffKind::SpeedBoost);

        let mut f = fighter();
        f.is_dodging = true;
        assert!(!pickup.apply_to(&mut f));
        assert_eq!(f.speed, 4.0);

        let mut f = fighter();
        f.take_damage(1000.0, 0.0);
        assert!(!pickup.apply_to(&mut f));
    }

    #[test]
    fn test_spawner_waits_a_full_interval() {
        let mut spawner = BuffSpawner::new(10.0);
        let mut rng = GameRng::from_seed(4);

        assert!(spawner.tick(20.0, &mut rng).is_none());
        assert!(spawner.tick(25.0, &mut rng).is_none());
        assert!(spawner.tick(25.1, &mut rng).is_some());
        assert!(spawner.tick(30.0, &mut rng).is_none());
        assert_eq!(spawner.last_spawn, 25.1);
    }

    #[test]
    fn test_spawns_land_in_walkable_middle() {
        let mut spawner = BuffSpawner::new(0.0);
        let mut rng = GameRng::from_seed(8);
        let bounds = walk_bounds(FIGHTER_SIZE * FIGHTER_SCALE);
        assert_eq!(bounds.max.y, 589.0);

        for i in 1..2000 {
            let pickup = spawner.tick(i as f32 * 16.0, &mut rng).unwrap();
            assert!(pickup.position.x >= ARENA_WIDTH / 3.0 && pickup.position.x < ARENA_WIDTH * 2.0 / 3.0);
            assert!(pickup.position.y >= bounds.min.y && pickup.position.y <= bounds.max.y);
        }
    }

    #[test]
    fn test_pickup_collides_with_scaled_box() {
        let pickup = BuffPickup::new(Vec2::new(500.0, 400.0), BuffKind::Heal);
        assert_eq!(pickup.extent(), 160.0);

        let f = fighter().with_position(Vec2::new(200.0, 300.0));
        assert!(f.overlaps(&pickup));
        let far = fighter().with_position(Vec2::new(1000.0, 300.0));
        assert!(!far.overlaps(&pickup));
    }
}
