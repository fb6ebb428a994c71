//! Integration tests for the fighter state machine
//!
//! These tests verify that:
//! - Health stays within bounds and death is permanent
//! - Dodging starts on a key press, respects its cooldown and expires
//! - Movement is clamped to the walkable band
//! - Animation follows movement and attacks

use arenaduel::arena::{walk_bounds, Clock};
use arenaduel::combat::{DamageOutcome, GameRng};
use arenaduel::constants::*;
use arenaduel::controls::ControlScheme;
use arenaduel::fighter::{Facing, Fighter, PlayerSlot};
use arenaduel::roster::Archetype;
use arenaduel::services::{AssetService, RenderSink, TextureHandle};
use bevy::prelude::*;

/// Asset service where every texture is missing.
struct NoAssets;

impl AssetService for NoAssets {
    fn load(&mut self, _key: &str, _path: &str) -> TextureHandle {
        TextureHandle::NONE
    }
    fn get(&self, _key: &str) -> TextureHandle {
        TextureHandle::NONE
    }
}

/// Asset service where every texture exists.
#[derive(Default)]
struct AllAssets(Vec<String>);

impl AssetService for AllAssets {
    fn load(&mut self, key: &str, _path: &str) -> TextureHandle {
        self.0.push(key.to_string());
        self.get(key)
    }
    fn get(&self, key: &str) -> TextureHandle {
        self.0
            .iter()
            .position(|k| k == key)
            .map(|i| TextureHandle(i as u32 + 1))
            .unwrap_or(TextureHandle::NONE)
    }
}

#[derive(Default)]
struct RecordingSink {
    textured: Vec<(TextureHandle, Rect)>,
    filled: usize,
    outlined: usize,
    text: Vec<String>,
}

impl RenderSink for RecordingSink {
    fn textured_rect(&mut self, texture: TextureHandle, _min: Vec2, _max: Vec2, uv: Rect) {
        self.textured.push((texture, uv));
    }
    fn filled_rect(&mut self, _min: Vec2, _max: Vec2, _color: Color) {
        self.filled += 1;
    }
    fn outlined_rect(&mut self, _min: Vec2, _max: Vec2, _color: Color) {
        self.outlined += 1;
    }
    fn text(&mut self, _position: Vec2, text: &str, _color: Color) {
        self.text.push(text.to_string());
    }
}

fn melee() -> Fighter {
    Fighter::melee(PlayerSlot::One, &Archetype::Melee.default_stats(), &mut NoAssets, 0.0)
}

fn keys(pressed: &[KeyCode]) -> ButtonInput<KeyCode> {
    let mut input = ButtonInput::default();
    for key in pressed {
        input.press(*key);
    }
    input
}

// =============================================================================
// Health
// =============================================================================

#[test]
fn test_health_never_leaves_bounds() {
    let mut fighter = melee();
    let mut rng = GameRng::from_seed(99);

    for i in 0..200 {
        let amount = rng.range_f32(0.0, 30.0);
        if i % 3 == 0 {
            fighter.heal(amount);
        } else {
            fighter.take_damage(amount, i as f32 * 0.1);
        }
        assert!(fighter.health >= 0.0 && fighter.health <= fighter.max_health);
        assert_eq!(fighter.is_dead, fighter.health == 0.0);
    }
}

#[test]
fn test_death_is_permanent() {
    let mut fighter = melee();
    fighter.take_damage(500.0, 1.0);
    assert!(fighter.is_dead);

    fighter.heal(100.0);
    assert_eq!(fighter.health, 0.0);
    assert_eq!(fighter.take_damage(10.0, 2.0), DamageOutcome::Ignored);

    let controls = ControlScheme::player_one();
    let before = fighter.position;
    fighter.move_with(&keys(&[KeyCode::KeyD]), &controls);
    fighter.dodge(&keys(&[KeyCode::KeyQ]), &controls, 5.0);
    assert_eq!(fighter.position, before);
    assert!(!fighter.is_dodging);
}

#[test]
fn test_shield_then_damage_numbers() {
    let mut fighter = melee();
    fighter.shielded = true;

    assert_eq!(fighter.take_damage(20.0, 1.0), DamageOutcome::Absorbed);
    assert!(fighter.damage_numbers.is_empty(), "absorbed hits show no number");

    fighter.take_damage(20.0, 1.0);
    assert_eq!(fighter.damage_numbers.len(), 1);
    fighter.update_damage_numbers(1.9);
    assert_eq!(fighter.damage_numbers.len(), 1);
    fighter.update_damage_numbers(2.1);
    assert!(fighter.damage_numbers.is_empty());
}

// =============================================================================
// Dodge
// =============================================================================

#[test]
fn test_dodge_moves_and_expires() {
    let mut fighter = melee().with_position(Vec2::new(500.0, 300.0));
    let controls = ControlScheme::player_one();

    fighter.dodge(&keys(&[KeyCode::KeyQ, KeyCode::KeyA]), &controls, 1.0);
    assert!(fighter.is_dodging);
    assert_eq!(fighter.position.x, 450.0);
    assert_eq!(fighter.facing, Facing::Left);

    // Immune while dodging
    assert_eq!(fighter.take_damage(50.0, 1.2), DamageOutcome::Ignored);

    // Still dodging at exactly the duration, done just after
    fighter.dodge(&ButtonInput::default(), &controls, 1.5);
    assert!(fighter.is_dodging);
    fighter.dodge(&ButtonInput::default(), &controls, 1.51);
    assert!(!fighter.is_dodging);
}

#[test]
fn test_dodge_respects_cooldown() {
    let mut fighter = melee().with_position(Vec2::new(500.0, 300.0));
    let controls = ControlScheme::player_one();
    let dodge_right = keys(&[KeyCode::KeyQ, KeyCode::KeyD]);

    fighter.dodge(&dodge_right, &controls, 1.0);
    fighter.dodge(&ButtonInput::default(), &controls, 1.6);
    fighter.dodge(&dodge_right, &controls, 2.5);
    assert!(!fighter.is_dodging, "cooldown is 2s");
    assert_eq!(fighter.position.x, 550.0);

    fighter.dodge(&dodge_right, &controls, 3.1);
    assert!(fighter.is_dodging);
    assert_eq!(fighter.position.x, 600.0);
}

#[test]
fn test_dodge_is_clamped_to_screen() {
    let mut fighter = melee().with_position(Vec2::new(20.0, 300.0));
    fighter.dodge(&keys(&[KeyCode::KeyQ, KeyCode::KeyA]), &ControlScheme::player_one(), 1.0);
    assert_eq!(fighter.position.x, 0.0);
}

#[test]
fn test_no_movement_while_dodging() {
    let mut fighter = melee().with_position(Vec2::new(500.0, 300.0));
    fighter.is_dodging = true;
    fighter.move_with(&keys(&[KeyCode::KeyD]), &ControlScheme::player_one());
    assert_eq!(fighter.position.x, 500.0);
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn test_movement_clamps_to_walk_bounds() {
    let mut fighter = melee();
    let controls = ControlScheme::player_one();
    let bounds = walk_bounds(fighter.scaled_size());

    let up_left = keys(&[KeyCode::KeyA, KeyCode::KeyW]);
    for _ in 0..1000 {
        fighter.move_with(&up_left, &controls);
    }
    assert_eq!(fighter.position, bounds.min);
    assert_eq!(fighter.position, Vec2::new(-WALK_MARGIN_X, PLAYABLE_TOP));

    let down_right = keys(&[KeyCode::KeyD, KeyCode::KeyS]);
    for _ in 0..1000 {
        fighter.move_with(&down_right, &controls);
    }
    assert_eq!(fighter.position, bounds.max);
    assert_eq!(fighter.facing, Facing::Right);
}

#[test]
fn test_speed_buff_moves_faster() {
    let mut fighter = melee().with_position(Vec2::new(500.0, 400.0));
    fighter.speed += 1.0;
    fighter.move_with(&keys(&[KeyCode::KeyD]), &ControlScheme::player_one());
    assert_eq!(fighter.position.x, 505.0);
}

// =============================================================================
// Animation & drawing
// =============================================================================

#[test]
fn test_animation_follows_state() {
    let mut fighter = melee();
    fighter.update_animation(0.0, false);
    assert!(fighter.animation.is_playing("idle"));

    fighter.update_animation(0.1, true);
    assert!(fighter.animation.is_playing("run"));

    // Swing at a target out of reach: animation plays even on a whiff
    let mut target = Fighter::melee(PlayerSlot::Two, &Archetype::Melee.default_stats(), &mut NoAssets, 0.0)
        .with_position(Vec2::new(1100.0, 300.0));
    let mut rng = GameRng::from_seed(1);
    fighter.attack(
        &mut target,
        &keys(&[KeyCode::KeyE]),
        &ControlScheme::player_one(),
        Clock::new(0.2, 1.0 / 60.0),
        &mut rng,
    );
    fighter.update_animation(0.2, true);
    assert!(fighter.is_attacking);
    assert!(fighter.animation.is_playing("attack"));

    // Four frames at 0.01s
    fighter.update_animation(0.25, true);
    assert!(!fighter.is_attacking);
    assert!(fighter.animation.is_playing("run"));
}

#[test]
fn test_draw_falls_back_to_solid_colour() {
    let mut fighter = melee();
    fighter.take_damage(12.0, 0.0);
    let mut sink = RecordingSink::default();

    fighter.draw(&mut sink, &NoAssets, 0.5);

    assert!(sink.textured.is_empty());
    assert_eq!(sink.filled, 1);
    assert_eq!(sink.text, vec!["12.0".to_string()]);
}

#[test]
fn test_draw_mirrors_when_facing_left() {
    let mut assets = AllAssets::default();
    let mut fighter = Fighter::melee(PlayerSlot::Two, &Archetype::Melee.default_stats(), &mut assets, 0.0);
    fighter.update_animation(0.0, false);
    assert_eq!(fighter.facing, Facing::Left);

    let mut sink = RecordingSink::default();
    fighter.draw(&mut sink, &assets, 0.0);

    let (texture, uv) = sink.textured[0];
    assert_eq!(texture, assets.get("dausi_idle"));
    assert!(uv.min.x > uv.max.x, "left-facing sprites sample mirrored");
    assert!((uv.min.x - 0.1).abs() < 1e-6);
}

#[test]
fn test_shield_is_outlined() {
    let mut fighter = melee();
    fighter.shielded = true;
    let mut sink = RecordingSink::default();
    fighter.draw(&mut sink, &NoAssets, 0.0);
    assert_eq!(sink.outlined, 1);
}

#[test]
fn test_fighter_names_and_spawns() {
    let one = melee();
    let two = Fighter::ranged(PlayerSlot::Two, &Archetype::Ranged.default_stats(), &mut NoAssets, 0.0);

    assert_eq!(one.name(), "Player 1 Melee");
    assert_eq!(two.name(), "Player 2 Ranged");
    assert_eq!(one.scaled_size(), FIGHTER_SIZE * FIGHTER_SCALE);
    assert!(one.position.x < two.position.x);
    assert_eq!(two.charge(), Some(0.0));
    assert_eq!(one.charge(), None);
}
