//! Combat Constants
//!
//! Centralized location for the fixed tuning values of the duel.
//! Arena geometry, cooldowns, damage ranges and pickup timings all live here.

// ============================================================================
// Arena
// ============================================================================

/// Arena width in world units (matches the 1500x900 play field).
pub const ARENA_WIDTH: f32 = 1500.0;

/// Arena height in world units.
pub const ARENA_HEIGHT: f32 = 900.0;

/// Scale applied to a nominal entity size to get its collision box side.
pub const FIGHTER_SCALE: f32 = 8.0;

/// Fighters may walk this far past the left/right screen edge.
pub const WALK_MARGIN_X: f32 = 100.0;

/// Top of the playable band fighters can walk in.
pub const PLAYABLE_TOP: f32 = 300.0;

/// Extra slack below the bottom edge of the playable band (sprite feet).
pub const PLAYABLE_BOTTOM_SLACK: f32 = 89.0;

/// Nominal size of a fighter before scaling.
pub const FIGHTER_SIZE: f32 = 50.0;

// ============================================================================
// Movement & Dodge
// ============================================================================

/// Horizontal displacement applied when a dodge starts.
pub const DODGE_DISTANCE: f32 = 50.0;

/// How long a dodge lasts once started (seconds).
pub const DODGE_DURATION: f32 = 0.5;

// ============================================================================
// Damage
// ============================================================================

/// Chance (0-100) that a critical roll succeeds.
pub const CRIT_CHANCE_PERCENT: u32 = 20;

/// Critical hits double the rolled damage.
pub const CRIT_DAMAGE_MULTIPLIER: f32 = 2.0;

/// Combo finisher damage multiplier.
pub const COMBO_FINISHER_MULTIPLIER: f32 = 1.5;

/// Combo count that triggers the finisher.
pub const COMBO_FINISHER_COUNT: u32 = 3;

/// Floating damage numbers disappear after this long (seconds).
pub const DAMAGE_NUMBER_LIFETIME: f32 = 1.0;

/// Floating damage numbers rise at this speed (units per second).
pub const DAMAGE_NUMBER_RISE_SPEED: f32 = 60.0;

// ============================================================================
// Melee
// ============================================================================

pub const MELEE_DAMAGE_MIN: f32 = 15.0;
pub const MELEE_DAMAGE_MAX: f32 = 20.0;

/// Chance (0-100) that a melee swing connects.
pub const MELEE_HIT_CHANCE: f32 = 85.0;

/// Push-back applied by the combo finisher (x away from attacker, y up).
pub const MELEE_FINISHER_PUSH: (f32, f32) = (30.0, -20.0);

/// Distance covered by the charging skill.
pub const MELEE_SKILL_DASH: f32 = 100.0;

/// Push-back applied when the charging skill connects.
pub const MELEE_SKILL_PUSH: f32 = 50.0;

/// Flat damage of the charging skill.
pub const MELEE_SKILL_DAMAGE: f32 = 30.0;

// ============================================================================
// Ranged
// ============================================================================

pub const RANGED_DAMAGE_MIN: f32 = 10.0;
pub const RANGED_DAMAGE_MAX: f32 = 15.0;

/// Chance (0-100) that a projectile inside the midsection band connects.
pub const RANGED_HIT_CHANCE: f32 = 90.0;

/// Charge is capped here (seconds of hold).
pub const MAX_CHARGE: f32 = 5.0;

/// A release with less charge than this does not fire.
pub const MIN_CHARGE_TO_FIRE: f32 = 0.1;

/// Extra speed multiplier gained at full charge (1x at zero, 3x at full).
pub const CHARGE_SPEED_BONUS: f32 = 2.0;

/// Projectile speed per unit of direction, per frame.
pub const PROJECTILE_BASE_SPEED: f32 = 5.0;

/// Vertical component of the upward shot direction.
pub const VERTICAL_SHOT_DIR_Y: f32 = -2.0;

/// Per-frame gravity applied to projectile vertical velocity.
pub const PROJECTILE_GRAVITY: f32 = 0.0;

/// Flat damage of the special projectile skill.
pub const RANGED_SKILL_DAMAGE: f32 = 30.0;

/// Fraction of target height where the midsection band starts.
pub const MIDSECTION_TOP: f32 = 0.4;

/// Fraction of target height where the midsection band ends.
pub const MIDSECTION_BOTTOM: f32 = 0.6;

// ============================================================================
// Buffs
// ============================================================================

/// A new pickup spawns every this many seconds.
pub const BUFF_SPAWN_INTERVAL: f32 = 15.0;

/// Nominal pickup size (collision extent is scaled by FIGHTER_SCALE).
pub const BUFF_SIZE: f32 = 20.0;

/// Extent used when clamping spawn positions into the walk bounds. Pickups
/// spawn inside the same band a full-size fighter can reach.
pub const BUFF_SPAWN_EXTENT: f32 = FIGHTER_SIZE * FIGHTER_SCALE;

pub const BUFF_DAMAGE_BONUS: f32 = 5.0;
pub const BUFF_HEAL_AMOUNT: f32 = 20.0;
pub const BUFF_SPEED_BONUS: f32 = 1.0;

/// How long a "received buff" notice stays on screen.
pub const BUFF_NOTICE_DURATION: f32 = 3.0;

// ============================================================================
// Match Flow
// ============================================================================

/// Delay between the killing blow and the results screen.
pub const GAME_END_DELAY: f32 = 1.0;
