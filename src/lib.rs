//! ArenaDuel - two-fighter arena duel simulator
//!
//! The combat core (fighters, projectiles, pickups, animation) runs against
//! an explicit [`arena::Clock`] and talks to the outside world only through
//! the traits in [`services`]. The [`headless`] module drives it from a Bevy
//! app with scripted input.

pub mod animation;
pub mod arena;
pub mod buff;
pub mod cli;
pub mod combat;
pub mod constants;
pub mod controls;
pub mod duel;
pub mod fighter;
pub mod headless;
pub mod pool;
pub mod projectile;
pub mod roster;
pub mod services;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use duel::{Duel, MatchOutcome};
pub use fighter::{Fighter, PlayerSlot};
pub use headless::HeadlessMatchConfig;
pub use roster::{Archetype, Roster};
