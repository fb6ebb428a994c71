//! Headless mode for scripted testing
//!
//! This module runs duels without any graphical output. Players are replaced
//! by a timeline of key presses, suitable for automated testing and
//! reproducing matches from a seed.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless match
//! cargo run --release -- --headless match_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "player1": "Melee",
//!   "player2": "Ranged",
//!   "max_duration_secs": 120,
//!   "random_seed": 7,
//!   "script": [{ "at": 1.0, "key": "KeyE", "hold": 0.05 }]
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{HeadlessMatchConfig, ScriptedPress};
pub use runner::{build_headless_app, run_headless_match, run_to_completion, MatchResult};
