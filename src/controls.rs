//! Per-player control schemes
//!
//! Maps each player's logical actions (move, attack, dodge, skill) onto
//! physical keys, and converts key names to and from strings for config files.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::InputSource;

/// Which way a ranged shot travels. Decided by which trigger fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aim {
    /// Toward the opponent's side
    Horizontal,
    /// Straight up
    Vertical,
}

/// An attack key together with the aim it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub key: KeyCode,
    pub aim: Aim,
}

/// Keys for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlScheme {
    #[serde(with = "keycode_serde")]
    pub left: KeyCode,
    #[serde(with = "keycode_serde")]
    pub right: KeyCode,
    #[serde(with = "keycode_serde")]
    pub up: KeyCode,
    #[serde(with = "keycode_serde")]
    pub down: KeyCode,
    /// Primary attack (horizontal shot for ranged fighters)
    #[serde(with = "keycode_serde")]
    pub attack: KeyCode,
    /// Alternate attack (vertical shot for ranged fighters)
    #[serde(with = "keycode_serde")]
    pub alt_attack: KeyCode,
    #[serde(with = "keycode_serde")]
    pub dodge: KeyCode,
    #[serde(with = "keycode_serde")]
    pub skill: KeyCode,
}

impl ControlScheme {
    /// Player 1: WASD, E attack, F alt attack, Q dodge, R skill
    pub fn player_one() -> Self {
        Self {
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            attack: KeyCode::KeyE,
            alt_attack: KeyCode::KeyF,
            dodge: KeyCode::KeyQ,
            skill: KeyCode::KeyR,
        }
    }

    /// Player 2: arrows, Space attack, Slash alt attack, Enter dodge, Right Shift skill
    pub fn player_two() -> Self {
        Self {
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            attack: KeyCode::Space,
            alt_attack: KeyCode::Slash,
            dodge: KeyCode::Enter,
            skill: KeyCode::ShiftRight,
        }
    }

    /// Any direction key held this frame
    pub fn is_moving(&self, input: &dyn InputSource) -> bool {
        [self.left, self.right, self.up, self.down]
            .into_iter()
            .any(|key| input.is_down(key))
    }

    pub fn primary_trigger(&self) -> Trigger {
        Trigger {
            key: self.attack,
            aim: Aim::Horizontal,
        }
    }

    pub fn alt_trigger(&self) -> Trigger {
        Trigger {
            key: self.alt_attack,
            aim: Aim::Vertical,
        }
    }

    /// The trigger driving a charge-based attack this frame: the alternate
    /// one while it is held or being released, otherwise the primary.
    pub fn active_trigger(&self, input: &dyn InputSource) -> Trigger {
        if input.is_down(self.alt_attack) || input.is_released(self.alt_attack) {
            self.alt_trigger()
        } else {
            self.primary_trigger()
        }
    }

    /// Every key this scheme uses
    pub fn keys(&self) -> [KeyCode; 8] {
        [
            self.left,
            self.right,
            self.up,
            self.down,
            self.attack,
            self.alt_attack,
            self.dodge,
            self.skill,
        ]
    }
}

/// Parse a key name as written in config files (Bevy `KeyCode` debug names).
pub fn parse_key(name: &str) -> Result<KeyCode, String> {
    let key = match name {
        "Escape" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Slash" => KeyCode::Slash,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return Err(format!("Unknown key: '{}'", name)),
    };
    Ok(key)
}

/// Inverse of [`parse_key`]
pub fn key_name(key: KeyCode) -> String {
    format!("{:?}", key)
}

mod keycode_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(key: &KeyCode, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&key_name(*key))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<KeyCode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        parse_key(&name).map_err(serde::de::Error::custom)
    }
}
