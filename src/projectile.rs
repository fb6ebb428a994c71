//! Projectiles
//!
//! Arrows fired by the ranged archetype. A projectile is a point with a
//! constant per-frame velocity; it goes inactive when it leaves the arena or
//! scores a hit, and its owner sweeps it out of its pool afterwards.

use bevy::prelude::*;

use crate::arena::in_arena;
use crate::combat::StrikeSource;
use crate::constants::PROJECTILE_GRAVITY;
use crate::services::{full_uv, RenderSink, TextureHandle};

/// Drawn size of a textured arrow.
const ARROW_SPRITE_SIZE: Vec2 = Vec2::new(50.0, 30.0);

/// Drawn size of the fallback rectangle.
const ARROW_FALLBACK_SIZE: Vec2 = Vec2::new(10.0, 5.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Units per frame
    pub velocity: Vec2,
    pub damage: f32,
    pub active: bool,
    pub texture: TextureHandle,
    pub tint: Color,
    /// What fired it, reported with the strike when it connects
    pub source: StrikeSource,
    /// Whether `damage` came from a critical roll
    pub crit: bool,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, damage: f32, texture: TextureHandle, tint: Color) -> Self {
        debug!(
            "Created projectile at ({:.1}, {:.1}) with velocity ({:.1}, {:.1})",
            position.x, position.y, velocity.x, velocity.y
        );
        Self {
            position,
            velocity,
            damage,
            active: true,
            texture,
            tint,
            source: StrikeSource::Arrow,
            crit: false,
        }
    }

    pub fn tagged(mut self, source: StrikeSource, crit: bool) -> Self {
        self.source = source;
        self.crit = crit;
        self
    }

    /// Integrate one frame of motion and deactivate if out of bounds.
    pub fn update(&mut self) {
        if !self.active {
            return;
        }
        self.position.x += self.velocity.x;
        self.velocity.y += PROJECTILE_GRAVITY;
        self.position.y += self.velocity.y;

        if !in_arena(self.position) {
            self.active = false;
            debug!(
                "Projectile left the arena at ({:.1}, {:.1})",
                self.position.x, self.position.y
            );
        }
    }

    pub fn draw(&self, sink: &mut dyn RenderSink) {
        if !self.active {
            return;
        }
        if self.texture.is_none() {
            sink.filled_rect(self.position, self.position + ARROW_FALLBACK_SIZE, self.tint);
        } else {
            sink.textured_rect(
                self.texture,
                self.position,
                self.position + ARROW_SPRITE_SIZE,
                full_uv(),
            );
        }
    }
}
