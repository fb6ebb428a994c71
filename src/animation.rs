//! Animation Playback
//!
//! Each fighter owns an [`AnimationPlayer`]: a catalog of named clips plus the
//! state of the one clip currently playing. Frame selection is a pure function
//! of the shared clock, so playback never drifts from cooldown timers.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::services::{full_uv, AssetService, TextureHandle};

/// A named, timed sequence of frames.
///
/// Either a list of individual textures (one per frame) or a single sprite
/// sheet sliced horizontally into `frame_count` equal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub texture_keys: Vec<String>,
    /// Seconds each frame stays on screen
    pub frame_duration: f32,
    pub looping: bool,
    pub frame_count: usize,
    pub sprite_sheet: bool,
    /// First cell used on the sheet
    pub start_frame: usize,
}

impl AnimationClip {
    /// Clip cut from a horizontal sprite sheet.
    pub fn sheet(texture_key: &str, frame_duration: f32, looping: bool, frame_count: usize) -> Self {
        Self {
            texture_keys: vec![texture_key.to_string()],
            frame_duration,
            looping,
            frame_count,
            sprite_sheet: true,
            start_frame: 0,
        }
    }

    /// Clip made of one texture per frame.
    pub fn frames(texture_keys: &[&str], frame_duration: f32, looping: bool) -> Self {
        Self {
            texture_keys: texture_keys.iter().map(|k| k.to_string()).collect(),
            frame_duration,
            looping,
            frame_count: texture_keys.len(),
            sprite_sheet: false,
            start_frame: 0,
        }
    }

    pub fn starting_at(mut self, start_frame: usize) -> Self {
        self.start_frame = start_frame;
        self
    }

    /// Number of frames actually played (never zero).
    pub fn effective_frame_count(&self) -> usize {
        let count = if self.sprite_sheet {
            self.frame_count
        } else {
            self.texture_keys.len()
        };
        count.max(1)
    }

    /// Total playback time of one pass through the clip.
    pub fn total_duration(&self) -> f32 {
        self.frame_duration * self.effective_frame_count() as f32
    }
}

/// The texture and UV window to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    pub texture: TextureHandle,
    pub uv: Rect,
}

impl FrameResult {
    pub fn none() -> Self {
        Self {
            texture: TextureHandle::NONE,
            uv: full_uv(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    clips: HashMap<String, AnimationClip>,
    current: Option<String>,
    started_at: f32,
    frame_index: usize,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip. A clip already stored under `name` is replaced.
    pub fn add_clip(&mut self, name: &str, clip: AnimationClip) {
        self.clips.insert(name.to_string(), clip);
    }

    /// Switch to `name` if it exists and is not already playing.
    pub fn play(&mut self, name: &str, now: f32) {
        if self.is_playing(name) || !self.clips.contains_key(name) {
            return;
        }
        self.current = Some(name.to_string());
        self.started_at = now;
        self.frame_index = 0;
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    fn current_clip(&self) -> Option<&AnimationClip> {
        self.current.as_ref().and_then(|name| self.clips.get(name))
    }

    /// Recompute the frame index for `now`.
    pub fn update(&mut self, now: f32) {
        let Some(clip) = self.current_clip() else {
            return;
        };

        let elapsed = (now - self.started_at).max(0.0);
        let frame_count = clip.effective_frame_count();
        let raw_index = (elapsed / clip.frame_duration) as usize;

        self.frame_index = if clip.looping {
            raw_index % frame_count
        } else {
            raw_index.min(frame_count - 1)
        };
    }

    /// Texture and UV window for the current frame.
    pub fn current_frame(&self, assets: &dyn AssetService) -> FrameResult {
        let Some(clip) = self.current_clip() else {
            return FrameResult::none();
        };

        if !clip.sprite_sheet {
            let key = clip
                .texture_keys
                .get(self.frame_index)
                .or_else(|| clip.texture_keys.first());
            return FrameResult {
                texture: key.map(|k| assets.get(k)).unwrap_or(TextureHandle::NONE),
                uv: full_uv(),
            };
        }

        let texture = clip
            .texture_keys
            .first()
            .map(|k| assets.get(k))
            .unwrap_or(TextureHandle::NONE);

        if clip.frame_count <= 1 {
            return FrameResult { texture, uv: full_uv() };
        }

        let frame_width = 1.0 / clip.frame_count as f32;
        let cell = (clip.start_frame + self.frame_index) as f32;
        let u0 = frame_width * cell;

        FrameResult {
            texture,
            uv: Rect::new(u0, 0.0, u0 + frame_width, 1.0),
        }
    }

    /// Whether the one-shot clip `name` has played through.
    ///
    /// Looping clips never finish. Unknown clips, and clips that are not the
    /// one currently playing, count as finished.
    pub fn has_finished(&self, name: &str, now: f32) -> bool {
        let Some(clip) = self.clips.get(name) else {
            return true;
        };
        if clip.looping {
            return false;
        }
        if !self.is_playing(name) {
            return true;
        }
        now - self.started_at > clip.total_duration()
    }
}
