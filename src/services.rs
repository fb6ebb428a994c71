//! Collaborator interfaces
//!
//! The combat core never talks to a window, a GPU or the filesystem directly.
//! It reads keys through [`InputSource`], resolves textures through
//! [`AssetService`] and emits draw calls into a [`RenderSink`].

use bevy::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

// ============================================================================
// Input
// ============================================================================

/// Keyboard state for the current frame.
pub trait InputSource {
    /// Key is held this frame.
    fn is_down(&self, key: KeyCode) -> bool;
    /// Key went from up to down this frame.
    fn is_pressed(&self, key: KeyCode) -> bool;
    /// Key went from down to up this frame.
    fn is_released(&self, key: KeyCode) -> bool;
}

impl InputSource for ButtonInput<KeyCode> {
    fn is_down(&self, key: KeyCode) -> bool {
        self.pressed(key)
    }

    fn is_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed(key)
    }

    fn is_released(&self, key: KeyCode) -> bool {
        self.just_released(key)
    }
}

// ============================================================================
// Assets
// ============================================================================

/// Opaque texture handle. `NONE` means "no texture", and callers fall back to
/// drawing a solid rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const NONE: TextureHandle = TextureHandle(0);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Maps string keys to loaded textures.
pub trait AssetService {
    /// Load `path` under `key`. Idempotent per key; returns
    /// [`TextureHandle::NONE`] on failure instead of erroring.
    fn load(&mut self, key: &str, path: &str) -> TextureHandle;

    /// Look up a previously loaded texture.
    fn get(&self, key: &str) -> TextureHandle;
}

/// File-backed texture catalog used by hosts without a GPU.
///
/// A texture "loads" when its file exists under the asset root; it is then
/// assigned the next free handle. Missing files are remembered as `NONE` so
/// the warning is only logged once per key.
#[derive(Resource, Debug, Default)]
pub struct TextureRegistry {
    root: PathBuf,
    textures: HashMap<String, TextureHandle>,
    next_id: u32,
}

impl TextureRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of keys that resolved to a real texture.
    pub fn loaded_count(&self) -> usize {
        self.textures.values().filter(|h| !h.is_none()).count()
    }
}

impl AssetService for TextureRegistry {
    fn load(&mut self, key: &str, path: &str) -> TextureHandle {
        if let Some(handle) = self.textures.get(key) {
            return *handle;
        }

        let full_path = self.root.join(path);
        let handle = if full_path.is_file() {
            self.next_id = self.next_id.max(1);
            let handle = TextureHandle(self.next_id);
            self.next_id += 1;
            debug!("Loaded texture '{}' from {:?}", key, full_path);
            handle
        } else {
            warn!(
                "Could not load texture '{}' from {:?}, falling back to solid colour",
                key, full_path
            );
            TextureHandle::NONE
        };

        self.textures.insert(key.to_string(), handle);
        handle
    }

    fn get(&self, key: &str) -> TextureHandle {
        self.textures.get(key).copied().unwrap_or(TextureHandle::NONE)
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Drawing backend. Coordinates are arena units with the origin top-left.
pub trait RenderSink {
    /// Draw `texture` stretched over `[min, max]`, sampling the `uv` window.
    fn textured_rect(&mut self, texture: TextureHandle, min: Vec2, max: Vec2, uv: Rect);

    fn filled_rect(&mut self, min: Vec2, max: Vec2, color: Color);

    fn outlined_rect(&mut self, min: Vec2, max: Vec2, color: Color);

    fn text(&mut self, position: Vec2, text: &str, color: Color);
}

/// Full texture UV window.
pub fn full_uv() -> Rect {
    Rect::new(0.0, 0.0, 1.0, 1.0)
}
