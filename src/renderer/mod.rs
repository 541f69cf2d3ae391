//! Rendering boundary
//!
//! The game never touches pixels; it issues draw calls against a [`Surface`]
//! supplied by the host.

pub mod assets;
pub mod hud;

pub use assets::{AssetError, AssetSource, DirectoryAssets, Sprite, SpriteCatalog, SpriteId};
pub use hud::Hud;

use glam::Vec2;

use crate::sim::Rect;

/// RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BACKGROUND: Color = Color(230, 230, 230);
    pub const TEXT: Color = Color(30, 30, 30);
    pub const BULLET: Color = Color(60, 60, 60);
    pub const BUTTON: Color = Color(0, 135, 0);
    pub const BUTTON_TEXT: Color = Color(255, 255, 255);
}

/// Host drawing surface
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn draw_sprite(&mut self, sprite: &Sprite, rect: Rect);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color);
    /// Show the finished frame
    fn present(&mut self) {}
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Sprite(SpriteId, Rect),
    Rect(Rect, Color),
    Text(String, Vec2),
}

/// Surface that records draw calls (headless hosts and tests)
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub frames: u64,
}

impl RecordingSurface {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text(t, _) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn sprites(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Sprite(id, _) => Some(*id),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: &Sprite, rect: Rect) {
        self.calls.push(DrawCall::Sprite(sprite.id, rect));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Rect(rect, color));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, _color: Color) {
        self.calls.push(DrawCall::Text(text.to_string(), pos));
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
