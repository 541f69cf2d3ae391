//! Sprite catalog with deterministic fallbacks
//!
//! Every sprite the game draws is resolved once at startup. A sprite that
//! cannot be loaded is drawn as a flat rectangle filling the entity's bounds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Color, Surface};
use crate::consts::ALIEN_SPRITE_VARIANTS;
use crate::sim::{PowerUpKind, Rect};

/// Every drawable sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Ship,
    ShipShielded,
    ShipDoubleFire,
    Alien(u8),
    PowerUp(PowerUpKind),
}

impl SpriteId {
    /// All sprites the game needs
    pub fn all() -> Vec<SpriteId> {
        let mut ids = vec![SpriteId::Ship, SpriteId::ShipShielded, SpriteId::ShipDoubleFire];
        ids.extend((0..ALIEN_SPRITE_VARIANTS).map(SpriteId::Alien));
        ids.extend(PowerUpKind::ALL.into_iter().map(SpriteId::PowerUp));
        ids
    }

    pub fn file_name(&self) -> String {
        match self {
            SpriteId::Ship => "ship.png".to_string(),
            SpriteId::ShipShielded => "ship_shield.png".to_string(),
            SpriteId::ShipDoubleFire => "ship_double_fire.png".to_string(),
            SpriteId::Alien(v) => format!("alien_{v}.png"),
            SpriteId::PowerUp(kind) => format!("powerup_{}.png", kind.as_str()),
        }
    }

    /// Flat colour used when the image is unavailable
    pub fn fallback_color(&self) -> Color {
        match self {
            SpriteId::Ship => Color(40, 90, 200),
            SpriteId::ShipShielded => Color(80, 200, 255),
            SpriteId::ShipDoubleFire => Color(255, 140, 0),
            SpriteId::Alien(_) => Color(60, 170, 60),
            SpriteId::PowerUp(PowerUpKind::Shield) => Color(0, 190, 255),
            SpriteId::PowerUp(PowerUpKind::DoubleFire) => Color(255, 200, 0),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("Asset '{path}' is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Where sprite images come from
pub trait AssetSource {
    /// Resolve a sprite to an image handle the host can draw
    fn load(&self, id: SpriteId) -> Result<PathBuf, AssetError>;
}

/// Images stored as files in one directory
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectoryAssets {
    fn load(&self, id: SpriteId) -> Result<PathBuf, AssetError> {
        let path = self.root.join(id.file_name());
        let meta = std::fs::metadata(&path).map_err(|_| AssetError::NotFound { path: path.clone() })?;
        if meta.len() == 0 {
            return Err(AssetError::Corrupt {
                path,
                reason: "empty file".to_string(),
            });
        }
        Ok(path)
    }
}

/// How a sprite will be drawn
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteImage {
    /// Host-decoded image file
    File(PathBuf),
    /// Flat rectangle
    Fallback(Color),
}

/// A resolved sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    pub image: SpriteImage,
}

impl Sprite {
    pub fn is_fallback(&self) -> bool {
        matches!(self.image, SpriteImage::Fallback(_))
    }
}

/// All sprites, resolved up front
#[derive(Debug, Clone)]
pub struct SpriteCatalog {
    sprites: HashMap<SpriteId, Sprite>,
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self::fallbacks()
    }
}

impl SpriteCatalog {
    /// Load every sprite from `source`, substituting fallbacks on failure
    pub fn load(source: &dyn AssetSource) -> Self {
        let sprites = SpriteId::all()
            .into_iter()
            .map(|id| {
                let image = match source.load(id) {
                    Ok(path) => SpriteImage::File(path),
                    Err(e) => {
                        log::warn!("{e}; drawing {id:?} as a flat rectangle");
                        SpriteImage::Fallback(id.fallback_color())
                    }
                };
                (id, Sprite { id, image })
            })
            .collect::<HashMap<_, _>>();
        let fallbacks = sprites.values().filter(|s| s.is_fallback()).count();
        log::info!("Loaded {} sprites ({fallbacks} fallbacks)", sprites.len());
        Self { sprites }
    }

    /// Catalog made only of flat rectangles
    pub fn fallbacks() -> Self {
        let sprites = SpriteId::all()
            .into_iter()
            .map(|id| {
                let image = SpriteImage::Fallback(id.fallback_color());
                (id, Sprite { id, image })
            })
            .collect();
        Self { sprites }
    }

    pub fn get(&self, id: SpriteId) -> Sprite {
        self.sprites.get(&id).cloned().unwrap_or_else(|| {
            log::warn!("Unknown sprite {id:?}; using neutral fallback");
            Sprite {
                id,
                image: SpriteImage::Fallback(Color(128, 128, 128)),
            }
        })
    }

    /// Draw a sprite into `rect`, as a flat rectangle if it is a fallback
    pub fn draw(&self, surface: &mut dyn Surface, id: SpriteId, rect: Rect) {
        let sprite = self.get(id);
        match sprite.image {
            SpriteImage::Fallback(color) => surface.draw_rect(rect, color),
            SpriteImage::File(_) => surface.draw_sprite(&sprite, rect),
        }
    }
}
