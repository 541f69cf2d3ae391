//! Scoreboard text, prepared only when the underlying stat changes

use glam::Vec2;

use super::{Color, Surface};
use crate::renderer::assets::{SpriteCatalog, SpriteId};
use crate::sim::Rect;
use crate::{format_score, group_thousands};

/// Cached HUD strings
#[derive(Debug, Clone)]
pub struct Hud {
    /// Size of one remaining-ship icon
    ship_icon: Vec2,
    score: Option<(u64, String)>,
    high_score: Option<(u64, String)>,
    level: Option<(u32, String)>,
    ships: u32,
    /// Number of times any text was re-prepared
    refreshes: u32,
}

impl Hud {
    /// HUD whose ship icons are half the configured ship size
    pub fn new(ship_size: Vec2) -> Self {
        Self {
            ship_icon: ship_size / 2.0,
            score: None,
            high_score: None,
            level: None,
            ships: 0,
            refreshes: 0,
        }
    }

    pub fn set_score(&mut self, score: u64) {
        if self.score.as_ref().is_some_and(|(s, _)| *s == score) {
            return;
        }
        self.score = Some((score, format_score(score)));
        self.refreshes += 1;
    }

    pub fn set_high_score(&mut self, high_score: u64) {
        if self.high_score.as_ref().is_some_and(|(s, _)| *s == high_score) {
            return;
        }
        self.high_score = Some((high_score, format_score(high_score)));
        self.refreshes += 1;
    }

    pub fn set_level(&mut self, level: u32) {
        if self.level.as_ref().is_some_and(|(l, _)| *l == level) {
            return;
        }
        self.level = Some((level, format!("L{}", group_thousands(level as u64))));
        self.refreshes += 1;
    }

    pub fn set_ships(&mut self, ships: u32) {
        if self.ships != ships {
            self.ships = ships;
            self.refreshes += 1;
        }
    }

    pub fn score_text(&self) -> &str {
        self.score.as_ref().map(|(_, t)| t.as_str()).unwrap_or("0")
    }

    pub fn high_score_text(&self) -> &str {
        self.high_score.as_ref().map(|(_, t)| t.as_str()).unwrap_or("0")
    }

    pub fn level_text(&self) -> &str {
        self.level.as_ref().map(|(_, t)| t.as_str()).unwrap_or("L1")
    }

    pub fn ships(&self) -> u32 {
        self.ships
    }

    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    /// Score top-right, high score top-centre, level under the score, one
    /// small ship per remaining life top-left
    pub fn draw(&self, surface: &mut dyn Surface, catalog: &SpriteCatalog, screen_width: f32) {
        surface.draw_text(self.score_text(), Vec2::new(screen_width - 120.0, 20.0), Color::TEXT);
        surface.draw_text(
            self.high_score_text(),
            Vec2::new(screen_width / 2.0, 20.0),
            Color::TEXT,
        );
        surface.draw_text(self.level_text(), Vec2::new(screen_width - 120.0, 60.0), Color::TEXT);

        let icon = self.ship_icon;
        for i in 0..self.ships {
            let rect = Rect {
                pos: Vec2::new(10.0 + i as f32 * (icon.x + 6.0), 10.0),
                size: icon,
            };
            catalog.draw(surface, SpriteId::Ship, rect);
        }
    }
}
