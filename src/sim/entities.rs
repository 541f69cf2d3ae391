//! Movable game entities: ship, aliens, bullets and power-ups
//!
//! Entities are plain values owned by exactly one collection in the session.
//! Motion is integrated per frame; timed effects use wall-clock milliseconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::POWERUP_SIZE;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Ship ignores alien contact while active
    Shield,
    /// Ship fires bullet pairs with a doubled in-flight cap
    DoubleFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::DoubleFire];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::DoubleFire => "double_fire",
        }
    }

    /// Fall speed relative to the level's base power-up fall speed
    pub fn fall_factor(&self) -> f32 {
        match self {
            PowerUpKind::Shield => 1.0,
            PowerUpKind::DoubleFire => 1.25,
        }
    }
}

/// An effect that stays on until a wall-clock deadline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    active_until: Option<u64>,
}

impl TimedEffect {
    /// Turn on (or refresh) the effect; durations never stack
    pub fn activate(&mut self, now_ms: u64, duration_ms: u64) {
        self.active_until = Some(now_ms.saturating_add(duration_ms));
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.active_until.is_some_and(|until| now_ms < until)
    }

    /// Clear the effect if its deadline has passed. Returns true on the
    /// update where it expires.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match self.active_until {
            Some(until) if now_ms >= until => {
                self.active_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.active_until
            .map(|until| until.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.active_until = None;
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub x: f32,
    /// Snapped to whole pixels
    pub y: i32,
    pub size: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub shield: TimedEffect,
    pub double_fire: TimedEffect,
}

impl Ship {
    /// A ship centred at the bottom of the screen
    pub fn new(size: Vec2, speed: f32, screen: Vec2) -> Self {
        let mut ship = Self {
            x: 0.0,
            y: 0,
            size,
            speed,
            moving_left: false,
            moving_right: false,
            shield: TimedEffect::default(),
            double_fire: TimedEffect::default(),
        };
        ship.center(screen);
        ship
    }

    /// Re-centre at the bottom of the screen and stop moving
    pub fn center(&mut self, screen: Vec2) {
        self.x = (screen.x - self.size.x) / 2.0;
        self.y = (screen.y - self.size.y).floor() as i32;
        self.moving_left = false;
        self.moving_right = false;
    }

    /// Move per input flags, clamped to the screen
    pub fn update(&mut self, screen_width: f32) {
        if self.moving_right && self.x + self.size.x < screen_width {
            self.x += self.speed;
        }
        if self.moving_left && self.x > 0.0 {
            self.x -= self.speed;
        }
        self.x = self.x.clamp(0.0, (screen_width - self.size.x).max(0.0));
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y as f32, self.size.x, self.size.y)
    }

    pub fn effect(&self, kind: PowerUpKind) -> &TimedEffect {
        match kind {
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::DoubleFire => &self.double_fire,
        }
    }

    pub fn effect_mut(&mut self, kind: PowerUpKind) -> &mut TimedEffect {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::DoubleFire => &mut self.double_fire,
        }
    }

    /// Effect shown on the sprite when several are active (shield wins)
    pub fn dominant_effect(&self, now_ms: u64) -> Option<PowerUpKind> {
        if self.shield.is_active(now_ms) {
            Some(PowerUpKind::Shield)
        } else if self.double_fire.is_active(now_ms) {
            Some(PowerUpKind::DoubleFire)
        } else {
            None
        }
    }

    /// Expire finished effects, returning the kinds that just ran out
    pub fn expire_effects(&mut self, now_ms: u64) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|&kind| self.effect_mut(kind).expire(now_ms))
            .collect()
    }
}

/// Cosmetic sprite variant for an alien
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlienSprite(pub u8);

/// A single alien in the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    /// Sub-pixel horizontal position
    pub x: f32,
    pub y: i32,
    pub size: Vec2,
    pub sprite: AlienSprite,
    /// Drop assigned at fleet creation
    pub powerup: Option<PowerUpKind>,
}

impl Alien {
    pub fn new(x: f32, y: i32, size: Vec2, sprite: AlienSprite) -> Self {
        Self {
            x,
            y,
            size,
            sprite,
            powerup: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y as f32, self.size.x, self.size.y)
    }

    /// True if the alien touches either side of the screen
    pub fn at_edge(&self, screen_width: f32) -> bool {
        self.x + self.size.x >= screen_width || self.x <= 0.0
    }

    /// Horizontal step in the shared fleet direction (+1 right, -1 left)
    pub fn advance(&mut self, speed: f32, direction: f32) {
        self.x += speed * direction;
    }

    /// Move down by `distance`, truncating to whole pixels
    pub fn drop_by(&mut self, distance: f32) {
        self.y = (self.y as f32 + distance).floor() as i32;
    }
}

/// A bullet fired by the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed in pixels per frame
    pub speed: f32,
}

impl Bullet {
    /// Spawn a bullet at the ship's top edge, offset horizontally from centre
    pub fn from_ship(ship: &Ship, offset_x: f32, size: Vec2, speed: f32) -> Self {
        let center_x = ship.x + ship.size.x / 2.0 + offset_x;
        Self {
            pos: Vec2::new(center_x - size.x / 2.0, ship.y as f32),
            size,
            speed,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= self.speed;
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Entirely above the top of the play area
    pub fn off_screen(&self) -> bool {
        self.pos.y + self.size.y <= 0.0
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed in pixels per frame
    pub speed: f32,
}

impl PowerUp {
    /// Spawn centred on `center`. `base_fall_speed` is scaled by the kind's
    /// factor and never exceeds `max_speed`.
    pub fn spawn(kind: PowerUpKind, center: Vec2, base_fall_speed: f32, max_speed: f32) -> Self {
        let size = Vec2::splat(POWERUP_SIZE);
        Self {
            kind,
            pos: center - size / 2.0,
            size,
            speed: (base_fall_speed * kind.fall_factor()).min(max_speed),
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Entirely below the bottom of the play area
    pub fn off_screen(&self, screen_height: f32) -> bool {
        self.pos.y >= screen_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);

    fn ship() -> Ship {
        Ship::new(Vec2::new(60.0, 48.0), 1.5, SCREEN)
    }

    #[test]
    fn test_ship_centered_bottom() {
        let s = ship();
        assert_eq!(s.x, 570.0);
        assert_eq!(s.y, 752);
        assert_eq!(s.rect().bottom(), 800.0);
    }

    #[test]
    fn test_ship_clamped_to_screen() {
        let mut s = ship();
        s.x = 0.5;
        s.moving_left = true;
        s.update(SCREEN.x);
        assert_eq!(s.x, 0.0);

        s.moving_left = false;
        s.moving_right = true;
        s.x = SCREEN.x - s.size.x - 0.5;
        s.update(SCREEN.x);
        assert_eq!(s.x, SCREEN.x - s.size.x);
    }

    #[test]
    fn test_timed_effect_refresh_does_not_stack() {
        let mut effect = TimedEffect::default();
        effect.activate(1_000, 5_000);
        effect.activate(3_000, 5_000);
        assert_eq!(effect.remaining_ms(3_000), 5_000);
        assert!(effect.is_active(7_999));
        assert!(!effect.expire(7_999));
        assert!(effect.expire(8_000));
        assert!(!effect.is_active(8_000));
        assert!(!effect.expire(9_000));
    }

    #[test]
    fn test_dominant_effect_prefers_shield() {
        let mut s = ship();
        assert_eq!(s.dominant_effect(0), None);
        s.double_fire.activate(0, 100);
        assert_eq!(s.dominant_effect(0), Some(PowerUpKind::DoubleFire));
        s.shield.activate(0, 100);
        assert_eq!(s.dominant_effect(0), Some(PowerUpKind::Shield));
        // Both stay active for gameplay
        assert!(s.double_fire.is_active(50));
        assert_eq!(s.expire_effects(100).len(), 2);
    }

    #[test]
    fn test_alien_drop_truncates() {
        let mut a = Alien::new(10.0, 40, Vec2::splat(40.0), AlienSprite(0));
        a.drop_by(8.2);
        assert_eq!(a.y, 48);
        a.drop_by(8.9);
        assert_eq!(a.y, 56);
    }

    #[test]
    fn test_alien_edges() {
        let size = Vec2::splat(40.0);
        assert!(Alien::new(0.0, 0, size, AlienSprite(0)).at_edge(SCREEN.x));
        assert!(Alien::new(1160.0, 0, size, AlienSprite(0)).at_edge(SCREEN.x));
        assert!(!Alien::new(600.0, 0, size, AlienSprite(0)).at_edge(SCREEN.x));
    }

    #[test]
    fn test_bullet_leaves_top() {
        let s = ship();
        let mut b = Bullet::from_ship(&s, 0.0, Vec2::new(3.0, 15.0), 10.0);
        assert_eq!(b.pos.x, 598.5);
        let mut frames = 0;
        while !b.off_screen() {
            b.update();
            frames += 1;
        }
        // 752 + 15 pixels at 10 per frame
        assert_eq!(frames, 77);
    }

    #[test]
    fn test_powerup_speed_clamped() {
        let p = PowerUp::spawn(PowerUpKind::DoubleFire, Vec2::new(100.0, 100.0), 1.0, 1.1);
        assert_eq!(p.speed, 1.1);
        assert_eq!(p.rect().center(), Vec2::new(100.0, 100.0));
        let p = PowerUp::spawn(PowerUpKind::Shield, Vec2::ZERO, 1.0, 1.1);
        assert_eq!(p.speed, 1.0);
    }
}
