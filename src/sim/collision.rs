//! Collision detection and resolution
//!
//! Each check removes the entities it consumes from their owning collection
//! and reports what happened; scoring and level flow are applied by the
//! session.

use glam::Vec2;

use super::entities::{Alien, Bullet, PowerUp, PowerUpKind, Ship};

/// An alien destroyed by a bullet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    /// Centre of the alien at the moment it died
    pub center: Vec2,
    pub powerup: Option<PowerUpKind>,
}

/// Why the ship was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    /// An alien overlapped the ship
    Contact,
    /// An alien reached the bottom of the screen
    Landed,
}

/// Resolve bullet/alien overlaps. Each bullet destroys at most one alien and
/// each alien is destroyed by at most one bullet; both are removed.
pub fn bullets_vs_aliens(bullets: &mut Vec<Bullet>, aliens: &mut Vec<Alien>) -> Vec<Kill> {
    if bullets.is_empty() || aliens.is_empty() {
        return Vec::new();
    }

    let mut alien_dead = vec![false; aliens.len()];
    let mut bullet_spent = vec![false; bullets.len()];
    let mut kills = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        let bullet_rect = bullet.rect();
        let hit = aliens
            .iter()
            .enumerate()
            .find(|(ai, alien)| !alien_dead[*ai] && bullet_rect.intersects(&alien.rect()));

        if let Some((ai, alien)) = hit {
            alien_dead[ai] = true;
            bullet_spent[bi] = true;
            kills.push(Kill {
                center: alien.rect().center(),
                powerup: alien.powerup,
            });
        }
    }

    let mut flags = bullet_spent.into_iter();
    bullets.retain(|_| !flags.next().unwrap_or(false));
    let mut flags = alien_dead.into_iter();
    aliens.retain(|_| !flags.next().unwrap_or(false));

    kills
}

/// Check whether any alien hits the ship, either by contact or by landing.
/// Contact takes precedence when both happen on the same frame.
pub fn ship_threat(ship: &Ship, aliens: &[Alien], screen_height: f32) -> Option<HitCause> {
    let ship_rect = ship.rect();
    if aliens.iter().any(|a| a.rect().intersects(&ship_rect)) {
        return Some(HitCause::Contact);
    }
    if aliens.iter().any(|a| a.rect().bottom() >= screen_height) {
        return Some(HitCause::Landed);
    }
    None
}

/// Remove power-ups the ship touches, returning their kinds in collection
/// order
pub fn ship_vs_powerups(ship: &Ship, powerups: &mut Vec<PowerUp>) -> Vec<PowerUpKind> {
    let ship_rect = ship.rect();
    let mut collected = Vec::new();
    powerups.retain(|p| {
        if p.rect().intersects(&ship_rect) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    collected
}

/// Sweep the fleet sideways and drop/flip it when any alien touches an edge.
/// Returns the new fleet direction.
pub fn advance_fleet(
    aliens: &mut [Alien],
    direction: f32,
    speed: f32,
    drop_distance: f32,
    screen_width: f32,
) -> f32 {
    let mut direction = direction;
    if aliens.iter().any(|a| a.at_edge(screen_width)) {
        for alien in aliens.iter_mut() {
            alien.drop_by(drop_distance);
        }
        direction = -direction;
    }
    for alien in aliens.iter_mut() {
        alien.advance(speed, direction);
    }
    direction
}
