//! Idle/demo mode - a simple AI that plays the game
//!
//! Produces the same input events a player would, so the session cannot tell
//! the difference.

use super::entities::Alien;
use super::session::GameSession;
use super::state::GamePhase;
use crate::platform::{InputEvent, Key};

/// Pixels of slack before the ship starts moving toward a target
const DEAD_ZONE: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Frames between shots
    fire_interval: u32,
    frame: u64,
    /// Direction key currently held
    held: Option<Key>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(12)
    }
}

impl Autopilot {
    pub fn new(fire_interval: u32) -> Self {
        Self {
            fire_interval: fire_interval.max(1),
            frame: 0,
            held: None,
        }
    }

    /// Decide this frame's input
    pub fn inputs(&mut self, session: &GameSession) -> Vec<InputEvent> {
        self.frame += 1;
        let mut events = Vec::new();

        match session.phase() {
            GamePhase::Menu | GamePhase::GameOver => {
                self.held = None;
                events.push(InputEvent::KeyDown(Key::Start));
                return events;
            }
            GamePhase::Paused => return events,
            GamePhase::Playing => {}
        }

        let world = session.world();
        let ship_center = world.ship.rect().center().x;

        // Grab a power-up if one is falling, otherwise line up under the
        // lowest alien
        let target = world
            .powerups
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|p| p.rect().center().x)
            .or_else(|| {
                nearest_low_alien(&world.aliens, ship_center).map(|a| a.rect().center().x)
            });

        let wanted = match target {
            Some(x) if x < ship_center - DEAD_ZONE => Some(Key::Left),
            Some(x) if x > ship_center + DEAD_ZONE => Some(Key::Right),
            _ => None,
        };

        if wanted != self.held {
            if let Some(key) = self.held {
                events.push(InputEvent::KeyUp(key));
            }
            if let Some(key) = wanted {
                events.push(InputEvent::KeyDown(key));
            }
            self.held = wanted;
        }

        if self.frame % self.fire_interval as u64 == 0 {
            events.push(InputEvent::KeyDown(Key::Fire));
            events.push(InputEvent::KeyUp(Key::Fire));
        }

        events
    }
}

/// The alien in the lowest row closest to `ship_x`
fn nearest_low_alien(aliens: &[Alien], ship_x: f32) -> Option<&Alien> {
    let lowest = aliens.iter().map(|a| a.y).max()?;
    let distance = |a: &Alien| (a.rect().center().x - ship_x).abs();
    aliens
        .iter()
        .filter(|a| a.y == lowest)
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_from_menu() {
        let session = GameSession::with_seed(5);
        let mut pilot = Autopilot::default();
        assert_eq!(pilot.inputs(&session), vec![InputEvent::KeyDown(Key::Start)]);
    }

    #[test]
    fn test_moves_toward_fleet_and_fires() {
        let mut session = GameSession::with_seed(5);
        session.handle_input(InputEvent::KeyDown(Key::Start), 0);

        let mut pilot = Autopilot::new(1);
        let events = pilot.inputs(&session);
        // Nearest bottom-row alien is centred at x=620, ship at 600
        assert!(events.contains(&InputEvent::KeyDown(Key::Right)));
        assert!(events.contains(&InputEvent::KeyDown(Key::Fire)));

        // Holding the key does not repeat the key-down
        let events = pilot.inputs(&session);
        assert!(!events.contains(&InputEvent::KeyDown(Key::Right)));
    }
}
