//! Game phase state machine and per-run statistics

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Inputs to the phase state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    Pause,
    Resume,
    /// Leave the current or finished run and return to the menu
    Abandon,
    /// The ship was hit; `ships_left` is the count before the hit is applied
    ShipHit { ships_left: u32 },
}

/// The single transition function. Returns `None` when the event does not
/// apply in the current phase.
pub fn transition(phase: GamePhase, event: PhaseEvent) -> Option<GamePhase> {
    use GamePhase::*;
    use PhaseEvent::*;

    match (phase, event) {
        (Menu | GameOver, Start) => Some(Playing),
        (Playing, Pause) => Some(Paused),
        (Paused, Resume) => Some(Playing),
        (Playing | Paused | GameOver, Abandon) => Some(Menu),
        (Playing, ShipHit { ships_left }) if ships_left > 0 => Some(Playing),
        (Playing, ShipHit { .. }) => Some(GameOver),
        _ => None,
    }
}

/// Score, level and lives for the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub ships_left: u32,
}

impl GameStats {
    pub fn new(ship_limit: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            ships_left: ship_limit,
        }
    }

    pub fn reset(&mut self, ship_limit: u32) {
        *self = Self::new(ship_limit);
    }
}
