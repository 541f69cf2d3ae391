//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input events
//! - Monotonic time

use std::time::Instant;

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Space
    Fire,
    /// P
    Pause,
    /// Enter
    Start,
    Escape,
    /// Q
    Quit,
}

/// A discrete input event polled by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseClick(Vec2),
    /// Window closed
    Quit,
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that advances a fixed step per frame (deterministic headless runs)
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: u64,
    fps: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: 0,
            fps: fps.max(1) as u64,
        }
    }

    pub fn advance(&mut self) {
        self.frame += 1;
    }

    /// Jump forward by at least `ms` milliseconds
    pub fn skip_ms(&mut self, ms: u64) {
        self.frame += (ms * self.fps).div_ceil(1000);
    }
}

impl Clock for FrameClock {
    fn now_ms(&self) -> u64 {
        self.frame * 1000 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.now_ms(), 0);
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.now_ms(), 1000);
        clock.skip_ms(500);
        assert!(clock.now_ms() >= 1500);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
