//! Read-only view of a session for presentation

use super::state::{GameObject, GameSession, GameState};
use crate::consts::BLINK_PERIOD_MS;
use crate::persistence::ScoreStore;

#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub ship: &'a GameObject,
    pub ship_invincible: bool,
    pub thrusting: bool,
    pub bullets: &'a [GameObject],
    pub asteroids: &'a [GameObject],
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub now_ms: u64,
}

impl Snapshot<'_> {
    pub fn active_bullets(&self) -> impl Iterator<Item = &GameObject> {
        self.bullets.iter().filter(|b| b.active)
    }

    pub fn active_asteroids(&self) -> impl Iterator<Item = &GameObject> {
        self.asteroids.iter().filter(|a| a.active)
    }

    /// Whether the ship is drawn this frame. An invincible ship blinks.
    pub fn ship_visible(&self) -> bool {
        if !self.ship.active {
            return false;
        }
        !(self.ship_invincible && (self.now_ms / BLINK_PERIOD_MS) % 2 == 1)
    }
}

impl<S: ScoreStore> GameSession<S> {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            ship: &self.ship,
            ship_invincible: self.is_invincible(),
            thrusting: self.thrusting,
            bullets: self.bullets.slots(),
            asteroids: self.asteroids.slots(),
            score: self.score,
            high_score: self.high_score(),
            lives: self.lives,
            now_ms: self.now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::tuning::Tuning;

    #[test]
    fn test_invincible_ship_blinks() {
        let mut session = GameSession::new(Tuning::default(), 3, MemoryStore::default());
        session.grant_invincibility(2_000);

        session.now_ms = 100;
        assert!(session.snapshot().ship_visible());
        session.now_ms = 250;
        assert!(!session.snapshot().ship_visible());
        session.now_ms = 2_200;
        assert!(session.snapshot().ship_visible());
    }
}
