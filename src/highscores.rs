//! Best-score tracking
//!
//! A single persisted integer. Written only when a finished run beats it.

use crate::persistence::ScoreStore;

/// Store key for the best score
pub const HIGH_SCORE_KEY: &str = "highScore";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    /// Read the best score, 0 if the store has none. Negative values from a
    /// damaged store count as 0.
    pub fn load<S: ScoreStore + ?Sized>(store: &S) -> Self {
        let raw = store.load_int(HIGH_SCORE_KEY, 0);
        let best = u32::try_from(raw).unwrap_or(0);
        log::info!("Loaded high score {best}");
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Whether `score` would replace the best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true, and persists, only for a new best.
    pub fn submit<S: ScoreStore + ?Sized>(&mut self, score: u32, store: &mut S) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        store.store_int(HIGH_SCORE_KEY, i32::try_from(score).unwrap_or(i32::MAX));
        log::info!("New high score {score}");
        true
    }

    /// Zero the best score in memory and in the store
    pub fn reset<S: ScoreStore + ?Sized>(&mut self, store: &mut S) {
        self.best = 0;
        store.store_int(HIGH_SCORE_KEY, 0);
        log::info!("High score reset");
    }
}
