//! Recorded input logs
//!
//! A run is fully determined by its tuning, seed and timestamped inputs, so a
//! saved log replays to the same session state.

use serde::{Deserialize, Serialize};

use super::state::GameSession;
use super::tick::TickInput;
use crate::persistence::ScoreStore;
use crate::tuning::Tuning;

/// Input for one tick and the time it was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub now_ms: u64,
    pub input: TickInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLog {
    pub seed: u64,
    pub tuning: Tuning,
    pub frames: Vec<RecordedFrame>,
}

impl InputLog {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            tuning,
            frames: Vec::new(),
        }
    }

    pub fn record(&mut self, input: TickInput, now_ms: u64) {
        self.frames.push(RecordedFrame { now_ms, input });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Run every recorded frame through a fresh session
    pub fn replay<S: ScoreStore>(&self, store: S) -> GameSession<S> {
        let mut session = GameSession::new(self.tuning.clone(), self.seed, store);
        for frame in &self.frames {
            session.update(&frame.input, frame.now_ms);
        }
        log::debug!("Replayed {} frames, score {}", self.frames.len(), session.score);
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::tuning::Variant;

    fn scripted(tuning: &Tuning, tick: u64) -> TickInput {
        let c = tuning.joystick_center;
        TickInput {
            axis_x: c + ((tick as i32 * 53) % 3000 - 1500),
            axis_y: if tick % 40 < 15 { c - 1800 } else { c + 900 },
            fire: tick % 6 < 2,
            hyperspace: tick % 333 == 100,
        }
    }

    #[test]
    fn test_json_log_replays_same_run() {
        for variant in [Variant::Extended, Variant::Classic] {
            let mut live = GameSession::new(variant.tuning(), 77, MemoryStore::default());
            let mut recording = InputLog::new(variant.tuning(), 77);
            for tick in 0..1_500u64 {
                let input = scripted(&live.tuning, tick);
                let now = tick * 16;
                recording.record(input, now);
                live.update(&input, now);
            }

            let json = recording.to_json().unwrap();
            let restored = InputLog::from_json(&json).unwrap();
            assert_eq!(restored, recording);
            assert_eq!(restored.len(), 1_500);

            let replayed = restored.replay(MemoryStore::default());
            assert_eq!(replayed.state(), live.state());
            assert_eq!(replayed.score, live.score);
            assert_eq!(replayed.lives, live.lives);
            assert_eq!(replayed.ship, live.ship);
            assert_eq!(replayed.asteroids.slots(), live.asteroids.slots());
            assert_eq!(replayed.bullets.slots(), live.bullets.slots());
        }
    }

    #[test]
    fn test_rejects_malformed_log() {
        assert!(InputLog::from_json(r#"{ "seed": 1, "frames": "nope" }"#).is_err());
    }
}
