//! Game balance and control tuning
//!
//! Two presets ship with the crate: the extended cabinet (analog steering,
//! hyperspace) and the classic cabinet (digital steering with reverse thrust).
//! Either can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ASTEROIDS;

/// Cabinet variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    #[default]
    Extended,
    Classic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Extended => "Extended",
            Variant::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "extended" | "ext" => Some(Variant::Extended),
            "classic" => Some(Variant::Classic),
            _ => None,
        }
    }

    /// Balance values for this preset
    pub fn tuning(&self) -> Tuning {
        match self {
            Variant::Extended => Tuning::extended(),
            Variant::Classic => Tuning::classic(),
        }
    }
}

/// How stick deflection maps to turning and thrust
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Turn rate and thrust scale with deflection past the dead zone.
    /// Pulling the stick back does nothing.
    Proportional,
    /// Full turn rate / thrust once past the dead zone. With `reverse_thrust`
    /// pulling back pushes against the heading.
    Digital { reverse_thrust: bool },
}

/// What to do with a fragment whose inherited speed came out too slow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlowFragment {
    /// Below `threshold * asteroid_speed_min`, draw a fresh random velocity
    Redraw { threshold: f32 },
    /// Keep the deviated heading, raise the speed to `asteroid_speed_min`
    ClampToMin,
}

/// Tuning file / value errors
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("tuning file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("tuning file malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning rejected: {0}")]
    Invalid(&'static str),
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub variant: Variant,

    // === Input ===
    /// ADC reading of a centred stick
    pub joystick_center: i32,
    /// Deflection ignored around the centre
    pub dead_zone: i32,
    /// Largest expected deflection from centre
    pub max_throw: i32,
    pub controls: ControlScheme,

    // === Ship ===
    /// Radians per tick at full deflection
    pub turn_speed: f32,
    /// Velocity added per tick at full deflection
    pub thrust: f32,
    /// Velocity multiplier applied every tick
    pub friction: f32,
    /// Invincibility after (re)spawn (ms)
    pub invincibility_ms: u64,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_lifetime_ticks: u32,
    /// Minimum gap between shots (ms)
    pub fire_debounce_ms: u64,

    // === Asteroids ===
    pub asteroid_speed_min: f32,
    pub asteroid_speed_max: f32,
    pub starting_asteroids: usize,
    /// Spawn clearance around the ship for the opening wave (× large radius)
    pub initial_clearance: f32,
    /// Spawn clearance for later waves (× large radius)
    pub wave_clearance: f32,
    /// Max heading change of a fragment from its parent (radians)
    pub fragment_deviation: f32,
    pub slow_fragment: SlowFragment,

    // === Hyperspace ===
    pub hyperspace_enabled: bool,
    pub hyperspace_cooldown_ms: u64,
    pub hyperspace_invincibility_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::extended()
    }
}

impl Tuning {
    /// Analog cabinet: proportional steering, hyperspace button
    pub fn extended() -> Self {
        Self {
            variant: Variant::Extended,

            joystick_center: 2048,
            dead_zone: 400,
            max_throw: 2047,
            controls: ControlScheme::Proportional,

            turn_speed: 0.12,
            thrust: 0.20,
            friction: 0.97,
            invincibility_ms: 2000,

            bullet_speed: 3.5,
            bullet_lifetime_ticks: 40,
            fire_debounce_ms: 150,

            asteroid_speed_min: 0.5,
            asteroid_speed_max: 1.5,
            starting_asteroids: 3,
            initial_clearance: 2.5,
            wave_clearance: 3.0,
            fragment_deviation: 0.25,
            slow_fragment: SlowFragment::Redraw { threshold: 1.0 },

            hyperspace_enabled: true,
            hyperspace_cooldown_ms: 5000,
            hyperspace_invincibility_ms: 750,
        }
    }

    /// Digital cabinet: fixed-rate steering, stick-back brakes, no hyperspace
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,

            joystick_center: 1800,
            dead_zone: 600,
            max_throw: 2047,
            controls: ControlScheme::Digital { reverse_thrust: true },

            turn_speed: 0.1,
            thrust: 0.15,
            friction: 0.98,
            invincibility_ms: 2000,

            bullet_speed: 3.0,
            bullet_lifetime_ticks: 40,
            fire_debounce_ms: 200,

            asteroid_speed_min: 0.5,
            asteroid_speed_max: 1.5,
            starting_asteroids: 1,
            initial_clearance: 2.5,
            wave_clearance: 2.5,
            fragment_deviation: 0.20,
            slow_fragment: SlowFragment::Redraw { threshold: 0.8 },

            hyperspace_enabled: false,
            hyperspace_cooldown_ms: 5000,
            hyperspace_invincibility_ms: 750,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(TuningError::Invalid("friction must be in (0, 1]"));
        }
        if self.dead_zone < 0 || self.dead_zone >= self.max_throw {
            return Err(TuningError::Invalid("dead_zone must be in [0, max_throw)"));
        }
        if !(self.asteroid_speed_min > 0.0 && self.asteroid_speed_min < self.asteroid_speed_max) {
            return Err(TuningError::Invalid("asteroid speeds must satisfy 0 < min < max"));
        }
        if self.starting_asteroids > MAX_ASTEROIDS {
            return Err(TuningError::Invalid("starting_asteroids exceeds the asteroid pool"));
        }
        if self.bullet_lifetime_ticks == 0 {
            return Err(TuningError::Invalid("bullet_lifetime_ticks must be non-zero"));
        }
        if self.fragment_deviation < 0.0 {
            return Err(TuningError::Invalid("fragment_deviation must be non-negative"));
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document. Missing fields take the
    /// extended defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load tuning from a JSON file
    pub fn try_load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning from a JSON file, falling back to `fallback` on any error
    pub fn load_or(path: &Path, fallback: Tuning) -> Self {
        match Self::try_load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using {} preset", fallback.variant.as_str());
                fallback
            }
        }
    }
}
