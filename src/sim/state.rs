//! Game state and core simulation types
//!
//! One `GameObject` record serves ship, bullets and asteroids; the `kind`
//! discriminant says which.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::pool::Pool;
use crate::audio::AudioSequencer;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::tuning::Tuning;
use crate::wrap_heading;

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Title screen, waiting for fire
    Start,
    /// Active gameplay
    Game,
    /// Run ended, waiting for fire
    GameOver,
}

/// Asteroid size classes. The class value doubles as the collision radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub const fn class(self) -> u8 {
        match self {
            AsteroidSize::Large => 10,
            AsteroidSize::Medium => 6,
            AsteroidSize::Small => 3,
        }
    }

    pub fn radius(self) -> f32 {
        self.class() as f32
    }

    pub const fn points(self) -> u32 {
        match self {
            AsteroidSize::Large => SCORE_LARGE,
            AsteroidSize::Medium => SCORE_MEDIUM,
            AsteroidSize::Small => SCORE_SMALL,
        }
    }

    /// Size of the two fragments this asteroid breaks into
    pub const fn split(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// What a `GameObject` slot represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Ship,
    Bullet,
    Asteroid(AsteroidSize),
}

/// Ship, bullet or asteroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObject {
    pub kind: ObjectKind,
    pub position: Vec2,
    /// Displacement per tick
    pub velocity: Vec2,
    /// Radians in [0, 2π); ship only
    pub heading: f32,
    pub radius: f32,
    /// Slot occupancy; other fields are stale when false
    pub active: bool,
    /// Bullet lifetime in ticks
    pub ticks_remaining: u32,
}

impl Default for GameObject {
    fn default() -> Self {
        Self::INACTIVE
    }
}

impl GameObject {
    /// A free pool slot
    pub const INACTIVE: Self = Self {
        kind: ObjectKind::Bullet,
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        heading: 0.0,
        radius: 0.0,
        active: false,
        ticks_remaining: 0,
    };

    /// Ship at rest at `position`, nose up
    pub fn ship(position: Vec2) -> Self {
        Self {
            kind: ObjectKind::Ship,
            position,
            velocity: Vec2::ZERO,
            heading: ship_spawn_heading(),
            radius: SHIP_COLLISION_RADIUS,
            active: true,
            ticks_remaining: 0,
        }
    }

    pub fn bullet(position: Vec2, velocity: Vec2, lifetime_ticks: u32) -> Self {
        Self {
            kind: ObjectKind::Bullet,
            position,
            velocity,
            heading: 0.0,
            radius: BULLET_COLLISION_RADIUS,
            active: true,
            ticks_remaining: lifetime_ticks,
        }
    }

    pub fn asteroid(size: AsteroidSize, position: Vec2, velocity: Vec2) -> Self {
        Self {
            kind: ObjectKind::Asteroid(size),
            position,
            velocity,
            heading: 0.0,
            radius: size.radius(),
            active: true,
            ticks_remaining: 0,
        }
    }

    pub fn asteroid_size(&self) -> Option<AsteroidSize> {
        match self.kind {
            ObjectKind::Asteroid(size) => Some(size),
            _ => None,
        }
    }

    /// Size class (10/6/3) for asteroids, 0 otherwise
    pub fn size(&self) -> u8 {
        self.asteroid_size().map_or(0, AsteroidSize::class)
    }
}

/// Screen centre, where the ship (re)spawns
pub fn screen_center() -> Vec2 {
    Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0)
}

/// -90° (nose toward the top of the screen), normalized
pub fn ship_spawn_heading() -> f32 {
    wrap_heading(-std::f32::consts::FRAC_PI_2)
}

/// Millisecond timestamps driving the ship and fire gates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub last_fire_ms: Option<u64>,
    /// Start of the current invincibility window
    pub ship_spawn_ms: u64,
    pub invincibility_window_ms: u64,
    pub last_hyperspace_ms: Option<u64>,
}

/// Previous-tick button levels for rising-edge detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLatches {
    pub fire: bool,
    pub hyperspace: bool,
}

impl ButtonLatches {
    /// Treat both buttons as held so a press carried into the next state
    /// does not act again
    pub fn hold(&mut self) {
        self.fire = true;
        self.hyperspace = true;
    }
}

/// Things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    BulletFired,
    AsteroidDestroyed { size: AsteroidSize, points: u32 },
    ShipDestroyed { lives_left: u8 },
    Hyperspace,
    WaveCleared { spawned: usize },
    GameOver { score: u32, new_high_score: bool },
    ReturnedToMenu,
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameSession<S: ScoreStore> {
    pub tuning: Tuning,
    pub state: GameState,
    pub ship: GameObject,
    pub bullets: Pool<MAX_BULLETS>,
    pub asteroids: Pool<MAX_ASTEROIDS>,
    pub score: u32,
    pub lives: u8,
    pub timers: Timers,
    pub latches: ButtonLatches,
    /// Thrust intent seen last tick (drives the flame and the thrust tone)
    pub thrusting: bool,
    pub(crate) high_score: HighScore,
    pub(crate) store: S,
    pub(crate) rng: Pcg32,
    pub(crate) audio: AudioSequencer,
    /// Time sampled at the top of the current tick
    pub(crate) now_ms: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl<S: ScoreStore> GameSession<S> {
    /// Create a session on the title screen, loading the high score from `store`.
    /// Tuning that fails validation is replaced by its variant's preset.
    pub fn new(tuning: Tuning, seed: u64, store: S) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("{e}; using {} preset", tuning.variant.as_str());
                tuning.variant.tuning()
            }
        };
        let high_score = HighScore::load(&store);
        log::info!(
            "Session ready ({} tuning, seed {seed}, high score {})",
            tuning.variant.as_str(),
            high_score.best()
        );
        Self {
            tuning,
            state: GameState::Start,
            ship: GameObject::ship(screen_center()),
            bullets: Pool::new(),
            asteroids: Pool::new(),
            score: 0,
            lives: STARTING_LIVES,
            timers: Timers::default(),
            latches: ButtonLatches::default(),
            thrusting: false,
            high_score,
            store,
            rng: Pcg32::seed_from_u64(seed),
            audio: AudioSequencer::new(),
            now_ms: 0,
            events: Vec::with_capacity(16),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &AudioSequencer {
        &self.audio
    }

    /// Events recorded by the last `update`
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Invincibility left at the current tick time, floored at 0
    pub fn invincibility_remaining_ms(&self) -> u64 {
        let elapsed = self.now_ms.saturating_sub(self.timers.ship_spawn_ms);
        self.timers.invincibility_window_ms.saturating_sub(elapsed)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining_ms() > 0
    }

    /// Zero the stored high score
    pub fn reset_high_score(&mut self) {
        self.high_score.reset(&mut self.store);
    }

    /// Fresh run: empty pools, full lives, centred ship, opening wave
    pub(crate) fn reset(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.bullets.clear();
        self.asteroids.clear();
        self.respawn_ship(self.tuning.invincibility_ms);
        self.timers.last_fire_ms = None;
        self.timers.last_hyperspace_ms = None;
        self.latches.hold();
        self.thrusting = false;
        self.audio.stop_all();

        let count = self.tuning.starting_asteroids;
        let clearance = self.tuning.initial_clearance;
        self.spawn_wave(count, clearance);
    }

    /// Put the ship back at the centre with a new invincibility window
    pub(crate) fn respawn_ship(&mut self, window_ms: u64) {
        self.ship = GameObject::ship(screen_center());
        self.grant_invincibility(window_ms);
    }

    pub(crate) fn grant_invincibility(&mut self, window_ms: u64) {
        self.timers.ship_spawn_ms = self.now_ms;
        self.timers.invincibility_window_ms = window_ms;
    }
}
