//! Fixed timestep simulation tick
//!
//! One call to `GameSession::update` per frame. Time is supplied by the
//! caller so the whole step is deterministic for a given seed and input log.

use serde::{Deserialize, Serialize};

use super::spawn::wave_size;
use super::state::{GameEvent, GameSession, GameState};
use crate::persistence::ScoreStore;
use crate::tuning::Tuning;

/// Raw controls sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Stick X reading (ADC counts)
    pub axis_x: i32,
    /// Stick Y reading; below centre is forward
    pub axis_y: i32,
    /// Fire button level (true = pressed)
    pub fire: bool,
    /// Hyperspace button level
    pub hyperspace: bool,
}

impl TickInput {
    /// Stick centred, buttons up
    pub fn at_rest(tuning: &Tuning) -> Self {
        Self {
            axis_x: tuning.joystick_center,
            axis_y: tuning.joystick_center,
            fire: false,
            hyperspace: false,
        }
    }

    pub fn with_fire(mut self, fire: bool) -> Self {
        self.fire = fire;
        self
    }

    pub fn with_hyperspace(mut self, hyperspace: bool) -> Self {
        self.hyperspace = hyperspace;
        self
    }
}

impl<S: ScoreStore> GameSession<S> {
    /// Advance the simulation by one tick at time `now_ms`
    pub fn update(&mut self, input: &TickInput, now_ms: u64) {
        self.now_ms = now_ms;
        self.events.clear();
        let fire_pressed = input.fire && !self.latches.fire;

        match self.state {
            GameState::Start => {
                if fire_pressed {
                    self.start_game();
                    return;
                }
            }
            GameState::Game => {
                self.handle_input(input);
                self.integrate();
                self.resolve_collisions();

                if self.lives == 0 && !self.ship.active {
                    self.end_game();
                    return;
                }
                if self.asteroids.is_empty() && self.lives > 0 {
                    self.next_wave();
                }
            }
            GameState::GameOver => {
                if fire_pressed {
                    self.state = GameState::Start;
                    self.latches.hold();
                    self.events.push(GameEvent::ReturnedToMenu);
                    return;
                }
            }
        }

        self.audio.update(now_ms);
        self.latches.fire = input.fire;
        self.latches.hyperspace = input.hyperspace;
    }

    fn start_game(&mut self) {
        self.reset();
        self.state = GameState::Game;
        self.events.push(GameEvent::Started);
        log::info!("Game started with {} asteroids", self.asteroids.active_count());
    }

    fn end_game(&mut self) {
        self.state = GameState::GameOver;
        let new_high_score = self.high_score.submit(self.score, &mut self.store);
        self.latches.hold();
        self.thrusting = false;
        self.audio.stop_all();
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
        log::info!("Game over, score {}", self.score);
    }

    /// Silence everything and spawn the next, possibly larger, wave. The
    /// host shows the "Wave Cleared" pause when it sees the event.
    fn next_wave(&mut self) {
        self.audio.stop_all();
        self.thrusting = false;
        let count = wave_size(self.score, self.tuning.starting_asteroids);
        let spawned = self.spawn_wave(count, self.tuning.wave_clearance);
        self.events.push(GameEvent::WaveCleared { spawned });
        log::info!("Wave cleared at score {}, spawning {spawned}", self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Channel, ToneOutput};
    use crate::consts::*;
    use crate::highscores::HIGH_SCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::sim::pool::SlotId;
    use crate::sim::state::{AsteroidSize, GameObject, screen_center};
    use glam::Vec2;

    fn session(tuning: Tuning) -> GameSession<MemoryStore> {
        GameSession::new(tuning, 42, MemoryStore::default())
    }

    /// Press fire on the title screen, then release it
    fn started(tuning: Tuning) -> GameSession<MemoryStore> {
        let mut s = session(tuning);
        let rest = TickInput::at_rest(&s.tuning);
        s.update(&rest.with_fire(true), 0);
        s.update(&rest, 16);
        s
    }

    /// Empty field with one parked asteroid so waves don't respawn
    fn parked(s: &mut GameSession<MemoryStore>) {
        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(
            AsteroidSize::Small,
            Vec2::new(5.0, 5.0),
            Vec2::ZERO,
        ));
    }

    #[test]
    fn test_start_transition() {
        let mut s = session(Tuning::extended());
        let rest = TickInput::at_rest(&s.tuning);
        s.update(&rest, 0);
        assert_eq!(s.state(), GameState::Start);

        s.update(&rest.with_fire(true), 10);
        assert_eq!(s.state(), GameState::Game);
        assert_eq!(s.asteroids.active_count(), 3);
        assert_eq!(s.lives, STARTING_LIVES);
        assert_eq!(s.events(), &[GameEvent::Started]);
        for (_, a) in s.asteroids.iter_active() {
            assert!(a.position.distance(screen_center()) >= 25.0);
            assert_eq!(a.size(), 10);
        }

        // Holding fire into the game does not shoot
        s.update(&rest.with_fire(true), 400);
        assert_eq!(s.bullets.active_count(), 0);
    }

    #[test]
    fn test_classic_starts_with_one_asteroid() {
        let s = started(Tuning::classic());
        assert_eq!(s.asteroids.active_count(), 1);
    }

    #[test]
    fn test_fire_debounce() {
        let mut s = started(Tuning::extended());
        parked(&mut s);
        let rest = TickInput::at_rest(&s.tuning);
        let fire = rest.with_fire(true);

        s.update(&fire, 1_000);
        assert_eq!(s.bullets.active_count(), 1);
        assert!(s.events().contains(&GameEvent::BulletFired));
        assert_eq!(s.audio().channel(), Channel::Timed { frequency: 2500, until_ms: 1_055 });

        s.update(&rest, 1_050);
        // Fresh edge but inside the 150 ms debounce
        s.update(&fire, 1_100);
        assert_eq!(s.bullets.active_count(), 1);

        s.update(&rest, 1_140);
        s.update(&fire, 1_151);
        assert_eq!(s.bullets.active_count(), 2);
    }

    #[test]
    fn test_bullet_spawn_geometry() {
        let mut s = started(Tuning::extended());
        parked(&mut s);
        s.ship.velocity = Vec2::new(0.5, 0.0);
        let rest = TickInput::at_rest(&s.tuning);
        s.update(&rest.with_fire(true), 1_000);

        let (_, bullet) = s.bullets.iter_active().next().unwrap();
        // Spawned at (64, 32 - 6) then moved one tick
        let velocity = Vec2::new(0.5, -3.5);
        assert!((bullet.velocity - velocity).length() < 1e-4);
        assert!((bullet.position - (Vec2::new(64.0, 26.0) + velocity)).length() < 1e-3);
        assert_eq!(bullet.ticks_remaining, 39);
    }

    #[test]
    fn test_full_bullet_pool_keeps_debounce_open() {
        let mut s = started(Tuning::extended());
        parked(&mut s);
        for _ in 0..MAX_BULLETS {
            s.bullets.spawn(GameObject::bullet(Vec2::new(100.0, 50.0), Vec2::ZERO, 1_000));
        }
        let rest = TickInput::at_rest(&s.tuning);
        s.update(&rest.with_fire(true), 1_000);
        assert_eq!(s.timers.last_fire_ms, None);
        assert!(!s.events().contains(&GameEvent::BulletFired));
    }

    #[test]
    fn test_large_asteroid_splits() {
        let mut s = started(Tuning::extended());
        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(
            AsteroidSize::Large,
            Vec2::new(100.0, 32.0),
            Vec2::new(1.0, 0.0),
        ));
        s.bullets.spawn(GameObject::bullet(Vec2::new(100.0, 32.0), Vec2::ZERO, 40));
        s.timers.invincibility_window_ms = 0;

        s.update(&TickInput::at_rest(&s.tuning), 1_000);
        assert_eq!(s.score, 20);
        assert_eq!(s.bullets.active_count(), 0);
        let children: Vec<_> = s.asteroids.iter_active().map(|(_, a)| *a).collect();
        assert_eq!(children.len(), 2);
        for child in children {
            assert_eq!(child.size(), 6);
            // Spawned at the parent's post-move position
            assert_eq!(child.position, Vec2::new(101.0, 32.0));
        }
        assert!(matches!(
            s.events()[0],
            GameEvent::AsteroidDestroyed { size: AsteroidSize::Large, points: 20 }
        ));
    }

    #[test]
    fn test_bullet_hits_lowest_slot_only() {
        let mut s = started(Tuning::extended());
        s.asteroids.clear();
        let here = Vec2::new(100.0, 20.0);
        s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Small, here, Vec2::ZERO));
        s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Small, here, Vec2::ZERO));
        s.bullets.spawn(GameObject::bullet(here, Vec2::ZERO, 40));

        s.update(&TickInput::at_rest(&s.tuning), 1_000);
        assert_eq!(s.score, 100);
        assert!(!s.asteroids.get(SlotId(0)).active);
        assert!(s.asteroids.get(SlotId(1)).active);
    }

    #[test]
    fn test_split_with_full_pool_drops_fragments() {
        let mut s = started(Tuning::extended());
        s.asteroids.clear();
        let target = Vec2::new(100.0, 50.0);
        s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Medium, target, Vec2::ZERO));
        for i in 1..MAX_ASTEROIDS {
            let far = Vec2::new(10.0 + i as f32, 5.0);
            s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Small, far, Vec2::ZERO));
        }
        s.bullets.spawn(GameObject::bullet(target, Vec2::ZERO, 40));

        s.update(&TickInput::at_rest(&s.tuning), 1_000);
        assert_eq!(s.score, 50);
        // Freed slot takes one fragment, the second is dropped
        assert_eq!(s.asteroids.active_count(), MAX_ASTEROIDS);
        assert_eq!(s.asteroids.get(SlotId(0)).size(), 3);
    }

    #[test]
    fn test_ship_hit_respawns() {
        let mut s = started(Tuning::extended());
        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(
            AsteroidSize::Large,
            Vec2::new(70.0, 32.0),
            Vec2::ZERO,
        ));
        s.asteroids.spawn(GameObject::asteroid(
            AsteroidSize::Small,
            Vec2::new(5.0, 5.0),
            Vec2::ZERO,
        ));
        s.ship.velocity = Vec2::new(0.3, 0.2);
        s.ship.heading = 1.0;

        s.update(&TickInput::at_rest(&s.tuning), 5_000);
        assert_eq!(s.lives, 2);
        assert_eq!(s.asteroids.active_count(), 1);
        assert_eq!(s.ship.position, screen_center());
        assert_eq!(s.ship.velocity, Vec2::ZERO);
        assert!(s.is_invincible());
        assert_eq!(s.invincibility_remaining_ms(), 2_000);
        assert!(s.events().contains(&GameEvent::ShipDestroyed { lives_left: 2 }));
    }

    #[test]
    fn test_invincible_ship_passes_through() {
        let mut s = started(Tuning::extended());
        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Large, screen_center(), Vec2::ZERO));
        // Started at t=0 with a 2000 ms window
        s.update(&TickInput::at_rest(&s.tuning), 1_999);
        assert_eq!(s.lives, 3);
        s.update(&TickInput::at_rest(&s.tuning), 2_000);
        assert_eq!(s.lives, 2);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut store = MemoryStore::default();
        store.store_int(HIGH_SCORE_KEY, 500);
        let mut s = GameSession::new(Tuning::extended(), 1, store);
        let rest = TickInput::at_rest(&s.tuning);
        s.update(&rest.with_fire(true), 0);

        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Large, screen_center(), Vec2::ZERO));
        s.asteroids.spawn(GameObject::asteroid(
            AsteroidSize::Large,
            Vec2::new(5.0, 5.0),
            Vec2::ZERO,
        ));
        s.lives = 1;
        s.score = 620;
        s.thrusting = true;

        s.update(&rest.with_fire(true), 10_000);
        assert_eq!(s.state(), GameState::GameOver);
        assert!(!s.ship.active);
        assert_eq!(s.high_score(), 620);
        assert_eq!(s.store().load_int(HIGH_SCORE_KEY, 0), 620);
        assert_eq!(s.audio().output(), ToneOutput::Silent);
        assert!(s.events().contains(&GameEvent::GameOver { score: 620, new_high_score: true }));

        // Fire still held from the fatal tick: no restart
        s.update(&rest.with_fire(true), 10_016);
        assert_eq!(s.state(), GameState::GameOver);
        s.update(&rest, 10_032);
        s.update(&rest.with_fire(true), 10_048);
        assert_eq!(s.state(), GameState::Start);
        assert_eq!(s.events(), &[GameEvent::ReturnedToMenu]);
    }

    #[test]
    fn test_lower_score_leaves_high_score() {
        let mut store = MemoryStore::default();
        store.store_int(HIGH_SCORE_KEY, 900);
        let mut s = GameSession::new(Tuning::extended(), 1, store);
        let rest = TickInput::at_rest(&s.tuning);
        s.update(&rest.with_fire(true), 0);
        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(AsteroidSize::Large, screen_center(), Vec2::ZERO));
        s.lives = 1;
        s.score = 300;

        s.update(&rest, 10_000);
        assert_eq!(s.state(), GameState::GameOver);
        assert_eq!(s.high_score(), 900);
        assert_eq!(s.store().writes(), 1);
    }

    #[test]
    fn test_wave_cleared_spawns_bigger_wave() {
        let mut s = started(Tuning::extended());
        s.asteroids.clear();
        s.asteroids.spawn(GameObject::asteroid(
            AsteroidSize::Small,
            Vec2::new(100.0, 50.0),
            Vec2::ZERO,
        ));
        s.bullets.spawn(GameObject::bullet(Vec2::new(100.0, 50.0), Vec2::ZERO, 40));
        s.score = 1_150;

        s.update(&TickInput::at_rest(&s.tuning), 3_000);
        // 3 + 1250 / 500
        assert_eq!(s.asteroids.active_count(), 5);
        assert!(s.events().contains(&GameEvent::WaveCleared { spawned: 5 }));
        for (_, a) in s.asteroids.iter_active() {
            assert!(a.position.distance(s.ship.position) >= 30.0);
        }
    }

    #[test]
    fn test_hyperspace_cooldown() {
        let mut s = started(Tuning::extended());
        parked(&mut s);
        let rest = TickInput::at_rest(&s.tuning);
        let jump = rest.with_hyperspace(true);
        s.ship.velocity = Vec2::new(1.0, 1.0);

        s.update(&jump, 100);
        assert!(s.events().contains(&GameEvent::Hyperspace));
        assert_eq!(s.ship.velocity, Vec2::ZERO);
        assert!(s.ship.position.x >= 8.0 && s.ship.position.x <= 120.0);
        assert!(s.ship.position.y >= 8.0 && s.ship.position.y <= 56.0);
        assert_eq!(s.invincibility_remaining_ms(), 750);
        assert_eq!(s.audio().channel(), Channel::Timed { frequency: 4000, until_ms: 405 });

        s.update(&rest, 200);
        s.update(&jump, 5_100);
        assert!(!s.events().contains(&GameEvent::Hyperspace));
        s.update(&rest, 5_101);
        s.update(&jump, 5_101 + 1);
        assert!(s.events().contains(&GameEvent::Hyperspace));
    }

    #[test]
    fn test_hyperspace_disabled_on_classic() {
        let mut s = started(Tuning::classic());
        parked(&mut s);
        let jump = TickInput::at_rest(&s.tuning).with_hyperspace(true);
        s.update(&jump, 100);
        assert!(s.events().is_empty());
    }

    #[test]
    fn test_thrust_tone_follows_stick() {
        let mut s = started(Tuning::extended());
        parked(&mut s);
        let rest = TickInput::at_rest(&s.tuning);
        let forward = TickInput {
            axis_y: s.tuning.joystick_center - 2047,
            ..rest
        };

        s.update(&forward, 100);
        assert!(s.thrusting);
        assert_eq!(s.audio().output(), ToneOutput::Tone(250));
        assert!(s.ship.velocity.y < 0.0);

        s.update(&rest, 116);
        assert!(!s.thrusting);
        assert_eq!(s.audio().output(), ToneOutput::Silent);
    }

    #[test]
    fn test_classic_reverse_thrust() {
        let mut s = started(Tuning::classic());
        parked(&mut s);
        let back = TickInput {
            axis_y: s.tuning.joystick_center + 700,
            ..TickInput::at_rest(&s.tuning)
        };
        s.update(&back, 100);
        assert!(!s.thrusting);
        // Heading is up, reverse pushes down
        assert!(s.ship.velocity.y > 0.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut s = session(Tuning::extended());
            let c = s.tuning.joystick_center;
            for tick in 0..600u64 {
                let input = TickInput {
                    axis_x: c + ((tick as i32 * 37) % 4000 - 2000),
                    axis_y: c - 1500,
                    fire: tick % 4 < 2,
                    hyperspace: tick % 97 == 0,
                };
                s.update(&input, tick * 16);
            }
            (s.score, s.lives, s.ship.position, s.state())
        };
        assert_eq!(run(), run());
    }
}
