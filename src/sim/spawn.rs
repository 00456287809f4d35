//! Asteroid spawning: fresh velocities, fragments and wave placement

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::pool::SlotId;
use super::state::{AsteroidSize, GameObject, GameSession};
use crate::consts::*;
use crate::heading_vector;
use crate::persistence::ScoreStore;
use crate::tuning::{SlowFragment, Tuning};

/// Rejection-sampling attempts before falling back to the far corner
const MAX_PLACEMENT_ATTEMPTS: usize = 256;

/// Random heading, speed uniform in [min, max)
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Vec2 {
    let speed = rng.random_range(tuning.asteroid_speed_min..tuning.asteroid_speed_max);
    let angle = rng.random_range(0.0..TAU);
    heading_vector(angle) * speed
}

/// Velocity for one fragment of a parent moving at `parent_velocity`:
/// parent speed scaled by [0.8, 1.2), heading bent by up to the tuned
/// deviation either way.
pub fn fragment_velocity<R: Rng + ?Sized>(
    rng: &mut R,
    tuning: &Tuning,
    parent_velocity: Vec2,
) -> Vec2 {
    if parent_velocity == Vec2::ZERO {
        return random_velocity(rng, tuning);
    }

    let parent_speed = parent_velocity.length();
    let parent_angle = parent_velocity.y.atan2(parent_velocity.x);
    let speed = parent_speed * rng.random_range(0.8..1.2);
    let deviation = tuning.fragment_deviation;
    let angle = if deviation > 0.0 {
        parent_angle + rng.random_range(-deviation..=deviation)
    } else {
        parent_angle
    };

    match tuning.slow_fragment {
        SlowFragment::ClampToMin => heading_vector(angle) * speed.max(tuning.asteroid_speed_min),
        SlowFragment::Redraw { threshold } => {
            if speed < tuning.asteroid_speed_min * threshold {
                random_velocity(rng, tuning)
            } else {
                heading_vector(angle) * speed
            }
        }
    }
}

/// Number of large asteroids in the wave that follows a clear at `score`
pub fn wave_size(score: u32, starting: usize) -> usize {
    let extra = (score / SCORE_PER_EXTRA_ASTEROID) as usize;
    starting.saturating_add(extra).min(MAX_ASTEROIDS)
}

/// Screen corner farthest from `avoid`
fn farthest_corner(avoid: Vec2) -> Vec2 {
    [
        Vec2::ZERO,
        Vec2::new(SCREEN_WIDTH, 0.0),
        Vec2::new(0.0, SCREEN_HEIGHT),
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
    ]
    .into_iter()
    .fold(Vec2::ZERO, |best, corner| {
        if corner.distance_squared(avoid) > best.distance_squared(avoid) {
            corner
        } else {
            best
        }
    })
}

/// Uniform point on screen at least `clearance` from `avoid`
pub fn clear_spawn_point<R: Rng + ?Sized>(rng: &mut R, avoid: Vec2, clearance: f32) -> Vec2 {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random_range(0.0..SCREEN_WIDTH),
            rng.random_range(0.0..SCREEN_HEIGHT),
        );
        if candidate.distance(avoid) >= clearance {
            return candidate;
        }
    }
    log::debug!("No clear spawn point after {MAX_PLACEMENT_ATTEMPTS} tries, using far corner");
    farthest_corner(avoid)
}

impl<S: ScoreStore> GameSession<S> {
    /// Claim an asteroid slot. Full pool drops the request.
    pub(crate) fn spawn_asteroid(
        &mut self,
        size: AsteroidSize,
        position: Vec2,
        velocity: Vec2,
    ) -> Option<SlotId> {
        let slot = self
            .asteroids
            .spawn(GameObject::asteroid(size, position, velocity));
        if slot.is_none() {
            log::trace!("Asteroid pool full, dropped {size:?} spawn");
        }
        slot
    }

    /// One fragment at the parent's position
    pub(crate) fn spawn_fragment(
        &mut self,
        size: AsteroidSize,
        position: Vec2,
        parent_velocity: Vec2,
    ) {
        let velocity = fragment_velocity(&mut self.rng, &self.tuning, parent_velocity);
        self.spawn_asteroid(size, position, velocity);
    }

    /// Spawn `count` large asteroids at least `clearance_factor` large radii
    /// from the ship. Returns how many were placed.
    pub(crate) fn spawn_wave(&mut self, count: usize, clearance_factor: f32) -> usize {
        let clearance = clearance_factor * AsteroidSize::Large.radius();
        let avoid = self.ship.position;
        let mut spawned = 0;
        for _ in 0..count {
            let position = clear_spawn_point(&mut self.rng, avoid, clearance);
            let velocity = random_velocity(&mut self.rng, &self.tuning);
            if self
                .spawn_asteroid(AsteroidSize::Large, position, velocity)
                .is_some()
            {
                spawned += 1;
            }
        }
        spawned
    }
}
