//! Circle collision tests and hit resolution
//!
//! Bullets are resolved before the ship, both in ascending slot order.

use glam::Vec2;

use super::pool::SlotId;
use super::state::{GameEvent, GameObject, GameSession};
use crate::audio::Cue;
use crate::consts::{MAX_ASTEROIDS, MAX_BULLETS};
use crate::persistence::ScoreStore;

/// Strict overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

#[inline]
pub fn objects_overlap(a: &GameObject, b: &GameObject) -> bool {
    circles_overlap(a.position, a.radius, b.position, b.radius)
}

impl<S: ScoreStore> GameSession<S> {
    pub(crate) fn resolve_collisions(&mut self) {
        self.resolve_bullet_hits();
        self.resolve_ship_hits();
    }

    /// Each bullet destroys at most one asteroid, the lowest-indexed one it
    /// overlaps. Fragments land in free slots and can be hit by later
    /// bullets in the same pass.
    fn resolve_bullet_hits(&mut self) {
        for b in 0..MAX_BULLETS {
            let bullet = *self.bullets.get(SlotId(b));
            if !bullet.active {
                continue;
            }
            for a in 0..MAX_ASTEROIDS {
                let asteroid = *self.asteroids.get(SlotId(a));
                if !asteroid.active || !objects_overlap(&bullet, &asteroid) {
                    continue;
                }
                self.bullets.release(SlotId(b));
                self.asteroids.release(SlotId(a));
                self.audio.play(Cue::Explosion, self.now_ms);

                if let Some(size) = asteroid.asteroid_size() {
                    let points = size.points();
                    self.score = self.score.saturating_add(points);
                    self.events.push(GameEvent::AsteroidDestroyed { size, points });
                    if let Some(child) = size.split() {
                        self.spawn_fragment(child, asteroid.position, asteroid.velocity);
                        self.spawn_fragment(child, asteroid.position, asteroid.velocity);
                    }
                }
                break;
            }
        }
    }

    /// At most one ship hit per tick; none while invincible
    fn resolve_ship_hits(&mut self) {
        if !self.ship.active || self.is_invincible() {
            return;
        }
        for a in 0..MAX_ASTEROIDS {
            let asteroid = *self.asteroids.get(SlotId(a));
            if !asteroid.active || !objects_overlap(&self.ship, &asteroid) {
                continue;
            }
            self.lives = self.lives.saturating_sub(1);
            self.asteroids.release(SlotId(a));
            self.audio.play(Cue::Explosion, self.now_ms);
            self.events.push(GameEvent::ShipDestroyed {
                lives_left: self.lives,
            });

            if self.lives > 0 {
                self.respawn_ship(self.tuning.invincibility_ms);
            } else {
                self.ship.active = false;
                log::debug!("Last ship lost at score {}", self.score);
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 3.0, Vec2::new(3.9, 0.0), 1.0));
        // Exactly touching
        assert!(!circles_overlap(a, 3.0, Vec2::new(4.0, 0.0), 1.0));
    }

    #[test]
    fn test_overlap_diagonal() {
        // distance 5 (3-4-5) against radii 10 + 4
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(3.0, 4.0), 4.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(3.0, 4.0), 4.0));
    }
}
