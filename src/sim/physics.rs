//! Per-tick motion and toroidal screen wrap

use super::state::{GameObject, GameSession};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::persistence::ScoreStore;

/// Wrap one axis. An object crosses only once it is fully off screen, and
/// re-enters fully off screen on the opposite side.
#[inline]
fn wrap_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if value < -radius {
        extent + radius
    } else if value > extent + radius {
        -radius
    } else {
        value
    }
}

pub fn wrap_position(object: &mut GameObject) {
    object.position.x = wrap_axis(object.position.x, object.radius, SCREEN_WIDTH);
    object.position.y = wrap_axis(object.position.y, object.radius, SCREEN_HEIGHT);
}

/// Ship: damp, move, wrap
pub fn integrate_ship(ship: &mut GameObject, friction: f32) {
    ship.velocity *= friction;
    ship.position += ship.velocity;
    wrap_position(ship);
}

/// Bullet: move, age, wrap. Deactivates when its lifetime runs out.
pub fn integrate_bullet(bullet: &mut GameObject) {
    bullet.position += bullet.velocity;
    bullet.ticks_remaining = bullet.ticks_remaining.saturating_sub(1);
    wrap_position(bullet);
    if bullet.ticks_remaining == 0 {
        bullet.active = false;
    }
}

/// Asteroid: constant drift, wrap
pub fn integrate_drift(asteroid: &mut GameObject) {
    asteroid.position += asteroid.velocity;
    wrap_position(asteroid);
}

impl<S: ScoreStore> GameSession<S> {
    /// Advance every active object one tick
    pub(crate) fn integrate(&mut self) {
        if self.ship.active {
            integrate_ship(&mut self.ship, self.tuning.friction);
        }
        for bullet in self.bullets.slots_mut().iter_mut().filter(|b| b.active) {
            integrate_bullet(bullet);
        }
        for asteroid in self.asteroids.slots_mut().iter_mut().filter(|a| a.active) {
            integrate_drift(asteroid);
        }
    }
}
