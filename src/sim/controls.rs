//! Stick and button handling for the ship

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameObject, GameSession};
use crate::audio::Cue;
use crate::consts::*;
use crate::persistence::ScoreStore;
use crate::tuning::{ControlScheme, Tuning};
use crate::{heading_vector, wrap_heading};

/// Fraction of usable throw past the dead zone, in [0, 1]
pub fn deflection_scale(delta: i32, dead_zone: i32, max_throw: i32) -> f32 {
    let magnitude = delta.unsigned_abs() as f32;
    let dead_zone = dead_zone as f32;
    let usable = (max_throw as f32 - dead_zone).max(1.0);
    ((magnitude - dead_zone) / usable).clamp(0.0, 1.0)
}

/// Ship response to one stick sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    /// Signed heading change (radians)
    pub turn: f32,
    /// Signed multiple of the tuned thrust; negative pushes against the heading
    pub thrust: f32,
    /// Forward thrust requested this tick
    pub thrusting: bool,
    /// Thrust strength for the engine tone, in [0, 1]
    pub intensity: f32,
}

/// Map raw stick readings to turn and thrust. Y below centre is forward.
pub fn steer(tuning: &Tuning, axis_x: i32, axis_y: i32) -> Steering {
    let dx = axis_x - tuning.joystick_center;
    let dy = axis_y - tuning.joystick_center;
    let dead_zone = tuning.dead_zone;

    match tuning.controls {
        ControlScheme::Proportional => {
            let mut steering = Steering::default();
            if dx.abs() > dead_zone {
                let scale = deflection_scale(dx, dead_zone, tuning.max_throw);
                steering.turn = dx.signum() as f32 * tuning.turn_speed * scale;
            }
            if dy < -dead_zone {
                let scale = deflection_scale(dy, dead_zone, tuning.max_throw);
                steering.thrust = scale;
                steering.thrusting = true;
                steering.intensity = scale;
            }
            steering
        }
        ControlScheme::Digital { reverse_thrust } => {
            let turn = if dx < -dead_zone {
                -tuning.turn_speed
            } else if dx > dead_zone {
                tuning.turn_speed
            } else {
                0.0
            };
            let (thrust, thrusting) = if dy < -dead_zone {
                (1.0, true)
            } else if reverse_thrust && dy > dead_zone {
                (-1.0, false)
            } else {
                (0.0, false)
            };
            Steering {
                turn,
                thrust,
                thrusting,
                intensity: if thrusting { 1.0 } else { 0.0 },
            }
        }
    }
}

impl<S: ScoreStore> GameSession<S> {
    /// Apply the tick's input to the ship: steer, thrust, fire, hyperspace
    pub(crate) fn handle_input(&mut self, input: &super::TickInput) {
        if !self.ship.active {
            if self.thrusting {
                self.audio.stop_thrust();
                self.thrusting = false;
            }
            return;
        }

        let steering = steer(&self.tuning, input.axis_x, input.axis_y);
        self.ship.heading = wrap_heading(self.ship.heading + steering.turn);
        if steering.thrust != 0.0 {
            self.ship.velocity +=
                heading_vector(self.ship.heading) * self.tuning.thrust * steering.thrust;
        }

        if steering.thrusting && !self.thrusting {
            self.audio.start_thrust(steering.intensity, self.now_ms);
        } else if !steering.thrusting && self.thrusting {
            self.audio.stop_thrust();
        }
        self.thrusting = steering.thrusting;

        if input.fire && !self.latches.fire && self.fire_ready() {
            self.fire_bullet();
        }

        if self.tuning.hyperspace_enabled
            && input.hyperspace
            && !self.latches.hyperspace
            && self.hyperspace_ready()
        {
            self.hyperspace_jump();
        }
    }

    /// Debounce elapsed since the last shot
    pub fn fire_ready(&self) -> bool {
        self.timers
            .last_fire_ms
            .is_none_or(|last| self.now_ms.saturating_sub(last) > self.tuning.fire_debounce_ms)
    }

    pub fn hyperspace_ready(&self) -> bool {
        self.timers.last_hyperspace_ms.is_none_or(|last| {
            self.now_ms.saturating_sub(last) > self.tuning.hyperspace_cooldown_ms
        })
    }

    /// Launch a bullet from the nose. The debounce timer only restarts when
    /// a slot was free.
    fn fire_bullet(&mut self) {
        let direction = heading_vector(self.ship.heading);
        let position = self.ship.position + direction * (self.ship.radius + BULLET_NOSE_OFFSET);
        let velocity = direction * self.tuning.bullet_speed + self.ship.velocity;
        let bullet = GameObject::bullet(position, velocity, self.tuning.bullet_lifetime_ticks);

        if self.bullets.spawn(bullet).is_some() {
            self.timers.last_fire_ms = Some(self.now_ms);
            self.audio.play(Cue::Shoot, self.now_ms);
            self.events.push(GameEvent::BulletFired);
        } else {
            log::trace!("Bullet pool full, shot dropped");
        }
    }

    /// Teleport away from the edges, stop dead, short invincibility
    fn hyperspace_jump(&mut self) {
        let margin = 2.0 * self.ship.radius;
        self.ship.position = Vec2::new(
            self.rng.random_range(margin..SCREEN_WIDTH - margin),
            self.rng.random_range(margin..SCREEN_HEIGHT - margin),
        );
        self.ship.velocity = Vec2::ZERO;
        self.grant_invincibility(self.tuning.hyperspace_invincibility_ms);
        self.timers.last_hyperspace_ms = Some(self.now_ms);

        self.audio.play(Cue::Hyperspace, self.now_ms);
        if self.thrusting {
            self.audio.stop_thrust();
            self.thrusting = false;
        }
        self.events.push(GameEvent::Hyperspace);
        log::debug!("Hyperspace to ({:.1}, {:.1})", self.ship.position.x, self.ship.position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflection_scale() {
        assert_eq!(deflection_scale(300, 400, 2047), 0.0);
        assert_eq!(deflection_scale(-2047, 400, 2047), 1.0);
        assert_eq!(deflection_scale(5000, 400, 2047), 1.0);
        let half = deflection_scale(400 + 1647 / 2, 400, 2047);
        assert!((half - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_proportional_steering() {
        let tuning = Tuning::extended();
        let c = tuning.joystick_center;

        let rest = steer(&tuning, c, c);
        assert_eq!(rest, Steering::default());

        let full_left = steer(&tuning, c - 2047, c);
        assert!((full_left.turn + tuning.turn_speed).abs() < 1e-6);

        // Pulling back does nothing on the analog cabinet
        let back = steer(&tuning, c, c + 2000);
        assert_eq!(back.thrust, 0.0);
        assert!(!back.thrusting);

        let forward = steer(&tuning, c, c - 2047);
        assert!(forward.thrusting);
        assert_eq!(forward.thrust, 1.0);
    }

    #[test]
    fn test_digital_steering() {
        let tuning = Tuning::classic();
        let c = tuning.joystick_center;

        let right = steer(&tuning, c + 601, c);
        assert_eq!(right.turn, tuning.turn_speed);

        let edge = steer(&tuning, c + 600, c);
        assert_eq!(edge.turn, 0.0);

        let forward = steer(&tuning, c, c - 700);
        assert!(forward.thrusting);
        assert_eq!(forward.thrust, 1.0);

        let reverse = steer(&tuning, c, c + 700);
        assert!(!reverse.thrusting);
        assert_eq!(reverse.thrust, -1.0);
    }
}
