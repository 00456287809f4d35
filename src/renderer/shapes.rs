//! Outline geometry for the wireframe sprites

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::consts::{SCREEN_HEIGHT, SHIP_COLLISION_RADIUS};
use crate::rotate_point;
use crate::sim::GameObject;

/// Vertex count of the largest asteroid outline (5 + 10 / 3)
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Life icons along the bottom edge: spacing and baseline offset
pub const LIFE_ICON_SPACING: f32 = 9.0;
pub const LIFE_ICON_INSET: f32 = 6.0;

/// Closed outline with a fixed upper bound on vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    points: [Vec2; MAX_POLYGON_VERTICES],
    len: usize,
}

impl Polygon {
    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.len]
    }

    /// Consecutive vertex pairs, closing back to the first
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let pts = self.points();
        (0..pts.len()).map(move |i| (pts[i], pts[(i + 1) % pts.len()]))
    }
}

/// Rotate local points by `heading` and move them to `origin`
fn place<const N: usize>(local: [Vec2; N], origin: Vec2, heading: f32) -> [Vec2; N] {
    local.map(|p| origin + rotate_point(p, heading))
}

/// Hull triangle: nose, back-left, back-right
pub fn ship_hull(ship: &GameObject) -> [Vec2; 3] {
    let r = ship.radius;
    place(
        [
            Vec2::new(r + 2.0, 0.0),
            Vec2::new(-r, -r + 1.0),
            Vec2::new(-r, r - 1.0),
        ],
        ship.position,
        ship.heading,
    )
}

/// Exhaust triangle behind the hull
pub fn thrust_flame(ship: &GameObject) -> [Vec2; 3] {
    let r = ship.radius;
    place(
        [
            Vec2::new(-r, -r / 2.0),
            Vec2::new(-r - 3.0, 0.0),
            Vec2::new(-r, r / 2.0),
        ],
        ship.position,
        ship.heading,
    )
}

/// Lumpy outline: `5 + size / 3` evenly spaced spokes, each with a random
/// length of 70-130% of the radius. Re-rolled every frame.
pub fn asteroid_outline<R: Rng + ?Sized>(asteroid: &GameObject, rng: &mut R) -> Polygon {
    let len = (5 + asteroid.size() as usize / 3).min(MAX_POLYGON_VERTICES);
    let step = TAU / len as f32;
    let mut points = [Vec2::ZERO; MAX_POLYGON_VERTICES];
    for (i, point) in points.iter_mut().take(len).enumerate() {
        let jitter = rng.random_range(70..=130) as f32 / 100.0;
        let angle = i as f32 * step;
        *point = asteroid.position + Vec2::new(angle.cos(), angle.sin()) * asteroid.radius * jitter;
    }
    Polygon { points, len }
}

/// Remaining-life marker `index` (0-based), nose up
pub fn life_icon(index: u8) -> [Vec2; 3] {
    let x = 2.0 + index as f32 * LIFE_ICON_SPACING;
    let y = SCREEN_HEIGHT - LIFE_ICON_INSET;
    let half = SHIP_COLLISION_RADIUS - 1.0;
    [
        Vec2::new(x, y - half),
        Vec2::new(x - half, y + 2.0),
        Vec2::new(x + half, y + 2.0),
    ]
}
