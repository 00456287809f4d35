//! Presentation for a 1-bit display
//!
//! The simulation hands out a `Snapshot`; the `Presenter` turns it into
//! pixel, line and text calls on any `DrawSurface`.

pub mod framebuffer;
pub mod shapes;

pub use framebuffer::{FrameBuffer, TextRun};
pub use shapes::{Polygon, asteroid_outline, life_icon, ship_hull, thrust_flame};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{GameState, Snapshot};

/// Width of one glyph cell of the built-in 5x7 font at text size 1
pub const GLYPH_WIDTH: i32 = 6;
/// Height of one glyph cell at text size 1
pub const GLYPH_HEIGHT: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    Black,
    #[default]
    White,
}

/// Graphics primitives of a small monochrome display driver
pub trait DrawSurface {
    fn clear(&mut self);
    /// Push the finished frame to the panel
    fn present(&mut self);
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);
    fn set_cursor(&mut self, x: i32, y: i32);
    fn set_text_size(&mut self, size: u8);
    fn set_text_color(&mut self, color: Color);
    /// Print at the cursor and advance it
    fn print(&mut self, text: &str);

    fn draw_triangle(&mut self, a: (i32, i32), b: (i32, i32), c: (i32, i32), color: Color) {
        self.draw_line(a.0, a.1, b.0, b.1, color);
        self.draw_line(b.0, b.1, c.0, c.1, color);
        self.draw_line(c.0, c.1, a.0, a.1, color);
    }
}

/// Pixel width of `text` at `size`
pub fn text_width(text: &str, size: u8) -> i32 {
    text.chars().count() as i32 * GLYPH_WIDTH * size as i32
}

#[inline]
fn to_pixel(p: Vec2) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn draw_outline(surface: &mut impl DrawSurface, [a, b, c]: [Vec2; 3]) {
    surface.draw_triangle(to_pixel(a), to_pixel(b), to_pixel(c), Color::White);
}

fn print_at(surface: &mut impl DrawSurface, x: i32, y: i32, size: u8, text: &str) {
    surface.set_text_size(size);
    surface.set_cursor(x, y);
    surface.print(text);
}

/// Draws snapshots. Owns its own RNG so outline jitter never disturbs the
/// simulation's random sequence.
#[derive(Debug, Clone)]
pub struct Presenter {
    rng: Pcg32,
}

impl Presenter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw one full frame
    pub fn draw(&mut self, surface: &mut impl DrawSurface, snapshot: &Snapshot) {
        surface.clear();
        surface.set_text_color(Color::White);
        match snapshot.state {
            GameState::Start => self.draw_title(surface),
            GameState::Game => {
                if snapshot.ship_visible() {
                    self.draw_ship(surface, snapshot);
                }
                self.draw_asteroids(surface, snapshot);
                self.draw_bullets(surface, snapshot);
                self.draw_hud(surface, snapshot);
            }
            GameState::GameOver => self.draw_game_over(surface, snapshot),
        }
        surface.present();
    }

    /// Interstitial shown while the host stalls between waves
    pub fn draw_wave_cleared(&mut self, surface: &mut impl DrawSurface) {
        surface.clear();
        surface.set_text_color(Color::White);
        print_at(surface, 30, SCREEN_HEIGHT as i32 / 2 - 4, 1, "Wave Cleared!");
        surface.present();
    }

    fn draw_ship(&mut self, surface: &mut impl DrawSurface, snapshot: &Snapshot) {
        draw_outline(surface, ship_hull(snapshot.ship));
        if snapshot.thrusting {
            draw_outline(surface, thrust_flame(snapshot.ship));
        }
    }

    fn draw_asteroids(&mut self, surface: &mut impl DrawSurface, snapshot: &Snapshot) {
        for asteroid in snapshot.active_asteroids() {
            let outline = asteroid_outline(asteroid, &mut self.rng);
            for (from, to) in outline.edges() {
                let (x0, y0) = to_pixel(from);
                let (x1, y1) = to_pixel(to);
                surface.draw_line(x0, y0, x1, y1, Color::White);
            }
        }
    }

    fn draw_bullets(&mut self, surface: &mut impl DrawSurface, snapshot: &Snapshot) {
        for bullet in snapshot.active_bullets() {
            let (x, y) = to_pixel(bullet.position);
            surface.draw_pixel(x, y, Color::White);
        }
    }

    fn draw_hud(&mut self, surface: &mut impl DrawSurface, snapshot: &Snapshot) {
        print_at(surface, 1, 1, 1, &snapshot.score.to_string());

        let high = format!("HI:{}", snapshot.high_score);
        let x = SCREEN_WIDTH as i32 - text_width(&high, 1) - 1;
        print_at(surface, x, 1, 1, &high);

        for i in 0..snapshot.lives {
            draw_outline(surface, life_icon(i));
        }
    }

    fn draw_title(&mut self, surface: &mut impl DrawSurface) {
        print_at(surface, 15, 10, 2, "ASTEROIDS");
        print_at(surface, 18, 40, 1, "Press Fire Button");
        print_at(surface, 35, 50, 1, "to Start");
    }

    fn draw_game_over(&mut self, surface: &mut impl DrawSurface, snapshot: &Snapshot) {
        print_at(surface, 10, 10, 2, "GAME OVER");
        print_at(surface, 25, 35, 1, &format!("Score: {}", snapshot.score));
        print_at(surface, 25, 45, 1, &format!("High:  {}", snapshot.high_score));
        print_at(surface, 18, 55, 1, "Press Fire Button");
    }
}
