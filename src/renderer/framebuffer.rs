//! In-memory 128x64 1-bit surface
//!
//! Stands in for the panel in headless runs and tests. Lines and pixels are
//! rasterized; text is kept as positioned runs instead of glyph bitmaps.

use super::{Color, DrawSurface, GLYPH_WIDTH};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Text printed at one cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub x: i32,
    pub y: i32,
    pub size: u8,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<bool>,
    texts: Vec<TextRun>,
    cursor: (i32, i32),
    text_size: u8,
    text_color: Color,
    frames_presented: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; WIDTH * HEIGHT],
            texts: Vec::new(),
            cursor: (0, 0),
            text_size: 1,
            text_color: Color::White,
            frames_presented: 0,
        }
    }

    /// Lit state of a pixel; off-screen reads as dark
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_some_and(|i| self.pixels[i])
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    pub fn text_at(&self, x: i32, y: i32) -> Option<&TextRun> {
        self.texts.iter().find(|t| t.x == x && t.y == y)
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.text.contains(needle))
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// `#` for lit pixels, `.` for dark, one line per row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((WIDTH + 1) * HEIGHT);
        for row in self.pixels.chunks(WIDTH) {
            out.extend(row.iter().map(|&p| if p { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < HEIGHT)?;
        Some(y * WIDTH + x)
    }
}

impl DrawSurface for FrameBuffer {
    fn clear(&mut self) {
        self.pixels.fill(false);
        self.texts.clear();
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }

    /// Off-screen writes are clipped
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = Self::index(x, y) {
            self.pixels[i] = color == Color::White;
        }
    }

    /// Bresenham, both endpoints inclusive
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.draw_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size.max(1);
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn print(&mut self, text: &str) {
        if self.text_color == Color::White {
            self.texts.push(TextRun {
                x: self.cursor.0,
                y: self.cursor.1,
                size: self.text_size,
                text: text.to_owned(),
            });
        }
        self.cursor.0 += text.chars().count() as i32 * GLYPH_WIDTH * self.text_size as i32;
    }
}
