//! Rendering contract
//!
//! The particle code never talks to a graphics API directly. Animations draw
//! frames of a [`Graphic`] through a [`Renderer`], and the [`Viewport`] maps
//! world positions to screen positions.

pub mod sprite;

pub use sprite::{SpriteBatch, SpriteInstance};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Position;

/// A sprite sheet: `frames` cells of `frame_width` x `frame_height` pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graphic {
    pub name: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frames: usize,
}

impl Graphic {
    pub fn new(
        name: impl Into<String>,
        frame_width: u32,
        frame_height: u32,
        frames: usize,
    ) -> Self {
        Self {
            name: name.into(),
            frame_width,
            frame_height,
            frames,
        }
    }
}

/// Backend that can blit a single frame of a sprite sheet
pub trait Renderer {
    /// Draw `frame` of `graphic` with its top-left corner at screen (x, y)
    fn draw_frame(&mut self, graphic: &Graphic, frame: usize, x: i32, y: i32);
}

/// On-screen window onto the scrolling map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the viewport's top-left corner
    pub origin: Vec2,
    /// Viewport size in screen pixels
    pub size: Vec2,
    /// Map pixel shown at the viewport's top-left corner
    pub scroll: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(640.0, 480.0),
            scroll: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size,
            scroll: Vec2::ZERO,
        }
    }

    /// Scroll so `map_pos` is at the top-left corner
    pub fn scroll_to(&mut self, map_pos: Vec2) {
        self.scroll = map_pos;
    }

    /// World pixel to screen pixel (snapped to whole map pixels)
    #[inline]
    pub fn map_to_screen(&self, pos: Position) -> Position {
        pos.floor() - self.scroll + self.origin
    }

    /// Whether a screen position lies inside the viewport grown by `margin`
    pub fn contains(&self, screen: Position, margin: f32) -> bool {
        let min = self.origin - Vec2::splat(margin);
        let max = self.origin + self.size + Vec2::splat(margin);
        screen.x >= min.x && screen.y >= min.y && screen.x < max.x && screen.y < max.y
    }
}
