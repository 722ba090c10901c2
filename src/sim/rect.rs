//! Axis-aligned rectangle geometry for bodies and platforms
//!
//! Rectangles are stored as a top-left corner plus size in screen space
//! (y grows downward), matching how characters and platforms are laid out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Penetration depth along each axis, measured between centres.
    ///
    /// Both components are positive only when the boxes overlap.
    pub fn overlap_depth(&self, other: &Rect) -> Vec2 {
        let delta = (self.center() - other.center()).abs();
        (self.size + other.size) * 0.5 - delta
    }

    /// Whether a point lies inside the box grown by `margin` on every side
    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x >= self.left() - margin
            && p.x <= self.right() + margin
            && p.y >= self.top() - margin
            && p.y <= self.bottom() + margin
    }
}
