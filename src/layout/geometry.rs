//! # Geometry Primitives
//!
//! Pure functions over percentage-space rectangles. Every coordinate is a
//! percentage of the canvas' own width or height, so the canvas always spans
//! `[0, 100]` on both axes regardless of its pixel size.
//!
//! ```text
//! (0,0) ┌──────────────────────────┐
//!       │   (x,y) ┌──────┐         │
//!       │         │  h   │         │
//!       │         └──w───┘         │
//!       └──────────────────────────┘ (100,100)
//! ```

use serde::{Deserialize, Serialize};

/// Extent of the canvas on each axis, in percentage units.
pub const CANVAS_EXTENT: f64 = 100.0;

/// Axis-aligned rectangle in percentage units (top-left corner plus size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Same size, new top-left corner.
    pub fn with_origin(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..*self }
    }

    /// Build a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            x: left,
            y: top,
            w: right - left,
            h: bottom - top,
        }
    }

    /// True if the two interiors intersect. See [`overlaps`].
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// True iff the interiors of `a` and `b` intersect.
///
/// Uses strict inequalities, so rectangles that only share an edge do not
/// overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Clamp `v` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `min > max` (a widget larger
/// than the space left for it) the lower bound wins.
#[inline]
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(v))
}

/// Round `v` to the nearest multiple of `step`.
///
/// Values exactly halfway between two grid lines go to the lower one, so
/// `snap(35.0, 2.0) == 34.0`. A non-positive step disables snapping.
#[inline]
pub fn snap(v: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return v;
    }
    ((v / step) - 0.5).ceil() * step
}

/// Pixel size of the surface a canvas is displayed on.
///
/// Converts between pointer positions in pixels and percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Builder canvas size.
    pub const BUILDER: Self = Self {
        width: 500,
        height: 800,
    };

    /// Canvas size used for templates loaded from the store (~4x6" at 96 dpi).
    pub const LABEL_4X6: Self = Self {
        width: 384,
        height: 576,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel offset from the canvas' left edge to percentage.
    pub fn x_to_pct(&self, px: f64) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        px / self.width as f64 * CANVAS_EXTENT
    }

    /// Pixel offset from the canvas' top edge to percentage.
    pub fn y_to_pct(&self, px: f64) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        px / self.height as f64 * CANVAS_EXTENT
    }

    pub fn x_to_px(&self, pct: f64) -> f64 {
        pct / CANVAS_EXTENT * self.width as f64
    }

    pub fn y_to_px(&self, pct: f64) -> f64 {
        pct / CANVAS_EXTENT * self.height as f64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::BUILDER
    }
}
