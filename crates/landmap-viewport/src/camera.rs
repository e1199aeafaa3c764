//! Pan/zoom camera over the world plane.
//!
//! The camera is a uniform scale plus translation:
//!
//! ```text
//! screen = world * zoom + offset
//! world  = (screen - offset) / zoom
//! ```
//!
//! `offset` is where world origin lands on screen. All sizes are CSS pixels;
//! device pixel scaling belongs to the drawing backend.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.05;

/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom of a fresh camera, showing a wide slice of the plane.
pub const DEFAULT_ZOOM: f64 = 0.15;

/// Size of the viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    /// Create a size. Negative or non-finite dimensions become zero.
    pub fn new(width: f64, height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Screen-space center.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Camera state: zoom in `[MIN_ZOOM, MAX_ZOOM]` and pan offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    zoom: f64,
    offset: DVec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            offset: DVec2::ZERO,
        }
    }
}

impl Camera {
    /// Create a camera. Zoom is clamped; non-finite values fall back to defaults.
    pub fn new(zoom: f64, offset: DVec2) -> Self {
        let zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            DEFAULT_ZOOM
        };
        let offset = if offset.is_finite() { offset } else { DVec2::ZERO };
        Self { zoom, offset }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Screen position of world origin.
    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        world * self.zoom + self.offset
    }

    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        (screen - self.offset) / self.zoom
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, delta: DVec2) -> bool {
        if !delta.is_finite() || delta == DVec2::ZERO {
            return false;
        }
        self.offset += delta;
        true
    }

    /// Scale by `factor` keeping the world point under `anchor` fixed.
    ///
    /// The new zoom is clamped. Returns `false` (and changes nothing) when
    /// the factor is not a positive finite number or clamping leaves the
    /// zoom where it was.
    pub fn zoom_at(&mut self, factor: f64, anchor: DVec2) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return false;
        }
        let next = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if next == self.zoom {
            return false;
        }

        let world = self.screen_to_world(anchor);
        self.offset = anchor - world * next;
        self.zoom = next;
        true
    }

    /// Put `world` at the center of a viewport of `size`.
    pub fn center_on(&mut self, world: DVec2, size: ViewportSize) -> bool {
        if size.is_empty() || !world.is_finite() {
            return false;
        }
        self.offset = size.center() - world * self.zoom;
        true
    }

    /// World-space rectangle visible in a viewport of `size`, as (min, max).
    pub fn visible_world(&self, size: ViewportSize) -> (DVec2, DVec2) {
        let min = self.screen_to_world(DVec2::ZERO);
        let max = self.screen_to_world(DVec2::new(size.width, size.height));
        (min, max)
    }
}
