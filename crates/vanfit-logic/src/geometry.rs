//! Footprint and rectangle primitives for module placement.
//!
//! Everything here works on the horizontal placement plane: x is lateral
//! (across the vehicle), z is longitudinal (front is +z), y is vertical.
//! A module's footprint is the world-aligned bounding rectangle of its
//! yaw-rotated base — conservative for rotations that are not multiples of
//! 90°, exact for the discrete steps the editor actually uses.

use serde::{Deserialize, Serialize};

/// A world-space position (meters). y is height above the usable floor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// World-aligned half-extents of a yaw-rotated rectangular base.
///
/// For local half-extents `(hx, hz)` rotated by `yaw`:
/// `half_x = |cos θ|·hx + |sin θ|·hz`, `half_z = |cos θ|·hz + |sin θ|·hx`.
/// Never under-estimates the true footprint.
pub fn footprint_half_extents(size_x: f32, size_z: f32, yaw: f32) -> (f32, f32) {
    let hx = size_x / 2.0;
    let hz = size_z / 2.0;
    let c = yaw.cos().abs();
    let s = yaw.sin().abs();
    (c * hx + s * hz, c * hz + s * hx)
}

/// Axis-aligned rectangle on the placement plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    pub fn from_center(cx: f32, cz: f32, half_x: f32, half_z: f32) -> Self {
        Self {
            min_x: cx - half_x,
            max_x: cx + half_x,
            min_z: cz - half_z,
            max_z: cz + half_z,
        }
    }

    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn center_z(&self) -> f32 {
        (self.min_z + self.max_z) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn length(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Signed overlap with `other` along x. Positive when the x intervals
    /// intersect; zero or negative when they merely touch or are apart.
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        overlap_amount(self.min_x, self.max_x, other.min_x, other.max_x)
    }

    /// Signed overlap with `other` along z.
    pub fn overlap_z(&self, other: &Rect) -> f32 {
        overlap_amount(self.min_z, self.max_z, other.min_z, other.max_z)
    }

    /// True when the rectangles overlap with positive area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlap_x(other) > 0.0 && self.overlap_z(other) > 0.0
    }

    /// True when `other` lies entirely inside this rectangle (tolerance for
    /// float noise from repeated clamping).
    pub fn contains_rect(&self, other: &Rect, tolerance: f32) -> bool {
        other.min_x >= self.min_x - tolerance
            && other.max_x <= self.max_x + tolerance
            && other.min_z >= self.min_z - tolerance
            && other.max_z <= self.max_z + tolerance
    }
}

/// Signed interval overlap: `min(max_a, max_b) − max(min_a, min_b)`.
pub fn overlap_amount(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> f32 {
    max_a.min(max_b) - min_a.max(min_b)
}

/// Clamp `v` into `[lo, hi]`, degenerating to the interval midpoint when the
/// interval is empty (a module larger than the space it must fit in).
pub fn clamp_or_center(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}
