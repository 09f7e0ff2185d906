//! Placement pipeline — the constraint passes every position edit goes through.
//!
//! Algorithm: "clamp, snap, clear, separate, re-clamp"
//! 1. Clamp the requested position into the usable volume (oversized
//!    modules degenerate to centering)
//! 2. Snap to nearby alignment guides when magnetism is on
//! 3. Push the footprint out of the walkway along the cheapest axis
//! 4. Iteratively separate solid-body overlaps (budget = module count)
//! 5. Re-clamp, since separation may have pushed past a boundary
//!
//! Each stage is a pure function over a [`Position`]; the pipeline never
//! mutates the instance list it reads. Separation is a greedy relaxation:
//! dense clusters can exhaust the budget with residual overlaps, which then
//! simply show up in the next overlap scan.

use serde::{Deserialize, Serialize};

use crate::chassis::Chassis;
use crate::constants::placement as pc;
use crate::geometry::{clamp_or_center, Position, Rect};
use crate::scene::ModuleInstance;
use crate::walkway::{self, WalkwaySettings};

/// Global placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementSettings {
    /// Magnetic snapping to alignment guides.
    pub magnetism: bool,
    /// Snap threshold (m). Zero disables snapping even when magnetism is on.
    pub snap_distance: f32,
    /// When true, modules are solid and may not overlap each other.
    pub solid_collisions: bool,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            magnetism: true,
            snap_distance: pc::DEFAULT_SNAP_DISTANCE,
            solid_collisions: true,
        }
    }
}

/// Read-only context a pipeline run operates against.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub chassis: &'a Chassis,
    pub walkway: &'a WalkwaySettings,
    pub settings: &'a PlacementSettings,
}

// ── Stage 1/5: bounds clamping ──────────────────────────────────────────

/// Confine a position to the usable volume.
///
/// x/z keep the footprint inside the usable rectangle; y allows stacking up
/// to [`pc::STACK_HEADROOM`] usable heights. Always returns a finite
/// position — an oversized module centers instead of failing.
pub fn clamp_to_bounds(
    pos: Position,
    half_x: f32,
    half_z: f32,
    half_h: f32,
    chassis: &Chassis,
) -> Position {
    let bounds = chassis.usable_bounds();
    Position {
        x: clamp_or_center(pos.x, bounds.min_x + half_x, bounds.max_x - half_x),
        y: clamp_or_center(
            pos.y,
            half_h,
            pc::STACK_HEADROOM * chassis.usable_height - half_h,
        ),
        z: clamp_or_center(pos.z, bounds.min_z + half_z, bounds.max_z - half_z),
    }
}

// ── Stage 2: magnetic snapping ──────────────────────────────────────────

/// Pick the smallest-magnitude non-zero delta within `threshold`.
/// Ties keep the earliest candidate.
pub fn pick_delta(candidates: &[f32], threshold: f32) -> Option<f32> {
    let mut best: Option<f32> = None;
    for &delta in candidates {
        if delta == 0.0 {
            continue;
        }
        let magnitude = delta.abs();
        if magnitude > threshold {
            continue;
        }
        if best.map_or(true, |b| magnitude < b.abs()) {
            best = Some(delta);
        }
    }
    best
}

/// Candidate target positions along one axis: volume edges first, then the
/// walkway edges and center line, then per-instance guides (center, both
/// flush-edge alignments).
struct AxisGuides {
    lo_flush: f32,
    hi_flush: f32,
}

fn axis_candidates(
    current: f32,
    half: f32,
    volume: AxisGuides,
    walkway_rect: Option<(f32, f32, f32)>, // (min, max, center)
    others: impl Iterator<Item = (f32, f32, f32)>, // (center, min, max)
) -> Vec<f32> {
    let mut deltas = Vec::new();
    deltas.push(volume.lo_flush - current);
    deltas.push(volume.hi_flush - current);
    if let Some((min, max, center)) = walkway_rect {
        deltas.push(min - half - current);
        deltas.push(max + half - current);
        deltas.push(center - current);
    }
    for (center, min, max) in others {
        deltas.push(center - current);
        deltas.push(min - half - current);
        deltas.push(max + half - current);
    }
    deltas
}

/// Snap a clamped position to nearby alignment guides.
pub fn apply_magnetism(
    pos: Position,
    half_x: f32,
    half_z: f32,
    ctx: &PlacementContext,
    modules: &[ModuleInstance],
    moving: usize,
) -> Position {
    if !ctx.settings.magnetism || ctx.settings.snap_distance <= 0.0 {
        return pos;
    }
    let bounds = ctx.chassis.usable_bounds();
    let walkway_rect = ctx
        .walkway
        .visible
        .then(|| walkway::effective_rect(ctx.walkway, Some(ctx.chassis)));

    let others = || {
        modules
            .iter()
            .enumerate()
            .filter(move |(j, _)| *j != moving)
            .map(|(_, m)| m)
    };

    let x_deltas = axis_candidates(
        pos.x,
        half_x,
        AxisGuides {
            lo_flush: bounds.min_x + half_x,
            hi_flush: bounds.max_x - half_x,
        },
        walkway_rect.map(|r| (r.min_x, r.max_x, r.center_x())),
        others().map(|m| {
            let fp = m.footprint();
            (m.position.x, fp.min_x, fp.max_x)
        }),
    );
    let z_deltas = axis_candidates(
        pos.z,
        half_z,
        AxisGuides {
            lo_flush: bounds.min_z + half_z,
            hi_flush: bounds.max_z - half_z,
        },
        walkway_rect.map(|r| (r.min_z, r.max_z, r.center_z())),
        others().map(|m| {
            let fp = m.footprint();
            (m.position.z, fp.min_z, fp.max_z)
        }),
    );

    let mut snapped = pos;
    if let Some(delta) = pick_delta(&x_deltas, ctx.settings.snap_distance) {
        snapped.x = clamp_or_center(pos.x + delta, bounds.min_x + half_x, bounds.max_x - half_x);
    }
    if let Some(delta) = pick_delta(&z_deltas, ctx.settings.snap_distance) {
        snapped.z = clamp_or_center(pos.z + delta, bounds.min_z + half_z, bounds.max_z - half_z);
    }
    snapped
}

// ── Stage 3: walkway clearance ──────────────────────────────────────────

/// Push a footprint out of the walkway rectangle along the cheapest axis.
///
/// Four exit candidates (flush against each walkway side) are restricted to
/// the clamp range; the smallest displacement wins. With no legal candidate
/// the module is forced to the walkway side nearest its current position,
/// best effort — the residual overlap stays visible to intrusion scans.
pub fn enforce_walkway_clearance(
    pos: Position,
    half_x: f32,
    half_z: f32,
    rect: &Rect,
    chassis: &Chassis,
) -> Position {
    let footprint = Rect::from_center(pos.x, pos.z, half_x, half_z);
    if !(footprint.overlap_x(rect) > 0.0 && footprint.overlap_z(rect) > 0.0) {
        return pos;
    }

    let bounds = chassis.usable_bounds();
    let x_range = (bounds.min_x + half_x, bounds.max_x - half_x);
    let z_range = (bounds.min_z + half_z, bounds.max_z - half_z);

    // (is_x_axis, target value)
    let candidates = [
        (true, rect.min_x - half_x),
        (true, rect.max_x + half_x),
        (false, rect.min_z - half_z),
        (false, rect.max_z + half_z),
    ];

    let mut best: Option<(bool, f32, f32)> = None; // (axis, value, displacement)
    for (is_x, value) in candidates {
        let (lo, hi) = if is_x { x_range } else { z_range };
        if lo > hi || value < lo || value > hi {
            continue;
        }
        let displacement = if is_x {
            (value - pos.x).abs()
        } else {
            (value - pos.z).abs()
        };
        if best.map_or(true, |(_, _, d)| displacement < d) {
            best = Some((is_x, value, displacement));
        }
    }

    let mut cleared = pos;
    match best {
        Some((true, value, _)) => cleared.x = value,
        Some((false, value, _)) => cleared.z = value,
        None => {
            // Nearest side ignoring the clamp range, then back into bounds.
            let mut fallback: Option<(bool, f32, f32)> = None;
            for (is_x, value) in candidates {
                let displacement = if is_x {
                    (value - pos.x).abs()
                } else {
                    (value - pos.z).abs()
                };
                if fallback.map_or(true, |(_, _, d)| displacement < d) {
                    fallback = Some((is_x, value, displacement));
                }
            }
            match fallback {
                Some((true, value, _)) => {
                    cleared.x = clamp_or_center(value, x_range.0, x_range.1)
                }
                Some((false, value, _)) => {
                    cleared.z = clamp_or_center(value, z_range.0, z_range.1)
                }
                None => {}
            }
        }
    }
    cleared
}

// ── Stage 4: solid-body separation ──────────────────────────────────────

/// Greedy overlap relaxation for solid mode.
///
/// On each pass the first overlapping neighbor pushes the moving module out
/// along the axis with the smaller overlap, away from the neighbor's center,
/// then the position is re-clamped and walkway-cleared before the scan
/// restarts. Terminates on a clean scan or after `modules.len()` pushes.
pub fn separate_collisions(
    mut pos: Position,
    half_x: f32,
    half_z: f32,
    half_h: f32,
    ctx: &PlacementContext,
    modules: &[ModuleInstance],
    moving: usize,
) -> Position {
    if !ctx.settings.solid_collisions {
        return pos;
    }
    let walkway_rect = ctx
        .walkway
        .visible
        .then(|| walkway::effective_rect(ctx.walkway, Some(ctx.chassis)));

    let budget = modules.len().max(1);
    for _ in 0..budget {
        let mut pushed = false;
        for (j, other) in modules.iter().enumerate() {
            if j == moving {
                continue;
            }
            let footprint = Rect::from_center(pos.x, pos.z, half_x, half_z);
            let other_fp = other.footprint();
            let ox = footprint.overlap_x(&other_fp);
            let oz = footprint.overlap_z(&other_fp);
            if ox <= 0.0 || oz <= 0.0 {
                continue;
            }
            if ox <= oz {
                let dir = if pos.x >= other.position.x { 1.0 } else { -1.0 };
                pos.x += dir * (ox + pc::SEPARATION_EPSILON);
            } else {
                let dir = if pos.z >= other.position.z { 1.0 } else { -1.0 };
                pos.z += dir * (oz + pc::SEPARATION_EPSILON);
            }
            pos = clamp_to_bounds(pos, half_x, half_z, half_h, ctx.chassis);
            if let Some(rect) = &walkway_rect {
                pos = enforce_walkway_clearance(pos, half_x, half_z, rect, ctx.chassis);
            }
            pushed = true;
            break;
        }
        if !pushed {
            return pos;
        }
    }
    pos
}

// ── Orchestrator ────────────────────────────────────────────────────────

/// Run the full five-stage pipeline for `modules[moving]` at `requested`.
///
/// Reads the entire instance list as context and returns the corrected
/// position without mutating anything.
pub fn place(
    ctx: &PlacementContext,
    modules: &[ModuleInstance],
    moving: usize,
    requested: Position,
) -> Position {
    let module = &modules[moving];
    let (half_x, half_z) = module.half_extents();
    let half_h = module.module.size[1] / 2.0;

    let mut pos = clamp_to_bounds(requested, half_x, half_z, half_h, ctx.chassis);
    pos = apply_magnetism(pos, half_x, half_z, ctx, modules, moving);
    if ctx.walkway.visible {
        let rect = walkway::effective_rect(ctx.walkway, Some(ctx.chassis));
        pos = enforce_walkway_clearance(pos, half_x, half_z, &rect, ctx.chassis);
    }
    pos = separate_collisions(pos, half_x, half_z, half_h, ctx, modules, moving);
    clamp_to_bounds(pos, half_x, half_z, half_h, ctx.chassis)
}
