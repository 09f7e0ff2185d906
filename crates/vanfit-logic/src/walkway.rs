//! Walkway corridor — effective rectangle derivation and intrusion scanning.
//!
//! The walkway is never stored as geometry: its rectangle is derived on
//! demand from the settings and the current chassis. Width is clamped
//! between the operator minimum and what the usable volume can spare after
//! side clearances; the offset is clamped so the corridor never exits the
//! usable volume.

use serde::{Deserialize, Serialize};

use crate::chassis::Chassis;
use crate::constants::walkway as wk;
use crate::geometry::Rect;
use crate::scene::ModuleInstance;

/// Operator-editable walkway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkwaySettings {
    /// Requested corridor width (m).
    pub width: f32,
    /// When false, the walkway constraint is disabled entirely.
    pub visible: bool,
    /// Corridor center offset from the usable-volume center (m).
    pub offset_x: f32,
    pub offset_z: f32,
}

impl Default for WalkwaySettings {
    fn default() -> Self {
        Self {
            width: wk::DEFAULT_WIDTH,
            visible: true,
            offset_x: 0.0,
            offset_z: 0.0,
        }
    }
}

/// Derive the world-space walkway rectangle for the current chassis.
///
/// Without a chassis the corridor takes the requested width (floored to the
/// operator minimum) and a fixed default length, centered on the offset.
pub fn effective_rect(settings: &WalkwaySettings, chassis: Option<&Chassis>) -> Rect {
    let Some(chassis) = chassis else {
        let half_w = settings.width.max(wk::MIN_WIDTH) / 2.0;
        let half_l = wk::DEFAULT_LENGTH / 2.0;
        return Rect::from_center(settings.offset_x, settings.offset_z, half_w, half_l);
    };

    let usable = chassis.usable_bounds();
    let max_allowed = (usable.width - 2.0 * wk::SIDE_CLEARANCE).max(0.0);
    let width = settings
        .width
        .clamp(wk::MIN_WIDTH.min(max_allowed), max_allowed);
    let length = (usable.length - 2.0 * wk::END_CLEARANCE).max(wk::MIN_LENGTH.min(usable.length));

    // Clamp the offset so the corridor stays inside the usable volume.
    let slack_x = ((usable.width - width) / 2.0).max(0.0);
    let slack_z = ((usable.length - length) / 2.0).max(0.0);
    let cx = usable.center_x + settings.offset_x.clamp(-slack_x, slack_x);
    let cz = usable.center_z + settings.offset_z.clamp(-slack_z, slack_z);

    Rect::from_center(cx, cz, width / 2.0, length / 2.0)
}

/// One module footprint overlapping the walkway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkwayIntrusion {
    pub module_index: usize,
    /// Penetration depth along the shallower axis (m).
    pub depth: f32,
}

/// Scan every instance footprint against the walkway rectangle.
pub fn scan_intrusions(rect: &Rect, modules: &[ModuleInstance]) -> Vec<WalkwayIntrusion> {
    let mut intrusions = Vec::new();
    for (index, module) in modules.iter().enumerate() {
        let footprint = module.footprint();
        let ox = footprint.overlap_x(rect);
        let oz = footprint.overlap_z(rect);
        if ox > 0.0 && oz > 0.0 {
            intrusions.push(WalkwayIntrusion {
                module_index: index,
                depth: ox.min(oz),
            });
        }
    }
    intrusions
}
