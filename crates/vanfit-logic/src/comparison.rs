//! Deterministic diff of two analysis snapshots.
//!
//! Pure function of its inputs: no shared state, safe to call repeatedly
//! on the same pair (the UI diffs "before" against "after" on every edit).

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisSnapshot;

/// Per-quantity deltas, `after − before`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisDelta {
    pub total_mass: f64,
    pub module_mass: f64,
    pub cog_x: f64,
    pub cog_y: f64,
    pub cog_z: f64,
    pub front_margin: f64,
    pub rear_margin: f64,
    pub gross_margin: f64,
}

/// Compare two independently computed snapshots.
pub fn compare(before: &AnalysisSnapshot, after: &AnalysisSnapshot) -> AnalysisDelta {
    AnalysisDelta {
        total_mass: after.balance.total_mass - before.balance.total_mass,
        module_mass: after.balance.module_mass - before.balance.module_mass,
        cog_x: after.balance.cog_x - before.balance.cog_x,
        cog_y: after.balance.cog_y - before.balance.cog_y,
        cog_z: after.balance.cog_z - before.balance.cog_z,
        front_margin: after.loads.front_margin - before.loads.front_margin,
        rear_margin: after.loads.rear_margin - before.loads.rear_margin,
        gross_margin: after.loads.gross_margin - before.loads.gross_margin,
    }
}
