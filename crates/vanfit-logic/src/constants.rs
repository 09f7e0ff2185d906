//! Layout constants — walkway clearances, usable-volume floors, epsilons.
//!
//! Plain constants with no dependencies. Both the editor front end and the
//! native simtest harness use these. All lengths are in meters, masses in
//! kilograms.

pub mod walkway {
    /// Narrowest corridor an operator can still pass through.
    pub const MIN_WIDTH: f32 = 0.5;
    /// Lateral clearance kept between the walkway and the usable-volume sides.
    pub const SIDE_CLEARANCE: f32 = 0.3;
    /// Longitudinal clearance kept at both walkway ends.
    pub const END_CLEARANCE: f32 = 0.3;
    /// Shortest walkway the clearance rule may shrink to.
    pub const MIN_LENGTH: f32 = 0.5;
    /// Walkway width when the operator has not set one.
    pub const DEFAULT_WIDTH: f32 = 0.8;
    /// Walkway length used before any chassis is selected.
    pub const DEFAULT_LENGTH: f32 = 4.0;
}

pub mod usable {
    /// Floor for the usable-volume width when edited interactively.
    pub const MIN_WIDTH: f32 = 0.5;
    /// Floor for the usable-volume length when edited interactively.
    pub const MIN_LENGTH: f32 = 1.0;
}

pub mod placement {
    /// Extra gap added when pushing two overlapping modules apart, so a
    /// re-scan does not immediately find the same contact again.
    pub const SEPARATION_EPSILON: f32 = 1.0e-3;
    /// Vertical stacking allowance: modules may sit up to this many
    /// usable-volume heights above the floor.
    pub const STACK_HEADROOM: f32 = 3.0;
    /// Snap distance used when the operator has not set one.
    pub const DEFAULT_SNAP_DISTANCE: f32 = 0.1;
}

pub mod analysis {
    /// Total masses at or below this are treated as an empty scene.
    pub const MASS_EPSILON: f64 = 1.0e-6;
}
