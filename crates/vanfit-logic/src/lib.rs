//! Pure placement-constraint and mass-balance logic for VanFit.
//!
//! This crate contains all layout logic that is independent of any UI
//! framework, renderer, or file format. Functions take plain data and
//! return results, making them unit-testable and portable between the
//! desktop editor and headless tools.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`analysis`] | Mass balance (CoG) and axle load estimation |
//! | [`catalog`] | Module definitions, per-instance override resolution, fluid mass |
//! | [`chassis`] | Chassis presets, fallback-chain resolution, usable bounds |
//! | [`comparison`] | Deterministic diff of two analysis snapshots |
//! | [`constants`] | Walkway clearances, usable-volume floors, placement epsilons |
//! | [`geometry`] | Footprint half-extents, axis-aligned rectangle overlap math |
//! | [`placement`] | Five-stage placement pipeline (clamp, snap, walkway, collide) |
//! | [`scene`] | Scene state: module list ownership and edit operations |
//! | [`walkway`] | Effective walkway rectangle and intrusion scanning |

pub mod analysis;
pub mod catalog;
pub mod chassis;
pub mod comparison;
pub mod constants;
pub mod geometry;
pub mod placement;
pub mod scene;
pub mod walkway;
