//! Chassis presets and the resolved chassis model.
//!
//! A preset is a raw catalog record: most fields are optional because the
//! source data mixes hand-authored entries with manufacturer sheets of
//! varying completeness. Resolution applies a fallback chain per field:
//!
//! - exterior dimensions: detailed body fields → base dimensions
//! - usable length: explicit usable length → loading length → exterior
//!   length minus overhangs → exterior length
//! - usable width/height: explicit field → exterior dimension
//!
//! The resolved [`Chassis`] is what the placement pipeline and the axle-load
//! estimator consume. The usable volume is always clamped inside the
//! exterior envelope.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Raw chassis catalog record. Only `id`/`name` and the base dimensions,
/// axle geometry, and ratings are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChassisPreset {
    pub id: String,
    pub name: String,

    /// Base exterior dimensions (m).
    pub length: f32,
    pub width: f32,
    pub height: f32,

    /// Detailed body dimensions, when the sheet provides them (m).
    #[serde(default)]
    pub body_length: Option<f32>,
    #[serde(default)]
    pub body_width: Option<f32>,
    #[serde(default)]
    pub body_height: Option<f32>,

    /// Explicit usable-volume dimensions (m).
    #[serde(default)]
    pub usable_length: Option<f32>,
    #[serde(default)]
    pub usable_width: Option<f32>,
    #[serde(default)]
    pub usable_height: Option<f32>,

    /// Loading length from the manufacturer sheet (m).
    #[serde(default)]
    pub loading_length: Option<f32>,

    /// Overhangs beyond the axles (m), used when no usable or loading
    /// length is given.
    #[serde(default)]
    pub front_overhang: Option<f32>,
    #[serde(default)]
    pub rear_overhang: Option<f32>,

    /// Usable-volume center offset from the chassis center (m).
    #[serde(default)]
    pub usable_offset_x: Option<f32>,
    #[serde(default)]
    pub usable_offset_z: Option<f32>,

    /// Axle geometry (m). `front_axle_offset` is measured back from the
    /// chassis center toward the front axle position.
    pub wheelbase: f32,
    pub front_axle_offset: f32,

    /// Weight ratings and empty mass (kg).
    pub ptac: f64,
    pub front_axle_rating: f64,
    pub rear_axle_rating: f64,
    pub empty_mass: f64,
}

/// A preset validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    EmptyId,
    NonPositiveDimension(&'static str),
    NonPositiveWheelbase,
    WheelbaseExceedsLength,
    UsableExceedsExterior(&'static str),
    NegativeMass(&'static str),
}

/// Validate a preset, returning all errors found.
pub fn validate_preset(preset: &ChassisPreset) -> Vec<PresetError> {
    let mut errors = Vec::new();

    if preset.id.trim().is_empty() {
        errors.push(PresetError::EmptyId);
    }
    for (value, field) in [
        (preset.length, "length"),
        (preset.width, "width"),
        (preset.height, "height"),
    ] {
        if value <= 0.0 {
            errors.push(PresetError::NonPositiveDimension(field));
        }
    }
    if preset.wheelbase <= 0.0 {
        errors.push(PresetError::NonPositiveWheelbase);
    } else if preset.wheelbase >= preset.length && preset.length > 0.0 {
        errors.push(PresetError::WheelbaseExceedsLength);
    }
    let chassis = Chassis::from_preset(preset);
    if let Some(usable) = preset.usable_width {
        if usable > chassis.width {
            errors.push(PresetError::UsableExceedsExterior("usable_width"));
        }
    }
    if let Some(usable) = preset.usable_length {
        if usable > chassis.length {
            errors.push(PresetError::UsableExceedsExterior("usable_length"));
        }
    }
    for (value, field) in [
        (preset.ptac, "ptac"),
        (preset.front_axle_rating, "front_axle_rating"),
        (preset.rear_axle_rating, "rear_axle_rating"),
        (preset.empty_mass, "empty_mass"),
    ] {
        if value < 0.0 {
            errors.push(PresetError::NegativeMass(field));
        }
    }

    errors
}

/// Resolved usable-volume bounds on the placement plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsableBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub width: f32,
    pub length: f32,
    pub center_x: f32,
    pub center_z: f32,
}

impl UsableBounds {
    pub fn rect(&self) -> Rect {
        Rect {
            min_x: self.min_x,
            max_x: self.max_x,
            min_z: self.min_z,
            max_z: self.max_z,
        }
    }
}

/// A chassis with every fallback chain already applied.
///
/// The chassis center is the world origin; +z points toward the front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chassis {
    pub id: String,
    pub name: String,

    /// Exterior envelope (m).
    pub length: f32,
    pub width: f32,
    pub height: f32,

    /// Usable volume (m), contained within the exterior envelope.
    pub usable_length: f32,
    pub usable_width: f32,
    pub usable_height: f32,
    pub usable_offset_x: f32,
    pub usable_offset_z: f32,

    pub wheelbase: f32,
    pub front_axle_offset: f32,

    pub ptac: f64,
    pub front_axle_rating: f64,
    pub rear_axle_rating: f64,
    pub empty_mass: f64,
}

impl Chassis {
    pub fn from_preset(preset: &ChassisPreset) -> Self {
        let length = preset.body_length.unwrap_or(preset.length);
        let width = preset.body_width.unwrap_or(preset.width);
        let height = preset.body_height.unwrap_or(preset.height);

        let overhang_length = match (preset.front_overhang, preset.rear_overhang) {
            (None, None) => None,
            (front, rear) => Some(length - front.unwrap_or(0.0) - rear.unwrap_or(0.0)),
        };
        let usable_length = preset
            .usable_length
            .or(preset.loading_length)
            .or(overhang_length)
            .unwrap_or(length)
            .clamp(0.0, length);
        let usable_width = preset.usable_width.unwrap_or(width).clamp(0.0, width);
        let usable_height = preset.usable_height.unwrap_or(height).clamp(0.0, height);

        Self {
            id: preset.id.clone(),
            name: preset.name.clone(),
            length,
            width,
            height,
            usable_length,
            usable_width,
            usable_height,
            usable_offset_x: preset.usable_offset_x.unwrap_or(0.0),
            usable_offset_z: preset.usable_offset_z.unwrap_or(0.0),
            wheelbase: preset.wheelbase,
            front_axle_offset: preset.front_axle_offset,
            ptac: preset.ptac,
            front_axle_rating: preset.front_axle_rating,
            rear_axle_rating: preset.rear_axle_rating,
            empty_mass: preset.empty_mass,
        }
    }

    /// Usable-volume bounds on the placement plane.
    pub fn usable_bounds(&self) -> UsableBounds {
        let half_w = self.usable_width / 2.0;
        let half_l = self.usable_length / 2.0;
        let cx = self.usable_offset_x;
        let cz = self.usable_offset_z;
        UsableBounds {
            min_x: cx - half_w,
            max_x: cx + half_w,
            min_z: cz - half_l,
            max_z: cz + half_l,
            width: self.usable_width,
            length: self.usable_length,
            center_x: cx,
            center_z: cz,
        }
    }

    /// Longitudinal position of the front axle.
    pub fn front_axle_z(&self) -> f32 {
        self.length / 2.0 - self.front_axle_offset
    }

    /// Longitudinal position of the rear axle.
    pub fn rear_axle_z(&self) -> f32 {
        self.front_axle_z() - self.wheelbase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_preset() -> ChassisPreset {
        ChassisPreset {
            id: "van-l2h2".to_string(),
            name: "Panel Van L2H2".to_string(),
            length: 6.0,
            width: 2.1,
            height: 2.5,
            body_length: None,
            body_width: None,
            body_height: None,
            usable_length: None,
            usable_width: None,
            usable_height: None,
            loading_length: None,
            front_overhang: None,
            rear_overhang: None,
            usable_offset_x: None,
            usable_offset_z: None,
            wheelbase: 3.6,
            front_axle_offset: 0.8,
            ptac: 3500.0,
            front_axle_rating: 1850.0,
            rear_axle_rating: 2000.0,
            empty_mass: 2100.0,
        }
    }

    #[test]
    fn usable_falls_back_to_exterior() {
        let c = Chassis::from_preset(&base_preset());
        assert_eq!(c.usable_length, 6.0);
        assert_eq!(c.usable_width, 2.1);
        assert_eq!(c.usable_height, 2.5);
    }

    #[test]
    fn explicit_usable_wins_over_loading_length() {
        let mut p = base_preset();
        p.usable_length = Some(3.2);
        p.loading_length = Some(3.7);
        let c = Chassis::from_preset(&p);
        assert_eq!(c.usable_length, 3.2);
    }

    #[test]
    fn loading_length_wins_over_overhangs() {
        let mut p = base_preset();
        p.loading_length = Some(3.7);
        p.front_overhang = Some(1.0);
        p.rear_overhang = Some(1.0);
        let c = Chassis::from_preset(&p);
        assert_eq!(c.usable_length, 3.7);
    }

    #[test]
    fn overhangs_reduce_exterior_length() {
        let mut p = base_preset();
        p.front_overhang = Some(1.0);
        p.rear_overhang = Some(0.5);
        let c = Chassis::from_preset(&p);
        assert!((c.usable_length - 4.5).abs() < 1e-6);
    }

    #[test]
    fn body_dimensions_override_base() {
        let mut p = base_preset();
        p.body_length = Some(6.4);
        let c = Chassis::from_preset(&p);
        assert_eq!(c.length, 6.4);
    }

    #[test]
    fn usable_clamped_to_exterior() {
        let mut p = base_preset();
        p.usable_width = Some(5.0); // wider than the body
        let c = Chassis::from_preset(&p);
        assert_eq!(c.usable_width, c.width);
    }

    #[test]
    fn bounds_follow_offset() {
        let mut p = base_preset();
        p.usable_length = Some(4.0);
        p.usable_offset_z = Some(-0.5);
        let c = Chassis::from_preset(&p);
        let b = c.usable_bounds();
        assert!((b.min_z - (-2.5)).abs() < 1e-6);
        assert!((b.max_z - 1.5).abs() < 1e-6);
        assert!((b.center_z - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn axle_positions_from_offset_and_wheelbase() {
        let c = Chassis::from_preset(&base_preset());
        assert!((c.front_axle_z() - 2.2).abs() < 1e-6);
        assert!((c.rear_axle_z() - (-1.4)).abs() < 1e-6);
    }

    #[test]
    fn valid_preset_passes() {
        assert!(validate_preset(&base_preset()).is_empty());
    }

    #[test]
    fn zero_width_rejected() {
        let mut p = base_preset();
        p.width = 0.0;
        let errs = validate_preset(&p);
        assert!(errs.contains(&PresetError::NonPositiveDimension("width")));
    }

    #[test]
    fn wheelbase_longer_than_vehicle_rejected() {
        let mut p = base_preset();
        p.wheelbase = 7.0;
        let errs = validate_preset(&p);
        assert!(errs.contains(&PresetError::WheelbaseExceedsLength));
    }

    #[test]
    fn oversized_usable_rejected() {
        let mut p = base_preset();
        p.usable_width = Some(3.0);
        let errs = validate_preset(&p);
        assert!(errs.contains(&PresetError::UsableExceedsExterior("usable_width")));
    }
}
