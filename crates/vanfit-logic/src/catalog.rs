//! Module catalog — definitions, per-instance override resolution, fluid mass.
//!
//! A [`ModuleDefinition`] is an immutable catalog template. Placing one in a
//! scene resolves it against optional per-instance overrides into a
//! [`ResolvedModule`] exactly once, so downstream code never needs to chase
//! `override ?? definition ?? fallback` chains at call sites.

use serde::{Deserialize, Serialize};

/// Basic solid shape of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleShape {
    Box,
    Cylinder,
}

/// Equipment category. Drives which modules respond to fill-level edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleCategory {
    Tank,
    Pump,
    Cabinet,
    Generator,
    Other,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub id: String,
    pub name: String,
    /// Owning library the entry came from.
    pub library: String,
    pub shape: ModuleShape,
    pub category: ModuleCategory,
    /// Nominal size (x, y, z) in meters.
    pub size: [f32; 3],
    /// Empty mass in kg.
    pub empty_mass: f64,
    pub contains_fluid: bool,
    /// Nominal fluid volume in liters.
    #[serde(default)]
    pub fluid_volume_l: f64,
    /// Nominal fill percentage (0–100).
    #[serde(default)]
    pub fill_percent: f64,
    /// Fluid density in kg/m³.
    #[serde(default)]
    pub fluid_density: f64,
    /// Display color, hex string.
    pub color: String,
}

/// Optional per-instance overrides of catalog defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceOverrides {
    pub size: Option<[f32; 3]>,
    pub empty_mass: Option<f64>,
    pub fluid_volume_l: Option<f64>,
    pub fluid_density: Option<f64>,
    pub fill_percent: Option<f64>,
    pub color: Option<String>,
}

/// A definition merged with its overrides — the value placed instances carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedModule {
    pub shape: ModuleShape,
    pub category: ModuleCategory,
    pub size: [f32; 3],
    pub empty_mass: f64,
    pub contains_fluid: bool,
    pub fluid_volume_l: f64,
    pub fluid_density: f64,
    /// Current fill percentage (0–100). Meaningful only for fluid carriers.
    pub fill_percent: f64,
    pub color: String,
}

impl ResolvedModule {
    /// Merge a definition with per-instance overrides.
    pub fn resolve(definition: &ModuleDefinition, overrides: &InstanceOverrides) -> Self {
        Self {
            shape: definition.shape,
            category: definition.category,
            size: overrides.size.unwrap_or(definition.size),
            empty_mass: overrides.empty_mass.unwrap_or(definition.empty_mass),
            contains_fluid: definition.contains_fluid,
            fluid_volume_l: overrides.fluid_volume_l.unwrap_or(definition.fluid_volume_l),
            fluid_density: overrides.fluid_density.unwrap_or(definition.fluid_density),
            fill_percent: overrides
                .fill_percent
                .unwrap_or(definition.fill_percent)
                .clamp(0.0, 100.0),
            color: overrides
                .color
                .clone()
                .unwrap_or_else(|| definition.color.clone()),
        }
    }
}

/// Mass that may vary with fill level.
///
/// The default is the empty mass unchanged; only tank-like categories
/// carry fluid on top of it.
pub trait OperationalMass {
    fn base_mass(&self) -> f64;

    fn operational_mass(&self, _fill_percent: f64) -> f64 {
        self.base_mass()
    }
}

impl OperationalMass for ResolvedModule {
    fn base_mass(&self) -> f64 {
        self.empty_mass
    }

    fn operational_mass(&self, fill_percent: f64) -> f64 {
        match self.category {
            ModuleCategory::Tank if self.contains_fluid => {
                let fill = fill_percent.clamp(0.0, 100.0) / 100.0;
                // liters → m³, then × fill × density (kg/m³).
                self.empty_mass + self.fluid_volume_l / 1000.0 * fill * self.fluid_density
            }
            _ => self.empty_mass,
        }
    }
}
