//! Scene state — the single owner of the placed-module list.
//!
//! Every position change funnels through the placement pipeline; add,
//! remove, fill and rotation edits go through the operations here so the
//! invariants (footprints inside the usable volume, out of the walkway,
//! non-overlapping in solid mode) hold after every call. The logic itself
//! stays pure: [`SceneState`] hands the pipeline read-only context and
//! applies the corrected position it gets back.

use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisSnapshot};
use crate::catalog::{
    InstanceOverrides, ModuleDefinition, OperationalMass, ResolvedModule,
};
use crate::chassis::Chassis;
use crate::constants::usable;
use crate::geometry::{footprint_half_extents, Position, Rect};
use crate::placement::{self, PlacementContext, PlacementSettings};
use crate::walkway::{self, WalkwayIntrusion, WalkwaySettings};

/// One placed module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInstance {
    /// Catalog entry this instance came from.
    pub definition_id: String,
    /// Definition merged with per-instance overrides at creation time.
    pub module: ResolvedModule,
    pub position: Position,
    /// Yaw about the vertical axis, radians.
    pub yaw: f32,
}

impl ModuleInstance {
    /// World-aligned footprint half-extents for the current yaw.
    pub fn half_extents(&self) -> (f32, f32) {
        footprint_half_extents(self.module.size[0], self.module.size[2], self.yaw)
    }

    /// World-aligned footprint rectangle.
    pub fn footprint(&self) -> Rect {
        let (half_x, half_z) = self.half_extents();
        Rect::from_center(self.position.x, self.position.z, half_x, half_z)
    }

    /// Current mass including fluid at the current fill level.
    pub fn operational_mass(&self) -> f64 {
        self.module.operational_mass(self.module.fill_percent)
    }
}

/// The scene: chassis, placed modules, and the global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneState {
    pub chassis: Option<Chassis>,
    pub modules: Vec<ModuleInstance>,
    pub walkway: WalkwaySettings,
    pub settings: PlacementSettings,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the chassis and re-place every module against the new volume.
    pub fn set_chassis(&mut self, chassis: Chassis) {
        self.chassis = Some(chassis);
        self.reflow();
    }

    /// Place a catalog entry into the scene. Returns the new instance index.
    pub fn add_module(
        &mut self,
        definition: &ModuleDefinition,
        overrides: &InstanceOverrides,
        at: Position,
    ) -> usize {
        let module = ResolvedModule::resolve(definition, overrides);
        self.modules.push(ModuleInstance {
            definition_id: definition.id.clone(),
            module,
            position: at,
            yaw: 0.0,
        });
        let index = self.modules.len() - 1;
        let corrected = self.place_at(index, at);
        self.modules[index].position = corrected;
        index
    }

    pub fn remove_module(&mut self, index: usize) -> Option<ModuleInstance> {
        if index < self.modules.len() {
            Some(self.modules.remove(index))
        } else {
            None
        }
    }

    /// Drop every module, keeping chassis and settings.
    pub fn clear_modules(&mut self) {
        self.modules.clear();
    }

    /// Request a new position for one instance; returns the corrected
    /// position actually applied.
    pub fn request_move(&mut self, index: usize, requested: Position) -> Option<Position> {
        if index >= self.modules.len() {
            return None;
        }
        let corrected = self.place_at(index, requested);
        self.modules[index].position = corrected;
        Some(corrected)
    }

    /// Rotate an instance by quarter turns, then re-run the pipeline since
    /// the footprint may have changed shape.
    pub fn rotate_module(&mut self, index: usize, quarter_turns: i32) {
        if index >= self.modules.len() {
            return;
        }
        self.modules[index].yaw += quarter_turns as f32 * std::f32::consts::FRAC_PI_2;
        let position = self.modules[index].position;
        let corrected = self.place_at(index, position);
        self.modules[index].position = corrected;
    }

    /// Set a fluid module's fill level (clamped to 0–100).
    pub fn set_fill_percent(&mut self, index: usize, percent: f64) {
        if let Some(instance) = self.modules.get_mut(index) {
            instance.module.fill_percent = percent.clamp(0.0, 100.0);
        }
    }

    /// Interactive usable-volume edit: floors applied, capped by the
    /// exterior envelope, then every module is re-placed.
    pub fn set_usable_dims(&mut self, width: f32, length: f32) {
        if let Some(chassis) = &mut self.chassis {
            chassis.usable_width = width.max(usable::MIN_WIDTH).min(chassis.width);
            chassis.usable_length = length.max(usable::MIN_LENGTH).min(chassis.length);
        }
        self.reflow();
    }

    /// Replace the walkway settings and re-place every module.
    pub fn set_walkway(&mut self, settings: WalkwaySettings) {
        self.walkway = settings;
        self.reflow();
    }

    /// Re-run the pipeline over all instances in order. Invariants are only
    /// guaranteed once the full pass completes.
    pub fn reflow(&mut self) {
        for index in 0..self.modules.len() {
            let requested = self.modules[index].position;
            let corrected = self.place_at(index, requested);
            self.modules[index].position = corrected;
        }
    }

    /// Mass balance and axle loads for the current module set.
    pub fn analyze(&self) -> AnalysisSnapshot {
        analysis::analyze(self.chassis.as_ref(), &self.modules)
    }

    /// Walkway intrusion list (empty when the walkway is disabled).
    pub fn walkway_intrusions(&self) -> Vec<WalkwayIntrusion> {
        if !self.walkway.visible {
            return Vec::new();
        }
        let rect = walkway::effective_rect(&self.walkway, self.chassis.as_ref());
        walkway::scan_intrusions(&rect, &self.modules)
    }

    /// Pipeline pass for one instance. Without a chassis there is nothing to
    /// constrain against, so the requested position is applied as-is.
    fn place_at(&self, index: usize, requested: Position) -> Position {
        match &self.chassis {
            Some(chassis) => placement::place(
                &PlacementContext {
                    chassis,
                    walkway: &self.walkway,
                    settings: &self.settings,
                },
                &self.modules,
                index,
                requested,
            ),
            None => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModuleCategory, ModuleShape};
    use crate::chassis::ChassisPreset;

    fn chassis() -> Chassis {
        Chassis::from_preset(&ChassisPreset {
            id: "test".to_string(),
            name: "Test".to_string(),
            length: 8.0,
            width: 4.0,
            height: 2.5,
            body_length: None,
            body_width: None,
            body_height: None,
            usable_length: Some(8.0),
            usable_width: Some(4.0),
            usable_height: Some(2.0),
            loading_length: None,
            front_overhang: None,
            rear_overhang: None,
            usable_offset_x: None,
            usable_offset_z: None,
            wheelbase: 4.5,
            front_axle_offset: 1.0,
            ptac: 7000.0,
            front_axle_rating: 3000.0,
            rear_axle_rating: 4500.0,
            empty_mass: 3000.0,
        })
    }

    fn cabinet(size_x: f32, size_z: f32) -> ModuleDefinition {
        ModuleDefinition {
            id: "cab".to_string(),
            name: "Cabinet".to_string(),
            library: "standard".to_string(),
            shape: ModuleShape::Box,
            category: ModuleCategory::Cabinet,
            size: [size_x, 1.0, size_z],
            empty_mass: 120.0,
            contains_fluid: false,
            fluid_volume_l: 0.0,
            fill_percent: 0.0,
            fluid_density: 0.0,
            color: "#888888".to_string(),
        }
    }

    fn scene() -> SceneState {
        let mut scene = SceneState::new();
        scene.set_chassis(chassis());
        scene
    }

    #[test]
    fn add_places_inside_bounds() {
        let mut scene = scene();
        let index = scene.add_module(
            &cabinet(1.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(100.0, 0.5, 100.0),
        );
        let usable = scene.chassis.as_ref().unwrap().usable_bounds().rect();
        assert!(usable.contains_rect(&scene.modules[index].footprint(), 1e-4));
    }

    #[test]
    fn move_without_chassis_is_passthrough() {
        let mut scene = SceneState::new();
        scene.add_module(
            &cabinet(1.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(0.0, 0.5, 0.0),
        );
        let pos = scene.request_move(0, Position::new(42.0, 0.5, -7.0)).unwrap();
        assert_eq!(pos, Position::new(42.0, 0.5, -7.0));
    }

    #[test]
    fn rotation_swaps_footprint() {
        let mut scene = scene();
        let index = scene.add_module(
            &cabinet(2.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(0.0, 0.5, 2.0),
        );
        scene.rotate_module(index, 1);
        let (half_x, half_z) = scene.modules[index].half_extents();
        assert!((half_x - 0.5).abs() < 1e-5);
        assert!((half_z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fill_edit_clamps_and_moves_mass() {
        let mut scene = scene();
        let tank = ModuleDefinition {
            id: "tank".to_string(),
            name: "Tank".to_string(),
            library: "standard".to_string(),
            shape: ModuleShape::Cylinder,
            category: ModuleCategory::Tank,
            size: [1.0, 1.0, 1.0],
            empty_mass: 200.0,
            contains_fluid: true,
            fluid_volume_l: 1000.0,
            fill_percent: 0.0,
            fluid_density: 1000.0,
            color: "#2f6db0".to_string(),
        };
        let index = scene.add_module(&tank, &InstanceOverrides::default(), Position::new(1.0, 0.5, 2.0));

        let before = scene.analyze();
        scene.set_fill_percent(index, 250.0); // clamps to 100
        assert_eq!(scene.modules[index].module.fill_percent, 100.0);
        let after = scene.analyze();
        assert!((after.balance.total_mass - before.balance.total_mass - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn shrinking_usable_volume_pulls_modules_back_in() {
        let mut scene = scene();
        scene.add_module(
            &cabinet(1.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(1.4, 0.5, 3.4),
        );
        scene.set_usable_dims(2.0, 4.0);
        let usable = scene.chassis.as_ref().unwrap().usable_bounds().rect();
        assert!(usable.contains_rect(&scene.modules[0].footprint(), 1e-4));
    }

    #[test]
    fn usable_edit_floors_apply() {
        let mut scene = scene();
        scene.set_usable_dims(0.1, 0.2);
        let chassis = scene.chassis.as_ref().unwrap();
        assert_eq!(chassis.usable_width, usable::MIN_WIDTH);
        assert_eq!(chassis.usable_length, usable::MIN_LENGTH);
    }

    #[test]
    fn intrusion_scan_reports_overlap_depth() {
        let mut scene = scene();
        scene.settings.solid_collisions = false;
        scene.settings.magnetism = false;
        scene.walkway.visible = false;
        scene.add_module(
            &cabinet(1.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(0.1, 0.5, 0.0),
        );
        // Re-enable the walkway without reflowing: the module now intrudes.
        scene.walkway.visible = true;
        let intrusions = scene.walkway_intrusions();
        assert_eq!(intrusions.len(), 1);
        assert!(intrusions[0].depth > 0.0);

        // A reflow clears the intrusion.
        scene.reflow();
        assert!(scene.walkway_intrusions().is_empty());
    }

    #[test]
    fn intrusion_list_covers_every_overlapping_module() {
        let mut scene = scene();
        scene.settings.solid_collisions = false;
        scene.settings.magnetism = false;
        scene.walkway.visible = false;
        // One module on the corridor, one well clear of it.
        scene.add_module(
            &cabinet(1.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(0.1, 0.5, 0.0),
        );
        scene.add_module(
            &cabinet(1.0, 1.0),
            &InstanceOverrides::default(),
            Position::new(1.4, 0.5, 2.0),
        );
        scene.walkway.visible = true;
        let rect = walkway::effective_rect(&scene.walkway, scene.chassis.as_ref());
        let reported: Vec<usize> = scene
            .walkway_intrusions()
            .iter()
            .map(|i| i.module_index)
            .collect();
        for (index, module) in scene.modules.iter().enumerate() {
            assert_eq!(
                module.footprint().overlaps(&rect),
                reported.contains(&index),
                "module {index} misreported"
            );
        }
        assert_eq!(reported, vec![0]);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut scene = scene();
        assert!(scene.remove_module(3).is_none());
    }
}
