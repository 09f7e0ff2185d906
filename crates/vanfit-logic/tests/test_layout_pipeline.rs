//! Integration tests for the full layout pipeline.
//!
//! Exercises: ChassisPreset → Chassis → SceneState → placement pipeline
//! → MassBalance/AxleLoads → comparison.
//!
//! All tests are pure logic — no rendering, no persistence.

use vanfit_logic::analysis::AnalysisSnapshot;
use vanfit_logic::catalog::{
    InstanceOverrides, ModuleCategory, ModuleDefinition, ModuleShape,
};
use vanfit_logic::chassis::{validate_preset, Chassis, ChassisPreset};
use vanfit_logic::comparison::{compare, AnalysisDelta};
use vanfit_logic::geometry::Position;
use vanfit_logic::scene::SceneState;

// ── Helpers ────────────────────────────────────────────────────────────

fn preset() -> ChassisPreset {
    ChassisPreset {
        id: "box-truck".to_string(),
        name: "Box Truck 4.2m".to_string(),
        length: 7.0,
        width: 2.3,
        height: 3.0,
        body_length: None,
        body_width: None,
        body_height: None,
        usable_length: Some(4.2),
        usable_width: Some(2.2),
        usable_height: Some(2.2),
        loading_length: None,
        front_overhang: None,
        rear_overhang: None,
        usable_offset_x: None,
        usable_offset_z: Some(-0.8),
        wheelbase: 4.0,
        front_axle_offset: 1.2,
        ptac: 7500.0,
        front_axle_rating: 3200.0,
        rear_axle_rating: 5000.0,
        empty_mass: 3400.0,
    }
}

fn water_tank() -> ModuleDefinition {
    ModuleDefinition {
        id: "tank-1500".to_string(),
        name: "Water Tank 1500L".to_string(),
        library: "standard".to_string(),
        shape: ModuleShape::Box,
        category: ModuleCategory::Tank,
        size: [1.0, 1.2, 1.4],
        empty_mass: 300.0,
        contains_fluid: true,
        fluid_volume_l: 1500.0,
        fill_percent: 100.0,
        fluid_density: 1000.0,
        color: "#2f6db0".to_string(),
    }
}

fn pump() -> ModuleDefinition {
    ModuleDefinition {
        id: "pump-hd".to_string(),
        name: "Pump Unit".to_string(),
        library: "standard".to_string(),
        shape: ModuleShape::Box,
        category: ModuleCategory::Pump,
        size: [0.8, 0.9, 0.8],
        empty_mass: 260.0,
        contains_fluid: false,
        fluid_volume_l: 0.0,
        fill_percent: 0.0,
        fluid_density: 0.0,
        color: "#b03a2f".to_string(),
    }
}

fn loaded_scene() -> SceneState {
    let mut scene = SceneState::new();
    scene.set_chassis(Chassis::from_preset(&preset()));
    scene.add_module(
        &water_tank(),
        &InstanceOverrides::default(),
        Position::new(-0.6, 0.6, -2.0),
    );
    scene.add_module(
        &pump(),
        &InstanceOverrides::default(),
        Position::new(0.7, 0.45, 0.0),
    );
    scene
}

/// Containment holds unconditionally; separation is best-effort and is
/// asserted only in tests that leave the separator room to work.
fn assert_contained(scene: &SceneState) {
    let chassis = scene.chassis.as_ref().expect("scene has a chassis");
    let usable = chassis.usable_bounds().rect();
    for (i, module) in scene.modules.iter().enumerate() {
        assert!(
            usable.contains_rect(&module.footprint(), 1e-3),
            "module {i} escaped the usable volume"
        );
    }
}

// ── Pipeline coherence ─────────────────────────────────────────────────

#[test]
fn preset_is_valid_and_resolves() {
    let p = preset();
    assert!(validate_preset(&p).is_empty());
    let chassis = Chassis::from_preset(&p);
    assert!(chassis.usable_width <= chassis.width);
    assert!(chassis.usable_length <= chassis.length);
}

#[test]
fn scene_stays_contained_after_edits() {
    let mut scene = loaded_scene();
    assert_contained(&scene);

    scene.request_move(0, Position::new(10.0, 0.6, 10.0));
    assert_contained(&scene);

    scene.rotate_module(1, 1);
    assert_contained(&scene);

    scene.set_usable_dims(1.8, 3.0);
    assert_contained(&scene);
}

#[test]
fn colocated_requests_end_up_separated() {
    let mut scene = SceneState::new();
    scene.set_chassis(Chassis::from_preset(&preset()));
    scene.walkway.visible = false;
    scene.settings.magnetism = false;
    // Off-center so the push direction has room inside the usable volume.
    let target = Position::new(-0.4, 0.45, -0.8);
    scene.add_module(&pump(), &InstanceOverrides::default(), target);
    scene.add_module(&pump(), &InstanceOverrides::default(), target);
    assert_contained(&scene);
    let a = scene.modules[0].footprint();
    let b = scene.modules[1].footprint();
    assert!(a.overlap_x(&b).min(a.overlap_z(&b)) <= 0.0, "pumps still overlap");
}

#[test]
fn walkway_kept_clear_or_reported() {
    let scene = loaded_scene();
    // Every placed module must either avoid the walkway or be in the
    // intrusion list with its residual depth.
    let intrusions = scene.walkway_intrusions();
    for intrusion in &intrusions {
        assert!(intrusion.depth > 0.0);
        assert!(intrusion.module_index < scene.modules.len());
    }
}

#[test]
fn deterministic_output() {
    let a = loaded_scene();
    let b = loaded_scene();
    for (ma, mb) in a.modules.iter().zip(&b.modules) {
        assert_eq!(ma.position, mb.position);
    }
    assert_eq!(a.analyze(), b.analyze());
}

// ── Analysis over the scene ────────────────────────────────────────────

#[test]
fn loads_sum_to_total_mass() {
    let scene = loaded_scene();
    let snapshot = scene.analyze();
    assert!(
        (snapshot.loads.front_load + snapshot.loads.rear_load - snapshot.balance.total_mass)
            .abs()
            < 1e-6
    );
}

#[test]
fn draining_the_tank_lightens_the_scene() {
    let mut scene = loaded_scene();
    let before = scene.analyze();
    scene.set_fill_percent(0, 0.0);
    let after = scene.analyze();
    // 1500 L of water leaves.
    assert!((before.balance.total_mass - after.balance.total_mass - 1500.0).abs() < 1e-9);
    assert!(after.loads.gross_margin > before.loads.gross_margin);
}

#[test]
fn moving_mass_shifts_axle_loads() {
    let mut scene = loaded_scene();
    let before = scene.analyze();
    let tank_z = scene.modules[0].position.z;
    scene.request_move(0, Position::new(-0.6, 0.6, tank_z + 1.5));
    let after = scene.analyze();
    assert!((after.balance.cog_z - before.balance.cog_z).abs() > 1e-6);
    assert!(
        (after.loads.front_load - before.loads.front_load).abs() > 1e-6,
        "axle split should respond to a longitudinal move"
    );
    assert!(
        (after.loads.front_load + after.loads.rear_load - after.balance.total_mass).abs() < 1e-6
    );
}

// ── Comparison ─────────────────────────────────────────────────────────

#[test]
fn comparison_of_identical_snapshots_is_zero() {
    let scene = loaded_scene();
    let a = scene.analyze();
    assert_eq!(compare(&a, &a), AnalysisDelta::default());
}

#[test]
fn comparison_tracks_an_edit() {
    let mut scene = loaded_scene();
    let before: AnalysisSnapshot = scene.analyze();
    scene.set_fill_percent(0, 50.0);
    let after = scene.analyze();
    let delta = compare(&before, &after);
    assert!((delta.total_mass - (-750.0)).abs() < 1e-9);
    assert_eq!(compare(&before, &after), delta);
}
