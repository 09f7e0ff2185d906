//! VanFit Headless Validation Harness
//!
//! Validates the pure placement and analysis logic without a UI.
//! Runs entirely in-process — no rendering, no file dialogs.
//!
//! Usage:
//!   cargo run -p vanfit-simtest
//!   cargo run -p vanfit-simtest -- --verbose

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vanfit_logic::catalog::{
    InstanceOverrides, ModuleCategory, ModuleDefinition, ModuleShape,
};
use vanfit_logic::chassis::{validate_preset, Chassis, ChassisPreset};
use vanfit_logic::comparison::{compare, AnalysisDelta};
use vanfit_logic::geometry::Position;
use vanfit_logic::scene::SceneState;
use vanfit_logic::walkway;

// ── Chassis presets (same JSON the editor ships) ────────────────────────
const PRESETS_JSON: &str = include_str!("../../../data/chassis_presets.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail,
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== VanFit Validation Harness ===\n");

    let mut results = Vec::new();

    // 1. Chassis preset catalog
    let presets = load_presets(&mut results);

    // 2. Placement pipeline invariants
    results.extend(validate_placement(&presets, verbose));

    // 3. Randomized placement sweeps
    results.extend(validate_random_sweeps(&presets, verbose));

    // 4. Mass balance & axle loads
    results.extend(validate_analysis(&presets, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Shared fixtures ─────────────────────────────────────────────────────

fn tank_definition() -> ModuleDefinition {
    ModuleDefinition {
        id: "tank-1000".to_string(),
        name: "Water Tank 1000L".to_string(),
        library: "harness".to_string(),
        shape: ModuleShape::Box,
        category: ModuleCategory::Tank,
        size: [0.9, 1.1, 1.2],
        empty_mass: 240.0,
        contains_fluid: true,
        fluid_volume_l: 1000.0,
        fill_percent: 100.0,
        fluid_density: 1000.0,
        color: "#2f6db0".to_string(),
    }
}

fn cabinet_definition() -> ModuleDefinition {
    ModuleDefinition {
        id: "cabinet-std".to_string(),
        name: "Storage Cabinet".to_string(),
        library: "harness".to_string(),
        shape: ModuleShape::Box,
        category: ModuleCategory::Cabinet,
        size: [0.6, 1.8, 0.5],
        empty_mass: 85.0,
        contains_fluid: false,
        fluid_volume_l: 0.0,
        fill_percent: 0.0,
        fluid_density: 0.0,
        color: "#6b6b6b".to_string(),
    }
}

fn scene_on(preset: &ChassisPreset) -> SceneState {
    let mut scene = SceneState::new();
    scene.set_chassis(Chassis::from_preset(preset));
    scene
}

fn contained(scene: &SceneState) -> bool {
    let Some(chassis) = &scene.chassis else {
        return true;
    };
    let usable = chassis.usable_bounds().rect();
    scene
        .modules
        .iter()
        .all(|m| usable.contains_rect(&m.footprint(), 1e-3))
}

// ── 1. Chassis presets ──────────────────────────────────────────────────

fn load_presets(results: &mut Vec<TestResult>) -> Vec<ChassisPreset> {
    println!("--- Chassis Presets ---");

    let presets: Vec<ChassisPreset> = match serde_json::from_str(PRESETS_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::new(
                "presets_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return Vec::new();
        }
    };

    results.push(TestResult::new(
        "presets_not_empty",
        !presets.is_empty(),
        format!("{} presets", presets.len()),
    ));

    for preset in &presets {
        let errors = validate_preset(preset);
        results.push(TestResult::new(
            &format!("preset_valid_{}", preset.id),
            errors.is_empty(),
            if errors.is_empty() {
                "ok".to_string()
            } else {
                format!("{:?}", errors)
            },
        ));

        let chassis = Chassis::from_preset(preset);
        let inside = chassis.usable_width <= chassis.width + 1e-4
            && chassis.usable_length <= chassis.length + 1e-4;
        results.push(TestResult::new(
            &format!("preset_usable_inside_{}", preset.id),
            inside,
            format!(
                "usable {:.2}×{:.2} in {:.2}×{:.2}",
                chassis.usable_width, chassis.usable_length, chassis.width, chassis.length
            ),
        ));

        let axles_inside = chassis.front_axle_z() < chassis.length / 2.0
            && chassis.rear_axle_z() > -chassis.length / 2.0;
        results.push(TestResult::new(
            &format!("preset_axles_inside_{}", preset.id),
            axles_inside,
            format!(
                "front {:.2}, rear {:.2}",
                chassis.front_axle_z(),
                chassis.rear_axle_z()
            ),
        ));
    }

    presets
}

// ── 2. Placement pipeline ───────────────────────────────────────────────

fn validate_placement(presets: &[ChassisPreset], _verbose: bool) -> Vec<TestResult> {
    println!("--- Placement Pipeline ---");
    let mut results = Vec::new();
    let Some(preset) = presets.first() else {
        return results;
    };

    // Oversized module degenerates to centering, never escapes.
    {
        let mut scene = scene_on(preset);
        scene.walkway.visible = false;
        let mut wide = cabinet_definition();
        wide.size = [10.0, 1.0, 10.0];
        scene.add_module(&wide, &InstanceOverrides::default(), Position::new(5.0, 0.5, 5.0));
        let usable = scene.chassis.as_ref().unwrap().usable_bounds();
        let m = &scene.modules[0];
        let centered = (m.position.x - usable.center_x).abs() < 1e-4
            && (m.position.z - usable.center_z).abs() < 1e-4;
        results.push(TestResult::new(
            "oversized_module_centers",
            centered,
            format!("at ({:.2}, {:.2})", m.position.x, m.position.z),
        ));
    }

    // Magnetism: flush snap within threshold, no snap outside it. Runs
    // along z on the longest preset so nothing clamps mid-check.
    {
        let long_preset = presets
            .iter()
            .max_by(|a, b| a.length.total_cmp(&b.length))
            .unwrap_or(preset);
        let mut scene = scene_on(long_preset);
        scene.walkway.visible = false;
        scene.settings.solid_collisions = false;
        scene.settings.snap_distance = 0.1;
        let unit = ModuleDefinition {
            size: [1.0, 1.0, 1.0],
            ..cabinet_definition()
        };
        let usable = scene.chassis.as_ref().unwrap().usable_bounds();
        let x = usable.center_x;
        let anchor_z = usable.center_z - 1.3;
        scene.add_module(&unit, &InstanceOverrides::default(), Position::new(x, 0.5, anchor_z));
        let anchor_z = scene.modules[0].position.z;
        let idx = scene.add_module(
            &unit,
            &InstanceOverrides::default(),
            Position::new(x, 0.5, anchor_z + 1.05),
        );
        let snapped = (scene.modules[idx].position.z - (anchor_z + 1.0)).abs() < 1e-4;
        results.push(TestResult::new(
            "magnet_snaps_flush",
            snapped,
            format!("z = {:.4}", scene.modules[idx].position.z),
        ));

        scene.request_move(idx, Position::new(x, 0.5, anchor_z + 1.5));
        let unsnapped = (scene.modules[idx].position.z - (anchor_z + 1.5)).abs() < 1e-4;
        results.push(TestResult::new(
            "magnet_ignores_far_guides",
            unsnapped,
            format!("z = {:.4}", scene.modules[idx].position.z),
        ));
    }

    // Walkway: a module dropped on the corridor ends clear or is reported.
    {
        let mut scene = scene_on(preset);
        scene.settings.magnetism = false;
        scene.add_module(
            &cabinet_definition(),
            &InstanceOverrides::default(),
            Position::new(0.0, 0.9, scene.chassis.as_ref().unwrap().usable_offset_z),
        );
        let rect = walkway::effective_rect(&scene.walkway, scene.chassis.as_ref());
        let intrusions = scene.walkway_intrusions();
        let reported: Vec<usize> = intrusions.iter().map(|i| i.module_index).collect();
        // Every module overlapping the corridor must be in the intrusion list.
        let unreported = scene
            .modules
            .iter()
            .enumerate()
            .any(|(i, m)| !reported.contains(&i) && m.footprint().overlaps(&rect));
        results.push(TestResult::new(
            "walkway_cleared_or_reported",
            !unreported && contained(&scene),
            format!("{} intrusions", intrusions.len()),
        ));
    }

    results
}

// ── 3. Randomized sweeps ────────────────────────────────────────────────

fn validate_random_sweeps(presets: &[ChassisPreset], verbose: bool) -> Vec<TestResult> {
    println!("--- Randomized Sweeps ---");
    let mut results = Vec::new();

    for preset in presets {
        let mut escaped = 0u32;
        let mut load_sum_errors = 0u32;
        let mut bad_depths = 0u32;

        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut scene = scene_on(preset);

            for _ in 0..4 {
                let def = if rng.gen_bool(0.5) {
                    tank_definition()
                } else {
                    cabinet_definition()
                };
                let request = Position::new(
                    rng.gen_range(-4.0..4.0),
                    rng.gen_range(0.0..2.0),
                    rng.gen_range(-5.0..5.0),
                );
                scene.add_module(&def, &InstanceOverrides::default(), request);
                if !contained(&scene) {
                    escaped += 1;
                }
            }

            let snapshot = scene.analyze();
            let sum = snapshot.loads.front_load + snapshot.loads.rear_load;
            if (sum - snapshot.balance.total_mass).abs() > 1e-6 {
                load_sum_errors += 1;
            }
            if scene.walkway_intrusions().iter().any(|i| i.depth <= 0.0) {
                bad_depths += 1;
            }

            if verbose {
                println!(
                    "  [{}] seed {}: {} modules, total {:.0} kg",
                    preset.id,
                    seed,
                    scene.modules.len(),
                    snapshot.balance.total_mass
                );
            }
        }

        results.push(TestResult::new(
            &format!("sweep_containment_{}", preset.id),
            escaped == 0,
            format!("{} escapes over 20 seeds", escaped),
        ));
        results.push(TestResult::new(
            &format!("sweep_load_sum_{}", preset.id),
            load_sum_errors == 0,
            format!("{} mismatches", load_sum_errors),
        ));
        results.push(TestResult::new(
            &format!("sweep_intrusion_depths_{}", preset.id),
            bad_depths == 0,
            format!("{} non-positive depths", bad_depths),
        ));
    }

    results
}

// ── 4. Analysis ─────────────────────────────────────────────────────────

fn validate_analysis(presets: &[ChassisPreset], _verbose: bool) -> Vec<TestResult> {
    println!("--- Mass Balance & Axle Loads ---");
    let mut results = Vec::new();
    let Some(preset) = presets.first() else {
        return results;
    };

    // Fill-level round trip: draining a 1000 L tank removes 1000 kg.
    {
        let mut scene = scene_on(preset);
        let idx = scene.add_module(
            &tank_definition(),
            &InstanceOverrides::default(),
            Position::new(0.0, 0.6, 0.0),
        );
        let full = scene.analyze();
        scene.set_fill_percent(idx, 0.0);
        let empty = scene.analyze();
        let delta = full.balance.total_mass - empty.balance.total_mass;
        results.push(TestResult::new(
            "fluid_mass_round_trip",
            (delta - 1000.0).abs() < 1e-6,
            format!("drained {:.1} kg", delta),
        ));
    }

    // Degenerate wheelbase yields the zero result instead of dividing.
    {
        let mut preset = preset.clone();
        preset.wheelbase = 0.0;
        let mut scene = scene_on(&preset);
        scene.add_module(
            &tank_definition(),
            &InstanceOverrides::default(),
            Position::new(0.0, 0.6, 0.0),
        );
        let snapshot = scene.analyze();
        let zeroed = snapshot.loads.front_load == 0.0 && snapshot.loads.rear_load == 0.0;
        results.push(TestResult::new(
            "zero_wheelbase_zero_result",
            zeroed && !snapshot.loads.is_overloaded(),
            format!("front {:.1}, rear {:.1}", snapshot.loads.front_load, snapshot.loads.rear_load),
        ));
    }

    // Comparison is a pure function: repeated diffs agree, self-diff is zero.
    {
        let mut scene = scene_on(preset);
        let idx = scene.add_module(
            &tank_definition(),
            &InstanceOverrides::default(),
            Position::new(0.0, 0.6, -0.5),
        );
        let before = scene.analyze();
        scene.set_fill_percent(idx, 40.0);
        let after = scene.analyze();
        let repeatable = compare(&before, &after) == compare(&before, &after);
        let self_zero = compare(&before, &before) == AnalysisDelta::default();
        results.push(TestResult::new(
            "comparison_deterministic",
            repeatable && self_zero,
            format!("Δmass {:.1} kg", compare(&before, &after).total_mass),
        ));
    }

    results
}
