//! Mass balance and axle load estimation.
//!
//! Pure functions over the chassis and the placed module list. The chassis
//! contributes its empty mass at its own center, half the chassis height up;
//! each module contributes its operational mass (empty + fluid) at its
//! current position. Axle loads follow from a lever-arm split of the total
//! mass about the two axles, so `front + rear == total` by construction.
//!
//! Degenerate inputs (no mass, zero wheelbase) yield the all-zero result —
//! the analysis never divides by zero and never errors.

use serde::{Deserialize, Serialize};

use crate::chassis::Chassis;
use crate::constants::analysis::MASS_EPSILON;
use crate::scene::ModuleInstance;

/// Total mass and center of gravity of chassis + modules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MassBalance {
    /// Total mass including the chassis (kg).
    pub total_mass: f64,
    /// Mass of the modules alone (kg).
    pub module_mass: f64,
    /// Mass-weighted center of gravity (m).
    pub cog_x: f64,
    pub cog_y: f64,
    pub cog_z: f64,
}

/// Weighted center of gravity and total mass.
pub fn compute_mass_balance(chassis: Option<&Chassis>, modules: &[ModuleInstance]) -> MassBalance {
    let mut total = 0.0;
    let mut module_mass = 0.0;
    let mut wx = 0.0;
    let mut wy = 0.0;
    let mut wz = 0.0;

    if let Some(chassis) = chassis {
        let mass = chassis.empty_mass;
        total += mass;
        wy += mass * (chassis.height as f64 / 2.0);
        // Chassis center is the world origin: no x/z contribution.
    }

    for module in modules {
        let mass = module.operational_mass();
        total += mass;
        module_mass += mass;
        wx += mass * module.position.x as f64;
        wy += mass * module.position.y as f64;
        wz += mass * module.position.z as f64;
    }

    if total <= MASS_EPSILON {
        return MassBalance::default();
    }

    MassBalance {
        total_mass: total,
        module_mass,
        cog_x: wx / total,
        cog_y: wy / total,
        cog_z: wz / total,
    }
}

/// Front/rear axle loads and margins against the ratings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxleLoads {
    pub front_load: f64,
    pub rear_load: f64,
    /// Rating minus load; negative means the axle is overloaded.
    pub front_margin: f64,
    pub rear_margin: f64,
    /// PTAC minus total mass.
    pub gross_margin: f64,
}

impl AxleLoads {
    /// True when any margin is negative.
    pub fn is_overloaded(&self) -> bool {
        self.front_margin < 0.0 || self.rear_margin < 0.0 || self.gross_margin < 0.0
    }
}

/// Lever-arm load transfer between the two axles.
pub fn compute_axle_loads(chassis: &Chassis, balance: &MassBalance) -> AxleLoads {
    let wheelbase = chassis.wheelbase as f64;
    if wheelbase <= 0.0 || balance.total_mass <= MASS_EPSILON {
        return AxleLoads::default();
    }

    let front_axle = chassis.front_axle_z() as f64;
    let rear_axle = chassis.rear_axle_z() as f64;
    let dist_front = balance.cog_z - rear_axle;
    let dist_rear = front_axle - balance.cog_z;

    let front_load = balance.total_mass * dist_rear / wheelbase;
    let rear_load = balance.total_mass * dist_front / wheelbase;

    AxleLoads {
        front_load,
        rear_load,
        front_margin: chassis.front_axle_rating - front_load,
        rear_margin: chassis.rear_axle_rating - rear_load,
        gross_margin: chassis.ptac - balance.total_mass,
    }
}

/// Mass balance and axle loads computed together from the same module set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub balance: MassBalance,
    pub loads: AxleLoads,
}

/// Full analysis pass. Without a chassis the axle loads stay all-zero.
pub fn analyze(chassis: Option<&Chassis>, modules: &[ModuleInstance]) -> AnalysisSnapshot {
    let balance = compute_mass_balance(chassis, modules);
    let loads = match chassis {
        Some(chassis) => compute_axle_loads(chassis, &balance),
        None => AxleLoads::default(),
    };
    AnalysisSnapshot { balance, loads }
}
