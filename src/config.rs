use crate::unit::{MobileKind, StructureKind};
use serde::{Deserialize, Serialize};

/// Static numbers for one structure kind.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StructureStats {
    /// Spawn cost in structure points.
    pub cost: f32,
    /// Additional cost to upgrade an existing instance.
    pub upgrade_cost: f32,
    /// Starting (and maximum) health at spawn.
    pub health: f32,
    /// Maximum health once upgraded.
    pub upgraded_health: f32,
}

/// Attack numbers for one turret tier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TurretTier {
    /// Damage dealt per frame to a unit inside range.
    pub damage: f32,
    /// Attack radius in tiles (Euclidean).
    pub range: f32,
}

/// Immutable engine configuration, threaded explicitly through every
/// constructor. The defaults carry the game season's published numbers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    pub wall: StructureStats,
    pub turret: StructureStats,
    pub factory: StructureStats,

    pub turret_base: TurretTier,
    pub turret_upgraded: TurretTier,

    /// Frames a mobile unit spends per tile moved, by kind.
    pub scout_speed: f32,
    pub demolisher_speed: f32,
    pub interceptor_speed: f32,

    /// Relative weight of turret cost in the DEFENSIVE_POWER criterion
    /// (lower means more emphasis on turrets).
    pub turret_to_wall_ratio: f32,
    /// Hard ceiling on turrets the local fortify heuristic will place in
    /// one region.
    pub max_turrets_per_region: usize,
    /// First turn on which structure upgrades are considered.
    pub min_turn_upgrade: u32,
    /// First turn on which the back regions join the fortify candidate set.
    pub min_turn_back_regions: u32,
    /// First turn on which the demolish-and-rebuild routine runs.
    pub min_turn_rebuild: u32,
    /// Health fraction below which a structure is queued for rebuild.
    pub rebuild_health_fraction: f32,
    /// Runaway guard on fortify iterations; not a correctness boundary.
    pub fortify_iteration_cap: u32,
}

impl EngineConfig {
    pub fn stats(&self, kind: StructureKind) -> &StructureStats {
        match kind {
            StructureKind::Wall => &self.wall,
            StructureKind::Turret => &self.turret,
            StructureKind::Factory => &self.factory,
        }
    }

    pub fn turret_tier(&self, upgraded: bool) -> &TurretTier {
        if upgraded {
            &self.turret_upgraded
        } else {
            &self.turret_base
        }
    }

    pub fn mobile_speed(&self, kind: MobileKind) -> f32 {
        match kind {
            MobileKind::Scout => self.scout_speed,
            MobileKind::Demolisher => self.demolisher_speed,
            MobileKind::Interceptor => self.interceptor_speed,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            wall: StructureStats {
                cost: 1.0,
                upgrade_cost: 1.0,
                health: 60.0,
                upgraded_health: 120.0,
            },
            turret: StructureStats {
                cost: 2.0,
                upgrade_cost: 4.0,
                health: 75.0,
                upgraded_health: 75.0,
            },
            factory: StructureStats {
                cost: 4.0,
                upgrade_cost: 4.0,
                health: 30.0,
                upgraded_health: 30.0,
            },
            turret_base: TurretTier {
                damage: 5.0,
                range: 2.5,
            },
            turret_upgraded: TurretTier {
                damage: 15.0,
                range: 3.5,
            },
            scout_speed: 1.0,
            demolisher_speed: 2.0,
            interceptor_speed: 4.0,
            turret_to_wall_ratio: 0.75,
            max_turrets_per_region: 5,
            min_turn_upgrade: 8,
            min_turn_back_regions: 5,
            min_turn_rebuild: 10,
            rebuild_health_fraction: 0.75,
            fortify_iteration_cap: 15,
        }
    }
}
