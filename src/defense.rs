//! One player's defense: six fixed regions tiling their half of the
//! board, cross-region selection, and the fortification and rebuild
//! control loops. The fortify loop is the only writer of new structures
//! and re-runs the full scan after every mutation rather than patching
//! region state incrementally.

use crate::config::EngineConfig;
use crate::constants::{in_arena_bounds, BOARD_SIZE, HALF_BOARD, REGION_COUNT};
use crate::error::EngineError;
use crate::grid::{
    try_spawn, try_upgrade, wall_candidates, BuildOrder, GridSnapshot, HalfBoardField, TileGrid,
};
use crate::location::Location;
use crate::region::{Region, TileState};
use crate::unit::{PlayerSide, StructureKind, UnitId};
use fnv::FnvHashMap;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Index into [`Defense::regions`].
pub type RegionId = usize;

/// Criterion for [`Defense::weakest_region`]. Every criterion is a total
/// function over the candidate set; the first candidate with a strictly
/// better score wins, so ties keep the earliest region id. That ordering
/// is deliberate and part of the engine's deterministic behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCriterion {
    /// Lowest overall health of defensive structures.
    Health,
    /// Most undefended interior tiles.
    UndefendedTiles,
    /// Lowest of prorated wall cost and weighted prorated turret cost.
    DefensivePower,
    /// Fewest turrets.
    TurretCount,
    /// Lowest average tile damage (least covered).
    AvgTileDamage,
}

#[derive(Clone, Debug)]
struct RebuildEntry {
    loc: Location,
    kind: StructureKind,
    upgraded: bool,
}

/// Static region layout: vertices and classified edges, in board
/// coordinates. All edges are axis-aligned or 45 degree diagonals.
struct RegionBlueprint {
    vertices: &'static [(u8, u8)],
    incoming: &'static [((u8, u8), (u8, u8))],
    outgoing: &'static [((u8, u8), (u8, u8))],
    breach: &'static [((u8, u8), (u8, u8))],
}

/// Lower half: two corner wedges, two forward flanks, a mid band, and the
/// back wedge (regions 4 and 5 are the "back" regions the fortify loop
/// ignores early on).
const LOWER_REGIONS: [RegionBlueprint; REGION_COUNT] = [
    RegionBlueprint {
        vertices: &[(0, 13), (7, 13), (7, 6)],
        incoming: &[((0, 13), (7, 13)), ((7, 13), (7, 6))],
        outgoing: &[],
        breach: &[((0, 13), (7, 6))],
    },
    RegionBlueprint {
        vertices: &[(27, 13), (20, 13), (20, 6)],
        incoming: &[((20, 13), (27, 13)), ((20, 13), (20, 6))],
        outgoing: &[],
        breach: &[((27, 13), (20, 6))],
    },
    RegionBlueprint {
        vertices: &[(7, 6), (7, 13), (14, 13)],
        incoming: &[((7, 6), (7, 13)), ((7, 13), (14, 13))],
        outgoing: &[((7, 6), (14, 13))],
        breach: &[],
    },
    RegionBlueprint {
        vertices: &[(13, 13), (20, 13), (20, 6)],
        incoming: &[((13, 13), (20, 13)), ((20, 13), (20, 6))],
        outgoing: &[((13, 13), (20, 6))],
        breach: &[],
    },
    RegionBlueprint {
        vertices: &[(7, 6), (13, 12), (14, 12), (20, 6)],
        incoming: &[((7, 6), (13, 12)), ((13, 12), (14, 12)), ((14, 12), (20, 6))],
        outgoing: &[((7, 6), (20, 6))],
        breach: &[],
    },
    RegionBlueprint {
        vertices: &[(7, 6), (20, 6), (14, 0), (13, 0)],
        incoming: &[((7, 6), (20, 6))],
        outgoing: &[],
        breach: &[((7, 6), (13, 0)), ((13, 0), (14, 0)), ((14, 0), (20, 6))],
    },
];

/// Upper half, mirrored across the center line.
const UPPER_REGIONS: [RegionBlueprint; REGION_COUNT] = [
    RegionBlueprint {
        vertices: &[(0, 14), (7, 14), (7, 21)],
        incoming: &[((0, 14), (7, 14)), ((7, 14), (7, 21))],
        outgoing: &[],
        breach: &[((0, 14), (7, 21))],
    },
    RegionBlueprint {
        vertices: &[(20, 14), (20, 21), (27, 14)],
        incoming: &[((20, 14), (20, 21)), ((20, 14), (27, 14))],
        outgoing: &[],
        breach: &[((20, 21), (27, 14))],
    },
    RegionBlueprint {
        vertices: &[(7, 14), (7, 21), (14, 14)],
        incoming: &[((7, 14), (14, 14)), ((7, 14), (7, 21))],
        outgoing: &[((7, 21), (14, 14))],
        breach: &[],
    },
    RegionBlueprint {
        vertices: &[(13, 14), (20, 21), (20, 14)],
        incoming: &[((13, 14), (20, 14)), ((20, 14), (20, 21))],
        outgoing: &[((13, 14), (20, 21))],
        breach: &[],
    },
    RegionBlueprint {
        vertices: &[(7, 21), (13, 15), (14, 15), (20, 21)],
        incoming: &[((7, 21), (13, 15)), ((13, 15), (14, 15)), ((14, 15), (20, 21))],
        outgoing: &[((7, 21), (20, 21))],
        breach: &[],
    },
    RegionBlueprint {
        vertices: &[(7, 21), (13, 27), (14, 27), (20, 21)],
        incoming: &[((7, 21), (20, 21))],
        outgoing: &[],
        breach: &[((7, 21), (13, 27)), ((13, 27), (14, 27)), ((14, 27), (20, 21))],
    },
];

fn to_locations(points: &[(u8, u8)]) -> Vec<Location> {
    points.iter().map(|&(x, y)| Location::from_xy(x, y)).collect()
}

fn to_edges(edges: &[((u8, u8), (u8, u8))]) -> Vec<(Location, Location)> {
    edges
        .iter()
        .map(|&((ax, ay), (bx, by))| (Location::from_xy(ax, ay), Location::from_xy(bx, by)))
        .collect()
}

pub struct Defense {
    side: PlayerSide,
    config: EngineConfig,
    regions: Vec<Region>,
    /// Coordinate-to-region lookup, half-local rows. Regions share
    /// boundary tiles; the highest region index claiming a tile wins,
    /// deterministically.
    coordinate_regions: TileGrid<Option<u8>>,
    /// Damage aggregated over the whole half from the deduplicated turret
    /// inventory.
    damage_field: HalfBoardField,
    /// Structures on this half, deduplicated by tile rather than by
    /// region (regions share boundary tiles).
    inventory: FnvHashMap<StructureKind, Vec<UnitId>>,
    rebuild_queue: VecDeque<RebuildEntry>,
    last_update_generation: Option<u64>,
}

impl Defense {
    /// Build the six fixed regions for one player's half. Runs the full
    /// rasterization, so this is meant to happen once at match start.
    pub fn new(side: PlayerSide, config: EngineConfig) -> Result<Defense, EngineError> {
        let damage_field = HalfBoardField::new(side);
        let blueprints = match side {
            PlayerSide::One => &LOWER_REGIONS,
            PlayerSide::Two => &UPPER_REGIONS,
        };

        let mut regions = Vec::with_capacity(REGION_COUNT);
        for blueprint in blueprints {
            regions.push(Region::new(
                side,
                to_locations(blueprint.vertices),
                to_edges(blueprint.incoming),
                to_edges(blueprint.outgoing),
                to_edges(blueprint.breach),
                Some(&damage_field),
            )?);
        }

        let mut coordinate_regions =
            TileGrid::new(BOARD_SIZE as usize, HALF_BOARD as usize, None);
        for (index, region) in regions.iter().enumerate() {
            for loc in region.bounds().iter() {
                if region.tile_state(loc) == TileState::Outside {
                    continue;
                }
                if let Some(row) = side.local_row(loc.y()) {
                    coordinate_regions.set(loc.x() as usize, row as usize, Some(index as u8));
                }
            }
        }

        let mut inventory = FnvHashMap::default();
        for kind in StructureKind::ALL {
            inventory.insert(kind, Vec::new());
        }

        Ok(Defense {
            side,
            config,
            regions,
            coordinate_regions,
            damage_field,
            inventory,
            rebuild_queue: VecDeque::new(),
            last_update_generation: None,
        })
    }

    pub fn side(&self) -> PlayerSide {
        self.side
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    /// The region claiming a coordinate, `None` off this half.
    pub fn region_of(&self, loc: Location) -> Option<RegionId> {
        let row = self.side.local_row(loc.y())?;
        (*self.coordinate_regions.get(loc.x() as usize, row as usize)).map(|i| i as RegionId)
    }

    /// Aggregated damage per frame at a coordinate on this half.
    pub fn damage_at(&self, loc: Location) -> f32 {
        self.damage_field.get(loc)
    }

    pub fn inventory_of(&self, kind: StructureKind) -> &[UnitId] {
        self.inventory.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Push a fresh grid snapshot through every region, then rebuild the
    /// deduplicated inventory and the half-board damage field. Skipped
    /// entirely when the grid generation has not moved since the last
    /// update.
    pub fn update(&mut self, grid: &GridSnapshot) {
        if self.last_update_generation == Some(grid.generation()) {
            return;
        }
        for region in self.regions.iter_mut() {
            region.update_structures(grid, &self.config);
        }
        self.rebuild_inventory(grid);
        self.rebuild_damage_field(grid);
        self.last_update_generation = Some(grid.generation());
    }

    fn rebuild_inventory(&mut self, grid: &GridSnapshot) {
        for list in self.inventory.values_mut() {
            list.clear();
        }
        for (x, row) in (0..BOARD_SIZE).cartesian_product(0..HALF_BOARD) {
            let y = match self.side {
                PlayerSide::One => row,
                PlayerSide::Two => row + HALF_BOARD,
            };
            if !in_arena_bounds(x as i16, y as i16) {
                continue;
            }
            if let Some((id, unit)) = grid.structure_at(Location::from_xy(x, y)) {
                self.inventory.entry(unit.kind).or_default().push(id);
            }
        }
    }

    fn rebuild_damage_field(&mut self, grid: &GridSnapshot) {
        self.damage_field.zero();
        let turrets = self
            .inventory
            .get(&StructureKind::Turret)
            .cloned()
            .unwrap_or_default();
        for id in turrets {
            let Some(turret) = grid.get(id) else { continue };
            let tier = self.config.turret_tier(turret.upgraded);
            for loc in grid.locations_in_range(turret.loc, tier.range) {
                self.damage_field.add(loc, tier.damage);
            }
        }
    }

    /// Total structure cost on this half, over the tile-deduplicated
    /// inventory.
    pub fn total_cost(&self, grid: &GridSnapshot, health_prorated: bool, defensive_only: bool) -> f32 {
        let mut cost = 0.0;
        for kind in StructureKind::ALL {
            if defensive_only && kind == StructureKind::Factory {
                continue;
            }
            for id in self.inventory_of(kind) {
                if let Some(unit) = grid.get(*id) {
                    let base = self.config.stats(kind).cost;
                    cost += if health_prorated {
                        unit.health_fraction() * base
                    } else {
                        base
                    };
                }
            }
        }
        cost
    }

    /// The candidate scoring worst under `criterion`. The first candidate
    /// with a strictly better score wins; later equal scores do not
    /// override it.
    pub fn weakest_region(
        &self,
        criterion: SelectionCriterion,
        candidates: &[RegionId],
    ) -> Result<RegionId, EngineError> {
        let (&first, rest) = candidates
            .split_first()
            .ok_or(EngineError::EmptyCandidateSet)?;
        let mut best = first;
        let mut best_score = self.criterion_score(criterion, first)?;
        for &id in rest {
            let score = self.criterion_score(criterion, id)?;
            if score < best_score {
                best = id;
                best_score = score;
            }
        }
        Ok(best)
    }

    fn criterion_score(
        &self,
        criterion: SelectionCriterion,
        id: RegionId,
    ) -> Result<f32, EngineError> {
        let stats = self
            .regions
            .get(id)
            .ok_or(EngineError::UnknownRegion(id))?
            .stats();
        Ok(match criterion {
            SelectionCriterion::Health => stats.health_defensive,
            SelectionCriterion::UndefendedTiles => -(stats.undefended_tiles.len() as f32),
            SelectionCriterion::DefensivePower => stats
                .prorated_wall_cost
                .min(stats.prorated_turret_cost * self.config.turret_to_wall_ratio),
            SelectionCriterion::TurretCount => stats.turret_count as f32,
            SelectionCriterion::AvgTileDamage => stats.avg_tile_damage,
        })
    }

    /// Spend down to `resource_floor`, each iteration fortifying the
    /// weakest region and re-scanning. Back regions join the candidate
    /// set only after the configured turn. The iteration cap is a runaway
    /// guard, not a correctness boundary; the loop also stops as soon as
    /// an iteration makes no placement at all.
    pub fn fortify(
        &mut self,
        grid: &mut GridSnapshot,
        balance: &mut f32,
        turn: u32,
        criterion: SelectionCriterion,
        resource_floor: f32,
    ) -> Result<Vec<BuildOrder>, EngineError> {
        self.update(grid);
        let mut orders = Vec::new();
        let mut iterations = 0;
        while *balance > resource_floor && iterations < self.config.fortify_iteration_cap {
            let candidate_count = if turn > self.config.min_turn_back_regions {
                REGION_COUNT
            } else {
                4
            };
            let candidates: Vec<RegionId> = (0..candidate_count).collect();
            let weakest = self.weakest_region(criterion, &candidates)?;
            debug!(
                "fortify iteration {}: weakest region {} with {:.1} points left",
                iterations, weakest, balance
            );
            let generation_before = grid.generation();
            self.regions[weakest].fortify_step(grid, balance, turn, &self.config, &mut orders);
            self.update(grid);
            iterations += 1;
            if grid.generation() == generation_before {
                debug!("fortify: nothing left to place, stopping after {} iterations", iterations);
                break;
            }
        }
        Ok(orders)
    }

    /// Demolish-and-rebuild of structures under the health threshold.
    ///
    /// First drains the queue oldest-first while resources allow,
    /// respawning each structure at full health at its old coordinate
    /// (re-upgrading if it was upgraded, and re-placing the shield walls
    /// around a rebuilt turret). Then scans the inventory and queues
    /// whatever dropped below the threshold, removing it from the grid.
    pub fn rebuild(
        &mut self,
        grid: &mut GridSnapshot,
        balance: &mut f32,
        turn: u32,
    ) -> Vec<BuildOrder> {
        let mut orders = Vec::new();
        if turn <= self.config.min_turn_rebuild {
            return orders;
        }
        self.update(grid);

        loop {
            let Some(entry) = self.rebuild_queue.front().cloned() else {
                break;
            };
            let mut cost = self.config.stats(entry.kind).cost;
            if entry.upgraded {
                cost += self.config.stats(entry.kind).upgrade_cost;
            }
            if *balance < cost {
                break;
            }
            self.rebuild_queue.pop_front();
            if try_spawn(
                grid,
                balance,
                entry.kind,
                entry.loc,
                self.side,
                &self.config,
                &mut orders,
            ) {
                if entry.upgraded {
                    try_upgrade(grid, balance, entry.loc, &self.config, &mut orders);
                }
                if entry.kind == StructureKind::Turret {
                    for candidate in wall_candidates(entry.loc, self.side).into_iter().flatten() {
                        try_spawn(
                            grid,
                            balance,
                            StructureKind::Wall,
                            candidate,
                            self.side,
                            &self.config,
                            &mut orders,
                        );
                    }
                }
            }
        }

        let mut pending = Vec::new();
        for kind in [StructureKind::Turret, StructureKind::Wall] {
            for id in self.inventory_of(kind) {
                if let Some(unit) = grid.get(*id) {
                    if unit.health_fraction() < self.config.rebuild_health_fraction {
                        pending.push((unit.loc, kind, unit.upgraded));
                    }
                }
            }
        }
        for (loc, kind, upgraded) in pending {
            debug!("rebuild: queueing {:?} at {:?} for demolition", kind, loc);
            self.rebuild_queue.push_back(RebuildEntry { loc, kind, upgraded });
            if grid.remove(loc).is_some() {
                orders.push(BuildOrder::Remove { loc });
            }
        }

        self.update(grid);
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(x: u8, y: u8) -> Location {
        Location::from_xy(x, y)
    }

    fn defense() -> Defense {
        Defense::new(PlayerSide::One, EngineConfig::default()).unwrap()
    }

    #[test]
    fn six_regions_per_half() {
        let ours = defense();
        assert_eq!(ours.regions().len(), REGION_COUNT);
        let theirs = Defense::new(PlayerSide::Two, EngineConfig::default()).unwrap();
        assert_eq!(theirs.regions().len(), REGION_COUNT);
    }

    #[test]
    fn coordinate_lookup() {
        let ours = defense();
        assert_eq!(ours.region_of(loc(0, 13)), Some(0));
        assert_eq!(ours.region_of(loc(27, 13)), Some(1));
        assert_eq!(ours.region_of(loc(13, 0)), Some(5));
        // Shared boundary tiles go to the highest region index.
        assert_eq!(ours.region_of(loc(7, 10)), Some(2));
        assert_eq!(ours.region_of(loc(13, 13)), Some(3));
        // The enemy half is not ours to claim.
        assert_eq!(ours.region_of(loc(13, 14)), None);

        let theirs = Defense::new(PlayerSide::Two, EngineConfig::default()).unwrap();
        assert_eq!(theirs.region_of(loc(0, 14)), Some(0));
        assert_eq!(theirs.region_of(loc(13, 27)), Some(5));
        assert_eq!(theirs.region_of(loc(13, 13)), None);
    }

    #[test]
    fn shared_boundary_tiles_agree_after_scan() {
        let config = EngineConfig::default();
        let mut grid = GridSnapshot::new();
        let shared = loc(7, 10);
        let id = grid
            .place(StructureKind::Wall, shared, PlayerSide::One, &config)
            .unwrap();

        let mut ours = defense();
        ours.update(&grid);

        // Regions 0 and 2 share the x = 7 edge.
        assert_eq!(ours.regions()[0].tile_state(shared), TileState::Boundary);
        assert_eq!(ours.regions()[2].tile_state(shared), TileState::Boundary);
        assert_eq!(ours.regions()[0].occupant(shared), Some(id));
        assert_eq!(ours.regions()[2].occupant(shared), Some(id));
        assert_eq!(ours.regions()[0].stats().wall_count, 1);
        assert_eq!(ours.regions()[2].stats().wall_count, 1);
        // The defense-level inventory counts the tile once.
        assert_eq!(ours.inventory_of(StructureKind::Wall).len(), 1);
    }

    #[test]
    fn weakest_by_health_is_never_dominated() {
        let config = EngineConfig::default();
        let mut grid = GridSnapshot::new();
        grid.place(StructureKind::Turret, loc(24, 12), PlayerSide::One, &config)
            .unwrap();
        let mut ours = defense();
        ours.update(&grid);

        let candidates: Vec<RegionId> = (0..4).collect();
        let weakest = ours
            .weakest_region(SelectionCriterion::Health, &candidates)
            .unwrap();
        let weakest_health = ours.regions()[weakest].stats().health_defensive;
        for &id in &candidates {
            assert!(weakest_health <= ours.regions()[id].stats().health_defensive);
        }
        // Region 1 holds the only turret; ties among the empty regions
        // resolve to the first candidate.
        assert_eq!(weakest, 0);
    }

    #[test]
    fn empty_and_unknown_candidates_are_errors() {
        let ours = defense();
        assert_eq!(
            ours.weakest_region(SelectionCriterion::Health, &[]),
            Err(EngineError::EmptyCandidateSet)
        );
        assert_eq!(
            ours.weakest_region(SelectionCriterion::Health, &[99]),
            Err(EngineError::UnknownRegion(99))
        );
    }

    #[test]
    fn fortify_at_the_floor_is_a_no_op() {
        let mut grid = GridSnapshot::new();
        let mut ours = defense();
        let mut balance = 10.0;
        let orders = ours
            .fortify(
                &mut grid,
                &mut balance,
                1,
                SelectionCriterion::TurretCount,
                10.0,
            )
            .unwrap();
        assert!(orders.is_empty());
        assert_eq!(balance, 10.0);
    }

    #[test]
    fn fortify_seeds_each_front_region_with_a_turret() {
        let mut grid = GridSnapshot::new();
        let mut ours = defense();
        let mut balance = 10.0;
        let orders = ours
            .fortify(
                &mut grid,
                &mut balance,
                1,
                SelectionCriterion::TurretCount,
                0.0,
            )
            .unwrap();

        // 10 points buy five turrets: one at the midpoint of each front
        // region's first incoming edge, then a second in region 0.
        let expected_first_four = [loc(4, 13), loc(24, 13), loc(7, 10), loc(17, 13)];
        for (order, expected) in orders.iter().zip(expected_first_four) {
            assert_eq!(
                order,
                &BuildOrder::Spawn {
                    kind: StructureKind::Turret,
                    loc: expected
                }
            );
        }
        assert_eq!(orders.len(), 5);
        assert_eq!(balance, 0.0);
        for id in 0..4 {
            assert!(ours.regions()[id].stats().turret_count >= 1);
        }
        // Back regions stay untouched this early.
        assert_eq!(ours.regions()[4].stats().turret_count, 0);
        assert_eq!(ours.regions()[5].stats().turret_count, 0);
    }

    #[test]
    fn rebuild_cycles_a_damaged_turret() {
        let config = EngineConfig::default();
        let mut grid = GridSnapshot::new();
        let spot = loc(4, 12);
        grid.place(StructureKind::Turret, spot, PlayerSide::One, &config)
            .unwrap();
        grid.set_health(spot, 30.0).unwrap();

        let mut ours = defense();
        let mut balance = 20.0;

        // Below the turn gate nothing happens.
        let orders = ours.rebuild(&mut grid, &mut balance, 5);
        assert!(orders.is_empty());
        assert!(grid.structure_at(spot).is_some());

        // First pass queues and demolishes.
        let orders = ours.rebuild(&mut grid, &mut balance, 11);
        assert_eq!(orders, vec![BuildOrder::Remove { loc: spot }]);
        assert!(grid.structure_at(spot).is_none());

        // Second pass respawns at full health and shields it with walls.
        let orders = ours.rebuild(&mut grid, &mut balance, 12);
        assert!(orders.contains(&BuildOrder::Spawn {
            kind: StructureKind::Turret,
            loc: spot
        }));
        let (_, turret) = grid.structure_at(spot).unwrap();
        assert_eq!(turret.health, 75.0);
        let wall_spawns = orders
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    BuildOrder::Spawn {
                        kind: StructureKind::Wall,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(wall_spawns, 3);
    }

    #[test]
    fn half_board_damage_field_aggregates_turrets() {
        let config = EngineConfig::default();
        let mut grid = GridSnapshot::new();
        grid.place(StructureKind::Turret, loc(10, 8), PlayerSide::One, &config)
            .unwrap();
        grid.place(StructureKind::Turret, loc(14, 8), PlayerSide::One, &config)
            .unwrap();

        let mut ours = defense();
        ours.update(&grid);
        // (12, 8) sits within 2.5 of both turrets; the turret tiles
        // themselves are covered only by their own range.
        assert_eq!(ours.damage_at(loc(12, 8)), 10.0);
        assert_eq!(ours.damage_at(loc(10, 8)), 5.0);
        assert_eq!(ours.damage_at(loc(20, 2)), 0.0);
    }

    #[test]
    fn total_cost_over_deduplicated_inventory() {
        let config = EngineConfig::default();
        let mut grid = GridSnapshot::new();
        // A wall on a tile shared by regions 0 and 2, plus a factory.
        grid.place(StructureKind::Wall, loc(7, 10), PlayerSide::One, &config)
            .unwrap();
        grid.place(StructureKind::Factory, loc(13, 2), PlayerSide::One, &config)
            .unwrap();

        let mut ours = defense();
        ours.update(&grid);
        assert!((ours.total_cost(&grid, false, false) - 5.0).abs() < 1e-6);
        assert!((ours.total_cost(&grid, false, true) - 1.0).abs() < 1e-6);
    }
}
