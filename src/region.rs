//! Polygonal board regions.
//!
//! A region rasterizes its polygon once at construction into a tri-state
//! tile classification, then tracks the structures standing on its tiles,
//! the damage field those structures project, and a table of paths between
//! its boundary tiles. Recomputation is gated on the grid's generation
//! counter: a scan stamps the generation it saw, and path queries are only
//! valid while their stamp matches the latest scan.

use crate::config::EngineConfig;
use crate::constants::NEIGHBORS_4;
use crate::error::EngineError;
use crate::geometry::{edge_lattice_points, point_in_polygon, polygon_area2, Bounds};
use crate::grid::{try_spawn, try_upgrade, wall_candidates, BuildOrder, GridSnapshot, HalfBoardField, TileGrid};
use crate::location::Location;
use crate::unit::{MobileKind, PlayerSide, StructureKind, UnitId};
use bitflags::bitflags;
use fnv::FnvHashMap;
use log::{debug, trace};
use serde::Serialize;
use std::collections::VecDeque;

bitflags! {
    /// Why a boundary segment exists: entrance for enemy mobile units,
    /// exit, or a segment where a breach scores against the owner. A
    /// lattice point on several classified edges carries the union.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EdgeRole: u8 {
        const INCOMING = 1;
        const OUTGOING = 2;
        const BREACH = 4;
    }
}

/// Tri-state tile classification, computed once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    Outside,
    Boundary,
    Interior,
}

/// One discovered path per (entrance, exit) pair; an absent entry means
/// unreachable under the current structure layout.
pub type PathTable = FnvHashMap<Location, FnvHashMap<Location, Vec<Location>>>;

/// Aggregate statistics cached after each structure scan.
///
/// Costs are prorated by remaining health; the `defensive` variants
/// exclude factories.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegionStats {
    pub avg_tile_damage: f32,
    pub cost_all: f32,
    pub cost_defensive: f32,
    pub health_all: f32,
    pub health_defensive: f32,
    pub prorated_wall_cost: f32,
    pub prorated_turret_cost: f32,
    pub undefended_tiles: Vec<Location>,
    pub turret_count: usize,
    pub wall_count: usize,
    pub factory_count: usize,
}

/// Sentinel for "paths never computed"; grid generations start at 1 and a
/// never-scanned region sits at 0, so this can match neither.
const PATHS_NEVER: u64 = u64::MAX;

pub struct Region {
    side: PlayerSide,
    vertices: Vec<Location>,
    bounds: Bounds,
    tile_state: TileGrid<TileState>,
    occupant: TileGrid<Option<UnitId>>,
    boundary_roles: FnvHashMap<Location, EdgeRole>,
    incoming_edges: Vec<(Location, Location)>,
    outgoing_edges: Vec<(Location, Location)>,
    breach_edges: Vec<(Location, Location)>,
    incoming_edge_points: Vec<Vec<Location>>,
    interior_count: usize,
    damage_field: TileGrid<f32>,
    units: FnvHashMap<StructureKind, Vec<UnitId>>,
    path_table: PathTable,
    scan_generation: u64,
    paths_generation: u64,
    stats: RegionStats,
}

impl Region {
    /// Rasterize a polygonal region. Expensive; meant to run once at match
    /// start. Fails fast on degenerate polygons and on edges that are not
    /// axis-aligned or 45 degree diagonals.
    ///
    /// `seed_field` optionally pre-populates the damage field from an
    /// already-accumulated half-board view (copied, never aliased).
    pub fn new(
        side: PlayerSide,
        vertices: Vec<Location>,
        incoming_edges: Vec<(Location, Location)>,
        outgoing_edges: Vec<(Location, Location)>,
        breach_edges: Vec<(Location, Location)>,
        seed_field: Option<&HalfBoardField>,
    ) -> Result<Region, EngineError> {
        if vertices.len() < 3 || polygon_area2(&vertices) == 0 {
            return Err(EngineError::DegeneratePolygon(vertices.len()));
        }
        let bounds = Bounds::of(&vertices).ok_or(EngineError::DegeneratePolygon(0))?;

        let mut tile_state = TileGrid::new(bounds.width(), bounds.height(), TileState::Outside);
        let mut boundary_roles: FnvHashMap<Location, EdgeRole> = FnvHashMap::default();

        // Boundary first: every perimeter edge, then role flags from the
        // classified edge sets.
        let n = vertices.len();
        for i in 0..n {
            for loc in edge_lattice_points(vertices[i], vertices[(i + 1) % n])? {
                let (lx, ly) = bounds.local(loc);
                tile_state.set(lx, ly, TileState::Boundary);
                boundary_roles.entry(loc).or_insert(EdgeRole::empty());
            }
        }
        let classified: [(&[(Location, Location)], EdgeRole); 3] = [
            (&incoming_edges, EdgeRole::INCOMING),
            (&outgoing_edges, EdgeRole::OUTGOING),
            (&breach_edges, EdgeRole::BREACH),
        ];
        for (edges, role) in classified {
            for &(a, b) in edges {
                for loc in edge_lattice_points(a, b)? {
                    let (lx, ly) = bounds.local(loc);
                    tile_state.set(lx, ly, TileState::Boundary);
                    *boundary_roles.entry(loc).or_insert(EdgeRole::empty()) |= role;
                }
            }
        }

        // Interior vs outside for everything that is not boundary.
        let mut interior_count = 0;
        for loc in bounds.iter() {
            let (lx, ly) = bounds.local(loc);
            if *tile_state.get(lx, ly) == TileState::Boundary {
                continue;
            }
            if point_in_polygon(loc.x() as f64, loc.y() as f64, &vertices) {
                tile_state.set(lx, ly, TileState::Interior);
                interior_count += 1;
            }
        }

        let mut damage_field = TileGrid::new(bounds.width(), bounds.height(), 0.0f32);
        if let Some(seed) = seed_field {
            for loc in bounds.iter() {
                let (lx, ly) = bounds.local(loc);
                damage_field.set(lx, ly, seed.get(loc));
            }
        }

        let incoming_edge_points = incoming_edges
            .iter()
            .map(|&(a, b)| edge_lattice_points(a, b))
            .collect::<Result<Vec<_>, _>>()?;

        let mut units = FnvHashMap::default();
        for kind in StructureKind::ALL {
            units.insert(kind, Vec::new());
        }

        Ok(Region {
            side,
            vertices,
            bounds,
            tile_state,
            occupant: TileGrid::new(bounds.width(), bounds.height(), None),
            boundary_roles,
            incoming_edges,
            outgoing_edges,
            breach_edges,
            incoming_edge_points,
            interior_count,
            damage_field,
            units,
            path_table: PathTable::default(),
            scan_generation: 0,
            paths_generation: PATHS_NEVER,
            stats: RegionStats::default(),
        })
    }

    pub fn side(&self) -> PlayerSide {
        self.side
    }

    pub fn vertices(&self) -> &[Location] {
        &self.vertices
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of interior tiles, fixed at construction.
    pub fn tile_count(&self) -> usize {
        self.interior_count
    }

    pub fn incoming_edges(&self) -> &[(Location, Location)] {
        &self.incoming_edges
    }

    pub fn outgoing_edges(&self) -> &[(Location, Location)] {
        &self.outgoing_edges
    }

    pub fn breach_edges(&self) -> &[(Location, Location)] {
        &self.breach_edges
    }

    pub fn tile_state(&self, loc: Location) -> TileState {
        if !self.bounds.contains(loc) {
            return TileState::Outside;
        }
        let (lx, ly) = self.bounds.local(loc);
        *self.tile_state.get(lx, ly)
    }

    /// All de-duplicated boundary lattice points.
    pub fn boundary_tiles(&self) -> impl Iterator<Item = Location> + '_ {
        self.boundary_roles.keys().copied()
    }

    /// Role flags for a boundary tile, `None` off the boundary.
    pub fn boundary_roles(&self, loc: Location) -> Option<EdgeRole> {
        self.boundary_roles.get(&loc).copied()
    }

    pub fn occupant(&self, loc: Location) -> Option<UnitId> {
        if !self.bounds.contains(loc) {
            return None;
        }
        let (lx, ly) = self.bounds.local(loc);
        *self.occupant.get(lx, ly)
    }

    /// Accumulated damage per frame on a tile; 0 outside the bounds.
    pub fn damage_at(&self, loc: Location) -> f32 {
        if !self.bounds.contains(loc) {
            return 0.0;
        }
        let (lx, ly) = self.bounds.local(loc);
        *self.damage_field.get(lx, ly)
    }

    pub fn units_of(&self, kind: StructureKind) -> &[UnitId] {
        self.units.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Statistics cached by the latest scan.
    pub fn stats(&self) -> &RegionStats {
        &self.stats
    }

    /// Refresh occupants and inventories from the grid, then rebuild the
    /// damage field and cached statistics. Stamps the grid generation, so
    /// a scan against an unchanged grid leaves path validity intact.
    pub fn update_structures(&mut self, grid: &GridSnapshot, config: &EngineConfig) {
        for list in self.units.values_mut() {
            list.clear();
        }
        let bounds = self.bounds;
        for loc in bounds.iter() {
            let (lx, ly) = bounds.local(loc);
            if *self.tile_state.get(lx, ly) == TileState::Outside {
                continue;
            }
            match grid.structure_at(loc) {
                Some((id, unit)) => {
                    self.occupant.set(lx, ly, Some(id));
                    self.units.entry(unit.kind).or_default().push(id);
                }
                None => self.occupant.set(lx, ly, None),
            }
        }
        self.recompute_damage_field(grid, config);
        self.recompute_stats(grid, config);
        self.scan_generation = grid.generation();
    }

    /// Full re-zero-and-recompute of the damage field. Incremental updates
    /// are not possible once a turret is removed or damaged, so the whole
    /// field is rebuilt from the current turret inventory.
    fn recompute_damage_field(&mut self, grid: &GridSnapshot, config: &EngineConfig) {
        self.damage_field.fill(0.0);
        let bounds = self.bounds;
        let turrets = self
            .units
            .get(&StructureKind::Turret)
            .cloned()
            .unwrap_or_default();
        for id in turrets {
            let Some(turret) = grid.get(id) else { continue };
            let tier = config.turret_tier(turret.upgraded);
            for loc in grid.locations_in_range(turret.loc, tier.range) {
                if bounds.contains(loc) {
                    let (lx, ly) = bounds.local(loc);
                    *self.damage_field.get_mut(lx, ly) += tier.damage;
                }
            }
        }
    }

    fn recompute_stats(&mut self, grid: &GridSnapshot, config: &EngineConfig) {
        let mut stats = RegionStats {
            turret_count: self.units_of(StructureKind::Turret).len(),
            wall_count: self.units_of(StructureKind::Wall).len(),
            factory_count: self.units_of(StructureKind::Factory).len(),
            ..RegionStats::default()
        };

        for kind in StructureKind::ALL {
            for id in self.units_of(kind) {
                let Some(unit) = grid.get(*id) else { continue };
                let prorated = unit.health_fraction() * config.stats(kind).cost;
                stats.cost_all += prorated;
                stats.health_all += unit.health;
                if kind != StructureKind::Factory {
                    stats.cost_defensive += prorated;
                    stats.health_defensive += unit.health;
                }
                match kind {
                    StructureKind::Wall => stats.prorated_wall_cost += prorated,
                    StructureKind::Turret => stats.prorated_turret_cost += prorated,
                    StructureKind::Factory => {}
                }
            }
        }

        let mut damage_sum = 0.0;
        let bounds = self.bounds;
        for loc in bounds.iter() {
            let (lx, ly) = bounds.local(loc);
            if *self.tile_state.get(lx, ly) != TileState::Interior {
                continue;
            }
            let damage = *self.damage_field.get(lx, ly);
            damage_sum += damage;
            if damage == 0.0 {
                stats.undefended_tiles.push(loc);
            }
        }
        stats.avg_tile_damage = if self.interior_count > 0 {
            damage_sum / self.interior_count as f32
        } else {
            0.0
        };

        self.stats = stats;
    }

    /// The path table, valid only while no scan has happened since the
    /// last [`Region::recompute_paths`]. A stale query is an error rather
    /// than a silently empty answer.
    pub fn paths(&self) -> Result<&PathTable, EngineError> {
        if self.paths_generation == self.scan_generation {
            Ok(&self.path_table)
        } else {
            Err(EngineError::StalePathTable)
        }
    }

    /// Rebuild the boundary-to-boundary path table with a masked BFS from
    /// every entrance lattice point. No-op when already current.
    ///
    /// Tiles occupied by any stationary structure are impassable, matching
    /// the mobile-unit movement model; an occupied entrance spawns no
    /// search and an occupied boundary tile is never recorded as an exit.
    pub fn recompute_paths(&mut self) {
        if self.paths_generation == self.scan_generation {
            return;
        }
        self.path_table.clear();
        let edge_points = self.incoming_edge_points.clone();
        for points in &edge_points {
            for &entrance in points {
                let (lx, ly) = self.bounds.local(entrance);
                if self.occupant.get(lx, ly).is_some() {
                    continue;
                }
                self.bfs_from(entrance);
            }
        }
        self.paths_generation = self.scan_generation;
        trace!(
            "recomputed region paths: {} entrances, {} path rows",
            edge_points.iter().map(|p| p.len()).sum::<usize>(),
            self.path_table.len()
        );
    }

    fn bfs_from(&mut self, start: Location) {
        let bounds = self.bounds;
        let mut visited = TileGrid::new(bounds.width(), bounds.height(), false);
        let (sx, sy) = bounds.local(start);
        visited.set(sx, sy, true);

        let mut queue: VecDeque<(Location, Vec<Location>)> = VecDeque::new();
        queue.push_back((start, vec![start]));

        while let Some((tip, path)) = queue.pop_front() {
            for &(dx, dy) in &NEIGHBORS_4 {
                let Some(adj) = tip.offset(dx, dy) else { continue };
                if !bounds.contains(adj) {
                    continue;
                }
                let (ax, ay) = bounds.local(adj);
                if *self.tile_state.get(ax, ay) == TileState::Outside || *visited.get(ax, ay) {
                    continue;
                }
                visited.set(ax, ay, true);
                if self.occupant.get(ax, ay).is_some() {
                    continue;
                }
                let mut extended = path.clone();
                extended.push(adj);
                if *self.tile_state.get(ax, ay) == TileState::Boundary {
                    let mut reverse = extended.clone();
                    reverse.reverse();
                    self.path_table
                        .entry(start)
                        .or_default()
                        .insert(adj, extended);
                    self.path_table
                        .entry(adj)
                        .or_default()
                        .insert(start, reverse);
                } else {
                    queue.push_back((adj, extended));
                }
            }
        }
    }

    /// Mean damage a mobile unit would take over all recorded
    /// entrance-to-exit paths, 0 when no path exists. Recomputes the path
    /// table first if a scan invalidated it.
    pub fn simulate_average_damage(&mut self, unit_speed: f32) -> f32 {
        self.recompute_paths();
        let mut total = 0.0;
        let mut path_count = 0usize;
        for points in &self.incoming_edge_points {
            for entrance in points {
                if let Some(row) = self.path_table.get(entrance) {
                    for path in row.values() {
                        path_count += 1;
                        total += self.damage_on_path(path, unit_speed);
                    }
                }
            }
        }
        if path_count == 0 {
            0.0
        } else {
            total / path_count as f32
        }
    }

    /// [`Region::simulate_average_damage`] with the speed of a mobile kind.
    pub fn traversal_damage(&mut self, kind: MobileKind, config: &EngineConfig) -> f32 {
        self.simulate_average_damage(config.mobile_speed(kind))
    }

    fn damage_on_path(&self, path: &[Location], unit_speed: f32) -> f32 {
        if unit_speed <= 0.0 {
            return 0.0;
        }
        path.iter()
            .map(|loc| self.damage_at(*loc) / unit_speed)
            .sum()
    }

    /// One step of the local build heuristic: wall cover for exposed
    /// turrets, a turret when the region has at most one, replacements and
    /// upgrades otherwise. The caller re-scans after every step.
    pub(crate) fn fortify_step(
        &self,
        grid: &mut GridSnapshot,
        balance: &mut f32,
        turn: u32,
        config: &EngineConfig,
        orders: &mut Vec<BuildOrder>,
    ) {
        let upgrade_allowed = turn >= config.min_turn_upgrade;
        let turret_count = self.units_of(StructureKind::Turret).len();
        let wall_count = self.units_of(StructureKind::Wall).len();

        if turret_count > 2 * wall_count {
            debug!(
                "fortify: wall cover lagging ({} turrets, {} walls)",
                turret_count, wall_count
            );
            self.place_walls_near_turrets(grid, balance, config, orders, 1, upgrade_allowed);
        }

        if turret_count <= 1 {
            if let Some(loc) = self.optimal_turret_placement(grid) {
                try_spawn(grid, balance, StructureKind::Turret, loc, self.side, config, orders);
            }
        } else if turret_count < config.max_turrets_per_region {
            let low_health = self
                .units_of(StructureKind::Turret)
                .iter()
                .filter_map(|id| grid.get(*id))
                .any(|t| t.health_fraction() < 0.5);
            if low_health && *balance >= config.turret.cost {
                debug!("fortify: reinforcing around a low-health turret");
                if let Some(loc) = self.optimal_turret_placement(grid) {
                    try_spawn(grid, balance, StructureKind::Turret, loc, self.side, config, orders);
                }
            } else if upgrade_allowed && *balance >= config.turret.upgrade_cost {
                match self.optimal_turret_upgrade(grid) {
                    Some(loc) => {
                        try_upgrade(grid, balance, loc, config, orders);
                    }
                    None => {
                        if let Some(loc) = self.optimal_turret_placement(grid) {
                            try_spawn(
                                grid,
                                balance,
                                StructureKind::Turret,
                                loc,
                                self.side,
                                config,
                                orders,
                            );
                        }
                    }
                }
            }
        } else if upgrade_allowed {
            if let Some(loc) = self.optimal_turret_upgrade(grid) {
                try_upgrade(grid, balance, loc, config, orders);
            }
        }
    }

    fn place_walls_near_turrets(
        &self,
        grid: &mut GridSnapshot,
        balance: &mut f32,
        config: &EngineConfig,
        orders: &mut Vec<BuildOrder>,
        count: usize,
        upgrade: bool,
    ) {
        let turret_locs: Vec<Location> = self
            .units_of(StructureKind::Turret)
            .iter()
            .filter_map(|id| grid.get(*id))
            .map(|t| t.loc)
            .collect();
        for turret_loc in turret_locs {
            for candidate in wall_candidates(turret_loc, self.side)
                .into_iter()
                .flatten()
                .take(count)
            {
                if try_spawn(
                    grid,
                    balance,
                    StructureKind::Wall,
                    candidate,
                    self.side,
                    config,
                    orders,
                ) && upgrade
                {
                    try_upgrade(grid, balance, candidate, config, orders);
                }
            }
        }
    }

    /// Deterministic turret spot: the midpoint of the first incoming edge
    /// when the region has no turret yet, otherwise the free interior tile
    /// maximizing summed distance to the existing turrets.
    fn optimal_turret_placement(&self, grid: &GridSnapshot) -> Option<Location> {
        let turret_locs: Vec<Location> = self
            .units_of(StructureKind::Turret)
            .iter()
            .filter_map(|id| grid.get(*id))
            .map(|t| t.loc)
            .collect();

        if turret_locs.is_empty() {
            let points = self.incoming_edge_points.first()?;
            return points.get(points.len() / 2).copied();
        }

        let mut best: Option<(Location, f32)> = None;
        for loc in self.bounds.iter() {
            let (lx, ly) = self.bounds.local(loc);
            if *self.tile_state.get(lx, ly) != TileState::Interior {
                continue;
            }
            if grid.structure_at(loc).is_some() {
                continue;
            }
            let spread: f32 = turret_locs
                .iter()
                .map(|t| loc.euclidean_distance(*t))
                .sum();
            match best {
                Some((_, best_spread)) if spread <= best_spread => {}
                _ => best = Some((loc, spread)),
            }
        }
        best.map(|(loc, _)| loc)
    }

    /// Front-most unupgraded turret, or `None` when every turret is
    /// already upgraded (or there are none).
    fn optimal_turret_upgrade(&self, grid: &GridSnapshot) -> Option<Location> {
        let mut best: Option<Location> = None;
        for id in self.units_of(StructureKind::Turret) {
            let Some(turret) = grid.get(*id) else { continue };
            if turret.upgraded {
                continue;
            }
            let further_forward = match (best, self.side) {
                (None, _) => true,
                (Some(current), PlayerSide::One) => turret.loc.y() > current.y(),
                (Some(current), PlayerSide::Two) => turret.loc.y() < current.y(),
            };
            if further_forward {
                best = Some(turret.loc);
            }
        }
        best
    }
}
