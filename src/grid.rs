use crate::config::EngineConfig;
use crate::constants::{in_arena_bounds, BOARD_SIZE, HALF_BOARD};
use crate::error::EngineError;
use crate::location::Location;
use crate::unit::{PlayerSide, Structure, StructureKind, UnitId};
use serde::{Deserialize, Serialize};

/// A rectangular backing store for per-tile data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileGrid<T: Clone> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> TileGrid<T> {
    pub fn new(width: usize, height: usize, initial: T) -> Self {
        TileGrid {
            width,
            height,
            data: vec![initial; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    pub fn fill(&mut self, value: T) {
        for cell in &mut self.data {
            *cell = value.clone();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.data.iter().enumerate().map(|(i, v)| {
            let x = i % self.width;
            let y = i / self.width;
            ((x, y), v)
        })
    }
}

/// Damage accumulated over one player's half, indexed by half-local rows.
/// Reads off the owning half answer 0 rather than panic, so turret ranges
/// that spill over the center line can be accumulated without filtering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HalfBoardField {
    side: PlayerSide,
    cells: TileGrid<f32>,
}

impl HalfBoardField {
    pub fn new(side: PlayerSide) -> Self {
        HalfBoardField {
            side,
            cells: TileGrid::new(BOARD_SIZE as usize, HALF_BOARD as usize, 0.0),
        }
    }

    pub fn side(&self) -> PlayerSide {
        self.side
    }

    pub fn zero(&mut self) {
        self.cells.fill(0.0);
    }

    pub fn get(&self, loc: Location) -> f32 {
        match self.side.local_row(loc.y()) {
            Some(row) => *self.cells.get(loc.x() as usize, row as usize),
            None => 0.0,
        }
    }

    pub fn add(&mut self, loc: Location, amount: f32) {
        if let Some(row) = self.side.local_row(loc.y()) {
            *self.cells.get_mut(loc.x() as usize, row as usize) += amount;
        }
    }
}

/// A build action applied to the grid, reported back to the orchestration
/// layer for submission over the match protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BuildOrder {
    Spawn { kind: StructureKind, loc: Location },
    Upgrade { loc: Location },
    Remove { loc: Location },
}

/// Snapshot of all stationary structures on the board.
///
/// The grid is the single owner of structure values; regions and defenses
/// hold [`UnitId`] references into its arena, refreshed every scan. Every
/// mutation bumps the generation counter, which is what downstream caches
/// compare against instead of scattered dirty booleans.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSnapshot {
    slots: Vec<Option<Structure>>,
    tiles: TileGrid<Option<UnitId>>,
    free: Vec<usize>,
    generation: u64,
}

impl GridSnapshot {
    pub fn new() -> Self {
        GridSnapshot {
            slots: Vec::new(),
            tiles: TileGrid::new(BOARD_SIZE as usize, BOARD_SIZE as usize, None),
            free: Vec::new(),
            generation: 1,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: UnitId) -> Option<&Structure> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn structure_at(&self, loc: Location) -> Option<(UnitId, &Structure)> {
        let id = (*self.tiles.get(loc.x() as usize, loc.y() as usize))?;
        self.get(id).map(|s| (id, s))
    }

    /// Place a new structure at full base health. Fails on tiles outside
    /// the arena, off the owner's half, or already occupied.
    pub fn place(
        &mut self,
        kind: StructureKind,
        loc: Location,
        owner: PlayerSide,
        config: &EngineConfig,
    ) -> Result<UnitId, EngineError> {
        if !in_arena_bounds(loc.x() as i16, loc.y() as i16) {
            return Err(EngineError::OutOfBounds(loc));
        }
        if !owner.owns(loc) {
            return Err(EngineError::EnemyTerritory(loc));
        }
        if self.structure_at(loc).is_some() {
            return Err(EngineError::OccupiedTile(loc));
        }

        let stats = config.stats(kind);
        let unit = Structure {
            kind,
            loc,
            owner,
            health: stats.health,
            max_health: stats.health,
            upgraded: false,
        };

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(unit);
                UnitId(index)
            }
            None => {
                self.slots.push(Some(unit));
                UnitId(self.slots.len() - 1)
            }
        };
        self.tiles.set(loc.x() as usize, loc.y() as usize, Some(id));
        self.generation += 1;
        Ok(id)
    }

    /// Remove and return the structure at a tile, if any.
    pub fn remove(&mut self, loc: Location) -> Option<Structure> {
        let id = (*self.tiles.get(loc.x() as usize, loc.y() as usize))?;
        self.tiles.set(loc.x() as usize, loc.y() as usize, None);
        let unit = self.slots.get_mut(id.0).and_then(|slot| slot.take());
        if unit.is_some() {
            self.free.push(id.0);
            self.generation += 1;
        }
        unit
    }

    /// Upgrade the structure at a tile, preserving its health fraction.
    /// Returns `Ok(false)` when it was already upgraded (no-op, no cost).
    pub fn upgrade(&mut self, loc: Location, config: &EngineConfig) -> Result<bool, EngineError> {
        let id = (*self.tiles.get(loc.x() as usize, loc.y() as usize))
            .ok_or(EngineError::VacantTile(loc))?;
        let unit = self
            .slots
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(EngineError::VacantTile(loc))?;
        if unit.upgraded {
            return Ok(false);
        }
        let fraction = unit.health_fraction();
        unit.upgraded = true;
        unit.max_health = config.stats(unit.kind).upgraded_health;
        unit.health = fraction * unit.max_health;
        self.generation += 1;
        Ok(true)
    }

    /// Overwrite a structure's health (combat results applied by the
    /// orchestration layer), clamped to its maximum.
    pub fn set_health(&mut self, loc: Location, health: f32) -> Result<(), EngineError> {
        let id = (*self.tiles.get(loc.x() as usize, loc.y() as usize))
            .ok_or(EngineError::VacantTile(loc))?;
        let unit = self
            .slots
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(EngineError::VacantTile(loc))?;
        unit.health = health.clamp(0.0, unit.max_health);
        self.generation += 1;
        Ok(())
    }

    /// All arena tiles within Euclidean `radius` of `center`, the center
    /// itself included.
    pub fn locations_in_range(&self, center: Location, radius: f32) -> Vec<Location> {
        let span = radius.ceil() as i16;
        let radius_sq = radius * radius;
        let cx = center.x() as i16;
        let cy = center.y() as i16;
        let mut locations = Vec::new();
        for dy in -span..=span {
            for dx in -span..=span {
                let x = cx + dx;
                let y = cy + dy;
                if !in_arena_bounds(x, y) {
                    continue;
                }
                if (dx * dx + dy * dy) as f32 <= radius_sq {
                    locations.push(Location::from_xy(x as u8, y as u8));
                }
            }
        }
        locations
    }
}

impl Default for GridSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempt a paid spawn: checks the balance, places, debits, and records
/// the order. Any placement failure (occupied, off-half, out of arena)
/// simply reports `false`, mirroring a rejected build attempt in-game.
pub(crate) fn try_spawn(
    grid: &mut GridSnapshot,
    balance: &mut f32,
    kind: StructureKind,
    loc: Location,
    owner: PlayerSide,
    config: &EngineConfig,
    orders: &mut Vec<BuildOrder>,
) -> bool {
    let cost = config.stats(kind).cost;
    if *balance < cost {
        return false;
    }
    match grid.place(kind, loc, owner, config) {
        Ok(_) => {
            *balance -= cost;
            orders.push(BuildOrder::Spawn { kind, loc });
            true
        }
        Err(_) => false,
    }
}

/// Attempt a paid upgrade of whatever stands at `loc`.
pub(crate) fn try_upgrade(
    grid: &mut GridSnapshot,
    balance: &mut f32,
    loc: Location,
    config: &EngineConfig,
    orders: &mut Vec<BuildOrder>,
) -> bool {
    let Some((_, unit)) = grid.structure_at(loc) else {
        return false;
    };
    if unit.upgraded {
        return false;
    }
    let cost = config.stats(unit.kind).upgrade_cost;
    if *balance < cost {
        return false;
    }
    match grid.upgrade(loc, config) {
        Ok(true) => {
            *balance -= cost;
            orders.push(BuildOrder::Upgrade { loc });
            true
        }
        _ => false,
    }
}

/// Wall spots shielding a turret: directly in front of it, then to either
/// side. `None` entries fall off the board square.
pub(crate) fn wall_candidates(turret_loc: Location, side: PlayerSide) -> [Option<Location>; 3] {
    [
        turret_loc.offset(0, side.front_dir()),
        turret_loc.offset(1, 0),
        turret_loc.offset(-1, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn place_and_lookup() {
        let mut grid = GridSnapshot::new();
        let loc = Location::from_xy(5, 10);
        let id = grid
            .place(StructureKind::Turret, loc, PlayerSide::One, &config())
            .unwrap();
        let (found_id, unit) = grid.structure_at(loc).unwrap();
        assert_eq!(found_id, id);
        assert_eq!(unit.kind, StructureKind::Turret);
        assert_eq!(unit.health, 75.0);
    }

    #[test]
    fn placement_rules() {
        let mut grid = GridSnapshot::new();
        let loc = Location::from_xy(5, 10);
        grid.place(StructureKind::Wall, loc, PlayerSide::One, &config())
            .unwrap();
        assert_eq!(
            grid.place(StructureKind::Wall, loc, PlayerSide::One, &config()),
            Err(EngineError::OccupiedTile(loc))
        );
        let enemy_loc = Location::from_xy(5, 20);
        assert_eq!(
            grid.place(StructureKind::Wall, enemy_loc, PlayerSide::One, &config()),
            Err(EngineError::EnemyTerritory(enemy_loc))
        );
        let outside = Location::from_xy(0, 0);
        assert_eq!(
            grid.place(StructureKind::Wall, outside, PlayerSide::One, &config()),
            Err(EngineError::OutOfBounds(outside))
        );
    }

    #[test]
    fn removal_frees_slot_and_bumps_generation() {
        let mut grid = GridSnapshot::new();
        let loc = Location::from_xy(6, 9);
        grid.place(StructureKind::Wall, loc, PlayerSide::One, &config())
            .unwrap();
        let before = grid.generation();
        let unit = grid.remove(loc).unwrap();
        assert_eq!(unit.kind, StructureKind::Wall);
        assert!(grid.structure_at(loc).is_none());
        assert!(grid.generation() > before);
        assert!(grid.remove(loc).is_none());
    }

    #[test]
    fn upgrade_preserves_health_fraction() {
        let mut grid = GridSnapshot::new();
        let loc = Location::from_xy(6, 9);
        grid.place(StructureKind::Wall, loc, PlayerSide::One, &config())
            .unwrap();
        grid.set_health(loc, 30.0).unwrap();
        assert!(grid.upgrade(loc, &config()).unwrap());
        let (_, unit) = grid.structure_at(loc).unwrap();
        assert_eq!(unit.max_health, 120.0);
        assert_eq!(unit.health, 60.0);
        // Second upgrade is a no-op.
        assert!(!grid.upgrade(loc, &config()).unwrap());
    }

    #[test]
    fn range_query_is_euclidean() {
        let grid = GridSnapshot::new();
        let center = Location::from_xy(13, 7);
        let in_range = grid.locations_in_range(center, 2.5);
        assert!(in_range.contains(&center));
        assert!(in_range.contains(&Location::from_xy(15, 8))); // dist^2 = 5
        assert!(!in_range.contains(&Location::from_xy(15, 9))); // dist^2 = 8
        assert!(!in_range.contains(&Location::from_xy(16, 7))); // dist = 3
    }
}
