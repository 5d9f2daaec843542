use crate::constants::HALF_BOARD;
use crate::location::Location;
use serde::{Deserialize, Serialize};

/// Stationary structure kinds. Closed set, fixed at compile time; per-kind
/// numbers live in [`crate::config::EngineConfig`], not on instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Wall,
    Turret,
    Factory,
}

impl StructureKind {
    pub const ALL: [StructureKind; 3] = [
        StructureKind::Wall,
        StructureKind::Turret,
        StructureKind::Factory,
    ];
}

/// Mobile unit kinds, used only to select a traversal speed for damage
/// simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobileKind {
    Scout,
    Demolisher,
    Interceptor,
}

/// Which player a structure or half-board belongs to. `One` owns rows
/// `0..14`, `Two` owns rows `14..28`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSide {
    One,
    Two,
}

impl PlayerSide {
    /// Map an absolute row to a half-local row, or `None` when the row
    /// belongs to the other player.
    pub fn local_row(self, y: u8) -> Option<u8> {
        match self {
            PlayerSide::One if y < HALF_BOARD => Some(y),
            PlayerSide::Two if (HALF_BOARD..2 * HALF_BOARD).contains(&y) => Some(y - HALF_BOARD),
            _ => None,
        }
    }

    pub fn owns(self, loc: Location) -> bool {
        self.local_row(loc.y()).is_some()
    }

    /// Unit row delta pointing toward the center line ("the front").
    pub fn front_dir(self) -> i8 {
        match self {
            PlayerSide::One => 1,
            PlayerSide::Two => -1,
        }
    }
}

/// Weak reference to a structure slot inside the owning [`crate::grid::GridSnapshot`].
///
/// Regions hold these instead of owning pointers; a scan refreshes them
/// every turn, so an id is only meaningful against the snapshot generation
/// it was scanned from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A stationary structure. Owned by the grid; everything else refers to it
/// by [`UnitId`] or coordinate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureKind,
    pub loc: Location,
    pub owner: PlayerSide,
    pub health: f32,
    pub max_health: f32,
    pub upgraded: bool,
}

impl Structure {
    /// Remaining health as a fraction of maximum, used to prorate costs.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_board_rows() {
        assert_eq!(PlayerSide::One.local_row(0), Some(0));
        assert_eq!(PlayerSide::One.local_row(13), Some(13));
        assert_eq!(PlayerSide::One.local_row(14), None);
        assert_eq!(PlayerSide::Two.local_row(14), Some(0));
        assert_eq!(PlayerSide::Two.local_row(27), Some(13));
        assert_eq!(PlayerSide::Two.local_row(13), None);
    }

    #[test]
    fn health_fraction_guards_zero_max() {
        let s = Structure {
            kind: StructureKind::Wall,
            loc: Location::from_xy(0, 13),
            owner: PlayerSide::One,
            health: 30.0,
            max_health: 0.0,
            upgraded: false,
        };
        assert_eq!(s.health_fraction(), 0.0);
    }
}
