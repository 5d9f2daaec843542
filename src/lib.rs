//! Per-turn spatial analysis engine for a two-player, grid-based
//! tower-defense match.
//!
//! Each player's half of the board is tiled by six fixed polygonal
//! [`region::Region`]s. Every turn the orchestration layer pushes a fresh
//! [`grid::GridSnapshot`] through [`defense::Defense::update`], which
//! rescans structures, rebuilds damage fields and statistics, and keeps
//! path tables generation-stamped so nothing super-linear re-runs when the
//! board has not changed. The strategy layer then queries region
//! statistics, traversal damage, and the weakest region, and lets
//! [`defense::Defense::fortify`] spend the remaining balance.

pub mod config;
pub mod constants;
pub mod defense;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod location;
pub mod region;
pub mod unit;

pub use crate::config::EngineConfig;
pub use crate::defense::{Defense, RegionId, SelectionCriterion};
pub use crate::error::EngineError;
pub use crate::grid::{BuildOrder, GridSnapshot, HalfBoardField, TileGrid};
pub use crate::location::Location;
pub use crate::region::{EdgeRole, PathTable, Region, RegionStats, TileState};
pub use crate::unit::{MobileKind, PlayerSide, Structure, StructureKind, UnitId};
