use crate::location::Location;
use thiserror::Error;

/// Internal-contract violations surfaced to the orchestration layer.
///
/// None of these are user-facing; the caller is expected to fall back to a
/// conservative default action for the turn rather than crash.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    /// A region polygon encloses no area (or has fewer than three vertices).
    #[error("degenerate polygon with {0} vertices encloses no area")]
    DegeneratePolygon(usize),

    /// A region edge is neither axis-aligned nor a 45 degree diagonal.
    #[error("edge {0:?} -> {1:?} is not axis-aligned or a 45 degree diagonal")]
    UnsupportedEdgeSlope(Location, Location),

    /// `weakest_region` was called with no candidates.
    #[error("weakest-region selection over an empty candidate set")]
    EmptyCandidateSet,

    /// A region id outside the fixed region collection.
    #[error("unknown region id {0}")]
    UnknownRegion(usize),

    /// The path table was queried without a recompute after the last scan.
    #[error("path table is stale; recompute paths after the structure scan")]
    StalePathTable,

    /// A coordinate outside the diamond arena.
    #[error("coordinate {0:?} is outside the arena bounds")]
    OutOfBounds(Location),

    /// A placement onto a tile that already holds a structure.
    #[error("tile {0:?} is already occupied")]
    OccupiedTile(Location),

    /// A placement onto the opponent's half of the board.
    #[error("tile {0:?} is not on the owning player's half")]
    EnemyTerritory(Location),

    /// A structure query against an empty tile.
    #[error("no structure at {0:?}")]
    VacantTile(Location),
}
