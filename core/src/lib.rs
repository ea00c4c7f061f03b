#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Outpost agent.
//!
//! This crate defines the message surface that connects the world
//! stand-in, the navigation service, and the per-turn systems. Callers
//! submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values for systems to react to
//! deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Columns grow east, rows grow south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Translates the cell by the provided column and row deltas.
    ///
    /// Returns `None` when the translation would move either coordinate
    /// below zero. Upper bounds are the concern of whichever grid the
    /// resulting cell is resolved against.
    #[must_use]
    pub fn offset_by(self, column_delta: i32, row_delta: i32) -> Option<CellCoord> {
        let column = checked_offset(self.column, column_delta)?;
        let row = checked_offset(self.row, row_delta)?;
        Some(Self { column, row })
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    ///
    /// This is the shortest hop count between the cells when diagonal
    /// and orthogonal steps cost the same and no terrain intervenes.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

fn checked_offset(base: u32, delta: i32) -> Option<u32> {
    if delta >= 0 {
        base.checked_add(delta.unsigned_abs())
    } else {
        base.checked_sub(delta.unsigned_abs())
    }
}

/// Compass movement directions available to units.
///
/// The declaration order doubles as the canonical scan order used
/// everywhere neighbors are enumerated; ties between equally good
/// candidates resolve to the earliest direction in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column and decreasing row indices.
    Northeast,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing column and row indices.
    Southeast,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column and increasing row indices.
    Southwest,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward decreasing column and row indices.
    Northwest,
}

impl Direction {
    /// Every direction in canonical scan order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::Northeast,
        Direction::East,
        Direction::Southeast,
        Direction::South,
        Direction::Southwest,
        Direction::West,
        Direction::Northwest,
    ];

    /// Column and row deltas of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::Northeast => (1, -1),
            Direction::East => (1, 0),
            Direction::Southeast => (1, 1),
            Direction::South => (0, 1),
            Direction::Southwest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::Northwest => (-1, -1),
        }
    }

    /// Cell reached by stepping once from `cell` in this direction.
    ///
    /// Returns `None` when the step would leave the coordinate space;
    /// upper grid bounds are checked by the resolving grid.
    #[must_use]
    pub fn step_from(self, cell: CellCoord) -> Option<CellCoord> {
        let (column_delta, row_delta) = self.offset();
        cell.offset_by(column_delta, row_delta)
    }

    /// Direction of the single step between two adjacent cells.
    ///
    /// Returns `None` when the cells are not exactly one king-move
    /// apart.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        if from.chebyshev_distance(to) != 1 {
            return None;
        }

        Direction::ALL
            .into_iter()
            .find(|direction| direction.step_from(from) == Some(to))
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the match clock by one turn.
    AdvanceTurn,
    /// Requests that a new unit be placed into the world.
    SpawnUnit {
        /// Cell the unit should initially occupy.
        cell: CellCoord,
    },
    /// Requests that a unit advance a single step in the given direction.
    MoveUnit {
        /// Identifier of the unit attempting to move.
        unit: UnitId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests removal of a unit from the world.
    DespawnUnit {
        /// Identifier of the unit to remove.
        unit: UnitId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the match clock advanced.
    TurnAdvanced {
        /// Zero-based index of the turn that just began.
        turn: u64,
    },
    /// Confirms that a unit was created.
    UnitSpawned {
        /// Identifier assigned to the new unit.
        unit: UnitId,
        /// Cell the unit occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that a unit successfully moved between two cells.
    UnitMoved {
        /// Identifier of the unit that advanced.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Identifier of the unit whose move failed.
        unit: UnitId,
        /// Direction requested by the failed move.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Cell provided in the spawn request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a unit was removed from the world.
    UnitDespawned {
        /// Identifier of the removed unit.
        unit: UnitId,
        /// Cell the unit occupied before removal.
        cell: CellCoord,
    },
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// No unit with the provided identifier exists.
    UnknownUnit,
    /// The step would leave the configured grid bounds.
    OutOfBounds,
    /// The destination cell is impassable terrain.
    Impassable,
    /// The destination cell is occupied by another unit.
    Occupied,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested cell is impassable terrain.
    Impassable,
    /// The requested cell is occupied by another unit.
    Occupied,
}

/// Fatal setup failures raised while constructing grid-backed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The grid was configured with a zero dimension.
    #[error("grid dimensions must both be positive, got {columns}x{rows}")]
    InvalidDimensions {
        /// Number of columns requested for the grid.
        columns: u32,
        /// Number of rows requested for the grid.
        rows: u32,
    },
    /// The grid cell count does not fit the addressable space.
    #[error("grid of {columns}x{rows} cells exceeds the addressable cell count")]
    TooManyCells {
        /// Number of columns requested for the grid.
        columns: u32,
        /// Number of rows requested for the grid.
        rows: u32,
    },
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all units in the world.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<UnitId>],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<UnitId>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the unit occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<UnitId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell is currently free of units.
    ///
    /// Out-of-bounds cells report free; bounds and terrain are the
    /// resolving grid's concern.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(true, |index| {
            self.cells.get(index).copied().unwrap_or(None).is_none()
        })
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, MoveError, UnitId};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
    }

    #[test]
    fn offset_by_refuses_to_leave_coordinate_space() {
        let origin = CellCoord::new(0, 2);
        assert_eq!(origin.offset_by(-1, 0), None);
        assert_eq!(origin.offset_by(0, -3), None);
        assert_eq!(origin.offset_by(2, -1), Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn directions_step_to_expected_neighbors() {
        let origin = CellCoord::new(3, 3);
        let expected = [
            (Direction::North, CellCoord::new(3, 2)),
            (Direction::Northeast, CellCoord::new(4, 2)),
            (Direction::East, CellCoord::new(4, 3)),
            (Direction::Southeast, CellCoord::new(4, 4)),
            (Direction::South, CellCoord::new(3, 4)),
            (Direction::Southwest, CellCoord::new(2, 4)),
            (Direction::West, CellCoord::new(2, 3)),
            (Direction::Northwest, CellCoord::new(2, 2)),
        ];

        for (direction, neighbor) in expected {
            assert_eq!(direction.step_from(origin), Some(neighbor));
            assert_eq!(Direction::between(origin, neighbor), Some(direction));
        }
    }

    #[test]
    fn between_rejects_non_adjacent_cells() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, CellCoord::new(5, 3)), None);
        assert_eq!(Direction::between(origin, CellCoord::new(4, 5)), None);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn unit_id_round_trips_through_bincode() {
        assert_round_trip(&UnitId::new(42));
    }

    #[test]
    fn move_error_round_trips_through_bincode() {
        assert_round_trip(&MoveError::Occupied);
    }
}
