//! Static terrain adjacency shared by every route.

use outpost_core::{CellCoord, ConfigurationError, Direction};

/// Precomputed 8-way adjacency over one map's static terrain.
///
/// For every cell the grid stores the passable cells among its 8
/// compass neighbors, excluding the cell itself and anything outside
/// the configured bounds. The adjacency is a pure function of static
/// terrain and never changes after construction; unit occupancy varies
/// every turn and is applied at query time by [`crate::Route::step_from`]
/// instead of being baked in here.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    columns: u32,
    rows: u32,
    passable: Vec<bool>,
    neighbors: Vec<Vec<CellCoord>>,
}

impl TerrainGrid {
    /// Builds the adjacency from a per-cell passability predicate.
    ///
    /// The predicate is queried exactly once per cell. Construction
    /// fails only when either dimension is zero or the cell count does
    /// not fit the addressable space.
    pub fn new<F>(columns: u32, rows: u32, is_passable: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(CellCoord) -> bool,
    {
        let cell_count = checked_cell_count(columns, rows)?;

        let mut passable = vec![false; cell_count];
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if let Some(index) = index_of(columns, rows, cell) {
                    passable[index] = is_passable(cell);
                }
            }
        }

        let mut neighbors = vec![Vec::new(); cell_count];
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let Some(index) = index_of(columns, rows, cell) else {
                    continue;
                };

                for direction in Direction::ALL {
                    let Some(next) = direction.step_from(cell) else {
                        continue;
                    };
                    let Some(next_index) = index_of(columns, rows, next) else {
                        continue;
                    };
                    if passable[next_index] {
                        neighbors[index].push(next);
                    }
                }
            }
        }

        Ok(Self {
            columns,
            rows,
            passable,
            neighbors,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is passable terrain.
    ///
    /// Out-of-bounds cells report impassable.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.passable[index])
    }

    /// Passable neighbors of the cell in canonical scan order.
    ///
    /// Out-of-bounds cells have no neighbors.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> &[CellCoord] {
        self.index(cell)
            .map_or(&[][..], |index| self.neighbors[index].as_slice())
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        index_of(self.columns, self.rows, cell)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.passable.len()
    }
}

fn checked_cell_count(columns: u32, rows: u32) -> Result<usize, ConfigurationError> {
    if columns == 0 || rows == 0 {
        return Err(ConfigurationError::InvalidDimensions { columns, rows });
    }

    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).map_err(|_| ConfigurationError::TooManyCells { columns, rows })
}

fn index_of(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    } else {
        None
    }
}
