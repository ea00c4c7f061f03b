#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for an Outpost match.
//!
//! The world is the in-process stand-in for the external game engine:
//! it owns the static map, the unit roster, and the dense occupancy
//! grid, executes [`Command`] batches through [`apply`], and reports
//! every outcome — including rejections — as [`Event`] values. It
//! carries no economy, combat, or rules beyond "a unit may step into a
//! free passable cell".

use outpost_core::{
    CellCoord, Command, ConfigurationError, Event, MoveError, SpawnError, UnitId,
};

/// Static per-cell passability for one match's map.
///
/// Built once at match start and immutable thereafter; dynamic unit
/// occupancy lives in the world, never here.
#[derive(Clone, Debug)]
pub struct GameMap {
    columns: u32,
    rows: u32,
    passable: Vec<bool>,
}

impl GameMap {
    /// Creates a map from explicit dimensions and a passability
    /// predicate, queried once per cell.
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

        Ok(Self {
            columns,
            rows,
            passable,
        })
    }

    /// Creates a map from an ASCII sketch.
    ///
    /// Each string is one row; `#` marks impassable terrain and every
    /// other byte is passable. The first row fixes the column count and
    /// cells missing from shorter rows are impassable.
    pub fn from_sketch(rows: &[&str]) -> Result<Self, ConfigurationError> {
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let columns = rows
            .first()
            .map_or(0, |first| u32::try_from(first.len()).unwrap_or(u32::MAX));

        Self::new(columns, row_count, |cell| {
            rows.get(cell.row() as usize)
                .and_then(|row| row.as_bytes().get(cell.column() as usize))
                .map_or(false, |&byte| byte != b'#')
        })
    }

    /// Number of columns contained in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies within the map bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is passable terrain.
    ///
    /// Out-of-bounds cells report impassable.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(false, |index| self.passable[index])
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        index_of(self.columns, self.rows, cell)
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

/// Represents the authoritative state of one Outpost match.
#[derive(Debug)]
pub struct World {
    map: GameMap,
    units: Vec<Unit>,
    occupancy: OccupancyGrid,
    next_unit: u32,
    turn_index: u64,
}

impl World {
    /// Creates a world for the provided map with no units deployed.
    #[must_use]
    pub fn from_map(map: GameMap) -> Self {
        let occupancy = OccupancyGrid::new(map.columns(), map.rows());
        Self {
            map,
            units: Vec::new(),
            occupancy,
            next_unit: 0,
            turn_index: 0,
        }
    }

    fn unit_index(&self, unit: UnitId) -> Option<usize> {
        self.units.iter().position(|candidate| candidate.id == unit)
    }

    fn allocate_unit(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit);
        self.next_unit = self.next_unit.wrapping_add(1);
        id
    }
}

#[derive(Clone, Copy, Debug)]
struct Unit {
    id: UnitId,
    cell: CellCoord,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceTurn => {
            world.turn_index = world.turn_index.saturating_add(1);
            out_events.push(Event::TurnAdvanced {
                turn: world.turn_index,
            });
        }
        Command::SpawnUnit { cell } => {
            if let Err(reason) = spawnable(world, cell) {
                out_events.push(Event::SpawnRejected { cell, reason });
                return;
            }

            let unit = world.allocate_unit();
            world.units.push(Unit { id: unit, cell });
            world.occupancy.occupy(unit, cell);
            out_events.push(Event::UnitSpawned { unit, cell });
        }
        Command::MoveUnit { unit, direction } => {
            let Some(index) = world.unit_index(unit) else {
                out_events.push(Event::MoveRejected {
                    unit,
                    direction,
                    reason: MoveError::UnknownUnit,
                });
                return;
            };

            let from = world.units[index].cell;
            let target = direction.step_from(from).filter(|cell| world.map.contains(*cell));
            let Some(to) = target else {
                out_events.push(Event::MoveRejected {
                    unit,
                    direction,
                    reason: MoveError::OutOfBounds,
                });
                return;
            };

            if !world.map.is_passable(to) {
                out_events.push(Event::MoveRejected {
                    unit,
                    direction,
                    reason: MoveError::Impassable,
                });
                return;
            }
            if !world.occupancy.can_enter(to) {
                out_events.push(Event::MoveRejected {
                    unit,
                    direction,
                    reason: MoveError::Occupied,
                });
                return;
            }

            world.occupancy.vacate(from);
            world.occupancy.occupy(unit, to);
            world.units[index].cell = to;
            out_events.push(Event::UnitMoved { unit, from, to });
        }
        Command::DespawnUnit { unit } => {
            // Unknown identifiers are ignored: there is no state to
            // mutate and despawn races only arise from caller bugs.
            if let Some(index) = world.unit_index(unit) {
                let removed = world.units.remove(index);
                world.occupancy.vacate(removed.cell);
                out_events.push(Event::UnitDespawned {
                    unit,
                    cell: removed.cell,
                });
            }
        }
    }
}

fn spawnable(world: &World, cell: CellCoord) -> Result<(), SpawnError> {
    if !world.map.contains(cell) {
        return Err(SpawnError::OutOfBounds);
    }
    if !world.map.is_passable(cell) {
        return Err(SpawnError::Impassable);
    }
    if !world.occupancy.can_enter(cell) {
        return Err(SpawnError::Occupied);
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use outpost_core::{CellCoord, OccupancyView, UnitSnapshot, UnitView};

    use super::{GameMap, World};

    /// Provides read-only access to the world's static map.
    #[must_use]
    pub fn game_map(world: &World) -> &GameMap {
        &world.map
    }

    /// Zero-based index of the most recently started turn.
    #[must_use]
    pub fn turn_index(world: &World) -> u64 {
        world.turn_index
    }

    /// Number of units currently deployed.
    #[must_use]
    pub fn unit_count(world: &World) -> usize {
        world.units.len()
    }

    /// Captures a read-only view of the deployed units.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(
            world
                .units
                .iter()
                .map(|unit| UnitSnapshot {
                    id: unit.id,
                    cell: unit.cell,
                })
                .collect(),
        )
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(
            world.occupancy.cells(),
            world.map.columns(),
            world.map.rows(),
        )
    }

    /// Reports whether a unit could currently stand on the cell.
    ///
    /// True when the cell is in bounds, passable terrain, and free of
    /// units — the live occupiability the navigation service expects
    /// from its caller.
    #[must_use]
    pub fn is_occupiable(world: &World, cell: CellCoord) -> bool {
        world.map.is_passable(cell) && world.occupancy.can_enter(cell)
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<UnitId>>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    fn can_enter(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(true, |index| {
            self.cells.get(index).copied().unwrap_or(None).is_none()
        })
    }

    fn occupy(&mut self, unit: UnitId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(unit);
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        index_of(self.columns, self.rows, cell)
    }

    fn cells(&self) -> &[Option<UnitId>] {
        &self.cells
    }
}
