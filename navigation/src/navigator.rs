//! Route cache and query facade.

use std::collections::HashMap;

use outpost_core::{CellCoord, ConfigurationError, Direction};

use crate::grid::TerrainGrid;
use crate::route::Route;

/// Memoizing facade over per-destination [`Route`] tables.
///
/// The navigator owns the [`TerrainGrid`] for one match and builds a
/// route the first time a destination is queried; the build is
/// synchronous and blocking, a one-time cost amortized over every later
/// query to the same destination. Routes are keyed structurally by
/// destination cell and are never invalidated or evicted — occupancy
/// changes each turn, but it only affects step selection, never the
/// static distance tables — so memory grows with the number of distinct
/// destinations, bounded by the cell count of the map.
#[derive(Debug)]
pub struct Navigator {
    grid: TerrainGrid,
    routes: HashMap<CellCoord, Route>,
    routes_built: usize,
}

impl Navigator {
    /// Creates a navigator for a map with the provided dimensions and
    /// passability.
    ///
    /// The predicate is consulted once per cell, at construction only.
    pub fn new<F>(columns: u32, rows: u32, is_passable: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(CellCoord) -> bool,
    {
        Ok(Self {
            grid: TerrainGrid::new(columns, rows, is_passable)?,
            routes: HashMap::new(),
            routes_built: 0,
        })
    }

    /// Direction a unit at `source` should step to approach
    /// `destination`, or `None` when no step currently helps.
    ///
    /// Finds or builds the destination's route, then delegates to
    /// [`Route::step_from`] with the caller's live occupiability
    /// predicate. Destinations outside the grid yield `None` without
    /// entering the cache.
    pub fn direction_to<F>(
        &mut self,
        source: CellCoord,
        destination: CellCoord,
        is_occupiable: F,
    ) -> Option<Direction>
    where
        F: Fn(CellCoord) -> bool,
    {
        if !self.grid.contains(destination) {
            return None;
        }

        self.route_to(destination).step_from(source, is_occupiable)
    }

    /// Shortest hop count between the two cells, or `None` when no
    /// path exists.
    pub fn distance_between(&mut self, source: CellCoord, destination: CellCoord) -> Option<u32> {
        if !self.grid.contains(destination) {
            return None;
        }

        self.route_to(destination).distance_to(source)
    }

    /// The static terrain adjacency the navigator was built over.
    #[must_use]
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Number of route tables constructed so far.
    #[must_use]
    pub fn routes_built(&self) -> usize {
        self.routes_built
    }

    /// Number of destinations currently held in the cache.
    #[must_use]
    pub fn cached_routes(&self) -> usize {
        self.routes.len()
    }

    fn route_to(&mut self, destination: CellCoord) -> &Route {
        let grid = &self.grid;
        let routes_built = &mut self.routes_built;
        self.routes.entry(destination).or_insert_with(|| {
            *routes_built += 1;
            Route::new(grid, destination)
        })
    }
}
