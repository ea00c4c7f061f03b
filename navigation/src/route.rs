//! Single-sink shortest-path distance tables.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use outpost_core::{CellCoord, Direction};

use crate::grid::TerrainGrid;

const UNREACHABLE: u32 = u32::MAX;

/// Dense table of shortest hop distances from every cell to one sink.
///
/// Distances are computed once at construction by a uniform-cost
/// Dijkstra relaxation run backward from the sink over the grid's
/// symmetric passable adjacency; diagonal and orthogonal steps cost the
/// same. The table is immutable afterwards. Unit occupancy is not part
/// of the table — it is applied live, per query, in [`Route::step_from`].
#[derive(Clone, Debug)]
pub struct Route {
    columns: u32,
    rows: u32,
    sink: CellCoord,
    distances: Vec<u32>,
}

impl Route {
    /// Builds the distance table for the provided sink.
    ///
    /// A sink on impassable terrain is not a construction error: the
    /// table keeps its forced zero at the sink while every other cell
    /// stays unreachable, so callers simply observe "no move"
    /// everywhere.
    #[must_use]
    pub fn new(grid: &TerrainGrid, sink: CellCoord) -> Self {
        let mut distances = vec![UNREACHABLE; grid.cell_count()];

        if let Some(sink_index) = grid.index(sink) {
            distances[sink_index] = 0;

            if grid.is_passable(sink) {
                relax_from_sink(grid, sink, &mut distances);
            }
        }

        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            sink,
            distances,
        }
    }

    /// The destination cell this table was built for.
    #[must_use]
    pub const fn sink(&self) -> CellCoord {
        self.sink
    }

    /// Shortest hop count from the cell to the sink.
    ///
    /// Returns `None` for unreachable cells and for cells outside the
    /// grid bounds.
    #[must_use]
    pub fn distance_to(&self, cell: CellCoord) -> Option<u32> {
        let index = self.index(cell)?;
        let distance = self.distances[index];
        (distance != UNREACHABLE).then_some(distance)
    }

    /// Picks the step that makes the most progress toward the sink.
    ///
    /// The 8 compass neighbors of `source` are scanned in canonical
    /// order; a neighbor is a candidate when it lies in bounds, the
    /// caller-supplied live predicate reports it occupiable, and its
    /// distance is finite and strictly below the best seen so far, so
    /// the first minimum wins ties. Returns `None` when no candidate
    /// strictly improves on the source's own distance — which covers a
    /// source standing on the sink — or when no occupiable
    /// finite-distance neighbor exists at all.
    ///
    /// Occupiability is dynamic state owned by the caller; a predicate
    /// that cannot currently answer for a cell must report `false` so
    /// the cell is conservatively skipped.
    pub fn step_from<F>(&self, source: CellCoord, is_occupiable: F) -> Option<Direction>
    where
        F: Fn(CellCoord) -> bool,
    {
        let source_distance = self.distances[self.index(source)?];

        let mut best: Option<(Direction, u32)> = None;
        for direction in Direction::ALL {
            let Some(neighbor) = direction.step_from(source) else {
                continue;
            };
            let Some(neighbor_index) = self.index(neighbor) else {
                continue;
            };

            let distance = self.distances[neighbor_index];
            if distance == UNREACHABLE {
                continue;
            }
            if let Some((_, best_distance)) = best {
                if distance >= best_distance {
                    continue;
                }
            }
            if !is_occupiable(neighbor) {
                continue;
            }

            best = Some((direction, distance));
        }

        let (direction, best_distance) = best?;
        (best_distance < source_distance).then_some(direction)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            row.checked_mul(width)?.checked_add(column)
        } else {
            None
        }
    }
}

/// Heap entry ordered so the smallest tentative distance pops first,
/// with ties broken by cell coordinate for determinism.
#[derive(Debug, Eq, PartialEq)]
struct Node {
    distance: u32,
    cell: CellCoord,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn relax_from_sink(grid: &TerrainGrid, sink: CellCoord, distances: &mut [u32]) {
    let mut heap = BinaryHeap::new();
    heap.push(Node {
        distance: 0,
        cell: sink,
    });

    while let Some(node) = heap.pop() {
        let Some(node_index) = grid.index(node.cell) else {
            continue;
        };
        if node.distance > distances[node_index] {
            // Stale entry superseded by a later relaxation.
            continue;
        }

        let next_distance = node.distance.saturating_add(1);
        for &neighbor in grid.neighbors(node.cell) {
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if next_distance < distances[neighbor_index] {
                distances[neighbor_index] = next_distance;
                heap.push(Node {
                    distance: next_distance,
                    cell: neighbor,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(columns: u32, rows: u32) -> TerrainGrid {
        TerrainGrid::new(columns, rows, |_| true).expect("grid")
    }

    #[test]
    fn sink_distance_is_zero() {
        let grid = open_grid(4, 4);
        let route = Route::new(&grid, CellCoord::new(2, 1));

        assert_eq!(route.sink(), CellCoord::new(2, 1));
        assert_eq!(route.distance_to(route.sink()), Some(0));
    }

    #[test]
    fn diagonal_steps_cost_one_hop() {
        let grid = open_grid(5, 5);
        let route = Route::new(&grid, CellCoord::new(4, 4));

        assert_eq!(route.distance_to(CellCoord::new(0, 0)), Some(4));
        assert_eq!(route.distance_to(CellCoord::new(4, 0)), Some(4));
        assert_eq!(route.distance_to(CellCoord::new(3, 4)), Some(1));
    }

    #[test]
    fn walls_detour_the_distance_field() {
        // 3x3 with the middle column walled except its top cell.
        let grid = TerrainGrid::new(3, 3, |cell| {
            !(cell.column() == 1 && cell.row() > 0)
        })
        .expect("grid");
        let route = Route::new(&grid, CellCoord::new(2, 2));

        assert_eq!(route.distance_to(CellCoord::new(2, 0)), Some(2));
        assert_eq!(route.distance_to(CellCoord::new(0, 2)), Some(4));
        assert_eq!(route.distance_to(CellCoord::new(1, 1)), None);
    }

    #[test]
    fn impassable_sink_leaves_everything_unreachable() {
        let sink = CellCoord::new(1, 1);
        let grid = TerrainGrid::new(3, 3, |cell| cell != sink).expect("grid");
        let route = Route::new(&grid, sink);

        assert_eq!(route.distance_to(sink), Some(0));
        for row in 0..3 {
            for column in 0..3 {
                let cell = CellCoord::new(column, row);
                if cell != sink {
                    assert_eq!(route.distance_to(cell), None, "cell {cell:?}");
                }
            }
        }
    }

    #[test]
    fn step_from_walks_the_gradient() {
        let grid = open_grid(5, 5);
        let route = Route::new(&grid, CellCoord::new(4, 4));

        assert_eq!(
            route.step_from(CellCoord::new(0, 0), |_| true),
            Some(Direction::Southeast)
        );
        assert_eq!(
            route.step_from(CellCoord::new(4, 0), |_| true),
            Some(Direction::South)
        );
    }

    #[test]
    fn step_from_sink_reports_no_move() {
        let grid = open_grid(3, 3);
        let sink = CellCoord::new(1, 1);
        let route = Route::new(&grid, sink);

        assert_eq!(route.step_from(sink, |_| true), None);
    }

    #[test]
    fn occupied_minimum_falls_back_to_next_best() {
        let grid = open_grid(5, 5);
        let route = Route::new(&grid, CellCoord::new(4, 4));
        let blocked = CellCoord::new(2, 1);

        // Southeast is scanned first among the distance-3 neighbors of
        // (1,0); with it blocked the scan falls back to South, which
        // still strictly improves on the source's own distance of 4.
        let step = route.step_from(CellCoord::new(1, 0), |cell| cell != blocked);
        assert_eq!(step, Some(Direction::South));
    }

    #[test]
    fn blocked_minimum_without_strict_fallback_reports_no_move() {
        let grid = open_grid(5, 5);
        let route = Route::new(&grid, CellCoord::new(4, 4));
        let blocked = CellCoord::new(1, 1);

        // From the corner the diagonal is the only strictly improving
        // neighbor; its orthogonal siblings match the corner's own
        // distance and must not be selected.
        let step = route.step_from(CellCoord::new(0, 0), |cell| cell != blocked);
        assert_eq!(step, None);
    }

    #[test]
    fn fully_blocked_neighborhood_reports_no_move() {
        let grid = open_grid(3, 3);
        let route = Route::new(&grid, CellCoord::new(2, 2));

        assert_eq!(route.step_from(CellCoord::new(0, 0), |_| false), None);
    }
}
