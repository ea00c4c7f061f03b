#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Multi-destination shortest-path service over a static passability grid.
//!
//! The service is layered bottom-up: [`TerrainGrid`] captures the map's
//! static 8-way adjacency once at match start, [`Route`] is a dense
//! shortest-hop-distance table built lazily for one destination cell,
//! and [`Navigator`] memoizes one route per distinct destination ever
//! requested and answers every query through two operations —
//! [`Navigator::direction_to`] and [`Navigator::distance_between`].
//!
//! Static terrain and dynamic unit occupancy are kept strictly apart:
//! adjacency and distances never change after construction, while the
//! per-turn "is this cell currently free" predicate is supplied by the
//! caller on every direction request and evaluated live.

mod grid;
mod navigator;
mod route;

pub use grid::TerrainGrid;
pub use navigator::Navigator;
pub use route::Route;
