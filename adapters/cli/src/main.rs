#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a synthetic Outpost match.
//!
//! Generates a seeded random map, deploys units, and pumps the turn
//! loop — world events into the movement system, move commands back
//! into the world — until every unit has reached an objective or the
//! turn budget runs out. Prints a per-arrival trace and the navigator's
//! cache statistics at the end.

use anyhow::{bail, Context, Result};
use clap::Parser;
use outpost_core::{CellCoord, Command, Event};
use outpost_system_movement::Movement;
use outpost_world::{self as world, query, GameMap, World};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Runs a synthetic match on a randomly generated map.
#[derive(Debug, Parser)]
#[command(name = "outpost", about = "Grid navigation demo match")]
struct Args {
    /// Number of map columns.
    #[arg(long, default_value_t = 24)]
    columns: u32,

    /// Number of map rows.
    #[arg(long, default_value_t = 16)]
    rows: u32,

    /// Fraction of cells turned into impassable terrain.
    #[arg(long, default_value_t = 0.2)]
    obstacle_density: f64,

    /// Number of units deployed at match start.
    #[arg(long, default_value_t = 6)]
    units: usize,

    /// Number of objective cells units converge on.
    #[arg(long, default_value_t = 2)]
    objectives: usize,

    /// Maximum number of turns to simulate.
    #[arg(long, default_value_t = 200)]
    turns: u64,

    /// Seed for the map and deployment generator.
    #[arg(long, default_value_t = 24217)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.obstacle_density) {
        bail!(
            "obstacle density must lie in [0, 1], got {}",
            args.obstacle_density
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let map = generate_map(&args, &mut rng).context("generating map")?;
    let (objectives, deployments) =
        pick_sites(&map, &args, &mut rng).context("placing objectives and units")?;

    let mut movement = Movement::new(map.columns(), map.rows(), |cell| map.is_passable(cell))
        .context("constructing movement system")?;
    let mut world = World::from_map(map);

    println!(
        "match: {}x{} map, {} units, {} objectives, seed {}",
        args.columns,
        args.rows,
        deployments.len(),
        objectives.len(),
        args.seed
    );

    for &cell in &deployments {
        let mut events = Vec::new();
        world::apply(&mut world, Command::SpawnUnit { cell }, &mut events);
        if let Some(Event::SpawnRejected { reason, .. }) = events.first() {
            bail!("deployment at {cell:?} rejected: {reason:?}");
        }
    }

    let mut tally = Tally::default();
    let mut turns_simulated = 0;
    for _ in 0..args.turns {
        turns_simulated += 1;
        let log = pump_turn(&mut world, &mut movement, &objectives);
        tally.absorb(&log, turns_simulated);

        if query::unit_count(&world) == 0 {
            break;
        }
    }

    let remaining = query::unit_count(&world);
    println!(
        "finished after {turns_simulated} turns: {} arrivals, {} moves, {} rejected steps, {remaining} units still en route",
        tally.arrivals, tally.moves, tally.rejections
    );
    println!(
        "navigator: {} routes built, {} destinations cached",
        movement.navigator().routes_built(),
        movement.navigator().cached_routes()
    );

    Ok(())
}

/// Event totals accumulated across the match.
#[derive(Debug, Default)]
struct Tally {
    moves: u64,
    arrivals: u64,
    rejections: u64,
}

impl Tally {
    fn absorb(&mut self, log: &[Event], turn: u64) {
        for event in log {
            match event {
                Event::UnitMoved { .. } => self.moves += 1,
                Event::MoveRejected { .. } => self.rejections += 1,
                Event::UnitDespawned { unit, cell } => {
                    self.arrivals += 1;
                    println!(
                        "turn {turn:>4}: unit {} reached objective {:?}",
                        unit.get(),
                        (cell.column(), cell.row())
                    );
                }
                _ => {}
            }
        }
    }
}

/// Advances one turn and returns everything the world reported.
fn pump_turn(world: &mut World, movement: &mut Movement, objectives: &[CellCoord]) -> Vec<Event> {
    let mut log = Vec::new();
    world::apply(world, Command::AdvanceTurn, &mut log);

    let unit_view = query::unit_view(world);
    let mut commands = Vec::new();
    {
        let world_ref: &World = world;
        movement.handle(
            &log,
            &unit_view,
            objectives,
            |cell| query::is_occupiable(world_ref, cell),
            &mut commands,
        );
    }

    for command in commands {
        world::apply(world, command, &mut log);
    }

    let arrived: Vec<_> = query::unit_view(world)
        .iter()
        .filter(|unit| objectives.contains(&unit.cell))
        .map(|unit| unit.id)
        .collect();
    for unit in arrived {
        world::apply(world, Command::DespawnUnit { unit }, &mut log);
    }

    log
}

fn generate_map(args: &Args, rng: &mut ChaCha8Rng) -> Result<GameMap> {
    let cell_count = usize::try_from(u64::from(args.columns) * u64::from(args.rows))
        .context("map exceeds the addressable cell count")?;

    let mut terrain = vec![true; cell_count];
    for passable in &mut terrain {
        *passable = !rng.gen_bool(args.obstacle_density);
    }

    let columns = args.columns;
    GameMap::new(columns, args.rows, move |cell| {
        terrain[(cell.row() as usize) * (columns as usize) + cell.column() as usize]
    })
    .context("invalid map dimensions")
}

/// Chooses distinct passable cells for the objectives and deployments.
fn pick_sites(
    map: &GameMap,
    args: &Args,
    rng: &mut ChaCha8Rng,
) -> Result<(Vec<CellCoord>, Vec<CellCoord>)> {
    let mut open_cells = Vec::new();
    for row in 0..map.rows() {
        for column in 0..map.columns() {
            let cell = CellCoord::new(column, row);
            if map.is_passable(cell) {
                open_cells.push(cell);
            }
        }
    }

    let needed = args.objectives + args.units;
    if open_cells.len() < needed {
        bail!(
            "map has {} open cells but {needed} are needed; lower --obstacle-density",
            open_cells.len()
        );
    }

    open_cells.shuffle(rng);
    let objectives = open_cells[..args.objectives].to_vec();
    let deployments = open_cells[args.objectives..needed].to_vec();
    Ok((objectives, deployments))
}
