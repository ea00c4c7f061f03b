#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that orders units toward objectives.
//!
//! This is the per-turn caller of the navigation service: it reacts to
//! turn events, consumes immutable unit snapshots, and emits one move
//! command per unit along the navigator-chosen direction. It never
//! mutates the world directly and receives the live occupiability
//! predicate as an explicit argument each turn.

use outpost_core::{CellCoord, Command, ConfigurationError, Event, UnitView};
use outpost_navigation::Navigator;

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug)]
pub struct Movement {
    navigator: Navigator,
}

impl Movement {
    /// Creates the system and its navigator from the match's static
    /// map, supplied as dimensions and a passability predicate.
    pub fn new<F>(columns: u32, rows: u32, is_passable: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(CellCoord) -> bool,
    {
        Ok(Self {
            navigator: Navigator::new(columns, rows, is_passable)?,
        })
    }

    /// Consumes world events and immutable views to emit move commands.
    ///
    /// Nothing is emitted unless a turn advanced. Units are visited in
    /// identifier order; each is sent toward the objective with the
    /// smallest path distance (ties resolve to the earliest objective
    /// in the slice), and a unit with no reachable objective, or no
    /// strictly improving occupiable step this turn, simply stalls.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        unit_view: &UnitView,
        objectives: &[CellCoord],
        is_occupiable: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        if objectives.is_empty() {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TurnAdvanced { .. }))
        {
            return;
        }

        for unit in unit_view.iter() {
            let Some(objective) = self.select_objective(unit.cell, objectives) else {
                continue;
            };
            if objective == unit.cell {
                continue;
            }

            let Some(direction) =
                self.navigator
                    .direction_to(unit.cell, objective, &is_occupiable)
            else {
                continue;
            };
            out.push(Command::MoveUnit {
                unit: unit.id,
                direction,
            });
        }
    }

    /// The navigation service backing this system, for cache statistics.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    fn select_objective(
        &mut self,
        cell: CellCoord,
        objectives: &[CellCoord],
    ) -> Option<CellCoord> {
        let mut best: Option<(CellCoord, u32)> = None;
        for &objective in objectives {
            let Some(distance) = self.navigator.distance_between(cell, objective) else {
                continue;
            };
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((objective, distance));
            }
        }

        best.map(|(objective, _)| objective)
    }
}

#[cfg(test)]
mod tests {
    use outpost_core::{UnitId, UnitSnapshot};

    use super::*;

    fn view_of(units: &[(u32, CellCoord)]) -> UnitView {
        UnitView::from_snapshots(
            units
                .iter()
                .map(|&(id, cell)| UnitSnapshot {
                    id: UnitId::new(id),
                    cell,
                })
                .collect(),
        )
    }

    #[test]
    fn nearest_objective_is_selected_by_path_distance() {
        // A wall makes the euclidean-closest objective the longer trip.
        let mut movement = Movement::new(5, 3, |cell| {
            !(cell.column() == 3 && cell.row() < 2)
        })
        .expect("movement");

        let near_looking = CellCoord::new(4, 0);
        let far_looking = CellCoord::new(0, 2);
        let objective = movement
            .select_objective(CellCoord::new(2, 0), &[near_looking, far_looking])
            .expect("objective");

        assert_eq!(objective, far_looking);
    }

    #[test]
    fn unreachable_objectives_are_skipped() {
        let mut movement = Movement::new(3, 3, |cell| cell.row() != 1).expect("movement");

        let sealed = CellCoord::new(1, 2);
        let open = CellCoord::new(2, 0);
        let objective = movement
            .select_objective(CellCoord::new(0, 0), &[sealed, open])
            .expect("objective");

        assert_eq!(objective, open);
        assert_eq!(
            movement.select_objective(CellCoord::new(0, 0), &[sealed]),
            None
        );
    }

    #[test]
    fn commands_are_withheld_until_a_turn_advances() {
        let mut movement = Movement::new(4, 4, |_| true).expect("movement");
        let view = view_of(&[(0, CellCoord::new(0, 0))]);
        let objectives = [CellCoord::new(3, 3)];
        let mut out = Vec::new();

        movement.handle(&[], &view, &objectives, |_| true, &mut out);
        assert!(out.is_empty());

        movement.handle(
            &[Event::TurnAdvanced { turn: 1 }],
            &view,
            &objectives,
            |_| true,
            &mut out,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn units_already_on_an_objective_stall() {
        let mut movement = Movement::new(4, 4, |_| true).expect("movement");
        let objective = CellCoord::new(2, 2);
        let view = view_of(&[(0, objective)]);
        let mut out = Vec::new();

        movement.handle(
            &[Event::TurnAdvanced { turn: 1 }],
            &view,
            &[objective],
            |_| true,
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn moves_are_emitted_in_unit_order() {
        let mut movement = Movement::new(5, 5, |_| true).expect("movement");
        let view = view_of(&[(7, CellCoord::new(4, 0)), (3, CellCoord::new(0, 4))]);
        let mut out = Vec::new();

        movement.handle(
            &[Event::TurnAdvanced { turn: 1 }],
            &view,
            &[CellCoord::new(4, 4)],
            |_| true,
            &mut out,
        );

        let units: Vec<_> = out
            .iter()
            .map(|command| match command {
                Command::MoveUnit { unit, .. } => *unit,
                other => panic!("unexpected command {other:?}"),
            })
            .collect();
        assert_eq!(units, vec![UnitId::new(3), UnitId::new(7)]);
    }
}
