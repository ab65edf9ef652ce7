#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Depth-first backtracking search that records every visit and retreat.
//!
//! [`compute_trace`] walks the grid from its start cell, trying neighbours in
//! [`NEIGHBOR_PRIORITY`] order, and records a [`StepKind::Visit`] whenever it
//! enters a cell and a [`StepKind::Backtrack`] whenever it abandons one. The
//! walk stops at the first visit of the end cell, or after every reachable
//! cell has been abandoned.
//!
//! [`StepKind::Visit`]: maze_trace_core::StepKind::Visit
//! [`StepKind::Backtrack`]: maze_trace_core::StepKind::Backtrack

use maze_trace_core::{CellCoord, Event, StepEvent, Trace, NEIGHBOR_PRIORITY};
use maze_trace_world::Grid;

/// Computes the complete trace for `grid`.
///
/// The result depends only on the grid contents, so repeated calls on an
/// unmodified grid yield identical traces.
#[must_use]
pub fn compute_trace(grid: &Grid) -> Trace {
    let trace = Search::new(grid).run();
    tracing::debug!(
        events = trace.len(),
        visits = trace.visit_count(),
        outcome = ?trace.outcome(grid.end()),
        "trace computed"
    );
    trace
}

/// Pending work for one cell on the active search path.
#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    parent: Option<CellCoord>,
    next_direction: usize,
}

/// Run-local search state. A fresh instance is created for every trace.
#[derive(Debug)]
struct Search<'grid> {
    grid: &'grid Grid,
    explored: Vec<bool>,
    stack: Vec<Frame>,
    events: Vec<StepEvent>,
}

impl<'grid> Search<'grid> {
    fn new(grid: &'grid Grid) -> Self {
        let capacity = grid.rows() as usize * grid.columns() as usize;
        Self {
            grid,
            explored: vec![false; capacity],
            stack: Vec::new(),
            events: Vec::new(),
        }
    }

    fn run(mut self) -> Trace {
        if self.enter(self.grid.start(), None) {
            return Trace::from_events(self.events);
        }

        while let Some(frame) = self.stack.last_mut() {
            let Some(&direction) = NEIGHBOR_PRIORITY.get(frame.next_direction) else {
                let finished = *frame;
                let _ = self.stack.pop();
                self.events
                    .push(StepEvent::backtrack(finished.cell, finished.parent));
                continue;
            };

            frame.next_direction += 1;
            let from = frame.cell;
            let Some(neighbor) = from.step(direction, self.grid.rows(), self.grid.columns())
            else {
                continue;
            };

            if self.is_eligible(neighbor) && self.enter(neighbor, Some(from)) {
                break;
            }
        }

        Trace::from_events(self.events)
    }

    /// Records the visit of `cell` and reports whether it is the end cell.
    fn enter(&mut self, cell: CellCoord, parent: Option<CellCoord>) -> bool {
        self.events.push(StepEvent::visit(cell, parent));
        if cell == self.grid.end() {
            return true;
        }

        if let Some(index) = self.index(cell) {
            self.explored[index] = true;
        }
        self.stack.push(Frame {
            cell,
            parent,
            next_direction: 0,
        });
        false
    }

    fn is_eligible(&self, cell: CellCoord) -> bool {
        self.grid.is_open(cell)
            && self
                .index(cell)
                .is_some_and(|index| !self.explored[index])
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.grid.rows() && cell.column() < self.grid.columns() {
            Some(cell.row() as usize * self.grid.columns() as usize + cell.column() as usize)
        } else {
            None
        }
    }
}

/// System that keeps the trace for the current grid and drops it whenever
/// the grid changes.
#[derive(Debug, Default)]
pub struct TraceGenerator {
    cached: Option<Trace>,
    runs: u64,
}

impl TraceGenerator {
    /// Creates a generator with no cached trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events, discarding the cached trace on invalidation.
    pub fn handle(&mut self, events: &[Event]) {
        let invalidated = events
            .iter()
            .any(|event| matches!(event, Event::TraceInvalidated));
        if invalidated && self.cached.take().is_some() {
            tracing::debug!("cached trace invalidated");
        }
    }

    /// Returns the trace for `grid`, computing it if no valid trace is cached.
    ///
    /// The cache is keyed only by invalidation events, so callers must route
    /// every event produced for `grid` through [`TraceGenerator::handle`].
    pub fn trace(&mut self, grid: &Grid) -> &Trace {
        if self.cached.is_none() {
            self.runs += 1;
        }
        self.cached.get_or_insert_with(|| compute_trace(grid))
    }

    /// Reports whether a valid trace is currently cached.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.cached.is_some()
    }

    /// Number of searches run since the generator was created.
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_trace_core::{Cell, StepKind};

    #[test]
    fn adjacent_end_is_reached_without_backtracking() {
        let grid = Grid::from_codes(&[[2u8, 3]]).expect("valid layout");
        let trace = compute_trace(&grid);

        assert_eq!(
            trace.events(),
            &[
                StepEvent::visit(CellCoord::new(0, 0), None),
                StepEvent::visit(CellCoord::new(0, 1), Some(CellCoord::new(0, 0))),
            ]
        );
    }

    #[test]
    fn isolated_start_backtracks_immediately() {
        let grid = Grid::from_codes(&[[2u8, 1, 3]]).expect("valid layout");
        let trace = compute_trace(&grid);

        assert_eq!(
            trace.events(),
            &[
                StepEvent::visit(CellCoord::new(0, 0), None),
                StepEvent::backtrack(CellCoord::new(0, 0), None),
            ]
        );
    }

    #[test]
    fn end_cell_is_never_backtracked() {
        let grid = Grid::canonical();
        let trace = compute_trace(&grid);

        assert!(trace
            .iter()
            .all(|event| !(event.position == grid.end() && event.kind == StepKind::Backtrack)));
    }

    #[test]
    fn search_never_enters_walls() {
        let grid = Grid::canonical();
        let trace = compute_trace(&grid);

        for event in trace.iter() {
            assert_ne!(grid.cell(event.position), Ok(Cell::Wall));
        }
    }

    #[test]
    fn generator_recomputes_only_after_invalidation() {
        let mut grid = Grid::canonical();
        let mut generator = TraceGenerator::new();

        let first = generator.trace(&grid).clone();
        let _ = generator.trace(&grid);
        assert_eq!(generator.runs(), 1);

        generator.handle(&[Event::EditIgnored {
            cell: grid.start(),
        }]);
        assert!(generator.is_fresh());

        let mut events = Vec::new();
        maze_trace_world::apply(
            &mut grid,
            maze_trace_core::Command::ToggleWall { row: 6, column: 6 },
            &mut events,
        );
        generator.handle(&events);
        assert!(!generator.is_fresh());

        let second = generator.trace(&grid).clone();
        assert_eq!(generator.runs(), 2);
        assert_ne!(first, second);
    }
}
