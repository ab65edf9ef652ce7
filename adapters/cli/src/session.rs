use std::time::Duration;

use maze_trace_core::{Cell, Command, Event, StepEvent};
use maze_trace_system_playback::Playback;
use maze_trace_system_search::TraceGenerator;
use maze_trace_world::{self as world, Grid};

/// Glue between the grid, the trace generator and the playback cursor.
///
/// Edits are only accepted while the playback is in edit mode. Every accepted
/// edit invalidates the trace and reinstalls a freshly computed one.
#[derive(Debug)]
pub(crate) struct Session {
    grid: Grid,
    generator: TraceGenerator,
    playback: Playback,
}

impl Session {
    pub(crate) fn new(grid: Grid, interval: Duration) -> Self {
        let mut generator = TraceGenerator::new();
        let trace = generator.trace(&grid).clone();
        Self {
            grid,
            generator,
            playback: Playback::new(trace).with_interval(interval),
        }
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Toggles a wall at `(row, column)`.
    ///
    /// Returns `None` when edits are locked by an active playback.
    pub(crate) fn edit(&mut self, row: i64, column: i64) -> Option<Vec<Event>> {
        if !self.playback.accepts_edits() {
            tracing::debug!(row, column, "edit ignored while replaying");
            return None;
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.grid,
            Command::ToggleWall { row, column },
            &mut events,
        );
        self.generator.handle(&events);
        if !self.generator.is_fresh() {
            self.reset();
        }
        Some(events)
    }

    /// Recomputes the trace for the current grid and rewinds playback.
    pub(crate) fn reset(&mut self) {
        let trace = self.generator.trace(&self.grid).clone();
        self.playback.reset(trace);
    }

    pub(crate) fn toggle_play(&mut self) {
        self.playback.toggle_play();
    }

    /// Advances playback by `dt`, returning the events that were passed.
    pub(crate) fn tick(&mut self, dt: Duration) -> Vec<StepEvent> {
        let start = self.playback.cursor();
        let advanced = self.playback.tick(dt);
        self.playback.trace().events()[start..start + advanced].to_vec()
    }
}

/// Summarises an edit for display.
pub(crate) fn describe_edit(events: &[Event]) -> String {
    events
        .iter()
        .find_map(|event| match event {
            Event::WallToggled { cell, state } => Some(format!(
                "({}, {}) is now {}",
                cell.row(),
                cell.column(),
                match state {
                    Cell::Wall => "a wall",
                    _ => "open",
                }
            )),
            Event::EditIgnored { cell } => Some(format!(
                "({}, {}) is protected; edit ignored",
                cell.row(),
                cell.column()
            )),
            Event::EditRejected { reason } => Some(format!("edit rejected: {reason}")),
            Event::TraceInvalidated => None,
        })
        .unwrap_or_default()
}
