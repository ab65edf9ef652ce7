#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cursor-driven replay of a computed trace.
//!
//! A [`Playback`] owns one immutable [`Trace`] and a single cursor into it.
//! External ticks accumulate simulated time and advance the cursor one event
//! per elapsed interval. The set of cells whose visit has been passed is kept
//! as a projection for presentation.

use std::{collections::BTreeSet, time::Duration};

use maze_trace_core::{CellCoord, StepEvent, StepKind, Trace};

/// Interval between successive steps when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Lifecycle stage of a playback session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    /// Playback has not started since the last reset; grid edits are allowed.
    Editing,
    /// Ticks advance the cursor.
    Playing,
    /// Ticks are ignored until playback resumes.
    Paused,
}

/// Cell emphasised by the step under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// The search is entering the cell.
    Forward(CellCoord),
    /// The search is retreating to the cell.
    Retreat(CellCoord),
}

/// Replay state for a single trace.
#[derive(Clone, Debug)]
pub struct Playback {
    trace: Trace,
    cursor: usize,
    visited: BTreeSet<CellCoord>,
    mode: PlaybackMode,
    interval: Duration,
    accumulated: Duration,
}

impl Playback {
    /// Creates a playback positioned before the first event of `trace`.
    #[must_use]
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            cursor: 0,
            visited: BTreeSet::new(),
            mode: PlaybackMode::Editing,
            interval: DEFAULT_INTERVAL,
            accumulated: Duration::ZERO,
        }
    }

    /// Configures the simulated time that must elapse between steps.
    ///
    /// A zero interval replays every remaining event on the next tick.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Trace being replayed.
    #[must_use]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Index of the next event to replay.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of events in the replayed trace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// Reports whether the replayed trace is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Configured interval between steps.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reports whether the cursor has passed every event.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.trace.len()
    }

    /// Reports whether ticks currently advance the cursor.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    /// Reports whether grid edits are currently permitted.
    #[must_use]
    pub fn accepts_edits(&self) -> bool {
        self.mode == PlaybackMode::Editing
    }

    /// Cells whose visit events the cursor has passed.
    #[must_use]
    pub fn visited(&self) -> &BTreeSet<CellCoord> {
        &self.visited
    }

    /// Reports whether the cursor has passed the visit of `cell`.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.visited.contains(&cell)
    }

    /// Event under the cursor, if playback has not finished.
    #[must_use]
    pub fn current_step(&self) -> Option<&StepEvent> {
        self.trace.get(self.cursor)
    }

    /// Cell emphasised by the event under the cursor.
    ///
    /// Visits emphasise the entered cell; backtracks emphasise the parent the
    /// search retreats to. A backtrack out of the start cell has no parent and
    /// emphasises nothing.
    #[must_use]
    pub fn highlight(&self) -> Option<Highlight> {
        let step = self.current_step()?;
        match step.kind {
            StepKind::Visit => Some(Highlight::Forward(step.position)),
            StepKind::Backtrack => step.parent.map(Highlight::Retreat),
        }
    }

    /// Advances the cursor past one event regardless of mode.
    ///
    /// Returns the event that was passed, or `None` when already finished.
    pub fn step(&mut self) -> Option<StepEvent> {
        let event = *self.trace.get(self.cursor)?;
        if event.is_visit() {
            let _ = self.visited.insert(event.position);
        }
        self.cursor += 1;

        if self.is_finished() && self.mode == PlaybackMode::Playing {
            self.mode = PlaybackMode::Paused;
            self.accumulated = Duration::ZERO;
            tracing::debug!(steps = self.cursor, "playback finished");
        }

        Some(event)
    }

    /// Accumulates `dt` of simulated time while playing and advances one event
    /// per elapsed interval. Returns the number of events passed.
    pub fn tick(&mut self, dt: Duration) -> usize {
        if self.mode != PlaybackMode::Playing {
            return 0;
        }

        if self.interval.is_zero() {
            let remaining = self.trace.len().saturating_sub(self.cursor);
            for _ in 0..remaining {
                let _ = self.step();
            }
            return remaining;
        }

        self.accumulated = self.accumulated.saturating_add(dt);
        let mut advanced = 0;
        while self.mode == PlaybackMode::Playing && self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            if self.step().is_none() {
                break;
            }
            advanced += 1;
        }
        advanced
    }

    /// Starts, pauses, or resumes playback.
    ///
    /// Toggling a finished playback rewinds it and starts again from the
    /// first event.
    pub fn toggle_play(&mut self) {
        if self.is_finished() {
            self.rewind();
            self.mode = PlaybackMode::Playing;
            return;
        }

        self.mode = match self.mode {
            PlaybackMode::Playing => PlaybackMode::Paused,
            PlaybackMode::Editing | PlaybackMode::Paused => PlaybackMode::Playing,
        };
    }

    /// Installs `trace`, rewinds the cursor, and returns to edit mode.
    pub fn reset(&mut self, trace: Trace) {
        self.trace = trace;
        self.rewind();
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.visited.clear();
        self.mode = PlaybackMode::Editing;
        self.accumulated = Duration::ZERO;
    }
}
