#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze trace engine.
//!
//! This crate defines the vocabulary that connects the grid model, the
//! depth-first trace generator, the playback cursor, and adapters. Adapters
//! submit [`Command`] values describing desired grid edits, the world applies
//! them through its `apply` entry point and broadcasts [`Event`] values, and
//! systems react by recomputing or replaying a [`Trace`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Open floor that the search may enter.
    Empty,
    /// Blocked cell that the search never enters.
    Wall,
    /// Cell the search departs from.
    Start,
    /// Cell the search tries to reach.
    End,
}

impl Cell {
    /// Reports whether the cell is immune to wall-toggle edits.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// Reports whether the search may enter the cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Location of a single grid cell expressed as zero-indexed row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the adjacent coordinate in `direction`, if it stays inside a
    /// grid of `rows` by `columns` cells.
    #[must_use]
    pub fn step(self, direction: Direction, rows: u32, columns: u32) -> Option<CellCoord> {
        let (row, column) = match direction {
            Direction::Right => (Some(self.row), self.column.checked_add(1)),
            Direction::Down => (self.row.checked_add(1), Some(self.column)),
            Direction::Left => (Some(self.row), self.column.checked_sub(1)),
            Direction::Up => (self.row.checked_sub(1), Some(self.column)),
        };

        match (row, column) {
            (Some(row), Some(column)) if row < rows && column < columns => {
                Some(CellCoord::new(row, column))
            }
            _ => None,
        }
    }
}

/// Cardinal directions the search may move in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward decreasing row indices.
    Up,
}

/// Order in which the search tries neighbours of every cell.
///
/// This order decides which of several valid routes is found first, so
/// altering it changes every trace the engine produces.
pub const NEIGHBOR_PRIORITY: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

/// Discriminates forward entries from retreats within a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// Forward entry into the event's position.
    Visit,
    /// Retreat from the event's position back to its parent.
    Backtrack,
}

/// Single record within a [`Trace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepEvent {
    /// Cell the event refers to.
    pub position: CellCoord,
    /// Cell the position was entered from; `None` only for the start cell.
    pub parent: Option<CellCoord>,
    /// Whether the event enters or leaves the position.
    pub kind: StepKind,
}

impl StepEvent {
    /// Creates a visit event for `position` entered from `parent`.
    #[must_use]
    pub const fn visit(position: CellCoord, parent: Option<CellCoord>) -> Self {
        Self {
            position,
            parent,
            kind: StepKind::Visit,
        }
    }

    /// Creates a backtrack event retreating from `position` to `parent`.
    #[must_use]
    pub const fn backtrack(position: CellCoord, parent: Option<CellCoord>) -> Self {
        Self {
            position,
            parent,
            kind: StepKind::Backtrack,
        }
    }

    /// Reports whether the event is a forward visit.
    #[must_use]
    pub const fn is_visit(&self) -> bool {
        matches!(self.kind, StepKind::Visit)
    }
}

/// Terminal condition of a completed search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// The trace ends on a visit of the end cell.
    ReachedEnd,
    /// Every reachable cell was explored without reaching the end cell.
    Exhausted,
}

/// Ordered, immutable record of one complete search run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trace {
    events: Vec<StepEvent>,
}

impl Trace {
    /// Wraps the provided events into a trace.
    #[must_use]
    pub fn from_events(events: Vec<StepEvent>) -> Self {
        Self { events }
    }

    /// Events in the order they were recorded.
    #[must_use]
    pub fn events(&self) -> &[StepEvent] {
        &self.events
    }

    /// Iterator over the recorded events.
    pub fn iter(&self) -> impl Iterator<Item = &StepEvent> {
        self.events.iter()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Reports whether the trace contains no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StepEvent> {
        self.events.get(index)
    }

    /// First recorded event.
    #[must_use]
    pub fn first(&self) -> Option<&StepEvent> {
        self.events.first()
    }

    /// Last recorded event.
    #[must_use]
    pub fn last(&self) -> Option<&StepEvent> {
        self.events.last()
    }

    /// Number of visit events in the trace.
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_visit()).count()
    }

    /// Reports whether any visit event targets `end`.
    #[must_use]
    pub fn reached(&self, end: CellCoord) -> bool {
        self.events
            .iter()
            .any(|event| event.is_visit() && event.position == end)
    }

    /// Classifies the trace by inspecting whether it visited `end`.
    #[must_use]
    pub fn outcome(&self, end: CellCoord) -> SearchOutcome {
        if self.reached(end) {
            SearchOutcome::ReachedEnd
        } else {
            SearchOutcome::Exhausted
        }
    }
}

/// Result of a wall-toggle edit that targeted an in-bounds cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditOutcome {
    /// The cell flipped and now holds the provided state.
    Toggled(Cell),
    /// The cell is a start or end cell, so the grid is unchanged.
    Protected,
}

impl EditOutcome {
    /// Reports whether the edit changed the grid.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Toggled(_))
    }
}

/// Errors raised by the grid model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A coordinate fell outside the grid dimensions.
    #[error("cell ({row}, {column}) lies outside the {rows}x{columns} grid")]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        column: i64,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
    /// The grid could not be constructed from the supplied layout.
    #[error("invalid grid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),
}

/// Specific reasons a grid layout is rejected at construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The layout has zero rows or zero columns.
    #[error("grid must contain at least one row and one column")]
    Empty,
    /// A layout row differs in length from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A layout cell used a code outside the supported range.
    #[error("unknown cell code {code} at ({row}, {column})")]
    UnknownCellCode {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        column: usize,
        /// Code that could not be interpreted.
        code: u8,
    },
    /// The layout does not contain a start cell.
    #[error("grid has no start cell")]
    MissingStart,
    /// The layout does not contain an end cell.
    #[error("grid has no end cell")]
    MissingEnd,
    /// The layout contains more than one start cell.
    #[error("grid has more than one start cell")]
    DuplicateStart,
    /// The layout contains more than one end cell.
    #[error("grid has more than one end cell")]
    DuplicateEnd,
    /// Start and end share a coordinate.
    #[error("start and end both occupy {0:?}")]
    StartIsEnd(CellCoord),
    /// A designated cell lies outside the grid.
    #[error("{0:?} lies outside the grid")]
    OutsideGrid(CellCoord),
    /// A wall was requested on the start or end cell.
    #[error("wall requested on protected cell {0:?}")]
    WallOnProtectedCell(CellCoord),
    /// The requested dimensions exceed the supported cell count.
    #[error("{rows}x{columns} grid exceeds the supported cell count")]
    TooLarge {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        columns: usize,
    },
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Flips the addressed cell between empty and wall.
    ToggleWall {
        /// Requested row, possibly outside the grid.
        row: i64,
        /// Requested column, possibly outside the grid.
        column: i64,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a cell flipped between empty and wall.
    WallToggled {
        /// Cell that changed.
        cell: CellCoord,
        /// State the cell holds after the edit.
        state: Cell,
    },
    /// Reports that an edit targeted a start or end cell and was ignored.
    EditIgnored {
        /// Protected cell that was targeted.
        cell: CellCoord,
    },
    /// Reports that an edit could not be resolved to a grid cell.
    EditRejected {
        /// Reason the edit failed.
        reason: GridError,
    },
    /// Announces that any trace computed before this event is stale.
    TraceInvalidated,
}
