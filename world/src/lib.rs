#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid model for the maze trace engine.
//!
//! The [`Grid`] owns maze topology and guards the edit invariants: exactly one
//! start and one end cell exist at fixed coordinates, and every other cell is
//! either empty or a wall. Edits flow through [`apply`], which broadcasts
//! [`Event`] values so that trace consumers know when to recompute.

mod layout;

use maze_trace_core::{
    Cell, CellCoord, Command, ConfigurationError, EditOutcome, Event, GridError,
};

pub use layout::{cell_code, CANONICAL_END, CANONICAL_LAYOUT, CANONICAL_START};

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 24;

/// Fixed-dimension rectangular maze with designated start and end cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
    start: CellCoord,
    end: CellCoord,
}

impl Grid {
    /// Creates a grid of `rows` by `columns` cells with the provided start,
    /// end and wall cells. Every unlisted cell is empty.
    pub fn new<I>(
        rows: u32,
        columns: u32,
        start: CellCoord,
        end: CellCoord,
        walls: I,
    ) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        if rows == 0 || columns == 0 {
            return Err(ConfigurationError::Empty.into());
        }

        let mut grid = Self {
            rows,
            columns,
            cells: vec![Cell::Empty; cell_capacity(rows, columns)?],
            start,
            end,
        };

        let start_index = grid
            .index(start)
            .ok_or(ConfigurationError::OutsideGrid(start))?;
        let end_index = grid
            .index(end)
            .ok_or(ConfigurationError::OutsideGrid(end))?;
        if start == end {
            return Err(ConfigurationError::StartIsEnd(start).into());
        }

        grid.cells[start_index] = Cell::Start;
        grid.cells[end_index] = Cell::End;

        for wall in walls {
            let index = grid
                .index(wall)
                .ok_or(ConfigurationError::OutsideGrid(wall))?;
            if grid.cells[index].is_protected() {
                return Err(ConfigurationError::WallOnProtectedCell(wall).into());
            }
            grid.cells[index] = Cell::Wall;
        }

        Ok(grid)
    }

    /// Builds a grid from rows of numeric cell codes.
    ///
    /// Codes follow [`cell_code`]: `0` empty, `1` wall, `2` start, `3` end.
    pub fn from_codes<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[u8]>,
    {
        layout::parse(rows)
    }

    /// Builds the canonical 8x8 demonstration maze.
    #[must_use]
    pub fn canonical() -> Self {
        let mut cells = Vec::with_capacity(64);
        for row in CANONICAL_LAYOUT.iter() {
            cells.extend(row.iter().map(|&code| layout::decode_known(code)));
        }

        Self {
            rows: 8,
            columns: 8,
            cells,
            start: CANONICAL_START,
            end: CANONICAL_END,
        }
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Coordinate of the start cell.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Coordinate of the end cell.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    /// Returns the cell stored at a signed `(row, column)` coordinate.
    pub fn cell_state(&self, row: i64, column: i64) -> Result<Cell, GridError> {
        let coord = self.resolve(row, column)?;
        self.cell(coord)
    }

    /// Returns the cell stored at `coord`.
    pub fn cell(&self, coord: CellCoord) -> Result<Cell, GridError> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or_else(|| self.out_of_bounds(i64::from(coord.row()), i64::from(coord.column())))
    }

    /// Reports whether the search may enter `coord`. Cells outside the grid
    /// are never open.
    #[must_use]
    pub fn is_open(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_ok_and(Cell::is_open)
    }

    /// Flips the addressed cell between empty and wall.
    ///
    /// Start and end cells are left untouched and reported as
    /// [`EditOutcome::Protected`].
    pub fn toggle_wall(&mut self, row: i64, column: i64) -> Result<EditOutcome, GridError> {
        let coord = self.resolve(row, column)?;
        self.toggle_at(coord)
    }

    /// Iterator over every cell in row-major order alongside its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
            .zip(self.cells.iter().copied())
    }

    /// Exports the grid as rows of numeric cell codes.
    #[must_use]
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|&cell| cell_code(cell)).collect())
            .collect()
    }

    fn resolve(&self, row: i64, column: i64) -> Result<CellCoord, GridError> {
        let in_rows = u32::try_from(row).ok().filter(|row| *row < self.rows);
        let in_columns = u32::try_from(column)
            .ok()
            .filter(|column| *column < self.columns);

        match (in_rows, in_columns) {
            (Some(row), Some(column)) => Ok(CellCoord::new(row, column)),
            _ => Err(self.out_of_bounds(row, column)),
        }
    }

    fn toggle_at(&mut self, coord: CellCoord) -> Result<EditOutcome, GridError> {
        let index = self.index(coord).ok_or_else(|| {
            self.out_of_bounds(i64::from(coord.row()), i64::from(coord.column()))
        })?;

        let next = match self.cells[index] {
            Cell::Start | Cell::End => return Ok(EditOutcome::Protected),
            Cell::Empty => Cell::Wall,
            Cell::Wall => Cell::Empty,
        };
        self.cells[index] = next;
        Ok(EditOutcome::Toggled(next))
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.row() < self.rows && coord.column() < self.columns {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            row.checked_mul(width)?.checked_add(column)
        } else {
            None
        }
    }

    fn out_of_bounds(&self, row: i64, column: i64) -> GridError {
        GridError::OutOfBounds {
            row,
            column,
            rows: self.rows,
            columns: self.columns,
        }
    }
}

/// Applies the provided command to the grid, mutating it deterministically.
///
/// A successful toggle broadcasts [`Event::WallToggled`] followed by
/// [`Event::TraceInvalidated`]. Edits aimed at start or end cells emit
/// [`Event::EditIgnored`] and leave any existing trace valid.
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ToggleWall { row, column } => {
            let outcome = grid
                .resolve(row, column)
                .and_then(|cell| grid.toggle_at(cell).map(|outcome| (cell, outcome)));

            match outcome {
                Ok((cell, EditOutcome::Toggled(state))) => {
                    tracing::debug!(row, column, ?state, "wall toggled");
                    out_events.push(Event::WallToggled { cell, state });
                    out_events.push(Event::TraceInvalidated);
                }
                Ok((cell, EditOutcome::Protected)) => {
                    tracing::debug!(row, column, "edit on protected cell ignored");
                    out_events.push(Event::EditIgnored { cell });
                }
                Err(reason) => {
                    tracing::debug!(row, column, %reason, "edit rejected");
                    out_events.push(Event::EditRejected { reason });
                }
            }
        }
    }
}

/// Returns a copy of `grid` with the addressed cell toggled.
///
/// The returned grid equals the input when the target is protected.
pub fn apply_edit(grid: &Grid, row: i64, column: i64) -> Result<(Grid, EditOutcome), GridError> {
    let mut next = grid.clone();
    let outcome = next.toggle_wall(row, column)?;
    Ok((next, outcome))
}

fn cell_capacity(rows: u32, columns: u32) -> Result<usize, ConfigurationError> {
    let rows = usize::try_from(rows).unwrap_or(usize::MAX);
    let columns = usize::try_from(columns).unwrap_or(usize::MAX);
    rows.checked_mul(columns)
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or(ConfigurationError::TooLarge { rows, columns })
}
