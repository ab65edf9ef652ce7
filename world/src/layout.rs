//! Numeric cell-code layouts and the canonical demonstration maze.

use maze_trace_core::{Cell, CellCoord, ConfigurationError, GridError};

use super::Grid;

const CODE_EMPTY: u8 = 0;
const CODE_WALL: u8 = 1;
const CODE_START: u8 = 2;
const CODE_END: u8 = 3;

/// Start coordinate of the canonical maze.
pub const CANONICAL_START: CellCoord = CellCoord::new(0, 0);

/// End coordinate of the canonical maze.
pub const CANONICAL_END: CellCoord = CellCoord::new(6, 7);

/// Cell codes of the canonical 8x8 maze in row-major order.
pub const CANONICAL_LAYOUT: [[u8; 8]; 8] = [
    [2, 0, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 1],
    [1, 1, 0, 0, 0, 1, 0, 3],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

/// Numeric code used to represent `cell` in layouts.
#[must_use]
pub const fn cell_code(cell: Cell) -> u8 {
    match cell {
        Cell::Empty => CODE_EMPTY,
        Cell::Wall => CODE_WALL,
        Cell::Start => CODE_START,
        Cell::End => CODE_END,
    }
}

fn decode(code: u8) -> Option<Cell> {
    match code {
        CODE_EMPTY => Some(Cell::Empty),
        CODE_WALL => Some(Cell::Wall),
        CODE_START => Some(Cell::Start),
        CODE_END => Some(Cell::End),
        _ => None,
    }
}

/// Decodes a code drawn from [`CANONICAL_LAYOUT`]; unknown codes become walls.
pub(crate) fn decode_known(code: u8) -> Cell {
    decode(code).unwrap_or(Cell::Wall)
}

pub(crate) fn parse<R>(rows: &[R]) -> Result<Grid, GridError>
where
    R: AsRef<[u8]>,
{
    let expected = rows.first().map_or(0, |row| row.as_ref().len());
    if expected == 0 {
        return Err(ConfigurationError::Empty.into());
    }

    let too_large = ConfigurationError::TooLarge {
        rows: rows.len(),
        columns: expected,
    };
    let height = u32::try_from(rows.len()).map_err(|_| too_large.clone())?;
    let width = u32::try_from(expected).map_err(|_| too_large)?;

    let mut start = None;
    let mut end = None;
    let mut walls = Vec::new();

    for ((row_index, row), row_coord) in rows.iter().enumerate().zip(0..height) {
        let row = row.as_ref();
        if row.len() != expected {
            return Err(ConfigurationError::RaggedRow {
                row: row_index,
                expected,
                found: row.len(),
            }
            .into());
        }

        for ((column_index, &code), column_coord) in row.iter().enumerate().zip(0..width) {
            let coord = CellCoord::new(row_coord, column_coord);
            match decode(code) {
                Some(Cell::Empty) => {}
                Some(Cell::Wall) => walls.push(coord),
                Some(Cell::Start) => {
                    if start.replace(coord).is_some() {
                        return Err(ConfigurationError::DuplicateStart.into());
                    }
                }
                Some(Cell::End) => {
                    if end.replace(coord).is_some() {
                        return Err(ConfigurationError::DuplicateEnd.into());
                    }
                }
                None => {
                    return Err(ConfigurationError::UnknownCellCode {
                        row: row_index,
                        column: column_index,
                        code,
                    }
                    .into())
                }
            }
        }
    }

    let start = start.ok_or(ConfigurationError::MissingStart)?;
    let end = end.ok_or(ConfigurationError::MissingEnd)?;

    Grid::new(height, width, start, end, walls)
}
