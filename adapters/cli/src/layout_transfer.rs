use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_trace_core::GridError;
use maze_trace_world::Grid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Single-line snapshot of a maze layout for copy and paste transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutSnapshot {
    rows: u32,
    columns: u32,
    cells: Vec<Vec<u8>>,
}

impl LayoutSnapshot {
    /// Captures the layout of `grid`.
    #[must_use]
    pub(crate) fn capture(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cells: grid.to_codes(),
        }
    }

    /// Encodes the snapshot as `maze:v1:<rows>x<columns>:<payload>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableSnapshot {
            cells: self.cells.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.rows, self.columns
        ))
    }

    /// Decodes a snapshot from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (rows, columns) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let actual_rows = decoded.cells.len();
        let actual_columns = decoded.cells.first().map_or(0, Vec::len);
        if actual_rows != rows as usize || actual_columns != columns as usize {
            return Err(LayoutTransferError::DimensionMismatch {
                declared: dimensions.to_owned(),
                rows: actual_rows,
                columns: actual_columns,
            });
        }

        Ok(Self {
            rows,
            columns,
            cells: decoded.cells,
        })
    }

    /// Builds the grid described by the snapshot.
    pub(crate) fn into_grid(self) -> Result<Grid, LayoutTransferError> {
        Grid::from_codes(&self.cells).map_err(LayoutTransferError::InvalidLayout)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    cells: Vec<Vec<u8>>,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The payload shape disagrees with the declared dimensions.
    #[error("layout declares {declared} but carries {rows}x{columns} cells")]
    DimensionMismatch {
        /// Dimensions segment as written in the string.
        declared: String,
        /// Number of rows found in the payload.
        rows: usize,
        /// Number of columns found in the first payload row.
        columns: usize,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The decoded cells do not form a valid grid.
    #[error("layout does not describe a valid grid: {0}")]
    InvalidLayout(#[source] GridError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());

    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;

    if rows == 0 || columns == 0 {
        return Err(invalid());
    }

    Ok((rows, columns))
}
