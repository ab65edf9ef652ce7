use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use maze_trace_system_playback::DEFAULT_INTERVAL;
use maze_trace_world::Grid;
use serde::Deserialize;

/// Layout file describing the maze and its replay cadence.
///
/// ```toml
/// playback_interval_ms = 250
/// cells = [
///     [2, 0, 1],
///     [1, 0, 3],
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LayoutFile {
    cells: Vec<Vec<u8>>,
    #[serde(default)]
    playback_interval_ms: Option<u64>,
}

impl LayoutFile {
    /// Reads and parses the layout file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse layout file {}", path.display()))
    }

    /// Parses layout file contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("layout file is not valid TOML")
    }

    /// Builds the grid described by the file.
    pub(crate) fn grid(&self) -> Result<Grid> {
        Grid::from_codes(&self.cells).context("layout cells do not form a valid grid")
    }

    /// Replay interval configured by the file, if any.
    pub(crate) fn playback_interval(&self) -> Option<Duration> {
        self.playback_interval_ms.map(Duration::from_millis)
    }
}

/// Resolved settings the adapter runs with.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) grid: Grid,
    pub(crate) playback_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: Grid::canonical(),
            playback_interval: DEFAULT_INTERVAL,
        }
    }
}

impl Settings {
    /// Builds settings from a layout file.
    pub(crate) fn from_file(file: &LayoutFile) -> Result<Self> {
        Ok(Self {
            grid: file.grid()?,
            playback_interval: file.playback_interval().unwrap_or(DEFAULT_INTERVAL),
        })
    }

    /// Replaces the replay interval when a command-line value is given.
    #[must_use]
    pub(crate) fn with_interval_override(mut self, interval_ms: Option<u64>) -> Self {
        if let Some(millis) = interval_ms {
            self.playback_interval = Duration::from_millis(millis);
        }
        self
    }
}
