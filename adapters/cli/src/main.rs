#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that computes and replays maze search traces.

mod config;
mod layout_transfer;
mod session;

use std::{path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use maze_trace_core::{SearchOutcome, StepEvent, StepKind, Trace};
use tracing_subscriber::EnvFilter;

use self::{
    config::{LayoutFile, Settings},
    layout_transfer::LayoutSnapshot,
    session::{describe_edit, Session},
};

/// Computes depth-first search traces over grid mazes.
#[derive(Debug, Parser)]
#[command(name = "maze-trace", version)]
struct Cli {
    /// TOML layout file; the canonical 8x8 maze is used when omitted.
    #[arg(long, global = true, conflicts_with = "import")]
    layout: Option<PathBuf>,
    /// Layout transfer string produced by the `export` command.
    #[arg(long, global = true)]
    import: Option<String>,
    /// Toggles a wall at ROW,COL before running; may be repeated.
    #[arg(
        long = "toggle",
        global = true,
        value_name = "ROW,COL",
        allow_hyphen_values = true,
        value_parser = parse_cell
    )]
    toggles: Vec<(i64, i64)>,
    /// Increases log verbosity; `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Prints every event of the trace.
    Trace {
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Replays the trace one event per interval.
    Play {
        /// Milliseconds between steps; overrides the layout file.
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Prints a layout transfer string for the current grid.
    Export,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Entry point for the maze trace command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let interval_override = match &cli.command {
        Some(Mode::Play { interval_ms }) => *interval_ms,
        _ => None,
    };
    let settings = resolve_settings(&cli)?.with_interval_override(interval_override);
    let interval = settings.playback_interval;
    let mut session = Session::new(settings.grid, interval);

    for &(row, column) in &cli.toggles {
        if let Some(events) = session.edit(row, column) {
            eprintln!("{}", describe_edit(&events));
        }
    }

    match cli.command.unwrap_or(Mode::Trace {
        format: Format::Text,
    }) {
        Mode::Trace { format } => print_trace(&session, format),
        Mode::Play { .. } => {
            play(&mut session, interval);
            Ok(())
        }
        Mode::Export => {
            let encoded = LayoutSnapshot::capture(session.grid())
                .encode()
                .context("failed to encode layout")?;
            println!("{encoded}");
            Ok(())
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    if let Some(path) = &cli.layout {
        let file = LayoutFile::load(path)?;
        return Settings::from_file(&file);
    }

    if let Some(value) = &cli.import {
        let grid = LayoutSnapshot::decode(value)
            .and_then(LayoutSnapshot::into_grid)
            .context("failed to import layout string")?;
        return Ok(Settings {
            grid,
            ..Settings::default()
        });
    }

    Ok(Settings::default())
}

fn print_trace(session: &Session, format: Format) -> Result<()> {
    let trace = session.playback().trace();
    match format {
        Format::Text => {
            for (index, event) in trace.iter().enumerate() {
                println!("{}", format_step(index, event));
            }
            println!("{}", summarise(session, trace));
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(trace).context("failed to serialise trace")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn play(session: &mut Session, interval: Duration) {
    session.toggle_play();
    let mut index = 0;
    while session.playback().is_playing() {
        thread::sleep(interval);
        for event in session.tick(interval) {
            println!("{}", format_step(index, &event));
            index += 1;
        }
    }
    println!("{}", summarise(session, session.playback().trace()));
}

fn format_step(index: usize, event: &StepEvent) -> String {
    let position = event.position;
    let parent = event
        .parent
        .map(|cell| format!("({}, {})", cell.row(), cell.column()))
        .unwrap_or_else(|| "-".to_owned());

    match event.kind {
        StepKind::Visit => format!(
            "{index:>4} visit     ({}, {}) from {parent}",
            position.row(),
            position.column()
        ),
        StepKind::Backtrack => format!(
            "{index:>4} backtrack ({}, {}) to {parent}",
            position.row(),
            position.column()
        ),
    }
}

fn summarise(session: &Session, trace: &Trace) -> String {
    let end = session.grid().end();
    match trace.outcome(end) {
        SearchOutcome::ReachedEnd => format!(
            "reached ({}, {}) after {} events",
            end.row(),
            end.column(),
            trace.len()
        ),
        SearchOutcome::Exhausted => format!(
            "no path to ({}, {}); search exhausted after {} events",
            end.row(),
            end.column(),
            trace.len()
        ),
    }
}

fn parse_cell(value: &str) -> Result<(i64, i64), String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{value}'"))?;
    let row = row
        .trim()
        .parse::<i64>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    let column = column
        .trim()
        .parse::<i64>()
        .map_err(|error| format!("invalid column '{column}': {error}"))?;
    Ok((row, column))
}
