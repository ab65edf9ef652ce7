use std::process::{Command, Output};

fn maze_trace(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-trace"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to invoke maze-trace binary")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "maze-trace failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn trace_of_canonical_maze_reaches_end() {
    let text = stdout(&maze_trace(&["trace"]));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 15, "14 events plus a summary line");
    assert_eq!(lines[0], "   0 visit     (0, 0) from -");
    assert_eq!(lines[14], "reached (6, 7) after 14 events");
}

#[test]
fn enclosing_end_reports_exhausted_search() {
    let text = stdout(&maze_trace(&["--toggle", "6,6", "trace"]));

    assert!(text.contains("  51 backtrack (0, 0) to -"));
    assert!(text.ends_with("no path to (6, 7); search exhausted after 52 events\n"));
}

#[test]
fn exported_layout_imports_to_same_trace() {
    let exported = stdout(&maze_trace(&["--toggle", "6,6", "export"]));
    let layout = exported.trim();
    assert!(layout.starts_with("maze:v1:8x8:"));

    let imported = stdout(&maze_trace(&["--import", layout, "trace"]));
    let edited = stdout(&maze_trace(&["--toggle", "6,6", "trace"]));
    assert_eq!(imported, edited);
}

#[test]
fn json_trace_lists_every_event() {
    let text = stdout(&maze_trace(&["trace", "--format", "json"]));

    assert_eq!(text.matches("\"kind\": \"Visit\"").count(), 14);
    assert!(!text.contains("Backtrack"));
}

#[test]
fn play_with_zero_interval_prints_every_step() {
    let text = stdout(&maze_trace(&["play", "--interval-ms", "0"]));

    assert_eq!(text.lines().count(), 15);
    assert!(text.ends_with("reached (6, 7) after 14 events\n"));
}

#[test]
fn play_interval_flag_overrides_layout_file() {
    let layout = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/dead_end.toml");
    let text = stdout(&maze_trace(&["--layout", layout, "play", "--interval-ms", "0"]));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 10);
    assert_eq!(lines[9], "reached (2, 2) after 9 events");
}

#[test]
fn layout_file_drives_the_search() {
    let layout = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/dead_end.toml");
    let text = stdout(&maze_trace(&["--layout", layout, "trace"]));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[3], "   3 backtrack (0, 2) to (0, 1)");
    assert_eq!(lines[9], "reached (2, 2) after 9 events");
}
