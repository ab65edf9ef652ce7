use std::collections::{HashMap, HashSet, VecDeque};

use maze_trace_core::{CellCoord, SearchOutcome, StepEvent, StepKind, Trace};
use maze_trace_system_search::compute_trace;
use maze_trace_world::{apply_edit, Grid};

fn cell(row: u32, column: u32) -> CellCoord {
    CellCoord::new(row, column)
}

fn visit(row: u32, column: u32, parent: Option<(u32, u32)>) -> StepEvent {
    StepEvent::visit(cell(row, column), parent.map(|(r, c)| cell(r, c)))
}

fn backtrack(row: u32, column: u32, parent: Option<(u32, u32)>) -> StepEvent {
    StepEvent::backtrack(cell(row, column), parent.map(|(r, c)| cell(r, c)))
}

fn reachable(grid: &Grid) -> bool {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([grid.start()]);
    let _ = seen.insert(grid.start());

    while let Some(current) = queue.pop_front() {
        if current == grid.end() {
            return true;
        }
        for direction in maze_trace_core::NEIGHBOR_PRIORITY {
            if let Some(next) = current.step(direction, grid.rows(), grid.columns()) {
                if grid.is_open(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    false
}

fn assert_trace_invariants(grid: &Grid, trace: &Trace) {
    let first = trace.first().expect("trace is never empty");
    assert_eq!(*first, StepEvent::visit(grid.start(), None));

    let mut visits: HashMap<CellCoord, Option<CellCoord>> = HashMap::new();
    let mut backtracks = HashSet::new();
    for event in trace.iter() {
        assert!(
            grid.is_open(event.position),
            "search entered blocked cell {:?}",
            event.position
        );
        match event.kind {
            StepKind::Visit => {
                assert!(
                    visits.insert(event.position, event.parent).is_none(),
                    "{:?} visited twice",
                    event.position
                );
            }
            StepKind::Backtrack => {
                assert_eq!(
                    visits.get(&event.position),
                    Some(&event.parent),
                    "backtrack of {:?} must carry its visit parent",
                    event.position
                );
                assert!(
                    backtracks.insert(event.position),
                    "{:?} backtracked twice",
                    event.position
                );
            }
        }
    }

    let last = trace.last().expect("trace is never empty");
    if reachable(grid) {
        assert_eq!(last.kind, StepKind::Visit);
        assert_eq!(last.position, grid.end());
        assert_eq!(trace.outcome(grid.end()), SearchOutcome::ReachedEnd);
    } else {
        assert_eq!(*last, StepEvent::backtrack(grid.start(), None));
        assert!(!trace.reached(grid.end()));
        assert_eq!(trace.outcome(grid.end()), SearchOutcome::Exhausted);
    }
}

#[test]
fn canonical_maze_follows_right_down_left_up_priority() {
    let grid = Grid::canonical();
    let trace = compute_trace(&grid);

    let expected = vec![
        visit(0, 0, None),
        visit(0, 1, Some((0, 0))),
        visit(1, 1, Some((0, 1))),
        visit(1, 2, Some((1, 1))),
        visit(1, 3, Some((1, 2))),
        visit(1, 4, Some((1, 3))),
        visit(1, 5, Some((1, 4))),
        visit(1, 6, Some((1, 5))),
        visit(2, 6, Some((1, 6))),
        visit(3, 6, Some((2, 6))),
        visit(4, 6, Some((3, 6))),
        visit(5, 6, Some((4, 6))),
        visit(6, 6, Some((5, 6))),
        visit(6, 7, Some((6, 6))),
    ];

    assert_eq!(trace.events(), expected.as_slice());
    assert_trace_invariants(&grid, &trace);
}

#[test]
fn dead_end_branch_is_backtracked_before_next_sibling() {
    let grid = Grid::from_codes(&[[2u8, 0, 0], [0, 1, 1], [0, 0, 3]]).expect("valid layout");
    let trace = compute_trace(&grid);

    let expected = vec![
        visit(0, 0, None),
        visit(0, 1, Some((0, 0))),
        visit(0, 2, Some((0, 1))),
        backtrack(0, 2, Some((0, 1))),
        backtrack(0, 1, Some((0, 0))),
        visit(1, 0, Some((0, 0))),
        visit(2, 0, Some((1, 0))),
        visit(2, 1, Some((2, 0))),
        visit(2, 2, Some((2, 1))),
    ];

    assert_eq!(trace.events(), expected.as_slice());
}

#[test]
fn enclosing_the_end_exhausts_the_search() {
    let grid = Grid::canonical();
    let (enclosed, _) = apply_edit(&grid, 6, 6).expect("in-bounds edit");
    let trace = compute_trace(&enclosed);

    assert_eq!(trace.len(), 52);
    assert_eq!(trace.visit_count(), 26);
    assert_eq!(trace.last(), Some(&backtrack(0, 0, None)));
    assert!(!trace.reached(enclosed.end()));
    assert_eq!(
        &trace.events()[24..28],
        &[
            visit(4, 4, Some((3, 4))),
            backtrack(4, 4, Some((3, 4))),
            backtrack(3, 4, Some((3, 3))),
            visit(2, 3, Some((3, 3))),
        ]
    );
    assert_trace_invariants(&enclosed, &trace);
}

#[test]
fn new_wall_never_appears_in_following_trace() {
    let grid = Grid::canonical();
    let (edited, _) = apply_edit(&grid, 3, 6).expect("in-bounds edit");
    let trace = compute_trace(&edited);

    assert!(trace
        .iter()
        .filter(|event| event.is_visit())
        .all(|event| event.position != cell(3, 6)));
    assert_trace_invariants(&edited, &trace);
}

#[test]
fn repeated_runs_are_identical() {
    let grid = Grid::canonical();
    let (edited, _) = apply_edit(&grid, 6, 6).expect("in-bounds edit");

    assert_eq!(compute_trace(&grid), compute_trace(&grid));
    assert_eq!(compute_trace(&edited), compute_trace(&edited));
}

#[test]
fn every_three_by_three_wall_layout_satisfies_trace_invariants() {
    let interior: Vec<(i64, i64)> = (0..3)
        .flat_map(|row| (0..3).map(move |column| (row, column)))
        .filter(|&coord| coord != (0, 0) && coord != (2, 2))
        .collect();

    let base = Grid::from_codes(&[[2u8, 0, 0], [0, 0, 0], [0, 0, 3]]).expect("valid layout");

    for mask in 0u32..(1 << interior.len()) {
        let mut grid = base.clone();
        for (bit, &(row, column)) in interior.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                let _ = grid.toggle_wall(row, column).expect("in-bounds edit");
            }
        }

        let trace = compute_trace(&grid);
        assert_trace_invariants(&grid, &trace);
        assert_eq!(trace, compute_trace(&grid), "mask {mask:#b} diverged");
    }
}

#[test]
fn exhaustive_search_on_large_grid_stays_iterative() {
    let size = 100;
    let end = cell(size - 1, size - 1);
    let walls = [cell(size - 2, size - 1), cell(size - 1, size - 2)];
    let grid = Grid::new(size, size, cell(0, 0), end, walls).expect("valid grid");

    let trace = compute_trace(&grid);
    let reachable_cells = (size * size) as usize - 3;

    assert_eq!(trace.visit_count(), reachable_cells);
    assert_eq!(trace.len(), reachable_cells * 2);
    assert_eq!(trace.last(), Some(&backtrack(0, 0, None)));
}
