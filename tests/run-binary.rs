use std::env;
use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;

fn binary() -> Command {
    Command::cargo_bin("sokoban-search").unwrap()
}

#[test]
fn solve_simplest() {
    let output = r"Solving levels/custom/01-simplest.txt using ida-star with ida-star heuristic...
Solution found with 1 moves!
R
Moves: 1
Pushes: 1
Explored states: 2

#####
#@$.#
#####

#####
# @*#
#####

";

    binary()
        .arg("solve")
        .arg("--print-states")
        .arg("levels/custom/01-simplest.txt")
        .assert()
        .success()
        .stdout(output);
}

#[test]
fn solve_simplest_with_annealing() {
    let output = r"Solving levels/custom/01-simplest.txt using simulated-annealing with target-matching heuristic...
Solution found with 1 moves!
R
Moves: 1
Pushes: 1
Explored states: 0
";

    binary()
        .arg("solve")
        .args(&["--solver", "simulated-annealing"])
        .args(&["--heuristic", "target-matching"])
        .args(&["--seed", "7"])
        .args(&["--timeout", "10"])
        .arg("levels/custom/01-simplest.txt")
        .assert()
        .success()
        .stdout(output);
}

#[test]
fn solve_already_solved() {
    let output = r"Solving levels/custom/00-solved.txt using ida-star with simple heuristic...
Solution found with 0 moves!

Moves: 0
Pushes: 0
Explored states: 1
";

    binary()
        .arg("solve")
        .args(&["--heuristic", "simple"])
        .arg("levels/custom/00-solved.txt")
        .assert()
        .success()
        .stdout(output);
}

#[test]
fn solve_no_solution() {
    let output = r"Solving levels/custom/04-no-solution.txt using ida-star with matching heuristic...
No solution found!
Explored states: 0
";

    binary()
        .arg("solve")
        .args(&["--heuristic", "matching"])
        .arg("levels/custom/04-no-solution.txt")
        .assert()
        .success()
        .stdout(output);
}

#[test]
fn invalid_level() {
    binary()
        .arg("solve")
        .arg("levels/custom/invalid-no-player.txt")
        .assert()
        .failure()
        .stdout("");

    binary()
        .arg("solve")
        .arg("levels/custom/does-not-exist.txt")
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn bad_args() {
    // doesn't check stderr, clap's messages aren't ours to test

    binary()
        .arg("solve")
        .args(&["--solver", "dfs"])
        .arg("levels/custom/01-simplest.txt")
        .assert()
        .failure()
        .stdout("");

    binary()
        .arg("solve")
        .args(&["--timeout", "-1"])
        .arg("levels/custom/01-simplest.txt")
        .assert()
        .failure()
        .stdout("");

    binary().assert().failure();
}

#[test]
fn analyze_writes_report() {
    let dir = env::temp_dir();
    let report = dir.join(format!("sokoban-search-report-{}.md", std::process::id()));
    let csv = dir.join(format!("sokoban-search-results-{}.csv", std::process::id()));

    binary()
        .arg("analyze")
        .args(&["--timeout", "10"])
        .args(&["--jobs", "2"])
        .args(&["--max-maps", "2"])
        .arg("--output")
        .arg(&report)
        .arg("--csv")
        .arg(&csv)
        .arg("levels/custom/03-two-boxes.txt")
        .arg("levels/custom/01-simplest.txt")
        .arg("levels/custom/00-solved.txt")
        .assert()
        .success();

    let report_text = fs::read_to_string(&report).unwrap();
    assert!(report_text.contains("- Total tests run: 16"));
    assert!(report_text.contains("- Successful tests: 16 (100.00%)"));
    assert!(report_text.contains("| Simple | 100.00% |"));
    // the two-box level has the most targets so it's left out
    assert!(!report_text.contains("03-two-boxes"));

    let csv_text = fs::read_to_string(&csv).unwrap();
    assert_eq!(csv_text.lines().count(), 17);
    assert!(csv_text.starts_with("map,solver,heuristic,success,"));

    fs::remove_file(report).unwrap();
    fs::remove_file(csv).unwrap();
}
