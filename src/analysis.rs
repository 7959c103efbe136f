//! Runs every configuration over a set of levels and summarizes the results.
//!
//! Solves are independent so they can run on several threads,
//! the summary is computed afterwards from the collected records only.

use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use prettytable::{format, Table};
use separator::Separatable;

use crate::config::{Configuration, HeuristicKind, SolverKind};
use crate::fs;
use crate::level::Level;
use crate::solver::{Failure, SolveResult};
use crate::Solve;

/// One solve of one level with one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub map: String,
    pub targets: usize,
    pub solver: SolverKind,
    pub heuristic: HeuristicKind,
    pub success: bool,
    pub timed_out: bool,
    /// As measured, a timed out solve can go a bit over the limit
    pub elapsed: Duration,
    pub explored: u64,
    /// 0 when not solved
    pub solution_len: usize,
}

impl Record {
    pub fn new(map: &str, level: &Level, result: &SolveResult) -> Self {
        Record {
            map: map.to_owned(),
            targets: level.map().box_count(),
            solver: result.solver,
            heuristic: result.heuristic,
            success: result.success(),
            timed_out: result.failure == Some(Failure::BudgetExceeded),
            elapsed: result.elapsed,
            explored: result.explored,
            solution_len: result.solution_len().unwrap_or(0),
        }
    }

    fn secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Solves every level with every configuration using `jobs` threads.
///
/// Records come back grouped by level, then by configuration, in the order given,
/// no matter how many threads were used.
pub fn run_suite(levels: &[(String, Level)], configs: &[Configuration], jobs: usize) -> Vec<Record> {
    let tasks: Vec<(&str, &Level, &Configuration)> = levels
        .iter()
        .flat_map(|(name, level)| configs.iter().map(move |config| (name.as_str(), level, config)))
        .collect();
    let jobs = jobs.max(1).min(tasks.len().max(1));

    let run = |(name, level, config): (&str, &Level, &Configuration)| {
        debug!("Running {} on {}", config, name);
        let result = level.solve(config);
        let record = Record::new(name, level, &result);
        info!(
            "{} {} / {} on {} | Time: {:.2}s | States: {} | Moves: {}",
            if record.success { "Success" } else { "Failed" },
            record.solver.name(),
            record.heuristic.name(),
            record.map,
            record.secs(),
            record.explored.separated_string(),
            record.solution_len,
        );
        record
    };

    if jobs == 1 {
        return tasks.into_iter().map(run).collect();
    }

    let mut indexed: Vec<(usize, Record)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..jobs)
            .map(|worker| {
                let tasks = &tasks;
                let run = &run;
                scope.spawn(move || {
                    tasks
                        .iter()
                        .enumerate()
                        .skip(worker)
                        .step_by(jobs)
                        .map(|(i, &task)| (i, run(task)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            // a panic in a worker is a bug in the solver, pass it on
            .flat_map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });
    indexed.sort_by_key(|&(i, _)| i);
    indexed.into_iter().map(|(_, record)| record).collect()
}

/// Averages over the successful runs of one heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicSummary {
    pub heuristic: HeuristicKind,
    pub runs: usize,
    pub successes: usize,
    pub mean_time: Option<f64>,
    pub mean_explored: Option<f64>,
    pub mean_len: Option<f64>,
}

impl HeuristicSummary {
    pub fn success_rate(&self) -> f64 {
        rate(self.successes, self.runs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub successes: usize,
    /// Means are over successful runs only, None if there are none
    pub mean_time: Option<f64>,
    pub mean_explored: Option<f64>,
    pub mean_len: Option<f64>,
    pub fastest: Option<Record>,
    pub fewest_states: Option<Record>,
    pub shortest: Option<Record>,
    pub by_heuristic: Vec<HeuristicSummary>,
    /// Mean explored states of successful runs per solver
    pub explored_by_solver: Vec<(SolverKind, Option<f64>)>,
}

impl Summary {
    pub fn from_records(records: &[Record]) -> Self {
        let solved: Vec<&Record> = records.iter().filter(|r| r.success).collect();

        let by_heuristic = HeuristicKind::ALL
            .iter()
            .filter_map(|&heuristic| {
                let runs: Vec<&Record> = records.iter().filter(|r| r.heuristic == heuristic).collect();
                if runs.is_empty() {
                    return None;
                }
                let solved: Vec<&Record> = runs.iter().cloned().filter(|r| r.success).collect();
                Some(HeuristicSummary {
                    heuristic,
                    runs: runs.len(),
                    successes: solved.len(),
                    mean_time: mean(solved.iter().map(|r| r.secs())),
                    mean_explored: mean(solved.iter().map(|r| r.explored as f64)),
                    mean_len: mean(solved.iter().map(|r| r.solution_len as f64)),
                })
            })
            .collect();

        let explored_by_solver = SolverKind::ALL
            .iter()
            .filter(|&&solver| records.iter().any(|r| r.solver == solver))
            .map(|&solver| {
                let explored = solved
                    .iter()
                    .filter(|r| r.solver == solver)
                    .map(|r| r.explored as f64);
                (solver, mean(explored))
            })
            .collect();

        // min_by_key keeps the first of equal records
        Summary {
            total: records.len(),
            successes: solved.len(),
            mean_time: mean(solved.iter().map(|r| r.secs())),
            mean_explored: mean(solved.iter().map(|r| r.explored as f64)),
            mean_len: mean(solved.iter().map(|r| r.solution_len as f64)),
            fastest: solved.iter().min_by_key(|r| r.elapsed).map(|&r| r.clone()),
            fewest_states: solved.iter().min_by_key(|r| r.explored).map(|&r| r.clone()),
            shortest: solved.iter().min_by_key(|r| r.solution_len).map(|&r| r.clone()),
            by_heuristic,
            explored_by_solver,
        }
    }

    pub fn success_rate(&self) -> f64 {
        rate(self.successes, self.total)
    }

    /// Heuristic with the lowest mean time among those that solved something
    pub fn fastest_heuristic(&self) -> Option<HeuristicKind> {
        self.by_heuristic
            .iter()
            .filter_map(|h| h.mean_time.map(|t| (h.heuristic, t)))
            .fold(None, |best: Option<(HeuristicKind, f64)>, (h, t)| match best {
                Some((_, best_t)) if best_t <= t => best,
                _ => Some((h, t)),
            })
            .map(|(h, _)| h)
    }

    /// Markdown report with general statistics, the best runs, a comparison
    /// of heuristics and conclusions drawn from them.
    pub fn report(&self) -> String {
        let mut out = String::new();
        // writing into a String can't fail
        let _ = self.write_report(&mut out);
        out
    }

    fn write_report(&self, f: &mut String) -> std::fmt::Result {
        writeln!(f, "# Comparative Analysis of Algorithms and Heuristics for Solving Sokoban")?;
        writeln!(f)?;

        writeln!(f, "## General Statistics")?;
        writeln!(f)?;
        writeln!(f, "- Total tests run: {}", self.total)?;
        writeln!(f, "- Successful tests: {} ({:.2}%)", self.successes, self.success_rate())?;
        writeln!(
            f,
            "- Mean execution time (successful tests): {} seconds",
            fmt_mean(self.mean_time)
        )?;
        writeln!(f, "- Mean number of explored states: {}", fmt_mean(self.mean_explored))?;
        writeln!(f, "- Mean solution length: {} moves", fmt_mean(self.mean_len))?;
        writeln!(f)?;

        writeln!(f, "## Most Efficient Configurations")?;
        writeln!(f)?;
        let highlights = [
            ("Fastest configuration", &self.fastest),
            ("Configuration with the fewest explored states", &self.fewest_states),
            ("Configuration with the shortest solution", &self.shortest),
        ];
        for &(title, record) in &highlights {
            if let Some(record) = record {
                writeln!(f, "### {}", title)?;
                writeln!(f, "- Solver: {}", record.solver.name())?;
                writeln!(f, "- Heuristic: {}", record.heuristic.name())?;
                writeln!(f, "- Map: {}", record.map)?;
                writeln!(f, "- Time: {:.2} seconds", record.secs())?;
                writeln!(f, "- Explored states: {}", record.explored)?;
                writeln!(f, "- Solution length: {} moves", record.solution_len)?;
                writeln!(f)?;
            }
        }

        writeln!(f, "## Heuristic Comparison")?;
        writeln!(f)?;
        writeln!(
            f,
            "| Heuristic | Success Rate | Mean Time | Explored States | Solution Length |"
        )?;
        writeln!(
            f,
            "|-----------|--------------|-----------|-----------------|-----------------|"
        )?;
        for h in &self.by_heuristic {
            let time = h.mean_time.map_or_else(|| "-".to_owned(), |t| format!("{:.2}s", t));
            writeln!(
                f,
                "| {} | {:.2}% | {} | {} | {} |",
                h.heuristic.name(),
                h.success_rate(),
                time,
                fmt_mean(h.mean_explored),
                fmt_mean(h.mean_len),
            )?;
        }
        writeln!(f)?;
        writeln!(f)?;

        writeln!(f, "## Conclusions")?;
        writeln!(f)?;
        writeln!(f, "Based on the analysis above:")?;
        writeln!(f)?;
        let mut n = 0;
        if let Some(heuristic) = self.fastest_heuristic() {
            n += 1;
            writeln!(
                f,
                "{}. The '{}' heuristic gives the best results in terms of execution time.",
                n,
                heuristic.name()
            )?;
        }
        if let [(a, Some(a_explored)), (b, Some(b_explored))] = &self.explored_by_solver[..] {
            let (fewer, more) = if a_explored <= b_explored { (a, b) } else { (b, a) };
            n += 1;
            writeln!(
                f,
                "{}. {} explores fewer states on average than {} in successful runs.",
                n,
                fewer.name(),
                more.name()
            )?;
        }
        if let Some(shortest) = self
            .by_heuristic
            .iter()
            .filter_map(|h| h.mean_len.map(|l| (h.heuristic, l)))
            .fold(None, |best: Option<(HeuristicKind, f64)>, (h, l)| match best {
                Some((_, best_l)) if best_l <= l => best,
                _ => Some((h, l)),
            })
        {
            n += 1;
            writeln!(
                f,
                "{}. The '{}' heuristic finds the shortest solutions on average.",
                n,
                shortest.0.name()
            )?;
        }
        n += 1;
        writeln!(
            f,
            "{}. Map complexity (measured by the number of targets) strongly affects the performance of the algorithms.",
            n
        )?;
        Ok(())
    }
}

/// One row per record, for the console.
pub fn records_table(records: &[Record]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Map", "Solver", "Heuristic", "Result", "Time (s)", "States", "Moves"]);
    for r in records {
        let result = if r.success {
            "solved"
        } else if r.timed_out {
            "timeout"
        } else {
            "failed"
        };
        table.add_row(row![
            r.map,
            r.solver.name(),
            r.heuristic.name(),
            result,
            format!("{:.3}", r.secs()),
            r.explored.separated_string(),
            r.solution_len,
        ]);
    }
    table
}

/// Raw records, one line each, with a header.
pub fn records_csv(records: &[Record]) -> String {
    let mut out = String::from("map,solver,heuristic,success,time,states_explored,solution_length,timed_out\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{:.6},{},{},{}\n",
            csv_field(&r.map),
            r.solver.name(),
            r.heuristic.name(),
            r.success,
            r.secs(),
            r.explored,
            r.solution_len,
            r.timed_out,
        ));
    }
    out
}

pub fn write_report<P: AsRef<Path>>(path: P, summary: &Summary) -> Result<(), Box<dyn Error>> {
    fs::write_file(path, &summary.report())
}

pub fn write_csv<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<(), Box<dyn Error>> {
    fs::write_file(path, &records_csv(records))
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

fn mean<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn fmt_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{:.2}", v))
}
