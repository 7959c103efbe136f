mod annealing;
mod assignment;
mod deadlock;
pub(crate) mod expand;
mod heuristics;
mod ida_star;
mod preprocessing;
mod stats;
#[cfg(test)]
pub(crate) mod test_util;

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::{Duration, Instant};

use crate::config::{Configuration, HeuristicKind, SolverKind};
use crate::level::Level;
use crate::map::Map;
use crate::moves::{Move, Moves};
use crate::state::State;
use crate::Solve;

use self::preprocessing::PushDists;

pub use self::stats::Stats;

/// Internal inconsistencies - the solver produced something that doesn't hold up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverErr {
    InvalidState,
    IllegalMove(usize),
    NotSolved,
}

impl Display for SolverErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SolverErr::InvalidState => {
                write!(f, "Invalid state - boxes or player overlap or stand on walls")
            }
            SolverErr::IllegalMove(step) => write!(f, "Illegal move at step {}", step),
            SolverErr::NotSolved => write!(f, "Solution doesn't end in a solved state"),
        }
    }
}

impl Error for SolverErr {}

/// Why a solve didn't produce a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The search ended without finding a solution
    Exhausted,
    /// The time limit ran out
    BudgetExceeded,
    Inconsistent(SolverErr),
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Failure::Exhausted => write!(f, "No solution found"),
            Failure::BudgetExceeded => write!(f, "Time limit exceeded"),
            Failure::Inconsistent(err) => write!(f, "Internal error: {}", err),
        }
    }
}

pub struct SolveResult {
    /// Some exactly when the solve succeeded, may be empty for already solved levels
    pub moves: Option<Moves>,
    pub elapsed: Duration,
    /// What the solver counted as explored, always 0 when annealing fails.
    /// The per-round counts are still in `stats`.
    pub explored: u64,
    pub failure: Option<Failure>,
    pub stats: Stats,
    pub solver: SolverKind,
    pub heuristic: HeuristicKind,
}

impl SolveResult {
    pub fn success(&self) -> bool {
        self.moves.is_some()
    }

    pub fn solution_len(&self) -> Option<usize> {
        self.moves.as_ref().map(Moves::move_cnt)
    }
}

impl Debug for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.moves, self.failure) {
            (Some(moves), _) => writeln!(
                f,
                "{} / {}: {}",
                self.solver,
                self.heuristic,
                moves.move_cnt()
            )?,
            (None, Some(failure)) => writeln!(f, "{}", failure)?,
            (None, None) => writeln!(f, "No solution")?,
        }
        writeln!(f, "Elapsed: {:?}", self.elapsed)?;
        write!(f, "{}", self.stats)
    }
}

impl Solve for Level {
    fn solve(&self, config: &Configuration) -> SolveResult {
        solve(self, config)
    }
}

/// Fixed when a solve starts, polled by the solvers before every node / iteration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub(crate) fn new(limit: Option<Duration>) -> Self {
        Deadline {
            started: Instant::now(),
            limit,
        }
    }

    pub(crate) fn expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Everything a solver needs that stays the same for the whole solve.
pub(crate) struct Context<'a> {
    pub(crate) map: &'a Map,
    dists: PushDists,
    heuristic: HeuristicKind,
    pub(crate) deadline: Deadline,
}

impl<'a> Context<'a> {
    /// None if the deadline passed during preprocessing
    fn new(map: &'a Map, heuristic: HeuristicKind, deadline: Deadline) -> Option<Self> {
        let dists = PushDists::with_deadline(map, &deadline)?;
        Some(Context {
            map,
            dists,
            heuristic,
            deadline,
        })
    }

    /// None means the state is provably unsolvable
    pub(crate) fn evaluate(&self, state: &State) -> Option<u32> {
        heuristics::evaluate(self.heuristic, self.map, &self.dists, state)
    }

    pub(crate) fn is_deadlocked(&self, state: &State) -> bool {
        deadlock::is_deadlocked(self.map, &self.dists, state)
    }

    /// Legal successors with their heuristic value.
    ///
    /// Deadlocked successors and those the heuristic gives up on are left out.
    /// Only pushes can create a deadlock so steps skip the check.
    pub(crate) fn successors(&self, state: &State, stats: &mut Stats) -> Vec<(Move, State, u32)> {
        let mut ret = Vec::new();
        for (mov, new_state) in expand::successors(self.map, state) {
            if mov.is_push && self.is_deadlocked(&new_state) {
                stats.add_deadlock();
                continue;
            }
            match self.evaluate(&new_state) {
                Some(h) => ret.push((mov, new_state, h)),
                None => stats.add_deadlock(),
            }
        }
        ret
    }
}

pub fn solve(level: &Level, config: &Configuration) -> SolveResult {
    let deadline = Deadline::new(config.time_limit);
    let map = level.map();
    let initial = level.initial_state();
    let mut stats = Stats::new();

    info!("Solving using {}", config);

    let outcome = if !initial.is_valid(map) {
        Err(Failure::Inconsistent(SolverErr::InvalidState))
    } else {
        debug!("Processing level...");
        match Context::new(map, config.heuristic, deadline) {
            None => Err(Failure::BudgetExceeded),
            Some(ctx) => {
                debug!("Processed level");
                if ctx.is_deadlocked(initial) {
                    debug!("Initial state is deadlocked");
                    Err(Failure::Exhausted)
                } else {
                    match config.solver {
                        SolverKind::IdaStar => ida_star::search(&ctx, initial, &mut stats),
                        SolverKind::SimulatedAnnealing => {
                            annealing::search(&ctx, initial, &config.annealing, &mut stats)
                        }
                    }
                }
            }
        }
    };

    let outcome = outcome.and_then(|moves| match level.replay(&moves) {
        Ok(ref end) if end.is_solved(map) => Ok(moves),
        Ok(_) => Err(Failure::Inconsistent(SolverErr::NotSolved)),
        Err(err) => Err(Failure::Inconsistent(err)),
    });

    let elapsed = deadline.elapsed();
    match &outcome {
        Ok(_) => info!(
            "Solved in {:?}, {} states explored",
            elapsed,
            stats.total_explored()
        ),
        Err(Failure::BudgetExceeded) => info!("Out of time after {:?}", elapsed),
        Err(failure) => info!("{}", failure),
    }
    debug!("Pruned {} deadlocked states", stats.deadlocks());

    // a failed annealing run has nothing to show for its iterations
    let explored = match (&outcome, config.solver) {
        (Err(_), SolverKind::SimulatedAnnealing) => 0,
        _ => stats.total_explored(),
    };
    let (moves, failure) = match outcome {
        Ok(moves) => (Some(moves), None),
        Err(failure) => (None, Some(failure)),
    };
    SolveResult {
        moves,
        elapsed,
        explored,
        failure,
        stats,
        solver: config.solver,
        heuristic: config.heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{AnnealingParams, ExploredCounting};

    fn level(s: &str) -> Level {
        s.parse().unwrap()
    }

    #[test]
    fn already_solved() {
        let level = level(
            r"
####
#@*#
####
",
        );
        for config in Configuration::all() {
            let result = level.solve(&config);
            assert!(result.success(), "{}", config);
            assert_eq!(result.solution_len(), Some(0));
            assert_eq!(result.failure, None);
        }
    }

    #[test]
    fn every_configuration_solves_small_levels() {
        for (i, s) in test_util::SMALL_LEVELS.iter().enumerate() {
            let level = level(s);
            for config in Configuration::all() {
                // annealing is only reliable on the corridors
                if config.solver == SolverKind::SimulatedAnnealing && i >= 2 {
                    continue;
                }
                let config = config.with_time_limit(Duration::from_secs(30));
                let result = level.solve(&config);
                assert!(result.success(), "{} on\n{}", config, level);
                let moves = result.moves.unwrap();
                assert!(level.replay(&moves).unwrap().is_solved(level.map()));
                assert_eq!(result.explored, result.stats.total_explored());
            }
        }
    }

    #[test]
    fn ida_star_is_optimal() {
        for s in test_util::all_levels() {
            let level = level(s);
            let optimal = test_util::optimal_len(level.map(), level.initial_state(), 200_000);
            for &heuristic in &HeuristicKind::ALL {
                if !heuristic.is_admissible() {
                    continue;
                }
                let config = Configuration::new(SolverKind::IdaStar, heuristic);
                let first = level.solve(&config);
                assert_eq!(first.solution_len(), optimal, "{}", config);

                // nothing random about it
                let second = level.solve(&config);
                assert_eq!(first.moves, second.moves);
                assert_eq!(first.explored, second.explored);
            }
        }
    }

    #[test]
    fn corridor_is_cheap() {
        let level = level(test_util::SMALL_LEVELS[1]);
        let config = Configuration::new(SolverKind::IdaStar, HeuristicKind::Simple)
            .with_time_limit(Duration::from_secs(1));
        let result = level.solve(&config);
        assert_eq!(result.solution_len(), Some(9));
        assert_eq!(result.moves.as_ref().map(Moves::push_cnt), Some(9));
        assert!(result.explored <= 300, "{}", result.explored);
        assert!(result.elapsed < Duration::from_secs(1));
    }

    #[test]
    fn unsolvable() {
        let level = level(
            r"
######
#@  .#
#$   #
######
",
        );
        for config in Configuration::all() {
            let result = level.solve(&config);
            assert!(!result.success());
            assert_eq!(result.failure, Some(Failure::Exhausted));
            assert_eq!(result.solution_len(), None);
            assert_eq!(result.explored, 0);
        }
    }

    #[test]
    fn zero_budget() {
        let level = level(
            r"
#######
#@ $ .#
#######
",
        );
        let annealing = AnnealingParams {
            counting: ExploredCounting::AcceptedMoves,
            ..AnnealingParams::default()
        };
        for config in Configuration::all() {
            let config = config
                .with_time_limit(Duration::from_secs(0))
                .with_annealing(annealing);
            let result = level.solve(&config);
            assert!(!result.success());
            assert_eq!(result.failure, Some(Failure::BudgetExceeded));
            assert_eq!(result.explored, 0);
        }
    }

    #[test]
    fn invalid_state_is_reported() {
        let level = level(
            r"
#####
#@$.#
#####
",
        );
        let box_pos = level.initial_state().boxes()[0];
        let broken = Level::new(
            level.map().clone(),
            State::new(box_pos, vec![box_pos]),
        );
        let result = broken.solve(&Configuration::default());
        assert_eq!(
            result.failure,
            Some(Failure::Inconsistent(SolverErr::InvalidState))
        );
        assert!(!result.success());
        assert_eq!(result.explored, 0);
    }
}
