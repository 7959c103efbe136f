use std::fmt::{self, Debug, Display, Formatter};

use separator::Separatable;

/// Counters collected during one solve.
///
/// A round is one bound of IDA* or one run (between restarts) of annealing.
#[derive(Clone, Default, PartialEq)]
pub struct Stats {
    explored_by_round: Vec<u64>,
    deadlocks: u64,
    accepted: u64,
    rejected: u64,
    best_cost: Option<f64>,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn total_explored(&self) -> u64 {
        self.explored_by_round.iter().sum()
    }

    pub fn explored_by_round(&self) -> &[u64] {
        &self.explored_by_round
    }

    pub fn rounds(&self) -> usize {
        self.explored_by_round.len()
    }

    pub fn deadlocks(&self) -> u64 {
        self.deadlocks
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Lowest annealing cost seen across all runs
    pub fn best_cost(&self) -> Option<f64> {
        self.best_cost
    }

    pub(crate) fn start_round(&mut self) {
        self.explored_by_round.push(0);
    }

    pub(crate) fn add_explored(&mut self) {
        if self.explored_by_round.is_empty() {
            self.explored_by_round.push(0);
        }
        // never panics, made sure there is a round above
        let last = self.explored_by_round.len() - 1;
        self.explored_by_round[last] += 1;
    }

    pub(crate) fn add_deadlock(&mut self) {
        self.deadlocks += 1;
    }

    pub(crate) fn add_accepted(&mut self) {
        self.accepted += 1;
    }

    pub(crate) fn add_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Returns true if the cost is a new best
    pub(crate) fn update_best_cost(&mut self, cost: f64) -> bool {
        match self.best_cost {
            Some(best) if best <= cost => false,
            _ => {
                self.best_cost = Some(cost);
                true
            }
        }
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "explored by round: {:?}", self.explored_by_round)?;
        writeln!(f, "total explored: {}", self.total_explored().separated_string())?;
        writeln!(f, "pruned deadlocks: {}", self.deadlocks.separated_string())?;
        writeln!(f, "accepted: {}", self.accepted.separated_string())?;
        writeln!(f, "rejected: {}", self.rejected.separated_string())?;
        writeln!(f, "best cost: {:?}", self.best_cost)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "States explored total: {}", self.total_explored().separated_string())?;
        writeln!(f, "Deadlocked states pruned: {}", self.deadlocks.separated_string())?;
        if self.accepted + self.rejected > 0 {
            writeln!(f, "Accepted moves: {}", self.accepted.separated_string())?;
            writeln!(f, "Rejected moves: {}", self.rejected.separated_string())?;
        }
        if let Some(best) = self.best_cost {
            writeln!(f, "Best cost: {:.1}", best)?;
        }
        writeln!(f)?;

        writeln!(f, "Round / explored states:")?;
        for (i, explored) in self.explored_by_round.iter().enumerate() {
            let round = format!("{}: ", i);
            writeln!(f, "{:<5}{:<15}", round, explored.separated_string())?;
        }
        Ok(())
    }
}
