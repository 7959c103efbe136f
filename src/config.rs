use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverKind {
    IdaStar,
    SimulatedAnnealing,
}

impl SolverKind {
    pub const ALL: [SolverKind; 2] = [SolverKind::IdaStar, SolverKind::SimulatedAnnealing];

    /// Name used in reports
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::IdaStar => "IDA*",
            SolverKind::SimulatedAnnealing => "Simulated Annealing",
        }
    }
}

impl Display for SolverKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SolverKind::IdaStar => write!(f, "ida-star"),
            SolverKind::SimulatedAnnealing => write!(f, "simulated-annealing"),
        }
    }
}

impl FromStr for SolverKind {
    type Err = ParseKindErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ida-star" | "ida_star" => Ok(SolverKind::IdaStar),
            "simulated-annealing" | "simulated_annealing" | "annealing" => {
                Ok(SolverKind::SimulatedAnnealing)
            }
            _ => Err(ParseKindErr(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    Simple,
    Matching,
    TargetMatching,
    IdaStar,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 4] = [
        HeuristicKind::Simple,
        HeuristicKind::Matching,
        HeuristicKind::IdaStar,
        HeuristicKind::TargetMatching,
    ];

    /// Name used in reports
    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Simple => "Simple",
            HeuristicKind::Matching => "Matching",
            HeuristicKind::TargetMatching => "Target Matching",
            HeuristicKind::IdaStar => "IDA*",
        }
    }

    /// Never overestimates the remaining number of moves
    pub fn is_admissible(self) -> bool {
        self != HeuristicKind::TargetMatching
    }
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::Simple => write!(f, "simple"),
            HeuristicKind::Matching => write!(f, "matching"),
            HeuristicKind::TargetMatching => write!(f, "target-matching"),
            HeuristicKind::IdaStar => write!(f, "ida-star"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = ParseKindErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(HeuristicKind::Simple),
            "matching" => Ok(HeuristicKind::Matching),
            "target-matching" | "target_matching" => Ok(HeuristicKind::TargetMatching),
            "ida-star" | "ida_star" => Ok(HeuristicKind::IdaStar),
            _ => Err(ParseKindErr(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindErr(pub String);

impl Display for ParseKindErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown name: {}", self.0)
    }
}

impl Error for ParseKindErr {}

/// What simulated annealing reports as explored states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExploredCounting {
    /// Every evaluated candidate, accepted or not
    Iterations,
    /// Only candidates that became the current state
    AcceptedMoves,
    /// Always report 0
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnealingParams {
    pub start_temp: f64,
    /// A run ends when the temperature drops below this
    pub end_temp: f64,
    /// Temperature is multiplied by this after each iteration
    pub cooling: f64,
    /// Max iterations of a single run
    pub max_steps: u64,
    /// How many times to start over from a perturbed initial state
    pub restarts: u32,
    /// Weight of the number of moves taken so far in the cost
    pub path_weight: f64,
    pub seed: u64,
    pub counting: ExploredCounting,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        AnnealingParams {
            start_temp: 1000.0,
            end_temp: 0.1,
            cooling: 0.995,
            max_steps: 100_000,
            restarts: 10,
            path_weight: 0.0,
            seed: 0,
            counting: ExploredCounting::Iterations,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Configuration {
    pub solver: SolverKind,
    pub heuristic: HeuristicKind,
    /// None means no limit
    pub time_limit: Option<Duration>,
    pub annealing: AnnealingParams,
}

impl Configuration {
    pub fn new(solver: SolverKind, heuristic: HeuristicKind) -> Self {
        Configuration {
            solver,
            heuristic,
            time_limit: None,
            annealing: AnnealingParams::default(),
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingParams) -> Self {
        self.annealing = annealing;
        self
    }

    /// Every solver with every heuristic
    pub fn all() -> Vec<Configuration> {
        let mut configs = Vec::new();
        for &solver in &SolverKind::ALL {
            for &heuristic in &HeuristicKind::ALL {
                configs.push(Configuration::new(solver, heuristic));
            }
        }
        configs
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(SolverKind::IdaStar, HeuristicKind::IdaStar)
    }
}

impl Display for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} heuristic", self.solver, self.heuristic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &solver in &SolverKind::ALL {
            assert_eq!(solver.to_string().parse::<SolverKind>(), Ok(solver));
        }
        for &heuristic in &HeuristicKind::ALL {
            assert_eq!(heuristic.to_string().parse::<HeuristicKind>(), Ok(heuristic));
        }
        assert_eq!(
            "annealing".parse::<SolverKind>(),
            Ok(SolverKind::SimulatedAnnealing)
        );
        assert!("dfs".parse::<SolverKind>().is_err());
    }

    #[test]
    fn all_configurations() {
        let configs = Configuration::all();
        assert_eq!(configs.len(), 8);
        assert!(configs.iter().all(|c| c.time_limit.is_none()));
        assert_eq!(
            Configuration::default().to_string(),
            "ida-star with ida-star heuristic"
        );
    }
}
