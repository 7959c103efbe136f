// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused)]
// Clippy
#![allow(unknown_lints)] // necessary because rustc doesn't know about clippy

#[macro_use]
extern crate log;
#[macro_use]
extern crate prettytable;

pub mod analysis;
pub mod config;
pub mod level;
pub mod map;
pub mod map_formatter;
pub mod moves;
pub mod solution_formatter;
pub mod solver;
pub mod state;

mod data;
mod fs;
mod parser;
mod vec2d;

use std::error::Error;
use std::path::Path;

use crate::config::Configuration;
use crate::level::Level;
use crate::solver::SolveResult;

pub use crate::data::{Dir, Pos};
pub use crate::parser::ParserErr;

pub trait LoadLevel {
    fn load_level(&self) -> Result<Level, Box<dyn Error>>;
}

impl<P: AsRef<Path> + ?Sized> LoadLevel for P {
    fn load_level(&self) -> Result<Level, Box<dyn Error>> {
        let text = fs::read_file(self)?;
        Ok(parser::parse(&text)?)
    }
}

pub trait Solve {
    fn solve(&self, config: &Configuration) -> SolveResult;
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use separator::Separatable;

    use crate::config::{HeuristicKind, SolverKind};
    use crate::solver::Failure;

    use super::*;

    #[test]
    fn bundled_levels() {
        // (file, optimal length, pushes)
        let levels = [
            ("00-solved.txt", Some(0), 0),
            ("01-simplest.txt", Some(1), 1),
            ("02-corridor.txt", Some(9), 9),
            ("03-two-boxes.txt", Some(6), 2),
            ("04-no-solution.txt", None, 0),
        ];

        for &(name, expected_len, expected_pushes) in &levels {
            let path = format!("levels/custom/{}", name);
            let level = path.load_level().unwrap();
            for &heuristic in &HeuristicKind::ALL {
                if !heuristic.is_admissible() {
                    continue;
                }
                let started = Instant::now();
                let config = Configuration::new(SolverKind::IdaStar, heuristic)
                    .with_time_limit(Duration::from_secs(60));
                let result = level.solve(&config);
                println!(
                    "Solved {} using {} in approximately {} ms",
                    path,
                    config,
                    (started.elapsed().as_millis() as u64).separated_string(),
                );

                assert_eq!(result.solution_len(), expected_len, "{} {}", path, config);
                match result.moves {
                    Some(ref moves) => assert_eq!(moves.push_cnt(), expected_pushes),
                    None => assert_eq!(result.failure, Some(Failure::Exhausted)),
                }
            }
        }
    }

    #[test]
    fn loading_errors() {
        assert!("levels/custom/does-not-exist.txt".load_level().is_err());
        assert!(Path::new("levels/custom/01-simplest.txt").load_level().is_ok());
    }
}
