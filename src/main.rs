use std::env;
use std::error::Error;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{info, warn};
use separator::Separatable;

use sokoban_search::analysis::{self, Summary};
use sokoban_search::config::{AnnealingParams, Configuration, HeuristicKind, SolverKind};
use sokoban_search::level::Level;
use sokoban_search::solver::Failure;
use sokoban_search::{LoadLevel, Solve};

fn main() {
    env_logger::init();

    let solvers: Vec<String> = SolverKind::ALL.iter().map(|s| s.to_string()).collect();
    let solvers: Vec<&str> = solvers.iter().map(String::as_str).collect();
    let heuristics: Vec<String> = HeuristicKind::ALL.iter().map(|h| h.to_string()).collect();
    let heuristics: Vec<&str> = heuristics.iter().map(String::as_str).collect();

    let matches = App::new("sokoban-search")
        .author("Martin Taibr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Solves sokoban levels with IDA* or simulated annealing")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("solve")
                .about("Solve a single level")
                .arg(
                    Arg::with_name("solver")
                        .short("s")
                        .long("solver")
                        .takes_value(true)
                        .possible_values(&solvers)
                        .default_value("ida-star"),
                )
                .arg(
                    Arg::with_name("heuristic")
                        .long("heuristic")
                        .takes_value(true)
                        .possible_values(&heuristics)
                        .default_value("ida-star"),
                )
                .arg(
                    Arg::with_name("timeout")
                        .short("t")
                        .long("timeout")
                        .takes_value(true)
                        .validator(is_secs)
                        .help("time limit in seconds (default: none)"),
                )
                .arg(
                    Arg::with_name("seed")
                        .long("seed")
                        .takes_value(true)
                        .validator(is_number::<u64>)
                        .help("seed for simulated annealing"),
                )
                .arg(
                    Arg::with_name("print-states")
                        .short("p")
                        .long("print-states")
                        .help("print the level after each push"),
                )
                .arg(
                    Arg::with_name("include-steps")
                        .long("include-steps")
                        .requires("print-states")
                        .help("print the level after each move, not just pushes"),
                )
                .arg(
                    Arg::with_name("stats")
                        .long("stats")
                        .help("print detailed search statistics"),
                )
                .arg(Arg::with_name("file").required(true)),
        )
        .subcommand(
            SubCommand::with_name("analyze")
                .about("Run every solver with every heuristic on a set of levels and write a report")
                .arg(
                    Arg::with_name("timeout")
                        .short("t")
                        .long("timeout")
                        .takes_value(true)
                        .validator(is_secs)
                        .default_value("300")
                        .help("time limit of each test in seconds"),
                )
                .arg(
                    Arg::with_name("jobs")
                        .short("j")
                        .long("jobs")
                        .takes_value(true)
                        .validator(is_number::<usize>)
                        .default_value("1")
                        .help("number of tests to run in parallel"),
                )
                .arg(
                    Arg::with_name("max-maps")
                        .long("max-maps")
                        .takes_value(true)
                        .validator(is_number::<usize>)
                        .help("only use this many maps, those with fewest targets first"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .default_value("summary_report.md")
                        .help("where to write the markdown report"),
                )
                .arg(
                    Arg::with_name("csv")
                        .long("csv")
                        .takes_value(true)
                        .help("also export raw results as CSV"),
                )
                .arg(Arg::with_name("files").required(true).multiple(true)),
        )
        .get_matches();

    let res = match matches.subcommand() {
        ("solve", Some(args)) => run_solve(args),
        ("analyze", Some(args)) => run_analyze(args),
        // SubcommandRequiredElseHelp makes clap exit before we get here
        _ => Ok(()),
    };
    if let Err(err) = res {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run_solve(args: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    // clap validated these
    let solver: SolverKind = args.value_of("solver").unwrap_or_default().parse()?;
    let heuristic: HeuristicKind = args.value_of("heuristic").unwrap_or_default().parse()?;
    let path = args.value_of("file").unwrap_or_default();

    let mut config = Configuration::new(solver, heuristic);
    if let Some(secs) = args.value_of("timeout") {
        config = config.with_time_limit(Duration::from_secs_f64(secs.parse()?));
    }
    if let Some(seed) = args.value_of("seed") {
        config = config.with_annealing(AnnealingParams {
            seed: seed.parse()?,
            ..AnnealingParams::default()
        });
    }

    let level = load(path)?;

    println!("Solving {} using {}...", path, config);
    let result = level.solve(&config);
    info!("Solve took {:?}", result.elapsed);

    match &result.moves {
        Some(moves) => {
            println!("Solution found with {} moves!", moves.move_cnt());
            println!("{}", moves);
            println!("Moves: {}", moves.move_cnt());
            println!("Pushes: {}", moves.push_cnt());
        }
        None => {
            println!("No solution found!");
            match result.failure {
                None | Some(Failure::Exhausted) => {}
                Some(failure) => println!("{}", failure),
            }
        }
    }
    println!("Explored states: {}", result.explored.separated_string());

    if args.is_present("stats") {
        println!("Elapsed: {:?}", result.elapsed);
        print!("{}", result.stats);
    }
    if let (true, Some(moves)) = (args.is_present("print-states"), &result.moves) {
        println!();
        print!("{}", level.xsb_solution(moves, args.is_present("include-steps")));
    }
    Ok(())
}

fn run_analyze(args: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    let timeout: f64 = args.value_of("timeout").unwrap_or("300").parse()?;
    let jobs: usize = args.value_of("jobs").unwrap_or("1").parse()?;
    let output = args.value_of("output").unwrap_or("summary_report.md");

    let mut levels: Vec<(String, Level)> = Vec::new();
    for path in args.values_of("files").into_iter().flatten() {
        match path.load_level() {
            Ok(level) => {
                info!("Loaded map: {}", path);
                levels.push((path.to_owned(), level));
            }
            Err(err) => warn!("Failed to load {}: {}", path, err),
        }
    }
    if levels.is_empty() {
        return Err("No maps to analyze".into());
    }

    // stable so maps with the same number of targets keep the order they were given in
    levels.sort_by_key(|(_, level)| level.map().box_count());
    if let Some(max) = args.value_of("max-maps") {
        levels.truncate(max.parse()?);
    }

    let configs: Vec<_> = Configuration::all()
        .into_iter()
        .map(|c| c.with_time_limit(Duration::from_secs_f64(timeout)))
        .collect();

    println!(
        "Analyzing {} maps with {} configurations...",
        levels.len(),
        configs.len()
    );
    let records = analysis::run_suite(&levels, &configs, jobs);
    analysis::records_table(&records).printstd();

    let summary = Summary::from_records(&records);
    analysis::write_report(output, &summary)?;
    println!("Summary report written to {}", output);

    if let Some(csv) = args.value_of("csv") {
        analysis::write_csv(csv, &records)?;
        println!("Results exported to {}", csv);
    }
    Ok(())
}

fn load(path: &str) -> Result<Level, Box<dyn Error>> {
    path.load_level().map_err(|err| {
        let dir = env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        format!("Can't load level {} in {}: {}", path, dir, err).into()
    })
}

fn is_secs(s: String) -> Result<(), String> {
    match s.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(()),
        _ => Err(format!("Not a valid number of seconds: {}", s)),
    }
}

fn is_number<T: FromStr>(s: String) -> Result<(), String> {
    s.parse::<T>()
        .map(|_| ())
        .map_err(|_| format!("Not a valid number: {}", s))
}
