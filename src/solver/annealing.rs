use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AnnealingParams, ExploredCounting};
use crate::moves::{Move, Moves};
use crate::solver::{Context, Failure, Stats};
use crate::state::State;

const FIRST_PERTURBATION: usize = 5;
const MIN_PERTURBATION: f64 = 3.0;
const MAX_PERTURBATION: f64 = 10.0;

/// Moves taken from the initial state with loops cut out.
///
/// Coming back to a state already on the path drops everything after its first visit
/// so the path never contains the same state twice.
struct Path {
    states: Vec<State>,
    moves: Vec<Move>,
    index: FnvHashMap<State, usize>,
}

impl Path {
    fn new(initial: State) -> Self {
        let mut index = FnvHashMap::default();
        index.insert(initial.clone(), 0);
        Path {
            states: vec![initial],
            moves: Vec::new(),
            index,
        }
    }

    fn current(&self) -> &State {
        // never empty, the initial state is never removed
        &self.states[self.states.len() - 1]
    }

    fn len(&self) -> usize {
        self.moves.len()
    }

    fn push(&mut self, mov: Move, state: State) {
        if let Some(&i) = self.index.get(&state) {
            for erased in self.states.drain(i + 1..) {
                self.index.remove(&erased);
            }
            self.moves.truncate(i);
        } else {
            self.index.insert(state.clone(), self.states.len());
            self.states.push(state);
            self.moves.push(mov);
        }
    }

    /// The moves `push` would leave behind if called with these arguments.
    fn moves_with(&self, mov: Move, state: &State) -> Vec<Move> {
        match self.index.get(state) {
            Some(&i) => self.moves[..i].to_vec(),
            None => {
                let mut moves = self.moves.clone();
                moves.push(mov);
                moves
            }
        }
    }

    fn into_moves(self) -> Moves {
        Moves::new(self.moves)
    }
}

enum Run {
    Solved(Moves),
    /// The run ended without a solution
    Stuck {
        /// Lowest cost the run reached
        cost: f64,
        /// How to get to the lowest cost state from the initial state
        moves: Moves,
    },
}

/// How many random moves start the run after one that reached `best`.
fn next_perturbation(best: f64) -> usize {
    if best.is_finite() {
        best.max(MIN_PERTURBATION).min(MAX_PERTURBATION) as usize
    } else {
        FIRST_PERTURBATION
    }
}

/// Simulated annealing with restarts.
///
/// Every run starts from the initial state perturbed by a few random moves,
/// the perturbation is part of the returned path.
pub(crate) fn search(
    ctx: &Context<'_>,
    initial: &State,
    params: &AnnealingParams,
    stats: &mut Stats,
) -> Result<Moves, Failure> {
    if initial.is_solved(ctx.map) {
        return Ok(Moves::default());
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut perturbation = FIRST_PERTURBATION;

    for run in 0..=params.restarts {
        if ctx.deadline.expired() {
            debug!("Out of time before run {}", run);
            return Err(Failure::BudgetExceeded);
        }
        stats.start_round();

        let mut path = Path::new(initial.clone());
        if perturb(ctx, &mut path, perturbation, &mut rng, stats) {
            debug!("Random moves solved the level in run {}", run);
            return Ok(path.into_moves());
        }

        match anneal(ctx, path, params, &mut rng, stats)? {
            Run::Solved(moves) => {
                debug!("Solved in run {}", run);
                return Ok(moves);
            }
            Run::Stuck { cost, moves } => {
                info!(
                    "Run {}: best cost {:.1}, {} moves to get there",
                    run,
                    cost,
                    moves.move_cnt()
                );
                debug!("Best moves: {}", moves);
                perturbation = next_perturbation(cost);
            }
        }
    }

    Err(Failure::Exhausted)
}

/// Makes up to `count` random moves. Returns true if that solved the level.
fn perturb(
    ctx: &Context<'_>,
    path: &mut Path,
    count: usize,
    rng: &mut StdRng,
    stats: &mut Stats,
) -> bool {
    for _ in 0..count {
        let mut succs = ctx.successors(path.current(), stats);
        if succs.is_empty() {
            break;
        }
        let (mov, state, _) = succs.swap_remove(rng.gen_range(0..succs.len()));
        let solved = state.is_solved(ctx.map);
        path.push(mov, state);
        if solved {
            return true;
        }
    }
    false
}

/// Where a single run currently is.
struct Sample {
    path: Path,
    cost: f64,
    temp: f64,
    iteration: u64,
    /// Lowest cost state evaluated in this run, accepted or not
    best: State,
    best_cost: f64,
    best_moves: Vec<Move>,
}

fn anneal(
    ctx: &Context<'_>,
    path: Path,
    params: &AnnealingParams,
    rng: &mut StdRng,
    stats: &mut Stats,
) -> Result<Run, Failure> {
    let cost = |h: u32, len: usize| f64::from(h) + params.path_weight * len as f64;

    let start_cost = match ctx.evaluate(path.current()) {
        Some(h) => cost(h, path.len()),
        None => {
            return Ok(Run::Stuck {
                cost: f64::INFINITY,
                moves: path.into_moves(),
            })
        }
    };
    stats.update_best_cost(start_cost);
    let mut sample = Sample {
        best: path.current().clone(),
        best_moves: path.moves.clone(),
        path,
        cost: start_cost,
        temp: params.start_temp,
        iteration: 0,
        best_cost: start_cost,
    };

    while sample.iteration < params.max_steps && sample.temp >= params.end_temp {
        if ctx.deadline.expired() {
            debug!("Out of time at temperature {:.3}", sample.temp);
            return Err(Failure::BudgetExceeded);
        }
        sample.iteration += 1;

        let mut succs = ctx.successors(sample.path.current(), stats);
        if succs.is_empty() {
            debug!("Dead end after {} moves", sample.path.len());
            break;
        }
        let (mov, state, h) = succs.swap_remove(rng.gen_range(0..succs.len()));
        if params.counting == ExploredCounting::Iterations {
            stats.add_explored();
        }

        if state.is_solved(ctx.map) {
            if params.counting == ExploredCounting::AcceptedMoves {
                stats.add_explored();
            }
            sample.path.push(mov, state);
            return Ok(Run::Solved(sample.path.into_moves()));
        }

        let new_cost = cost(h, sample.path.len() + 1);
        if new_cost < sample.best_cost {
            sample.best_cost = new_cost;
            sample.best_moves = sample.path.moves_with(mov, &state);
            sample.best = state.clone();
        }
        if stats.update_best_cost(new_cost) {
            trace!("New best cost {:.1}", new_cost);
        }

        let delta = new_cost - sample.cost;
        if delta <= 0.0 || rng.gen::<f64>() < (-delta / sample.temp).exp() {
            stats.add_accepted();
            if params.counting == ExploredCounting::AcceptedMoves {
                stats.add_explored();
            }
            sample.path.push(mov, state);
            // the path might have gotten shorter
            sample.cost = cost(h, sample.path.len());
        } else {
            stats.add_rejected();
        }

        sample.temp *= params.cooling;
    }

    trace!(
        "Run ended after {} iterations, best state:\n{}",
        sample.iteration,
        ctx.map.xsb_with_state(&sample.best)
    );
    Ok(Run::Stuck {
        cost: sample.best_cost,
        moves: Moves::new(sample.best_moves),
    })
}
