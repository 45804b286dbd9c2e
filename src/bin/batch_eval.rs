// Binary that evaluates every problem input in a folder (e.g. tools/in/0000.txt)
// and reports per-input and aggregate results. Used to compare beam params
// across a whole set of inputs.
//
// Usage: batch_eval <DIR> [PARAMS_JSON]

use env_logger::Env;
use itertools::{Itertools, MinMaxResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Instant;
use thiserror::Error;

use cleaning_bot::beam_search::{BeamParams, ConfigError};
use cleaning_bot::challenge::{verify_route, RouteError};
use cleaning_bot::game_interface::{read_input, InputError};
use cleaning_bot::solvers::{BeamSearchSolver, Solver};

#[derive(Debug, Clone)]
struct SavedInput {
    id: u32,
    path: String,
}

#[derive(Debug)]
struct Evaluation {
    score: i64,
    moves: usize,
    unvisited: usize,
}

#[derive(Error, Debug)]
enum EvalError {
    #[error("Failed reading the input")]
    ReadError(#[from] std::io::Error),
    #[error("Failed parsing the input ({0})")]
    ParseError(#[from] InputError),
    #[error("Solver produced an invalid route ({0})")]
    RouteError(#[from] RouteError),
}

fn read_saved_inputs(directory: &str) -> std::io::Result<Vec<SavedInput>> {
    lazy_static! {
        static ref INPUT_PATH: Regex = Regex::new(r"(\d+)\.txt$").unwrap();
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path().to_string_lossy().to_string();
        if let Some(id) = INPUT_PATH.captures(&path)
            .and_then(|caps| caps.get(1))
            .and_then(|id| id.as_str().parse::<u32>().ok()) {
            out.push(SavedInput { id, path });
        }
    }
    out.sort_by_key(|input| input.id);
    Ok(out)
}

fn evaluate_input(input: &SavedInput, params: BeamParams) -> Result<Evaluation, EvalError> {
    let grid = read_input(std::fs::File::open(&input.path)?)?;
    let solution = BeamSearchSolver::new(params).solve(&grid);
    let report = verify_route(&grid, &solution.moves)?;
    Ok(Evaluation {
        score: report.score,
        moves: solution.moves.len(),
        unvisited: report.unvisited.len(),
    })
}

fn main() -> Result<(), ConfigError> {
    // Keep the solvers quiet unless asked otherwise.
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let directory = std::env::args().nth(1).expect("no directory given");
    let params = match std::env::args().nth(2) {
        Some(filename) => BeamParams::from_json_file(filename)?,
        None => BeamParams::default(),
    };
    println!("Params: {params:?}");

    let inputs = read_saved_inputs(&directory)?;
    println!("{} input(s)", inputs.len());
    let mut scores: Vec<i64> = Vec::new();
    let start = Instant::now();
    for input in &inputs {
        match evaluate_input(input, params) {
            Ok(eval) => {
                println!("  #{:04}: score {} moves {} unvisited {}",
                         input.id, eval.score, eval.moves, eval.unvisited);
                scores.push(eval.score);
            },
            Err(err) => println!("  #{:04}: error: {err}", input.id),
        }
    }

    println!("Score stats:");
    println!("  #: {}", scores.len());
    match scores.iter().minmax() {
        MinMaxResult::NoElements => {},
        MinMaxResult::OneElement(score) => println!("Min/Max: {score}"),
        MinMaxResult::MinMax(min, max) => {
            println!("Min: {min}");
            println!("Max: {max}");
        },
    }
    if !scores.is_empty() {
        let avg = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
        println!("Avg: {avg:.1}");
    }
    println!("Took {:?}", start.elapsed());
    Ok(())
}
