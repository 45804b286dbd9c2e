use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, error, info, warn};
use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::time::Instant;

use cleaning_bot::beam_search::{BeamParams, ConfigError};
use cleaning_bot::challenge::{verify_route, Solution};
use cleaning_bot::game_interface::{read_input, InputError, Pos};
use cleaning_bot::grid::Grid;
use cleaning_bot::pathfinding::DistanceField;
use cleaning_bot::simple_beam_search::SimpleBeamSearchSolver;
use cleaning_bot::solvers::{BeamSearchSolver, Solver};

#[derive(ValueEnum, Clone)]
enum SolverName {
    /// Pooled beam search with a shared history trie.
    Beam,
    /// Reference beam search that copies full move logs. Slow.
    SimpleBeam,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Problem input file. Reads stdin when absent.
    #[arg(short, long)]
    input: Option<String>,

    /// Solver implementation to use to find a route.
    #[arg(short, long, value_enum, default_value_t = SolverName::Beam)]
    solver: SolverName,

    /// Beam params JSON file, e.g. {"width": 40, "depth": 10000}.
    #[arg(long)]
    params_file: Option<String>,

    /// Candidates kept per turn. Overrides the params file.
    #[arg(long)]
    width: Option<usize>,

    /// Turns searched before heading home. Overrides the params file.
    #[arg(long)]
    depth: Option<usize>,

    /// Debug-log drawings of the grid weights and distances to the origin.
    #[arg(long)]
    render_grid: bool,

    /// Skip replaying the final route.
    #[arg(long)]
    no_verify: bool,
}

fn load_params(cli: &Cli) -> Result<BeamParams, ConfigError> {
    let mut params = match &cli.params_file {
        Some(filename) => {
            info!("Loading beam params from {filename}");
            BeamParams::from_json_file(filename)?
        },
        None => BeamParams::default(),
    };
    if let Some(width) = cli.width {
        params.width = width;
    }
    if let Some(depth) = cli.depth {
        params.depth = depth;
    }
    info!("Beam params: {params:?}");
    params.validate()
}

fn load_grid(cli: &Cli) -> Result<Grid, InputError> {
    match &cli.input {
        Some(filename) => read_input(File::open(filename)?),
        None => read_input(io::stdin().lock()),
    }
}

fn new_solver(solver: &SolverName, params: BeamParams) -> Box<dyn Solver> {
    match solver {
        SolverName::Beam => Box::new(BeamSearchSolver::new(params)),
        SolverName::SimpleBeam => Box::new(SimpleBeamSearchSolver::new(params)),
    }
}

fn report(grid: &Grid, solution: &Solution) {
    match verify_route(grid, &solution.moves) {
        Ok(report) => {
            info!("Route covers {covered}/{total} cells, score {score}",
                  covered = grid.size() * grid.size() - report.unvisited.len(),
                  total = grid.size() * grid.size(), score = report.score);
            if !report.unvisited.is_empty() {
                debug!("Unvisited cells: {:?}", report.unvisited);
            }
            if !report.returned_home {
                warn!("Route ends on {:?}, not on the origin!", report.final_pos);
            }
        },
        Err(err) => error!("Invalid route: {err}"),
    }
}

fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let start = Instant::now();

    let params = match load_params(&cli) {
        Ok(params) => params,
        Err(err) => {
            error!("Bad beam params: {err}");
            return ExitCode::FAILURE;
        },
    };
    let grid = match load_grid(&cli) {
        Ok(grid) => grid,
        Err(err) => {
            error!("Malformed input: {err}");
            return ExitCode::FAILURE;
        },
    };
    info!("N={n} mean weight={mean} total weight={total}",
          n = grid.size(), mean = grid.mean_weight(), total = grid.total_weight());
    if cli.render_grid {
        debug!("{}", grid.render_weights());
        debug!("{}", DistanceField::new(&grid, Pos::ORIGIN).render(&grid));
    }

    let solution = new_solver(&cli.solver, params).solve(&grid);
    if !cli.no_verify {
        report(&grid, &solution);
    }
    println!("{}", solution.route());
    info!("time={:?}", start.elapsed());
    ExitCode::SUCCESS
}
