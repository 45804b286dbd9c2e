// Solver implementations that plan a full cleaning route on a grid.

use log::info;
use std::time::Instant;

use crate::beam_search::{BeamParams, SearchEngine};
use crate::challenge::Solution;
use crate::grid::Grid;

pub trait Solver {
    // Name to display for this solver.
    fn name(&self) -> &str;

    // Implementation of the solver.
    fn do_solve(&mut self, grid: &Grid) -> Solution;

    // Wrapper to do_solve, to log timing and score information.
    fn solve(&mut self, grid: &Grid) -> Solution {
        let start = Instant::now();
        let solution = self.do_solve(grid);
        info!("Solver {} took {:?}", self.name(), start.elapsed());
        info!("Solver {} found a route of {} moves ({} searched), score {}",
              self.name(), solution.moves.len(), solution.turns, solution.score);
        solution
    }
}

// Beam search where candidates are pooled and share their history through a
// trie. See beam_search.rs.
#[derive(Default)]
pub struct BeamSearchSolver {
    pub params: BeamParams,
}

impl BeamSearchSolver {
    pub fn new(params: BeamParams) -> Self {
        BeamSearchSolver { params }
    }
}

impl Solver for BeamSearchSolver {
    fn name(&self) -> &str {
        "beam-search"
    }

    fn do_solve(&mut self, grid: &Grid) -> Solution {
        SearchEngine::new(grid, self.params).run()
    }
}
