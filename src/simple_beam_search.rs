// Implementation of beam_search.rs, without optimizations: every candidate
// owns a full copy of its move log, and candidates are plain values.
use log::info;
use std::cmp::Reverse;

use crate::beam_search::BeamParams;
use crate::challenge::Solution;
use crate::game_interface::Direction;
use crate::grid::Grid;
use crate::pathfinding::path_home;
use crate::solvers::Solver;
use crate::state::SearchState;

#[derive(Clone)]
struct Candidate {
    state: SearchState,
    moves: Vec<Direction>,
}

#[derive(Default)]
pub struct SimpleBeamSearchSolver {
    pub params: BeamParams,
}

impl SimpleBeamSearchSolver {
    pub fn new(params: BeamParams) -> Self {
        SimpleBeamSearchSolver { params }
    }
}

impl Solver for SimpleBeamSearchSolver {
    fn name(&self) -> &str {
        "simple-beam-search"
    }

    fn do_solve(&mut self, grid: &Grid) -> Solution {
        let params = self.params.clamped();
        let width = params.width;
        let mut frontier = vec![Candidate { state: SearchState::default(), moves: Vec::new() }];
        let mut turns = 0;
        for turn in 0..params.depth {
            let mut children = Vec::new();
            for candidate in frontier.iter().filter(|c| c.state.turn as usize == turn) {
                for direction in Direction::ALL {
                    let mut child = candidate.clone();
                    if child.state.move_to(grid, direction) {
                        child.moves.push(direction);
                        children.push(child);
                    }
                }
            }
            if children.is_empty() {
                break;
            }
            children.sort_by_key(|c| Reverse(c.state.score));
            children.truncate(width);
            frontier = children;
            turns = turn + 1;
        }
        info!("Simple beam search: {turns} turns");

        let mut best = frontier.swap_remove(0);
        if let Some(home) = path_home(grid, best.state.pos) {
            for direction in home {
                best.state.move_to(grid, direction);
                best.moves.push(direction);
            }
        }
        Solution { moves: best.moves, score: best.state.score, turns }
    }
}

#[cfg(test)]
mod tests {
    use crate::solvers::BeamSearchSolver;
    use super::*;

    #[test]
    fn test_match_beam_search() {
        for seed in 0..6 {
            let grid = Grid::random(9, 0.3, seed);
            let params = BeamParams { width: 8, depth: 300 };
            let slow = SimpleBeamSearchSolver::new(params).do_solve(&grid);
            let fast = BeamSearchSolver::new(params).do_solve(&grid);
            assert_eq!(slow.turns, fast.turns, "seed {}", seed);
            assert_eq!(slow.score, fast.score, "seed {}", seed);
            assert_eq!(slow.route(), fast.route(), "seed {}", seed);
        }
    }
}
