use itertools::Itertools;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::game_interface::{Direction, Pos};
use crate::grid::Grid;
use crate::state::SearchState;

/// A full closed route: the searched walk followed by the way back home.
#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Direction>,
    /// Search score of the whole route, way home included.
    pub score: i64,
    /// Turns spent in the beam search, before heading home.
    pub turns: usize,
}

impl Solution {
    /// The route as the judge expects it, e.g. "RRDLUL".
    pub fn route(&self) -> String {
        format_route(&self.moves)
    }
}

pub fn format_route(moves: &[Direction]) -> String {
    moves.iter().map(|d| d.letter()).join("")
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown move {letter:?} at index {index}")]
    UnknownMove { index: usize, letter: char },
    #[error("Move #{index} ({direction:?}) from {pos:?} goes through a wall or off the grid")]
    IllegalMove { index: usize, pos: Pos, direction: Direction },
}

pub fn parse_route(route: &str) -> Result<Vec<Direction>, RouteError> {
    route.trim().chars().enumerate().map(|(index, letter)| {
        Direction::from_letter(letter).ok_or(RouteError::UnknownMove { index, letter })
    }).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteReport {
    pub final_pos: Pos,
    pub returned_home: bool,
    /// Cells never entered by the route, row-major.
    pub unvisited: Vec<Pos>,
    pub score: i64,
}

/// Replays `moves` from the origin and reports what the route covers.
pub fn verify_route(grid: &Grid, moves: &[Direction]) -> Result<RouteReport, RouteError> {
    let mut state = SearchState::default();
    let mut reached: FxHashSet<Pos> = FxHashSet::default();
    for (index, &direction) in moves.iter().enumerate() {
        let pos = state.pos;
        if !state.move_to(grid, direction) {
            return Err(RouteError::IllegalMove { index, pos, direction });
        }
        reached.insert(state.pos);
    }
    let unvisited = grid.cells().filter(|pos| !reached.contains(pos)).collect();
    Ok(RouteReport {
        final_pos: state.pos,
        returned_home: state.pos == Pos::ORIGIN,
        unvisited,
        score: state.score,
    })
}
