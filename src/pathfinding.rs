// Shortest routes on the walled grid, used to bring the cleaner back home
// once the beam search is done.
use std::collections::VecDeque;

use crate::challenge_consts::MAX_N;
use crate::game_interface::{Direction, Pos};
use crate::grid::Grid;

const UNREACHED: u16 = u16::MAX;

/// BFS distance (in moves) from every cell to a fixed source.
pub struct DistanceField {
    // distance[y][x]
    distance: [[u16; MAX_N]; MAX_N],
}

impl DistanceField {
    /// Breadth-first traversal from `source`. Moves are symmetric, so this is
    /// also the distance from every cell to `source`.
    pub fn new(grid: &Grid, source: Pos) -> Self {
        let mut distance = [[UNREACHED; MAX_N]; MAX_N];
        distance[source.y as usize][source.x as usize] = 0;
        let mut frontier = VecDeque::from([source]);
        while let Some(current) = frontier.pop_front() {
            let next_distance = distance[current.y as usize][current.x as usize] + 1;
            for (_, next) in grid.neighbors(current) {
                let cell = &mut distance[next.y as usize][next.x as usize];
                if *cell == UNREACHED {
                    *cell = next_distance;
                    frontier.push_back(next);
                }
            }
        }
        DistanceField { distance }
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Option<u16> {
        match self.distance[pos.y as usize][pos.x as usize] {
            UNREACHED => None,
            d => Some(d),
        }
    }

    /// Greedy descent from `from` to the source: always step to the first
    /// neighbor (in R, D, L, U order) one move closer. None if the source
    /// can't be reached.
    pub fn path_from(&self, grid: &Grid, from: Pos) -> Option<Vec<Direction>> {
        let mut remaining = self.get(from)?;
        let mut current = from;
        let mut steps = Vec::with_capacity(remaining as usize);
        while remaining > 0 {
            let (direction, next) = grid.neighbors(current)
                .find(|&(_, next)| self.get(next) == Some(remaining - 1))
                .expect("BFS distance field has no downhill neighbor");
            steps.push(direction);
            current = next;
            remaining -= 1;
        }
        Some(steps)
    }

    pub fn render(&self, grid: &Grid) -> String {
        grid.render(|pos| self.get(pos).map_or(-1, |d| d as i64))
    }
}

/// Shortest route from `from` back to the origin.
pub fn path_home(grid: &Grid, from: Pos) -> Option<Vec<Direction>> {
    DistanceField::new(grid, Pos::ORIGIN).path_from(grid, from)
}
