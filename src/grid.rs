use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write;

use crate::challenge_consts::MAX_N;
use crate::game_interface::{Direction, InputError, Pos};

/// Walled square grid with a weight ("dirtiness") per cell. Immutable once
/// built.
#[derive(Clone)]
pub struct Grid {
    n: usize,
    // h_walls[y][x]: wall between (y, x) and (y + 1, x)
    h_walls: [[bool; MAX_N]; MAX_N],
    // v_walls[y][x]: wall between (y, x) and (y, x + 1)
    v_walls: [[bool; MAX_N]; MAX_N],
    weights: [[i64; MAX_N]; MAX_N],
    // Precomputed bitmask of legal directions for each cell, bit = index.
    moves: [[u8; MAX_N]; MAX_N],
    total_weight: i64,
}

impl Grid {
    pub fn new(
        n: usize, h_walls: &[Vec<bool>], v_walls: &[Vec<bool>], weights: &[Vec<i64>]
        ) -> Result<Self, InputError> {
        if n == 0 || n > MAX_N {
            return Err(InputError::SizeOutOfRange(n));
        }
        if h_walls.len() != n - 1 || h_walls.iter().any(|row| row.len() != n) {
            return Err(InputError::BadShape(
                format!("expected {} rows of {} horizontal walls", n - 1, n)));
        }
        if v_walls.len() != n || v_walls.iter().any(|row| row.len() != n - 1) {
            return Err(InputError::BadShape(
                format!("expected {} rows of {} vertical walls", n, n - 1)));
        }
        if weights.len() != n || weights.iter().any(|row| row.len() != n) {
            return Err(InputError::BadShape(
                format!("expected {n}x{n} weights")));
        }

        let mut grid = Grid {
            n,
            h_walls: array_init::array_init(|y| array_init::array_init(|x| {
                y + 1 < n && x < n && h_walls[y][x]
            })),
            v_walls: array_init::array_init(|y| array_init::array_init(|x| {
                y < n && x + 1 < n && v_walls[y][x]
            })),
            weights: array_init::array_init(|y| array_init::array_init(|x| {
                if y < n && x < n { weights[y][x] } else { 0 }
            })),
            moves: [[0; MAX_N]; MAX_N],
            total_weight: weights.iter().flatten().sum(),
        };
        for pos in grid.cells().collect::<Vec<_>>() {
            let mask = Direction::ALL.iter()
                .filter(|&&d| grid.neighbor_in_bounds(pos, d) && !grid.wall_between(pos, d))
                .fold(0u8, |mask, d| mask | (1 << d.index()));
            grid.moves[pos.y as usize][pos.x as usize] = mask;
        }
        Ok(grid)
    }

    /// Random grid, used to exercise the solvers in tests and benchmarks.
    /// Each interior wall is present with probability `wall_probability`.
    pub fn random(n: usize, wall_probability: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let h_walls: Vec<Vec<bool>> = (0..n.saturating_sub(1))
            .map(|_| (0..n).map(|_| rng.gen_bool(wall_probability)).collect())
            .collect();
        let v_walls: Vec<Vec<bool>> = (0..n)
            .map(|_| (0..n - 1).map(|_| rng.gen_bool(wall_probability)).collect())
            .collect();
        let weights: Vec<Vec<i64>> = (0..n)
            .map(|_| (0..n).map(|_| rng.gen_range(1..=1000)).collect())
            .collect();
        Grid::new(n, &h_walls, &v_walls, &weights)
            .expect("generated grid always has a valid shape")
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn cells(&self) -> impl Iterator<Item=Pos> {
        let n = self.n;
        (0..n).flat_map(move |y| (0..n).map(move |x| Pos::new(y, x)))
    }

    fn neighbor_in_bounds(&self, pos: Pos, direction: Direction) -> bool {
        match pos.step(direction) {
            Some(next) => (next.y as usize) < self.n && (next.x as usize) < self.n,
            None => false,
        }
    }

    /// Whether a wall separates `pos` from its neighbor in `direction`. The
    /// outer boundary counts as a wall.
    pub fn wall_between(&self, pos: Pos, direction: Direction) -> bool {
        if !self.neighbor_in_bounds(pos, direction) {
            return true;
        }
        let (y, x) = (pos.y as usize, pos.x as usize);
        match direction {
            Direction::Right => self.v_walls[y][x],
            Direction::Down => self.h_walls[y][x],
            Direction::Left => self.v_walls[y][x - 1],
            Direction::Up => self.h_walls[y - 1][x],
        }
    }

    #[inline]
    pub fn can_move(&self, pos: Pos, direction: Direction) -> bool {
        self.moves[pos.y as usize][pos.x as usize] & (1 << direction.index()) != 0
    }

    /// Cell reached by moving in `direction`, if that move is legal.
    #[inline]
    pub fn neighbor(&self, pos: Pos, direction: Direction) -> Option<Pos> {
        if self.can_move(pos, direction) {
            pos.step(direction)
        } else {
            None
        }
    }

    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item=(Direction, Pos)> + '_ {
        Direction::ALL.into_iter()
            .filter_map(move |d| self.neighbor(pos, d).map(|next| (d, next)))
    }

    #[inline]
    pub fn weight(&self, pos: Pos) -> i64 {
        self.weights[pos.y as usize][pos.x as usize]
    }

    pub fn total_weight(&self) -> i64 {
        self.total_weight
    }

    pub fn mean_weight(&self) -> i64 {
        self.total_weight / (self.n * self.n) as i64
    }

    /// ASCII drawing of the grid with its walls, and one value per cell.
    pub fn render(&self, value: impl Fn(Pos) -> i64) -> String {
        let n = self.n;
        let mut out = String::from("\n");
        for i in 0..=2 * n {
            for j in 0..=2 * n {
                if i % 2 == 0 && j % 2 == 0 {
                    out.push('+');
                } else if i == 0 || i == 2 * n {
                    out.push_str("---");
                } else if j == 0 || j == 2 * n {
                    out.push('|');
                } else if i % 2 == 0 {
                    let wall = self.h_walls[i / 2 - 1][(j - 1) / 2];
                    out.push_str(if wall { "---" } else { "   " });
                } else if j % 2 == 0 {
                    let wall = self.v_walls[(i - 1) / 2][j / 2 - 1];
                    out.push(if wall { '|' } else { ' ' });
                } else {
                    let pos = Pos::new((i - 1) / 2, (j - 1) / 2);
                    // Writing to a String can't fail.
                    let _ = write!(out, "{:3}", value(pos));
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn render_weights(&self) -> String {
        self.render(|pos| self.weight(pos))
    }
}
