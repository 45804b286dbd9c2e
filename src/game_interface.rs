use std::io::Read;
use thiserror::Error;

use crate::challenge_consts::MAX_N;
use crate::grid::Grid;

/// Cell coordinates. `y` is the row, `x` the column, origin at the top-left.
#[derive(Debug, PartialEq, Eq, Hash, Ord, PartialOrd, Copy, Clone, Default)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { x: 0, y: 0 };

    pub fn new(y: usize, x: usize) -> Self {
        Pos { x: x as u16, y: y as u16 }
    }

    /// Neighbor in the given direction, if it doesn't underflow. Upper bounds
    /// are the grid's business.
    pub fn step(&self, direction: Direction) -> Option<Pos> {
        let (dy, dx) = direction.delta();
        let y = self.y as i32 + dy;
        let x = self.x as i32 + dx;
        if y < 0 || x < 0 {
            None
        } else {
            Some(Pos { x: x as u16, y: y as u16 })
        }
    }
}

// Order matters: it is the tie-break order everywhere (expansion, return
// path), and `opposite` relies on it.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 2) % 4]
    }

    /// (dy, dx) unit vector.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Up => 'U',
        }
    }

    pub fn from_letter(letter: char) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.letter() == letter)
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Could not read the input ({0})")]
    Io(#[from] std::io::Error),
    #[error("Input ended early, expected {0}")]
    MissingToken(&'static str),
    #[error("Expected an integer for {what}, got {token:?}")]
    BadInteger { what: &'static str, token: String },
    #[error("Grid size {0} is out of range (1..={max})", max = MAX_N)]
    SizeOutOfRange(usize),
    #[error("Wall row {row} has {found} characters, expected {expected}")]
    BadWallRow { row: usize, expected: usize, found: usize },
    #[error("Wall row {row} contains {ch:?}, only '0' and '1' are allowed")]
    BadWallChar { row: usize, ch: char },
    #[error("Grid data has the wrong shape: {0}")]
    BadShape(String),
}

struct Tokens<'a> {
    inner: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &'static str) -> Result<&'a str, InputError> {
        self.inner.next().ok_or(InputError::MissingToken(what))
    }

    fn next_int<T: std::str::FromStr>(&mut self, what: &'static str) -> Result<T, InputError> {
        let token = self.next(what)?;
        token.parse().map_err(|_| InputError::BadInteger {
            what,
            token: token.to_string(),
        })
    }

    fn next_wall_row(&mut self, row: usize, len: usize) -> Result<Vec<bool>, InputError> {
        let token = self.next("a wall row")?;
        if token.len() != len {
            return Err(InputError::BadWallRow { row, expected: len, found: token.len() });
        }
        token.chars().map(|ch| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(InputError::BadWallChar { row, ch }),
        }).collect()
    }
}

/// Parses a full problem input:
/// - N
/// - N-1 rows of N '0'/'1' chars, walls below each cell
/// - N rows of N-1 '0'/'1' chars, walls right of each cell
/// - N*N weights, row-major
pub fn parse_input(input: &str) -> Result<Grid, InputError> {
    let mut tokens = Tokens { inner: input.split_ascii_whitespace() };
    let n: usize = tokens.next_int("the grid size")?;
    if n == 0 || n > MAX_N {
        return Err(InputError::SizeOutOfRange(n));
    }
    let h_walls = (0..n - 1)
        .map(|row| tokens.next_wall_row(row, n))
        .collect::<Result<Vec<_>, _>>()?;
    // With N == 1 these rows are empty, so there is no token to read.
    let v_walls = if n > 1 {
        (0..n).map(|row| tokens.next_wall_row(row, n - 1))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![Vec::new()]
    };
    let weights = (0..n).map(|_| {
        (0..n).map(|_| tokens.next_int::<i64>("a cell weight"))
            .collect::<Result<Vec<_>, _>>()
    }).collect::<Result<Vec<_>, _>>()?;
    Grid::new(n, &h_walls, &v_walls, &weights)
}

pub fn read_input<R: Read>(mut reader: R) -> Result<Grid, InputError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_input(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_INPUT: &str = "3\n010\n000\n01\n00\n10\n1 2 3\n4 5 6\n7 8 9\n";

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
    }

    #[test]
    fn test_letters() {
        let letters: String = Direction::ALL.iter().map(|d| d.letter()).collect();
        assert_eq!(letters, "RDLU");
        for d in Direction::ALL {
            assert_eq!(Direction::from_letter(d.letter()), Some(d));
        }
        assert_eq!(Direction::from_letter('X'), None);
    }

    #[test]
    fn test_parse_small_input() {
        let grid = parse_input(SMALL_INPUT).expect("valid input");
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.weight(Pos::new(0, 0)), 1);
        assert_eq!(grid.weight(Pos::new(2, 1)), 8);
        assert_eq!(grid.total_weight(), 45);
        // Wall below (0, 1).
        assert!(!grid.can_move(Pos::new(0, 1), Direction::Down));
        assert!(!grid.can_move(Pos::new(1, 1), Direction::Up));
        // Wall right of (0, 1) and of (2, 0).
        assert!(!grid.can_move(Pos::new(0, 1), Direction::Right));
        assert!(!grid.can_move(Pos::new(2, 1), Direction::Left));
        assert!(grid.can_move(Pos::new(1, 0), Direction::Right));
    }

    #[test]
    fn test_parse_single_cell() {
        let grid = parse_input("1\n5\n").expect("valid input");
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.weight(Pos::ORIGIN), 5);
        for d in Direction::ALL {
            assert!(!grid.can_move(Pos::ORIGIN, d));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_input(""), Err(InputError::MissingToken(_))));
        assert!(matches!(parse_input("abc"), Err(InputError::BadInteger { .. })));
        assert!(matches!(parse_input("0"), Err(InputError::SizeOutOfRange(0))));
        assert!(matches!(parse_input("41"), Err(InputError::SizeOutOfRange(41))));
        assert!(matches!(parse_input("2\n001\n0\n0\n1 1 1 1"),
                         Err(InputError::BadWallRow { row: 0, expected: 2, found: 3 })));
        assert!(matches!(parse_input("2\n0x\n0\n0\n1 1 1 1"),
                         Err(InputError::BadWallChar { row: 0, ch: 'x' })));
        assert!(matches!(parse_input("2\n00\n0\n0\n1 1 1"),
                         Err(InputError::MissingToken(_))));
        assert!(matches!(parse_input("2\n00\n0\n0\n1 1 z 1"),
                         Err(InputError::BadInteger { .. })));
    }

    #[test]
    fn test_read_input_from_reader() {
        let grid = read_input(SMALL_INPUT.as_bytes()).expect("valid input");
        assert_eq!(grid.size(), 3);
    }
}
