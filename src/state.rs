use arrayvec::ArrayVec;

use crate::challenge_consts::{FIRST_VISIT_BONUS, MAX_N, REVISIT_BONUS};
use crate::game_interface::{Direction, Pos};
use crate::grid::Grid;
use crate::history::{HistoryTree, NodeId};
use crate::pool::{Handle, ObjectPool, Recycle};

/// One candidate route of the beam search, at a given turn.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchState {
    pub turn: u16,
    pub pos: Pos,
    pub score: i64,
    // last_visited[y][x]: turn at which the cell was last entered, 0 if never.
    pub last_visited: [[u16; MAX_N]; MAX_N],
    // Where this route lives in the history tree. Holds one reference on the
    // node while set.
    pub node: Option<NodeId>,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState {
            turn: 0,
            pos: Pos::ORIGIN,
            score: 0,
            last_visited: [[0; MAX_N]; MAX_N],
            node: None,
        }
    }
}

impl Recycle for SearchState {
    fn recycle(&mut self) {
        self.turn = 0;
        self.pos = Pos::ORIGIN;
        self.score = 0;
        self.last_visited = [[0; MAX_N]; MAX_N];
        self.node = None;
    }
}

impl SearchState {
    /// Replays `moves` from the origin. None if one of them is illegal.
    pub fn replay(grid: &Grid, moves: &[Direction]) -> Option<SearchState> {
        let mut state = SearchState::default();
        for &direction in moves {
            if !state.move_to(grid, direction) {
                return None;
            }
        }
        Some(state)
    }

    /// Takes one step. Returns false, leaving the state untouched, if the
    /// move is blocked.
    ///
    /// Entering a cell collects `weight * (turn - last_visited)`, plus a bonus:
    /// `100 * (turn + 1)` for a never-visited cell, `10 * (turn -
    /// last_visited)` otherwise. A cell last entered on turn 0 counts as never
    /// visited, as does the origin.
    pub fn move_to(&mut self, grid: &Grid, direction: Direction) -> bool {
        let next = match grid.neighbor(self.pos, direction) {
            Some(next) => next,
            None => return false,
        };
        self.pos = next;
        let turn = self.turn as i64;
        let cell = &mut self.last_visited[next.y as usize][next.x as usize];
        let last = *cell as i64;
        self.score += grid.weight(next) * (turn - last);
        if last == 0 {
            self.score += FIRST_VISIT_BONUS * (turn + 1);
        } else {
            self.score += REVISIT_BONUS * (turn - last);
        }
        *cell = self.turn;
        self.turn += 1;
        true
    }

    #[inline]
    pub fn last_visited(&self, pos: Pos) -> u16 {
        self.last_visited[pos.y as usize][pos.x as usize]
    }

    pub fn to_moves(&self, tree: &HistoryTree) -> Vec<Direction> {
        match self.node {
            Some(node) => tree.reconstruct_path(node),
            None => Vec::new(),
        }
    }
}

/// Children of the state at `parent`, one per legal direction, in R, D, L, U
/// order. Each child is a new pool record holding a reference on its own
/// history node.
pub fn expand(
    parent: Handle, grid: &Grid, states: &mut ObjectPool<SearchState>,
    tree: &mut HistoryTree
    ) -> ArrayVec<Handle, 4> {
    let mut children = ArrayVec::new();
    let (pos, parent_node) = {
        let state = states.get(parent);
        (state.pos, state.node.expect("expanding a state outside the history tree"))
    };
    for direction in Direction::ALL {
        if !grid.can_move(pos, direction) {
            continue;
        }
        let child = states.acquire_clone(parent);
        let moved = states.get_mut(child).move_to(grid, direction);
        debug_assert!(moved);
        states.get_mut(child).node = Some(tree.child(parent_node, direction));
        children.push(child);
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    fn open_grid(n: usize, weight: i64) -> Grid {
        Grid::new(n,
                  &vec![vec![false; n]; n - 1],
                  &vec![vec![false; n - 1]; n],
                  &vec![vec![weight; n]; n]).unwrap()
    }

    #[test]
    fn test_first_move_score() {
        let grid = open_grid(2, 1);
        let mut state = SearchState::default();
        assert!(state.move_to(&grid, Right));
        // weight * (0 - 0) + 100 * (0 + 1)
        assert_eq!(state.score, 100);
        assert_eq!(state.turn, 1);
        assert_eq!(state.pos, Pos::new(0, 1));
    }

    #[test]
    fn test_revisit_score() {
        let grid = open_grid(2, 3);
        let state = SearchState::replay(&grid, &[Right, Down, Left, Up, Right]).unwrap();
        // Turn 0: (0,1) first visit, recorded at turn 0 so still "unvisited".
        let mut expected = 3 * 0 + 100;
        // Turn 1: (1,1) first visit.
        expected += 3 * 1 + 100 * 2;
        // Turn 2: (1,0) first visit.
        expected += 3 * 2 + 100 * 3;
        // Turn 3: origin, never marked visited before.
        expected += 3 * 3 + 100 * 4;
        // Turn 4: (0,1) again, last_visited is 0 so it is a first visit.
        expected += 3 * 4 + 100 * 5;
        assert_eq!(state.score, expected);
        let state = SearchState::replay(&grid, &[Right, Down, Up, Down]).unwrap();
        // Turn 2: back to (0,1). Turn 3: back to (1,1), last seen on turn 1.
        let expected = 100 + (3 + 200) + (3 * 2 + 300) + (3 * 2 + 10 * 2);
        assert_eq!(state.score, expected);
        assert_eq!(state.last_visited(Pos::new(1, 1)), 3);
    }

    #[test]
    fn test_blocked_move_leaves_state_untouched() {
        let grid = Grid::new(2, &[vec![true, false]], &[vec![false], vec![false]],
                             &[vec![1, 1], vec![1, 1]]).unwrap();
        let mut state = SearchState::default();
        let before = state.clone();
        assert!(!state.move_to(&grid, Down));
        assert!(!state.move_to(&grid, Up));
        assert!(!state.move_to(&grid, Left));
        assert_eq!(state, before);
        assert!(state.move_to(&grid, Right));
    }

    #[test]
    fn test_score_is_deterministic() {
        let grid = Grid::random(10, 0.2, 7);
        let moves: Vec<Direction> = {
            let mut state = SearchState::default();
            let mut moves = Vec::new();
            for turn in 0..500 {
                let direction = Direction::ALL[(turn * 7 + turn / 3) % 4];
                if state.move_to(&grid, direction) {
                    moves.push(direction);
                }
            }
            moves
        };
        let a = SearchState::replay(&grid, &moves).unwrap();
        let b = SearchState::replay(&grid, &moves).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.turn as usize, moves.len());
    }

    #[test]
    fn test_expand() {
        let grid = open_grid(3, 2);
        let mut states: ObjectPool<SearchState> = ObjectPool::new();
        let mut tree = HistoryTree::new();
        let root = tree.root();
        tree.retain(root);
        let origin = states.acquire(|s| { s.recycle(); s.node = Some(root); });
        let children = expand(origin, &grid, &mut states, &mut tree);
        // Only right and down are open from the corner.
        assert_eq!(children.len(), 2);
        assert_eq!(states.get(children[0]).pos, Pos::new(0, 1));
        assert_eq!(states.get(children[1]).pos, Pos::new(1, 0));
        for &child in &children {
            let state = states.get(child);
            let moves = state.to_moves(&tree);
            assert_eq!(SearchState::replay(&grid, &moves).as_ref().map(|s| s.score),
                       Some(state.score));
        }
        // Parent untouched.
        assert_eq!(states.get(origin).turn, 0);
        assert_eq!(states.live(), 3);
        assert_eq!(tree.live_nodes(), 3);
    }
}
