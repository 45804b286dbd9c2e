// Beam search over cleaning routes.
//
// Each turn, every candidate on the frontier is expanded in the 4 directions,
// children are ranked by score and only the best `width` survive. Candidates
// live in an object pool and share their move history through a trie, so a
// turn costs O(width) regardless of how long the routes get. Once the depth
// budget is spent (or nothing can move), the best route is rebuilt from the
// trie and completed with a shortest path back to the origin.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::cmp::Reverse;
use std::mem;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

use crate::challenge::Solution;
use crate::challenge_consts::{BEAM_DEPTH, BEAM_WIDTH, MAX_BEAM_DEPTH};
use crate::grid::Grid;
use crate::history::HistoryTree;
use crate::pathfinding::path_home;
use crate::pool::{Handle, ObjectPool, Recycle};
use crate::state::{expand, SearchState};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BeamParams {
    /// Candidates kept after each turn.
    pub width: usize,
    /// Turns searched before heading home.
    pub depth: usize,
}

impl Default for BeamParams {
    fn default() -> Self {
        BeamParams { width: BEAM_WIDTH, depth: BEAM_DEPTH }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed reading the params file ({0})")]
    ReadError(#[from] std::io::Error),
    #[error("Failed parsing the params file ({0})")]
    ParseError(#[from] serde_json::Error),
    #[error("Depth {0} is too large (max {max})", max = MAX_BEAM_DEPTH)]
    DepthTooLarge(usize),
}

impl BeamParams {
    /// Loads params from a JSON file. Missing fields keep their default.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let params: BeamParams = serde_json::from_str(data)?;
        params.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.depth > MAX_BEAM_DEPTH {
            return Err(ConfigError::DepthTooLarge(self.depth));
        }
        Ok(self)
    }

    /// Params a search can run with: width at least 1, depth capped.
    pub fn clamped(self) -> Self {
        if self.depth > MAX_BEAM_DEPTH {
            warn!("Depth {} is too large, searching {MAX_BEAM_DEPTH} turns instead.", self.depth);
        }
        BeamParams { width: self.width.max(1), depth: self.depth.min(MAX_BEAM_DEPTH) }
    }
}

/// Debug struct to log as JSON for visualization, one entry per turn.
#[derive(Serialize, Debug, Clone, Default)]
pub struct BeamVisualization {
    pub turns: Vec<TurnVisualization>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TurnVisualization {
    pub turn: usize,
    pub best_score: i64,
    pub frontier: usize,
    pub live_nodes: usize,
}

pub struct SearchEngine<'a> {
    grid: &'a Grid,
    params: BeamParams,
    states: ObjectPool<SearchState>,
    tree: HistoryTree,

    // Used for debugging purposes. If set, is populated & debug-logged.
    visualization: Option<BeamVisualization>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(grid: &'a Grid, params: BeamParams) -> Self {
        let params = params.clamped();
        let visualization = if cfg!(feature = "visualization_dump") {
            Some(BeamVisualization::default())
        } else {
            None
        };
        SearchEngine {
            grid,
            params,
            // Parents and children of one turn are alive at the same time.
            states: ObjectPool::with_capacity(params.width * 5),
            tree: HistoryTree::new(),
            visualization,
        }
    }

    pub fn tree(&self) -> &HistoryTree {
        &self.tree
    }

    pub fn states(&self) -> &ObjectPool<SearchState> {
        &self.states
    }

    // Drops a candidate along with its hold on the history tree.
    fn discard(&mut self, handle: Handle) {
        if let Some(node) = self.states.get(handle).node {
            self.tree.release_ref(node);
        }
        self.states.release(handle);
    }

    fn start_state(&mut self) -> Handle {
        let root = self.tree.root();
        self.tree.retain(root);
        self.states.acquire(|state| {
            state.recycle();
            state.node = Some(root);
        })
    }

    /// Runs the turn loop and returns the final frontier, best first, along
    /// with the number of turns that produced moves.
    pub(crate) fn search(&mut self) -> (Vec<Handle>, usize) {
        let width = self.params.width;
        let mut frontier: Vec<Handle> = Vec::with_capacity(width * 4);
        let mut children: Vec<Handle> = Vec::with_capacity(width * 4);
        frontier.push(self.start_state());
        let mut turns = 0;

        for turn in 0..self.params.depth {
            children.clear();
            for &parent in &frontier {
                if self.states.get(parent).turn as usize == turn {
                    children.extend(expand(parent, self.grid, &mut self.states,
                                           &mut self.tree));
                }
            }
            if children.is_empty() {
                debug!("No move possible on turn {turn}, stopping early.");
                break;
            }
            let states = &self.states;
            children.sort_by_key(|&child| Reverse(states.get(child).score));
            for &child in children.iter().skip(width) {
                self.discard(child);
            }
            children.truncate(width);
            for &parent in &frontier {
                self.discard(parent);
            }
            frontier.clear();
            mem::swap(&mut frontier, &mut children);
            turns = turn + 1;

            let best_score = self.states.get(frontier[0]).score;
            if let Some(viz) = &mut self.visualization {
                viz.turns.push(TurnVisualization {
                    turn,
                    best_score,
                    frontier: frontier.len(),
                    live_nodes: self.tree.live_nodes(),
                });
            }
            if turns % 1000 == 0 {
                debug!("Turn {turns}/{depth}: best score {best_score}, {nodes} live history nodes",
                       depth = self.params.depth, nodes = self.tree.live_nodes());
            }
        }
        (frontier, turns)
    }

    /// Full solve: beam search, then the shortest way home from the best
    /// candidate.
    pub fn run(&mut self) -> Solution {
        let start = Instant::now();
        let (frontier, turns) = self.search();
        let best = frontier[0];
        let mut finish = self.states.get(best).clone();
        let mut moves = finish.to_moves(&self.tree);
        info!("Beam search: {turns} turns in {elapsed:?}, best score {score}",
              elapsed = start.elapsed(), score = finish.score);

        match path_home(self.grid, finish.pos) {
            Some(home) => {
                for &direction in &home {
                    finish.move_to(self.grid, direction);
                }
                debug!("Way home: {len} moves", len = home.len());
                moves.extend(home);
            },
            None => warn!("No way home from {pos:?}, route stays open.", pos = finish.pos),
        }

        for handle in frontier {
            self.discard(handle);
        }
        debug!("State pool: {stats:?}", stats = self.states.stats());
        debug!("History tree: {tree:?}, pool: {pool:?}",
               tree = self.tree.stats(), pool = self.tree.pool_stats());
        if let Some(viz) = &self.visualization {
            debug!("[VIZ_DATA] {}", json!(viz));
        }

        Solution { moves, score: finish.score, turns }
    }
}
