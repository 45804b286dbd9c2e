pub mod beam_search;
pub mod challenge;
pub mod challenge_consts;
pub mod game_interface;
pub mod grid;
pub mod history;
pub mod pathfinding;
pub mod pool;
pub mod simple_beam_search;
pub mod solvers;
pub mod state;
