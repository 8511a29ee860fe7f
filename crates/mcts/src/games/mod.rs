//! Example domains for the search engine.
//!
//! Small enough to check results by hand, rich enough to exercise every
//! phase of an iteration.

pub mod gomoku;
pub mod maze;
pub mod tictactoe;

pub use gomoku::{GomokuAction, GomokuState, Stone};
pub use maze::{MazeAction, MazeEnvironment, MazeState, Position};
pub use tictactoe::{Player, TicTacToeAction, TicTacToeState};
