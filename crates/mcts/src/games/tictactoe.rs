//! Tic-tac-toe as a single-agent decision process.
//!
//! The searching agent plays one side; the other side's moves are part of
//! the same tree, so the engine treats them as actions too. Rewards are
//! always from the agent's point of view.

use arbor_core::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tic-tac-toe player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opposing player.
    pub fn opposite(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Tic-tac-toe action (cell index 0-8).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TicTacToeAction(pub u8);

impl TicTacToeAction {
    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl fmt::Display for TicTacToeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Tic-tac-toe board state.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToeState {
    /// Board: 9 cells, indexed 0-8 (row-major).
    /// ```text
    /// 0 | 1 | 2
    /// ---------
    /// 3 | 4 | 5
    /// ---------
    /// 6 | 7 | 8
    /// ```
    board: [Option<Player>; 9],

    /// Current player to move.
    current: Player,

    /// The side whose reward is being maximized.
    agent: Player,

    /// Cached winner (if any).
    winner: Option<Player>,
}

impl TicTacToeState {
    /// Create a new empty board with X to move, searched on behalf of `agent`.
    pub fn new(agent: Player) -> Self {
        Self {
            board: [None; 9],
            current: Player::X,
            agent,
            winner: None,
        }
    }

    /// Get the current player to move.
    pub fn current_player(&self) -> Player {
        self.current
    }

    /// The side this state scores for.
    pub fn agent(&self) -> Player {
        self.agent
    }

    /// Get the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Get the piece at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Player> {
        self.board.get(cell).copied().flatten()
    }

    fn check_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|line| {
            let player = self.board[line[0]]?;
            (self.board[line[1]] == Some(player) && self.board[line[2]] == Some(player))
                .then_some(player)
        })
    }

    /// Check if the board is full (draw if no winner).
    fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, "|")?;
                }
                match self.board[row * 3 + col] {
                    Some(player) => write!(f, " {} ", player)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl State for TicTacToeState {
    type Action = TicTacToeAction;

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    fn possible_actions(&self) -> Vec<TicTacToeAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| TicTacToeAction(i as u8))
            .collect()
    }

    fn execute_action(&self, action: &TicTacToeAction) -> Self {
        let mut new_state = self.clone();
        new_state.board[action.0 as usize] = Some(self.current);
        new_state.current = self.current.opposite();
        new_state.winner = new_state.check_winner();
        new_state
    }

    /// +1 if the agent won, -1 if it lost, 0 otherwise.
    fn reward(&self) -> f64 {
        match self.winner {
            Some(winner) if winner == self.agent => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }
}
