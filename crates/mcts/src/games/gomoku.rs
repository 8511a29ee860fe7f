//! Gomoku on a 9x9 board, four in a row to win.
//!
//! Like tic-tac-toe, both sides' moves live in one tree and the reward is
//! always read from the agent's side. Searching a 9x9 board from every
//! empty cell is slow, so a state can restrict moves to cells next to a
//! stone already on the board.

use arbor_core::{Result, SearchError, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board side length.
pub const BOARD_SIZE: usize = 9;

/// Stones in a line needed to win.
pub const WIN_LENGTH: usize = 4;

const CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Line directions as (row, col) steps; the opposite steps are walked too.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Stone colour. Black moves first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// Get the other colour.
    pub fn opposite(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "B"),
            Stone::White => write!(f, "W"),
        }
    }
}

/// Place a stone at (row, col).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct GomokuAction {
    pub row: u8,
    pub col: u8,
}

impl GomokuAction {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    fn from_index(index: usize) -> Self {
        Self::new((index / BOARD_SIZE) as u8, (index % BOARD_SIZE) as u8)
    }

    fn in_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }
}

impl fmt::Display for GomokuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Gomoku board state.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct GomokuState {
    /// Row-major cells.
    board: [Option<Stone>; CELLS],

    current: Stone,

    /// The side whose reward is being maximized.
    agent: Stone,

    winner: Option<Stone>,

    stones: usize,

    /// Only offer cells with an occupied neighbour (any of eight).
    neighbourhood_only: bool,
}

impl GomokuState {
    /// Create an empty board with Black to move, searched on behalf of `agent`.
    pub fn new(agent: Stone) -> Self {
        Self {
            board: [None; CELLS],
            current: Stone::Black,
            agent,
            winner: None,
            stones: 0,
            neighbourhood_only: false,
        }
    }

    /// Restrict moves to cells next to an existing stone (an empty board
    /// still offers every cell).
    pub fn with_neighbourhood_only(mut self, enabled: bool) -> Self {
        self.neighbourhood_only = enabled;
        self
    }

    /// Replay `moves` from an empty board, alternating from Black.
    pub fn from_moves(agent: Stone, moves: &[(u8, u8)]) -> Result<Self> {
        moves
            .iter()
            .try_fold(Self::new(agent), |state, &(row, col)| state.play(row, col))
    }

    /// Place the current player's stone, rejecting occupied or off-board
    /// cells and moves after the game ended.
    pub fn play(&self, row: u8, col: u8) -> Result<Self> {
        let action = GomokuAction::new(row, col);
        if !action.in_board() {
            return Err(SearchError::InvalidAction(format!(
                "{} is off the {}x{} board",
                action, BOARD_SIZE, BOARD_SIZE
            )));
        }
        if self.board[action.index()].is_some() {
            return Err(SearchError::InvalidAction(format!("{} is occupied", action)));
        }
        if self.is_terminal() {
            return Err(SearchError::NoActionsAvailable);
        }
        Ok(self.execute_action(&action))
    }

    pub fn current_player(&self) -> Stone {
        self.current
    }

    pub fn agent(&self) -> Stone {
        self.agent
    }

    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    /// Get the stone at (row, col), if any.
    pub fn get(&self, row: usize, col: usize) -> Option<Stone> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        self.board[row * BOARD_SIZE + col]
    }

    fn is_full(&self) -> bool {
        self.stones == CELLS
    }

    /// Stones of the same colour in a row through `action`, along one axis.
    fn line_length(&self, action: GomokuAction, (dr, dc): (isize, isize)) -> usize {
        let stone = self.board[action.index()];
        let count = |sign: isize| {
            let (mut r, mut c) = (action.row as isize, action.col as isize);
            let mut n = 0;
            loop {
                r += sign * dr;
                c += sign * dc;
                if r < 0 || c < 0 || self.get(r as usize, c as usize) != stone {
                    return n;
                }
                n += 1;
            }
        };
        1 + count(1) + count(-1)
    }

    fn wins_through(&self, action: GomokuAction) -> bool {
        DIRECTIONS
            .iter()
            .any(|&dir| self.line_length(action, dir) >= WIN_LENGTH)
    }

    fn has_neighbour(&self, index: usize) -> bool {
        let (row, col) = ((index / BOARD_SIZE) as isize, (index % BOARD_SIZE) as isize);
        (-1..=1)
            .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
            .filter(|&step| step != (0, 0))
            .any(|(dr, dc)| {
                let (r, c) = (row + dr, col + dc);
                r >= 0 && c >= 0 && self.get(r as usize, c as usize).is_some()
            })
    }
}

impl fmt::Display for GomokuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{} ", row)?;
            for col in 0..BOARD_SIZE {
                match self.board[row * BOARD_SIZE + col] {
                    Some(stone) => write!(f, " {}", stone)?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl State for GomokuState {
    type Action = GomokuAction;

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    fn possible_actions(&self) -> Vec<GomokuAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        let restrict = self.neighbourhood_only && self.stones > 0;
        (0..CELLS)
            .filter(|&i| self.board[i].is_none())
            .filter(|&i| !restrict || self.has_neighbour(i))
            .map(GomokuAction::from_index)
            .collect()
    }

    fn execute_action(&self, action: &GomokuAction) -> Self {
        let mut new_state = self.clone();
        new_state.board[action.index()] = Some(self.current);
        new_state.stones += 1;
        new_state.current = self.current.opposite();
        if new_state.wins_through(*action) {
            new_state.winner = Some(self.current);
        }
        new_state
    }

    /// +1 if the agent made a line, -1 if the opponent did, 0 otherwise.
    fn reward(&self) -> f64 {
        match self.winner {
            Some(winner) if winner == self.agent => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }
}
