//! Generic Monte Carlo Tree Search.
//!
//! This crate provides an MCTS engine that can be used with any decision
//! process implementing the `arbor_core::State` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `State` implementation
//! - **UCB1 Selection**: Balances exploitation and exploration at every level
//! - **Pluggable Phases**: Selection, expansion, simulation and
//!   backpropagation can each be swapped for a custom policy
//! - **Budgets**: Search by iteration count or wall-clock time
//! - **Tree Reuse**: Re-rooting keeps the statistics of the chosen subtree
//!
//! # Example
//!
//! ```
//! use arbor_mcts::{games::{Player, TicTacToeState}, Mcts, MctsConfig, SearchBudget};
//! use arbor_core::State;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let state = TicTacToeState::new(Player::X);
//! let config = MctsConfig::with_iterations(200);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut mcts = Mcts::new(state, config, rng).expect("valid config");
//!
//! let report = mcts.search().expect("search");
//! println!("Best action: {}", report.best_action);
//! assert!(mcts.root_state().possible_actions().contains(&report.best_action));
//!
//! // Follow the real game and keep searching from there
//! mcts.update_root(&report.best_action).expect("legal action");
//! let next = mcts.search_for_action(SearchBudget::Iterations(100)).expect("search");
//! assert!(mcts.root_state().possible_actions().contains(&next));
//! ```

pub mod config;
pub mod games;
mod node;
pub mod policy;
pub mod search;
#[cfg(test)]
mod testing;
mod tree;

pub use config::{ExpansionOrder, MctsConfig, SearchBudget};
pub use node::{Node, NodeId, NodeStats};
pub use policy::{
    AccumulateReward, BackpropagationPolicy, ExpansionPolicy, RandomRollout, SelectionPolicy,
    SimulationPolicy, Ucb1, UntriedExpansion,
};
pub use search::{ActionStats, Mcts, SearchReport};
pub use tree::Tree;
