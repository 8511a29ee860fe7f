//! Arbor Core - State contract and common types
//!
//! This crate provides the `State` trait that a decision domain implements
//! to be searched by the arbor Monte Carlo tree search engine.
//!
//! # Types
//!
//! - [`State`] - Trait for decision process states
//! - [`Policy`] - Probability distribution over actions (sums to 1.0)
//! - [`SearchError`] - Errors reported by search operations

mod error;
mod state;
mod types;

pub use error::{Result, SearchError};
pub use state::State;
pub use types::Policy;
