//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search algorithm.
//! Every field has a default so a partial JSON document is a valid config.

use arbor_core::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How much work a single search may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBudget {
    /// Run exactly this many iterations.
    Iterations(u32),

    /// Keep iterating until this much wall-clock time has passed.
    /// Checked between iterations; at least one iteration always runs.
    TimeLimit { millis: u64 },
}

impl SearchBudget {
    pub fn time_limit(limit: Duration) -> Self {
        SearchBudget::TimeLimit {
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Check that the budget allows at least one iteration.
    pub fn validate(&self) -> Result<()> {
        match self {
            SearchBudget::Iterations(0) => Err(SearchError::InvalidConfig(
                "iteration budget must be > 0".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget::Iterations(1000)
    }
}

/// Which untried action the expansion phase consumes first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionOrder {
    /// The first untried action in `possible_actions` order.
    First,

    /// A uniformly random untried action.
    #[default]
    Random,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCB1 exploration constant `C`.
    /// score = mean + C * sqrt(ln(N_parent) / N_child)
    pub exploration_constant: f64,

    /// Budget used by [`crate::Mcts::search`].
    pub budget: SearchBudget,

    /// Order in which untried actions are expanded.
    pub expansion_order: ExpansionOrder,

    /// Nodes at this depth (root = 0) are never expanded further.
    /// `None` lets the tree grow without limit.
    pub max_tree_depth: Option<usize>,

    /// Rollouts stop after this many steps and score the state they reached.
    /// `None` plays every rollout to a terminal state.
    pub max_rollout_steps: Option<usize>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            budget: SearchBudget::default(),
            expansion_order: ExpansionOrder::default(),
            max_tree_depth: None,
            max_rollout_steps: None,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of iterations.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            budget: SearchBudget::Iterations(iterations),
            ..Default::default()
        }
    }

    /// Create a new config bounded by wall-clock time.
    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            budget: SearchBudget::time_limit(limit),
            ..Default::default()
        }
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_constant must be finite and >= 0, got {}",
                self.exploration_constant
            )));
        }
        self.budget.validate()?;
        if self.max_tree_depth == Some(0) {
            return Err(SearchError::InvalidConfig(
                "max_tree_depth must be >= 1".to_string(),
            ));
        }
        if self.max_rollout_steps == Some(0) {
            return Err(SearchError::InvalidConfig(
                "max_rollout_steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
