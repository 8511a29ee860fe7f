//! Tree policy: descend from a node to the search frontier.

use crate::{node::NodeId, tree::Tree};
use arbor_core::{Result, SearchError, State};

/// Chooses the path from a node down to a frontier node.
pub trait SelectionPolicy<S: State> {
    /// Walk down from `from` and return the visited nodes, `from` first and
    /// the frontier node last.
    fn select(&self, tree: &Tree<S>, from: NodeId) -> Result<Vec<NodeId>>;
}

/// Upper Confidence Bound applied to trees.
///
/// UCB1(c) = mean(c) + C * sqrt(ln(N_parent) / N_c)
///
/// Unvisited children score +inf. Scores are compared with a strict `>`,
/// so among equal scores the first child in expansion order wins.
#[derive(Clone, Debug)]
pub struct Ucb1 {
    pub exploration_constant: f64,

    /// Selection never descends below this depth.
    pub max_depth: Option<usize>,
}

impl Ucb1 {
    pub fn new(exploration_constant: f64) -> Self {
        Self {
            exploration_constant,
            max_depth: None,
        }
    }

    /// UCB1 score of a child with the given statistics.
    pub fn score(&self, parent_visits: u32, child_visits: u32, child_total: f64) -> f64 {
        if child_visits == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(child_visits);
        let ln_parent = f64::from(parent_visits.max(1)).ln();
        child_total / n + self.exploration_constant * (ln_parent / n).sqrt()
    }

    /// Pick the best child of an expanded node.
    fn best_child<S: State>(&self, tree: &Tree<S>, id: NodeId) -> Option<NodeId> {
        let node = tree.get(id);
        let parent_visits = node.stats.visit_count;

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for (_, child_id) in &node.children {
            let stats = &tree.get(*child_id).stats;
            let score = self.score(parent_visits, stats.visit_count, stats.total_reward);
            if best.is_none() || score > best_score {
                best = Some(*child_id);
                best_score = score;
            }
        }
        best
    }
}

impl<S: State> SelectionPolicy<S> for Ucb1 {
    fn select(&self, tree: &Tree<S>, from: NodeId) -> Result<Vec<NodeId>> {
        let mut path = vec![from];
        let mut current = from;

        loop {
            let node = tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                break;
            }
            if self.max_depth.is_some_and(|max| node.depth >= max) {
                break;
            }

            current = self.best_child(tree, current).ok_or_else(|| {
                SearchError::PolicyContractViolation(format!(
                    "non-terminal state at depth {} has no possible actions",
                    node.depth
                ))
            })?;
            path.push(current);
        }

        log::trace!("selected frontier at depth {}", path.len() - 1);
        Ok(path)
    }
}
