//! Shared value types with enforced invariants.
//!
//! - Policy: probability distribution over actions summing to 1.0

use crate::{Result, SearchError};

/// Tolerance for policy sum validation.
const POLICY_SUM_TOLERANCE: f64 = 1e-9;

/// A probability distribution over actions.
///
/// Invariant: the list is non-empty, every probability is non-negative and
/// they sum to 1.0 (±1e-9).
///
/// # Example
/// ```
/// use arbor_core::Policy;
///
/// let policy = Policy::from_counts(vec![('a', 3), ('b', 1)]).unwrap();
/// assert_eq!(policy.probability(&'a'), 0.75);
/// assert_eq!(policy.argmax(), Some(&'a'));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Policy<A>(Vec<(A, f64)>);

impl<A: PartialEq> Policy<A> {
    /// Create a new policy from action probabilities.
    ///
    /// # Errors
    /// Returns `SearchError::InvalidPolicy` if:
    /// - The list is empty
    /// - Any probability is negative or not finite
    /// - Probabilities don't sum to 1.0
    pub fn new(probs: Vec<(A, f64)>) -> Result<Self> {
        if probs.is_empty() {
            return Err(SearchError::InvalidPolicy(
                "policy cannot be empty".to_string(),
            ));
        }

        if probs.iter().any(|(_, p)| !p.is_finite() || *p < 0.0) {
            return Err(SearchError::InvalidPolicy(
                "policy contains negative or non-finite values".to_string(),
            ));
        }

        let sum: f64 = probs.iter().map(|(_, p)| p).sum();
        if (sum - 1.0).abs() > POLICY_SUM_TOLERANCE {
            return Err(SearchError::InvalidPolicy(format!(
                "policy sum {} is not 1.0 (tolerance {})",
                sum, POLICY_SUM_TOLERANCE
            )));
        }

        Ok(Self(probs))
    }

    /// Create a policy proportional to visit counts.
    ///
    /// # Errors
    /// Returns error if the list is empty or every count is zero.
    pub fn from_counts(counts: Vec<(A, u32)>) -> Result<Self> {
        let total: u64 = counts.iter().map(|(_, c)| u64::from(*c)).sum();
        if total == 0 {
            return Err(SearchError::InvalidPolicy(
                "cannot normalize: all counts are zero".to_string(),
            ));
        }

        let probs = counts
            .into_iter()
            .map(|(a, c)| (a, f64::from(c) / total as f64))
            .collect();
        Self::new(probs)
    }

    /// Probability assigned to `action`, 0.0 if it is not listed.
    pub fn probability(&self, action: &A) -> f64 {
        self.0
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// The most probable action; the first listed wins ties.
    pub fn argmax(&self) -> Option<&A> {
        let mut best: Option<&(A, f64)> = None;
        for entry in &self.0 {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(a, _)| a)
    }

    /// Get the number of actions in this policy.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the policy is empty (never true for a constructed policy).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the sum of all probabilities (should be ~1.0).
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, p)| p).sum()
    }

    /// Iterate over `(action, probability)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(A, f64)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<(A, f64)> {
        self.0
    }
}
