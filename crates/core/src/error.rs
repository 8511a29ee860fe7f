use thiserror::Error;

/// Errors reported by the search engine.
///
/// Every error is local to the call that produced it; the engine never
/// retries internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// `update_root` was given an action the root state does not allow.
    #[error("Invalid action: {0} is not legal from the current root")]
    InvalidAction(String),

    /// The root state is terminal, so the decision process has ended.
    #[error("No actions available: root state is terminal")]
    NoActionsAvailable,

    /// A `State` implementation or policy override broke its contract.
    #[error("Policy contract violation: {0}")]
    PolicyContractViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}

/// Convenience Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
