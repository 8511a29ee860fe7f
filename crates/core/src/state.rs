use std::fmt::Debug;
use std::hash::Hash;

/// A configuration of a sequential decision process.
///
/// This trait is the only thing a problem domain has to implement to be
/// searched. States are immutable values: [`State::execute_action`] returns
/// a successor and never touches the receiver. The engine only ever talks
/// to a domain through these four operations.
pub trait State: Clone {
    /// An action that moves the process from one state to the next.
    ///
    /// Children of a search node are told apart by action equality, so two
    /// distinct legal actions of the same state must compare unequal.
    type Action: Clone + Eq + Hash + Debug;

    /// Returns true if no further actions are possible.
    fn is_terminal(&self) -> bool;

    /// Returns the legal actions from this state.
    ///
    /// Must be empty for terminal states and non-empty otherwise, and must
    /// return the same actions every time it is called on the same state.
    fn possible_actions(&self) -> Vec<Self::Action>;

    /// Applies an action, returning a new state (immutable operation)
    fn execute_action(&self, action: &Self::Action) -> Self;

    /// Utility of reaching this state.
    ///
    /// Always meaningful for terminal states. For non-terminal states it may
    /// be zero or a heuristic estimate; it is only read there when a rollout
    /// is cut short by a step cap.
    fn reward(&self) -> f64;
}
