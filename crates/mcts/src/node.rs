//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.

use arbor_core::State;

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Using indices instead of pointers avoids Rc/RefCell overhead and keeps
/// the child-to-parent link non-owning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Statistics for a single MCTS node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// Number of backpropagation paths this node has been part of.
    pub visit_count: u32,

    /// Sum of rewards from every simulation that passed through this node.
    pub total_reward: f64,
}

impl NodeStats {
    /// Average reward over all visits.
    ///
    /// Returns 0.0 if the node has never been visited.
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.visit_count)
        }
    }

    /// Record one simulation result.
    pub fn record(&mut self, reward: f64) {
        self.visit_count += 1;
        self.total_reward += reward;
    }
}

/// A node in the MCTS tree.
///
/// Each node owns one state and stores statistics about the simulations
/// that went through it.
#[derive(Clone, Debug)]
pub struct Node<S: State> {
    /// The state this node wraps.
    pub state: S,

    /// Action that led to this node (None for root).
    pub action: Option<S::Action>,

    /// Parent node (None for root). Used for path reconstruction only.
    pub parent: Option<NodeId>,

    /// Children: (action, node_id) pairs in expansion order.
    pub children: Vec<(S::Action, NodeId)>,

    /// Legal actions of `state` that have not been expanded yet.
    pub untried_actions: Vec<S::Action>,

    /// Node statistics (visits, accumulated reward).
    pub stats: NodeStats,

    /// Distance from the root (root = 0).
    pub depth: usize,
}

impl<S: State> Node<S> {
    /// Create a new unexpanded node, seeding `untried_actions` from the state.
    pub fn new(state: S, action: Option<S::Action>, parent: Option<NodeId>, depth: usize) -> Self {
        let untried_actions = state.possible_actions();
        Self {
            state,
            action,
            parent,
            children: Vec::new(),
            untried_actions,
            stats: NodeStats::default(),
            depth,
        }
    }

    /// Create a root node.
    pub fn root(state: S) -> Self {
        Self::new(state, None, None, 0)
    }

    /// Whether the wrapped state is terminal.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether every legal action has been expanded into a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// Look up the child reached by `action`.
    pub fn child(&self, action: &S::Action) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }
}
