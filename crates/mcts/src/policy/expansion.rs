//! Expansion policy: grow the tree by one child.

use crate::{config::ExpansionOrder, node::NodeId, tree::Tree};
use arbor_core::{Result, SearchError, State};
use rand::{Rng, RngCore};

/// Adds children to a frontier node.
pub trait ExpansionPolicy<S: State> {
    /// Expand `node` and return the node simulation should start from.
    ///
    /// Terminal and fully expanded nodes are returned unchanged.
    fn expand(&self, tree: &mut Tree<S>, node: NodeId, rng: &mut dyn RngCore) -> Result<NodeId>;
}

/// Consumes one untried action per call.
#[derive(Clone, Debug, Default)]
pub struct UntriedExpansion {
    pub order: ExpansionOrder,
}

impl UntriedExpansion {
    pub fn new(order: ExpansionOrder) -> Self {
        Self { order }
    }
}

impl<S: State> ExpansionPolicy<S> for UntriedExpansion {
    fn expand(&self, tree: &mut Tree<S>, node_id: NodeId, rng: &mut dyn RngCore) -> Result<NodeId> {
        let node = tree.get(node_id);
        if node.is_terminal() || node.is_fully_expanded() {
            return Ok(node_id);
        }

        let index = match self.order {
            ExpansionOrder::First => 0,
            ExpansionOrder::Random => rng.gen_range(0..node.untried_actions.len()),
        };
        let action = node.untried_actions[index].clone();

        // The untried list was captured when the node was created; the state
        // must still agree that the action is legal.
        if !node.state.possible_actions().contains(&action) {
            return Err(SearchError::PolicyContractViolation(format!(
                "untried action {:?} is no longer in possible_actions",
                action
            )));
        }

        let child_state = node.state.execute_action(&action);
        let child = tree.add_child(node_id, action, child_state)?;
        tree.get_mut(node_id).untried_actions.remove(index);
        Ok(child)
    }
}
