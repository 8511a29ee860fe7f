//! Backpropagation: fold a simulation result into the tree.

use crate::{node::NodeId, tree::Tree};
use arbor_core::State;

/// Updates node statistics along a simulated path.
pub trait BackpropagationPolicy<S: State> {
    /// Record `reward` on every node of `path` (root first, simulated node last).
    fn backpropagate(&self, tree: &mut Tree<S>, path: &[NodeId], reward: f64);
}

/// Adds the reward to every node on the path, exactly once each.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccumulateReward;

impl<S: State> BackpropagationPolicy<S> for AccumulateReward {
    fn backpropagate(&self, tree: &mut Tree<S>, path: &[NodeId], reward: f64) {
        for &node_id in path.iter().rev() {
            tree.get_mut(node_id).stats.record(reward);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Countdown;

    #[test]
    fn test_updates_every_node_once() {
        let mut tree = Tree::new(Countdown::new(4));
        let state = tree.root().state.execute_action(&1);
        let child = tree.add_child(NodeId::ROOT, 1, state).unwrap();
        let state = tree.get(child).state.execute_action(&2);
        let grandchild = tree.add_child(child, 2, state).unwrap();

        let path = [NodeId::ROOT, child, grandchild];
        AccumulateReward.backpropagate(&mut tree, &path, 2.0);
        AccumulateReward.backpropagate(&mut tree, &path[..2], 1.0);

        assert_eq!(tree.root().stats.visit_count, 2);
        assert_eq!(tree.root().stats.total_reward, 3.0);
        assert_eq!(tree.get(child).stats.visit_count, 2);
        assert_eq!(tree.get(grandchild).stats.visit_count, 1);
        assert_eq!(tree.get(grandchild).stats.total_reward, 2.0);
    }
}
