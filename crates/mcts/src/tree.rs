//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>.

use crate::node::{Node, NodeId};
use arbor_core::{Result, SearchError, State};
use std::collections::VecDeque;

/// Arena-allocated MCTS tree.
///
/// The tree owns every node. Parent links are plain indices used to walk
/// back towards the root; they never keep a node alive. The root is always
/// at [`NodeId::ROOT`] and has no parent.
#[derive(Clone, Debug)]
pub struct Tree<S: State> {
    nodes: Vec<Node<S>>,
}

impl<S: State> Tree<S> {
    /// Create a new tree holding a single root node.
    pub fn new(state: S) -> Self {
        Self {
            nodes: vec![Node::root(state)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a child wrapping `state` under `parent`, returning its ID.
    ///
    /// # Errors
    /// Returns `PolicyContractViolation` if `parent` already has a child for
    /// `action`; an action is never expanded twice.
    pub fn add_child(&mut self, parent: NodeId, action: S::Action, state: S) -> Result<NodeId> {
        if self.get(parent).child(&action).is_some() {
            return Err(SearchError::PolicyContractViolation(format!(
                "action {:?} expanded twice from the same node",
                action
            )));
        }

        let depth = self.get(parent).depth + 1;
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(state, Some(action.clone()), Some(parent), depth));
        self.get_mut(parent).children.push((action, id));
        Ok(id)
    }

    /// Nodes from the root down to `id`, inclusive.
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Make `id` the new root, keeping its subtree and releasing every other node.
    ///
    /// The kept subtree is compacted into a fresh arena: `id` becomes
    /// [`NodeId::ROOT`], depths are rebased and statistics are preserved.
    pub fn retain_subtree(&mut self, id: NodeId) {
        if id == NodeId::ROOT {
            return;
        }

        let mut old: Vec<Option<Node<S>>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        let mut nodes: Vec<Node<S>> = Vec::new();
        // (old id, new parent id)
        let mut queue: VecDeque<(NodeId, Option<NodeId>)> = VecDeque::new();
        queue.push_back((id, None));

        while let Some((old_id, new_parent)) = queue.pop_front() {
            let Some(mut node) = old[old_id.0].take() else {
                continue;
            };
            let new_id = NodeId(nodes.len());
            node.parent = new_parent;
            node.depth = new_parent.map_or(0, |p| nodes[p.0].depth + 1);
            if new_parent.is_none() {
                node.action = None;
            }

            // Children get their final IDs in BFS order; reserve them now.
            let first_child = new_id.0 + 1 + queue.len();
            let old_children = std::mem::take(&mut node.children);
            for (offset, (action, child)) in old_children.into_iter().enumerate() {
                node.children.push((action, NodeId(first_child + offset)));
                queue.push_back((child, Some(new_id)));
            }
            nodes.push(node);
        }

        self.nodes = nodes;
    }
}
