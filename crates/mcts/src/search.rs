//! Monte Carlo Tree Search controller.
//!
//! Runs the selection -> expansion -> simulation -> backpropagation loop
//! over a tree it owns, reports the best root action and follows the real
//! process as actions are taken.

use crate::{
    config::{MctsConfig, SearchBudget},
    node::{NodeId, NodeStats},
    policy::{
        AccumulateReward, BackpropagationPolicy, ExpansionPolicy, RandomRollout, SelectionPolicy,
        SimulationPolicy, Ucb1, UntriedExpansion,
    },
    tree::Tree,
};
use arbor_core::{Policy, Result, SearchError, State};
use rand::RngCore;
use std::time::{Duration, Instant};

/// Statistics of one root action after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionStats<A> {
    pub action: A,
    pub visit_count: u32,
    pub total_reward: f64,
    pub mean_reward: f64,
}

/// Result of an MCTS search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport<A> {
    /// Root action whose child has the highest mean reward.
    pub best_action: A,

    /// Statistics for each expanded root action, in expansion order.
    pub action_stats: Vec<ActionStats<A>>,

    /// Iterations run by this search.
    pub iterations: u32,

    /// Root visit count after the search (includes earlier searches).
    pub root_visits: u32,

    /// Wall-clock time spent iterating.
    pub elapsed: Duration,
}

impl<A: Clone + PartialEq> SearchReport<A> {
    /// Visit counts of the root actions as a probability distribution.
    ///
    /// # Errors
    /// Returns error if no root action has been visited.
    pub fn visit_policy(&self) -> Result<Policy<A>> {
        Policy::from_counts(
            self.action_stats
                .iter()
                .map(|s| (s.action.clone(), s.visit_count))
                .collect(),
        )
    }

    /// Statistics of a single root action.
    pub fn stats_for(&self, action: &A) -> Option<&ActionStats<A>> {
        self.action_stats.iter().find(|s| &s.action == action)
    }
}

/// Monte Carlo Tree Search with pluggable phase policies.
///
/// Generic over:
/// - `S`: The state of the decision process
/// - `R`: The random number generator driving expansion and rollouts
/// - `Sel`, `Exp`, `Sim`, `Bp`: The selection, expansion, simulation and
///   backpropagation policies
pub struct Mcts<
    S: State,
    R,
    Sel = Ucb1,
    Exp = UntriedExpansion,
    Sim = RandomRollout,
    Bp = AccumulateReward,
> {
    config: MctsConfig,
    tree: Tree<S>,
    rng: R,
    selection: Sel,
    expansion: Exp,
    simulation: Sim,
    backpropagation: Bp,
}

impl<S: State, R: RngCore> Mcts<S, R> {
    /// Create a new MCTS instance rooted at `initial_state` with the default policies.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration fails validation.
    pub fn new(initial_state: S, config: MctsConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            selection: Ucb1 {
                exploration_constant: config.exploration_constant,
                max_depth: config.max_tree_depth,
            },
            expansion: UntriedExpansion::new(config.expansion_order),
            simulation: RandomRollout::new(config.max_rollout_steps),
            backpropagation: AccumulateReward,
            tree: Tree::new(initial_state),
            rng,
            config,
        })
    }
}

impl<S, R, Sel, Exp, Sim, Bp> Mcts<S, R, Sel, Exp, Sim, Bp>
where
    S: State,
    R: RngCore,
    Sel: SelectionPolicy<S>,
    Exp: ExpansionPolicy<S>,
    Sim: SimulationPolicy<S>,
    Bp: BackpropagationPolicy<S>,
{
    /// Replace the selection policy.
    pub fn with_selection<P: SelectionPolicy<S>>(
        self,
        selection: P,
    ) -> Mcts<S, R, P, Exp, Sim, Bp> {
        Mcts {
            config: self.config,
            tree: self.tree,
            rng: self.rng,
            selection,
            expansion: self.expansion,
            simulation: self.simulation,
            backpropagation: self.backpropagation,
        }
    }

    /// Replace the expansion policy.
    pub fn with_expansion<P: ExpansionPolicy<S>>(
        self,
        expansion: P,
    ) -> Mcts<S, R, Sel, P, Sim, Bp> {
        Mcts {
            config: self.config,
            tree: self.tree,
            rng: self.rng,
            selection: self.selection,
            expansion,
            simulation: self.simulation,
            backpropagation: self.backpropagation,
        }
    }

    /// Replace the simulation policy.
    pub fn with_simulation<P: SimulationPolicy<S>>(
        self,
        simulation: P,
    ) -> Mcts<S, R, Sel, Exp, P, Bp> {
        Mcts {
            config: self.config,
            tree: self.tree,
            rng: self.rng,
            selection: self.selection,
            expansion: self.expansion,
            simulation,
            backpropagation: self.backpropagation,
        }
    }

    /// Replace the backpropagation policy.
    pub fn with_backpropagation<P: BackpropagationPolicy<S>>(
        self,
        backpropagation: P,
    ) -> Mcts<S, R, Sel, Exp, Sim, P> {
        Mcts {
            config: self.config,
            tree: self.tree,
            rng: self.rng,
            selection: self.selection,
            expansion: self.expansion,
            simulation: self.simulation,
            backpropagation,
        }
    }

    /// Run a search with the configured budget.
    pub fn search(&mut self) -> Result<SearchReport<S::Action>> {
        self.run(self.config.budget)
    }

    /// Run `budget` iterations from the current root and report the root statistics.
    ///
    /// # Errors
    /// - `NoActionsAvailable` if the root state is terminal
    /// - `InvalidConfig` if the budget allows no iteration
    /// - `PolicyContractViolation` if the domain or a policy broke its contract
    pub fn run(&mut self, budget: SearchBudget) -> Result<SearchReport<S::Action>> {
        budget.validate()?;
        if self.tree.root().is_terminal() {
            return Err(SearchError::NoActionsAvailable);
        }

        let start = Instant::now();
        let mut iterations = 0u32;
        match budget {
            SearchBudget::Iterations(n) => {
                for _ in 0..n {
                    self.iterate()?;
                    iterations += 1;
                }
            }
            SearchBudget::TimeLimit { millis } => {
                let limit = Duration::from_millis(millis);
                loop {
                    self.iterate()?;
                    iterations += 1;
                    if start.elapsed() >= limit {
                        break;
                    }
                }
            }
        }
        let elapsed = start.elapsed();

        let report = self.report(iterations, elapsed)?;
        log::debug!(
            "search finished: {} iterations in {:?}, {} nodes, best {:?}",
            iterations,
            elapsed,
            self.tree.len(),
            report.best_action
        );
        Ok(report)
    }

    /// Search and return the best action from the root.
    pub fn search_for_action(&mut self, budget: SearchBudget) -> Result<S::Action> {
        Ok(self.run(budget)?.best_action)
    }

    /// Search, then follow the best child from the root for up to `depth` steps.
    ///
    /// The plan stops early at a terminal node or at a node none of whose
    /// children has been visited yet. It always holds at least one action.
    pub fn search_for_actions(
        &mut self,
        budget: SearchBudget,
        depth: usize,
    ) -> Result<Vec<S::Action>> {
        self.run(budget)?;

        let mut actions = Vec::new();
        let mut current = NodeId::ROOT;
        while actions.len() < depth.max(1) {
            let Some((action, child)) = self.best_child(current) else {
                break;
            };
            actions.push(action);
            current = child;
        }
        Ok(actions)
    }

    /// Advance the root to reflect `action` being taken in the real process.
    ///
    /// The explored subtree under `action` is kept as the new root; every
    /// sibling subtree is released. An unexplored action gets a fresh root.
    ///
    /// # Errors
    /// Returns `InvalidAction` if `action` is not legal from the root; the
    /// tree is left unchanged.
    pub fn update_root(&mut self, action: &S::Action) -> Result<()> {
        let root = self.tree.root();
        if !root.state.possible_actions().contains(action) {
            return Err(SearchError::InvalidAction(format!("{:?}", action)));
        }

        match root.child(action) {
            Some(child) => {
                self.tree.retain_subtree(child);
                log::debug!(
                    "re-rooted on explored action {:?}, keeping {} nodes",
                    action,
                    self.tree.len()
                );
            }
            None => {
                let state = root.state.execute_action(action);
                self.tree = Tree::new(state);
                log::debug!("re-rooted on unexplored action {:?}", action);
            }
        }
        Ok(())
    }

    /// State at the current root.
    pub fn root_state(&self) -> &S {
        &self.tree.root().state
    }

    /// Statistics at the current root.
    pub fn root_stats(&self) -> &NodeStats {
        &self.tree.root().stats
    }

    /// Read access to the whole tree, e.g. for visualization.
    pub fn tree(&self) -> &Tree<S> {
        &self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Run a single iteration: select -> expand -> simulate -> backpropagate.
    fn iterate(&mut self) -> Result<()> {
        let mut path = self.selection.select(&self.tree, NodeId::ROOT)?;
        let Some(&frontier) = path.last() else {
            return Err(SearchError::PolicyContractViolation(
                "selection returned an empty path".to_string(),
            ));
        };

        let expandable = self
            .config
            .max_tree_depth
            .map_or(true, |max| self.tree.get(frontier).depth < max);
        let leaf = if expandable {
            self.expansion.expand(&mut self.tree, frontier, &mut self.rng)?
        } else {
            frontier
        };
        if leaf != frontier {
            path = self.tree.path_from_root(leaf);
        }

        let reward = self
            .simulation
            .simulate(&self.tree.get(leaf).state, &mut self.rng)?;
        self.backpropagation.backpropagate(&mut self.tree, &path, reward);
        Ok(())
    }

    /// Child of `id` with the highest mean reward among visited children.
    ///
    /// Uses a strict `>` so the first child in expansion order wins ties.
    /// Exploration bonuses play no part in the final decision.
    fn best_child(&self, id: NodeId) -> Option<(S::Action, NodeId)> {
        let mut best: Option<(&S::Action, NodeId, f64)> = None;
        for (action, child_id) in &self.tree.get(id).children {
            let stats = &self.tree.get(*child_id).stats;
            if stats.visit_count == 0 {
                continue;
            }
            let mean = stats.mean_reward();
            if best.as_ref().map_or(true, |(_, _, m)| mean > *m) {
                best = Some((action, *child_id, mean));
            }
        }
        best.map(|(action, child_id, _)| (action.clone(), child_id))
    }

    /// Extract search results from root node.
    fn report(&self, iterations: u32, elapsed: Duration) -> Result<SearchReport<S::Action>> {
        let root = self.tree.root();
        let action_stats = root
            .children
            .iter()
            .map(|(action, id)| {
                let stats = &self.tree.get(*id).stats;
                ActionStats {
                    action: action.clone(),
                    visit_count: stats.visit_count,
                    total_reward: stats.total_reward,
                    mean_reward: stats.mean_reward(),
                }
            })
            .collect();

        let (best_action, _) = self
            .best_child(NodeId::ROOT)
            .ok_or(SearchError::NoActionsAvailable)?;

        Ok(SearchReport {
            best_action,
            action_stats,
            iterations,
            root_visits: root.stats.visit_count,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionOrder;
    use crate::testing::Countdown;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn countdown_mcts(remaining: u8, seed: u64) -> Mcts<Countdown, ChaCha8Rng> {
        Mcts::new(
            Countdown::new(remaining),
            MctsConfig::with_iterations(200),
            ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_mcts_basic() {
        let mut mcts = countdown_mcts(6, 42);
        let report = mcts.search().unwrap();

        // Stepping by one collects the most steps.
        assert_eq!(report.best_action, 1);
        assert_eq!(report.iterations, 200);
        assert_eq!(report.root_visits, 200);

        let child_visits: u32 = report.action_stats.iter().map(|s| s.visit_count).sum();
        assert_eq!(child_visits, 200);

        let policy = report.visit_policy().unwrap();
        assert!((policy.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mcts_deterministic() {
        let run = |seed| {
            let mut mcts = countdown_mcts(8, seed);
            mcts.search().unwrap().action_stats
        };

        // Same seed should produce same results
        assert_eq!(run(12345), run(12345));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Mcts::new(
            Countdown::new(3),
            MctsConfig::with_iterations(0),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SearchError::InvalidConfig(_))));
    }

    #[test]
    fn test_terminal_root_has_no_actions() {
        let mut mcts = countdown_mcts(0, 1);
        assert_eq!(mcts.search().unwrap_err(), SearchError::NoActionsAvailable);
        assert_eq!(mcts.root_stats().visit_count, 0);
    }

    #[test]
    fn test_time_budget_runs_at_least_once() {
        let mut mcts = countdown_mcts(5, 3);
        let report = mcts.run(SearchBudget::TimeLimit { millis: 0 }).unwrap();
        assert!(report.iterations >= 1);
        assert_eq!(report.root_visits, report.iterations);
    }

    #[test]
    fn test_max_tree_depth_limits_growth() {
        let config = MctsConfig {
            max_tree_depth: Some(1),
            expansion_order: ExpansionOrder::First,
            ..MctsConfig::with_iterations(50)
        };
        let mut mcts = Mcts::new(Countdown::new(6), config, ChaCha8Rng::seed_from_u64(9)).unwrap();
        mcts.search().unwrap();

        // Root plus its two children, nothing deeper.
        assert_eq!(mcts.tree().len(), 3);
        assert_eq!(mcts.root_stats().visit_count, 50);
    }

    #[test]
    fn test_search_for_actions_plans_ahead() {
        let mut mcts = countdown_mcts(6, 5);
        let plan = mcts
            .search_for_actions(SearchBudget::Iterations(500), 3)
            .unwrap();
        assert!(!plan.is_empty() && plan.len() <= 3);
        assert_eq!(plan[0], 1);

        // The plan is a legal action sequence from the root.
        let mut state = mcts.root_state().clone();
        for action in &plan {
            assert!(state.possible_actions().contains(action));
            state = state.execute_action(action);
        }
    }

    #[test]
    fn test_update_root_keeps_explored_subtree() {
        let mut mcts = countdown_mcts(6, 11);
        mcts.search().unwrap();
        let child = mcts.tree().root().child(&1).unwrap();
        let child_visits = mcts.tree().get(child).stats.visit_count;

        mcts.update_root(&1).unwrap();

        assert_eq!(mcts.root_state(), &Countdown::new(6).execute_action(&1));
        assert_eq!(mcts.root_stats().visit_count, child_visits);
        assert_eq!(mcts.tree().root().parent, None);
    }

    #[test]
    fn test_update_root_unexplored_action() {
        let mut mcts = countdown_mcts(6, 11);
        mcts.update_root(&2).unwrap();

        assert_eq!(mcts.root_state(), &Countdown::new(6).execute_action(&2));
        assert_eq!(mcts.root_stats().visit_count, 0);
        assert_eq!(mcts.tree().len(), 1);
    }

    #[test]
    fn test_update_root_rejects_illegal_action() {
        let mut mcts = countdown_mcts(1, 11);
        mcts.search().unwrap();
        let before = mcts.tree().len();

        let err = mcts.update_root(&2).unwrap_err();
        assert_eq!(err, SearchError::InvalidAction("2".to_string()));
        assert_eq!(mcts.tree().len(), before);
        assert_eq!(mcts.root_state(), &Countdown::new(1));
    }

    #[test]
    fn test_custom_simulation_policy() {
        // Score a state by its remaining count: stepping by 2 now looks better.
        let simulation = |state: &Countdown, _: &mut dyn RngCore| -f64::from(state.remaining());
        let config = MctsConfig {
            max_tree_depth: Some(1),
            ..MctsConfig::default()
        };
        let mut mcts = Mcts::new(Countdown::new(6), config, ChaCha8Rng::seed_from_u64(2))
            .unwrap()
            .with_simulation(simulation);
        let report = mcts.run(SearchBudget::Iterations(100)).unwrap();
        assert_eq!(report.best_action, 2);
    }
}
