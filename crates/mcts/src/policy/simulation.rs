//! Default policy: estimate a node's value by playing it out.
//!
//! The `SimulationPolicy` trait is the seam for swapping rollout strategies
//! (a heuristic playout, a learned value function) without touching the
//! rest of the engine. Any `Fn(&S, &mut dyn RngCore) -> f64` closure is a
//! simulation policy too.

use arbor_core::{Result, SearchError, State};
use rand::{Rng, RngCore};

/// Produces a reward estimate for a state.
pub trait SimulationPolicy<S: State> {
    /// Estimate the reward reachable from `state`.
    ///
    /// States visited while estimating never become tree nodes.
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<f64>;
}

impl<S, F> SimulationPolicy<S> for F
where
    S: State,
    F: Fn(&S, &mut dyn RngCore) -> f64,
{
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<f64> {
        Ok(self(state, rng))
    }
}

/// Uniformly random playout to a terminal state.
///
/// An optional step cap guards against domains that never terminate; when
/// it is hit the reward of the state reached so far is returned.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout {
    /// Maximum number of actions played in one rollout.
    pub max_steps: Option<usize>,
}

impl RandomRollout {
    /// Create a new rollout policy.
    ///
    /// # Arguments
    /// * `max_steps` - Maximum moves in a random playout, `None` for no cap
    pub fn new(max_steps: Option<usize>) -> Self {
        Self { max_steps }
    }
}

impl<S: State> SimulationPolicy<S> for RandomRollout {
    fn simulate(&self, initial_state: &S, rng: &mut dyn RngCore) -> Result<f64> {
        if initial_state.is_terminal() {
            return Ok(initial_state.reward());
        }

        let mut state = initial_state.clone();
        let mut steps = 0;

        while !state.is_terminal() {
            if self.max_steps.is_some_and(|max| steps >= max) {
                log::trace!("rollout cut off after {} steps", steps);
                break;
            }

            let actions = state.possible_actions();
            if actions.is_empty() {
                return Err(SearchError::PolicyContractViolation(format!(
                    "non-terminal state has no possible actions after {} rollout steps",
                    steps
                )));
            }

            // Random move
            let idx = rng.gen_range(0..actions.len());
            state = state.execute_action(&actions[idx]);
            steps += 1;
        }

        Ok(state.reward())
    }
}
