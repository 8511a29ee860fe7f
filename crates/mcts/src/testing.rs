//! Small domains shared by the unit tests.

use arbor_core::State;

/// Count down to zero by steps of 1 or 2; every step taken is worth 1.
///
/// Stepping by 1 is always optimal, which makes the best action easy to
/// assert on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: u8,
    steps: u8,
}

impl Countdown {
    pub fn new(remaining: u8) -> Self {
        Self {
            remaining,
            steps: 0,
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }
}

impl State for Countdown {
    type Action = u8;

    fn is_terminal(&self) -> bool {
        self.remaining == 0
    }

    fn possible_actions(&self) -> Vec<u8> {
        [1, 2].into_iter().filter(|&a| a <= self.remaining).collect()
    }

    fn execute_action(&self, action: &u8) -> Self {
        Self {
            remaining: self.remaining - action,
            steps: self.steps + 1,
        }
    }

    fn reward(&self) -> f64 {
        f64::from(self.steps)
    }
}

/// A non-terminal state that claims to have no actions.
#[derive(Clone, Debug)]
pub struct Stuck;

impl State for Stuck {
    type Action = u8;

    fn is_terminal(&self) -> bool {
        false
    }

    fn possible_actions(&self) -> Vec<u8> {
        Vec::new()
    }

    fn execute_action(&self, _action: &u8) -> Self {
        Stuck
    }

    fn reward(&self) -> f64 {
        0.0
    }
}
