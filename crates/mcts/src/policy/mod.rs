//! The four phases of an MCTS iteration.
//!
//! Each phase is a trait with a default implementation, so a single phase
//! can be replaced without touching the others.

mod backprop;
mod expansion;
mod selection;
mod simulation;

pub use backprop::{AccumulateReward, BackpropagationPolicy};
pub use expansion::{ExpansionPolicy, UntriedExpansion};
pub use selection::{SelectionPolicy, Ucb1};
pub use simulation::{RandomRollout, SimulationPolicy};
