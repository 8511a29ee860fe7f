//! Multi-agent reward collection in a random maze.

use anyhow::{bail, Result};
use arbor_core::State;
use arbor_mcts::{
    games::{MazeAction, MazeEnvironment, MazeState, Position},
    Mcts, MctsConfig,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Shape of the generated maze and its agents.
#[derive(Clone, Debug)]
pub struct MazeOptions {
    pub time: u32,
    pub agents: usize,
    pub size: i32,
    pub obstacle_coverage: f64,
    pub target_coverage: f64,
}

/// Rewards on target cells are drawn from `1..3`.
const REWARD_RANGE: (u32, u32) = (1, 3);

/// Outcome of one maze run.
#[derive(Debug, Serialize)]
pub struct MazeRecord {
    pub seed: u64,
    pub reward: f64,
    pub available_reward: f64,
    pub targets: Vec<(Position, f64)>,
    pub paths: Vec<Vec<Position>>,
    pub actions: Vec<MazeAction>,
}

/// Build a random environment and place the agents on distinct open cells.
pub fn initial_state(options: &MazeOptions, rng: &mut ChaCha8Rng) -> Result<MazeState> {
    let env = MazeEnvironment::random(
        (0, options.size),
        (0, options.size),
        options.obstacle_coverage,
        options.target_coverage,
        REWARD_RANGE,
        rng,
    )?;

    let open: Vec<Position> = env
        .open_cells()
        .into_iter()
        .filter(|p| env.target(*p).is_none())
        .collect();
    if open.len() < options.agents {
        bail!(
            "Maze has {} free cells for {} agents",
            open.len(),
            options.agents
        );
    }
    let starts: Vec<Position> = open
        .choose_multiple(rng, options.agents)
        .copied()
        .collect();

    let mut state = MazeState::new(Arc::new(env), options.time);
    for start in starts {
        state = state.with_agent(start)?;
    }
    Ok(state)
}

/// Plan one step for every agent, act, re-root, repeat until time runs out.
pub fn simulate(config: &MctsConfig, state: MazeState, seed: u64) -> Result<MazeRecord> {
    let agents = state.paths().len();
    let rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut mcts = Mcts::new(state, config.clone(), rng)?;
    let mut actions = Vec::new();
    let mut step = 0;

    while !mcts.root_state().is_terminal() {
        step += 1;
        let plan = mcts.search_for_actions(config.budget, agents)?;
        log::info!("time step {}: {} planned actions", step, plan.len());
        for action in plan {
            log::debug!("{}", action);
            mcts.update_root(&action)?;
            actions.push(action);
            if mcts.root_state().is_terminal() {
                break;
            }
        }
    }

    let end = mcts.root_state();
    log::info!("final maze:\n{}", end);
    Ok(MazeRecord {
        seed,
        reward: end.reward(),
        available_reward: end.environment().total_reward(),
        targets: end.environment().targets().collect(),
        paths: end.paths().to_vec(),
        actions,
    })
}

/// Run the maze command.
pub fn run(
    config: &MctsConfig,
    options: &MazeOptions,
    seed: u64,
    output: Option<&Path>,
) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let state = initial_state(options, &mut rng)?;

    println!(
        "Maze {0}x{0}, {1} agents, {2} time steps ({3:?} per plan)",
        options.size + 1,
        options.agents,
        options.time,
        config.budget
    );
    println!("{}", state);

    let start = Instant::now();
    let record = simulate(config, state, seed)?;
    let elapsed = start.elapsed();

    println!("Completed in {:.2}s", elapsed.as_secs_f64());
    println!(
        "Collected reward: {} of {} available",
        record.reward, record.available_reward
    );
    for (i, path) in record.paths.iter().enumerate() {
        println!("Agent {}: {:?}", i, path);
    }

    if let Some(path) = output {
        crate::write_json(path, &record)?;
    }
    Ok(())
}
