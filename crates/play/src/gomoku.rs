//! MCTS against MCTS on a gomoku board.
//!
//! Each side keeps its own tree scored for its own colour. Both trees
//! follow every move, so each side reuses what it learned about the reply.

use anyhow::Result;
use arbor_core::State;
use arbor_mcts::{
    games::{GomokuAction, GomokuState, Stone},
    Mcts, MctsConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// One move of a recorded game.
#[derive(Debug, Serialize)]
pub struct GomokuMove {
    pub stone: Stone,
    pub action: GomokuAction,
    pub root_visits: u32,
    pub mean_reward: Option<f64>,
}

/// A complete game.
#[derive(Debug, Serialize)]
pub struct GomokuRecord {
    pub seed: u64,
    pub neighbourhood_only: bool,
    pub moves: Vec<GomokuMove>,
    pub winner: Option<Stone>,
}

/// Play one game, Black and White each searching with `config`.
pub fn play_game(
    config: &MctsConfig,
    seed: u64,
    neighbourhood_only: bool,
) -> Result<GomokuRecord> {
    let side = |stone: Stone, seed: u64| {
        let state = GomokuState::new(stone).with_neighbourhood_only(neighbourhood_only);
        Mcts::new(state, config.clone(), ChaCha8Rng::seed_from_u64(seed))
    };
    let mut black = side(Stone::Black, seed)?;
    let mut white = side(Stone::White, seed.wrapping_add(1))?;
    let mut moves = Vec::new();

    while !black.root_state().is_terminal() {
        let stone = black.root_state().current_player();
        let mover = match stone {
            Stone::Black => &mut black,
            Stone::White => &mut white,
        };
        let report = mover.search()?;
        let action = report.best_action;
        log::debug!("{} plays {} after {} visits", stone, action, report.root_visits);

        black.update_root(&action)?;
        white.update_root(&action)?;
        moves.push(GomokuMove {
            stone,
            action,
            root_visits: report.root_visits,
            mean_reward: report.stats_for(&action).map(|stats| stats.mean_reward),
        });
    }

    let end = black.root_state();
    log::info!("game seed {} ({} moves):\n{}", seed, moves.len(), end);
    Ok(GomokuRecord {
        seed,
        neighbourhood_only,
        moves,
        winner: end.winner(),
    })
}

/// Run the gomoku command.
pub fn run(
    config: &MctsConfig,
    seed: u64,
    neighbourhood_only: bool,
    output: Option<&Path>,
) -> Result<()> {
    println!("Playing gomoku, MCTS vs MCTS ({:?} per move)", config.budget);
    println!("Seed: {}", seed);

    let start = Instant::now();
    let record = play_game(config, seed, neighbourhood_only)?;
    let elapsed = start.elapsed();

    println!("\nCompleted in {:.2}s, {} moves", elapsed.as_secs_f64(), record.moves.len());
    match record.winner {
        Some(stone) => println!("Winner: {}", stone),
        None => println!("Draw"),
    }

    if let Some(path) = output {
        crate::write_json(path, &record)?;
    }
    Ok(())
}
