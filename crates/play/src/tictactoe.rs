//! MCTS against a uniform random tic-tac-toe opponent.

use anyhow::{Context, Result};
use arbor_core::State;
use arbor_mcts::{
    games::{Player, TicTacToeAction, TicTacToeState},
    Mcts, MctsConfig,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// Result of a game from the searching side's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// One move of a recorded game.
#[derive(Debug, Serialize)]
pub struct MoveRecord {
    pub player: Player,
    pub action: TicTacToeAction,

    /// Root visits behind the choice (MCTS moves only).
    pub root_visits: Option<u32>,

    /// Mean reward of the chosen child (MCTS moves only).
    pub mean_reward: Option<f64>,

    /// Root visit distribution as `{cell: probability}` (MCTS moves only).
    pub visit_policy: Option<BTreeMap<u8, f64>>,
}

/// A complete game.
#[derive(Debug, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub agent: Player,
    pub moves: Vec<MoveRecord>,
    pub outcome: Outcome,
}

/// Play one game with MCTS on side `agent`.
pub fn play_game(config: &MctsConfig, seed: u64, agent: Player) -> Result<GameRecord> {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut opponent_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut mcts = Mcts::new(TicTacToeState::new(agent), config.clone(), rng)?;
    let mut moves = Vec::new();

    while !mcts.root_state().is_terminal() {
        let player = mcts.root_state().current_player();
        let record = if player == agent {
            let report = mcts.search()?;
            let mean_reward = report
                .stats_for(&report.best_action)
                .map(|stats| stats.mean_reward);
            let visit_policy = report
                .visit_policy()?
                .iter()
                .map(|(action, p)| (action.0, *p))
                .collect();
            MoveRecord {
                player,
                action: report.best_action,
                root_visits: Some(report.root_visits),
                mean_reward,
                visit_policy: Some(visit_policy),
            }
        } else {
            let actions = mcts.root_state().possible_actions();
            let action = *actions
                .choose(&mut opponent_rng)
                .context("Non-terminal board has no empty cell")?;
            MoveRecord {
                player,
                action,
                root_visits: None,
                mean_reward: None,
                visit_policy: None,
            }
        };

        mcts.update_root(&record.action)?;
        log::debug!("{} plays {}", record.player, record.action);
        moves.push(record);
    }

    let reward = mcts.root_state().reward();
    let outcome = if reward > 0.0 {
        Outcome::Win
    } else if reward < 0.0 {
        Outcome::Loss
    } else {
        Outcome::Draw
    };
    log::info!(
        "game seed {} ({} moves): MCTS as {} -> {:?}\n{}",
        seed,
        moves.len(),
        agent,
        outcome,
        mcts.root_state()
    );

    Ok(GameRecord {
        seed,
        agent,
        moves,
        outcome,
    })
}

/// Play `games` games in parallel, alternating the searching side.
pub fn play_games(config: &MctsConfig, games: usize, seed: u64) -> Result<Vec<GameRecord>> {
    (0..games)
        .into_par_iter()
        .map(|i| {
            let agent = if i % 2 == 0 { Player::X } else { Player::O };
            play_game(config, seed.wrapping_add(i as u64 * 1000), agent)
        })
        .collect()
}

/// Run the tictactoe command.
pub fn run(config: &MctsConfig, games: usize, seed: u64, output: Option<&Path>) -> Result<()> {
    println!("Playing {} games of MCTS vs random ({:?} per move)", games, config.budget);
    println!("Seed: {}", seed);

    let start = Instant::now();
    let records = play_games(config, games, seed)?;
    let elapsed = start.elapsed();

    let count = |outcome: Outcome| records.iter().filter(|r| r.outcome == outcome).count();
    let (wins, draws, losses) = (count(Outcome::Win), count(Outcome::Draw), count(Outcome::Loss));
    let percent = |n: usize| n as f64 / games.max(1) as f64 * 100.0;

    println!("\nCompleted in {:.2}s", elapsed.as_secs_f64());
    println!("MCTS wins:   {} ({:.1}%)", wins, percent(wins));
    println!("Draws:       {} ({:.1}%)", draws, percent(draws));
    println!("MCTS losses: {} ({:.1}%)", losses, percent(losses));

    if let Some(path) = output {
        crate::write_json(path, &records)?;
    }
    Ok(())
}
