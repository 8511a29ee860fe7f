//! Command-line driver for the search engine.
//!
//! Plays the bundled domains with MCTS: tic-tac-toe against a random
//! opponent, MCTS against itself at gomoku, and the multi-agent maze on a
//! random environment. Results are summarized on stdout and optionally
//! written as JSON records.

mod gomoku;
mod maze;
mod tictactoe;

use anyhow::{Context, Result};
use arbor_mcts::{MctsConfig, SearchBudget};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Monte Carlo Tree Search on small decision processes.
#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Run Monte Carlo Tree Search on the bundled domains")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play tic-tac-toe against a uniform random opponent.
    Tictactoe {
        /// Number of games to play (MCTS alternates between X and O).
        #[arg(short, long, default_value = "20")]
        games: usize,

        /// MCTS iterations per move (overrides the config budget).
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// JSON file with MCTS configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write game records to this JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Play gomoku (9x9, four in a row), MCTS against MCTS.
    Gomoku {
        /// MCTS iterations per move (overrides the config budget).
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Consider every empty cell, not only cells next to a stone.
        #[arg(long)]
        full_board: bool,

        /// JSON file with MCTS configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the game record to this JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Collect rewards in a random maze with several agents.
    Maze {
        /// MCTS iterations per plan (overrides the config budget).
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Time steps each agent may move.
        #[arg(short, long, default_value = "15")]
        time: u32,

        /// Number of agents.
        #[arg(short, long, default_value = "3")]
        agents: usize,

        /// Largest grid coordinate (the grid spans 0..=size on both axes).
        #[arg(long, default_value = "10")]
        size: i32,

        /// Probability that a free cell becomes an obstacle.
        #[arg(long, default_value = "0.2")]
        obstacles: f64,

        /// Probability that a free cell becomes a target.
        #[arg(long, default_value = "0.2")]
        targets: f64,

        /// JSON file with MCTS configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the run record to this JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Load the MCTS configuration, then apply the command-line budget.
fn load_config(path: Option<&Path>, iterations: Option<u32>) -> Result<MctsConfig> {
    let mut config = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            serde_json::from_reader(file)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        }
        None => MctsConfig::default(),
    };
    if let Some(n) = iterations {
        config.budget = SearchBudget::Iterations(n);
    }
    config.validate().context("Invalid MCTS configuration")?;
    log::info!("MCTS config: {:?}", config);
    Ok(config)
}

/// Write `value` as pretty-printed JSON.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {:?}", path))?;
    println!("Records saved to: {:?}", path);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Tictactoe {
            games,
            iterations,
            seed,
            config,
            output,
        } => {
            let config = load_config(config.as_deref(), iterations)?;
            tictactoe::run(&config, games, seed, output.as_deref())
        }

        Commands::Gomoku {
            iterations,
            seed,
            full_board,
            config,
            output,
        } => {
            let config = load_config(config.as_deref(), iterations)?;
            gomoku::run(&config, seed, !full_board, output.as_deref())
        }

        Commands::Maze {
            iterations,
            seed,
            time,
            agents,
            size,
            obstacles,
            targets,
            config,
            output,
        } => {
            let config = load_config(config.as_deref(), iterations)?;
            let options = maze::MazeOptions {
                time,
                agents,
                size,
                obstacle_coverage: obstacles,
                target_coverage: targets,
            };
            maze::run(&config, &options, seed, output.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["arbor", "-vv", "tictactoe", "--games", "4", "-i", "50"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Tictactoe { games, iterations, seed, .. } => {
                assert_eq!(games, 4);
                assert_eq!(iterations, Some(50));
                assert_eq!(seed, 42);
            }
            _ => panic!("expected tictactoe"),
        }

        let cli = Cli::parse_from(["arbor", "gomoku", "--full-board", "--seed", "5"]);
        assert!(matches!(
            cli.command,
            Commands::Gomoku { full_board: true, seed: 5, iterations: None, .. }
        ));

        let cli = Cli::parse_from(["arbor", "maze", "--agents", "2", "--time", "5"]);
        assert!(matches!(cli.command, Commands::Maze { agents: 2, time: 5, .. }));
    }

    #[test]
    fn test_load_config_applies_iterations() {
        let config = load_config(None, Some(25)).unwrap();
        assert_eq!(config.budget, SearchBudget::Iterations(25));

        let config = load_config(None, None).unwrap();
        assert_eq!(config, MctsConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("arbor-config-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"exploration_constant": 0.5, "max_rollout_steps": 30}}"#).unwrap();
        drop(file);

        let config = load_config(Some(&path), None).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.exploration_constant, 0.5);
        assert_eq!(config.max_rollout_steps, Some(30));
        assert_eq!(config.budget, SearchBudget::default());
    }

    #[test]
    fn test_load_config_rejects_zero_iterations() {
        assert!(load_config(None, Some(0)).is_err());
    }
}
