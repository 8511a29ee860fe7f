//! End-to-end searches on small domains with known answers.

use arbor_core::{SearchError, State};
use arbor_mcts::{
    games::{
        GomokuAction, GomokuState, MazeAction, MazeEnvironment, MazeState, Player, Stone,
        TicTacToeAction, TicTacToeState,
    },
    Mcts, MctsConfig, SearchBudget,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// One decision, then done: `good` pays 1, `bad` pays 0.
#[derive(Clone, Debug, PartialEq)]
enum Fork {
    Start,
    Done(f64),
}

impl State for Fork {
    type Action = &'static str;

    fn is_terminal(&self) -> bool {
        matches!(self, Fork::Done(_))
    }

    fn possible_actions(&self) -> Vec<&'static str> {
        match self {
            Fork::Start => vec!["bad", "good"],
            Fork::Done(_) => Vec::new(),
        }
    }

    fn execute_action(&self, action: &&'static str) -> Self {
        Fork::Done(if *action == "good" { 1.0 } else { 0.0 })
    }

    fn reward(&self) -> f64 {
        match self {
            Fork::Start => 0.0,
            Fork::Done(r) => *r,
        }
    }
}

/// `safe` pays 0.5 at once; `risky` leads to a coin the searcher picks:
/// `win` pays 1, `lose` pays 0.
#[derive(Clone, Debug, PartialEq)]
enum Ladder {
    Start,
    Middle,
    Done(f64),
}

impl State for Ladder {
    type Action = &'static str;

    fn is_terminal(&self) -> bool {
        matches!(self, Ladder::Done(_))
    }

    fn possible_actions(&self) -> Vec<&'static str> {
        match self {
            Ladder::Start => vec!["safe", "risky"],
            Ladder::Middle => vec!["lose", "win"],
            Ladder::Done(_) => Vec::new(),
        }
    }

    fn execute_action(&self, action: &&'static str) -> Self {
        match *action {
            "safe" => Ladder::Done(0.5),
            "risky" => Ladder::Middle,
            "win" => Ladder::Done(1.0),
            _ => Ladder::Done(0.0),
        }
    }

    fn reward(&self) -> f64 {
        match self {
            Ladder::Done(r) => *r,
            _ => 0.0,
        }
    }
}

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[test]
fn test_picks_the_better_of_two_actions() {
    let mut mcts = Mcts::new(Fork::Start, MctsConfig::default(), rng(0)).unwrap();
    let report = mcts.run(SearchBudget::Iterations(10)).unwrap();

    assert_eq!(report.best_action, "good");
    assert_eq!(report.iterations, 10);
    assert_eq!(report.root_visits, 10);

    let good = report.stats_for(&"good").unwrap();
    let bad = report.stats_for(&"bad").unwrap();
    assert_eq!(good.mean_reward, 1.0);
    assert_eq!(bad.mean_reward, 0.0);
    assert!(good.visit_count > bad.visit_count);
    assert_eq!(good.visit_count + bad.visit_count, 10);
}

#[test]
fn test_terminal_root_has_no_actions() {
    let mut mcts = Mcts::new(Fork::Done(1.0), MctsConfig::default(), rng(0)).unwrap();

    assert_eq!(
        mcts.search_for_action(SearchBudget::Iterations(10)),
        Err(SearchError::NoActionsAvailable)
    );
    assert_eq!(mcts.root_stats().visit_count, 0);
    assert_eq!(mcts.tree().len(), 1);
}

#[test]
fn test_invalid_update_root_leaves_tree_untouched() {
    let mut mcts = Mcts::new(Fork::Start, MctsConfig::default(), rng(0)).unwrap();
    mcts.run(SearchBudget::Iterations(10)).unwrap();

    let visits = mcts.root_stats().visit_count;
    let children = mcts.tree().root().children.clone();
    let len = mcts.tree().len();

    let result = mcts.update_root(&"missing");

    assert_eq!(
        result,
        Err(SearchError::InvalidAction("\"missing\"".to_string()))
    );
    assert_eq!(mcts.root_state(), &Fork::Start);
    assert_eq!(mcts.root_stats().visit_count, visits);
    assert_eq!(mcts.tree().root().children, children);
    assert_eq!(mcts.tree().len(), len);
}

#[test]
fn test_mean_reward_converges_to_best_outcome() {
    let mut mcts = Mcts::new(Ladder::Start, MctsConfig::default(), rng(7)).unwrap();
    let report = mcts.run(SearchBudget::Iterations(2000)).unwrap();

    assert_eq!(report.best_action, "risky");
    let risky = report.stats_for(&"risky").unwrap();
    assert!(
        risky.mean_reward > 0.8,
        "risky mean {} should approach 1.0",
        risky.mean_reward
    );
    assert!(risky.visit_count > report.stats_for(&"safe").unwrap().visit_count);

    // The plan continues along the best branch
    let plan = mcts
        .search_for_actions(SearchBudget::Iterations(100), 2)
        .unwrap();
    assert_eq!(plan, vec!["risky", "win"]);
}

#[test]
fn test_time_budget_runs_at_least_once() {
    let mut mcts = Mcts::new(Ladder::Start, MctsConfig::default(), rng(0)).unwrap();
    let report = mcts.run(SearchBudget::TimeLimit { millis: 0 }).unwrap();

    assert!(report.iterations >= 1);
    assert_eq!(report.root_visits, report.iterations);
}

#[test]
fn test_tictactoe_takes_immediate_win() {
    // X _ X
    // O O _
    // _ _ _
    let state = [0, 3, 2, 4]
        .into_iter()
        .fold(TicTacToeState::new(Player::X), |s, cell| {
            s.execute_action(&TicTacToeAction(cell))
        });

    let mut mcts = Mcts::new(state, MctsConfig::with_iterations(1000), rng(42)).unwrap();
    let report = mcts.search().unwrap();

    assert_eq!(
        report.best_action,
        TicTacToeAction(1),
        "should complete the top row"
    );
    assert_eq!(report.stats_for(&TicTacToeAction(1)).unwrap().mean_reward, 1.0);
}

#[test]
fn test_tictactoe_tree_follows_the_game() {
    let mut mcts = Mcts::new(
        TicTacToeState::new(Player::O),
        MctsConfig::with_iterations(200),
        rng(3),
    )
    .unwrap();

    let mut moves = 0;
    while !mcts.root_state().is_terminal() {
        let action = mcts.search().unwrap().best_action;
        mcts.update_root(&action).unwrap();
        moves += 1;
    }

    assert!((5..=9).contains(&moves));
    assert_eq!(mcts.root_state().agent(), Player::O);
}

#[test]
fn test_gomoku_completes_an_open_three() {
    // Black holds (4, 2)..(4, 4) with both ends open
    let state = GomokuState::from_moves(
        Stone::Black,
        &[(4, 2), (0, 0), (4, 3), (0, 8), (4, 4), (8, 0)],
    )
    .unwrap()
    .with_neighbourhood_only(true);

    let mut mcts = Mcts::new(state, MctsConfig::with_iterations(2000), rng(11)).unwrap();
    let report = mcts.search().unwrap();

    let wins = [GomokuAction::new(4, 1), GomokuAction::new(4, 5)];
    assert!(
        wins.contains(&report.best_action),
        "should extend the three to four, got {}",
        report.best_action
    );
    assert_eq!(report.stats_for(&report.best_action).unwrap().mean_reward, 1.0);
}

/// A one-row corridor: a 5 on the left, a 1 on the right.
fn corridor() -> Arc<MazeEnvironment> {
    let mut env = MazeEnvironment::new((0, 6), (0, 2), true);
    env.add_target((1, 1), 5.0).add_target((5, 1), 1.0);
    Arc::new(env)
}

#[test]
fn test_maze_heads_for_the_larger_target() {
    let state = MazeState::new(corridor(), 2).with_agent((3, 1)).unwrap();
    let mut mcts = Mcts::new(state, MctsConfig::with_iterations(500), rng(11)).unwrap();

    let plan = mcts
        .search_for_actions(SearchBudget::Iterations(500), 2)
        .unwrap();

    assert_eq!(
        plan,
        vec![
            MazeAction { agent: 0, position: (2, 1) },
            MazeAction { agent: 0, position: (1, 1) },
        ]
    );
}

#[test]
fn test_maze_agents_plan_and_act_in_turn() {
    let mut env = MazeEnvironment::new((0, 5), (0, 5), true);
    env.add_target((1, 1), 2.0)
        .add_target((4, 4), 3.0)
        .add_obstacle((2, 3));
    let state = MazeState::new(Arc::new(env), 4)
        .with_agent((2, 2))
        .unwrap()
        .with_agent((3, 3))
        .unwrap();
    let mut mcts = Mcts::new(state, MctsConfig::with_iterations(300), rng(5)).unwrap();

    while !mcts.root_state().is_terminal() {
        let plan = mcts
            .search_for_actions(SearchBudget::Iterations(300), 2)
            .unwrap();
        assert!(!plan.is_empty());
        for action in &plan {
            assert_eq!(action.agent, mcts.root_state().turn());
            mcts.update_root(action).unwrap();
        }
    }

    let end = mcts.root_state();
    assert_eq!(end.time_remains(), 0);
    assert!(end.paths().iter().all(|path| path.len() == 5));
    assert!(end.reward() >= 3.0, "collected only {}", end.reward());
}
