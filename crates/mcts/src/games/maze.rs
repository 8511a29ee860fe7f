//! Grid-world reward collection.
//!
//! Agents walk a bounded grid with obstacles, taking turns one step at a
//! time. Every target cell visited by any agent counts once towards the
//! reward. The game ends when the clock runs out, where one tick passes
//! after every agent has moved.

use arbor_core::{Result, SearchError, State};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Grid cell as `(x, y)`.
pub type Position = (i32, i32);

/// Move `agent` to `position`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub struct MazeAction {
    pub agent: usize,
    pub position: Position,
}

impl fmt::Display for MazeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "agent {} moves to ({}, {})",
            self.agent, self.position.0, self.position.1
        )
    }
}

/// The static part of a maze: bounds, obstacles and target rewards.
///
/// A cell is never both an obstacle and a target.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeEnvironment {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
    obstacles: BTreeSet<Position>,
    targets: BTreeMap<Position, f64>,
}

impl MazeEnvironment {
    /// Create an empty environment over the inclusive bounds `x` and `y`,
    /// optionally walling off the border cells.
    pub fn new(x: (i32, i32), y: (i32, i32), border_walls: bool) -> Self {
        let mut env = Self {
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            obstacles: BTreeSet::new(),
            targets: BTreeMap::new(),
        };
        if border_walls {
            for j in y.0..=y.1 {
                env.add_obstacle((x.0, j)).add_obstacle((x.1, j));
            }
            for i in x.0..=x.1 {
                env.add_obstacle((i, y.0)).add_obstacle((i, y.1));
            }
        }
        env
    }

    /// Fill a fresh environment at random.
    ///
    /// Each free cell becomes an obstacle with probability
    /// `obstacle_coverage`, otherwise a target with probability
    /// `target_coverage`, whose integer reward is drawn from `reward_range`
    /// (half-open).
    ///
    /// # Errors
    /// Returns `InvalidConfig` if a coverage is negative, the coverages sum
    /// above 1, or the reward range is empty.
    pub fn random<R: Rng + ?Sized>(
        x: (i32, i32),
        y: (i32, i32),
        obstacle_coverage: f64,
        target_coverage: f64,
        reward_range: (u32, u32),
        rng: &mut R,
    ) -> Result<Self> {
        if !(obstacle_coverage >= 0.0
            && target_coverage >= 0.0
            && obstacle_coverage + target_coverage <= 1.0)
        {
            return Err(SearchError::InvalidConfig(format!(
                "invalid coverage: obstacles {}, targets {}",
                obstacle_coverage, target_coverage
            )));
        }
        if reward_range.0 >= reward_range.1 {
            return Err(SearchError::InvalidConfig(format!(
                "empty reward range {:?}",
                reward_range
            )));
        }

        let mut env = Self::new(x, y, true);
        for i in env.x_min..=env.x_max {
            for j in env.y_min..=env.y_max {
                if env.obstacles.contains(&(i, j)) {
                    continue;
                }
                let r: f64 = rng.gen();
                if r < obstacle_coverage {
                    env.add_obstacle((i, j));
                } else if r < obstacle_coverage + target_coverage {
                    let reward = rng.gen_range(reward_range.0..reward_range.1);
                    env.add_target((i, j), f64::from(reward));
                }
            }
        }
        Ok(env)
    }

    /// Block a cell, unless it holds a target.
    pub fn add_obstacle(&mut self, position: Position) -> &mut Self {
        if !self.targets.contains_key(&position) {
            self.obstacles.insert(position);
        }
        self
    }

    pub fn remove_obstacle(&mut self, position: Position) -> &mut Self {
        self.obstacles.remove(&position);
        self
    }

    /// Place a reward on a cell, unless it is blocked.
    pub fn add_target(&mut self, position: Position, reward: f64) -> &mut Self {
        if !self.obstacles.contains(&position) {
            self.targets.insert(position, reward);
        }
        self
    }

    pub fn remove_target(&mut self, position: Position) -> &mut Self {
        self.targets.remove(&position);
        self
    }

    pub fn in_range(&self, position: Position) -> bool {
        (self.x_min..=self.x_max).contains(&position.0)
            && (self.y_min..=self.y_max).contains(&position.1)
    }

    /// Whether an agent may stand on `position`.
    pub fn is_open(&self, position: Position) -> bool {
        self.in_range(position) && !self.obstacles.contains(&position)
    }

    /// Every in-range cell that is not an obstacle, row by row.
    pub fn open_cells(&self) -> Vec<Position> {
        (self.y_min..=self.y_max)
            .flat_map(|j| (self.x_min..=self.x_max).map(move |i| (i, j)))
            .filter(|p| !self.obstacles.contains(p))
            .collect()
    }

    pub fn is_obstacle(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }

    /// Reward of the target at `position`, if any.
    pub fn target(&self, position: Position) -> Option<f64> {
        self.targets.get(&position).copied()
    }

    pub fn targets(&self) -> impl Iterator<Item = (Position, f64)> + '_ {
        self.targets.iter().map(|(p, r)| (*p, *r))
    }

    /// Largest single target reward (0.0 without targets).
    pub fn max_reward(&self) -> f64 {
        self.targets.values().copied().fold(0.0, f64::max)
    }

    /// Sum of every target reward.
    pub fn total_reward(&self) -> f64 {
        self.targets.values().sum()
    }
}

/// A maze in progress: the path walked by each agent so far.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeState {
    environment: Arc<MazeEnvironment>,
    paths: Vec<Vec<Position>>,
    time_remains: u32,
    /// Index of the agent moving next.
    turn: usize,
}

impl MazeState {
    pub fn new(environment: Arc<MazeEnvironment>, time_remains: u32) -> Self {
        Self {
            environment,
            paths: Vec::new(),
            time_remains,
            turn: 0,
        }
    }

    /// Place another agent at `start`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `start` is out of range or blocked.
    pub fn with_agent(mut self, start: Position) -> Result<Self> {
        if !self.environment.is_open(start) {
            return Err(SearchError::InvalidConfig(format!(
                "agent start {:?} is out of range or blocked",
                start
            )));
        }
        self.paths.push(vec![start]);
        Ok(self)
    }

    pub fn environment(&self) -> &MazeEnvironment {
        &self.environment
    }

    pub fn paths(&self) -> &[Vec<Position>] {
        &self.paths
    }

    pub fn time_remains(&self) -> u32 {
        self.time_remains
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Every cell any agent has stood on.
    pub fn visited(&self) -> BTreeSet<Position> {
        self.paths.iter().flatten().copied().collect()
    }

    fn moves(&self) -> Vec<MazeAction> {
        let Some(&(i, j)) = self.paths.get(self.turn).and_then(|path| path.last()) else {
            return Vec::new();
        };
        [(i + 1, j), (i - 1, j), (i, j + 1), (i, j - 1)]
            .into_iter()
            .filter(|p| self.environment.is_open(*p))
            .map(|position| MazeAction {
                agent: self.turn,
                position,
            })
            .collect()
    }
}

impl State for MazeState {
    type Action = MazeAction;

    /// Out of time, or the agent to move has nowhere to go.
    fn is_terminal(&self) -> bool {
        self.time_remains == 0 || self.moves().is_empty()
    }

    fn possible_actions(&self) -> Vec<MazeAction> {
        if self.time_remains == 0 {
            return Vec::new();
        }
        self.moves()
    }

    fn execute_action(&self, action: &MazeAction) -> Self {
        let mut next = self.clone();
        if let Some(path) = next.paths.get_mut(action.agent) {
            path.push(action.position);
        }
        next.turn = (next.turn + 1) % next.paths.len().max(1);
        if next.turn == 0 {
            next.time_remains = next.time_remains.saturating_sub(1);
        }
        next
    }

    /// Sum of the rewards of every visited target.
    fn reward(&self) -> f64 {
        self.visited()
            .into_iter()
            .filter_map(|p| self.environment.target(p))
            .sum()
    }
}

impl fmt::Display for MazeState {
    /// `#` obstacle, `A`-`Z` agent, `*` unvisited target, `.` visited cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = &self.environment;
        let visited = self.visited();
        for j in (env.y_min..=env.y_max).rev() {
            for i in env.x_min..=env.x_max {
                let p = (i, j);
                let agent = self.paths.iter().position(|path| path.last() == Some(&p));
                let c = match agent {
                    Some(index) => char::from(b'A' + (index % 26) as u8),
                    None if env.is_obstacle(p) => '#',
                    None if visited.contains(&p) => '.',
                    None if env.target(p).is_some() => '*',
                    None => ' ',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
