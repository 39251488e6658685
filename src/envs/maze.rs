//! Discrete grid maze.

use std::{collections::HashSet, fmt, str::FromStr};

use crate::{
    Result,
    error::Error,
    features::{Actions, AgentInitInfo, FeatureVector, FeatureVectorInfo, Observations, Reward},
    ports::{AgentId, Environment},
};

pub const MOVE_REWARD: f64 = -1.0;
pub const GOAL_REWARD: f64 = 100.0;
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Row/column offsets for the four moves; action `4` stays in place.
const MOVES: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const NULL_MOVE: usize = 4;

const DEFAULT_LAYOUT: &str = "\
S.#..
..#.#
.....
.##..
...#G";

/// A rectangular maze of free and blocked cells.
///
/// Sensors (all discrete): row, column, and four obstacle flags for the
/// `+r`, `-r`, `+c`, `-c` directions. Actions: one discrete value, `0..=3`
/// for those directions and `4` for standing still. Every move costs `-1`
/// (including bumping into walls), reaching the goal pays `+100`, and an
/// episode cut off by the step limit ends with a reward proportional to
/// how far the agent got, `100 * (r + c) / (rows + cols)`.
///
/// Layouts are parsed from text: `.` free, `#` blocked, `S` start, `G` goal.
#[derive(Debug, Clone)]
pub struct GridMaze {
    info: AgentInitInfo,
    rows: usize,
    cols: usize,
    blocked: HashSet<(usize, usize)>,
    start: (usize, usize),
    goal: (usize, usize),
    max_steps: usize,
    position: (usize, usize),
    steps: usize,
    reached_goal: bool,
}

impl GridMaze {
    /// The built-in 5x5 maze.
    pub fn standard() -> Result<Self> {
        DEFAULT_LAYOUT.parse()
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn position(&self) -> (usize, usize) {
        self.position
    }

    pub fn reached_goal(&self) -> bool {
        self.reached_goal
    }

    pub fn is_free(&self, r: i64, c: i64) -> bool {
        r >= 0
            && c >= 0
            && (r as usize) < self.rows
            && (c as usize) < self.cols
            && !self.blocked.contains(&(r as usize, c as usize))
    }

    fn obstacle_flags(&self) -> [f64; 4] {
        let (r, c) = (self.position.0 as i64, self.position.1 as i64);
        MOVES.map(|(dr, dc)| if self.is_free(r + dr, c + dc) { 0.0 } else { 1.0 })
    }

    fn timeout_reward(&self) -> f64 {
        let (r, c) = self.position;
        GOAL_REWARD * (r + c) as f64 / (self.rows + self.cols) as f64
    }

    fn build_info(rows: usize, cols: usize) -> Result<AgentInitInfo> {
        let mut sensors = FeatureVectorInfo::new();
        sensors.add_discrete(0, rows as i64 - 1)?;
        sensors.add_discrete(0, cols as i64 - 1)?;
        for _ in MOVES {
            sensors.add_discrete(0, 1)?;
        }
        let mut actions = FeatureVectorInfo::new();
        actions.add_discrete(0, NULL_MOVE as i64)?;
        let mut reward = FeatureVectorInfo::new();
        reward.add_continuous(-GOAL_REWARD, GOAL_REWARD)?;
        Ok(AgentInitInfo::new(sensors, actions, reward))
    }
}

impl FromStr for GridMaze {
    type Err = Error;

    fn from_str(layout: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidConfiguration { message };
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if rows < 2 || cols < 2 {
            return Err(invalid(format!("maze must be at least 2x2, got {rows}x{cols}")));
        }

        let mut blocked = HashSet::new();
        let (mut start, mut goal) = (None, None);
        for (r, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(invalid(format!("maze row {r} is not {cols} cells wide")));
            }
            for (c, cell) in line.chars().enumerate() {
                match cell {
                    '.' => {}
                    '#' => {
                        blocked.insert((r, c));
                    }
                    'S' => start = Some((r, c)),
                    'G' => goal = Some((r, c)),
                    other => return Err(invalid(format!("unknown maze cell '{other}'"))),
                }
            }
        }
        let start = start.ok_or_else(|| invalid("maze has no start cell 'S'".into()))?;
        let goal = goal.ok_or_else(|| invalid("maze has no goal cell 'G'".into()))?;

        Ok(Self {
            info: Self::build_info(rows, cols)?,
            rows,
            cols,
            blocked,
            start,
            goal,
            max_steps: DEFAULT_MAX_STEPS,
            position: start,
            steps: 0,
            reached_goal: false,
        })
    }
}

impl fmt::Display for GridMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let cell = if (r, c) == self.position {
                    '@'
                } else if (r, c) == self.goal {
                    'G'
                } else if self.blocked.contains(&(r, c)) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Environment for GridMaze {
    fn agent_info(&self, _agent: AgentId) -> AgentInitInfo {
        self.info.clone()
    }

    fn step(&mut self, _agent: AgentId, action: &Actions) -> Result<Reward> {
        self.steps += 1;

        let choice = action.iter().next().map(|a| a.round());
        if let Some(index) = choice.filter(|a| (0.0..NULL_MOVE as f64).contains(a)) {
            let (dr, dc) = MOVES[index as usize];
            let (r, c) = (self.position.0 as i64 + dr, self.position.1 as i64 + dc);
            if self.is_free(r, c) {
                self.position = (r as usize, c as usize);
            }
        }

        let reward = if self.position == self.goal {
            self.reached_goal = true;
            GOAL_REWARD
        } else if self.steps >= self.max_steps {
            self.timeout_reward()
        } else {
            MOVE_REWARD
        };
        Ok(FeatureVector::from([reward]))
    }

    fn sense(&mut self, _agent: AgentId) -> Result<Observations> {
        let flags = self.obstacle_flags();
        Ok([self.position.0 as f64, self.position.1 as f64]
            .into_iter()
            .chain(flags)
            .collect())
    }

    fn is_episode_over(&self, _agent: AgentId) -> bool {
        self.reached_goal || self.steps >= self.max_steps
    }

    fn reset(&mut self, _agent: AgentId) -> Result<()> {
        self.position = self.start;
        self.steps = 0;
        self.reached_goal = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: AgentId = AgentId(0);

    fn small() -> GridMaze {
        "S.\n#G".parse().unwrap()
    }

    #[test]
    fn test_parse_and_sense() {
        let mut maze = small();
        assert_eq!((maze.rows(), maze.cols()), (2, 2));
        let obs = maze.sense(AGENT).unwrap();
        // at (0,0): +r is blocked, -r out of bounds, +c free, -c out of bounds
        assert_eq!(obs, FeatureVector::from([0.0, 0.0, 1.0, 1.0, 0.0, 1.0]));
        assert!(maze.agent_info(AGENT).sensors.validate(&obs));
    }

    #[test]
    fn test_walls_cost_a_step_without_moving() {
        let mut maze = small();
        let reward = maze.step(AGENT, &FeatureVector::from([0.0])).unwrap();
        assert_eq!(reward[0], MOVE_REWARD);
        assert_eq!(maze.position(), (0, 0));
    }

    #[test]
    fn test_goal_ends_episode() {
        let mut maze = small();
        maze.step(AGENT, &FeatureVector::from([2.0])).unwrap();
        let reward = maze.step(AGENT, &FeatureVector::from([0.0])).unwrap();
        assert_eq!(reward[0], GOAL_REWARD);
        assert!(maze.is_episode_over(AGENT));

        maze.reset(AGENT).unwrap();
        assert!(!maze.is_episode_over(AGENT));
        assert_eq!(maze.position(), (0, 0));
    }

    #[test]
    fn test_timeout_reward_reflects_progress() {
        let mut maze = GridMaze::standard().unwrap().with_max_steps(2);
        maze.step(AGENT, &FeatureVector::from([4.0])).unwrap();
        let reward = maze.step(AGENT, &FeatureVector::from([0.0])).unwrap();
        // moved one row down from the start of a 5x5 maze
        assert_eq!(reward[0], 10.0);
        assert!(maze.is_episode_over(AGENT));
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert!("S.\n..".parse::<GridMaze>().is_err());
        assert!("S.G\n..".parse::<GridMaze>().is_err());
        assert!("SX\n.G".parse::<GridMaze>().is_err());
    }
}
