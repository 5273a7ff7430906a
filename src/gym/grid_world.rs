use std::{collections::BTreeSet, fmt, str::FromStr};

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{
    env::{DiscreteActionSpace, Environment, Transition},
    error::{Error, Result},
};

/// Reward for entering a danger cell; takes priority over the goal reward
pub const HAZARD_REWARD: f32 = -1.0;
/// Reward for reaching the goal
pub const GOAL_REWARD: f32 = 1.0;
/// Cost of every other step
pub const STEP_REWARD: f32 = -0.01;

/// A cell of the grid, `(0, 0)` being the top left corner
///
/// Doubles as the state type of [`GridWorld`]. Its canonical key is `"x,y"`, see
/// [`Position::key`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The canonical table key, e.g. `"3,1"`
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Manhattan distance to `other`
    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::InvalidConfig(format!("malformed position key `{s}`"));
        let (x, y) = s.split_once(',').ok_or_else(malformed)?;
        Ok(Self {
            x: x.trim().parse().map_err(|_| malformed())?,
            y: y.trim().parse().map_err(|_| malformed())?,
        })
    }
}

/// A single move on the grid
///
/// Names follow the short forms `up`, `down`, `left`, `right`, `ru`, `rd`, `lu`, `ld`.
#[derive(EnumIter, EnumString, Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Move {
    #[strum(serialize = "up")]
    Up,
    #[strum(serialize = "down")]
    Down,
    #[strum(serialize = "left")]
    Left,
    #[strum(serialize = "right")]
    Right,
    #[strum(serialize = "ru")]
    UpRight,
    #[strum(serialize = "rd")]
    DownRight,
    #[strum(serialize = "lu")]
    UpLeft,
    #[strum(serialize = "ld")]
    DownLeft,
}

impl Move {
    /// Displacement `(dx, dy)`; `y` grows downwards
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (0, -1),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
            Move::UpRight => (1, -1),
            Move::DownRight => (1, 1),
            Move::UpLeft => (-1, -1),
            Move::DownLeft => (-1, 1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }
}

/// Which moves an agent may choose from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionSet {
    /// `up`, `down`, `left`, `right`
    #[default]
    Cardinal,
    /// The cardinal moves followed by `ru`, `rd`, `lu`, `ld`
    WithDiagonals,
}

impl ActionSet {
    /// The moves of this set in their fixed order
    pub fn moves(self) -> Vec<Move> {
        Move::iter()
            .filter(|m| self == ActionSet::WithDiagonals || !m.is_diagonal())
            .collect()
    }
}

/// Layout of a [`GridWorld`]
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Side length of the square grid
    pub size: usize,
    pub start: Position,
    pub goal: Position,
    /// Danger cells; overlap with start or goal is not prevented here
    pub danger: BTreeSet<Position>,
    pub actions: ActionSet,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5,
            start: Position::new(0, 0),
            goal: Position::new(4, 4),
            danger: BTreeSet::new(),
            actions: ActionSet::Cardinal,
        }
    }
}

impl GridConfig {
    /// Check that the grid is non-empty and every configured cell lies on it
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig(String::from(
                "grid size must be positive",
            )));
        }
        check_in_bounds(self.size, "start", &self.start)?;
        check_in_bounds(self.size, "goal", &self.goal)?;
        for cell in &self.danger {
            check_in_bounds(self.size, "danger cell", cell)?;
        }
        Ok(())
    }
}

fn check_in_bounds(size: usize, what: &str, pos: &Position) -> Result<()> {
    if pos.x < size && pos.y < size {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{what} {pos} lies outside the {size}x{size} grid"
        )))
    }
}

/// A square grid with a start cell, a goal cell and danger cells
///
/// Deterministic dynamics: moves are clamped at the walls, reaching the goal ends the
/// episode, and entering a danger cell is penalized and sets a hazard flag that stays
/// set until [`GridWorld::reset_hazard`] is called.
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: GridConfig,
    hazard_visited: bool,
}

impl GridWorld {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        if config.danger.contains(&config.goal) {
            log::debug!("goal {} is also a danger cell", config.goal);
        }
        Ok(Self {
            config,
            hazard_visited: false,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn start(&self) -> Position {
        self.config.start
    }

    pub fn goal(&self) -> Position {
        self.config.goal
    }

    pub fn danger(&self) -> &BTreeSet<Position> {
        &self.config.danger
    }

    pub fn is_danger(&self, pos: &Position) -> bool {
        self.config.danger.contains(pos)
    }

    pub fn set_start(&mut self, start: Position) -> Result<()> {
        check_in_bounds(self.config.size, "start", &start)?;
        self.config.start = start;
        Ok(())
    }

    pub fn set_goal(&mut self, goal: Position) -> Result<()> {
        check_in_bounds(self.config.size, "goal", &goal)?;
        self.config.goal = goal;
        Ok(())
    }

    /// Replace all danger cells
    pub fn set_danger(&mut self, cells: impl IntoIterator<Item = Position>) -> Result<()> {
        let cells = cells.into_iter().collect::<BTreeSet<_>>();
        for cell in &cells {
            check_in_bounds(self.config.size, "danger cell", cell)?;
        }
        self.config.danger = cells;
        Ok(())
    }

    /// Flip `cell` between safe and dangerous, as a host does when a cell is clicked
    ///
    /// Start and goal cannot be toggled. **Returns** whether `cell` is now dangerous.
    pub fn toggle_danger(&mut self, cell: Position) -> Result<bool> {
        check_in_bounds(self.config.size, "danger cell", &cell)?;
        if cell == self.config.start || cell == self.config.goal {
            return Err(Error::InvalidConfig(format!(
                "cannot mark {cell} as dangerous: it is the start or the goal"
            )));
        }
        if self.config.danger.remove(&cell) {
            Ok(false)
        } else {
            self.config.danger.insert(cell);
            Ok(true)
        }
    }

    pub fn clear_danger(&mut self) {
        self.config.danger.clear();
    }

    /// Whether any step has entered a danger cell since the flag was last cleared
    pub fn hazard_visited(&self) -> bool {
        self.hazard_visited
    }

    pub fn reset_hazard(&mut self) {
        self.hazard_visited = false;
    }

    /// Step with a move given by name; unknown names leave the agent where it is
    pub fn step_named(&mut self, state: &Position, name: &str) -> Transition<Position> {
        let delta = name.parse::<Move>().map_or((0, 0), Move::delta);
        self.apply(state, delta)
    }

    fn apply(&mut self, state: &Position, (dx, dy): (isize, isize)) -> Transition<Position> {
        let last = self.config.size - 1;
        let clamp = |v: usize, d: isize| v.saturating_add_signed(d).min(last);
        let next = Position::new(clamp(state.x, dx), clamp(state.y, dy));

        let done = next == self.config.goal;
        let reward = if self.is_danger(&next) {
            if !self.hazard_visited {
                log::warn!("hazard entered at {next}");
            }
            self.hazard_visited = true;
            HAZARD_REWARD
        } else if done {
            GOAL_REWARD
        } else {
            STEP_REWARD
        };
        log::trace!("{state} -> {next}: reward {reward}, done {done}");

        Transition {
            state: next,
            reward,
            done,
            hazard_visited: self.hazard_visited,
        }
    }

    /// Text rendering of the grid: `S` start, `G` goal, `X` danger, `A` agent
    pub fn render_ascii(&self, agent: Option<Position>) -> String {
        let size = self.config.size;
        let mut out = String::with_capacity(size * (size + 1));
        for y in 0..size {
            for x in 0..size {
                let pos = Position::new(x, y);
                let c = if Some(pos) == agent {
                    'A'
                } else if self.is_danger(&pos) {
                    'X'
                } else if pos == self.config.goal {
                    'G'
                } else if pos == self.config.start {
                    'S'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl Environment for GridWorld {
    type State = Position;
    type Action = Move;

    fn reset(&self) -> Self::State {
        self.config.start
    }

    fn step(&mut self, state: &Self::State, action: Self::Action) -> Transition<Self::State> {
        self.apply(state, action.delta())
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> Vec<Self::Action> {
        self.config.actions.moves()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn world(danger: &[(usize, usize)]) -> GridWorld {
        GridWorld::new(GridConfig {
            danger: danger.iter().copied().map(Position::from).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn keys_are_canonical_and_injective() {
        assert_eq!(Position::new(3, 1).key(), "3,1");
        assert_eq!("3,1".parse::<Position>().unwrap(), Position::new(3, 1));
        assert!("3;1".parse::<Position>().is_err(), "wrong separator rejected");
        assert!("-1,2".parse::<Position>().is_err(), "negative rejected");

        let keys = (0..12)
            .flat_map(|x| (0..12).map(move |y| Position::new(x, y).key()))
            .collect::<HashSet<_>>();
        assert_eq!(keys.len(), 144, "every position has its own key");
    }

    #[test]
    fn clamps_at_walls() {
        let mut env = world(&[]);
        let t = env.step(&Position::new(0, 0), Move::Up);
        assert_eq!(t.state, Position::new(0, 0), "stays in the corner");
        assert_eq!(t.reward, STEP_REWARD, "step cost charged");
        assert!(!t.done, "not terminal");

        let t = env.step(&Position::new(0, 2), Move::DownLeft);
        assert_eq!(t.state, Position::new(0, 3), "each axis clamped independently");

        let t = env.step(&Position::new(4, 0), Move::UpRight);
        assert_eq!(t.state, Position::new(4, 0), "clamped on both axes");
    }

    #[test]
    fn moves_apply_their_delta() {
        let mut env = world(&[]);
        let center = Position::new(2, 2);
        let expected = [
            (Move::Up, (2, 1)),
            (Move::Down, (2, 3)),
            (Move::Left, (1, 2)),
            (Move::Right, (3, 2)),
            (Move::UpRight, (3, 1)),
            (Move::DownRight, (3, 3)),
            (Move::UpLeft, (1, 1)),
            (Move::DownLeft, (1, 3)),
        ];
        for (m, pos) in expected {
            assert_eq!(env.step(&center, m).state, Position::from(pos), "{m} moved correctly");
        }
    }

    #[test]
    fn reaching_goal_terminates() {
        let mut env = world(&[]);
        let t = env.step(&Position::new(3, 4), Move::Right);
        assert_eq!(t.state, env.goal());
        assert_eq!(t.reward, GOAL_REWARD, "goal reward");
        assert!(t.done, "terminal");
        assert!(!t.hazard_visited, "no hazard");
    }

    #[test]
    fn hazard_takes_priority_over_goal() {
        let mut env = world(&[(4, 4)]);
        let t = env.step(&Position::new(4, 3), Move::Down);
        assert_eq!(t.reward, HAZARD_REWARD, "hazard reward wins");
        assert!(t.done, "still terminal");
        assert!(t.hazard_visited, "hazard flagged");
    }

    #[test]
    fn hazard_flag_persists_until_cleared() {
        let mut env = world(&[(1, 0)]);
        let t = env.step(&Position::new(0, 0), Move::Right);
        assert_eq!(t.reward, HAZARD_REWARD);
        assert!(t.hazard_visited);

        let t = env.step(&t.state, Move::Down);
        assert_eq!(t.reward, STEP_REWARD, "normal cell charges step cost");
        assert!(t.hazard_visited, "flag persists across steps");

        let start = env.reset();
        assert_eq!(start, Position::new(0, 0), "reset returns start");
        assert!(env.hazard_visited(), "reset leaves the flag alone");

        env.reset_hazard();
        assert!(!env.step(&start, Move::Down).hazard_visited, "flag cleared");
    }

    #[test]
    fn unknown_move_names_are_noops() {
        let mut env = world(&[]);
        let here = Position::new(2, 2);
        let t = env.step_named(&here, "jump");
        assert_eq!(t.state, here, "no displacement");
        assert_eq!(t.reward, STEP_REWARD);

        assert_eq!(env.step_named(&here, "ru").state, Position::new(3, 1), "known name applied");
    }

    #[test]
    fn action_sets() {
        assert_eq!(
            ActionSet::Cardinal.moves(),
            vec![Move::Up, Move::Down, Move::Left, Move::Right]
        );
        let extended = ActionSet::WithDiagonals.moves();
        assert_eq!(extended.len(), 8, "all moves");
        assert_eq!(extended[4..], [Move::UpRight, Move::DownRight, Move::UpLeft, Move::DownLeft]);
        assert_eq!(Move::UpLeft.to_string(), "lu", "short names");
    }

    #[test]
    fn config_validation() {
        let bad = [
            GridConfig { size: 0, ..Default::default() },
            GridConfig { start: Position::new(5, 0), ..Default::default() },
            GridConfig { goal: Position::new(0, 9), ..Default::default() },
            GridConfig {
                danger: [Position::new(7, 7)].into(),
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(GridWorld::new(config.clone()), Err(Error::InvalidConfig(_))),
                "{config:?} rejected"
            );
        }

        let mut env = world(&[]);
        assert!(env.set_goal(Position::new(5, 5)).is_err(), "goal off grid rejected");
        assert_eq!(env.goal(), Position::new(4, 4), "goal unchanged after rejection");
    }

    #[test]
    fn toggling_danger() {
        let mut env = world(&[]);
        assert_eq!(env.toggle_danger(Position::new(2, 2)), Ok(true), "now dangerous");
        assert!(env.is_danger(&Position::new(2, 2)));
        assert_eq!(env.toggle_danger(Position::new(2, 2)), Ok(false), "safe again");
        assert!(env.toggle_danger(env.start()).is_err(), "start protected");
        assert!(env.toggle_danger(env.goal()).is_err(), "goal protected");

        env.set_danger([Position::new(1, 1), Position::new(3, 3)]).unwrap();
        assert_eq!(env.danger().len(), 2);
        env.clear_danger();
        assert!(env.danger().is_empty());
    }

    #[test]
    fn ascii_rendering() {
        let env = world(&[(1, 0)]);
        let text = env.render_ascii(Some(Position::new(0, 1)));
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "SX...");
        assert_eq!(lines[1], "A....");
        assert_eq!(lines[4], "....G");
    }
}
