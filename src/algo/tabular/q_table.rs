use std::{
    collections::{BTreeMap, HashMap},
    fmt::{Debug, Display},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    agent::Agent,
    decay::Decay,
    env::{Environment, Transition},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    util::check_interval,
};

use super::Hashable;

/// Action values for every visited state
///
/// Each row holds one value per action, in the order the actions were given at
/// construction. Rows are created complete, initialized to zero, and are never removed.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    actions: Vec<A>,
    rows: HashMap<S, Vec<f32>>,
}

impl<S: Hashable, A: Hashable + Debug> QTable<S, A> {
    /// Create an empty table over a fixed action set
    ///
    /// Fails if the action set is empty or has duplicates.
    pub fn new(actions: Vec<A>) -> Result<Self> {
        if actions.is_empty() {
            return Err(Error::InvalidConfig(String::from(
                "action set must not be empty",
            )));
        }
        if let Some(dup) = actions
            .iter()
            .enumerate()
            .find(|(i, a)| actions[..*i].contains(a))
        {
            return Err(Error::InvalidConfig(format!(
                "action {:?} appears more than once",
                dup.1
            )));
        }
        Ok(Self {
            actions,
            rows: HashMap::new(),
        })
    }

    /// The action set, in construction order
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Number of visited states
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.rows.contains_key(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.rows.keys()
    }

    /// Values of `state` in action order, if it has been visited
    pub fn row(&self, state: &S) -> Option<&[f32]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Add a zeroed row for `state` unless one exists
    pub fn initialize(&mut self, state: &S) -> &mut Vec<f32> {
        let width = self.actions.len();
        self.rows.entry(*state).or_insert_with(|| vec![0.0; width])
    }

    /// Position of `action` in the action set
    pub fn index_of(&self, action: &A) -> Result<usize> {
        self.actions
            .iter()
            .position(|a| a == action)
            .ok_or_else(|| Error::invalid_action(action))
    }

    /// Q(state, action); unvisited states read as zero
    pub fn get(&self, state: &S, action: &A) -> Result<f32> {
        let ix = self.index_of(action)?;
        Ok(self.rows.get(state).map_or(0.0, |row| row[ix]))
    }

    /// max<sub>a</sub> Q(state, a); unvisited states read as zero
    pub fn max_value(&self, state: &S) -> f32 {
        self.rows
            .get(state)
            .map_or(0.0, |row| row.iter().copied().fold(f32::NEG_INFINITY, f32::max))
    }

    /// The action with the highest value in `state`
    ///
    /// Scans in action order and only replaces the best on a strictly greater value, so
    /// the earliest action wins ties. Unvisited states yield the first action.
    pub fn greedy(&self, state: &S) -> A {
        let Some(row) = self.rows.get(state) else {
            return self.actions[0];
        };
        let mut best = 0;
        for (ix, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = ix;
            }
        }
        self.actions[best]
    }
}

impl<S: Hashable + Display, A: Hashable + Debug + Display> QTable<S, A> {
    /// Rows keyed by the state's display form, sorted, for logging and inspection
    pub fn snapshot(&self) -> BTreeMap<String, Vec<(String, f32)>> {
        self.rows
            .iter()
            .map(|(state, row)| {
                let values = self
                    .actions
                    .iter()
                    .zip(row)
                    .map(|(a, v)| (a.to_string(), *v))
                    .collect();
                (state.to_string(), values)
            })
            .collect()
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone, PartialEq)]
pub struct QTableAgentConfig {
    /// Learning rate, in `(0,1]`
    pub alpha: f32,
    /// Discount factor, in `[0,1]`
    pub gamma: f32,
    /// Initial exploration rate, in `[0,1]`
    pub epsilon: f32,
    /// Seed for the exploration RNG; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.6,
            seed: None,
        }
    }
}

/// A simple Q-learning agent that utilizes a Q-table to learn its environment
///
/// ### Generics
/// - `S` - The state type, used directly as the table key
/// - `A` - The action type; the action set is fixed at construction because every table
///   row stores one value per action
pub struct QTableAgent<S, A> {
    q_table: QTable<S, A>,
    exploration: EpsilonGreedy,
    alpha: f32, // learning rate
    gamma: f32, // discount factor
    rng: StdRng,
}

impl<S: Hashable, A: Hashable + Debug> QTableAgent<S, A> {
    /// Initialize a new agent over a fixed, non-empty action set
    ///
    /// Fails if the action set is empty or has duplicates, or if a hyperparameter is out
    /// of range.
    pub fn new(actions: Vec<A>, config: QTableAgentConfig) -> Result<Self> {
        let q_table = QTable::new(actions)?;
        if !(config.alpha > 0.0 && config.alpha <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                value: config.alpha,
                reason: String::from("must be in the interval (0, 1]"),
            });
        }
        let gamma = check_interval("gamma", config.gamma, 0.0, 1.0)?;
        let exploration = EpsilonGreedy::new(config.epsilon)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            q_table,
            exploration,
            alpha: config.alpha,
            gamma,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable<S, A> {
        &self.q_table
    }

    pub fn actions(&self) -> &[A] {
        self.q_table.actions()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    pub fn set_epsilon(&mut self, epsilon: f32) -> Result<()> {
        self.exploration.set_epsilon(epsilon)
    }

    /// Apply one step of `decay` to the exploration rate
    pub fn decay_epsilon<D: Decay>(&mut self, decay: &D) {
        self.exploration.decay(decay);
    }

    /// Q(state, action)
    pub fn q_value(&self, state: &S, action: &A) -> Result<f32> {
        self.q_table.get(state, action)
    }

    /// Make sure `state` has a zeroed value for every action; existing values are kept
    pub fn initialize_state(&mut self, state: &S) {
        self.q_table.initialize(state);
    }

    /// Epsilon greedy action selection
    pub fn choose_action(&mut self, state: &S) -> A {
        self.initialize_state(state);
        match self.exploration.choose(&mut self.rng) {
            Choice::Explore => {
                let actions = self.q_table.actions();
                actions[self.rng.gen_range(0..actions.len())]
            }
            Choice::Exploit => self.q_table.greedy(state),
        }
    }

    /// Best known action, without exploration
    pub fn choose_greedy_action(&mut self, state: &S) -> A {
        self.initialize_state(state);
        self.q_table.greedy(state)
    }

    /// One-step Q-learning update
    ///
    /// Q(s,a) ← Q(s,a) + α (r + γ max<sub>a'</sub> Q(s',a') − Q(s,a))
    ///
    /// Fails without touching the table if `action` is not in the action set.
    pub fn update_q_value(
        &mut self,
        state: &S,
        action: &A,
        reward: f32,
        next_state: &S,
    ) -> Result<()> {
        let ix = self.q_table.index_of(action)?;
        self.q_table.initialize(next_state);
        let max_next_q = self.q_table.max_value(next_state);

        let (alpha, gamma) = (self.alpha, self.gamma);
        let q = &mut self.q_table.initialize(state)[ix];
        *q += alpha * (reward + gamma * max_next_q - *q);
        Ok(())
    }
}

impl<E> Agent<E> for QTableAgent<E::State, E::Action>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable + Debug,
{
    fn act(&mut self, state: &E::State) -> E::Action {
        self.choose_action(state)
    }

    fn act_greedy(&mut self, state: &E::State) -> E::Action {
        self.choose_greedy_action(state)
    }

    fn learn(
        &mut self,
        state: &E::State,
        action: &E::Action,
        transition: &Transition<E::State>,
    ) -> Result<()> {
        self.update_q_value(state, action, transition.reward, &transition.state)
    }

    fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    fn set_epsilon(&mut self, epsilon: f32) -> Result<()> {
        self.exploration.set_epsilon(epsilon)
    }
}
