use std::{
    collections::BTreeMap,
    ops::{Deref, DerefMut},
};

/// Represents the dynamics of an environment in which an agent can operate.
///
/// Episode state lives with the caller: the environment maps a state and an action to a
/// [`Transition`] and never tracks where the agent currently is.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Fresh initial state for a new episode
    fn reset(&self) -> Self::State;

    /// Apply `action` in `state`, producing the next state and associated reward
    fn step(&mut self, state: &Self::State, action: Self::Action) -> Transition<Self::State>;
}

/// An environment with a finite, fixed set of actions
pub trait DiscreteActionSpace: Environment {
    /// The available actions, in a stable order
    ///
    /// The returned vector should never be empty.
    fn actions(&self) -> Vec<Self::Action>;
}

/// Outcome of a single [`Environment::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S> {
    /// The state after the action is applied
    pub state: S,
    /// The reward for entering `state`
    pub reward: f32,
    /// Whether `state` is terminal
    pub done: bool,
    /// Whether a hazard has been entered at any point since the flag was last cleared
    pub hazard_visited: bool,
}

/// Named episode metrics, e.g. total reward and step count
///
/// Keys are fixed at construction; [`Report::take`] hands out the values and zeroes them
/// for the next episode.
#[derive(Debug, Clone, Default)]
pub struct Report {
    keys: Vec<&'static str>,
    map: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let map = keys.iter().map(|k| (*k, 0.0)).collect();
        Self { keys, map }
    }

    /// The metric names, in the order they were declared
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Metric values in declaration order
    pub fn values(&self) -> Vec<f64> {
        self.keys.iter().map(|k| self.map[k]).collect()
    }

    /// Return the current values and reset all metrics to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let zeroed = self.keys.iter().map(|k| (*k, 0.0)).collect();
        std::mem::replace(&mut self.map, zeroed)
    }
}

impl Deref for Report {
    type Target = BTreeMap<&'static str, f64>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl DerefMut for Report {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_take_resets() {
        let mut report = Report::new(vec!["steps", "reward"]);
        report.entry("steps").and_modify(|x| *x += 3.0);
        report.entry("reward").and_modify(|x| *x -= 0.5);
        assert_eq!(report.values(), vec![3.0, -0.5], "values in declaration order");

        let taken = report.take();
        assert_eq!(taken["steps"], 3.0, "taken steps correct");
        assert_eq!(report["steps"], 0.0, "steps zeroed");
        assert_eq!(report.keys(), ["steps", "reward"], "keys survive take");
    }
}
