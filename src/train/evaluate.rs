use crate::{agent::Agent, env::Environment};

/// Outcome of a greedy rollout
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<S> {
    /// Visited states, starting with the initial state
    pub path: Vec<S>,
    pub steps: u32,
    /// Whether the rollout ended in a terminal state within the step budget
    pub reached_terminal: bool,
    /// Hazard flag reported by the last transition
    pub hazard_visited: bool,
}

/// Follow the agent's greedy policy from a fresh episode without learning
///
/// Greedy policies can loop forever on an undertrained table, so the rollout gives up
/// after `max_steps`.
pub fn evaluate<E, A>(env: &mut E, agent: &mut A, max_steps: u32) -> Evaluation<E::State>
where
    E: Environment,
    E::State: Clone,
    A: Agent<E>,
{
    let mut state = env.reset();
    let mut path = vec![state.clone()];
    let mut hazard_visited = false;

    for step in 1..=max_steps {
        let action = agent.act_greedy(&state);
        let transition = env.step(&state, action);
        hazard_visited = transition.hazard_visited;
        state = transition.state;
        path.push(state.clone());

        if transition.done {
            log::debug!("greedy rollout reached a terminal state in {step} steps");
            return Evaluation {
                path,
                steps: step,
                reached_terminal: true,
                hazard_visited,
            };
        }
    }

    log::debug!("greedy rollout gave up after {max_steps} steps");
    Evaluation {
        path,
        steps: max_steps,
        reached_terminal: false,
        hazard_visited,
    }
}
