use crate::{
    env::{Environment, Transition},
    error::Result,
};

/// A learning agent that can be driven through episodes of an [`Environment`]
pub trait Agent<E>
where
    E: Environment,
{
    /// Choose an action for `state`, possibly exploring
    fn act(&mut self, state: &E::State) -> E::Action;

    /// Choose the best known action for `state`, never exploring
    fn act_greedy(&mut self, state: &E::State) -> E::Action;

    /// Learn from having taken `action` in `state`
    fn learn(
        &mut self,
        state: &E::State,
        action: &E::Action,
        transition: &Transition<E::State>,
    ) -> Result<()>;

    /// Current exploration rate
    fn epsilon(&self) -> f32;

    fn set_epsilon(&mut self, epsilon: f32) -> Result<()>;
}
