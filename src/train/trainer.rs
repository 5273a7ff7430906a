use std::time::Duration;

use crate::{
    agent::Agent,
    decay::{Decay, Multiplicative},
    env::{Environment, Report, Transition},
    error::Result,
};

use super::Control;

/// Delay between steps for a playback speed in `[0, 100]`
///
/// 100 means no delay at all; anything slower waits `(100 - speed) * 5 + 100` ms. Speeds
/// above 100 are treated as 100.
pub fn speed_to_delay(speed: u8) -> Duration {
    if speed >= 100 {
        Duration::ZERO
    } else {
        Duration::from_millis(u64::from(100 - speed) * 5 + 100)
    }
}

/// Configuration for a [`Trainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig<D = Multiplicative> {
    /// Number of episodes per [`Trainer::run`]
    pub episodes: u32,
    /// Applied to the agent's epsilon once after every step
    pub epsilon_decay: D,
    /// Pacing delay after every step
    pub step_delay: Duration,
    /// Cut an episode short after this many steps
    pub max_steps_per_episode: Option<u32>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            epsilon_decay: Multiplicative::default(),
            step_delay: Duration::ZERO,
            max_steps_per_episode: None,
        }
    }
}

/// Aggregate statistics across runs of one [`Trainer`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainStats {
    /// Episodes finished, whether by reaching a terminal state or by the step cap
    pub episodes: u32,
    /// Steps taken in the current (or last) episode
    pub steps: u32,
    pub total_steps: u64,
    /// Fewest steps any episode needed to reach a terminal state
    pub min_steps: Option<u32>,
    /// The agent's epsilon after the last step
    pub epsilon: f32,
    /// Hazard flag reported by the last transition
    ///
    /// Environments keep this flag set until it is cleared explicitly (see
    /// [`GridWorld::reset_hazard`](crate::gym::GridWorld::reset_hazard)), so it covers every
    /// step since the last clear, not just the current episode.
    pub hazard_visited: bool,
    /// Whether the last run ended on a stop signal
    pub stopped: bool,
}

/// Everything an [`Observer`] learns about a single step
pub struct StepEvent<'a, E: Environment> {
    /// Zero-based episode index within the trainer's lifetime
    pub episode: u32,
    /// One-based step number within the episode
    pub step: u32,
    pub state: &'a E::State,
    pub action: &'a E::Action,
    pub transition: &'a Transition<E::State>,
    pub stats: &'a TrainStats,
}

/// Summary of a finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub steps: u32,
    pub reached_terminal: bool,
    /// The environment's hazard flag when the episode ended
    ///
    /// Sticky across episodes until the environment clears it, so this reads "a hazard was
    /// entered since the flag was last cleared".
    pub hazard_visited: bool,
    pub epsilon: f32,
    /// Values of the trainer's report, in the order of [`Trainer::metric_names`]
    pub metrics: Vec<f64>,
}

/// Hooks for a host that renders or records training as it happens
pub trait Observer<E: Environment> {
    fn on_step(&mut self, _event: &StepEvent<'_, E>) {}

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}
}

impl<E: Environment> Observer<E> for () {}

/// Drives an [`Agent`] through episodes of an [`Environment`]
///
/// Owns all episode state, so the environment stays a pure transition function and the
/// agent only ever sees states, actions and rewards.
pub struct Trainer<D = Multiplicative> {
    config: TrainConfig<D>,
    stats: TrainStats,
    report: Report,
}

impl<D: Decay> Trainer<D> {
    pub fn new(config: TrainConfig<D>) -> Self {
        Self {
            config,
            stats: TrainStats::default(),
            report: Report::new(vec!["steps", "reward"]),
        }
    }

    pub fn config(&self) -> &TrainConfig<D> {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TrainConfig<D> {
        &mut self.config
    }

    pub fn stats(&self) -> &TrainStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = TrainStats::default();
        self.report.take();
    }

    /// Names of the per-episode metrics passed in [`EpisodeSummary::metrics`]
    pub fn metric_names(&self) -> &[&'static str] {
        self.report.keys()
    }

    /// Train for up to `config.episodes` episodes
    ///
    /// The stop signal is checked before every episode and every step; a paused loop
    /// blocks before its next step. **Returns** the statistics after the run.
    pub fn run<E, A, O>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        control: &Control,
        observer: &mut O,
    ) -> Result<TrainStats>
    where
        E: Environment,
        E::Action: Clone,
        A: Agent<E>,
        O: Observer<E>,
    {
        self.stats.stopped = false;
        self.stats.epsilon = agent.epsilon();

        'episodes: for _ in 0..self.config.episodes {
            if control.is_stopped() {
                break;
            }

            let episode = self.stats.episodes;
            let mut state = env.reset();
            self.stats.steps = 0;
            self.report.take();
            log::debug!("episode {} started", episode + 1);

            let reached_terminal = loop {
                if !control.wait_while_paused() {
                    break 'episodes;
                }

                let action = agent.act(&state);
                let transition = env.step(&state, action.clone());
                agent.learn(&state, &action, &transition)?;

                self.stats.steps += 1;
                self.stats.total_steps += 1;
                self.stats.hazard_visited = transition.hazard_visited;
                self.report.entry("steps").and_modify(|x| *x += 1.0);
                self.report
                    .entry("reward")
                    .and_modify(|x| *x += f64::from(transition.reward));

                observer.on_step(&StepEvent {
                    episode,
                    step: self.stats.steps,
                    state: &state,
                    action: &action,
                    transition: &transition,
                    stats: &self.stats,
                });

                if !control.sleep(self.config.step_delay) {
                    break 'episodes;
                }

                let epsilon = self.config.epsilon_decay.decay(agent.epsilon());
                agent.set_epsilon(epsilon.clamp(0.0, 1.0))?;
                self.stats.epsilon = agent.epsilon();

                let Transition { state: next, done, .. } = transition;
                state = next;

                if done {
                    break true;
                }
                if self
                    .config
                    .max_steps_per_episode
                    .is_some_and(|cap| self.stats.steps >= cap)
                {
                    log::debug!(
                        "episode {} cut short after {} steps",
                        episode + 1,
                        self.stats.steps
                    );
                    break false;
                }
            };

            if reached_terminal {
                log::info!("episode {} finished in {} steps", episode + 1, self.stats.steps);
                self.stats.min_steps = Some(
                    self.stats
                        .min_steps
                        .map_or(self.stats.steps, |m| m.min(self.stats.steps)),
                );
            }
            self.stats.episodes += 1;

            let metrics = self.report.values();
            self.report.take();
            observer.on_episode_end(&EpisodeSummary {
                episode,
                steps: self.stats.steps,
                reached_terminal,
                hazard_visited: self.stats.hazard_visited,
                epsilon: self.stats.epsilon,
                metrics,
            });
        }

        if control.is_stopped() {
            log::info!("training stopped after {} episodes", self.stats.episodes);
            self.stats.stopped = true;
        }
        Ok(self.stats.clone())
    }
}
