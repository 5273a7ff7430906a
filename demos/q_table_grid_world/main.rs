use std::{error::Error, thread};

use qgrid::{
    algo::{QTableAgent, QTableAgentConfig},
    env::DiscreteActionSpace,
    gym::{GridConfig, GridWorld, Position},
    train::{self, speed_to_delay, Control, TrainConfig, Trainer},
    viz,
};

const NUM_EPISODES: u32 = 1000;
const SPEED: u8 = 90;

fn main() -> Result<(), Box<dyn Error>> {
    let mut env = GridWorld::new(GridConfig {
        danger: [(1, 1), (2, 1), (3, 3), (1, 3), (3, 0)]
            .into_iter()
            .map(Position::from)
            .collect(),
        ..Default::default()
    })?;
    let mut agent = QTableAgent::new(env.actions(), QTableAgentConfig::default())?;
    let mut trainer = Trainer::new(TrainConfig {
        episodes: NUM_EPISODES,
        step_delay: speed_to_delay(SPEED),
        ..Default::default()
    });

    let control = Control::new();
    let (handle, mut observer) =
        viz::init(&env, trainer.metric_names(), NUM_EPISODES, control.clone());

    let training = thread::spawn(move || -> qgrid::Result<_> {
        let stats = trainer.run(&mut env, &mut agent, &control, &mut observer)?;
        for (state, row) in agent.q_table().snapshot() {
            log::debug!("q({state}) = {row:?}");
        }
        env.reset_hazard();
        let eval = train::evaluate(&mut env, &mut agent, 100);
        log::info!(
            "greedy policy: {} steps, terminal {}, hazard {}",
            eval.steps,
            eval.reached_terminal,
            eval.hazard_visited
        );
        log::debug!("final grid:\n{}", env.render_ascii(eval.path.last().copied()));
        Ok(stats)
    });

    handle.join().map_err(|_| "viz thread panicked")??;
    let stats = training.join().map_err(|_| "training thread panicked")??;
    println!(
        "{} episodes, min steps {:?}, final epsilon {:.3}",
        stats.episodes, stats.min_steps, stats.epsilon
    );

    Ok(())
}
