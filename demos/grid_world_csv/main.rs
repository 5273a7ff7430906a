use std::{error::Error, fs, path::Path};

use qgrid::{
    algo::{QTableAgent, QTableAgentConfig},
    env::DiscreteActionSpace,
    gym::{ActionSet, GridConfig, GridWorld, Position},
    train::{self, Control, EpisodeSummary, Observer, TrainConfig, Trainer},
};

const NUM_EPISODES: u32 = 500;

/// Writes one csv row per episode
struct CsvObserver {
    wtr: csv::Writer<fs::File>,
    error: Option<csv::Error>,
}

impl Observer<GridWorld> for CsvObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        if self.error.is_some() {
            return;
        }
        let row = [
            summary.episode.to_string(),
            summary.steps.to_string(),
            summary.metrics[1].to_string(),
            summary.epsilon.to_string(),
        ];
        if let Err(e) = self.wtr.write_record(&row) {
            self.error = Some(e);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = Path::new("demos/grid_world_csv");
    fs::create_dir_all(path.join("out"))?;

    let mut wtr = csv::Writer::from_path(path.join("out/data.csv"))?;
    wtr.write_record(["episode", "steps", "reward", "epsilon"])?;
    let mut observer = CsvObserver { wtr, error: None };

    let mut env = GridWorld::new(GridConfig {
        size: 8,
        goal: Position::new(7, 7),
        danger: [(2, 2), (3, 3), (4, 4), (5, 2), (2, 5)]
            .into_iter()
            .map(Position::from)
            .collect(),
        actions: ActionSet::WithDiagonals,
        ..Default::default()
    })?;
    let mut agent = QTableAgent::new(env.actions(), QTableAgentConfig::default())?;
    let mut trainer = Trainer::new(TrainConfig {
        episodes: NUM_EPISODES,
        ..Default::default()
    });

    let stats = trainer.run(&mut env, &mut agent, &Control::new(), &mut observer)?;
    if let Some(e) = observer.error.take() {
        return Err(e.into());
    }
    observer.wtr.flush()?;

    let mut wtr = csv::Writer::from_path(path.join("out/q_table.csv"))?;
    let header = ["state"]
        .into_iter()
        .map(String::from)
        .chain(agent.q_table().actions().iter().map(ToString::to_string));
    wtr.write_record(header)?;
    for (state, row) in agent.q_table().snapshot() {
        let values = row.into_iter().map(|(_, q)| q.to_string());
        wtr.write_record(std::iter::once(state).chain(values))?;
    }
    wtr.flush()?;

    env.reset_hazard();
    let eval = train::evaluate(&mut env, &mut agent, 100);
    println!(
        "trained {} episodes ({} steps), greedy path takes {} steps:",
        stats.episodes, stats.total_steps, eval.steps
    );
    print!("{}", env.render_ascii(None));
    let path = eval
        .path
        .iter()
        .map(Position::key)
        .collect::<Vec<_>>()
        .join(" -> ");
    println!("{path}");

    Ok(())
}
