use std::{
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use crate::{
    gym::{GridWorld, Position},
    train::{Control, EpisodeSummary, Observer, StepEvent, TrainStats},
};

pub use app::App;

mod app;
mod components;
mod tui;
mod util;

/// Messages from the training loop to the TUI
#[derive(Debug, Clone)]
pub enum Update {
    /// The agent moved
    Step {
        episode: u32,
        agent: Position,
        stats: TrainStats,
    },
    /// An episode ended; `data` holds one value per plotted metric
    Episode { episode: u32, data: Vec<f64> },
}

/// Forwards training progress to the TUI
///
/// Updates sent after the TUI has exited are dropped.
pub struct VizObserver {
    tx: Sender<Update>,
}

impl VizObserver {
    pub fn new(tx: Sender<Update>) -> Self {
        Self { tx }
    }
}

impl Observer<GridWorld> for VizObserver {
    fn on_step(&mut self, event: &StepEvent<'_, GridWorld>) {
        let _ = self.tx.send(Update::Step {
            episode: event.episode,
            agent: event.transition.state,
            stats: event.stats.clone(),
        });
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        let _ = self.tx.send(Update::Episode {
            episode: summary.episode,
            data: summary.metrics.clone(),
        });
    }
}

/// Install the TUI logger and start the TUI on its own thread
///
/// Pressing `q` in the TUI stops `control`; space pauses and resumes it.
///
/// ### Parameters
/// - `world` - The grid being learned; danger cells are copied, later edits are not shown
/// - `plots` - Names of the per-episode metrics that will be sent
/// - `episodes` - Total episodes, for the progress bar
pub fn init(
    world: &GridWorld,
    plots: &[&'static str],
    episodes: u32,
    control: Control,
) -> (JoinHandle<io::Result<()>>, VizObserver) {
    // A logger may already be installed by the host; the TUI then shows no logs.
    if tui_logger::init_logger(log::LevelFilter::Trace).is_ok() {
        tui_logger::set_default_level(log::LevelFilter::Debug);
    }

    let mut app = App::new(world, plots, episodes, control);
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || app.run(rx));

    (handle, VizObserver::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_updates_carry_metrics_and_outlive_the_tui() {
        let (tx, rx) = mpsc::channel();
        let mut observer = VizObserver::new(tx);
        let summary = EpisodeSummary {
            episode: 4,
            steps: 9,
            reached_terminal: true,
            hazard_visited: false,
            epsilon: 0.3,
            metrics: vec![9.0, 0.92],
        };

        Observer::<GridWorld>::on_episode_end(&mut observer, &summary);
        match rx.recv().unwrap() {
            Update::Episode { episode, data } => {
                assert_eq!(episode, 4);
                assert_eq!(data, [9.0, 0.92]);
            }
            other => panic!("unexpected update {other:?}"),
        }

        drop(rx);
        Observer::<GridWorld>::on_episode_end(&mut observer, &summary);
    }
}
