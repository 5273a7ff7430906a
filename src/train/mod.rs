mod control;
mod evaluate;
mod trainer;

pub use control::Control;
pub use evaluate::{evaluate, Evaluation};
pub use trainer::{
    speed_to_delay, EpisodeSummary, Observer, StepEvent, TrainConfig, TrainStats, Trainer,
};
