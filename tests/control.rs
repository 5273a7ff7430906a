use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use qgrid::{
    algo::{QTableAgent, QTableAgentConfig},
    env::DiscreteActionSpace,
    gym::{GridConfig, GridWorld},
    train::{Control, Observer, StepEvent, TrainConfig, Trainer},
};

struct Counter(Arc<AtomicU64>);

impl Observer<GridWorld> for Counter {
    fn on_step(&mut self, _event: &StepEvent<'_, GridWorld>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn pause_resume_and_stop_a_running_loop() {
    let mut env = GridWorld::new(GridConfig::default()).unwrap();
    let mut agent = QTableAgent::new(
        env.actions(),
        QTableAgentConfig {
            seed: Some(5),
            ..Default::default()
        },
    )
    .unwrap();
    let mut trainer = Trainer::new(TrainConfig {
        episodes: 1_000_000,
        step_delay: Duration::from_millis(2),
        ..Default::default()
    });

    let control = Control::new();
    let steps = Arc::new(AtomicU64::new(0));
    let mut counter = Counter(Arc::clone(&steps));

    let handle = {
        let control = control.clone();
        thread::spawn(move || {
            let stats = trainer.run(&mut env, &mut agent, &control, &mut counter);
            (stats, agent)
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(steps.load(Ordering::SeqCst) > 0, "training is making progress");

    control.pause();
    thread::sleep(Duration::from_millis(50));
    let paused_at = steps.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(steps.load(Ordering::SeqCst), paused_at, "no steps while paused");

    control.resume();
    thread::sleep(Duration::from_millis(50));
    assert!(steps.load(Ordering::SeqCst) > paused_at, "progress after resume");

    let stopped = Instant::now();
    control.stop();
    let (stats, agent) = handle.join().unwrap();
    assert!(stopped.elapsed() < Duration::from_secs(5), "stop is prompt");

    let stats = stats.unwrap();
    assert!(stats.stopped, "run reports the stop");
    assert_eq!(stats.total_steps, steps.load(Ordering::SeqCst), "counts agree");
    assert!(!agent.q_table().is_empty(), "learned values survive a stop");
}
