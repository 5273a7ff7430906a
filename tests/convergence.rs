use qgrid::{
    algo::{QTableAgent, QTableAgentConfig},
    env::DiscreteActionSpace,
    gym::{GridConfig, GridWorld, Move, Position},
    train::{evaluate, Control, TrainConfig, Trainer},
};

const EPISODES: u32 = 500;

fn train(config: GridConfig, seed: u64) -> (GridWorld, QTableAgent<Position, Move>) {
    let mut env = GridWorld::new(config).unwrap();
    let mut agent = QTableAgent::new(
        env.actions(),
        QTableAgentConfig {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.6,
            seed: Some(seed),
        },
    )
    .unwrap();
    let mut trainer = Trainer::new(TrainConfig {
        episodes: EPISODES,
        ..Default::default()
    });

    let stats = trainer
        .run(&mut env, &mut agent, &Control::new(), &mut ())
        .unwrap();
    assert_eq!(stats.episodes, EPISODES, "every episode finished");
    assert!((stats.epsilon - 0.05).abs() < 1e-6, "epsilon decayed to its floor");

    (env, agent)
}

#[test]
fn greedy_policy_takes_the_shortest_path() {
    let (mut env, mut agent) = train(GridConfig::default(), 2024);

    let eval = evaluate(&mut env, &mut agent, 50);
    assert!(eval.reached_terminal, "goal reached");
    assert_eq!(eval.steps, 8, "manhattan distance from (0,0) to (4,4)");
    assert_eq!(eval.path.first(), Some(&Position::new(0, 0)));
    assert_eq!(eval.path.last(), Some(&Position::new(4, 4)));
    assert!(
        eval.path.windows(2).all(|w| w[0].manhattan(&w[1]) == 1),
        "every step moves exactly one cell"
    );

    let again = evaluate(&mut env, &mut agent, 50);
    assert_eq!(eval, again, "greedy rollouts are deterministic");
}

#[test]
fn q_table_rows_stay_complete() {
    let (_, agent) = train(GridConfig::default(), 7);
    let table = agent.q_table();
    assert!(table.len() <= 25, "at most one row per cell");
    assert!(table.len() > 1, "more than the start was visited");
    for state in table.states() {
        let row = table.row(state).unwrap();
        assert_eq!(row.len(), agent.actions().len(), "row for {state} has every action");
        assert!(row.iter().all(|v| v.is_finite()), "row for {state} is finite");
    }
}

#[test]
fn greedy_policy_goes_around_hazards() {
    let wall = (0..4).map(|y| Position::new(1, y));
    let (mut env, mut agent) = train(
        GridConfig {
            danger: wall.collect(),
            ..Default::default()
        },
        11,
    );

    env.reset_hazard();
    let eval = evaluate(&mut env, &mut agent, 50);
    assert!(eval.reached_terminal, "goal reached");
    assert!(!eval.hazard_visited, "wall avoided");
    assert_eq!(eval.steps, 8, "the gap at (1,4) keeps the path shortest");
    assert!(eval.path.contains(&Position::new(1, 4)), "went through the gap");
}
