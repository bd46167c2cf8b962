//! Behavioural tests for the cascade engines and sweeps on hand-checkable graphs.

mod common;

use cascadia_core::{
    CascadeEngine, CascadeModel, Probability, SeedStrategy, SirCascade, SweepBuilder,
    ThresholdCascade, erdos_renyi,
};
use cascadia_test_support::graphs::{complete, path, star, triangle_edge_isolate};
use common::{uniform_thresholds, view};
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};

#[fixture]
fn rng() -> SmallRng {
    SmallRng::seed_from_u64(2024)
}

#[rstest]
fn sir_with_certain_transmission_covers_the_path(mut rng: SmallRng) {
    let mut engine = SirCascade::new(Probability::ONE);
    let informed = engine
        .spread(&view(path(5)), &[0], &mut rng)
        .expect("run must succeed");
    assert_eq!(informed, 5);
}

#[rstest]
fn threshold_with_zero_thresholds_covers_the_path(mut rng: SmallRng) {
    let mut engine = ThresholdCascade::new(uniform_thresholds(5, 0.0));
    let informed = engine
        .spread(&view(path(5)), &[2], &mut rng)
        .expect("run must succeed");
    assert_eq!(informed, 5);
}

#[rstest]
fn threshold_rounds_never_exceed_node_count(mut rng: SmallRng) {
    let graph = erdos_renyi(150, 0.03, &mut rng).expect("generation must succeed");
    let view = graph.adjacency();
    let thresholds = cascadia_core::ThresholdDistribution::Uniform.generate(150, &mut rng);
    let mut engine = ThresholdCascade::new(thresholds);
    let informed = engine
        .spread(&view, &[0, 1, 2, 3, 4], &mut rng)
        .expect("run must succeed");
    assert!(informed >= 5);
    assert!(engine.rounds() <= 150);
}

#[rstest]
#[case::sir(CascadeModel::Sir { transmission: Probability::ONE })]
#[case::threshold(CascadeModel::Threshold { thresholds: uniform_thresholds(6, 0.0) })]
fn isolated_sole_seed_yields_one_over_n(#[case] model: CascadeModel, mut rng: SmallRng) {
    // Node 5 is the only isolated node.
    let view = view(triangle_edge_isolate());
    let informed = match &model {
        CascadeModel::Sir { transmission } => SirCascade::new(*transmission)
            .spread(&view, &[5], &mut rng)
            .expect("run must succeed"),
        CascadeModel::Threshold { thresholds } => ThresholdCascade::new(thresholds.clone())
            .spread(&view, &[5], &mut rng)
            .expect("run must succeed"),
    };
    assert_eq!(informed as f64 / 6.0, 1.0 / 6.0);
}

#[rstest]
#[case::sir(CascadeModel::Sir { transmission: Probability::ZERO })]
#[case::threshold(CascadeModel::Threshold { thresholds: uniform_thresholds(5, 1.0) })]
fn seeding_all_nodes_gives_full_cascade(
    #[case] model: CascadeModel,
    #[values(SeedStrategy::Random, SeedStrategy::Degree, SeedStrategy::Eigen)]
    strategy: SeedStrategy,
    mut rng: SmallRng,
) {
    let view = view(star(4));
    let curve = SweepBuilder::new()
        .with_max_seeds(5)
        .with_repeats(4)
        .build()
        .expect("configuration is valid")
        .run(&view, &model, strategy, &mut rng)
        .expect("sweep must succeed");
    assert_eq!(curve.cascade_at(5), Some(1.0));
}

#[rstest]
fn degree_sweep_seeds_the_star_centre_first(mut rng: SmallRng) {
    // With c = 1 the centre alone reaches every leaf.
    let model = CascadeModel::Sir {
        transmission: Probability::ONE,
    };
    let curve = SweepBuilder::new()
        .with_max_seeds(3)
        .with_repeats(2)
        .build()
        .expect("configuration is valid")
        .run(&view(star(6)), &model, SeedStrategy::Degree, &mut rng)
        .expect("sweep must succeed");
    assert!(curve.iter().all(|point| point.cascade() == 1.0));
}

#[rstest]
fn sir_cascade_grows_with_transmission(mut rng: SmallRng) {
    let graph = erdos_renyi(200, 0.02, &mut rng).expect("generation must succeed");
    let view = graph.adjacency();
    let mean_for = |c: f64, rng: &mut SmallRng| {
        let mut engine = SirCascade::new(Probability::new(c).expect("probability is valid"));
        let total: usize = (0..200)
            .map(|_| {
                engine
                    .spread(&view, &[0, 50, 100], rng)
                    .expect("run must succeed")
            })
            .sum();
        total as f64 / 200.0
    };
    let low = mean_for(0.05, &mut rng);
    let high = mean_for(0.6, &mut rng);
    assert!(high > low, "expected {high} > {low}");
}

#[rstest]
fn complete_graph_threshold_cascade_needs_one_round(mut rng: SmallRng) {
    // Every other node sees 1 of 4 neighbours informed: 0.25 > 0.2.
    let mut engine = ThresholdCascade::new(uniform_thresholds(5, 0.2));
    let informed = engine
        .spread(&view(complete(5)), &[0], &mut rng)
        .expect("run must succeed");
    assert_eq!(informed, 5);
    assert_eq!(engine.rounds(), 1);
}
