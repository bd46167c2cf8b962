//! Property tests over randomly generated graphs.

use cascadia_core::{
    CascadeEngine, CascadeModel, Probability, SeedSelector, SeedStrategy, SirCascade,
    SweepBuilder, ThresholdCascade, ThresholdDistribution, erdos_renyi,
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

fn strategy() -> impl Strategy<Value = SeedStrategy> {
    prop_oneof![
        Just(SeedStrategy::Random),
        Just(SeedStrategy::Degree),
        Just(SeedStrategy::Eigen),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ranked_seed_sets_are_prefixes(
        nodes in 2_usize..60,
        p in 0.0_f64..0.3,
        graph_seed in any::<u64>(),
        ranked in prop_oneof![Just(SeedStrategy::Degree), Just(SeedStrategy::Eigen)],
    ) {
        let mut rng = SmallRng::seed_from_u64(graph_seed);
        let view = erdos_renyi(nodes, p, &mut rng).expect("probability is valid").adjacency();
        let selector = SeedSelector::new(ranked);
        let mut previous = Vec::new();
        for k in 1..=nodes.min(10) {
            let seeds = selector.select(k, &view, &mut rng).expect("k fits the graph");
            prop_assert_eq!(&seeds[..k - 1], previous.as_slice());
            previous = seeds;
        }
    }

    #[test]
    fn sweep_cascades_stay_in_unit_interval(
        nodes in 1_usize..40,
        p in 0.0_f64..0.4,
        c in 0.0_f64..=1.0,
        dist in 1_u8..=6,
        threshold_model in any::<bool>(),
        seed in any::<u64>(),
        strategy in strategy(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let view = erdos_renyi(nodes, p, &mut rng).expect("probability is valid").adjacency();
        let model = if threshold_model {
            let distribution = ThresholdDistribution::from_type(dist).expect("id is supported");
            CascadeModel::Threshold { thresholds: distribution.generate(nodes, &mut rng) }
        } else {
            CascadeModel::Sir { transmission: Probability::new(c).expect("c is valid") }
        };
        let max_seeds = nodes.min(4);
        let curve = SweepBuilder::new()
            .with_max_seeds(max_seeds)
            .with_repeats(3)
            .build()
            .expect("configuration is valid")
            .run(&view, &model, strategy, &mut rng)
            .expect("sweep must succeed");
        prop_assert_eq!(curve.len(), max_seeds);
        for point in &curve {
            prop_assert!((0.0..=1.0).contains(&point.cascade()));
            prop_assert!(point.cascade() * nodes as f64 >= point.seed_size() as f64 - 1e-9);
        }
    }

    #[test]
    fn threshold_cascade_reaches_a_fixed_point(
        nodes in 1_usize..80,
        p in 0.0_f64..0.3,
        dist in 1_u8..=6,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let view = erdos_renyi(nodes, p, &mut rng).expect("probability is valid").adjacency();
        let thresholds = ThresholdDistribution::from_type(dist)
            .expect("id is supported")
            .generate(nodes, &mut rng);
        let mut engine = ThresholdCascade::new(thresholds.clone());
        let informed = engine.spread(&view, &[0], &mut rng).expect("run must succeed");
        prop_assert!(engine.rounds() < nodes.max(1));
        prop_assert!(informed >= 1 && informed <= nodes);

        // Re-running from the same seed is deterministic.
        let mut again = ThresholdCascade::new(thresholds);
        prop_assert_eq!(again.spread(&view, &[0], &mut rng).expect("run must succeed"), informed);
    }

    #[test]
    fn sir_informs_at_least_the_seeds(
        nodes in 1_usize..60,
        p in 0.0_f64..0.3,
        c in 0.0_f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let view = erdos_renyi(nodes, p, &mut rng).expect("probability is valid").adjacency();
        let seeds = SeedSelector::new(SeedStrategy::Random)
            .select(nodes.min(3), &view, &mut rng)
            .expect("seed count fits");
        let mut engine = SirCascade::new(Probability::new(c).expect("c is valid"));
        let informed = engine.spread(&view, &seeds, &mut rng).expect("run must succeed");
        prop_assert!(informed >= seeds.len() && informed <= nodes);
        prop_assert_eq!(engine.informed().len(), informed);
        prop_assert_eq!(&engine.informed()[..seeds.len()], seeds.as_slice());
    }
}
