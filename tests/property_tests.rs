//! Property-based tests for epiloc
//!
//! Uses proptest to check the simulation, sampling, scoring and evaluation
//! invariants over randomly generated graphs and parameters.

use epiloc::{
    contact, degree, observe, roc_auc, AdjacencyGraph, EpidemicSimulator, GraphView,
    LocalizationError, NodeSet, SimulationConfig,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Strategies
// ============================================================================

/// Random undirected graph on 2..=20 nodes from an upper-triangular edge mask.
/// Every node is present even when isolated.
fn graph_strategy() -> impl Strategy<Value = AdjacencyGraph<u32>> {
    (2usize..=20).prop_flat_map(|n| {
        proptest::collection::vec(proptest::bool::weighted(0.25), n * (n - 1) / 2).prop_map(
            move |mask| {
                let mut graph = AdjacencyGraph::new();
                for i in 0..n as u32 {
                    graph.add_node(i);
                }
                let mut k = 0;
                for i in 0..n as u32 {
                    for j in (i + 1)..n as u32 {
                        if mask[k] {
                            graph.add_edge(i, j);
                        }
                        k += 1;
                    }
                }
                graph
            },
        )
    })
}

/// Connected graph: a random spanning path plus random chords.
fn connected_graph_strategy() -> impl Strategy<Value = AdjacencyGraph<u32>> {
    (2usize..=20).prop_flat_map(|n| {
        proptest::collection::vec((0..n as u32, 0..n as u32), 0..n).prop_map(move |chords| {
            let mut graph = AdjacencyGraph::from_edges((1..n as u32).map(|i| (i - 1, i)));
            for (a, b) in chords {
                graph.add_edge(a, b);
            }
            graph
        })
    })
}

fn labels_and_scores() -> impl Strategy<Value = (Vec<bool>, Vec<f64>)> {
    (1usize..40).prop_flat_map(|n| {
        (
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(0.0..1.0f64, n),
        )
    })
}

// ============================================================================
// Simulation properties
// ============================================================================

proptest! {
    #[test]
    fn infected_is_subset_of_graph_and_grows(
        graph in graph_strategy(),
        beta in 0.0..=1.0f64,
        rounds in 0usize..8,
        seed in any::<u64>(),
    ) {
        let sim = EpidemicSimulator::new(SimulationConfig::new(beta).with_max_iterations(rounds));
        let outcome = sim.run(&graph, &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert!(outcome.infected.iter().all(|n| graph.contains(n)));
        prop_assert!(outcome.rounds <= rounds);
        prop_assert_eq!(outcome.growth.len(), outcome.rounds);

        let mut previous = outcome.seeds.len();
        for &size in &outcome.growth {
            prop_assert!(size >= previous);
            previous = size;
        }
        prop_assert_eq!(previous, outcome.infected.len());
    }

    #[test]
    fn infection_cap_is_respected(
        graph in graph_strategy(),
        beta in 0.0..=1.0f64,
        frac in 0.1..=1.0f64,
        seed in any::<u64>(),
    ) {
        let cap = (frac * graph.size() as f64).floor() as usize;
        prop_assume!(cap >= 1);

        let sim = EpidemicSimulator::new(SimulationConfig::new(beta).with_max_infected_frac(frac));
        let outcome = sim.run(&graph, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(outcome.infected.len() <= cap);
    }

    #[test]
    fn zero_beta_keeps_seed(
        graph in graph_strategy(),
        k in 1usize..=2,
        rounds in 0usize..5,
        seed in any::<u64>(),
    ) {
        let sim = EpidemicSimulator::new(
            SimulationConfig::new(0.0).with_initial_infected(k).with_max_iterations(rounds),
        );
        let outcome = sim.run(&graph, &mut StdRng::seed_from_u64(seed)).unwrap();
        let seeds: NodeSet<u32> = outcome.seeds.iter().cloned().collect();
        prop_assert_eq!(seeds.len(), k);
        prop_assert_eq!(outcome.infected, seeds);
    }

    #[test]
    fn full_transmission_reaches_every_node(
        graph in connected_graph_strategy(),
        seed in any::<u64>(),
    ) {
        let sim = EpidemicSimulator::new(SimulationConfig::new(1.0));
        let outcome = sim.run(&graph, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(outcome.infected.len(), graph.size());
    }

    #[test]
    fn too_many_seeds_is_configuration_error(graph in graph_strategy(), extra in 1usize..5) {
        let sim = EpidemicSimulator::new(
            SimulationConfig::new(0.5).with_initial_infected(graph.size() + extra),
        );
        let result = sim.run(&graph, &mut StdRng::seed_from_u64(0));
        prop_assert!(matches!(result, Err(LocalizationError::Configuration(_))));
    }
}

// ============================================================================
// Observation properties
// ============================================================================

proptest! {
    #[test]
    fn observation_limits(nodes in proptest::collection::vec(any::<u32>(), 0..50), seed in any::<u64>()) {
        let infected: NodeSet<u32> = nodes.into_iter().collect();
        let mut rng = StdRng::seed_from_u64(seed);

        prop_assert!(observe(&infected, 0.0, &mut rng).unwrap().is_empty());
        prop_assert_eq!(observe(&infected, 1.0, &mut rng).unwrap(), infected.clone());
    }

    #[test]
    fn observed_is_subset_of_infected(
        nodes in proptest::collection::vec(any::<u32>(), 0..50),
        p in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let infected: NodeSet<u32> = nodes.into_iter().collect();
        let observed = observe(&infected, p, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(observed.is_subset(&infected));
    }
}

// ============================================================================
// Centrality and evaluation properties
// ============================================================================

proptest! {
    #[test]
    fn degree_in_unit_interval(graph in graph_strategy()) {
        let scores = degree(&graph).unwrap();
        prop_assert_eq!(scores.len(), graph.size());
        for (_, s) in scores.iter() {
            prop_assert!((0.0..=1.0).contains(&s), "degree score {}", s);
        }
    }

    #[test]
    fn contact_total_and_bounded(graph in graph_strategy(), mask in proptest::collection::vec(any::<bool>(), 20)) {
        let observed: NodeSet<u32> = graph
            .nodes()
            .iter()
            .filter(|n| mask[**n as usize])
            .cloned()
            .collect();
        let scores = contact(&graph, &observed).unwrap();

        prop_assert_eq!(scores.len(), graph.size());
        for (node, s) in scores.iter() {
            prop_assert!((0.0..=1.0).contains(&s));
            if graph.neighbors(node).unwrap().is_empty() {
                prop_assert_eq!(s, 0.0);
            }
        }
    }

    #[test]
    fn auc_in_unit_interval_or_degenerate((labels, scores) in labels_and_scores()) {
        let positives = labels.iter().filter(|&&l| l).count();
        match roc_auc(&labels, &scores) {
            Ok(auc) => {
                prop_assert!(positives > 0 && positives < labels.len());
                prop_assert!((0.0..=1.0).contains(&auc));
            }
            Err(LocalizationError::DegenerateEvaluation { .. }) => {
                prop_assert!(positives == 0 || positives == labels.len());
            }
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }

    #[test]
    fn roc_area_matches_auc((labels, scores) in labels_and_scores()) {
        if let Ok(auc) = roc_auc(&labels, &scores) {
            let curve = epiloc::roc_curve(&labels, &scores, true).unwrap();
            prop_assert!((curve.area() - auc).abs() < 1e-9);
            let thresholds = curve.thresholds();
            prop_assert!(thresholds.windows(2).all(|w| w[0] > w[1]));
        }
    }
}
