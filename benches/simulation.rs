//! Benchmarks for the localization pipeline
//!
//! Measures SI simulation, the observation-aware centrality measures and
//! AUC evaluation on square lattices of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use epiloc::{
    auc_score, contact, observe, observed_betweenness, AdjacencyGraph, EpidemicSimulator,
    GraphView, SimulationConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Square lattice, nodes numbered row by row
fn create_lattice(side: usize) -> AdjacencyGraph<usize> {
    let mut graph = AdjacencyGraph::new();
    for i in 0..side {
        for j in 0..side {
            let node = i * side + j;
            graph.add_node(node);
            if j < side - 1 {
                graph.add_edge(node, node + 1);
            }
            if i < side - 1 {
                graph.add_edge(node, node + side);
            }
        }
    }
    graph
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("si_simulation");

    for side in [10usize, 20, 40].iter() {
        let graph = create_lattice(*side);
        let sim = EpidemicSimulator::new(
            SimulationConfig::new(0.2)
                .with_initial_infected(3)
                .with_max_infected_frac(0.5),
        );

        group.throughput(Throughput::Elements(graph.size() as u64));
        group.bench_with_input(BenchmarkId::new("lattice", graph.size()), &graph, |b, graph| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| {
                let outcome = sim.run(graph, &mut rng).unwrap();
                black_box(outcome.infected.len());
            });
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    for side in [10usize, 20].iter() {
        let graph = create_lattice(*side);
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = EpidemicSimulator::new(SimulationConfig::new(0.3).with_max_infected_frac(0.3))
            .run(&graph, &mut rng)
            .unwrap();
        let observed = observe(&outcome.infected, 0.5, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("contact", graph.size()), &graph, |b, graph| {
            b.iter(|| black_box(contact(graph, &observed).unwrap()));
        });

        group.bench_with_input(
            BenchmarkId::new("observed_betweenness", graph.size()),
            &graph,
            |b, graph| {
                b.iter(|| black_box(observed_betweenness(graph, &observed).unwrap()));
            },
        );

        let scores = contact(&graph, &observed).unwrap();
        group.bench_with_input(BenchmarkId::new("auc", graph.size()), &scores, |b, scores| {
            b.iter(|| black_box(auc_score(&outcome.infected, scores, &observed)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulation, bench_scoring);
criterion_main!(benches);
