//! epiloc: Epidemic Source Localization Benchmarks
//!
//! Core library for simulating SI epidemics on networks, sampling partial
//! observations of the infected population, and scoring how well
//! centrality-based rankings recover the hidden infections.
//!
//! Pipeline: [`EpidemicSimulator`] → [`ObservationSampler`] →
//! [`CentralityMeasure`] → [`RankingEvaluator`].
//!
//! ```
//! use epiloc::{auc_score, contact, AdjacencyGraph, EpidemicSimulator, SimulationConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let graph = AdjacencyGraph::from_edges((0..20u32).map(|i| (i, (i + 1) % 20)));
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let sim = EpidemicSimulator::new(SimulationConfig::new(0.5).with_max_infected_frac(0.5));
//! let outcome = sim.run(&graph, &mut rng).unwrap();
//! let observed = epiloc::observe(&outcome.infected, 0.5, &mut rng).unwrap();
//!
//! let scores = contact(&graph, &observed).unwrap();
//! match auc_score(&outcome.infected, &scores, &observed) {
//!     Ok(result) => assert!((0.0..=1.0).contains(&result.auc)),
//!     Err(e) => println!("undefined: {}", e),
//! }
//! ```

pub mod centrality;
pub mod epidemic;
pub mod error;
pub mod evaluation;
pub mod experiment;
pub mod graph;
pub mod observation;
pub mod scores;
pub mod telemetry;

pub use centrality::{
    betweenness, contact, degree, observed_betweenness, Betweenness, CentralityMeasure, Contact,
    Degree, ObservedBetweenness,
};
pub use epidemic::{EpidemicSimulator, SimulationConfig, SimulationOutcome, Termination};
pub use error::{LocalizationError, Result};
pub use evaluation::{auc_score, roc_auc, roc_curve, EvaluationResult, RankingEvaluator, RocCurve, RocPoint};
pub use experiment::{run_experiment, run_trial, ExperimentConfig, ExperimentReport};
pub use graph::{AdjacencyGraph, GraphView, Node, NodeSet};
pub use observation::{observe, ObservationSampler};
pub use scores::ScoreMap;
