//! SI (Susceptible-Infected) epidemic simulation
//!
//! Infections are permanent. Every round, each infected node gets one
//! Bernoulli(beta) chance to infect each susceptible neighbor. The run stops
//! when the iteration bound is reached, when the infection cap
//! `floor(max_infected_frac * |V|)` is met, or when the process is absorbed
//! (no susceptible neighbor left to try, or `beta == 0`).
//!
//! All randomness (seeding, per-round shuffling, transmission draws) comes
//! from the caller's RNG, so a seeded `StdRng` reproduces a run exactly.

use crate::error::{check_probability, LocalizationError, Result};
use crate::graph::{GraphView, Node, NodeSet};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Parameters of a single SI run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Per-round, per-contact transmission probability
    pub beta: f64,
    /// Number of initially infected nodes, drawn uniformly without replacement
    pub initial_infected: usize,
    /// Maximum number of rounds (None to ignore)
    pub max_iterations: Option<usize>,
    /// Stop once this fraction of the graph is infected (None to ignore)
    pub max_infected_frac: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            beta: 0.1,
            initial_infected: 1,
            max_iterations: None,
            max_infected_frac: Some(1.0),
        }
    }
}

impl SimulationConfig {
    /// Unbounded run with a single seed
    pub fn new(beta: f64) -> Self {
        Self {
            beta,
            initial_infected: 1,
            max_iterations: None,
            max_infected_frac: None,
        }
    }

    pub fn with_initial_infected(mut self, count: usize) -> Self {
        self.initial_infected = count;
        self
    }

    pub fn with_max_iterations(mut self, rounds: usize) -> Self {
        self.max_iterations = Some(rounds);
        self
    }

    pub fn with_max_infected_frac(mut self, frac: f64) -> Self {
        self.max_infected_frac = Some(frac);
        self
    }

    /// Validate against a graph of `graph_size` nodes.
    pub fn validate(&self, graph_size: usize) -> Result<()> {
        if graph_size == 0 {
            return Err(LocalizationError::EmptyGraph);
        }
        check_probability("beta", self.beta)?;
        if self.initial_infected == 0 || self.initial_infected > graph_size {
            return Err(LocalizationError::config(format!(
                "initial_infected must be in [1, {}], got {}",
                graph_size, self.initial_infected
            )));
        }
        if let Some(frac) = self.max_infected_frac {
            if !(frac > 0.0 && frac <= 1.0) {
                return Err(LocalizationError::config(format!(
                    "max_infected_frac must be in (0, 1], got {}",
                    frac
                )));
            }
        }
        Ok(())
    }

    /// Maximum number of infected nodes for a graph of `graph_size` nodes.
    pub fn infection_cap(&self, graph_size: usize) -> Option<usize> {
        self.max_infected_frac
            .map(|frac| (frac * graph_size as f64).floor() as usize)
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// `max_iterations` rounds were executed
    IterationLimit,
    /// The infected set reached the infection cap
    InfectionCap,
    /// No further infection is possible
    Saturated,
}

/// Result of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationOutcome<N: Node> {
    /// Initially infected nodes
    pub seeds: Vec<N>,
    /// Final infected set
    pub infected: NodeSet<N>,
    /// Number of rounds that changed or could change the infected set.
    /// An absorbed run ([`Termination::Saturated`]) stops counting early, so
    /// this can be below `max_iterations` even when no cap was hit.
    pub rounds: usize,
    /// Infected count after each round
    pub growth: Vec<usize>,
    pub termination: Termination,
}

impl<N: Node> SimulationOutcome<N> {
    pub fn infected_count(&self) -> usize {
        self.infected.len()
    }
}

/// SI epidemic simulator
pub struct EpidemicSimulator {
    config: SimulationConfig,
}

impl EpidemicSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the epidemic from `initial_infected` uniformly drawn seeds.
    pub fn run<N, G, R>(&self, graph: &G, rng: &mut R) -> Result<SimulationOutcome<N>>
    where
        N: Node,
        G: GraphView<N> + ?Sized,
        R: Rng + ?Sized,
    {
        self.config.validate(graph.size())?;

        let seeds: Vec<N> = graph
            .nodes()
            .choose_multiple(rng, self.config.initial_infected)
            .cloned()
            .collect();

        Ok(self.spread(graph, seeds, rng))
    }

    /// Run the epidemic from an explicit seed set. `initial_infected` is
    /// ignored; the seeds must be distinct graph nodes.
    pub fn run_from_seeds<N, G, R>(
        &self,
        graph: &G,
        seeds: &[N],
        rng: &mut R,
    ) -> Result<SimulationOutcome<N>>
    where
        N: Node,
        G: GraphView<N> + ?Sized,
        R: Rng + ?Sized,
    {
        let config = SimulationConfig {
            initial_infected: seeds.len(),
            ..self.config
        };
        config.validate(graph.size())?;

        let mut distinct = NodeSet::with_capacity(seeds.len());
        for seed in seeds {
            if !graph.contains(seed) {
                return Err(LocalizationError::config(format!(
                    "seed {:?} is not a graph node",
                    seed
                )));
            }
            if !distinct.insert(seed.clone()) {
                return Err(LocalizationError::config(format!(
                    "seed {:?} listed twice",
                    seed
                )));
            }
        }

        Ok(self.spread(graph, seeds.to_vec(), rng))
    }

    fn spread<N, G, R>(&self, graph: &G, seeds: Vec<N>, rng: &mut R) -> SimulationOutcome<N>
    where
        N: Node,
        G: GraphView<N> + ?Sized,
        R: Rng + ?Sized,
    {
        let beta = self.config.beta;
        let cap = self.config.infection_cap(graph.size());
        let mut infected: NodeSet<N> = seeds.iter().cloned().collect();
        let mut growth = Vec::new();
        let mut rounds = 0;

        let termination = loop {
            if matches!(self.config.max_iterations, Some(max) if rounds >= max) {
                break Termination::IterationLimit;
            }
            if matches!(cap, Some(cap) if infected.len() >= cap) {
                break Termination::InfectionCap;
            }
            if beta == 0.0 {
                break Termination::Saturated;
            }

            // Fresh order every round so list position never biases spreading.
            let mut order = infected.as_slice().to_vec();
            order.shuffle(rng);

            let mut newly_infected = NodeSet::new();
            let mut attempts = 0usize;

            'round: for node in &order {
                for neighbor in graph.neighbors(node).unwrap_or_default() {
                    if infected.contains(neighbor) || newly_infected.contains(neighbor) {
                        continue;
                    }
                    // Hard stop for the whole round, not just this node.
                    if matches!(cap, Some(cap) if infected.len() + newly_infected.len() >= cap) {
                        break 'round;
                    }
                    attempts += 1;
                    if rng.gen_bool(beta) {
                        newly_infected.insert(neighbor.clone());
                    }
                }
            }

            if attempts == 0 {
                break Termination::Saturated;
            }

            let new_count = newly_infected.len();
            infected.extend(newly_infected.into_vec());
            rounds += 1;
            growth.push(infected.len());

            debug!(
                round = rounds,
                attempts,
                new_infections = new_count,
                infected = infected.len(),
                "SI round complete"
            );
        };

        info!(
            rounds,
            infected = infected.len(),
            graph_size = graph.size(),
            ?termination,
            "Epidemic simulation finished"
        );

        SimulationOutcome {
            seeds,
            infected,
            rounds,
            growth,
            termination,
        }
    }
}
