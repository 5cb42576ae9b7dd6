//! Suspicion scores for source localization
//!
//! Every measure maps each graph node to a real score; higher means "more
//! likely infected". Two measures look only at structure ([`Degree`],
//! [`Betweenness`]); the other two use the observed infections:
//!
//! - [`Contact`]: fraction of a node's neighbors that were observed infected.
//! - [`ObservedBetweenness`]: betweenness counted only over shortest paths
//!   whose endpoints were both observed infected.
//!
//! Betweenness uses Brandes' accumulation on the undirected, unweighted
//! graph. Conventions:
//! - [`Betweenness`] is normalized by `2 / ((n - 1)(n - 2))` (0 for n <= 2).
//! - [`ObservedBetweenness`] is unnormalized. Each unordered pair of distinct
//!   observed nodes counts once, endpoints are never credited for their own
//!   pair, and nodes outside the observed set can still score.

use crate::error::{LocalizationError, Result};
use crate::graph::{GraphView, Node, NodeSet};
use crate::scores::ScoreMap;
use std::collections::{HashMap, VecDeque};

/// Pluggable node scoring
pub trait CentralityMeasure<N: Node> {
    /// Short name used in reports
    fn name(&self) -> &str;

    /// Score every node of `graph`. Structural measures ignore `observed`.
    fn scores(&self, graph: &dyn GraphView<N>, observed: &NodeSet<N>) -> Result<ScoreMap<N>>;
}

/// Degree normalized by `|V| - 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct Degree;

/// Fraction of neighbors observed infected
#[derive(Debug, Clone, Copy, Default)]
pub struct Contact;

/// Unrestricted betweenness
#[derive(Debug, Clone, Copy, Default)]
pub struct Betweenness;

/// Betweenness over observed-to-observed shortest paths
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservedBetweenness;

impl<N: Node> CentralityMeasure<N> for Degree {
    fn name(&self) -> &str {
        "degree"
    }

    fn scores(&self, graph: &dyn GraphView<N>, _observed: &NodeSet<N>) -> Result<ScoreMap<N>> {
        degree(graph)
    }
}

impl<N: Node> CentralityMeasure<N> for Contact {
    fn name(&self) -> &str {
        "contact"
    }

    fn scores(&self, graph: &dyn GraphView<N>, observed: &NodeSet<N>) -> Result<ScoreMap<N>> {
        contact(graph, observed)
    }
}

impl<N: Node> CentralityMeasure<N> for Betweenness {
    fn name(&self) -> &str {
        "betweenness"
    }

    fn scores(&self, graph: &dyn GraphView<N>, _observed: &NodeSet<N>) -> Result<ScoreMap<N>> {
        betweenness(graph)
    }
}

impl<N: Node> CentralityMeasure<N> for ObservedBetweenness {
    fn name(&self) -> &str {
        "observed_betweenness"
    }

    fn scores(&self, graph: &dyn GraphView<N>, observed: &NodeSet<N>) -> Result<ScoreMap<N>> {
        observed_betweenness(graph, observed)
    }
}

/// Number of neighbors over `|V| - 1`. Self-loops are not counted, so
/// scores stay in [0, 1]. A single-node graph scores 1.0.
pub fn degree<N, G>(graph: &G) -> Result<ScoreMap<N>>
where
    N: Node,
    G: GraphView<N> + ?Sized,
{
    let n = graph.size();
    if n == 0 {
        return Err(LocalizationError::EmptyGraph);
    }
    if n == 1 {
        return Ok(ScoreMap::from_fn(graph, |_| 1.0));
    }

    let others = (n - 1) as f64;
    Ok(ScoreMap::from_fn(graph, |node| {
        let neighbors = graph.neighbors(node).unwrap_or_default();
        let count = neighbors.iter().filter(|nb| *nb != node).count();
        count as f64 / others
    }))
}

/// Observed-infected neighbors over all neighbors; 0.0 for isolated nodes.
pub fn contact<N, G>(graph: &G, observed: &NodeSet<N>) -> Result<ScoreMap<N>>
where
    N: Node,
    G: GraphView<N> + ?Sized,
{
    if graph.size() == 0 {
        return Err(LocalizationError::EmptyGraph);
    }

    Ok(ScoreMap::from_fn(graph, |node| {
        let neighbors = graph.neighbors(node).unwrap_or_default();
        if neighbors.is_empty() {
            return 0.0;
        }
        let hits = neighbors.iter().filter(|nb| observed.contains(nb)).count();
        hits as f64 / neighbors.len() as f64
    }))
}

/// Normalized betweenness over all shortest paths.
pub fn betweenness<N, G>(graph: &G) -> Result<ScoreMap<N>>
where
    N: Node,
    G: GraphView<N> + ?Sized,
{
    let n = graph.size();
    if n == 0 {
        return Err(LocalizationError::EmptyGraph);
    }

    let indexed = IndexedGraph::new(graph);
    let sources: Vec<usize> = (0..n).collect();
    let is_target = vec![true; n];
    let raw = indexed.accumulate(&sources, &is_target);

    // Raw sums count each unordered pair twice.
    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        0.0
    };
    Ok(indexed.into_scores(graph, raw, scale))
}

/// Unnormalized betweenness over shortest paths between observed nodes.
/// Observed nodes missing from the graph are ignored.
pub fn observed_betweenness<N, G>(graph: &G, observed: &NodeSet<N>) -> Result<ScoreMap<N>>
where
    N: Node,
    G: GraphView<N> + ?Sized,
{
    let n = graph.size();
    if n == 0 {
        return Err(LocalizationError::EmptyGraph);
    }

    let indexed = IndexedGraph::new(graph);
    let sources: Vec<usize> = observed
        .iter()
        .filter_map(|node| indexed.index.get(node).copied())
        .collect();
    let mut is_target = vec![false; n];
    for &s in &sources {
        is_target[s] = true;
    }

    let raw = indexed.accumulate(&sources, &is_target);
    Ok(indexed.into_scores(graph, raw, 0.5))
}

/// Dense index over a graph view for the BFS passes
struct IndexedGraph<'a, N: Node> {
    index: HashMap<&'a N, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl<'a, N: Node> IndexedGraph<'a, N> {
    fn new<G: GraphView<N> + ?Sized>(graph: &'a G) -> Self {
        let nodes = graph.nodes();
        let index: HashMap<&N, usize> = nodes.iter().enumerate().map(|(i, n)| (n, i)).collect();

        let adjacency = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                graph
                    .neighbors(node)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|nb| index.get(nb).copied())
                    .filter(|&j| j != i)
                    .collect()
            })
            .collect();

        Self { index, adjacency }
    }

    /// Brandes dependency accumulation from `sources`, crediting only paths
    /// that end at a node flagged in `is_target`. Returns raw directed sums.
    fn accumulate(&self, sources: &[usize], is_target: &[bool]) -> Vec<f64> {
        let n = self.adjacency.len();
        let mut betweenness = vec![0.0; n];

        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist: Vec<i64> = vec![-1; n];
        let mut delta = vec![0.0f64; n];
        let mut queue = VecDeque::new();

        for &s in sources {
            stack.clear();
            for p in pred.iter_mut() {
                p.clear();
            }
            sigma.iter_mut().for_each(|x| *x = 0.0);
            dist.iter_mut().for_each(|d| *d = -1);
            delta.iter_mut().for_each(|x| *x = 0.0);

            sigma[s] = 1.0;
            dist[s] = 0;
            queue.push_back(s);

            while let Some(v) = queue.pop_front() {
                stack.push(v);
                for &w in &self.adjacency[v] {
                    if dist[w] < 0 {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        pred[w].push(v);
                    }
                }
            }

            while let Some(w) = stack.pop() {
                let coeff = if is_target[w] && w != s {
                    (1.0 + delta[w]) / sigma[w]
                } else {
                    delta[w] / sigma[w]
                };
                for &v in &pred[w] {
                    delta[v] += sigma[v] * coeff;
                }
                if w != s {
                    betweenness[w] += delta[w];
                }
            }
        }

        betweenness
    }

    fn into_scores<G: GraphView<N> + ?Sized>(
        self,
        graph: &G,
        raw: Vec<f64>,
        scale: f64,
    ) -> ScoreMap<N> {
        ScoreMap::from_fn(graph, |node| raw[self.index[node]] * scale)
    }
}
