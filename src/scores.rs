//! Total node → score mapping
//!
//! A [`ScoreMap`] always covers every node of the graph it was built from.
//! Construction fails instead of leaving a node without a score, so the
//! evaluator never meets a missing key.

use crate::error::{LocalizationError, Result};
use crate::graph::{GraphView, Node};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMap<N: Node> {
    /// Domain, in graph order
    nodes: Vec<N>,
    values: HashMap<N, f64>,
}

impl<N: Node> ScoreMap<N> {
    /// Score every graph node with `score`.
    pub fn from_fn<G, F>(graph: &G, mut score: F) -> Self
    where
        G: GraphView<N> + ?Sized,
        F: FnMut(&N) -> f64,
    {
        let nodes = graph.nodes().to_vec();
        let values = nodes.iter().map(|n| (n.clone(), score(n))).collect();
        Self { nodes, values }
    }

    /// Adopt precomputed scores. Every graph node must have an entry and
    /// every entry must be a graph node.
    pub fn try_from_map<G>(graph: &G, mut values: HashMap<N, f64>) -> Result<Self>
    where
        G: GraphView<N> + ?Sized,
    {
        let missing = graph
            .nodes()
            .iter()
            .filter(|n| !values.contains_key(*n))
            .count();
        if missing > 0 {
            return Err(LocalizationError::IncompleteScores { missing });
        }
        if values.len() != graph.size() {
            values.retain(|n, _| !graph.contains(n));
            let stray = values.keys().next();
            return Err(LocalizationError::config(format!(
                "score map has {} node(s) outside the graph, e.g. {:?}",
                values.len(),
                stray
            )));
        }
        Ok(Self {
            nodes: graph.nodes().to_vec(),
            values,
        })
    }

    pub fn get(&self, node: &N) -> Option<f64> {
        self.values.get(node).copied()
    }

    /// Nodes of the domain, in graph order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(node, score)` pairs in graph order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, f64)> + '_ {
        self.nodes.iter().map(move |n| (n, self.values[n]))
    }

    /// Nodes sorted by descending score; ties keep graph order.
    pub fn ranking(&self) -> Vec<(N, f64)> {
        let mut ranked: Vec<(N, f64)> = self.iter().map(|(n, s)| (n.clone(), s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// The `k` most suspicious nodes.
    pub fn top_k(&self, k: usize) -> Vec<(N, f64)> {
        let mut ranked = self.ranking();
        ranked.truncate(k);
        ranked
    }
}
