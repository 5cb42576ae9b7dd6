//! Graph capability consumed by the simulator and the centrality measures.
//!
//! The pipeline only ever needs three things from a network: its node set,
//! neighbor lookup and size. [`GraphView`] captures exactly that so callers
//! can plug in their own storage. [`AdjacencyGraph`] is the in-crate
//! implementation used by tests, benches and the experiment binary.
//!
//! Node order matters for reproducibility: with a seeded RNG, a run is only
//! repeatable when every collection it walks has a stable order. Both
//! [`AdjacencyGraph`] and [`NodeSet`] therefore keep insertion order next to
//! their hash index.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Opaque node identifier. The graph attaches no meaning to it.
pub trait Node: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> Node for T {}

/// Read-only view of an undirected graph.
///
/// Implementations must not change while a call borrows them.
pub trait GraphView<N: Node> {
    /// All nodes, in a stable order.
    fn nodes(&self) -> &[N];

    /// Neighbors of `node`, or `None` if the node is not in the graph.
    fn neighbors(&self, node: &N) -> Option<&[N]>;

    /// Number of nodes.
    fn size(&self) -> usize {
        self.nodes().len()
    }

    fn contains(&self, node: &N) -> bool {
        self.neighbors(node).is_some()
    }
}

/// Undirected adjacency-list graph with stable node order.
///
/// Parallel edges are collapsed. A self-loop lists the node once among its
/// own neighbors.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<N: Node> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    adjacency: Vec<Vec<N>>,
    edge_count: usize,
}

impl<N: Node> Default for AdjacencyGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> AdjacencyGraph<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }

    /// Build a graph from an edge list. Endpoints are added as nodes in order
    /// of first appearance.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Add a node. Returns false if it was already present.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }
        self.index.insert(node.clone(), self.nodes.len());
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        true
    }

    /// Add an undirected edge, inserting missing endpoints.
    /// Returns false if the edge already existed.
    pub fn add_edge(&mut self, a: N, b: N) -> bool {
        self.add_node(a.clone());
        self.add_node(b.clone());

        let ia = self.index[&a];
        if self.adjacency[ia].contains(&b) {
            return false;
        }
        self.adjacency[ia].push(b.clone());
        if a != b {
            let ib = self.index[&b];
            self.adjacency[ib].push(a);
        }
        self.edge_count += 1;
        true
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn degree(&self, node: &N) -> Option<usize> {
        self.neighbors(node).map(|n| n.len())
    }
}

impl<N: Node> GraphView<N> for AdjacencyGraph<N> {
    fn nodes(&self) -> &[N] {
        &self.nodes
    }

    fn neighbors(&self, node: &N) -> Option<&[N]> {
        self.index.get(node).map(|&i| self.adjacency[i].as_slice())
    }

    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }
}

/// Set of nodes that remembers insertion order.
///
/// Used for infected and observed sets. Equality is set equality and ignores
/// order.
#[derive(Debug, Clone)]
pub struct NodeSet<N: Node> {
    order: Vec<N>,
    members: HashSet<N>,
}

impl<N: Node> Default for NodeSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> NodeSet<N> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Insert a node. Returns false if it was already present.
    pub fn insert(&mut self, node: N) -> bool {
        if self.members.insert(node.clone()) {
            self.order.push(node);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, node: &N) -> bool {
        self.members.contains(node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[N] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<N> {
        self.order
    }

    pub fn is_subset(&self, other: &NodeSet<N>) -> bool {
        self.order.iter().all(|n| other.contains(n))
    }
}

impl<N: Node> PartialEq for NodeSet<N> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<N: Node> Eq for NodeSet<N> {}

impl<N: Node> FromIterator<N> for NodeSet<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<N: Node> Extend<N> for NodeSet<N> {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        for node in iter {
            self.insert(node);
        }
    }
}

impl<'a, N: Node> IntoIterator for &'a NodeSet<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_is_symmetric() {
        let graph = AdjacencyGraph::from_edges(vec![(0, 1), (1, 2)]);
        assert_eq!(graph.size(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(&1), Some(&[0, 2][..]));
        assert_eq!(graph.neighbors(&0), Some(&[1][..]));
        assert_eq!(graph.neighbors(&7), None);
    }

    #[test]
    fn test_parallel_edges_collapse() {
        let mut graph = AdjacencyGraph::new();
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        assert!(!graph.add_edge("b", "a"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(&"a"), Some(1));
    }

    #[test]
    fn test_self_loop_listed_once() {
        let graph = AdjacencyGraph::from_edges(vec![(3, 3), (3, 4)]);
        assert_eq!(graph.neighbors(&3), Some(&[3, 4][..]));
        assert_eq!(graph.neighbors(&4), Some(&[3][..]));
    }

    #[test]
    fn test_isolated_node() {
        let mut graph = AdjacencyGraph::from_edges(vec![(0, 1)]);
        assert!(graph.add_node(9));
        assert!(!graph.add_node(9));
        assert!(graph.contains(&9));
        assert_eq!(graph.degree(&9), Some(0));
        assert_eq!(graph.nodes(), &[0, 1, 9]);
    }

    #[test]
    fn test_node_set_order_and_equality() {
        let a: NodeSet<u32> = vec![3, 1, 2, 1].into_iter().collect();
        let b: NodeSet<u32> = vec![1, 2, 3].into_iter().collect();
        assert_eq!(a.as_slice(), &[3, 1, 2]);
        assert_eq!(a, b);
        assert!(a.is_subset(&b));

        let c: NodeSet<u32> = vec![1, 2].into_iter().collect();
        assert!(c.is_subset(&a));
        assert!(!a.is_subset(&c));
        assert_ne!(a, c);
    }
}
