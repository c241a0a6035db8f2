//! Fixed interaction network.
//!
//! The network is generated once before a run and never changes. Agents are
//! identified by node index `0..n`. Game components consume the graph only
//! through the [`Topology`] trait, so tests can supply hand-built graphs.
//!
//! ```rust,ignore
//! use ephemeral::network::{Network, Topology};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let network = Network::erdos_renyi(1000, 4.0, &mut rng)?;
//! println!("mean degree {:.2}", network.mean_degree());
//! ```

mod builder;

pub use builder::erdos_renyi;

use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{Result, SimError};

/// Read-only view of a static undirected graph.
pub trait Topology {
    /// Number of nodes
    fn node_count(&self) -> usize;

    /// Neighbours of `node` in a stable order
    fn neighbors(&self, node: usize) -> &[usize];

    /// Fixed degree of `node`
    fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }
}

/// Static undirected simple graph with cached adjacency lists
#[derive(Debug, Clone)]
pub struct Network {
    graph: UnGraph<usize, ()>,
    adjacency: Vec<Vec<usize>>,
}

impl Network {
    /// Build an Erdős–Rényi graph with `n` nodes and expected degree `target_degree`.
    ///
    /// Rejects `n <= 1` and edge probabilities above 1.
    pub fn erdos_renyi<R: rand::Rng + ?Sized>(
        n: usize,
        target_degree: f64,
        rng: &mut R,
    ) -> Result<Self> {
        erdos_renyi(n, target_degree, rng)
    }

    /// Build from an explicit edge list.
    ///
    /// Self-loops, duplicate edges and out-of-range endpoints are rejected.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = UnGraph::with_capacity(n, edges.len());
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

        for &(a, b) in edges {
            if a >= n || b >= n {
                return Err(SimError::InvalidState(format!(
                    "edge ({a}, {b}) references a node outside 0..{n}"
                )));
            }
            if a == b {
                return Err(SimError::InvalidState(format!("self-loop on node {a}")));
            }
            if graph.contains_edge(nodes[a], nodes[b]) {
                return Err(SimError::InvalidState(format!("duplicate edge ({a}, {b})")));
            }
            graph.add_edge(nodes[a], nodes[b], ());
        }

        Ok(Self::from_graph(graph))
    }

    /// Wrap a petgraph graph whose node weights are `0..n` in insertion order
    pub(crate) fn from_graph(graph: UnGraph<usize, ()>) -> Self {
        let mut adjacency = vec![Vec::new(); graph.node_count()];
        for edge in graph.raw_edges() {
            let (a, b) = (graph[edge.source()], graph[edge.target()]);
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        Self { graph, adjacency }
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Mean fixed degree
    pub fn mean_degree(&self) -> f64 {
        if self.adjacency.is_empty() {
            0.0
        } else {
            2.0 * self.edge_count() as f64 / self.adjacency.len() as f64
        }
    }

    /// Largest fixed degree
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Nodes without any fixed neighbour
    pub fn isolated_count(&self) -> usize {
        self.adjacency.iter().filter(|n| n.is_empty()).count()
    }

    /// Graphviz DOT rendering (nodes labelled by index)
    pub fn to_dot(&self) -> String {
        format!("{:?}", Dot::with_config(&self.graph, &[DotConfig::EdgeNoLabel]))
    }
}

impl Topology for Network {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_degrees() {
        let network = Network::from_edges(4, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(network.node_count(), 4);
        assert_eq!(network.edge_count(), 2);
        assert_eq!(network.degree(0), 1);
        assert_eq!(network.degree(1), 2);
        assert_eq!(network.degree(3), 0);
        assert_eq!(network.neighbors(1), &[0, 2]);
        assert_eq!(network.isolated_count(), 1);
        assert_eq!(network.max_degree(), 2);
        assert!((network.mean_degree() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_edges_rejects_self_loop() {
        assert!(Network::from_edges(3, &[(1, 1)]).is_err());
    }

    #[test]
    fn test_from_edges_rejects_duplicate() {
        assert!(Network::from_edges(3, &[(0, 1), (1, 0)]).is_err());
    }

    #[test]
    fn test_from_edges_rejects_out_of_range() {
        assert!(Network::from_edges(3, &[(0, 3)]).is_err());
    }

    #[test]
    fn test_dot_export_lists_edges() {
        let network = Network::from_edges(3, &[(0, 2)]).unwrap();
        let dot = network.to_dot();
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("0 -- 2"));
    }
}
