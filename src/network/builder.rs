//! Erdős–Rényi random graph generation.

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;

use super::Network;
use crate::error::{Result, SimError};

/// G(n, p) graph with `p = target_degree / (n - 1)`.
///
/// Every unordered pair of distinct nodes is visited once, in lexicographic
/// order, and kept with probability `p`. The probability is never clamped:
/// a target degree above `n - 1` is a configuration error.
pub fn erdos_renyi<R: Rng + ?Sized>(n: usize, target_degree: f64, rng: &mut R) -> Result<Network> {
    if n <= 1 {
        return Err(SimError::Config(format!(
            "random graph needs more than one node, got {n}"
        )));
    }
    let p = target_degree / (n - 1) as f64;
    if !(0.0..=1.0).contains(&p) {
        return Err(SimError::Config(format!(
            "edge probability {p} outside [0, 1] for {n} nodes and target degree {target_degree}"
        )));
    }

    let expected_edges = (p * (n * (n - 1) / 2) as f64).ceil() as usize;
    let mut graph = UnGraph::with_capacity(n, expected_edges);
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f64>() < p {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    tracing::debug!(
        nodes = n,
        edges = graph.edge_count(),
        p,
        "built Erdős–Rényi network"
    );

    Ok(Network::from_graph(graph))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::network::Topology;

    #[test]
    fn test_zero_degree_has_no_edges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let network = erdos_renyi(50, 0.0, &mut rng).unwrap();
        assert_eq!(network.edge_count(), 0);
        assert_eq!(network.isolated_count(), 50);
    }

    #[test]
    fn test_full_probability_is_complete() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let network = erdos_renyi(6, 5.0, &mut rng).unwrap();
        assert_eq!(network.edge_count(), 15);
        assert!((0..6).all(|i| network.degree(i) == 5));
    }

    #[test]
    fn test_mean_degree_near_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let network = erdos_renyi(2000, 4.0, &mut rng).unwrap();
        assert!((network.mean_degree() - 4.0).abs() < 0.3);
    }

    #[test]
    fn test_no_self_loops_or_duplicates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let network = erdos_renyi(200, 6.0, &mut rng).unwrap();
        for node in 0..network.node_count() {
            let neighbors = network.neighbors(node);
            assert!(!neighbors.contains(&node));
            let mut sorted = neighbors.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), neighbors.len());
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let a = erdos_renyi(300, 4.0, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = erdos_renyi(300, 4.0, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        for node in 0..300 {
            assert_eq!(a.neighbors(node), b.neighbors(node));
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(erdos_renyi(1, 0.0, &mut rng), Err(SimError::Config(_))));
        assert!(matches!(erdos_renyi(5, 4.5, &mut rng), Err(SimError::Config(_))));
        assert!(matches!(erdos_renyi(5, -1.0, &mut rng), Err(SimError::Config(_))));
    }
}
