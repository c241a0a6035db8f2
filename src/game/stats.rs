//! Round statistics: effective-degree variation and cooperation level.

use super::population::Population;
use crate::error::{Result, SimError};
use crate::network::Topology;

/// Effective degree of every node this round.
///
/// Fixed degree plus strangers the node engaged plus the number of times
/// other nodes engaged it as a stranger.
pub fn effective_degrees<T: Topology + ?Sized>(population: &Population, topology: &T) -> Vec<usize> {
    let n = population.len();
    let mut incoming = vec![0usize; n];
    for agent in population.agents() {
        for &stranger in &agent.strangers {
            incoming[stranger] += 1;
        }
    }

    population
        .agents()
        .iter()
        .enumerate()
        .map(|(i, agent)| topology.degree(i) + agent.strangers.len() + incoming[i])
        .collect()
}

/// Coefficient of variation of effective degree (population standard deviation over mean).
///
/// Fails with [`SimError::DegenerateState`] when the mean is zero.
pub fn degree_cv<T: Topology + ?Sized>(population: &Population, topology: &T) -> Result<f64> {
    coefficient_of_variation(&effective_degrees(population, topology))
}

/// Population coefficient of variation (divides by `N`, not `N - 1`)
pub fn coefficient_of_variation(values: &[usize]) -> Result<f64> {
    if values.is_empty() {
        return Err(SimError::DegenerateState(
            "coefficient of variation of an empty sample".to_string(),
        ));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    if mean == 0.0 {
        return Err(SimError::DegenerateState(
            "mean effective degree is zero".to_string(),
        ));
    }
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Ok(variance.sqrt() / mean)
}

/// Fraction of agents currently cooperating
pub fn cooperation_fraction(population: &Population) -> f64 {
    if population.is_empty() {
        0.0
    } else {
        population.cooperators() as f64 / population.len() as f64
    }
}
