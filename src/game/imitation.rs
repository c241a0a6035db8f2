//! Pairwise-comparison imitation.
//!
//! Agent `x` compares itself with a candidate `y` and adopts `y`'s
//! round-start strategy with probability
//!
//! ```text
//! (P_y - P_x) / (b * max(k_x, k_y))   if P_y >= P_x and max(k_x, k_y) > 0
//! 0                                   otherwise
//! ```
//!
//! where `k` is the fixed degree. The probability is not clamped; values
//! above 1 always adopt and are reported through [`Imitation::saturated`].

use rand::Rng;

use super::population::Population;
use crate::error::Result;
use crate::network::Topology;

/// Result of one imitation attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imitation {
    /// Adoption probability as computed
    pub probability: f64,
    /// Whether `x` took over `y`'s previous strategy
    pub adopted: bool,
}

impl Imitation {
    /// Probability exceeded 1 (parameters too small for the payoff spread)
    pub fn saturated(&self) -> bool {
        self.probability > 1.0
    }
}

/// Payoff-proportional imitation rule
#[derive(Debug, Clone, Copy)]
pub struct ImitationRule {
    temptation: f64,
}

impl ImitationRule {
    /// Rule normalised by temptation payoff `b`
    pub fn new(temptation: f64) -> Self {
        Self { temptation }
    }

    /// Adoption probability for payoffs `payoff_x`, `payoff_y` and largest fixed degree `k_max`
    pub fn probability(&self, payoff_x: f64, payoff_y: f64, k_max: usize) -> f64 {
        if k_max == 0 || payoff_y < payoff_x {
            return 0.0;
        }
        (payoff_y - payoff_x) / (self.temptation * k_max as f64)
    }

    /// Let `x` consider imitating `y`.
    ///
    /// Draws exactly one uniform value whatever the probability. On adoption
    /// `x` takes `y`'s previous (round-start) strategy through the
    /// population's counter-maintaining path.
    pub fn attempt<T, R>(
        &self,
        population: &mut Population,
        topology: &T,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> Result<Imitation>
    where
        T: Topology + ?Sized,
        R: Rng + ?Sized,
    {
        let k_max = topology.degree(x).max(topology.degree(y));
        let probability = self.probability(
            population.agent(x).payoff,
            population.agent(y).payoff,
            k_max,
        );

        let adopted = rng.gen::<f64>() < probability;
        if adopted {
            let strategy = population.agent(y).previous_strategy;
            population.apply_strategy_change(x, strategy)?;
        }

        Ok(Imitation {
            probability,
            adopted,
        })
    }
}
