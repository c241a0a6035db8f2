//! Round payoff: fixed-neighbour games plus the stranger search.
//!
//! # Payoff matrix (row player)
//!
//! | self \ other | C   | D |
//! |--------------|-----|---|
//! | C            | 1   | 0 |
//! | D            | b   | 0 |
//!
//! # Stranger search
//!
//! An agent whose memory window is full and whose cooperation ratio is below
//! `r` draws `Ki` candidates uniformly from all nodes. Self-selection and
//! repeated candidates are allowed. A candidate is engaged only if it is
//! dissatisfied as well. Each engagement pays the matrix entry above and
//! costs `b * alpha`.

use rand::Rng;

use super::agent::Strategy;
use super::population::Population;
use crate::config::GameConfig;
use crate::network::Topology;

/// Row player's payoff against `other`
pub fn pairwise_payoff(own: Strategy, other: Strategy, temptation: f64) -> f64 {
    match (own, other) {
        (Strategy::Cooperate, Strategy::Cooperate) => 1.0,
        (Strategy::Defect, Strategy::Cooperate) => temptation,
        _ => 0.0,
    }
}

/// Computes one agent's round payoff
#[derive(Debug, Clone)]
pub struct PayoffEngine {
    temptation: f64,
    threshold: f64,
    trials: usize,
    cost: f64,
}

impl PayoffEngine {
    /// Engine for the given game parameters
    pub fn new(config: &GameConfig) -> Self {
        Self {
            temptation: config.temptation,
            threshold: config.cooperation_threshold,
            trials: config.stranger_trials,
            cost: config.stranger_cost,
        }
    }

    /// Payoff of agent `index` against its fixed neighbours and any strangers it engages.
    ///
    /// Reads only current strategies and round-start memory state. The only
    /// side effect is appending engaged strangers to the agent's list.
    pub fn compute_payoff<T, R>(
        &self,
        population: &mut Population,
        topology: &T,
        index: usize,
        rng: &mut R,
    ) -> f64
    where
        T: Topology + ?Sized,
        R: Rng + ?Sized,
    {
        let own = population.agent(index).strategy;
        let mut payoff: f64 = topology
            .neighbors(index)
            .iter()
            .map(|&y| pairwise_payoff(own, population.agent(y).strategy, self.temptation))
            .sum();

        if !population.agent(index).is_dissatisfied(self.threshold) {
            return payoff;
        }

        let n = population.len();
        let mut engaged = Vec::new();
        for _ in 0..self.trials {
            let candidate = rng.gen_range(0..n);
            let stranger = population.agent(candidate);
            if stranger.is_dissatisfied(self.threshold) {
                payoff += pairwise_payoff(own, stranger.strategy, self.temptation);
                engaged.push(candidate);
            }
        }

        payoff -= self.temptation * self.cost * engaged.len() as f64;
        population.agent_mut(index).strangers.extend(engaged);
        payoff
    }
}
