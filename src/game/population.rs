//! Agent collection with incrementally maintained strategy counters.

use rand::Rng;

use super::agent::{Agent, Strategy};
use crate::error::{Result, SimError};

/// All agents of a run plus global cooperator/defector counts.
///
/// The counters always sum to the number of agents and match the agents'
/// current strategies. They are recomputed only by [`Population::initialize`];
/// afterwards [`Population::apply_strategy_change`] is the only mutation path.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    cooperators: usize,
    defectors: usize,
}

impl Population {
    /// `n` agents with uniformly random strategies
    pub fn new<R: Rng + ?Sized>(n: usize, memory_length: usize, rng: &mut R) -> Self {
        let mut population = Self {
            agents: (0..n)
                .map(|_| Agent::new(Strategy::Cooperate, memory_length))
                .collect(),
            cooperators: 0,
            defectors: 0,
        };
        population.initialize(rng);
        population
    }

    /// Agents with the given starting strategies
    pub fn from_strategies(strategies: &[Strategy], memory_length: usize) -> Self {
        let mut population = Self {
            agents: strategies
                .iter()
                .map(|&s| Agent::new(s, memory_length))
                .collect(),
            cooperators: 0,
            defectors: 0,
        };
        population.recount();
        population
    }

    /// Redraw every strategy and clear all per-agent history
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for agent in &mut self.agents {
            agent.reset(Strategy::random(rng));
        }
        self.recount();
    }

    fn recount(&mut self) {
        self.cooperators = self
            .agents
            .iter()
            .filter(|a| a.strategy.is_cooperate())
            .count();
        self.defectors = self.agents.len() - self.cooperators;
    }

    /// Round-start bookkeeping for every agent
    pub fn begin_round(&mut self) {
        for agent in &mut self.agents {
            agent.begin_round();
        }
    }

    /// Switch agent `index` to `strategy`, keeping the counters reconciled
    pub fn apply_strategy_change(&mut self, index: usize, strategy: Strategy) -> Result<()> {
        let agent = self.agents.get_mut(index).ok_or_else(|| {
            SimError::InvalidState(format!("agent {index} out of range"))
        })?;

        match agent.strategy {
            Strategy::Cooperate => self.cooperators -= 1,
            Strategy::Defect => self.defectors -= 1,
        }
        agent.strategy = strategy;
        match strategy {
            Strategy::Cooperate => self.cooperators += 1,
            Strategy::Defect => self.defectors += 1,
        }
        Ok(())
    }

    /// Drop every agent's stranger list
    pub fn clear_strangers(&mut self) {
        for agent in &mut self.agents {
            agent.strangers.clear();
        }
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Check for no agents
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent by index.
    ///
    /// Panics if `index` is out of range; indices come from the network,
    /// which has exactly one node per agent.
    pub fn agent(&self, index: usize) -> &Agent {
        &self.agents[index]
    }

    /// Mutable agent by index. Panics like [`Population::agent`].
    pub fn agent_mut(&mut self, index: usize) -> &mut Agent {
        &mut self.agents[index]
    }

    /// All agents in index order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Agents currently cooperating
    pub fn cooperators(&self) -> usize {
        self.cooperators
    }

    /// Agents currently defecting
    pub fn defectors(&self) -> usize {
        self.defectors
    }

    /// Total stranger engagements recorded this round
    pub fn stranger_links(&self) -> usize {
        self.agents.iter().map(|a| a.strangers.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    use crate::game::Strategy::{Cooperate as C, Defect as D};

    fn scanned(population: &Population) -> usize {
        population
            .agents()
            .iter()
            .filter(|a| a.strategy == C)
            .count()
    }

    #[test]
    fn test_new_counts_match_strategies() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let population = Population::new(500, 4, &mut rng);
        assert_eq!(population.len(), 500);
        assert_eq!(population.cooperators(), scanned(&population));
        assert_eq!(population.cooperators() + population.defectors(), 500);
        // Uniform draw: both strategies present
        assert!(population.cooperators() > 150 && population.defectors() > 150);
    }

    #[test]
    fn test_apply_strategy_change_updates_counters() {
        let mut population = Population::from_strategies(&[C, C, D], 3);
        assert_eq!((population.cooperators(), population.defectors()), (2, 1));

        population.apply_strategy_change(0, D).unwrap();
        assert_eq!((population.cooperators(), population.defectors()), (1, 2));

        // Same-strategy change leaves counts intact
        population.apply_strategy_change(2, D).unwrap();
        assert_eq!((population.cooperators(), population.defectors()), (1, 2));
        assert_eq!(population.cooperators(), scanned(&population));
    }

    #[test]
    fn test_apply_strategy_change_out_of_range() {
        let mut population = Population::from_strategies(&[C], 3);
        assert!(population.apply_strategy_change(1, D).is_err());
        assert_eq!(population.cooperators(), 1);
    }

    #[test]
    fn test_initialize_resets_history() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut population = Population::from_strategies(&[C, D, C, D], 2);
        population.begin_round();
        population.agent_mut(1).strangers.push(0);
        population.initialize(&mut rng);

        assert!(population.agents().iter().all(|a| a.memory().is_empty()));
        assert_eq!(population.stranger_links(), 0);
        assert_eq!(population.cooperators(), scanned(&population));
    }

    #[test]
    fn test_begin_round_and_clear_strangers() {
        let mut population = Population::from_strategies(&[C, D], 2);
        population.begin_round();
        assert!(population.agents().iter().all(|a| a.memory().len() == 1));
        population.agent_mut(0).strangers.extend([1, 1]);
        assert_eq!(population.stranger_links(), 2);
        population.clear_strangers();
        assert_eq!(population.stranger_links(), 0);
    }
}
