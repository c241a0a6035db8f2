//! Round scheduler.
//!
//! # State Machine
//!
//! ```text
//!   [Uninitialized] ── new() / with_rng() / from_parts() ──> [Ready]
//!
//!            reset()
//!   [Ready] ───────────────────────────────────────────────┐
//!      │ step()                                            │
//!      v                                                   │
//!   [RoundBeginning] -> [PayoffComputation] -> [StrategyUpdate]
//!                                                   │      │
//!                                                   v      │
//!                       [RoundCleanup] <──── [Reporting]   │
//!                             │                            │
//!                             ├── rounds left ─────────────┘ (back to Ready)
//!                             v
//!                        [Finished]
//! ```
//!
//! `Uninitialized` has no variant: construction builds the network and the
//! population and validates parameters, so a `Simulation` value always
//! starts in `Ready` (or `Finished` for a zero-round run).
//!
//! Each phase is applied to every agent before the next phase starts.
//! Strategies only change in `StrategyUpdate`, after all payoffs of the
//! round are final, and agents are always visited in index order so a
//! fixed seed reproduces a run exactly.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::report::RoundSink;
use crate::config::{Config, GameConfig};
use crate::error::{Result, SimError};
use crate::game::{stats, ImitationRule, PayoffEngine, Population};
use crate::network::{Network, Topology};

/// Position in the round cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between rounds, next round may start
    Ready,
    /// Payoffs zeroed, strategies frozen, memories appended
    RoundBeginning,
    /// Payoffs and stranger links being computed
    PayoffComputation,
    /// Agents imitating candidates in index order
    StrategyUpdate,
    /// Statistics being computed
    Reporting,
    /// Stranger links being dropped
    RoundCleanup,
    /// All rounds played
    Finished,
}

/// Per-round output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Zero-based round index
    pub step: usize,
    /// Effective-degree CV; `None` when undefined (zero mean degree)
    pub cv: Option<f64>,
    /// Fraction of cooperators after the strategy update
    pub cooperation_fraction: f64,
    /// Cooperators after the strategy update
    pub cooperators: usize,
    /// Defectors after the strategy update
    pub defectors: usize,
    /// Stranger engagements this round
    pub stranger_links: usize,
    /// Agents that adopted a candidate's strategy
    pub imitations: usize,
    /// Imitation attempts whose probability exceeded 1
    pub saturated: usize,
}

impl fmt::Display for RoundRecord {
    /// `{step}\tCV={cv:.4}\tP_c={pc:.4}`; an undefined CV prints as `nan`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t", self.step)?;
        match self.cv {
            Some(cv) => write!(f, "CV={cv:.4}")?,
            None => write!(f, "CV=nan")?,
        }
        write!(f, "\tP_c={:.4}", self.cooperation_fraction)
    }
}

/// Owns all state of one run: network, population, rules and RNG
#[derive(Debug)]
pub struct Simulation<T = Network, R = StdRng> {
    topology: T,
    population: Population,
    payoff: PayoffEngine,
    imitation: ImitationRule,
    threshold: f64,
    rng: R,
    steps_total: usize,
    step: usize,
    phase: Phase,
}

impl Simulation<Network, StdRng> {
    /// Validate `config`, seed the RNG, build the network, then the population.
    ///
    /// Without a configured seed one is drawn from OS entropy and logged, so
    /// every run can be replayed.
    pub fn new(config: &Config) -> Result<Self> {
        let seed = config.run.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "seeding simulation");
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<Network, R> {
    /// Build with a caller-supplied RNG
    pub fn with_rng(config: &Config, mut rng: R) -> Result<Self> {
        config.validate()?;
        let network =
            Network::erdos_renyi(config.network.size, config.network.target_degree(), &mut rng)?;
        let population = Population::new(config.network.size, config.game.memory_length, &mut rng);
        tracing::info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            mean_degree = network.mean_degree(),
            cooperators = population.cooperators(),
            "network and population ready"
        );
        Self::from_parts(&config.game, config.run.steps, network, population, rng)
    }
}

impl<T: Topology, R: Rng> Simulation<T, R> {
    /// Assemble from an existing topology and population
    pub fn from_parts(
        game: &GameConfig,
        steps_total: usize,
        topology: T,
        population: Population,
        rng: R,
    ) -> Result<Self> {
        game.validate()?;

        if population.len() != topology.node_count() {
            return Err(SimError::Config(format!(
                "population has {} agents but the network has {} nodes",
                population.len(),
                topology.node_count()
            )));
        }

        Ok(Self {
            topology,
            population,
            payoff: PayoffEngine::new(game),
            imitation: ImitationRule::new(game.temptation),
            threshold: game.cooperation_threshold,
            rng,
            steps_total,
            step: 0,
            phase: Self::idle_phase(0, steps_total),
        })
    }

    fn idle_phase(step: usize, steps_total: usize) -> Phase {
        if step >= steps_total {
            Phase::Finished
        } else {
            Phase::Ready
        }
    }

    /// Play one full round
    pub fn step(&mut self) -> Result<RoundRecord> {
        match self.phase {
            Phase::Ready => {},
            Phase::Finished => {
                return Err(SimError::InvalidState(format!(
                    "all {} rounds already played",
                    self.steps_total
                )))
            },
            phase => {
                return Err(SimError::InvalidState(format!(
                    "round {} was interrupted in phase {phase:?}; reset before stepping",
                    self.step
                )))
            },
        }

        self.phase = Phase::RoundBeginning;
        self.population.begin_round();

        self.phase = Phase::PayoffComputation;
        self.compute_payoffs();

        self.phase = Phase::StrategyUpdate;
        let (imitations, saturated) = self.update_strategies()?;

        self.phase = Phase::Reporting;
        let record = self.report(imitations, saturated)?;

        self.phase = Phase::RoundCleanup;
        self.population.clear_strangers();

        self.step += 1;
        self.phase = Self::idle_phase(self.step, self.steps_total);
        Ok(record)
    }

    fn compute_payoffs(&mut self) {
        for i in 0..self.population.len() {
            let payoff =
                self.payoff
                    .compute_payoff(&mut self.population, &self.topology, i, &mut self.rng);
            self.population.agent_mut(i).payoff = payoff;
        }
    }

    fn update_strategies(&mut self) -> Result<(usize, usize)> {
        let mut imitations = 0;
        let mut saturated = 0;
        let mut pool = Vec::new();

        for x in 0..self.population.len() {
            pool.clear();
            pool.extend_from_slice(self.topology.neighbors(x));
            let agent = self.population.agent(x);
            if agent.is_dissatisfied(self.threshold) && !agent.strangers().is_empty() {
                pool.extend_from_slice(agent.strangers());
            }

            let Some(&y) = pool.choose(&mut self.rng) else {
                continue;
            };
            let outcome =
                self.imitation
                    .attempt(&mut self.population, &self.topology, x, y, &mut self.rng)?;
            if outcome.adopted {
                imitations += 1;
            }
            if outcome.saturated() {
                saturated += 1;
            }
        }

        if saturated > 0 {
            tracing::warn!(
                step = self.step,
                saturated,
                "imitation probability exceeded 1; temptation too small for the payoff spread"
            );
        }
        Ok((imitations, saturated))
    }

    fn report(&self, imitations: usize, saturated: usize) -> Result<RoundRecord> {
        let cv = match stats::degree_cv(&self.population, &self.topology) {
            Ok(cv) => Some(cv),
            Err(SimError::DegenerateState(reason)) => {
                tracing::warn!(step = self.step, %reason, "skipping CV for this round");
                None
            },
            Err(e) => return Err(e),
        };

        let record = RoundRecord {
            step: self.step,
            cv,
            cooperation_fraction: stats::cooperation_fraction(&self.population),
            cooperators: self.population.cooperators(),
            defectors: self.population.defectors(),
            stranger_links: self.population.stranger_links(),
            imitations,
            saturated,
        };
        tracing::debug!(
            step = record.step,
            cv = ?record.cv,
            p_c = record.cooperation_fraction,
            strangers = record.stranger_links,
            imitations,
            "round complete"
        );
        Ok(record)
    }

    /// Play all remaining rounds, handing each record to `sink`.
    ///
    /// A sink failure stops the run after the round that produced the
    /// record; the simulation itself stays at a consistent round boundary.
    pub fn run(&mut self, sink: &mut dyn RoundSink) -> Result<Vec<RoundRecord>> {
        let mut records = Vec::with_capacity(self.steps_total - self.step.min(self.steps_total));
        while self.phase != Phase::Finished {
            let record = self.step()?;
            sink.record(&record)?;
            records.push(record);
        }
        sink.finish()?;
        tracing::info!(
            rounds = records.len(),
            cooperation = records.last().map(|r| r.cooperation_fraction),
            "simulation finished"
        );
        Ok(records)
    }

    /// Redraw all strategies and clear histories, keeping the network
    pub fn reset(&mut self) {
        self.population.initialize(&mut self.rng);
        self.step = 0;
        self.phase = Self::idle_phase(0, self.steps_total);
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check whether every round has been played
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Rounds played so far
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Configured number of rounds
    pub fn steps_total(&self) -> usize {
        self.steps_total
    }

    /// Agent states
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Fixed network
    pub fn topology(&self) -> &T {
        &self.topology
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::game::Strategy::{Cooperate as C, Defect as D};
    use crate::sim::MemorySink;

    fn small_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.network.size = 60;
        config.network.half_degree = 2.0;
        config.game.memory_length = 3;
        config.run.steps = 8;
        config.run.seed = Some(seed);
        config
    }

    #[test]
    fn test_record_line_format() {
        let record = RoundRecord {
            step: 3,
            cv: Some(0.512_34),
            cooperation_fraction: 0.5,
            cooperators: 50,
            defectors: 50,
            stranger_links: 0,
            imitations: 0,
            saturated: 0,
        };
        assert_eq!(record.to_string(), "3\tCV=0.5123\tP_c=0.5000");

        let undefined = RoundRecord { cv: None, ..record };
        assert_eq!(undefined.to_string(), "3\tCV=nan\tP_c=0.5000");
    }

    #[test]
    fn test_phases_cycle_to_finished() {
        let mut sim = Simulation::new(&small_config(1)).unwrap();
        assert_eq!(sim.phase(), Phase::Ready);
        for expected in 0..8 {
            assert_eq!(sim.current_step(), expected);
            let record = sim.step().unwrap();
            assert_eq!(record.step, expected);
        }
        assert!(sim.is_finished());
        assert!(matches!(sim.step(), Err(SimError::InvalidState(_))));
    }

    #[test]
    fn test_zero_steps_starts_finished() {
        let mut config = small_config(1);
        config.run.steps = 0;
        let mut sim = Simulation::new(&config).unwrap();
        assert_eq!(sim.phase(), Phase::Finished);
        assert!(sim.run(&mut MemorySink::default()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config(1);
        config.network.size = 1;
        assert!(matches!(Simulation::new(&config), Err(SimError::Config(_))));
    }

    #[test]
    fn test_strangers_cleared_after_every_round() {
        let mut sim = Simulation::new(&small_config(4)).unwrap();
        while !sim.is_finished() {
            sim.step().unwrap();
            assert_eq!(sim.population().stranger_links(), 0);
        }
    }

    #[test]
    fn test_counters_match_strategies_every_round() {
        let mut sim = Simulation::new(&small_config(12)).unwrap();
        while !sim.is_finished() {
            let record = sim.step().unwrap();
            let scanned = sim
                .population()
                .agents()
                .iter()
                .filter(|a| a.strategy == C)
                .count();
            assert_eq!(record.cooperators, scanned);
            assert_eq!(record.cooperators + record.defectors, 60);
        }
    }

    #[test]
    fn test_empty_graph_without_strangers_reports_nan() {
        // Memory never fills, so nobody searches and every effective degree is 0
        let game = GameConfig {
            memory_length: 100,
            ..GameConfig::default()
        };
        let network = Network::from_edges(5, &[]).unwrap();
        let population = Population::from_strategies(&[C, D, C, D, C], game.memory_length);
        let mut sim =
            Simulation::from_parts(&game, 3, network, population, ChaCha8Rng::seed_from_u64(0))
                .unwrap();

        let records = sim.run(&mut MemorySink::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.cv.is_none()));
        assert!(records.iter().all(|r| (r.cooperation_fraction - 0.6).abs() < 1e-12));
    }

    #[test]
    fn test_from_parts_rejects_size_mismatch() {
        let network = Network::from_edges(3, &[]).unwrap();
        let population = Population::from_strategies(&[C, D], 3);
        let result = Simulation::from_parts(
            &GameConfig::default(),
            1,
            network,
            population,
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reset_keeps_network() {
        let mut sim = Simulation::new(&small_config(8)).unwrap();
        let edges = sim.topology().edge_count();
        sim.run(&mut MemorySink::default()).unwrap();
        sim.reset();
        assert_eq!(sim.phase(), Phase::Ready);
        assert_eq!(sim.current_step(), 0);
        assert_eq!(sim.topology().edge_count(), edges);
        assert!(sim.population().agents().iter().all(|a| a.memory().is_empty()));
    }
}
