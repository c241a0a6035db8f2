//! Simulation loop and output.
//!
//! Implements the synchronous round cycle over a fixed network:
//!
//! | Phase               | Applied to      | Effect                                   |
//! |---------------------|-----------------|------------------------------------------|
//! | `RoundBeginning`    | every agent     | zero payoff, freeze strategy, log memory |
//! | `PayoffComputation` | every agent     | neighbour games, stranger search         |
//! | `StrategyUpdate`    | agents 0..N-1   | pairwise-comparison imitation            |
//! | `Reporting`         | population      | effective-degree CV, cooperation level   |
//! | `RoundCleanup`      | every agent     | drop stranger links                      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ephemeral::{Config, Simulation};
//! use ephemeral::sim::ReportWriter;
//!
//! let mut config = Config::default();
//! config.run.seed = Some(42);
//!
//! let mut sim = Simulation::new(&config)?;
//! let mut sink = ReportWriter::create("ER.txt", true)?;
//! let records = sim.run(&mut sink)?;
//! ```

mod engine;
mod report;

pub use engine::{Phase, RoundRecord, Simulation};
pub use report::{MemorySink, NetworkSummary, ReportWriter, RoundSink, RunSummary};
