//! # Ephemeral Ties - Stranger Connections in Networked Cooperation
//!
//! Evolutionary cooperate/defect game on a fixed Erdős–Rényi network. Agents
//! remember their own last `M` strategies; agents whose recent record is not
//! cooperative enough may form temporary, costly links to equally
//! dissatisfied strangers anywhere in the population. Each round reports the
//! global cooperation level and the coefficient of variation of effective
//! degree (fixed degree plus stranger links).
//!
//! ## Round Structure
//!
//! ```text
//!  RoundBeginning      payoff = 0, previous = strategy, memory <- strategy
//!        │
//!  PayoffComputation   neighbours: C/C -> 1, D/C -> b
//!        │             dissatisfied: Ki random draws, cost b * alpha each
//!        │
//!  StrategyUpdate      x picks y from neighbours (+ strangers),
//!        │             adopts y.previous with p = (P_y - P_x) / (b * k_max)
//!        │
//!  Reporting           "{step}\tCV={cv:.4}\tP_c={pc:.4}"
//!        │
//!  RoundCleanup        stranger lists cleared
//! ```
//!
//! ## Parameters
//!
//! | Symbol | Config field                  | Default |
//! |--------|-------------------------------|---------|
//! | SIZE   | `network.size`                | 10000   |
//! | R      | `network.half_degree`         | 2       |
//! | M      | `game.memory_length`          | 10      |
//! | b      | `game.temptation`             | 1.2     |
//! | r      | `game.cooperation_threshold`  | 0.5     |
//! | Ki     | `game.stranger_trials`        | 3       |
//! | alpha  | `game.stranger_cost`          | 0.1     |
//! | steps  | `run.steps`                   | 10      |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ephemeral::{Config, MemorySink, Simulation};
//!
//! let mut config = Config::default();
//! config.network.size = 1000;
//! config.run.seed = Some(7);
//!
//! let mut sim = Simulation::new(&config)?;
//! for record in sim.run(&mut MemorySink::default())? {
//!     println!("{record}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`network`]: graph provider trait and random graph builder
//! - [`game`]: agents, payoffs, imitation, statistics
//! - [`sim`]: round scheduler and output sinks
//! - [`config`]: configuration management
//! - [`error`]: error types and result alias

pub mod config;
pub mod error;
pub mod game;
pub mod network;
pub mod sim;

// Re-exports for convenience
pub use config::Config;
pub use error::{Result, SimError};
pub use game::{Agent, Population, Strategy};
pub use network::{Network, Topology};
pub use sim::{MemorySink, Phase, ReportWriter, RoundRecord, RoundSink, RunSummary, Simulation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
