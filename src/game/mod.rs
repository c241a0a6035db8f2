//! The cooperation game played on the network.
//!
//! - [`agent`]: strategies, bounded memory, per-agent round state
//! - [`population`]: all agents plus global strategy counters
//! - [`payoff`]: fixed-neighbour games and the stranger search
//! - [`imitation`]: pairwise-comparison strategy update
//! - [`stats`]: effective-degree CV and cooperation fraction
//!
//! Components never touch each other's state directly; the
//! [`Simulation`](crate::sim::Simulation) sequences them phase by phase.

pub mod agent;
pub mod imitation;
pub mod payoff;
pub mod population;
pub mod stats;

pub use agent::{Agent, Memory, Strategy};
pub use imitation::{Imitation, ImitationRule};
pub use payoff::{pairwise_payoff, PayoffEngine};
pub use population::Population;
pub use stats::{coefficient_of_variation, cooperation_fraction, degree_cv, effective_degrees};
