//! Simulation error types.
//!
//! # Error Classification
//!
//! - **Configuration**: parameters rejected before any round runs. Fatal.
//! - **Degenerate state**: a statistic is undefined for the current round
//!   (zero mean effective degree). The simulation loop downgrades this to a
//!   skipped report; callers of the statistic itself see the error.
//! - **I/O**: the output sink failed. Surfaced to the caller, never swallowed;
//!   in-memory state is left at a consistent round boundary.

use thiserror::Error;

/// Simulation errors.
#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid run parameters.
    #[error("Config error: {0}")]
    Config(String),

    /// A statistic is undefined for the current population state.
    #[error("Degenerate state: {0}")]
    DegenerateState(String),

    /// Operation not valid in the current simulation phase or for the given input.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::Config(format!("Failed to parse config: {err}"))
    }
}

impl From<toml::ser::Error> for SimError {
    fn from(err: toml::ser::Error) -> Self {
        SimError::Config(format!("Failed to serialize config: {err}"))
    }
}
