//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (applied by the binary on top of the above)
//!
//! All parameters are fixed for the duration of a run. [`Config::validate`]
//! must pass before a [`Simulation`](crate::sim::Simulation) is built.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Default output file for per-round records
pub const DEFAULT_OUTPUT_PATH: &str = "ER.txt";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Network construction parameters
    #[serde(default)]
    pub network: NetworkConfig,

    /// Game and stranger-search parameters
    #[serde(default)]
    pub game: GameConfig,

    /// Run length and seeding
    #[serde(default)]
    pub run: RunConfig,

    /// Output sinks
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SimError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default config file location (`<config_dir>/ephemeral/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ephemeral").join("config.toml"))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `EPHEMERAL_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|v| v.parse().ok())
        }

        if let Some(val) = parsed(&lookup, "EPHEMERAL_SIZE") {
            self.network.size = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_HALF_DEGREE") {
            self.network.half_degree = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_MEMORY") {
            self.game.memory_length = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_TEMPTATION") {
            self.game.temptation = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_THRESHOLD") {
            self.game.cooperation_threshold = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_TRIALS") {
            self.game.stranger_trials = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_COST") {
            self.game.stranger_cost = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_STEPS") {
            self.run.steps = val;
        }
        if let Some(val) = parsed(&lookup, "EPHEMERAL_SEED") {
            self.run.seed = Some(val);
        }
        if let Some(path) = lookup("EPHEMERAL_OUTPUT") {
            self.output.path = PathBuf::from(path);
        }
    }

    /// Check every parameter against the model's assumptions
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.game.validate()?;
        Ok(())
    }
}

/// Network construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of nodes (SIZE)
    pub size: usize,

    /// Half of the target average degree (R)
    pub half_degree: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            size: 10_000,
            half_degree: 2.0,
        }
    }
}

impl NetworkConfig {
    /// Target average degree (2R)
    pub fn target_degree(&self) -> f64 {
        2.0 * self.half_degree
    }

    /// Independent edge probability `2R / (SIZE - 1)`.
    ///
    /// Only meaningful once `size > 1` has been validated.
    pub fn edge_probability(&self) -> f64 {
        self.target_degree() / (self.size as f64 - 1.0)
    }

    /// Reject sizes below 2 and edge probabilities outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        if self.size <= 1 {
            return Err(SimError::Config(format!(
                "network size must be greater than 1, got {}",
                self.size
            )));
        }
        if !self.half_degree.is_finite() || self.half_degree < 0.0 {
            return Err(SimError::Config(format!(
                "half degree must be a non-negative number, got {}",
                self.half_degree
            )));
        }
        let p = self.edge_probability();
        if !(0.0..=1.0).contains(&p) {
            return Err(SimError::Config(format!(
                "edge probability {p} outside [0, 1] (target degree {} with {} nodes)",
                self.target_degree(),
                self.size
            )));
        }
        Ok(())
    }
}

/// Game and stranger-search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds of own-strategy history kept per agent (M)
    pub memory_length: usize,

    /// Payoff to a defector facing a cooperator (b)
    pub temptation: f64,

    /// Cooperation ratio below which an agent searches for strangers (r)
    pub cooperation_threshold: f64,

    /// Stranger candidates sampled per searching agent per round (Ki)
    pub stranger_trials: usize,

    /// Cost coefficient per stranger engagement (alpha)
    pub stranger_cost: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            memory_length: 10,
            temptation: 1.2,
            cooperation_threshold: 0.5,
            stranger_trials: 3,
            stranger_cost: 0.1,
        }
    }
}

impl GameConfig {
    /// Reject empty memory windows and negative or non-finite coefficients
    pub fn validate(&self) -> Result<()> {
        if self.memory_length == 0 {
            return Err(SimError::Config("memory length must be positive".to_string()));
        }
        let non_negative = [
            ("temptation", self.temptation),
            ("cooperation threshold", self.cooperation_threshold),
            ("stranger cost", self.stranger_cost),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.cooperation_threshold > 1.0 {
            return Err(SimError::Config(format!(
                "cooperation threshold must lie in [0, 1], got {}",
                self.cooperation_threshold
            )));
        }
        Ok(())
    }
}

/// Run length and seeding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of rounds (steps_total)
    pub steps: usize,

    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            seed: None,
        }
    }
}

/// Output sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Per-round record file
    pub path: PathBuf,

    /// Mirror records to stdout
    pub echo: bool,

    /// JSON run summary path
    pub summary: Option<PathBuf>,

    /// Graphviz export of the fixed network
    pub graph_dot: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            echo: true,
            summary: None,
            graph_dot: None,
        }
    }
}
