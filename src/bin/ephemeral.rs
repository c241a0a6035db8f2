//! Ephemeral Ties CLI binary.
//!
//! # Commands
//!
//! - `run` - Play a full simulation and write per-round records
//! - `config` - Print the effective configuration as TOML
//! - `graph` - Build the network only and print its degree statistics

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ephemeral::{
    network::Topology,
    sim::{NetworkSummary, ReportWriter, RunSummary},
    Config, Network, Simulation, VERSION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "ephemeral")]
#[command(version = VERSION)]
#[command(about = "Cooperation game on random networks with temporary stranger links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run {
        #[command(flatten)]
        params: Params,

        /// Per-round record file (default: ER.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON run summary
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Export the fixed network in Graphviz DOT format
        #[arg(long)]
        export_graph: Option<PathBuf>,

        /// Do not mirror records to stdout
        #[arg(short, long)]
        quiet: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the effective configuration
    Config {
        #[command(flatten)]
        params: Params,
    },

    /// Build the network and print degree statistics
    Graph {
        #[command(flatten)]
        params: Params,

        /// Export the network in Graphviz DOT format
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

/// Model parameters shared by all commands
#[derive(Args)]
struct Params {
    /// TOML config file (default: <config dir>/ephemeral/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of nodes (SIZE)
    #[arg(long)]
    size: Option<usize>,

    /// Half of the target average degree (R)
    #[arg(long)]
    half_degree: Option<f64>,

    /// Memory length (M)
    #[arg(long)]
    memory: Option<usize>,

    /// Temptation payoff (b)
    #[arg(long)]
    temptation: Option<f64>,

    /// Cooperation-ratio threshold (r)
    #[arg(long)]
    threshold: Option<f64>,

    /// Stranger trials per round (Ki)
    #[arg(long)]
    trials: Option<usize>,

    /// Stranger cost coefficient (alpha)
    #[arg(long)]
    cost: Option<f64>,

    /// Number of rounds
    #[arg(long)]
    steps: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

impl Params {
    /// Defaults < config file < environment < flags
    fn resolve(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => match Config::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    tracing::info!("Using config file {}", path.display());
                    Config::from_file(path)?
                },
                None => Config::default(),
            },
        };
        config.apply_env();

        if let Some(size) = self.size {
            config.network.size = size;
        }
        if let Some(half_degree) = self.half_degree {
            config.network.half_degree = half_degree;
        }
        if let Some(memory) = self.memory {
            config.game.memory_length = memory;
        }
        if let Some(temptation) = self.temptation {
            config.game.temptation = temptation;
        }
        if let Some(threshold) = self.threshold {
            config.game.cooperation_threshold = threshold;
        }
        if let Some(trials) = self.trials {
            config.game.stranger_trials = trials;
        }
        if let Some(cost) = self.cost {
            config.game.stranger_cost = cost;
        }
        if let Some(steps) = self.steps {
            config.run.steps = steps;
        }
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            params,
            output,
            summary,
            export_graph,
            quiet,
            verbose,
        } => {
            init_logging(verbose);
            let mut config = params.resolve()?;
            if let Some(path) = output {
                config.output.path = path;
            }
            if summary.is_some() {
                config.output.summary = summary;
            }
            if export_graph.is_some() {
                config.output.graph_dot = export_graph;
            }
            if quiet {
                config.output.echo = false;
            }
            cmd_run(config)
        },

        Commands::Config { params } => {
            init_logging(false);
            let config = params.resolve()?;
            print!("{}", config.to_toml()?);
            Ok(())
        },

        Commands::Graph { params, export } => {
            init_logging(false);
            let config = params.resolve()?;
            cmd_graph(&config, export)
        },
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

fn cmd_run(mut config: Config) -> anyhow::Result<()> {
    // Pin the seed so the summary and logs can replay this exact run
    let seed = config.run.seed.unwrap_or_else(rand::random);
    config.run.seed = Some(seed);

    let started_at = chrono::Utc::now();
    let mut sim = Simulation::new(&config)?;

    if let Some(path) = &config.output.graph_dot {
        std::fs::write(path, sim.topology().to_dot())?;
        tracing::info!("Graph written to {}", path.display());
    }

    let mut sink = ReportWriter::create(&config.output.path, config.output.echo)?;
    let records = sim.run(&mut sink)?;
    tracing::info!("Records written to {}", config.output.path.display());

    if let Some(path) = &config.output.summary {
        RunSummary::new(&config, sim.topology(), started_at, records).write(path)?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}

fn cmd_graph(config: &Config, export: Option<PathBuf>) -> anyhow::Result<()> {
    let seed = config.run.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let network = Network::erdos_renyi(
        config.network.size,
        config.network.target_degree(),
        &mut rng,
    )?;

    let summary = NetworkSummary::from(&network);
    println!("Network (seed {seed}):");
    println!("  Nodes:        {}", summary.nodes);
    println!("  Edges:        {}", summary.edges);
    println!(
        "  Mean degree:  {:.4} (target {:.4})",
        summary.mean_degree,
        config.network.target_degree()
    );
    println!("  Max degree:   {}", summary.max_degree);
    println!("  Isolated:     {}", summary.isolated);

    let mut histogram = vec![0usize; summary.max_degree + 1];
    for node in 0..network.node_count() {
        histogram[network.degree(node)] += 1;
    }
    println!();
    println!("Degree distribution:");
    for (degree, count) in histogram.iter().enumerate().filter(|&(_, &count)| count > 0) {
        println!("  {degree:>4}: {count}");
    }

    if let Some(path) = export {
        std::fs::write(&path, network.to_dot())?;
        eprintln!("Graph written to {}", path.display());
    }

    Ok(())
}
