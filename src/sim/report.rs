//! Output sinks for per-round records and the JSON run summary.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::RoundRecord;
use crate::config::Config;
use crate::error::Result;
use crate::network::{Network, Topology};

/// Consumer of round records
pub trait RoundSink {
    /// Accept one record
    fn record(&mut self, record: &RoundRecord) -> Result<()>;

    /// Called once after the last round
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes one tab-separated line per round, optionally mirrored to stdout.
///
/// Every record is flushed before `record` returns, so the file holds all
/// completed rounds even when a run stops early.
pub struct ReportWriter<W: Write> {
    writer: W,
    echo: bool,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (truncate) the record file at `path`
    pub fn create(path: impl AsRef<Path>, echo: bool) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file), echo))
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap an arbitrary writer
    pub fn new(writer: W, echo: bool) -> Self {
        Self { writer, echo }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RoundSink for ReportWriter<W> {
    fn record(&mut self, record: &RoundRecord) -> Result<()> {
        let line = format!("{record}\n");
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        if self.echo {
            let mut stdout = io::stdout().lock();
            stdout.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        if self.echo {
            io::stdout().flush()?;
        }
        Ok(())
    }
}

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Records received so far
    pub records: Vec<RoundRecord>,
}

impl RoundSink for MemorySink {
    fn record(&mut self, record: &RoundRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Static properties of the fixed network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Node count
    pub nodes: usize,
    /// Undirected edge count
    pub edges: usize,
    /// Mean fixed degree
    pub mean_degree: f64,
    /// Largest fixed degree
    pub max_degree: usize,
    /// Nodes with no fixed neighbour
    pub isolated: usize,
}

impl From<&Network> for NetworkSummary {
    fn from(network: &Network) -> Self {
        Self {
            nodes: network.node_count(),
            edges: network.edge_count(),
            mean_degree: network.mean_degree(),
            max_degree: network.max_degree(),
            isolated: network.isolated_count(),
        }
    }
}

/// JSON summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Library version that produced the run
    pub version: String,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock end
    pub finished_at: DateTime<Utc>,
    /// Effective configuration (including the seed actually used)
    pub config: Config,
    /// Fixed network statistics
    pub network: NetworkSummary,
    /// Cooperation fraction after the last round
    pub final_cooperation: Option<f64>,
    /// Mean of the defined per-round CVs
    pub mean_cv: Option<f64>,
    /// Every round record
    pub rounds: Vec<RoundRecord>,
}

impl RunSummary {
    /// Summarise `rounds`
    pub fn new(
        config: &Config,
        network: &Network,
        started_at: DateTime<Utc>,
        rounds: Vec<RoundRecord>,
    ) -> Self {
        let defined: Vec<f64> = rounds.iter().filter_map(|r| r.cv).collect();
        let mean_cv = if defined.is_empty() {
            None
        } else {
            Some(defined.iter().sum::<f64>() / defined.len() as f64)
        };

        Self {
            version: crate::VERSION.to_string(),
            started_at,
            finished_at: Utc::now(),
            config: config.clone(),
            network: NetworkSummary::from(network),
            final_cooperation: rounds.last().map(|r| r.cooperation_fraction),
            mean_cv,
            rounds,
        }
    }

    /// Write as pretty-printed JSON
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: usize, cv: Option<f64>, pc: f64) -> RoundRecord {
        RoundRecord {
            step,
            cv,
            cooperation_fraction: pc,
            cooperators: 0,
            defectors: 0,
            stranger_links: 0,
            imitations: 0,
            saturated: 0,
        }
    }

    #[test]
    fn test_writer_emits_tab_separated_lines() {
        let mut writer = ReportWriter::new(Vec::new(), false);
        writer.record(&record(0, Some(0.7071), 0.49)).unwrap();
        writer.record(&record(1, None, 0.5)).unwrap();
        writer.finish().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "0\tCV=0.7071\tP_c=0.4900\n1\tCV=nan\tP_c=0.5000\n");
    }

    #[test]
    fn test_record_reaches_file_before_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ER.txt");
        let mut writer = ReportWriter::create(&path, false).unwrap();

        writer.record(&record(0, Some(0.25), 0.5)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0\tCV=0.2500\tP_c=0.5000\n");

        writer.record(&record(1, None, 0.75)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::default();
        sink.record(&record(0, Some(1.0), 0.2)).unwrap();
        assert_eq!(sink.records.len(), 1);
    }

    #[test]
    fn test_summary_skips_undefined_cv() {
        let network = Network::from_edges(3, &[(0, 1)]).unwrap();
        let rounds = vec![
            record(0, Some(0.5), 0.4),
            record(1, None, 0.6),
            record(2, Some(1.5), 0.8),
        ];
        let summary = RunSummary::new(&Config::default(), &network, Utc::now(), rounds);
        assert_eq!(summary.mean_cv, Some(1.0));
        assert_eq!(summary.final_cooperation, Some(0.8));
        assert_eq!(summary.network.edges, 1);
        assert_eq!(summary.network.isolated, 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["rounds"][1]["cv"].is_null());
    }
}
