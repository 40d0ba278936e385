// ============================================================
// Layer 6 — Metrics Sinks
// ============================================================
// Where evaluation metrics go once an epoch has been scored.
//
// Every sink implements domain::traits::MetricsSink:
//
//   CsvMetricsSink     — appends `step,key,value` rows to
//                        <dir>/metrics.csv
//   TracingMetricsSink — one tracing event per metric
//   MemoryMetricsSink  — keeps everything in a Vec
//
// A Vec<Box<dyn MetricsSink>> is itself a sink and forwards
// each record to all of its members in order.
//
// Example CSV output:
//   step,key,value
//   1,loss,0.4123
//   1,lr,0.00009
//   1,score,0.7312
//
// Values are written in full (shortest exact form), so tiny
// learning rates are not rounded away.
//
// Reference: csv crate documentation
//            Rust Book §17 (Trait Objects)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::domain::traits::MetricsSink;

// ─── EpochMetrics ─────────────────────────────────────────────────────────────
/// The metrics of one evaluation epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average training loss, when the training loop reports it
    pub loss: Option<f64>,

    /// Learning rate at the end of the epoch
    pub lr: Option<f64>,

    /// Ranking score of the validation orderings, higher is better
    pub score: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, loss: Option<f64>, lr: Option<f64>, score: f64) -> Self {
        Self { epoch, loss, lr, score }
    }

    /// Send every available metric to `sink` at step `epoch`
    pub fn record_into(&self, sink: &mut dyn MetricsSink) -> Result<()> {
        if let Some(loss) = self.loss {
            sink.record("loss", loss, self.epoch)?;
        }
        if let Some(lr) = self.lr {
            sink.record("lr", lr, self.epoch)?;
        }
        sink.record("score", self.score, self.epoch)
    }
}

// ─── CsvMetricsSink ───────────────────────────────────────────────────────────
/// Appends metrics to a CSV file.
pub struct CsvMetricsSink {
    csv_path: PathBuf,
}

impl CsvMetricsSink {
    /// Create a sink writing to `<dir>/metrics.csv`.
    /// Writes the header only if the file doesn't exist yet, so
    /// resumed runs keep appending to the same log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut writer = csv::Writer::from_path(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writer.write_record(["step", "key", "value"])?;
            writer.flush()?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

impl MetricsSink for CsvMetricsSink {
    fn record(&mut self, key: &str, value: f64, step: usize) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record([step.to_string(), key.to_string(), value.to_string()])?;
        writer.flush()?;
        Ok(())
    }
}

// ─── TracingMetricsSink ───────────────────────────────────────────────────────
#[derive(Debug, Default)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn record(&mut self, key: &str, value: f64, step: usize) -> Result<()> {
        tracing::info!(step, key, value, "metric");
        Ok(())
    }
}

// ─── MemoryMetricsSink ────────────────────────────────────────────────────────
/// One recorded metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub key:   String,
    pub value: f64,
    pub step:  usize,
}

#[derive(Debug, Default)]
pub struct MemoryMetricsSink {
    records: Vec<MetricRecord>,
}

impl MemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Most recent value recorded under `key`
    pub fn last(&self, key: &str) -> Option<f64> {
        self.records.iter().rev().find(|r| r.key == key).map(|r| r.value)
    }
}

impl MetricsSink for MemoryMetricsSink {
    fn record(&mut self, key: &str, value: f64, step: usize) -> Result<()> {
        self.records.push(MetricRecord { key: key.to_string(), value, step });
        Ok(())
    }
}

impl MetricsSink for Vec<Box<dyn MetricsSink>> {
    fn record(&mut self, key: &str, value: f64, step: usize) -> Result<()> {
        for sink in self.iter_mut() {
            sink.record(key, value, step)?;
        }
        Ok(())
    }
}
