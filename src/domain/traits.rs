// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to its collaborators only
// through these traits:
//
//   OrderingSource — where ground-truth / predicted orders come from
//   CellSource     — where the validation cell table comes from
//   ScoreSource    — where per-markdown-cell model scores come from
//   MetricsSink    — where evaluation metrics go
//   Persistable    — anything that can be saved and restored
//
// The CSV loaders in the data layer implement the first three,
// infra::metrics provides the sinks and infra::checkpoint the
// persistable training state.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::domain::notebook::{Notebook, OrderMap};

// ─── OrderingSource ───────────────────────────────────────────────────────────
/// Anything that can produce a corpus of cell orderings.
///
/// Implementations:
///   - OrdersCsvLoader → `id,cell_order` CSV files
pub trait OrderingSource {
    fn load_orders(&self) -> Result<OrderMap>;
}

// ─── CellSource ───────────────────────────────────────────────────────────────
/// Anything that can produce notebooks with typed, ranked cells.
///
/// Implementations:
///   - CellsCsvLoader → `id,cell_id,cell_type,rank` CSV files
pub trait CellSource {
    fn load_notebooks(&self) -> Result<BTreeMap<String, Notebook>>;
}

// ─── ScoreSource ──────────────────────────────────────────────────────────────
/// Anything that can produce one model score per markdown cell,
/// keyed by notebook id and then by cell id.
///
/// Implementations:
///   - ScoresCsvLoader → `id,cell_id,score` CSV files
pub trait ScoreSource {
    fn load_scores(&self) -> Result<HashMap<String, HashMap<String, f64>>>;
}

// ─── MetricsSink ──────────────────────────────────────────────────────────────
/// Receives scalar metrics keyed by name and step (epoch).
///
/// Implementations:
///   - CsvMetricsSink     → appends rows to metrics.csv
///   - TracingMetricsSink → emits tracing events
///   - MemoryMetricsSink  → keeps records in memory
pub trait MetricsSink {
    fn record(&mut self, key: &str, value: f64, step: usize) -> Result<()>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - TrainingState → checkpoint JSON
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path
    fn load(path: &Path) -> Result<Self>;
}
