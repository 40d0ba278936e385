// ============================================================
// Layer 4 — CSV Loaders
// ============================================================
// Reads the three tables an evaluation pass needs, using the
// csv crate's serde support to deserialise each row.
//
//   orders  — id,cell_order
//             one row per notebook, cell ids separated by spaces
//             (the train_orders.csv / submission format)
//
//   cells   — id,cell_id,cell_type,rank
//             one row per cell of the validation notebooks;
//             rank is the cell's position in the input order
//
//   scores  — id,cell_id,score
//             one row per markdown cell, the model's output;
//             rows with an empty score are dropped
//
// Every error carries the file path and the 1-based data row.
//
// Reference: csv crate documentation (serde deserialisation)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::domain::cell::{Cell, CellType};
use crate::domain::notebook::{Notebook, OrderMap};
use crate::domain::traits::{CellSource, OrderingSource, ScoreSource};

// ─── Row Types ────────────────────────────────────────────────────────────────
#[derive(Debug, Deserialize)]
struct OrderRow {
    id:         String,
    cell_order: String,
}

#[derive(Debug, Deserialize)]
struct CellRow {
    id:        String,
    cell_id:   String,
    cell_type: CellType,
    rank:      usize,
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    id:      String,
    cell_id: String,
    score:   Option<f64>,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open CSV file '{}'", path.display()))
}

// ─── OrdersCsvLoader ──────────────────────────────────────────────────────────
/// Loads `id,cell_order` files into an OrderMap.
pub struct OrdersCsvLoader {
    path: PathBuf,
}

impl OrdersCsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OrderingSource for OrdersCsvLoader {
    fn load_orders(&self) -> Result<OrderMap> {
        let mut reader = open(&self.path)?;
        let mut orders = OrderMap::new();

        for (row, result) in reader.deserialize::<OrderRow>().enumerate() {
            let record = result.with_context(|| {
                format!("Bad row {} in '{}'", row + 1, self.path.display())
            })?;

            let cells: Vec<String> = record
                .cell_order
                .split_whitespace()
                .map(str::to_string)
                .collect();

            if orders.insert(record.id.clone(), cells).is_some() {
                bail!(
                    "Notebook '{}' appears twice in '{}' (row {})",
                    record.id,
                    self.path.display(),
                    row + 1
                );
            }
        }

        tracing::info!("Loaded orderings for {} notebooks from '{}'", orders.len(), self.path.display());
        Ok(orders)
    }
}

// ─── CellsCsvLoader ───────────────────────────────────────────────────────────
/// Loads `id,cell_id,cell_type,rank` files into notebooks.
pub struct CellsCsvLoader {
    path: PathBuf,
}

impl CellsCsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CellSource for CellsCsvLoader {
    fn load_notebooks(&self) -> Result<BTreeMap<String, Notebook>> {
        let mut reader = open(&self.path)?;
        let mut grouped: BTreeMap<String, Vec<Cell>> = BTreeMap::new();

        for (row, result) in reader.deserialize::<CellRow>().enumerate() {
            let record = result.with_context(|| {
                format!("Bad row {} in '{}'", row + 1, self.path.display())
            })?;

            grouped
                .entry(record.id)
                .or_default()
                .push(Cell::new(record.cell_id, record.cell_type, record.rank));
        }

        let notebooks: BTreeMap<String, Notebook> = grouped
            .into_iter()
            .map(|(id, cells)| (id.clone(), Notebook::new(id, cells)))
            .collect();

        let total_cells: usize = notebooks.values().map(|n| n.cells.len()).sum();
        tracing::info!(
            "Loaded {} cells in {} notebooks from '{}'",
            total_cells,
            notebooks.len(),
            self.path.display()
        );
        Ok(notebooks)
    }
}

// ─── ScoresCsvLoader ──────────────────────────────────────────────────────────
/// Loads `id,cell_id,score` files, keyed by notebook then cell.
pub struct ScoresCsvLoader {
    path: PathBuf,
}

impl ScoresCsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreSource for ScoresCsvLoader {
    fn load_scores(&self) -> Result<HashMap<String, HashMap<String, f64>>> {
        let mut reader  = open(&self.path)?;
        let mut scores: HashMap<String, HashMap<String, f64>> = HashMap::new();
        let mut dropped = 0usize;

        for (row, result) in reader.deserialize::<ScoreRow>().enumerate() {
            let record = result.with_context(|| {
                format!("Bad row {} in '{}'", row + 1, self.path.display())
            })?;

            let Some(score) = record.score else {
                dropped += 1;
                continue;
            };

            let previous = scores
                .entry(record.id.clone())
                .or_default()
                .insert(record.cell_id.clone(), score);
            if previous.is_some() {
                bail!(
                    "Cell '{}' of notebook '{}' is scored twice in '{}'",
                    record.cell_id,
                    record.id,
                    self.path.display()
                );
            }
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} rows with empty scores", dropped);
        }
        tracing::info!(
            "Loaded {} markdown scores from '{}'",
            count_scores(&scores),
            self.path.display()
        );
        Ok(scores)
    }
}

/// Total number of scores across all notebooks
pub fn count_scores(scores: &HashMap<String, HashMap<String, f64>>) -> usize {
    scores.values().map(HashMap::len).sum()
}

// ─── Writer ───────────────────────────────────────────────────────────────────
/// Write an OrderMap in the same `id,cell_order` format the
/// OrdersCsvLoader reads.
pub fn write_orders_csv(path: &Path, orders: &OrderMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create CSV file '{}'", path.display()))?;

    writer.write_record(["id", "cell_order"])?;
    for (id, cells) in orders {
        writer.write_record([id.as_str(), cells.join(" ").as_str()])?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} orderings to '{}'", orders.len(), path.display());
    Ok(())
}
