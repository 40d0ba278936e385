// ============================================================
// Layer 3 — Notebook Domain Type
// ============================================================
// A notebook (the "document" being ordered) owns a sequence of
// cells. Orderings of a whole corpus are kept in an `OrderMap`:
// notebook id → cell ids in order.
//
// OrderMap is a BTreeMap so iteration is always in key order,
// which keeps logs and error reports reproducible.
//
// Reference: Rust Book §8 (Collections)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::cell::Cell;

/// Notebook id → ordered cell ids.
pub type OrderMap = BTreeMap<String, Vec<String>>;

/// A notebook with its cells in ingestion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Opaque notebook id
    pub id: String,

    /// Cells sorted by their `rank`
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn new(id: impl Into<String>, mut cells: Vec<Cell>) -> Self {
        cells.sort_by_key(|c| c.rank);
        Self { id: id.into(), cells }
    }

    /// Number of markdown cells, i.e. how many scores the model
    /// is expected to produce for this notebook
    pub fn markdown_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_markdown()).count()
    }
}

#[cfg(test)]
impl Notebook {
    /// Cell ids in the order they are stored
    pub fn cell_ids(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.id.clone()).collect()
    }
}
