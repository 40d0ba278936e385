// ============================================================
// Layer 3 — Cell Domain Type
// ============================================================
// A single notebook cell: either a code block or a markdown block.
//
// The id is opaque and only unique inside its own notebook,
// so the same cell id may appear in two different notebooks.
//
// `rank` is the cell's position in the input ordering it was
// ingested with. For code cells this is the fixed skeleton
// order; for markdown cells it carries no meaning at
// evaluation time (that is what the model has to predict).
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use serde::{Deserialize, Serialize};

/// The two kinds of notebook cell, spelled `code` / `markdown`
/// in the CSV tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
}

/// One cell of a notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Opaque id, unique within the owning notebook
    pub id: String,

    /// Code or markdown, assigned at ingestion and never changed
    pub cell_type: CellType,

    /// Position in the ordering this cell was loaded with
    pub rank: usize,
}

impl Cell {
    /// Create a new Cell.
    ///
    /// Example:
    ///   let cell = Cell::new("1862f0a6", CellType::Code, 0);
    pub fn new(id: impl Into<String>, cell_type: CellType, rank: usize) -> Self {
        Self {
            id: id.into(),
            cell_type,
            rank,
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.cell_type == CellType::Markdown
    }
}

// Shorthand constructors for test fixtures
#[cfg(test)]
impl Cell {
    pub fn code(id: impl Into<String>, rank: usize) -> Self {
        Self::new(id, CellType::Code, rank)
    }

    pub fn markdown(id: impl Into<String>, rank: usize) -> Self {
        Self::new(id, CellType::Markdown, rank)
    }
}
