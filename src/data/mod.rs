// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Gets tabular inputs off disk and into domain types:
//
//   orders CSV  ──▶ OrdersCsvLoader ──▶ OrderMap
//   cells CSV   ──▶ CellsCsvLoader  ──▶ Notebook per id
//   scores CSV  ──▶ ScoresCsvLoader ──▶ notebook → cell → score
//
// and splits a corpus by notebook into train / validation.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// CSV readers (and the orders writer)
pub mod loader;

/// Seeded train/validation split by notebook
pub mod splitter;
