// ============================================================
// Layer 5 — Merging Model Scores into the Code Skeleton
// ============================================================
// The model only scores markdown cells. To get a full predicted
// ordering, each code cell is given a score from its place in
// the skeleton and everything is sorted by score:
//
//   code cell k of n (1-based)  → k / n        (percentile rank)
//   markdown cell               → model score  (≈ [0, 1])
//
// Example, 3 code cells and 2 markdown cells:
//   c1 = 0.33   c2 = 0.67   c3 = 1.00
//   m1 = 0.10   m2 = 0.70
//   order: m1 c1 c2 m2 c3
//
// Code-cell percentiles are increasing, so code cells can never
// overtake each other. Rather than one global sort, the sorted
// markdown cells are merged into the code sequence, which
// guarantees that property even for equal scores.
//
// Ties:
//   - markdown vs code   → markdown first (it introduces the code)
//   - markdown vs markdown → by cell id, for a stable result

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::cell::{Cell, CellType};
use crate::domain::notebook::{Notebook, OrderMap};
use crate::scoring::error::ScoreError;

/// Build a predicted ordering of one notebook from its skeleton
/// and the model scores of its markdown cells.
///
/// `skeleton` holds the notebook's cells with code cells in their
/// original relative order; the position of markdown cells in it
/// is ignored. `markdown_scores` maps markdown cell ids to scores;
/// entries for cells not in the skeleton are ignored.
pub fn merge_predicted_scores(
    skeleton:        &[Cell],
    markdown_scores: &HashMap<String, f64>,
) -> Result<Vec<String>, ScoreError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(skeleton.len());
    let mut code:     Vec<&str>        = Vec::new();
    let mut markdown: Vec<(f64, &str)> = Vec::new();

    for cell in skeleton {
        if !seen.insert(cell.id.as_str()) {
            return Err(ScoreError::RepeatedCell { cell: cell.id.clone() });
        }

        match cell.cell_type {
            CellType::Code => code.push(cell.id.as_str()),
            CellType::Markdown => {
                let score = *markdown_scores
                    .get(&cell.id)
                    .ok_or_else(|| ScoreError::MissingScore { cell: cell.id.clone() })?;
                if !score.is_finite() {
                    return Err(ScoreError::NonFiniteScore { cell: cell.id.clone(), score });
                }
                markdown.push((score, cell.id.as_str()));
            }
        }
    }

    markdown.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    // ── Merge the two sorted sequences ───────────────────────────────────────
    let n_code  = code.len() as f64;
    let mut out = Vec::with_capacity(skeleton.len());
    let mut md  = markdown.into_iter().peekable();

    for (k, code_id) in code.into_iter().enumerate() {
        let percentile = (k + 1) as f64 / n_code;
        while let Some((_, md_id)) = md.next_if(|(score, _)| *score <= percentile) {
            out.push(md_id.to_string());
        }
        out.push(code_id.to_string());
    }
    out.extend(md.map(|(_, id)| id.to_string()));

    Ok(out)
}

/// Merge scores for every notebook of a corpus.
///
/// `scores` is keyed by notebook id, then by markdown cell id.
/// A notebook without any entry in `scores` is fine as long as
/// it has no markdown cells.
pub fn merge_corpus(
    notebooks: &BTreeMap<String, Notebook>,
    scores:    &HashMap<String, HashMap<String, f64>>,
) -> Result<OrderMap, ScoreError> {
    let no_scores = HashMap::new();
    let mut predicted = OrderMap::new();

    for (id, notebook) in notebooks {
        let doc_scores = scores.get(id).unwrap_or(&no_scores);
        let order = merge_predicted_scores(&notebook.cells, doc_scores)
            .map_err(|e| e.in_notebook(id.as_str()))?;
        predicted.insert(id.clone(), order);
    }

    tracing::debug!("Merged predicted scores for {} notebooks", predicted.len());
    Ok(predicted)
}
