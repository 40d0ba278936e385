// ============================================================
// Layer 5 — Scoring Errors
// ============================================================
// Every error here is a data-contract violation coming from
// upstream (a broken join, a missing prediction), never a
// transient fault, so nothing is retried.

use thiserror::Error;

/// Failures raised by the scorer and the score merger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// Predicted and ground-truth id sets differ for a notebook
    #[error("notebook '{document}': predicted cell ids do not match ground truth ({detail})")]
    PrecisionMismatch { document: String, detail: String },

    /// A cell id occurs twice in one ordering
    #[error("notebook '{document}': cell '{cell}' appears more than once")]
    DuplicateCell { document: String, cell: String },

    /// A notebook id is present in one ordering map but not the other
    #[error("notebook '{document}' is missing from the {side} orderings")]
    MissingDocument { document: String, side: &'static str },

    /// A cell id occurs twice in a notebook skeleton passed to the
    /// merger; `merge_corpus` adds the notebook via `InNotebook`
    #[error("cell '{cell}' appears more than once in the skeleton")]
    RepeatedCell { cell: String },

    /// A markdown cell in the skeleton has no model score
    #[error("markdown cell '{cell}' has no predicted score")]
    MissingScore { cell: String },

    /// A model score is NaN or infinite
    #[error("cell '{cell}' has a non-finite score ({score})")]
    NonFiniteScore { cell: String, score: f64 },

    /// Wraps a merge failure with the notebook it happened in
    #[error("notebook '{document}'")]
    InNotebook {
        document: String,
        #[source]
        source: Box<ScoreError>,
    },
}

impl ScoreError {
    pub fn in_notebook(self, document: impl Into<String>) -> Self {
        ScoreError::InNotebook {
            document: document.into(),
            source:   Box::new(self),
        }
    }
}
