// ============================================================
// Layer 5 — Scoring Layer
// ============================================================
// Everything that turns model output into a single number.
//
//   inversions.rs — merge-sort inversion counting
//
//   kendall.rs    — per-notebook inversion counts summed over
//                   the corpus and mapped to
//                   1 - 4 * inversions / Σ n(n-1)
//
//   merge.rs      — rebuilds full predicted orderings from the
//                   fixed code-cell skeleton plus markdown scores
//
//   error.rs      — typed ScoreError for broken inputs
//
// This layer is pure: no file I/O, no global state. The
// application layer feeds it data and decides what to do with
// the score.

pub mod error;

/// Merge-sort inversion counting
pub mod inversions;

/// Corpus-level Kendall-tau style score
pub mod kendall;

/// Markdown score → predicted ordering
pub mod merge;

pub use error::ScoreError;
pub use kendall::{kendall_tau, kendall_tau_breakdown, TauReport};
pub use merge::{merge_corpus, merge_predicted_scores};
