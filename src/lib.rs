//! Scores predicted cell orderings of notebook-like documents.
//!
//! The layers, outermost first:
//!
//! - [`cli`]: clap commands (`score`, `evaluate`, `split`)
//! - [`application`]: one use case per command
//! - [`scoring`]: inversion counting, the Kendall-tau style score
//!   and the merge of markdown scores into the code-cell skeleton
//! - [`data`]: CSV loaders and the train/validation splitter
//! - [`infra`]: training-state checkpoints and metrics sinks
//! - [`domain`]: cells, notebooks and the collaborator traits

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod scoring;

pub use scoring::{kendall_tau, merge_predicted_scores, ScoreError};
