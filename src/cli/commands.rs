// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `score`, `evaluate` and `split`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::evaluate_use_case::{EpochInput, EvaluateConfig};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a predicted orders file against the ground truth
    Score(ScoreArgs),

    /// Evaluate one training epoch from per-markdown-cell scores
    Evaluate(EvaluateArgs),

    /// Split a ground-truth orders file into train / validation notebooks
    Split(SplitArgs),
}

/// All arguments for the `score` command.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Ground-truth orders CSV (id,cell_order)
    #[arg(long, default_value = "data/train_orders.csv")]
    pub orders: String,

    /// Predicted orders CSV in the same format
    #[arg(long)]
    pub predicted: String,
}

/// All arguments for the `evaluate` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Ground-truth orders CSV (id,cell_order)
    #[arg(long, default_value = "data/train_orders.csv")]
    pub orders: String,

    /// Validation cells CSV (id,cell_id,cell_type,rank)
    #[arg(long, default_value = "data/val_cells.csv")]
    pub cells: String,

    /// Model scores CSV, one row per markdown cell (id,cell_id,score)
    #[arg(long, default_value = "data/val_scores.csv")]
    pub scores: String,

    /// Directory for the training state, run config and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Also write the merged predicted orderings to this CSV
    #[arg(long)]
    pub predictions: Option<String>,

    /// Epoch number; defaults to the epoch after the saved state
    #[arg(long)]
    pub epoch: Option<usize>,

    /// Total number of epochs planned for the run (for progress logs)
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Average training loss of the epoch, recorded as a metric
    #[arg(long)]
    pub loss: Option<f64>,

    /// Learning rate at the end of the epoch, recorded as a metric
    #[arg(long)]
    pub lr: Option<f64>,

    /// Resume from the training state in --checkpoint-dir
    #[arg(long)]
    pub resume: bool,

    /// JSON dump of the optimizer state to store with the checkpoint
    #[arg(long)]
    pub optimizer_state: Option<String>,

    /// JSON dump of the learning-rate scheduler state
    #[arg(long)]
    pub scheduler_state: Option<String>,
}

/// Convert CLI EvaluateArgs into the application-layer config.
/// The application layer never sees clap types.
impl From<&EvaluateArgs> for EvaluateConfig {
    fn from(a: &EvaluateArgs) -> Self {
        EvaluateConfig {
            orders_path:      a.orders.clone(),
            cells_path:       a.cells.clone(),
            scores_path:      a.scores.clone(),
            checkpoint_dir:   a.checkpoint_dir.clone(),
            predictions_path: a.predictions.clone(),
            epochs:           a.epochs,
            resume:           a.resume,
        }
    }
}

impl From<&EvaluateArgs> for EpochInput {
    fn from(a: &EvaluateArgs) -> Self {
        EpochInput {
            epoch:           a.epoch,
            loss:            a.loss,
            lr:              a.lr,
            optimizer_state: a.optimizer_state.clone(),
            scheduler_state: a.scheduler_state.clone(),
        }
    }
}

/// All arguments for the `split` command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Ground-truth orders CSV to split
    #[arg(long, default_value = "data/train_orders.csv")]
    pub orders: String,

    /// Directory for train_orders.csv and val_orders.csv
    #[arg(long, default_value = "data/split")]
    pub out_dir: String,

    /// Fraction of notebooks that go to training
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Shuffle seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}
