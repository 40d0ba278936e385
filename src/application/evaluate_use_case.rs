// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Runs the evaluation step of one training epoch:
//
//   Step 1: Load ground-truth orders      (Layer 4 - data)
//   Step 2: Load validation cells         (Layer 4 - data)
//   Step 3: Load markdown scores          (Layer 4 - data)
//   Step 4: Merge scores into skeletons   (Layer 5 - scoring)
//   Step 5: Score against ground truth    (Layer 5 - scoring)
//   Step 6: Record metrics                (Layer 6 - infra)
//   Step 7: Update and save the state     (Layer 6 - infra)
//
// If the model produced a different number of scores than there
// are markdown cells, the epoch is scored 0.0 with a warning
// instead of failing, so a long training run keeps going.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::loader::{
    count_scores, write_orders_csv, CellsCsvLoader, OrdersCsvLoader, ScoresCsvLoader,
};
use crate::domain::notebook::OrderMap;
use crate::domain::traits::{CellSource, MetricsSink, OrderingSource, ScoreSource};
use crate::infra::checkpoint::{read_state_blob, CheckpointManager};
use crate::infra::metrics::EpochMetrics;
use crate::scoring::{kendall_tau_breakdown, merge_corpus, ScoreError, TauReport};

// ─── Evaluation Configuration ────────────────────────────────────────────────
// Serialisable so it is stored next to the checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    pub orders_path:      String,
    pub cells_path:       String,
    pub scores_path:      String,
    pub checkpoint_dir:   String,
    pub predictions_path: Option<String>,
    pub epochs:           usize,
    pub resume:           bool,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            orders_path:      "data/train_orders.csv".to_string(),
            cells_path:       "data/val_cells.csv".to_string(),
            scores_path:      "data/val_scores.csv".to_string(),
            checkpoint_dir:   "checkpoints".to_string(),
            predictions_path: None,
            epochs:           5,
            resume:           false,
        }
    }
}

/// Values reported by the training loop for this epoch.
#[derive(Debug, Clone, Default)]
pub struct EpochInput {
    /// Epoch number; defaults to the one after the saved state
    pub epoch: Option<usize>,
    pub loss:  Option<f64>,
    pub lr:    Option<f64>,

    /// JSON dumps of the optimizer / scheduler to keep in the
    /// training state; the previous blobs are kept when absent
    pub optimizer_state: Option<String>,
    pub scheduler_state: Option<String>,
}

/// What happened in one evaluation step.
#[derive(Debug, Clone)]
pub struct EpochOutcome {
    pub epoch: usize,
    pub score: f64,

    /// None when the score/markdown counts did not match
    pub report: Option<TauReport>,

    /// True when this epoch set a new best score and the caller
    /// should keep its model checkpoint
    pub improved: bool,

    pub best_score: Option<f64>,
}

// ─── EvaluateUseCase ──────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, input: EpochInput, sink: &mut dyn MetricsSink) -> Result<EpochOutcome> {
        let cfg  = &self.config;
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt.save_config(cfg)?;

        let mut state = ckpt.load_or_default(cfg.resume)?;
        let epoch     = input.epoch.unwrap_or_else(|| state.next_epoch());

        // ── Steps 1-3: Load inputs ───────────────────────────────────────────
        let truth     = OrdersCsvLoader::new(&cfg.orders_path).load_orders()?;
        let notebooks = CellsCsvLoader::new(&cfg.cells_path).load_notebooks()?;
        let scores    = ScoresCsvLoader::new(&cfg.scores_path).load_scores()?;

        let expected: usize = notebooks.values().map(|n| n.markdown_count()).sum();
        let got             = count_scores(&scores);

        // ── Steps 4-5: Merge and score ───────────────────────────────────────
        let report = if got != expected {
            tracing::warn!(
                "Got {} markdown scores but the cells table has {} markdown cells; scoring epoch {} as 0",
                got,
                expected,
                epoch
            );
            None
        } else {
            let predicted = merge_corpus(&notebooks, &scores)
                .context("Cannot build predicted orderings")?;
            let truth = restrict_to(&truth, &predicted)?;

            if let Some(path) = &cfg.predictions_path {
                write_orders_csv(Path::new(path), &predicted)?;
                tracing::info!("Wrote predicted orderings to '{}'", path);
            }

            Some(kendall_tau_breakdown(&truth, &predicted).context("Scoring failed")?)
        };
        let score = report.map_or(0.0, |r| r.score);

        // ── Steps 6-7: Record and persist ────────────────────────────────────
        let metrics  = EpochMetrics::new(epoch, input.loss, input.lr, score);
        metrics.record_into(sink)?;

        let improved = state.record_epoch(epoch, input.loss, score);
        if let Some(path) = &input.optimizer_state {
            state.optimizer_state = read_state_blob(Path::new(path))?;
        }
        if let Some(path) = &input.scheduler_state {
            state.scheduler_state = read_state_blob(Path::new(path))?;
        }
        ckpt.save_state(&state)?;

        tracing::info!(
            "Epoch {}/{} | score={:.4} | best={:.4}{}",
            epoch,
            cfg.epochs,
            score,
            state.best_score.unwrap_or(score),
            if improved { " (new best)" } else { "" },
        );

        Ok(EpochOutcome {
            epoch,
            score,
            report,
            improved,
            best_score: state.best_score,
        })
    }
}

/// Ground truth for exactly the notebooks that were predicted.
fn restrict_to(truth: &OrderMap, predicted: &OrderMap) -> Result<OrderMap, ScoreError> {
    predicted
        .keys()
        .map(|id| match truth.get(id) {
            Some(cells) => Ok((id.clone(), cells.clone())),
            None => Err(ScoreError::MissingDocument {
                document: id.clone(),
                side:     "ground truth",
            }),
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::metrics::MemoryMetricsSink;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir:    TempDir,
        config: EvaluateConfig,
    }

    fn fixture(scores: &str) -> Fixture {
        let dir  = TempDir::new().unwrap();
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

        fs::write(
            path("orders.csv"),
            "id,cell_order\nnb1,m1 c1 c2 m2 c3\nnb2,c4 m3\nnb_unused,x y\n",
        )
        .unwrap();
        fs::write(
            path("cells.csv"),
            "id,cell_id,cell_type,rank\n\
             nb1,c1,code,0\nnb1,c2,code,1\nnb1,c3,code,2\nnb1,m1,markdown,3\nnb1,m2,markdown,4\n\
             nb2,c4,code,0\nnb2,m3,markdown,1\n",
        )
        .unwrap();
        fs::write(path("scores.csv"), scores).unwrap();

        let config = EvaluateConfig {
            orders_path:      path("orders.csv"),
            cells_path:       path("cells.csv"),
            scores_path:      path("scores.csv"),
            checkpoint_dir:   path("ckpt"),
            predictions_path: Some(path("pred/orders.csv")),
            epochs:           3,
            resume:           false,
        };
        Fixture { dir, config }
    }

    #[test]
    fn test_perfect_scores_give_one() {
        let fx = fixture("id,cell_id,score\nnb1,m1,0.1\nnb1,m2,0.7\nnb2,m3,1.5\n");
        let mut sink = MemoryMetricsSink::new();

        let input   = EpochInput { loss: Some(0.42), lr: Some(9e-5), ..EpochInput::default() };
        let outcome = EvaluateUseCase::new(fx.config.clone()).execute(input, &mut sink).unwrap();

        assert_eq!(outcome.epoch, 1);
        assert_eq!(outcome.score, 1.0);
        assert!(outcome.improved);
        assert_eq!(outcome.report.unwrap().documents, 2);
        assert_eq!(sink.last("score"), Some(1.0));
        assert_eq!(sink.last("loss"), Some(0.42));

        let written = OrdersCsvLoader::new(fx.dir.path().join("pred/orders.csv")).load_orders().unwrap();
        assert_eq!(written["nb1"], vec!["m1", "c1", "c2", "m2", "c3"]);
    }

    #[test]
    fn test_count_mismatch_scores_zero() {
        let fx = fixture("id,cell_id,score\nnb1,m1,0.1\n");
        let mut sink = MemoryMetricsSink::new();

        let outcome = EvaluateUseCase::new(fx.config.clone())
            .execute(EpochInput::default(), &mut sink)
            .unwrap();

        assert_eq!(outcome.score, 0.0);
        assert!(outcome.report.is_none());
        assert_eq!(sink.last("score"), Some(0.0));
    }

    #[test]
    fn test_resume_continues_epochs_and_tracks_best() {
        let fx = fixture("id,cell_id,score\nnb1,m1,0.1\nnb1,m2,0.7\nnb2,m3,1.5\n");
        let mut sink = MemoryMetricsSink::new();

        EvaluateUseCase::new(fx.config.clone())
            .execute(EpochInput::default(), &mut sink)
            .unwrap();

        // Worse predictions in the next epoch
        fs::write(&fx.config.scores_path, "id,cell_id,score\nnb1,m1,0.9\nnb1,m2,0.1\nnb2,m3,0.0\n").unwrap();
        let resumed = EvaluateConfig { resume: true, ..fx.config.clone() };
        let outcome = EvaluateUseCase::new(resumed).execute(EpochInput::default(), &mut sink).unwrap();

        assert_eq!(outcome.epoch, 2);
        assert!(outcome.score < 1.0);
        assert!(!outcome.improved);
        assert_eq!(outcome.best_score, Some(1.0));
    }

    #[test]
    fn test_optimizer_state_is_kept_across_epochs() {
        let fx = fixture("id,cell_id,score\nnb1,m1,0.1\nnb1,m2,0.7\nnb2,m3,1.5\n");
        let blob = fx.dir.path().join("optim.json");
        fs::write(&blob, r#"{"step": 300}"#).unwrap();
        let mut sink = MemoryMetricsSink::new();

        let input = EpochInput {
            optimizer_state: Some(blob.to_string_lossy().into_owned()),
            ..EpochInput::default()
        };
        EvaluateUseCase::new(fx.config.clone()).execute(input, &mut sink).unwrap();

        // Resumed epoch without a new dump keeps the stored one
        let resumed = EvaluateConfig { resume: true, ..fx.config.clone() };
        EvaluateUseCase::new(resumed).execute(EpochInput::default(), &mut sink).unwrap();

        let state = CheckpointManager::new(&fx.config.checkpoint_dir).unwrap().load_state().unwrap();
        assert_eq!(state.epoch, 2);
        assert_eq!(state.optimizer_state["step"], 300);
        assert!(state.scheduler_state.is_null());
    }

    #[test]
    fn test_missing_ground_truth_fails() {
        let fx = fixture("id,cell_id,score\nnb1,m1,0.1\nnb1,m2,0.7\nnb2,m3,1.5\n");
        fs::write(&fx.config.orders_path, "id,cell_order\nnb1,m1 c1 c2 m2 c3\n").unwrap();

        let mut sink = MemoryMetricsSink::new();
        let err = EvaluateUseCase::new(fx.config.clone())
            .execute(EpochInput::default(), &mut sink)
            .unwrap_err();
        assert!(err.to_string().contains("nb2"));
    }
}
