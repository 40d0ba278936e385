// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists the training-loop state between runs as JSON.
//
// What gets saved:
//   1. training_state.json — epoch, loss, best score and the
//                            optimizer / scheduler state blobs
//   2. run_config.json     — the EvaluateConfig of the run
//
// The optimizer and scheduler are owned by the external training
// loop, so their state is kept as opaque JSON: the loop dumps it
// to a file, `evaluate --optimizer-state/--scheduler-state` folds
// it into training_state.json, and a resumed loop reads it back
// from there. This layer never looks inside.
//
// File layout:
//   checkpoints/
//     training_state.json
//     run_config.json
//     metrics.csv          ← written by infra::metrics
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json crate documentation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::domain::traits::Persistable;

const STATE_FILE:  &str = "training_state.json";
const CONFIG_FILE: &str = "run_config.json";

// ─── TrainingState ────────────────────────────────────────────────────────────
/// Everything needed to resume a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingState {
    /// Last completed epoch (1-based), 0 before the first epoch
    pub epoch: usize,

    /// Average training loss of the last completed epoch
    pub loss: Option<f64>,

    /// Best validation score seen so far
    pub best_score: Option<f64>,

    /// Epoch that produced `best_score`
    pub best_epoch: Option<usize>,

    /// Serialised optimizer state, owned by the training loop
    #[serde(default)]
    pub optimizer_state: serde_json::Value,

    /// Serialised learning-rate scheduler state
    #[serde(default)]
    pub scheduler_state: serde_json::Value,
}

impl TrainingState {
    /// The epoch a resumed run should start with
    pub fn next_epoch(&self) -> usize {
        self.epoch + 1
    }

    /// Fold the result of one epoch into the state.
    /// Returns true when `score` beats the previous best.
    pub fn record_epoch(&mut self, epoch: usize, loss: Option<f64>, score: f64) -> bool {
        self.epoch = epoch;
        if loss.is_some() {
            self.loss = loss;
        }

        let improved = self.best_score.map_or(true, |best| score > best);
        if improved {
            self.best_score = Some(score);
            self.best_epoch = Some(epoch);
        }
        improved
    }
}

/// Read an opaque optimizer / scheduler state dump.
pub fn read_state_blob(path: &Path) -> Result<serde_json::Value> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read state blob from '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("State blob in '{}' is not valid JSON", path.display()))
}

impl Persistable for TrainingState {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write training state to '{}'", path.display()))?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read training state from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Corrupt training state in '{}'", path.display()))
    }
}

// ─── CheckpointManager ────────────────────────────────────────────────────────
/// Manages the checkpoint directory of one run.
pub struct CheckpointManager {
    /// Path to the directory where checkpoints are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory
    /// (and its parents) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub fn save_state(&self, state: &TrainingState) -> Result<()> {
        state.save(&self.state_path())?;
        tracing::debug!("Saved training state: epoch {}", state.epoch);
        Ok(())
    }

    pub fn load_state(&self) -> Result<TrainingState> {
        let path = self.state_path();
        if !path.exists() {
            anyhow::bail!(
                "No training state in '{}'. Run 'evaluate' without --resume first.",
                self.dir.display()
            );
        }
        let state = TrainingState::load(&path)?;
        tracing::info!("Loaded training state from epoch {}", state.epoch);
        Ok(state)
    }

    /// Resume from the saved state, or start fresh.
    pub fn load_or_default(&self, resume: bool) -> Result<TrainingState> {
        if resume {
            self.load_state()
        } else {
            tracing::info!("Starting from a fresh training state");
            Ok(TrainingState::default())
        }
    }

    /// Save the run configuration to JSON.
    pub fn save_config(&self, cfg: &EvaluateConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(())
    }
}
