// ============================================================
// Layer 2 — ScoreUseCase
// ============================================================
// Compares two `id,cell_order` files: the ground truth and a
// predicted ordering (for example a submission file), and
// returns the corpus score.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::loader::OrdersCsvLoader;
use crate::domain::notebook::OrderMap;
use crate::domain::traits::OrderingSource;
use crate::scoring::{kendall_tau_breakdown, TauReport};

pub struct ScoreUseCase {
    orders_path:    PathBuf,
    predicted_path: PathBuf,
}

impl ScoreUseCase {
    pub fn new(orders_path: impl Into<PathBuf>, predicted_path: impl Into<PathBuf>) -> Self {
        Self {
            orders_path:    orders_path.into(),
            predicted_path: predicted_path.into(),
        }
    }

    pub fn execute(&self) -> Result<TauReport> {
        let truth     = OrdersCsvLoader::new(&self.orders_path).load_orders()?;
        let predicted = OrdersCsvLoader::new(&self.predicted_path).load_orders()?;

        // Score only the notebooks that were predicted
        let truth: OrderMap = truth
            .into_iter()
            .filter(|(id, _)| predicted.contains_key(id))
            .collect();

        let report = kendall_tau_breakdown(&truth, &predicted).with_context(|| {
            format!(
                "Cannot score '{}' against '{}'",
                self.predicted_path.display(),
                self.orders_path.display()
            )
        })?;

        tracing::info!(
            "Scored {} notebooks: score={:.4} ({} / {} inversions)",
            report.documents,
            report.score,
            report.total_inversions,
            report.total_max_inversions,
        );
        Ok(report)
    }
}
