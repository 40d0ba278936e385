// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Splits a ground-truth orders file into train and validation
// files by notebook:
//
//   <out_dir>/train_orders.csv
//   <out_dir>/val_orders.csv

use anyhow::Result;
use std::path::PathBuf;

use crate::data::loader::{write_orders_csv, OrdersCsvLoader};
use crate::data::splitter::split_orders;
use crate::domain::traits::OrderingSource;

pub struct SplitUseCase {
    orders_path:    PathBuf,
    out_dir:        PathBuf,
    train_fraction: f64,
    seed:           u64,
}

impl SplitUseCase {
    pub fn new(
        orders_path:    impl Into<PathBuf>,
        out_dir:        impl Into<PathBuf>,
        train_fraction: f64,
        seed:           u64,
    ) -> Self {
        Self {
            orders_path: orders_path.into(),
            out_dir:     out_dir.into(),
            train_fraction,
            seed,
        }
    }

    /// Returns (train notebooks, validation notebooks)
    pub fn execute(&self) -> Result<(usize, usize)> {
        let orders       = OrdersCsvLoader::new(&self.orders_path).load_orders()?;
        let (train, val) = split_orders(orders, self.train_fraction, self.seed);

        write_orders_csv(&self.out_dir.join("train_orders.csv"), &train)?;
        write_orders_csv(&self.out_dir.join("val_orders.csv"), &val)?;

        tracing::info!(
            "Split into {} train / {} validation notebooks in '{}'",
            train.len(),
            val.len(),
            self.out_dir.display()
        );
        Ok((train.len(), val.len()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_both_files() {
        let dir    = TempDir::new().unwrap();
        let orders = dir.path().join("orders.csv");
        let body: String = std::iter::once("id,cell_order\n".to_string())
            .chain((0..10).map(|i| format!("nb{i},a{i} b{i}\n")))
            .collect();
        fs::write(&orders, body).unwrap();

        let out = dir.path().join("split");
        let (n_train, n_val) = SplitUseCase::new(&orders, &out, 0.8, 0).execute().unwrap();
        assert_eq!((n_train, n_val), (8, 2));

        let train = OrdersCsvLoader::new(out.join("train_orders.csv")).load_orders().unwrap();
        let val   = OrdersCsvLoader::new(out.join("val_orders.csv")).load_orders().unwrap();
        assert_eq!(train.len() + val.len(), 10);
        assert!(train.keys().all(|k| !val.contains_key(k)));
    }
}
