// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Splits a corpus of notebook orderings into a training part
// and a validation part.
//
// The split is done per NOTEBOOK, never per cell: cells of one
// notebook must all land on the same side, otherwise the
// validation notebooks would be partially seen in training.
//
// The shuffle is seeded so the same seed always produces the
// same split. The CLI default seed is 0.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom on a
// StdRng.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::notebook::OrderMap;

/// Shuffle `items` with `seed` and split into (train, validation).
///
/// # Arguments
/// * `items`          - All items (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.9 = 90%
/// * `seed`           - RNG seed
pub fn split_train_val<T>(mut items: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    // e.g. 100 items * 0.9 = 90 → first 90 are training
    let total    = items.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split_at = ((total as f64) * fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let val = items.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        items.len(),
        val.len(),
        (items.len() * 100) / total.max(1),
        (val.len()   * 100) / total.max(1),
    );

    (items, val)
}

/// Split an OrderMap by notebook id.
pub fn split_orders(orders: OrderMap, train_fraction: f64, seed: u64) -> (OrderMap, OrderMap) {
    // BTreeMap iteration is sorted, so the input to the shuffle is
    // always the same for the same corpus
    let entries: Vec<(String, Vec<String>)> = orders.into_iter().collect();
    let (train, val) = split_train_val(entries, train_fraction, seed);
    (train.into_iter().collect(), val.into_iter().collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.8, 0);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize>   = (0..50).collect();
        let (train, val)        = split_train_val(items, 0.7, 0);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_val((0..40).collect::<Vec<u32>>(), 0.5, 7);
        let b = split_train_val((0..40).collect::<Vec<u32>>(), 0.5, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.8, 0);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_fraction_is_clamped() {
        let (train, val) = split_train_val((0..10).collect::<Vec<u8>>(), 1.7, 0);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }

    #[test]
    fn test_split_orders_keeps_notebooks_whole() {
        let mut orders = OrderMap::new();
        for i in 0..20 {
            orders.insert(format!("nb{i}"), vec![format!("a{i}"), format!("b{i}")]);
        }
        let (train, val) = split_orders(orders.clone(), 0.75, 0);
        assert_eq!(train.len(), 15);
        assert_eq!(val.len(), 5);
        for (id, cells) in train.iter().chain(val.iter()) {
            assert_eq!(&orders[id], cells);
        }
    }
}
