// ============================================================
// Layer 5 — Kendall Tau Ranking Score
// ============================================================
// Scores predicted cell orderings against the ground truth.
//
// Per notebook:
//   1. map every cell id to its ground-truth position
//   2. replace each id of the predicted ordering by that position
//   3. count the inversions of the resulting integer sequence
//   4. the worst case is a full reversal: n * (n - 1) / 2
//
// Across the corpus the counts are summed (not averaged per
// notebook, so long notebooks weigh more) and turned into
//
//   score = 1 - 4 * total_inversions / total_2max
//
// where total_2max = Σ n * (n - 1), twice the summed worst case.
// The score therefore lies in [-1, 1]: 1.0 for a perfect
// ordering, -1.0 when every notebook is fully reversed.
//
// A corpus where every notebook has 0 or 1 cells carries no
// ordering signal at all and scores 0.0.
//
// Notebooks are independent, so they are counted in parallel
// with rayon and the totals are combined by summation. Errors
// are reported for the first failing notebook in key order.
//
// Reference: Kendall (1938) "A New Measure of Rank Correlation"
//            rayon crate documentation

use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::notebook::OrderMap;
use crate::scoring::error::ScoreError;
use crate::scoring::inversions::{count_inversions, max_inversions};

/// Inversion counts for a single notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentScore {
    pub inversions:     u64,
    pub max_inversions: u64,
}

impl DocumentScore {
    /// Notebooks with 0 or 1 cells cannot be misordered
    pub fn is_degenerate(&self) -> bool {
        self.max_inversions == 0
    }
}

/// Corpus-level result of a scoring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TauReport {
    /// The final score, 1.0 for a perfect ordering
    pub score: f64,

    pub total_inversions:     u64,
    pub total_max_inversions: u64,

    /// Number of notebooks scored
    pub documents: usize,

    /// How many of those had 0 or 1 cells
    pub degenerate: usize,
}

/// Turn summed inversion counts into the final score.
///
/// `total_max_inversions` is Σ n * (n - 1) / 2; the score is
/// normalised by twice that.
pub fn tau_from_totals(total_inversions: u64, total_max_inversions: u64) -> f64 {
    let total_2max = 2 * total_max_inversions;
    if total_2max == 0 {
        return 0.0;
    }
    1.0 - 4.0 * total_inversions as f64 / total_2max as f64
}

/// Count inversions of one notebook's predicted ordering against
/// its ground truth.
///
/// Fails if either ordering repeats a cell id or if the two
/// orderings are not permutations of the same id set.
pub fn score_document(
    document:     &str,
    ground_truth: &[String],
    predicted:    &[String],
) -> Result<DocumentScore, ScoreError> {
    // ── Step 1: cell id → ground-truth position ──────────────────────────────
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(ground_truth.len());
    for (idx, cell) in ground_truth.iter().enumerate() {
        if position.insert(cell.as_str(), idx).is_some() {
            return Err(ScoreError::DuplicateCell {
                document: document.to_string(),
                cell:     cell.clone(),
            });
        }
    }

    if predicted.len() != ground_truth.len() {
        return Err(ScoreError::PrecisionMismatch {
            document: document.to_string(),
            detail:   format!(
                "expected {} cells, predicted {}",
                ground_truth.len(),
                predicted.len()
            ),
        });
    }

    // ── Step 2: predicted ids → ground-truth ranks ───────────────────────────
    let mut seen  = vec![false; ground_truth.len()];
    let mut ranks = Vec::with_capacity(predicted.len());

    for cell in predicted {
        let Some(&rank) = position.get(cell.as_str()) else {
            return Err(ScoreError::PrecisionMismatch {
                document: document.to_string(),
                detail:   format!("unexpected cell '{cell}'"),
            });
        };
        if seen[rank] {
            return Err(ScoreError::DuplicateCell {
                document: document.to_string(),
                cell:     cell.clone(),
            });
        }
        seen[rank] = true;
        ranks.push(rank);
    }

    // ── Step 3 + 4: count and bound ──────────────────────────────────────────
    let (inversions, _) = count_inversions(&ranks);

    Ok(DocumentScore {
        inversions,
        max_inversions: max_inversions(ranks.len()),
    })
}

/// Score a whole corpus and keep the intermediate totals.
///
/// Both maps must hold exactly the same notebook ids.
pub fn kendall_tau_breakdown(
    ground_truth: &OrderMap,
    predicted:    &OrderMap,
) -> Result<TauReport, ScoreError> {
    if let Some(extra) = predicted.keys().find(|k| !ground_truth.contains_key(*k)) {
        return Err(ScoreError::MissingDocument {
            document: extra.clone(),
            side:     "ground truth",
        });
    }

    let documents: Vec<(&String, &Vec<String>)> = ground_truth.iter().collect();

    // Indexed parallel iterator: results come back in key order
    let results: Vec<Result<DocumentScore, ScoreError>> = documents
        .par_iter()
        .map(|(id, truth)| match predicted.get(id.as_str()) {
            Some(pred) => score_document(id, truth, pred),
            None => Err(ScoreError::MissingDocument {
                document: (*id).clone(),
                side:     "predicted",
            }),
        })
        .collect();

    let mut report = TauReport::default();
    for result in results {
        let doc = result?;
        report.total_inversions     += doc.inversions;
        report.total_max_inversions += doc.max_inversions;
        report.documents            += 1;
        if doc.is_degenerate() {
            report.degenerate += 1;
        }
    }
    report.score = tau_from_totals(report.total_inversions, report.total_max_inversions);

    tracing::debug!(
        "Scored {} notebooks ({} degenerate): {} / {} inversions",
        report.documents,
        report.degenerate,
        report.total_inversions,
        report.total_max_inversions,
    );

    Ok(report)
}

/// Score predicted orderings against ground truth.
///
/// Returns 1.0 when every notebook is ordered exactly right and
/// 0.0 when no notebook has more than one cell.
pub fn kendall_tau(ground_truth: &OrderMap, predicted: &OrderMap) -> Result<f64, ScoreError> {
    kendall_tau_breakdown(ground_truth, predicted).map(|r| r.score)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(id: &str, cells: &[&str]) -> (String, Vec<String>) {
        (id.to_string(), cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_identical_orderings_score_one() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c"])]);
        assert_eq!(kendall_tau(&truth, &truth.clone()).unwrap(), 1.0);
    }

    #[test]
    fn test_two_adjacent_swaps() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c", "d"])]);
        let pred  = OrderMap::from([doc("doc1", &["b", "a", "d", "c"])]);

        let report = kendall_tau_breakdown(&truth, &pred).unwrap();
        assert_eq!(report.total_inversions, 2);
        assert_eq!(report.total_max_inversions, 6);
        // 1 - 4 * 2 / 12
        assert!((report.score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_reversal_scores_minus_one() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c"])]);
        let pred  = OrderMap::from([doc("doc1", &["c", "b", "a"])]);
        assert_eq!(kendall_tau(&truth, &pred).unwrap(), -1.0);
    }

    #[test]
    fn test_tau_from_totals() {
        assert_eq!(tau_from_totals(0, 0), 0.0);
        assert_eq!(tau_from_totals(0, 10), 1.0);
        assert_eq!(tau_from_totals(5, 10), 0.0);
        assert_eq!(tau_from_totals(10, 10), -1.0);
    }

    #[test]
    fn test_degenerate_corpus_scores_zero() {
        let truth = OrderMap::from([doc("doc1", &["a"]), doc("doc2", &[]), doc("doc3", &["z"])]);
        let report = kendall_tau_breakdown(&truth, &truth.clone()).unwrap();
        assert_eq!(report.score, 0.0);
        assert_eq!(report.documents, 3);
        assert_eq!(report.degenerate, 3);
    }

    #[test]
    fn test_empty_corpus_scores_zero() {
        assert_eq!(kendall_tau(&OrderMap::new(), &OrderMap::new()).unwrap(), 0.0);
    }

    #[test]
    fn test_degenerate_documents_do_not_dilute() {
        let truth = OrderMap::from([doc("big", &["a", "b", "c", "d"]), doc("tiny", &["x"])]);
        let pred  = OrderMap::from([doc("big", &["b", "a", "c", "d"]), doc("tiny", &["x"])]);
        let report = kendall_tau_breakdown(&truth, &pred).unwrap();
        assert_eq!(report.total_inversions, 1);
        assert_eq!(report.total_max_inversions, 6);
        assert_eq!(report.degenerate, 1);
    }

    #[test]
    fn test_totals_are_summed_across_documents() {
        let truth = OrderMap::from([doc("d1", &["a", "b"]), doc("d2", &["c", "d", "e"])]);
        let pred  = OrderMap::from([doc("d1", &["b", "a"]), doc("d2", &["c", "d", "e"])]);
        let report = kendall_tau_breakdown(&truth, &pred).unwrap();
        // 1 inversion, 2 * (1 + 3) doubled max → 1 - 4 * 1/8
        assert_eq!(report.total_max_inversions, 4);
        assert_eq!(report.score, 0.5);
    }

    #[test]
    fn test_unexpected_cell_is_precision_mismatch() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c"])]);
        let pred  = OrderMap::from([doc("doc1", &["a", "b", "x"])]);
        let err = kendall_tau(&truth, &pred).unwrap_err();
        assert!(matches!(err, ScoreError::PrecisionMismatch { ref document, .. } if document == "doc1"));
    }

    #[test]
    fn test_length_difference_is_precision_mismatch() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c"])]);
        let pred  = OrderMap::from([doc("doc1", &["a", "b"])]);
        assert!(matches!(
            kendall_tau(&truth, &pred),
            Err(ScoreError::PrecisionMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_in_prediction_is_rejected() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c"])]);
        let pred  = OrderMap::from([doc("doc1", &["a", "a", "b"])]);
        assert_eq!(
            kendall_tau(&truth, &pred).unwrap_err(),
            ScoreError::DuplicateCell { document: "doc1".into(), cell: "a".into() }
        );
    }

    #[test]
    fn test_duplicate_in_ground_truth_is_rejected() {
        let truth = OrderMap::from([doc("doc1", &["a", "a"])]);
        let pred  = OrderMap::from([doc("doc1", &["a", "a"])]);
        assert!(matches!(
            kendall_tau(&truth, &pred),
            Err(ScoreError::DuplicateCell { .. })
        ));
    }

    #[test]
    fn test_missing_documents_on_either_side() {
        let truth = OrderMap::from([doc("doc1", &["a", "b"]), doc("doc2", &["c", "d"])]);
        let pred  = OrderMap::from([doc("doc1", &["a", "b"])]);
        assert_eq!(
            kendall_tau(&truth, &pred).unwrap_err(),
            ScoreError::MissingDocument { document: "doc2".into(), side: "predicted" }
        );
        assert_eq!(
            kendall_tau(&pred, &truth).unwrap_err(),
            ScoreError::MissingDocument { document: "doc2".into(), side: "ground truth" }
        );
    }

    #[test]
    fn test_first_failing_document_in_key_order_is_reported() {
        let truth = OrderMap::from([doc("a", &["1", "2"]), doc("b", &["3", "4"])]);
        let pred  = OrderMap::from([doc("a", &["1", "x"]), doc("b", &["3", "y"])]);
        let err = kendall_tau(&truth, &pred).unwrap_err();
        assert!(matches!(err, ScoreError::PrecisionMismatch { ref document, .. } if document == "a"));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let truth = OrderMap::from([doc("doc1", &["a", "b", "c"])]);
        let pred  = OrderMap::from([doc("doc1", &["c", "a", "b"])]);
        let (t0, p0) = (truth.clone(), pred.clone());
        let _ = kendall_tau(&truth, &pred).unwrap();
        assert_eq!(truth, t0);
        assert_eq!(pred, p0);
    }

    proptest! {
        #[test]
        fn score_does_not_depend_on_insertion_order(
            docs in prop::collection::vec(prop::collection::hash_set(0u32..1000, 0..12), 1..8),
        ) {
            // Ground truth in hash-set order, prediction sorted; the
            // documents go into the maps forwards and backwards.
            let mut entries = Vec::new();
            for (d, cells) in docs.iter().enumerate() {
                let truth: Vec<String> = cells.iter().map(|c| format!("c{c}")).collect();
                let mut pred = truth.clone();
                pred.sort();
                entries.push((format!("doc{d}"), truth, pred));
            }

            let forward_truth: OrderMap = entries.iter().map(|(k, t, _)| (k.clone(), t.clone())).collect();
            let forward_pred:  OrderMap = entries.iter().map(|(k, _, p)| (k.clone(), p.clone())).collect();
            let reverse_truth: OrderMap = entries.iter().rev().map(|(k, t, _)| (k.clone(), t.clone())).collect();
            let reverse_pred:  OrderMap = entries.iter().rev().map(|(k, _, p)| (k.clone(), p.clone())).collect();

            prop_assert_eq!(
                kendall_tau(&forward_truth, &forward_pred).unwrap(),
                kendall_tau(&reverse_truth, &reverse_pred).unwrap()
            );
        }

        #[test]
        fn identical_orderings_score_one_unless_degenerate(n in 0usize..40) {
            let cells: Vec<String> = (0..n).map(|i| format!("cell{i}")).collect();
            let truth: OrderMap = [("doc".to_string(), cells)].into_iter().collect();
            let expected = if n <= 1 { 0.0 } else { 1.0 };
            prop_assert_eq!(kendall_tau(&truth, &truth).unwrap(), expected);
        }

        #[test]
        fn score_stays_within_unit_range(
            docs in prop::collection::vec(
                prop::collection::vec(any::<u16>(), 0..20).prop_map(|mut keys| {
                    keys.sort();
                    keys.dedup();
                    keys
                }),
                1..6,
            ),
            shuffle_seed in any::<u64>(),
        ) {
            use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

            let mut rng = StdRng::seed_from_u64(shuffle_seed);
            let mut truth = OrderMap::new();
            let mut pred  = OrderMap::new();
            for (d, keys) in docs.iter().enumerate() {
                let cells: Vec<String> = keys.iter().map(|k| format!("c{k}")).collect();
                let mut shuffled = cells.clone();
                shuffled.shuffle(&mut rng);
                truth.insert(format!("doc{d}"), cells);
                pred.insert(format!("doc{d}"), shuffled);
            }

            let score = kendall_tau(&truth, &pred).unwrap();
            prop_assert!((-1.0..=1.0).contains(&score));
        }
    }
}
