// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No scoring math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// One evaluation epoch: merge, score, record, checkpoint
pub mod evaluate_use_case;

// Score a predicted orders file against ground truth
pub mod score_use_case;

// Split an orders file into train / validation notebooks
pub mod split_use_case;
