// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   checkpoint.rs — TrainingState (epoch, loss, best score,
//                   optimizer/scheduler blobs) and the run
//                   config, saved as JSON in the checkpoint dir
//
//   metrics.rs    — MetricsSink implementations: CSV file,
//                   tracing events, in-memory
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Training state saving and loading
pub mod checkpoint;

/// Metrics sinks
pub mod metrics;
