// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system side of a training run:
//
//   run_dir.rs      — Run directory layout
//                     Creates <log_dir>/<run>/{train,val} and
//                     snapshots the resolved config as JSON.
//
//   event_writer.rs — EventSink backed by files
//                     Scalars to CSV, text to JSON lines,
//                     attention figures to SVG + CSV.
//
//   visualize.rs    — Attention rendering
//                     Heatmap SVG, weight CSV and the text
//                     summary of a sampled translation.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Run directory creation and config snapshot
pub mod run_dir;

/// File-backed training event streams
pub mod event_writer;

/// Attention heatmaps and sample text
pub mod visualize;
