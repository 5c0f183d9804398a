// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// EventSink is the monitoring boundary of the training loop:
// the orchestrator pushes scalars, text and attention figures
// keyed by step and never reads anything back.
//
// Implementations:
//   - EventWriter    → append-only files under the run directory
//   - RecordingSink  → in-memory, used by the orchestrator tests

use anyhow::Result;

use crate::domain::attention::AttentionFigure;

// ─── EventSink ────────────────────────────────────────────────────────────────
/// An append-only stream of training events.
pub trait EventSink {
    /// Record a scalar time series point, e.g. ("loss", 2.31, 400).
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize) -> Result<()>;

    /// Attach a text blob at a step.
    fn add_text(&mut self, tag: &str, text: &str, step: usize) -> Result<()>;

    /// Attach an attention figure at a step.
    fn add_figure(&mut self, tag: &str, figure: &AttentionFigure, step: usize) -> Result<()>;
}
