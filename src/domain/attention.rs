// ============================================================
// Layer 3 — Attention Windows
// ============================================================
// The decoder only attends over a contiguous slice of encoder
// outputs around an alignment point:
//
//   source:   e0  e1  e2  e3  e4  e5  e6
//   center:               ^
//   window:           [ e2  e3  e4 ]      half_width = 1
//
// Bounds are inclusive and always clamped into the source.
//
// AttentionMatrix collects one full-length row per decode step
// for visualisation: each step's window weights are written at
// [start ..= end] and every other cell stays zero.

use serde::{Deserialize, Serialize};

/// Inclusive window bounds into the encoder output sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub start: usize,
    pub end:   usize,
}

impl WindowBounds {
    /// Number of positions covered (end - start + 1).
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Clamp a window of `2 * half_width + 1` positions around `center`
/// into `[0, source_length - 1]`.
///
/// A center past the end of the source is moved to the last position
/// first, so `start <= end` holds for any request.
///
/// `source_length` must be at least 1; the decode loops reject empty
/// sources before any window is requested.
pub fn window_bounds(center: usize, source_length: usize, half_width: usize) -> WindowBounds {
    debug_assert!(source_length > 0, "window requested over an empty source");
    let last   = source_length.saturating_sub(1);
    let center = center.min(last);
    WindowBounds {
        start: center.saturating_sub(half_width),
        end:   center.saturating_add(half_width).min(last),
    }
}

/// Full source-length attention rows, one per decode step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionMatrix {
    columns: usize,
    rows:    Vec<Vec<f32>>,
}

impl AttentionMatrix {
    /// Empty matrix (zero rows) over a source of `columns` positions.
    pub fn new(columns: usize) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Scatter window-local weights into a zero row and append it.
    /// Weights beyond the window length are ignored.
    pub fn push_window(&mut self, bounds: WindowBounds, weights: &[f32]) {
        let mut row = vec![0.0f32; self.columns];
        let end = bounds.end.min(self.columns.saturating_sub(1));
        for (cell, &w) in row[bounds.start..=end].iter_mut().zip(weights) {
            *cell = w;
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }
}

/// Everything needed to draw one attention heatmap:
/// rows are translation words, columns are source words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionFigure {
    pub source_words:      Vec<String>,
    pub translation_words: Vec<String>,
    pub weights:           AttentionMatrix,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_window_centered_inside_source() {
        let w = window_bounds(3, 7, 1);
        assert_eq!(w, WindowBounds { start: 2, end: 4 });
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_window_clamped_at_left_edge() {
        assert_eq!(window_bounds(0, 7, 2), WindowBounds { start: 0, end: 2 });
    }

    #[test]
    fn test_center_beyond_source_clamps_end() {
        // source_length = 5, requested center 10 → end clamped to 4
        let w = window_bounds(10, 5, 2);
        assert_eq!(w.end, 4);
        assert_eq!(w.start, 2);
    }

    #[test]
    fn test_single_token_source() {
        assert_eq!(window_bounds(4, 1, 3), WindowBounds { start: 0, end: 0 });
    }

    #[test]
    fn test_push_window_scatters_weights() {
        let mut m = AttentionMatrix::new(5);
        m.push_window(WindowBounds { start: 1, end: 3 }, &[0.2, 0.5, 0.3]);
        m.push_window(WindowBounds { start: 4, end: 4 }, &[1.0]);

        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.rows()[0], vec![0.0, 0.2, 0.5, 0.3, 0.0]);
        assert_eq!(m.rows()[1][4], 1.0);
        assert_eq!(m.rows()[1][0], 0.0);
    }

    proptest! {
        #[test]
        fn prop_window_always_within_source(
            center in 0usize..200,
            source_length in 1usize..100,
            half_width in 0usize..20,
        ) {
            let w = window_bounds(center, source_length, half_width);
            prop_assert!(w.start <= w.end);
            prop_assert!(w.end < source_length);
            prop_assert!(w.len() <= 2 * half_width + 1);
        }
    }
}
