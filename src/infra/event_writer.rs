// ============================================================
// Layer 6 — Event Writer
// ============================================================
// File-backed EventSink. One writer per stream directory
// (<log_dir>/<run>/train and <log_dir>/<run>/val):
//
//   scalars.csv              tag,step,value  (appended per call)
//   text.jsonl               {"tag":..,"step":..,"text":..} per line
//   figures/<tag>_<step>.svg attention heatmap
//   figures/<tag>_<step>.csv the same weights as numbers
//
// Example scalars.csv:
//   tag,step,value
//   loss,1,7.914210
//   loss,2,7.902113
//   epoch_loss,1,6.120004
//
// Files are opened in append mode on every call, so a crash
// loses at most the event being written.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::{attention::AttentionFigure, traits::EventSink};
use crate::infra::visualize::{to_csv, to_svg};

/// One line of text.jsonl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEvent {
    pub tag:  String,
    pub step: usize,
    pub text: String,
}

/// Appends training events under one directory.
pub struct EventWriter {
    scalars:     PathBuf,
    texts:       PathBuf,
    figures_dir: PathBuf,
}

impl EventWriter {
    /// Create the directory layout. Writes the CSV header only if
    /// scalars.csv is new, so a reused run name keeps appending.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir         = dir.as_ref().to_path_buf();
        let figures_dir = dir.join("figures");
        fs::create_dir_all(&figures_dir)
            .with_context(|| format!("Cannot create event directory '{}'", figures_dir.display()))?;

        let scalars = dir.join("scalars.csv");
        if !scalars.exists() {
            let mut f = fs::File::create(&scalars)
                .with_context(|| format!("Cannot create '{}'", scalars.display()))?;
            writeln!(f, "tag,step,value")?;
            tracing::debug!("Created scalar log: '{}'", scalars.display());
        }

        Ok(Self { texts: dir.join("text.jsonl"), scalars, figures_dir })
    }

    fn append(path: &Path, line: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Cannot open '{}' for append", path.display()))?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

impl EventSink for EventWriter {
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize) -> Result<()> {
        Self::append(&self.scalars, &format!("{tag},{step},{value:.6}"))
    }

    fn add_text(&mut self, tag: &str, text: &str, step: usize) -> Result<()> {
        let event = TextEvent { tag: tag.to_string(), step, text: text.to_string() };
        Self::append(&self.texts, &serde_json::to_string(&event)?)
    }

    fn add_figure(&mut self, tag: &str, figure: &AttentionFigure, step: usize) -> Result<()> {
        let svg_path = self.figures_dir.join(format!("{tag}_{step}.svg"));
        let csv_path = self.figures_dir.join(format!("{tag}_{step}.csv"));

        fs::write(&svg_path, to_svg(figure))
            .with_context(|| format!("Cannot write figure '{}'", svg_path.display()))?;
        fs::write(&csv_path, to_csv(figure))
            .with_context(|| format!("Cannot write figure '{}'", csv_path.display()))?;

        tracing::debug!("Wrote attention figure '{}'", svg_path.display());
        Ok(())
    }
}
