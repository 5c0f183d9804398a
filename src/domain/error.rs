// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Two error families, both fatal:
//   ConfigError — bad or unknown configuration, raised at startup
//   DataError   — malformed corpus or sentence pair
//
// The application layer wraps both into anyhow::Error with context.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors. Raised before training begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config '{path}': {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse config '{path}': {source}")]
    Parse {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("Unknown loss function: {0}")]
    UnknownLossFunction(String),

    #[error("Unknown optimizer: {0}")]
    UnknownOptimizer(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Corpus and sentence pair errors.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Source sentence is empty")]
    EmptySource,

    #[error("The {0} dataset is empty")]
    EmptyDataset(&'static str),

    #[error("Corpus files are misaligned: {source_lines} source lines vs {target_lines} target lines")]
    MisalignedCorpus {
        source_lines: usize,
        target_lines: usize,
    },

    #[error("Cannot read corpus file '{path}': {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownLossFunction("Foo".to_string());
        assert_eq!(err.to_string(), "Unknown loss function: Foo");

        let err = ConfigError::UnknownOptimizer("RMSprop".to_string());
        assert_eq!(err.to_string(), "Unknown optimizer: RMSprop");
    }

    #[test]
    fn test_data_error_display() {
        let err = DataError::MisalignedCorpus { source_lines: 3, target_lines: 4 };
        assert!(err.to_string().contains("3 source lines vs 4 target lines"));
        assert!(DataError::EmptyDataset("validation").to_string().contains("validation"));
    }
}
