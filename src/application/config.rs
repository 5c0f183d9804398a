// ============================================================
// Layer 2 — Run Configuration
// ============================================================
// The JSON document passed with --config, deserialised once
// into an immutable Config. Sections:
//
//   name       optional run name
//   epochs     passes over the training pairs
//   loss_fn    "CrossEntropyLoss" | "NLLLoss"
//   optimizer  { type: "SGD" | "Adam", learning_rate, ... }
//   model      embedding/hidden sizes, dropout, attention window
//   training   eval_every, sample_every, seed
//   data       corpus paths and synthetic data sizes
//   log_dir    root directory for event streams
//
// String-named strategies (loss_fn, optimizer.type) are kept as
// strings here and resolved exactly once by the runtime builder.
//
// Reference: serde_json documentation

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::domain::error::ConfigError;
use crate::ml::{loss::LossFn, optimizer::OptimizerKind};

pub const DEFAULT_CONFIG_PATH: &str = "configs/default.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub name:      Option<String>,
    pub epochs:    usize,
    pub loss_fn:   String,
    pub optimizer: OptimizerSection,
    #[serde(default)]
    pub model:     ModelSection,
    pub training:  TrainingSection,
    #[serde(default)]
    pub data:      DataSection,
    #[serde(default = "default_log_dir")]
    pub log_dir:   String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerSection {
    #[serde(rename = "type")]
    pub kind:          String,
    pub learning_rate: f64,
    #[serde(default)]
    pub weight_decay:  f64,
    #[serde(default)]
    pub momentum:      f64,
}

/// How the decoder picks the center of its attention window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowAlignment {
    /// Center on the current decode step.
    #[default]
    Monotonic,
    /// Predict the center from the decoder hidden state.
    Predictive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub embedding_size: usize,
    pub hidden_size:    usize,
    pub dropout:        f64,
    /// Half-width of the attention window; the window spans
    /// 2 * window_size + 1 source positions away from the edges.
    pub window_size:    usize,
    pub alignment:      WindowAlignment,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            embedding_size: 128,
            hidden_size:    128,
            dropout:        0.1,
            window_size:    3,
            alignment:      WindowAlignment::Monotonic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSection {
    pub eval_every:   usize,
    pub sample_every: usize,
    #[serde(default)]
    pub seed:         Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub train_source: String,
    pub train_target: String,
    pub val_source:   String,
    pub val_target:   String,
    /// Pairs with more tokens than this on either side are dropped.
    pub max_length:   usize,
    pub min_freq:     usize,
    pub lowercase:    bool,
    /// Number of pairs generated in --debug mode.
    pub debug_size:   usize,
    pub dummy:        DummySection,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            train_source: "data/iwslt/train.de".to_string(),
            train_target: "data/iwslt/train.en".to_string(),
            val_source:   "data/iwslt/valid.de".to_string(),
            val_target:   "data/iwslt/valid.en".to_string(),
            max_length:   50,
            min_freq:     2,
            lowercase:    true,
            debug_size:   64,
            dummy:        DummySection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DummySection {
    pub vocabulary_size: usize,
    pub fixed_length:    usize,
    pub min_length:      usize,
    pub max_length:      usize,
    pub train_size:      usize,
    pub val_size:        usize,
}

impl Default for DummySection {
    fn default() -> Self {
        Self {
            vocabulary_size: 20,
            fixed_length:    8,
            min_length:      3,
            max_length:      12,
            train_size:      5000,
            val_size:        200,
        }
    }
}

fn default_log_dir() -> String {
    ".logs".to_string()
}

impl Config {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Reject values the training loop cannot run with.
    /// Strategy names are checked here too so a typo fails at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epochs == 0 {
            return Err(ConfigError::Invalid("epochs must be at least 1".into()));
        }
        if self.training.eval_every == 0 || self.training.sample_every == 0 {
            return Err(ConfigError::Invalid(
                "training.eval_every and training.sample_every must be at least 1".into(),
            ));
        }
        if self.model.hidden_size == 0 || self.model.embedding_size == 0 {
            return Err(ConfigError::Invalid("model sizes must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.model.dropout) {
            return Err(ConfigError::Invalid(format!(
                "model.dropout must be in [0, 1), got {}",
                self.model.dropout
            )));
        }
        let dummy = &self.data.dummy;
        if dummy.min_length == 0 || dummy.fixed_length == 0 || dummy.min_length > dummy.max_length {
            return Err(ConfigError::Invalid(
                "data.dummy lengths must satisfy 1 <= min_length <= max_length".into(),
            ));
        }
        self.loss_fn()?;
        self.optimizer_kind()?;
        Ok(())
    }

    /// Resolve `loss_fn` into a loss strategy.
    pub fn loss_fn(&self) -> Result<LossFn, ConfigError> {
        LossFn::from_name(&self.loss_fn)
    }

    /// Resolve the `optimizer` section into an optimizer strategy.
    pub fn optimizer_kind(&self) -> Result<OptimizerKind, ConfigError> {
        OptimizerKind::from_section(&self.optimizer)
    }

    /// Run name: explicit override, then the config's `name`, then
    /// `<config file stem>-<local timestamp>`.
    pub fn run_name(&self, override_name: Option<&str>, config_path: &Path) -> String {
        if let Some(name) = override_name {
            return name.to_string();
        }
        if let Some(name) = &self.name {
            return name.clone();
        }
        let stem = config_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("run");
        format!("{}-{}", stem, chrono::Local::now().format("%Y%m%d-%H%M%S"))
    }
}
