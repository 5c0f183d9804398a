// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All training logic is delegated to Layer 2 (application).
//
//   local-attention-nmt --config configs/default.json --debug
//   local-attention-nmt --dummy_fixed_length --backend ndarray
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::application::{
    config::DEFAULT_CONFIG_PATH,
    train_use_case::{TrainOptions, TrainUseCase},
};
use crate::ml::{NdArrayBackend, WgpuBackend};
use commands::{str2bool, BackendKind, DataFlags};

#[derive(Parser, Debug)]
#[command(
    name = "local-attention-nmt",
    version = "0.1.0",
    about = "Train a GRU encoder-decoder translator with local attention."
)]
pub struct Cli {
    /// Path to the JSON run configuration
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Train on the built-in debug phrases
    #[arg(long, num_args = 0..=1, default_value = "false", default_missing_value = "true",
          value_parser = str2bool)]
    pub debug: bool,

    /// Dummy data with fixed length.
    #[arg(long = "dummy_fixed_length", num_args = 0..=1, default_value = "false",
          default_missing_value = "true", value_parser = str2bool)]
    pub dummy_fixed_length: bool,

    /// Dummy data with variable length.
    #[arg(long = "dummy_variable_length", num_args = 0..=1, default_value = "false",
          default_missing_value = "true", value_parser = str2bool)]
    pub dummy_variable_length: bool,

    /// Run name; defaults to the config's name, then <config stem>-<timestamp>
    #[arg(long)]
    pub name: Option<String>,

    /// Compute backend
    #[arg(long, value_enum, default_value_t = BackendKind::Wgpu)]
    pub backend: BackendKind,
}

impl Cli {
    fn options(&self) -> TrainOptions {
        let flags = DataFlags {
            debug:                 self.debug,
            dummy_fixed_length:    self.dummy_fixed_length,
            dummy_variable_length: self.dummy_variable_length,
        };
        TrainOptions {
            config_path: self.config.clone(),
            strategy:    flags.into(),
            run_name:    self.name.clone(),
        }
    }

    /// Build the use case and run it on the selected backend.
    pub fn run(self) -> Result<()> {
        let use_case = TrainUseCase::new(self.options());
        tracing::info!("Backend: {:?}", self.backend);

        let summary = match self.backend {
            BackendKind::Wgpu    => use_case.execute::<WgpuBackend>(Default::default())?,
            BackendKind::Ndarray => use_case.execute::<NdArrayBackend>(Default::default())?,
        };

        println!(
            "Training complete after {} steps (final epoch loss {:.4}).",
            summary.steps, summary.final_epoch_loss
        );
        Ok(())
    }
}
