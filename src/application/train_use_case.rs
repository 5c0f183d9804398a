// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Load and validate the JSON config   (Layer 2)
//   Step 2: Seed the RNG if configured          (Layer 2)
//   Step 3: Load the corpus for the strategy    (Layer 4 - data)
//   Step 4: Build encoder, decoder, optimizers  (Layer 2 → 5)
//   Step 5: Create the run directory + config   (Layer 6 - infra)
//   Step 6: Open train / val event writers      (Layer 6 - infra)
//   Step 7: Run the epoch loop                  (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use crate::application::{config::Config, runtime::build_runtime};
use crate::data::{
    dataset::Corpus,
    dummy::{load_debug, load_dummy_fixed_length, load_dummy_variable_length},
    loader::ParallelTextLoader,
};
use crate::infra::{event_writer::EventWriter, run_dir::RunDirectory};
use crate::ml::trainer::{run_training, TrainingSummary};

// ─── Data Strategy ───────────────────────────────────────────────────────────
/// Which corpus a run trains on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataStrategy {
    /// Built-in German → English phrases
    Debug,
    /// Reversal task, one sequence length
    DummyFixedLength,
    /// Reversal task, uniform random lengths
    DummyVariableLength,
    /// Source/target files named in the config
    #[default]
    ParallelText,
}

impl DataStrategy {
    /// Flag precedence: debug, then dummy fixed, then dummy variable.
    pub fn from_flags(debug: bool, dummy_fixed_length: bool, dummy_variable_length: bool) -> Self {
        if debug {
            Self::Debug
        } else if dummy_fixed_length {
            Self::DummyFixedLength
        } else if dummy_variable_length {
            Self::DummyVariableLength
        } else {
            Self::ParallelText
        }
    }

    pub fn load(&self, config: &Config, rng: &mut StdRng) -> Result<Corpus> {
        let data = &config.data;
        let corpus = match self {
            Self::Debug               => load_debug(data, rng),
            Self::DummyFixedLength    => load_dummy_fixed_length(data, rng),
            Self::DummyVariableLength => load_dummy_variable_length(data, rng),
            Self::ParallelText        => ParallelTextLoader::new(data).load(),
        };
        corpus.with_context(|| format!("Cannot load {:?} corpus", self))
    }
}

// ─── Run Options ─────────────────────────────────────────────────────────────
/// Everything the CLI decides; the rest comes from the config file.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub config_path: PathBuf,
    pub strategy:    DataStrategy,
    pub run_name:    Option<String>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    options: TrainOptions,
}

impl TrainUseCase {
    pub fn new(options: TrainOptions) -> Self {
        Self { options }
    }

    /// Execute the full training pipeline on backend `B`.
    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainingSummary> {
        let opts = &self.options;

        // ── Step 1: Config ────────────────────────────────────────────────────
        let config = Config::load(&opts.config_path)?;
        tracing::info!(
            "Loaded config '{}' ({} epochs, eval_every={}, sample_every={})",
            opts.config_path.display(),
            config.epochs,
            config.training.eval_every,
            config.training.sample_every,
        );

        // ── Step 2: RNG ───────────────────────────────────────────────────────
        let mut rng = match config.training.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };

        // ── Step 3: Corpus ────────────────────────────────────────────────────
        tracing::info!("Data strategy: {:?}", opts.strategy);
        let corpus = opts.strategy.load(&config, &mut rng)?;

        // ── Step 4: Model + optimizers ────────────────────────────────────────
        let mut runtime = build_runtime::<B>(&config, &corpus, device)?;

        // ── Step 5: Run directory ─────────────────────────────────────────────
        let run_name = config.run_name(opts.run_name.as_deref(), &opts.config_path);
        let run_dir  = RunDirectory::create(&config.log_dir, &run_name)?;
        run_dir.save_config(&config)?;

        // ── Step 6: Event writers ─────────────────────────────────────────────
        let mut train_writer = EventWriter::new(run_dir.stream("train")?)?;
        let mut val_writer   = EventWriter::new(run_dir.stream("val")?)?;

        // ── Step 7: Train ─────────────────────────────────────────────────────
        let summary = run_training(
            &config,
            &mut runtime,
            &corpus,
            &mut train_writer,
            &mut val_writer,
            &mut rng,
        )?;

        tracing::info!(
            "Training complete: {} steps, final epoch loss {:.4}, events in '{}'",
            summary.steps,
            summary.final_epoch_loss,
            run_dir.root().display(),
        );
        Ok(summary)
    }
}
