// ============================================================
// Layer 5 — Training Loop and Orchestrator
// ============================================================
// train_sentence_pair drives one pair through encoder + decoder
// with free-running (greedy) decoding:
//
//   step i: decoder(prev token) → distribution
//           next input = argmax(distribution)   (no gradient)
//           loss      += loss_fn(distribution, target[i])
//           stop early when the prediction is <EOS>
//
// then back-propagates the summed loss and steps both optimizers.
//
// run_training iterates epochs and pairs; every `eval_every`
// steps it averages the loss of 64 random validation pairs, every
// `sample_every` steps it logs one translation with its attention
// figure.
//
// Burn specifics:
//   - Training runs on an AutodiffBackend (dropout active)
//   - Evaluation snapshots the modules with .valid()
//   - Optimizers consume the module and return the updated one
//
// Reference: Burn Book §5, Luong et al. (2015)

use anyhow::{Context, Result};
use burn::{
    data::dataset::Dataset, optim::GradientsParams, prelude::*, tensor::backend::AutodiffBackend,
};
use rand::Rng;

use crate::application::config::Config;
use crate::data::dataset::Corpus;
use crate::domain::{
    sentence_pair::SentencePair,
    traits::EventSink,
    vocabulary::{EOS_TOKEN, SOS_TOKEN},
};
use crate::infra::visualize::{translation_text, visualize_attention};
use crate::ml::{
    decode::{begin_decode, greedy_token},
    decoder::Decoder,
    encoder::Encoder,
    evaluator::Evaluator,
    loss::LossFn,
    optimizer::{ModelOptimizer, OptimizerKind},
};

/// Independent validation pairs drawn per evaluation.
pub const VALIDATION_SAMPLES: usize = 64;

// ─── TrainingRuntime ──────────────────────────────────────────────────────────
/// Mutable state of a run: both networks, their optimizers and the
/// resolved loss strategy. Only train_sentence_pair mutates it.
pub struct TrainingRuntime<B: AutodiffBackend> {
    pub encoder:           Encoder<B>,
    pub decoder:           Decoder<B>,
    pub encoder_optimizer: ModelOptimizer<Encoder<B>, B>,
    pub decoder_optimizer: ModelOptimizer<Decoder<B>, B>,
    pub loss_fn:           LossFn,
    pub sos:               usize,
    pub eos:               usize,
    pub device:            B::Device,
}

impl<B: AutodiffBackend> TrainingRuntime<B> {
    pub fn new(
        encoder:   Encoder<B>,
        decoder:   Decoder<B>,
        optimizer: &OptimizerKind,
        loss_fn:   LossFn,
        sos:       usize,
        eos:       usize,
        device:    B::Device,
    ) -> Self {
        Self {
            encoder,
            decoder,
            encoder_optimizer: ModelOptimizer::new(optimizer),
            decoder_optimizer: ModelOptimizer::new(optimizer),
            loss_fn,
            sos,
            eos,
            device,
        }
    }

    /// Frozen copy of the current parameters on the inner backend.
    pub fn evaluator(&self) -> Evaluator<B::InnerBackend> {
        Evaluator::from_autodiff(self)
    }
}

// ─── Training Loop ────────────────────────────────────────────────────────────
/// Train on one sentence pair and return the summed loss.
///
/// Target positions after a predicted `<EOS>` are not scored. A pair
/// whose target holds nothing but the start token scores no steps and
/// leaves the parameters untouched.
pub fn train_sentence_pair<B: AutodiffBackend>(
    runtime: &mut TrainingRuntime<B>,
    pair:    &SentencePair,
) -> Result<f64> {
    let target = pair.target_without_start();
    let start  = begin_decode(&runtime.encoder, &pair.src, runtime.sos, &runtime.device)?;

    let mut input   = start.input;
    let mut context = start.context;
    let mut hidden  = start.hidden;
    let mut loss    = Tensor::<B, 1>::zeros([1], &runtime.device);
    let mut scored  = 0usize;

    for (i, &target_token) in target.iter().enumerate() {
        let out = runtime.decoder.forward(
            i,
            start.source_length,
            start.encoder_output.clone(),
            input,
            context,
            hidden,
        );
        let (next, token) = greedy_token(&out.distribution);
        loss = loss + runtime.loss_fn.forward(out.distribution, target_token);
        scored += 1;

        input   = next;
        context = out.context;
        hidden  = out.hidden;
        if token == runtime.eos {
            break;
        }
    }

    if scored == 0 {
        return Ok(0.0);
    }

    let value: f64 = loss.clone().into_scalar().elem::<f64>();

    let mut grads        = loss.backward();
    let encoder_grads    = GradientsParams::from_module(&mut grads, &runtime.encoder);
    let decoder_grads    = GradientsParams::from_module(&mut grads, &runtime.decoder);
    runtime.encoder = runtime.encoder_optimizer.step(runtime.encoder.clone(), encoder_grads);
    runtime.decoder = runtime.decoder_optimizer.step(runtime.decoder.clone(), decoder_grads);

    Ok(value)
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────
/// What a finished run reports back to the use case.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    /// Number of training steps executed
    pub steps:                usize,
    /// Mean training loss of the last epoch
    pub final_epoch_loss:     f64,
    /// Most recent averaged validation loss, if any evaluation ran
    pub last_validation_loss: Option<f64>,
}

/// Run every epoch over the training pairs, logging to the two sinks.
pub fn run_training<B: AutodiffBackend, R: Rng>(
    config:     &Config,
    runtime:    &mut TrainingRuntime<B>,
    corpus:     &Corpus,
    train_sink: &mut dyn EventSink,
    val_sink:   &mut dyn EventSink,
    rng:        &mut R,
) -> Result<TrainingSummary> {
    let eval_every   = config.training.eval_every;
    let sample_every = config.training.sample_every;

    let mut step                 = 1usize;
    let mut final_epoch_loss     = f64::NAN;
    let mut last_validation_loss = None;

    for epoch in 0..config.epochs {
        let mut epoch_loss_sum = 0.0f64;
        let mut epoch_pairs    = 0usize;

        for index in corpus.train.shuffled_indices(rng) {
            let pair = corpus.train.get(index).context("Shuffled index out of range")?;
            let loss = train_sentence_pair(runtime, &pair)
                .with_context(|| format!("Training failed at step {step}"))?;
            train_sink.add_scalar("loss", loss, step)?;
            tracing::debug!("epoch {} step {} loss={:.4}", epoch + 1, step, loss);

            epoch_loss_sum += loss;
            epoch_pairs    += 1;

            if step % eval_every == 0 {
                let evaluator = runtime.evaluator();
                let val_loss  = validation_loss(&evaluator, corpus, rng)?;
                val_sink.add_scalar("loss", val_loss, step)?;
                last_validation_loss = Some(val_loss);
                tracing::info!("step {} | val_loss={:.4}", step, val_loss);
            }

            if step % sample_every == 0 {
                let evaluator = runtime.evaluator();
                log_sample_translation(&evaluator, corpus, val_sink, step, rng)?;
            }

            step += 1;
        }

        final_epoch_loss = if epoch_pairs > 0 {
            epoch_loss_sum / epoch_pairs as f64
        } else {
            f64::NAN
        };
        train_sink.add_scalar("epoch_loss", final_epoch_loss, epoch + 1)?;
        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | steps={}",
            epoch + 1,
            config.epochs,
            final_epoch_loss,
            step - 1,
        );
    }

    Ok(TrainingSummary { steps: step - 1, final_epoch_loss, last_validation_loss })
}

/// Mean summed-loss over VALIDATION_SAMPLES pairs drawn with replacement.
pub fn validation_loss<B: Backend, R: Rng>(
    evaluator: &Evaluator<B>,
    corpus:    &Corpus,
    rng:       &mut R,
) -> Result<f64> {
    let mut total = 0.0f64;
    for _ in 0..VALIDATION_SAMPLES {
        let pair = corpus.val.sample(rng).context("Validation set is empty")?;
        total += evaluator.evaluate(pair)?.loss;
    }
    Ok(total / VALIDATION_SAMPLES as f64)
}

/// Translate one random validation pair and log its text and attention.
fn log_sample_translation<B: Backend, R: Rng>(
    evaluator: &Evaluator<B>,
    corpus:    &Corpus,
    sink:      &mut dyn EventSink,
    step:      usize,
    rng:       &mut R,
) -> Result<()> {
    let pair       = corpus.val.sample(rng).context("Validation set is empty")?;
    let evaluation = evaluator.evaluate(pair)?;

    let source_words      = corpus.src_vocab.to_words(&pair.src);
    let target_words      = corpus.trg_vocab.to_words(&pair.trg);
    let translation_words = corpus.trg_vocab.to_words(&evaluation.decoded);

    let text = translation_text(
        &source_words,
        &target_words,
        &translation_words,
        SOS_TOKEN,
        EOS_TOKEN,
    );
    let figure = visualize_attention(source_words, translation_words, evaluation.attention);

    sink.add_figure("attention", &figure, step)?;
    sink.add_text("translation", &text, step)?;
    tracing::info!("step {} sample:\n{}", step, text);
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attention::AttentionFigure;
    use crate::ml::testing::{tiny_runtime, TestBackend};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_scenario_pair_scores_at_most_two_steps() {
        // source=[3,5,7], target=[SOS=1, 9, EOS=2]
        let mut runtime = tiny_runtime(12, 1, 2, 0.01);
        let pair = SentencePair::new(vec![3, 5, 7], vec![1, 9, 2]);

        let loss = train_sentence_pair(&mut runtime, &pair).unwrap();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
        // at most two scored steps; small random logits keep each near ln(12)
        assert!(loss < 2.0 * (12f64.ln() + 7.0));
    }

    #[test]
    fn test_target_with_only_start_token_scores_nothing() {
        let mut runtime = tiny_runtime(12, 1, 2, 0.01);
        let pair = SentencePair::new(vec![3, 5], vec![1]);
        assert_eq!(train_sentence_pair(&mut runtime, &pair).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_source_is_an_error() {
        let mut runtime = tiny_runtime(12, 1, 2, 0.01);
        let pair = SentencePair::new(vec![], vec![1, 9, 2]);
        assert!(train_sentence_pair(&mut runtime, &pair).is_err());
    }

    #[test]
    fn test_loss_is_non_increasing_on_fixed_pair() {
        // Toy setup: ids 0/1 are SOS/EOS, 2 and 3 are the two words.
        // One-step target, so the pair is always fully scored.
        let mut runtime = tiny_runtime(4, 0, 1, 0.005);
        let pair = SentencePair::new(vec![2, 3], vec![0, 3]);

        let mut previous = train_sentence_pair(&mut runtime, &pair).unwrap();
        let first = previous;
        for _ in 0..10 {
            let loss = train_sentence_pair(&mut runtime, &pair).unwrap();
            assert!(loss <= previous + 1e-6, "loss went up: {previous} -> {loss}");
            previous = loss;
        }
        assert!(previous < first);
    }

    #[test]
    fn test_training_changes_parameters() {
        let mut runtime = tiny_runtime(6, 0, 1, 0.5);
        let pair = SentencePair::new(vec![2, 3, 4], vec![0, 5, 4, 1]);

        let before = runtime.evaluator().evaluate(&pair).unwrap().loss;
        for _ in 0..5 {
            train_sentence_pair(&mut runtime, &pair).unwrap();
        }
        let after = runtime.evaluator().evaluate(&pair).unwrap().loss;
        assert_ne!(before, after);
    }

    // ── Orchestrator ─────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        scalars: Vec<(String, f64, usize)>,
        texts:   Vec<(String, String, usize)>,
        figures: Vec<(String, AttentionFigure, usize)>,
    }

    impl EventSink for RecordingSink {
        fn add_scalar(&mut self, tag: &str, value: f64, step: usize) -> Result<()> {
            self.scalars.push((tag.to_string(), value, step));
            Ok(())
        }

        fn add_text(&mut self, tag: &str, text: &str, step: usize) -> Result<()> {
            self.texts.push((tag.to_string(), text.to_string(), step));
            Ok(())
        }

        fn add_figure(&mut self, tag: &str, figure: &AttentionFigure, step: usize) -> Result<()> {
            self.figures.push((tag.to_string(), figure.clone(), step));
            Ok(())
        }
    }

    fn orchestrator_config() -> Config {
        serde_json::from_str(
            r#"{
                "epochs": 1,
                "loss_fn": "NLLLoss",
                "optimizer": { "type": "SGD", "learning_rate": 0.01 },
                "model": { "embedding_size": 8, "hidden_size": 8, "dropout": 0.0, "window_size": 1 },
                "training": { "eval_every": 2, "sample_every": 3 },
                "data": { "dummy": { "vocabulary_size": 6, "fixed_length": 3,
                                     "train_size": 6, "val_size": 3 } }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_periodic_validation_and_sampling() {
        let config = orchestrator_config();
        let mut rng = StdRng::seed_from_u64(7);
        let corpus = crate::data::dummy::load_dummy_fixed_length(&config.data, &mut rng).unwrap();
        let mut runtime = crate::application::runtime::build_runtime::<TestBackend>(
            &config,
            &corpus,
            Default::default(),
        )
        .unwrap();

        let mut train_sink = RecordingSink::default();
        let mut val_sink   = RecordingSink::default();
        let summary = run_training(&config, &mut runtime, &corpus, &mut train_sink, &mut val_sink, &mut rng)
            .unwrap();

        assert_eq!(summary.steps, 6);

        let train_steps: Vec<usize> = train_sink
            .scalars
            .iter()
            .filter(|(tag, _, _)| tag == "loss")
            .map(|(_, _, step)| *step)
            .collect();
        assert_eq!(train_steps, vec![1, 2, 3, 4, 5, 6]);
        assert!(train_sink.scalars.iter().any(|(tag, _, step)| tag == "epoch_loss" && *step == 1));

        let val_steps: Vec<usize> = val_sink.scalars.iter().map(|(_, _, step)| *step).collect();
        assert_eq!(val_steps, vec![2, 4, 6]);
        assert!(summary.last_validation_loss.is_some());

        let figure_steps: Vec<usize> = val_sink.figures.iter().map(|(_, _, step)| *step).collect();
        assert_eq!(figure_steps, vec![3, 6]);
        assert_eq!(val_sink.texts.len(), 2);
        assert!(val_sink.texts[0].1.starts_with("Source: "));
        assert!(val_sink.texts[0].1.contains("Translation: <SOS> "));

        for (tag, figure, _) in &val_sink.figures {
            assert_eq!(tag, "attention");
            assert_eq!(figure.weights.num_rows(), figure.translation_words.len());
            assert_eq!(figure.weights.columns(), figure.source_words.len());
        }
    }
}
