// ============================================================
// Layer 2 — Runtime Builder
// ============================================================
// Turns an immutable Config plus a loaded Corpus into the
// mutable TrainingRuntime the loop functions take by reference:
//
//   config.loss_fn     → LossFn         (resolved once)
//   config.optimizer   → OptimizerKind  (resolved once)
//   corpus vocab sizes → encoder / decoder dimensions
//   trg vocab          → <SOS> / <EOS> ids

use burn::tensor::backend::AutodiffBackend;

use crate::application::config::{Config, WindowAlignment};
use crate::data::dataset::Corpus;
use crate::domain::error::ConfigError;
use crate::ml::{decoder::DecoderConfig, encoder::EncoderConfig, trainer::TrainingRuntime};

pub fn build_runtime<B: AutodiffBackend>(
    config: &Config,
    corpus: &Corpus,
    device: B::Device,
) -> Result<TrainingRuntime<B>, ConfigError> {
    let loss_fn   = config.loss_fn()?;
    let optimizer = config.optimizer_kind()?;
    let model     = &config.model;

    let encoder = EncoderConfig::new(corpus.src_vocab.len(), model.embedding_size, model.hidden_size)
        .with_dropout(model.dropout)
        .init::<B>(&device);
    let decoder = DecoderConfig::new(
        corpus.trg_vocab.len(),
        model.embedding_size,
        model.hidden_size,
        model.window_size,
    )
    .with_predictive(model.alignment == WindowAlignment::Predictive)
    .with_dropout(model.dropout)
    .init::<B>(&device);

    tracing::info!(
        "Model: src_vocab={} trg_vocab={} E={} H={} window=±{} ({:?}) | loss={} | lr={}",
        corpus.src_vocab.len(),
        corpus.trg_vocab.len(),
        model.embedding_size,
        model.hidden_size,
        model.window_size,
        model.alignment,
        loss_fn.name(),
        optimizer.learning_rate(),
    );

    Ok(TrainingRuntime::new(
        encoder,
        decoder,
        &optimizer,
        loss_fn,
        corpus.trg_vocab.sos_id(),
        corpus.trg_vocab.eos_id(),
        device,
    ))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{sentence_pair::SentencePair, vocabulary::Vocabulary};
    use crate::ml::{loss::LossFn, testing::TestBackend};

    fn corpus() -> Corpus {
        let vocab = Vocabulary::with_specials();
        let pair  = SentencePair::new(vec![0, 3], vec![2, 0, 3]);
        Corpus::new(vec![pair.clone()], vec![pair], vocab.clone(), vocab).unwrap()
    }

    fn config(loss_fn: &str) -> Config {
        serde_json::from_str(&format!(
            r#"{{ "epochs": 1, "loss_fn": "{loss_fn}",
                 "optimizer": {{ "type": "SGD", "learning_rate": 0.1 }},
                 "model": {{ "embedding_size": 4, "hidden_size": 4, "window_size": 1,
                             "alignment": "predictive" }},
                 "training": {{ "eval_every": 1, "sample_every": 1 }} }}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_runtime_uses_target_vocabulary_markers() {
        let runtime = build_runtime::<TestBackend>(&config("CrossEntropyLoss"), &corpus(), Default::default())
            .unwrap();
        assert_eq!(runtime.sos, 2);
        assert_eq!(runtime.eos, 3);
        assert_eq!(runtime.loss_fn, LossFn::CrossEntropy);
        assert!(runtime.decoder.attention.predictor.is_some());
    }

    #[test]
    fn test_unknown_loss_is_rejected_before_training() {
        let err = build_runtime::<TestBackend>(&config("Foo"), &corpus(), Default::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown loss function: Foo"));
    }
}
