// ============================================================
// Layer 5 — Evaluation (greedy decode, no parameter updates)
// ============================================================
// Mirrors the training loop on a frozen snapshot of the modules:
//
//   - dropout disabled, no autodiff graph (.valid())
//   - decoding continues past the reference length until <EOS>
//     or max(10, 2 · target length) tokens have been produced
//   - only steps with a reference token contribute to the loss
//
// Each step's window weights are scattered into a full-length
// row of an AttentionMatrix for visualisation.

use anyhow::{Context, Result};
use burn::{module::AutodiffModule, prelude::*, tensor::backend::AutodiffBackend};

use crate::domain::{attention::AttentionMatrix, sentence_pair::SentencePair};
use crate::ml::{
    decode::{begin_decode, greedy_token},
    decoder::Decoder,
    encoder::Encoder,
    loss::LossFn,
    trainer::TrainingRuntime,
};

/// Lower bound on the decode budget for short references.
pub const MIN_DECODE_LENGTH: usize = 10;

/// Decode budget for a reference of `target_len` tokens.
pub fn max_decode_length(target_len: usize) -> usize {
    MIN_DECODE_LENGTH.max(2 * target_len)
}

/// Result of evaluating one pair.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Summed loss over the scored steps
    pub loss:      f64,
    /// Greedily decoded target ids, including a final <EOS> if produced
    pub decoded:   Vec<usize>,
    /// One row per decoded token, one column per source position
    pub attention: AttentionMatrix,
}

/// Frozen encoder/decoder pair used for validation and sampling.
pub struct Evaluator<B: Backend> {
    encoder: Encoder<B>,
    decoder: Decoder<B>,
    loss_fn: LossFn,
    sos:     usize,
    eos:     usize,
    device:  B::Device,
}

impl<B: Backend> Evaluator<B> {
    pub fn new(
        encoder: Encoder<B>,
        decoder: Decoder<B>,
        loss_fn: LossFn,
        sos:     usize,
        eos:     usize,
        device:  B::Device,
    ) -> Self {
        Self { encoder, decoder, loss_fn, sos, eos, device }
    }

    /// Snapshot the runtime's current parameters in eval mode.
    pub fn from_autodiff<AB>(runtime: &TrainingRuntime<AB>) -> Self
    where
        AB: AutodiffBackend<InnerBackend = B, Device = B::Device>,
    {
        Self::new(
            runtime.encoder.valid(),
            runtime.decoder.valid(),
            runtime.loss_fn,
            runtime.sos,
            runtime.eos,
            runtime.device.clone(),
        )
    }

    /// Greedily translate `pair.src` and score it against `pair.trg`.
    pub fn evaluate(&self, pair: &SentencePair) -> Result<Evaluation> {
        let target     = pair.target_without_start();
        let max_length = max_decode_length(target.len());
        let start      = begin_decode(&self.encoder, &pair.src, self.sos, &self.device)?;

        let mut input     = start.input;
        let mut context   = start.context;
        let mut hidden    = start.hidden;
        let mut loss      = 0.0f64;
        let mut decoded   = Vec::new();
        let mut attention = AttentionMatrix::new(start.source_length);

        // At most `max_length` tokens, so rows never exceed the cap.
        for step in 0..max_length {
            let out = self.decoder.forward(
                step,
                start.source_length,
                start.encoder_output.clone(),
                input,
                context,
                hidden,
            );

            if let Some(&target_token) = target.get(step) {
                loss += self
                    .loss_fn
                    .forward(out.distribution.clone(), target_token)
                    .into_scalar()
                    .elem::<f64>();
            }

            let weights: Vec<f32> = out
                .attention
                .weights
                .into_data()
                .to_vec()
                .map_err(|e| anyhow::anyhow!("Failed to read attention weights: {e:?}"))
                .context("Evaluation failed")?;
            attention.push_window(out.attention.bounds, &weights);

            let (next, token) = greedy_token(&out.distribution);
            decoded.push(token);

            input   = next;
            context = out.context;
            hidden  = out.hidden;
            if token == self.eos {
                break;
            }
        }

        Ok(Evaluation { loss, decoded, attention })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testing::tiny_runtime;
    use approx::assert_relative_eq;

    #[test]
    fn test_max_decode_length() {
        assert_eq!(max_decode_length(0), 10);
        assert_eq!(max_decode_length(3), 10);
        assert_eq!(max_decode_length(5), 10);
        assert_eq!(max_decode_length(8), 16);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let runtime   = tiny_runtime(12, 1, 2, 0.01);
        let evaluator = runtime.evaluator();
        let pair      = SentencePair::new(vec![3, 5, 7, 2], vec![1, 9, 4, 2]);

        let a = evaluator.evaluate(&pair).unwrap();
        let b = evaluator.evaluate(&pair).unwrap();
        assert_eq!(a.decoded, b.decoded);
        assert_relative_eq!(a.loss, b.loss, epsilon = 1e-9);
        assert_eq!(a.attention, b.attention);
    }

    #[test]
    fn test_one_attention_row_per_decoded_token() {
        let runtime   = tiny_runtime(12, 1, 2, 0.01);
        let evaluator = runtime.evaluator();
        let pair      = SentencePair::new(vec![3, 5, 7], vec![1, 9, 2]);

        let eval = evaluator.evaluate(&pair).unwrap();
        assert!(!eval.decoded.is_empty());
        assert!(eval.decoded.len() <= max_decode_length(2));
        assert_eq!(eval.attention.num_rows(), eval.decoded.len());
        assert_eq!(eval.attention.columns(), 3);
        // only the last token may be <EOS>
        let body = &eval.decoded[..eval.decoded.len() - 1];
        assert!(!body.contains(&2));
        assert!(eval.loss.is_finite() && eval.loss >= 0.0);
    }

    /// Loss of the first `target.len()` greedy steps, recomputed outside `evaluate`.
    fn reference_steps_loss<B: Backend>(evaluator: &Evaluator<B>, pair: &SentencePair) -> f64 {
        let start = begin_decode(&evaluator.encoder, &pair.src, evaluator.sos, &evaluator.device).unwrap();
        let mut input   = start.input;
        let mut context = start.context;
        let mut hidden  = start.hidden;
        let mut loss    = 0.0f64;
        for (step, &token) in pair.target_without_start().iter().enumerate() {
            let out = evaluator.decoder.forward(
                step,
                start.source_length,
                start.encoder_output.clone(),
                input,
                context,
                hidden,
            );
            loss += evaluator
                .loss_fn
                .forward(out.distribution.clone(), token)
                .into_scalar()
                .elem::<f64>();
            input   = greedy_token(&out.distribution).0;
            context = out.context;
            hidden  = out.hidden;
        }
        loss
    }

    #[test]
    fn test_decoding_runs_to_the_cap_without_eos() {
        // <EOS> id 99 is outside the 12-word vocabulary, so it is never predicted
        let runtime   = tiny_runtime(12, 1, 99, 0.01);
        let evaluator = runtime.evaluator();

        let short = SentencePair::new(vec![3, 5, 7], vec![1, 9, 2]);
        let long  = SentencePair::new(vec![3, 5, 7], vec![1, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        for (pair, target_len) in [(short, 2), (long, 9)] {
            let eval = evaluator.evaluate(&pair).unwrap();
            assert_eq!(eval.decoded.len(), max_decode_length(target_len));
            assert_eq!(eval.attention.num_rows(), max_decode_length(target_len));
        }
    }

    #[test]
    fn test_steps_past_the_reference_are_not_scored() {
        let runtime   = tiny_runtime(12, 1, 99, 0.01);
        let evaluator = runtime.evaluator();
        let pair      = SentencePair::new(vec![3, 5, 7, 2], vec![1, 9, 4, 2]);

        let eval = evaluator.evaluate(&pair).unwrap();
        assert!(eval.decoded.len() > pair.target_without_start().len());
        assert_relative_eq!(eval.loss, reference_steps_loss(&evaluator, &pair), epsilon = 1e-5);
    }

    #[test]
    fn test_attention_rows_sum_to_one_within_window() {
        // window_size 1 over a 6-token source: rows have at most 3 non-zeros
        let runtime   = tiny_runtime(12, 1, 2, 0.01);
        let evaluator = runtime.evaluator();
        let pair      = SentencePair::new(vec![3, 4, 5, 6, 7, 2], vec![1, 8, 2]);

        let eval = evaluator.evaluate(&pair).unwrap();
        for (step, row) in eval.attention.rows().iter().enumerate() {
            let total: f32 = row.iter().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-4);

            let center = step.min(5);
            for (column, &weight) in row.iter().enumerate() {
                if column + 1 < center || column > center + 1 {
                    assert_eq!(weight, 0.0, "step {step} column {column}");
                }
            }
        }
    }
}
