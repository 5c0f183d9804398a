// ============================================================
// Layer 5 — Decoder
// ============================================================
// One call = one decode step:
//
//   token [1,1] ─ embedding ─ dropout ─┐
//   context [1,H] ─────────────────────┴─ concat ─ GRU ─ h'
//   h' + encoder outputs ─ LocalAttention ─ context', window
//   concat(h', context') ─ tanh(W_c ·) ─ W_o ─ log_softmax
//
// The previous context is fed back in as GRU input, so attention
// from step t informs step t+1 (input feeding).

use burn::{
    nn::{
        gru::{Gru, GruConfig},
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{log_softmax, tanh},
};

use crate::ml::attention::{AttentionWindow, LocalAttention, LocalAttentionConfig};

#[derive(Config, Debug)]
pub struct DecoderConfig {
    pub vocab_size:     usize,
    pub embedding_size: usize,
    pub hidden_size:    usize,
    /// Half-width of the attention window.
    pub window_size:    usize,
    #[config(default = false)]
    pub predictive:     bool,
    #[config(default = 0.1)]
    pub dropout:        f64,
}

impl DecoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Decoder<B> {
        Decoder {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_size).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
            gru:       GruConfig::new(self.embedding_size + self.hidden_size, self.hidden_size, true)
                .init(device),
            attention: LocalAttentionConfig::new(self.hidden_size, self.window_size)
                .with_predictive(self.predictive)
                .init(device),
            combine:   LinearConfig::new(2 * self.hidden_size, self.hidden_size).init(device),
            output:    LinearConfig::new(self.hidden_size, self.vocab_size).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub dropout:   Dropout,
    pub gru:       Gru<B>,
    pub attention: LocalAttention<B>,
    pub combine:   Linear<B>,
    pub output:    Linear<B>,
}

/// Everything one decode step produces.
#[derive(Debug, Clone)]
pub struct DecoderOutput<B: Backend> {
    /// Log-probabilities over the target vocabulary, [1, vocab]
    pub distribution: Tensor<B, 2>,
    /// [1, H]
    pub context:      Tensor<B, 2>,
    /// [1, H]
    pub hidden:       Tensor<B, 2>,
    pub attention:    AttentionWindow<B>,
}

impl<B: Backend> Decoder<B> {
    /// One decode step.
    ///
    /// * `step`           - index of this step within the pair (0-based)
    /// * `source_length`  - number of rows in `encoder_output`
    /// * `encoder_output` - [L, H]
    /// * `input`          - previous token id, [1, 1]
    /// * `context`        - previous context, [1, H]
    /// * `hidden`         - previous hidden state, [1, H]
    pub fn forward(
        &self,
        step:           usize,
        source_length:  usize,
        encoder_output: Tensor<B, 2>,
        input:          Tensor<B, 2, Int>,
        context:        Tensor<B, 2>,
        hidden:         Tensor<B, 2>,
    ) -> DecoderOutput<B> {
        debug_assert_eq!(encoder_output.dims()[0], source_length);

        let embedded = self.embedding.forward(input); // [1, 1, E]
        let [_, _, embedding_size] = embedded.dims();
        let embedded = self.dropout.forward(embedded.reshape([1, embedding_size]));

        // A decode step is a length-1 GRU sequence.
        let [_, hidden_size] = hidden.dims();
        let gru_input = Tensor::cat(vec![embedded, context], 1).reshape([1, 1, embedding_size + hidden_size]);
        let hidden = self
            .gru
            .forward(gru_input, Some(hidden.reshape([1, 1, hidden_size])))
            .reshape([1, hidden_size]);
        let (context, attention) = self.attention.forward(step, hidden.clone(), encoder_output);

        let combined = tanh(self.combine.forward(Tensor::cat(vec![hidden.clone(), context.clone()], 1)));
        let distribution = log_softmax(self.output.forward(combined), 1);

        DecoderOutput { distribution, context, hidden, attention }
    }
}
