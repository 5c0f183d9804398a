// ============================================================
// Layer 5 — Encoder
// ============================================================
// Embeds the source sentence and runs burn's GRU over it one
// position at a time:
//
//   ids [L] → embedding [L, E] → GRU steps → outputs [L, H]
//                                           final hidden [1, H]
//
// Row t of the outputs is the hidden state after reading token t,
// so the last row equals the final hidden state.
//
// `Gru::forward` reads its initial state per position, so a
// whole-sentence call would not carry state from t to t+1. Each
// token goes in as its own length-1 sequence instead.

use burn::{
    nn::{
        gru::{Gru, GruConfig},
        Dropout, DropoutConfig, Embedding, EmbeddingConfig,
    },
    prelude::*,
};

use crate::domain::error::DataError;

#[derive(Config, Debug)]
pub struct EncoderConfig {
    pub vocab_size:     usize,
    pub embedding_size: usize,
    pub hidden_size:    usize,
    #[config(default = 0.1)]
    pub dropout:        f64,
}

impl EncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        Encoder {
            embedding:   EmbeddingConfig::new(self.vocab_size, self.embedding_size).init(device),
            gru:         GruConfig::new(self.embedding_size, self.hidden_size, true).init(device),
            dropout:     DropoutConfig::new(self.dropout).init(),
            hidden_size: self.hidden_size,
        }
    }
}

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub embedding:   Embedding<B>,
    pub gru:         Gru<B>,
    pub dropout:     Dropout,
    pub hidden_size: usize,
}

impl<B: Backend> Encoder<B> {
    /// Zero initial hidden state, shape [1, H].
    pub fn init_hidden(&self, device: &B::Device) -> Tensor<B, 2> {
        Tensor::zeros([1, self.hidden_size], device)
    }

    /// source: token ids of one sentence.
    /// Returns (outputs [L, H], final hidden [1, H]).
    pub fn forward(
        &self,
        source: &[usize],
        hidden: Tensor<B, 2>,
    ) -> Result<(Tensor<B, 2>, Tensor<B, 2>), DataError> {
        if source.is_empty() {
            return Err(DataError::EmptySource);
        }
        let device  = hidden.device();
        let len     = source.len();
        let ids: Vec<i32> = source.iter().map(|&id| id as i32).collect();

        let ids = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &device).reshape([1, len]);
        let embedded = self.embedding.forward(ids); // [1, L, E]
        let [_, _, embedding_size] = embedded.dims();
        let embedded = self.dropout.forward(embedded.reshape([len, embedding_size]));

        let hidden_size = self.hidden_size;
        let mut hidden  = hidden;
        let mut outputs = Vec::with_capacity(len);
        for t in 0..len {
            let x = embedded.clone().slice([t..t + 1, 0..embedding_size]).reshape([1, 1, embedding_size]);
            hidden = self
                .gru
                .forward(x, Some(hidden.reshape([1, 1, hidden_size])))
                .reshape([1, hidden_size]);
            outputs.push(hidden.clone());
        }

        Ok((Tensor::cat(outputs, 0), hidden))
    }
}
