// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Burn-specific code for the translation model lives here; the
// domain and data layers only deal in token ids and plain Vecs.
//
// What's in this layer:
//
//   encoder.rs    — embedding + GRU over the source sentence
//   attention.rs  — local attention (monotonic or predictive)
//   decoder.rs    — one input-feeding decode step
//   decode.rs     — start-of-decode and greedy feedback helpers
//   loss.rs       — CrossEntropyLoss / NLLLoss strategies
//   optimizer.rs  — SGD / Adam, one instance per network
//   trainer.rs    — per-pair training step and the epoch loop
//   evaluator.rs  — frozen greedy decode with attention capture
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Luong et al. (2015)

use burn::backend::{Autodiff, NdArray, Wgpu};

/// Source sentence encoder
pub mod encoder;

/// Windowed attention over encoder outputs
pub mod attention;

/// Input-feeding decoder step
pub mod decoder;

/// Decode start state and greedy token feedback
pub mod decode;

/// Loss strategies selected by name
pub mod loss;

/// Optimizer strategies selected by name
pub mod optimizer;

/// Training step and orchestrator
pub mod trainer;

/// Greedy evaluation on frozen parameters
pub mod evaluator;

/// GPU training backend (default).
pub type WgpuBackend = Autodiff<Wgpu>;

/// CPU training backend.
pub type NdArrayBackend = Autodiff<NdArray>;

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::ml::{
        decoder::DecoderConfig, encoder::EncoderConfig, loss::LossFn, optimizer::OptimizerKind,
        trainer::TrainingRuntime,
    };

    pub type TestBackend = NdArrayBackend;

    /// Small deterministic-shape runtime: E = H = 8, window 1, no dropout,
    /// plain SGD and NLLLoss.
    pub fn tiny_runtime(
        vocab_size:    usize,
        sos:           usize,
        eos:           usize,
        learning_rate: f64,
    ) -> TrainingRuntime<TestBackend> {
        let device = Default::default();
        let encoder = EncoderConfig::new(vocab_size, 8, 8).with_dropout(0.0).init(&device);
        let decoder = DecoderConfig::new(vocab_size, 8, 8, 1).with_dropout(0.0).init(&device);
        let optimizer = OptimizerKind::Sgd { learning_rate, momentum: 0.0, weight_decay: 0.0 };
        TrainingRuntime::new(
            encoder,
            decoder,
            &optimizer,
            LossFn::NegativeLogLikelihood,
            sos,
            eos,
            device,
        )
    }
}
