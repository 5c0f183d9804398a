// ============================================================
// Layer 5 — Local (Windowed) Attention
// ============================================================
// At every decode step the decoder attends over a window of
// encoder outputs instead of the whole source:
//
//   1. pick a center          monotonic: the decode step index
//                             predictive: p = L · σ(vᵀ tanh(W h))
//   2. clamp the window       domain::attention::window_bounds
//   3. score the window       (W_a h) · e_j   (Luong "general")
//   4. predictive only:       add -(j - p)² / (2σ²), σ = D / 2
//   5. softmax over window → weights, context = Σ w_j e_j
//
// The weights always have end - start + 1 entries and sum to 1.
//
// Reference: Luong et al. (2015), Effective Approaches to
//            Attention-based Neural Machine Translation

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::{sigmoid, softmax, tanh},
};

use crate::domain::attention::{window_bounds, WindowBounds};

#[derive(Config, Debug)]
pub struct LocalAttentionConfig {
    pub hidden_size: usize,
    /// Half-width D of the window.
    pub half_width:  usize,
    #[config(default = false)]
    pub predictive:  bool,
}

impl LocalAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LocalAttention<B> {
        let predictor = self.predictive.then(|| AlignmentPredictor {
            projection: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            position:   LinearConfig::new(self.hidden_size, 1).init(device),
        });
        LocalAttention {
            score: LinearConfig::new(self.hidden_size, self.hidden_size)
                .with_bias(false)
                .init(device),
            predictor,
            half_width: self.half_width,
        }
    }
}

/// Predicts a real-valued source position from the decoder state.
#[derive(Module, Debug)]
pub struct AlignmentPredictor<B: Backend> {
    pub projection: Linear<B>,
    pub position:   Linear<B>,
}

impl<B: Backend> AlignmentPredictor<B> {
    /// hidden [1, H] → position in (0, source_length), shape [1, 1]
    pub fn forward(&self, hidden: Tensor<B, 2>, source_length: usize) -> Tensor<B, 2> {
        let activated = tanh(self.projection.forward(hidden));
        sigmoid(self.position.forward(activated)) * (source_length as f64)
    }
}

#[derive(Module, Debug)]
pub struct LocalAttention<B: Backend> {
    pub score:      Linear<B>,
    pub predictor:  Option<AlignmentPredictor<B>>,
    pub half_width: usize,
}

/// Attention weights over one window plus its bounds.
#[derive(Debug, Clone)]
pub struct AttentionWindow<B: Backend> {
    /// [1, bounds.len()]
    pub weights: Tensor<B, 2>,
    pub bounds:  WindowBounds,
}

impl<B: Backend> LocalAttention<B> {
    /// hidden: [1, H], encoder_output: [L, H]
    /// Returns (context [1, H], window).
    pub fn forward(
        &self,
        step: usize,
        hidden: Tensor<B, 2>,
        encoder_output: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, AttentionWindow<B>) {
        let [source_length, hidden_size] = encoder_output.dims();
        let device = hidden.device();

        let (bounds, position) = match &self.predictor {
            None => (window_bounds(step, source_length, self.half_width), None),
            Some(predictor) => {
                let position = predictor.forward(hidden.clone(), source_length);
                let center: f64 = position.clone().into_scalar().elem::<f64>();
                let bounds = window_bounds(center.max(0.0).floor() as usize, source_length, self.half_width);
                (bounds, Some(position))
            }
        };
        let width = bounds.len();

        let window = encoder_output.slice([bounds.start..bounds.end + 1, 0..hidden_size]);
        let mut scores = self.score.forward(hidden).matmul(window.clone().transpose()); // [1, w]

        if let Some(position) = position {
            let sigma = self.half_width.max(1) as f64 / 2.0;
            let offsets = Tensor::<B, 1, Int>::arange(bounds.start as i64..bounds.end as i64 + 1, &device)
                .float()
                .reshape([1, width])
                - position.expand([1, width]);
            scores = scores - (offsets.clone() * offsets) / (2.0 * sigma * sigma);
        }

        let weights = softmax(scores, 1);
        let context = weights.clone().matmul(window);
        (context, AttentionWindow { weights, bounds })
    }
}
