// ============================================================
// Layer 5 — Loss Strategies
// ============================================================
// The decoder emits log-probabilities over the target vocabulary
// for a single step ([1, vocab]). Both strategies score that row
// against one target id:
//
//   CrossEntropyLoss  → log_softmax + NLL (burn's CrossEntropyLoss)
//   NLLLoss           → -log_probs[target]
//
// log_softmax is idempotent on log-probabilities, so both give the
// same value for this decoder; they differ for raw logits.

use burn::{nn::loss::CrossEntropyLossConfig, prelude::*};

use crate::domain::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossFn {
    CrossEntropy,
    NegativeLogLikelihood,
}

impl LossFn {
    /// Resolve the `loss_fn` config value.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "CrossEntropyLoss" => Ok(Self::CrossEntropy),
            "NLLLoss"          => Ok(Self::NegativeLogLikelihood),
            other              => Err(ConfigError::UnknownLossFunction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CrossEntropy          => "CrossEntropyLoss",
            Self::NegativeLogLikelihood => "NLLLoss",
        }
    }

    /// Loss of one distribution row `[1, vocab]` against `target`.
    /// Returns a one-element tensor so it can be summed over steps.
    pub fn forward<B: Backend>(&self, distribution: Tensor<B, 2>, target: usize) -> Tensor<B, 1> {
        let device  = distribution.device();
        let targets = Tensor::<B, 1, Int>::from_ints([target as i32], &device);
        match self {
            Self::CrossEntropy => CrossEntropyLossConfig::new()
                .init(&device)
                .forward(distribution, targets),
            Self::NegativeLogLikelihood => distribution
                .gather(1, targets.reshape([1, 1]))
                .neg()
                .reshape([1]),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burn::{backend::NdArray, tensor::activation::log_softmax};

    type TestBackend = NdArray;

    #[test]
    fn test_from_name() {
        assert_eq!(LossFn::from_name("CrossEntropyLoss").unwrap(), LossFn::CrossEntropy);
        assert_eq!(LossFn::from_name("NLLLoss").unwrap(), LossFn::NegativeLogLikelihood);
        assert_eq!(LossFn::NegativeLogLikelihood.name(), "NLLLoss");
    }

    #[test]
    fn test_unknown_loss_function_message() {
        let err = LossFn::from_name("Foo").unwrap_err();
        assert!(err.to_string().contains("Unknown loss function: Foo"));
    }

    #[test]
    fn test_nll_picks_target_log_probability() {
        let device = Default::default();
        let log_probs = Tensor::<TestBackend, 1>::from_floats([0.5f32, 0.25, 0.25], &device)
            .log()
            .reshape([1, 3]);
        let loss: f64 = LossFn::NegativeLogLikelihood
            .forward(log_probs, 0)
            .into_scalar()
            .elem::<f64>();
        assert_relative_eq!(loss, 2.0f64.ln(), epsilon = 1e-5);
    }

    #[test]
    fn test_cross_entropy_matches_nll_on_log_probabilities() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 1>::from_floats([1.0f32, -0.5, 2.0, 0.3], &device)
            .reshape([1, 4]);
        let log_probs = log_softmax(logits, 1);

        let ce: f64 = LossFn::CrossEntropy
            .forward(log_probs.clone(), 2)
            .into_scalar()
            .elem::<f64>();
        let nll: f64 = LossFn::NegativeLogLikelihood
            .forward(log_probs, 2)
            .into_scalar()
            .elem::<f64>();
        assert_relative_eq!(ce, nll, epsilon = 1e-5);
        assert!(ce >= 0.0);
    }
}
