// ============================================================
// Layer 5 — Optimizer Strategies
// ============================================================
// The `optimizer` config section resolves once into an
// OptimizerKind. Each network (encoder, decoder) then gets its
// own ModelOptimizer built from that kind, so both keep separate
// internal state (momentum buffers, Adam moments).
//
//   SGD:  θ ← θ - lr · (g + wd·θ), optional momentum
//   Adam: m = β1·m + (1-β1)·g,  v = β2·v + (1-β2)·g²
//         θ ← θ - lr · m / (√v + ε)
//
// Reference: Burn Book §5 (Optimizers), Kingma & Ba (2015)

use burn::{
    module::AutodiffModule,
    optim::{
        decay::WeightDecayConfig, momentum::MomentumConfig, AdamConfig, GradientsParams,
        Optimizer, SgdConfig,
    },
    tensor::backend::AutodiffBackend,
};

use crate::application::config::OptimizerSection;
use crate::domain::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum OptimizerKind {
    Sgd {
        learning_rate: f64,
        momentum:      f64,
        weight_decay:  f64,
    },
    Adam {
        learning_rate: f64,
        weight_decay:  f64,
    },
}

impl OptimizerKind {
    /// Resolve the optimizer config section. `momentum` is only read for SGD.
    pub fn from_section(section: &OptimizerSection) -> Result<Self, ConfigError> {
        if !(section.learning_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "optimizer.learning_rate must be positive, got {}",
                section.learning_rate
            )));
        }
        match section.kind.as_str() {
            "SGD" => Ok(Self::Sgd {
                learning_rate: section.learning_rate,
                momentum:      section.momentum,
                weight_decay:  section.weight_decay,
            }),
            "Adam" => Ok(Self::Adam {
                learning_rate: section.learning_rate,
                weight_decay:  section.weight_decay,
            }),
            other => Err(ConfigError::UnknownOptimizer(other.to_string())),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::Sgd { learning_rate, .. } | Self::Adam { learning_rate, .. } => *learning_rate,
        }
    }
}

/// Object-safe view of a burn optimizer for one module type.
trait StepModule<M, B: AutodiffBackend>: Send {
    fn step_module(&mut self, learning_rate: f64, module: M, grads: GradientsParams) -> M;
}

impl<M, B, O> StepModule<M, B> for O
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
{
    fn step_module(&mut self, learning_rate: f64, module: M, grads: GradientsParams) -> M {
        self.step(learning_rate, module, grads)
    }
}

/// An optimizer bound to one network, chosen at startup.
pub struct ModelOptimizer<M, B: AutodiffBackend> {
    inner:         Box<dyn StepModule<M, B>>,
    learning_rate: f64,
}

impl<M, B> ModelOptimizer<M, B>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + 'static,
{
    pub fn new(kind: &OptimizerKind) -> Self {
        let inner: Box<dyn StepModule<M, B>> = match *kind {
            OptimizerKind::Sgd { momentum, weight_decay, .. } => {
                let mut config = SgdConfig::new();
                if momentum > 0.0 {
                    config = config.with_momentum(Some(MomentumConfig::new().with_momentum(momentum)));
                }
                if weight_decay > 0.0 {
                    config = config.with_weight_decay(Some(WeightDecayConfig::new(weight_decay as f32)));
                }
                Box::new(config.init::<B, M>())
            }
            OptimizerKind::Adam { weight_decay, .. } => {
                let mut config = AdamConfig::new().with_epsilon(1e-8);
                if weight_decay > 0.0 {
                    config = config.with_weight_decay(Some(WeightDecayConfig::new(weight_decay as f32)));
                }
                Box::new(config.init::<B, M>())
            }
        };
        Self { inner, learning_rate: kind.learning_rate() }
    }

    /// Apply one update and return the updated module.
    pub fn step(&mut self, module: M, grads: GradientsParams) -> M {
        self.inner.step_module(self.learning_rate, module, grads)
    }
}
