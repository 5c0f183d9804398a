// ============================================================
// Layer 5 — Decode Protocol (shared by training and evaluation)
// ============================================================
// Both loops start a pair the same way and feed back the greedy
// prediction the same way. Keeping these two pieces in one place
// keeps the training and evaluation paths numerically identical.
//
//   encoder(src)        → outputs [L, H], hidden [1, H]
//   context             = outputs[L - 1]
//   decoder hidden      = encoder final hidden
//   first decoder input = <SOS>

use burn::prelude::*;

use crate::domain::error::DataError;
use crate::ml::encoder::Encoder;

/// Initial state of one decode call.
#[derive(Debug, Clone)]
pub struct DecodeStart<B: Backend> {
    pub encoder_output: Tensor<B, 2>,
    pub source_length:  usize,
    pub context:        Tensor<B, 2>,
    pub hidden:         Tensor<B, 2>,
    pub input:          Tensor<B, 2, Int>,
}

/// Run the encoder over `source` and prepare the first decode step.
pub fn begin_decode<B: Backend>(
    encoder: &Encoder<B>,
    source:  &[usize],
    sos:     usize,
    device:  &B::Device,
) -> Result<DecodeStart<B>, DataError> {
    let (encoder_output, hidden) = encoder.forward(source, encoder.init_hidden(device))?;
    let [source_length, hidden_size] = encoder_output.dims();
    let context = encoder_output
        .clone()
        .slice([source_length - 1..source_length, 0..hidden_size]);

    Ok(DecodeStart {
        encoder_output,
        source_length,
        context,
        hidden,
        input: token_tensor(sos, device),
    })
}

/// A single token id as a [1, 1] integer tensor.
pub fn token_tensor<B: Backend>(token: usize, device: &B::Device) -> Tensor<B, 2, Int> {
    Tensor::<B, 1, Int>::from_ints([token as i32], device).reshape([1, 1])
}

/// Top-1 token of a [1, vocab] distribution.
/// The returned tensor is integer-valued and carries no gradient.
pub fn greedy_token<B: Backend>(distribution: &Tensor<B, 2>) -> (Tensor<B, 2, Int>, usize) {
    let top = distribution.clone().argmax(1); // [1, 1]
    let token = top.clone().into_scalar().elem::<i64>() as usize;
    (top, token)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::encoder::EncoderConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_context_starts_at_last_encoder_output() {
        let device  = Default::default();
        let encoder = EncoderConfig::new(10, 4, 5).with_dropout(0.0).init::<TestBackend>(&device);
        let start   = begin_decode(&encoder, &[4, 2, 8, 3], 1, &device).unwrap();

        assert_eq!(start.source_length, 4);
        let context: Vec<f32> = start.context.into_data().to_vec().unwrap();
        let hidden: Vec<f32>  = start.hidden.into_data().to_vec().unwrap();
        assert_eq!(context, hidden);
        assert_eq!(start.input.into_scalar().elem::<i64>(), 1);
    }

    #[test]
    fn test_greedy_token_is_argmax() {
        let device = Default::default();
        let dist = Tensor::<TestBackend, 1>::from_floats([-2.0f32, -0.1, -3.0], &device).reshape([1, 3]);
        let (tensor, token) = greedy_token(&dist);
        assert_eq!(token, 1);
        assert_eq!(tensor.dims(), [1, 1]);
    }
}
