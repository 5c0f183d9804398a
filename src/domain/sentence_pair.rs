// ============================================================
// Layer 3 — SentencePair Domain Type
// ============================================================
// One source sentence and its reference translation, both as
// token id sequences over their language's vocabulary.
//
// Stored form:
//   src: w1 w2 ... wn <EOS>
//   trg: <SOS> w1 w2 ... wm <EOS>
//
// A pair is created per sample and consumed entirely within one
// train or evaluate call.

use serde::{Deserialize, Serialize};

/// Ordered token ids of one sentence.
pub type TokenSequence = Vec<usize>;

/// A source/target pair of token id sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Source language token ids
    pub src: TokenSequence,

    /// Target language token ids, starting with the start-of-sequence id
    pub trg: TokenSequence,
}

impl SentencePair {
    pub fn new(src: TokenSequence, trg: TokenSequence) -> Self {
        Self { src, trg }
    }

    /// Target ids with the leading start token removed.
    /// Neither loop ever scores predicting the start token.
    pub fn target_without_start(&self) -> &[usize] {
        self.trg.get(1..).unwrap_or(&[])
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_start_token() {
        let pair = SentencePair::new(vec![3, 5, 7], vec![1, 9, 2]);
        assert_eq!(pair.target_without_start(), &[9, 2]);
    }

    #[test]
    fn test_empty_target_strips_to_empty() {
        let pair = SentencePair::new(vec![3], vec![]);
        assert!(pair.target_without_start().is_empty());

        let only_start = SentencePair::new(vec![3], vec![1]);
        assert!(only_start.target_without_start().is_empty());
    }
}
