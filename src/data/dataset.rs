use burn::data::dataset::Dataset;
use rand::{seq::SliceRandom, Rng};

use crate::domain::{error::DataError, sentence_pair::SentencePair, vocabulary::Vocabulary};

/// Encoded sentence pairs for one split.
#[derive(Debug, Clone, Default)]
pub struct PairDataset {
    pairs: Vec<SentencePair>,
}

impl PairDataset {
    pub fn new(pairs: Vec<SentencePair>) -> Self { Self { pairs } }

    pub fn pairs(&self) -> &[SentencePair] { &self.pairs }

    /// A fresh random visiting order for one epoch.
    pub fn shuffled_indices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.pairs.len()).collect();
        indices.shuffle(rng);
        indices
    }

    /// One pair drawn uniformly, None when the split is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SentencePair> {
        self.pairs.choose(rng)
    }
}

impl Dataset<SentencePair> for PairDataset {
    fn get(&self, index: usize) -> Option<SentencePair> {
        self.pairs.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Both splits plus the vocabularies they were encoded with.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub train:     PairDataset,
    pub val:       PairDataset,
    pub src_vocab: Vocabulary,
    pub trg_vocab: Vocabulary,
}

impl Corpus {
    /// Fails when either split holds no pairs.
    pub fn new(
        train:     Vec<SentencePair>,
        val:       Vec<SentencePair>,
        src_vocab: Vocabulary,
        trg_vocab: Vocabulary,
    ) -> Result<Self, DataError> {
        if train.is_empty() {
            return Err(DataError::EmptyDataset("training"));
        }
        if val.is_empty() {
            return Err(DataError::EmptyDataset("validation"));
        }
        tracing::info!(
            "Corpus: {} train / {} val pairs, vocab {} src / {} trg",
            train.len(),
            val.len(),
            src_vocab.len(),
            trg_vocab.len(),
        );
        Ok(Self {
            train: PairDataset::new(train),
            val: PairDataset::new(val),
            src_vocab,
            trg_vocab,
        })
    }
}
