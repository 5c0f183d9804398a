// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bidirectional mapping between words and token ids for one
// language.
//
//   stoi: word → id   (HashMap lookup)
//   itos: id   → word (Vec index)
//
// Reserved tokens always occupy the first ids, in this order:
//   0 <unk>   1 <pad>   2 <SOS>   3 <EOS>
// Corpus words follow, most frequent first (ties broken
// alphabetically so builds are deterministic).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const UNK_TOKEN: &str = "<unk>";
pub const PAD_TOKEN: &str = "<pad>";
pub const SOS_TOKEN: &str = "<SOS>";
pub const EOS_TOKEN: &str = "<EOS>";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub stoi: HashMap<String, usize>,
    pub itos: Vec<String>,
}

impl Vocabulary {
    /// Vocabulary holding only the reserved tokens.
    pub fn with_specials() -> Self {
        let mut vocab = Self { stoi: HashMap::new(), itos: Vec::new() };
        for token in [UNK_TOKEN, PAD_TOKEN, SOS_TOKEN, EOS_TOKEN] {
            vocab.insert(token);
        }
        vocab
    }

    /// Build a vocabulary from tokenised sentences.
    /// Words seen fewer than `min_freq` times map to `<unk>`.
    pub fn build<'a, I, S>(sentences: I, min_freq: usize) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<[String]> + 'a + ?Sized,
    {
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for sentence in sentences {
            for word in sentence.as_ref() {
                *freq.entry(word.as_str()).or_insert(0) += 1;
            }
        }

        let mut words: Vec<(&str, usize)> = freq
            .into_iter()
            .filter(|(_, count)| *count >= min_freq.max(1))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let mut vocab = Self::with_specials();
        for (word, _) in words {
            vocab.insert(word);
        }
        vocab
    }

    /// Add a word if it is not yet known; returns its id.
    pub fn insert(&mut self, word: &str) -> usize {
        if let Some(&id) = self.stoi.get(word) {
            return id;
        }
        let id = self.itos.len();
        self.itos.push(word.to_string());
        self.stoi.insert(word.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn unk_id(&self) -> usize {
        self.stoi[UNK_TOKEN]
    }

    pub fn sos_id(&self) -> usize {
        self.stoi[SOS_TOKEN]
    }

    pub fn eos_id(&self) -> usize {
        self.stoi[EOS_TOKEN]
    }

    /// Word → id, falling back to `<unk>`.
    pub fn id_of(&self, word: &str) -> usize {
        self.stoi.get(word).copied().unwrap_or_else(|| self.unk_id())
    }

    /// Encode a source sentence: words followed by `<EOS>`.
    pub fn encode_source(&self, words: &[String]) -> Vec<usize> {
        let mut ids: Vec<usize> = words.iter().map(|w| self.id_of(w)).collect();
        ids.push(self.eos_id());
        ids
    }

    /// Encode a target sentence: `<SOS>`, words, `<EOS>`.
    pub fn encode_target(&self, words: &[String]) -> Vec<usize> {
        let mut ids = Vec::with_capacity(words.len() + 2);
        ids.push(self.sos_id());
        ids.extend(words.iter().map(|w| self.id_of(w)));
        ids.push(self.eos_id());
        ids
    }

    /// Id → word; out-of-range ids render as `<unk>`.
    pub fn word_of(&self, id: usize) -> &str {
        self.itos.get(id).map(String::as_str).unwrap_or(UNK_TOKEN)
    }

    /// Convert a whole id sequence back to words.
    pub fn to_words(&self, ids: &[usize]) -> Vec<String> {
        ids.iter().map(|&id| self.word_of(id).to_string()).collect()
    }
}
