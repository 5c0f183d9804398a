// ============================================================
// Layer 4 — Synthetic Corpora
// ============================================================
// Three small corpora that need no files on disk:
//
//   debug           — a handful of German → English phrases,
//                     repeated up to `debug_size` pairs, 80/20 split
//   fixed length    — random number-word sequences of one length
//   variable length — lengths uniform in [min_length, max_length]
//
// In both dummy tasks the target is the reversed source, so a
// working model must learn to attend from the end of the source
// towards the start.

use rand::{seq::SliceRandom, Rng};

use crate::application::config::{DataSection, DummySection};
use crate::data::{dataset::Corpus, loader::encode_pairs, preprocessor::Preprocessor, splitter::split_train_val};
use crate::domain::{error::DataError, vocabulary::Vocabulary};

const DEBUG_PHRASES: &[(&str, &str)] = &[
    ("ein haus", "a house"),
    ("ein hund", "a dog"),
    ("eine katze", "a cat"),
    ("das haus ist rot", "the house is red"),
    ("der hund ist klein", "the dog is small"),
    ("die katze schläft", "the cat sleeps"),
    ("ich sehe den hund", "i see the dog"),
    ("wir haben ein haus", "we have a house"),
    ("sie trinkt wasser", "she drinks water"),
    ("er liest ein buch", "he reads a book"),
    ("das buch ist alt", "the book is old"),
    ("guten morgen", "good morning"),
];

const DEBUG_TRAIN_FRACTION: f64 = 0.8;

/// Built-in phrase corpus for smoke runs.
pub fn load_debug<R: Rng + ?Sized>(data: &DataSection, rng: &mut R) -> Result<Corpus, DataError> {
    let preprocessor = Preprocessor::new(data.lowercase);
    let pairs: Vec<(Vec<String>, Vec<String>)> = DEBUG_PHRASES
        .iter()
        .cycle()
        .take(data.debug_size)
        .map(|(src, trg)| (preprocessor.tokenize(src), preprocessor.tokenize(trg)))
        .collect();

    let src_vocab = Vocabulary::build(pairs.iter().map(|(src, _)| src), 1);
    let trg_vocab = Vocabulary::build(pairs.iter().map(|(_, trg)| trg), 1);

    let (train, val) = split_train_val(pairs, DEBUG_TRAIN_FRACTION, rng);
    Corpus::new(
        encode_pairs(&train, &src_vocab, &trg_vocab),
        encode_pairs(&val, &src_vocab, &trg_vocab),
        src_vocab,
        trg_vocab,
    )
}

/// Reversal task with every sequence `fixed_length` words long.
pub fn load_dummy_fixed_length<R: Rng + ?Sized>(data: &DataSection, rng: &mut R) -> Result<Corpus, DataError> {
    let dummy  = &data.dummy;
    let length = dummy.fixed_length;
    reversal_corpus(dummy, rng, |_| length)
}

/// Reversal task with lengths drawn uniformly from `[min_length, max_length]`.
pub fn load_dummy_variable_length<R: Rng + ?Sized>(data: &DataSection, rng: &mut R) -> Result<Corpus, DataError> {
    let dummy = &data.dummy;
    let (min, max) = (dummy.min_length, dummy.max_length.max(dummy.min_length));
    reversal_corpus(dummy, rng, |rng| rng.gen_range(min..=max))
}

fn reversal_corpus<R, F>(dummy: &DummySection, rng: &mut R, mut length: F) -> Result<Corpus, DataError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> usize,
{
    let words: Vec<String> = (0..dummy.vocabulary_size).map(|i| i.to_string()).collect();

    // Both sides share one word list, so one vocabulary serves both.
    let mut vocab = Vocabulary::with_specials();
    for word in &words {
        vocab.insert(word);
    }

    let mut generate = |count: usize, rng: &mut R| -> Vec<(Vec<String>, Vec<String>)> {
        (0..count)
            .map(|_| {
                let len = length(rng);
                let src: Vec<String> = (0..len)
                    .filter_map(|_| words.choose(rng).cloned())
                    .collect();
                let trg: Vec<String> = src.iter().rev().cloned().collect();
                (src, trg)
            })
            .collect()
    };

    let train = generate(dummy.train_size, rng);
    let val   = generate(dummy.val_size, rng);
    Corpus::new(
        encode_pairs(&train, &vocab, &vocab),
        encode_pairs(&val, &vocab, &vocab),
        vocab.clone(),
        vocab,
    )
}
