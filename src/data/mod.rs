// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw sentences and encoded SentencePairs.
//
// The pipeline flows in this order:
//
//   parallel text files          built-in / synthetic corpora
//       │                               │
//       ▼                               ▼
//   ParallelTextLoader            load_debug / load_dummy_*
//       │                               │
//       ▼                               │
//   Preprocessor  → whitespace tokens   │
//       │                               │
//       ▼                               ▼
//   Vocabulary::build → encode_pairs → Corpus { train, val }
//
// Pairs are processed one at a time by the training loop, so
// there is no batcher or padding stage.
//
// Reference: Burn Book §4 (Datasets)
//            Rust Book §13 (Iterators and Closures)

/// Reads line-aligned source/target files
pub mod loader;

/// Cleans and splits raw sentences into words
pub mod preprocessor;

/// Debug phrases and reversal-task corpora
pub mod dummy;

/// PairDataset (burn Dataset) and Corpus
pub mod dataset;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
