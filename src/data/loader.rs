// ============================================================
// Layer 4 — Parallel Text Loader
// ============================================================
// Loads a line-aligned bilingual corpus:
//
//   train.de  line i  ↔  train.en  line i
//
// Pipeline per split:
//   read both files → check line counts match
//   → tokenise each line (Preprocessor)
//   → drop pairs with an empty side or more than max_length words
//
// Vocabularies are built from the training split only, so
// validation words unseen in training encode as <unk>.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §13 (Iterators)

use std::{fs, path::Path};

use crate::application::config::DataSection;
use crate::data::{dataset::Corpus, preprocessor::Preprocessor};
use crate::domain::{error::DataError, sentence_pair::SentencePair, vocabulary::Vocabulary};

type WordPair = (Vec<String>, Vec<String>);

/// Loads source/target text files named in the data config.
pub struct ParallelTextLoader<'a> {
    data:         &'a DataSection,
    preprocessor: Preprocessor,
}

impl<'a> ParallelTextLoader<'a> {
    pub fn new(data: &'a DataSection) -> Self {
        Self { data, preprocessor: Preprocessor::new(data.lowercase) }
    }

    /// Read both splits, build vocabularies, encode every pair.
    pub fn load(&self) -> Result<Corpus, DataError> {
        let train = self.load_split(&self.data.train_source, &self.data.train_target)?;
        let val   = self.load_split(&self.data.val_source, &self.data.val_target)?;

        let src_vocab = Vocabulary::build(train.iter().map(|(src, _)| src), self.data.min_freq);
        let trg_vocab = Vocabulary::build(train.iter().map(|(_, trg)| trg), self.data.min_freq);

        let train = encode_pairs(&train, &src_vocab, &trg_vocab);
        let val   = encode_pairs(&val, &src_vocab, &trg_vocab);
        Corpus::new(train, val, src_vocab, trg_vocab)
    }

    fn load_split(&self, source_path: &str, target_path: &str) -> Result<Vec<WordPair>, DataError> {
        let source = read_lines(source_path)?;
        let target = read_lines(target_path)?;
        if source.len() != target.len() {
            return Err(DataError::MisalignedCorpus {
                source_lines: source.len(),
                target_lines: target.len(),
            });
        }

        let total = source.len();
        let pairs: Vec<WordPair> = source
            .iter()
            .zip(&target)
            .map(|(s, t)| (self.preprocessor.tokenize(s), self.preprocessor.tokenize(t)))
            .filter(|(s, t)| {
                !s.is_empty()
                    && !t.is_empty()
                    && s.len() <= self.data.max_length
                    && t.len() <= self.data.max_length
            })
            .collect();

        if pairs.len() < total {
            tracing::warn!(
                "Skipped {} empty or over-length pairs in '{}' (max_length={})",
                total - pairs.len(),
                source_path,
                self.data.max_length,
            );
        }
        tracing::debug!(
            "Loaded '{}' / '{}': kept {} of {} pairs",
            source_path,
            target_path,
            pairs.len(),
            total,
        );
        Ok(pairs)
    }
}

/// Encode word pairs: source gets a trailing <EOS>, target is wrapped in <SOS> … <EOS>.
pub fn encode_pairs(pairs: &[WordPair], src_vocab: &Vocabulary, trg_vocab: &Vocabulary) -> Vec<SentencePair> {
    pairs
        .iter()
        .map(|(src, trg)| SentencePair::new(src_vocab.encode_source(src), trg_vocab.encode_target(trg)))
        .collect()
}

fn read_lines(path: &str) -> Result<Vec<String>, DataError> {
    let text = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: Path::new(path).to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn data_section(dir: &TempDir, train_trg: &str) -> DataSection {
        DataSection {
            train_source: write(dir, "train.de", "ein haus\nein hund\nDas Haus ist sehr sehr sehr groß\n"),
            train_target: write(dir, "train.en", train_trg),
            val_source:   write(dir, "valid.de", "ein baum\n"),
            val_target:   write(dir, "valid.en", "a tree\n"),
            max_length:   4,
            min_freq:     1,
            ..DataSection::default()
        }
    }

    #[test]
    fn test_loads_and_filters_long_pairs() {
        let dir  = TempDir::new().unwrap();
        let data = data_section(&dir, "a house\na dog\nthe house is big\n");
        let corpus = ParallelTextLoader::new(&data).load().unwrap();

        // third pair has 7 source words > max_length 4
        assert_eq!(corpus.train.pairs().len(), 2);
        assert_eq!(corpus.val.pairs().len(), 1);

        let first = &corpus.train.pairs()[0];
        assert_eq!(corpus.src_vocab.to_words(&first.src), vec!["ein", "haus", "<EOS>"]);
        assert_eq!(corpus.trg_vocab.to_words(&first.trg), vec!["<SOS>", "a", "house", "<EOS>"]);

        // "baum" never appears in training
        let val = &corpus.val.pairs()[0];
        assert_eq!(corpus.src_vocab.to_words(&val.src), vec!["ein", "<unk>", "<EOS>"]);
    }

    #[test]
    fn test_misaligned_files_are_rejected() {
        let dir  = TempDir::new().unwrap();
        let data = data_section(&dir, "a house\na dog\n");
        let err  = ParallelTextLoader::new(&data).load().unwrap_err();
        assert!(matches!(err, DataError::MisalignedCorpus { source_lines: 3, target_lines: 2 }));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let data = DataSection {
            train_source: "/nonexistent/train.de".into(),
            ..DataSection::default()
        };
        let err = ParallelTextLoader::new(&data).load().unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
