// ============================================================
// Layer 4 — Sentence Preprocessor
// ============================================================
// Turns one raw corpus line into the word list the vocabulary
// sees.
//
// Corpus dumps often contain:
//   - Non-breaking spaces (U+00A0) and zero-width spaces (U+200B)
//   - A byte order mark on the first line
//   - Stray tabs and carriage returns
//
// Cleaning steps (applied in order):
//   1. Map Unicode whitespace variants and control chars to space
//   2. Optionally lowercase
//   3. Split on whitespace
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor {
    lowercase: bool,
}

impl Preprocessor {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    /// Normalise whitespace and case of a single line.
    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        if self.lowercase {
            normalised.to_lowercase()
        } else {
            normalised
        }
    }

    /// Clean and split into words. An all-whitespace line yields no words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_any_whitespace() {
        let p = Preprocessor::new(false);
        assert_eq!(p.tokenize("ein  Haus\tist\u{00A0}rot"), vec!["ein", "Haus", "ist", "rot"]);
    }

    #[test]
    fn test_lowercases_when_enabled() {
        let p = Preprocessor::new(true);
        assert_eq!(p.tokenize("Das Haus"), vec!["das", "haus"]);
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let p = Preprocessor::new(true);
        assert_eq!(p.tokenize("\u{FEFF}hallo"), vec!["hallo"]);
    }

    #[test]
    fn test_blank_line() {
        let p = Preprocessor::new(true);
        assert!(p.tokenize("  \r").is_empty());
    }
}
