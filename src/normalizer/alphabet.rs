//! Alphabet compliance auditing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Characters permitted in a standardized transcript.
pub const NORWEGIAN_ALPHABET: &str =
    "a b c d e f g h i j k l m n o p q r s t u v w x y z å ø æ - é –";

/// A case-insensitive set of permitted characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Alphabet {
    chars: BTreeSet<char>,
}

impl Alphabet {
    /// Parse a whitespace separated list of characters, e.g. `"a b c"`.
    ///
    /// Multi-character entries contribute each of their characters.
    pub fn parse(spec: &str) -> Self {
        Self::from_chars(spec.split_whitespace().flat_map(str::chars))
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            chars: chars.into_iter().flat_map(char::to_lowercase).collect(),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::parse(NORWEGIAN_ALPHABET)
    }
}

impl From<String> for Alphabet {
    fn from(spec: String) -> Self {
        Self::parse(&spec)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.to_string()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for c in &self.chars {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{c}")?;
            first = false;
        }
        Ok(())
    }
}

/// Characters, words and sentences that fall outside an [`Alphabet`].
///
/// `sentences` and `indices` are aligned: `sentences[k]` is the input at
/// position `indices[k]`. Characters and words are distinct, in first-seen
/// order across the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub characters: Vec<char>,
    pub words: Vec<String>,
    pub sentences: Vec<String>,
    pub indices: Vec<usize>,
}

impl DiagnosticReport {
    pub fn is_clean(&self) -> bool {
        self.indices.is_empty()
    }

    /// Words from the offending sentences that contain `marker`, lower-cased
    /// and in first-seen order.
    pub fn marked_words(&self, marker: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        if marker.is_empty() {
            return found;
        }
        for sentence in &self.sentences {
            for word in sentence.to_lowercase().split_whitespace() {
                if word.contains(marker) && !found.iter().any(|w| w == word) {
                    found.push(word.to_string());
                }
            }
        }
        found
    }
}

/// Classify every sentence of `sentences` against `alphabet`.
pub fn out_of_alphabet<S: AsRef<str>>(sentences: &[S], alphabet: &Alphabet) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();

    for (index, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.as_ref();
        let lowered = sentence.to_lowercase();
        let mut flagged = false;

        for word in lowered.split_whitespace() {
            let mut word_flagged = false;
            for c in word.chars().filter(|c| !alphabet.contains(*c)) {
                if !report.characters.contains(&c) {
                    report.characters.push(c);
                }
                word_flagged = true;
            }
            if word_flagged {
                if !report.words.iter().any(|w| w == word) {
                    report.words.push(word.to_string());
                }
                flagged = true;
            }
        }

        if flagged {
            report.indices.push(index);
            report.sentences.push(sentence.to_string());
        }
    }

    report
}
