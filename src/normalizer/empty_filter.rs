//! Removal of utterances that carry no speech content.
//!
//! An utterance is blank when every token belongs to the blank vocabulary:
//! the empty string, a single space, and the annotation tokens found in the
//! batch itself (rewritten to what the active annotation policy turns them
//! into). Blank utterances are dropped together with their references.

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::normalizer::{out_of_alphabet, Alphabet, Batch, StandardizeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankVocabulary {
    tokens: BTreeSet<String>,
}

impl Default for BlankVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl BlankVocabulary {
    pub fn new() -> Self {
        Self {
            tokens: ["", " "].into_iter().map(String::from).collect(),
        }
    }

    /// Add a blank spelling. Multi-word spellings contribute each word.
    pub fn insert(&mut self, spelling: &str) {
        let trimmed = spelling.trim();
        if trimmed.is_empty() {
            return;
        }
        for word in trimmed.split_whitespace() {
            self.tokens.insert(word.to_string());
        }
    }

    /// Collect the annotation tokens of the non-compliant sentences in
    /// `sentences`, passing each through `normalize` first.
    pub fn discover<S: AsRef<str>>(
        &mut self,
        sentences: &[S],
        marker: &str,
        alphabet: &Alphabet,
        normalize: impl Fn(&str) -> String,
    ) {
        let report = out_of_alphabet(sentences, alphabet);
        for word in report.marked_words(marker) {
            self.insert(&normalize(&word));
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// True when no token of `sentence` carries content. An empty sentence is
    /// blank.
    pub fn is_blank(&self, sentence: &str) -> bool {
        sentence.split_whitespace().all(|token| self.contains(token))
    }
}

/// Drop blank utterances, keeping references paired with their transcripts.
///
/// Returns the reduced batch and the number of removed utterances.
pub fn retain_non_blank(batch: Batch, vocabulary: &BlankVocabulary) -> (Batch, usize) {
    let before = batch.len();
    debug!(
        "Removing utterances that only consist of: {:?}",
        vocabulary.tokens().collect::<Vec<_>>()
    );
    let kept = batch.retain(|sentence| !vocabulary.is_blank(sentence));
    let removed = before - kept.len();
    info!(
        "The original list contained {} utterances while the standardized list contains {} utterances",
        before,
        kept.len()
    );
    (kept, removed)
}

/// Remove utterances that are empty or made only of annotation tokens found
/// in `transcripts`, keeping `references` aligned.
pub fn remove_empty_utterances(
    transcripts: Vec<String>,
    references: Vec<String>,
    marker: &str,
    alphabet: &Alphabet,
) -> StandardizeResult<(Vec<String>, Vec<String>)> {
    let batch = Batch::paired(transcripts, references)?;
    let mut vocabulary = BlankVocabulary::new();
    vocabulary.discover(batch.transcripts(), marker, alphabet, str::to_string);

    let (kept, _) = retain_non_blank(batch, &vocabulary);
    let (transcripts, references) = kept.into_parts();
    Ok((transcripts, references.unwrap_or_default()))
}
