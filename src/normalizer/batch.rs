use serde::{Deserialize, Serialize};

use crate::normalizer::{StandardizeError, StandardizeResult};

/// Transcripts and their optional parallel references.
///
/// Position is the only link between a transcript and its reference, so a
/// paired batch can only be built from sequences of equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    transcripts: Vec<String>,
    references: Option<Vec<String>>,
}

impl Batch {
    pub fn new(transcripts: Vec<String>) -> Self {
        Self {
            transcripts,
            references: None,
        }
    }

    pub fn paired(transcripts: Vec<String>, references: Vec<String>) -> StandardizeResult<Self> {
        if transcripts.len() != references.len() {
            return Err(StandardizeError::LengthMismatch {
                transcripts: transcripts.len(),
                references: references.len(),
            });
        }
        Ok(Self {
            transcripts,
            references: Some(references),
        })
    }

    pub fn transcripts(&self) -> &[String] {
        &self.transcripts
    }

    pub fn references(&self) -> Option<&[String]> {
        self.references.as_deref()
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Option<Vec<String>>) {
        (self.transcripts, self.references)
    }

    /// Replace the transcripts, keeping references. The new sequence must be
    /// as long as the old one.
    pub fn with_transcripts(self, transcripts: Vec<String>) -> StandardizeResult<Self> {
        if transcripts.len() != self.transcripts.len() {
            return Err(StandardizeError::LengthInvariant {
                input: self.transcripts.len(),
                output: transcripts.len(),
            });
        }
        Ok(Self {
            transcripts,
            references: self.references,
        })
    }

    /// Keep the utterances for which `keep` returns true, references included.
    pub fn retain(self, mut keep: impl FnMut(&str) -> bool) -> Self {
        let mask: Vec<bool> = self.transcripts.iter().map(|t| keep(t)).collect();
        let transcripts = select(self.transcripts, &mask);
        let references = self.references.map(|refs| select(refs, &mask));
        Self {
            transcripts,
            references,
        }
    }
}

fn select(items: Vec<String>, mask: &[bool]) -> Vec<String> {
    items
        .into_iter()
        .zip(mask)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}
