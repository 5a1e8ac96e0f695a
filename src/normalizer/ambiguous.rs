//! Resolution of dual-form tokens.
//!
//! Corpora encode a word both as pronounced and in its standard spelling.
//! NPSC writes `pronounced|standard` (or `pronounced|1` when the transcriber
//! flagged a phonetic/orthographic discrepancy); NB Tale writes
//! `pronounced;normalized=standard` and tags foreign words `word;lang=xx`.

use serde::{Deserialize, Serialize};

use crate::normalizer::SentenceStage;

/// Right-hand side marking a discrepancy rather than a standard spelling.
pub const DISCREPANCY_MARKER: &str = "1";

/// How a corpus encodes dual-form tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguousSyntax {
    /// The corpus has no dual-form tokens; the stage is skipped.
    #[default]
    None,
    /// `left|right`
    Pipe,
    /// `left;normalized=right`, `word;lang=xx`
    Tagged,
}

/// Resolve a single `left|right` token.
///
/// A token without a right-hand side is not a dual form and is returned as is.
/// Only the segment between the first and second `|` counts as the right side.
pub fn resolve_piped_token(token: &str, standardize: bool) -> &str {
    let parts = token
        .split_once('|')
        .map(|(left, rest)| (left, rest.split('|').next().unwrap_or_default()));
    match parts {
        Some((_, "")) | None => token,
        Some((left, DISCREPANCY_MARKER)) => left,
        Some((left, right)) => {
            if standardize {
                right
            } else {
                left
            }
        }
    }
}

pub struct PipeResolver {
    standardize: bool,
}

impl PipeResolver {
    pub fn new(standardize: bool) -> Self {
        Self { standardize }
    }
}

impl SentenceStage for PipeResolver {
    fn apply(&self, sentence: &str) -> String {
        if !sentence.contains('|') {
            return sentence.to_string();
        }
        sentence
            .split_whitespace()
            .map(|token| resolve_piped_token(token, self.standardize))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "ambiguous-pipe"
    }
}

pub const DEFAULT_NORMALIZED_MARKER: &str = ";normalized=";
pub const DEFAULT_LANGUAGE_MARKER: &str = ";lang=";

pub struct TaggedResolver {
    normalized_marker: String,
    language_marker: String,
    standardize: bool,
}

impl TaggedResolver {
    pub fn new(
        normalized_marker: impl Into<String>,
        language_marker: impl Into<String>,
        standardize: bool,
    ) -> Self {
        Self {
            normalized_marker: normalized_marker.into(),
            language_marker: language_marker.into(),
            standardize,
        }
    }

    fn resolve<'a>(&self, token: &'a str) -> &'a str {
        if !self.language_marker.is_empty() && token.contains(self.language_marker.as_str()) {
            return token.split(';').next().unwrap_or(token);
        }
        if self.normalized_marker.is_empty() {
            return token;
        }
        match token.split_once(self.normalized_marker.as_str()) {
            Some((left, right)) => {
                let right = right.split(';').next().unwrap_or_default();
                if right.is_empty() {
                    token
                } else if self.standardize {
                    right
                } else {
                    left
                }
            }
            None => token,
        }
    }
}

impl SentenceStage for TaggedResolver {
    fn apply(&self, sentence: &str) -> String {
        if !sentence.contains(';') {
            return sentence.to_string();
        }
        sentence
            .split_whitespace()
            .map(|token| self.resolve(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "ambiguous-tagged"
    }
}
