//! Inline annotation handling (`<fp>`, `[m]`, `<inaudible>`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalizer::{RuleTable, SentenceStage, StandardizeError};

/// Replacement for every annotation token, or no substitution at all.
///
/// Parsed from user input where an empty string or any casing of `false`
/// means "no substitution". A single space is a valid token and effectively
/// deletes annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SubstitutionToken {
    #[default]
    Disabled,
    Token(String),
}

impl SubstitutionToken {
    pub fn parse(raw: &str) -> Result<Self, StandardizeError> {
        let normalized = raw.trim().to_lowercase();
        if raw.is_empty() || normalized == "false" {
            return Ok(SubstitutionToken::Disabled);
        }
        if normalized == "true" {
            return Err(StandardizeError::invalid_config(
                "substitution token cannot be `true`; pass the token itself or `false`",
            ));
        }
        Ok(SubstitutionToken::Token(raw.to_string()))
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SubstitutionToken::Disabled => None,
            SubstitutionToken::Token(token) => Some(token),
        }
    }
}

impl TryFrom<String> for SubstitutionToken {
    type Error = StandardizeError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<SubstitutionToken> for String {
    fn from(token: SubstitutionToken) -> Self {
        match token {
            SubstitutionToken::Disabled => "false".to_string(),
            SubstitutionToken::Token(token) => token,
        }
    }
}

impl fmt::Display for SubstitutionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionToken::Disabled => write!(f, "false"),
            SubstitutionToken::Token(token) => write!(f, "{token:?}"),
        }
    }
}

/// What happens to annotation-bearing tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationPolicy {
    /// Every annotation token becomes the substitution token.
    Substitute(String),
    /// Known annotations become filler spellings, the rest are dropped.
    Strip,
    /// Annotations stay untouched.
    Keep,
}

impl AnnotationPolicy {
    /// Substitution takes precedence over `keep_annotations`.
    pub fn select(keep_annotations: bool, substitution: &SubstitutionToken) -> Self {
        match substitution.token() {
            Some(token) => AnnotationPolicy::Substitute(token.to_string()),
            None if !keep_annotations => AnnotationPolicy::Strip,
            None => AnnotationPolicy::Keep,
        }
    }
}

pub struct AnnotationResolver {
    marker: String,
    policy: AnnotationPolicy,
    hesitations: RuleTable,
}

impl AnnotationResolver {
    pub fn new(marker: impl Into<String>, policy: AnnotationPolicy, hesitations: RuleTable) -> Self {
        Self {
            marker: marker.into(),
            policy,
            hesitations,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn policy(&self) -> &AnnotationPolicy {
        &self.policy
    }

    /// What a single annotation-bearing word turns into under the policy.
    ///
    /// The result may be empty or span several words.
    pub fn resolve_word(&self, word: &str) -> String {
        match &self.policy {
            AnnotationPolicy::Substitute(token) => token.clone(),
            AnnotationPolicy::Strip => self
                .hesitations
                .apply(word)
                .split_whitespace()
                .filter(|part| !part.contains(self.marker.as_str()))
                .collect::<Vec<_>>()
                .join(" "),
            AnnotationPolicy::Keep => word.to_string(),
        }
    }
}

impl SentenceStage for AnnotationResolver {
    fn apply(&self, sentence: &str) -> String {
        if self.policy == AnnotationPolicy::Keep || !sentence.contains(self.marker.as_str()) {
            return sentence.to_string();
        }
        sentence
            .split_whitespace()
            .map(|word| {
                if word.contains(self.marker.as_str()) {
                    self.resolve_word(word)
                } else {
                    word.to_string()
                }
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "annotations"
    }
}
