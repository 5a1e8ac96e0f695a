use serde::{Deserialize, Serialize};

use crate::normalizer::{AnnotationPolicy, StandardizeError, StandardizeResult, SubstitutionToken};

/// Switches gating the optional pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizationConfig {
    /// Leave symbols outside the alphabet as they are
    pub keep_symbols: bool,
    /// Leave digits as they are instead of spelling them out
    pub keep_numerals: bool,
    /// Leave annotation tokens as they are (ignored when a substitution token is set)
    pub keep_annotations: bool,
    /// Substring marking an annotation token, e.g. `<` or `[`
    pub annotation_token: String,
    pub substitution_token: SubstitutionToken,
    /// Keep utterances that contain no speech
    pub keep_empty: bool,
    /// Pick the standard spelling of dual-form tokens
    pub standardize_ambiguous_words: bool,
    /// Apply the corpus patch table
    pub apply_patch: bool,
}

impl Default for StandardizationConfig {
    fn default() -> Self {
        Self {
            keep_symbols: true,
            keep_numerals: true,
            keep_annotations: true,
            annotation_token: "<".to_string(),
            substitution_token: SubstitutionToken::Disabled,
            keep_empty: true,
            standardize_ambiguous_words: true,
            apply_patch: true,
        }
    }
}

impl StandardizationConfig {
    pub fn annotation_policy(&self) -> AnnotationPolicy {
        AnnotationPolicy::select(self.keep_annotations, &self.substitution_token)
    }

    /// Checks that only matter when the corpus uses annotation tokens.
    pub fn validate_annotations(&self) -> StandardizeResult<()> {
        if self.annotation_token.trim().is_empty() {
            return Err(StandardizeError::invalid_config(
                "annotation token must not be empty",
            ));
        }
        Ok(())
    }
}

/// Per-field overrides layered on top of a profile's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    pub keep_symbols: Option<bool>,
    pub keep_numerals: Option<bool>,
    pub keep_annotations: Option<bool>,
    pub annotation_token: Option<String>,
    pub substitution_token: Option<String>,
    pub keep_empty: Option<bool>,
    pub standardize_ambiguous_words: Option<bool>,
    pub apply_patch: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply_to(&self, base: &StandardizationConfig) -> StandardizeResult<StandardizationConfig> {
        let substitution_token = match &self.substitution_token {
            Some(raw) => SubstitutionToken::parse(raw)?,
            None => base.substitution_token.clone(),
        };

        Ok(StandardizationConfig {
            keep_symbols: self.keep_symbols.unwrap_or(base.keep_symbols),
            keep_numerals: self.keep_numerals.unwrap_or(base.keep_numerals),
            keep_annotations: self.keep_annotations.unwrap_or(base.keep_annotations),
            annotation_token: self
                .annotation_token
                .clone()
                .unwrap_or_else(|| base.annotation_token.clone()),
            substitution_token,
            keep_empty: self.keep_empty.unwrap_or(base.keep_empty),
            standardize_ambiguous_words: self
                .standardize_ambiguous_words
                .unwrap_or(base.standardize_ambiguous_words),
            apply_patch: self.apply_patch.unwrap_or(base.apply_patch),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let base = StandardizationConfig::default();
        let overrides = ConfigOverrides {
            keep_symbols: Some(false),
            substitution_token: Some("<unk>".to_string()),
            ..Default::default()
        };

        let config = overrides.apply_to(&base).unwrap();
        assert!(!config.keep_symbols);
        assert!(config.keep_numerals);
        assert_eq!(config.substitution_token.token(), Some("<unk>"));
        assert_eq!(config.annotation_token, "<");
    }

    #[test]
    fn test_overrides_reject_true_token() {
        let overrides = ConfigOverrides {
            substitution_token: Some("True".to_string()),
            ..Default::default()
        };

        assert!(overrides.apply_to(&StandardizationConfig::default()).is_err());
    }

    #[test]
    fn test_empty_annotation_token_is_invalid() {
        let config = StandardizationConfig {
            annotation_token: String::new(),
            ..Default::default()
        };

        assert!(config.validate_annotations().is_err());
    }

    #[test]
    fn test_config_toml_roundtrip_of_sentinel() {
        let parsed: StandardizationConfig =
            toml::from_str("substitution_token = \"False\"\nkeep_empty = false").unwrap();

        assert_eq!(parsed.substitution_token, SubstitutionToken::Disabled);
        assert!(!parsed.keep_empty);
        assert!(parsed.apply_patch);
    }
}
