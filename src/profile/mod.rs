//! Corpus profiles.
//!
//! A profile is the data half of a corpus adapter: its alphabet, its rule
//! tables, which optional stages its annotation conventions need, and the
//! default standardization switches. Profiles are plain TOML so new corpora
//! can be added without touching the pipeline.

mod config;
mod loader;

pub use config::{ConfigOverrides, StandardizationConfig};
pub use loader::{builtin_profile, builtin_source, load_profile, override_path, parse_profile};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalizer::{
    Alphabet, AmbiguousSyntax, RuleTable, StandardizeError, StandardizeResult,
    DEFAULT_LANGUAGE_MARKER, DEFAULT_NORMALIZED_MARKER,
};

/// Source corpora with a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Corpus {
    /// Norwegian Parliamentary Speech Corpus
    Npsc,
    /// Rundkast broadcast news corpus
    Rundkast,
    /// NB Tale dialect corpus
    Nbtale,
    /// NST read speech corpus
    Nst,
}

impl Corpus {
    pub const ALL: [Corpus; 4] = [Corpus::Npsc, Corpus::Rundkast, Corpus::Nbtale, Corpus::Nst];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corpus::Npsc => "npsc",
            Corpus::Rundkast => "rundkast",
            Corpus::Nbtale => "nbtale",
            Corpus::Nst => "nst",
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSwitches {
    /// Dual-form token syntax used by the corpus
    pub ambiguous: AmbiguousSyntax,
    /// Turn `i_forhold_til` into `i forhold til`
    pub split_underscores: bool,
    /// The corpus marks annotations inline
    pub annotations: bool,
    /// Strip underscores glued to word edges when symbols are substituted
    pub strip_underscore_affixes: bool,
}

impl Default for StageSwitches {
    fn default() -> Self {
        Self {
            ambiguous: AmbiguousSyntax::None,
            split_underscores: true,
            annotations: true,
            strip_underscore_affixes: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggedMarkers {
    pub normalized: String,
    pub language: String,
}

impl Default for TaggedMarkers {
    fn default() -> Self {
        Self {
            normalized: DEFAULT_NORMALIZED_MARKER.to_string(),
            language: DEFAULT_LANGUAGE_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileTables {
    /// Always applied before anything else
    pub expansion: Option<RuleTable>,
    /// Annotation forms to filler spellings
    pub hesitation: Option<RuleTable>,
    pub symbols: Option<RuleTable>,
    pub numerals: Option<RuleTable>,
    /// Always applied after numerals
    pub cleanup: Option<RuleTable>,
}

/// Hand-curated corrections, stamped with the date they were compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub date: String,
    #[serde(default)]
    pub rules: RuleTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub corpus: Corpus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alphabet: Alphabet,
    #[serde(default)]
    pub defaults: StandardizationConfig,
    #[serde(default)]
    pub stages: StageSwitches,
    #[serde(default)]
    pub tagged: TaggedMarkers,
    #[serde(default)]
    pub tables: ProfileTables,
    #[serde(default)]
    pub patch: Option<Patch>,
}

impl Profile {
    pub fn name(&self) -> &'static str {
        self.corpus.as_str()
    }

    /// Look up a table the configuration depends on.
    pub fn require_table(&self, table: &'static str) -> StandardizeResult<&RuleTable> {
        let found = match table {
            "expansion" => self.tables.expansion.as_ref(),
            "hesitation" => self.tables.hesitation.as_ref(),
            "symbols" => self.tables.symbols.as_ref(),
            "numerals" => self.tables.numerals.as_ref(),
            "cleanup" => self.tables.cleanup.as_ref(),
            "patch" => self.patch.as_ref().map(|patch| &patch.rules),
            _ => None,
        };
        found.ok_or_else(|| StandardizeError::MissingTable {
            corpus: self.name().to_string(),
            table,
        })
    }

    pub fn patch_date(&self) -> Option<&str> {
        self.patch.as_ref().map(|patch| patch.date.as_str())
    }
}
