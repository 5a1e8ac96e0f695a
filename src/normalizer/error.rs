use thiserror::Error;

pub type StandardizeResult<T> = Result<T, StandardizeError>;

/// Failures raised by the standardization core.
///
/// Length variants are contract violations: the caller handed over (or the
/// stages produced) sequences that no longer line up position by position.
#[derive(Debug, Error)]
pub enum StandardizeError {
    #[error("transcript and reference sequences differ in length ({transcripts} vs {references})")]
    LengthMismatch {
        transcripts: usize,
        references: usize,
    },

    #[error(
        "standardization changed the number of utterances from {input} to {output} while keeping empty utterances"
    )]
    LengthInvariant { input: usize, output: usize },

    #[error("profile `{corpus}` has no `{table}` table but the configuration requires it")]
    MissingTable { corpus: String, table: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to parse profile `{name}`: {source}")]
    ProfileParse {
        name: String,
        #[source]
        source: toml::de::Error,
    },
}

impl StandardizeError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
