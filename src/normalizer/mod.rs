mod alphabet;
mod ambiguous;
mod annotations;
mod batch;
mod empty_filter;
mod error;
mod pipeline;
mod rule_table;
mod stage;

pub use alphabet::{out_of_alphabet, Alphabet, DiagnosticReport, NORWEGIAN_ALPHABET};
pub use ambiguous::{
    resolve_piped_token, AmbiguousSyntax, PipeResolver, TaggedResolver, DEFAULT_LANGUAGE_MARKER,
    DEFAULT_NORMALIZED_MARKER, DISCREPANCY_MARKER,
};
pub use annotations::{AnnotationPolicy, AnnotationResolver, SubstitutionToken};
pub use batch::Batch;
pub use empty_filter::{remove_empty_utterances, retain_non_blank, BlankVocabulary};
pub use error::{StandardizeError, StandardizeResult};
pub use pipeline::{Pipeline, StandardizeOutcome};
pub use rule_table::{RuleTable, TableStage};
pub use stage::SentenceStage;
