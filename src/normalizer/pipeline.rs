//! The standardization pipeline.
//!
//! Stage order is fixed; a profile only decides which stages are present:
//!
//! 1. expansion table
//! 2. dual-form tokens
//! 3. underscores to spaces
//! 4. lower case
//! 5. annotations
//! 6. patch table
//! 7. symbols table
//! 8. numerals table (then the profile's cleanup table)
//! 9. whitespace collapse
//!
//! followed by blank-utterance filtering or the length check.

use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::normalizer::{
    out_of_alphabet, retain_non_blank, Alphabet, AmbiguousSyntax, AnnotationPolicy,
    AnnotationResolver, Batch, BlankVocabulary, DiagnosticReport, PipeResolver, SentenceStage,
    StandardizeResult, TableStage, TaggedResolver,
};
use crate::profile::{Corpus, Profile, StandardizationConfig};

struct SplitUnderscores;

impl SentenceStage for SplitUnderscores {
    fn apply(&self, sentence: &str) -> String {
        sentence.replace('_', " ")
    }

    fn name(&self) -> &'static str {
        "underscores"
    }
}

struct Lowercase;

impl SentenceStage for Lowercase {
    fn apply(&self, sentence: &str) -> String {
        sentence.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// Removes underscores glued to the start or end of a word (`_itj` -> `itj`).
struct UnderscoreAffixes {
    leading: Regex,
    trailing: Regex,
}

impl UnderscoreAffixes {
    fn new() -> StandardizeResult<Self> {
        Ok(Self {
            leading: Regex::new(r"_(\w)")?,
            trailing: Regex::new(r"(\w)_")?,
        })
    }
}

impl SentenceStage for UnderscoreAffixes {
    fn apply(&self, sentence: &str) -> String {
        if !sentence.contains('_') {
            return sentence.to_string();
        }
        let trimmed = self.trailing.replace_all(sentence, "$1");
        self.leading.replace_all(&trimmed, "$1").into_owned()
    }

    fn name(&self) -> &'static str {
        "underscore-affixes"
    }
}

struct CollapseWhitespace;

impl SentenceStage for CollapseWhitespace {
    fn apply(&self, sentence: &str) -> String {
        sentence.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct StandardizeOutcome {
    pub batch: Batch,
    /// Out-of-alphabet findings in the standardized transcripts
    pub report: DiagnosticReport,
    /// Utterances dropped as blank
    pub removed: usize,
}

impl StandardizeOutcome {
    pub fn transcripts(&self) -> &[String] {
        self.batch.transcripts()
    }

    pub fn references(&self) -> Option<&[String]> {
        self.batch.references()
    }
}

pub struct Pipeline {
    corpus: Corpus,
    config: StandardizationConfig,
    alphabet: Alphabet,
    stages: Vec<Arc<dyn SentenceStage>>,
    annotations: Option<Arc<AnnotationResolver>>,
}

impl Pipeline {
    /// Assemble the stages `config` asks for from `profile`'s tables.
    ///
    /// Fails when the configuration needs a table the profile does not define.
    pub fn new(profile: &Profile, config: StandardizationConfig) -> StandardizeResult<Self> {
        let mut stages: Vec<Arc<dyn SentenceStage>> = Vec::new();

        if let Some(expansion) = &profile.tables.expansion {
            stages.push(Arc::new(TableStage::new("expansion", expansion.clone())));
        }

        match profile.stages.ambiguous {
            AmbiguousSyntax::Pipe => {
                stages.push(Arc::new(PipeResolver::new(config.standardize_ambiguous_words)))
            }
            AmbiguousSyntax::Tagged => stages.push(Arc::new(TaggedResolver::new(
                profile.tagged.normalized.clone(),
                profile.tagged.language.clone(),
                config.standardize_ambiguous_words,
            ))),
            AmbiguousSyntax::None => {}
        }

        if profile.stages.split_underscores {
            stages.push(Arc::new(SplitUnderscores));
        }

        stages.push(Arc::new(Lowercase));

        let annotations = if profile.stages.annotations {
            config.validate_annotations()?;
            let policy = config.annotation_policy();
            let hesitations = match profile.require_table("hesitation") {
                Ok(table) => table.clone(),
                Err(_) if policy != AnnotationPolicy::Strip => Default::default(),
                Err(err) => return Err(err),
            };
            let resolver = Arc::new(AnnotationResolver::new(
                config.annotation_token.to_lowercase(),
                policy,
                hesitations,
            ));
            stages.push(resolver.clone());
            Some(resolver)
        } else {
            None
        };

        if config.apply_patch {
            let patch = profile.require_table("patch")?;
            info!(
                "Applying patch dated {}",
                profile.patch_date().unwrap_or("unknown")
            );
            stages.push(Arc::new(TableStage::new("patch", patch.clone())));
        } else {
            info!("NOT applying patch");
        }

        if !config.keep_symbols {
            let symbols = profile.require_table("symbols")?;
            stages.push(Arc::new(TableStage::new("symbols", symbols.clone())));
            if profile.stages.strip_underscore_affixes {
                stages.push(Arc::new(UnderscoreAffixes::new()?));
            }
        }

        if !config.keep_numerals {
            let numerals = profile.require_table("numerals")?;
            stages.push(Arc::new(TableStage::new("numerals", numerals.clone())));
        }

        if let Some(cleanup) = &profile.tables.cleanup {
            stages.push(Arc::new(TableStage::new("cleanup", cleanup.clone())));
        }

        stages.push(Arc::new(CollapseWhitespace));

        debug!(
            "Pipeline for {}: {}",
            profile.corpus,
            stages.iter().map(|s| s.name()).collect::<Vec<_>>().join(" -> ")
        );

        Ok(Self {
            corpus: profile.corpus,
            config,
            alphabet: profile.alphabet.clone(),
            stages,
            annotations,
        })
    }

    pub fn corpus(&self) -> Corpus {
        self.corpus
    }

    pub fn config(&self) -> &StandardizationConfig {
        &self.config
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run stages 1-9 on one sentence.
    pub fn normalize_sentence(&self, sentence: &str) -> String {
        self.stages
            .iter()
            .fold(sentence.to_string(), |text, stage| stage.apply(&text))
    }

    /// Standardize a whole batch and audit the result.
    ///
    /// Without blank filtering the output has exactly as many utterances as
    /// the input.
    pub fn run(&self, batch: Batch) -> StandardizeResult<StandardizeOutcome> {
        self.run_with_progress(batch, || {})
    }

    /// Like [`Pipeline::run`], calling `tick` after each normalized sentence.
    pub fn run_with_progress(
        &self,
        batch: Batch,
        mut tick: impl FnMut(),
    ) -> StandardizeResult<StandardizeOutcome> {
        self.log_input_summary(batch.transcripts());

        let normalized: Vec<String> = batch
            .transcripts()
            .iter()
            .map(|sentence| {
                let standardized = self.normalize_sentence(sentence);
                tick();
                standardized
            })
            .collect();

        let vocabulary = (!self.config.keep_empty)
            .then(|| self.blank_vocabulary(batch.transcripts(), &normalized));

        let batch = batch.with_transcripts(normalized)?;

        let (batch, removed) = match vocabulary {
            Some(vocabulary) => retain_non_blank(batch, &vocabulary),
            None => (batch, 0),
        };

        let report = out_of_alphabet(batch.transcripts(), &self.alphabet);
        if !report.is_clean() {
            warn!(
                "Tokens containing characters out of alphabet at this point: {:?}",
                report.words
            );
            warn!(
                "Number of sentences with tokens out of alphabet: {}",
                report.sentences.len()
            );
        }

        Ok(StandardizeOutcome {
            batch,
            report,
            removed,
        })
    }

    /// Annotation tokens found in this batch, spelled the way the pipeline
    /// leaves them, plus annotation tokens still present after it.
    fn blank_vocabulary(&self, raw: &[String], normalized: &[String]) -> BlankVocabulary {
        let mut vocabulary = BlankVocabulary::new();
        let Some(annotations) = &self.annotations else {
            return vocabulary;
        };
        let marker = annotations.marker();

        vocabulary.discover(raw, marker, &self.alphabet, |word| {
            self.normalize_sentence(word)
        });
        vocabulary.discover(normalized, marker, &self.alphabet, str::to_string);
        vocabulary
    }

    fn log_input_summary(&self, transcripts: &[String]) {
        let ambiguous = transcripts
            .iter()
            .filter(|s| s.contains('|') || s.contains(';'))
            .count();
        let underscored = transcripts.iter().filter(|s| s.contains('_')).count();
        let annotated = self
            .annotations
            .as_ref()
            .map(|a| {
                transcripts
                    .iter()
                    .filter(|s| s.to_lowercase().contains(a.marker()))
                    .count()
            })
            .unwrap_or(0);

        info!(
            "Standardizing {} {} utterances",
            transcripts.len(),
            self.corpus
        );
        debug!("Sentences with dual-form tokens: {}", ambiguous);
        debug!("Sentences with underscored words: {}", underscored);
        debug!("Sentences with annotations: {}", annotated);
        if let Some(annotations) = &self.annotations {
            debug!("Annotation policy: {:?}", annotations.policy());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{RuleTable, StandardizeError, SubstitutionToken};
    use crate::profile::{builtin_profile, ProfileTables, StageSwitches, TaggedMarkers};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn test_profile() -> Profile {
        Profile {
            corpus: Corpus::Npsc,
            description: String::new(),
            alphabet: Alphabet::default(),
            defaults: StandardizationConfig::default(),
            stages: StageSwitches {
                ambiguous: AmbiguousSyntax::Pipe,
                ..Default::default()
            },
            tagged: TaggedMarkers::default(),
            tables: ProfileTables {
                hesitation: Some([("<fp>", ""), ("<sil>", ""), ("<mm>", " mmm ")].into_iter().collect()),
                symbols: Some([(",", " "), (".", " ")].into_iter().collect()),
                numerals: Some([("2", "to")].into_iter().collect()),
                ..Default::default()
            },
            patch: None,
        }
    }

    fn config() -> StandardizationConfig {
        StandardizationConfig {
            apply_patch: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_order() {
        let pipeline = Pipeline::new(
            &test_profile(),
            StandardizationConfig {
                keep_symbols: false,
                keep_numerals: false,
                ..config()
            },
        )
        .unwrap();

        assert_eq!(
            pipeline.stage_names(),
            vec!["ambiguous-pipe", "underscores", "lowercase", "annotations", "symbols", "numerals", "whitespace"]
        );
    }

    #[test]
    fn test_underscores_split_after_dual_forms() {
        let pipeline = Pipeline::new(&test_profile(), config()).unwrap();

        assert_eq!(
            pipeline.normalize_sentence("Det er iforhold|i_forhold_til  Bra"),
            "det er i forhold til bra"
        );
    }

    #[test]
    fn test_hesitations_removed() {
        let pipeline = Pipeline::new(
            &test_profile(),
            StandardizationConfig {
                keep_annotations: false,
                ..config()
            },
        )
        .unwrap();

        assert_eq!(pipeline.normalize_sentence("<fp> jeg sier <sil> noe"), "jeg sier noe");
        assert_eq!(pipeline.normalize_sentence("<MM> ja"), "mmm ja");
    }

    #[test]
    fn test_missing_patch_is_config_error() {
        let result = Pipeline::new(&test_profile(), StandardizationConfig::default());

        assert!(matches!(
            result,
            Err(StandardizeError::MissingTable { table: "patch", .. })
        ));
    }

    #[test]
    fn test_missing_hesitation_only_matters_when_stripping() {
        let mut profile = test_profile();
        profile.tables.hesitation = None;

        assert!(Pipeline::new(&profile, config()).is_ok());
        let stripping = StandardizationConfig {
            keep_annotations: false,
            ..config()
        };
        assert!(matches!(
            Pipeline::new(&profile, stripping),
            Err(StandardizeError::MissingTable { table: "hesitation", .. })
        ));
    }

    #[test]
    fn test_keep_empty_preserves_length() {
        let pipeline = Pipeline::new(&test_profile(), config()).unwrap();
        let batch = Batch::paired(strings(&["", "<fp>", "hei"]), strings(&["a", "b", "c"])).unwrap();

        let outcome = pipeline.run(batch).unwrap();
        assert_eq!(outcome.transcripts().len(), 3);
        assert_eq!(outcome.references().map(<[String]>::len), Some(3));
        assert_eq!(outcome.removed, 0);
    }

    #[test]
    fn test_filter_drops_blank_pairs() {
        let pipeline = Pipeline::new(
            &test_profile(),
            StandardizationConfig {
                keep_empty: false,
                ..config()
            },
        )
        .unwrap();
        let batch = Batch::paired(strings(&["", "jeg liker fisk"]), strings(&["r0", "r1"])).unwrap();

        let outcome = pipeline.run(batch).unwrap();
        assert_eq!(outcome.transcripts(), strings(&["jeg liker fisk"]).as_slice());
        assert_eq!(outcome.references(), Some(strings(&["r1"]).as_slice()));
        assert_eq!(outcome.removed, 1);
    }

    #[test]
    fn test_filter_uses_policy_spelling() {
        let pipeline = Pipeline::new(
            &test_profile(),
            StandardizationConfig {
                keep_empty: false,
                keep_annotations: false,
                ..config()
            },
        )
        .unwrap();
        let batch = Batch::paired(
            strings(&["<mm>", "<mm> <fp>", "<mm> ja", "mmm"]),
            strings(&["a", "b", "c", "d"]),
        )
        .unwrap();

        let outcome = pipeline.run(batch).unwrap();
        assert_eq!(outcome.transcripts(), strings(&["mmm ja"]).as_slice());
        assert_eq!(outcome.references(), Some(strings(&["c"]).as_slice()));
    }

    #[test]
    fn test_filter_with_substitution_token() {
        let pipeline = Pipeline::new(
            &test_profile(),
            StandardizationConfig {
                keep_empty: false,
                substitution_token: SubstitutionToken::Token("<unk>".to_string()),
                ..config()
            },
        )
        .unwrap();
        let batch = Batch::new(strings(&["<fp> <sil>", "<fp> hei"]));

        let outcome = pipeline.run(batch).unwrap();
        assert_eq!(outcome.transcripts(), strings(&["<unk> hei"]).as_slice());
        assert!(outcome.references().is_none());
        assert_eq!(outcome.report.words, strings(&["<unk>"]));
    }

    #[test]
    fn test_progress_ticks_once_per_sentence() {
        let pipeline = Pipeline::new(&test_profile(), config()).unwrap();
        let mut ticks = 0;

        pipeline
            .run_with_progress(Batch::new(strings(&["a", "b", "c"])), || ticks += 1)
            .unwrap();
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_report_covers_output() {
        let pipeline = Pipeline::new(&test_profile(), config()).unwrap();
        let outcome = pipeline.run(Batch::new(strings(&["tv2 i dag", "helt fint"]))).unwrap();

        assert_eq!(outcome.report.indices, vec![0]);
        assert_eq!(outcome.report.words, strings(&["tv2"]));
    }

    #[test]
    fn test_builtin_nbtale_expansion_and_tags() {
        let profile = builtin_profile(Corpus::Nbtale).unwrap();
        let pipeline = Pipeline::new(
            &profile,
            StandardizationConfig {
                keep_annotations: false,
                ..profile.defaults.clone()
            },
        )
        .unwrap();

        assert_eq!(
            pipeline.normalize_sentence("<fp> vi hakke;normalized=har ikke tid"),
            "vi har ikke tid"
        );
    }

    #[test]
    fn test_rundkast_affixes_and_truncations() {
        let profile = builtin_profile(Corpus::Rundkast).unwrap();
        let pipeline = Pipeline::new(
            &profile,
            StandardizationConfig {
                keep_symbols: false,
                apply_patch: false,
                ..profile.defaults.clone()
            },
        )
        .unwrap();

        assert_eq!(pipeline.normalize_sentence("Det er _itj d() bra, [e] nei"), "det er itj d bra [e] nei");
    }

    #[test]
    fn test_table_rules_are_not_regex() {
        let mut profile = test_profile();
        profile.tables.symbols = Some(RuleTable::new().with_rule(".", ""));
        let pipeline = Pipeline::new(
            &profile,
            StandardizationConfig {
                keep_symbols: false,
                ..config()
            },
        )
        .unwrap();

        assert_eq!(pipeline.normalize_sentence("a.b cd"), "ab cd");
    }
}
