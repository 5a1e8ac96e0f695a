//! End-to-end standardization through the built-in corpus profiles.

use asr_standardize::corpus::{self, Format, RunRecord};
use asr_standardize::normalizer::{
    out_of_alphabet, resolve_piped_token, Alphabet, Batch, Pipeline, StandardizeError,
};
use asr_standardize::profile::{
    builtin_profile, ConfigOverrides, Corpus, Profile, StandardizationConfig,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pipeline(corpus: Corpus, overrides: ConfigOverrides) -> (Profile, Pipeline) {
    let profile = builtin_profile(corpus).unwrap();
    let config = overrides.apply_to(&profile.defaults).unwrap();
    let pipeline = Pipeline::new(&profile, config).unwrap();
    (profile, pipeline)
}

#[test]
fn test_npsc_dual_forms() {
    let (_, standard) = pipeline(Corpus::Npsc, ConfigOverrides::default());
    let (_, pronounced) = pipeline(
        Corpus::Npsc,
        ConfigOverrides {
            standardize_ambiguous_words: Some(false),
            ..Default::default()
        },
    );

    assert_eq!(standard.normalize_sentence("vaer|være"), "være");
    assert_eq!(pronounced.normalize_sentence("vaer|være"), "vaer");
    assert_eq!(standard.normalize_sentence("nte|1"), "nte");
    assert_eq!(pronounced.normalize_sentence("nte|1"), "nte");
}

#[test]
fn test_discrepancy_marker_ignores_flag() {
    for token in ["x|1", "ikkje|1", "|1"] {
        let left = token.trim_end_matches("|1");
        assert_eq!(resolve_piped_token(token, true), left);
        assert_eq!(resolve_piped_token(token, false), left);
    }
}

#[test]
fn test_npsc_hesitations_stripped() {
    let (_, pipeline) = pipeline(
        Corpus::Npsc,
        ConfigOverrides {
            keep_annotations: Some(false),
            ..Default::default()
        },
    );

    assert_eq!(
        pipeline.normalize_sentence("<fp> jeg sier <sil> noe"),
        "jeg sier noe"
    );
}

#[test]
fn test_alphabet_report() {
    let alphabet = Alphabet::parse("a b c d e f g h i j k l m n o p r s t u v w x y z -");
    let report = out_of_alphabet(&["qqq er her"], &alphabet);

    assert_eq!(report.characters, vec!['q']);
    assert_eq!(report.words, strings(&["qqq"]));
    assert_eq!(report.sentences, strings(&["qqq er her"]));
    assert_eq!(report.indices, vec![0]);

    let again = out_of_alphabet(&report.sentences, &alphabet);
    assert_eq!(again.characters, report.characters);
    assert_eq!(again.words, report.words);
}

#[test]
fn test_blank_pairs_removed() {
    let (_, pipeline) = pipeline(
        Corpus::Npsc,
        ConfigOverrides {
            keep_empty: Some(false),
            apply_patch: Some(false),
            ..Default::default()
        },
    );
    let batch = Batch::paired(strings(&["", "jeg liker fisk"]), strings(&["r0", "r1"])).unwrap();

    let outcome = pipeline.run(batch).unwrap();
    assert_eq!(outcome.transcripts(), strings(&["jeg liker fisk"]).as_slice());
    assert_eq!(outcome.references(), Some(strings(&["r1"]).as_slice()));
}

#[test]
fn test_alignment_survives_filtering() {
    let (_, pipeline) = pipeline(
        Corpus::Npsc,
        ConfigOverrides {
            keep_empty: Some(false),
            keep_annotations: Some(false),
            ..Default::default()
        },
    );
    let transcripts = strings(&["<fp>", "a <fp>", "", "<sil> <fp>", "b", " "]);
    let references = strings(&["r0", "r1", "r2", "r3", "r4", "r5"]);
    let batch = Batch::paired(transcripts, references).unwrap();

    let outcome = pipeline.run(batch).unwrap();
    assert_eq!(outcome.transcripts(), strings(&["a", "b"]).as_slice());
    assert_eq!(outcome.references(), Some(strings(&["r1", "r4"]).as_slice()));
    assert_eq!(outcome.removed, 4);
}

#[test]
fn test_length_kept_for_every_profile() {
    let raw = strings(&["", "<fp>", "[e]", "Det er 2 ting.", "vaer|være", "_itj"]);

    for corpus in Corpus::ALL {
        let profile = builtin_profile(corpus).unwrap();
        let config = StandardizationConfig {
            keep_symbols: false,
            keep_numerals: false,
            keep_annotations: false,
            keep_empty: true,
            apply_patch: profile.patch.is_some(),
            ..profile.defaults.clone()
        };
        let pipeline = Pipeline::new(&profile, config).unwrap();

        let outcome = pipeline.run(Batch::new(raw.clone())).unwrap();
        assert_eq!(outcome.transcripts().len(), raw.len(), "{corpus}");
        assert_eq!(outcome.removed, 0);
    }
}

#[test]
fn test_unequal_inputs_rejected() {
    let err = Batch::paired(strings(&["a", "b"]), strings(&["r0"])).unwrap_err();

    assert!(matches!(
        err,
        StandardizeError::LengthMismatch {
            transcripts: 2,
            references: 1
        }
    ));
}

#[test]
fn test_nbtale_patch_is_configuration_error() {
    let profile = builtin_profile(Corpus::Nbtale).unwrap();
    let config = StandardizationConfig {
        apply_patch: true,
        ..profile.defaults.clone()
    };

    assert!(matches!(
        Pipeline::new(&profile, config),
        Err(StandardizeError::MissingTable { table: "patch", .. })
    ));
}

#[test]
fn test_true_substitution_token_rejected() {
    let profile = builtin_profile(Corpus::Npsc).unwrap();
    let overrides = ConfigOverrides {
        substitution_token: Some("True".to_string()),
        ..Default::default()
    };

    assert!(matches!(
        overrides.apply_to(&profile.defaults),
        Err(StandardizeError::InvalidConfig(_))
    ));
}

#[test]
fn test_nst_symbols_and_numerals() {
    let (_, pipeline) = pipeline(
        Corpus::Nst,
        ConfigOverrides {
            keep_symbols: Some(false),
            keep_numerals: Some(false),
            apply_patch: Some(false),
            ..Default::default()
        },
    );

    let normalized = pipeline.normalize_sentence("Hei, det er fint.");
    assert_eq!(normalized, "hei det er fint");
}

#[test]
fn test_standardize_and_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("npsc.tsv");
    std::fs::write(&input, "a.wav\t<fp> Hei|hei\nb.wav\t<sil>\nc.wav\tnte|1 nei\n").unwrap();

    let (profile, pipeline) = pipeline(
        Corpus::Npsc,
        ConfigOverrides {
            keep_empty: Some(false),
            keep_annotations: Some(false),
            ..Default::default()
        },
    );
    let batch = corpus::read_batch(&input, Format::Tsv).unwrap();
    let input_utterances = batch.len();
    let outcome = pipeline.run(batch).unwrap();

    let record = RunRecord {
        corpus: profile.corpus,
        config: pipeline.config().clone(),
        patch_date: profile.patch_date().map(String::from),
        date: RunRecord::today(),
        input_utterances,
        output_utterances: outcome.batch.len(),
        removed_utterances: outcome.removed,
        out_of_alphabet_sentences: outcome.report.sentences.len(),
    };
    let saved = corpus::save(
        &dir.path().join("out"),
        "npsc_test",
        Format::Tsv,
        &outcome.batch,
        &record,
    )
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(&saved.data).unwrap(),
        "a.wav\thei\nc.wav\tnte nei\n"
    );
    let sidecar = std::fs::read_to_string(&saved.sidecar).unwrap();
    assert!(sidecar.contains("\"removed_utterances\": 1"));
}
