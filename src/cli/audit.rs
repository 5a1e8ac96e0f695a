//! CLI handler for auditing a file against an alphabet.

use anyhow::Result;

use crate::cli::args::AuditCliArgs;
use crate::cli::standardize::input_format;
use crate::config::Config;
use crate::corpus;
use crate::normalizer::{out_of_alphabet, Alphabet, DiagnosticReport};
use crate::profile::load_profile;

pub fn handle_audit_command(args: AuditCliArgs) -> Result<()> {
    let app_config = Config::load()?;

    let alphabet = match (&args.alphabet, args.corpus) {
        (Some(spec), _) => Alphabet::parse(spec),
        (None, Some(corpus)) => {
            let override_dir = app_config.profiles_dir()?;
            load_profile(corpus, None, Some(&override_dir))?.alphabet
        }
        (None, None) => app_config
            .alphabet
            .as_deref()
            .map(Alphabet::parse)
            .unwrap_or_default(),
    };

    let format = input_format(&args.input, args.format, app_config.output.format);
    let batch = corpus::read_batch(&args.input, format)?;
    let report = out_of_alphabet(batch.transcripts(), &alphabet);

    print!("{}", format_report(&report, batch.len(), args.sentences));
    Ok(())
}

fn format_report(report: &DiagnosticReport, total: usize, with_sentences: bool) -> String {
    if report.is_clean() {
        return format!("All {} sentences are within the alphabet\n", total);
    }

    let characters: String = report.characters.iter().collect();
    let mut out = format!(
        "{} of {} sentences contain characters outside the alphabet\n",
        report.sentences.len(),
        total
    );
    out.push_str(&format!("Characters: {}\n", characters));
    out.push_str(&format!("Words: {}\n", report.words.join(" ")));

    if with_sentences {
        for (index, sentence) in report.indices.iter().zip(&report.sentences) {
            out.push_str(&format!("{}\t{}\n", index, sentence));
        }
    }
    out
}
