//! CLI handler for standardizing a corpus file.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::args::StandardizeCliArgs;
use crate::config::Config;
use crate::corpus::{self, Format, RunRecord};
use crate::normalizer::{Alphabet, Pipeline};
use crate::profile::{load_profile, ConfigOverrides, Profile};

pub fn handle_standardize_command(args: StandardizeCliArgs) -> Result<()> {
    let app_config = Config::load()?;
    let profile = resolve_profile(&args, &app_config)?;

    let config = ConfigOverrides::from(args.overrides)
        .apply_to(&profile.defaults)
        .context("Invalid standardization options")?;
    info!("Standardizing {} with options: {:?}", profile.corpus, config);

    let pipeline = Pipeline::new(&profile, config.clone())?;
    info!("Alphabet: {}", pipeline.alphabet());

    let format = input_format(&args.input, args.format, app_config.output.format);
    let batch = corpus::read_batch(&args.input, format)?;
    let input_utterances = batch.len();

    let pb = (!args.no_progress).then(|| create_progress_bar(input_utterances as u64));
    let outcome = pipeline.run_with_progress(batch, || {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !outcome.report.is_clean() {
        warn!(
            "{} standardized sentences still contain characters outside the alphabet: {:?}",
            outcome.report.sentences.len(),
            outcome.report.characters
        );
    }

    match &args.save_name {
        Some(name) => {
            let dir = args
                .output_dir
                .clone()
                .unwrap_or_else(|| app_config.output.dir.clone());
            let record = RunRecord {
                corpus: pipeline.corpus(),
                config,
                patch_date: pipeline
                    .config()
                    .apply_patch
                    .then(|| profile.patch_date().map(String::from))
                    .flatten(),
                date: RunRecord::today(),
                input_utterances,
                output_utterances: outcome.batch.len(),
                removed_utterances: outcome.removed,
                out_of_alphabet_sentences: outcome.report.sentences.len(),
            };
            let saved = corpus::save(&dir, name, format, &outcome.batch, &record)?;
            eprintln!("Standardized transcripts saved to: {}", saved.data.display());
        }
        None => {
            let rendered = corpus::render(&outcome.batch, format)?;
            io::stdout()
                .lock()
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    info!(
        "{} utterances in, {} out ({} removed)",
        input_utterances,
        outcome.batch.len(),
        outcome.removed
    );
    Ok(())
}

fn resolve_profile(args: &StandardizeCliArgs, app_config: &Config) -> Result<Profile> {
    let override_dir = app_config.profiles_dir()?;
    let mut profile = load_profile(
        args.corpus,
        args.profile_file.as_deref(),
        Some(&override_dir),
    )?;

    if let Some(alphabet) = args.alphabet.as_deref().or(app_config.alphabet.as_deref()) {
        info!("Using alphabet override: {}", alphabet);
        profile.alphabet = Alphabet::parse(alphabet);
    }
    Ok(profile)
}

/// Explicit format, then the file extension, then the configured default.
pub(crate) fn input_format(path: &Path, explicit: Option<Format>, fallback: Format) -> Format {
    explicit
        .or_else(|| Format::from_path(path))
        .unwrap_or(fallback)
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("━╸━"));
    }
    pb.set_message("Standardizing...");
    pb
}
