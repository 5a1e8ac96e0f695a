//! Reading and writing utterance batches.
//!
//! Two line formats are supported: TSV (`reference<TAB>transcript`, or bare
//! transcripts when no line has a tab) and JSON Lines
//! (`{"reference": ..., "transcript": ...}`).

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::normalizer::Batch;
use crate::profile::{Corpus, StandardizationConfig};

/// Attempts at finding a free `_n` suffix before giving up.
const MAX_SUFFIX: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Tsv,
    Jsonl,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Tsv => "tsv",
            Format::Jsonl => "jsonl",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "tsv" | "txt" => Some(Format::Tsv),
            "jsonl" | "ndjson" => Some(Format::Jsonl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub transcript: String,
}

pub fn parse_tsv(content: &str) -> Result<Batch> {
    let mut lines: Vec<&str> = content.lines().collect();
    let tabbed = lines.iter().filter(|line| line.contains('\t')).count();

    if tabbed == 0 {
        return Ok(Batch::new(lines.into_iter().map(String::from).collect()));
    }
    // Paired files may end with blank lines.
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    if tabbed != lines.len() {
        bail!(
            "{} of {} lines have no reference column; a file is either all paired or all transcripts",
            lines.len() - tabbed,
            lines.len()
        );
    }

    let (references, transcripts): (Vec<String>, Vec<String>) = lines
        .iter()
        .filter_map(|line| line.split_once('\t'))
        .map(|(reference, transcript)| (reference.to_string(), transcript.to_string()))
        .unzip();
    Ok(Batch::paired(transcripts, references)?)
}

pub fn parse_jsonl(content: &str) -> Result<Batch> {
    let mut utterances = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let utterance: Utterance = serde_json::from_str(line)
            .with_context(|| format!("Invalid utterance on line {}", number + 1))?;
        utterances.push(utterance);
    }

    let paired = utterances.iter().filter(|u| u.reference.is_some()).count();
    if paired == 0 {
        return Ok(Batch::new(
            utterances.into_iter().map(|u| u.transcript).collect(),
        ));
    }
    if paired != utterances.len() {
        bail!(
            "{} of {} utterances have no reference",
            utterances.len() - paired,
            utterances.len()
        );
    }

    let (references, transcripts): (Vec<String>, Vec<String>) = utterances
        .into_iter()
        .map(|u| (u.reference.unwrap_or_default(), u.transcript))
        .unzip();
    Ok(Batch::paired(transcripts, references)?)
}

pub fn read_batch(path: &Path, format: Format) -> Result<Batch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let batch = match format {
        Format::Tsv => parse_tsv(&content),
        Format::Jsonl => parse_jsonl(&content),
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    debug!(
        "Read {} utterances from {} ({})",
        batch.len(),
        path.display(),
        if batch.references().is_some() {
            "paired"
        } else {
            "transcripts only"
        }
    );
    Ok(batch)
}

/// Serialize a batch, one utterance per line.
pub fn render(batch: &Batch, format: Format) -> Result<String> {
    let references = batch.references();
    let mut out = String::new();

    for (index, transcript) in batch.transcripts().iter().enumerate() {
        let reference = references.and_then(|refs| refs.get(index));
        match format {
            Format::Tsv => match reference {
                Some(reference) => {
                    out.push_str(reference);
                    out.push('\t');
                    out.push_str(transcript);
                }
                None => out.push_str(transcript),
            },
            Format::Jsonl => {
                let utterance = Utterance {
                    reference: reference.cloned(),
                    transcript: transcript.clone(),
                };
                out.push_str(
                    &serde_json::to_string(&utterance).context("Failed to serialize utterance")?,
                );
            }
        }
        out.push('\n');
    }

    Ok(out)
}

/// What a saved batch was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub corpus: Corpus,
    pub config: StandardizationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_date: Option<String>,
    /// Creation date, `YYYY-MM-DD`
    pub date: String,
    pub input_utterances: usize,
    pub output_utterances: usize,
    pub removed_utterances: usize,
    pub out_of_alphabet_sentences: usize,
}

impl RunRecord {
    pub fn today() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub data: PathBuf,
    pub sidecar: PathBuf,
}

/// Pick `<name>_<stamp>` or, when taken in `dir`, the first free
/// `<name>_<stamp>_<n>`. The returned stem has no extension.
pub fn stamped_stem(dir: &Path, name: &str, stamp: &str, extension: &str) -> Result<String> {
    let base = format!("{}_{}", name, stamp);
    let taken = |stem: &str| {
        dir.join(format!("{}.{}", stem, extension)).exists()
            || dir.join(format!("{}.json", stem)).exists()
    };

    if !taken(&base) {
        return Ok(base);
    }
    for n in 1..MAX_SUFFIX {
        let candidate = format!("{}_{}", base, n);
        if !taken(&candidate) {
            info!("{} already exists, saving as {}", base, candidate);
            return Ok(candidate);
        }
        debug!("{} already exists", candidate);
    }
    bail!(
        "No free file name for {} in {} after {} attempts",
        base,
        dir.display(),
        MAX_SUFFIX
    )
}

/// Write `batch` and its JSON sidecar under `dir`, never overwriting.
pub fn save(
    dir: &Path,
    name: &str,
    format: Format,
    batch: &Batch,
    record: &RunRecord,
) -> Result<SavedFiles> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let stamp = Local::now().format("%Y%m%d").to_string();
    let stem = stamped_stem(dir, name, &stamp, format.extension())?;
    let data = dir.join(format!("{}.{}", stem, format.extension()));
    let sidecar = dir.join(format!("{}.json", stem));

    std::fs::write(&data, render(batch, format)?)
        .with_context(|| format!("Failed to write {}", data.display()))?;
    let record_json =
        serde_json::to_string_pretty(record).context("Failed to serialize run record")?;
    std::fs::write(&sidecar, record_json)
        .with_context(|| format!("Failed to write {}", sidecar.display()))?;

    info!("Saved {} utterances to {}", batch.len(), data.display());
    Ok(SavedFiles { data, sidecar })
}
