use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::corpus::Format;
use crate::profile::{ConfigOverrides, Corpus};

#[derive(Parser, Debug)]
#[command(name = "asr-standardize")]
#[command(about = "Standardize Norwegian ASR transcripts", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Standardize the transcripts of a corpus file
    Standardize(StandardizeCliArgs),
    /// Report characters and words outside the alphabet
    Audit(AuditCliArgs),
    /// List or inspect corpus profiles
    Profiles(ProfilesCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct StandardizeCliArgs {
    /// Corpus the transcripts come from
    #[arg(short, long, value_enum)]
    pub corpus: Corpus,
    /// Utterance file to standardize
    #[arg(short, long)]
    pub input: PathBuf,
    /// Input and output format (guessed from the file extension by default)
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,
    /// Save under this name instead of printing to stdout
    #[arg(short, long)]
    pub save_name: Option<String>,
    /// Directory for saved files (default from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Profile file replacing the built-in one
    #[arg(long)]
    pub profile_file: Option<PathBuf>,
    /// Space separated characters replacing the profile alphabet
    #[arg(long)]
    pub alphabet: Option<String>,
    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Options overriding the corpus profile defaults.
#[derive(ClapArgs, Debug, Default)]
pub struct OverrideArgs {
    #[arg(long, value_name = "BOOL")]
    pub keep_symbols: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub keep_numerals: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub keep_annotations: Option<bool>,
    /// Substring marking annotation tokens
    #[arg(long, value_name = "TOKEN")]
    pub annotation_token: Option<String>,
    /// Replace every annotation with this token ("false" disables)
    #[arg(long, value_name = "TOKEN", allow_hyphen_values = true)]
    pub substitution_token: Option<String>,
    #[arg(long, value_name = "BOOL")]
    pub keep_empty: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub standardize_ambiguous_words: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub apply_patch: Option<bool>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            keep_symbols: args.keep_symbols,
            keep_numerals: args.keep_numerals,
            keep_annotations: args.keep_annotations,
            annotation_token: args.annotation_token,
            substitution_token: args.substitution_token,
            keep_empty: args.keep_empty,
            standardize_ambiguous_words: args.standardize_ambiguous_words,
            apply_patch: args.apply_patch,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct AuditCliArgs {
    /// Utterance file to check
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,
    /// Use this corpus' alphabet
    #[arg(short, long, value_enum, conflicts_with = "alphabet")]
    pub corpus: Option<Corpus>,
    /// Space separated characters to check against
    #[arg(long)]
    pub alphabet: Option<String>,
    /// Also print the offending sentences
    #[arg(long)]
    pub sentences: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ProfilesCliArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfilesCommand {
    /// List the available corpus profiles
    List,
    /// Print the profile used for a corpus
    Show {
        #[arg(value_enum)]
        corpus: Corpus,
    },
}
