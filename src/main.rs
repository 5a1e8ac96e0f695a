use anyhow::Result;
use asr_standardize::cli::{
    handle_audit_command, handle_profiles_command, handle_standardize_command, Cli, CliCommand,
};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Standardize(args)) => handle_standardize_command(args),
        Some(CliCommand::Audit(args)) => handle_audit_command(args),
        Some(CliCommand::Profiles(args)) => handle_profiles_command(args),
        Some(CliCommand::Version) => {
            println!("asr-standardize {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
