//! CLI handler for listing and printing corpus profiles.

use anyhow::{Context, Result};

use crate::cli::args::{ProfilesCliArgs, ProfilesCommand};
use crate::config::Config;
use crate::profile::{builtin_source, load_profile, override_path, Corpus};

pub fn handle_profiles_command(args: ProfilesCliArgs) -> Result<()> {
    let app_config = Config::load()?;
    let override_dir = app_config.profiles_dir()?;

    match args.command {
        ProfilesCommand::List => {
            for corpus in Corpus::ALL {
                let profile = load_profile(corpus, None, Some(&override_dir))?;
                let origin = if override_path(corpus, None, Some(&override_dir)).is_some() {
                    "override"
                } else {
                    "built-in"
                };
                println!("{:<10} {:<9} {}", corpus, origin, profile.description);
            }
        }
        ProfilesCommand::Show { corpus } => {
            match override_path(corpus, None, Some(&override_dir)) {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read profile file {:?}", path))?;
                    println!("# {}", path.display());
                    print!("{}", content);
                }
                None => print!("{}", builtin_source(corpus)),
            }
        }
    }

    Ok(())
}
