use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{Corpus, Profile};
use crate::normalizer::{StandardizeError, StandardizeResult};

const NPSC: &str = include_str!("../../profiles/npsc.toml");
const RUNDKAST: &str = include_str!("../../profiles/rundkast.toml");
const NBTALE: &str = include_str!("../../profiles/nbtale.toml");
const NST: &str = include_str!("../../profiles/nst.toml");

/// TOML source of the profile shipped with the binary.
pub fn builtin_source(corpus: Corpus) -> &'static str {
    match corpus {
        Corpus::Npsc => NPSC,
        Corpus::Rundkast => RUNDKAST,
        Corpus::Nbtale => NBTALE,
        Corpus::Nst => NST,
    }
}

pub fn parse_profile(name: &str, content: &str) -> StandardizeResult<Profile> {
    toml::from_str(content).map_err(|source| StandardizeError::ProfileParse {
        name: name.to_string(),
        source,
    })
}

pub fn builtin_profile(corpus: Corpus) -> StandardizeResult<Profile> {
    parse_profile(corpus.as_str(), builtin_source(corpus))
}

/// File that overrides the built-in profile for `corpus`, if any.
///
/// An explicit file wins, then `<override_dir>/<corpus>.toml` if it exists.
pub fn override_path(
    corpus: Corpus,
    explicit: Option<&Path>,
    override_dir: Option<&Path>,
) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        override_dir
            .map(|dir| dir.join(format!("{}.toml", corpus)))
            .filter(|path| path.exists())
    })
}

/// Resolve the profile for `corpus`, falling back to the built-in one when
/// no override file is found.
pub fn load_profile(
    corpus: Corpus,
    explicit: Option<&Path>,
    override_dir: Option<&Path>,
) -> Result<Profile> {
    let Some(path) = override_path(corpus, explicit, override_dir) else {
        info!("Using built-in {} profile", corpus);
        return Ok(builtin_profile(corpus)?);
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read profile file {:?}", path))?;
    let profile = parse_profile(&path.display().to_string(), &content)?;

    if profile.corpus != corpus {
        warn!(
            "Profile {:?} declares corpus {} but was loaded for {}",
            path, profile.corpus, corpus
        );
    }

    info!("Loaded {} profile from {:?}", profile.corpus, path);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::AmbiguousSyntax;

    #[test]
    fn test_all_builtin_profiles_parse() {
        for corpus in Corpus::ALL {
            let profile = builtin_profile(corpus).unwrap();
            assert_eq!(profile.corpus, corpus);
            assert!(profile.tables.symbols.is_some(), "{corpus} has no symbols table");
            assert!(profile.tables.numerals.is_some(), "{corpus} has no numerals table");
        }
    }

    #[test]
    fn test_builtin_stage_switches() {
        let npsc = builtin_profile(Corpus::Npsc).unwrap();
        let rundkast = builtin_profile(Corpus::Rundkast).unwrap();
        let nbtale = builtin_profile(Corpus::Nbtale).unwrap();
        let nst = builtin_profile(Corpus::Nst).unwrap();

        assert_eq!(npsc.stages.ambiguous, AmbiguousSyntax::Pipe);
        assert_eq!(nbtale.stages.ambiguous, AmbiguousSyntax::Tagged);
        assert_eq!(rundkast.defaults.annotation_token, "[");
        assert!(!rundkast.stages.split_underscores);
        assert!(rundkast.stages.strip_underscore_affixes);
        assert!(!nst.stages.annotations);
        assert!(nbtale.patch.is_none());
        assert!(nbtale.tables.expansion.is_some());
    }

    #[test]
    fn test_override_dir_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let custom = "corpus = \"nst\"\ndescription = \"custom\"\n[tables]\nsymbols = []\nnumerals = []\n";
        std::fs::write(dir.path().join("nst.toml"), custom).unwrap();

        let profile = load_profile(Corpus::Nst, None, Some(dir.path())).unwrap();
        assert_eq!(profile.description, "custom");

        let fallback = load_profile(Corpus::Npsc, None, Some(dir.path())).unwrap();
        assert_eq!(fallback, builtin_profile(Corpus::Npsc).unwrap());
    }

    #[test]
    fn test_parse_error_names_profile() {
        let err = parse_profile("broken", "corpus = \"nope\"").unwrap_err();

        assert!(err.to_string().contains("broken"));
    }
}
