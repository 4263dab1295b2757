//! Configuration for the `packshelf` binary.
//!
//! Settings come from, highest priority first:
//! 1. command-line flags
//! 2. `PACKSHELF_ROOT` / `PACKSHELF_TARGET` environment variables
//! 3. the config file (`--config`, else `./packshelf.toml` if present)
//! 4. built-in defaults
//!
//! Relative `root` and `target` paths in a config file are taken relative to
//! the directory holding that file. Flag and environment values are relative
//! to the working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "packshelf.toml";

/// Default install target, relative to the working directory.
pub const DEFAULT_TARGET: &str = ".packshelf/installed";

/// Raw config file contents. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub registry: RegistrySection,
    #[serde(default)]
    pub install: InstallSection,
    #[serde(default)]
    pub search: SearchSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistrySection {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InstallSection {
    pub target: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchSection {
    pub limit: Option<usize>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Registry root to scan.
    pub root: PathBuf,
    /// Directory packs are installed into.
    pub target: PathBuf,
    /// Default cap on search results.
    pub search_limit: Option<usize>,
}

impl FileConfig {
    /// Parse a config file, anchoring its relative paths at the file's
    /// directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.registry.root = config.registry.root.map(|p| base.join(p));
            config.install.target = config.install.target.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Load the explicit config file, or `./packshelf.toml` if it exists.
    ///
    /// A missing default file means an empty config; a missing explicit file
    /// is an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Layer environment variables and flags over this file config.
    ///
    /// `env` looks up an environment variable by name; it is a parameter so
    /// resolution can be tested without touching the process environment.
    pub fn resolve(
        self,
        root_flag: Option<PathBuf>,
        target_flag: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Settings {
        let root = root_flag
            .or_else(|| env("PACKSHELF_ROOT").map(PathBuf::from))
            .or(self.registry.root)
            .unwrap_or_else(|| PathBuf::from("."));

        let target = target_flag
            .or_else(|| env("PACKSHELF_TARGET").map(PathBuf::from))
            .or(self.install.target)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET));

        Settings {
            root,
            target,
            search_limit: self.search.limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_anything() {
        let settings = FileConfig::default().resolve(None, None, no_env);
        assert_eq!(settings.root, PathBuf::from("."));
        assert_eq!(settings.target, PathBuf::from(DEFAULT_TARGET));
        assert_eq!(settings.search_limit, None);
    }

    #[test]
    fn file_values_apply() {
        let file: FileConfig = toml::from_str(
            "[registry]\nroot = \"packs\"\n[install]\ntarget = \"out\"\n[search]\nlimit = 5\n",
        )
        .unwrap();
        let settings = file.resolve(None, None, no_env);
        assert_eq!(settings.root, PathBuf::from("packs"));
        assert_eq!(settings.target, PathBuf::from("out"));
        assert_eq!(settings.search_limit, Some(5));
    }

    #[test]
    fn env_beats_file_and_flag_beats_env() {
        let file: FileConfig = toml::from_str("[registry]\nroot = \"packs\"\n").unwrap();
        let env = |key: &str| (key == "PACKSHELF_ROOT").then(|| "from-env".to_string());

        let settings = file.resolve(None, None, env);
        assert_eq!(settings.root, PathBuf::from("from-env"));

        let file: FileConfig = toml::from_str("[registry]\nroot = \"packs\"\n").unwrap();
        let settings = file.resolve(Some(PathBuf::from("from-flag")), None, env);
        assert_eq!(settings.root, PathBuf::from("from-flag"));
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<FileConfig>("[bogus]\nx = 1\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(FileConfig::discover(Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("packshelf.toml");
        std::fs::write(&path, "[install]\ntarget = \"vendor/packs\"\n").unwrap();
        let file = FileConfig::discover(Some(&path)).unwrap();
        assert_eq!(file.install.target, Some(tmp.path().join("vendor/packs")));
    }

    #[test]
    fn file_paths_are_relative_to_the_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("conf");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("packshelf.toml");
        std::fs::write(
            &path,
            "[registry]\nroot = \"../packs\"\n[install]\ntarget = \"/abs/out\"\n",
        )
        .unwrap();

        let settings = FileConfig::load_from(&path).unwrap().resolve(None, None, no_env);
        assert_eq!(settings.root, dir.join("../packs"));
        assert_eq!(settings.target, PathBuf::from("/abs/out"));
    }

    #[test]
    fn target_flag_beats_env_and_file() {
        let file: FileConfig = toml::from_str("[install]\ntarget = \"out\"\n").unwrap();
        let env = |key: &str| (key == "PACKSHELF_TARGET").then(|| "from-env".to_string());
        let settings = file.resolve(None, Some(PathBuf::from("from-flag")), env);
        assert_eq!(settings.target, PathBuf::from("from-flag"));
    }
}
