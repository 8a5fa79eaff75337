//! Configuration loading and validation.
//!
//! Sources merge in precedence order: built-in defaults, then the user's
//! TOML config file, then `SHOEBOX_`-prefixed environment variables.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "SHOEBOX_";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the archive to open. Usually supplied per
    /// invocation on the command line instead.
    pub archive_root: Option<PathBuf>,
    /// Whether unresolved media references may fall back to their remote
    /// URL, or should render as missing.
    pub fallback_to_online_media: bool,
    /// Scheduler slice budget in milliseconds.
    pub slice_budget_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { archive_root: None, fallback_to_online_media: true, slice_budget_ms: 14 }
    }
}

impl Config {
    /// Load from the default locations: the platform config directory plus
    /// the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_file().as_deref())
    }

    /// Load with an explicit config file path (absent file is fine; the
    /// defaults and environment still apply).
    pub fn load_from(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_file {
            debug!(path = %path.display(), "merging config file");
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.slice_budget_ms == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "slice_budget_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(root) = &self.archive_root
            && !root.is_dir()
        {
            exn::bail!(ErrorKind::BadArchiveRoot(root.clone()));
        }
        Ok(())
    }

    /// The archive root, validated against an optional command-line
    /// override which always wins.
    pub fn resolve_archive_root(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        let root = cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.archive_root.clone())
            .ok_or_raise(|| ErrorKind::Invalid {
                field: "archive_root",
                reason: "no archive directory configured or given".to_string(),
            })?;
        if !root.is_dir() {
            exn::bail!(ErrorKind::BadArchiveRoot(root));
        }
        Ok(root)
    }
}

/// Platform-appropriate config file location
/// (`~/.config/shoebox/config.toml` on Linux).
pub fn default_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "shoebox")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(None).expect("defaults should load");
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "slice_budget_ms = 25")?;
            let config = Config::load_from(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(config.slice_budget_ms, 25);
            assert!(config.fallback_to_online_media);
            Ok(())
        });
    }

    #[test]
    fn environment_beats_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "slice_budget_ms = 25")?;
            jail.set_env("SHOEBOX_SLICE_BUDGET_MS", "7");
            jail.set_env("SHOEBOX_FALLBACK_TO_ONLINE_MEDIA", "false");
            let config = Config::load_from(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(config.slice_budget_ms, 7);
            assert!(!config.fallback_to_online_media);
            Ok(())
        });
    }

    #[test]
    fn zero_slice_budget_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("SHOEBOX_SLICE_BUDGET_MS", "0");
            let err = Config::load_from(None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid { field: "slice_budget_ms", .. }));
            Ok(())
        });
    }

    #[test]
    fn archive_root_resolution() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        assert!(config.resolve_archive_root(None).is_err());
        let resolved = config.resolve_archive_root(Some(temp_dir.path())).unwrap();
        assert_eq!(resolved, temp_dir.path());
        assert!(config.resolve_archive_root(Some(Path::new("/definitely/missing"))).is_err());
    }
}
