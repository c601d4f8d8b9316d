//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables prefixed `STRATA__` (`STRATA__PROJECT__LAYER=sdk`)
//! 3. Config file (`--config FILE`, else [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use strata_adapters::{DEFAULT_IGNORED, DEFAULT_TRACKER_FILE};
use strata_core::domain::Layer;

const ENV_PREFIX: &str = "STRATA";
const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project layout settings.
    pub project: ProjectConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Layer used by `strata layer` when `--layer` is omitted.
    pub layer: Layer,
    /// Ledger location relative to the project root.
    pub tracker_file: PathBuf,
    /// Directory names left out of the project snapshot.
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            layer: Layer::App,
            tracker_file: PathBuf::from(DEFAULT_TRACKER_FILE),
            ignore: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then `STRATA__*`
    /// environment variables.
    ///
    /// An explicit `config_file` must exist unless `allow_missing` is set
    /// (as for `strata init`, which is about to create it). The default
    /// location is always optional.
    pub fn load(config_file: Option<&PathBuf>, allow_missing: bool) -> anyhow::Result<Self> {
        match config_file {
            Some(path) => Self::load_from(path, !allow_missing),
            None => Self::load_from(&Self::config_path(), false),
        }
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("project.ignore")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.strata.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "strata", "strata")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".strata.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_layer_is_app() {
        assert_eq!(AppConfig::default().project.layer, Layer::App);
    }

    #[test]
    fn default_ignores_ledger_directory() {
        let cfg = AppConfig::default();
        assert!(cfg.project.ignore.iter().any(|d| d == ".strata"));
        assert_eq!(
            cfg.project.tracker_file,
            PathBuf::from(".strata/migrations.json")
        );
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(cfg.project, ProjectConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load(Some(&path), false).is_err());
        assert!(AppConfig::load(Some(&path), true).is_ok());
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[project]\nlayer = \"sdk\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path), false).unwrap();
        assert_eq!(cfg.project.layer, Layer::Sdk);
        assert_eq!(cfg.project.ignore, ProjectConfig::default().ignore);
        assert_eq!(cfg.output.format, "human");
    }

    #[test]
    fn unknown_layer_in_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[project]\nlayer = \"mobile\"\n").unwrap();
        assert!(AppConfig::load(Some(&path), false).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
