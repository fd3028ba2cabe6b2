//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::IdScheme;

/// How `neuron new` derives IDs when no `--id-title` is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdSchemeSetting {
    /// Random time-sortable IDs
    #[default]
    Hash,
    /// IDs derived from the note title
    Title,
}

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Default zettelkasten directory
    pub dir: Option<PathBuf>,

    /// Default ID scheme for new zettels
    #[serde(default)]
    pub id_scheme: IdSchemeSetting,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/neuron/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neuron")
            .join("config.toml")
    }

    /// Resolve the zettelkasten directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `dir` setting
    /// 3. Current working directory
    pub fn notes_dir(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve the ID scheme for a new zettel.
    ///
    /// An explicit `--id-title` always wins. With the `title` setting the
    /// note title doubles as the ID source.
    pub fn id_scheme(&self, id_title: Option<&str>, title: Option<&str>) -> IdScheme {
        match (id_title, self.id_scheme, title) {
            (Some(text), _, _) => IdScheme::Custom(text.to_string()),
            (None, IdSchemeSetting::Title, Some(text)) => IdScheme::Custom(text.to_string()),
            _ => IdScheme::Hash,
        }
    }
}
