//! Settings persistence
//!
//! Settings come from `~/.config/textman/config.yaml` (or a file given with
//! `--config`), then `TEXTMAN_*` environment variables, then CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_MAX_HISTORY;
use crate::io::DEFAULT_ENCODING;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported config format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(ext)),
        }
    }
}

/// Engine and front-end settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Undo/redo depth; values below 1 are treated as 1
    pub max_history: usize,
    /// Directories scanned for script plugin packages
    pub plugin_search_paths: Vec<PathBuf>,
    pub disabled_plugins: Vec<String>,
    /// When non-empty, every plugin not listed here is disabled
    pub enabled_plugins: Vec<String>,
    pub encoding: String,
    /// File loaded at startup
    pub file: Option<PathBuf>,
    /// Where `--execute` writes its result
    pub output: Option<PathBuf>,
    /// Single command to run instead of the interactive session
    pub execute: Option<String>,
    pub load_builtin_plugins: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            plugin_search_paths: Vec::new(),
            disabled_plugins: Vec::new(),
            enabled_plugins: Vec::new(),
            encoding: DEFAULT_ENCODING.to_string(),
            file: None,
            output: None,
            execute: None,
            load_builtin_plugins: true,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Settings {
    /// `<config dir>/config.yaml`
    pub fn default_file() -> Option<PathBuf> {
        crate::config_paths::config_file()
    }

    /// Load settings from a `.yaml`, `.yml` or `.json` file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let format = Format::of(path)?;
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |reason: String| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let settings: Self = match format {
            // An empty YAML document means "all defaults"
            Format::Yaml if content.trim().is_empty() => Self::default(),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
            Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        };

        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load the default settings file, falling back to defaults when it is
    /// absent or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::default_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        Self::load_from_file(&path).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Self::default()
        })
    }

    /// Write settings, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let format = Format::of(path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = match format {
            Format::Yaml => {
                serde_yaml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Overlay `TEXTMAN_*` variables read through `lookup`.
    ///
    /// List variables are comma separated. Invalid numbers are logged and
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup("TEXTMAN_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(output) = lookup("TEXTMAN_OUTPUT") {
            self.output = Some(PathBuf::from(output));
        }
        if let Some(encoding) = lookup("TEXTMAN_ENCODING") {
            self.encoding = encoding;
        }
        if let Some(dirs) = lookup("TEXTMAN_PLUGIN_DIR") {
            self.plugin_search_paths
                .extend(std::env::split_paths(&dirs).filter(|p| !p.as_os_str().is_empty()));
        }
        if let Some(names) = lookup("TEXTMAN_DISABLE_PLUGINS") {
            self.disabled_plugins = split_list(&names);
        }
        if let Some(names) = lookup("TEXTMAN_ENABLE_PLUGINS") {
            self.enabled_plugins = split_list(&names);
        }
        if let Some(value) = lookup("TEXTMAN_MAX_HISTORY") {
            match value.trim().parse::<usize>() {
                Ok(n) => self.max_history = n,
                Err(_) => tracing::warn!("Ignoring invalid TEXTMAN_MAX_HISTORY: {}", value),
            }
        }
    }
}
