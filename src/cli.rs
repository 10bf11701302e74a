//! Command-line argument parsing for the textman binary
//!
//! Supports:
//! - Loading a file and saving results elsewhere
//! - Running a single command non-interactively
//! - Listing plugins (optionally as JSON)
//! - Overriding settings from the config file and environment

use clap::Parser;
use std::path::PathBuf;

use crate::config::Settings;

/// A text manipulation tool with undo/redo and plugins
#[derive(Parser, Debug, Default)]
#[command(
    name = "textman",
    version,
    about = "A text manipulation tool with undo/redo and plugins"
)]
pub struct CliArgs {
    /// File to load at startup
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Where to write the result of --execute (defaults to stdout)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Encoding used to read and write files
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Settings file (.yaml, .yml or .json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Console log level when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Additional plugin search directory (repeatable)
    #[arg(long = "plugin-dir", value_name = "DIR")]
    pub plugin_dirs: Vec<PathBuf>,

    /// Comma-separated plugins to disable
    #[arg(long, value_name = "NAMES", value_delimiter = ',', conflicts_with = "enable_plugins")]
    pub disable_plugins: Vec<String>,

    /// Comma-separated plugins to keep enabled; all others are disabled
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub enable_plugins: Vec<String>,

    /// Maximum undo/redo depth
    #[arg(long, value_name = "N")]
    pub max_history: Option<usize>,

    /// List available plugins and exit
    #[arg(long)]
    pub list_plugins: bool,

    /// Print machine-readable JSON (with --list-plugins or stats)
    #[arg(long)]
    pub json: bool,

    /// Run one command and exit, e.g. -e "replace foo bar"
    #[arg(short = 'e', long, value_name = "COMMAND")]
    pub execute: Option<String>,
}

/// What the binary does after building the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    /// Print the plugin list and exit
    ListPlugins,
    /// Run one command and exit
    Execute(String),
    /// Line-oriented interactive session
    Interactive,
}

/// Configuration derived from CLI arguments layered over settings
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: StartupMode,
    pub settings: Settings,
    pub json: bool,
    pub log_level: String,
}

impl CliArgs {
    /// Console filter directive for `--log-level`, available before settings load
    pub fn log_directive(&self) -> Result<&'static str, String> {
        crate::tracing::level_directive(&self.log_level)
            .ok_or_else(|| format!("Unknown log level: {}", self.log_level))
    }

    /// Overlay explicit flags onto `settings`
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(file) = &self.file {
            settings.file = Some(file.clone());
        }
        if let Some(output) = &self.output {
            settings.output = Some(output.clone());
        }
        if let Some(encoding) = &self.encoding {
            settings.encoding = encoding.clone();
        }
        settings
            .plugin_search_paths
            .extend(self.plugin_dirs.iter().cloned());
        if !self.disable_plugins.is_empty() {
            settings.disabled_plugins = self.disable_plugins.clone();
            settings.enabled_plugins.clear();
        }
        if !self.enable_plugins.is_empty() {
            settings.enabled_plugins = self.enable_plugins.clone();
            settings.disabled_plugins.clear();
        }
        if let Some(max_history) = self.max_history {
            settings.max_history = max_history;
        }
        if let Some(command) = &self.execute {
            settings.execute = Some(command.clone());
        }
    }

    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self, mut settings: Settings) -> Result<StartupConfig, String> {
        if self.max_history == Some(0) {
            return Err("--max-history must be at least 1".to_string());
        }
        self.log_directive()?;

        self.apply_to(&mut settings);

        let mode = if self.list_plugins {
            StartupMode::ListPlugins
        } else if let Some(command) = settings.execute.clone() {
            if command.trim().is_empty() {
                return Err("--execute needs a command".to_string());
            }
            StartupMode::Execute(command)
        } else {
            StartupMode::Interactive
        };

        Ok(StartupConfig {
            mode,
            settings,
            json: self.json,
            log_level: self.log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            log_level: "warn".to_string(),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_empty_args_gives_interactive_mode() {
        let config = args().into_config(Settings::default()).unwrap();
        assert_eq!(config.mode, StartupMode::Interactive);
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_list_plugins_wins_over_execute() {
        let cli = CliArgs {
            list_plugins: true,
            execute: Some("uppercase".to_string()),
            ..args()
        };
        let config = cli.into_config(Settings::default()).unwrap();
        assert_eq!(config.mode, StartupMode::ListPlugins);
    }

    #[test]
    fn test_execute_from_flag_or_settings() {
        let cli = CliArgs {
            execute: Some("sort".to_string()),
            ..args()
        };
        let config = cli.into_config(Settings::default()).unwrap();
        assert_eq!(config.mode, StartupMode::Execute("sort".to_string()));

        let settings = Settings {
            execute: Some("trim".to_string()),
            ..Settings::default()
        };
        let config = args().into_config(settings).unwrap();
        assert_eq!(config.mode, StartupMode::Execute("trim".to_string()));
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            encoding: "latin1".to_string(),
            disabled_plugins: vec!["format".to_string()],
            plugin_search_paths: vec![PathBuf::from("/from/config")],
            ..Settings::default()
        };
        let cli = CliArgs {
            encoding: Some("utf-8".to_string()),
            enable_plugins: vec!["text_case".to_string()],
            plugin_dirs: vec![PathBuf::from("/from/cli")],
            max_history: Some(3),
            ..args()
        };

        let config = cli.into_config(settings).unwrap();
        assert_eq!(config.settings.encoding, "utf-8");
        assert_eq!(config.settings.enabled_plugins, vec!["text_case"]);
        assert!(config.settings.disabled_plugins.is_empty());
        assert_eq!(config.settings.max_history, 3);
        assert_eq!(
            config.settings.plugin_search_paths,
            vec![PathBuf::from("/from/config"), PathBuf::from("/from/cli")]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cli = CliArgs {
            max_history: Some(0),
            ..args()
        };
        assert!(cli.into_config(Settings::default()).is_err());

        let cli = CliArgs {
            log_level: "chatty".to_string(),
            ..args()
        };
        assert!(cli.into_config(Settings::default()).is_err());
    }

    #[test]
    fn test_log_directive_from_flag() {
        let cli = CliArgs {
            log_level: "WARNING".to_string(),
            ..args()
        };
        assert_eq!(cli.log_directive(), Ok("warn"));

        let cli = CliArgs {
            log_level: "chatty".to_string(),
            ..args()
        };
        assert_eq!(cli.log_directive(), Err("Unknown log level: chatty".to_string()));
    }

    #[test]
    fn test_parse_from_argv() {
        let cli = CliArgs::try_parse_from([
            "textman",
            "-f",
            "in.txt",
            "--plugin-dir",
            "a",
            "--plugin-dir",
            "b",
            "--disable-plugins",
            "format,text_case",
            "-e",
            "replace x y",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("in.txt")));
        assert_eq!(cli.plugin_dirs.len(), 2);
        assert_eq!(cli.disable_plugins, vec!["format", "text_case"]);
        assert_eq!(cli.execute.as_deref(), Some("replace x y"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_enable_and_disable_conflict() {
        let result = CliArgs::try_parse_from([
            "textman",
            "--disable-plugins",
            "a",
            "--enable-plugins",
            "b",
        ]);
        assert!(result.is_err());
    }
}
