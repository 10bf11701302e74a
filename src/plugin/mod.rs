//! Plugin contract
//!
//! A plugin is a named, versioned text transform. The registry owns every
//! instance; the engine only looks plugins up by name. `process` receives the
//! current buffer plus caller arguments and returns the new buffer. It must not
//! reach back into the engine.

pub mod builtin;
pub mod discovery;
mod option;
mod registry;
pub mod script;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PluginFailure;

pub use option::{validate_options, OptionKind, PluginOption};
pub use registry::{PluginListing, PluginRegistry, PluginSummary};

/// Categories plugins are grouped under when listed
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PluginCategory {
    /// Basic text operations
    Text,
    /// Regular expression tools
    Regex,
    /// Comparison tools
    Diff,
    /// Code formatting/analysis
    Code,
    /// Data extraction/formatting
    Data,
    /// Natural language processing
    Nlp,
    /// Format conversion
    Convert,
    /// Sanitization, encryption
    Security,
    /// Miscellaneous utilities
    #[default]
    Utility,
}

impl PluginCategory {
    pub const ALL: [PluginCategory; 9] = [
        Self::Text,
        Self::Regex,
        Self::Diff,
        Self::Code,
        Self::Data,
        Self::Nlp,
        Self::Convert,
        Self::Security,
        Self::Utility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Regex => "REGEX",
            Self::Diff => "DIFF",
            Self::Code => "CODE",
            Self::Data => "DATA",
            Self::Nlp => "NLP",
            Self::Convert => "CONVERT",
            Self::Security => "SECURITY",
            Self::Utility => "UTILITY",
        }
    }
}

impl fmt::Display for PluginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown plugin category: {}", s))
    }
}

/// Identity metadata every plugin exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub category: PluginCategory,
    pub author: String,
}

impl PluginInfo {
    /// Metadata with version `1.0.0`, category UTILITY and author `Unknown`
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: "1.0.0".to_string(),
            category: PluginCategory::default(),
            author: "Unknown".to_string(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn category(mut self, category: PluginCategory) -> Self {
        self.category = category;
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// Arguments passed to [`Plugin::process`]
///
/// Keyword values are always strings; plugins parse them with the typed getters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginArgs {
    pub positional: Vec<String>,
    pub options: BTreeMap<String, String>,
}

impl PluginArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style keyword argument
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Builder-style positional argument
    pub fn with_positional(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn get_usize(&self, key: &str, default: usize) -> Result<usize, PluginFailure> {
        self.parse_or(key, default, "expected a non-negative integer")
    }

    pub fn get_i64(&self, key: &str, default: i64) -> Result<i64, PluginFailure> {
        self.parse_or(key, default, "expected an integer")
    }

    /// Accepts `true/false`, `yes/no`, `y/n`, `1/0` (any case)
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, PluginFailure> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => parse_bool(value).ok_or_else(|| PluginFailure::InvalidOption {
                option: key.to_string(),
                value: value.to_string(),
                reason: "expected a boolean".to_string(),
            }),
        }
    }

    fn parse_or<T: FromStr>(
        &self,
        key: &str,
        default: T,
        reason: &str,
    ) -> Result<T, PluginFailure> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| PluginFailure::InvalidOption {
                    option: key.to_string(),
                    value: value.to_string(),
                    reason: reason.to_string(),
                }),
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// A text transformation provider
pub trait Plugin: Send + Sync {
    /// Identity metadata; `info().name` is the registry key
    fn info(&self) -> &PluginInfo;

    /// Declared keyword options, used by the default [`Plugin::validate_args`]
    fn options(&self) -> &[PluginOption] {
        &[]
    }

    /// Check arguments before processing. Plugins without declared options
    /// accept anything.
    fn validate_args(&self, args: &PluginArgs) -> Result<(), PluginFailure> {
        validate_options(self.options(), args)
    }

    /// Transform `text` and return the new buffer
    fn process(&self, text: &str, args: &PluginArgs) -> Result<String, PluginFailure>;

    fn name(&self) -> &str {
        &self.info().name
    }
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin").field("info", self.info()).finish()
    }
}
