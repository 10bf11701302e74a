//! Script plugins: a manifest naming a pipeline of built-in transforms
//!
//! ```yaml
//! name: tidy
//! description: Trim lines and collapse runs of spaces
//! category: TEXT
//! steps:
//!   - op: trim
//!   - op: regex_replace
//!     pattern: " {2,}"
//!     replacement: " "
//!   - op: replace
//!     find: "${from}"
//!     replace: "${to}"
//! ```
//!
//! `${key}` in a step field is replaced with the keyword argument `key`.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::{Plugin, PluginArgs, PluginCategory, PluginInfo, PluginOption};
use crate::error::PluginFailure;
use crate::transform;

/// On-disk manifest format
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub category: PluginCategory,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub options: Vec<PluginOption>,
    pub steps: Vec<StepSpec>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_author() -> String {
    "Unknown".to_string()
}

fn default_true() -> bool {
    true
}

/// One pipeline step as written in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepSpec {
    Uppercase,
    Lowercase,
    Capitalize,
    Sort {
        #[serde(default)]
        reverse: bool,
    },
    Unique,
    Trim,
    Replace {
        find: String,
        #[serde(default)]
        replace: String,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    RegexReplace {
        pattern: String,
        #[serde(default)]
        replacement: String,
    },
}

#[derive(Debug)]
enum Step {
    Simple(StepSpec),
    Regex {
        pattern: String,
        /// Compiled at load time when the pattern has no placeholders
        compiled: Option<Regex>,
        replacement: String,
    },
}

/// A plugin defined by a manifest rather than compiled code
#[derive(Debug)]
pub struct ScriptPlugin {
    info: PluginInfo,
    options: Vec<PluginOption>,
    steps: Vec<Step>,
}

impl ScriptPlugin {
    /// Build a plugin from a parsed manifest, compiling static regex steps
    pub fn from_manifest(manifest: ScriptManifest) -> Result<Self, String> {
        if manifest.name.trim().is_empty() {
            return Err("manifest has an empty name".to_string());
        }
        if manifest.steps.is_empty() {
            return Err(format!("plugin '{}' declares no steps", manifest.name));
        }

        let steps = manifest
            .steps
            .into_iter()
            .map(|spec| -> Result<Step, String> {
                match spec {
                    StepSpec::RegexReplace {
                        pattern,
                        replacement,
                    } => {
                        let compiled = if has_placeholder(&pattern) {
                            None
                        } else {
                            Some(Regex::new(&pattern).map_err(|e| {
                                format!("invalid pattern '{}': {}", pattern, e)
                            })?)
                        };
                        Ok(Step::Regex {
                            pattern,
                            compiled,
                            replacement,
                        })
                    }
                    other => Ok(Step::Simple(other)),
                }
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self {
            info: PluginInfo {
                name: manifest.name,
                description: manifest.description,
                version: manifest.version,
                category: manifest.category,
                author: manifest.author,
            },
            options: manifest.options,
            steps,
        })
    }

    /// Parse a manifest string; `format` is a file extension (`yaml`, `yml`, `json`)
    pub fn parse(source: &str, format: &str) -> Result<Self, String> {
        let manifest: ScriptManifest = match format.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => serde_yaml::from_str(source).map_err(|e| e.to_string())?,
            "json" => serde_json::from_str(source).map_err(|e| e.to_string())?,
            other => return Err(format!("unsupported manifest format: {}", other)),
        };
        Self::from_manifest(manifest)
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, String> {
        let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::parse(&source, format)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

fn has_placeholder(template: &str) -> bool {
    template.contains("${")
}

/// Replace every `${key}` with the keyword argument `key`
fn substitute(template: &str, args: &PluginArgs) -> Result<String, PluginFailure> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated placeholder is kept literally
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let key = &after[..end];
        let value = args
            .get(key)
            .ok_or_else(|| PluginFailure::MissingOption(key.to_string()))?;
        out.push_str(value);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

impl Plugin for ScriptPlugin {
    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn options(&self) -> &[PluginOption] {
        &self.options
    }

    fn process(&self, text: &str, args: &PluginArgs) -> Result<String, PluginFailure> {
        self.validate_args(args)?;

        let mut current = text.to_string();
        for step in &self.steps {
            current = match step {
                Step::Simple(spec) => match spec {
                    StepSpec::Uppercase => transform::to_uppercase(&current),
                    StepSpec::Lowercase => transform::to_lowercase(&current),
                    StepSpec::Capitalize => transform::capitalize_words(&current),
                    StepSpec::Sort { reverse } => transform::sort_lines(&current, *reverse),
                    StepSpec::Unique => transform::remove_duplicates(&current),
                    StepSpec::Trim => transform::trim_whitespace(&current),
                    StepSpec::Replace {
                        find,
                        replace,
                        case_sensitive,
                    } => transform::find_replace(
                        &current,
                        &substitute(find, args)?,
                        &substitute(replace, args)?,
                        *case_sensitive,
                    ),
                    // Compiled variants live in Step::Regex
                    StepSpec::RegexReplace { .. } => current,
                },
                Step::Regex {
                    pattern,
                    compiled,
                    replacement,
                } => {
                    let replacement = substitute(replacement, args)?;
                    match compiled {
                        Some(re) => re.replace_all(&current, replacement.as_str()).into_owned(),
                        None => {
                            let pattern = substitute(pattern, args)?;
                            let re = Regex::new(&pattern).map_err(|e| {
                                PluginFailure::InvalidOption {
                                    option: "pattern".to_string(),
                                    value: pattern.clone(),
                                    reason: e.to_string(),
                                }
                            })?;
                            re.replace_all(&current, replacement.as_str()).into_owned()
                        }
                    }
                }
            };
        }

        Ok(current)
    }
}
