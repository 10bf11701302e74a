//! Declared plugin options and their validation

use serde::{Deserialize, Serialize};

use super::{parse_bool, PluginArgs};
use crate::error::PluginFailure;

/// Semantic type of an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl OptionKind {
    fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::String => true,
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Float => value.parse::<f64>().is_ok(),
            Self::Boolean => parse_bool(value).is_some(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Float => "a number",
            Self::Boolean => "a boolean",
        }
    }
}

/// Descriptor for an expected keyword option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: OptionKind,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Allowed values; empty means unrestricted
    #[serde(default)]
    pub choices: Vec<String>,
}

impl PluginOption {
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            default: None,
            required: false,
            choices: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Validate a supplied value (`None` when the caller omitted it)
    pub fn validate(&self, value: Option<&str>) -> Result<(), PluginFailure> {
        let Some(value) = value else {
            return if self.required {
                Err(PluginFailure::MissingOption(self.name.clone()))
            } else {
                Ok(())
            };
        };

        if !self.kind.accepts(value) {
            return Err(PluginFailure::InvalidOption {
                option: self.name.clone(),
                value: value.to_string(),
                reason: format!("expected {}", self.kind.describe()),
            });
        }

        if !self.choices.is_empty() && !self.choices.iter().any(|c| c == value) {
            return Err(PluginFailure::UnknownMode {
                option: self.name.clone(),
                value: value.to_string(),
            });
        }

        Ok(())
    }
}

/// Validate every declared option against `args`. Undeclared keys are ignored.
pub fn validate_options(options: &[PluginOption], args: &PluginArgs) -> Result<(), PluginFailure> {
    options
        .iter()
        .try_for_each(|option| option.validate(args.get(&option.name)))
}
