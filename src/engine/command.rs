//! Command-line surface of the engine
//!
//! A command line is a verb followed by a raw remainder. Verbs match
//! case-insensitively against a closed set; `plugin` is the only open-ended
//! extension point.

use std::fmt;

use serde::Serialize;

use crate::error::EngineError;
use crate::plugin::PluginArgs;
use crate::transform::TextStatistics;

/// Every verb [`Command::parse`] accepts, in help order
pub const VERBS: [&str; 10] = [
    "uppercase",
    "lowercase",
    "capitalize",
    "sort",
    "sort_reverse",
    "unique",
    "trim",
    "replace",
    "plugin",
    "stats",
];

/// A parsed engine command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Uppercase,
    Lowercase,
    Capitalize,
    Sort,
    SortReverse,
    Unique,
    Trim,
    /// Case-sensitive literal replace
    Replace { find: String, replace: String },
    Plugin { name: String, args: PluginArgs },
    Stats,
}

impl Command {
    /// Parse a command line without executing it
    pub fn parse(line: &str) -> Result<Self, EngineError> {
        let (verb, rest) = split_first_word(line).ok_or(EngineError::EmptyCommand)?;

        let command = match verb.to_lowercase().as_str() {
            "uppercase" => Self::Uppercase,
            "lowercase" => Self::Lowercase,
            "capitalize" => Self::Capitalize,
            "sort" => Self::Sort,
            "sort_reverse" => Self::SortReverse,
            "unique" => Self::Unique,
            "trim" => Self::Trim,
            "replace" => {
                let (find, replace) = replace_args(rest)?;
                Self::Replace {
                    find: find.to_string(),
                    replace: replace.to_string(),
                }
            }
            "plugin" => {
                let (name, rest) =
                    split_first_word(rest).ok_or(EngineError::MissingArgument {
                        command: "plugin",
                        argument: "a plugin name",
                    })?;
                Self::Plugin {
                    name: name.to_string(),
                    args: parse_plugin_args(rest),
                }
            }
            "stats" => Self::Stats,
            _ => return Err(EngineError::UnknownCommand(verb.to_string())),
        };

        Ok(command)
    }
}

/// Split `replace` arguments into the first word and the rest of the line
pub(crate) fn replace_args(rest: &str) -> Result<(&str, &str), EngineError> {
    split_first_word(rest)
        .filter(|(_, replace)| !replace.is_empty())
        .ok_or(EngineError::MissingArgument {
            command: "replace",
            argument: "'find' and 'replace' arguments",
        })
}

/// `("verb", "rest of line")`, or `None` for a blank line.
///
/// Leading whitespace of the remainder is dropped; trailing whitespace is kept.
fn split_first_word(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    Some(match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], line[end..].trim_start()),
        None => (line, ""),
    })
}

/// `key=value` tokens become options, anything else is positional
fn parse_plugin_args(rest: &str) -> PluginArgs {
    let mut args = PluginArgs::new();
    for token in rest.split_whitespace() {
        match token.split_once('=') {
            Some((key, value)) => {
                args.options.insert(key.to_string(), value.to_string());
            }
            None => args.positional.push(token.to_string()),
        }
    }
    args
}

/// Result of [`crate::TextEngine::execute_command`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    /// The buffer after a mutating command
    Text(String),
    Statistics(TextStatistics),
}

impl CommandOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Statistics(_) => None,
        }
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Statistics(stats) => {
                writeln!(f, "Text Statistics:")?;
                writeln!(f, "Characters: {}", stats.characters)?;
                writeln!(f, "Characters (no spaces): {}", stats.characters_no_spaces)?;
                writeln!(f, "Words: {}", stats.words)?;
                writeln!(f, "Sentences: {}", stats.sentences)?;
                writeln!(f, "Lines: {}", stats.lines)?;
                writeln!(f, "Paragraphs: {}", stats.paragraphs)?;
                writeln!(f, "Average word length: {:.2}", stats.avg_word_length)?;
                write!(f, "Reading time: {:.2} minutes", stats.reading_time_minutes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_verbs_are_case_insensitive() {
        assert_eq!(Command::parse("UPPERCASE").unwrap(), Command::Uppercase);
        assert_eq!(Command::parse("  Sort_Reverse  ").unwrap(), Command::SortReverse);
        assert_eq!(Command::parse("stats").unwrap(), Command::Stats);
    }

    #[test]
    fn test_every_verb_parses() {
        for verb in VERBS {
            let line = match verb {
                "replace" => "replace a b".to_string(),
                "plugin" => "plugin demo".to_string(),
                other => other.to_string(),
            };
            assert!(Command::parse(&line).is_ok(), "{verb} failed to parse");
        }
    }

    #[test]
    fn test_replace_splits_on_first_whitespace_run() {
        assert_eq!(
            Command::parse("replace foo   bar baz").unwrap(),
            Command::Replace {
                find: "foo".to_string(),
                replace: "bar baz".to_string()
            }
        );
    }

    #[test]
    fn test_replace_requires_two_parts() {
        for line in ["replace", "replace foo", "replace foo   "] {
            assert!(matches!(
                Command::parse(line),
                Err(EngineError::MissingArgument {
                    command: "replace",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_plugin_arguments() {
        let Command::Plugin { name, args } =
            Command::parse("plugin format operation=indent indent_size=2 extra").unwrap()
        else {
            panic!("Expected plugin command");
        };
        assert_eq!(name, "format");
        assert_eq!(args.get("operation"), Some("indent"));
        assert_eq!(args.get("indent_size"), Some("2"));
        assert_eq!(args.positional, vec!["extra".to_string()]);
    }

    #[test]
    fn test_plugin_value_may_contain_equals() {
        let Command::Plugin { args, .. } = Command::parse("plugin p expr=a=b").unwrap() else {
            panic!("Expected plugin command");
        };
        assert_eq!(args.get("expr"), Some("a=b"));
    }

    #[test]
    fn test_plugin_without_name() {
        assert!(matches!(
            Command::parse("plugin"),
            Err(EngineError::MissingArgument {
                command: "plugin",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(matches!(
            Command::parse("frobnicate now"),
            Err(EngineError::UnknownCommand(ref v)) if v == "frobnicate"
        ));
        assert!(matches!(Command::parse("   "), Err(EngineError::EmptyCommand)));
    }

    #[test]
    fn test_statistics_display() {
        let output = CommandOutput::Statistics(TextStatistics::default());
        let rendered = output.to_string();
        assert!(rendered.starts_with("Text Statistics:\nCharacters: 0\n"));
        assert!(rendered.ends_with("Reading time: 0.00 minutes"));
        assert_eq!(output.as_text(), None);
    }
}
