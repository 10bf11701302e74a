//! Case conventions beyond plain upper/lower

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PluginFailure;
use crate::plugin::{OptionKind, Plugin, PluginArgs, PluginCategory, PluginInfo, PluginOption};
use crate::transform::capitalize;

pub const MODES: [&str; 7] = [
    "snake", "camel", "kebab", "title", "sentence", "toggle", "invert",
];

/// `text_case`: snake/camel/kebab/title/sentence case, case toggling, reversal
pub struct TextCasePlugin {
    info: PluginInfo,
    options: Vec<PluginOption>,
}

impl Default for TextCasePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCasePlugin {
    pub fn new() -> Self {
        Self {
            info: PluginInfo::new("text_case", "Advanced text case transformations")
                .category(PluginCategory::Text)
                .author("textman"),
            options: vec![
                PluginOption::new("mode", OptionKind::String)
                    .describe("Transformation to apply")
                    .default_value("title")
                    .choices(MODES),
                PluginOption::new("preserve_acronyms", OptionKind::Boolean)
                    .describe("Keep all-caps words untouched in title mode")
                    .default_value("false"),
            ],
        }
    }
}

impl Plugin for TextCasePlugin {
    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn options(&self) -> &[PluginOption] {
        &self.options
    }

    fn process(&self, text: &str, args: &PluginArgs) -> Result<String, PluginFailure> {
        self.validate_args(args)?;

        Ok(match args.get_str("mode", "title") {
            "snake" => to_snake_case(text),
            "camel" => to_camel_case(text),
            "kebab" => to_kebab_case(text),
            "title" => to_title_case(text, args.get_bool("preserve_acronyms", false)?),
            "sentence" => to_sentence_case(text),
            "toggle" => toggle_case(text),
            "invert" => text.chars().rev().collect(),
            other => {
                return Err(PluginFailure::UnknownMode {
                    option: "mode".to_string(),
                    value: other.to_string(),
                })
            }
        })
    }
}

/// `"Hello World"` / `"camelCase"` / `"kebab-case"` -> `hello_world` / `camel_case` / `kebab_case`
pub fn to_snake_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev_lower = false;

    for c in text.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if prev_lower && c.is_ascii_uppercase() {
            out.push(' ');
        }
        prev_lower = c.is_ascii_lowercase();
        out.extend(c.to_lowercase());
    }

    out.replace(' ', "_")
}

/// `"Hello World"` -> `helloWorld`
pub fn to_camel_case(text: &str) -> String {
    let snake = to_snake_case(text);
    let mut components = snake.split('_');
    let mut out = components.next().unwrap_or_default().to_lowercase();
    for component in components.filter(|c| !c.is_empty()) {
        out.push_str(&capitalize(component));
    }
    out
}

/// `"Hello World"` -> `hello-world`
pub fn to_kebab_case(text: &str) -> String {
    to_snake_case(text).replace('_', "-")
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Capitalize each word; words are rejoined with single spaces
pub fn to_title_case(text: &str, preserve_acronyms: bool) -> String {
    text.split_whitespace()
        .map(|word| {
            if preserve_acronyms && is_all_caps(word) && word.chars().count() > 1 {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence break regex should compile"));

/// Uppercase the first character of each sentence and lowercase the rest.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace.
pub fn to_sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        out.push_str(&capitalize(&text[start..m.start()]));
        out.push_str(m.as_str());
        start = m.end();
    }

    out.push_str(&capitalize(&text[start..]));
    out
}

/// Swap the case of every cased character
pub fn toggle_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
