//! Line formatting: indentation, wrapping, alignment, numbering, affixes

use crate::error::PluginFailure;
use crate::plugin::{OptionKind, Plugin, PluginArgs, PluginCategory, PluginInfo, PluginOption};
use crate::transform::split_lines;

pub const OPERATIONS: [&str; 7] = [
    "indent", "dedent", "wrap", "align", "number", "prefix", "suffix",
];

pub const ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];

/// Widest padding or gutter a single line may get, in bytes
pub const MAX_PADDING: usize = 1 << 16;

/// Upper bound on padding added across the whole buffer, in bytes
const MAX_ADDED: usize = 1 << 28;

/// `format`: per-line formatting operations selected by `operation`
pub struct FormattingPlugin {
    info: PluginInfo,
    options: Vec<PluginOption>,
}

impl Default for FormattingPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FormattingPlugin {
    pub fn new() -> Self {
        Self {
            info: PluginInfo::new("format", "Text formatting operations")
                .category(PluginCategory::Text)
                .author("textman"),
            options: vec![
                PluginOption::new("operation", OptionKind::String)
                    .default_value("indent")
                    .choices(OPERATIONS),
                PluginOption::new("indent_str", OptionKind::String).default_value(" "),
                PluginOption::new("indent_size", OptionKind::Integer).default_value("4"),
                PluginOption::new("skip_blank", OptionKind::Boolean).default_value("true"),
                PluginOption::new("all_lines", OptionKind::Boolean).default_value("true"),
                PluginOption::new("wrap_width", OptionKind::Integer).default_value("80"),
                PluginOption::new("preserve_paragraphs", OptionKind::Boolean)
                    .default_value("true"),
                PluginOption::new("align", OptionKind::String)
                    .default_value("left")
                    .choices(ALIGNMENTS),
                PluginOption::new("width", OptionKind::Integer).default_value("80"),
                PluginOption::new("start_number", OptionKind::Integer).default_value("1"),
                PluginOption::new("number_width", OptionKind::Integer).default_value("4"),
                PluginOption::new("number_separator", OptionKind::String).default_value(" "),
                PluginOption::new("empty_lines", OptionKind::Boolean).default_value("true"),
                PluginOption::new("prefix", OptionKind::String),
                PluginOption::new("suffix", OptionKind::String),
            ],
        }
    }
}

impl Plugin for FormattingPlugin {
    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn options(&self) -> &[PluginOption] {
        &self.options
    }

    fn process(&self, text: &str, args: &PluginArgs) -> Result<String, PluginFailure> {
        self.validate_args(args)?;

        match args.get_str("operation", "indent") {
            "indent" => {
                let unit = args.get_str("indent_str", " ");
                let size = padding(args, "indent_size", 4, unit.len(), text)?;
                let indent = unit.repeat(size);
                let skip_blank = args.get_bool("skip_blank", true)?;
                Ok(map_lines(text, skip_blank, |line| format!("{indent}{line}")))
            }
            "dedent" => Ok(if args.get_bool("all_lines", true)? {
                dedent(text)
            } else {
                split_lines(text)
                    .into_iter()
                    .map(str::trim_start)
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
            "wrap" => {
                let width = positive(args, "wrap_width", 80)?;
                Ok(if args.get_bool("preserve_paragraphs", true)? {
                    split_paragraphs(text)
                        .into_iter()
                        .map(|p| fill(p, width))
                        .collect::<Vec<_>>()
                        .join("\n\n")
                } else {
                    fill(text, width)
                })
            }
            "align" => {
                let width = padding(args, "width", 80, 1, text)?;
                let mode = args.get_str("align", "left");
                Ok(split_lines(text)
                    .into_iter()
                    .map(|line| {
                        if line.trim().is_empty() {
                            line.to_string()
                        } else {
                            align_line(line, mode, width)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "number" => number_lines(text, args),
            "prefix" => {
                let prefix = args.get_str("prefix", "");
                let skip_blank = args.get_bool("skip_blank", true)?;
                Ok(map_lines(text, skip_blank, |line| format!("{prefix}{line}")))
            }
            "suffix" => {
                let suffix = args.get_str("suffix", "");
                let skip_blank = args.get_bool("skip_blank", true)?;
                Ok(map_lines(text, skip_blank, |line| format!("{line}{suffix}")))
            }
            other => Err(PluginFailure::UnknownMode {
                option: "operation".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Read a repeat count for `unit_len`-byte padding and check that the padding
/// it produces stays within [`MAX_PADDING`] per line and [`MAX_ADDED`] overall
fn padding(
    args: &PluginArgs,
    key: &str,
    default: usize,
    unit_len: usize,
    text: &str,
) -> Result<usize, PluginFailure> {
    let count = args.get_usize(key, default)?;
    let lines = split_lines(text).len().max(1);
    count
        .checked_mul(unit_len)
        .filter(|&per_line| per_line <= MAX_PADDING)
        .and_then(|per_line| per_line.checked_mul(lines))
        .filter(|&total| total <= MAX_ADDED)
        .map(|_| count)
        .ok_or_else(|| PluginFailure::InvalidOption {
            option: key.to_string(),
            value: count.to_string(),
            reason: format!(
                "padding is limited to {MAX_PADDING} bytes per line and {MAX_ADDED} in total"
            ),
        })
}

fn positive(args: &PluginArgs, key: &str, default: usize) -> Result<usize, PluginFailure> {
    let value = args.get_usize(key, default)?;
    if value == 0 {
        return Err(PluginFailure::InvalidOption {
            option: key.to_string(),
            value: "0".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

/// Apply `f` to every line, leaving blank lines alone when `skip_blank`
fn map_lines(text: &str, skip_blank: bool, f: impl Fn(&str) -> String) -> String {
    split_lines(text)
        .into_iter()
        .map(|line| {
            if skip_blank && line.trim().is_empty() {
                line.to_string()
            } else {
                f(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove the longest common leading whitespace from every line.
///
/// Whitespace-only lines are emptied and do not count towards the margin.
/// Line structure, including a trailing newline, is kept.
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut margin: Option<&str> = None;

    for line in &lines {
        if line.trim().is_empty() {
            continue;
        }
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let indent = &line[..indent_len];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }

    let margin = margin.unwrap_or("");
    lines
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// Split on blank lines (a newline, optional whitespace, a newline)
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(offset) = text[search..].find('\n') {
        let nl = search + offset;
        let rest = &text[nl + 1..];
        let ws_len = rest.len() - rest.trim_start().len();
        if let Some(second) = rest[..ws_len].rfind('\n') {
            paragraphs.push(&text[start..nl]);
            start = nl + 1 + second + 1;
            search = start;
        } else {
            search = nl + 1;
        }
    }

    paragraphs.push(&text[start..]);
    paragraphs
}

/// Greedy fill: collapse whitespace and wrap words at `width` characters.
///
/// Words longer than `width` are broken across lines.
pub fn fill(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        loop {
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(word.iter());
                current_len += word.len();
                break;
            }

            if word.len() > width {
                // Break the long word into what fits on the current line
                let room = if current_len == 0 {
                    width
                } else {
                    width.saturating_sub(current_len + 1)
                };
                if room == 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                    continue;
                }
                if current_len > 0 {
                    current.push(' ');
                }
                current.extend(word[..room].iter());
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                word.drain(..room);
                continue;
            }

            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines.join("\n")
}

fn pad(line: &str, left: usize, right: usize) -> String {
    format!("{}{}{}", " ".repeat(left), line, " ".repeat(right))
}

fn align_line(line: &str, mode: &str, width: usize) -> String {
    let len = line.chars().count();
    let margin = width.saturating_sub(len);

    match mode {
        "right" => pad(line, margin, 0),
        "center" => {
            let left = margin / 2 + (margin & width & 1);
            pad(line, left, margin - left)
        }
        "justify" => justify(line, width).unwrap_or_else(|| pad(line, 0, margin)),
        _ => pad(line, 0, margin),
    }
}

/// Spread words so the line is exactly `width` characters wide.
///
/// `None` when the line has a single word or is already too wide.
fn justify(line: &str, width: usize) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.chars().count() >= width || !trimmed.contains(' ') {
        return None;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }

    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let gaps = words.len() - 1;
    let spaces = width.saturating_sub(letters);
    let base = spaces / gaps;
    let extra = spaces % gaps;

    let mut out = String::from(words[0]);
    for (i, word) in words.iter().enumerate().skip(1) {
        let count = base + usize::from(i <= extra);
        out.push_str(&" ".repeat(count));
        out.push_str(word);
    }
    Some(out)
}

fn number_lines(text: &str, args: &PluginArgs) -> Result<String, PluginFailure> {
    let start = args.get_i64("start_number", 1)?;
    let width = padding(args, "number_width", 4, 1, text)?;
    let separator = args.get_str("number_separator", " ");
    let empty_lines = args.get_bool("empty_lines", true)?;
    let blank_gutter = " ".repeat(format!("{:>width$}{separator}", 0).chars().count());

    let mut next = Some(start);
    let mut out = Vec::new();
    for line in split_lines(text) {
        if !empty_lines && line.trim().is_empty() {
            out.push(format!("{blank_gutter}{line}"));
            continue;
        }
        let number = next.ok_or_else(|| PluginFailure::InvalidOption {
            option: "start_number".to_string(),
            value: start.to_string(),
            reason: "line numbers would overflow".to_string(),
        })?;
        out.push(format!("{number:>width$}{separator}{line}"));
        next = number.checked_add(1);
    }
    Ok(out.join("\n"))
}
