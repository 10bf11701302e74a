//! Line-oriented interactive session
//!
//! Reads one instruction per line. Session verbs (`open`, `save`, `undo`, ...)
//! are handled here; anything else goes to [`TextEngine::execute_command`].
//! Errors are printed on one line and the session keeps going.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::engine::{replace_args, CommandOutput, TextEngine};
use crate::plugin::{PluginCategory, PluginListing, PluginSummary};

const PROMPT: &str = "textman> ";

/// `(verb, usage, description)` for `help`
const HELP: &[(&str, &str, &str)] = &[
    ("open", "open <path> [encoding]", "Load a file into the buffer"),
    ("save", "save [path] [encoding]", "Save the buffer (defaults to the current file)"),
    ("show", "show [--lines]", "Print the buffer"),
    ("set", "set <text>", "Replace the buffer with the rest of the line"),
    ("undo", "undo", "Undo the last operation"),
    ("redo", "redo", "Redo the last undone operation"),
    ("uppercase", "uppercase", "Convert text to uppercase"),
    ("lowercase", "lowercase", "Convert text to lowercase"),
    ("capitalize", "capitalize", "Capitalize each word"),
    ("sort", "sort [--reverse]", "Sort lines alphabetically"),
    ("sort_reverse", "sort_reverse", "Sort lines in reverse order"),
    ("unique", "unique", "Remove duplicate lines"),
    ("trim", "trim", "Trim whitespace from each line"),
    (
        "replace",
        "replace <find> <replace> [--ignore-case]",
        "Find and replace, case-sensitive by default",
    ),
    ("stats", "stats", "Show text statistics"),
    ("plugin", "plugin <name> [key=value...]", "Apply a plugin"),
    ("plugins", "plugins [--details]", "List plugins"),
    ("enable", "enable <name>", "Enable a plugin"),
    ("disable", "disable <name>", "Disable a plugin"),
    ("help", "help [verb]", "Show help"),
    ("quit", "quit | exit", "Leave the session"),
];

/// Whether the session should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<'e, R, W> {
    engine: &'e mut TextEngine,
    input: R,
    output: W,
    encoding: String,
    prompt: bool,
}

impl<'e, R: BufRead, W: Write> Session<'e, R, W> {
    pub fn new(engine: &'e mut TextEngine, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
            encoding: crate::io::DEFAULT_ENCODING.to_string(),
            prompt: false,
        }
    }

    /// Default encoding for `open`/`save` without an explicit one
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Print a prompt before each line (for terminals)
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read and handle lines until `quit` or end of input
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();
        loop {
            if self.prompt {
                write!(self.output, "{PROMPT}")?;
                self.output.flush()?;
            }

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
        }

        if self.engine.is_modified() {
            writeln!(self.output, "Warning: unsaved changes were discarded")?;
        }
        Ok(())
    }

    /// Handle one instruction
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return Ok(Flow::Continue);
        }

        let (verb, rest) = match trimmed.find(char::is_whitespace) {
            Some(end) => (&trimmed[..end], trimmed[end..].trim_start()),
            None => (trimmed, ""),
        };

        match verb.to_lowercase().as_str() {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => self.help(rest.trim())?,
            "open" | "load" => self.open(rest)?,
            "save" => self.save(rest)?,
            "show" => self.show(rest.trim() == "--lines")?,
            "set" => {
                self.engine.set_text(rest.replace("\\n", "\n"));
                let chars = self.engine.text().chars().count();
                writeln!(self.output, "Buffer set ({chars} characters)")?;
            }
            "sort" => {
                let reverse = rest.split_whitespace().any(|arg| arg == "--reverse");
                self.engine.sort_lines(reverse);
                if reverse {
                    writeln!(self.output, "Lines sorted in reverse order")?;
                } else {
                    writeln!(self.output, "Lines sorted")?;
                }
            }
            "replace" => self.replace(rest)?,
            "undo" => match self.engine.undo() {
                Some(_) => writeln!(self.output, "Undo successful")?,
                None => writeln!(self.output, "Nothing to undo")?,
            },
            "redo" => match self.engine.redo() {
                Some(_) => writeln!(self.output, "Redo successful")?,
                None => writeln!(self.output, "Nothing to redo")?,
            },
            "plugins" => self.plugins(rest.trim() == "--details")?,
            "enable" | "disable" => {
                let name = rest.trim();
                let result = if verb.eq_ignore_ascii_case("enable") {
                    self.engine.enable_plugin(name)
                } else {
                    self.engine.disable_plugin(name)
                };
                match result {
                    Ok(()) => writeln!(self.output, "{} {}d", name, verb.to_lowercase())?,
                    Err(e) => writeln!(self.output, "Error: {e}")?,
                }
            }
            _ => match self.engine.execute_command(line) {
                Ok(CommandOutput::Text(_)) => {
                    writeln!(self.output, "{} applied", verb.to_lowercase())?
                }
                Ok(stats @ CommandOutput::Statistics(_)) => writeln!(self.output, "{stats}")?,
                Err(e) => writeln!(self.output, "Error: {e}")?,
            },
        }

        Ok(Flow::Continue)
    }

    fn replace(&mut self, rest: &str) -> io::Result<()> {
        let (rest, ignore_case) = strip_trailing_flag(rest, "--ignore-case");
        match replace_args(rest) {
            Ok((find, replace)) => {
                self.engine.find_replace(find, replace, !ignore_case);
                writeln!(self.output, "Replaced '{find}' with '{replace}'")
            }
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn help(&mut self, topic: &str) -> io::Result<()> {
        if !topic.is_empty() {
            return match HELP.iter().find(|(verb, _, _)| verb.eq_ignore_ascii_case(topic)) {
                Some((_, usage, description)) => {
                    writeln!(self.output, "{usage}\n  {description}")
                }
                None => writeln!(self.output, "Error: unknown command: {topic}"),
            };
        }

        writeln!(self.output, "Available commands:")?;
        let width = HELP.iter().map(|(_, usage, _)| usage.len()).max().unwrap_or(0);
        for (_, usage, description) in HELP {
            writeln!(self.output, "  {usage:<width$}  {description}")?;
        }
        Ok(())
    }

    fn open(&mut self, rest: &str) -> io::Result<()> {
        let mut parts = rest.split_whitespace();
        let Some(path) = parts.next() else {
            return writeln!(self.output, "Error: open requires a path");
        };
        let encoding = parts.next().unwrap_or(&self.encoding).to_string();

        match self.engine.load_file(path, &encoding) {
            Ok(content) => {
                let chars = content.chars().count();
                writeln!(self.output, "Loaded {path} ({chars} characters)")
            }
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn save(&mut self, rest: &str) -> io::Result<()> {
        let mut parts = rest.split_whitespace();
        let path = parts.next().map(Path::new);
        let encoding = parts.next().unwrap_or(&self.encoding).to_string();

        match self.engine.save_file(path, &encoding) {
            Ok(saved) => writeln!(self.output, "Saved {}", saved.display()),
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn show(&mut self, numbered: bool) -> io::Result<()> {
        let text = self.engine.text();
        if text.is_empty() {
            return writeln!(self.output, "(empty)");
        }
        if numbered {
            let lines = crate::transform::split_lines(text);
            let width = lines.len().to_string().len();
            for (i, line) in lines.iter().enumerate() {
                writeln!(self.output, "{:>width$} | {}", i + 1, line)?;
            }
            Ok(())
        } else {
            writeln!(self.output, "{text}")
        }
    }

    fn plugins(&mut self, details: bool) -> io::Result<()> {
        match self.engine.list_plugins(details) {
            PluginListing::Names(names) if names.is_empty() => {
                writeln!(self.output, "No plugins registered")
            }
            PluginListing::Names(names) => writeln!(self.output, "{}", names.join("\n")),
            PluginListing::ByCategory(grouped) => write_grouped(&mut self.output, &grouped),
        }
    }
}

/// `(rest without the flag, whether it was present)`
fn strip_trailing_flag<'a>(rest: &'a str, flag: &str) -> (&'a str, bool) {
    match rest.trim_end().strip_suffix(flag) {
        Some(head) if head.is_empty() || head.ends_with(char::is_whitespace) => {
            (head.trim_end(), true)
        }
        _ => (rest, false),
    }
}

/// Render a category-grouped plugin listing
pub fn write_grouped<W: Write>(
    out: &mut W,
    grouped: &BTreeMap<PluginCategory, Vec<PluginSummary>>,
) -> io::Result<()> {
    if grouped.is_empty() {
        return writeln!(out, "No plugins registered");
    }
    for (category, plugins) in grouped {
        writeln!(out, "{category}:")?;
        for plugin in plugins {
            let status = if plugin.enabled { "enabled" } else { "disabled" };
            writeln!(
                out,
                "  {} v{} ({}) - {} [{}]",
                plugin.name, plugin.version, plugin.author, plugin.description, status
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::builtin::builtin_plugins;

    fn engine() -> TextEngine {
        let mut engine = TextEngine::default();
        for plugin in builtin_plugins() {
            engine.register_plugin(plugin).unwrap();
        }
        engine
    }

    fn run_script(engine: &mut TextEngine, script: &str) -> String {
        let mut session = Session::new(engine, script.as_bytes(), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_edit_session() {
        let mut engine = engine();
        let out = run_script(
            &mut engine,
            "set b\\na\\nb\nunique\nsort\nshow\nundo\nshow --lines\nquit\n",
        );
        assert!(out.contains("unique applied"));
        assert!(out.contains("a\nb\n"));
        assert!(out.contains("Undo successful"));
        assert!(out.contains("1 | b\n2 | a\n"));
        assert_eq!(engine.text(), "b\na");
    }

    #[test]
    fn test_errors_do_not_stop_the_session() {
        let mut engine = engine();
        let out = run_script(&mut engine, "frobnicate\nreplace foo\nset ok\nuppercase\n");
        assert!(out.contains("Error: unknown command: frobnicate"));
        assert!(out.contains("Error: command 'replace' requires"));
        assert_eq!(engine.text(), "OK");
        assert!(out.contains("Warning: unsaved changes were discarded"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut engine = engine();
        run_script(&mut engine, "set one\nexit\nset two\n");
        assert_eq!(engine.text(), "one");
    }

    #[test]
    fn test_plugin_management() {
        let mut engine = engine();
        let out = run_script(
            &mut engine,
            "set hello world\n\
             disable text_case\n\
             plugin text_case mode=snake\n\
             enable text_case\n\
             plugin text_case mode=snake\n\
             plugins --details\n",
        );
        assert!(out.contains("text_case disabled"));
        assert!(out.contains("Error: plugin 'text_case' is disabled"));
        assert!(out.contains("TEXT:"));
        assert_eq!(engine.text(), "hello_world");
    }

    #[test]
    fn test_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "x\ny\n").unwrap();

        let mut engine = engine();
        let script = format!(
            "open {}\nsort_reverse\nsave {}\nsave\n",
            input.display(),
            output.display()
        );
        let out = run_script(&mut engine, &script);

        assert!(out.contains("Loaded"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "y\nx");
        assert_eq!(engine.filepath(), Some(output.as_path()));
        assert!(!out.contains("Warning"));
    }

    #[test]
    fn test_replace_and_sort_flags() {
        let mut engine = engine();
        let out = run_script(&mut engine, "set Foo foo\nreplace foo bar --ignore-case\n");
        assert!(out.contains("Replaced 'foo' with 'bar'"));
        assert_eq!(engine.text(), "bar bar");

        run_script(&mut engine, "set Foo foo\nreplace foo big bar\n");
        assert_eq!(engine.text(), "Foo big bar");

        let out = run_script(&mut engine, "set b\\na\\nc\nsort --reverse\n");
        assert!(out.contains("Lines sorted in reverse order"));
        assert_eq!(engine.text(), "c\nb\na");

        run_script(&mut engine, "sort\n");
        assert_eq!(engine.text(), "a\nb\nc");
    }

    #[test]
    fn test_strip_trailing_flag() {
        let flag = "--ignore-case";
        assert_eq!(strip_trailing_flag("a b --ignore-case ", flag), ("a b", true));
        assert_eq!(strip_trailing_flag("a b--ignore-case", flag), ("a b--ignore-case", false));
        assert_eq!(strip_trailing_flag("a b", flag), ("a b", false));
    }

    #[test]
    fn test_save_without_file() {
        let mut engine = engine();
        let out = run_script(&mut engine, "save\n");
        assert!(out.contains("Error: no file path provided"));
    }

    #[test]
    fn test_stats_and_help() {
        let mut engine = engine();
        let out = run_script(&mut engine, "set one two\nstats\nhelp replace\nhelp\n");
        assert!(out.contains("Words: 2"));
        assert!(out.contains("replace <find> <replace> [--ignore-case]\n  Find and replace"));
        assert!(out.contains("Available commands:"));
    }
}
