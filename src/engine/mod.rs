//! Text engine - owns the document, its history and the plugin registry
//!
//! Every content change goes through [`TextEngine::set_text`]: push the old
//! content to history, replace it, mark the document modified, drop the redo
//! stack. Undo and redo are the only paths that bypass it.

mod command;
mod shared;

pub(crate) use command::replace_args;
pub use command::{Command, CommandOutput, VERBS};
pub use shared::SharedEngine;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::EngineError;
use crate::history::{History, DEFAULT_MAX_HISTORY};
use crate::io;
use crate::plugin::builtin::builtin_plugins;
use crate::plugin::{Plugin, PluginArgs, PluginListing, PluginRegistry};
use crate::transform::{self, Readability, TextStatistics};

/// The buffer and its file state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Full buffer content
    pub content: String,
    /// Set by load/save, never cleared
    pub file_path: Option<PathBuf>,
    /// Whether the buffer differs from the last load/save
    pub is_modified: bool,
}

#[derive(Debug)]
pub struct TextEngine {
    document: Document,
    history: History,
    registry: PluginRegistry,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl TextEngine {
    /// Empty engine with no plugins registered
    pub fn new(max_history: usize) -> Self {
        Self::with_registry(max_history, PluginRegistry::new())
    }

    pub fn with_registry(max_history: usize, registry: PluginRegistry) -> Self {
        Self {
            document: Document::default(),
            history: History::with_max_size(max_history),
            registry,
        }
    }

    /// Build an engine from settings: history bound, bundled plugins,
    /// discovered plugins, then the disable list and the allow-list.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut engine = Self::new(settings.max_history.max(1));

        if settings.load_builtin_plugins {
            for plugin in builtin_plugins() {
                if let Err(e) = engine.registry.register(plugin) {
                    tracing::error!("Failed to register bundled plugin: {}", e);
                }
            }
        }

        if !settings.plugin_search_paths.is_empty() {
            engine.registry.discover(&settings.plugin_search_paths);
        }

        for name in &settings.disabled_plugins {
            if let Err(e) = engine.registry.disable(name) {
                tracing::warn!("Cannot disable plugin from settings: {}", e);
            }
        }

        if !settings.enabled_plugins.is_empty() {
            for name in &settings.enabled_plugins {
                if !engine.registry.contains(name) {
                    tracing::warn!("Enabled plugin is not registered: {}", name);
                }
            }
            for name in engine.registry.names() {
                let allowed = settings.enabled_plugins.contains(&name);
                let result = if allowed {
                    engine.registry.enable(&name)
                } else {
                    engine.registry.disable(&name)
                };
                if let Err(e) = result {
                    tracing::warn!("{}", e);
                }
            }
        }

        engine
    }

    // ------------------------------------------------------------------
    // Document state
    // ------------------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.document.content
    }

    pub fn filepath(&self) -> Option<&Path> {
        self.document.file_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replace the whole buffer, recording the previous content for undo
    pub fn set_text(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.history.push_undo(&self.document.content);
        self.document.content = value;
        self.document.is_modified = true;
        self.history.clear_redo();
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Load a file into the buffer. The previous buffer stays undoable.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        encoding: &str,
    ) -> Result<&str, EngineError> {
        let path = path.as_ref();
        let content = io::read_text_file(path, encoding)?;

        self.set_text(content);
        self.document.file_path = Some(path.to_path_buf());
        self.document.is_modified = false;

        tracing::info!("Loaded file: {}", path.display());
        Ok(&self.document.content)
    }

    /// Write the buffer to `path`, or to the current file when `None`
    pub fn save_file(
        &mut self,
        path: Option<&Path>,
        encoding: &str,
    ) -> Result<PathBuf, EngineError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .document
                .file_path
                .clone()
                .ok_or(EngineError::MissingPath)?,
        };

        io::write_text_file(&path, &self.document.content, encoding)?;
        self.document.file_path = Some(path.clone());
        self.document.is_modified = false;

        tracing::info!("Saved file: {}", path.display());
        Ok(path)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Restore the previous snapshot; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<&str> {
        let Some(previous) = self.history.undo(&self.document.content) else {
            tracing::debug!("Nothing to undo");
            return None;
        };
        self.document.content = previous;
        self.document.is_modified = true;
        tracing::debug!("Undo operation performed");
        Some(&self.document.content)
    }

    /// Re-apply the last undone snapshot; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Option<&str> {
        let Some(next) = self.history.redo(&self.document.content) else {
            tracing::debug!("Nothing to redo");
            return None;
        };
        self.document.content = next;
        self.document.is_modified = true;
        tracing::debug!("Redo operation performed");
        Some(&self.document.content)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ------------------------------------------------------------------
    // Built-in transforms
    // ------------------------------------------------------------------

    fn apply(&mut self, f: impl FnOnce(&str) -> String) -> &str {
        let result = f(&self.document.content);
        self.set_text(result);
        &self.document.content
    }

    pub fn to_uppercase(&mut self) -> &str {
        self.apply(transform::to_uppercase)
    }

    pub fn to_lowercase(&mut self) -> &str {
        self.apply(transform::to_lowercase)
    }

    pub fn capitalize_words(&mut self) -> &str {
        self.apply(transform::capitalize_words)
    }

    pub fn sort_lines(&mut self, reverse: bool) -> &str {
        self.apply(|text| transform::sort_lines(text, reverse))
    }

    pub fn remove_duplicates(&mut self) -> &str {
        self.apply(transform::remove_duplicates)
    }

    pub fn find_replace(&mut self, find: &str, replace: &str, case_sensitive: bool) -> &str {
        self.apply(|text| transform::find_replace(text, find, replace, case_sensitive))
    }

    pub fn trim_whitespace(&mut self) -> &str {
        self.apply(transform::trim_whitespace)
    }

    pub fn statistics(&self) -> TextStatistics {
        transform::statistics(&self.document.content)
    }

    pub fn readability(&self) -> Readability {
        transform::readability(&self.document.content)
    }

    // ------------------------------------------------------------------
    // Plugins
    // ------------------------------------------------------------------

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    pub fn register_plugin(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), EngineError> {
        self.registry.register(plugin)
    }

    pub fn enable_plugin(&mut self, name: &str) -> Result<(), EngineError> {
        self.registry.enable(name)
    }

    pub fn disable_plugin(&mut self, name: &str) -> Result<(), EngineError> {
        self.registry.disable(name)
    }

    pub fn list_plugins(&self, details: bool) -> PluginListing {
        self.registry.list(details)
    }

    /// Look up an enabled plugin by name
    pub(crate) fn runnable_plugin(&self, name: &str) -> Result<Arc<dyn Plugin>, EngineError> {
        let plugin = self
            .registry
            .get(name)
            .ok_or_else(|| EngineError::PluginNotFound(name.to_string()))?;
        if self.registry.is_enabled(name) != Some(true) {
            return Err(EngineError::Disabled(name.to_string()));
        }
        Ok(Arc::clone(plugin))
    }

    /// Run a plugin over the buffer and commit its result.
    ///
    /// Missing or disabled plugins and plugin failures leave the buffer and
    /// history untouched.
    pub fn apply_plugin(&mut self, name: &str, args: &PluginArgs) -> Result<&str, EngineError> {
        let plugin = self.runnable_plugin(name)?;
        let result = plugin
            .process(&self.document.content, args)
            .map_err(|source| EngineError::PluginFailure {
                plugin: name.to_string(),
                source,
            })?;

        self.set_text(result);
        tracing::info!("Applied plugin: {}", name);
        Ok(&self.document.content)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Parse and run one command line
    pub fn execute_command(&mut self, line: &str) -> Result<CommandOutput, EngineError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Run an already-parsed command
    pub fn execute(&mut self, command: Command) -> Result<CommandOutput, EngineError> {
        let text = match command {
            Command::Uppercase => self.to_uppercase(),
            Command::Lowercase => self.to_lowercase(),
            Command::Capitalize => self.capitalize_words(),
            Command::Sort => self.sort_lines(false),
            Command::SortReverse => self.sort_lines(true),
            Command::Unique => self.remove_duplicates(),
            Command::Trim => self.trim_whitespace(),
            Command::Replace { find, replace } => self.find_replace(&find, &replace, true),
            Command::Plugin { name, args } => self.apply_plugin(&name, &args)?,
            Command::Stats => return Ok(CommandOutput::Statistics(self.statistics())),
        };
        Ok(CommandOutput::Text(text.to_string()))
    }
}
