//! Thread-safe handle for hosts that serve several callers from one engine

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::{Command, CommandOutput, TextEngine};
use crate::error::EngineError;
use crate::plugin::PluginArgs;
use crate::transform::TextStatistics;

/// Cloneable handle to one engine. Every mutation holds the lock for the
/// whole read-modify-write of the document and both history stacks.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<TextEngine>>,
}

impl From<TextEngine> for SharedEngine {
    fn from(engine: TextEngine) -> Self {
        Self::new(engine)
    }
}

impl SharedEngine {
    pub fn new(engine: TextEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Direct access for operations not wrapped here
    pub fn lock(&self) -> MutexGuard<'_, TextEngine> {
        self.inner.lock()
    }

    pub fn text(&self) -> String {
        self.inner.lock().text().to_string()
    }

    pub fn filepath(&self) -> Option<PathBuf> {
        self.inner.lock().filepath().map(Path::to_path_buf)
    }

    pub fn is_modified(&self) -> bool {
        self.inner.lock().is_modified()
    }

    pub fn can_undo(&self) -> bool {
        self.inner.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.lock().can_redo()
    }

    pub fn statistics(&self) -> TextStatistics {
        self.inner.lock().statistics()
    }

    pub fn set_text(&self, value: impl Into<String>) {
        self.inner.lock().set_text(value);
    }

    pub fn load_file(&self, path: &Path, encoding: &str) -> Result<String, EngineError> {
        self.inner
            .lock()
            .load_file(path, encoding)
            .map(str::to_string)
    }

    pub fn save_file(&self, path: Option<&Path>, encoding: &str) -> Result<PathBuf, EngineError> {
        self.inner.lock().save_file(path, encoding)
    }

    pub fn undo(&self) -> Option<String> {
        self.inner.lock().undo().map(str::to_string)
    }

    pub fn redo(&self) -> Option<String> {
        self.inner.lock().redo().map(str::to_string)
    }

    /// Run a plugin with the lock released during `process`.
    ///
    /// The plugin and a snapshot of the buffer are taken under the lock, the
    /// transform runs unlocked, and the result is committed under the lock.
    /// A commit replaces whatever the buffer holds by then.
    pub fn apply_plugin(&self, name: &str, args: &PluginArgs) -> Result<String, EngineError> {
        let (plugin, snapshot) = {
            let engine = self.inner.lock();
            (engine.runnable_plugin(name)?, engine.text().to_string())
        };

        let result = plugin
            .process(&snapshot, args)
            .map_err(|source| EngineError::PluginFailure {
                plugin: name.to_string(),
                source,
            })?;

        let mut engine = self.inner.lock();
        engine.set_text(result);
        tracing::info!("Applied plugin: {}", name);
        Ok(engine.text().to_string())
    }

    /// Parse and run a command line. Plugin commands use
    /// [`SharedEngine::apply_plugin`]; everything else runs under one lock.
    pub fn execute_command(&self, line: &str) -> Result<CommandOutput, EngineError> {
        match Command::parse(line)? {
            Command::Plugin { name, args } => {
                self.apply_plugin(&name, &args).map(CommandOutput::Text)
            }
            command => self.inner.lock().execute(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::builtin::builtin_plugins;
    use std::thread;

    fn shared() -> SharedEngine {
        let mut engine = TextEngine::default();
        for plugin in builtin_plugins() {
            engine.register_plugin(plugin).unwrap();
        }
        SharedEngine::new(engine)
    }

    #[test]
    fn test_apply_plugin_commits_result() {
        let engine = shared();
        engine.set_text("hello world");
        let out = engine
            .apply_plugin("text_case", &PluginArgs::new().with("mode", "snake"))
            .unwrap();
        assert_eq!(out, "hello_world");
        assert_eq!(engine.undo().as_deref(), Some("hello world"));
    }

    #[test]
    fn test_disabled_plugin_is_rejected() {
        let engine = shared();
        engine.lock().disable_plugin("format").unwrap();
        assert!(matches!(
            engine.execute_command("plugin format"),
            Err(EngineError::Disabled(_))
        ));
    }

    #[test]
    fn test_concurrent_edits_are_serialized() {
        let engine = shared();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = engine.clone();
                thread::spawn(move || {
                    for j in 0..10 {
                        engine.set_text(format!("{i}-{j}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 80 distinct edits on top of the empty buffer, bounded by the history size
        let locked = engine.lock();
        assert_eq!(locked.history().undo_count(), 50);
        assert!(!locked.can_redo());
    }

    #[test]
    fn test_execute_command_through_handle() {
        let engine = shared();
        engine.set_text("b\na");
        let out = engine.execute_command("sort").unwrap();
        assert_eq!(out.as_text(), Some("a\nb"));
        assert!(engine.is_modified());
    }
}
