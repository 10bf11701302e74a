//! textman - text manipulation engine
//!
//! A single flat text buffer edited through whole-buffer transforms, with
//! bounded undo/redo and a registry of named plugins. Front-ends (the
//! `textman` binary, the REPL, embedding hosts) drive it through
//! [`TextEngine`] or the thread-safe [`SharedEngine`].

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod engine;
pub mod error;
pub mod history;
pub mod io;
pub mod plugin;
pub mod repl;
pub mod tracing;
pub mod transform;

// Re-export commonly used types
pub use config::Settings;
pub use engine::{Command, CommandOutput, SharedEngine, TextEngine};
pub use error::{EngineError, PluginFailure};
pub use history::History;
pub use plugin::{Plugin, PluginArgs, PluginCategory, PluginInfo, PluginRegistry};
pub use transform::{Readability, TextStatistics};
