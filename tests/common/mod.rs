//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use textman::plugin::builtin::builtin_plugins;
use textman::TextEngine;

/// Engine with the bundled plugins registered and `text` loaded as the buffer
pub fn test_engine(text: &str) -> TextEngine {
    let mut engine = TextEngine::default();
    for plugin in builtin_plugins() {
        engine.register_plugin(plugin).unwrap();
    }
    if !text.is_empty() {
        engine.set_text(text);
    }
    engine
}

/// Write `content` to `dir/name`, returning the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Create a script plugin package `dir/<package>/plugin.yaml`
pub fn write_script_plugin(dir: &Path, package: &str, manifest: &str) -> PathBuf {
    write_file(dir, &format!("{}/plugin.yaml", package), manifest)
}
