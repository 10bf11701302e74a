//! Filesystem discovery of script plugin packages
//!
//! Each search path is a directory of packages. A package is a sub-directory
//! holding a `plugin.yaml`, `plugin.yml` or `plugin.json` manifest. The core
//! never loads code here: it only sees constructed [`ScriptPlugin`]s.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::script::ScriptPlugin;
use super::Plugin;

/// Manifest file names, in lookup order
pub const MANIFEST_NAMES: [&str; 3] = ["plugin.yaml", "plugin.yml", "plugin.json"];

/// A package that could not be turned into a plugin
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Error reading plugin directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading plugin package {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },
}

/// Find the manifest for a package directory, if any
pub fn manifest_path(package: &Path) -> Option<PathBuf> {
    MANIFEST_NAMES
        .iter()
        .map(|name| package.join(name))
        .find(|path| path.is_file())
}

/// Scan search paths for packages. Missing search paths are logged and skipped.
///
/// Packages are visited in file-name order so registration order is stable.
pub fn scan(search_paths: &[PathBuf]) -> Vec<Result<Arc<dyn Plugin>, DiscoveryError>> {
    let mut results = Vec::new();

    for search_path in search_paths {
        if !search_path.is_dir() {
            tracing::warn!(
                "Plugin search path does not exist: {}",
                search_path.display()
            );
            continue;
        }

        let entries = match fs::read_dir(search_path) {
            Ok(entries) => entries,
            Err(source) => {
                results.push(Err(DiscoveryError::ReadDir {
                    path: search_path.clone(),
                    source,
                }));
                continue;
            }
        };

        let mut packages: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        packages.sort();

        for package in packages {
            let Some(manifest) = manifest_path(&package) else {
                tracing::debug!("No plugin manifest in {}", package.display());
                continue;
            };

            let loaded = ScriptPlugin::load(&manifest)
                .map(|plugin| Arc::new(plugin) as Arc<dyn Plugin>)
                .map_err(|reason| DiscoveryError::Load {
                    path: package.clone(),
                    reason,
                });
            results.push(loaded);
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_package(root: &Path, dir: &str, file: &str, body: &str) {
        let package = root.join(dir);
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join(file), body).unwrap();
    }

    #[test]
    fn test_scan_finds_packages_and_reports_bad_ones() {
        let root = tempfile::tempdir().unwrap();
        write_package(
            root.path(),
            "a_upper",
            "plugin.yaml",
            "name: shout\nsteps:\n  - op: uppercase\n",
        );
        write_package(root.path(), "b_broken", "plugin.json", "{ not json");
        fs::create_dir_all(root.path().join("c_empty")).unwrap();

        let results = scan(&[root.path().to_path_buf()]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().name(), "shout");
        assert!(matches!(results[1], Err(DiscoveryError::Load { .. })));
    }

    #[test]
    fn test_missing_search_path_is_skipped() {
        let results = scan(&[PathBuf::from("/definitely/not/a/real/plugin/dir")]);
        assert!(results.is_empty());
    }

    #[test]
    fn test_manifest_lookup_order() {
        let root = tempfile::tempdir().unwrap();
        write_package(root.path(), "pkg", "plugin.json", "{}");
        write_package(root.path(), "pkg", "plugin.yaml", "");
        let found = manifest_path(&root.path().join("pkg")).unwrap();
        assert!(found.ends_with("plugin.yaml"));
    }
}
