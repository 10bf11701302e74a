//! Name-keyed plugin registry

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::{discovery, Plugin, PluginCategory};
use crate::error::EngineError;

/// A registered plugin and its enabled flag
struct Slot {
    plugin: Arc<dyn Plugin>,
    enabled: bool,
}

/// Listing entry returned by [`PluginRegistry::by_category`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub description: String,
    pub version: String,
    pub enabled: bool,
    pub author: String,
}

/// Result of [`PluginRegistry::list`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PluginListing {
    Names(Vec<String>),
    ByCategory(BTreeMap<PluginCategory, Vec<PluginSummary>>),
}

/// Owns every plugin instance for the lifetime of the engine
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Slot>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its name. Newly registered plugins are enabled.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), EngineError> {
        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(EngineError::AlreadyRegistered(name));
        }

        tracing::info!(
            "Registered plugin: {} (category: {})",
            name,
            plugin.info().category
        );
        self.plugins.insert(
            name,
            Slot {
                plugin,
                enabled: true,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(name).map(|slot| &slot.plugin)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// `None` when no plugin is registered under `name`
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.plugins.get(name).map(|slot| slot.enabled)
    }

    pub fn enable(&mut self, name: &str) -> Result<(), EngineError> {
        self.set_enabled(name, true)
    }

    pub fn disable(&mut self, name: &str) -> Result<(), EngineError> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), EngineError> {
        let slot = self
            .plugins
            .get_mut(name)
            .ok_or_else(|| EngineError::PluginNotFound(name.to_string()))?;
        slot.enabled = enabled;
        tracing::info!(
            "{} plugin: {}",
            if enabled { "Enabled" } else { "Disabled" },
            name
        );
        Ok(())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Plugins grouped by category, each group sorted by name
    pub fn by_category(&self) -> BTreeMap<PluginCategory, Vec<PluginSummary>> {
        let mut grouped: BTreeMap<PluginCategory, Vec<PluginSummary>> = BTreeMap::new();
        for slot in self.plugins.values() {
            let info = slot.plugin.info();
            grouped.entry(info.category).or_default().push(PluginSummary {
                name: info.name.clone(),
                description: info.description.clone(),
                version: info.version.clone(),
                enabled: slot.enabled,
                author: info.author.clone(),
            });
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| a.name.cmp(&b.name));
        }
        grouped
    }

    /// Names only, or details grouped by category
    pub fn list(&self, details: bool) -> PluginListing {
        if details {
            PluginListing::ByCategory(self.by_category())
        } else {
            PluginListing::Names(self.names())
        }
    }

    /// Scan `search_paths` for script plugin packages and register each one.
    ///
    /// A candidate that fails to load or collides with a registered name is
    /// logged and skipped. Returns the number registered.
    pub fn discover(&mut self, search_paths: &[PathBuf]) -> usize {
        let mut loaded = 0;
        for candidate in discovery::scan(search_paths) {
            match candidate {
                Ok(plugin) => match self.register(plugin) {
                    Ok(()) => loaded += 1,
                    Err(e) => tracing::error!("Skipping discovered plugin: {}", e),
                },
                Err(e) => tracing::error!("{}", e),
            }
        }
        tracing::info!("Loaded {} plugins", loaded);
        loaded
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginFailure;
    use crate::plugin::{PluginArgs, PluginInfo};

    struct Echo {
        info: PluginInfo,
    }

    impl Echo {
        fn arc(name: &str, category: PluginCategory) -> Arc<dyn Plugin> {
            Arc::new(Self {
                info: PluginInfo::new(name, format!("{} plugin", name)).category(category),
            })
        }
    }

    impl Plugin for Echo {
        fn info(&self) -> &PluginInfo {
            &self.info
        }

        fn process(&self, text: &str, _args: &PluginArgs) -> Result<String, PluginFailure> {
            Ok(text.to_string())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Echo::arc("echo", PluginCategory::Text))
            .unwrap();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.is_enabled("echo"), Some(true));
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Echo::arc("echo", PluginCategory::Text))
            .unwrap();
        let err = registry
            .register(Echo::arc("echo", PluginCategory::Data))
            .unwrap_err();

        assert!(matches!(err, EngineError::AlreadyRegistered(ref n) if n == "echo"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("echo").unwrap().info().category,
            PluginCategory::Text
        );
    }

    #[test]
    fn test_enable_disable() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Echo::arc("echo", PluginCategory::Text))
            .unwrap();

        registry.disable("echo").unwrap();
        assert_eq!(registry.is_enabled("echo"), Some(false));
        registry.enable("echo").unwrap();
        assert_eq!(registry.is_enabled("echo"), Some(true));

        assert!(matches!(
            registry.disable("ghost"),
            Err(EngineError::PluginNotFound(_))
        ));
    }

    #[test]
    fn test_list_names_and_details() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Echo::arc("zeta", PluginCategory::Text))
            .unwrap();
        registry
            .register(Echo::arc("alpha", PluginCategory::Text))
            .unwrap();
        registry
            .register(Echo::arc("hash", PluginCategory::Security))
            .unwrap();
        registry.disable("hash").unwrap();

        assert_eq!(
            registry.list(false),
            PluginListing::Names(vec![
                "alpha".to_string(),
                "hash".to_string(),
                "zeta".to_string()
            ])
        );

        let PluginListing::ByCategory(grouped) = registry.list(true) else {
            panic!("Expected grouped listing");
        };
        let text: Vec<_> = grouped[&PluginCategory::Text]
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(text, vec!["alpha", "zeta"]);
        assert!(!grouped[&PluginCategory::Security][0].enabled);
        assert_eq!(grouped[&PluginCategory::Security][0].author, "Unknown");
    }
}
