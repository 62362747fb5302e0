use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default storage key; the task list lives at `.twig/<key>.json`
pub const DEFAULT_STORAGE_KEY: &str = "todo-app-data";

/// Configuration from `.twig/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Filter used when no selection has been persisted yet
    #[serde(default = "default_filter")]
    pub default_filter: String,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot (`background`, `text`, ...)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_filter: default_filter(),
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_filter() -> String {
    "all".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: WorkspaceConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.ui.default_filter, "all");
        assert!(config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn partial_config_overrides() {
        let config: WorkspaceConfig = toml::from_str(
            r##"
[storage]
key = "groceries"

[ui]
default_filter = "active"
show_key_hints = false

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.storage.key, "groceries");
        assert_eq!(config.ui.default_filter, "active");
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
    }
}
