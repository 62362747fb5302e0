use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::config::WorkspaceConfig;
use crate::model::filter::FilterMode;

/// Persisted view state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Filter selector in fragment form, e.g. `#active`
    #[serde(default)]
    pub filter: Option<String>,
    /// Cursor row in the terminal UI
    #[serde(default)]
    pub cursor: usize,
}

impl UiState {
    /// The selected filter, falling back to the configured default
    pub fn filter_mode(&self, config: &WorkspaceConfig) -> FilterMode {
        let selector = self
            .filter
            .as_deref()
            .unwrap_or(&config.ui.default_filter);
        FilterMode::parse_selector(selector)
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = Some(mode.selector());
    }
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
