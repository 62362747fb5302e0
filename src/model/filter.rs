use std::fmt;

use serde::{Deserialize, Serialize};

/// Which tasks a projection shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 3] =
        [FilterMode::All, FilterMode::Active, FilterMode::Completed];

    /// Normalize a selector string such as `#Active`, `completed` or `""`.
    /// Case-insensitive; a leading `#` is ignored; unknown values mean `All`.
    pub fn parse_selector(s: &str) -> FilterMode {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        match s.to_ascii_lowercase().as_str() {
            "active" => FilterMode::Active,
            "completed" => FilterMode::Completed,
            _ => FilterMode::All,
        }
    }

    /// Fragment form used in the persisted UI state (`#all`, `#active`, ...)
    pub fn selector(self) -> String {
        format!("#{}", self.as_str())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Completed => "completed",
        }
    }

    /// Whether a task with the given completion flag passes this mode
    pub fn admits(self, completed: bool) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !completed,
            FilterMode::Completed => completed,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
