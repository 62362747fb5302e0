use std::fs;
use std::path::{Path, PathBuf};

use crate::io::storage::FileStorage;
use crate::model::config::WorkspaceConfig;
use crate::ops::task_store::TaskStore;

/// Name of the directory that marks a workspace
pub const WORKSPACE_DIR: &str = ".twig";

const CONFIG_FILE: &str = "config.toml";

const CONFIG_TEMPLATE: &str = "\
[storage]
# Tasks are stored in .twig/<key>.json
key = \"todo-app-data\"

[ui]
# Filter shown until one is picked: all, active or completed
default_filter = \"all\"
show_key_hints = true

# [ui.colors]
# highlight = \"#FB4196\"
";

/// Error type for workspace I/O
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a twig workspace: no .twig/ directory found (run `tw init`)")]
    NotAWorkspace,
    #[error("{0} already exists (use --force to overwrite the config)")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid storage key {0:?}: it must be a plain file name without path separators")]
    InvalidStorageKey(String),
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A directory holding `.twig/`
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config: WorkspaceConfig,
}

impl Workspace {
    /// The key-value store holding this workspace's task list
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir, self.config.storage.key.clone())
    }

    /// Load the task tree into a store backed by this workspace
    pub fn open_store(&self) -> TaskStore<FileStorage> {
        TaskStore::load(self.storage())
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("twig.log")
    }
}

/// Walk up from `start` looking for a directory containing `.twig/`.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(WORKSPACE_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Load the workspace rooted at `root`. A missing config file means defaults.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join(WORKSPACE_DIR);
    if !data_dir.is_dir() {
        return Err(WorkspaceError::NotAWorkspace);
    }

    let config_path = data_dir.join(CONFIG_FILE);
    let config = if config_path.exists() {
        let text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
            path: config_path.clone(),
            source: e,
        })?;
        toml::from_str(&text)?
    } else {
        WorkspaceConfig::default()
    };
    validate_storage_key(&config.storage.key)?;

    Ok(Workspace {
        root: root.to_path_buf(),
        data_dir,
        config,
    })
}

/// The storage key names a file inside `.twig/`, so it must stay there.
fn validate_storage_key(key: &str) -> Result<(), WorkspaceError> {
    let escapes = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\']);
    if escapes {
        return Err(WorkspaceError::InvalidStorageKey(key.to_string()));
    }
    Ok(())
}

/// Create `.twig/` with a commented default config.
pub fn init_workspace(root: &Path, force: bool) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join(WORKSPACE_DIR);
    if data_dir.is_dir() && !force {
        return Err(WorkspaceError::AlreadyInitialized(data_dir));
    }
    fs::create_dir_all(&data_dir)?;
    fs::write(data_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    tracing::info!(root = %root.display(), "initialized workspace");
    load_workspace(root)
}
