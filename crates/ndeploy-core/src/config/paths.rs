//! Default path resolution helpers.

use std::path::{Component, Path, PathBuf};

use crate::error::{DeployError, DeployResult};

/// Build output directory, relative to the project root.
pub const DEFAULT_SOURCE_ROOT: &str = "dist/src";

/// Config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "ndeploy.toml";

pub fn home_dir() -> DeployResult<PathBuf> {
    dirs::home_dir().ok_or(DeployError::HomeDirUnavailable)
}

pub fn default_source_root(project_root: &Path) -> PathBuf {
    project_root.join(DEFAULT_SOURCE_ROOT)
}

/// `<home>/.n8n-dev/.n8n/custom`, where the dev instance loads custom nodes from.
pub fn default_destination_root(home_dir: &Path) -> PathBuf {
    home_dir.join(".n8n-dev").join(".n8n").join("custom")
}

/// Expand a leading `~` component to `home_dir`.
pub fn expand_home(path: &Path, home_dir: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => home_dir.join(components.as_path()),
        _ => path.to_path_buf(),
    }
}

/// Resolve a possibly relative path against `base`.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
