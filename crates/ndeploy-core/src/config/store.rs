//! Config store for locating and loading ndeploy.toml.

use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

use super::{DeployConfig, parser, paths::CONFIG_FILE_NAME};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigStore {
    /// Look for `ndeploy.toml` in the project root. A missing file is fine.
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            config_path: project_root.join(CONFIG_FILE_NAME),
            explicit: false,
        }
    }

    /// Use a config file named by the caller. A missing file is an error.
    pub fn from_path(config_path: PathBuf) -> Self {
        Self {
            config_path,
            explicit: true,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> DeployResult<DeployConfig> {
        if !self.explicit && !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(DeployConfig::new());
        }

        let config =
            parser::parse_deploy_toml(&self.config_path).map_err(|e| DeployError::Config {
                path: self.config_path.clone(),
                message: format!("{e:#}"),
            })?;
        tracing::debug!(path = %self.config_path.display(), "loaded config");
        Ok(config)
    }
}
