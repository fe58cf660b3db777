//! Configuration schema for ndeploy.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for ndeploy.toml
///
/// Every field is optional; absent fields fall back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Build output directory containing `credentials/` and `nodes/`.
    /// Relative paths resolve against the project root.
    #[serde(default)]
    pub source_root: Option<PathBuf>,

    /// Custom extension directory of the dev instance. A leading `~` expands
    /// to the home directory.
    #[serde(default)]
    pub destination_root: Option<PathBuf>,

    /// Verify destination content against the source after deploying.
    #[serde(default)]
    pub verify: Option<bool>,
}

impl DeployConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(self, other: DeployConfig) -> DeployConfig {
        DeployConfig {
            source_root: other.source_root.or(self.source_root),
            destination_root: other.destination_root.or(self.destination_root),
            verify: other.verify.or(self.verify),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(src) = &self.source_root
            && src.as_os_str().is_empty()
        {
            anyhow::bail!("source_root must not be empty");
        }
        if let Some(dst) = &self.destination_root
            && dst.as_os_str().is_empty()
        {
            anyhow::bail!("destination_root must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_base() {
        let base = DeployConfig {
            source_root: Some(PathBuf::from("build")),
            destination_root: Some(PathBuf::from("/a")),
            verify: Some(false),
        };
        let overrides = DeployConfig {
            destination_root: Some(PathBuf::from("/b")),
            ..DeployConfig::default()
        };

        let merged = base.merged_with(overrides);
        assert_eq!(merged.source_root, Some(PathBuf::from("build")));
        assert_eq!(merged.destination_root, Some(PathBuf::from("/b")));
        assert_eq!(merged.verify, Some(false));
    }

    #[test]
    fn empty_paths_are_rejected() {
        let config = DeployConfig {
            source_root: Some(PathBuf::new()),
            ..DeployConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
