//! Deploy context carrying the resolved source and destination roots.

use std::path::{Path, PathBuf};

use crate::config::paths::{
    default_destination_root, default_source_root, expand_home, resolve_against,
};
use crate::config::DeployConfig;
use crate::deploy::Category;

/// Resolved paths for one deploy run.
///
/// Frontends build this once and hand it to [`crate::deploy::deploy`]; tests
/// point it at temporary directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    source_root: PathBuf,
    destination_root: PathBuf,
    verify: bool,
}

impl DeployContext {
    /// Create a context with explicit roots.
    pub fn new(source_root: PathBuf, destination_root: PathBuf) -> Self {
        Self {
            source_root,
            destination_root,
            verify: false,
        }
    }

    /// `<project>/dist/src` into `<home>/.n8n-dev/.n8n/custom`.
    pub fn from_defaults(project_root: &Path, home_dir: &Path) -> Self {
        Self::new(
            default_source_root(project_root),
            default_destination_root(home_dir),
        )
    }

    /// Apply config values on top of the defaults.
    pub fn resolve(project_root: &Path, home_dir: &Path, config: &DeployConfig) -> Self {
        let source_root = config
            .source_root
            .as_deref()
            .map(|p| resolve_against(project_root, &expand_home(p, home_dir)))
            .unwrap_or_else(|| default_source_root(project_root));
        let destination_root = config
            .destination_root
            .as_deref()
            .map(|p| resolve_against(project_root, &expand_home(p, home_dir)))
            .unwrap_or_else(|| default_destination_root(home_dir));

        Self {
            source_root,
            destination_root,
            verify: config.verify.unwrap_or(false),
        }
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn category_source(&self, category: Category) -> PathBuf {
        self.source_root.join(category.dir_name())
    }

    pub fn category_destination(&self, category: Category) -> PathBuf {
        self.destination_root.join(category.dir_name())
    }
}
