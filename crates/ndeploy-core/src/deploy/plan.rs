//! Build the ordered action list for a deploy run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::DeployContext;
use crate::error::{DeployError, DeployResult};
use crate::fs::copy::read_dir_sorted;

/// A source subdirectory together with its copy policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Credentials,
    Nodes,
}

impl Category {
    /// Processing order.
    pub const ALL: [Category; 2] = [Category::Credentials, Category::Nodes];

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Credentials => "credentials",
            Category::Nodes => "nodes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Credentials => "credential",
            Category::Nodes => "node",
        }
    }

    /// Whether directories in this category are copied.
    ///
    /// Credentials only ever take direct file children; nodes also take whole
    /// directories, which replace any previous copy.
    pub fn copies_directories(self) -> bool {
        matches!(self, Category::Nodes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A directory under a category that only takes files.
    DirectoryNotCopied,
    /// Neither a regular file nor a directory (socket, fifo, device, dangling
    /// symlink).
    UnsupportedEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeployAction {
    /// Copy a file over any same-named destination file.
    CopyFile {
        category: Category,
        name: String,
        from: PathBuf,
        to: PathBuf,
    },
    /// Delete the destination directory, if any, and copy the source tree.
    ReplaceDir {
        category: Category,
        name: String,
        from: PathBuf,
        to: PathBuf,
    },
    Skip {
        category: Category,
        name: String,
        path: PathBuf,
        reason: SkipReason,
    },
}

impl DeployAction {
    pub fn category(&self) -> Category {
        match self {
            DeployAction::CopyFile { category, .. }
            | DeployAction::ReplaceDir { category, .. }
            | DeployAction::Skip { category, .. } => *category,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DeployAction::CopyFile { name, .. }
            | DeployAction::ReplaceDir { name, .. }
            | DeployAction::Skip { name, .. } => name,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, DeployAction::Skip { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployPlan {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub actions: Vec<DeployAction>,
    /// Categories whose source directory does not exist.
    pub missing: Vec<Category>,
}

impl DeployPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.iter().all(DeployAction::is_skip)
    }

    pub fn actions_for(&self, category: Category) -> impl Iterator<Item = &DeployAction> {
        self.actions.iter().filter(move |a| a.category() == category)
    }
}

/// Inspect the source categories and decide what to copy. Nothing under the
/// destination is touched.
pub fn plan(ctx: &DeployContext) -> DeployResult<DeployPlan> {
    let mut actions = Vec::new();
    let mut missing = Vec::new();

    for category in Category::ALL {
        let src_dir = ctx.category_source(category);
        let dst_dir = ctx.category_destination(category);

        if !source_dir_exists(&src_dir)? {
            tracing::debug!(
                category = category.dir_name(),
                path = %src_dir.display(),
                "source category missing, skipping"
            );
            missing.push(category);
            continue;
        }

        for entry in read_dir_sorted(&src_dir)? {
            let from = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let to = dst_dir.join(entry.file_name());
            // Follows symlinks, so a linked file deploys its target's content.
            let Some(meta) = entry_metadata(&from)? else {
                tracing::debug!(path = %from.display(), "dangling symlink, skipping");
                actions.push(DeployAction::Skip {
                    category,
                    name,
                    path: from,
                    reason: SkipReason::UnsupportedEntry,
                });
                continue;
            };

            let action = if meta.is_file() {
                DeployAction::CopyFile {
                    category,
                    name,
                    from,
                    to,
                }
            } else if meta.is_dir() && category.copies_directories() {
                DeployAction::ReplaceDir {
                    category,
                    name,
                    from,
                    to,
                }
            } else {
                let reason = if meta.is_dir() {
                    SkipReason::DirectoryNotCopied
                } else {
                    SkipReason::UnsupportedEntry
                };
                DeployAction::Skip {
                    category,
                    name,
                    path: from,
                    reason,
                }
            };
            actions.push(action);
        }
    }

    tracing::debug!(actions = actions.len(), "planned deploy");
    Ok(DeployPlan {
        source_root: ctx.source_root().to_path_buf(),
        destination_root: ctx.destination_root().to_path_buf(),
        actions,
        missing,
    })
}

/// Metadata of `path` with symlinks followed, or `None` for a dangling link.
fn entry_metadata(path: &Path) -> DeployResult<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(err) if err.kind() == io::ErrorKind::NotFound && fs::symlink_metadata(path).is_ok() => {
            Ok(None)
        }
        Err(source) => Err(DeployError::Metadata {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn source_dir_exists(dir: &Path) -> DeployResult<bool> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(DeployError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(DeployError::Metadata {
            path: dir.to_path_buf(),
            source,
        }),
    }
}
