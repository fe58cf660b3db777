//! Error types for deploy operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type DeployResult<T> = Result<T, DeployError>;

/// Every failure that aborts a deploy run.
///
/// Variants carry the path(s) involved and the underlying I/O error so callers
/// can tell failure kinds apart without matching on message text.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    #[error("Failed to create directory: {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read directory: {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to stat: {}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy file from {} to {}", .from.display(), .to.display())]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to set file times: {}", .path.display())]
    SetFileTimes {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to set permissions: {}", .path.display())]
    SetPermissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename {} to {}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove existing destination: {}", .path.display())]
    RemovePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file: {}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported filesystem entry type at {}", .path.display())]
    UnsupportedEntry { path: PathBuf },

    #[error("Expected a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl DeployError {
    /// The primary path the failure is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            DeployError::HomeDirUnavailable => None,
            DeployError::CreateDir { path, .. }
            | DeployError::ReadDir { path, .. }
            | DeployError::Metadata { path, .. }
            | DeployError::SetFileTimes { path, .. }
            | DeployError::SetPermissions { path, .. }
            | DeployError::RemovePath { path, .. }
            | DeployError::ReadFile { path, .. }
            | DeployError::UnsupportedEntry { path }
            | DeployError::NotADirectory { path }
            | DeployError::Config { path, .. } => Some(path),
            DeployError::CopyFile { from, .. } | DeployError::Rename { from, .. } => Some(from),
        }
    }
}
