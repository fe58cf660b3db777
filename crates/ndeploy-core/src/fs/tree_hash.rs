//! Deterministic content hashing for deploy verification
//!
//! A tree hash covers relative paths and file contents only, so a copied
//! tree hashes the same as its source regardless of timestamps, inode
//! numbers or creation order.

use std::fs;
use std::path::Path;

use crate::error::{DeployError, DeployResult};
use crate::fs::copy::read_dir_sorted;

/// Compute deterministic tree hash of a directory
///
/// # Algorithm
/// - Recursive directory traversal, entries sorted by name
/// - Directory: `relative_path || 0xFF`
/// - File: `relative_path || 0x00 || len(content) as u64 LE || content`
/// - Output: blake3 hex string
///
/// Empty directories are included. Symlinks are followed, matching how
/// [`crate::fs::copy_tree`] materializes them.
pub fn hash_tree(path: &Path) -> DeployResult<String> {
    let mut hasher = blake3::Hasher::new();
    hash_dir_recursive(&mut hasher, path, "")?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// blake3 hex digest of a single file's content.
pub fn hash_file(path: &Path) -> DeployResult<String> {
    let content = fs::read(path).map_err(|source| DeployError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(blake3::hash(&content).to_hex().to_string())
}

fn hash_dir_recursive(hasher: &mut blake3::Hasher, dir: &Path, base: &str) -> DeployResult<()> {
    for entry in read_dir_sorted(dir)? {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        let rel_path = if base.is_empty() {
            name_str.to_string()
        } else {
            format!("{}/{}", base, name_str)
        };

        let ty = fs::metadata(entry.path()).map_err(|source| DeployError::Metadata {
            path: entry.path(),
            source,
        })?;

        if ty.is_dir() {
            hasher.update(rel_path.as_bytes());
            hasher.update(&[0xFF]);
            hash_dir_recursive(hasher, &entry.path(), &rel_path)?;
        } else if ty.is_file() {
            hasher.update(rel_path.as_bytes());
            hasher.update(&[0x00]);
            let content = fs::read(entry.path()).map_err(|source| DeployError::ReadFile {
                path: entry.path(),
                source,
            })?;
            hasher.update(&(content.len() as u64).to_le_bytes());
            hasher.update(&content);
        } else {
            return Err(DeployError::UnsupportedEntry { path: entry.path() });
        }
    }

    Ok(())
}
