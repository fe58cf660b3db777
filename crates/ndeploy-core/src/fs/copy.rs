//! Copy primitives that keep file metadata.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{DeployError, DeployResult};

/// Create `dir` and any missing parents. Returns `true` if it did not exist.
pub fn ensure_dir(dir: &Path) -> DeployResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|source| DeployError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Copy a regular file, overwriting `to`, then carry over access and
/// modification times. Permission bits are carried by `fs::copy`.
pub fn copy_file_with_metadata(from: &Path, to: &Path) -> DeployResult<()> {
    let meta = fs::metadata(from).map_err(|source| DeployError::Metadata {
        path: from.to_path_buf(),
        source,
    })?;

    fs::copy(from, to).map_err(|source| DeployError::CopyFile {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;

    copy_times(&meta, to)
}

/// Recursively copy directory `from` into `to`, creating `to` as needed.
/// Symlinks are followed and their targets copied.
pub fn copy_tree(from: &Path, to: &Path) -> DeployResult<()> {
    fs::create_dir_all(to).map_err(|source| DeployError::CreateDir {
        path: to.to_path_buf(),
        source,
    })?;

    for entry in read_dir_sorted(from)? {
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let ty = fs::metadata(&src).map_err(|source| DeployError::Metadata {
            path: src.clone(),
            source,
        })?;

        if ty.is_dir() {
            copy_tree(&src, &dst)?;
        } else if ty.is_file() {
            copy_file_with_metadata(&src, &dst)?;
        } else {
            return Err(DeployError::UnsupportedEntry { path: src });
        }
    }

    // Children are written first so their writes don't bump the copied mtime,
    // and the mode goes last in case it drops write access.
    let meta = fs::metadata(from).map_err(|source| DeployError::Metadata {
        path: from.to_path_buf(),
        source,
    })?;
    copy_times(&meta, to)?;
    fs::set_permissions(to, meta.permissions()).map_err(|source| DeployError::SetPermissions {
        path: to.to_path_buf(),
        source,
    })
}

/// Remove a directory tree, file, or symlink at `path`.
pub fn remove_path(path: &Path) -> DeployResult<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) => Err(err),
    };
    result.map_err(|source| DeployError::RemovePath {
        path: path.to_path_buf(),
        source,
    })
}

/// Make `to` an exact replica of directory `from`, discarding whatever was
/// there before. Returns `true` if an existing entry was replaced.
///
/// The copy is staged in a sibling temp directory and only swapped in once
/// complete, so a failed copy leaves the previous destination in place.
pub fn replace_dir(from: &Path, to: &Path) -> DeployResult<bool> {
    let staging = unique_temp_path(to)?;

    if let Err(err) = copy_tree(from, &staging) {
        let _ = fs::remove_dir_all(&staging);
        return Err(err);
    }

    let existed = fs::symlink_metadata(to).is_ok();
    if existed && let Err(err) = remove_path(to) {
        let _ = fs::remove_dir_all(&staging);
        return Err(err);
    }

    swap_into_place(&staging, to)?;
    Ok(existed)
}

/// Rename the finished staging directory onto `to`, dropping it on failure.
fn swap_into_place(staging: &Path, to: &Path) -> DeployResult<()> {
    fs::rename(staging, to).map_err(|source| {
        let _ = fs::remove_dir_all(staging);
        DeployError::Rename {
            from: staging.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    })
}

pub(crate) fn read_dir_sorted(dir: &Path) -> DeployResult<Vec<fs::DirEntry>> {
    let entries = fs::read_dir(dir).map_err(|source| DeployError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries = entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DeployError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn copy_times(meta: &fs::Metadata, to: &Path) -> DeployResult<()> {
    let atime = FileTime::from_last_access_time(meta);
    let mtime = FileTime::from_last_modification_time(meta);
    filetime::set_file_times(to, atime, mtime).map_err(|source| DeployError::SetFileTimes {
        path: to.to_path_buf(),
        source,
    })
}

fn unique_temp_path(dst: &Path) -> DeployResult<PathBuf> {
    let parent = dst.parent().ok_or_else(|| DeployError::NotADirectory {
        path: dst.to_path_buf(),
    })?;
    let base = dst
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for attempt in 0u32..1000 {
        let name = if attempt == 0 {
            format!(".{}.tmp.{}", base, std::process::id())
        } else {
            format!(".{}.tmp.{}.{}", base, std::process::id(), attempt)
        };
        let candidate = parent.join(name);
        if fs::symlink_metadata(&candidate).is_err() {
            return Ok(candidate);
        }
    }

    Err(DeployError::CreateDir {
        path: dst.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "failed to allocate a unique temp path",
        ),
    })
}
