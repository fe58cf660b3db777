//! Indented listing of a directory tree for operator confirmation.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{DeployError, DeployResult};
use crate::fs::copy::read_dir_sorted;

const INDENT: &str = "  ";

/// Render `root` as one line per entry, indented two spaces per level.
///
/// Directories end in `/`. A directory's files are listed before its
/// subdirectories, each group sorted by name. Symlinks are listed by name and
/// not followed.
///
/// ```text
/// custom/
///   credentials/
///     InstantlyApi.credentials.js
///   nodes/
///     generic.functions.js
///     Instantly/
///       Instantly.node.js
/// ```
pub fn render_tree(root: &Path) -> DeployResult<String> {
    let mut out = String::new();
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    render_dir(&mut out, root, &name, 0)?;
    Ok(out)
}

fn render_dir(out: &mut String, dir: &Path, name: &str, level: usize) -> DeployResult<()> {
    let _ = writeln!(out, "{}{}/", INDENT.repeat(level), name);

    let mut subdirs = Vec::new();
    for entry in read_dir_sorted(dir)? {
        let ty = entry.file_type().map_err(|source| DeployError::Metadata {
            path: entry.path(),
            source,
        })?;
        let entry_name = entry.file_name().to_string_lossy().into_owned();
        if ty.is_dir() {
            subdirs.push((entry.path(), entry_name));
        } else {
            let _ = writeln!(out, "{}{}", INDENT.repeat(level + 1), entry_name);
        }
    }

    for (path, entry_name) in subdirs {
        render_dir(out, &path, &entry_name, level + 1)?;
    }
    Ok(())
}
