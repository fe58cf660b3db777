//! Post-deploy content verification.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::DeployResult;
use crate::fs::{hash_file, hash_tree};

use super::plan::{DeployAction, DeployPlan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub path: PathBuf,
    pub expected: String,
    /// `None` when the destination entry is missing.
    pub actual: Option<String>,
}

impl VerifyOutcome {
    pub fn matches(&self) -> bool {
        self.actual.as_deref() == Some(self.expected.as_str())
    }
}

/// Compare every copied file and replaced directory against its source.
///
/// Files are compared by content hash, directories by tree hash, so a
/// directory with a leftover stale file does not match. Source read failures
/// are errors; a missing or unreadable destination is reported as a mismatch.
pub fn verify(plan: &DeployPlan) -> DeployResult<Vec<VerifyOutcome>> {
    let mut outcomes = Vec::new();

    for action in &plan.actions {
        let outcome = match action {
            DeployAction::CopyFile { from, to, .. } => compare(from, to, hash_file)?,
            DeployAction::ReplaceDir { from, to, .. } => compare(from, to, hash_tree)?,
            DeployAction::Skip { .. } => continue,
        };
        if !outcome.matches() {
            tracing::warn!(path = %outcome.path.display(), "destination does not match source");
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn compare(
    from: &Path,
    to: &Path,
    hash: fn(&Path) -> DeployResult<String>,
) -> DeployResult<VerifyOutcome> {
    let expected = hash(from)?;
    let actual = hash(to).ok();
    Ok(VerifyOutcome {
        path: to.to_path_buf(),
        expected,
        actual,
    })
}
