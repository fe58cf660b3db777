//! Execute deploy plans against the destination tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::DeployContext;
use crate::error::DeployResult;
use crate::fs::{copy_file_with_metadata, ensure_dir, replace_dir};
use crate::tree::render_tree;

use super::plan::{Category, DeployAction, DeployPlan, plan};
use super::verify::{VerifyOutcome, verify};

/// Progress callbacks for frontends.
pub trait DeployObserver {
    fn directory_created(&mut self, _path: &Path) {}
    fn action_applied(&mut self, _outcome: &ActionOutcome) {}
}

/// Observer that ignores all progress.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl DeployObserver for NoopObserver {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    #[serde(flatten)]
    pub action: DeployAction,
    /// Whether something already existed at the destination and was
    /// overwritten or replaced.
    pub replaced_existing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub destination_root: PathBuf,
    pub created_dirs: Vec<PathBuf>,
    pub outcomes: Vec<ActionOutcome>,
    pub missing: Vec<Category>,
    pub verification: Option<Vec<VerifyOutcome>>,
    pub tree: String,
}

impl DeployReport {
    pub fn copied(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.action.is_skip())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| o.action.is_skip())
    }

    pub fn verification_failed(&self) -> bool {
        self.verification
            .as_ref()
            .is_some_and(|outcomes| outcomes.iter().any(|o| !o.matches()))
    }
}

/// Plan and execute a deploy with no progress reporting.
pub fn deploy(ctx: &DeployContext) -> DeployResult<DeployReport> {
    let plan = plan(ctx)?;
    execute(ctx, &plan, &mut NoopObserver)
}

/// Apply `plan` to the destination.
///
/// Creates the destination root with its `nodes` and `credentials`
/// children, applies every action in order, optionally verifies, and renders
/// the resulting tree. The first failure aborts the run; actions already
/// applied stay applied.
pub fn execute(
    ctx: &DeployContext,
    plan: &DeployPlan,
    observer: &mut dyn DeployObserver,
) -> DeployResult<DeployReport> {
    let root = ctx.destination_root();
    tracing::info!(
        source = %ctx.source_root().display(),
        destination = %root.display(),
        "deploying"
    );

    let mut created_dirs = Vec::new();
    let required = [
        root.to_path_buf(),
        ctx.category_destination(Category::Nodes),
        ctx.category_destination(Category::Credentials),
    ];
    for dir in required {
        if ensure_dir(&dir)? {
            tracing::debug!(path = %dir.display(), "created directory");
            observer.directory_created(&dir);
            created_dirs.push(dir);
        }
    }

    let mut outcomes = Vec::with_capacity(plan.actions.len());
    for action in &plan.actions {
        let outcome = apply(action)?;
        observer.action_applied(&outcome);
        outcomes.push(outcome);
    }

    let verification = if ctx.verify() {
        Some(verify(plan)?)
    } else {
        None
    };

    let tree = render_tree(root)?;
    tracing::info!(applied = outcomes.len(), "deploy complete");

    Ok(DeployReport {
        destination_root: root.to_path_buf(),
        created_dirs,
        outcomes,
        missing: plan.missing.clone(),
        verification,
        tree,
    })
}

fn apply(action: &DeployAction) -> DeployResult<ActionOutcome> {
    let replaced_existing = match action {
        DeployAction::CopyFile { from, to, .. } => {
            let existed = fs::symlink_metadata(to).is_ok();
            copy_file_with_metadata(from, to)?;
            tracing::debug!(from = %from.display(), to = %to.display(), "copied file");
            existed
        }
        DeployAction::ReplaceDir { from, to, .. } => {
            let replaced = replace_dir(from, to)?;
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                replaced,
                "copied directory"
            );
            replaced
        }
        DeployAction::Skip { path, reason, .. } => {
            tracing::debug!(path = %path.display(), ?reason, "skipped entry");
            false
        }
    };

    Ok(ActionOutcome {
        action: action.clone(),
        replaced_existing,
    })
}
