//! Console rendering for plans and reports.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use ndeploy_core::deploy::{
    ActionOutcome, Category, DeployAction, DeployObserver, DeployPlan, DeployReport, SkipReason,
};

/// Prints one line per created directory and applied action.
pub struct ConsoleObserver {
    enabled: bool,
}

impl ConsoleObserver {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl DeployObserver for ConsoleObserver {
    fn directory_created(&mut self, path: &Path) {
        if self.enabled {
            println!("✅ Created directory: {}", path.display());
        }
    }

    fn action_applied(&mut self, outcome: &ActionOutcome) {
        if self.enabled {
            println!("{}", describe(&outcome.action));
        }
    }
}

fn describe(action: &DeployAction) -> String {
    match action {
        DeployAction::CopyFile { category, name, .. } => match category {
            Category::Credentials => format!("✅ Copied credential: {name}"),
            Category::Nodes => format!("✅ Copied node file: {name}"),
        },
        DeployAction::ReplaceDir { category, name, .. } => {
            format!("✅ Copied {} directory: {name}", category.label())
        }
        DeployAction::Skip {
            category,
            name,
            reason,
            ..
        } => format!(
            "⏭  Skipped {}/{name} ({})",
            category.dir_name(),
            skip_reason(*reason)
        ),
    }
}

fn skip_reason(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::DirectoryNotCopied => "directories are not copied here",
        SkipReason::UnsupportedEntry => "not a file or directory",
    }
}

pub fn print_start_banner() {
    println!(
        "{}",
        style("🚀 Copying n8n custom nodes to development environment...").bold()
    );
}

pub fn print_plan_table(plan: &DeployPlan) {
    println!("Source:      {}", plan.source_root.display());
    println!("Destination: {}", plan.destination_root.display());
    println!();

    for category in plan.missing.iter() {
        println!(
            "• No {} directory in source, nothing to copy",
            category.dir_name()
        );
    }

    if plan.actions.is_empty() {
        println!("Nothing to deploy.");
        return;
    }

    for action in &plan.actions {
        let line = match action {
            DeployAction::CopyFile { from, to, .. } => {
                format!("copy     {} -> {}", from.display(), to.display())
            }
            DeployAction::ReplaceDir { from, to, .. } => {
                format!("replace  {} -> {}", from.display(), to.display())
            }
            DeployAction::Skip { path, reason, .. } => {
                format!("skip     {} ({})", path.display(), skip_reason(*reason))
            }
        };
        println!("  {line}");
    }
}

pub fn print_report_table(report: &DeployReport, show_tree: bool) {
    for category in report.missing.iter() {
        println!(
            "• No {} directory in source, nothing to copy",
            category.dir_name()
        );
    }

    println!();
    println!("{}", style("🎉 File copy complete!").bold().green());
    println!("📍 Files installed to: {}", report.destination_root.display());
    println!("🔄 Please refresh your n8n browser tab to load the new nodes");

    if let Some(outcomes) = &report.verification {
        let mismatched: Vec<_> = outcomes.iter().filter(|o| !o.matches()).collect();
        if mismatched.is_empty() {
            println!("🔍 Verified {} deployed entries", outcomes.len());
        } else {
            for outcome in mismatched {
                println!(
                    "{} {}",
                    style("❌ Mismatch:").red(),
                    outcome.path.display()
                );
            }
        }
    }

    if show_tree {
        println!();
        println!("📋 Deployed files:");
        print!("{}", report.tree);
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// JSON document for a failed run: `{"error": "<message with context chain>"}`.
pub fn error_json(err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({ "error": format!("{err:#}") })
}
