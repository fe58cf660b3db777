//! End-to-end tests for planning and executing deploys against temp trees.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;

use ndeploy_core::context::DeployContext;
use ndeploy_core::deploy::{
    ActionOutcome, DeployAction, DeployObserver, NoopObserver, deploy, execute, plan,
};
use ndeploy_core::fs::hash_tree;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
    }
    fs::write(path, content).expect("write should succeed in test temp dirs");
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read should succeed in test temp dirs")
}

struct Layout {
    _tmp: TempDir,
    src: PathBuf,
    dst: PathBuf,
}

impl Layout {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let src = tmp.path().join("project").join("dist").join("src");
        let dst = tmp
            .path()
            .join("home")
            .join(".n8n-dev")
            .join(".n8n")
            .join("custom");
        Self {
            _tmp: tmp,
            src,
            dst,
        }
    }

    fn ctx(&self) -> DeployContext {
        DeployContext::new(self.src.clone(), self.dst.clone())
    }
}

#[test]
fn credentials_are_copied_and_extras_survive() {
    let layout = Layout::new();
    write_file(&layout.src.join("credentials").join("a"), "alpha");
    write_file(&layout.src.join("credentials").join("b"), "beta");
    write_file(&layout.dst.join("credentials").join("c"), "unrelated");

    deploy(&layout.ctx()).expect("deploy should succeed");

    assert_eq!(read(&layout.dst.join("credentials").join("a")), "alpha");
    assert_eq!(read(&layout.dst.join("credentials").join("b")), "beta");
    assert_eq!(read(&layout.dst.join("credentials").join("c")), "unrelated");
}

#[test]
fn stale_node_directory_is_replaced_not_merged() {
    let layout = Layout::new();
    write_file(&layout.src.join("nodes").join("Foo").join("index.js"), "new");
    write_file(&layout.dst.join("nodes").join("Foo").join("old.js"), "stale");

    let report = deploy(&layout.ctx()).expect("deploy should succeed");

    let mut names: Vec<_> = fs::read_dir(layout.dst.join("nodes").join("Foo"))
        .expect("read_dir should succeed")
        .map(|e| e.expect("entry should be readable").file_name())
        .collect();
    names.sort();
    assert_eq!(names, vec!["index.js"]);
    assert!(report.outcomes[0].replaced_existing);
}

#[test]
fn second_run_yields_identical_tree() {
    let layout = Layout::new();
    write_file(&layout.src.join("credentials").join("Api.credentials.js"), "c");
    write_file(&layout.src.join("nodes").join("Single.node.js"), "s");
    write_file(&layout.src.join("nodes").join("Bundle").join("x.js"), "x");

    let first = deploy(&layout.ctx()).expect("first deploy should succeed");
    let hash_after_first = hash_tree(&layout.dst).expect("hash_tree should succeed");
    let second = deploy(&layout.ctx()).expect("second deploy should succeed");
    let hash_after_second = hash_tree(&layout.dst).expect("hash_tree should succeed");

    assert_eq!(hash_after_first, hash_after_second);
    assert_eq!(first.tree, second.tree);
    assert_eq!(first.created_dirs.len(), 3);
    assert!(second.created_dirs.is_empty());
}

#[test]
fn missing_credentials_source_is_not_an_error() {
    let layout = Layout::new();
    write_file(&layout.dst.join("credentials").join("kept"), "previous run");
    write_file(&layout.src.join("nodes").join("a.js"), "a");

    let report = deploy(&layout.ctx()).expect("deploy should succeed");

    assert_eq!(report.missing, vec![ndeploy_core::deploy::Category::Credentials]);
    assert_eq!(read(&layout.dst.join("credentials").join("kept")), "previous run");
}

#[test]
fn missing_source_entirely_creates_empty_destination() {
    let layout = Layout::new();

    let report = deploy(&layout.ctx()).expect("deploy should succeed");

    assert!(layout.dst.join("nodes").is_dir());
    assert!(layout.dst.join("credentials").is_dir());
    assert!(report.outcomes.is_empty());
    assert_eq!(report.tree, "custom/\n  credentials/\n  nodes/\n");
}

#[test]
fn single_file_and_bundle_land_in_nodes() {
    let layout = Layout::new();
    write_file(&layout.src.join("nodes").join("SingleFile.js"), "s");
    write_file(&layout.src.join("nodes").join("Bundle").join("x.js"), "x");
    write_file(&layout.src.join("nodes").join("Bundle").join("y.js"), "y");

    deploy(&layout.ctx()).expect("deploy should succeed");

    let nodes = layout.dst.join("nodes");
    assert!(nodes.join("SingleFile.js").is_file());
    assert_eq!(read(&nodes.join("Bundle").join("x.js")), "x");
    assert_eq!(read(&nodes.join("Bundle").join("y.js")), "y");
}

#[test]
fn credential_subdirectories_are_not_copied() {
    let layout = Layout::new();
    write_file(&layout.src.join("credentials").join("nested").join("x.js"), "x");

    let report = deploy(&layout.ctx()).expect("deploy should succeed");

    assert!(!layout.dst.join("credentials").join("nested").exists());
    assert_eq!(report.skipped().count(), 1);
    assert_eq!(report.copied().count(), 0);
}

#[cfg(unix)]
#[test]
fn dangling_symlinks_are_skipped_not_fatal() {
    let layout = Layout::new();
    write_file(&layout.src.join("nodes").join("a.js"), "a");
    write_file(&layout.src.join("credentials").join("Api.credentials.js"), "c");
    for category in ["nodes", "credentials"] {
        std::os::unix::fs::symlink(
            "/nonexistent/target",
            layout.src.join(category).join("broken.js"),
        )
        .expect("symlink should succeed");
    }

    let report = deploy(&layout.ctx()).expect("deploy should succeed");

    assert_eq!(read(&layout.dst.join("nodes").join("a.js")), "a");
    assert_eq!(
        read(&layout.dst.join("credentials").join("Api.credentials.js")),
        "c"
    );
    assert!(fs::symlink_metadata(layout.dst.join("nodes").join("broken.js")).is_err());
    assert!(fs::symlink_metadata(layout.dst.join("credentials").join("broken.js")).is_err());
    assert_eq!(report.copied().count(), 2);
    let skipped: Vec<_> = report.skipped().map(|o| o.action.name()).collect();
    assert_eq!(skipped, vec!["broken.js", "broken.js"]);
}

#[test]
fn copied_files_keep_source_mtime() {
    let layout = Layout::new();
    let src = layout.src.join("nodes").join("Bundle").join("x.js");
    write_file(&src, "x");
    let stamp = FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_mtime(&src, stamp).expect("set mtime should succeed");

    deploy(&layout.ctx()).expect("deploy should succeed");

    let meta = fs::metadata(layout.dst.join("nodes").join("Bundle").join("x.js"))
        .expect("metadata should succeed");
    assert_eq!(FileTime::from_last_modification_time(&meta), stamp);
}

#[test]
fn verification_matches_after_deploy() {
    let layout = Layout::new();
    write_file(&layout.src.join("credentials").join("a"), "alpha");
    write_file(&layout.src.join("nodes").join("Foo").join("index.js"), "foo");

    let report = deploy(&layout.ctx().with_verify(true)).expect("deploy should succeed");

    let outcomes = report.verification.as_ref().expect("verification should run");
    assert_eq!(outcomes.len(), 2);
    assert!(!report.verification_failed());
}

#[test]
fn verification_detects_tampering() {
    let layout = Layout::new();
    write_file(&layout.src.join("nodes").join("Foo").join("index.js"), "foo");
    let ctx = layout.ctx();

    let planned = plan(&ctx).expect("plan should succeed");
    execute(&ctx, &planned, &mut NoopObserver).expect("execute should succeed");
    write_file(&layout.dst.join("nodes").join("Foo").join("extra.js"), "tampered");

    let outcomes = ndeploy_core::deploy::verify(&planned).expect("verify should succeed");
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].matches());
}

#[test]
fn unreadable_source_aborts_with_path() {
    let layout = Layout::new();
    write_file(&layout.src.join("nodes").join("Foo").join("index.js"), "foo");
    let ctx = layout.ctx();
    let planned = plan(&ctx).expect("plan should succeed");

    fs::remove_dir_all(layout.src.join("nodes").join("Foo")).expect("remove should succeed");

    let err = execute(&ctx, &planned, &mut NoopObserver).unwrap_err();
    assert_eq!(
        err.path(),
        Some(layout.src.join("nodes").join("Foo").as_path())
    );
}

#[derive(Default)]
struct Recorder {
    created: Vec<PathBuf>,
    applied: Vec<String>,
}

impl DeployObserver for Recorder {
    fn directory_created(&mut self, path: &Path) {
        self.created.push(path.to_path_buf());
    }

    fn action_applied(&mut self, outcome: &ActionOutcome) {
        self.applied.push(outcome.action.name().to_string());
    }
}

#[test]
fn observer_sees_every_step_in_order() {
    let layout = Layout::new();
    write_file(&layout.src.join("credentials").join("Api.credentials.js"), "c");
    write_file(&layout.src.join("nodes").join("b.js"), "b");
    write_file(&layout.src.join("nodes").join("A").join("index.js"), "a");
    let ctx = layout.ctx();

    let planned = plan(&ctx).expect("plan should succeed");
    let mut recorder = Recorder::default();
    execute(&ctx, &planned, &mut recorder).expect("execute should succeed");

    assert_eq!(
        recorder.created,
        vec![
            layout.dst.clone(),
            layout.dst.join("nodes"),
            layout.dst.join("credentials"),
        ]
    );
    assert_eq!(recorder.applied, vec!["Api.credentials.js", "A", "b.js"]);
}

#[test]
fn report_serializes_actions_with_tags() {
    let layout = Layout::new();
    write_file(&layout.src.join("nodes").join("a.js"), "a");

    let report = deploy(&layout.ctx()).expect("deploy should succeed");
    let json = serde_json::to_value(&report).expect("report should serialize");

    assert_eq!(json["outcomes"][0]["action"], "copy_file");
    assert_eq!(json["outcomes"][0]["category"], "nodes");
    assert_eq!(json["outcomes"][0]["replaced_existing"], false);
    assert!(matches!(
        report.outcomes[0].action,
        DeployAction::CopyFile { .. }
    ));
}
