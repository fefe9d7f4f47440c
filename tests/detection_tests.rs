//! Package manager detection against real workspace directories

use std::fs;
use std::path::Path;

use pkgpilot::{Detector, LOCK_FILE_RULES, PackageManagerId, has_manifest, manifest_path};
use tempfile::TempDir;

/// Temporary workspace with helpers for dropping files into it
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp workspace"),
        }
    }

    fn with_files(names: &[&str]) -> Self {
        let workspace = Self::new();
        for name in names {
            workspace.touch(name);
        }
        workspace
    }

    fn touch(&self, name: &str) {
        fs::write(self.path().join(name), "").expect("write workspace file");
    }

    fn remove(&self, name: &str) {
        fs::remove_file(self.path().join(name)).expect("remove workspace file");
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[test]
fn each_lock_file_alone_selects_its_manager() {
    for rule in LOCK_FILE_RULES {
        let workspace = Workspace::with_files(&[rule.file_name]);
        let detected = Detector::default().detect(Some(workspace.path()));
        assert_eq!(detected, rule.manager, "lock file {}", rule.file_name);
    }
}

#[test]
fn pnpm_wins_over_yarn_and_npm() {
    let workspace = Workspace::with_files(&["pnpm-lock.yaml", "yarn.lock", "package-lock.json"]);
    assert_eq!(
        Detector::default().detect(Some(workspace.path())),
        PackageManagerId::Pnpm
    );
}

#[test]
fn yarn_wins_over_bun_and_npm() {
    let workspace = Workspace::with_files(&["package-lock.json", "bun.lockb", "yarn.lock"]);
    assert_eq!(
        Detector::default().detect(Some(workspace.path())),
        PackageManagerId::Yarn
    );
}

#[test]
fn no_lock_file_without_configuration_is_npm() {
    let workspace = Workspace::with_files(&["package.json"]);
    assert_eq!(
        Detector::default().detect(Some(workspace.path())),
        PackageManagerId::Npm
    );
}

#[test]
fn no_lock_file_uses_configured_default() {
    let workspace = Workspace::with_files(&["package.json"]);
    let detector = Detector::new(PackageManagerId::Bun);
    assert_eq!(detector.detect(Some(workspace.path())), PackageManagerId::Bun);
}

#[test]
fn lock_file_overrides_configured_default() {
    let workspace = Workspace::with_files(&["yarn.lock"]);
    let detector = Detector::new(PackageManagerId::Bun);
    assert_eq!(detector.detect(Some(workspace.path())), PackageManagerId::Yarn);
}

#[test]
fn no_workspace_is_npm() {
    assert_eq!(Detector::new(PackageManagerId::Pnpm).detect(None), PackageManagerId::Npm);
}

#[test]
fn detection_follows_lock_file_changes_between_calls() {
    let workspace = Workspace::with_files(&["package-lock.json"]);
    let detector = Detector::default();
    assert_eq!(detector.detect(Some(workspace.path())), PackageManagerId::Npm);

    workspace.touch("pnpm-lock.yaml");
    assert_eq!(detector.detect(Some(workspace.path())), PackageManagerId::Pnpm);

    workspace.remove("pnpm-lock.yaml");
    workspace.remove("package-lock.json");
    workspace.touch("bun.lockb");
    assert_eq!(detector.detect(Some(workspace.path())), PackageManagerId::Bun);
}

#[test]
fn lock_files_present_lists_in_priority_order() {
    let workspace = Workspace::with_files(&["package-lock.json", "bun.lockb"]);
    let names: Vec<&str> = Detector::default()
        .lock_files_present(workspace.path())
        .iter()
        .map(|rule| rule.file_name)
        .collect();
    assert_eq!(names, ["bun.lockb", "package-lock.json"]);
}

#[test]
fn manifest_helpers() {
    let workspace = Workspace::new();
    assert!(!has_manifest(workspace.path()));
    assert_eq!(manifest_path(workspace.path()), None);

    workspace.touch("package.json");
    assert!(has_manifest(workspace.path()));
    assert_eq!(
        manifest_path(workspace.path()),
        Some(workspace.path().join("package.json"))
    );
}

#[test]
fn lock_file_directory_named_like_a_lock_file_still_counts() {
    // Existence is the only signal; the file's content is never read
    let workspace = Workspace::new();
    fs::create_dir(workspace.path().join("yarn.lock")).unwrap();
    assert_eq!(
        Detector::default().detect(Some(workspace.path())),
        PackageManagerId::Yarn
    );
}
