//! Package manager detection and command synthesis
//!
//! Detects which package manager governs a workspace by looking for lock
//! files, and builds the exact command line each manager expects for the
//! supported operations.
//!
//! # Design
//!
//! - **Per-call detection**: nothing is cached. Lock files can appear or
//!   disappear between two operations (an install writes one), so every
//!   call re-reads the filesystem.
//! - **Safe default**: no workspace means `npm`; a workspace without any
//!   lock file means the configured default.
//! - **Total builders**: command synthesis never fails. Identifiers are
//!   validated before they get here (see [`crate::validation`]).

use std::path::{Path, PathBuf};

use crate::intent::CommandLine;
use crate::types::PackageManagerId;

/// File name of the workspace manifest
pub const MANIFEST_FILE: &str = "package.json";

/// A lock file name and the manager it identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockFileRule {
    pub file_name: &'static str,
    pub manager: PackageManagerId,
}

/// Detection priority. The first lock file found on disk wins.
pub const LOCK_FILE_RULES: &[LockFileRule] = &[
    LockFileRule {
        file_name: "pnpm-lock.yaml",
        manager: PackageManagerId::Pnpm,
    },
    LockFileRule {
        file_name: "yarn.lock",
        manager: PackageManagerId::Yarn,
    },
    LockFileRule {
        file_name: "bun.lockb",
        manager: PackageManagerId::Bun,
    },
    LockFileRule {
        file_name: "package-lock.json",
        manager: PackageManagerId::Npm,
    },
];

/// Filesystem existence check used by detection.
///
/// Abstracted so callers can detect against something other than the local
/// disk (a remote workspace, a test double).
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// [`FileProbe`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileProbe for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Resolves the package manager for a workspace.
///
/// Holds only the fallback used when a workspace has no lock file. The
/// detected manager itself is never stored.
#[derive(Debug, Clone)]
pub struct Detector<P: FileProbe = LocalFs> {
    probe: P,
    fallback: PackageManagerId,
}

impl Detector<LocalFs> {
    /// Detector over the local filesystem
    pub fn new(fallback: PackageManagerId) -> Self {
        Self::with_probe(LocalFs, fallback)
    }
}

impl Default for Detector<LocalFs> {
    fn default() -> Self {
        Self::new(PackageManagerId::default())
    }
}

impl<P: FileProbe> Detector<P> {
    pub fn with_probe(probe: P, fallback: PackageManagerId) -> Self {
        Self { probe, fallback }
    }

    /// Detect the package manager for `root`.
    ///
    /// Returns `npm` when there is no workspace, the manager of the first
    /// lock file found in [`LOCK_FILE_RULES`] order otherwise, and the
    /// configured fallback when the workspace has no lock file at all.
    pub fn detect(&self, root: Option<&Path>) -> PackageManagerId {
        let Some(root) = root else {
            tracing::debug!("No workspace root, defaulting to npm");
            return PackageManagerId::Npm;
        };

        let present = self.lock_files_present(root);
        match present.as_slice() {
            [] => {
                tracing::debug!(
                    root = %root.display(),
                    fallback = %self.fallback,
                    "No lock file found, using configured default"
                );
                self.fallback
            }
            [only] => {
                tracing::debug!(root = %root.display(), lock_file = only.file_name, "Detected {}", only.manager);
                only.manager
            }
            [first, ..] => {
                let names: Vec<&str> = present.iter().map(|rule| rule.file_name).collect();
                tracing::info!(
                    root = %root.display(),
                    lock_files = ?names,
                    "Multiple lock files present, using {} ({})",
                    first.manager,
                    first.file_name
                );
                first.manager
            }
        }
    }

    /// Every lock file present in `root`, in priority order
    pub fn lock_files_present(&self, root: &Path) -> Vec<LockFileRule> {
        LOCK_FILE_RULES
            .iter()
            .filter(|rule| self.probe.exists(&root.join(rule.file_name)))
            .copied()
            .collect()
    }

    /// Whether `root` contains a manifest
    pub fn has_manifest(&self, root: &Path) -> bool {
        self.probe.exists(&root.join(MANIFEST_FILE))
    }

    /// Path to the manifest in `root`, if it exists
    pub fn manifest_path(&self, root: &Path) -> Option<PathBuf> {
        let path = root.join(MANIFEST_FILE);
        self.probe.exists(&path).then_some(path)
    }
}

/// Whether `root` contains a manifest on the local filesystem
pub fn has_manifest(root: &Path) -> bool {
    Detector::default().has_manifest(root)
}

/// Path to the manifest in `root` on the local filesystem, if it exists
pub fn manifest_path(root: &Path) -> Option<PathBuf> {
    Detector::default().manifest_path(root)
}

impl PackageManagerId {
    /// Install command.
    ///
    /// Without a package this installs everything in the manifest. With a
    /// package it adds that one token verbatim (it may carry an `@version`
    /// suffix), followed by the manager's dev flag when `dev` is set.
    pub fn install_command(self, package: Option<&str>, dev: bool) -> CommandLine {
        let cmd = CommandLine::new(self.program());
        match package {
            None => cmd.arg("install"),
            Some(package) => {
                let cmd = cmd.arg(self.add_verb()).arg(package);
                if dev { cmd.arg(self.dev_flag()) } else { cmd }
            }
        }
    }

    pub fn remove_command(self, package: &str) -> CommandLine {
        CommandLine::new(self.program())
            .arg(self.remove_verb())
            .arg(package)
    }

    /// Update command.
    ///
    /// Always re-adds the package with an explicit version (default
    /// `latest`). The managers' own `update`/`upgrade` subcommands respect
    /// the range already in the manifest and never cross a major version.
    pub fn update_command(self, package: &str, version: Option<&str>) -> CommandLine {
        let version = version.unwrap_or("latest");
        CommandLine::new(self.program())
            .arg(self.add_verb())
            .arg(format!("{}@{}", package, version))
    }

    pub fn audit_command(self) -> CommandLine {
        CommandLine::new(self.program()).arg("audit")
    }

    /// Script command. Yarn runs scripts without the `run` keyword.
    pub fn run_command(self, script: &str) -> CommandLine {
        let cmd = CommandLine::new(self.program());
        match self {
            Self::Yarn => cmd.arg(script),
            Self::Npm | Self::Pnpm | Self::Bun => cmd.arg("run").arg(script),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    /// Probe answering from a fixed set of paths
    struct FakeProbe(HashSet<PathBuf>);

    impl FakeProbe {
        fn with_files(root: &Path, names: &[&str]) -> Self {
            Self(names.iter().map(|name| root.join(name)).collect())
        }
    }

    impl FileProbe for FakeProbe {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn commands(build: impl Fn(PackageManagerId) -> CommandLine) -> Vec<String> {
        PackageManagerId::iter().map(|pm| build(pm).to_string()).collect()
    }

    #[test]
    fn test_no_root_defaults_to_npm_regardless_of_fallback() {
        let detector = Detector::with_probe(FakeProbe(HashSet::new()), PackageManagerId::Bun);
        assert_eq!(detector.detect(None), PackageManagerId::Npm);
    }

    #[test]
    fn test_each_lock_file_alone() {
        let root = Path::new("/work");
        for rule in LOCK_FILE_RULES {
            let probe = FakeProbe::with_files(root, &[rule.file_name]);
            let detector = Detector::with_probe(probe, PackageManagerId::Npm);
            assert_eq!(detector.detect(Some(root)), rule.manager, "{}", rule.file_name);
        }
    }

    #[test]
    fn test_priority_order_wins() {
        let root = Path::new("/work");
        let probe = FakeProbe::with_files(
            root,
            &["package-lock.json", "yarn.lock", "pnpm-lock.yaml"],
        );
        let detector = Detector::with_probe(probe, PackageManagerId::Npm);
        assert_eq!(detector.detect(Some(root)), PackageManagerId::Pnpm);

        let present: Vec<_> = detector
            .lock_files_present(root)
            .iter()
            .map(|rule| rule.file_name)
            .collect();
        assert_eq!(present, ["pnpm-lock.yaml", "yarn.lock", "package-lock.json"]);
    }

    #[test]
    fn test_no_lock_file_uses_fallback() {
        let root = Path::new("/work");
        let probe = FakeProbe::with_files(root, &[MANIFEST_FILE]);
        let detector = Detector::with_probe(probe, PackageManagerId::Yarn);
        assert_eq!(detector.detect(Some(root)), PackageManagerId::Yarn);
    }

    #[test]
    fn test_lock_file_rules_match_manager_lock_files() {
        for rule in LOCK_FILE_RULES {
            assert_eq!(rule.manager.lock_file(), rule.file_name);
        }
    }

    #[test]
    fn test_manifest_queries() {
        let root = Path::new("/work");
        let detector = Detector::with_probe(
            FakeProbe::with_files(root, &[MANIFEST_FILE]),
            PackageManagerId::Npm,
        );
        assert!(detector.has_manifest(root));
        assert_eq!(detector.manifest_path(root), Some(root.join("package.json")));

        let other = Path::new("/elsewhere");
        assert!(!detector.has_manifest(other));
        assert_eq!(detector.manifest_path(other), None);
    }

    #[test]
    fn test_install_all_commands() {
        assert_eq!(
            commands(|pm| pm.install_command(None, false)),
            ["npm install", "yarn install", "pnpm install", "bun install"]
        );
    }

    #[test]
    fn test_install_one_commands() {
        assert_eq!(
            commands(|pm| pm.install_command(Some("react"), false)),
            ["npm install react", "yarn add react", "pnpm add react", "bun add react"]
        );
    }

    #[test]
    fn test_install_dev_commands() {
        assert_eq!(
            commands(|pm| pm.install_command(Some("typescript"), true)),
            [
                "npm install typescript --save-dev",
                "yarn add typescript --dev",
                "pnpm add typescript --save-dev",
                "bun add typescript --dev",
            ]
        );
    }

    #[test]
    fn test_install_passes_version_suffix_verbatim() {
        assert_eq!(
            PackageManagerId::Pnpm
                .install_command(Some("lodash@4.0.0"), false)
                .to_string(),
            "pnpm add lodash@4.0.0"
        );
    }

    #[test]
    fn test_remove_commands() {
        assert_eq!(
            commands(|pm| pm.remove_command("react")),
            ["npm uninstall react", "yarn remove react", "pnpm remove react", "bun remove react"]
        );
    }

    #[test]
    fn test_update_defaults_to_latest() {
        assert_eq!(
            commands(|pm| pm.update_command("lodash", None)),
            [
                "npm install lodash@latest",
                "yarn add lodash@latest",
                "pnpm add lodash@latest",
                "bun add lodash@latest",
            ]
        );
    }

    #[test]
    fn test_update_with_explicit_version() {
        assert_eq!(
            PackageManagerId::Npm
                .update_command("@types/node", Some("^20.0.0"))
                .to_string(),
            "npm install @types/node@^20.0.0"
        );
    }

    #[test]
    fn test_update_never_uses_native_subcommand() {
        for pm in PackageManagerId::iter() {
            let cmd = pm.update_command("lodash", None);
            assert!(!cmd.args().iter().any(|a| a == "update" || a == "upgrade"));
        }
    }

    #[test]
    fn test_audit_commands() {
        assert_eq!(
            commands(|pm| pm.audit_command()),
            ["npm audit", "yarn audit", "pnpm audit", "bun audit"]
        );
    }

    #[test]
    fn test_run_commands_keep_yarn_shorthand() {
        assert_eq!(
            commands(|pm| pm.run_command("start")),
            ["npm run start", "yarn start", "pnpm run start", "bun run start"]
        );
    }
}
