//! Workspace actions
//!
//! [`Assistant`] ties the pieces together for one workspace. Every action
//! follows the same sequence:
//!
//! 1. validate user input (rejections carry the input adapter's message)
//! 2. detect the package manager, fresh for this action
//! 3. synthesize the command line
//! 4. execute it through the [`Runner`]
//!
//! Detection is never carried over between actions: an install can create a
//! lock file that changes the answer for the next one.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::detector::{Detector, LockFileRule};
use crate::error::{PkgPilotError, Result};
use crate::intent::{CommandLine, OperationIntent};
use crate::manifest::{Dependency, Manifest, Script};
use crate::runner::{CommandOutcome, Runner};
use crate::types::PackageManagerId;
use crate::validation::{
    validate_package_name_input, validate_package_name_with_version_input,
    validate_script_command_input, validate_script_name_input,
};

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub manager: PackageManagerId,
    pub command: CommandLine,
    pub outcome: CommandOutcome,
}

/// Result of adding a script to the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptChange {
    pub name: String,
    /// Command the script had before, when it was overwritten
    pub replaced: Option<String>,
}

/// Actions against one workspace
#[derive(Debug, Clone)]
pub struct Assistant {
    root: Option<PathBuf>,
    settings: Settings,
    detector: Detector,
    runner: Runner,
}

impl Assistant {
    pub fn new(root: Option<PathBuf>, settings: Settings, runner: Runner) -> Self {
        let detector = Detector::new(settings.default_package_manager);
        Self {
            root,
            settings,
            detector,
            runner,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Package manager in effect right now
    pub fn manager(&self) -> PackageManagerId {
        self.detector.detect(self.root())
    }

    /// Lock files present in the workspace, in priority order
    pub fn lock_files(&self) -> Vec<LockFileRule> {
        self.root()
            .map(|root| self.detector.lock_files_present(root))
            .unwrap_or_default()
    }

    /// Path to package.json, if the workspace has one
    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.root().and_then(|root| self.detector.manifest_path(root))
    }

    fn manifest(&self) -> Result<Manifest> {
        let root = self
            .root()
            .ok_or_else(|| PkgPilotError::ManifestNotFound("(no workspace)".to_string()))?;
        if !self.detector.has_manifest(root) {
            return Err(PkgPilotError::ManifestNotFound(root.display().to_string()));
        }
        Ok(Manifest::load(root)?)
    }

    /// Scripts declared in the manifest
    pub fn scripts(&self) -> Result<Vec<Script>> {
        Ok(self.manifest()?.scripts())
    }

    /// Dependencies declared in the manifest
    pub fn dependencies(&self) -> Result<Vec<Dependency>> {
        Ok(self.manifest()?.dependencies())
    }

    /// Install everything in the manifest
    pub fn install_all(&self) -> Result<ActionReport> {
        self.manifest()?;
        self.perform(OperationIntent::InstallAll)
    }

    /// Add a package, optionally with `@version`, optionally as a dev dependency
    pub fn install(&self, package: &str, dev: bool) -> Result<ActionReport> {
        reject(validate_package_name_with_version_input(package))?;
        self.manifest()?;
        self.perform(OperationIntent::InstallOne {
            name: package.to_string(),
            dev,
        })
    }

    /// Validate `package` and require it in `dependencies` or `devDependencies`
    pub fn check_dependency(&self, package: &str) -> Result<()> {
        reject(validate_package_name_input(package))?;
        if !self.manifest()?.has_dependency(package) {
            return Err(PkgPilotError::DependencyNotFound(package.to_string()));
        }
        Ok(())
    }

    /// Remove a package listed in the manifest
    pub fn remove(&self, package: &str) -> Result<ActionReport> {
        self.check_dependency(package)?;
        self.perform(OperationIntent::Remove {
            name: package.to_string(),
        })
    }

    /// Move a package listed in the manifest to `version`, or to the newest
    /// release. New packages go through [`Assistant::install`].
    pub fn update(&self, package: &str, version: Option<&str>) -> Result<ActionReport> {
        self.check_dependency(package)?;
        if let Some(version) = version {
            reject(validate_package_name_with_version_input(&format!(
                "{}@{}",
                package, version
            )))?;
        }
        self.perform(OperationIntent::Update {
            name: package.to_string(),
            version: version.map(str::to_string),
        })
    }

    pub fn audit(&self) -> Result<ActionReport> {
        self.manifest()?;
        self.perform(OperationIntent::Audit)
    }

    /// Run a script declared in the manifest
    pub fn run_script(&self, script: &str) -> Result<ActionReport> {
        reject(validate_script_name_input(script))?;
        if self.manifest()?.script(script).is_none() {
            return Err(PkgPilotError::ScriptNotFound(script.to_string()));
        }
        self.perform(OperationIntent::Run {
            script: script.to_string(),
        })
    }

    /// Add a script to the manifest.
    ///
    /// An existing script is only replaced when `overwrite` is set. Nothing
    /// is written in dry-run mode.
    pub fn add_script(&self, name: &str, command: &str, overwrite: bool) -> Result<ScriptChange> {
        reject(validate_script_name_input(name))?;
        reject(validate_script_command_input(command))?;

        let mut manifest = self.manifest()?;
        if manifest.script(name).is_some() && !overwrite {
            return Err(PkgPilotError::ScriptExists(name.to_string()));
        }

        let replaced = manifest.set_script(name, command);
        if self.runner.is_dry_run() {
            tracing::info!(script = name, command, "Dry run, manifest not written");
        } else {
            manifest.save()?;
            tracing::info!(script = name, command, "Script added");
        }

        Ok(ScriptChange {
            name: name.to_string(),
            replaced,
        })
    }

    fn perform(&self, intent: OperationIntent) -> Result<ActionReport> {
        let manager = self.manager();
        let command = manager.command_for(&intent);
        tracing::debug!(action = intent.label(), %manager, command = %command, "Resolved command");

        let outcome = self
            .runner
            .execute(manager, self.root(), &command)?
            .ensure_success()?;

        Ok(ActionReport {
            manager,
            command,
            outcome,
        })
    }
}

fn reject(message: Option<String>) -> Result<()> {
    match message {
        Some(message) => Err(PkgPilotError::validation(message)),
        None => Ok(()),
    }
}
