//! pkgpilot Library
//!
//! Detects which JavaScript package manager governs a workspace, validates
//! package and script identifiers, and turns install/add/remove/update/audit/run
//! requests into the exact command line for npm, yarn, pnpm or bun.

pub mod assistant;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod intent;
pub mod manifest;
pub mod picker;
pub mod process_guard;
pub mod runner;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use assistant::{ActionReport, Assistant, ScriptChange};
pub use config::Settings;
pub use detector::{
    Detector, FileProbe, LOCK_FILE_RULES, LocalFs, LockFileRule, MANIFEST_FILE, has_manifest,
    manifest_path,
};
pub use error::{PkgPilotError, Result};
pub use intent::{CommandLine, OperationIntent};
pub use manifest::{Dependency, DependencyKind, Manifest, ManifestError, Script};
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use runner::{CommandOutcome, Runner};
pub use types::PackageManagerId;
pub use validation::{
    ValidationField, ValidationObserver, ValidationVerdict, validate_package_name,
    validate_package_name_input, validate_package_name_with_version,
    validate_package_name_with_version_input, validate_script_command,
    validate_script_command_input, validate_script_name, validate_script_name_input,
};
