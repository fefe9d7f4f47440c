//! Error handling module for pkgpilot
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Detection and command synthesis never fail; everything here comes from
//! rejected input, the manifest, prompts or the spawned package manager.
//! Settings failures stay in `anyhow` since they only surface in `main`.

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::types::PackageManagerId;

/// Main error type for pkgpilot
#[derive(Error, Debug)]
pub enum PkgPilotError {
    /// IO errors (spawning processes, reading files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// User input rejected by the validator
    #[error("Validation error: {0}")]
    Validation(String),

    /// Manifest read/write errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// No package.json in the workspace
    #[error("No package.json found in {0}")]
    ManifestNotFound(String),

    /// The detected package manager binary is not on PATH
    #[error("{manager} is not installed or not on PATH")]
    ManagerNotInstalled { manager: PackageManagerId },

    /// Script requested that the manifest does not declare
    #[error("Script '{0}' is not defined in package.json")]
    ScriptNotFound(String),

    /// Package requested that the manifest does not list
    #[error("Package '{0}' is not a dependency of this workspace")]
    DependencyNotFound(String),

    /// Script name already taken
    #[error("Script '{0}' already exists (use --force to overwrite)")]
    ScriptExists(String),

    /// Package manager ran and exited unsuccessfully
    #[error("`{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// Result type alias for pkgpilot operations
pub type Result<T> = std::result::Result<T, PkgPilotError>;

// Convenient error constructors
impl PkgPilotError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a prompt error
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }
}
