//! Settings file handling.
//!
//! Settings are a small JSON document with camelCase keys. Every key is
//! optional; a missing file means defaults.
//!
//! ```json
//! {
//!   "defaultPackageManager": "pnpm",
//!   "confirmRemoval": true
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::PackageManagerId;

/// Settings file looked up in the workspace root when none is given
pub const SETTINGS_FILE: &str = ".pkgpilot.json";

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Manager used when the workspace has no lock file
    pub default_package_manager: PackageManagerId,
    /// Ask before removing a package
    pub confirm_removal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_package_manager: PackageManagerId::Npm,
            confirm_removal: true,
        }
    }
}

impl Settings {
    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON in {:?}", path.as_ref()))?;

        Ok(settings)
    }

    /// Resolve settings for a run.
    ///
    /// An explicit path must exist. Otherwise `<root>/.pkgpilot.json` is used
    /// when present, and defaults when not.
    pub fn resolve(explicit: Option<&Path>, root: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Loading settings");
            return Self::load_from_file(path);
        }

        match root.map(|root| root.join(SETTINGS_FILE)) {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading workspace settings");
                Self::load_from_file(&path)
            }
            _ => {
                tracing::debug!("No settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Default settings path for a workspace
    pub fn workspace_path(root: &Path) -> PathBuf {
        root.join(SETTINGS_FILE)
    }
}
