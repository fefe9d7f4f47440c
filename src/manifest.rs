//! Workspace manifest (`package.json`) access
//!
//! Reads the `scripts`, `dependencies` and `devDependencies` maps and writes
//! new scripts back. The document is kept as a `serde_json` map with key order
//! preserved, so a rewrite only touches the entry that changed.
//!
//! # Manifest shape
//!
//! ```json
//! {
//!   "name": "web",
//!   "scripts": { "build": "vite build", "test": "vitest" },
//!   "dependencies": { "react": "^18.2.0" },
//!   "devDependencies": { "typescript": "~5.4.0" }
//! }
//! ```

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detector::MANIFEST_FILE;

/// Errors that can occur reading or writing the manifest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("package.json not found at {path}")]
    NotFound { path: String },

    /// Invalid JSON
    #[error("Invalid package.json: {reason}")]
    InvalidFormat { reason: String },

    /// Top-level value is not an object
    #[error("Invalid package.json: top-level value must be an object")]
    NotAnObject,

    /// A known section has the wrong type
    #[error("Invalid package.json: \"{section}\" must be an object of strings")]
    InvalidSection { section: String },

    /// IO error reading or writing the manifest
    #[error("Failed to access package.json: {reason}")]
    IoError { reason: String },
}

impl From<std::io::Error> for ManifestError {
    fn from(err: std::io::Error) -> Self {
        ManifestError::IoError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        ManifestError::InvalidFormat {
            reason: err.to_string(),
        }
    }
}

/// Which manifest section a dependency comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
pub enum DependencyKind {
    #[strum(serialize = "dependencies")]
    Production,
    #[strum(serialize = "devDependencies")]
    Development,
}

/// A declared dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    /// Version range as written in the manifest
    pub range: String,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn is_dev(&self) -> bool {
        self.kind == DependencyKind::Development
    }
}

/// A declared script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub command: String,
}

/// Parsed `package.json`
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl Manifest {
    /// Load the manifest from a workspace root
    pub fn load(root: &Path) -> Result<Self, ManifestError> {
        Self::from_file(root.join(MANIFEST_FILE))
    }

    /// Load a manifest from an explicit path
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let mut manifest = Self::from_json(&content)?;
        manifest.path = path;
        Ok(manifest)
    }

    /// Parse a manifest from a JSON string (not bound to a file until saved)
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(document) = value else {
            return Err(ManifestError::NotAnObject);
        };
        let manifest = Self {
            path: PathBuf::from(MANIFEST_FILE),
            document,
        };
        manifest.validate_structure()?;
        Ok(manifest)
    }

    fn validate_structure(&self) -> Result<(), ManifestError> {
        for section in ["scripts", "dependencies", "devDependencies"] {
            if let Some(value) = self.document.get(section) {
                let valid = value
                    .as_object()
                    .is_some_and(|map| map.values().all(Value::is_string));
                if !valid {
                    return Err(ManifestError::InvalidSection {
                        section: section.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn string_map(&self, section: &str) -> impl Iterator<Item = (&String, &str)> {
        self.document
            .get(section)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| map.iter())
            .filter_map(|(key, value)| value.as_str().map(|v| (key, v)))
    }

    /// Scripts in declaration order
    pub fn scripts(&self) -> Vec<Script> {
        self.string_map("scripts")
            .map(|(name, command)| Script {
                name: name.clone(),
                command: command.to_string(),
            })
            .collect()
    }

    /// Command for a script, if declared
    pub fn script(&self, name: &str) -> Option<&str> {
        self.string_map("scripts")
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, command)| command)
    }

    /// Production dependencies followed by dev dependencies, each in declaration order
    pub fn dependencies(&self) -> Vec<Dependency> {
        [DependencyKind::Production, DependencyKind::Development]
            .into_iter()
            .flat_map(move |kind| {
                self.string_map(kind.into()).map(move |(name, range)| Dependency {
                    name: name.clone(),
                    range: range.to_string(),
                    kind,
                })
            })
            .collect()
    }

    /// Whether `name` is listed in either dependency section
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies().iter().any(|dep| dep.name == name)
    }

    /// Insert or replace a script. Returns the previous command, if any.
    pub fn set_script(&mut self, name: &str, command: &str) -> Option<String> {
        let scripts = self
            .document
            .entry("scripts")
            .or_insert_with(|| Value::Object(Map::new()));
        if !scripts.is_object() {
            *scripts = Value::Object(Map::new());
        }
        scripts
            .as_object_mut()
            .and_then(|map| map.insert(name.to_string(), Value::String(command.to_string())))
            .and_then(|previous| previous.as_str().map(str::to_string))
    }

    /// Serialize as pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut json = serde_json::to_string_pretty(&self.document)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest back to the file it was loaded from
    pub fn save(&self) -> Result<(), ManifestError> {
        std::fs::write(&self.path, self.to_json()?)?;
        tracing::debug!(path = %self.path.display(), "Manifest written");
        Ok(())
    }
}
