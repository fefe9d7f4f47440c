//! Package manager identifiers
//!
//! The set of supported managers is closed. Anything outside it fails to
//! parse at the CLI or settings boundary, so the rest of the crate can match
//! exhaustively without an "unknown manager" state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// JavaScript package manager in effect for a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackageManagerId {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManagerId {
    /// Binary name invoked for this manager
    pub fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        }
    }

    /// Subcommand that adds a single package to the manifest
    pub fn add_verb(self) -> &'static str {
        match self {
            Self::Npm => "install",
            Self::Yarn | Self::Pnpm | Self::Bun => "add",
        }
    }

    /// Subcommand that removes a package from the manifest
    pub fn remove_verb(self) -> &'static str {
        match self {
            Self::Npm => "uninstall",
            Self::Yarn | Self::Pnpm | Self::Bun => "remove",
        }
    }

    /// Flag marking an added package as a dev dependency
    pub fn dev_flag(self) -> &'static str {
        match self {
            Self::Npm | Self::Pnpm => "--save-dev",
            Self::Yarn | Self::Bun => "--dev",
        }
    }

    /// Lock file this manager writes
    pub fn lock_file(self) -> &'static str {
        match self {
            Self::Npm => "package-lock.json",
            Self::Yarn => "yarn.lock",
            Self::Pnpm => "pnpm-lock.yaml",
            Self::Bun => "bun.lockb",
        }
    }
}
