//! Operation intents and the command lines they resolve to.
//!
//! An [`OperationIntent`] is what the user asked for, independent of any
//! package manager. Pairing it with a [`PackageManagerId`] yields a
//! [`CommandLine`]: the program plus argument tokens, whose `Display` is the
//! literal text a user would type into a shell.

use std::fmt;

use crate::types::PackageManagerId;

/// Abstract action requested against a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationIntent {
    /// Install everything declared in the manifest
    InstallAll,
    /// Add one package, optionally as a dev dependency
    InstallOne { name: String, dev: bool },
    /// Remove one package
    Remove { name: String },
    /// Move a package to `version`, or to `latest` when none is given
    Update { name: String, version: Option<String> },
    /// Audit installed dependencies
    Audit,
    /// Run a script declared in the manifest
    Run { script: String },
}

impl OperationIntent {
    /// Short label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::InstallAll => "install",
            Self::InstallOne { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Update { .. } => "update",
            Self::Audit => "audit",
            Self::Run { .. } => "run",
        }
    }
}

/// A fully synthesized command: program and argument tokens.
///
/// Tokens are kept separate so the runner can spawn the program directly
/// without going through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument token
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl PackageManagerId {
    /// Resolve an intent to the command line for this manager
    pub fn command_for(self, intent: &OperationIntent) -> CommandLine {
        match intent {
            OperationIntent::InstallAll => self.install_command(None, false),
            OperationIntent::InstallOne { name, dev } => self.install_command(Some(name), *dev),
            OperationIntent::Remove { name } => self.remove_command(name),
            OperationIntent::Update { name, version } => {
                self.update_command(name, version.as_deref())
            }
            OperationIntent::Audit => self.audit_command(),
            OperationIntent::Run { script } => self.run_command(script),
        }
    }
}
