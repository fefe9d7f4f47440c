//! Package manager execution
//!
//! Every synthesized [`CommandLine`] is executed through [`Runner::execute`]:
//!
//! - the program is resolved on `PATH` first, so a missing manager is
//!   reported as such rather than as a spawn failure
//! - tokens are passed straight to the process, never through a shell
//! - the child is registered with the global [`ChildRegistry`] until it
//!   exits; it only gets its own process group when stdin is not a terminal,
//!   so interactive scripts keep reading the terminal in the foreground
//! - stdout/stderr are inherited so output streams to the terminal

use std::io::IsTerminal;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PkgPilotError, Result};
use crate::intent::CommandLine;
use crate::process_guard::{ChildRegistry, CommandProcessGroup};
use crate::types::PackageManagerId;

/// Result of one command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Literal command line
    pub command: String,
    /// False in dry-run mode
    pub executed: bool,
    /// Exit code (None if not executed or terminated by a signal)
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl CommandOutcome {
    /// Turn an unsuccessful run into [`PkgPilotError::CommandFailed`]
    pub fn ensure_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(PkgPilotError::CommandFailed {
                command: self.command,
                code: self.exit_code.unwrap_or(-1),
            })
        }
    }
}

/// Executes command lines in a workspace
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
    dry_run: bool,
}

impl Runner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run `command` for `manager` with `cwd` as working directory
    pub fn execute(
        &self,
        manager: PackageManagerId,
        cwd: Option<&Path>,
        command: &CommandLine,
    ) -> Result<CommandOutcome> {
        let rendered = command.to_string();

        if self.dry_run {
            tracing::info!(command = %rendered, "Dry run, not executing");
            return Ok(CommandOutcome {
                command: rendered,
                executed: false,
                exit_code: None,
                success: true,
            });
        }

        let program = which::which(command.program()).map_err(|e| {
            tracing::debug!(program = command.program(), error = %e, "Program lookup failed");
            PkgPilotError::ManagerNotInstalled { manager }
        })?;

        tracing::info!(command = %rendered, cwd = ?cwd, "Executing");

        let mut cmd = Command::new(&program);
        cmd.args(command.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if std::io::stdin().is_terminal() {
            cmd.tied_to_parent();
        } else {
            cmd.in_new_process_group();
        }
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn()?;
        let pid = child.id();
        with_registry(|registry| registry.register(pid));

        let status = child.wait();
        with_registry(|registry| registry.unregister(pid));
        let status = status?;

        let exit_code = status.code();
        if status.success() {
            tracing::info!(command = %rendered, "Command succeeded");
        } else {
            tracing::warn!(command = %rendered, exit_code = ?exit_code, "Command failed");
        }

        Ok(CommandOutcome {
            command: rendered,
            executed: true,
            exit_code,
            success: status.success(),
        })
    }
}

fn with_registry(f: impl FnOnce(&mut ChildRegistry)) {
    match ChildRegistry::global().lock() {
        Ok(mut registry) => f(&mut registry),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}
