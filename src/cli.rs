use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pkgpilot - run npm, yarn, pnpm and bun commands for the current workspace
#[derive(Parser)]
#[command(name = "pkgpilot")]
#[command(about = "Detects the workspace's package manager and runs package and script commands through it")]
#[command(version)]
pub struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Settings file (defaults to <root>/.pkgpilot.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the command that would run without executing it or writing package.json
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbose logging (same as RUST_LOG=pkgpilot=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected package manager and the lock files behind it
    Detect,
    /// Install all dependencies, or add one package
    Install {
        /// Package to add, optionally with @version (e.g. lodash@^4.17.0)
        package: Option<String>,
        /// Add as a dev dependency
        #[arg(short = 'D', long)]
        dev: bool,
    },
    /// Remove a dependency (prompts for one when omitted)
    Remove {
        package: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Update a dependency to the latest release or to an explicit version
    Update {
        /// Package to update (prompts for one when omitted)
        package: Option<String>,
        /// Target version or dist-tag (defaults to latest)
        #[arg(long = "to", value_name = "VERSION")]
        version: Option<String>,
    },
    /// Audit installed dependencies
    Audit,
    /// Run a script from package.json (prompts for one when omitted)
    Run { script: Option<String> },
    /// List scripts declared in package.json
    Scripts,
    /// List dependencies declared in package.json
    Deps,
    /// Add a script to package.json (prompts for missing values)
    AddScript {
        name: Option<String>,
        command: Option<String>,
        /// Replace an existing script with the same name
        #[arg(short, long)]
        force: bool,
    },
    /// Check a value against one of the input grammars
    Validate {
        #[arg(value_enum)]
        kind: ValidateKind,
        value: String,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Input grammar selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateKind {
    /// Package name, optionally scoped
    Package,
    /// Package name with optional @version
    PackageVersion,
    /// Script name
    ScriptName,
    /// Script command
    ScriptCommand,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
