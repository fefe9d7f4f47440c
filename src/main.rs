//! pkgpilot - Main entry point

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use pkgpilot::cli::{Cli, Commands, ValidateKind};
use pkgpilot::validation::{
    validate_package_name_input, validate_package_name_with_version_input,
    validate_script_command_input, validate_script_name_input,
};
use pkgpilot::{ActionReport, Assistant, ProcessGuard, Runner, Settings, picker, process_guard};

/// Initialize the logger with appropriate settings
fn init_logger(verbose: bool) {
    let default_level = if verbose { "pkgpilot=debug" } else { "pkgpilot=info" };
    // RUST_LOG overrides the flag
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Err(e) = process_guard::init_signal_handlers() {
        tracing::warn!("Failed to initialize signal handlers: {}", e);
    }

    let root = match cli.root {
        Some(root) => Some(root),
        None => std::env::current_dir().ok(),
    };
    let settings = Settings::resolve(cli.config.as_deref(), root.as_deref())?;
    let assistant = Assistant::new(root, settings, Runner::new(cli.dry_run));

    // Stops any package manager still running when we unwind
    let _guard = ProcessGuard::new();

    match cli.command {
        Commands::Detect => print_detection(&assistant),
        Commands::Install { package, dev } => {
            let report = match package {
                Some(package) => assistant.install(&package, dev)?,
                None => assistant.install_all()?,
            };
            print_report(&report);
        }
        Commands::Remove { package, yes } => {
            let package = match package {
                Some(package) => package,
                None => choose_dependency(&assistant, "Package to remove")?,
            };
            // Fail on unknown packages before asking
            assistant.check_dependency(&package)?;
            let ask = assistant.settings().confirm_removal && !yes && !cli.dry_run;
            if ask && is_interactive() && !picker::confirm(&format!("Remove {}?", package))? {
                println!("Cancelled");
                return Ok(());
            }
            print_report(&assistant.remove(&package)?);
        }
        Commands::Update { package, version } => {
            let package = match package {
                Some(package) => package,
                None => choose_dependency(&assistant, "Package to update")?,
            };
            print_report(&assistant.update(&package, version.as_deref())?);
        }
        Commands::Audit => print_report(&assistant.audit()?),
        Commands::Run { script } => {
            let script = match script {
                Some(script) => script,
                None => choose_script(&assistant)?,
            };
            print_report(&assistant.run_script(&script)?);
        }
        Commands::Scripts => {
            let scripts = assistant.scripts()?;
            if scripts.is_empty() {
                println!("No scripts defined");
            }
            for script in scripts {
                println!("{:<24} {}", script.name, script.command);
            }
        }
        Commands::Deps => {
            let deps = assistant.dependencies()?;
            if deps.is_empty() {
                println!("No dependencies declared");
            }
            for dep in deps {
                let dev = if dep.is_dev() { "  (dev)" } else { "" };
                println!("{:<32} {}{}", dep.name, dep.range, dev);
            }
        }
        Commands::AddScript {
            name,
            command,
            force,
        } => {
            let name = value_or_prompt(name, "Script name", validate_script_name_input)?;
            let command = value_or_prompt(command, "Script command", validate_script_command_input)?;
            let change = assistant.add_script(&name, &command, force)?;
            match change.replaced {
                Some(previous) => println!("✓ Replaced script {} (was: {})", change.name, previous),
                None => println!("✓ Added script {}", change.name),
            }
        }
        Commands::Validate { kind, value } => {
            let message = match kind {
                ValidateKind::Package => validate_package_name_input(&value),
                ValidateKind::PackageVersion => validate_package_name_with_version_input(&value),
                ValidateKind::ScriptName => validate_script_name_input(&value),
                ValidateKind::ScriptCommand => validate_script_command_input(&value),
            };
            match message {
                Some(message) => bail!("{}", message),
                None => println!("✓ {:?} is valid", value),
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pkgpilot", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

fn choose_script(assistant: &Assistant) -> Result<String> {
    if !is_interactive() {
        bail!("No script given");
    }
    picker::pick_script(&assistant.scripts()?)?.context("No script selected")
}

fn choose_dependency(assistant: &Assistant, prompt: &str) -> Result<String> {
    if !is_interactive() {
        bail!("No package given");
    }
    picker::pick_dependency(prompt, &assistant.dependencies()?)?.context("No package selected")
}

fn value_or_prompt(
    value: Option<String>,
    prompt: &str,
    validate: fn(&str) -> Option<String>,
) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None if is_interactive() => Ok(picker::prompt_validated(prompt, validate)?),
        None => bail!("No {} given", prompt.to_lowercase()),
    }
}

fn print_detection(assistant: &Assistant) {
    let manager = assistant.manager();
    println!("Package manager: {}", manager);

    let lock_files = assistant.lock_files();
    if lock_files.is_empty() {
        println!(
            "Lock files:      none (default: {})",
            assistant.settings().default_package_manager
        );
    } else {
        let names: Vec<&str> = lock_files.iter().map(|rule| rule.file_name).collect();
        println!("Lock files:      {}", names.join(", "));
    }

    let manifest = assistant
        .manifest_path()
        .map(|path: PathBuf| path.display().to_string())
        .unwrap_or_else(|| "not found".to_string());
    println!("Manifest:        {}", manifest);
}

fn print_report(report: &ActionReport) {
    if report.outcome.executed {
        info!(manager = %report.manager, "Done");
        println!("✓ {}", report.command);
    } else {
        println!("{}", report.command);
    }
}
