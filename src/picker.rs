//! Interactive pickers for identifiers left off the command line.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{PkgPilotError, Result};
use crate::manifest::{Dependency, Script};

fn prompt_error(e: dialoguer::Error) -> PkgPilotError {
    PkgPilotError::prompt(e.to_string())
}

/// Pick a script. `None` if the manifest has none or the user cancelled.
pub fn pick_script(scripts: &[Script]) -> Result<Option<String>> {
    if scripts.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = scripts
        .iter()
        .map(|s| format!("{:<20} {}", s.name, s.command))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Script to run")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?;

    Ok(selection.map(|index| scripts[index].name.clone()))
}

/// Pick a dependency. `None` if there are none or the user cancelled.
pub fn pick_dependency(prompt: &str, dependencies: &[Dependency]) -> Result<Option<String>> {
    if dependencies.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = dependencies
        .iter()
        .map(|d| {
            let dev = if d.is_dev() { " (dev)" } else { "" };
            format!("{}@{}{}", d.name, d.range, dev)
        })
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?;

    Ok(selection.map(|index| dependencies[index].name.clone()))
}

/// Text prompt validated with an input adapter from [`crate::validation`]
pub fn prompt_validated(prompt: &str, validate: fn(&str) -> Option<String>) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(move |input: &String| -> std::result::Result<(), String> {
            match validate(input) {
                Some(message) => Err(message),
                None => Ok(()),
            }
        })
        .interact_text()
        .map_err(prompt_error)
}

/// Yes/no confirmation, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(prompt_error)
}
