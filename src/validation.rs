//! Input validation for identifiers that end up on a command line
//!
//! Every string a user types (package names, versions, script names, script
//! bodies) passes through here before it reaches command synthesis. The
//! checks are pattern-based on purpose: they gate obviously malformed input,
//! they are not a full semver or registry-name implementation.
//!
//! Each field has two entry points:
//!
//! - a predicate (`validate_*`) returning `bool`
//! - an input adapter (`validate_*_input`) returning `None` when the value is
//!   accepted, or the message to show the user when it is not
//!
//! Adapters report each verdict to a [`ValidationObserver`]. The default
//! observer emits a `tracing` event.
//!
//! # Version parsing
//!
//! `name@version` is split on `@` and the parts are counted. A version that
//! itself contains `@` cannot be expressed; no semver range needs one.

use std::sync::LazyLock;

use regex::Regex;
use strum::Display;

/// Longest package name the registry accepts
pub const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Dist-tags accepted in place of a version
pub const VERSION_KEYWORDS: &[&str] = &["latest", "next", "beta", "alpha"];

static PACKAGE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9~-][a-z0-9._~-]*/)?[a-z0-9~-][a-z0-9._~-]*$")
        .expect("valid package name regex")
});

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\^|~|>=|<=|>|<)?[A-Za-z0-9.-]+(?:\s*\|\|\s*(?:\^|~|>=|<=|>|<)?[A-Za-z0-9.-]+)*$",
    )
    .expect("valid version regex")
});

static SCRIPT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9:_-]+$").expect("valid script name regex"));

/// Kind of input being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ValidationField {
    PackageName,
    PackageNameWithVersion,
    ScriptName,
    ScriptCommand,
}

impl ValidationField {
    fn empty_message(self) -> &'static str {
        match self {
            Self::PackageName | Self::PackageNameWithVersion => "Package name cannot be empty",
            Self::ScriptName => "Script name cannot be empty",
            Self::ScriptCommand => "Script command cannot be empty",
        }
    }

    fn invalid_message(self) -> &'static str {
        match self {
            Self::PackageName => {
                "Invalid package name. Use lowercase letters, digits, '-', '.', '_' or '~', \
                 optionally scoped as @scope/name (at most 214 characters)"
            }
            Self::PackageNameWithVersion => {
                "Invalid package name or version. Use name, name@version or @scope/name@version \
                 (version: a range like ^1.2.3 or a tag like latest)"
            }
            Self::ScriptName => {
                "Invalid script name. Use letters, digits, ':', '_' or '-' without spaces"
            }
            // Any non-blank command is accepted
            Self::ScriptCommand => "Invalid script command",
        }
    }

    fn predicate(self) -> fn(&str) -> bool {
        match self {
            Self::PackageName => validate_package_name,
            Self::PackageNameWithVersion => validate_package_name_with_version,
            Self::ScriptName => validate_script_name,
            Self::ScriptCommand => validate_script_command,
        }
    }
}

/// Outcome of validating one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Accepted,
    Rejected(String),
}

impl ValidationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Message for an input box: `None` when accepted
    pub fn into_message(self) -> Option<String> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Receives every verdict produced by the input adapters
pub trait ValidationObserver {
    fn on_verdict(&self, field: ValidationField, input: &str, verdict: &ValidationVerdict);
}

/// Observer emitting one `tracing` event per verdict
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ValidationObserver for TracingObserver {
    fn on_verdict(&self, field: ValidationField, input: &str, verdict: &ValidationVerdict) {
        match verdict {
            ValidationVerdict::Accepted => {
                tracing::debug!(field = %field, input, "Input accepted");
            }
            ValidationVerdict::Rejected(reason) => {
                tracing::info!(field = %field, input, reason = reason.as_str(), "Input rejected");
            }
        }
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// Package name, optionally scoped: `name` or `@scope/name`
pub fn validate_package_name(name: &str) -> bool {
    if name.trim().is_empty() || name.len() > MAX_PACKAGE_NAME_LENGTH {
        return false;
    }
    PACKAGE_NAME_RE.is_match(&name.to_lowercase())
}

/// Package name with an optional `@version` suffix
pub fn validate_package_name_with_version(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }

    let parts: Vec<&str> = value.split('@').collect();
    let (name, version) = if value.starts_with('@') {
        // parts[0] is the empty string before the scope marker
        match parts.as_slice() {
            [_, scoped] => (format!("@{}", scoped), None),
            [_, scoped, version] => (format!("@{}", scoped), Some(*version)),
            _ => return false,
        }
    } else {
        match parts.as_slice() {
            [name] => ((*name).to_string(), None),
            [name, version] => ((*name).to_string(), Some(*version)),
            _ => return false,
        }
    };

    validate_package_name(&name) && version.is_none_or(validate_version)
}

/// Version range or dist-tag
pub fn validate_version(version: &str) -> bool {
    VERSION_KEYWORDS.contains(&version) || VERSION_RE.is_match(version)
}

/// Script key in the manifest
pub fn validate_script_name(name: &str) -> bool {
    SCRIPT_NAME_RE.is_match(name)
}

/// Script body: any non-blank command
pub fn validate_script_command(command: &str) -> bool {
    !command.trim().is_empty()
}

// ============================================================================
// Input adapters
// ============================================================================

/// Validate `input` as `field`, reporting the verdict to `observer`
pub fn check<O: ValidationObserver + ?Sized>(
    observer: &O,
    field: ValidationField,
    input: &str,
) -> ValidationVerdict {
    let verdict = if input.trim().is_empty() {
        ValidationVerdict::Rejected(field.empty_message().to_string())
    } else if (field.predicate())(input) {
        ValidationVerdict::Accepted
    } else {
        ValidationVerdict::Rejected(field.invalid_message().to_string())
    };
    observer.on_verdict(field, input, &verdict);
    verdict
}

pub fn validate_package_name_input(input: &str) -> Option<String> {
    check(&TracingObserver, ValidationField::PackageName, input).into_message()
}

pub fn validate_package_name_with_version_input(input: &str) -> Option<String> {
    check(&TracingObserver, ValidationField::PackageNameWithVersion, input).into_message()
}

pub fn validate_script_name_input(input: &str) -> Option<String> {
    check(&TracingObserver, ValidationField::ScriptName, input).into_message()
}

pub fn validate_script_command_input(input: &str) -> Option<String> {
    check(&TracingObserver, ValidationField::ScriptCommand, input).into_message()
}
