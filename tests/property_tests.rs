//! Property-based tests for pkgpilot
//!
//! These tests verify:
//! - Validator predicates and input adapters agree on every input
//! - Manager names round-trip through Display/FromStr
//! - Command synthesis keeps its shape for any accepted identifier

use proptest::prelude::*;
use strum::IntoEnumIterator;

use pkgpilot::validation::*;
use pkgpilot::PackageManagerId;

// =============================================================================
// Strategies
// =============================================================================

fn manager_strategy() -> impl Strategy<Value = PackageManagerId> {
    prop_oneof![
        Just(PackageManagerId::Npm),
        Just(PackageManagerId::Yarn),
        Just(PackageManagerId::Pnpm),
        Just(PackageManagerId::Bun),
    ]
}

/// Names drawn from the package grammar
fn package_name_strategy() -> impl Strategy<Value = String> {
    let segment = "[a-z0-9~-][a-z0-9._~-]{0,20}";
    (prop::option::of(segment), segment).prop_map(|(scope, name)| match scope {
        Some(scope) => format!("@{}/{}", scope, name),
        None => name,
    })
}

fn version_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("latest".to_string()),
        Just("next".to_string()),
        "(\\^|~|>=|<=|>|<)?[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
    ]
}

// =============================================================================
// Validator round-trip
// =============================================================================

/// Adapter message is None exactly when the predicate accepts, and a
/// rejection always names the problem.
fn assert_adapter_agrees(
    input: &str,
    predicate: fn(&str) -> bool,
    adapter: fn(&str) -> Option<String>,
) -> Result<(), TestCaseError> {
    match adapter(input) {
        None => prop_assert!(predicate(input), "adapter accepted {:?}", input),
        Some(message) => {
            prop_assert!(!predicate(input), "adapter rejected {:?}", input);
            prop_assert!(
                message.contains("empty") || message.contains("Invalid"),
                "unexpected message {:?}",
                message
            );
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn package_name_adapter_agrees(input in ".{0,40}") {
        assert_adapter_agrees(&input, validate_package_name, validate_package_name_input)?;
    }

    #[test]
    fn package_version_adapter_agrees(input in "[@a-z0-9./^~<>=| -]{0,40}") {
        assert_adapter_agrees(
            &input,
            validate_package_name_with_version,
            validate_package_name_with_version_input,
        )?;
    }

    #[test]
    fn script_name_adapter_agrees(input in ".{0,30}") {
        assert_adapter_agrees(&input, validate_script_name, validate_script_name_input)?;
    }

    #[test]
    fn script_command_adapter_agrees(input in ".{0,30}") {
        assert_adapter_agrees(&input, validate_script_command, validate_script_command_input)?;
    }

    #[test]
    fn generated_package_names_are_accepted(name in package_name_strategy()) {
        prop_assert!(validate_package_name(&name));
        prop_assert!(validate_package_name_with_version(&name));
    }

    #[test]
    fn generated_name_with_version_is_accepted(
        name in package_name_strategy(),
        version in version_strategy(),
    ) {
        let value = format!("{}@{}", name, version);
        prop_assert!(validate_package_name_with_version(&value), "{}", value);
    }

    #[test]
    fn whitespace_in_package_names_is_rejected(
        head in "[a-z]{1,10}",
        tail in "[a-z]{1,10}",
    ) {
        let name = format!("{} {}", head, tail);
        prop_assert!(!validate_package_name(&name));
        prop_assert!(!validate_package_name_with_version(&name));
    }
}

// =============================================================================
// Manager identifiers and command synthesis
// =============================================================================

proptest! {
    #[test]
    fn manager_roundtrip(pm in manager_strategy()) {
        let parsed: PackageManagerId = pm.to_string().parse().expect("Should parse");
        prop_assert_eq!(pm, parsed);
    }

    #[test]
    fn update_always_carries_explicit_version(
        pm in manager_strategy(),
        name in package_name_strategy(),
        version in prop::option::of(version_strategy()),
    ) {
        let cmd = pm.update_command(&name, version.as_deref());
        let last = cmd.args().last().cloned().unwrap_or_default();
        let expected = format!("{}@{}", name, version.as_deref().unwrap_or("latest"));
        prop_assert_eq!(last, expected);
        prop_assert!(!cmd.args().iter().any(|a| a == "update" || a == "upgrade"));
    }

    #[test]
    fn package_token_is_passed_through_unchanged(
        pm in manager_strategy(),
        name in package_name_strategy(),
        dev in any::<bool>(),
    ) {
        let cmd = pm.install_command(Some(&name), dev);
        prop_assert_eq!(cmd.program(), pm.program());
        prop_assert_eq!(&cmd.args()[1], &name);
        prop_assert_eq!(cmd.args().len(), if dev { 3 } else { 2 });
    }

    #[test]
    fn run_command_ends_with_script(pm in manager_strategy(), script in "[a-zA-Z0-9:_-]{1,20}") {
        let cmd = pm.run_command(&script);
        prop_assert_eq!(cmd.args().last(), Some(&script));
        prop_assert_eq!(cmd.to_string().starts_with(&format!("{} ", pm)), true);
    }
}

#[test]
fn every_manager_is_covered_by_the_strategy() {
    // Keeps manager_strategy in step with the enum
    assert_eq!(PackageManagerId::iter().count(), 4);
}
