//! Registration-time schema validation through the public API.

use cmdtrie::{CmdtrieError, CommandSpec, ParamSpec, Registry, ValueType};

use crate::common::command;

fn register_err(spec: CommandSpec) -> CmdtrieError {
    let mut registry = Registry::new();
    registry.register("probe", Some(spec)).unwrap_err()
}

// =========================================================================
// Reserved names
// =========================================================================

#[test]
fn test_reserved_option_name_rejected() {
    let err = register_err(command("probe").option(ParamSpec::option("help")));
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
    assert!(err.to_string().contains("help"));
}

#[test]
fn test_reserved_short_name_rejected() {
    let err = register_err(command("probe").option(ParamSpec::option("h")));
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_reserved_alias_rejected() {
    let err = register_err(command("probe").option(ParamSpec::option("verbose").alias("h")));
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

// =========================================================================
// Name charset
// =========================================================================

#[test]
fn test_name_charset_enforced() {
    for bad in ["-lead", "sp ace", "ba$d", "", "_under"] {
        let err = register_err(command("probe").argument(ParamSpec::argument(bad)));
        assert!(matches!(err, CmdtrieError::InvalidSchema(_)), "{bad:?}");
    }
}

#[test]
fn test_name_charset_accepts_interior_punctuation() {
    let mut registry = Registry::new();
    registry
        .register(
            "probe",
            Some(command("probe").argument(ParamSpec::argument("snake_or-dash2"))),
        )
        .unwrap();
}

// =========================================================================
// Kind restrictions
// =========================================================================

#[test]
fn test_alias_on_argument_rejected() {
    let err = register_err(command("probe").argument(ParamSpec::argument("name").alias("n")));
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_allowed_values_on_argument_rejected() {
    let err = register_err(
        command("probe").argument(ParamSpec::argument("env").allowed_values(["dev", "prod"])),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_variadic_option_rejected() {
    let err = register_err(command("probe").option(ParamSpec::option("tags").variadic(true)));
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

// =========================================================================
// Argument ordering
// =========================================================================

#[test]
fn test_variadic_must_be_last() {
    let err = register_err(
        command("probe")
            .argument(ParamSpec::argument("rest").variadic(true))
            .argument(ParamSpec::argument("tail")),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_required_after_optional_rejected() {
    let err = register_err(
        command("probe")
            .argument(ParamSpec::argument("maybe"))
            .argument(ParamSpec::argument("must").required(true)),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

// =========================================================================
// Uniqueness
// =========================================================================

#[test]
fn test_duplicate_names_rejected_across_kinds() {
    let err = register_err(
        command("probe")
            .argument(ParamSpec::argument("name").required(true))
            .option(ParamSpec::option("name")),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_negation_twin_collision_rejected() {
    // A boolean `force` also claims `--no-force`, which `no_force` would spell.
    let err = register_err(
        command("probe")
            .option(ParamSpec::option("force").value_type(ValueType::Boolean))
            .option(ParamSpec::option("no_force")),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_alias_collision_rejected() {
    let err = register_err(
        command("probe")
            .option(ParamSpec::option("env").alias("e"))
            .option(ParamSpec::option("emit").alias("e")),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

// =========================================================================
// Defaults
// =========================================================================

#[test]
fn test_default_type_mismatch_rejected() {
    let err = register_err(
        command("probe")
            .option(ParamSpec::option("count").value_type(ValueType::Integer).default_value("five")),
    );
    assert!(matches!(err, CmdtrieError::InvalidSchema(_)));
}

#[test]
fn test_matching_default_accepted() {
    let mut registry = Registry::new();
    registry
        .register(
            "probe",
            Some(
                command("probe")
                    .option(ParamSpec::option("count").value_type(ValueType::Integer).default_value(5)),
            ),
        )
        .unwrap();
}

// =========================================================================
// Registration-level checks
// =========================================================================

#[test]
fn test_alias_token_with_whitespace_rejected() {
    let mut registry = Registry::new();
    let err = registry
        .register_with_aliases("version", Some(command("version")), &["has space"])
        .unwrap_err();
    assert!(matches!(err, CmdtrieError::InvalidRegistration(_)));
}

#[test]
fn test_failed_registration_leaves_registry_untouched() {
    let mut registry = Registry::new();
    registry.register("ok", Some(command("ok"))).unwrap();
    let bad = command("bad").option(ParamSpec::option("h"));
    assert!(registry.register("bad", Some(bad)).is_err());
    assert!(registry.lookup(&["ok"]).found());
    assert!(!registry.lookup(&["bad"]).found());
}
