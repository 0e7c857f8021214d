//! Common test utilities shared across integration tests.
//!
//! Builders for the small generator-style CLI the suites dispatch against,
//! kept here so individual tests only spell out what they are checking.

#![allow(dead_code)]

use cmdtrie::{Bindings, CommandSpec, ParamSpec, Registry, ValueType};

pub fn noop(_bindings: &Bindings) -> anyhow::Result<()> {
    Ok(())
}

pub fn command(name: &str) -> CommandSpec {
    CommandSpec::new(name, noop).description(format!("{name} description"))
}

pub fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

/// Registry shaped like a small project generator: nested commands, an
/// aliased leaf, typed options, and a variadic argument.
pub fn generator_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(
            "new",
            Some(
                CommandSpec::new("new", noop)
                    .description("Create a project")
                    .example("prog new my_app --env=production")
                    .argument(ParamSpec::argument("project").required(true).help("Project name"))
                    .option(
                        ParamSpec::option("env")
                            .alias("e")
                            .default_value("development")
                            .help("Target environment"),
                    )
                    .option(
                        ParamSpec::option("force")
                            .value_type(ValueType::Boolean)
                            .default_value(false)
                            .help("Overwrite existing files"),
                    ),
            ),
        )
        .expect("register new");
    registry
        .register(
            "generate model",
            Some(
                CommandSpec::new("generate model", noop)
                    .description("Generate a model")
                    .argument(ParamSpec::argument("name").required(true).help("Model name"))
                    .argument(ParamSpec::argument("fields").variadic(true).help("Field list"))
                    .option(
                        ParamSpec::option("skip_migration")
                            .value_type(ValueType::Boolean)
                            .default_value(false),
                    ),
            ),
        )
        .expect("register generate model");
    registry
        .register(
            "generate migration",
            Some(
                CommandSpec::new("generate migration", noop)
                    .description("Generate a migration")
                    .argument(ParamSpec::argument("name").required(true)),
            ),
        )
        .expect("register generate migration");
    registry
        .register_with_aliases(
            "version",
            Some(CommandSpec::new("version", noop).description("Print version")),
            &["v", "-v", "--version"],
        )
        .expect("register version");
    registry
        .register(
            "db migrate",
            Some(
                CommandSpec::new("db migrate", noop)
                    .description("Run migrations")
                    .option(
                        ParamSpec::option("target")
                            .value_type(ValueType::Integer)
                            .help("Target version"),
                    ),
            ),
        )
        .expect("register db migrate");
    registry
}
