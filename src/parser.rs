//! Argument and option resolution against a command's declared schema.
//!
//! Resolution runs in five steps: flag extraction through the
//! [`tokenizer`](crate::tokenizer), positional matching in declaration
//! order, defaults and requiredness, option coercion, and finally a bound
//! [`Bindings`] map. End-user mistakes are never errors; they come back as
//! [`ParseOutcome::Failure`] with a structured [`Diagnostic`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::command::CommandSpec;
use crate::param::{Value, type_cast};
use crate::registry::LookupResult;
use crate::tokenizer::{self, TokenizeError};

/// Resolved name-to-value map handed to actions and callbacks.
///
/// A parameter that resolved to nothing (optional, no default) is absent
/// from the map, so `get` returning `None` is the "nil" reading. Positional
/// tokens beyond the declared arguments are preserved in
/// [`unused_args`](Self::unused_args) rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
    unused: Vec<String>,
}

impl Bindings {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Positional tokens that matched no declared argument.
    #[must_use]
    pub fn unused_args(&self) -> &[String] {
        &self.unused
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

/// Presentation context threaded into diagnostics: how the command was
/// reached ("prog generate model") and whether the matched node has
/// subcommands below it.
#[derive(Debug, Clone, Default)]
pub struct UsageContext {
    display_name: String,
    has_subcommands: bool,
}

impl UsageContext {
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            has_subcommands: false,
        }
    }

    #[must_use]
    pub const fn with_subcommands(mut self, has_subcommands: bool) -> Self {
        self.has_subcommands = has_subcommands;
        self
    }

    #[must_use]
    pub fn for_lookup(program: &str, lookup: &LookupResult<'_>) -> Self {
        Self {
            display_name: lookup.display_name(program),
            has_subcommands: lookup.has_subcommands(),
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn has_subcommands(&self) -> bool {
        self.has_subcommands
    }
}

/// Single-line usage synopsis: display name, required argument placeholders
/// in declaration order, a `SUBCOMMAND` marker when the node has children,
/// then required options in `--name=VALUE` form.
#[must_use]
pub fn synopsis(command: &CommandSpec, usage: &UsageContext) -> String {
    let mut parts = vec![usage.display_name().to_string()];
    for arg in command.get_arguments().iter().filter(|a| a.is_required()) {
        parts.push(arg.get_name().to_uppercase());
    }
    if usage.has_subcommands() {
        parts.push("SUBCOMMAND".to_string());
    }
    for opt in command.get_options().iter().filter(|o| o.is_required()) {
        parts.push(format!("--{}=VALUE", opt.flag_name()));
    }
    parts.join(" ")
}

/// What went wrong, structurally. Rendering lives in
/// [`Diagnostic::to_string`] and [`render`](crate::render).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingRequired {
        supplied: Vec<String>,
        missing_arguments: Vec<String>,
        missing_options: Vec<String>,
    },
    UnknownFlag {
        flag: String,
    },
    MalformedOption {
        detail: String,
    },
    DisallowedValue {
        option: String,
        value: String,
        allowed: Vec<String>,
    },
}

impl DiagnosticKind {
    /// Stable machine-readable code, used in JSON output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "missing_required",
            Self::UnknownFlag { .. } => "unknown_flag",
            Self::MalformedOption { .. } => "malformed_option",
            Self::DisallowedValue { .. } => "disallowed_value",
        }
    }
}

/// A resolution failure with everything a caller needs to explain it: the
/// command's display name, the original argument vector, and a usage
/// synopsis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub command: String,
    pub invocation: Vec<String>,
    pub usage: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let called_with = if self.invocation.is_empty() {
            "no arguments".to_string()
        } else {
            format!("arguments \"{}\"", self.invocation.join(" "))
        };
        match &self.kind {
            DiagnosticKind::MissingRequired {
                missing_options, ..
            } => {
                writeln!(f, "ERROR: \"{}\" was called with {called_with}", self.command)?;
                if !missing_options.is_empty() {
                    let flags: Vec<String> = missing_options
                        .iter()
                        .map(|name| format!("--{}", name.replace('_', "-")))
                        .collect();
                    writeln!(f, "Missing required options: {}", flags.join(", "))?;
                }
            }
            DiagnosticKind::UnknownFlag { flag } => {
                writeln!(
                    f,
                    "ERROR: \"{}\" was called with {called_with} (unknown option \"{flag}\")",
                    self.command
                )?;
            }
            DiagnosticKind::MalformedOption { detail } => {
                writeln!(
                    f,
                    "ERROR: \"{}\" was called with {called_with} ({detail})",
                    self.command
                )?;
            }
            DiagnosticKind::DisallowedValue {
                option,
                value,
                allowed,
            } => {
                writeln!(
                    f,
                    "ERROR: \"{}\" was called with {called_with} (value \"{value}\" for option \"--{option}\" must be one of: {})",
                    self.command,
                    allowed.join(", ")
                )?;
            }
        }
        write!(f, "Usage: \"{}\"", self.usage)
    }
}

/// Result of resolving one argument vector against one command.
#[derive(Debug)]
pub enum ParseOutcome {
    /// `-h`/`--help` was requested; nothing was bound.
    Help,
    Success(Bindings),
    Failure(Diagnostic),
}

impl ParseOutcome {
    #[must_use]
    pub const fn is_help(&self) -> bool {
        matches!(self, Self::Help)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Consume into bindings when successful.
    #[must_use]
    pub fn into_bindings(self) -> Option<Bindings> {
        match self {
            Self::Success(bindings) => Some(bindings),
            _ => None,
        }
    }
}

/// Resolve `args` against `command`'s schema.
#[must_use]
pub fn parse(command: &CommandSpec, args: &[String], usage: &UsageContext) -> ParseOutcome {
    debug!(command = command.get_name(), args = args.len(), "parsing");
    let usage_line = synopsis(command, usage);
    let fail = |kind: DiagnosticKind| {
        ParseOutcome::Failure(Diagnostic {
            kind,
            command: usage.display_name().to_string(),
            invocation: args.to_vec(),
            usage: usage_line.clone(),
        })
    };

    // Step 1: pull declared flags out of the stream.
    let tokenized = match tokenizer::extract(command.get_options(), args) {
        Ok(tokenized) => tokenized,
        Err(TokenizeError::HelpRequested) => return ParseOutcome::Help,
        Err(TokenizeError::UnknownFlag { flag }) => {
            return fail(DiagnosticKind::UnknownFlag { flag });
        }
        Err(TokenizeError::Malformed { detail }) => {
            return fail(DiagnosticKind::MalformedOption { detail });
        }
    };

    // Step 2: positionals in declaration order; a trailing variadic takes
    // the rest, and whatever matches nothing is preserved as unused.
    let mut bindings = Bindings::default();
    let residue = tokenized.residue;
    let mut cursor = 0usize;
    for spec in command.get_arguments() {
        if spec.is_variadic() {
            bindings.insert(spec.get_name(), Value::List(residue[cursor..].to_vec()));
            cursor = residue.len();
        } else if cursor < residue.len() {
            bindings.insert(spec.get_name(), Value::Str(residue[cursor].clone()));
            cursor += 1;
        }
    }
    bindings.unused = residue[cursor..].to_vec();

    // Step 3: defaults, then requiredness.
    for spec in command.get_arguments() {
        if !bindings.contains(spec.get_name()) {
            if let Some(default) = spec.get_default() {
                bindings.insert(spec.get_name(), default.clone());
            }
        }
    }
    let mut option_values: BTreeMap<String, Value> = BTreeMap::new();
    for spec in command.get_options() {
        if !tokenized.options.contains_key(spec.get_name()) {
            if let Some(default) = spec.get_default() {
                option_values.insert(spec.get_name().to_string(), default.clone());
            }
        }
    }
    let missing_arguments: Vec<String> = command
        .get_arguments()
        .iter()
        .filter(|a| a.is_required() && !bindings.contains(a.get_name()))
        .map(|a| a.get_name().to_string())
        .collect();
    let missing_options: Vec<String> = command
        .get_options()
        .iter()
        .filter(|o| {
            o.is_required()
                && !tokenized.options.contains_key(o.get_name())
                && !option_values.contains_key(o.get_name())
        })
        .map(|o| o.get_name().to_string())
        .collect();
    if !missing_arguments.is_empty() || !missing_options.is_empty() {
        return fail(DiagnosticKind::MissingRequired {
            supplied: residue,
            missing_arguments,
            missing_options,
        });
    }

    // Step 4: closed value sets, then coercion. Options only; positionals
    // stay strings.
    for spec in command.get_options() {
        if let Some(raw) = tokenized.options.get(spec.get_name()) {
            if let Some(allowed) = spec.get_allowed() {
                if !allowed.iter().any(|candidate| candidate == raw) {
                    return fail(DiagnosticKind::DisallowedValue {
                        option: spec.flag_name(),
                        value: raw.clone(),
                        allowed: allowed.to_vec(),
                    });
                }
            }
            option_values.insert(
                spec.get_name().to_string(),
                type_cast(spec.get_value_type(), raw),
            );
        }
    }
    for (name, value) in option_values {
        bindings.insert(&name, value);
    }

    // Step 5: done.
    ParseOutcome::Success(bindings)
}

// =========================================
// Tests
// =========================================
