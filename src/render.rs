//! Text and JSON renderings of listings, help, and diagnostics.
//!
//! The registry, resolver, and dispatcher return data; nothing in this crate
//! prints. These helpers turn that data into strings a host binary can send
//! to a terminal or, via the `*_json` variants, to a robot consumer.

use colored::Colorize;
use itertools::Itertools;
use serde_json::{Value as JsonValue, json};

use crate::command::CommandSpec;
use crate::param::{ParamSpec, Value};
use crate::parser::{Diagnostic, UsageContext};
use crate::registry::CommandBrief;

/// Presentation knobs. Color defaults off so captured output stays plain.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub color: bool,
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            width: 80,
        }
    }
}

/// Program banner: name, version, and a one-line description.
#[must_use]
pub fn banner(program: &str, version: &str, description: &str, opts: &RenderOptions) -> String {
    let name = if opts.color {
        program.bold().to_string()
    } else {
        program.to_string()
    };
    if description.is_empty() {
        format!("{name} {version}")
    } else {
        format!("{name} {version}\n{description}")
    }
}

/// Aligned listing of the commands directly below one node.
#[must_use]
pub fn command_listing(prefix: &str, briefs: &[CommandBrief], opts: &RenderOptions) -> String {
    let mut out = header("Commands:", opts.color);
    out.push('\n');
    let rows: Vec<(String, String)> = briefs
        .iter()
        .map(|brief| {
            let left = format!("{prefix} {}", brief.usage);
            let mut desc = brief.description.clone();
            if !brief.aliases.is_empty() {
                let aliases = format!("[aliases: {}]", brief.aliases.iter().join(", "));
                desc = if desc.is_empty() {
                    aliases
                } else {
                    format!("{desc} {aliases}")
                };
            }
            (left, desc)
        })
        .collect();
    out.push_str(&two_col(&rows));
    out
}

/// Full help screen for one command.
#[must_use]
pub fn command_help(
    command: &CommandSpec,
    usage: &UsageContext,
    subcommands: &[CommandBrief],
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();
    out.push_str(&header("Command:", opts.color));
    out.push_str("\n  ");
    out.push_str(usage.display_name());
    out.push_str("\n\n");
    out.push_str(&header("Usage:", opts.color));
    out.push_str("\n  ");
    out.push_str(&usage_line(command, usage));
    out.push('\n');

    if !command.get_description().is_empty() {
        out.push('\n');
        out.push_str(&header("Description:", opts.color));
        out.push('\n');
        let width = opts.width.saturating_sub(2).max(20);
        out.push_str(&textwrap::indent(
            &textwrap::fill(command.get_description(), width),
            "  ",
        ));
        out.push('\n');
    }

    if !command.get_arguments().is_empty() {
        out.push('\n');
        out.push_str(&header("Arguments:", opts.color));
        out.push('\n');
        let rows: Vec<(String, String)> =
            command.get_arguments().iter().map(argument_row).collect();
        out.push_str(&two_col(&rows));
    }

    out.push('\n');
    out.push_str(&header("Options:", opts.color));
    out.push('\n');
    let mut rows: Vec<(String, String)> = command.get_options().iter().map(option_row).collect();
    rows.push(("--help, -h".to_string(), "Print this help".to_string()));
    out.push_str(&two_col(&rows));

    if !subcommands.is_empty() {
        out.push('\n');
        out.push_str(&command_listing(
            usage.display_name(),
            subcommands,
            opts,
        ));
    }

    if !command.get_examples().is_empty() {
        out.push('\n');
        out.push_str(&header("Examples:", opts.color));
        out.push('\n');
        for example in command.get_examples() {
            out.push_str("  ");
            out.push_str(example);
            out.push('\n');
        }
    }
    out
}

/// Render a resolution failure. The leading line turns red under color.
#[must_use]
pub fn failure(diag: &Diagnostic, opts: &RenderOptions) -> String {
    let text = diag.to_string();
    if !opts.color {
        return text;
    }
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = first.red().bold().to_string();
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// Message for a lookup that found no command, with an optional typo
/// suggestion and the listing of what exists at the deepest matched node.
#[must_use]
pub fn unknown_command(
    prefix: &str,
    attempted: Option<&str>,
    suggestion: Option<&str>,
    briefs: &[CommandBrief],
    opts: &RenderOptions,
) -> String {
    let error_line = match attempted {
        Some(token) => format!("ERROR: \"{prefix}\" has no command \"{token}\""),
        None => format!("ERROR: \"{prefix}\" expects a command"),
    };
    let mut out = if opts.color {
        error_line.red().bold().to_string()
    } else {
        error_line
    };
    out.push('\n');
    if let Some(name) = suggestion {
        out.push_str(&format!("Did you mean \"{name}\"?\n"));
    }
    if !briefs.is_empty() {
        out.push('\n');
        out.push_str(&command_listing(prefix, briefs, opts));
    }
    out
}

/// Machine-readable command listing.
#[must_use]
pub fn listing_json(briefs: &[CommandBrief]) -> JsonValue {
    json!({ "commands": briefs })
}

/// Machine-readable failure, mirroring the human message.
#[must_use]
pub fn diagnostic_json(diag: &Diagnostic) -> JsonValue {
    json!({
        "error": true,
        "code": diag.kind.code(),
        "message": diag.to_string(),
        "command": diag.command,
        "invocation": diag.invocation,
        "usage": diag.usage,
    })
}

fn header(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Usage line for help screens: every argument shown, optional ones in
/// brackets, variadics with an ellipsis.
fn usage_line(command: &CommandSpec, usage: &UsageContext) -> String {
    let mut parts = vec![usage.display_name().to_string()];
    for arg in command.get_arguments() {
        let upper = arg.get_name().to_uppercase();
        let token = if arg.is_variadic() {
            format!("{upper}...")
        } else {
            upper
        };
        if arg.is_required() {
            parts.push(token);
        } else {
            parts.push(format!("[{token}]"));
        }
    }
    if usage.has_subcommands() {
        parts.push("SUBCOMMAND".to_string());
    }
    parts.join(" ")
}

fn argument_row(arg: &ParamSpec) -> (String, String) {
    let mut desc = String::new();
    if arg.is_required() {
        desc.push_str("REQUIRED ");
    }
    desc.push_str(arg.get_help());
    if let Some(default) = arg.get_default() {
        desc.push_str(&format!(" (default: {})", render_default(default)));
    }
    (arg.get_name().to_uppercase(), desc.trim().to_string())
}

fn option_row(opt: &ParamSpec) -> (String, String) {
    let long = opt.flag_name();
    let boolean = opt.get_value_type().is_boolean();
    let mut forms = Vec::new();
    if boolean {
        forms.push(format!("--[no-]{long}"));
    } else {
        forms.push(format!("--{long}=VALUE"));
    }
    for alias in opt.get_aliases() {
        let bare = alias.trim_start_matches('-');
        let dashed = if bare.chars().count() == 1 {
            format!("-{bare}")
        } else {
            format!("--{bare}")
        };
        if boolean {
            forms.push(dashed);
        } else {
            forms.push(format!("{dashed} VALUE"));
        }
    }
    let mut desc = String::new();
    if opt.is_required() {
        desc.push_str("REQUIRED ");
    }
    desc.push_str(opt.get_help());
    if let Some(allowed) = opt.get_allowed() {
        desc.push_str(&format!(" (values: {})", allowed.iter().join(", ")));
    }
    if let Some(default) = opt.get_default() {
        desc.push_str(&format!(" (default: {})", render_default(default)));
    }
    (forms.iter().join(", "), desc.trim().to_string())
}

fn render_default(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

fn two_col(rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (left, desc) in rows {
        if desc.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:<width$}  # {desc}\n"));
        }
    }
    out
}

// =========================================
// Tests
// =========================================
