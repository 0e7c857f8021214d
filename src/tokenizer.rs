//! Flag extraction over the clap builder API.
//!
//! The resolver treats flag syntax as an external concern: this module takes
//! a command's declared options plus the raw token vector and hands back raw
//! option strings and the positional residue. Nothing else in the crate
//! touches clap's parsing surface, so swapping the tokenizer would leave the
//! trie and the resolver untouched.

use std::collections::BTreeMap;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ColorChoice, Command};
use tracing::trace;

use crate::param::ParamSpec;

/// Internal id of the catch-all positional. User parameter names must start
/// with an alphanumeric character, so this can never collide.
const RESIDUE_ID: &str = "__residue";

#[derive(Debug)]
pub(crate) struct TokenizedArgs {
    /// Raw (uncoerced) value per declared option name. Duplicate flags keep
    /// the last occurrence.
    pub(crate) options: BTreeMap<String, String>,
    /// Positional tokens in original order.
    pub(crate) residue: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TokenizeError {
    /// `-h`/`--help` was reached before any malformed token.
    HelpRequested,
    UnknownFlag { flag: String },
    Malformed { detail: String },
}

pub(crate) fn extract(
    options: &[ParamSpec],
    args: &[String],
) -> Result<TokenizedArgs, TokenizeError> {
    let rewritten = rewrite_negations(options, args);
    let matches = match command_for(options).try_get_matches_from(&rewritten) {
        Ok(matches) => matches,
        Err(err) => return Err(classify(&err)),
    };

    let mut values = BTreeMap::new();
    for opt in options {
        if let Some(occurrences) = matches.get_many::<String>(opt.get_name()) {
            if let Some(last) = occurrences.last() {
                values.insert(opt.get_name().to_string(), last.clone());
            }
        }
    }
    let residue: Vec<String> = matches
        .get_many::<String>(RESIDUE_ID)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();
    trace!(options = values.len(), residue = residue.len(), "tokenized");
    Ok(TokenizedArgs {
        options: values,
        residue,
    })
}

/// Build the throwaway clap command used for one extraction.
fn command_for(options: &[ParamSpec]) -> Command {
    let mut cmd = Command::new("resolver")
        .no_binary_name(true)
        .color(ColorChoice::Never);
    for opt in options {
        cmd = cmd.arg(arg_for(opt));
    }
    cmd.arg(
        Arg::new(RESIDUE_ID)
            .action(ArgAction::Append)
            .num_args(0..)
            .value_name("ARGS")
            .hide(true),
    )
}

/// One clap `Arg` per declared option.
///
/// Every option appends occurrences so duplicates are legal; the caller
/// keeps the last. Boolean flags take their value only through `=`
/// (`--force=off`), otherwise a bare `--force` synthesizes `"true"` and the
/// following token stays positional.
pub(crate) fn arg_for(opt: &ParamSpec) -> Arg {
    let mut arg = Arg::new(opt.get_name().to_string())
        .long(opt.flag_name())
        .action(ArgAction::Append)
        .help(opt.get_help().to_string());

    let mut short_taken = false;
    for alias in opt.get_aliases() {
        let bare = alias.trim_start_matches('-');
        let mut chars = bare.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !short_taken => {
                arg = arg.short(c);
                short_taken = true;
            }
            (Some(c), None) => arg = arg.short_alias(c),
            (Some(_), Some(_)) => arg = arg.alias(bare.to_string()),
            (None, _) => {}
        }
    }

    if opt.get_value_type().is_boolean() {
        arg.num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_name("VALUE")
    } else {
        arg.num_args(1).value_name(opt.get_name().to_uppercase())
    }
}

/// Rewrite `--no-<flag>` into `--<flag>=false` for declared boolean flags,
/// leaving everything after a literal `--` untouched. Running before clap
/// keeps last-wins ordering in one value stream.
fn rewrite_negations(options: &[ParamSpec], args: &[String]) -> Vec<String> {
    let negatable: Vec<String> = options
        .iter()
        .filter(|opt| opt.get_value_type().is_boolean())
        .map(ParamSpec::flag_name)
        .collect();
    let mut out = Vec::with_capacity(args.len());
    let mut escaped = false;
    for arg in args {
        if escaped {
            out.push(arg.clone());
            continue;
        }
        if arg == "--" {
            escaped = true;
            out.push(arg.clone());
            continue;
        }
        if let Some(rest) = arg.strip_prefix("--no-") {
            let flag = rest.split_once('=').map_or(rest, |(name, _)| name);
            if negatable.iter().any(|f| f == flag) {
                out.push(format!("--{flag}=false"));
                continue;
            }
        }
        out.push(arg.clone());
    }
    out
}

fn classify(err: &clap::Error) -> TokenizeError {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            TokenizeError::HelpRequested
        }
        ErrorKind::UnknownArgument => {
            let flag = err
                .get(ContextKind::InvalidArg)
                .and_then(|value| match value {
                    ContextValue::String(s) => Some(s.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| first_line(err));
            TokenizeError::UnknownFlag { flag }
        }
        _ => TokenizeError::Malformed {
            detail: first_line(err),
        },
    }
}

fn first_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

// =========================================
// Tests
// =========================================
