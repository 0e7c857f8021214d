//! One-call driver: look up, resolve, run callbacks and the action, and
//! report what happened as data. The host binary decides what to print and
//! when to exit.

use tracing::debug;

use crate::parser::{self, Diagnostic, ParseOutcome, UsageContext};
use crate::registry::{LookupResult, Registry};
use crate::render::{self, RenderOptions};
use crate::suggest;

/// Terminal state of one dispatch. Message fields are pre-rendered with the
/// [`RenderOptions`] the caller passed; the structured pieces ride along for
/// robot output.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Action and callbacks ran to completion.
    Completed,
    HelpRequested {
        help: String,
    },
    UnknownCommand {
        attempted: Vec<String>,
        message: String,
        suggestion: Option<String>,
    },
    ParseFailed {
        diagnostic: Diagnostic,
        message: String,
    },
    /// The action or a callback returned an error.
    ActionFailed {
        error: anyhow::Error,
    },
}

impl DispatchOutcome {
    /// Process exit code a host binary should use. Help is a success.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Completed | Self::HelpRequested { .. } => 0,
            Self::UnknownCommand { .. } | Self::ParseFailed { .. } | Self::ActionFailed { .. } => 1,
        }
    }
}

/// Resolve `args` against the registry and run the matched command.
pub fn dispatch<S: AsRef<str>>(
    registry: &Registry,
    program: &str,
    args: &[S],
    opts: &RenderOptions,
) -> DispatchOutcome {
    let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
    let lookup = registry.lookup(&args);
    let Some(command) = lookup.command().filter(|_| lookup.found()) else {
        return unknown_outcome(&lookup, program, &args, opts);
    };

    let usage = UsageContext::for_lookup(program, &lookup);
    match parser::parse(command, lookup.remaining_args(), &usage) {
        ParseOutcome::Help => {
            let help = render::command_help(command, &usage, &lookup.subcommands(), opts);
            DispatchOutcome::HelpRequested { help }
        }
        ParseOutcome::Failure(diagnostic) => {
            let message = render::failure(&diagnostic, opts);
            DispatchOutcome::ParseFailed {
                diagnostic,
                message,
            }
        }
        ParseOutcome::Success(bindings) => {
            debug!(command = command.get_name(), "running command");
            if let Err(error) = lookup.before_chain().run(command, &bindings) {
                return DispatchOutcome::ActionFailed { error };
            }
            if let Err(error) = command.invoke(&bindings) {
                return DispatchOutcome::ActionFailed { error };
            }
            if let Err(error) = lookup.after_chain().run(command, &bindings) {
                return DispatchOutcome::ActionFailed { error };
            }
            DispatchOutcome::Completed
        }
    }
}

fn unknown_outcome(
    lookup: &LookupResult<'_>,
    program: &str,
    args: &[String],
    opts: &RenderOptions,
) -> DispatchOutcome {
    let briefs = lookup.subcommands();
    let attempted_token = args.get(lookup.matched_path().len()).map(String::as_str);
    let mut pool: Vec<String> = briefs.iter().map(|b| b.name.clone()).collect();
    for brief in &briefs {
        pool.extend(brief.aliases.iter().cloned());
    }
    let suggestion = attempted_token.and_then(|token| suggest::closest(token, &pool));
    let prefix = lookup.display_name(program);
    let message = render::unknown_command(
        &prefix,
        attempted_token,
        suggestion.as_deref(),
        &briefs,
        opts,
    );
    debug!(?attempted_token, ?suggestion, "no command matched");
    DispatchOutcome::UnknownCommand {
        attempted: args.to_vec(),
        message,
        suggestion,
    }
}

// =========================================
// Tests
// =========================================
