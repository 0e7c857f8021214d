//! Shell completion scripts for a built registry.
//!
//! `clap_complete` generates from a clap `Command`, so the trie is mirrored
//! into one: child tokens become subcommands, parent-level aliases become
//! subcommand aliases, and each node's schema contributes its args. The
//! mirror is rebuilt per call; registries are small and frozen by the time
//! completions are wanted.

use std::io;

use clap::{Arg, Command};
use clap_complete::generate;
pub use clap_complete::Shell;
use itertools::Itertools;
use tracing::debug;

use crate::registry::{NodeId, ROOT, Registry};
use crate::tokenizer;

/// Mirror the registry as a clap command tree rooted at `bin_name`.
#[must_use]
pub fn command_tree(registry: &Registry, bin_name: &str) -> Command {
    subtree(registry, ROOT, bin_name)
}

/// Write a completion script for `shell` to `out`.
pub fn write_completions(
    registry: &Registry,
    bin_name: &str,
    shell: Shell,
    out: &mut dyn io::Write,
) {
    debug!(bin_name, ?shell, "generating completions");
    let mut cmd = command_tree(registry, bin_name);
    generate(shell, &mut cmd, bin_name.to_string(), out);
}

fn subtree(registry: &Registry, id: NodeId, token: &str) -> Command {
    let node = registry.node(id);
    let mut cmd = Command::new(token.to_string());
    if let Some(spec) = &node.command {
        cmd = cmd.about(spec.get_description().to_string());
        for arg in spec.get_arguments() {
            let mut positional = Arg::new(arg.get_name().to_string())
                .value_name(arg.get_name().to_uppercase())
                .help(arg.get_help().to_string());
            if arg.is_variadic() {
                positional = positional.num_args(0..);
            }
            cmd = cmd.arg(positional);
        }
        for opt in spec.get_options() {
            cmd = cmd.arg(tokenizer::arg_for(opt));
        }
    }
    for child_token in node.children.keys().sorted() {
        let child_id = node.children[child_token];
        let mut sub = subtree(registry, child_id, child_token);
        for (alias, target) in &node.aliases {
            // An alias shadowed by an explicit child is dead in lookup, so
            // it must not appear in completions either.
            if *target == child_id && !node.children.contains_key(alias) {
                sub = sub.alias(alias.to_string());
            }
        }
        cmd = cmd.subcommand(sub);
    }
    cmd
}

// =========================================
// Tests
// =========================================
