//! Prefix-trie command registry and schema-driven argument dispatch for
//! multi-word CLIs.
//!
//! A [`Registry`] stores commands under whitespace-split paths ("generate
//! model"), with aliases, group nodes, and longest-prefix lookup: the walk
//! stops at the first node that carries a command, and every later token
//! belongs to that command as an argument. Each command declares its
//! positional arguments and named options as [`ParamSpec`]s; the resolver
//! turns a raw token vector into typed [`Bindings`] or a structured
//! diagnostic, never a panic and never an `exit`. What to print and when to
//! exit stays with the host binary.
//!
//! ```
//! use cmdtrie::{Bindings, CommandSpec, ParamSpec, Registry};
//!
//! fn greet(bindings: &Bindings) -> anyhow::Result<()> {
//!     println!("hello {}", bindings.get_str("name").unwrap_or("world"));
//!     Ok(())
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_with_aliases(
//!     "greet",
//!     Some(
//!         CommandSpec::new("greet", greet)
//!             .description("Say hello")
//!             .argument(ParamSpec::argument("name").help("Who to greet")),
//!     ),
//!     &["g"],
//! )?;
//!
//! let lookup = registry.lookup(&["g", "world"]);
//! assert!(lookup.found());
//! assert_eq!(lookup.remaining_args(), ["world"]);
//! # Ok::<(), cmdtrie::CmdtrieError>(())
//! ```
//!
//! [`dispatch`] drives the whole pipeline (lookup, parse, before callbacks,
//! action, after callbacks) and reports a [`DispatchOutcome`] the host maps
//! to output and an exit code. [`render`] turns outcomes into terminal text
//! or JSON, [`completions`] emits shell completion scripts, and
//! [`scaffold`] covers the file-generation chores of generator-style
//! commands.

pub mod callbacks;
pub mod command;
pub mod completions;
pub mod dispatch;
pub mod error;
pub mod param;
pub mod parser;
pub mod registry;
pub mod render;
pub mod scaffold;
pub mod suggest;
mod tokenizer;

pub use callbacks::{Callback, CallbackChain, CallbackHandler};
pub use command::{Action, CommandSpec};
pub use dispatch::{DispatchOutcome, dispatch};
pub use error::{CmdtrieError, Result};
pub use param::{ParamKind, ParamSpec, Value, ValueType, type_cast};
pub use parser::{
    Bindings, Diagnostic, DiagnosticKind, ParseOutcome, UsageContext, parse, synopsis,
};
pub use registry::{CommandBrief, LookupResult, Registry};
pub use render::RenderOptions;
