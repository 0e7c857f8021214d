use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::callbacks::{Callback, CallbackChain};
use crate::command::CommandSpec;
use crate::error::{CmdtrieError, Result};

/// Arena index of a trie node. Nodes are append-only, so an id stays valid
/// for the life of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

pub(crate) const ROOT: NodeId = NodeId(0);

#[derive(Debug, Default)]
pub(crate) struct Node {
    /// Owning edges: next path token to child node.
    pub(crate) children: HashMap<String, NodeId>,
    /// Non-owning shortcuts: alias token to a node owned by `children`
    /// (possibly this node itself, for aliases of a root command).
    pub(crate) aliases: HashMap<String, NodeId>,
    pub(crate) command: Option<CommandSpec>,
    /// Set when a registration with no descriptor detached the command.
    /// Survives merges so a plugin cannot resurrect a suppressed command.
    pub(crate) suppressed: bool,
    pub(crate) before: CallbackChain,
    pub(crate) after: CallbackChain,
}

/// Prefix-trie command registry.
///
/// Multi-word command names ("generate model") are stored one token per
/// level. The registry is built once at startup and then only read; nodes
/// are lazily created during registration and never removed.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: Vec<Node>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Register `command` at the whitespace-split `path`.
    ///
    /// Walking the path creates any missing intermediate nodes as anonymous
    /// groups. Re-registering a path replaces the previous descriptor.
    /// Passing `None` detaches the command at `path` while keeping the node
    /// (and its subtree) alive as a group.
    pub fn register(&mut self, path: &str, command: Option<CommandSpec>) -> Result<()> {
        self.register_with_aliases(path, command, &[])
    }

    /// [`register`](Self::register) plus alias tokens, recorded on the
    /// parent of the final node. A path of zero tokens registers the root
    /// command; its aliases live on the root itself.
    pub fn register_with_aliases(
        &mut self,
        path: &str,
        command: Option<CommandSpec>,
        aliases: &[&str],
    ) -> Result<()> {
        if let Some(spec) = &command {
            spec.validate()?;
        }
        for alias in aliases {
            if alias.is_empty() || alias.contains(char::is_whitespace) {
                return Err(CmdtrieError::InvalidRegistration(format!(
                    "alias {alias:?} for path {path:?} must be a single non-empty token"
                )));
            }
        }

        let tokens: Vec<&str> = path.split_whitespace().collect();
        let mut parent = ROOT;
        let mut node = ROOT;
        for token in &tokens {
            parent = node;
            node = self.child_or_insert(node, token);
        }

        match command {
            Some(spec) => {
                debug!(path, command = spec.get_name(), "registered command");
                let entry = self.node_mut(node);
                entry.command = Some(spec);
                entry.suppressed = false;
            }
            None => {
                debug!(path, "suppressed command");
                let entry = self.node_mut(node);
                entry.command = None;
                entry.suppressed = true;
            }
        }

        for alias in aliases {
            if self.node(parent).children.contains_key(*alias) {
                trace!(alias, path, "alias shadowed by explicit subcommand");
            }
            self.node_mut(parent).aliases.insert((*alias).to_string(), node);
        }
        Ok(())
    }

    /// Resolve `args` to the deepest matching node.
    ///
    /// At each level the next token is looked up among children first, then
    /// aliases. The walk stops the moment a matched node carries a command
    /// (its registration is the longest prefix that can win; everything
    /// after it belongs to the command as arguments). A first-token miss
    /// falls back to the root command when one is registered, with the whole
    /// vector as its arguments.
    #[must_use]
    pub fn lookup<S: AsRef<str>>(&self, args: &[S]) -> LookupResult<'_> {
        let mut node = ROOT;
        let mut matched: Vec<String> = Vec::new();
        for (idx, raw) in args.iter().enumerate() {
            let token = raw.as_ref();
            let current = self.node(node);
            let next = current
                .children
                .get(token)
                .or_else(|| current.aliases.get(token))
                .copied();
            let Some(next) = next else {
                if idx == 0 && self.node(ROOT).command.is_some() {
                    trace!(token, "first token unmatched, using root command");
                    return LookupResult {
                        registry: self,
                        node: ROOT,
                        found: true,
                        matched_path: Vec::new(),
                        remaining: owned(args),
                    };
                }
                trace!(token, depth = idx, "lookup dead end");
                return LookupResult {
                    registry: self,
                    node,
                    found: false,
                    matched_path: matched,
                    remaining: owned(&args[idx..]),
                };
            };
            node = next;
            matched.push(token.to_string());
            if self.node(node).command.is_some() {
                return LookupResult {
                    registry: self,
                    node,
                    found: true,
                    matched_path: matched,
                    remaining: owned(&args[idx + 1..]),
                };
            }
        }
        let found = self.node(node).command.is_some();
        LookupResult {
            registry: self,
            node,
            found,
            matched_path: matched,
            remaining: Vec::new(),
        }
    }

    /// Attach a callback that runs before the action of the command at
    /// `path`. Fails when no such path exists.
    pub fn register_before(&mut self, path: &str, callback: Callback) -> Result<()> {
        let node = self.resolve_path(path)?;
        self.node_mut(node).before.push(callback);
        Ok(())
    }

    /// Attach a callback that runs after the action of the command at
    /// `path`. Fails when no such path exists.
    pub fn register_after(&mut self, path: &str, callback: Callback) -> Result<()> {
        let node = self.resolve_path(path)?;
        self.node_mut(node).after.push(callback);
        Ok(())
    }

    /// Fold another registry into this one. Later registrations win, with
    /// one exception: a command suppressed on either side stays suppressed
    /// unless `other` explicitly re-registers it. Callback chains append.
    pub fn merge(&mut self, mut other: Self) {
        let paths = other.paths_by_id();
        for idx in 0..other.nodes.len() {
            let self_id = self.ensure_path(&paths[idx]);
            let command = other.nodes[idx].command.take();
            let suppressed = other.nodes[idx].suppressed;
            let before = std::mem::take(&mut other.nodes[idx].before);
            let after = std::mem::take(&mut other.nodes[idx].after);
            let aliases: Vec<(String, NodeId)> = other.nodes[idx].aliases.drain().collect();

            if let Some(spec) = command {
                let entry = self.node_mut(self_id);
                entry.command = Some(spec);
                entry.suppressed = false;
            } else if suppressed {
                let entry = self.node_mut(self_id);
                entry.command = None;
                entry.suppressed = true;
            }
            self.node_mut(self_id).before.append(before);
            self.node_mut(self_id).after.append(after);
            for (token, target) in aliases {
                let target_id = self.ensure_path(&paths[target.0]);
                self.node_mut(self_id).aliases.insert(token, target_id);
            }
        }
        debug!(nodes = self.nodes.len(), "merged registries");
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn child_or_insert(&mut self, parent: NodeId, token: &str) -> NodeId {
        if let Some(&existing) = self.nodes[parent.0].children.get(token) {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::default());
        self.nodes[parent.0].children.insert(token.to_string(), id);
        trace!(token, id = id.0, "created trie node");
        id
    }

    fn ensure_path(&mut self, path: &[String]) -> NodeId {
        let mut node = ROOT;
        for token in path {
            node = self.child_or_insert(node, token);
        }
        node
    }

    /// Walk a registration-style path without creating nodes. Aliases are
    /// honored so callbacks can target either spelling.
    fn resolve_path(&self, path: &str) -> Result<NodeId> {
        let mut node = ROOT;
        for token in path.split_whitespace() {
            let current = self.node(node);
            node = current
                .children
                .get(token)
                .or_else(|| current.aliases.get(token))
                .copied()
                .ok_or_else(|| {
                    CmdtrieError::InvalidCallback(format!(
                        "no command registered at {path:?} (unknown segment {token:?})"
                    ))
                })?;
        }
        Ok(node)
    }

    /// Token paths indexed by arena position. Every node has exactly one
    /// owning parent edge, so the path is unique.
    fn paths_by_id(&self) -> Vec<Vec<String>> {
        let mut paths = vec![Vec::new(); self.nodes.len()];
        let mut queue = std::collections::VecDeque::from([ROOT]);
        while let Some(id) = queue.pop_front() {
            for (token, &child) in &self.nodes[id.0].children {
                let mut path = paths[id.0].clone();
                path.push(token.clone());
                paths[child.0] = path;
                queue.push_back(child);
            }
        }
        paths
    }

    pub(crate) fn briefs_at(&self, id: NodeId) -> Vec<CommandBrief> {
        let node = self.node(id);
        let mut briefs: Vec<CommandBrief> = node
            .children
            .iter()
            .map(|(token, &child_id)| {
                let child = self.node(child_id);
                let mut aliases: Vec<String> = node
                    .aliases
                    .iter()
                    .filter(|&(_, &target)| target == child_id)
                    .map(|(alias, _)| alias.clone())
                    .collect();
                aliases.sort();
                match &child.command {
                    Some(spec) => {
                        let mut usage = token.clone();
                        for arg in spec.get_arguments().iter().filter(|a| a.is_required()) {
                            usage.push(' ');
                            usage.push_str(&arg.get_name().to_uppercase());
                        }
                        if !child.children.is_empty() {
                            usage.push_str(" SUBCOMMAND");
                        }
                        CommandBrief {
                            name: token.clone(),
                            usage,
                            description: spec.get_description().to_string(),
                            aliases,
                            is_group: false,
                        }
                    }
                    None => CommandBrief {
                        name: token.clone(),
                        usage: format!("{token} SUBCOMMAND"),
                        description: String::new(),
                        aliases,
                        is_group: true,
                    },
                }
            })
            .collect();
        briefs.sort_by(|a, b| a.name.cmp(&b.name));
        briefs
    }

    /// Briefs for every command reachable from the root, mostly useful for
    /// a top-level listing.
    #[must_use]
    pub fn root_briefs(&self) -> Vec<CommandBrief> {
        self.briefs_at(ROOT)
    }
}

fn owned<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter().map(|a| a.as_ref().to_string()).collect()
}

/// One row of a command listing: a direct subcommand of some node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandBrief {
    pub name: String,
    /// Ready-to-print synopsis fragment: the token, required argument
    /// placeholders, and a `SUBCOMMAND` marker when the node has children.
    pub usage: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub is_group: bool,
}

/// Borrow-view over the registry produced by [`Registry::lookup`].
#[derive(Debug)]
pub struct LookupResult<'a> {
    registry: &'a Registry,
    node: NodeId,
    found: bool,
    matched_path: Vec<String>,
    remaining: Vec<String>,
}

impl<'a> LookupResult<'a> {
    /// Whether the walk ended on a node that carries a command.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.found
    }

    #[must_use]
    pub fn command(&self) -> Option<&'a CommandSpec> {
        self.registry.node(self.node).command.as_ref()
    }

    /// Tokens consumed by the trie walk, alias spellings included.
    #[must_use]
    pub fn matched_path(&self) -> &[String] {
        &self.matched_path
    }

    /// Tokens left over for the command, in original order.
    #[must_use]
    pub fn remaining_args(&self) -> &[String] {
        &self.remaining
    }

    /// `program` followed by the matched path, e.g. `"prog generate model"`.
    #[must_use]
    pub fn display_name(&self, program: &str) -> String {
        if self.matched_path.is_empty() {
            program.to_string()
        } else {
            format!("{program} {}", self.matched_path.join(" "))
        }
    }

    #[must_use]
    pub fn has_subcommands(&self) -> bool {
        !self.registry.node(self.node).children.is_empty()
    }

    /// Direct subcommands of the matched node, sorted by token.
    #[must_use]
    pub fn subcommands(&self) -> Vec<CommandBrief> {
        self.registry.briefs_at(self.node)
    }

    #[must_use]
    pub fn before_chain(&self) -> &'a CallbackChain {
        &self.registry.node(self.node).before
    }

    #[must_use]
    pub fn after_chain(&self) -> &'a CallbackChain {
        &self.registry.node(self.node).after
    }
}

// =========================================
// Tests
// =========================================
