use std::fmt;

use crate::command::CommandSpec;
use crate::parser::Bindings;

/// Object-form callback. Prefer [`Callback::closure`] unless the hook carries
/// state worth naming.
pub trait CallbackHandler: Send + Sync {
    fn call(&self, command: &CommandSpec, bindings: &Bindings) -> anyhow::Result<()>;
}

/// A before/after hook in either closure or handler form. Both receive the
/// matched command and its resolved bindings; a returned error aborts the
/// dispatch.
pub enum Callback {
    Closure(Box<dyn Fn(&CommandSpec, &Bindings) -> anyhow::Result<()> + Send + Sync>),
    Handler(Box<dyn CallbackHandler>),
}

impl Callback {
    #[must_use]
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&CommandSpec, &Bindings) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Closure(Box::new(f))
    }

    #[must_use]
    pub fn handler(h: impl CallbackHandler + 'static) -> Self {
        Self::Handler(Box::new(h))
    }

    fn run(&self, command: &CommandSpec, bindings: &Bindings) -> anyhow::Result<()> {
        match self {
            Self::Closure(f) => f(command, bindings),
            Self::Handler(h) => h.call(command, bindings),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closure(_) => f.write_str("Callback::Closure"),
            Self::Handler(_) => f.write_str("Callback::Handler"),
        }
    }
}

/// Callbacks attached to one trie node, kept in registration order.
#[derive(Debug, Default)]
pub struct CallbackChain {
    callbacks: Vec<Callback>,
}

impl CallbackChain {
    pub fn push(&mut self, callback: Callback) {
        self.callbacks.push(callback);
    }

    /// Append another chain, preserving both orders.
    pub fn append(&mut self, mut other: Self) {
        self.callbacks.append(&mut other.callbacks);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run every callback in order. The first error short-circuits; later
    /// callbacks do not run.
    pub fn run(&self, command: &CommandSpec, bindings: &Bindings) -> anyhow::Result<()> {
        for callback in &self.callbacks {
            callback.run(command, bindings)?;
        }
        Ok(())
    }
}

// =========================================
// Tests
// =========================================
