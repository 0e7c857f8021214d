use std::fmt;
use std::sync::Arc;

use crate::error::{CmdtrieError, Result};
use crate::param::{ParamKind, ParamSpec};
use crate::parser::Bindings;

/// Work a command performs once its arguments have resolved.
///
/// Implemented automatically by any `Fn(&Bindings) -> anyhow::Result<()>`
/// closure or function, so most callers never name this trait.
pub trait Action: Send + Sync {
    fn invoke(&self, bindings: &Bindings) -> anyhow::Result<()>;
}

impl<F> Action for F
where
    F: Fn(&Bindings) -> anyhow::Result<()> + Send + Sync,
{
    fn invoke(&self, bindings: &Bindings) -> anyhow::Result<()> {
        self(bindings)
    }
}

/// Everything the resolver needs to know about one command: display name,
/// description, examples, the declared parameter schema, and the action to
/// run on success.
#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    description: String,
    examples: Vec<String>,
    arguments: Vec<ParamSpec>,
    options: Vec<ParamSpec>,
    action: Arc<dyn Action>,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CommandSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, action: impl Action + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            examples: Vec::new(),
            arguments: Vec::new(),
            options: Vec::new(),
            action: Arc::new(action),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// One invocation example shown in help output. Chain to add several.
    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Append a positional argument. Declaration order is match order.
    #[must_use]
    pub fn argument(mut self, spec: ParamSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    /// Append a named option.
    #[must_use]
    pub fn option(mut self, spec: ParamSpec) -> Self {
        self.options.push(spec);
        self
    }

    #[must_use]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn get_examples(&self) -> &[String] {
        &self.examples
    }

    #[must_use]
    pub fn get_arguments(&self) -> &[ParamSpec] {
        &self.arguments
    }

    #[must_use]
    pub fn get_options(&self) -> &[ParamSpec] {
        &self.options
    }

    #[must_use]
    pub fn find_option(&self, name: &str) -> Option<&ParamSpec> {
        self.options.iter().find(|opt| opt.get_name() == name)
    }

    /// Run the action with resolved bindings.
    pub fn invoke(&self, bindings: &Bindings) -> anyhow::Result<()> {
        self.action.invoke(bindings)
    }

    /// Check the whole schema. Registration refuses commands that fail here,
    /// so a built registry only ever holds well-formed descriptors.
    pub fn validate(&self) -> Result<()> {
        for spec in self.arguments.iter().chain(&self.options) {
            spec.validate()?;
        }
        for (spec, expected) in self
            .arguments
            .iter()
            .map(|s| (s, ParamKind::Argument))
            .chain(self.options.iter().map(|s| (s, ParamKind::Option)))
        {
            if spec.get_kind() != expected {
                return Err(CmdtrieError::InvalidSchema(format!(
                    "parameter {:?} of command {:?} was declared as {:?} but attached as {expected:?}",
                    spec.get_name(),
                    self.name,
                    spec.get_kind()
                )));
            }
        }
        self.validate_names()?;
        self.validate_argument_order()?;
        self.validate_flag_spellings()
    }

    fn validate_names(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for spec in self.arguments.iter().chain(&self.options) {
            if seen.contains(&spec.get_name()) {
                return Err(CmdtrieError::InvalidSchema(format!(
                    "duplicate parameter name {:?} in command {:?}",
                    spec.get_name(),
                    self.name
                )));
            }
            seen.push(spec.get_name());
        }
        Ok(())
    }

    fn validate_argument_order(&self) -> Result<()> {
        let mut saw_optional = false;
        for (i, spec) in self.arguments.iter().enumerate() {
            if spec.is_variadic() && i != self.arguments.len() - 1 {
                return Err(CmdtrieError::InvalidSchema(format!(
                    "variadic argument {:?} of command {:?} must be declared last",
                    spec.get_name(),
                    self.name
                )));
            }
            if spec.is_required() && saw_optional {
                return Err(CmdtrieError::InvalidSchema(format!(
                    "required argument {:?} of command {:?} follows an optional one",
                    spec.get_name(),
                    self.name
                )));
            }
            if !spec.is_required() {
                saw_optional = true;
            }
        }
        Ok(())
    }

    /// Every long spelling an option contributes (its flag name, its aliases,
    /// and the `no-` twin of boolean flags) must be unique.
    fn validate_flag_spellings(&self) -> Result<()> {
        let mut seen: Vec<String> = Vec::new();
        let mut claim = |spelling: String, owner: &str| -> Result<()> {
            if seen.contains(&spelling) {
                return Err(CmdtrieError::InvalidSchema(format!(
                    "flag spelling {spelling:?} of option {owner:?} in command {:?} is already taken",
                    self.name
                )));
            }
            seen.push(spelling);
            Ok(())
        };
        for opt in &self.options {
            claim(opt.flag_name(), opt.get_name())?;
            if opt.get_value_type().is_boolean() {
                claim(format!("no-{}", opt.flag_name()), opt.get_name())?;
            }
            for alias in opt.get_aliases() {
                claim(alias.trim_start_matches('-').to_string(), opt.get_name())?;
            }
        }
        Ok(())
    }
}

// =========================================
// Tests
// =========================================
