use std::fmt;

use serde::Serialize;

use crate::error::{CmdtrieError, Result};

/// Option names that would collide with the automatic help flags.
const RESERVED_NAMES: &[&str] = &["help", "h"];

/// Raw strings coerced to boolean `false`. Everything else (except the empty
/// string) is `true`.
const FALSE_WORDS: &[&str] = &["false", "f", "0", "off"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Argument,
    Option,
}

/// Declared coercion target for a parameter.
///
/// `Flag` behaves exactly like `Boolean`; it exists so a schema can document
/// that an option is presence-oriented rather than value-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Flag,
    Array,
}

impl ValueType {
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Boolean | Self::Flag)
    }
}

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    fn matches(&self, value_type: ValueType) -> bool {
        matches!(
            (self, value_type),
            (Self::Str(_), ValueType::String)
                | (Self::Int(_), ValueType::Integer)
                | (Self::Float(_), ValueType::Float)
                | (Self::Bool(_), ValueType::Boolean | ValueType::Flag)
                | (Self::List(_), ValueType::Array)
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Coerce a raw option string to its declared type.
///
/// Coercion never fails: unparseable input degrades to the type's zero value
/// the way a forgiving scripting runtime would (`"12abc"` is `12`, `"junk"`
/// is `0`, any word outside the false set is `true`).
#[must_use]
pub fn type_cast(value_type: ValueType, raw: &str) -> Value {
    match value_type {
        ValueType::String => Value::Str(raw.to_string()),
        ValueType::Integer => Value::Int(leading_int(raw)),
        ValueType::Float => Value::Float(leading_float(raw)),
        ValueType::Boolean | ValueType::Flag => Value::Bool(truthy(raw)),
        ValueType::Array => Value::List(split_list(raw)),
    }
}

/// Integer prefix of `raw`, or 0 when none exists. Overflow clamps.
fn leading_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let mut digits = String::new();
    for (i, c) in trimmed.char_indices() {
        if i == 0 && (c == '-' || c == '+') {
            digits.push(c);
        } else if c.is_ascii_digit() {
            digits.push(c);
        } else {
            break;
        }
    }
    if digits.is_empty() || digits == "-" || digits == "+" {
        return 0;
    }
    digits.parse::<i64>().unwrap_or_else(|_| {
        if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Float prefix of `raw` (sign, digits, fraction, exponent), or 0.0.
fn leading_float(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0usize;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let has_int = end > int_start;
    let mut has_frac = false;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_frac = true;
            end = frac_end;
        } else if has_int {
            // "4." reads as 4.0
            end += 1;
        }
    }
    if !has_int && !has_frac {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

fn truthy(raw: &str) -> bool {
    if raw.is_empty() {
        return false;
    }
    !FALSE_WORDS.contains(&raw.to_lowercase().as_str())
}

/// Comma-split with trailing empty fields dropped.
fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut parts: Vec<String> = raw.split(',').map(str::to_string).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Declarative schema entry for one positional argument or one named option.
///
/// Built with the chained setters and attached to a
/// [`CommandSpec`](crate::command::CommandSpec); never mutated after
/// registration.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    kind: ParamKind,
    value_type: ValueType,
    required: bool,
    variadic: bool,
    default: Option<Value>,
    aliases: Vec<String>,
    allowed: Option<Vec<String>>,
    help: String,
}

impl ParamSpec {
    /// A positional argument. Optional unless `.required(true)` is set.
    #[must_use]
    pub fn argument(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Argument)
    }

    /// A named option, spelled `--name` (underscores become dashes).
    #[must_use]
    pub fn option(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Option)
    }

    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value_type: ValueType::default(),
            required: false,
            variadic: false,
            default: None,
            aliases: Vec::new(),
            allowed: None,
            help: String::new(),
        }
    }

    #[must_use]
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark a positional argument as consuming every remaining token.
    #[must_use]
    pub fn variadic(mut self, variadic: bool) -> Self {
        self.variadic = variadic;
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Alternate spelling for an option. Leading dashes are ignored, so
    /// `"f"`, `"-f"`, and `"--frc"` are all accepted.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Restrict an option to a closed value set, checked before coercion.
    #[must_use]
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    #[must_use]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn get_kind(&self) -> ParamKind {
        self.kind
    }

    #[must_use]
    pub const fn get_value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_variadic(&self) -> bool {
        self.variadic
    }

    #[must_use]
    pub const fn get_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn get_aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub fn get_allowed(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    #[must_use]
    pub fn get_help(&self) -> &str {
        &self.help
    }

    /// Long-flag spelling of the name: `dry_run` becomes `dry-run`.
    #[must_use]
    pub fn flag_name(&self) -> String {
        self.name.replace('_', "-")
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CmdtrieError::InvalidSchema(
                "parameter name must not be empty".to_string(),
            ));
        }
        if !valid_name(&self.name) {
            return Err(CmdtrieError::InvalidSchema(format!(
                "parameter name {:?} must start with an ASCII letter or digit and contain only letters, digits, '_', or '-'",
                self.name
            )));
        }
        if self.kind == ParamKind::Option && RESERVED_NAMES.contains(&self.name.as_str()) {
            return Err(CmdtrieError::InvalidSchema(format!(
                "option name {:?} is reserved for the help flag",
                self.name
            )));
        }
        match self.kind {
            ParamKind::Argument => {
                if !self.aliases.is_empty() {
                    return Err(CmdtrieError::InvalidSchema(format!(
                        "argument {:?} cannot have aliases",
                        self.name
                    )));
                }
                if self.allowed.is_some() {
                    return Err(CmdtrieError::InvalidSchema(format!(
                        "argument {:?} cannot restrict allowed values; that applies to options",
                        self.name
                    )));
                }
            }
            ParamKind::Option => {
                if self.variadic {
                    return Err(CmdtrieError::InvalidSchema(format!(
                        "option {:?} cannot be variadic",
                        self.name
                    )));
                }
                for alias in &self.aliases {
                    let bare = alias.trim_start_matches('-');
                    if bare.is_empty() || !valid_name(bare) {
                        return Err(CmdtrieError::InvalidSchema(format!(
                            "alias {alias:?} of option {:?} must be a bare flag name",
                            self.name
                        )));
                    }
                    if RESERVED_NAMES.contains(&bare) {
                        return Err(CmdtrieError::InvalidSchema(format!(
                            "alias {alias:?} of option {:?} is reserved for the help flag",
                            self.name
                        )));
                    }
                }
            }
        }
        if let Some(default) = &self.default {
            if !default.matches(self.value_type) {
                return Err(CmdtrieError::InvalidSchema(format!(
                    "default for {:?} does not match its declared type {:?}",
                    self.name, self.value_type
                )));
            }
        }
        Ok(())
    }
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphanumeric()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// =========================================
// Tests
// =========================================
