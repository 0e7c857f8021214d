use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CmdtrieError>;

/// Configuration-time failures.
///
/// Only mistakes made while *building* a registry (bad schemas, bad
/// registrations, callbacks attached to unknown paths, scaffold I/O) are
/// errors. Conditions that arise while *resolving* end-user input are data,
/// carried by [`ParseOutcome`](crate::parser::ParseOutcome) and
/// [`DispatchOutcome`](crate::dispatch::DispatchOutcome).
#[derive(Debug, Error)]
pub enum CmdtrieError {
    /// A parameter schema violates a structural rule: duplicate names, a
    /// reserved name, a variadic that is not the final argument, or a default
    /// whose type does not match the declared value type.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A registration call was malformed, such as an alias containing
    /// whitespace.
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    /// A callback was attached to a path the registry does not know.
    #[error("invalid callback registration: {0}")]
    InvalidCallback(String),

    /// Template generation or marker injection failed.
    #[error("scaffold: {0}")]
    Scaffold(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
