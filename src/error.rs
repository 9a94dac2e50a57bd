use thiserror::Error;

/// The crate-wide error type.
///
/// Covers both programmer-facing failures raised at command-declaration time
/// (duplicate registration, malformed grammar, alias collisions) and the
/// analysis-time error taxonomy that surfaces when `raise_exception` is set
/// on a command's [`crate::command::Meta`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No registered header matched the input.
    #[error("no header matched the input")]
    HeaderMissing,

    /// A header nearly matched; this is informational, not fatal.
    #[error("did you mean `{0}`?")]
    FuzzyMatchSuccess(String),

    /// The builtin help alias was seen; carries the rendered help text.
    /// Informational, not fatal — always surfaces regardless of
    /// `raise_exception`.
    #[error("help requested")]
    HelpRequested(String),

    /// The builtin completion alias was seen; carries the candidates still
    /// reachable from the current scope. Informational, not fatal.
    #[error("completion requested")]
    CompletionRequested(crate::completion::CompletionHint),

    /// A token was seen that isn't a known option, subcommand, or arg value.
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),

    /// A required argument slot had no token left to consume.
    #[error("missing required argument `{0}`")]
    ArgMissing(String),

    /// A token was present but failed to match the slot's pattern.
    #[error("invalid value for argument `{name}`: {reason}")]
    ArgInvalid { name: String, reason: String },

    /// An option was repeated without an accumulating action.
    #[error("option `{0}` does not accept repeated invocation")]
    DuplicateOption(String),

    /// Registering a command whose `(headers, command)` fingerprint collides
    /// with one already present in the namespace.
    #[error("command `{0}` is already registered in this namespace")]
    DuplicateCommand(String),

    /// A behavior asked to be silently skipped.
    #[error("behavior cancelled")]
    BehaveCancelled,

    /// A behavior marked the whole result as failed.
    #[error("behavior rejected the result: {0}")]
    OutBoundsBehave(String),

    /// A dotted-path query matched more than one candidate.
    #[error("query path `{0}` is ambiguous between an option and a subcommand")]
    AmbiguousQuery(String),

    /// The pattern-string mini-grammar failed to parse.
    #[error("invalid grammar: {0}")]
    Grammar(String),

    /// A node or argument list violated a declared invariant.
    #[error("declaration error: {0}")]
    Declaration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
