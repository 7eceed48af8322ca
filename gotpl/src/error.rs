//! Error taxonomy for tokenizing and evaluating template actions.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while executing a template.
///
/// Errors abort execution immediately; there is no partial-output recovery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed action text, unbalanced delimiters, or a pipeline that
    /// ends where a value was required.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A `$name` reference that no frame in the scope chain defines.
    #[error("undefined variable \"${0}\"")]
    UndefinedVariable(String),

    /// A call to a name that is neither a builtin nor registered.
    #[error("function \"{0}\" not defined")]
    UndefinedFunction(String),

    /// A dotted selector segment missing from the data context.
    #[error("can't evaluate field \"{0}\"")]
    UndefinedField(String),

    /// A function called with the wrong number of arguments.
    #[error("wrong number of args for {name}: want {}{want} got {got}", if *.at_least { "at least " } else { "" })]
    ArityMismatch {
        name: String,
        want: usize,
        got: usize,
        at_least: bool,
    },

    /// An operation applied to operands of the wrong runtime category.
    #[error("{0}")]
    TypeMismatch(String),

    /// A backslash escape outside the supported set.
    #[error("unsupported escape sequence: \\{0}")]
    UnsupportedEscape(char),

    /// A reserved keyword that the interpreter recognizes but does not
    /// support.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl Error {
    pub(crate) fn arity(name: &str, want: usize, got: usize) -> Error {
        Error::ArityMismatch {
            name: name.to_owned(),
            want,
            got,
            at_least: false,
        }
    }

    pub(crate) fn arity_at_least(name: &str, want: usize, got: usize) -> Error {
        Error::ArityMismatch {
            name: name.to_owned(),
            want,
            got,
            at_least: true,
        }
    }
}
