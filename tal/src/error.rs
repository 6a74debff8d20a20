use derive_more::{Display, Error};

use crate::symbol::SYM_MAX_LEN;

/// The category of a failure, without its context.
///
/// `Undefined` and `OutOfMemory` are the internal errors that fit in an
/// immediate value; everything else is carried by a boxed error record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    #[display(fmt = "undefined")]
    Undefined,
    #[display(fmt = "out-of-memory")]
    OutOfMemory,
    #[display(fmt = "invalid-symbol-length")]
    InvalidSymbolLength,
    #[display(fmt = "symbol-limit-exceeded")]
    SymbolLimitExceeded,
    #[display(fmt = "empty-list-access")]
    EmptyListAccess,
    #[display(fmt = "not-a-list")]
    NotAList,
    #[display(fmt = "not-quoted")]
    NotQuoted,
    #[display(fmt = "unbound")]
    Unbound,
    #[display(fmt = "syntax")]
    Syntax,
    #[display(fmt = "arity-mismatch")]
    ArityMismatch,
    #[display(fmt = "redefinition")]
    Redefinition,
    #[display(fmt = "not-callable")]
    NotCallable,
    #[display(fmt = "environment-full")]
    EnvironmentFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum SyntaxError {
    #[display(fmt = "unexpected `)`")]
    UnexpectedListEnd,
    #[display(fmt = "unterminated list")]
    UnterminatedList,
    #[display(fmt = "quote is not followed by a form")]
    DanglingQuote,
}

#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum Error {
    #[display(fmt = "undefined")]
    Undefined,
    #[display(fmt = "out of memory")]
    OutOfMemory,
    #[display(fmt = "invalid symbol length {} (expected 1 to {})", len, SYM_MAX_LEN)]
    InvalidSymbolLength { len: usize },
    #[display(fmt = "symbol limit of {} exceeded", limit)]
    SymbolLimitExceeded { limit: usize },
    #[display(fmt = "{} of empty list", op)]
    EmptyListAccess { op: &'static str },
    #[display(fmt = "not a proper list")]
    NotAList,
    #[display(fmt = "not a quoted form")]
    NotQuoted,
    #[display(fmt = "unbound symbol `{}`", name)]
    Unbound { name: String },
    #[display(fmt = "syntax error: {}", reason)]
    Syntax { reason: SyntaxError },
    #[display(fmt = "syntax error: invalid token `{}`", text)]
    InvalidToken { text: String },
    #[display(fmt = "`{}` expects {} argument(s), given {}", name, expected, given)]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },
    #[display(fmt = "`{}` is already defined", name)]
    Redefinition { name: String },
    #[display(fmt = "`{}` is not callable", name)]
    NotCallable { name: String },
    #[display(fmt = "environment is full ({} bindings)", capacity)]
    EnvironmentFull { capacity: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Undefined => ErrorKind::Undefined,
            Error::OutOfMemory => ErrorKind::OutOfMemory,
            Error::InvalidSymbolLength { .. } => ErrorKind::InvalidSymbolLength,
            Error::SymbolLimitExceeded { .. } => ErrorKind::SymbolLimitExceeded,
            Error::EmptyListAccess { .. } => ErrorKind::EmptyListAccess,
            Error::NotAList => ErrorKind::NotAList,
            Error::NotQuoted => ErrorKind::NotQuoted,
            Error::Unbound { .. } => ErrorKind::Unbound,
            Error::Syntax { .. } | Error::InvalidToken { .. } => ErrorKind::Syntax,
            Error::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Error::Redefinition { .. } => ErrorKind::Redefinition,
            Error::NotCallable { .. } => ErrorKind::NotCallable,
            Error::EnvironmentFull { .. } => ErrorKind::EnvironmentFull,
        }
    }

    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }
}

impl From<SyntaxError> for Error {
    fn from(reason: SyntaxError) -> Self {
        Error::Syntax { reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
