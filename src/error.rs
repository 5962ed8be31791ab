use std::fmt;

use crate::lexer::LexError;

/// Error types for sqlx-named-params
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The SQL template could not be tokenized
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A placeholder names a parameter the argument source does not provide
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// The executor returned an error
    #[error("{operation} failed: {source}")]
    Execution {
        operation: Operation,
        #[source]
        source: sqlx::Error,
    },

    /// A single-row fetch returned no rows
    #[error("no rows in result set")]
    NotFound,
}

impl Error {
    /// Wraps an executor error, folding sqlx's own "no rows" signal into [`Error::NotFound`].
    pub(crate) fn execution(operation: Operation, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => Self::NotFound,
            source => Self::Execution { operation, source },
        }
    }

    /// Returns `true` if this is [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// The executor call an [`Error::Execution`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Exec,
    Decode,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Query => "query",
            Operation::Exec => "exec",
            Operation::Decode => "decode",
        })
    }
}

/// Result type alias for sqlx-named-params operations
pub type Result<T> = std::result::Result<T, Error>;
