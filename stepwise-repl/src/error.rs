use rustyline::error::ReadlineError;
use stepwise_error::Error as ParseError;
use stepwise_solve::ComputeError;
use thiserror::Error;

/// Utility enum to package errors that can occur while reading input and solving.
#[derive(Debug, Error)]
pub enum Error {
    /// The expression could not be parsed. `input` is the canonical source it was parsed from.
    #[error("{error}")]
    Parse {
        input: String,
        error: ParseError,
    },

    /// The problem could not be computed.
    #[error("{0}")]
    Compute(#[from] ComputeError),

    /// A REPL command was malformed.
    #[error("usage: :<operation> <expression> [@ <point> [<terms>]]")]
    Command,

    /// A point or a number of terms could not be read.
    #[error("invalid {what} `{value}`")]
    InvalidArgument {
        what: &'static str,
        value: String,
    },

    /// The usage of the program was wrong.
    #[error("usage: stepwise-repl [<operation> <expression> [<point> [<terms>]]]")]
    Usage,

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),
}

impl Error {
    /// Report this error to stderr. Parse errors are rendered as a report highlighting the
    /// offending regions of the input.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Parse { input, error } => error.report_to_stderr(input),
            _ => eprintln!("{}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let err = Error::InvalidArgument { what: "point", value: "abc".to_string() };
        assert_eq!(err.to_string(), "invalid point `abc`");
    }

    #[test]
    fn compute_error_converts() {
        let err: Error = ComputeError::InfinitePoint.into();
        assert!(err.to_string().contains("infinite point"));
    }
}
