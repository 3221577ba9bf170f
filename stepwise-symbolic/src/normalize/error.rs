use ariadne::Fmt;
use stepwise_attrs::ErrorKind;
use stepwise_error::{ErrorKind, EXPR};

/// A name was used that is neither the variable nor a known constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown symbol `{}`", name),
    labels = ["this symbol"],
    help = format!(
        "expressions are written in the single variable {}, and may use the constants {} and {}",
        "x".fg(EXPR),
        "pi".fg(EXPR),
        "E".fg(EXPR),
    ),
)]
pub struct UnknownSymbol {
    /// The name of the symbol.
    pub name: String,
}

/// A function was called that is not supported.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = ["this function"],
    help = match suggestion {
        Some(suggestion) => format!("did you mean the `{}` function?", suggestion.fg(EXPR)),
        None => "the supported functions are sin, cos, tan, exp, log and sqrt".to_string(),
    },
)]
pub struct UnknownFunction {
    /// The name of the function that was called.
    pub name: String,

    /// The supported function with the most similar name, if any is close enough.
    pub suggestion: Option<String>,
}

/// A supported function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function takes exactly one argument", name),
    labels = ["this function call"],
    help = format!("there are {} argument(s) provided here", given),
)]
pub struct WrongArgumentCount {
    /// The name of the function that was called.
    pub name: String,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A number literal could not be read as an exact number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", value),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The number as it was written.
    pub value: String,
}
