use ariadne::{Fmt, Source};
use stepwise_attrs::ErrorKind;
use stepwise_error::{Error, ErrorKind, EXPR};

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
struct EmptyParenthesis;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = [format!("this {} is not supported", "function".fg(EXPR))],
    help = "supported functions are sin, cos, tan, exp, log and sqrt",
)]
struct UnknownFunction {
    name: String,
}

/// Renders the report of the given error against the source, with colors stripped.
fn render(err: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    err.build_report("input")
        .write(("input", Source::from(source)), &mut buf)
        .unwrap();
    String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
}

#[test]
fn plain_message() {
    let err = Error::new(vec![4..6], EmptyParenthesis);
    assert_eq!(err.message(), "missing expression inside parenthesis");
    assert_eq!(err.to_string(), "missing expression inside parenthesis");
}

#[test]
fn message_with_fields() {
    let err = Error::new(vec![0..3], UnknownFunction { name: "foo".to_string() });
    assert_eq!(err.message(), "unknown function `foo`");
}

#[test]
fn report_contains_labels_and_help() {
    let source = "foo(x)";
    let err = Error::new(vec![0..3], UnknownFunction { name: "foo".to_string() });
    let rendered = render(&err, source);
    assert!(rendered.contains("unknown function `foo`"));
    assert!(rendered.contains("this function is not supported"));
    assert!(rendered.contains("supported functions are sin, cos, tan, exp, log and sqrt"));
}

#[test]
fn report_without_spans() {
    let err = Error::new(Vec::new(), EmptyParenthesis);
    let rendered = render(&err, "()");
    assert!(rendered.contains("missing expression inside parenthesis"));
}
