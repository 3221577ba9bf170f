mod error;
mod logger;

use error::Error;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{io::{self, IsTerminal, Read}, process::ExitCode};
use stepwise_parser::canonical_source;
use stepwise_solve::{extract, solve};
use stepwise_symbolic::normalize;
use tracing::debug;

/// A single problem to solve.
#[derive(Debug, Clone, PartialEq)]
struct Request {
    operation: String,
    expression: String,
    point: Option<f64>,
    terms: Option<u32>,
}

/// Reads a point, which may be infinite (`oo`, `-oo`, `inf`, or `-inf`).
fn parse_point(s: &str) -> Result<f64, Error> {
    match s {
        "oo" | "+oo" => Ok(f64::INFINITY),
        "-oo" => Ok(f64::NEG_INFINITY),
        _ => s.parse::<f64>()
            .ok()
            .filter(|point| !point.is_nan())
            .ok_or_else(|| Error::InvalidArgument { what: "point", value: s.to_string() }),
    }
}

fn parse_terms(s: &str) -> Result<u32, Error> {
    s.parse().map_err(|_| Error::InvalidArgument { what: "number of terms", value: s.to_string() })
}

impl Request {
    /// Reads a request from the command-line arguments, `<operation> <expression> [<point>
    /// [<terms>]]`.
    fn from_args(args: &[String]) -> Result<Self, Error> {
        let (operation, expression, params) = match args {
            [operation, expression, params @ ..] if params.len() <= 2 => (operation, expression, params),
            _ => return Err(Error::Usage),
        };

        Ok(Self {
            operation: operation.clone(),
            expression: expression.clone(),
            point: params.first().map(|s| parse_point(s)).transpose()?,
            terms: params.get(1).map(|s| parse_terms(s)).transpose()?,
        })
    }

    /// Reads a request from a REPL command, `:<operation> <expression> [@ <point> [<terms>]]`.
    fn from_command(line: &str) -> Result<Self, Error> {
        let command = line.strip_prefix(':').ok_or(Error::Command)?.trim();
        let (operation, rest) = command.split_once(char::is_whitespace).ok_or(Error::Command)?;
        let (expression, params) = rest.split_once('@').unwrap_or((rest, ""));

        let expression = expression.trim();
        let params = params.split_whitespace().collect::<Vec<_>>();
        if expression.is_empty() || params.len() > 2 {
            return Err(Error::Command);
        }

        Ok(Self {
            operation: operation.to_string(),
            expression: expression.to_string(),
            point: params.first().map(|s| parse_point(s)).transpose()?,
            terms: params.get(1).map(|s| parse_terms(s)).transpose()?,
        })
    }

    /// Solves the request.
    ///
    /// Unlike [`solve`], which returns parse errors inline, parse errors are returned as
    /// [`Error::Parse`] so they can be reported with the offending regions highlighted.
    fn solve(&self) -> Result<String, Error> {
        if let Err(error) = normalize(&self.expression) {
            return Err(Error::Parse { input: canonical_source(&self.expression), error });
        }
        Ok(solve(&self.expression, &self.operation, self.point, self.terms)?)
    }
}

/// Runs the solve calls found in the text, printing their explanations.
fn extract_and_print(text: &str) {
    match extract(text) {
        Some(output) => println!("{}", output),
        None => debug!("no solve calls found"),
    }
}

/// Handles one line of interactive input.
fn repl_execute(input: &str) {
    if input.starts_with(':') {
        match Request::from_command(input).and_then(|request| request.solve()) {
            Ok(output) => println!("{}", output),
            Err(err) => err.report_to_stderr(),
        }
    } else {
        extract_and_print(input);
    }
}

fn run_repl() -> Result<(), Error> {
    let mut rl = DefaultEditor::new()?;

    fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        repl_execute(&input);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl) {
            return match err {
                ReadlineError::Eof | ReadlineError::Interrupted => Ok(()),
                _ => Err(err.into()),
            };
        }
    }
}

fn run() -> Result<(), Error> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    if !args.is_empty() {
        // solve the problem given on the command line
        let output = Request::from_args(&args)?.solve()?;
        println!("{}", output);
        Ok(())
    } else if !io::stdin().is_terminal() {
        // run the calls in the text piped to stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        extract_and_print(&input);
        Ok(())
    } else {
        run_repl()
    }
}

fn main() -> ExitCode {
    if let Err(err) = logger::init() {
        eprintln!("{}", err);
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report_to_stderr();
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn request_from_args() {
        let request = Request::from_args(&args(&["series", "exp(x)", "0", "4"])).unwrap();
        assert_eq!(request, Request {
            operation: "series".to_string(),
            expression: "exp(x)".to_string(),
            point: Some(0.0),
            terms: Some(4),
        });

        let request = Request::from_args(&args(&["limit", "1/x", "-oo"])).unwrap();
        assert_eq!(request.point, Some(f64::NEG_INFINITY));
        assert_eq!(request.terms, None);
    }

    #[test]
    fn bad_args() {
        assert!(matches!(Request::from_args(&args(&["limit"])), Err(Error::Usage)));
        assert!(matches!(
            Request::from_args(&args(&["limit", "x", "here"])),
            Err(Error::InvalidArgument { what: "point", .. }),
        ));
        assert!(matches!(
            Request::from_args(&args(&["series", "x", "0", "-2"])),
            Err(Error::InvalidArgument { what: "number of terms", .. }),
        ));
        assert!(matches!(Request::from_args(&args(&["series", "x", "0", "2", "3"])), Err(Error::Usage)));
    }

    #[test]
    fn request_from_command() {
        let request = Request::from_command(":limit sin(x) / x @ 0").unwrap();
        assert_eq!(request, Request {
            operation: "limit".to_string(),
            expression: "sin(x) / x".to_string(),
            point: Some(0.0),
            terms: None,
        });

        let request = Request::from_command(":derivative x^2 + 1").unwrap();
        assert_eq!(request.expression, "x^2 + 1");
        assert_eq!(request.point, None);

        assert!(matches!(Request::from_command(":limit"), Err(Error::Command)));
        assert!(matches!(Request::from_command(":limit @ 0"), Err(Error::Command)));
    }

    #[test]
    fn parse_errors_are_not_inline() {
        let request = Request::from_command(":derivative x^ + 1").unwrap();
        match request.solve() {
            Err(Error::Parse { input, .. }) => assert_eq!(input, "x** + 1"),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
