//! Extraction of solve calls embedded in free text.
//!
//! A call has the shape `solve("<expression>", operation='<operation>')`. Whitespace may appear
//! between any two tokens, strings may use either quote style, the arguments may come in either
//! order, and the expression may also be passed as `expression='<expression>'`. The names a call
//! may use are configured with [`Config::call_names`].
//!
//! Text that looks like the start of a call but does not finish as one is ignored.

pub mod token;

use crate::config::Config;
use crate::solve::solve_with;
use logos::{Lexer, Logos};
use std::ops::Range;
use token::CallToken;
use tracing::{debug, error, trace, warn};

/// A solve call found in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'source> {
    /// The region of the text the call spans, from its name to its closing parenthesis.
    pub span: Range<usize>,

    /// The name the call was made with.
    pub name: &'source str,

    /// The expression to solve.
    pub expression: &'source str,

    /// The requested operation. It is not validated here.
    pub operation: &'source str,
}

/// A single argument of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Argument<'source> {
    /// A string passed by position.
    Positional(&'source str),

    /// A string passed by name, like `operation='limit'`.
    Keyword(&'source str, &'source str),
}

/// Parses the part of a call that follows its name.
struct CallParser<'source> {
    lexer: Lexer<'source, CallToken>,
}

impl<'source> CallParser<'source> {
    /// Consumes the next token if it is the expected one.
    fn expect(&mut self, expected: CallToken) -> Option<()> {
        match self.lexer.next() {
            Some(Ok(token)) if token == expected => Some(()),
            _ => None,
        }
    }

    /// Parses a quoted string, returning its contents.
    ///
    /// The string must be non-empty, fit on one line, end with the quote it started with, and
    /// contain no quotes of either kind.
    fn string(&mut self) -> Option<&'source str> {
        self.expect(CallToken::Quote)?;
        let quote = self.lexer.slice();
        let remainder = self.lexer.remainder();

        let len = remainder.find(['"', '\'', '\n'])?;
        if len == 0 || !remainder[len..].starts_with(quote) {
            return None;
        }

        self.lexer.bump(len + 1);
        Some(&remainder[..len])
    }

    fn argument(&mut self) -> Option<Argument<'source>> {
        let mut lookahead = self.lexer.clone();
        if lookahead.next() == Some(Ok(CallToken::Name)) {
            let name = lookahead.slice();
            self.lexer = lookahead;
            self.expect(CallToken::Equals)?;
            return Some(Argument::Keyword(name, self.string()?));
        }

        Some(Argument::Positional(self.string()?))
    }

    /// Parses the parenthesized arguments of a call, returning the expression and operation.
    fn arguments(&mut self) -> Option<(&'source str, &'source str)> {
        self.expect(CallToken::OpenParen)?;
        let first = self.argument()?;
        self.expect(CallToken::Comma)?;
        let second = self.argument()?;
        self.expect(CallToken::CloseParen)?;

        let mut expression = None;
        let mut operation = None;
        for argument in [first, second] {
            let slot = match argument {
                Argument::Positional(_) | Argument::Keyword("expression", _) => &mut expression,
                Argument::Keyword("operation", _) => &mut operation,
                Argument::Keyword(..) => return None,
            };
            let (Argument::Positional(value) | Argument::Keyword(_, value)) = argument;
            if slot.replace(value).is_some() {
                return None;
            }
        }

        Some((expression?, operation?))
    }
}

/// Finds every call in the text, in order of appearance.
pub fn find_calls<'source>(text: &'source str, config: &Config) -> Vec<Call<'source>> {
    let mut calls = Vec::new();
    let mut lexer = CallToken::lexer(text);

    while let Some(token) = lexer.next() {
        if token != Ok(CallToken::Name) || !config.is_call_name(lexer.slice()) {
            continue;
        }

        let name = lexer.slice();
        let start = lexer.span().start;
        let mut parser = CallParser { lexer: lexer.clone() };
        match parser.arguments() {
            Some((expression, operation)) => {
                lexer = parser.lexer;
                calls.push(Call { span: start..lexer.span().end, name, expression, operation });
            },
            None => trace!(name, start, "not a call"),
        }
    }

    calls
}

/// Finds the solve calls in the text using the default [`Config`], solves them, and joins the
/// explanations with blank lines.
///
/// See [`extract_with`] for details.
pub fn extract(text: &str) -> Option<String> {
    extract_with(text, &Config::default())
}

/// Finds the solve calls in the text, solves them, and joins the explanations with blank lines.
///
/// Calls are solved without a point or number of terms, so embedded limits and series produce
/// the text of the missing-parameter error. A call whose computation fails is logged and left
/// out. Returns [`None`] if there are no calls, or if every call failed.
pub fn extract_with(text: &str, config: &Config) -> Option<String> {
    let calls = find_calls(text, config);
    if calls.is_empty() {
        return None;
    }
    debug!(count = calls.len(), "found embedded calls");

    let blocks = calls.iter()
        .filter_map(|call| match solve_with(call.expression, call.operation, None, None, config) {
            Ok(block) => Some(block),
            Err(err) => {
                error!(expression = call.expression, operation = call.operation, %err, "error executing embedded call");
                None
            },
        })
        .collect::<Vec<_>>();

    if blocks.is_empty() {
        warn!(count = calls.len(), "every embedded call failed");
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::solve::solve;
    use pretty_assertions::assert_eq;
    use super::*;

    fn calls(text: &str) -> Vec<(&str, &str)> {
        find_calls(text, &Config::default())
            .into_iter()
            .map(|call| (call.expression, call.operation))
            .collect()
    }

    #[test]
    fn basic_call() {
        let text = r#"Here: solve("x^2", operation='derivative')."#;
        let found = find_calls(text, &Config::default());
        assert_eq!(found, vec![Call {
            span: 6..42,
            name: "solve",
            expression: "x^2",
            operation: "derivative",
        }]);
    }

    #[test]
    fn tolerated_variations() {
        assert_eq!(calls("calc_solve ( 'x' ,\n operation = \"limit\" )"), vec![("x", "limit")]);
        assert_eq!(calls("solve(operation='integral', \"3*x^2\")"), vec![("3*x^2", "integral")]);
        assert_eq!(calls("solve(expression='sin(x)', operation='series')"), vec![("sin(x)", "series")]);
    }

    #[test]
    fn rejected_shapes() {
        assert_eq!(calls("resolve('x', operation='limit')"), vec![]);
        assert_eq!(calls("solve('x')"), vec![]);
        assert_eq!(calls("solve('x', 'limit')"), vec![]);
        assert_eq!(calls("solve('x', operation='limit', point='0')"), vec![]);
        assert_eq!(calls("solve('x\", operation='limit')"), vec![]);
        assert_eq!(calls("solve('', operation='limit')"), vec![]);
        assert_eq!(calls("solve('x', mode='limit')"), vec![]);
    }

    #[test]
    fn apostrophes_in_prose() {
        let text = "Let's differentiate: solve('x^3', operation='derivative'). That's it.";
        assert_eq!(calls(text), vec![("x^3", "derivative")]);
    }

    #[test]
    fn custom_names() {
        let config = Config { call_names: vec!["calc".to_string()], ..Config::default() };
        let found = find_calls("solve('x', operation='limit') calc('x', operation='limit')", &config);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "calc");
    }

    #[test]
    fn no_calls() {
        assert_eq!(extract("There is nothing to solve here."), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn blocks_are_joined() {
        let text = "solve(\"x^2 + sin(x)\", operation='derivative') and then calc_solve('x^2', operation='limit')";
        let expected = [
            solve("x^2 + sin(x)", "derivative", None, None).unwrap(),
            "Error: Point required for limit calculation".to_string(),
        ].join("\n\n");
        assert_eq!(extract(text), Some(expected));
    }

    #[test]
    fn failed_calls_are_dropped() {
        let text = "solve('exp(x^2)', operation='integral') solve('x', operation='derivative')";
        let expected = solve("x", "derivative", None, None).unwrap();
        assert_eq!(extract(text), Some(expected));

        assert_eq!(extract("solve('exp(x^2)', operation='integral')"), None);
    }
}
