use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{kind, Error},
        token::{CloseParen, Comma, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A function call, such as `sin(x)`. Arguments are separated by commas; the number of
/// arguments is checked later, once the function is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the comma-separated arguments of a call, up to and including the closing
    /// parenthesis. Returns the arguments and the span of the closing parenthesis.
    fn parse_args(
        input: &mut Parser,
        open_paren: &OpenParen,
    ) -> Result<(Vec<Expr>, Range<usize>), Error> {
        let mut args = Vec::new();

        if input.peek_token().map(|token| token.kind) == Some(TokenKind::CloseParen) {
            let close_paren = input.try_parse::<CloseParen>()?;
            return Ok((args, close_paren.span));
        }

        loop {
            args.push(input.try_parse::<Expr>()?);

            if input.try_parse::<Comma>().is_ok() {
                continue;
            }

            return match input.try_parse::<CloseParen>() {
                Ok(close_paren) => Ok((args, close_paren.span)),
                Err(_) if input.peek_token().is_none() => Err(Error::new(
                    vec![open_paren.span.clone()],
                    kind::UnclosedParenthesis { opening: true },
                )),
                Err(err) => Err(err),
            };
        }
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open_paren = input.try_parse::<OpenParen>()?;
        let (args, close_span) = Self::parse_args(input, &open_paren)?;
        let span = name.span.start..close_span.end;

        Ok(Self {
            name,
            args,
            span,
            paren_span: open_paren.span.start..close_span.end,
        })
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                write!(f, "{}, ", arg)?;
            }
            write!(f, "{}", last)?;
        }
        write!(f, ")")
    }
}
