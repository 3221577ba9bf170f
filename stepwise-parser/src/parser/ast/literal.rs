use crate::{
    parser::{
        error::{kind, Error},
        token::{Float, Int, Name},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A number literal, such as `16` or `3.14`. The digits are kept as written so that decimals can
/// later be read as exact fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct LitNum {
    /// The digits of the number, as written in the source.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let (value, span) = input
            .try_parse::<Int>()
            .map(|int| (int.lexeme, int.span))
            .or_else(|_| input.try_parse::<Float>().map(|float| (float.lexeme, float.span)))?;
        Ok(Self { value, span })
    }
}

impl std::fmt::Display for LitNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol literal: a name that refers to a variable or constant, such as `x` or `pi`.
#[derive(Debug, Clone, PartialEq)]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<Name>()?;
        Ok(Self {
            name: name.lexeme,
            span: name.span,
        })
    }
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents a literal value in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A number literal.
    Number(LitNum),

    /// A symbol literal.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Ok(num) = input.try_parse::<LitNum>() {
            return Ok(Literal::Number(num));
        }
        if let Ok(sym) = input.try_parse::<LitSym>() {
            return Ok(Literal::Symbol(sym));
        }

        let token = input.next_token()?;
        Err(Error::new(vec![token.span], kind::UnexpectedToken {
            expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name],
            found: token.kind,
            lexeme: token.lexeme.to_owned(),
        }))
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Number(num) => write!(f, "{}", num),
            Literal::Symbol(sym) => write!(f, "{}", sym),
        }
    }
}
