//! Tokenizer and parser for single-variable calculus expressions, such as `x^2 + sin(x)`.
//!
//! The grammar supports the four arithmetic operators, exponentiation (written `**` or `^`),
//! unary plus and minus, parentheses, and function calls. Implicit multiplication is not
//! supported: `2x` must be written `2*x`.

pub mod parser;
pub mod tokenizer;

/// Rewrites the caret power operator `^` into the canonical `**` form understood by the
/// tokenizer.
///
/// Spans in parse errors refer to positions in the canonical source returned by this function, so
/// reports should be rendered against it.
pub fn canonical_source(input: &str) -> String {
    input.replace('^', "**")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn caret_becomes_double_star() {
        assert_eq!(canonical_source("x^2 + 3^x"), "x**2 + 3**x");
        assert_eq!(canonical_source("x**2"), "x**2");
    }
}
