//! Conversion of user input into [`SymExpr`]s.
//!
//! The input is first rewritten into its canonical source (`^` becomes `**`), then parsed into an
//! AST with [`stepwise_parser`], which is finally converted into a [`SymExpr`]. The conversion
//! checks the things the grammar cannot: that every name is the variable `x` or a known
//! constant, and that every call is to a supported function with exactly one argument. Decimal
//! literals become exact rationals, and `sqrt(u)` becomes `u^(1/2)`.
//!
//! ```
//! use stepwise_symbolic::{normalize, SymExpr};
//!
//! let expr = normalize("0.5*x^2").unwrap();
//! assert_eq!(expr, SymExpr::Mul(vec![
//!     SymExpr::number((1, 2)),
//!     SymExpr::symbol("x").pow(SymExpr::number(2)),
//! ]));
//! ```

pub mod error;

use crate::expr::{Constant, Func, SymExpr};
use crate::primitive::rational_from_decimal;
use levenshtein::levenshtein;
use stepwise_error::Error;
use stepwise_parser::{
    canonical_source,
    parser::{
        ast::{Call, Expr as AstExpr, Literal},
        token::op::{BinOpKind, UnaryOpKind},
        Parser,
    },
};

/// The name of the only variable expressions may use.
pub const VARIABLE: &str = "x";

/// The names of the functions that can be called.
pub const FUNCTIONS: [&str; 6] = ["sin", "cos", "tan", "exp", "log", "sqrt"];

/// Returns the supported function whose name is closest to the given name, if any is close
/// enough to be a likely typo.
fn similar_function(name: &str) -> Option<&'static str> {
    FUNCTIONS.iter()
        .map(|func| (levenshtein(func, name), *func))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, func)| func)
}

fn convert_call(call: Call) -> Result<SymExpr, Error> {
    let name = call.name.name.as_str();
    if !FUNCTIONS.contains(&name) {
        return Err(Error::new(vec![call.name.span.clone()], error::UnknownFunction {
            name: name.to_string(),
            suggestion: similar_function(name).map(str::to_string),
        }));
    }

    if call.args.len() != 1 {
        return Err(Error::new(vec![call.span.clone()], error::WrongArgumentCount {
            name: name.to_string(),
            given: call.args.len(),
        }));
    }

    let mut args = call.args;
    let arg = SymExpr::try_from(args.remove(0))?;
    Ok(match Func::from_name(name) {
        Some(func) => SymExpr::call(func, arg),
        None => arg.sqrt(),
    })
}

/// Converts the AST into a [`SymExpr`], checking that every name and call is supported. No
/// simplification is done.
impl TryFrom<AstExpr> for SymExpr {
    type Error = Error;

    fn try_from(expr: AstExpr) -> Result<Self, Self::Error> {
        match expr {
            AstExpr::Literal(Literal::Number(num)) => match rational_from_decimal(&num.value) {
                Some(value) => Ok(SymExpr::number(value)),
                None => Err(Error::new(vec![num.span], error::InvalidNumber { value: num.value })),
            },
            AstExpr::Literal(Literal::Symbol(sym)) => {
                if sym.name == VARIABLE {
                    Ok(SymExpr::symbol(VARIABLE))
                } else if let Some(constant) = Constant::from_name(&sym.name) {
                    Ok(SymExpr::constant(constant))
                } else {
                    Err(Error::new(vec![sym.span], error::UnknownSymbol { name: sym.name }))
                }
            },
            AstExpr::Paren(paren) => SymExpr::try_from(paren.into_innermost()),
            AstExpr::Call(call) => convert_call(call),
            AstExpr::Unary(unary) => {
                let operand = SymExpr::try_from(*unary.operand)?;
                Ok(match unary.op.kind {
                    UnaryOpKind::Neg => -operand,
                    UnaryOpKind::Pos => operand,
                })
            },
            AstExpr::Binary(binary) => {
                let lhs = SymExpr::try_from(*binary.lhs)?;
                let rhs = SymExpr::try_from(*binary.rhs)?;
                Ok(match binary.op.kind {
                    BinOpKind::Exp => lhs.pow(rhs),
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                })
            },
        }
    }
}

/// Parses the input and converts it into a [`SymExpr`].
///
/// The spans of a returned error refer to the canonical source of the input, as returned by
/// [`canonical_source`].
pub fn normalize(input: &str) -> Result<SymExpr, Error> {
    let source = canonical_source(input);
    let ast = Parser::new(&source).try_parse_full::<AstExpr>()?;
    SymExpr::try_from(ast)
}

#[cfg(test)]
mod tests {
    use crate::expr::Primary;
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn sum_of_power_and_call() {
        let expr = normalize("x^2 + sin(x)").unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            x().pow(SymExpr::number(2)),
            SymExpr::call(Func::Sin, x()),
        ]));
    }

    #[test]
    fn subtraction_and_division() {
        let expr = normalize("2/x - 1").unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::Mul(vec![SymExpr::number(2), x().recip()]),
            SymExpr::number(-1),
        ]));
    }

    #[test]
    fn negation_binds_looser_than_power() {
        let expr = normalize("-x^2").unwrap();
        assert_eq!(expr, SymExpr::Mul(vec![SymExpr::number(-1), x().pow(SymExpr::number(2))]));
    }

    #[test]
    fn sqrt_and_constants() {
        let expr = normalize("sqrt(pi*x) + E").unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::Mul(vec![SymExpr::constant(Constant::Pi), x()]).sqrt(),
            SymExpr::Primary(Primary::Const(Constant::E)),
        ]));
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(normalize("0.25").unwrap(), SymExpr::number((1, 4)));
        assert_eq!(normalize("((3.5))").unwrap(), SymExpr::number((7, 2)));
    }

    #[test]
    fn unknown_symbol() {
        let err = normalize("y + 1").unwrap_err();
        assert_eq!(err.message(), "unknown symbol `y`");
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn unknown_function_suggests() {
        let err = normalize("sine(x)").unwrap_err();
        assert_eq!(err.message(), "unknown function `sine`");
        assert_eq!(err.spans, vec![0..4]);
        assert_eq!(similar_function("sine"), Some("sin"));
        assert_eq!(similar_function("arctangent"), None);
    }

    #[test]
    fn wrong_argument_count() {
        let err = normalize("log(x, 2)").unwrap_err();
        assert_eq!(err.message(), "the `log` function takes exactly one argument");
    }

    #[test]
    fn parse_errors_pass_through() {
        assert_eq!(normalize("x +").unwrap_err().message(), "unexpected end of input");
        assert_eq!(normalize("2 x").unwrap_err().message(), "expected end of input");
    }
}
