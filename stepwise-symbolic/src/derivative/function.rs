//! Symbolic derivatives of the supported functions.

use crate::expr::{Func, SymExpr};
use super::{derivative, MultBuilder};

/// Computes the derivative of a call to a supported function and performs the chain rule.
pub(super) fn function_derivative(func: Func, arg: &SymExpr, var: &str) -> SymExpr {
    let mut mult_group = MultBuilder::default();
    mult_group.mult(derivative(arg, var));

    match func {
        Func::Sin => mult_group.mult(SymExpr::call(Func::Cos, arg.clone())),
        Func::Cos => {
            mult_group.mult(SymExpr::number(-1));
            mult_group.mult(SymExpr::call(Func::Sin, arg.clone()));
        },
        // sec^2(u) = 1 / cos^2(u)
        Func::Tan => mult_group.mult(SymExpr::call(Func::Cos, arg.clone()).pow(SymExpr::number(-2))),
        Func::Exp => mult_group.mult(SymExpr::call(Func::Exp, arg.clone())),
        Func::Log => mult_group.mult(arg.clone().recip()),
    }

    mult_group.into()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn tan_is_sec_squared() {
        let df = function_derivative(Func::Tan, &x(), "x");
        assert_eq!(df.to_string(), "1/cos(x)^2");
    }

    #[test]
    fn chain_factor_comes_first() {
        let arg = SymExpr::Mul(vec![SymExpr::number(2), x()]);
        let df = function_derivative(Func::Sin, &arg, "x");
        assert_eq!(df, SymExpr::Mul(vec![SymExpr::number(2), SymExpr::call(Func::Cos, arg.clone())]));
    }
}
