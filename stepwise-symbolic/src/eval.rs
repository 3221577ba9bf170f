//! Numeric evaluation of expressions.
//!
//! Evaluation is done with [`rug::Float`]s at [`PRECISION`] bits, which is enough to tell apart
//! values such as `1e-30` and `0` that the limit computations probe with. Any evaluation that
//! leaves the real domain returns [`None`] instead of a NaN or an infinity.

use crate::expr::{Constant, Func, Primary, SymExpr};
use crate::primitive::{float, PRECISION};
use rug::{float::Constant as FloatConstant, ops::Pow, Float};

/// Values of `cos` smaller than this are treated as zero, making `tan` undefined.
const TAN_POLE_TOLERANCE: f64 = 1e-100;

/// Evaluates the expression with the variable `var` set to the given value.
///
/// Returns [`None`] if the expression contains another variable, or if any part of it is
/// undefined over the reals:
///
/// - `0^a` for `a <= 0`
/// - a negative base raised to a power that is not an integer (or a rational with an odd
///   denominator)
/// - `log(a)` for `a <= 0`
/// - `tan(a)` where `cos(a)` is zero
pub fn eval(expr: &SymExpr, var: &str, value: &Float) -> Option<Float> {
    let result = match expr {
        SymExpr::Primary(Primary::Number(num)) => float(num),
        SymExpr::Primary(Primary::Symbol(sym)) => {
            if sym == var {
                value.clone()
            } else {
                return None;
            }
        },
        SymExpr::Primary(Primary::Const(Constant::E)) => float(1).exp(),
        SymExpr::Primary(Primary::Const(Constant::Pi)) => Float::with_val(PRECISION, FloatConstant::Pi),
        SymExpr::Primary(Primary::Call(func, arg)) => {
            let arg = eval(arg, var, value)?;
            match func {
                Func::Sin => arg.sin(),
                Func::Cos => arg.cos(),
                Func::Tan => {
                    if arg.clone().cos().abs() < TAN_POLE_TOLERANCE {
                        return None;
                    }
                    arg.tan()
                },
                Func::Exp => arg.exp(),
                Func::Log => {
                    if arg <= 0 {
                        return None;
                    }
                    arg.ln()
                },
            }
        },
        SymExpr::Add(terms) => {
            let mut sum = float(0);
            for term in terms {
                sum += eval(term, var, value)?;
            }
            sum
        },
        SymExpr::Mul(factors) => {
            let mut product = float(1);
            for factor in factors {
                product *= eval(factor, var, value)?;
            }
            product
        },
        SymExpr::Exp(base, exp) => eval_power(base, exp, var, value)?,
    };

    if result.is_finite() {
        Some(result)
    } else {
        None
    }
}

fn eval_power(base: &SymExpr, exp: &SymExpr, var: &str, value: &Float) -> Option<Float> {
    let base_value = eval(base, var, value)?;
    let exp_value = eval(exp, var, value)?;

    if base_value.is_zero() {
        return if exp_value > 0 { Some(float(0)) } else { None };
    }

    if base_value > 0 || exp_value.is_integer() {
        return Some(base_value.pow(&exp_value));
    }

    // negative base: only odd roots are real, such as `(-8)^(1/3) = -2`
    let exp_rational = exp.as_number()?;
    if exp_rational.denom().is_even() {
        return None;
    }
    let magnitude = base_value.abs().pow(&exp_value);
    if exp_rational.numer().is_odd() {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

/// Evaluates an expression that does not depend on any variable.
pub fn eval_constant(expr: &SymExpr) -> Option<Float> {
    eval(expr, "", &float(0))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::normalize::normalize;
    use super::*;

    fn eval_at(input: &str, x: f64) -> Option<f64> {
        eval(&normalize(input).unwrap(), "x", &float(x)).map(|value| value.to_f64())
    }

    #[test]
    fn polynomial_and_functions() {
        assert_float_absolute_eq!(eval_at("x^2 + 2*x + 1", 2.0).unwrap(), 9.0);
        assert_float_absolute_eq!(eval_at("sin(x)^2 + cos(x)^2", 0.7).unwrap(), 1.0);
        assert_float_absolute_eq!(eval_at("exp(log(x))", 3.5).unwrap(), 3.5);
        assert_float_absolute_eq!(eval_at("pi*E", 0.0).unwrap(), std::f64::consts::PI * std::f64::consts::E);
    }

    #[test]
    fn odd_roots_of_negative_numbers() {
        assert_float_absolute_eq!(eval_at("x^(1/3)", -8.0).unwrap(), -2.0);
        assert_float_absolute_eq!(eval_at("x^(2/3)", -8.0).unwrap(), 4.0);
        assert_eq!(eval_at("sqrt(x)", -1.0), None);
    }

    #[test]
    fn domain_errors() {
        assert_eq!(eval_at("1/x", 0.0), None);
        assert_eq!(eval_at("x^0", 0.0), None);
        assert_eq!(eval_at("log(x)", 0.0), None);
        assert_eq!(eval_at("log(x)", -2.0), None);
        assert_eq!(eval_at("y + 1", 0.0), None);
    }

    #[test]
    fn constants() {
        let value = eval_constant(&normalize("sqrt(2)/2").unwrap()).unwrap();
        assert_float_absolute_eq!(value.to_f64(), std::f64::consts::FRAC_1_SQRT_2);
    }
}
