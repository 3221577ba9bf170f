//! Antiderivatives of the elementary forms.

use crate::derivative::derivative;
use crate::expr::{Func, Primary, SymExpr};
use crate::simplify::simplify;
use rug::Rational;

/// If `u` is a linear function of `var`, such as `3*x + 1`, returns its slope.
pub(super) fn linear_coefficient(u: &SymExpr, var: &str) -> Option<SymExpr> {
    if !u.depends_on(var) {
        return None;
    }

    let slope = simplify(&derivative(u, var));
    if slope.depends_on(var) || slope.is_zero() {
        None
    } else {
        Some(slope)
    }
}

/// `expr / divisor`, without the division if the divisor is one.
pub(super) fn divide(expr: SymExpr, divisor: SymExpr) -> SymExpr {
    if divisor.is_one() {
        expr
    } else {
        expr * divisor.recip()
    }
}

/// `∫ func(u) du`
pub(super) fn function(func: Func, u: &SymExpr) -> SymExpr {
    match func {
        Func::Sin => SymExpr::number(-1) * SymExpr::call(Func::Cos, u.clone()),
        Func::Cos => SymExpr::call(Func::Sin, u.clone()),
        Func::Tan => SymExpr::number(-1) * SymExpr::call(Func::Log, SymExpr::call(Func::Cos, u.clone())),
        Func::Exp => SymExpr::call(Func::Exp, u.clone()),
        Func::Log => u.clone() * SymExpr::call(Func::Log, u.clone()) - u.clone(),
    }
}

/// `∫ u^n du`, where `n` is constant
pub(super) fn power(u: &SymExpr, n: &SymExpr) -> SymExpr {
    match n.as_number() {
        Some(n) if *n == -1 => SymExpr::call(Func::Log, u.clone()),
        Some(n) => {
            let n_plus_one = Rational::from(n + 1u32);
            let coeff = SymExpr::number(n_plus_one.clone().recip());
            u.clone().pow(SymExpr::number(n_plus_one)) * coeff
        },
        None => {
            let n_plus_one = n.clone() + SymExpr::number(1);
            divide(u.clone().pow(n_plus_one.clone()), n_plus_one)
        },
    }
}

/// `∫ a^u du`, where `a` is constant
pub(super) fn exponential(a: &SymExpr, u: &SymExpr) -> SymExpr {
    divide(a.clone().pow(u.clone()), SymExpr::call(Func::Log, a.clone()))
}

/// `∫ exp(u)*sin(v) dx` and `∫ exp(u)*cos(v) dx`, where `u = a*x + b` and `v = c*x + d`
///
/// - `∫ exp(u)*sin(v) dx = exp(u) * (a*sin(v) - c*cos(v)) / (a^2 + c^2)`
/// - `∫ exp(u)*cos(v) dx = exp(u) * (a*cos(v) + c*sin(v)) / (a^2 + c^2)`
pub(super) fn exp_trig(exponential: &SymExpr, trig: &SymExpr, var: &str) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(Func::Exp, u)) = exponential else {
        return None;
    };
    let SymExpr::Primary(Primary::Call(func @ (Func::Sin | Func::Cos), v)) = trig else {
        return None;
    };
    let a = linear_coefficient(u, var)?;
    let c = linear_coefficient(v, var)?;

    let sin = SymExpr::call(Func::Sin, (**v).clone());
    let cos = SymExpr::call(Func::Cos, (**v).clone());
    let combination = match func {
        Func::Sin => a.clone() * sin - c.clone() * cos,
        _ => a.clone() * cos + c.clone() * sin,
    };
    let norm = a.clone() * a + c.clone() * c;
    Some(divide(exponential.clone() * combination, norm))
}

/// Integrates the expression if it is `var`, or an elementary form whose argument is linear in
/// `var`.
///
/// - `∫ sin(a*x + b) dx = -cos(a*x + b) / a`
/// - `∫ (a*x + b)^n dx = (a*x + b)^(n+1) / (a * (n+1))`
/// - `∫ c^(a*x + b) dx = c^(a*x + b) / (a * log(c))`
pub(super) fn linear(f: &SymExpr, var: &str) -> Option<SymExpr> {
    match f {
        SymExpr::Primary(Primary::Symbol(sym)) if sym == var => Some(power(f, &SymExpr::number(1))),
        SymExpr::Primary(Primary::Call(func, u)) => {
            let slope = linear_coefficient(u, var)?;
            Some(divide(function(*func, u), slope))
        },
        SymExpr::Exp(base, exp) if !exp.depends_on(var) => {
            let slope = linear_coefficient(base, var)?;
            Some(divide(power(base, exp), slope))
        },
        SymExpr::Exp(base, exp) if !base.depends_on(var) => {
            let slope = linear_coefficient(exp, var)?;
            Some(divide(exponential(base, exp), slope))
        },
        _ => None,
    }
}
