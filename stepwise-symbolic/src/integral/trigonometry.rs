//! Rewrites of trigonometric integrands into forms the other strategies can integrate.

use super::{integrate, table};
use crate::expand::expand;
use crate::expr::{Func, Primary, SymExpr};
use crate::simplify::simplify;

/// If the expression is `sin(u)` or `cos(u)`, returns the function and its argument.
fn as_sine_or_cosine(expr: &SymExpr) -> Option<(Func, &SymExpr)> {
    match expr {
        SymExpr::Primary(Primary::Call(func @ (Func::Sin | Func::Cos), arg)) => Some((*func, &**arg)),
        _ => None,
    }
}

/// Rewrites `sin(u)^n` or `cos(u)^n`, where `n` is an integer greater than one, in terms of lower
/// powers.
///
/// - `sin(u)^2 = (1 - cos(2*u)) / 2`
/// - `cos(u)^2 = (1 + cos(2*u)) / 2`
/// - `sin(u)^(2k+1) = sin(u) * (1 - cos(u)^2)^k`
/// - `cos(u)^(2k+1) = cos(u) * (1 - sin(u)^2)^k`
fn reduce_power(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Exp(base, exp) = expr else {
        return None;
    };
    let (func, arg) = as_sine_or_cosine(base)?;
    let n = exp.as_small_integer().filter(|n| *n >= 2)?;

    let one = SymExpr::number(1);
    if n % 2 == 0 {
        let double = SymExpr::call(Func::Cos, SymExpr::number(2) * arg.clone());
        let square = match func {
            Func::Sin => (one - double) * SymExpr::number((1, 2)),
            _ => (one + double) * SymExpr::number((1, 2)),
        };
        Some(square.pow(SymExpr::number(n / 2)))
    } else {
        let other = if func == Func::Sin { Func::Cos } else { Func::Sin };
        let rest = one - SymExpr::call(other, arg.clone()).pow(SymExpr::number(2));
        Some((**base).clone() * rest.pow(SymExpr::number(n / 2)))
    }
}

/// Rewrites the product of two sines or cosines as a sum.
///
/// - `sin(a)*sin(b) = (cos(a - b) - cos(a + b)) / 2`
/// - `cos(a)*cos(b) = (cos(a - b) + cos(a + b)) / 2`
/// - `sin(a)*cos(b) = (sin(a + b) + sin(a - b)) / 2`
fn product_to_sum((first, a): (Func, &SymExpr), (second, b): (Func, &SymExpr)) -> SymExpr {
    let sum = |func: Func| SymExpr::call(func, a.clone() + b.clone());
    let difference = |func: Func| SymExpr::call(func, a.clone() - b.clone());

    let combined = match (first, second) {
        (Func::Sin, Func::Sin) => difference(Func::Cos) - sum(Func::Cos),
        (Func::Cos, Func::Cos) => difference(Func::Cos) + sum(Func::Cos),
        (Func::Sin, _) => sum(Func::Sin) + difference(Func::Sin),
        _ => sum(Func::Sin) - difference(Func::Sin),
    };
    combined * SymExpr::number((1, 2))
}

/// Rewrites one power of `sin` or `cos` among the factors, or else the first two `sin` or `cos`
/// factors.
fn rewrite(factors: &[SymExpr]) -> Option<SymExpr> {
    let rebuild = |replaced: &[usize], with: SymExpr| {
        let mut kept = factors.iter()
            .enumerate()
            .filter(|(idx, _)| !replaced.contains(idx))
            .map(|(_, factor)| factor.clone())
            .collect::<Vec<_>>();
        kept.push(with);
        SymExpr::Mul(kept).downgrade()
    };

    let reduced = factors.iter()
        .enumerate()
        .find_map(|(idx, factor)| Some((idx, reduce_power(factor)?)));
    if let Some((idx, reduced)) = reduced {
        return Some(rebuild(&[idx], reduced));
    }

    let trig = factors.iter()
        .enumerate()
        .filter_map(|(idx, factor)| Some((idx, as_sine_or_cosine(factor)?)))
        .take(2)
        .collect::<Vec<_>>();
    match trig.as_slice() {
        [(i, first), (j, second)] => Some(rebuild(&[*i, *j], product_to_sum(*first, *second))),
        _ => None,
    }
}

/// Integrates `exp(u)*sin(v)` and `exp(u)*cos(v)` for linear `u` and `v`, and products and powers
/// of `sin` and `cos` by rewriting them as sums of simpler terms.
pub(super) fn trigonometric(f: &SymExpr, var: &str, depth: usize) -> Option<SymExpr> {
    let factors = match f {
        SymExpr::Mul(factors) => factors.as_slice(),
        _ => std::slice::from_ref(f),
    };

    if let [first, second] = factors {
        let antiderivative = table::exp_trig(first, second, var)
            .or_else(|| table::exp_trig(second, first, var));
        if antiderivative.is_some() {
            return antiderivative;
        }
    }

    let rewritten = rewrite(factors)?;
    integrate(&simplify(&expand(&rewritten)), var, depth + 1)
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use super::*;

    fn reduced(input: &str) -> Option<String> {
        let f = simplify(&normalize(input).unwrap());
        reduce_power(&f).map(|rewritten| simplify(&expand(&rewritten)).to_string())
    }

    #[test]
    fn power_reduction() {
        assert_eq!(reduced("sin(x)^2").as_deref(), Some("-cos(2*x)/2 + 1/2"));
        assert_eq!(reduced("cos(x)^2").as_deref(), Some("cos(2*x)/2 + 1/2"));
        assert_eq!(reduced("sin(x)"), None);
        assert_eq!(reduced("x^2"), None);
    }

    #[test]
    fn products_become_sums() {
        let x = SymExpr::symbol("x");
        let sum = product_to_sum((Func::Sin, &x), (Func::Cos, &x));
        assert_eq!(simplify(&expand(&sum)).to_string(), "sin(2*x)/2");
    }
}
