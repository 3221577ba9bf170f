//! Canonical ordering of terms and factors.
//!
//! Terms of a sum are ordered with polynomial terms first, by descending degree, then the other
//! terms that depend on a variable, then the terms of degree zero or lower. Factors of a product
//! are ordered numbers first, then constants, variables, calls and sums. Ties are broken by the
//! printed form, so the order is total.

use crate::expr::{Primary, SymExpr};
use rug::Rational;
use std::cmp::Reverse;

/// Returns true if the expression contains a variable.
fn has_symbol(expr: &SymExpr) -> bool {
    expr.post_order_iter()
        .any(|node| matches!(node, SymExpr::Primary(Primary::Symbol(_))))
}

/// Returns the degree of the term, if it is a monomial in its variable.
fn degree(expr: &SymExpr) -> Option<Rational> {
    match expr {
        SymExpr::Primary(Primary::Symbol(_)) => Some(Rational::from(1)),
        SymExpr::Exp(base, exp) if base.as_symbol().is_some() => exp.as_number().cloned(),
        SymExpr::Mul(factors) => factors.iter()
            .map(degree)
            .try_fold(Rational::new(), |acc, factor_degree| Some(acc + factor_degree?)),
        _ if has_symbol(expr) => None,
        _ => Some(Rational::new()),
    }
}

/// The sort key of a term in a sum.
fn term_key(term: &SymExpr) -> (u8, Reverse<Rational>, String) {
    let (class, degree) = match degree(term) {
        Some(degree) if degree.cmp0().is_gt() => (0, degree),
        None => (1, Rational::new()),
        Some(degree) => (2, degree),
    };
    (class, Reverse(degree), term.to_string())
}

/// The sort key of a factor in a product.
fn factor_key(factor: &SymExpr) -> (u8, String) {
    let base = match factor {
        SymExpr::Exp(base, _) => &**base,
        _ => factor,
    };
    let rank = match (factor, base) {
        (SymExpr::Primary(Primary::Number(_)), _) => 0,
        (_, SymExpr::Primary(Primary::Const(_))) => 1,
        (_, SymExpr::Primary(Primary::Symbol(_))) => 2,
        (_, SymExpr::Primary(Primary::Call(..))) => 3,
        (_, SymExpr::Add(_)) => 4,
        _ => 5,
    };
    (rank, factor.to_string())
}

/// Sorts the terms and factors of the expression, recursively.
pub(crate) fn sort(expr: SymExpr) -> SymExpr {
    match expr {
        SymExpr::Primary(Primary::Call(func, arg)) => SymExpr::call(func, sort(*arg)),
        SymExpr::Primary(_) => expr,
        SymExpr::Add(terms) => {
            let mut terms = terms.into_iter().map(sort).collect::<Vec<_>>();
            terms.sort_by_cached_key(term_key);
            SymExpr::Add(terms)
        },
        SymExpr::Mul(factors) => {
            let mut factors = factors.into_iter().map(sort).collect::<Vec<_>>();
            factors.sort_by_cached_key(factor_key);
            SymExpr::Mul(factors)
        },
        SymExpr::Exp(base, exp) => sort(*base).pow(sort(*exp)),
    }
}
