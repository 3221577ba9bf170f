//! Rewriting of expressions as a single fraction.

use crate::expr::SymExpr;

/// `expr^k`, without the power if it is trivial.
fn raise(expr: SymExpr, k: &SymExpr) -> SymExpr {
    if expr.is_one() || k.is_one() {
        expr
    } else {
        expr.pow(k.clone())
    }
}

/// Builds a product from the factors that are not one.
fn product(factors: impl IntoIterator<Item = SymExpr>) -> SymExpr {
    SymExpr::Mul(factors.into_iter().filter(|factor| !factor.is_one()).collect()).downgrade()
}

/// Rewrites the expression as a numerator and a denominator, such that neither contains a power
/// with a negative exponent (outside of function arguments).
///
/// - `sin(x)/x` -> `(sin(x), x)`
/// - `1/x - 1/sin(x)` -> `(sin(x) - x, x*sin(x))`
/// - `x^2 + 1` -> `(x^2 + 1, 1)`
///
/// Neither part is simplified.
pub fn together(expr: &SymExpr) -> (SymExpr, SymExpr) {
    match expr {
        SymExpr::Add(terms) => {
            let parts = terms.iter().map(together).collect::<Vec<_>>();
            if parts.iter().all(|(_, denom)| denom.is_one()) {
                return (expr.clone(), SymExpr::number(1));
            }

            let numer = parts.iter()
                .enumerate()
                .map(|(idx, (numer, _))| {
                    let others = parts.iter()
                        .enumerate()
                        .filter(|(other_idx, _)| *other_idx != idx)
                        .map(|(_, (_, denom))| denom.clone());
                    product(std::iter::once(numer.clone()).chain(others))
                })
                .collect::<Vec<_>>();
            let denom = product(parts.into_iter().map(|(_, denom)| denom));
            (SymExpr::Add(numer), denom)
        },
        SymExpr::Mul(factors) => {
            let (numers, denoms): (Vec<_>, Vec<_>) = factors.iter().map(together).unzip();
            if denoms.iter().all(SymExpr::is_one) {
                return (expr.clone(), SymExpr::number(1));
            }
            (product(numers), product(denoms))
        },
        SymExpr::Exp(base, exp) => match exp.as_number() {
            Some(num) if num.cmp0().is_lt() => {
                let positive = SymExpr::number(-num.clone());
                let (numer, denom) = together(base);
                (raise(denom, &positive), raise(numer, &positive))
            },
            _ => (expr.clone(), SymExpr::number(1)),
        },
        SymExpr::Primary(_) => (expr.clone(), SymExpr::number(1)),
    }
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use crate::simplify::simplify;
    use pretty_assertions::assert_eq;
    use super::*;

    fn together_str(input: &str) -> (String, String) {
        let (numer, denom) = together(&simplify(&normalize(input).unwrap()));
        (simplify(&numer).to_string(), simplify(&denom).to_string())
    }

    #[test]
    fn quotient() {
        assert_eq!(together_str("sin(x)/x"), ("sin(x)".to_string(), "x".to_string()));
        assert_eq!(together_str("3/(2*x^2)"), ("3/2".to_string(), "x^2".to_string()));
    }

    #[test]
    fn common_denominator() {
        assert_eq!(together_str("1/x - 1"), ("-x + 1".to_string(), "x".to_string()));
    }

    #[test]
    fn no_denominator() {
        assert_eq!(together_str("x^2 + 1"), ("x^2 + 1".to_string(), "1".to_string()));
        assert_eq!(together_str("sqrt(x)"), ("sqrt(x)".to_string(), "1".to_string()));
    }
}
