//! Symbolic integration.
//!
//! [`integral`] finds an antiderivative by trying a sequence of strategies, each recursing into
//! [`integrate`] for the integrals it reduces to:
//!
//! 1. Constants integrate to `c*x`.
//! 2. Sums are integrated term by term.
//! 3. Constant factors are pulled out of products.
//! 4. Elementary forms with an argument that is linear in the variable are looked up in a table.
//! 5. Integrands of the form `F'(g(x)) * g'(x)`, up to a constant factor, integrate to `F(g(x))`.
//! 6. Products of a power of the variable with `exp`, `sin`, `cos` or `log` are integrated by
//!    parts.
//! 7. `exp(u)*sin(v)` and `exp(u)*cos(v)` are looked up in the table. Powers of `sin` and `cos`
//!    are reduced with the double angle formulas, and their products are rewritten as sums.
//! 8. Finally, the integrand is expanded, and integrated again if that changed it.
//!
//! The integration constant is not included in the result.

mod table;
mod trigonometry;

use crate::derivative::derivative;
use crate::expand::expand;
use crate::expr::{Func, Primary, SymExpr};
use crate::simplify::{rules::multiply::split_power, simplify};
use rug::Rational;
use thiserror::Error;

/// The maximum depth of the integrals that a strategy may reduce the integrand to.
const MAX_DEPTH: usize = 16;

/// An error that can occur while integrating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegralError {
    /// None of the strategies could integrate the expression.
    #[error("could not find an antiderivative of {integrand}")]
    Unsupported {
        /// The simplified integrand.
        integrand: SymExpr,
    },
}

/// Computes an antiderivative of the given expression with respect to the variable `var`. The
/// result is simplified.
pub fn integral(f: &SymExpr, var: &str) -> Result<SymExpr, IntegralError> {
    let f = simplify(f);
    match integrate(&f, var, 0) {
        Some(antiderivative) => Ok(simplify(&antiderivative)),
        None => Err(IntegralError::Unsupported { integrand: f }),
    }
}

/// Computes an antiderivative of an already simplified expression. The result is not simplified.
fn integrate(f: &SymExpr, var: &str, depth: usize) -> Option<SymExpr> {
    if depth > MAX_DEPTH {
        return None;
    }

    if !f.depends_on(var) {
        return Some(f.clone() * SymExpr::symbol(var));
    }

    match f {
        SymExpr::Add(terms) => {
            return terms.iter()
                .map(|term| integrate(term, var, depth + 1))
                .collect::<Option<Vec<_>>>()
                .map(SymExpr::Add);
        },
        SymExpr::Mul(factors) => {
            let (constant, dependent): (Vec<_>, Vec<_>) = factors.iter()
                .cloned()
                .partition(|factor| !factor.depends_on(var));
            if !constant.is_empty() {
                let inner = integrate(&SymExpr::Mul(dependent).downgrade(), var, depth + 1)?;
                return Some(SymExpr::Mul(constant) * inner);
            }
        },
        _ => (),
    }

    table::linear(f, var)
        .or_else(|| substitution(f, var))
        .or_else(|| by_parts(f, var, depth))
        .or_else(|| trigonometry::trigonometric(f, var, depth))
        .or_else(|| {
            let expanded = expand(f);
            if expanded != *f {
                integrate(&expanded, var, depth + 1)
            } else {
                None
            }
        })
}

/// Ways to read the factor as `F'(g)`, returned as pairs of `g` and `F(g)`.
fn substitution_candidates(factor: &SymExpr, var: &str) -> Vec<(SymExpr, SymExpr)> {
    let mut candidates = Vec::new();
    match factor {
        SymExpr::Primary(Primary::Call(func, inner)) => {
            candidates.push(((**inner).clone(), table::function(*func, inner)));
        },
        SymExpr::Exp(base, exp) if !base.depends_on(var) => {
            candidates.push(((**exp).clone(), table::exponential(base, exp)));
        },
        _ => (),
    }

    let (base, exp) = split_power(factor);
    if base.depends_on(var) && !exp.depends_on(var) {
        let antiderivative = table::power(&base, &exp);
        candidates.push((base, antiderivative));
    }

    candidates
}

/// `∫ F'(g(x)) * g'(x) dx = F(g(x))`
///
/// Each factor of the integrand is tried as `F'(g(x))`. The substitution applies if the rest of
/// the integrand divided by `g'(x)` is a constant.
fn substitution(f: &SymExpr, var: &str) -> Option<SymExpr> {
    let factors = match f {
        SymExpr::Mul(factors) => factors.clone(),
        _ => vec![f.clone()],
    };

    for (idx, factor) in factors.iter().enumerate() {
        let rest = factors.iter()
            .enumerate()
            .filter(|(other_idx, _)| *other_idx != idx)
            .map(|(_, other)| other.clone())
            .collect::<Vec<_>>();
        let rest = SymExpr::Mul(rest).downgrade();

        for (inner, antiderivative) in substitution_candidates(factor, var) {
            let inner_derivative = simplify(&derivative(&inner, var));
            if inner_derivative.is_zero() {
                continue;
            }

            let ratio = simplify(&(rest.clone() * inner_derivative.recip()));
            if !ratio.depends_on(var) {
                return Some(ratio * antiderivative);
            }
        }
    }

    None
}

/// If the expression is `var` raised to a number, returns the number.
fn monomial_degree(expr: &SymExpr, var: &str) -> Option<Rational> {
    match expr {
        SymExpr::Primary(Primary::Symbol(sym)) if sym == var => Some(Rational::from(1)),
        SymExpr::Exp(base, exp) if base.as_symbol() == Some(var) => exp.as_number().cloned(),
        _ => None,
    }
}

/// `∫ u dv = u*v - ∫ v du`
///
/// Applies to the products `x^n * h(x)`, where `n` is a positive integer and `h` is `exp`, `sin`
/// or `cos` of a linear argument, and to `x^n * log(x)` for any number `n` other than `-1`.
fn by_parts(f: &SymExpr, var: &str, depth: usize) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = f else {
        return None;
    };
    let [first, second] = factors.as_slice() else {
        return None;
    };

    for (monomial, other) in [(first, second), (second, first)] {
        let Some(degree) = monomial_degree(monomial, var) else {
            continue;
        };
        let SymExpr::Primary(Primary::Call(func, arg)) = other else {
            continue;
        };

        match func {
            Func::Exp | Func::Sin | Func::Cos if *degree.denom() == 1 && degree.cmp0().is_gt() => {
                let Some(other_antiderivative) = table::linear(other, var) else {
                    continue;
                };
                let remaining = simplify(&(derivative(monomial, var) * other_antiderivative.clone()));
                let remaining_antiderivative = integrate(&remaining, var, depth + 1)?;
                return Some(monomial.clone() * other_antiderivative - remaining_antiderivative);
            },
            // ∫ x^n log(x) dx = x^(n+1) log(x) / (n+1) - x^(n+1) / (n+1)^2
            Func::Log if arg.as_symbol() == Some(var) && degree != -1 => {
                let n_plus_one = degree + 1u32;
                let raised = SymExpr::symbol(var).pow(SymExpr::number(n_plus_one.clone()));
                let log_coeff = SymExpr::number(n_plus_one.clone().recip());
                let rest_coeff = SymExpr::number(-(n_plus_one.clone() * &n_plus_one).recip());
                return Some(SymExpr::Add(vec![
                    SymExpr::Mul(vec![log_coeff, raised.clone(), other.clone()]),
                    SymExpr::Mul(vec![rest_coeff, raised]),
                ]));
            },
            _ => (),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::eval::eval;
    use crate::normalize::normalize;
    use crate::primitive::float;
    use pretty_assertions::assert_eq;
    use super::*;

    fn integrated(input: &str) -> String {
        integral(&normalize(input).unwrap(), "x").unwrap().to_string()
    }

    /// Checks that the derivative of the antiderivative matches the integrand at a few points.
    fn assert_antiderivative(input: &str) {
        let f = normalize(input).unwrap();
        let antiderivative = integral(&f, "x").unwrap();
        let check = simplify(&derivative(&antiderivative, "x"));
        for x in [0.3, 0.7, 1.3] {
            let expected = eval(&f, "x", &float(x)).unwrap().to_f64();
            let actual = eval(&check, "x", &float(x)).unwrap().to_f64();
            assert_float_absolute_eq!(actual, expected, 1e-9);
        }
    }

    #[test]
    fn polynomial() {
        assert_eq!(integrated("3*x^2 + 2*x"), "x^3 + x^2");
        assert_eq!(integrated("5"), "5*x");
        assert_eq!(integrated("x*(x + 1)^2"), "x^4/4 + 2*x^3/3 + x^2/2");
    }

    #[test]
    fn table_lookups() {
        assert_eq!(integrated("cos(x)"), "sin(x)");
        assert_eq!(integrated("1/x"), "log(x)");
        assert_eq!(integrated("exp(2*x)"), "exp(2*x)/2");
        assert_eq!(integrated("log(x)"), "-x + x*log(x)");
    }

    #[test]
    fn substitution_rule() {
        assert_eq!(integrated("2*x*cos(x^2)"), "sin(x^2)");
        assert_antiderivative("sin(x)*cos(x)");
        assert_antiderivative("log(x)/x");
        assert_antiderivative("x/(x^2 + 1)");
    }

    #[test]
    fn integration_by_parts() {
        assert_eq!(integrated("x*exp(x)"), "-exp(x) + x*exp(x)");
        assert_antiderivative("x^2*sin(x)");
        assert_antiderivative("x*log(x)");
    }

    #[test]
    fn trigonometric_powers() {
        assert_eq!(integrated("sin(x)^2"), "x/2 - sin(2*x)/4");
        assert_antiderivative("cos(x)^2");
        assert_antiderivative("sin(x)^3");
        assert_antiderivative("cos(3*x)^4");
        assert_antiderivative("x*sin(x)^2");
    }

    #[test]
    fn trigonometric_products() {
        assert_antiderivative("sin(x)*cos(x)*exp(x)");
        assert_antiderivative("sin(2*x)*cos(x)");
        assert_antiderivative("sin(x)*sin(3*x)");
        assert_antiderivative("exp(2*x)*cos(3*x)");
        assert_antiderivative("exp(x)*sin(x)^2");
    }

    #[test]
    fn unsupported() {
        let err = integral(&normalize("exp(x^2)").unwrap(), "x").unwrap_err();
        assert_eq!(err.to_string(), "could not find an antiderivative of exp(x^2)");
        assert!(integral(&normalize("1/(x^2 + 1)").unwrap(), "x").is_err());
    }
}
