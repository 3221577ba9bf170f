//! Printing of expressions in conventional infix notation.
//!
//! Terms with a negative coefficient are printed with a leading `-`, factors raised to a negative
//! number are moved into a denominator, and powers of `1/2` are printed as `sqrt`. For example,
//! `Add[Mul[-1/2, x^2], Mul[3, x^-1]]` is printed as `-x^2/2 + 3/x`.

use super::{Primary, SymExpr};
use rug::Rational;
use std::fmt;

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{}", num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Const(constant) => write!(f, "{}", constant.name()),
            Self::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
        }
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => fmt_add(terms, f),
            Self::Mul(factors) => fmt_mul(factors, f),
            Self::Exp(base, exp) => fmt_exp(base, exp, f),
        }
    }
}

/// If the expression reads as negative, such as `-3` or `-2*x`, returns the expression with its
/// sign flipped. Otherwise, returns [`None`].
pub(crate) fn split_sign(expr: &SymExpr) -> Option<SymExpr> {
    match expr {
        SymExpr::Primary(Primary::Number(num)) if num.cmp0().is_lt() => {
            Some(SymExpr::number(Rational::from(-num)))
        },
        SymExpr::Mul(factors) => {
            let mut flat = Vec::with_capacity(factors.len());
            flatten_factors(factors, &mut flat);

            let coeff = flat.iter()
                .filter_map(|factor| factor.as_number())
                .fold(Rational::from(1), |acc, num| acc * num);
            if !coeff.cmp0().is_lt() {
                return None;
            }

            let abs = -coeff;
            let mut new_factors = Vec::with_capacity(flat.len());
            if abs != 1 {
                new_factors.push(SymExpr::number(abs));
            }
            new_factors.extend(flat.into_iter().filter(|factor| !factor.is_number()).cloned());
            Some(SymExpr::Mul(new_factors).downgrade())
        },
        _ => None,
    }
}

/// Collects the factors of nested products into one list.
fn flatten_factors<'a>(factors: &'a [SymExpr], out: &mut Vec<&'a SymExpr>) {
    for factor in factors {
        match factor {
            SymExpr::Mul(inner) => flatten_factors(inner, out),
            _ => out.push(factor),
        }
    }
}

/// Collects the terms of nested sums into one list.
fn flatten_terms<'a>(terms: &'a [SymExpr], out: &mut Vec<&'a SymExpr>) {
    for term in terms {
        match term {
            SymExpr::Add(inner) => flatten_terms(inner, out),
            _ => out.push(term),
        }
    }
}

fn fmt_add(terms: &[SymExpr], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut flat = Vec::with_capacity(terms.len());
    flatten_terms(terms, &mut flat);

    let mut iter = flat.into_iter();
    match iter.next() {
        Some(first) => write!(f, "{}", first)?,
        None => return write!(f, "0"),
    }

    for term in iter {
        match split_sign(term) {
            Some(abs) => write!(f, " - {}", abs)?,
            None => write!(f, " + {}", term)?,
        }
    }

    Ok(())
}

/// Splits the factors of a product into a numeric coefficient, the factors of the numerator, and
/// the factors of the denominator. Nested products are flattened.
fn split_fraction(
    factors: &[SymExpr],
    coeff: &mut Rational,
    numer: &mut Vec<SymExpr>,
    denom: &mut Vec<SymExpr>,
) {
    for factor in factors {
        match factor {
            SymExpr::Primary(Primary::Number(num)) => *coeff *= num,
            SymExpr::Mul(inner) => split_fraction(inner, coeff, numer, denom),
            SymExpr::Exp(base, exp) => match exp.as_number() {
                Some(num) if num.cmp0().is_lt() => {
                    let positive = Rational::from(-num);
                    if positive == 1 {
                        denom.push((**base).clone());
                    } else {
                        denom.push((**base).clone().pow(SymExpr::number(positive)));
                    }
                },
                _ => numer.push(factor.clone()),
            },
            _ => numer.push(factor.clone()),
        }
    }
}

/// Formats a factor of a product, wrapping it in parentheses if needed.
pub(crate) fn factor_string(factor: &SymExpr) -> String {
    match factor {
        SymExpr::Add(_) | SymExpr::Mul(_) => format!("({})", factor),
        _ => factor.to_string(),
    }
}

fn fmt_mul(factors: &[SymExpr], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut coeff = Rational::from(1);
    let mut numer = Vec::new();
    let mut denom = Vec::new();
    split_fraction(factors, &mut coeff, &mut numer, &mut denom);

    if coeff.cmp0().is_lt() {
        write!(f, "-")?;
        coeff = -coeff;
    }

    let mut numer_items = Vec::with_capacity(numer.len() + 1);
    if *coeff.numer() != 1 || numer.is_empty() {
        numer_items.push(coeff.numer().to_string());
    }
    numer_items.extend(numer.iter().map(factor_string));

    let mut denom_items = Vec::with_capacity(denom.len() + 1);
    if *coeff.denom() != 1 {
        denom_items.push(coeff.denom().to_string());
    }
    denom_items.extend(denom.iter().map(factor_string));

    write!(f, "{}", numer_items.join("*"))?;
    match denom_items.len() {
        0 => Ok(()),
        1 => write!(f, "/{}", denom_items[0]),
        _ => write!(f, "/({})", denom_items.join("*")),
    }
}

/// Returns true if the expression can be used as the base of a power without parentheses.
fn is_atomic_base(base: &SymExpr) -> bool {
    match base {
        SymExpr::Primary(Primary::Number(num)) => num.cmp0().is_ge() && *num.denom() == 1,
        SymExpr::Primary(_) => true,
        _ => false,
    }
}

/// Returns true if the expression can be used as an exponent without parentheses.
fn is_atomic_exponent(exp: &SymExpr) -> bool {
    match exp {
        SymExpr::Primary(Primary::Number(num)) => num.cmp0().is_ge() && *num.denom() == 1,
        SymExpr::Primary(_) => true,
        _ => false,
    }
}

fn fmt_exp(base: &SymExpr, exp: &SymExpr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(num) = exp.as_number() {
        if *num == Rational::from((1, 2)) {
            return write!(f, "sqrt({})", base);
        } else if num.cmp0().is_lt() {
            let positive = Rational::from(-num);
            let denom = if positive == 1 {
                base.clone()
            } else {
                base.clone().pow(SymExpr::number(positive))
            };
            return write!(f, "1/{}", factor_string(&denom));
        }
    }

    if is_atomic_base(base) {
        write!(f, "{}", base)?;
    } else {
        write!(f, "({})", base)?;
    }

    if is_atomic_exponent(exp) {
        write!(f, "^{}", exp)
    } else {
        write!(f, "^({})", exp)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::expr::{Constant, Func};

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn num(n: impl Into<Rational>) -> SymExpr {
        SymExpr::number(n)
    }

    #[test]
    fn polynomial() {
        let expr = SymExpr::Add(vec![
            x().pow(num(3)),
            SymExpr::Mul(vec![num(-2), x()]),
            num(-1),
        ]);
        assert_eq!(expr.to_string(), "x^3 - 2*x - 1");
    }

    #[test]
    fn rational_coefficients() {
        let expr = SymExpr::Add(vec![
            num(1),
            x(),
            SymExpr::Mul(vec![num((1, 2)), x().pow(num(2))]),
            SymExpr::Mul(vec![num((-1, 6)), x().pow(num(3))]),
            SymExpr::Mul(vec![num((3, 2)), x()]),
        ]);
        assert_eq!(expr.to_string(), "1 + x + x^2/2 - x^3/6 + 3*x/2");
    }

    #[test]
    fn denominators() {
        let expr = SymExpr::Mul(vec![SymExpr::call(Func::Sin, x()), x().recip()]);
        assert_eq!(expr.to_string(), "sin(x)/x");

        let expr = SymExpr::Mul(vec![num((1, 2)), x().recip()]);
        assert_eq!(expr.to_string(), "1/(2*x)");

        let expr = SymExpr::Mul(vec![num(-3), x().pow(num(-2))]);
        assert_eq!(expr.to_string(), "-3/x^2");

        let expr = SymExpr::Mul(vec![x(), (x() + num(1)).recip()]);
        assert_eq!(expr.to_string(), "x/(x + 1)");
    }

    #[test]
    fn powers() {
        assert_eq!(x().sqrt().to_string(), "sqrt(x)");
        assert_eq!(x().recip().to_string(), "1/x");
        assert_eq!(x().pow(num((-1, 2))).to_string(), "1/sqrt(x)");
        assert_eq!(x().pow(num(-2)).to_string(), "1/x^2");
        assert_eq!(x().pow(num((3, 2))).to_string(), "x^(3/2)");
        assert_eq!((x() + num(1)).pow(num(2)).to_string(), "(x + 1)^2");
        assert_eq!(num(2).pow(x()).to_string(), "2^x");
        assert_eq!(SymExpr::call(Func::Cos, x()).pow(num(2)).to_string(), "cos(x)^2");
        assert_eq!(num((1, 2)).pow(x()).to_string(), "(1/2)^x");
    }

    #[test]
    fn constants_and_calls() {
        let expr = SymExpr::Mul(vec![
            num(2),
            SymExpr::constant(Constant::Pi),
            SymExpr::call(Func::Exp, x()),
        ]);
        assert_eq!(expr.to_string(), "2*pi*exp(x)");
        assert_eq!(SymExpr::constant(Constant::E).to_string(), "E");
    }

    #[test]
    fn negation() {
        assert_eq!(SymExpr::Mul(vec![num(-1), x()]).to_string(), "-x");
        assert_eq!(num((-1, 2)).to_string(), "-1/2");
        assert_eq!(split_sign(&SymExpr::Mul(vec![num(-2), x()])), Some(SymExpr::Mul(vec![num(2), x()])));
        assert_eq!(split_sign(&SymExpr::Mul(vec![num(-1), x()])), Some(x()));
        assert_eq!(split_sign(&x()), None);
    }

    #[test]
    fn nested_negative_coefficient() {
        let one = num(1);
        let expr = SymExpr::Add(vec![
            SymExpr::call(Func::Cos, one.clone()),
            SymExpr::Mul(vec![
                SymExpr::Mul(vec![num(-1), SymExpr::call(Func::Sin, one)]),
                x() + num(-1),
            ]),
        ]);
        assert_eq!(expr.to_string(), "cos(1) - sin(1)*(x - 1)");

        let nested = SymExpr::Mul(vec![SymExpr::Mul(vec![num(-3), x()]), num((1, 2))]);
        assert_eq!(split_sign(&nested), Some(SymExpr::Mul(vec![num((3, 2)), x()])));
    }
}
