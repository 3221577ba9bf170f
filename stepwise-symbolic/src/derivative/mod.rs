//! Symbolic differentiation.
//!
//! [`derivative`] applies the sum, product, power and chain rules recursively. Every expression
//! that can be written with the supported functions has a derivative that can be written the same
//! way, so differentiation never fails. The result is only cleaned up of trivial zeros and ones;
//! pass it to [`simplify`](crate::simplify::simplify) for a canonical form.
//!
//! [`unevaluated`] renders the first step of the computation, where the sum and product rules are
//! applied to the top-level expression without differentiating any of the parts.

mod function;

use crate::expr::{factor_string, split_sign, Constant, Func, Primary, SymExpr};
use crate::simplify::rules::add::split_coefficient;

/// Returns `true` if the given [`SymExpr`] is "clearly" zero. This is intended to clean up the
/// result of differentiation and is not mathematically rigorous.
fn is_trivially_zero(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Number(n)) => n.cmp0().is_eq(),
        SymExpr::Add(terms) => terms.iter().all(is_trivially_zero),
        SymExpr::Mul(factors) => factors.iter().any(is_trivially_zero),
        SymExpr::Exp(base, exponent) => is_trivially_zero(base)
            && exponent.as_number().is_some_and(|n| n.cmp0().is_gt()),
        _ => false,
    }
}

/// Returns `true` if the given [`SymExpr`] is "clearly" one. This is intended to clean up the
/// result of differentiation and is not mathematically rigorous.
fn is_trivially_unity(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Number(n)) => *n == 1,
        SymExpr::Mul(factors) => factors.iter().all(is_trivially_unity),
        SymExpr::Exp(base, exponent) => is_trivially_zero(exponent) || is_trivially_unity(base),
        SymExpr::Add(terms) => terms.len() == 1 && is_trivially_unity(&terms[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<SymExpr>);

impl From<MultBuilder> for SymExpr {
    fn from(value: MultBuilder) -> Self {
        SymExpr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    fn mult(&mut self, e: SymExpr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![SymExpr::number(0)];
            return;
        }

        if !is_trivially_unity(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<SymExpr>);

impl From<SumBuilder> for SymExpr {
    fn from(value: SumBuilder) -> Self {
        SymExpr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    fn add(&mut self, e: SymExpr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `base^exp`, or just `base` if the exponent is one.
fn power(base: &SymExpr, exp: SymExpr) -> SymExpr {
    if exp.is_one() {
        base.clone()
    } else {
        base.clone().pow(exp)
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[SymExpr], var: &str) -> SymExpr {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, var));
    }
    sum.into()
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[SymExpr], var: &str) -> SymExpr {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, var));
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    outer_sum.into()
}

/// The power rule, generalized to any base and exponent.
///
/// - `(f^n)' = n * f^(n-1) * f'`, where `n` is constant
/// - `(a^g)' = a^g * log(a) * g'`, where `a` is constant
/// - `(f^g)' = f^g * (g' * log(f) + g * f' / f)` otherwise
fn power_rule(base: &SymExpr, exp: &SymExpr, var: &str) -> SymExpr {
    let mut mult = MultBuilder::default();
    match (base.depends_on(var), exp.depends_on(var)) {
        (_, false) => {
            let exp_minus_one = match exp.as_number() {
                Some(n) => SymExpr::number(n.clone() - 1u32),
                None => exp.clone() + SymExpr::number(-1),
            };
            mult.mult(derivative(base, var));
            mult.mult(exp.clone());
            mult.mult(power(base, exp_minus_one));
        },
        (false, true) => {
            mult.mult(derivative(exp, var));
            mult.mult(base.clone().pow(exp.clone()));
            if !matches!(base, SymExpr::Primary(Primary::Const(Constant::E))) {
                mult.mult(SymExpr::call(Func::Log, base.clone()));
            }
        },
        (true, true) => {
            let mut inner = SumBuilder::default();

            let mut log_term = MultBuilder::default();
            log_term.mult(derivative(exp, var));
            log_term.mult(SymExpr::call(Func::Log, base.clone()));
            inner.add(log_term.into());

            let mut ratio_term = MultBuilder::default();
            ratio_term.mult(exp.clone());
            ratio_term.mult(derivative(base, var));
            ratio_term.mult(base.clone().recip());
            inner.add(ratio_term.into());

            mult.mult(base.clone().pow(exp.clone()));
            mult.mult(inner.into());
        },
    }
    mult.into()
}

/// Computes the derivative of the given expression with respect to the variable `var`.
pub fn derivative(f: &SymExpr, var: &str) -> SymExpr {
    if !f.depends_on(var) {
        return SymExpr::number(0);
    }

    match f {
        SymExpr::Primary(Primary::Symbol(_)) => SymExpr::number(1),
        SymExpr::Primary(Primary::Call(func, arg)) => function::function_derivative(*func, arg, var),
        // numbers and constants are handled by the `depends_on` check
        SymExpr::Primary(_) => SymExpr::number(0),
        SymExpr::Add(terms) => sum_rule(terms, var),
        SymExpr::Mul(factors) => product_rule(factors, var),
        SymExpr::Exp(base, exp) => power_rule(base, exp, var),
    }
}

/// The notation for the derivative of `f` with respect to `var`, such as `d/dx[f]`.
fn notation(f: &SymExpr, var: &str) -> String {
    format!("d/d{}[{}]", var, f)
}

/// Renders the derivative of `f` with the sum and product rules applied to the top level of the
/// expression, and every part left undifferentiated.
///
/// - `x^2 + sin(x)` -> `d/dx[x^2] + d/dx[sin(x)]`
/// - `3*x^2` -> `3*d/dx[x^2]`
/// - `x*sin(x)` -> `d/dx[x]*sin(x) + x*d/dx[sin(x)]`
pub fn unevaluated(f: &SymExpr, var: &str) -> String {
    match f {
        SymExpr::Add(terms) => {
            let mut out = String::new();
            for (idx, term) in terms.iter().enumerate() {
                match split_sign(term) {
                    Some(abs) if idx > 0 => {
                        out.push_str(" - ");
                        out.push_str(&unevaluated_term(&abs, var));
                    },
                    _ => {
                        if idx > 0 {
                            out.push_str(" + ");
                        }
                        out.push_str(&unevaluated_term(term, var));
                    },
                }
            }
            out
        },
        _ => unevaluated_term(f, var),
    }
}

/// Renders the derivative of a single term, pulling out its coefficient and applying the product
/// rule to what remains.
fn unevaluated_term(term: &SymExpr, var: &str) -> String {
    let (coeff, rest) = split_coefficient(term);
    if coeff != 1 && !rest.is_one() {
        return format!("{}*{}", coeff, unevaluated_term(&rest, var));
    }

    match term {
        SymExpr::Mul(factors) if factors.len() > 1 => (0..factors.len())
            .map(|derivative_index| {
                factors.iter()
                    .enumerate()
                    .map(|(idx, factor)| if idx == derivative_index {
                        notation(factor, var)
                    } else {
                        factor_string(factor)
                    })
                    .collect::<Vec<_>>()
                    .join("*")
            })
            .collect::<Vec<_>>()
            .join(" + "),
        _ => notation(term, var),
    }
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use crate::simplify::simplify;
    use pretty_assertions::assert_eq;
    use super::*;

    /// Differentiates the simplified input, and simplifies the result.
    fn derived(input: &str) -> String {
        let f = simplify(&normalize(input).unwrap());
        simplify(&derivative(&f, "x")).to_string()
    }

    fn unevaluated_str(input: &str) -> String {
        unevaluated(&simplify(&normalize(input).unwrap()), "x")
    }

    #[test]
    fn polynomial() {
        assert_eq!(derived("x^3 - 2*x + 7"), "3*x^2 - 2");
        assert_eq!(derived("5"), "0");
        assert_eq!(derived("pi*x"), "pi");
    }

    #[test]
    fn raw_power_rule() {
        let f = normalize("x^2 + sin(x)").unwrap();
        assert_eq!(derivative(&f, "x").to_string(), "2*x + cos(x)");
    }

    #[test]
    fn chain_rule() {
        assert_eq!(derived("sin(x^2)"), "2*x*cos(x^2)");
        assert_eq!(derived("exp(3*x)"), "3*exp(3*x)");
        assert_eq!(derived("log(x)"), "1/x");
        assert_eq!(derived("cos(x)"), "-sin(x)");
    }

    #[test]
    fn product_rule_output() {
        assert_eq!(derived("x*exp(x)"), "exp(x) + x*exp(x)");
    }

    #[test]
    fn roots_and_reciprocals() {
        assert_eq!(derived("1/x"), "-1/x^2");
        assert_eq!(derived("sqrt(x)"), "1/(2*sqrt(x))");
    }

    #[test]
    fn variable_exponent() {
        assert_eq!(derived("exp(x)"), "exp(x)");
        let f = normalize("x^x").unwrap();
        let df = simplify(&derivative(&f, "x"));
        assert!(df.depends_on("x"));
        assert!(df.to_string().contains("log(x)"));
    }

    #[test]
    fn other_variables_are_constant() {
        let f = SymExpr::symbol("y") * SymExpr::symbol("x");
        assert_eq!(simplify(&derivative(&f, "x")), SymExpr::symbol("y"));
    }

    #[test]
    fn unevaluated_rules() {
        assert_eq!(unevaluated_str("x^2 + sin(x)"), "d/dx[x^2] + d/dx[sin(x)]");
        assert_eq!(unevaluated_str("3*x^2 - 2*x"), "3*d/dx[x^2] - 2*d/dx[x]");
        assert_eq!(unevaluated_str("x*sin(x)"), "d/dx[x]*sin(x) + x*d/dx[sin(x)]");
        assert_eq!(unevaluated_str("cos(x)"), "d/dx[cos(x)]");
    }
}
