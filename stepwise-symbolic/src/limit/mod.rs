//! Limits of expressions.
//!
//! A finite point `a` is moved to zero by substituting `x + a` for `x`, and zero is approached
//! from the right. Expressions that are only defined to the left of the point, like `sqrt(-x)`
//! at zero, are approached from the left instead.
//!
//! Limits at infinity are first computed in the original variable, comparing the growth of the
//! parts of the expression. If that fails, `1/x` (or `-1/x`) is substituted for `x`, and zero is
//! approached from the right.
//!
//! The limit is then found by structural recursion:
//!
//! - Continuous expressions are evaluated at the point.
//! - Expressions with a denominator are rewritten as a single fraction, and the limits of the
//!   numerator and denominator are combined. `0/0` and `∞/∞` forms are resolved with
//!   L'Hôpital's rule, and `c/0` forms by the sign of the expression near the point.
//! - `0*∞` forms are rewritten as quotients.
//! - Powers with a variable exponent are rewritten as `exp(g*log(f))`.
//!
//! Each rewrite counts as one step, and a limit that needs more steps than allowed is reported as
//! undetermined.

mod together;

use crate::derivative::derivative;
use crate::eval::{eval, eval_constant};
use crate::expr::{Func, Primary, SymExpr};
use crate::primitive::float;
use crate::simplify::simplify;
use rug::Rational;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

pub use together::together;

/// The distance from the point at which the sign of an expression is probed.
const PROBE_DISTANCE: f64 = 1e-30;

/// The value of the variable at which the sign of an expression is probed, when the variable
/// grows without bound. Probing at larger values overflows functions like `exp(x^2)`.
const INFINITY_PROBE: f64 = 1e6;

/// The distance from the point at which the domain of an expression is probed. This is larger
/// than [`PROBE_DISTANCE`] so that functions like `exp(1/x)` do not overflow.
const DOMAIN_PROBE_DISTANCE: f64 = 1e-6;

/// Numeric values with a smaller magnitude than this are treated as zero.
const ZERO_TOLERANCE: f64 = 1e-100;

/// The point a limit is taken at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    Finite(Rational),
    PosInfinity,
    NegInfinity,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{}", value),
            Self::PosInfinity => write!(f, "oo"),
            Self::NegInfinity => write!(f, "-oo"),
        }
    }
}

/// The value of a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Limit {
    /// The limit exists and is the given (simplified) value.
    Finite(SymExpr),

    /// The expression grows without bound.
    PosInfinity,

    /// The expression decreases without bound.
    NegInfinity,

    /// The limit does not exist, for example because the expression oscillates, or is not a real
    /// number.
    Undefined,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{}", value),
            Self::PosInfinity => write!(f, "oo"),
            Self::NegInfinity => write!(f, "-oo"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// An error that can occur while computing a limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// The limit could not be determined within the allowed number of steps.
    #[error("could not determine the limit of {expr}")]
    Undetermined {
        /// The expression whose limit was requested.
        expr: SymExpr,
    },
}

/// The result of substituting a value directly into an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// The expression is defined at the value.
    Value(SymExpr),

    /// The substitution gives `0/0`.
    Indeterminate,

    /// The substitution gives `c/0`, where `c` is not zero.
    DivisionByZero,

    /// The expression is undefined at the value for another reason, such as `log(-1)`.
    Undefined,
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{}", value),
            Self::Indeterminate => write!(f, "0/0 (indeterminate form)"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// Returns the sign of an expression that does not depend on any variable.
fn const_sign(expr: &SymExpr) -> Option<Ordering> {
    if let Some(num) = expr.as_number() {
        return Some(num.cmp0());
    }

    let value = eval_constant(expr)?;
    if value.clone().abs() < ZERO_TOLERANCE {
        Some(Ordering::Equal)
    } else {
        value.cmp0()
    }
}

/// Returns true if the expression does not depend on any variable and is zero.
fn is_zero(expr: &SymExpr) -> bool {
    const_sign(expr) == Some(Ordering::Equal)
}

/// Substitutes the value into the expression, and reports whether the result is defined.
pub fn substitute(f: &SymExpr, var: &str, value: &Rational) -> Substitution {
    let point = SymExpr::number(value.clone());
    if eval(f, var, &float(value)).is_some() {
        return Substitution::Value(simplify(&f.substitute(var, &point)));
    }

    let (numer, denom) = together(f);
    let at_point = |expr: &SymExpr| simplify(&expr.substitute(var, &point));
    if is_zero(&at_point(&denom)) {
        if is_zero(&at_point(&numer)) {
            Substitution::Indeterminate
        } else {
            Substitution::DivisionByZero
        }
    } else {
        Substitution::Undefined
    }
}

/// The direction of an infinite limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Pos,
    Neg,
}

impl Direction {
    fn from_sign(sign: Ordering) -> Self {
        if sign.is_lt() {
            Self::Neg
        } else {
            Self::Pos
        }
    }

    /// The direction of the product of two quantities with the given directions.
    fn mul(self, other: Self) -> Self {
        if self == other {
            Self::Pos
        } else {
            Self::Neg
        }
    }
}

/// The limit of a subexpression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Finite(SymExpr),
    Infinite(Direction),

    /// The expression oscillates within finite bounds, like `sin(1/x)` at zero.
    Bounded,

    Undefined,
}

/// How the variable approaches the point of a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Approach {
    /// Zero, from below.
    Left,

    /// Zero, from above.
    Right,

    /// The variable grows without bound in the given direction.
    Unbounded(Direction),
}

impl Approach {
    /// The value of the variable at which to probe the expression.
    fn probe(self) -> f64 {
        match self {
            Self::Left => -PROBE_DISTANCE,
            Self::Right => PROBE_DISTANCE,
            Self::Unbounded(Direction::Pos) => INFINITY_PROBE,
            Self::Unbounded(Direction::Neg) => -INFINITY_PROBE,
        }
    }

    /// Approaches zero from the right, unless the expression is only defined to the left of zero.
    fn of_domain(expr: &SymExpr, var: &str) -> Self {
        let defined = |at: f64| eval(expr, var, &float(at)).is_some();
        if defined(-DOMAIN_PROBE_DISTANCE) && !defined(DOMAIN_PROBE_DISTANCE) {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Computes limits at zero or at infinity.
struct Solver<'a> {
    var: &'a str,
    approach: Approach,
    max_steps: usize,

    /// The expression whose limit was requested, for error reporting.
    original: &'a SymExpr,
}

impl Solver<'_> {
    fn undetermined(&self) -> LimitError {
        LimitError::Undetermined { expr: self.original.clone() }
    }

    /// Counts a rewrite step, failing if there are no steps left.
    fn step(&self, steps: usize) -> Result<usize, LimitError> {
        if steps >= self.max_steps {
            Err(self.undetermined())
        } else {
            Ok(steps + 1)
        }
    }

    /// Returns true if the expression is positive near the point.
    fn positive_near(&self, expr: &SymExpr) -> bool {
        eval(expr, self.var, &float(self.approach.probe())).is_some_and(|value| value > 0)
    }

    /// Finds the direction in which an expression with a pole at the point grows.
    fn pole(&self, expr: &SymExpr) -> Result<Value, LimitError> {
        eval(expr, self.var, &float(self.approach.probe()))
            .and_then(|value| value.cmp0())
            .filter(|sign| sign.is_ne())
            .map(|sign| Value::Infinite(Direction::from_sign(sign)))
            .ok_or_else(|| self.undetermined())
    }

    /// Computes the limit of the expression as the variable approaches the point.
    fn limit(&self, expr: &SymExpr, steps: usize) -> Result<Value, LimitError> {
        if !expr.depends_on(self.var) {
            // constants like `0/0`
            if eval_constant(expr).is_none() {
                return Ok(Value::Undefined);
            }
            return Ok(Value::Finite(expr.clone()));
        }

        match self.approach {
            Approach::Unbounded(direction) => {
                if expr.as_symbol() == Some(self.var) {
                    return Ok(Value::Infinite(direction));
                }
            },
            Approach::Left | Approach::Right => {
                if eval(expr, self.var, &float(0)).is_some() {
                    let at_zero = expr.substitute(self.var, &SymExpr::number(0));
                    return Ok(Value::Finite(simplify(&at_zero)));
                }
            },
        }

        let (numer, denom) = together(expr);
        if !denom.is_one() {
            return self.quotient(&simplify(&numer), &simplify(&denom), steps);
        }

        match expr {
            SymExpr::Primary(Primary::Call(func, arg)) => self.call(*func, arg, expr, steps),
            SymExpr::Add(terms) => self.sum(terms, steps),
            SymExpr::Mul(factors) => self.product(factors, steps),
            SymExpr::Exp(base, exp) => self.power(base, exp, expr, steps),
            SymExpr::Primary(_) => Ok(Value::Finite(expr.clone())),
        }
    }

    fn sum(&self, terms: &[SymExpr], steps: usize) -> Result<Value, LimitError> {
        let mut finite = Vec::new();
        let mut infinite = None;
        let mut bounded = false;

        for term in terms {
            match self.limit(term, steps)? {
                Value::Finite(value) => finite.push(value),
                Value::Infinite(direction) => match infinite {
                    // `∞ - ∞` with no denominator to combine over
                    Some(previous) if previous != direction => return Err(self.undetermined()),
                    _ => infinite = Some(direction),
                },
                Value::Bounded => bounded = true,
                Value::Undefined => return Ok(Value::Undefined),
            }
        }

        Ok(match infinite {
            Some(direction) => Value::Infinite(direction),
            None if bounded => Value::Bounded,
            None => Value::Finite(simplify(&SymExpr::Add(finite))),
        })
    }

    fn product(&self, factors: &[SymExpr], steps: usize) -> Result<Value, LimitError> {
        let mut zeros = Vec::new();
        let mut infinite = Vec::new();
        let mut rest = Vec::new();
        let mut finite = Vec::new();
        let mut direction = Direction::Pos;
        let mut bounded = false;

        for factor in factors {
            match self.limit(factor, steps)? {
                Value::Finite(value) if is_zero(&value) => zeros.push(factor.clone()),
                Value::Finite(value) => {
                    rest.push(factor.clone());
                    finite.push(value);
                },
                Value::Infinite(factor_direction) => {
                    infinite.push(factor.clone());
                    direction = direction.mul(factor_direction);
                },
                Value::Bounded => bounded = true,
                Value::Undefined => return Ok(Value::Undefined),
            }
        }

        if !zeros.is_empty() && !infinite.is_empty() {
            if bounded {
                return Err(self.undetermined());
            }
            return self.zero_times_infinity(zeros, infinite, rest, steps);
        }

        if !zeros.is_empty() {
            return Ok(Value::Finite(SymExpr::number(0)));
        }

        if !infinite.is_empty() {
            if bounded {
                return Ok(Value::Undefined);
            }
            for value in &finite {
                let sign = const_sign(value).ok_or_else(|| self.undetermined())?;
                direction = direction.mul(Direction::from_sign(sign));
            }
            return Ok(Value::Infinite(direction));
        }

        if bounded {
            return Ok(Value::Bounded);
        }

        Ok(Value::Finite(simplify(&SymExpr::Mul(finite))))
    }

    /// Resolves `0*∞` by moving one of the parts into a denominator.
    ///
    /// `zeros*infinite*rest` is first tried as `(infinite*rest) / (1/zeros)`, which suits
    /// products like `x*log(x)`, then as `(zeros*rest) / (1/infinite)`.
    fn zero_times_infinity(
        &self,
        zeros: Vec<SymExpr>,
        infinite: Vec<SymExpr>,
        rest: Vec<SymExpr>,
        steps: usize,
    ) -> Result<Value, LimitError> {
        let steps = self.step(steps)?;
        let reciprocal = |factors: &[SymExpr]| simplify(&SymExpr::Mul(factors.to_vec()).downgrade().recip());
        let with_rest = |factors: &[SymExpr]| {
            SymExpr::Mul(factors.iter().chain(rest.iter()).cloned().collect()).downgrade()
        };

        self.quotient(&with_rest(&infinite), &reciprocal(&zeros), steps)
            .or_else(|_| self.quotient(&with_rest(&zeros), &reciprocal(&infinite), steps))
    }

    /// Computes the limit of `numer / denom`.
    fn quotient(&self, numer: &SymExpr, denom: &SymExpr, steps: usize) -> Result<Value, LimitError> {
        let quotient = || numer.clone() * denom.clone().recip();
        match (self.limit(numer, steps)?, self.limit(denom, steps)?) {
            (Value::Undefined, _) | (_, Value::Undefined) => Ok(Value::Undefined),
            (Value::Finite(n), Value::Finite(d)) => {
                if !is_zero(&d) {
                    Ok(Value::Finite(simplify(&(n * d.recip()))))
                } else if is_zero(&n) {
                    self.lhopital(numer, denom, steps)
                } else {
                    self.pole(&quotient())
                }
            },
            (Value::Finite(_) | Value::Bounded, Value::Infinite(_)) => Ok(Value::Finite(SymExpr::number(0))),
            (Value::Infinite(_), Value::Infinite(_)) => self.lhopital(numer, denom, steps),
            (Value::Infinite(direction), Value::Finite(d)) => {
                if is_zero(&d) {
                    self.pole(&quotient())
                } else {
                    let sign = const_sign(&d).ok_or_else(|| self.undetermined())?;
                    Ok(Value::Infinite(direction.mul(Direction::from_sign(sign))))
                }
            },
            (Value::Bounded, Value::Finite(d)) => Ok(if is_zero(&d) {
                Value::Undefined
            } else {
                Value::Bounded
            }),
            (_, Value::Bounded) => Ok(Value::Undefined),
        }
    }

    /// `lim f/g = lim f'/g'`, for the forms `0/0` and `∞/∞`
    fn lhopital(&self, numer: &SymExpr, denom: &SymExpr, steps: usize) -> Result<Value, LimitError> {
        let steps = self.step(steps)?;
        let denom_derivative = simplify(&derivative(denom, self.var));
        if denom_derivative.is_zero() {
            return Err(self.undetermined());
        }

        let ratio = simplify(&(derivative(numer, self.var) * denom_derivative.recip()));
        self.limit(&ratio, steps)
    }

    fn call(&self, func: Func, arg: &SymExpr, expr: &SymExpr, steps: usize) -> Result<Value, LimitError> {
        let value = match self.limit(arg, steps)? {
            Value::Finite(inner) => {
                let value = SymExpr::call(func, inner.clone());
                if eval_constant(&value).is_some() {
                    return Ok(Value::Finite(simplify(&value)));
                }

                match func {
                    // log(u) as u -> 0 from above
                    Func::Log if is_zero(&inner) && self.positive_near(arg) => Value::Infinite(Direction::Neg),
                    Func::Tan => return self.pole(expr),
                    _ => Value::Undefined,
                }
            },
            Value::Infinite(direction) => match (func, direction) {
                (Func::Sin | Func::Cos, _) => Value::Bounded,
                (Func::Exp | Func::Log, Direction::Pos) => Value::Infinite(Direction::Pos),
                (Func::Exp, Direction::Neg) => Value::Finite(SymExpr::number(0)),
                _ => Value::Undefined,
            },
            Value::Bounded => match func {
                Func::Sin | Func::Cos | Func::Exp => Value::Bounded,
                _ => Value::Undefined,
            },
            Value::Undefined => Value::Undefined,
        };
        Ok(value)
    }

    fn power(&self, base: &SymExpr, exp: &SymExpr, expr: &SymExpr, steps: usize) -> Result<Value, LimitError> {
        if exp.depends_on(self.var) {
            // f^g = exp(g*log(f))
            let steps = self.step(steps)?;
            let rewritten = SymExpr::call(Func::Exp, exp.clone() * SymExpr::call(Func::Log, base.clone()));
            return self.limit(&simplify(&rewritten), steps);
        }

        let exp_sign = const_sign(exp).ok_or_else(|| self.undetermined())?;
        let even = exp.as_number()
            .filter(|num| *num.denom() == 1)
            .map(|num| num.numer().is_even());

        let value = match self.limit(base, steps)? {
            Value::Finite(inner) => {
                let raised = inner.clone().pow(exp.clone());
                if eval_constant(&raised).is_some() {
                    Value::Finite(simplify(&raised))
                } else if is_zero(&inner) {
                    return self.pole(expr);
                } else {
                    Value::Undefined
                }
            },
            Value::Infinite(direction) => match exp_sign {
                Ordering::Less => Value::Finite(SymExpr::number(0)),
                Ordering::Equal => Value::Finite(SymExpr::number(1)),
                Ordering::Greater => match (direction, even) {
                    (Direction::Pos, _) | (_, Some(true)) => Value::Infinite(Direction::Pos),
                    (_, Some(false)) => Value::Infinite(direction),
                    (_, None) => Value::Undefined,
                },
            },
            Value::Bounded if exp_sign.is_gt() => Value::Bounded,
            Value::Bounded | Value::Undefined => Value::Undefined,
        };
        Ok(value)
    }
}

/// Computes the limit of `f` as the variable `var` approaches the given point.
///
/// Finite points are approached from the right, unless `f` is only defined to the left of the
/// point. `max_steps` bounds the number of rewrites, such as applications of L'Hôpital's rule,
/// that may be used to find the limit.
pub fn limit(f: &SymExpr, var: &str, point: &Point, max_steps: usize) -> Result<Limit, LimitError> {
    let x = SymExpr::symbol(var);
    let solve = |expr: &SymExpr, approach: Approach| {
        Solver { var, approach, max_steps, original: f }.limit(expr, 0)
    };

    let value = match point {
        Point::Finite(value) => {
            let shifted = if value.cmp0().is_eq() {
                simplify(f)
            } else {
                simplify(&f.substitute(var, &(x + SymExpr::number(value.clone()))))
            };
            solve(&shifted, Approach::of_domain(&shifted, var))?
        },
        Point::PosInfinity => solve(&simplify(f), Approach::Unbounded(Direction::Pos))
            .or_else(|_| solve(&simplify(&f.substitute(var, &x.recip())), Approach::Right))?,
        Point::NegInfinity => solve(&simplify(f), Approach::Unbounded(Direction::Neg))
            .or_else(|_| solve(&simplify(&f.substitute(var, &-x.recip())), Approach::Right))?,
    };

    Ok(match value {
        Value::Finite(value) => Limit::Finite(simplify(&value)),
        Value::Infinite(Direction::Pos) => Limit::PosInfinity,
        Value::Infinite(Direction::Neg) => Limit::NegInfinity,
        Value::Bounded | Value::Undefined => Limit::Undefined,
    })
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use super::*;

    const MAX_STEPS: usize = 8;

    fn limit_at(input: &str, point: Point) -> String {
        limit(&normalize(input).unwrap(), "x", &point, MAX_STEPS).unwrap().to_string()
    }

    fn at(n: i32) -> Point {
        Point::Finite(Rational::from(n))
    }

    #[test]
    fn continuous() {
        assert_eq!(limit_at("x^2 + 1", at(2)), "5");
        assert_eq!(limit_at("sqrt(x)", at(0)), "0");
        assert_eq!(limit_at("cos(x)", at(0)), "1");
    }

    #[test]
    fn lhopital() {
        assert_eq!(limit_at("sin(x)/x", at(0)), "1");
        assert_eq!(limit_at("(1 - cos(x))/x^2", at(0)), "1/2");
        assert_eq!(limit_at("(x^2 - 1)/(x - 1)", at(1)), "2");
        assert_eq!(limit_at("(exp(x) - 1)/x", at(0)), "1");
    }

    #[test]
    fn poles() {
        assert_eq!(limit_at("1/x^2", at(0)), "oo");
        assert_eq!(limit_at("-1/x^2", at(0)), "-oo");
        assert_eq!(limit_at("log(x)", at(0)), "-oo");
    }

    #[test]
    fn approached_from_the_right() {
        assert_eq!(limit_at("1/x", at(0)), "oo");
        assert_eq!(limit_at("exp(1/x)", at(0)), "oo");
        assert_eq!(limit_at("exp(-1/x)", at(0)), "0");
        assert_eq!(limit_at("1/(x - 2)", at(2)), "oo");
        assert_eq!(limit_at("-1/x^3", at(0)), "-oo");
    }

    #[test]
    fn approached_from_the_left() {
        assert_eq!(limit_at("sqrt(-x)", at(0)), "0");
        assert_eq!(limit_at("1/sqrt(-x)", at(0)), "oo");
        assert_eq!(limit_at("log(-x)", at(0)), "-oo");
    }

    #[test]
    fn undefined_constants() {
        assert_eq!(limit_at("0/0", at(0)), "undefined");
        assert_eq!(limit_at("log(-1)", at(0)), "undefined");
    }

    #[test]
    fn odd_roots_of_negative_points() {
        assert_eq!(limit_at("x^(1/3)", at(-8)), "-2");
    }

    #[test]
    fn at_infinity() {
        assert_eq!(limit_at("(2*x + 1)/(x + 3)", Point::PosInfinity), "2");
        assert_eq!(limit_at("x^2", Point::PosInfinity), "oo");
        assert_eq!(limit_at("x^3", Point::NegInfinity), "-oo");
        assert_eq!(limit_at("exp(-x)", Point::PosInfinity), "0");
        assert_eq!(limit_at("exp(x)", Point::NegInfinity), "0");
        assert_eq!(limit_at("sin(x)", Point::PosInfinity), "undefined");
    }

    #[test]
    fn growth_at_infinity() {
        assert_eq!(limit_at("x^2*exp(-x)", Point::PosInfinity), "0");
        assert_eq!(limit_at("x^3*exp(-x)", Point::PosInfinity), "0");
        assert_eq!(limit_at("exp(x)/x^2", Point::PosInfinity), "oo");
        assert_eq!(limit_at("log(x)/x", Point::PosInfinity), "0");
        assert_eq!(limit_at("x/log(x)", Point::PosInfinity), "oo");
        assert_eq!(limit_at("x^2*exp(x)", Point::NegInfinity), "0");
    }

    #[test]
    fn indeterminate_powers_and_products() {
        assert_eq!(limit_at("x*log(x)", at(0)), "0");
        assert_eq!(limit_at("x^x", at(0)), "1");
        assert_eq!(limit_at("(1 + 1/x)^x", Point::PosInfinity), "E");
    }

    #[test]
    fn direct_substitution() {
        let f = normalize("sin(x)/x").unwrap();
        assert_eq!(substitute(&f, "x", &Rational::new()), Substitution::Indeterminate);
        assert_eq!(substitute(&f, "x", &Rational::new()).to_string(), "0/0 (indeterminate form)");

        let f = normalize("1/x").unwrap();
        assert_eq!(substitute(&f, "x", &Rational::new()), Substitution::DivisionByZero);

        let f = normalize("log(x)").unwrap();
        assert_eq!(substitute(&f, "x", &Rational::from(-1)), Substitution::Undefined);

        let f = normalize("x^2 + 1").unwrap();
        assert_eq!(substitute(&f, "x", &Rational::from(2)), Substitution::Value(SymExpr::number(5)));
    }
}
