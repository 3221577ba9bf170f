//! Taylor and Laurent series.
//!
//! The series of `f` around `a` is computed with truncated power series arithmetic in `t = x - a`.
//! The variable is the series `a + t`, and the series of sums, products, powers and function
//! calls are built from the series of their parts:
//!
//! - Products multiply term by term, and reciprocals are found by dividing out the leading term,
//!   so that removable singularities like `sin(x)/x` cancel.
//! - `exp`, `sin`, `cos` and `log` of a series with constant term `c` are expanded around `c`,
//!   using the known series of each function.
//! - Non-integer powers use the binomial series.
//!
//! Every series knows the order up to which its coefficients are exact. Division loses orders, so
//! if the requested terms are not all exact, the expansion is repeated with more orders.

use crate::eval::eval_constant;
use crate::expr::{Func, Primary, SymExpr};
use crate::simplify::simplify;
use rug::{Integer, Rational};
use thiserror::Error;

/// Orders computed beyond the requested terms on the first attempt.
const GUARD_ORDERS: i64 = 2;

/// The number of attempts, each with more orders than the last, before giving up.
const MAX_ATTEMPTS: usize = 4;

/// Coefficients with a smaller magnitude than this are treated as zero.
const ZERO_TOLERANCE: f64 = 1e-100;

/// An error that can occur while computing a series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// The expression has no Laurent series with a pole of at most the allowed order, for example
    /// `log(x)` around zero.
    #[error("{expr} has no series expansion around x = {point}")]
    NoExpansion {
        expr: SymExpr,
        point: Rational,
    },
}

/// Why a series could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// A leading coefficient was lost to truncation, so more orders are needed.
    Precision,

    /// There is no Laurent series at the point.
    NoExpansion,
}

/// Returns true if the constant coefficient is zero, possibly up to rounding.
fn is_negligible(coeff: &SymExpr) -> bool {
    coeff.is_zero() || eval_constant(coeff).is_some_and(|value| value.abs() < ZERO_TOLERANCE)
}

fn factorial(n: u32) -> Rational {
    Rational::from(Integer::from(Integer::factorial(n)))
}

/// A truncated Laurent series, `Σ coeffs[i] * t^(start + i) + O(t^order)`.
///
/// The coefficients are simplified constants. The first coefficient is never zero, and an empty
/// series (zero up to its order) starts at its order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Series {
    start: i64,
    coeffs: Vec<SymExpr>,
    order: i64,
}

impl Series {
    /// Creates a series from the coefficients of `t^start`, `t^(start + 1)`, ..., dropping leading
    /// zeros and the coefficients at or beyond `t^order`.
    fn new(start: i64, coeffs: Vec<SymExpr>, order: i64) -> Self {
        let len = usize::try_from(order - start).unwrap_or(0);
        let coeffs = coeffs.into_iter()
            .take(len)
            .map(|coeff| {
                let coeff = simplify(&coeff);
                if is_negligible(&coeff) {
                    SymExpr::number(0)
                } else {
                    coeff
                }
            })
            .collect::<Vec<_>>();

        match coeffs.iter().position(|coeff| !coeff.is_zero()) {
            Some(leading) => Self {
                start: start + leading as i64,
                coeffs: coeffs[leading..].to_vec(),
                order,
            },
            None => Self::zero(order),
        }
    }

    fn zero(order: i64) -> Self {
        Self { start: order, coeffs: Vec::new(), order }
    }

    fn constant(value: SymExpr, order: i64) -> Self {
        Self::new(0, vec![value], order)
    }

    /// The coefficient of `t^power`.
    fn coeff(&self, power: i64) -> SymExpr {
        usize::try_from(power - self.start)
            .ok()
            .and_then(|idx| self.coeffs.get(idx))
            .cloned()
            .unwrap_or_else(|| SymExpr::number(0))
    }

    fn leading(&self) -> Result<&SymExpr, Failure> {
        self.coeffs.first().ok_or(Failure::Precision)
    }

    fn add(&self, other: &Self) -> Self {
        let start = self.start.min(other.start);
        let order = self.order.min(other.order);
        let coeffs = (start..order)
            .map(|power| self.coeff(power) + other.coeff(power))
            .collect();
        Self::new(start, coeffs, order)
    }

    fn mul(&self, other: &Self) -> Self {
        let start = self.start + other.start;
        let order = (self.order + other.start).min(other.order + self.start);
        let coeffs = (start..order)
            .map(|power| {
                let terms = (self.start..=power - other.start)
                    .map(|i| (self.coeff(i), other.coeff(power - i)))
                    .filter(|(a, b)| !a.is_zero() && !b.is_zero())
                    .map(|(a, b)| a * b)
                    .collect();
                SymExpr::Add(terms)
            })
            .collect();
        Self::new(start, coeffs, order)
    }

    /// Multiplies every coefficient by a constant.
    fn scale(&self, factor: &SymExpr) -> Self {
        let coeffs = self.coeffs.iter().map(|coeff| coeff.clone() * factor.clone()).collect();
        Self::new(self.start, coeffs, self.order)
    }

    /// Multiplies the series by `t^by`.
    fn shift(self, by: i64) -> Self {
        Self { start: self.start + by, coeffs: self.coeffs, order: self.order + by }
    }

    /// `1 / (c*t^v*(1 + u)) = t^-v / c * (1 - u + u^2 - ...)`, by dividing out term by term.
    fn recip(&self) -> Result<Self, Failure> {
        let inverse = simplify(&self.leading()?.clone().recip());
        let len = self.order - self.start;

        let mut coeffs = vec![inverse.clone()];
        for k in 1..len {
            let sum = (1..=k)
                .map(|j| self.coeff(self.start + j) * coeffs[(k - j) as usize].clone())
                .collect();
            coeffs.push(simplify(&(SymExpr::number(-1) * inverse.clone() * SymExpr::Add(sum))));
        }

        Ok(Self::new(-self.start, coeffs, len - self.start))
    }

    fn powi(&self, n: i32) -> Result<Self, Failure> {
        let base = if n < 0 { self.recip()? } else { self.clone() };
        if n == 0 {
            return Ok(Self::constant(SymExpr::number(1), base.order));
        }

        let mut result = base.clone();
        for _ in 1..n.unsigned_abs() {
            result = result.mul(&base);
        }
        Ok(result)
    }

    /// `(c*t^v*(1 + u))^p = c^p * t^(v*p) * (1 + u)^p`, where `v*p` must be an integer.
    fn pow(&self, p: &SymExpr) -> Result<Self, Failure> {
        let leading = self.leading()?.clone();
        let shift = if self.start == 0 {
            0
        } else {
            p.as_number()
                .map(|p| Rational::from(p * self.start))
                .filter(|shift| *shift.denom() == 1)
                .and_then(|shift| shift.numer().to_i64())
                .ok_or(Failure::NoExpansion)?
        };

        let scale = simplify(&leading.clone().pow(p.clone()));
        if eval_constant(&scale).is_none() {
            return Err(Failure::NoExpansion);
        }

        // the relative part `u`, with the leading term divided out
        let len = self.order - self.start;
        let inverse = leading.recip();
        let u = Self::new(
            1,
            (1..len).map(|i| self.coeff(self.start + i) * inverse.clone()).collect(),
            len,
        );

        // binomial coefficients `p*(p - 1)*...*(p - k + 1) / k!`
        let mut binomial = vec![SymExpr::number(1)];
        for k in 1..len.max(1) {
            let previous = binomial[(k - 1) as usize].clone();
            let next = previous * (p.clone() - SymExpr::number(k - 1)) * SymExpr::number(Rational::from((1, k)));
            binomial.push(simplify(&next));
        }

        let expanded = u.compose(|k| binomial.get(k as usize).cloned().unwrap_or_else(|| SymExpr::number(0)));
        Ok(expanded.scale(&scale).shift(shift))
    }

    /// `Σ coeff(k) * self^k`, where the series has no constant term.
    fn compose(&self, coeff: impl Fn(u32) -> SymExpr) -> Self {
        let mut result = Self::constant(coeff(0), self.order);
        let mut power = Self::constant(SymExpr::number(1), self.order);
        for k in 1u32.. {
            power = power.mul(self);
            if power.coeffs.is_empty() {
                break;
            }
            result = result.add(&power.scale(&coeff(k)));
        }
        result
    }

    /// The series of `func` applied to this series.
    fn apply(&self, func: Func) -> Result<Self, Failure> {
        if self.order <= 0 {
            return Err(Failure::Precision);
        }
        if self.start < 0 {
            // essential singularity, like `exp(1/x)`
            return Err(Failure::NoExpansion);
        }

        let c = self.coeff(0);
        let rest = Self::new(1, (1..self.order).map(|power| self.coeff(power)).collect(), self.order);
        let at = |func: Func| simplify(&SymExpr::call(func, c.clone()));

        let sine = || rest.compose(|k| match k % 4 {
            1 => SymExpr::number(factorial(k).recip()),
            3 => SymExpr::number(-factorial(k).recip()),
            _ => SymExpr::number(0),
        });
        let cosine = || rest.compose(|k| match k % 4 {
            0 => SymExpr::number(factorial(k).recip()),
            2 => SymExpr::number(-factorial(k).recip()),
            _ => SymExpr::number(0),
        });

        match func {
            // exp(c + r) = exp(c)*exp(r)
            Func::Exp => Ok(rest.compose(|k| SymExpr::number(factorial(k).recip())).scale(&at(Func::Exp))),
            // sin(c + r) = sin(c)*cos(r) + cos(c)*sin(r)
            Func::Sin => Ok(cosine().scale(&at(Func::Sin)).add(&sine().scale(&at(Func::Cos)))),
            // cos(c + r) = cos(c)*cos(r) - sin(c)*sin(r)
            Func::Cos => Ok(cosine().scale(&at(Func::Cos)).add(&sine().scale(&-at(Func::Sin)))),
            Func::Tan => Ok(self.apply(Func::Sin)?.mul(&self.apply(Func::Cos)?.recip()?)),
            // log(c + r) = log(c) + log(1 + r/c)
            Func::Log => {
                let value = at(Func::Log);
                if is_negligible(&c) || eval_constant(&value).is_none() {
                    return Err(Failure::NoExpansion);
                }
                let ratio = rest.scale(&c.clone().recip());
                let log = ratio.compose(|k| match k {
                    0 => SymExpr::number(0),
                    _ if k % 2 == 1 => SymExpr::number(Rational::from((1, k))),
                    _ => SymExpr::number(-Rational::from((1, k))),
                });
                Ok(log.add(&Self::constant(value, self.order)))
            },
        }
    }
}

/// Expands expressions into series around a point.
struct Expander<'a> {
    var: &'a str,
    point: &'a Rational,

    /// The order up to which the series of the variable and of constants are computed.
    order: i64,
}

impl Expander<'_> {
    fn expand(&self, expr: &SymExpr) -> Result<Series, Failure> {
        if !expr.depends_on(self.var) {
            let value = simplify(expr);
            if eval_constant(&value).is_none() {
                return Err(Failure::NoExpansion);
            }
            return Ok(Series::constant(value, self.order));
        }

        match expr {
            SymExpr::Primary(Primary::Call(func, arg)) => self.expand(arg)?.apply(*func),
            // the variable itself, `a + t`
            SymExpr::Primary(_) => Ok(Series::new(
                0,
                vec![SymExpr::number(self.point.clone()), SymExpr::number(1)],
                self.order,
            )),
            SymExpr::Add(terms) => terms.iter()
                .try_fold(Series::zero(self.order), |sum, term| Ok(sum.add(&self.expand(term)?))),
            SymExpr::Mul(factors) => factors.iter()
                .try_fold(Series::constant(SymExpr::number(1), self.order), |product, factor| {
                    Ok(product.mul(&self.expand(factor)?))
                }),
            SymExpr::Exp(base, exp) if exp.depends_on(self.var) => {
                // f^g = exp(g*log(f))
                let rewritten = SymExpr::call(
                    Func::Exp,
                    (**exp).clone() * SymExpr::call(Func::Log, (**base).clone()),
                );
                self.expand(&simplify(&rewritten))
            },
            SymExpr::Exp(base, exp) => {
                let base = self.expand(base)?;
                match exp.as_small_integer() {
                    Some(n) => base.powi(n),
                    None => base.pow(exp),
                }
            },
        }
    }
}

/// A single term `coeff * base^power` of the series.
fn term(coeff: SymExpr, base: &SymExpr, power: i64) -> SymExpr {
    let monomial = match power {
        0 => return coeff,
        1 => base.clone(),
        _ => base.clone().pow(SymExpr::number(power)),
    };

    if coeff.is_one() {
        monomial
    } else {
        SymExpr::Mul(vec![coeff, monomial])
    }
}

/// Computes the series of `f` around the given point, up to (but not including) the term with
/// `(x - point)^terms`.
///
/// The terms are returned in ascending order of their power, and terms with a zero coefficient
/// are left out. The series itself is not simplified, so that the order of the terms is kept.
/// Poles of order greater than `max_pole_order` are reported as [`SeriesError::NoExpansion`].
pub fn series(
    f: &SymExpr,
    var: &str,
    point: &Rational,
    terms: u32,
    max_pole_order: u32,
) -> Result<SymExpr, SeriesError> {
    if terms == 0 {
        return Ok(SymExpr::number(0));
    }

    let no_expansion = || SeriesError::NoExpansion { expr: f.clone(), point: point.clone() };
    let simplified = simplify(f);
    let wanted = i64::from(terms);

    let mut order = wanted + GUARD_ORDERS;
    let mut expansion = None;
    for _ in 0..MAX_ATTEMPTS {
        match (Expander { var, point, order }).expand(&simplified) {
            Ok(series) if series.order >= wanted => {
                expansion = Some(series);
                break;
            },
            Ok(series) => order += wanted - series.order,
            Err(Failure::Precision) => order *= 2,
            Err(Failure::NoExpansion) => return Err(no_expansion()),
        }
    }

    let expansion = expansion.ok_or_else(no_expansion)?;
    if expansion.start < -i64::from(max_pole_order) {
        return Err(no_expansion());
    }

    let x = SymExpr::symbol(var);
    let base = if point.cmp0().is_eq() {
        x
    } else {
        x + SymExpr::number(-point.clone())
    };

    let series_terms = (expansion.start..wanted)
        .map(|power| (power, expansion.coeff(power)))
        .filter(|(_, coeff)| !coeff.is_zero())
        .map(|(power, coeff)| term(coeff, &base, power))
        .collect();
    Ok(SymExpr::Add(series_terms).downgrade())
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use super::*;

    fn series_str(input: &str, point: i32, terms: u32) -> String {
        let f = normalize(input).unwrap();
        series(&f, "x", &Rational::from(point), terms, 6).unwrap().to_string()
    }

    fn no_expansion(input: &str, point: i32) -> bool {
        let f = normalize(input).unwrap();
        matches!(series(&f, "x", &Rational::from(point), 3, 6), Err(SeriesError::NoExpansion { .. }))
    }

    #[test]
    fn taylor_at_zero() {
        assert_eq!(series_str("exp(x)", 0, 4), "1 + x + x^2/2 + x^3/6");
        assert_eq!(series_str("sin(x)", 0, 4), "x - x^3/6");
        assert_eq!(series_str("1/(1 - x)", 0, 3), "1 + x + x^2");
        assert_eq!(series_str("tan(x)", 0, 6), "x + x^3/3 + 2*x^5/15");
        assert_eq!(series_str("sqrt(1 + x)", 0, 3), "1 + x/2 - x^2/8");
    }

    #[test]
    fn around_another_point() {
        assert_eq!(series_str("log(x)", 1, 3), "x - 1 - (x - 1)^2/2");
        assert_eq!(series_str("x^2", 2, 5), "4 + 4*(x - 2) + (x - 2)^2");
        assert_eq!(series_str("cos(x)", 1, 3), "cos(1) - sin(1)*(x - 1) - cos(1)*(x - 1)^2/2");
    }

    #[test]
    fn removable_singularities() {
        assert_eq!(series_str("sin(x)/x", 0, 4), "1 - x^2/6");
        assert_eq!(series_str("(exp(x) - 1)/x", 0, 4), "1 + x/2 + x^2/6 + x^3/24");
        assert_eq!(series_str("(x^2 - 1)/(x - 1)", 1, 3), "2 + x - 1");
    }

    #[test]
    fn laurent() {
        assert_eq!(series_str("exp(x)/x", 0, 3), "1/x + 1 + x/2 + x^2/6");
        assert_eq!(series_str("1/x", 0, 3), "1/x");
        assert_eq!(series_str("1/sin(x)", 0, 3), "1/x + x/6");
    }

    #[test]
    fn no_terms() {
        assert_eq!(series_str("exp(x)", 0, 0), "0");
    }

    #[test]
    fn without_expansion() {
        let f = normalize("log(x)").unwrap();
        let err = series(&f, "x", &Rational::new(), 3, 6).unwrap_err();
        assert_eq!(err.to_string(), "log(x) has no series expansion around x = 0");

        assert!(no_expansion("sqrt(x)", 0));
        assert!(no_expansion("exp(1/x)", 0));
        assert!(no_expansion("1/x^8", 0));
        assert!(no_expansion("log(x - 2)", 0));
    }

    #[test]
    fn series_arithmetic() {
        let t = Series::new(1, vec![SymExpr::number(1)], 5);
        let one_minus_t = Series::constant(SymExpr::number(1), 5).add(&t.scale(&SymExpr::number(-1)));
        let geometric = one_minus_t.recip().unwrap();
        assert_eq!(geometric.start, 0);
        assert_eq!(geometric.order, 5);
        assert!(geometric.coeffs.iter().all(SymExpr::is_one));

        let reciprocal = t.recip().unwrap();
        assert_eq!((reciprocal.start, reciprocal.order), (-1, 3));
        assert_eq!(reciprocal.mul(&t).order, 4);
    }
}
