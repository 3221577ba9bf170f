//! Explanations of single calculus operations.

use crate::config::Config;
use crate::error::{ComputeError, SolveError};
use crate::operation::Operation;
use rug::{Float, Rational};
use stepwise_symbolic::{
    derivative::{derivative, unevaluated},
    eval::eval,
    expand::expand,
    integral::integral,
    limit::{limit, substitute, Point},
    normalize::VARIABLE,
    primitive::{float, rational_from_f64},
    series::series,
    normalize,
    simplify,
    simplify_with_steps,
    SymExpr,
};
use tracing::debug;

/// The points at which an antiderivative is compared numerically with the integrand, if they
/// could not be shown to be equal symbolically.
const VERIFICATION_POINTS: [f64; 5] = [0.3, 0.7, 1.3, 2.1, -0.6];

/// Values that differ by less than this (relative to their magnitude) are considered equal.
const VERIFICATION_TOLERANCE: f64 = 1e-40;

/// Finite points whose magnitude falls outside this range are shown in exponent form.
const DECIMAL_RANGE: std::ops::Range<f64> = 1e-4..1e16;

/// Formats a point the way it is shown to the user: the shortest decimal form for finite points
/// (exponent form for very large or very small ones), and `oo` or `-oo` for infinite points.
fn fmt_point(point: f64) -> String {
    if point == f64::INFINITY {
        "oo".to_string()
    } else if point == f64::NEG_INFINITY {
        "-oo".to_string()
    } else if point == 0.0 {
        // also covers `-0.0`
        "0".to_string()
    } else if DECIMAL_RANGE.contains(&point.abs()) {
        point.to_string()
    } else {
        format!("{:e}", point)
    }
}

/// Converts a point given by the caller into a [`Point`].
fn limit_point(point: f64) -> Result<Point, ComputeError> {
    if point == f64::INFINITY {
        Ok(Point::PosInfinity)
    } else if point == f64::NEG_INFINITY {
        Ok(Point::NegInfinity)
    } else {
        rational_from_f64(point)
            .map(Point::Finite)
            .ok_or(ComputeError::NotANumber)
    }
}

fn derivative_lines(expr: &SymExpr) -> Vec<String> {
    let evaluated = derivative(expr, VARIABLE);
    let simplified = simplify(&evaluated);

    vec![
        format!("Original expression: {}", expr),
        "Goal: Find the derivative with respect to x.".to_string(),
        "Step 1: Identify differentiation rules needed:".to_string(),
        "  - Power Rule: d/dx[x^n] = n*x^(n-1)".to_string(),
        "  - Sum Rule: d/dx[f(x) + g(x)] = f'(x) + g'(x)".to_string(),
        "  - Product Rule: d/dx[f(x)*g(x)] = f'(x)*g(x) + f(x)*g'(x)".to_string(),
        "  - Chain Rule: d/dx[f(g(x))] = f'(g(x))*g'(x)".to_string(),
        "Step 2: Apply these rules to each term in the expression.".to_string(),
        format!("Intermediate (unevaluated) derivative form: {}", unevaluated(expr, VARIABLE)),
        format!("Evaluating the intermediate expression to simplify: {}", evaluated),
        format!("Final simplified derivative: {}", simplified),
    ]
}

/// Returns true if the two values are equal, up to [`VERIFICATION_TOLERANCE`].
fn approx_eq(a: &Float, b: &Float) -> bool {
    let scale = Float::max(a.clone().abs(), &float(1));
    Float::with_val(a.prec(), a - b).abs() < scale * VERIFICATION_TOLERANCE
}

/// Returns true if the derivative of an antiderivative can be shown to equal the integrand.
///
/// Their difference is first expanded, which cancels everything that differs only in form. If
/// that does not leave zero, both are evaluated at [`VERIFICATION_POINTS`], and must agree at
/// every point where they are both defined (and be defined at one point at least).
fn matches_integrand(derivative: &SymExpr, integrand: &SymExpr) -> bool {
    if expand(&(derivative.clone() - integrand.clone())).is_zero() {
        return true;
    }

    let mut compared = 0;
    for point in VERIFICATION_POINTS {
        let point = float(point);
        match (eval(derivative, VARIABLE, &point), eval(integrand, VARIABLE, &point)) {
            (Some(a), Some(b)) => {
                if !approx_eq(&a, &b) {
                    return false;
                }
                compared += 1;
            },
            (None, None) => (),
            _ => return false,
        }
    }
    compared > 0
}

fn integral_lines(expr: &SymExpr) -> Result<Vec<String>, ComputeError> {
    let antiderivative = integral(expr, VARIABLE)?;
    let check = simplify(&derivative(&antiderivative, VARIABLE));

    let mut lines = vec![
        format!("Original expression: {}", expr),
        "Goal: Find the indefinite integral (antiderivative).".to_string(),
        "Step 1: Identify integration rules needed:".to_string(),
        "  - Power Rule (in reverse): ∫ x^n dx = x^(n+1)/(n+1) + C".to_string(),
        "  - For trigonometric, exponential, etc., apply known antiderivative formulas.".to_string(),
        "Step 2: Integrate each term of the expression.".to_string(),
        format!("Indefinite integral: {} + C", antiderivative),
        "Step 3: Verification by differentiation:".to_string(),
    ];

    if matches_integrand(&check, expr) {
        lines.push(format!("d/dx of {} = {}, which matches the original integrand.", antiderivative, check));
        lines.push("Thus, the computed integral is correct.".to_string());
    } else {
        debug!(%antiderivative, %check, integrand = %expr, "antiderivative could not be verified");
        lines.push(format!(
            "d/dx of {} = {}, which could not be confirmed to match the original integrand {}.",
            antiderivative,
            check,
            expr,
        ));
    }

    Ok(lines)
}

fn limit_lines(expr: &SymExpr, point: f64, config: &Config) -> Result<Vec<String>, ComputeError> {
    let target = limit_point(point)?;
    let substitution = match &target {
        Point::Finite(value) => substitute(expr, VARIABLE, value).to_string(),
        Point::PosInfinity | Point::NegInfinity => "not possible at an infinite point".to_string(),
    };
    let value = limit(expr, VARIABLE, &target, config.max_lhopital)?;

    let point = fmt_point(point);
    Ok(vec![
        format!("Original expression: {}", expr),
        format!("Goal: Find the limit as x → {}.", point),
        "Step 1: Attempt direct substitution:".to_string(),
        format!("  Substitute x={} into {}: {}", point, expr, substitution),
        "Step 2: If direct substitution is undefined or indeterminate, use limit laws, simplification, or L'Hopital's rule.".to_string(),
        "After applying the necessary limit techniques, we get:".to_string(),
        format!("Limit as x → {} = {}", point, value),
    ])
}

fn series_lines(expr: &SymExpr, point: f64, terms: u32, config: &Config) -> Result<Vec<String>, ComputeError> {
    if terms > config.max_series_terms {
        return Err(ComputeError::TooManyTerms { requested: terms, max: config.max_series_terms });
    }
    let center: Rational = match limit_point(point)? {
        Point::Finite(value) => value,
        Point::PosInfinity | Point::NegInfinity => return Err(ComputeError::InfinitePoint),
    };
    let expansion = series(expr, VARIABLE, &center, terms, config.max_pole_order)?;

    let point = fmt_point(point);
    Ok(vec![
        format!("Original expression: {}", expr),
        format!("Goal: Find the series expansion around x = {} up to {} terms.", point, terms),
        "The series expansion of a function f(x) around a point a is given by:".to_string(),
        "  f(x) = f(a) + f'(a)*(x-a) + f''(a)*(x-a)^2/2! + ...".to_string(),
        format!("Computing the series expansion around a={}, we get:", point),
        expansion.to_string(),
        format!("This polynomial (truncated series) approximates {} near x={}.", expr, point),
    ])
}

/// Solves the given calculus problem with the default [`Config`], and explains the solution step
/// by step.
///
/// See [`solve_with`] for details.
pub fn solve(
    expression: &str,
    operation: &str,
    point: Option<f64>,
    terms: Option<u32>,
) -> Result<String, ComputeError> {
    solve_with(expression, operation, point, terms, &Config::default())
}

/// Solves the given calculus problem, and explains the solution step by step.
///
/// `expression` is an expression of the variable `x`, with `^` or `**` for powers.
/// `operation` is one of `derivative`, `integral`, `limit` or `series`. Limits require a `point`,
/// which may be infinite, and series require both a finite `point` and the number of `terms`.
///
/// The explanation is returned as lines joined by `\n`. Mistakes in the request are not errors:
/// they are returned in place of the explanation, as the parse error message prefixed with
/// `Error parsing expression: `, or as the text of a [`SolveError`]. An [`Err`] is only returned
/// if the request was valid but could not be computed, for example because no antiderivative
/// could be found.
pub fn solve_with(
    expression: &str,
    operation: &str,
    point: Option<f64>,
    terms: Option<u32>,
    config: &Config,
) -> Result<String, ComputeError> {
    debug!(expression, operation, ?point, ?terms, "solving");

    let expr = match normalize(expression) {
        Ok(expr) => expr,
        Err(err) => {
            debug!(%err, "could not parse expression");
            return Ok(format!("Error parsing expression: {}", err));
        },
    };
    let (expr, steps) = simplify_with_steps(&expr);
    debug!(%expr, ?steps, "simplified expression");

    let operation = match operation.parse::<Operation>() {
        Ok(operation) => operation,
        Err(err) => return Ok(err.to_string()),
    };

    let lines = match (operation, point, terms) {
        (Operation::Derivative, _, _) => derivative_lines(&expr),
        (Operation::Integral, _, _) => integral_lines(&expr)?,
        (Operation::Limit, Some(point), _) => limit_lines(&expr, point, config)?,
        (Operation::Limit, None, _) => return Ok(SolveError::MissingPoint.to_string()),
        (Operation::Series, Some(point), Some(terms)) => series_lines(&expr, point, terms, config)?,
        (Operation::Series, _, _) => return Ok(SolveError::MissingSeriesParameters.to_string()),
    };

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn last_line(text: &str) -> &str {
        text.lines().last().unwrap()
    }

    #[test]
    fn points() {
        assert_eq!(fmt_point(0.0), "0");
        assert_eq!(fmt_point(-0.0), "0");
        assert_eq!(fmt_point(1.5), "1.5");
        assert_eq!(fmt_point(2.0), "2");
        assert_eq!(fmt_point(f64::INFINITY), "oo");
        assert_eq!(fmt_point(f64::NEG_INFINITY), "-oo");
    }

    #[test]
    fn extreme_points_use_exponents() {
        assert_eq!(fmt_point(1e300), "1e300");
        assert_eq!(fmt_point(-2.5e-30), "-2.5e-30");
        assert_eq!(fmt_point(1e16), "1e16");
        assert_eq!(fmt_point(123456.5), "123456.5");
        assert_eq!(fmt_point(0.0001), "0.0001");
    }

    #[test]
    fn derivative_block() {
        let text = solve("x^2 + sin(x)", "derivative", None, None).unwrap();
        assert_eq!(text, [
            "Original expression: x^2 + sin(x)",
            "Goal: Find the derivative with respect to x.",
            "Step 1: Identify differentiation rules needed:",
            "  - Power Rule: d/dx[x^n] = n*x^(n-1)",
            "  - Sum Rule: d/dx[f(x) + g(x)] = f'(x) + g'(x)",
            "  - Product Rule: d/dx[f(x)*g(x)] = f'(x)*g(x) + f(x)*g'(x)",
            "  - Chain Rule: d/dx[f(g(x))] = f'(g(x))*g'(x)",
            "Step 2: Apply these rules to each term in the expression.",
            "Intermediate (unevaluated) derivative form: d/dx[x^2] + d/dx[sin(x)]",
            "Evaluating the intermediate expression to simplify: 2*x + cos(x)",
            "Final simplified derivative: 2*x + cos(x)",
        ].join("\n"));
    }

    #[test]
    fn original_expression_is_canonical() {
        let text = solve("2*x + x^2 + x", "derivative", None, None).unwrap();
        assert_eq!(text.lines().next(), Some("Original expression: x^2 + 3*x"));
    }

    #[test]
    fn integral_block() {
        let text = solve("3*x^2 + 2*x", "integral", None, None).unwrap();
        assert_eq!(text, [
            "Original expression: 3*x^2 + 2*x",
            "Goal: Find the indefinite integral (antiderivative).",
            "Step 1: Identify integration rules needed:",
            "  - Power Rule (in reverse): ∫ x^n dx = x^(n+1)/(n+1) + C",
            "  - For trigonometric, exponential, etc., apply known antiderivative formulas.",
            "Step 2: Integrate each term of the expression.",
            "Indefinite integral: x^3 + x^2 + C",
            "Step 3: Verification by differentiation:",
            "d/dx of x^3 + x^2 = 3*x^2 + 2*x, which matches the original integrand.",
            "Thus, the computed integral is correct.",
        ].join("\n"));
    }

    #[test]
    fn integral_verified_by_expansion() {
        let text = solve("x*(x + 1)^2", "integral", None, None).unwrap();
        assert_eq!(last_line(&text), "Thus, the computed integral is correct.");
    }

    #[test]
    fn verification_falls_back_to_numbers() {
        let integrand = normalize("2*sin(x)*cos(x)").unwrap();
        let other_form = normalize("sin(2*x)").unwrap();
        assert!(matches_integrand(&other_form, &integrand));
        assert!(!matches_integrand(&normalize("cos(2*x)").unwrap(), &integrand));
    }

    #[test]
    fn unsupported_integral() {
        let err = solve("exp(x^2)", "integral", None, None).unwrap_err();
        assert_eq!(err.to_string(), "could not find an antiderivative of exp(x^2)");
    }

    #[test]
    fn limit_block() {
        let text = solve("sin(x)/x", "limit", Some(0.0), None).unwrap();
        assert_eq!(text, [
            "Original expression: sin(x)/x",
            "Goal: Find the limit as x → 0.",
            "Step 1: Attempt direct substitution:",
            "  Substitute x=0 into sin(x)/x: 0/0 (indeterminate form)",
            "Step 2: If direct substitution is undefined or indeterminate, use limit laws, simplification, or L'Hopital's rule.",
            "After applying the necessary limit techniques, we get:",
            "Limit as x → 0 = 1",
        ].join("\n"));
    }

    #[test]
    fn limit_at_infinity() {
        let text = solve("(2*x + 1)/(x + 3)", "limit", Some(f64::INFINITY), None).unwrap();
        assert!(text.contains("  Substitute x=oo into (2*x + 1)/(x + 3): not possible at an infinite point"));
        assert_eq!(last_line(&text), "Limit as x → oo = 2");
    }

    #[test]
    fn limit_with_decimal_point() {
        let text = solve("x^2", "limit", Some(1.5), None).unwrap();
        assert!(text.contains("  Substitute x=1.5 into x^2: 9/4"));
        assert_eq!(last_line(&text), "Limit as x → 1.5 = 9/4");
    }

    #[test]
    fn pole_from_the_right() {
        let text = solve("1/x", "limit", Some(0.0), None).unwrap();
        assert!(text.contains("  Substitute x=0 into 1/x: division by zero"));
        assert_eq!(last_line(&text), "Limit as x → 0 = oo");

        let text = solve("exp(1/x)", "limit", Some(0.0), None).unwrap();
        assert_eq!(last_line(&text), "Limit as x → 0 = oo");
    }

    #[test]
    fn limit_of_undefined_constant() {
        let text = solve("0/0", "limit", Some(0.0), None).unwrap();
        assert_eq!(last_line(&text), "Limit as x → 0 = undefined");
    }

    #[test]
    fn limit_at_infinity_in_original_variable() {
        let text = solve("x^2*exp(-x)", "limit", Some(f64::INFINITY), None).unwrap();
        assert_eq!(last_line(&text), "Limit as x → oo = 0");
    }

    #[test]
    fn series_block() {
        let text = solve("exp(x)", "series", Some(0.0), Some(4)).unwrap();
        assert_eq!(text, [
            "Original expression: exp(x)",
            "Goal: Find the series expansion around x = 0 up to 4 terms.",
            "The series expansion of a function f(x) around a point a is given by:",
            "  f(x) = f(a) + f'(a)*(x-a) + f''(a)*(x-a)^2/2! + ...",
            "Computing the series expansion around a=0, we get:",
            "1 + x + x^2/2 + x^3/6",
            "This polynomial (truncated series) approximates exp(x) near x=0.",
        ].join("\n"));
    }

    #[test]
    fn series_of_removable_singularities() {
        let text = solve("sin(x)/x", "series", Some(0.0), Some(4)).unwrap();
        assert!(text.lines().any(|line| line == "1 - x^2/6"));

        let text = solve("(exp(x) - 1)/x", "series", Some(0.0), Some(4)).unwrap();
        assert!(text.lines().any(|line| line == "1 + x/2 + x^2/6 + x^3/24"));
    }

    #[test]
    fn series_limits() {
        let config = Config { max_series_terms: 3, ..Config::default() };
        assert_eq!(
            solve_with("exp(x)", "series", Some(0.0), Some(4), &config),
            Err(ComputeError::TooManyTerms { requested: 4, max: 3 }),
        );
        assert_eq!(
            solve("exp(x)", "series", Some(f64::INFINITY), Some(4)),
            Err(ComputeError::InfinitePoint),
        );
        assert_eq!(solve("exp(x)", "series", Some(f64::NAN), Some(4)), Err(ComputeError::NotANumber));
    }

    #[test]
    fn missing_parameters() {
        assert_eq!(
            solve("x^2", "limit", None, None).unwrap(),
            "Error: Point required for limit calculation",
        );
        assert_eq!(
            solve("x^2", "series", Some(0.0), None).unwrap(),
            "Error: Point and terms required for series expansion",
        );
        assert_eq!(
            solve("x^2", "series", None, Some(3)).unwrap(),
            "Error: Point and terms required for series expansion",
        );
    }

    #[test]
    fn invalid_operation() {
        assert_eq!(
            solve("x^2", "bogus-op", None, None).unwrap(),
            "Error: Invalid operation. Use 'derivative', 'integral', 'limit', or 'series'.",
        );
    }

    #[test]
    fn parse_errors_are_inline() {
        let text = solve("x +", "derivative", None, None).unwrap();
        assert!(text.starts_with("Error parsing expression: "));

        // the expression is parsed before the operation is checked
        let text = solve("y^2", "bogus-op", None, None).unwrap();
        assert!(text.starts_with("Error parsing expression: "));
    }
}
