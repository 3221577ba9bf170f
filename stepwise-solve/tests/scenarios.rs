use pretty_assertions::assert_eq;
use stepwise_solve::{extract, solve};
use stepwise_symbolic::{derivative::derivative, integral::integral, normalize, simplify};

fn last_line(text: &str) -> &str {
    text.lines().last().unwrap()
}

#[test]
fn derivative_of_sum() {
    let text = solve("x^2 + sin(x)", "derivative", None, None).unwrap();
    assert_eq!(last_line(&text), "Final simplified derivative: 2*x + cos(x)");
}

#[test]
fn integral_of_polynomial() {
    let text = solve("3*x^2 + 2*x", "integral", None, None).unwrap();
    assert!(text.contains("Indefinite integral: x^3 + x^2 + C"));
    assert!(text.contains("d/dx of x^3 + x^2 = 3*x^2 + 2*x, which matches the original integrand."));
}

#[test]
fn limit_of_sinc() {
    let text = solve("sin(x)/x", "limit", Some(0.0), None).unwrap();
    assert_eq!(last_line(&text), "Limit as x → 0 = 1");
}

#[test]
fn series_of_exp() {
    let text = solve("exp(x)", "series", Some(0.0), Some(4)).unwrap();
    assert!(text.lines().any(|line| line == "1 + x + x^2/2 + x^3/6"));
}

#[test]
fn series_of_sinc() {
    let text = solve("sin(x)/x", "series", Some(0.0), Some(4)).unwrap();
    assert!(text.lines().any(|line| line == "1 - x^2/6"));
}

#[test]
fn integral_of_squared_sine() {
    let text = solve("sin(x)^2", "integral", None, None).unwrap();
    assert!(text.contains("Indefinite integral: x/2 - sin(2*x)/4 + C"));
    assert!(text.contains("Thus, the computed integral is correct."));
}

#[test]
fn limit_without_point() {
    assert_eq!(
        solve("x^2", "limit", None, None).unwrap(),
        "Error: Point required for limit calculation",
    );
}

#[test]
fn series_without_terms() {
    assert_eq!(
        solve("exp(x)", "series", Some(0.0), None).unwrap(),
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
fn polynomials_integrate_and_differentiate_back() {
    for input in ["x^4 - 3*x^2 + 7", "5*x^3 + x/2", "(x + 1)^3", "2"] {
        let expr = simplify(&normalize(input).unwrap());
        let antiderivative = integral(&expr, "x").unwrap();
        assert_eq!(simplify(&derivative(&antiderivative, "x")), expr, "for {}", input);
    }
}

#[test]
fn extractor_without_calls() {
    assert_eq!(extract("The derivative measures how quickly a function changes."), None);
}

#[test]
fn extractor_with_two_calls() {
    let text = "First, solve(\"x^2 + sin(x)\", operation='derivative'). \
        Then, solve('3*x^2 + 2*x', operation=\"integral\").";
    let expected = format!(
        "{}\n\n{}",
        solve("x^2 + sin(x)", "derivative", None, None).unwrap(),
        solve("3*x^2 + 2*x", "integral", None, None).unwrap(),
    );
    assert_eq!(extract(text), Some(expected));
}

#[test]
fn solving_is_deterministic() {
    let first = solve("x*exp(x)", "integral", None, None).unwrap();
    let second = solve("x*exp(x)", "integral", None, None).unwrap();
    assert_eq!(first, second);
}
