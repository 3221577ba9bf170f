//! Expansion of products and powers of sums.
//!
//! [`expand`] simplifies an expression with the default rules, and additionally distributes
//! every product over the sums it contains and writes out positive integer powers of sums. The
//! result is a sum of terms that contain no sums themselves (outside of function arguments and
//! non-integer powers), which makes like terms visible to the simplifier.

use crate::expr::SymExpr;
use crate::simplify::{rules, simplify_with, step::Step};
use crate::step_collector::StepCollector;

/// The rules used by [`expand`]. The expanding rules are tried first, since the default rules
/// would otherwise recombine `(a+b)*(a+b)` back into `(a+b)^2`.
fn expand_rules(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    rules::power::expand_power(expr, step_collector)
        .or_else(|| rules::distribute::distributive_property(expr, step_collector))
        .or_else(|| rules::all(expr, step_collector))
}

/// Expands the given expression.
pub fn expand(expr: &SymExpr) -> SymExpr {
    simplify_with(expr, expand_rules)
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use super::*;

    fn expanded(input: &str) -> String {
        expand(&normalize(input).unwrap()).to_string()
    }

    #[test]
    fn square_of_sum() {
        assert_eq!(expanded("(x + 1)^2"), "x^2 + 2*x + 1");
    }

    #[test]
    fn product_of_sums() {
        assert_eq!(expanded("(x + 2)*(x - 3)"), "x^2 - x - 6");
        assert_eq!(expanded("x*(x + 1)^2"), "x^3 + 2*x^2 + x");
    }

    #[test]
    fn cancellation() {
        assert_eq!(expanded("(x + 1)^2 - (x^2 + 2*x + 1)"), "0");
    }

    #[test]
    fn quotient_over_monomial() {
        assert_eq!(expanded("(x^2 + 1)/x"), "x + 1/x");
    }
}
