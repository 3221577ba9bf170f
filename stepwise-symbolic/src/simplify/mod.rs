//! Module to simplify expressions.
//!
//! This module provides the [`simplify`] function, which rewrites an expression into a canonical
//! form. It does this by repeatedly applying rewriting rules to the expression in multiple passes,
//! until no more rules apply. Finally, the terms of every sum and the factors of every product are
//! sorted, so that mathematically equal inputs print the same way (for example, polynomial terms
//! are ordered by descending degree).
//!
//! The rules used by default are defined in [`rules`]. A different rule set can be provided with
//! [`simplify_with`]; this is how [`expand`](crate::expand::expand) distributes products over
//! sums.

mod order;
pub mod rules;
pub mod step;

use crate::expr::{Primary, SymExpr};
use crate::step_collector::StepCollector;
use step::Step;

/// The maximum number of passes made over a single node before giving up. Every rule makes
/// progress towards a normal form, so this is only reached by pathological inputs.
const MAX_PASSES: usize = 64;

/// Base implementation of the simplification algorithm.
///
/// Returns the rewritten expression, and whether any rule was applied.
fn inner_simplify_with<F>(
    expr: &SymExpr,
    rules: F,
    step_collector: &mut dyn StepCollector<Step>,
) -> (SymExpr, bool)
where
    F: Copy + Fn(&SymExpr, &mut dyn StepCollector<Step>) -> Option<SymExpr>,
{
    let mut expr = expr.clone();
    let mut changed_at_least_once = false;

    for _ in 0..MAX_PASSES {
        let mut changed_in_this_pass = false;

        // try to simplify this expression using all rules
        if let Some(new_expr) = rules(&expr, step_collector) {
            expr = new_expr;
            changed_in_this_pass = true;
            changed_at_least_once = true;
        }

        // then begin recursing into the expression's children
        match expr {
            SymExpr::Primary(Primary::Call(_, ref mut arg)) => {
                let result = inner_simplify_with(&**arg, rules, step_collector);
                **arg = result.0;
                // use |= instead of = to not reset these variables to false if already true
                changed_in_this_pass |= result.1;
                changed_at_least_once |= result.1;
            },
            SymExpr::Primary(_) => (),
            SymExpr::Add(ref mut terms) => {
                for term in terms.iter_mut() {
                    let result = inner_simplify_with(term, rules, step_collector);
                    *term = result.0;
                    changed_in_this_pass |= result.1;
                    changed_at_least_once |= result.1;
                }
            },
            SymExpr::Mul(ref mut factors) => {
                for factor in factors.iter_mut() {
                    let result = inner_simplify_with(factor, rules, step_collector);
                    *factor = result.0;
                    changed_in_this_pass |= result.1;
                    changed_at_least_once |= result.1;
                }
            },
            SymExpr::Exp(ref mut lhs, ref mut rhs) => {
                let result_l = inner_simplify_with(&**lhs, rules, step_collector);
                let result_r = inner_simplify_with(&**rhs, rules, step_collector);

                **lhs = result_l.0;
                **rhs = result_r.0;
                changed_in_this_pass |= result_l.1 || result_r.1;
                changed_at_least_once |= result_l.1 || result_r.1;
            },
        }

        if !changed_in_this_pass {
            break;
        }
    }

    (expr, changed_at_least_once)
}

/// Simplify the given expression using the default rules.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    order::sort(inner_simplify_with(expr, rules::all, &mut ()).0)
}

/// Simplify the given expression using the given rules.
///
/// The function should behave like [`rules::all`]: return `Some(expr)` with the rewritten
/// expression if a rule applies to the given node, or `None` otherwise.
pub fn simplify_with<F>(expr: &SymExpr, rules: F) -> SymExpr
where
    F: Copy + Fn(&SymExpr, &mut dyn StepCollector<Step>) -> Option<SymExpr>,
{
    order::sort(inner_simplify_with(expr, rules, &mut ()).0)
}

/// Simplify the given expression using the default rules. The steps taken by the simplifier will
/// also be collected and returned.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let expr = inner_simplify_with(expr, rules::all, &mut steps).0;
    (order::sort(expr), steps)
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplified(input: &str) -> String {
        simplify(&normalize(input).unwrap()).to_string()
    }

    #[test]
    fn add_rules() {
        assert_eq!(simplified("0 + 0*(3*x + 5) + 0 + 3*x"), "3*x");
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("x - x"), "0");
        assert_eq!(simplified("2*x + 1 + 3*x - 4"), "5*x - 3");
    }

    #[test]
    fn multiply_rules() {
        assert_eq!(simplified("0*(3*x + 5)*1*(3*x)"), "0");
        assert_eq!(simplified("1*3*1*(1 + (x^2 + 5*x + 6)*0)*1"), "3");
        assert_eq!(simplified("2*x*3"), "6*x");
        assert_eq!(simplified("x*x^2*x"), "x^4");
        assert_eq!(simplified("x/x"), "1");
    }

    #[test]
    fn canonical_order() {
        assert_eq!(simplified("sin(x) + x^2*2"), "2*x^2 + sin(x)");
        assert_eq!(simplified("1 + x + x^3 + x^2"), "x^3 + x^2 + x + 1");
        assert_eq!(simplified("cos(x) + 2*x"), "2*x + cos(x)");
    }

    #[test]
    fn distribute_numbers() {
        assert_eq!(simplified("2*(x + 1) - 2"), "2*x");
        assert_eq!(simplified("-(x - 3)"), "-x + 3");
    }

    #[test]
    fn power_rules() {
        assert_eq!(simplified("(1^0)^(3*x + 5)^1"), "1");
        assert_eq!(simplified("(0^1)^0"), "1");
        assert_eq!(simplified("2^10"), "1024");
        assert_eq!(simplified("sqrt(16)"), "4");
        assert_eq!(simplified("(x^2)^3"), "x^6");
        assert_eq!(simplified("E^x"), "exp(x)");
        assert_eq!(simplified("0.5^2"), "1/4");
        assert_eq!(simplified("(-8)^(1/3)"), "-2");
        assert_eq!(simplified("(-8)^(2/3) + 1"), "5");
    }

    #[test]
    fn function_values() {
        assert_eq!(simplified("sin(0)"), "0");
        assert_eq!(simplified("cos(pi)"), "-1");
        assert_eq!(simplified("sin(pi/6)"), "1/2");
        assert_eq!(simplified("cos(pi/4)"), "sqrt(2)/2");
        assert_eq!(simplified("tan(pi/4)"), "1");
        assert_eq!(simplified("exp(0) + log(1)"), "1");
        assert_eq!(simplified("exp(log(x))"), "x");
        assert_eq!(simplified("sin(-x) + cos(-x)"), "-sin(x) + cos(x)");
    }

    #[test]
    fn power_rule_steps() {
        let expr = normalize("(1^0)^(3*x + 5)^1").unwrap();
        let (simplified_expr, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified_expr, SymExpr::number(1));
        assert_eq!(steps, vec![
            Step::PowerZero,
            Step::PowerOne,
            Step::PowerOneLeft,
        ]);
    }
}
