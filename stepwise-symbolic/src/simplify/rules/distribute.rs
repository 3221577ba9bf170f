//! Simplification rules related to the distributive property.

use crate::expr::SymExpr;
use crate::simplify::{rules::{do_multiply, do_power}, step::Step};
use crate::step_collector::StepCollector;

/// `c*(a+b) = c*a + c*b`, where `c` is a number.
///
/// Only numeric coefficients are distributed, so that like terms hidden behind a coefficient can
/// be combined. Products of sums are distributed by [`expand`](crate::expand::expand).
pub fn distribute_coefficient(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let (coeff, terms) = match factors {
            [SymExpr::Primary(coeff), SymExpr::Add(terms)]
                | [SymExpr::Add(terms), SymExpr::Primary(coeff)] => (coeff, terms),
            _ => return None,
        };
        let coeff = SymExpr::Primary(coeff.clone());
        if !coeff.is_number() {
            return None;
        }

        let new_terms = terms.iter()
            .map(|term| coeff.clone() * term.clone())
            .collect::<Vec<_>>();
        Some(SymExpr::Add(new_terms))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::DistributeCoefficient);
    Some(opt)
}

/// `a*(b+c) = a*b + a*c`
///
/// This rule is not part of [`all`]; it is used by [`expand`](crate::expand::expand).
pub fn distributive_property(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        // find the first `SymExpr::Add`, and distribute every other factor over it
        let idx = factors.iter().position(|factor| matches!(factor, SymExpr::Add(_)))?;
        let mut factors_to_distribute = factors.to_vec();
        let SymExpr::Add(add_factor_terms) = factors_to_distribute.swap_remove(idx) else {
            return None;
        };

        let new_terms = add_factor_terms.into_iter()
            .map(|term| SymExpr::Mul(factors_to_distribute.clone()) * term)
            .collect::<Vec<_>>();
        Some(SymExpr::Add(new_terms))
    })?;

    step_collector.push(Step::DistributiveProperty);
    Some(opt)
}

/// `(a*b)^n = a^n * b^n`, where `n` is an integer.
pub fn distribute_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        rhs.as_small_integer()?;
        if let SymExpr::Mul(factors) = lhs {
            let new_factors = factors.iter()
                .map(|factor| factor.clone().pow(rhs.clone()))
                .collect::<Vec<_>>();

            return Some(SymExpr::Mul(new_factors));
        }

        None
    })?;

    step_collector.push(Step::DistributePower);
    Some(opt)
}

/// Applies all distribution rules.
///
/// The distributive property may or may not reduce the complexity of the expression, since it can
/// introduce additional operations. However, it may be necessary for future rules to apply.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    distribute_coefficient(expr, step_collector)
        .or_else(|| distribute_power(expr, step_collector))
}
