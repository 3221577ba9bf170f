//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::expr::SymExpr;
use crate::simplify::{rules::do_multiply, step::Step};
use crate::step_collector::StepCollector;
use rug::Rational;

/// `a*(b*c) = a*b*c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        let mut new_factors = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                SymExpr::Mul(inner) => new_factors.extend(inner.iter().cloned()),
                _ => new_factors.push(factor.clone()),
            }
        }
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Flatten);
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
///
/// The rule does not apply if another factor is a power of zero, such as `0^-1`, since the
/// product is undefined.
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let has_zero = factors.iter().any(SymExpr::is_zero);
        let has_zero_power = factors.iter()
            .any(|factor| matches!(factor, SymExpr::Exp(base, _) if base.is_zero()));

        if has_zero && !has_zero_power {
            Some(SymExpr::number(0))
        } else {
            None
        }
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Multiplies all numeric factors together.
///
/// `2*a*3 = 6*a`
pub fn multiply_numbers(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().filter(|factor| factor.is_number()).count() < 2 {
            return None;
        }

        let product = factors.iter()
            .filter_map(SymExpr::as_number)
            .fold(Rational::from(1), |acc, num| acc * num);
        let mut new_factors = vec![SymExpr::number(product)];
        new_factors.extend(factors.iter().filter(|factor| !factor.is_number()).cloned());
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::MultiplyNumbers);
    Some(opt)
}

/// Utility function to extract the base and exponent of an expression. If the expression is not
/// [`SymExpr::Exp`], the exponent is `1`.
///
/// - `a^b` -> `(a, b)`
/// - `a` -> `(a, 1)`
pub(crate) fn split_power(expr: &SymExpr) -> (SymExpr, SymExpr) {
    match expr {
        SymExpr::Exp(lhs, rhs) => ((**lhs).clone(), (**rhs).clone()),
        expr => (expr.clone(), SymExpr::number(1)),
    }
}

/// Combines like factors. Plain numbers are left to [`multiply_numbers`].
///
/// `a*a = a^2`
/// `a^b*a^c = a^(b+c)`
/// `a*a^-1 = a^0`
/// etc.
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();
        let mut current_factor_idx = 0;

        // this is O(n^2) worst case, due to scanning the whole vec for each factor
        while current_factor_idx < new_factors.len() {
            if new_factors[current_factor_idx].is_number() {
                current_factor_idx += 1;
                continue;
            }

            let (current_base, mut current_exp) = split_power(&new_factors[current_factor_idx]);
            let mut merged = false;

            // look at every factor after `current_factor`
            let mut next_factor_idx = current_factor_idx + 1;
            while next_factor_idx < new_factors.len() {
                if new_factors[next_factor_idx].is_number() {
                    next_factor_idx += 1;
                    continue;
                }

                let (next_base, next_exp) = split_power(&new_factors[next_factor_idx]);

                // bases must be strictly equal
                // if they are, apply a^b*a^c = a^(b+c)
                if current_base == next_base {
                    current_exp += next_exp;
                    new_factors.swap_remove(next_factor_idx);
                    merged = true;
                } else {
                    next_factor_idx += 1;
                }
            }

            // after all combining, update the current factor
            if merged {
                new_factors[current_factor_idx] = if current_exp.is_one() {
                    current_base
                } else {
                    current_base.pow(current_exp)
                };
            }

            current_factor_idx += 1;
        }

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
///
/// All multiplication rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| multiply_numbers(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn zero_power_blocks_zero() {
        let expr = SymExpr::Mul(vec![SymExpr::number(0), SymExpr::number(0).recip()]);
        assert_eq!(multiply_zero(&expr, &mut ()), None);
    }

    #[test]
    fn numbers_multiply() {
        let expr = SymExpr::Mul(vec![SymExpr::number(2), x(), SymExpr::number((1, 4))]);
        assert_eq!(
            multiply_numbers(&expr, &mut ()),
            Some(SymExpr::Mul(vec![SymExpr::number((1, 2)), x()])),
        );
    }

    #[test]
    fn like_factors_combine() {
        let expr = SymExpr::Mul(vec![
            x(),
            SymExpr::number(3),
            x().pow(SymExpr::number(2)),
        ]);
        let mut steps = Vec::new();
        assert_eq!(
            combine_like_factors(&expr, &mut steps),
            Some(SymExpr::Mul(vec![x().pow(SymExpr::number(3)), SymExpr::number(3)])),
        );
        assert_eq!(steps, vec![Step::CombineLikeFactors]);
    }
}
