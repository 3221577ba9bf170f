//! Simplification rules for expressions involving addition, including combining like terms.

use crate::expr::{Primary, SymExpr};
use crate::simplify::{rules::do_add, step::Step};
use crate::step_collector::StepCollector;
use rug::Rational;

/// `a+(b+c) = a+b+c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            return None;
        }

        let mut new_terms = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                SymExpr::Add(inner) => new_terms.extend(inner.iter().cloned()),
                _ => new_terms.push(term.clone()),
            }
        }
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Flatten);
    Some(opt)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Utility function to extract the rational coefficient and the remaining factors of a term. If
/// the term is not [`SymExpr::Mul`], the coefficient is 1.
///
/// - `5` -> `(5, 1)`
/// - `3*a` -> `(3, a)`
/// - `1/4*a*b` -> `(1/4, a*b)`
/// - `a` -> `(1, a)`
pub(crate) fn split_coefficient(expr: &SymExpr) -> (Rational, SymExpr) {
    match expr {
        SymExpr::Primary(Primary::Number(num)) => (num.clone(), SymExpr::number(1)),
        SymExpr::Mul(factors) => {
            let coeff = factors.iter()
                .filter_map(SymExpr::as_number)
                .fold(Rational::from(1), |acc, num| acc * num);
            let rest = factors.iter()
                .filter(|factor| !factor.is_number())
                .cloned()
                .collect::<Vec<_>>();
            (coeff, SymExpr::Mul(rest).downgrade())
        },
        _ => (Rational::from(1), expr.clone()),
    }
}

/// Multiplies the factors by the coefficient. Returns [`None`] if the coefficient is zero.
fn with_coefficient(coeff: Rational, factors: SymExpr) -> Option<SymExpr> {
    if coeff.cmp0().is_eq() {
        None
    } else if factors.is_one() {
        Some(SymExpr::number(coeff))
    } else if coeff == 1 {
        Some(factors)
    } else {
        Some(SymExpr::number(coeff) * factors)
    }
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `a+a+a = 3a`
/// `2a+3a = 5a`
/// `a-a = 0`
/// etc.
pub fn combine_like_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let mut new_terms = terms.to_vec();
        let mut current_term_idx = 0;

        // this is O(n^2) worst case, due to scanning the whole vec for each term
        while current_term_idx < new_terms.len() {
            let (mut current_coeff, current_factors) = split_coefficient(&new_terms[current_term_idx]);
            let mut merged = false;

            // look at every term after `current_term`
            let mut next_term_idx = current_term_idx + 1;
            while next_term_idx < new_terms.len() {
                let (next_coeff, next_factors) = split_coefficient(&new_terms[next_term_idx]);

                // factors must be strictly equal
                if current_factors == next_factors {
                    // if so, apply a*n + a*m = (n+m)*a
                    current_coeff += next_coeff;
                    new_terms.swap_remove(next_term_idx);
                    merged = true;
                } else {
                    next_term_idx += 1;
                }
            }

            if merged {
                match with_coefficient(current_coeff, current_factors) {
                    Some(term) => {
                        new_terms[current_term_idx] = term;
                        current_term_idx += 1;
                    },
                    None => {
                        new_terms.swap_remove(current_term_idx);
                    },
                }
            } else {
                current_term_idx += 1;
            }
        }

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| add_zero(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn coefficient_of_product() {
        let term = SymExpr::Mul(vec![SymExpr::number((1, 4)), x(), SymExpr::number(2)]);
        assert_eq!(split_coefficient(&term), (Rational::from((1, 2)), x()));
        assert_eq!(split_coefficient(&x()), (Rational::from(1), x()));
    }

    #[test]
    fn like_terms_cancel() {
        let expr = SymExpr::Add(vec![
            x(),
            SymExpr::number(2),
            SymExpr::Mul(vec![SymExpr::number(-1), x()]),
        ]);
        let mut steps = Vec::new();
        assert_eq!(combine_like_terms(&expr, &mut steps), Some(SymExpr::number(2)));
        assert_eq!(steps, vec![Step::CombineLikeTerms]);
    }

    #[test]
    fn unlike_terms_untouched() {
        let expr = SymExpr::Add(vec![x(), x().pow(SymExpr::number(2))]);
        assert_eq!(combine_like_terms(&expr, &mut ()), None);
    }
}
