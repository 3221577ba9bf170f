//! Simplification rules for power expressions.

use crate::expr::{Constant, Func, Primary, SymExpr};
use crate::simplify::{rules::do_power, step::Step};
use crate::step_collector::StepCollector;
use rug::{ops::Pow, Integer, Rational};

/// The largest number of bits an evaluated power may have. Larger powers are left unevaluated.
const MAX_POWER_BITS: u64 = 1 << 14;

/// `a^0 = 1`
///
/// `0^0` is defined as `1` by this rule, though it may be undefined in other mathematical
/// contexts.
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.is_zero() {
            Some(SymExpr::number(1))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `0^a = 0`, for positive numbers `a`
///
/// `0^0` is handled by the [`power_zero`] rule. Negative powers of zero are left as they are.
pub fn power_zero_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.is_zero() && rhs.as_number()?.cmp0().is_gt() {
            Some(SymExpr::number(0))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZeroLeft);
    Some(opt)
}

/// `1^a = 1`
pub fn power_one_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, _| {
        if lhs.is_one() {
            Some(SymExpr::number(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOneLeft);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `(a^b)^n = a^(b*n)`, for integer `n`
///
/// Non-integer outer exponents are left alone, since `(x^2)^(1/2)` is `|x|`, not `x`.
pub fn power_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        rhs.as_small_integer()?;
        if let SymExpr::Exp(base, exponent) = lhs {
            return Some((**base).clone().pow((**exponent).clone() * rhs.clone()));
        }

        None
    })?;

    step_collector.push(Step::PowerPower);
    Some(opt)
}

/// Evaluates integer powers of numbers.
///
/// `2^3 = 8`
/// `(2/3)^-2 = 9/4`
pub fn evaluate_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_number()?;
        let exp = rhs.as_small_integer()?;
        if base.cmp0().is_eq() && exp < 0 {
            return None;
        }

        let bits = base.numer().significant_bits().max(base.denom().significant_bits());
        if u64::from(bits) * u64::from(exp.unsigned_abs()) > MAX_POWER_BITS {
            return None;
        }

        Some(SymExpr::number(base.clone().pow(exp)))
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// Returns the exact `n`-th root of the integer, if it has one.
fn exact_root(value: &Integer, n: u32) -> Option<Integer> {
    let root = value.clone().root(n);
    if root.clone().pow(n) == *value {
        Some(root)
    } else {
        None
    }
}

/// Evaluates rational powers of numbers with an exact result. Negative numbers only have real
/// roots of odd degree.
///
/// `4^(1/2) = 2`
/// `(8/27)^(2/3) = 4/9`
/// `(-8)^(1/3) = -2`
pub fn rational_root(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_number()?;
        let exp = rhs.as_number()?;
        if *exp.denom() == 1 || base.cmp0().is_eq() {
            return None;
        }

        let n = exp.denom().to_u32()?;
        let negative = base.cmp0().is_lt();
        if negative && n % 2 == 0 {
            return None;
        }

        let magnitude = base.clone().abs();
        let mut root = Rational::from((exact_root(magnitude.numer(), n)?, exact_root(magnitude.denom(), n)?));
        if negative {
            root = -root;
        }

        let power = exp.numer().to_i32()?;
        let bits = root.numer().significant_bits().max(root.denom().significant_bits());
        if u64::from(bits) * u64::from(power.unsigned_abs()) > MAX_POWER_BITS {
            return None;
        }

        Some(SymExpr::number(root.pow(power)))
    })?;

    step_collector.push(Step::RationalRoot);
    Some(opt)
}

/// `E^a = exp(a)`
pub fn exp_base(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if matches!(lhs, SymExpr::Primary(Primary::Const(Constant::E))) {
            Some(SymExpr::call(Func::Exp, rhs.clone()))
        } else {
            None
        }
    })?;

    step_collector.push(Step::ExpBase);
    Some(opt)
}

/// The largest power of a sum that [`expand_power`] writes out.
const MAX_EXPANDED_POWER: usize = 12;

/// `(a+b)^n = (a+b)*(a+b)*...`, for positive integers `n`
///
/// This rule is not part of [`all`]; it is used by [`expand`](crate::expand::expand).
pub fn expand_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if !matches!(lhs, SymExpr::Add(_)) {
            return None;
        }

        let n = usize::try_from(rhs.as_small_integer()?).ok()?;
        if (2..=MAX_EXPANDED_POWER).contains(&n) {
            Some(SymExpr::Mul(vec![lhs.clone(); n]))
        } else {
            None
        }
    })?;

    step_collector.push(Step::ExpandPower);
    Some(opt)
}

/// Applies all power rules.
///
/// All power rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    power_zero(expr, step_collector)
        .or_else(|| power_zero_left(expr, step_collector))
        .or_else(|| power_one_left(expr, step_collector))
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| power_power(expr, step_collector))
        .or_else(|| evaluate_power(expr, step_collector))
        .or_else(|| rational_root(expr, step_collector))
        .or_else(|| exp_base(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn num(n: impl Into<Rational>) -> SymExpr {
        SymExpr::number(n)
    }

    #[test]
    fn negative_integer_power() {
        let expr = num((2, 3)).pow(num(-2));
        assert_eq!(evaluate_power(&expr, &mut ()), Some(num((9, 4))));
    }

    #[test]
    fn zero_to_negative_power_kept() {
        let expr = num(0).recip();
        assert_eq!(evaluate_power(&expr, &mut ()), None);
        assert_eq!(power_zero_left(&expr, &mut ()), None);
    }

    #[test]
    fn exact_roots() {
        assert_eq!(rational_root(&num((8, 27)).pow(num((2, 3))), &mut ()), Some(num((4, 9))));
        assert_eq!(rational_root(&num(4).pow(num((-1, 2))), &mut ()), Some(num((1, 2))));
        assert_eq!(rational_root(&num(2).sqrt(), &mut ()), None);
        assert_eq!(rational_root(&num(-4).sqrt(), &mut ()), None);
    }

    #[test]
    fn odd_roots_of_negatives() {
        assert_eq!(rational_root(&num(-8).pow(num((1, 3))), &mut ()), Some(num(-2)));
        assert_eq!(rational_root(&num(-8).pow(num((2, 3))), &mut ()), Some(num(4)));
        assert_eq!(rational_root(&num((-1, 27)).pow(num((-1, 3))), &mut ()), Some(num(-3)));
        assert_eq!(rational_root(&num(-16).pow(num((1, 4))), &mut ()), None);
    }

    #[test]
    fn nested_power_needs_integer() {
        let x = SymExpr::symbol("x");
        let expr = x.clone().pow(num(2)).sqrt();
        assert_eq!(power_power(&expr, &mut ()), None);

        let expr = x.clone().sqrt().pow(num(4));
        assert_eq!(power_power(&expr, &mut ()), Some(x.pow(num(2))));
    }
}
