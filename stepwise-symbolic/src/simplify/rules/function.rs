//! Simplification rules for calls to the supported functions.
//!
//! Trigonometric functions are evaluated exactly at multiples of `pi/6` and `pi/4`, using a table
//! indexed by the angle in twelfths of `pi`.

use crate::expr::{split_sign, Constant, Func, Primary, SymExpr};
use crate::simplify::{rules::do_call, step::Step};
use crate::step_collector::StepCollector;
use once_cell::sync::Lazy;
use rug::Rational;
use std::collections::HashMap;

/// `sin(t*pi/12)` for `t` in `0..=6`, where it has a simple exact value.
fn first_quadrant_sin(t: u32) -> Option<SymExpr> {
    match t {
        0 => Some(SymExpr::number(0)),
        2 => Some(SymExpr::number((1, 2))),
        3 => Some(SymExpr::Mul(vec![SymExpr::number((1, 2)), SymExpr::number(2).sqrt()])),
        4 => Some(SymExpr::Mul(vec![SymExpr::number((1, 2)), SymExpr::number(3).sqrt()])),
        6 => Some(SymExpr::number(1)),
        _ => None,
    }
}

/// `sin(t*pi/12)` for any `t`.
fn sin_twelfths(t: u32) -> Option<SymExpr> {
    let t = t % 24;
    match t {
        0..=6 => first_quadrant_sin(t),
        7..=12 => first_quadrant_sin(12 - t),
        13..=18 => first_quadrant_sin(t - 12).map(|value| -value),
        _ => first_quadrant_sin(24 - t).map(|value| -value),
    }
}

/// `tan(t*pi/12)` for any `t`. The poles at `t = 6 (mod 12)` have no entry.
fn tan_twelfths(t: u32) -> Option<SymExpr> {
    let sqrt_three = || SymExpr::number(3).sqrt();
    match t % 12 {
        0 => Some(SymExpr::number(0)),
        2 => Some(SymExpr::Mul(vec![SymExpr::number((1, 3)), sqrt_three()])),
        3 => Some(SymExpr::number(1)),
        4 => Some(sqrt_three()),
        8 => Some(SymExpr::Mul(vec![SymExpr::number(-1), sqrt_three()])),
        9 => Some(SymExpr::number(-1)),
        10 => Some(SymExpr::Mul(vec![SymExpr::number((-1, 3)), sqrt_three()])),
        _ => None,
    }
}

/// Exact values of the trigonometric functions, keyed by the function and the angle in twelfths
/// of `pi`, in `0..24`.
static TRIG_TABLE: Lazy<HashMap<(Func, u32), SymExpr>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for t in 0..24 {
        if let Some(value) = sin_twelfths(t) {
            table.insert((Func::Sin, t), value);
        }
        if let Some(value) = sin_twelfths(t + 6) {
            table.insert((Func::Cos, t), value);
        }
        if let Some(value) = tan_twelfths(t) {
            table.insert((Func::Tan, t), value);
        }
    }
    table
});

/// If the expression is a rational multiple of `pi` that is a whole number of twelfths of `pi`,
/// returns that number of twelfths, reduced into `0..24`.
fn pi_twelfths(arg: &SymExpr) -> Option<u32> {
    let coeff = match arg {
        _ if arg.is_zero() => Rational::new(),
        SymExpr::Primary(Primary::Const(Constant::Pi)) => Rational::from(1),
        SymExpr::Mul(factors) => match factors.as_slice() {
            [SymExpr::Primary(Primary::Number(num)), SymExpr::Primary(Primary::Const(Constant::Pi))]
                | [SymExpr::Primary(Primary::Const(Constant::Pi)), SymExpr::Primary(Primary::Number(num))] => {
                num.clone()
            },
            _ => return None,
        },
        _ => return None,
    };

    let twelfths = coeff * 12u32;
    if *twelfths.denom() != 1 {
        return None;
    }
    Some(twelfths.numer().mod_u(24))
}

/// Evaluates a trigonometric function from the table, or applies its symmetry to pull a negative
/// sign out of the argument.
fn simplify_trig(func: Func, arg: &SymExpr) -> Option<SymExpr> {
    if let Some(t) = pi_twelfths(arg) {
        if let Some(value) = TRIG_TABLE.get(&(func, t)) {
            return Some(value.clone());
        }
    }

    let abs = split_sign(arg)?;
    let call = SymExpr::call(func, abs);
    match func {
        Func::Cos => Some(call),
        _ => Some(-call),
    }
}

/// `sin(x)`
pub fn sin(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, Func::Sin, |arg| simplify_trig(Func::Sin, arg))?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Sin);
    Some(opt)
}

/// `cos(x)`
pub fn cos(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, Func::Cos, |arg| simplify_trig(Func::Cos, arg))?;

    step_collector.push(Step::Cos);
    Some(opt)
}

/// `tan(x)`
pub fn tan(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, Func::Tan, |arg| simplify_trig(Func::Tan, arg))?;

    step_collector.push(Step::Tan);
    Some(opt)
}

/// `exp(log(a)) = a`
/// `log(exp(a)) = a`
pub fn exp_log(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let inverse_of = |inner: Func| move |arg: &SymExpr| match arg {
        SymExpr::Primary(Primary::Call(func, inner_arg)) if *func == inner => Some((**inner_arg).clone()),
        _ => None,
    };
    let opt = do_call(expr, Func::Exp, inverse_of(Func::Log))
        .or_else(|| do_call(expr, Func::Log, inverse_of(Func::Exp)))?;

    step_collector.push(Step::ExpLog);
    Some(opt)
}

/// `exp(0) = 1`
/// `exp(1) = E`
pub fn exp_value(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, Func::Exp, |arg| {
        if arg.is_zero() {
            Some(SymExpr::number(1))
        } else if arg.is_one() {
            Some(SymExpr::constant(Constant::E))
        } else {
            None
        }
    })?;

    step_collector.push(Step::ExpValue);
    Some(opt)
}

/// `log(1) = 0`
/// `log(E) = 1`
pub fn log_value(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, Func::Log, |arg| {
        if arg.is_one() {
            Some(SymExpr::number(0))
        } else if matches!(arg, SymExpr::Primary(Primary::Const(Constant::E))) {
            Some(SymExpr::number(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::LogValue);
    Some(opt)
}

/// Applies all function rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    sin(expr, step_collector)
        .or_else(|| cos(expr, step_collector))
        .or_else(|| tan(expr, step_collector))
        .or_else(|| exp_log(expr, step_collector))
        .or_else(|| exp_value(expr, step_collector))
        .or_else(|| log_value(expr, step_collector))
}
