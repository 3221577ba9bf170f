//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](stepwise_parser::parser::ast::expr::Expr) type from `stepwise_parser` is a
//! recursive `enum` that represents the AST of a mathematical expression. It's convenient for
//! parsing, but not so much for algebraic manipulation.
//!
//! This module defines a separate [`SymExpr`], which recursively flattens the AST into a list of
//! terms or factors, depending on the operation. Subtraction is stored as addition of a negated
//! term, and division as multiplication by a power with exponent `-1`.
//!
//! # Strict equality
//!
//! Determining if two expressions are mathematically equal is extremely difficult, since there
//! are an infinite number of ways to represent the same expression. Instead, the [`PartialEq`]
//! implementation for [`SymExpr`] implements **strict equality**. Two expressions are strictly
//! equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//! [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//! terms / factors, in any order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives: `x^2 + 2*x + 1` and `(x + 1)^2` are not
//! strictly equal, but two strictly equal expressions are always mathematically equal. This makes
//! it suitable for deciding if terms / factors can be combined during simplification.

mod fmt;
mod iter;

pub(crate) use fmt::{factor_string, split_sign};

use iter::ExprIter;
use rug::Rational;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// Euler's number, `E`.
    E,

    /// The ratio of a circle's circumference to its diameter, `pi`.
    Pi,
}

impl Constant {
    /// Returns the name of the constant, as it is written in expressions.
    pub fn name(self) -> &'static str {
        match self {
            Self::E => "E",
            Self::Pi => "pi",
        }
    }

    /// Returns the constant with the given name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "E" => Some(Self::E),
            "pi" => Some(Self::Pi),
            _ => None,
        }
    }
}

/// A supported function of one argument.
///
/// `sqrt` is not included; it is represented as a power with exponent `1/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
}

impl Func {
    /// Returns the name of the function, as it is written in expressions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Log => "log",
        }
    }

    /// Returns the function with the given name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "exp" => Some(Self::Exp),
            "log" => Some(Self::Log),
            _ => None,
        }
    }
}

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact rational number, such as `2` or `1/2`.
    Number(Rational),

    /// A variable, such as `x`.
    Symbol(String),

    /// A named constant, such as `pi`.
    Const(Constant),

    /// A call to a supported function, such as `sin(x)`.
    Call(Func, Box<SymExpr>),
}

/// Adds two [`Primary`]s together. If both are numbers, the numbers are added together.
/// Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Number(lhs), Primary::Number(rhs)) => SymExpr::Primary(Primary::Number(lhs + rhs)),
            (lhs, rhs) => SymExpr::Add(vec![SymExpr::Primary(lhs), SymExpr::Primary(rhs)]),
        }
    }
}

/// Multiplies two [`Primary`]s together. If both are numbers, the numbers are multiplied
/// together. Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Mul`].
impl Mul<Primary> for Primary {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Number(lhs), Primary::Number(rhs)) => SymExpr::Primary(Primary::Number(lhs * rhs)),
            (lhs, rhs) => SymExpr::Mul(vec![SymExpr::Primary(lhs), SymExpr::Primary(rhs)]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// This type **flattens** out the tree structure of the AST. For example, the expression
/// `x + (sin(x) + 1)` is represented as a single [`SymExpr::Add`] node with _three_ children.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl SymExpr {
    /// Creates a number expression.
    pub fn number(n: impl Into<Rational>) -> Self {
        Self::Primary(Primary::Number(n.into()))
    }

    /// Creates a symbol expression.
    pub fn symbol(name: &str) -> Self {
        Self::Primary(Primary::Symbol(name.to_string()))
    }

    /// Creates a constant expression.
    pub fn constant(constant: Constant) -> Self {
        Self::Primary(Primary::Const(constant))
    }

    /// Creates a call to the given function. No simplification is done.
    pub fn call(func: Func, arg: SymExpr) -> Self {
        Self::Primary(Primary::Call(func, Box::new(arg)))
    }

    /// Raises this expression to the given power. No simplification is done.
    pub fn pow(self, exponent: SymExpr) -> Self {
        Self::Exp(Box::new(self), Box::new(exponent))
    }

    /// Returns the reciprocal of this expression, `self^-1`. No simplification is done.
    pub fn recip(self) -> Self {
        self.pow(Self::number(-1))
    }

    /// Returns the square root of this expression, `self^(1/2)`. No simplification is done.
    pub fn sqrt(self) -> Self {
        self.pow(Self::number((1, 2)))
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(num)) => Some(num),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Number`], returns the contained number.
    pub fn into_number(self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Number(num)) => Some(num),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Primary(Primary::Number(_)))
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| n.cmp0().is_eq())
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(|n| *n == 1)
    }

    /// If the expression is a [`Primary::Number`] that is an integer, returns the integer, if it
    /// fits in an [`i32`].
    pub fn as_small_integer(&self) -> Option<i32> {
        let num = self.as_number()?;
        if *num.denom() == 1 {
            num.numer().to_i32()
        } else {
            None
        }
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns true if the expression contains the given variable anywhere.
    pub fn depends_on(&self, var: &str) -> bool {
        self.post_order_iter().any(|expr| match expr {
            Self::Primary(Primary::Symbol(sym)) => sym == var,
            _ => false,
        })
    }

    /// Replaces every occurrence of the variable `var` with `value`. No simplification is done.
    pub fn substitute(&self, var: &str, value: &SymExpr) -> Self {
        match self {
            Self::Primary(Primary::Symbol(sym)) if sym == var => value.clone(),
            Self::Primary(Primary::Call(func, arg)) => Self::call(*func, arg.substitute(var, value)),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => Self::Add(terms.iter().map(|term| term.substitute(var, value)).collect()),
            Self::Mul(factors) => Self::Mul(factors.iter().map(|factor| factor.substitute(var, value)).collect()),
            Self::Exp(base, exp) => base.substitute(var, value).pow(exp.substitute(var, value)),
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or the number 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::number(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::number(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

/// Returns true if both slices contain strictly equal expressions, in any order, with the same
/// multiplicities.
fn same_elements(lhs: &[SymExpr], rhs: &[SymExpr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|lhs| {
        match (0..rhs.len()).find(|&idx| !used[idx] && rhs[idx] == *lhs) {
            Some(idx) => {
                used[idx] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                same_elements(lhs, rhs)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl Eq for SymExpr {}

/// Adds two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case both are combined
/// in one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) | (other, Self::Add(mut terms)) => {
                terms.push(other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Adds two [`SymExpr`]s together. The behavior is the same as [`Add`].
impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Add(Vec::new()));
        *self = lhs + rhs;
    }
}

/// Subtracts two [`SymExpr`]s, as `lhs + -1 * rhs`. No simplification is done.
impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.neg()
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for the case where
/// the operands are a mix of [`Primary`] and / or [`SymExpr::Mul`], in which case both are
/// combined in one list of factors (flattening).
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) | (other, Self::Mul(mut factors)) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

/// Multiplies two [`SymExpr`]s together. The behavior is the same as [`Mul`].
impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Mul(Vec::new()));
        *self = lhs * rhs;
    }
}

/// Divides two [`SymExpr`]s, as `lhs * rhs^-1`. No simplification is done.
impl Div for SymExpr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.recip()
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a [`Primary::Number`], in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Number(num)) => Self::Primary(Primary::Number(-num)),
            expr => Self::number(-1) * expr,
        }
    }
}

/// NOTE: strict equality ignores the order of terms and factors, but `pretty_assertions` does
/// not, so the diff of a failing test can look worse than the actual difference.
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn strict_equality_ignores_order() {
        let a = SymExpr::Add(vec![x(), SymExpr::call(Func::Sin, x()), SymExpr::number(2)]);
        let b = SymExpr::Add(vec![SymExpr::number(2), x(), SymExpr::call(Func::Sin, x())]);
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_counts_multiplicity() {
        let a = SymExpr::Add(vec![x(), x(), SymExpr::number(1)]);
        let b = SymExpr::Add(vec![x(), SymExpr::number(1), SymExpr::number(1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn ops_flatten() {
        let expr = x() + SymExpr::number(1) + x().pow(SymExpr::number(2));
        assert_eq!(expr, SymExpr::Add(vec![
            x(),
            SymExpr::number(1),
            x().pow(SymExpr::number(2)),
        ]));

        let expr = SymExpr::number(2) * x() * SymExpr::call(Func::Cos, x());
        assert_eq!(expr, SymExpr::Mul(vec![
            SymExpr::number(2),
            x(),
            SymExpr::call(Func::Cos, x()),
        ]));
    }

    #[test]
    fn numbers_fold_eagerly() {
        assert_eq!(SymExpr::number(2) + SymExpr::number((1, 2)), SymExpr::number((5, 2)));
        assert_eq!(-SymExpr::number(3), SymExpr::number(-3));
    }

    #[test]
    fn depends_on_variable() {
        let expr = SymExpr::call(Func::Log, x() + SymExpr::number(1));
        assert!(expr.depends_on("x"));
        assert!(!SymExpr::constant(Constant::Pi).depends_on("x"));
    }

    #[test]
    fn substitute_variable() {
        let expr = x().pow(SymExpr::number(2)) + x();
        let substituted = expr.substitute("x", &SymExpr::number(3));
        assert_eq!(substituted, SymExpr::Add(vec![
            SymExpr::number(3).pow(SymExpr::number(2)),
            SymExpr::number(3),
        ]));
    }

    #[test]
    fn downgrade_trivial() {
        assert_eq!(SymExpr::Add(vec![]).downgrade(), SymExpr::number(0));
        assert_eq!(SymExpr::Mul(vec![x()]).downgrade(), x());
    }
}
