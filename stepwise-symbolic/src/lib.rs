//! Symbolic calculus over expressions of a single variable.
//!
//! # Expression representation
//!
//! Expressions are represented as a tree of [`SymExpr`] nodes. The tree is similar to the
//! [`stepwise_parser::parser::ast::Expr`] nodes produced by [`stepwise_parser`], with the main
//! difference being that [`SymExpr`] nodes **flatten** out the tree structure: `x + (x^2 + 1)` is
//! a single [`SymExpr::Add`] node with _three_ children. This makes it easy to combine like terms
//! and like factors, which is the bulk of what [`simplify`] does.
//!
//! Use [`normalize`] to read user input into a [`SymExpr`]. Numbers are exact [`rug::Rational`]s
//! throughout; [`rug::Float`]s are only used by [`eval`] to probe expressions numerically.
//!
//! # Calculus
//!
//! - [`derivative::derivative`] differentiates an expression. It cannot fail.
//! - [`integral::integral`] finds an antiderivative, or reports the integrand it could not
//!   handle.
//! - [`limit::limit`] computes limits at finite points, approached from the right, and at infinity.
//! - [`series::series`] computes truncated Taylor and Laurent expansions by series arithmetic.
//!
//! ```
//! use stepwise_symbolic::{derivative::derivative, normalize, simplify};
//!
//! let expr = normalize("x^3 + sin(x)").unwrap();
//! assert_eq!(simplify(&derivative(&expr, "x")).to_string(), "3*x^2 + cos(x)");
//! ```

pub mod derivative;
pub mod eval;
pub mod expand;
pub mod expr;
pub mod integral;
pub mod limit;
pub mod normalize;
pub mod primitive;
pub mod series;
pub mod simplify;
pub mod step_collector;

pub use expr::SymExpr;
pub use normalize::normalize;
pub use simplify::{simplify, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;
