//! Step-by-step explanations of calculus problems.
//!
//! [`solve`] computes the derivative, indefinite integral, limit, or series of an expression of
//! `x`, and explains how the result was found in a few lines of text:
//!
//! ```
//! use stepwise_solve::solve;
//!
//! let explanation = solve("x^2 + sin(x)", "derivative", None, None).unwrap();
//! assert_eq!(explanation.lines().last(), Some("Final simplified derivative: 2*x + cos(x)"));
//! ```
//!
//! [`extract`] finds calls like `solve("x^2", operation='integral')` in free text, such as a
//! chat message, and returns the explanations of all of them.

pub mod config;
pub mod error;
pub mod extract;
pub mod operation;
pub mod solve;

pub use config::Config;
pub use error::{ComputeError, SolveError};
pub use extract::{extract, extract_with};
pub use operation::Operation;
pub use solve::{solve, solve_with};
