//! Errors produced while solving.
//!
//! There are two kinds of errors. A [`SolveError`] is a mistake in the request itself, such as an
//! unknown operation or a missing parameter; it is reported back to the caller as its literal
//! text, in place of an explanation. A [`ComputeError`] means the request was valid, but the
//! computation itself could not be carried out.

use stepwise_symbolic::{integral::IntegralError, limit::LimitError, series::SeriesError};
use thiserror::Error;

/// A mistake in a solve request. The [`Display`](std::fmt::Display) implementation produces the
/// exact text returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The operation is not one of the supported operations.
    #[error("Error: Invalid operation. Use 'derivative', 'integral', 'limit', or 'series'.")]
    InvalidOperation,

    /// A limit was requested without a point.
    #[error("Error: Point required for limit calculation")]
    MissingPoint,

    /// A series was requested without a point, or without a number of terms.
    #[error("Error: Point and terms required for series expansion")]
    MissingSeriesParameters,
}

/// An error that occurred while computing the result of a valid request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    #[error(transparent)]
    Integral(#[from] IntegralError),

    #[error(transparent)]
    Limit(#[from] LimitError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    /// More series terms were requested than the configuration allows.
    #[error("cannot compute {requested} series terms (at most {max} are supported)")]
    TooManyTerms {
        requested: u32,
        max: u32,
    },

    /// A series was requested around an infinite point.
    #[error("cannot expand a series around an infinite point")]
    InfinitePoint,

    /// The point is NaN.
    #[error("the point must be a number")]
    NotANumber,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stepwise_symbolic::SymExpr;
    use super::*;

    #[test]
    fn request_errors_are_literal() {
        assert_eq!(
            SolveError::InvalidOperation.to_string(),
            "Error: Invalid operation. Use 'derivative', 'integral', 'limit', or 'series'.",
        );
        assert_eq!(SolveError::MissingPoint.to_string(), "Error: Point required for limit calculation");
        assert_eq!(
            SolveError::MissingSeriesParameters.to_string(),
            "Error: Point and terms required for series expansion",
        );
    }

    #[test]
    fn compute_errors_wrap_their_source() {
        let err = ComputeError::from(IntegralError::Unsupported { integrand: SymExpr::symbol("x") });
        assert_eq!(err.to_string(), "could not find an antiderivative of x");

        let err = ComputeError::TooManyTerms { requested: 50, max: 20 };
        assert_eq!(err.to_string(), "cannot compute 50 series terms (at most 20 are supported)");
    }
}
