//! Error types for the calculus-kit crate.
//!
//! This module defines the failure modes of the numerical engine. The main error types are:
//!
//! - `EvaluationError`: a required probe of the user function failed, or a query was malformed
//! - `ConfigError`: an evaluator was constructed with invalid parameters
//! - `ExpressionError`: a function given as a string could not be parsed or bound
//!
//! Each error type implements the standard Error trait and provides detailed error messages.
//! Limits are the exception to this scheme: probe failures there are absorbed and reported
//! through [`LimitValue`](crate::limit::LimitValue) instead.

use evalexpr::{DefaultNumericTypes, EvalexprError};
use thiserror::Error;

/// Errors raised while evaluating a function at a probe point.
///
/// Derivatives, integrals and series propagate these immediately; no substitute value is
/// ever returned in place of a failed probe.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The function produced NaN or an infinity
    #[error("function returned non-finite value {value} at {at:?}")]
    NonFinite { at: Vec<f64>, value: f64 },
    /// The function itself reported a failure
    #[error("function failed at {at:?}: {reason}")]
    Raised { at: Vec<f64>, reason: String },
    /// A partial derivative was requested along an axis the point does not have
    #[error("axis {axis} is out of range for a {dimension}-dimensional point")]
    AxisOutOfRange { axis: usize, dimension: usize },
    /// The point does not match the number of arguments the function takes
    #[error("invalid point dimension: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// A directional derivative was requested along the zero vector
    #[error("direction vector has zero length")]
    ZeroDirection,
}

impl EvaluationError {
    pub(crate) fn non_finite(at: &[f64], value: f64) -> Self {
        Self::NonFinite {
            at: at.to_vec(),
            value,
        }
    }

    pub(crate) fn raised(at: &[f64], reason: impl ToString) -> Self {
        Self::Raised {
            at: at.to_vec(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised when an evaluator is built with invalid parameters.
///
/// These are always reported by the constructor, never deferred to the first query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("step size must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("subdivision count must be at least 1")]
    ZeroSubdivisions,
    #[error("period must be positive and finite, got {0}")]
    InvalidPeriod(f64),
    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
    #[error("shrink factor must lie strictly between 0 and 1, got {0}")]
    InvalidShrinkFactor(f64),
    #[error("initial offset must be positive and finite, got {0}")]
    InvalidOffset(f64),
    #[error("limit estimation needs at least {min} probes, got {got}")]
    TooFewProbes { min: usize, got: usize },
    #[error("a series needs at least one term")]
    ZeroTerms,
    #[error("sample count must be at least 1")]
    ZeroSamples,
    /// A string-keyed method name did not match any known method
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

/// Errors that can occur when building a function from an expression string.
#[derive(Debug, Error)]
pub enum ExpressionError {
    /// Error when parsing the expression string with evalexpr
    #[error("Failed to parse expression")]
    Parse(#[from] EvalexprError<DefaultNumericTypes>),
    /// Error when the expression uses a variable that was not declared
    #[error("Variable not declared for expression: {0}")]
    VariableNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = EvaluationError::non_finite(&[2.0], f64::INFINITY);
        assert!(err.to_string().contains("2.0"));
        assert!(err.to_string().contains("inf"));

        let err = EvaluationError::AxisOutOfRange {
            axis: 3,
            dimension: 2,
        };
        assert_eq!(
            err.to_string(),
            "axis 3 is out of range for a 2-dimensional point"
        );

        let err = ConfigError::UnknownMethod("spline".to_string());
        assert_eq!(err.to_string(), "unknown method: spline");
    }

    #[test]
    fn test_raised_keeps_reason() {
        let err = EvaluationError::raised(&[1.0, 2.0], "division by zero");
        match err {
            EvaluationError::Raised { at, reason } => {
                assert_eq!(at, vec![1.0, 2.0]);
                assert_eq!(reason, "division by zero");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
