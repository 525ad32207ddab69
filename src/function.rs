//! The function interfaces every evaluator wraps.
//!
//! The engine never owns a symbolic representation of the user's function; it only probes it.
//! Two traits describe what can be probed:
//!
//! - [`Evaluate`] for one-variable functions ℝ→ℝ
//! - [`ScalarField`] for multivariable scalar functions ℝⁿ→ℝ
//!
//! Plain closures implement both directly. A probe that yields NaN or an infinity is reported as
//! [`EvaluationError::NonFinite`] together with the input that produced it.
//!
//! # Example
//!
//! ```
//! use calculus_kit::prelude::*;
//!
//! let square = |x: f64| x * x;
//! assert_eq!(square.evaluate(3.0).unwrap(), 9.0);
//!
//! let reciprocal = |x: f64| 1.0 / x;
//! assert!(reciprocal.evaluate(0.0).is_err());
//!
//! let norm = Bivariate(|x: f64, y: f64| (x * x + y * y).sqrt());
//! assert_eq!(norm.evaluate_at(&[3.0, 4.0]).unwrap(), 5.0);
//! ```

use std::fmt::Display;

use crate::errors::EvaluationError;

/// A one-variable function that can be probed at a point.
///
/// Evaluators which are themselves functions of x (derivatives, Maclaurin and Fourier series,
/// parsed expressions) implement this trait too, so they can be wrapped again. A second
/// derivative is simply `Derivative::new(Derivative::new(f))`.
pub trait Evaluate {
    /// Evaluates the function at `x`, failing if the value is not a finite number.
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError>;
}

impl<F> Evaluate for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        finite(self(x), &[x])
    }
}

/// Adapter for functions that can fail explicitly.
///
/// The error is converted to [`EvaluationError::Raised`] with its message and the failing input.
///
/// ```
/// use calculus_kit::prelude::*;
///
/// let log = Fallible(|x: f64| {
///     if x > 0.0 {
///         Ok(x.ln())
///     } else {
///         Err(format!("log undefined at {x}"))
///     }
/// });
/// assert!(log.evaluate(1.0).is_ok());
/// assert!(log.evaluate(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> Evaluate for Fallible<F>
where
    F: Fn(f64) -> Result<f64, E>,
    E: Display,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        match (self.0)(x) {
            Ok(value) => finite(value, &[x]),
            Err(err) => Err(EvaluationError::raised(&[x], err)),
        }
    }
}

/// A scalar-valued function of several variables.
pub trait ScalarField {
    /// Number of arguments the function expects, if it is known.
    ///
    /// Closures over slices cannot report this and return `None`; points of any length are
    /// then passed through unchecked.
    fn arity(&self) -> Option<usize> {
        None
    }

    /// Evaluates the function at `point`, failing if the value is not a finite number.
    fn evaluate_at(&self, point: &[f64]) -> Result<f64, EvaluationError>;
}

impl<F> ScalarField for F
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate_at(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        finite(self(point), point)
    }
}

/// Adapter for two-argument closures such as `|x, y| x * y`.
#[derive(Debug, Clone, Copy)]
pub struct Bivariate<F>(pub F);

impl<F> ScalarField for Bivariate<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    fn evaluate_at(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        match point {
            [x, y] => finite((self.0)(*x, *y), point),
            _ => Err(EvaluationError::DimensionMismatch {
                expected: 2,
                got: point.len(),
            }),
        }
    }
}

/// Adapter for three-argument closures such as `|x, y, z| x * y * z`.
#[derive(Debug, Clone, Copy)]
pub struct Trivariate<F>(pub F);

impl<F> ScalarField for Trivariate<F>
where
    F: Fn(f64, f64, f64) -> f64,
{
    fn arity(&self) -> Option<usize> {
        Some(3)
    }

    fn evaluate_at(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        match point {
            [x, y, z] => finite((self.0)(*x, *y, *z), point),
            _ => Err(EvaluationError::DimensionMismatch {
                expected: 3,
                got: point.len(),
            }),
        }
    }
}

/// Rejects NaN and infinities, recording the input that produced them.
pub(crate) fn finite(value: f64, at: &[f64]) -> Result<f64, EvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::non_finite(at, value))
    }
}

/// Checks a point against the declared arity of `field`, if any.
pub(crate) fn check_arity<F: ScalarField + ?Sized>(
    field: &F,
    point: &[f64],
) -> Result<(), EvaluationError> {
    match field.arity() {
        Some(expected) if expected != point.len() => Err(EvaluationError::DimensionMismatch {
            expected,
            got: point.len(),
        }),
        _ => Ok(()),
    }
}
